use std::any::TypeId;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::TypeKey;

/// A property of the declaring type that receives an instance of the dependency type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionRecord {
    pub property: String,
    /// `None` when the reference to the dependency type could not be obtained at declaration time.
    pub dependency: Option<TypeKey>,
}

/// Injections declared directly on each type, in declaration order.
///
/// Records are never copied to descendant types: the resolver walks the inheritance chain instead.
#[derive(Default)]
pub(crate) struct InjectionMap(HashMap<TypeId, Vec<InjectionRecord>>);

impl InjectionMap {
    pub fn add(&mut self, declaring: TypeKey, property: String, dependency: Option<TypeKey>) {
        let records = self.0.entry(declaring.id()).or_default();
        if let Some(existing) = records.iter_mut().find(|r| r.property == property) {
            warn!(
                type_name = declaring.name(),
                property = property.as_str(),
                "replacing injection declared twice"
            );
            existing.dependency = dependency;
            return;
        }
        debug!(
            type_name = declaring.name(),
            property = property.as_str(),
            dependency = dependency.map(|d| d.name()),
            "declared injection"
        );
        records.push(InjectionRecord {
            property,
            dependency,
        });
    }

    /// Injections declared on this type only, excluding its ancestors.
    pub fn direct(&self, key: &TypeKey) -> &[InjectionRecord] {
        self.0.get(&key.id()).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{injectable, Slot};

    #[derive(Default)]
    struct Dep;
    injectable!(Dep);

    #[derive(Default)]
    struct Other;
    injectable!(Other);

    #[derive(Default)]
    struct Owner {
        first: Slot<Dep>,
        second: Slot<Other>,
    }
    injectable!(Owner, first, second);

    #[test]
    fn keeps_declaration_order() {
        let owner = TypeKey::of::<Owner>();
        let mut map = InjectionMap::default();
        map.add(owner, "second".into(), Some(TypeKey::of::<Other>()));
        map.add(owner, "first".into(), Some(TypeKey::of::<Dep>()));

        let properties: Vec<_> = map.direct(&owner).iter().map(|r| r.property.as_str()).collect();
        assert_eq!(properties, ["second", "first"]);
        assert!(map.direct(&TypeKey::of::<Dep>()).is_empty());
    }

    #[test]
    fn redeclaration_replaces_in_place() {
        let owner = TypeKey::of::<Owner>();
        let mut map = InjectionMap::default();
        map.add(owner, "first".into(), None);
        map.add(owner, "second".into(), Some(TypeKey::of::<Other>()));
        map.add(owner, "first".into(), Some(TypeKey::of::<Dep>()));

        let records = map.direct(&owner);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].property, "first");
        assert_eq!(records[0].dependency, Some(TypeKey::of::<Dep>()));
    }
}
