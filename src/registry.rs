use std::any::TypeId;
use std::collections::hash_map::{Entry, HashMap};

use tracing::{debug, trace};

use crate::{Instance, TypeKey};

/// Per-type registration data
#[derive(Debug)]
pub(crate) struct Metadata {
    pub key: TypeKey,
    /// Cached singleton, unset until the first successful resolution
    pub instance: Option<Instance>,
}

/// Set of injectable types and their cached instances
#[derive(Default)]
pub(crate) struct Registry(HashMap<TypeId, Metadata>);

impl Registry {
    /// Register a type. Registering it again keeps the existing metadata.
    pub fn register(&mut self, key: TypeKey) {
        if let Entry::Vacant(v) = self.0.entry(key.id()) {
            debug!(type_name = key.name(), "registered type");
            v.insert(Metadata {
                key,
                instance: None,
            });
        }
    }

    pub fn is_registered(&self, key: &TypeKey) -> bool {
        self.0.contains_key(&key.id())
    }

    pub fn metadata(&self, key: &TypeKey) -> Option<&Metadata> {
        self.0.get(&key.id())
    }

    pub fn metadata_mut(&mut self, key: &TypeKey) -> Option<&mut Metadata> {
        self.0.get_mut(&key.id())
    }

    /// Drop every cached instance, keeping the registered types.
    pub fn clear_instances(&mut self) {
        for metadata in self.0.values_mut() {
            if metadata.instance.take().is_some() {
                trace!(type_name = metadata.key.name(), "dropped cached instance");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::injectable;

    #[derive(Default)]
    struct Plain;
    injectable!(Plain);

    #[test]
    fn register_is_idempotent() {
        let key = TypeKey::of::<Plain>();
        let mut registry = Registry::default();
        assert!(!registry.is_registered(&key));

        registry.register(key);
        let instance: Instance = Arc::new(());
        registry.metadata_mut(&key).unwrap().instance = Some(instance);
        registry.register(key);

        assert!(registry.is_registered(&key));
        assert!(registry.metadata(&key).unwrap().instance.is_some());
    }

    #[test]
    fn clear_keeps_types() {
        let key = TypeKey::of::<Plain>();
        let mut registry = Registry::default();
        registry.register(key);
        let instance: Instance = Arc::new(());
        registry.metadata_mut(&key).unwrap().instance = Some(instance);

        registry.clear_instances();

        assert!(registry.is_registered(&key));
        assert!(registry.metadata(&key).unwrap().instance.is_none());
    }
}
