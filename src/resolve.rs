//! Traits and structs supporting the resolution rules
//!
//! The container combines a generic instance map based on the [std::any::Any] trait for
//! runtime reflection with a small trait implemented by each injectable type.
//!
//! * The [Injectable] trait indicates that a struct can be built from nothing
//!   (a zero-argument constructor) and can receive its dependencies afterwards,
//!   one named property at a time.
//! * A [TypeKey] is the runtime identity of an injectable type. It is what the registry
//!   and the injection map are keyed by, and it knows how to build a bare instance
//!   and where the inheritance chain of the type continues.
//!
//! Resolved instances are shared behind an `Arc<RwLock<_>>` so that injected properties
//! stay writable once the instance has been handed out.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

/// A resolved singleton, shared between every consumer of the type.
pub type Shared<T> = Arc<RwLock<T>>;

/// Type-erased [Shared] instance, as stored in the registry.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A type that the container can instantiate and populate.
///
/// Inheritance is expressed by composition: a type embedding another injectable
/// type reports it through [Injectable::base] and forwards the properties it does
/// not own to it in [Injectable::assign].
pub trait Injectable: Send + Sync + 'static {
    /// Build a bare instance, before any property is injected.
    fn construct() -> Self
    where
        Self: Sized;

    /// Immediate ancestor in the inheritance chain, if any.
    fn base() -> Option<TypeKey>
    where
        Self: Sized,
    {
        None
    }

    /// Store a resolved dependency into the named property.
    fn assign(&mut self, property: &str, value: Instance) -> Result<(), WiringError>;

    /// Name reported in error messages
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Object-safe view of a bare instance under construction.
pub(crate) trait Constructed: Send + Sync {
    fn assign(&mut self, property: &str, value: Instance) -> Result<(), WiringError>;

    /// Seal the populated instance into its shared form.
    fn into_instance(self: Box<Self>) -> Instance;
}

impl<T: Injectable> Constructed for T {
    fn assign(&mut self, property: &str, value: Instance) -> Result<(), WiringError> {
        Injectable::assign(self, property, value)
    }

    fn into_instance(self: Box<Self>) -> Instance {
        let shared: Shared<T> = Arc::new(RwLock::new(*self));
        shared
    }
}

fn construct_erased<T: Injectable>() -> Box<dyn Constructed> {
    Box::new(T::construct())
}

/// Runtime identity of an injectable type.
///
/// Two keys are equal when they describe the same Rust type.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    construct: fn() -> Box<dyn Constructed>,
    base: fn() -> Option<TypeKey>,
}

impl TypeKey {
    pub fn of<T: Injectable>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::type_name(),
            construct: construct_erased::<T>,
            base: T::base,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Immediate ancestor of this type
    pub fn base(&self) -> Option<TypeKey> {
        (self.base)()
    }

    /// The type itself followed by its ancestors, closest first.
    pub fn lineage(&self) -> impl Iterator<Item = TypeKey> {
        std::iter::successors(Some(*self), TypeKey::base)
    }

    pub(crate) fn construct(&self) -> Box<dyn Constructed> {
        (self.construct)()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strip the module path of a type name, keeping generic arguments untouched.
///
/// `my_app::services::Logger` becomes `Logger`, `my_app::Cache<my_app::Key>` becomes
/// `Cache<my_app::Key>`.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let head = full.find('<').unwrap_or(full.len());
    match full[..head].rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

/// Errors triggered during the autowiring process
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WiringError {
    #[error("[DI] Cannot resolve dependency: type is undefined. Possible circular import or missing dependency.")]
    UndefinedDependency,
    #[error("[DI] {0} is not registered. Use @Injectable")]
    UnregisteredType(&'static str),
    #[error("[DI] Circular dependency detected while resolving {0}")]
    CircularDependency(&'static str),
    #[error("[DI] {type_name} has no injectable property '{property}'")]
    UnknownProperty {
        type_name: &'static str,
        property: String,
    },
    #[error("[DI] Property '{property}' expects an instance of {expected}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
    },
}

impl WiringError {
    /// Rejection of a property that `T` does not declare.
    pub fn unknown_property<T: Injectable>(property: &str) -> Self {
        Self::UnknownProperty {
            type_name: T::type_name(),
            property: property.to_owned(),
        }
    }
}
