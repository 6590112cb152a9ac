use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::injection::{InjectionMap, InjectionRecord};
use crate::registry::Registry;
use crate::*;

#[derive(Default)]
struct State {
    registry: Registry,
    injections: InjectionMap,
}

/// Dependency injection container.
///
/// Types are registered and their injected properties declared up front, then
/// [Container::get] builds each type once, injects its dependencies and caches the result
/// until the next [Container::reset].
///
/// A single lock is held for a whole top-level resolution. Constructors and
/// [Injectable::assign] implementations run under it and must not call back into the
/// same container.
#[derive(Default)]
pub struct Container {
    state: Mutex<State>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a type as injectable. Registering it twice is a no-op.
    pub fn register_type(&self, key: TypeKey) {
        self.state.lock().registry.register(key);
    }

    pub fn register<T: Injectable>(&self) {
        self.register_type(TypeKey::of::<T>());
    }

    /// Declare that `property` of `declaring` receives the instance of `dependency`.
    ///
    /// The dependency is not checked here: an unregistered or missing dependency
    /// is only reported when the declaring type (or a descendant) is resolved.
    pub fn declare_injection(
        &self,
        declaring: TypeKey,
        property: impl Into<String>,
        dependency: Option<TypeKey>,
    ) {
        self.state
            .lock()
            .injections
            .add(declaring, property.into(), dependency);
    }

    /// Typed shortcut for [Container::declare_injection].
    pub fn inject<D: Injectable, T: Injectable>(&self, property: impl Into<String>) {
        self.declare_injection(TypeKey::of::<D>(), property, Some(TypeKey::of::<T>()));
    }

    pub fn is_registered(&self, key: TypeKey) -> bool {
        self.state.lock().registry.is_registered(&key)
    }

    /// Check if a singleton is currently cached for this type
    pub fn is_resolved(&self, key: TypeKey) -> bool {
        self.state
            .lock()
            .registry
            .metadata(&key)
            .is_some_and(|m| m.instance.is_some())
    }

    /// Injections declared directly on this type, ignoring its ancestors.
    pub fn direct_injections(&self, key: TypeKey) -> Vec<InjectionRecord> {
        self.state.lock().injections.direct(&key).to_vec()
    }

    /// Resolve a type-erased instance of the given type.
    pub fn resolve(&self, key: Option<TypeKey>) -> Result<Instance, WiringError> {
        let mut state = self.state.lock();
        let State {
            registry,
            injections,
        } = &mut *state;
        Resolution::new(registry, injections).resolve(key)
    }

    /// Obtain the singleton instance of `T`, building it on first use.
    pub fn get<T: Injectable>(&self) -> Result<Shared<T>, WiringError> {
        let instance = self.resolve(Some(TypeKey::of::<T>()))?;
        instance
            .downcast::<RwLock<T>>()
            .map_err(|_| WiringError::TypeMismatch {
                property: String::new(),
                expected: T::type_name(),
            })
    }

    /// Forget every cached singleton. Registrations and injections are kept.
    pub fn reset(&self) {
        debug!("clearing cached instances");
        self.state.lock().registry.clear_instances();
    }
}

/// One top-level resolution and its stack of types under construction.
struct Resolution<'a> {
    registry: &'a mut Registry,
    injections: &'a InjectionMap,
    resolving: Vec<TypeKey>,
}

impl<'a> Resolution<'a> {
    fn new(registry: &'a mut Registry, injections: &'a InjectionMap) -> Self {
        Self {
            registry,
            injections,
            resolving: Vec::new(),
        }
    }

    fn resolve(&mut self, key: Option<TypeKey>) -> Result<Instance, WiringError> {
        let Some(key) = key else {
            debug!("dependency reference is undefined");
            return Err(WiringError::UndefinedDependency);
        };

        let Some(metadata) = self.registry.metadata(&key) else {
            debug!(type_name = key.name(), "type is not registered");
            return Err(WiringError::UnregisteredType(key.name()));
        };
        if let Some(instance) = &metadata.instance {
            trace!(type_name = key.name(), "cache hit");
            return Ok(instance.clone());
        }
        // Reaching a type still under construction means we went around a cycle
        if self.resolving.contains(&key) {
            debug!(type_name = key.name(), "circular dependency");
            return Err(WiringError::CircularDependency(key.name()));
        }

        self.resolving.push(key);
        let built = self.build(key);
        let popped = self.resolving.pop();
        debug_assert_eq!(popped, Some(key));
        let instance = built?;

        let Some(metadata) = self.registry.metadata_mut(&key) else {
            return Err(WiringError::UnregisteredType(key.name()));
        };
        debug!(type_name = key.name(), "cached instance");
        Ok(metadata.instance.get_or_insert(instance).clone())
    }

    /// Instantiate the type and inject the dependencies declared along its inheritance chain.
    fn build(&mut self, key: TypeKey) -> Result<Instance, WiringError> {
        debug!(type_name = key.name(), "instantiating");
        let mut bare = key.construct();
        let injections = self.injections;
        for declaring in key.lineage() {
            for InjectionRecord {
                property,
                dependency,
            } in injections.direct(&declaring)
            {
                let value = self.resolve(*dependency)?;
                trace!(
                    type_name = key.name(),
                    declared_on = declaring.name(),
                    property = property.as_str(),
                    "injecting"
                );
                bare.assign(property, value)?;
            }
        }
        Ok(bare.into_instance())
    }
}

/// Wrap an already built value as a resolved instance.
///
/// Mostly useful to overwrite an injected [Slot] by hand.
pub fn share<T: Injectable>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}
