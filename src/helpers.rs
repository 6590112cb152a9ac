use std::fmt;

use parking_lot::RwLock;

use crate::{Injectable, Instance, Shared, WiringError};

/// Injected property holding a shared dependency.
///
/// A slot starts empty when its owner is constructed and is filled by the container
/// during resolution. It can be overwritten later on.
pub struct Slot<T>(Option<Shared<T>>);

impl<T> Slot<T> {
    pub fn get(&self) -> Option<&Shared<T>> {
        self.0.as_ref()
    }

    pub fn set(&mut self, value: Shared<T>) {
        self.0 = Some(value);
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl<T: Injectable> Slot<T> {
    /// Fill the slot with a type-erased instance resolved for `property`.
    pub fn fill(&mut self, property: &str, value: Instance) -> Result<(), WiringError> {
        let shared = value
            .downcast::<RwLock<T>>()
            .map_err(|_| WiringError::TypeMismatch {
                property: property.to_owned(),
                expected: T::type_name(),
            })?;
        self.0 = Some(shared);
        Ok(())
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_set() { "set" } else { "empty" };
        f.debug_tuple("Slot").field(&state).finish()
    }
}

/// Implement [Injectable] for a struct built with [Default] whose injected properties are [Slot] fields.
///
/// Each listed field is an injectable property named after the field.
/// A type embedding a base type lists it first: properties it does not own are forwarded to the
/// base field, and the base becomes the next link in its inheritance chain.
///
/// ```
/// # use wiring::*;
/// #[derive(Default)]
/// struct Clock;
/// injectable!(Clock);
///
/// #[derive(Default)]
/// struct Service {
///     clock: Slot<Clock>,
/// }
/// injectable!(Service, clock);
///
/// #[derive(Default)]
/// struct Special {
///     service: Service,
/// }
/// injectable!(Special: Service => service;);
/// ```
#[macro_export]
macro_rules! injectable {
    ($Type:ty : $Base:ty => $base_field:ident ; $($field:ident),* $(,)?) => {
        impl $crate::Injectable for $Type {
            fn construct() -> Self {
                <$Type as ::std::default::Default>::default()
            }

            fn base() -> ::std::option::Option<$crate::TypeKey> {
                ::std::option::Option::Some($crate::TypeKey::of::<$Base>())
            }

            fn assign(
                &mut self,
                property: &str,
                value: $crate::Instance,
            ) -> ::std::result::Result<(), $crate::WiringError> {
                match property {
                    $( stringify!($field) => self.$field.fill(property, value), )*
                    _ => $crate::Injectable::assign(&mut self.$base_field, property, value),
                }
            }
        }
    };
    ($Type:ty $(, $field:ident)* $(,)?) => {
        impl $crate::Injectable for $Type {
            fn construct() -> Self {
                <$Type as ::std::default::Default>::default()
            }

            fn assign(
                &mut self,
                property: &str,
                #[allow(unused_variables)] value: $crate::Instance,
            ) -> ::std::result::Result<(), $crate::WiringError> {
                match property {
                    $( stringify!($field) => self.$field.fill(property, value), )*
                    _ => ::std::result::Result::Err($crate::WiringError::unknown_property::<Self>(property)),
                }
            }
        }
    };
}
