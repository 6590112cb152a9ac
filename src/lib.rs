//! Minimal property-injection container with singleton scope and cycle detection.
//!
//! # Simple use case
//!
//! ```
//! # use wiring::*;
//! #[derive(Default)]
//! struct Greeter;
//!
//! impl Greeter {
//!     fn greet(&self) -> String {
//!         "Hello world".into()
//!     }
//! }
//! injectable!(Greeter);
//!
//! #[derive(Default)]
//! struct Frontend {
//!     greeter: Slot<Greeter>,
//! }
//! injectable!(Frontend, greeter);
//!
//! # fn main() -> Result<(), WiringError> {
//! // Register the types and declare which properties receive which dependency
//! let container = Container::new();
//! container.register::<Greeter>();
//! container.register::<Frontend>();
//! container.inject::<Frontend, Greeter>("greeter");
//!
//! let frontend = container.get::<Frontend>()?;
//! let greeter = container.get::<Greeter>()?;
//! assert_eq!(frontend.read().greeter.get().unwrap().read().greet(), "Hello world");
//! assert!(std::sync::Arc::ptr_eq(frontend.read().greeter.get().unwrap(), &greeter));
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! The container keeps two maps, both keyed by [TypeKey]:
//!
//! * the registry, holding the set of injectable types and the cached singleton of each one;
//! * the injection map, holding for each type the properties declared directly on it, in order.
//!
//! Resolving a type checks that it is registered, returns the cached instance if there is one,
//! and otherwise builds a bare instance with [Injectable::construct]. Every injection declared on
//! the type and on its ancestors (see [Injectable::base]) is then resolved recursively and handed
//! to [Injectable::assign]. The populated instance is cached and shared as a [Shared] handle.
//!
//! Types still under construction are tracked for the duration of a top-level call. Re-entering
//! one of them is reported as [WiringError::CircularDependency] instead of recursing forever.

pub mod global;
mod helpers;
mod inject;
mod injection;
mod registry;
mod resolve;

pub use helpers::Slot;
pub use inject::{share, Container};
pub use injection::InjectionRecord;
pub use resolve::{Injectable, Instance, Shared, TypeKey, WiringError};
