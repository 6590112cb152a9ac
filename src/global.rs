//! The default app-wide container and access functions.
//!
//! Application setup code registers its types here once, and any part of the program can then
//! resolve them. Prefer an explicit [Container] where the owner is known, e.g. in tests.

use once_cell::sync::Lazy;

use crate::{Container, Injectable, Shared, TypeKey, WiringError};

// Created on first access
static GLOBAL_CONTAINER: Lazy<Container> = Lazy::new(Container::new);

/// The default container itself
pub fn container() -> &'static Container {
    &GLOBAL_CONTAINER
}

pub fn register_type(key: TypeKey) {
    container().register_type(key);
}

pub fn register<T: Injectable>() {
    container().register::<T>();
}

pub fn declare_injection(declaring: TypeKey, property: impl Into<String>, dependency: Option<TypeKey>) {
    container().declare_injection(declaring, property, dependency);
}

pub fn inject<D: Injectable, T: Injectable>(property: impl Into<String>) {
    container().inject::<D, T>(property);
}

pub fn get<T: Injectable>() -> Result<Shared<T>, WiringError> {
    container().get::<T>()
}

/// Clear every singleton cached by the default container.
pub fn reset() {
    container().reset();
}
