//! Values paired with the store they came from.
//!
//! A `Bound<S, T>` dereferences to the plain value, so it can be read and
//! edited like the value itself, and adds `save()`/`remove()` that go back
//! through the owning store. The store-specific methods live next to each
//! store.

use std::ops::{Deref, DerefMut};

/// A value together with the store that reads and writes it.
#[derive(Debug, Clone)]
pub struct Bound<S, T> {
    store: S,
    value: T,
}

impl<S, T> Bound<S, T> {
    pub(crate) fn new(store: S, value: T) -> Self {
        Self { store, value }
    }

    /// The owning store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Detaches the value from its store.
    pub fn into_inner(self) -> T {
        self.value
    }

    pub(crate) fn replace(&mut self, value: T) {
        self.value = value;
    }
}

impl<S, T> Deref for Bound<S, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<S, T> DerefMut for Bound<S, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}
