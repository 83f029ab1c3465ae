//! Single-slot callback registration.

use alloc::boxed::Box;

/// Holds at most one registered callback.
///
/// Registering replaces whatever was there; an empty slot makes the
/// corresponding event a no-op.
pub struct Handler<F: ?Sized> {
    callback: Option<Box<F>>,
}

impl<F: ?Sized> Handler<F> {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self { callback: None }
    }

    /// Register a callback, dropping the previous one.
    pub fn set(&mut self, callback: Box<F>) {
        self.callback = Some(callback);
    }

    /// Remove the registered callback.
    pub fn clear(&mut self) {
        self.callback = None;
    }

    pub fn is_set(&self) -> bool {
        self.callback.is_some()
    }

    /// Mutable access to the callback for invocation.
    pub fn get_mut(&mut self) -> Option<&mut F> {
        self.callback.as_deref_mut()
    }
}

impl<F: ?Sized> Default for Handler<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> core::fmt::Debug for Handler<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Handler").field("set", &self.is_set()).finish()
    }
}
