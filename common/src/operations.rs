//! Abstract operations executed by [`Handler`]s.

use std::marker::PhantomData;

#[cfg(doc)]
use crate::Handler;

/// Operation reading a value, without any side effects.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Operation performing an action described by a value.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Selector of a `W`hat by a `B`.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the selected value.
    _what: PhantomData<W>,

    /// Key to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selector out of the provided key.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns the key of this [`By`] selector.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
