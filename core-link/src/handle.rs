//! Reference-count ownership of native handles.
//!
//! An [`OwnedHandle`] owns exactly one native reference from construction to
//! drop. Whether construction takes a new reference depends on where the
//! handle came from:
//!
//! | Source | `add_ref` |
//! |--------|-----------|
//! | `link_create_*`, `playlist_create`, `image_create_from_link` (owned) | `false` |
//! | `link_as_*` downcasts, handles borrowed from elsewhere | `true` |
//!
//! Every count change happens under the native lock.

use std::fmt;
use std::sync::Arc;

use bridge_traits::{Handle, HandleKind};
use tracing::trace;

use crate::session::Session;

/// One native reference to a resource of kind `K`, released on drop.
pub struct OwnedHandle<K: HandleKind> {
    session: Arc<Session>,
    handle: Handle<K>,
}

impl<K: HandleKind> OwnedHandle<K> {
    /// Take ownership of a reference to `handle`.
    ///
    /// With `add_ref` the native count is incremented first; without it the
    /// caller's existing reference is adopted.
    pub fn new(session: Arc<Session>, handle: Handle<K>, add_ref: bool) -> Self {
        if add_ref {
            session.call(|library| library.add_ref(handle.raw(), K::KIND));
            trace!(kind = %K::KIND, handle = %handle.raw(), "add_ref");
        }
        Self { session, handle }
    }

    /// The wrapped handle. The count is not touched.
    pub fn handle(&self) -> Handle<K> {
        self.handle
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}

impl<K: HandleKind> Clone for OwnedHandle<K> {
    fn clone(&self) -> Self {
        Self::new(self.session.clone(), self.handle, true)
    }
}

impl<K: HandleKind> Drop for OwnedHandle<K> {
    fn drop(&mut self) {
        let handle = self.handle;
        self.session
            .call(|library| library.release(handle.raw(), K::KIND));
        trace!(kind = %K::KIND, handle = %handle.raw(), "release");
    }
}

impl<K: HandleKind> fmt::Debug for OwnedHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnedHandle").field(&self.handle).finish()
    }
}
