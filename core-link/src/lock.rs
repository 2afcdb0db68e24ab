//! The global native lock.
//!
//! libspotify is not thread safe. Every call into it, including add-ref and
//! release, runs inside [`serialized`]. The lock is reentrant: a wrapper may
//! be dropped, and therefore released, while the lock is already held by the
//! same thread.

use once_cell::sync::Lazy;
use parking_lot::ReentrantMutex;

static NATIVE_LOCK: Lazy<ReentrantMutex<()>> = Lazy::new(|| ReentrantMutex::new(()));

/// Run `f` while holding the native lock.
pub fn serialized<R>(f: impl FnOnce() -> R) -> R {
    let _guard = NATIVE_LOCK.lock();
    f()
}

#[cfg(test)]
pub(crate) fn held_by_current_thread() -> bool {
    NATIVE_LOCK.is_owned_by_current_thread()
}
