//! Conversions at the C boundary.
//!
//! Pointers become [`Handle`]s (null becomes `None`), and C `int` lengths are
//! checked before they are used as Rust sizes.

use bridge_traits::{Handle, HandleKind};
use std::ffi::c_int;
use tracing::warn;

/// Wrap a native pointer, mapping null to `None`.
pub fn handle_from_ptr<K: HandleKind, T>(ptr: *mut T) -> Option<Handle<K>> {
    Handle::from_addr(ptr as usize)
}

/// Recover the native pointer behind a handle.
pub fn ptr_from_handle<K: HandleKind, T>(handle: Handle<K>) -> *mut T {
    handle.addr() as *mut T
}

/// Interpret a length returned by the native library.
///
/// Negative values are not part of the native contract; they are logged and
/// treated as an empty result.
pub fn length_from_native(len: c_int, operation: &'static str) -> usize {
    match usize::try_from(len) {
        Ok(len) => len,
        Err(_) => {
            warn!(operation, len, "Native call returned a negative length, clamping to 0");
            0
        }
    }
}

/// Buffer size to pass to a native call that takes an `int` capacity.
///
/// Buffers larger than `c_int::MAX` are advertised as `c_int::MAX`; the
/// native side never writes past the size it was given.
pub fn capacity_to_native(len: usize) -> c_int {
    c_int::try_from(len).unwrap_or(c_int::MAX)
}
