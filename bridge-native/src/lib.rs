//! # Native Library Bridge
//!
//! Production implementation of [`bridge_traits::NativeLibrary`] over the
//! libspotify C API.
//!
//! ## Overview
//!
//! The adapter is a straight forwarding layer: each trait method calls one
//! C symbol, converting nullable pointers to `Option<Handle<K>>` on the way
//! out and handles back to pointers on the way in. It adds no locking of its
//! own; `core-link` serializes every call.
//!
//! ## Feature Flags
//!
//! - `libspotify`: compile the `extern "C"` bindings and [`LibSpotify`].
//!   Requires the native library at link time.
//!
//! Without the feature only the conversion helpers in [`convert`] are built,
//! so the rest of the workspace can be developed and tested on machines
//! without the native library.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_native::LibSpotify;
//! use std::sync::Arc;
//!
//! // `session_ptr` comes from the host's own sp_session_create call.
//! let session = LibSpotify::adopt_session(session_ptr)?;
//! let config = SessionConfig::builder()
//!     .library(Arc::new(LibSpotify::new()))
//!     .session_handle(session)
//!     .build()?;
//! ```

pub mod convert;

#[cfg(feature = "libspotify")]
mod ffi;
#[cfg(feature = "libspotify")]
mod library;

#[cfg(feature = "libspotify")]
pub use library::LibSpotify;
