//! # Native Bridge Traits
//!
//! The contract between the safe link layer and the native music-service
//! client library.
//!
//! ## Overview
//!
//! The native library exposes opaque, reference-counted resources through a
//! C API. This crate describes that API in Rust terms so the layers above can
//! be written, and tested, without linking against the real library:
//!
//! - [`Handle`](handle::Handle) - non-null native pointer tagged with its resource kind
//! - [`NativeLibrary`](library::NativeLibrary) - every native entry point the link layer calls
//! - [`LinkType`](link_type::LinkType) - decoded link type tags
//! - [`LoggerSink`](log::LoggerSink) - forward structured logs to the host language
//!
//! ## Implementations
//!
//! | Implementation | Crate | Purpose |
//! |----------------|-------|---------|
//! | `LibSpotify`   | `bridge-native` (feature `libspotify`) | Production FFI adapter |
//! | `FakeLibrary`  | `bridge-traits` (feature `test-support`) | Instrumented in-memory double |
//!
//! ## Error Handling
//!
//! Native calls signal failure with null handles, which surface as `Option`.
//! [`BridgeError`](error::BridgeError) covers the two adapter-level failures:
//! a null session pointer handed over by the host and a log sink that cannot
//! write.
//!
//! ## Thread Safety
//!
//! `NativeLibrary` requires `Send + Sync`, but the native library itself is
//! not reentrant: callers must serialize access. `core-link` does so with a
//! single global lock.

pub mod error;
pub mod handle;
pub mod library;
pub mod link_type;
pub mod log;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::BridgeError;

// Re-export commonly used types
pub use handle::{
    AlbumKind, ArtistKind, Handle, HandleKind, ImageKind, LinkKind, PlaylistKind, RawHandle,
    ResourceKind, SessionKind, TrackKind, UserKind,
};
pub use library::NativeLibrary;
pub use link_type::LinkType;
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
