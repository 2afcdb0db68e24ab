//! Workspace façade crate.
//!
//! Re-exports the public surface of the member crates so host bindings can
//! depend on `spotlink` alone. Enable the `libspotify` feature to pull in the
//! production adapter that links against the native library.

pub use bridge_traits::{Handle, LinkType, NativeLibrary, ResourceKind};
pub use core_link::{
    session, Album, Artist, Image, Link, LinkError, Playlist, Result, Session, Track, User,
};
pub use core_runtime::config::SessionConfig;
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};

#[cfg(feature = "libspotify")]
pub use bridge_native::LibSpotify;
