//! # Core Link Module
//!
//! Safe, reference-counted access to the native library's links and the
//! objects they point at.
//!
//! ## Overview
//!
//! - [`Session`] - an authenticated native session plus per-session state
//! - [`Link`] - a parsed URI, resolvable into typed objects
//! - [`Track`], [`Album`], [`Artist`], [`User`], [`Image`], [`Playlist`] -
//!   typed objects, each owning its own native reference
//! - [`OwnedHandle`] - the reference-count ownership every wrapper builds on
//!
//! ## Reference counting
//!
//! Every wrapper owns exactly one native reference and releases it on drop.
//! Handles that the native library hands over (links created from strings or
//! objects, playlists, images) are adopted as-is; handles it merely lends
//! (downcasts) get an extra reference first.
//!
//! ## Thread Safety
//!
//! All native calls go through one reentrant lock, see [`lock`]. All public
//! types are `Send + Sync`.
//!
//! ## Usage
//!
//! ```ignore
//! use core_link::{session, Link, LinkType};
//!
//! session::install(config)?;
//!
//! let link = Link::new("spotify:user:alice:playlist:3cEYpjA9oz9GiPac4AsH4n")?;
//! if link.link_type() == LinkType::Playlist {
//!     let playlist = link.as_playlist();
//! }
//! ```

mod buffer;
pub mod error;
pub mod handle;
pub mod link;
pub mod lock;
pub mod objects;
pub mod playlist;
pub mod session;

pub use bridge_traits::LinkType;
pub use error::{LinkError, Result};
pub use handle::OwnedHandle;
pub use link::Link;
pub use objects::{Album, Artist, Image, Track, User};
pub use playlist::Playlist;
pub use session::Session;
