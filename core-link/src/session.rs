//! # Session
//!
//! A [`Session`] binds a native library to an authenticated native session
//! and carries the per-session state the link layer needs: the URI buffer
//! hint and the playlist identity cache.
//!
//! Most callers use the process-wide session installed with [`install`];
//! [`Link::new`](crate::Link::new) resolves URIs against it. Hosts and tests
//! that manage sessions themselves pass an `Arc<Session>` explicitly to the
//! `*_in` constructors instead.
//!
//! ```ignore
//! use core_link::session;
//! use core_runtime::config::SessionConfig;
//!
//! let config = SessionConfig::builder()
//!     .library(library)
//!     .session_handle(handle)
//!     .build()?;
//! session::install(config)?;
//!
//! let link = core_link::Link::new("spotify:track:2Foc5Q5nqNiosCNqttzHof")?;
//! ```

use std::fmt;
use std::sync::Arc;

use bridge_traits::{Handle, NativeLibrary, SessionKind};
use core_runtime::config::SessionConfig;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{LinkError, Result};
use crate::lock;
use crate::playlist::PlaylistCache;

static CURRENT: Lazy<RwLock<Option<Arc<Session>>>> = Lazy::new(|| RwLock::new(None));

/// An authenticated native session and the state scoped to it.
pub struct Session {
    library: Arc<dyn NativeLibrary>,
    handle: Handle<SessionKind>,
    uri_buffer_hint: usize,
    playlists: PlaylistCache,
}

impl Session {
    /// Build a session from a configuration.
    ///
    /// The configuration is validated again, so hand-assembled configs get
    /// the same checks as builder-made ones.
    pub fn new(config: SessionConfig) -> Result<Arc<Self>> {
        config.validate()?;

        debug!(
            session = %config.session_handle.raw(),
            uri_buffer_hint = config.uri_buffer_hint,
            "Creating session"
        );

        Ok(Arc::new(Self {
            library: config.library,
            handle: config.session_handle,
            uri_buffer_hint: config.uri_buffer_hint,
            playlists: PlaylistCache::default(),
        }))
    }

    /// The native session handle.
    pub fn handle(&self) -> Handle<SessionKind> {
        self.handle
    }

    pub fn uri_buffer_hint(&self) -> usize {
        self.uri_buffer_hint
    }

    /// Number of live playlists in the identity cache.
    pub fn cached_playlists(&self) -> usize {
        lock::serialized(|| self.playlists.live_entries())
    }

    /// Run `f` against the native library while holding the native lock.
    ///
    /// This is the only path to the library.
    pub(crate) fn call<R>(&self, f: impl FnOnce(&dyn NativeLibrary) -> R) -> R {
        lock::serialized(|| f(self.library.as_ref()))
    }

    pub(crate) fn playlists(&self) -> &PlaylistCache {
        &self.playlists
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("handle", &self.handle)
            .field("uri_buffer_hint", &self.uri_buffer_hint)
            .field("cached_playlists", &self.cached_playlists())
            .finish_non_exhaustive()
    }
}

/// Install the process-wide session.
///
/// # Errors
///
/// - [`LinkError::AlreadyInstalled`] if a session is installed
/// - [`LinkError::Runtime`] if the configuration is invalid
pub fn install(config: SessionConfig) -> Result<Arc<Session>> {
    let mut current = CURRENT.write();
    if current.is_some() {
        return Err(LinkError::AlreadyInstalled);
    }

    let session = Session::new(config)?;
    *current = Some(session.clone());
    info!(session = %session.handle.raw(), "Session installed");
    Ok(session)
}

/// The process-wide session, if one is installed.
pub fn current() -> Option<Arc<Session>> {
    CURRENT.read().clone()
}

pub fn is_installed() -> bool {
    CURRENT.read().is_some()
}

/// Remove the process-wide session.
///
/// Links and objects created earlier keep their own reference to the session
/// and stay usable; only new URI lookups through [`Link::new`](crate::Link::new)
/// start failing.
pub fn uninstall() -> Option<Arc<Session>> {
    let previous = CURRENT.write().take();
    if let Some(session) = &previous {
        info!(session = %session.handle.raw(), "Session uninstalled");
    }
    previous
}
