//! # Session Configuration
//!
//! Holds what the link layer needs from the outside world before a
//! `core_link::Session` can exist.
//!
//! ## Overview
//!
//! Session login and setup belong to the host. By the time this crate is
//! involved the host already has a loaded native library and an authenticated
//! native session pointer; it hands both over through [`SessionConfigBuilder`],
//! together with the URI buffer hint.
//!
//! ## Required Dependencies
//!
//! - `NativeLibrary` - the native entry points (production: `bridge_native::LibSpotify`)
//! - Session handle - the authenticated native session
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::SessionConfig;
//! use std::sync::Arc;
//!
//! let config = SessionConfig::builder()
//!     .library(Arc::new(library))
//!     .session_handle(session)
//!     .uri_buffer_hint(128)
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! `build()` fails fast with [`Error::CapabilityMissing`] when a required
//! dependency was not provided, and with [`Error::Config`] when a setting is
//! out of range.

use crate::error::{Error, Result};
use bridge_traits::{Handle, NativeLibrary, SessionKind};
use std::fmt;
use std::sync::Arc;

/// Initial buffer size used when reading a link's URI.
pub const DEFAULT_URI_BUFFER_HINT: usize = 64;

/// Upper bound accepted for [`SessionConfigBuilder::uri_buffer_hint`].
pub const MAX_URI_BUFFER_HINT: usize = 64 * 1024;

/// Validated configuration for a link-layer session.
#[derive(Clone)]
pub struct SessionConfig {
    /// Native entry points
    pub library: Arc<dyn NativeLibrary>,

    /// Authenticated native session, used when creating playlists and images
    pub session_handle: Handle<SessionKind>,

    /// First buffer size tried when stringifying a link; grown on demand
    pub uri_buffer_hint: usize,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("library", &"NativeLibrary { ... }")
            .field("session_handle", &self.session_handle)
            .field("uri_buffer_hint", &self.uri_buffer_hint)
            .finish()
    }
}

impl SessionConfig {
    /// Creates a new builder for constructing a `SessionConfig`.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks that the URI buffer hint is non-zero and below
    /// [`MAX_URI_BUFFER_HINT`].
    pub fn validate(&self) -> Result<()> {
        if self.uri_buffer_hint == 0 {
            return Err(Error::Config(
                "URI buffer hint must be at least 1 byte".to_string(),
            ));
        }

        if self.uri_buffer_hint > MAX_URI_BUFFER_HINT {
            return Err(Error::Config(format!(
                "URI buffer hint exceeds maximum of {} bytes",
                MAX_URI_BUFFER_HINT
            )));
        }

        Ok(())
    }
}

fn library_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "NativeLibrary".to_string(),
        message: "A NativeLibrary implementation is required to resolve links. \
                 Production: build with the 'libspotify' feature and pass bridge_native::LibSpotify. \
                 Tests: enable 'test-support' and pass bridge_traits::testing::FakeLibrary."
            .to_string(),
    }
}

fn session_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SessionHandle".to_string(),
        message: "An authenticated native session handle is required. \
                 Log in through the native library first and pass the resulting session."
            .to_string(),
    }
}

/// Builder for constructing [`SessionConfig`] instances.
#[derive(Default)]
pub struct SessionConfigBuilder {
    library: Option<Arc<dyn NativeLibrary>>,
    session_handle: Option<Handle<SessionKind>>,
    uri_buffer_hint: Option<usize>,
}

impl SessionConfigBuilder {
    /// Sets the native library implementation (required).
    pub fn library(mut self, library: Arc<dyn NativeLibrary>) -> Self {
        self.library = Some(library);
        self
    }

    /// Sets the authenticated native session (required).
    pub fn session_handle(mut self, handle: Handle<SessionKind>) -> Self {
        self.session_handle = Some(handle);
        self
    }

    /// Sets the initial buffer size for URI reads.
    ///
    /// Default: [`DEFAULT_URI_BUFFER_HINT`]. Longer URIs still come back
    /// intact; a good hint only saves a second native call.
    pub fn uri_buffer_hint(mut self, bytes: usize) -> Self {
        self.uri_buffer_hint = Some(bytes);
        self
    }

    /// Builds the configuration, validating required dependencies.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] if the library or session handle is absent
    /// - [`Error::Config`] if a setting is out of range
    pub fn build(self) -> Result<SessionConfig> {
        let library = self.library.ok_or_else(library_missing_error)?;
        let session_handle = self.session_handle.ok_or_else(session_missing_error)?;

        let config = SessionConfig {
            library,
            session_handle,
            uri_buffer_hint: self.uri_buffer_hint.unwrap_or(DEFAULT_URI_BUFFER_HINT),
        };

        config.validate()?;
        Ok(config)
    }
}
