//! The native library contract.
//!
//! [`NativeLibrary`] lists every entry point the link layer consumes. The
//! production adapter forwards each method to the matching C symbol; tests
//! substitute mocks or the instrumented double in [`crate::testing`].
//!
//! ## Ownership conventions
//!
//! These mirror the native API and matter to callers:
//!
//! - `link_create_*`, `playlist_create` and `image_create_from_link` return a
//!   reference the caller owns and must eventually [`release`](NativeLibrary::release).
//! - `link_as_*` downcasts return a *borrowed* handle. A caller that keeps it
//!   must [`add_ref`](NativeLibrary::add_ref) first.
//!
//! ## Thread safety
//!
//! The native library is not reentrant. Implementations are `Send + Sync` so
//! they can be shared, but callers serialize every call behind one lock.

use std::ffi::CStr;

use crate::handle::{
    AlbumKind, ArtistKind, Handle, ImageKind, LinkKind, PlaylistKind, RawHandle, ResourceKind,
    SessionKind, TrackKind, UserKind,
};

pub trait NativeLibrary: Send + Sync {
    /// Parse a URI. Returns an owned link, or `None` if the URI is rejected.
    fn link_create_from_string(&self, uri: &CStr) -> Option<Handle<LinkKind>>;

    /// Create an owned link to a track, embedding an offset when `offset_ms > 0`.
    fn link_create_from_track(
        &self,
        track: Handle<TrackKind>,
        offset_ms: i32,
    ) -> Option<Handle<LinkKind>>;

    fn link_create_from_album(&self, album: Handle<AlbumKind>) -> Option<Handle<LinkKind>>;

    fn link_create_from_artist(&self, artist: Handle<ArtistKind>) -> Option<Handle<LinkKind>>;

    fn link_create_from_user(&self, user: Handle<UserKind>) -> Option<Handle<LinkKind>>;

    fn link_create_from_playlist(
        &self,
        playlist: Handle<PlaylistKind>,
    ) -> Option<Handle<LinkKind>>;

    fn link_create_from_image(&self, image: Handle<ImageKind>) -> Option<Handle<LinkKind>>;

    /// Write the link's URI into `buffer`, NUL-terminated and truncated to fit.
    ///
    /// Returns the length of the full URI in bytes, excluding the terminator,
    /// regardless of how much was written. Callers compare the result against
    /// the buffer size to detect truncation.
    fn link_as_string(&self, link: Handle<LinkKind>, buffer: &mut [u8]) -> usize;

    /// Raw type tag, see [`LinkType::from_raw`](crate::LinkType::from_raw).
    fn link_type(&self, link: Handle<LinkKind>) -> i32;

    fn link_as_track(&self, link: Handle<LinkKind>) -> Option<Handle<TrackKind>>;

    /// Like [`link_as_track`](Self::link_as_track), also writing the embedded
    /// offset in milliseconds to `offset_ms` on success.
    fn link_as_track_and_offset(
        &self,
        link: Handle<LinkKind>,
        offset_ms: &mut i32,
    ) -> Option<Handle<TrackKind>>;

    fn link_as_album(&self, link: Handle<LinkKind>) -> Option<Handle<AlbumKind>>;

    fn link_as_artist(&self, link: Handle<LinkKind>) -> Option<Handle<ArtistKind>>;

    fn link_as_user(&self, link: Handle<LinkKind>) -> Option<Handle<UserKind>>;

    /// Load the playlist a link points at. Returns an owned reference.
    fn playlist_create(
        &self,
        session: Handle<SessionKind>,
        link: Handle<LinkKind>,
    ) -> Option<Handle<PlaylistKind>>;

    /// Load the image a link points at. Returns an owned reference.
    fn image_create_from_link(
        &self,
        session: Handle<SessionKind>,
        link: Handle<LinkKind>,
    ) -> Option<Handle<ImageKind>>;

    /// Increment the reference count of a resource.
    fn add_ref(&self, handle: RawHandle, kind: ResourceKind);

    /// Decrement the reference count of a resource, freeing it at zero.
    fn release(&self, handle: RawHandle, kind: ResourceKind);
}
