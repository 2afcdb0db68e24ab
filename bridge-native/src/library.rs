//! [`NativeLibrary`] over the libspotify C API.

use std::ffi::{c_char, c_int, c_void, CStr};

use bridge_traits::error::Result;
use bridge_traits::{
    AlbumKind, ArtistKind, BridgeError, Handle, ImageKind, LinkKind, NativeLibrary, PlaylistKind,
    RawHandle, ResourceKind, SessionKind, TrackKind, UserKind,
};
use tracing::{trace, warn};

use crate::convert::{capacity_to_native, handle_from_ptr, length_from_native, ptr_from_handle};
use crate::ffi;

/// The production native library.
///
/// Stateless: every method forwards to the linked C symbols. Callers are
/// responsible for serializing calls, since libspotify is not thread safe.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibSpotify;

impl LibSpotify {
    pub fn new() -> Self {
        Self
    }

    /// Wrap a session pointer created by the host's login flow.
    ///
    /// The session is owned by the host. Reference-count calls for it are
    /// ignored by this adapter.
    pub fn adopt_session(session: *mut c_void) -> Result<Handle<SessionKind>> {
        handle_from_ptr(session).ok_or(BridgeError::NullHandle("session"))
    }
}

fn check(code: ffi::sp_error, operation: &'static str, handle: RawHandle) {
    if code != ffi::SP_ERROR_OK {
        warn!(operation, %handle, code, "Native reference count call failed");
    }
}

// SAFETY (applies to every call below): each `Handle<K>` was produced from a
// non-null pointer returned by libspotify for a resource of kind `K`, and the
// caller holds a reference to it for the duration of the call. Calls are
// serialized by the caller.
impl NativeLibrary for LibSpotify {
    fn link_create_from_string(&self, uri: &CStr) -> Option<Handle<LinkKind>> {
        // SAFETY: `uri` is a valid NUL-terminated string for the whole call.
        handle_from_ptr(unsafe { ffi::sp_link_create_from_string(uri.as_ptr()) })
    }

    fn link_create_from_track(
        &self,
        track: Handle<TrackKind>,
        offset_ms: i32,
    ) -> Option<Handle<LinkKind>> {
        handle_from_ptr(unsafe {
            ffi::sp_link_create_from_track(ptr_from_handle(track), offset_ms as c_int)
        })
    }

    fn link_create_from_album(&self, album: Handle<AlbumKind>) -> Option<Handle<LinkKind>> {
        handle_from_ptr(unsafe { ffi::sp_link_create_from_album(ptr_from_handle(album)) })
    }

    fn link_create_from_artist(&self, artist: Handle<ArtistKind>) -> Option<Handle<LinkKind>> {
        handle_from_ptr(unsafe { ffi::sp_link_create_from_artist(ptr_from_handle(artist)) })
    }

    fn link_create_from_user(&self, user: Handle<UserKind>) -> Option<Handle<LinkKind>> {
        handle_from_ptr(unsafe { ffi::sp_link_create_from_user(ptr_from_handle(user)) })
    }

    fn link_create_from_playlist(
        &self,
        playlist: Handle<PlaylistKind>,
    ) -> Option<Handle<LinkKind>> {
        handle_from_ptr(unsafe { ffi::sp_link_create_from_playlist(ptr_from_handle(playlist)) })
    }

    fn link_create_from_image(&self, image: Handle<ImageKind>) -> Option<Handle<LinkKind>> {
        handle_from_ptr(unsafe { ffi::sp_link_create_from_image(ptr_from_handle(image)) })
    }

    fn link_as_string(&self, link: Handle<LinkKind>, buffer: &mut [u8]) -> usize {
        // SAFETY: the native side writes at most `capacity` bytes, and
        // `capacity` never exceeds `buffer.len()`.
        let len = unsafe {
            ffi::sp_link_as_string(
                ptr_from_handle(link),
                buffer.as_mut_ptr() as *mut c_char,
                capacity_to_native(buffer.len()),
            )
        };
        length_from_native(len, "sp_link_as_string")
    }

    fn link_type(&self, link: Handle<LinkKind>) -> i32 {
        unsafe { ffi::sp_link_type(ptr_from_handle(link)) }
    }

    fn link_as_track(&self, link: Handle<LinkKind>) -> Option<Handle<TrackKind>> {
        handle_from_ptr(unsafe { ffi::sp_link_as_track(ptr_from_handle(link)) })
    }

    fn link_as_track_and_offset(
        &self,
        link: Handle<LinkKind>,
        offset_ms: &mut i32,
    ) -> Option<Handle<TrackKind>> {
        let mut offset: c_int = 0;
        // SAFETY: `offset` outlives the call.
        let track = handle_from_ptr(unsafe {
            ffi::sp_link_as_track_and_offset(ptr_from_handle(link), &mut offset)
        })?;
        *offset_ms = offset;
        Some(track)
    }

    fn link_as_album(&self, link: Handle<LinkKind>) -> Option<Handle<AlbumKind>> {
        handle_from_ptr(unsafe { ffi::sp_link_as_album(ptr_from_handle(link)) })
    }

    fn link_as_artist(&self, link: Handle<LinkKind>) -> Option<Handle<ArtistKind>> {
        handle_from_ptr(unsafe { ffi::sp_link_as_artist(ptr_from_handle(link)) })
    }

    fn link_as_user(&self, link: Handle<LinkKind>) -> Option<Handle<UserKind>> {
        handle_from_ptr(unsafe { ffi::sp_link_as_user(ptr_from_handle(link)) })
    }

    fn playlist_create(
        &self,
        session: Handle<SessionKind>,
        link: Handle<LinkKind>,
    ) -> Option<Handle<PlaylistKind>> {
        handle_from_ptr(unsafe {
            ffi::sp_playlist_create(ptr_from_handle(session), ptr_from_handle(link))
        })
    }

    fn image_create_from_link(
        &self,
        session: Handle<SessionKind>,
        link: Handle<LinkKind>,
    ) -> Option<Handle<ImageKind>> {
        handle_from_ptr(unsafe {
            ffi::sp_image_create_from_link(ptr_from_handle(session), ptr_from_handle(link))
        })
    }

    fn add_ref(&self, handle: RawHandle, kind: ResourceKind) {
        let ptr = handle.addr() as *mut c_void;
        let code = unsafe {
            match kind {
                ResourceKind::Session => {
                    trace!(%handle, "Ignoring add_ref on host-owned session");
                    return;
                }
                ResourceKind::Link => ffi::sp_link_add_ref(ptr.cast()),
                ResourceKind::Track => ffi::sp_track_add_ref(ptr.cast()),
                ResourceKind::Album => ffi::sp_album_add_ref(ptr.cast()),
                ResourceKind::Artist => ffi::sp_artist_add_ref(ptr.cast()),
                ResourceKind::User => ffi::sp_user_add_ref(ptr.cast()),
                ResourceKind::Playlist => ffi::sp_playlist_add_ref(ptr.cast()),
                ResourceKind::Image => ffi::sp_image_add_ref(ptr.cast()),
            }
        };
        check(code, "add_ref", handle);
    }

    fn release(&self, handle: RawHandle, kind: ResourceKind) {
        let ptr = handle.addr() as *mut c_void;
        let code = unsafe {
            match kind {
                ResourceKind::Session => {
                    trace!(%handle, "Ignoring release on host-owned session");
                    return;
                }
                ResourceKind::Link => ffi::sp_link_release(ptr.cast()),
                ResourceKind::Track => ffi::sp_track_release(ptr.cast()),
                ResourceKind::Album => ffi::sp_album_release(ptr.cast()),
                ResourceKind::Artist => ffi::sp_artist_release(ptr.cast()),
                ResourceKind::User => ffi::sp_user_release(ptr.cast()),
                ResourceKind::Playlist => ffi::sp_playlist_release(ptr.cast()),
                ResourceKind::Image => ffi::sp_image_release(ptr.cast()),
            }
        };
        check(code, "release", handle);
    }
}
