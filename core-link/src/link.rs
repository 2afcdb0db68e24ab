//! # Link
//!
//! A [`Link`] is a parsed music-service URI, such as
//! `spotify:track:2Foc5Q5nqNiosCNqttzHof`. It can be turned back into its
//! canonical URI and resolved into the typed object it points at.
//!
//! ```ignore
//! let link = Link::new("spotify:track:2Foc5Q5nqNiosCNqttzHof")?;
//! assert_eq!(link.link_type(), LinkType::Track);
//! assert_eq!(link.to_string(), "spotify:track:2Foc5Q5nqNiosCNqttzHof");
//!
//! let track = link.as_track().expect("track link");
//! assert_eq!(track.link().unwrap(), link);
//! ```
//!
//! Resolution never fails with an error: a link of the wrong type resolves
//! to `None`. Whether a link resolves is decided by the native library, with
//! one exception: [`Link::as_playlist`] and [`Link::as_image`] check the link
//! type first, since their native calls create new objects.

use std::ffi::CString;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bridge_traits::{Handle, LinkKind, LinkType};
use tracing::{debug, warn};

use crate::buffer::read_growing_buffer;
use crate::error::{LinkError, Result};
use crate::handle::OwnedHandle;
use crate::objects::{Album, Artist, Image, Track, User};
use crate::playlist::Playlist;
use crate::session::{self, Session};

/// A parsed URI backed by a native link handle.
#[derive(Clone)]
pub struct Link {
    inner: OwnedHandle<LinkKind>,
}

impl Link {
    /// Parse `uri` using the installed session.
    ///
    /// # Errors
    ///
    /// - [`LinkError::NotInitialized`] if no session is installed
    /// - [`LinkError::InvalidUri`] if the native parser rejects `uri`
    pub fn new(uri: &str) -> Result<Self> {
        let session = session::current().ok_or(LinkError::NotInitialized)?;
        Self::new_in(&session, uri)
    }

    /// Parse `uri` using an explicit session.
    pub fn new_in(session: &Arc<Session>, uri: &str) -> Result<Self> {
        let invalid = || {
            warn!(uri, "Rejected URI");
            LinkError::InvalidUri(uri.to_string())
        };

        let c_uri = CString::new(uri).map_err(|_| invalid())?;
        let handle = session
            .call(|library| library.link_create_from_string(&c_uri))
            .ok_or_else(invalid)?;

        debug!(uri, handle = %handle.raw(), "Created link");
        Ok(Self::from_handle(session, handle, false))
    }

    /// Wrap an existing native link.
    ///
    /// Pass `add_ref = false` only when the caller's reference is handed
    /// over, e.g. the handle came from a `link_create_*` call.
    pub fn from_handle(session: &Arc<Session>, handle: Handle<LinkKind>, add_ref: bool) -> Self {
        Self {
            inner: OwnedHandle::new(session.clone(), handle, add_ref),
        }
    }

    pub fn handle(&self) -> Handle<LinkKind> {
        self.inner.handle()
    }

    pub fn session(&self) -> &Arc<Session> {
        self.inner.session()
    }

    /// The canonical URI of this link.
    pub fn uri(&self) -> String {
        let session = self.session();
        let handle = self.handle();
        session.call(|library| {
            read_growing_buffer(session.uri_buffer_hint(), |buffer| {
                library.link_as_string(handle, buffer)
            })
        })
    }

    pub fn link_type(&self) -> LinkType {
        let raw = self.session().call(|library| library.link_type(self.handle()));
        LinkType::from_raw(raw)
    }

    /// The track this link points at.
    pub fn as_track(&self) -> Option<Track> {
        let session = self.session();
        session.call(|library| {
            let track = library.link_as_track(self.handle())?;
            Some(Track::from_handle(session, track, true))
        })
    }

    /// The offset, in milliseconds, embedded in a track link such as
    /// `spotify:track:2Foc5Q5nqNiosCNqttzHof#0:30`.
    ///
    /// `None` if this is not a track link or no offset is embedded.
    pub fn as_track_offset(&self) -> Option<u32> {
        let mut offset_ms = 0;
        self.session()
            .call(|library| library.link_as_track_and_offset(self.handle(), &mut offset_ms))?;
        u32::try_from(offset_ms).ok().filter(|&ms| ms > 0)
    }

    pub fn as_album(&self) -> Option<Album> {
        let session = self.session();
        session.call(|library| {
            let album = library.link_as_album(self.handle())?;
            Some(Album::from_handle(session, album, true))
        })
    }

    pub fn as_artist(&self) -> Option<Artist> {
        let session = self.session();
        session.call(|library| {
            let artist = library.link_as_artist(self.handle())?;
            Some(Artist::from_handle(session, artist, true))
        })
    }

    pub fn as_user(&self) -> Option<User> {
        let session = self.session();
        session.call(|library| {
            let user = library.link_as_user(self.handle())?;
            Some(User::from_handle(session, user, true))
        })
    }

    /// Load the playlist this link points at.
    ///
    /// Links to the same native playlist resolve to the same [`Playlist`]
    /// while it is alive, unless the session's playlist cache is disabled.
    pub fn as_playlist(&self) -> Option<Playlist> {
        if self.link_type() != LinkType::Playlist {
            return None;
        }
        let session = self.session();
        session.call(|library| {
            let playlist = library.playlist_create(session.handle(), self.handle())?;
            debug!(handle = %playlist.raw(), "Resolved playlist");
            Some(Playlist::from_handle(session, playlist, false))
        })
    }

    /// Load the image this link points at.
    pub fn as_image(&self) -> Option<Image> {
        if self.link_type() != LinkType::Image {
            return None;
        }
        let session = self.session();
        session.call(|library| {
            let image = library.image_create_from_link(session.handle(), self.handle())?;
            Some(Image::from_handle(session, image, false))
        })
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({:?})", self.uri())
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.uri() == other.uri()
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::testing::FakeLibrary;
    use core_runtime::config::SessionConfig;
    use std::collections::HashSet;

    fn setup() -> (Arc<FakeLibrary>, Arc<Session>) {
        let library = Arc::new(FakeLibrary::new());
        let config = SessionConfig::builder()
            .library(library.clone())
            .session_handle(library.session_handle())
            .build()
            .unwrap();
        (library, Session::new(config).unwrap())
    }

    #[test]
    fn test_new_in_and_uri() {
        let (library, session) = setup();
        let link = Link::new_in(&session, "spotify:track:2Foc5Q5nqNiosCNqttzHof").unwrap();

        assert_eq!(link.uri(), "spotify:track:2Foc5Q5nqNiosCNqttzHof");
        assert_eq!(link.link_type(), LinkType::Track);
        assert_eq!(library.references(link.handle().raw()), Some(1));

        drop(link);
        assert!(library.is_balanced());
    }

    #[test]
    fn test_invalid_uri() {
        let (library, session) = setup();

        let err = Link::new_in(&session, "not a uri").unwrap_err();
        assert!(matches!(err, LinkError::InvalidUri(ref uri) if uri == "not a uri"));

        let err = Link::new_in(&session, "spotify:track:a\0b").unwrap_err();
        assert!(matches!(err, LinkError::InvalidUri(_)));

        assert_eq!(library.links_created(), 0);
    }

    #[test]
    fn test_display_and_debug() {
        let (_library, session) = setup();
        let link = Link::new_in(&session, "spotify:album:abc").unwrap();

        assert_eq!(link.to_string(), "spotify:album:abc");
        assert_eq!(format!("{:?}", link), "Link(\"spotify:album:abc\")");
    }

    #[test]
    fn test_equality_follows_uri() {
        let (_library, session) = setup();
        let web = Link::new_in(&session, "https://open.spotify.com/artist/abc").unwrap();
        let uri = Link::new_in(&session, "spotify:artist:abc").unwrap();
        let other = Link::new_in(&session, "spotify:artist:def").unwrap();

        assert_ne!(web.handle(), uri.handle());
        assert_eq!(web, uri);
        assert_ne!(uri, other);

        let set: HashSet<Link> = [web, uri, other].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_clone_adds_a_reference() {
        let (library, session) = setup();
        let link = Link::new_in(&session, "spotify:track:abc").unwrap();
        let copy = link.clone();

        assert_eq!(library.references(link.handle().raw()), Some(2));
        drop(link);
        drop(copy);
        assert!(library.is_balanced());
    }

    #[test]
    fn test_as_track_takes_its_own_reference() {
        let (library, session) = setup();
        let link = Link::new_in(&session, "spotify:track:abc").unwrap();

        let track = link.as_track().unwrap();
        assert_eq!(library.references(track.handle().raw()), Some(1));

        drop(link);
        assert_eq!(library.references(track.handle().raw()), Some(1));
        drop(track);
        assert!(library.is_balanced());
    }

    #[test]
    fn test_mismatched_downcasts() {
        let (library, session) = setup();
        let album = Link::new_in(&session, "spotify:album:abc").unwrap();

        assert!(album.as_track().is_none());
        assert!(album.as_artist().is_none());
        assert!(album.as_user().is_none());
        assert!(album.as_playlist().is_none());
        assert!(album.as_image().is_none());
        assert!(album.as_album().is_some());

        drop(album);
        assert!(library.is_balanced());
    }

    #[test]
    fn test_as_user_on_profile_link() {
        let (_library, session) = setup();
        let link = Link::new_in(&session, "spotify:user:alice").unwrap();

        assert_eq!(link.link_type(), LinkType::Profile);
        let user = link.as_user().unwrap();
        assert_eq!(user.link().unwrap().uri(), "spotify:user:alice");
    }

    #[test]
    fn test_track_offset() {
        let (library, session) = setup();
        let with_offset = Link::new_in(&session, "spotify:track:abc#0:30").unwrap();
        let without = Link::new_in(&session, "spotify:track:abc").unwrap();
        let album = Link::new_in(&session, "spotify:album:abc").unwrap();

        assert_eq!(with_offset.as_track_offset(), Some(30_000));
        assert_eq!(without.as_track_offset(), None);
        assert_eq!(album.as_track_offset(), None);
        assert_eq!(library.add_ref_calls(), 0);
    }

    #[test]
    fn test_as_image_transfers_ownership() {
        let (library, session) = setup();
        let link = Link::new_in(&session, "spotify:image:abc123").unwrap();

        let image = link.as_image().unwrap();
        assert_eq!(library.references(image.handle().raw()), Some(1));
        assert_eq!(library.add_ref_calls(), 0);

        drop(image);
        drop(link);
        assert!(library.is_balanced());
    }
}
