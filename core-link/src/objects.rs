//! Typed objects a [`Link`] resolves to.
//!
//! Each object owns one native reference, independent of the link that
//! produced it, and can produce a fresh link back to itself. Objects compare
//! equal when they wrap the same native handle.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bridge_traits::{AlbumKind, ArtistKind, Handle, ImageKind, TrackKind, UserKind};
use tracing::debug;

use crate::handle::OwnedHandle;
use crate::link::Link;
use crate::session::Session;

macro_rules! typed_object {
    ($(#[$meta:meta])* $name:ident => $kind:ty) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            inner: OwnedHandle<$kind>,
        }

        impl $name {
            /// Wrap a native handle, taking a new reference when `add_ref`
            /// is set.
            pub fn from_handle(session: &Arc<Session>, handle: Handle<$kind>, add_ref: bool) -> Self {
                Self {
                    inner: OwnedHandle::new(session.clone(), handle, add_ref),
                }
            }

            pub fn handle(&self) -> Handle<$kind> {
                self.inner.handle()
            }

            pub fn session(&self) -> &Arc<Session> {
                self.inner.session()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.handle() == other.handle()
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.handle().hash(state);
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.handle()).finish()
            }
        }
    };
}

typed_object! {
    /// A track, possibly a local file.
    Track => TrackKind
}

typed_object! {
    Album => AlbumKind
}

typed_object! {
    Artist => ArtistKind
}

typed_object! {
    /// A user profile.
    User => UserKind
}

typed_object! {
    /// An image such as cover art or a portrait.
    Image => ImageKind
}

impl Track {
    /// A link to this track.
    pub fn link(&self) -> Option<Link> {
        self.link_with_offset(0)
    }

    /// A link to this track that starts playback `offset_ms` in.
    pub fn link_with_offset(&self, offset_ms: u32) -> Option<Link> {
        let offset = i32::try_from(offset_ms).unwrap_or(i32::MAX);
        let session = self.session();
        session.call(|library| {
            let link = library.link_create_from_track(self.handle(), offset)?;
            debug!(track = %self.handle().raw(), offset_ms, "Created link from track");
            Some(Link::from_handle(session, link, false))
        })
    }
}

impl Album {
    pub fn link(&self) -> Option<Link> {
        let session = self.session();
        session.call(|library| {
            let link = library.link_create_from_album(self.handle())?;
            Some(Link::from_handle(session, link, false))
        })
    }
}

impl Artist {
    pub fn link(&self) -> Option<Link> {
        let session = self.session();
        session.call(|library| {
            let link = library.link_create_from_artist(self.handle())?;
            Some(Link::from_handle(session, link, false))
        })
    }
}

impl User {
    pub fn link(&self) -> Option<Link> {
        let session = self.session();
        session.call(|library| {
            let link = library.link_create_from_user(self.handle())?;
            Some(Link::from_handle(session, link, false))
        })
    }
}

impl Image {
    pub fn link(&self) -> Option<Link> {
        let session = self.session();
        session.call(|library| {
            let link = library.link_create_from_image(self.handle())?;
            Some(Link::from_handle(session, link, false))
        })
    }
}
