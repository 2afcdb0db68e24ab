//! Typed opaque handles.
//!
//! The native library hands out untyped pointers to reference-counted
//! resources. On this side of the bridge they are carried as non-null
//! addresses ([`RawHandle`]) tagged with a zero-sized kind marker, so a track
//! handle can never be passed where a link handle is expected. Nullable
//! native returns are expressed as `Option<Handle<K>>`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::num::NonZeroUsize;

/// Non-null address of a native resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawHandle(NonZeroUsize);

impl RawHandle {
    /// Wrap an address, returning `None` for null.
    pub fn new(addr: usize) -> Option<Self> {
        NonZeroUsize::new(addr).map(Self)
    }

    /// The address as an integer.
    pub fn addr(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0.get())
    }
}

/// The kinds of reference-counted resources the native library exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Session,
    Link,
    Track,
    Album,
    Artist,
    User,
    Playlist,
    Image,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Session => "session",
            ResourceKind::Link => "link",
            ResourceKind::Track => "track",
            ResourceKind::Album => "album",
            ResourceKind::Artist => "artist",
            ResourceKind::User => "user",
            ResourceKind::Playlist => "playlist",
            ResourceKind::Image => "image",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Marker trait implemented by the zero-sized kind tags below.
pub trait HandleKind: sealed::Sealed + 'static {
    const KIND: ResourceKind;
}

macro_rules! handle_kinds {
    ($($(#[$meta:meta])* $name:ident => $kind:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug)]
            pub enum $name {}

            impl sealed::Sealed for $name {}

            impl HandleKind for $name {
                const KIND: ResourceKind = ResourceKind::$kind;
            }
        )*
    };
}

handle_kinds! {
    /// An authenticated native session.
    SessionKind => Session;
    /// A parsed, resolvable URI.
    LinkKind => Link;
    TrackKind => Track;
    AlbumKind => Album;
    ArtistKind => Artist;
    UserKind => User;
    PlaylistKind => Playlist;
    ImageKind => Image;
}

/// A non-null native handle of kind `K`.
///
/// `Handle` is a plain value: copying it does not touch the native reference
/// count. Ownership of a reference is tracked one layer up.
pub struct Handle<K: HandleKind> {
    raw: RawHandle,
    _kind: PhantomData<fn() -> K>,
}

impl<K: HandleKind> Handle<K> {
    pub fn from_raw(raw: RawHandle) -> Self {
        Self {
            raw,
            _kind: PhantomData,
        }
    }

    /// Wrap an address, returning `None` for null.
    pub fn from_addr(addr: usize) -> Option<Self> {
        RawHandle::new(addr).map(Self::from_raw)
    }

    pub fn raw(self) -> RawHandle {
        self.raw
    }

    pub fn addr(self) -> usize {
        self.raw.addr()
    }

    pub fn kind(self) -> ResourceKind {
        K::KIND
    }
}

impl<K: HandleKind> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: HandleKind> Copy for Handle<K> {}

impl<K: HandleKind> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<K: HandleKind> Eq for Handle<K> {}

impl<K: HandleKind> Hash for Handle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<K: HandleKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle<{}>({})", K::KIND, self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_address_is_rejected() {
        assert!(RawHandle::new(0).is_none());
        assert!(Handle::<LinkKind>::from_addr(0).is_none());
    }

    #[test]
    fn test_handle_carries_kind() {
        let track = Handle::<TrackKind>::from_addr(0x1000).unwrap();
        assert_eq!(track.kind(), ResourceKind::Track);
        assert_eq!(track.addr(), 0x1000);
        assert_eq!(format!("{:?}", track), "Handle<track>(0x1000)");
    }

    #[test]
    fn test_handles_compare_by_address() {
        let a = Handle::<LinkKind>::from_addr(8).unwrap();
        let b = Handle::<LinkKind>::from_raw(RawHandle::new(8).unwrap());
        let c = Handle::<LinkKind>::from_addr(16).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
