//! Playlists and the playlist identity cache.
//!
//! Resolving two links to the same native playlist yields the same
//! [`Playlist`] value for as long as one of them is alive. The cache maps
//! native addresses to weak references and lives on the [`Session`]. Entries
//! whose playlist has been dropped are removed on drop, or replaced on the
//! next lookup.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use bridge_traits::{Handle, HandleKind, PlaylistKind, RawHandle};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::handle::OwnedHandle;
use crate::link::Link;
use crate::lock;
use crate::session::Session;

/// A native playlist.
///
/// Clones share one native reference.
#[derive(Clone)]
pub struct Playlist {
    inner: Arc<PlaylistInner>,
}

struct PlaylistInner {
    handle: OwnedHandle<PlaylistKind>,
}

impl Playlist {
    /// Wrap a native playlist, reusing the live wrapper for the same handle.
    ///
    /// `add_ref` has the usual meaning. On a cache hit an adopted reference
    /// (`add_ref = false`) is surplus and is released immediately.
    pub fn from_handle(session: &Arc<Session>, handle: Handle<PlaylistKind>, add_ref: bool) -> Self {
        lock::serialized(|| session.playlists().get_or_insert(session, handle, add_ref))
    }

    fn wrap(session: &Arc<Session>, handle: Handle<PlaylistKind>, add_ref: bool) -> Self {
        Self {
            inner: Arc::new(PlaylistInner {
                handle: OwnedHandle::new(session.clone(), handle, add_ref),
            }),
        }
    }

    pub fn handle(&self) -> Handle<PlaylistKind> {
        self.inner.handle.handle()
    }

    pub fn session(&self) -> &Arc<Session> {
        self.inner.handle.session()
    }

    /// A link to this playlist.
    pub fn link(&self) -> Option<Link> {
        let session = self.session();
        session.call(|library| {
            let link = library.link_create_from_playlist(self.handle())?;
            Some(Link::from_handle(session, link, false))
        })
    }

    /// True when both values are the same cached wrapper.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.handle() == other.handle()
    }
}

impl Eq for Playlist {}

impl Hash for Playlist {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle().hash(state);
    }
}

impl fmt::Debug for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Playlist").field(&self.handle()).finish()
    }
}

impl Drop for PlaylistInner {
    fn drop(&mut self) {
        let session = self.handle.session();
        let raw = self.handle.handle().raw();
        lock::serialized(|| session.playlists().forget_if_dead(raw));
    }
}

/// Native playlist address to live wrapper.
///
/// Only touched while the native lock is held.
#[derive(Default)]
pub(crate) struct PlaylistCache {
    entries: Mutex<HashMap<RawHandle, Weak<PlaylistInner>>>,
}

impl PlaylistCache {
    fn get_or_insert(
        &self,
        session: &Arc<Session>,
        handle: Handle<PlaylistKind>,
        add_ref: bool,
    ) -> Playlist {
        let raw = handle.raw();
        let cached = self.entries.lock().get(&raw).and_then(Weak::upgrade);

        if let Some(inner) = cached {
            trace!(handle = %raw, "Playlist cache hit");
            if !add_ref {
                session.call(|library| library.release(raw, PlaylistKind::KIND));
            }
            return Playlist { inner };
        }

        let playlist = Playlist::wrap(session, handle, add_ref);
        self.entries
            .lock()
            .insert(raw, Arc::downgrade(&playlist.inner));
        debug!(handle = %raw, "Cached new playlist");
        playlist
    }

    fn forget_if_dead(&self, raw: RawHandle) {
        let mut entries = self.entries.lock();
        if entries
            .get(&raw)
            .is_some_and(|entry| entry.strong_count() == 0)
        {
            entries.remove(&raw);
            trace!(handle = %raw, "Evicted playlist from cache");
        }
    }

    pub(crate) fn live_entries(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::testing::FakeLibrary;
    use core_runtime::config::SessionConfig;

    fn setup() -> (Arc<FakeLibrary>, Arc<Session>) {
        let library = Arc::new(FakeLibrary::new());
        let config = SessionConfig::builder()
            .library(library.clone())
            .session_handle(library.session_handle())
            .build()
            .unwrap();
        (library, Session::new(config).unwrap())
    }

    const URI: &str = "spotify:user:alice:playlist:p1";

    #[test]
    fn test_same_playlist_same_wrapper() {
        let (library, session) = setup();
        let first = Link::new_in(&session, URI).unwrap().as_playlist().unwrap();
        let second = Link::new_in(&session, URI).unwrap().as_playlist().unwrap();

        assert!(first.ptr_eq(&second));
        assert_eq!(library.references(first.handle().raw()), Some(1));
        assert_eq!(session.cached_playlists(), 1);

        drop(first);
        drop(second);
        assert!(library.is_balanced());
        assert_eq!(session.cached_playlists(), 0);
    }

    #[test]
    fn test_dropped_playlist_is_recreated() {
        let (library, session) = setup();
        let link = Link::new_in(&session, URI).unwrap();

        let first = link.as_playlist().unwrap();
        let handle = first.handle();
        drop(first);
        assert_eq!(library.references(handle.raw()), Some(0));

        let second = link.as_playlist().unwrap();
        assert_eq!(second.handle(), handle);
        assert_eq!(library.references(handle.raw()), Some(1));
    }

    #[test]
    fn test_borrowed_handle_hit_keeps_count() {
        let (library, session) = setup();
        let playlist = Link::new_in(&session, URI).unwrap().as_playlist().unwrap();

        let again = Playlist::from_handle(&session, playlist.handle(), true);
        assert!(again.ptr_eq(&playlist));
        assert_eq!(library.references(playlist.handle().raw()), Some(1));
    }

    #[test]
    fn test_adopted_handle_hit_releases_surplus() {
        let (library, session) = setup();
        let link = Link::new_in(&session, URI).unwrap();
        let playlist = link.as_playlist().unwrap();
        let raw = playlist.handle().raw();

        let transferred: Vec<Playlist> = (0..4)
            .map(|_| {
                let handle = session
                    .call(|native| native.playlist_create(session.handle(), link.handle()))
                    .unwrap();
                Playlist::from_handle(&session, handle, false)
            })
            .collect();

        assert!(transferred.iter().all(|p| p.ptr_eq(&playlist)));
        assert_eq!(library.references(raw), Some(1));
        assert_eq!(session.cached_playlists(), 1);

        drop(transferred);
        drop(playlist);
        assert_eq!(library.references(raw), Some(0));
        assert_eq!(session.cached_playlists(), 0);
    }

    #[test]
    fn test_playlist_link() {
        let (library, session) = setup();
        let playlist = Link::new_in(&session, URI).unwrap().as_playlist().unwrap();

        assert_eq!(playlist.link().unwrap().uri(), URI);
        drop(playlist);
        assert!(library.is_balanced());
    }
}
