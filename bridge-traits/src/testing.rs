//! In-memory [`NativeLibrary`] with reference-count instrumentation.
//!
//! `FakeLibrary` understands a small subset of the URI grammar
//! (`spotify:<type>:<id>`, `spotify:user:<name>:playlist:<id>`, open.spotify.com
//! web URLs, and `#M:SS` track offsets) and keeps an exact ledger of every
//! reference it hands out. Tests use the ledger to prove that wrappers
//! release exactly what they acquired.
//!
//! Ownership follows the native conventions documented on [`NativeLibrary`]:
//! links are created with one owned reference and freed when it drops to zero;
//! tracks, albums, artists, users, playlists and images are interned by the
//! library and only count references taken by callers.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::ffi::CStr;

use crate::handle::{
    AlbumKind, ArtistKind, Handle, HandleKind, ImageKind, LinkKind, PlaylistKind, RawHandle,
    ResourceKind, SessionKind, TrackKind, UserKind,
};
use crate::library::NativeLibrary;
use crate::link_type::LinkType;

const ADDR_BASE: usize = 0x1000;
const ADDR_STRIDE: usize = 0x10;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedUri {
    /// Canonical URI without the offset suffix.
    canonical: String,
    link_type: LinkType,
    offset_ms: Option<i32>,
}

impl ParsedUri {
    fn full(&self) -> String {
        match self.offset_ms {
            Some(ms) if ms > 0 => {
                let secs = ms / 1000;
                format!("{}#{}:{:02}", self.canonical, secs / 60, secs % 60)
            }
            _ => self.canonical.clone(),
        }
    }
}

#[derive(Debug)]
enum Payload {
    Session,
    Link(ParsedUri),
    Entity { uri: String },
}

#[derive(Debug)]
struct Object {
    kind: ResourceKind,
    refs: u64,
    payload: Payload,
}

#[derive(Debug, Default)]
struct Ledger {
    add_ref_calls: u64,
    release_calls: u64,
    over_releases: u64,
    stale_accesses: u64,
    links_created: u64,
}

#[derive(Debug)]
struct State {
    next_addr: usize,
    objects: HashMap<RawHandle, Object>,
    interned: HashMap<(ResourceKind, String), RawHandle>,
    session: RawHandle,
    ledger: Ledger,
}

impl State {
    fn allocate(&mut self, kind: ResourceKind, refs: u64, payload: Payload) -> RawHandle {
        let raw = RawHandle::new(self.next_addr).expect("fake addresses are never zero");
        self.next_addr += ADDR_STRIDE;
        self.objects.insert(raw, Object { kind, refs, payload });
        raw
    }

    fn intern(&mut self, kind: ResourceKind, uri: &str) -> RawHandle {
        if let Some(raw) = self.interned.get(&(kind, uri.to_string())) {
            return *raw;
        }
        let raw = self.allocate(
            kind,
            0,
            Payload::Entity {
                uri: uri.to_string(),
            },
        );
        self.interned.insert((kind, uri.to_string()), raw);
        raw
    }

    fn create_link(&mut self, parsed: ParsedUri) -> RawHandle {
        self.ledger.links_created += 1;
        self.allocate(ResourceKind::Link, 1, Payload::Link(parsed))
    }

    fn link(&mut self, link: Handle<LinkKind>) -> Option<ParsedUri> {
        match self.objects.get(&link.raw()) {
            Some(Object {
                kind: ResourceKind::Link,
                payload: Payload::Link(parsed),
                ..
            }) => Some(parsed.clone()),
            _ => {
                self.ledger.stale_accesses += 1;
                None
            }
        }
    }

    fn entity_uri<K: HandleKind>(&mut self, handle: Handle<K>) -> Option<String> {
        match self.objects.get(&handle.raw()) {
            Some(Object {
                kind,
                payload: Payload::Entity { uri },
                ..
            }) if *kind == K::KIND => Some(uri.clone()),
            _ => {
                self.ledger.stale_accesses += 1;
                None
            }
        }
    }

    fn downcast<K: HandleKind>(
        &mut self,
        link: Handle<LinkKind>,
        accepts: &[LinkType],
    ) -> Option<Handle<K>> {
        let parsed = self.link(link)?;
        if !accepts.contains(&parsed.link_type) {
            return None;
        }
        Some(Handle::from_raw(self.intern(K::KIND, &parsed.canonical)))
    }

    fn link_from_entity<K: HandleKind>(
        &mut self,
        handle: Handle<K>,
        offset_ms: i32,
    ) -> Option<Handle<LinkKind>> {
        let uri = self.entity_uri(handle)?;
        let mut parsed = parse_uri(&uri)?;
        if offset_ms > 0 {
            parsed.offset_ms = Some(offset_ms);
        }
        Some(Handle::from_raw(self.create_link(parsed)))
    }

    fn create_owned<K: HandleKind>(
        &mut self,
        session: Handle<SessionKind>,
        link: Handle<LinkKind>,
        expected: LinkType,
    ) -> Option<Handle<K>> {
        if session.raw() != self.session {
            self.ledger.stale_accesses += 1;
            return None;
        }
        let handle = self.downcast::<K>(link, &[expected])?;
        if let Some(object) = self.objects.get_mut(&handle.raw()) {
            object.refs += 1;
        }
        Some(handle)
    }
}

/// Reference-counting test double for the native library.
#[derive(Debug)]
pub struct FakeLibrary {
    state: Mutex<State>,
}

impl Default for FakeLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeLibrary {
    pub fn new() -> Self {
        let session = RawHandle::new(ADDR_BASE).expect("fake addresses are never zero");
        let mut objects = HashMap::new();
        objects.insert(
            session,
            Object {
                kind: ResourceKind::Session,
                refs: 0,
                payload: Payload::Session,
            },
        );
        let state = State {
            next_addr: ADDR_BASE + ADDR_STRIDE,
            objects,
            interned: HashMap::new(),
            session,
            ledger: Ledger::default(),
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Handle of the single session this library pretends to be logged into.
    pub fn session_handle(&self) -> Handle<SessionKind> {
        Handle::from_raw(self.state.lock().session)
    }

    /// References currently held by callers, summed over every live resource.
    pub fn outstanding_references(&self) -> u64 {
        self.state
            .lock()
            .objects
            .values()
            .filter(|object| object.kind != ResourceKind::Session)
            .map(|object| object.refs)
            .sum()
    }

    /// Reference count of one resource, or `None` if it has been freed.
    pub fn references(&self, handle: RawHandle) -> Option<u64> {
        self.state.lock().objects.get(&handle).map(|object| object.refs)
    }

    /// Number of links that have not been freed yet.
    pub fn live_links(&self) -> usize {
        self.state
            .lock()
            .objects
            .values()
            .filter(|object| object.kind == ResourceKind::Link)
            .count()
    }

    pub fn links_created(&self) -> u64 {
        self.state.lock().ledger.links_created
    }

    pub fn add_ref_calls(&self) -> u64 {
        self.state.lock().ledger.add_ref_calls
    }

    pub fn release_calls(&self) -> u64 {
        self.state.lock().ledger.release_calls
    }

    /// Releases that arrived for a resource whose count was already zero.
    pub fn over_releases(&self) -> u64 {
        self.state.lock().ledger.over_releases
    }

    /// Calls that named a freed or mistyped handle.
    pub fn stale_accesses(&self) -> u64 {
        self.state.lock().ledger.stale_accesses
    }

    /// True when nothing is leaked, over-released or used after free.
    pub fn is_balanced(&self) -> bool {
        let state = self.state.lock();
        let outstanding: u64 = state
            .objects
            .values()
            .filter(|object| object.kind != ResourceKind::Session)
            .map(|object| object.refs)
            .sum();
        outstanding == 0 && state.ledger.over_releases == 0 && state.ledger.stale_accesses == 0
    }
}

impl NativeLibrary for FakeLibrary {
    fn link_create_from_string(&self, uri: &CStr) -> Option<Handle<LinkKind>> {
        let parsed = parse_uri(uri.to_str().ok()?)?;
        Some(Handle::from_raw(self.state.lock().create_link(parsed)))
    }

    fn link_create_from_track(
        &self,
        track: Handle<TrackKind>,
        offset_ms: i32,
    ) -> Option<Handle<LinkKind>> {
        self.state.lock().link_from_entity(track, offset_ms)
    }

    fn link_create_from_album(&self, album: Handle<AlbumKind>) -> Option<Handle<LinkKind>> {
        self.state.lock().link_from_entity(album, 0)
    }

    fn link_create_from_artist(&self, artist: Handle<ArtistKind>) -> Option<Handle<LinkKind>> {
        self.state.lock().link_from_entity(artist, 0)
    }

    fn link_create_from_user(&self, user: Handle<UserKind>) -> Option<Handle<LinkKind>> {
        self.state.lock().link_from_entity(user, 0)
    }

    fn link_create_from_playlist(
        &self,
        playlist: Handle<PlaylistKind>,
    ) -> Option<Handle<LinkKind>> {
        self.state.lock().link_from_entity(playlist, 0)
    }

    fn link_create_from_image(&self, image: Handle<ImageKind>) -> Option<Handle<LinkKind>> {
        self.state.lock().link_from_entity(image, 0)
    }

    fn link_as_string(&self, link: Handle<LinkKind>, buffer: &mut [u8]) -> usize {
        let Some(parsed) = self.state.lock().link(link) else {
            return 0;
        };
        let uri = parsed.full();
        let bytes = uri.as_bytes();
        if let Some(room) = buffer.len().checked_sub(1) {
            let written = bytes.len().min(room);
            buffer[..written].copy_from_slice(&bytes[..written]);
            buffer[written] = 0;
        }
        bytes.len()
    }

    fn link_type(&self, link: Handle<LinkKind>) -> i32 {
        self.state
            .lock()
            .link(link)
            .map_or(LinkType::Invalid, |parsed| parsed.link_type)
            .to_raw()
    }

    fn link_as_track(&self, link: Handle<LinkKind>) -> Option<Handle<TrackKind>> {
        self.state
            .lock()
            .downcast(link, &[LinkType::Track, LinkType::LocalTrack])
    }

    fn link_as_track_and_offset(
        &self,
        link: Handle<LinkKind>,
        offset_ms: &mut i32,
    ) -> Option<Handle<TrackKind>> {
        let mut state = self.state.lock();
        let parsed = state.link(link)?;
        let track = state.downcast(link, &[LinkType::Track, LinkType::LocalTrack])?;
        *offset_ms = parsed.offset_ms.unwrap_or(0);
        Some(track)
    }

    fn link_as_album(&self, link: Handle<LinkKind>) -> Option<Handle<AlbumKind>> {
        self.state.lock().downcast(link, &[LinkType::Album])
    }

    fn link_as_artist(&self, link: Handle<LinkKind>) -> Option<Handle<ArtistKind>> {
        self.state.lock().downcast(link, &[LinkType::Artist])
    }

    fn link_as_user(&self, link: Handle<LinkKind>) -> Option<Handle<UserKind>> {
        self.state.lock().downcast(link, &[LinkType::Profile])
    }

    fn playlist_create(
        &self,
        session: Handle<SessionKind>,
        link: Handle<LinkKind>,
    ) -> Option<Handle<PlaylistKind>> {
        self.state
            .lock()
            .create_owned(session, link, LinkType::Playlist)
    }

    fn image_create_from_link(
        &self,
        session: Handle<SessionKind>,
        link: Handle<LinkKind>,
    ) -> Option<Handle<ImageKind>> {
        self.state.lock().create_owned(session, link, LinkType::Image)
    }

    fn add_ref(&self, handle: RawHandle, kind: ResourceKind) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match state.objects.get_mut(&handle) {
            Some(object) if object.kind == kind => {
                object.refs += 1;
                state.ledger.add_ref_calls += 1;
            }
            _ => state.ledger.stale_accesses += 1,
        }
    }

    fn release(&self, handle: RawHandle, kind: ResourceKind) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let freed = match state.objects.get_mut(&handle) {
            Some(object) if object.kind == kind => {
                if object.refs == 0 {
                    state.ledger.over_releases += 1;
                    return;
                }
                object.refs -= 1;
                state.ledger.release_calls += 1;
                kind == ResourceKind::Link && object.refs == 0
            }
            _ => {
                state.ledger.stale_accesses += 1;
                return;
            }
        };
        if freed {
            state.objects.remove(&handle);
        }
    }
}

fn parse_uri(input: &str) -> Option<ParsedUri> {
    let input = input.trim();
    let (body, offset) = match input.split_once('#') {
        Some((body, offset)) => (body, Some(parse_offset(offset)?)),
        None => (input, None),
    };

    let segments: Vec<&str> = if let Some(path) = body
        .strip_prefix("https://open.spotify.com/")
        .or_else(|| body.strip_prefix("http://open.spotify.com/"))
    {
        path.split('/').collect()
    } else {
        let (scheme, rest) = body.split_once(':')?;
        if !scheme.eq_ignore_ascii_case("spotify") {
            return None;
        }
        rest.split(':').collect()
    };

    let link_type = match segments.as_slice() {
        ["track", id] if is_id(id) => LinkType::Track,
        ["album", id] if is_id(id) => LinkType::Album,
        ["artist", id] if is_id(id) => LinkType::Artist,
        ["playlist", id] if is_id(id) => LinkType::Playlist,
        ["image", id] if is_id(id) => LinkType::Image,
        ["search", query] if !query.is_empty() => LinkType::Search,
        ["user", name] if is_id(name) => LinkType::Profile,
        ["user", name, "starred"] if is_id(name) => LinkType::Starred,
        ["user", name, "playlist", id] if is_id(name) && is_id(id) => LinkType::Playlist,
        ["local", rest @ ..] if !rest.is_empty() => LinkType::LocalTrack,
        _ => return None,
    };

    if offset.is_some() && link_type != LinkType::Track {
        return None;
    }

    Some(ParsedUri {
        canonical: format!("spotify:{}", segments.join(":")),
        link_type,
        offset_ms: offset,
    })
}

fn parse_offset(offset: &str) -> Option<i32> {
    let (minutes, seconds) = offset.split_once(':')?;
    let minutes: i32 = minutes.parse().ok()?;
    let seconds: i32 = seconds.parse().ok()?;
    if minutes < 0 || !(0..60).contains(&seconds) {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)?.checked_mul(1000)
}

fn is_id(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
