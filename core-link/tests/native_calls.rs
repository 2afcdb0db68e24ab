//! Exact native call sequences, checked with a mocked library.

use std::ffi::CStr;
use std::sync::Arc;

use bridge_traits::{
    AlbumKind, ArtistKind, Handle, ImageKind, LinkKind, NativeLibrary, PlaylistKind, RawHandle,
    ResourceKind, SessionKind, TrackKind, UserKind,
};
use core_link::{Link, LinkType, Session};
use core_runtime::config::SessionConfig;
use mockall::mock;
use mockall::predicate::*;

mock! {
    Library {}

    impl NativeLibrary for Library {
        fn link_create_from_string(&self, uri: &CStr) -> Option<Handle<LinkKind>>;
        fn link_create_from_track(&self, track: Handle<TrackKind>, offset_ms: i32) -> Option<Handle<LinkKind>>;
        fn link_create_from_album(&self, album: Handle<AlbumKind>) -> Option<Handle<LinkKind>>;
        fn link_create_from_artist(&self, artist: Handle<ArtistKind>) -> Option<Handle<LinkKind>>;
        fn link_create_from_user(&self, user: Handle<UserKind>) -> Option<Handle<LinkKind>>;
        fn link_create_from_playlist(&self, playlist: Handle<PlaylistKind>) -> Option<Handle<LinkKind>>;
        fn link_create_from_image(&self, image: Handle<ImageKind>) -> Option<Handle<LinkKind>>;
        fn link_as_string(&self, link: Handle<LinkKind>, buffer: &mut [u8]) -> usize;
        fn link_type(&self, link: Handle<LinkKind>) -> i32;
        fn link_as_track(&self, link: Handle<LinkKind>) -> Option<Handle<TrackKind>>;
        fn link_as_track_and_offset(&self, link: Handle<LinkKind>, offset_ms: &mut i32) -> Option<Handle<TrackKind>>;
        fn link_as_album(&self, link: Handle<LinkKind>) -> Option<Handle<AlbumKind>>;
        fn link_as_artist(&self, link: Handle<LinkKind>) -> Option<Handle<ArtistKind>>;
        fn link_as_user(&self, link: Handle<LinkKind>) -> Option<Handle<UserKind>>;
        fn playlist_create(&self, session: Handle<SessionKind>, link: Handle<LinkKind>) -> Option<Handle<PlaylistKind>>;
        fn image_create_from_link(&self, session: Handle<SessionKind>, link: Handle<LinkKind>) -> Option<Handle<ImageKind>>;
        fn add_ref(&self, handle: RawHandle, kind: ResourceKind);
        fn release(&self, handle: RawHandle, kind: ResourceKind);
    }
}

const SESSION: usize = 0x100;
const LINK: usize = 0x200;

fn link_handle() -> Handle<LinkKind> {
    Handle::from_addr(LINK).unwrap()
}

fn session_handle() -> Handle<SessionKind> {
    Handle::from_addr(SESSION).unwrap()
}

fn session_with(mut library: MockLibrary) -> Arc<Session> {
    library
        .expect_link_create_from_string()
        .times(1)
        .returning(|_| Some(link_handle()));
    library
        .expect_release()
        .with(eq(link_handle().raw()), eq(ResourceKind::Link))
        .times(1)
        .return_const(());

    let config = SessionConfig::builder()
        .library(Arc::new(library))
        .session_handle(session_handle())
        .build()
        .unwrap();
    Session::new(config).unwrap()
}

#[test]
fn test_as_playlist_skips_constructor_on_mismatch() {
    let mut library = MockLibrary::new();
    library
        .expect_link_type()
        .returning(|_| LinkType::Track.to_raw());
    library.expect_playlist_create().never();

    let session = session_with(library);
    let link = Link::new_in(&session, "spotify:track:abc").unwrap();
    assert!(link.as_playlist().is_none());
}

#[test]
fn test_as_image_skips_constructor_on_mismatch() {
    let mut library = MockLibrary::new();
    library
        .expect_link_type()
        .returning(|_| LinkType::Album.to_raw());
    library.expect_image_create_from_link().never();

    let session = session_with(library);
    let link = Link::new_in(&session, "spotify:album:abc").unwrap();
    assert!(link.as_image().is_none());
}

#[test]
fn test_as_playlist_null_is_none() {
    let mut library = MockLibrary::new();
    library
        .expect_link_type()
        .returning(|_| LinkType::Playlist.to_raw());
    library
        .expect_playlist_create()
        .with(eq(session_handle()), eq(link_handle()))
        .times(1)
        .returning(|_, _| None);

    let session = session_with(library);
    let link = Link::new_in(&session, "spotify:user:a:playlist:p").unwrap();
    assert!(link.as_playlist().is_none());
}

#[test]
fn test_as_image_adopts_reference() {
    let image: Handle<ImageKind> = Handle::from_addr(0x300).unwrap();

    let mut library = MockLibrary::new();
    library
        .expect_link_type()
        .returning(|_| LinkType::Image.to_raw());
    library
        .expect_image_create_from_link()
        .times(1)
        .returning(move |_, _| Some(image));
    library.expect_add_ref().never();
    library
        .expect_release()
        .with(eq(image.raw()), eq(ResourceKind::Image))
        .times(1)
        .return_const(());

    let session = session_with(library);
    let link = Link::new_in(&session, "spotify:image:abc").unwrap();
    let resolved = link.as_image().unwrap();
    assert_eq!(resolved.handle(), image);
}

#[test]
fn test_downcast_adds_reference() {
    let track: Handle<TrackKind> = Handle::from_addr(0x400).unwrap();

    let mut library = MockLibrary::new();
    library
        .expect_link_as_track()
        .with(eq(link_handle()))
        .times(1)
        .returning(move |_| Some(track));
    library
        .expect_add_ref()
        .with(eq(track.raw()), eq(ResourceKind::Track))
        .times(1)
        .return_const(());
    library
        .expect_release()
        .with(eq(track.raw()), eq(ResourceKind::Track))
        .times(1)
        .return_const(());

    let session = session_with(library);
    let link = Link::new_in(&session, "spotify:track:abc").unwrap();
    assert!(link.as_track().is_some());
}

#[test]
fn test_downcasts_do_not_precheck_type() {
    let mut library = MockLibrary::new();
    library.expect_link_type().never();
    library.expect_link_as_album().times(1).returning(|_| None);
    library.expect_link_as_artist().times(1).returning(|_| None);
    library.expect_link_as_user().times(1).returning(|_| None);
    library.expect_link_as_track().times(1).returning(|_| None);
    library.expect_add_ref().never();

    let session = session_with(library);
    let link = Link::new_in(&session, "spotify:search:abc").unwrap();
    assert!(link.as_album().is_none());
    assert!(link.as_artist().is_none());
    assert!(link.as_user().is_none());
    assert!(link.as_track().is_none());
}

#[test]
fn test_unknown_link_type_is_preserved() {
    let mut library = MockLibrary::new();
    library.expect_link_type().returning(|_| 42);
    library.expect_playlist_create().never();
    library.expect_image_create_from_link().never();

    let session = session_with(library);
    let link = Link::new_in(&session, "spotify:future:abc").unwrap();
    assert_eq!(link.link_type(), LinkType::Unknown(42));
    assert!(link.as_playlist().is_none());
    assert!(link.as_image().is_none());
}

#[test]
fn test_track_offset_output_slot() {
    let mut library = MockLibrary::new();
    library
        .expect_link_as_track_and_offset()
        .times(1)
        .returning(|_, offset| {
            *offset = 30_000;
            Some(Handle::from_addr(0x400).unwrap())
        });
    library.expect_add_ref().never();

    let session = session_with(library);
    let link = Link::new_in(&session, "spotify:track:abc#0:30").unwrap();
    assert_eq!(link.as_track_offset(), Some(30_000));
}

#[test]
fn test_uri_is_read_with_growing_buffer() {
    const URI: &str = "spotify:track:2Foc5Q5nqNiosCNqttzHof";

    let mut library = MockLibrary::new();
    library
        .expect_link_create_from_string()
        .times(1)
        .returning(|_| Some(link_handle()));
    library
        .expect_link_as_string()
        .times(2)
        .returning(|_, buffer| {
            let bytes = URI.as_bytes();
            let written = bytes.len().min(buffer.len() - 1);
            buffer[..written].copy_from_slice(&bytes[..written]);
            buffer[written] = 0;
            bytes.len()
        });
    library.expect_release().times(1).return_const(());

    let config = SessionConfig::builder()
        .library(Arc::new(library))
        .session_handle(session_handle())
        .uri_buffer_hint(16)
        .build()
        .unwrap();
    let session = Session::new(config).unwrap();

    let link = Link::new_in(&session, URI).unwrap();
    assert_eq!(link.uri(), URI);
}

#[test]
fn test_rejected_uri_creates_nothing() {
    let mut library = MockLibrary::new();
    library
        .expect_link_create_from_string()
        .times(1)
        .returning(|_| None);
    library.expect_release().never();

    let config = SessionConfig::builder()
        .library(Arc::new(library))
        .session_handle(session_handle())
        .build()
        .unwrap();
    let session = Session::new(config).unwrap();

    let err = Link::new_in(&session, "spotify:bogus").unwrap_err();
    assert_eq!(err.to_string(), "Failed to get link from URI: \"spotify:bogus\"");
}
