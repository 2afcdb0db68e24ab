//! Reference-count balance across the public API, checked against the
//! instrumented library double.

use std::sync::Arc;
use std::thread;

use bridge_traits::testing::FakeLibrary;
use core_link::{Link, LinkType, Session};
use core_runtime::config::SessionConfig;

fn setup_with_hint(hint: usize) -> (Arc<FakeLibrary>, Arc<Session>) {
    let library = Arc::new(FakeLibrary::new());
    let config = SessionConfig::builder()
        .library(library.clone())
        .session_handle(library.session_handle())
        .uri_buffer_hint(hint)
        .build()
        .unwrap();
    (library, Session::new(config).unwrap())
}

fn setup() -> (Arc<FakeLibrary>, Arc<Session>) {
    setup_with_hint(64)
}

#[test]
fn test_ten_thousand_links_stay_balanced() {
    let (library, session) = setup();

    for _ in 0..10_000 {
        let link = Link::new_in(&session, "spotify:track:2Foc5Q5nqNiosCNqttzHof").unwrap();
        assert_eq!(link.link_type(), LinkType::Track);
    }

    assert_eq!(library.links_created(), 10_000);
    assert_eq!(library.release_calls(), 10_000);
    assert_eq!(library.live_links(), 0);
    assert!(library.is_balanced());
}

#[test]
fn test_resolved_objects_release_independently() {
    let (library, session) = setup();

    let links: Vec<Link> = (0..100)
        .map(|i| Link::new_in(&session, &format!("spotify:album:album{i}")).unwrap())
        .collect();
    let albums: Vec<_> = links.iter().map(|link| link.as_album().unwrap()).collect();

    assert_eq!(library.outstanding_references(), 200);
    drop(links);
    assert_eq!(library.outstanding_references(), 100);
    drop(albums);
    assert!(library.is_balanced());
}

#[test]
fn test_canonical_form_is_idempotent() {
    let (_library, session) = setup();

    for uri in [
        "spotify:track:2Foc5Q5nqNiosCNqttzHof",
        "https://open.spotify.com/album/6UjZgFbK6CQptu8aOobzPV",
        "spotify:user:alice:playlist:3cEYpjA9oz9GiPac4AsH4n",
        "spotify:track:2Foc5Q5nqNiosCNqttzHof#1:05",
    ] {
        let first = Link::new_in(&session, uri).unwrap().uri();
        let second = Link::new_in(&session, &first).unwrap().uri();
        assert_eq!(first, second, "canonical form of {uri} changed");
    }
}

#[test]
fn test_long_uri_grows_buffer() {
    let (library, session) = setup_with_hint(1);
    let uri = format!("spotify:search:{}", "q".repeat(500));

    let link = Link::new_in(&session, &uri).unwrap();
    assert_eq!(link.uri(), uri);
    assert_eq!(link.link_type(), LinkType::Search);

    drop(link);
    assert!(library.is_balanced());
}

#[test]
fn test_mismatched_downcasts_return_none() {
    let (library, session) = setup();

    let cases = [
        ("spotify:track:t1", LinkType::Track),
        ("spotify:album:a1", LinkType::Album),
        ("spotify:artist:r1", LinkType::Artist),
        ("spotify:user:u1", LinkType::Profile),
        ("spotify:user:u1:playlist:p1", LinkType::Playlist),
        ("spotify:image:i1", LinkType::Image),
        ("spotify:search:query", LinkType::Search),
    ];

    for (uri, link_type) in cases {
        let link = Link::new_in(&session, uri).unwrap();
        assert_eq!(link.link_type(), link_type);
        assert_eq!(link.as_track().is_some(), link_type == LinkType::Track);
        assert_eq!(link.as_album().is_some(), link_type == LinkType::Album);
        assert_eq!(link.as_artist().is_some(), link_type == LinkType::Artist);
        assert_eq!(link.as_user().is_some(), link_type == LinkType::Profile);
        assert_eq!(link.as_playlist().is_some(), link_type == LinkType::Playlist);
        assert_eq!(link.as_image().is_some(), link_type == LinkType::Image);
    }

    assert!(library.is_balanced());
}

#[test]
fn test_track_offset_from_uri() {
    let (_library, session) = setup();

    let link = Link::new_in(&session, "spotify:track:2Foc5Q5nqNiosCNqttzHof#0:30").unwrap();
    assert_eq!(link.as_track_offset(), Some(30_000));

    let plain = Link::new_in(&session, "spotify:track:2Foc5Q5nqNiosCNqttzHof").unwrap();
    assert_eq!(plain.as_track_offset(), None);
    assert!(plain.as_track().is_some());
}

#[test]
fn test_playlist_identity_is_balanced() {
    let (library, session) = setup();
    let uri = "spotify:user:alice:playlist:3cEYpjA9oz9GiPac4AsH4n";

    let first = Link::new_in(&session, uri).unwrap().as_playlist().unwrap();
    let second = Link::new_in(&session, uri).unwrap().as_playlist().unwrap();

    assert!(first.ptr_eq(&second));
    assert_eq!(library.references(first.handle().raw()), Some(1));

    drop(first);
    drop(second);
    assert!(library.is_balanced());
}

#[test]
fn test_playlist_link_round_trip() {
    let (library, session) = setup();
    let link = Link::new_in(&session, "spotify:user:alice:playlist:p1").unwrap();
    assert_eq!(link.link_type(), LinkType::Playlist);

    let playlist = link.as_playlist().unwrap();
    assert_eq!(playlist.link().unwrap(), link);

    drop(playlist);
    drop(link);
    assert!(library.is_balanced());
}

#[test]
fn test_concurrent_resolution_is_balanced() {
    let (library, session) = setup();

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let session = session.clone();
            thread::spawn(move || {
                for i in 0..250 {
                    let link = Link::new_in(&session, &format!("spotify:track:w{worker}t{i}")).unwrap();
                    let track = link.as_track().unwrap();
                    let back = track.link().unwrap();
                    assert_eq!(back, link);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(library.links_created(), 8 * 250 * 2);
    assert!(library.is_balanced());
}
