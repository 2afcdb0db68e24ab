//! Link resolution demonstration
//!
//! Resolves a handful of URIs against the in-memory library double and
//! prints what each one turns into, with trace logging of every reference
//! count change.
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run -p core-link --example resolve_links
//!
//! # JSON format, custom URIs
//! cargo run -p core-link --example resolve_links -- json spotify:track:abc spotify:user:bob
//! ```

use std::env;
use std::sync::Arc;

use bridge_traits::log::LogLevel;
use bridge_traits::testing::FakeLibrary;
use core_link::{session, Link};
use core_runtime::config::SessionConfig;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use tracing::info;

const DEFAULT_URIS: &[&str] = &[
    "spotify:track:2Foc5Q5nqNiosCNqttzHof#0:30",
    "https://open.spotify.com/album/6UjZgFbK6CQptu8aOobzPV",
    "spotify:artist:0gxyHStUsqpMadRV0Di1Qt",
    "spotify:user:alice",
    "spotify:user:alice:playlist:3cEYpjA9oz9GiPac4AsH4n",
    "spotify:image:ab67616d0000b273",
    "spotify:search:daft+punk",
    "not-a-uri",
];

fn main() {
    let mut args = env::args().skip(1).peekable();

    let format = match args.peek().map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };
    if matches!(args.peek().map(String::as_str), Some("json" | "compact" | "pretty")) {
        args.next();
    }
    let uris: Vec<String> = args.collect();

    init_logging(
        LoggingConfig::default()
            .with_format(format)
            .with_level(LogLevel::Trace),
    )
    .expect("Failed to initialize logging");

    let library = Arc::new(FakeLibrary::new());
    let config = SessionConfig::builder()
        .library(library.clone())
        .session_handle(library.session_handle())
        .build()
        .expect("valid config");
    session::install(config).expect("first install");

    let uris: Vec<&str> = if uris.is_empty() {
        DEFAULT_URIS.to_vec()
    } else {
        uris.iter().map(String::as_str).collect()
    };

    for uri in uris {
        match Link::new(uri) {
            Ok(link) => describe(&link),
            Err(e) => info!(uri, error = %e, "Could not parse"),
        }
    }

    session::uninstall();
    info!(
        links_created = library.links_created(),
        balanced = library.is_balanced(),
        "=== Demo Complete ==="
    );
}

fn describe(link: &Link) {
    let link_type = link.link_type();
    info!(%link, %link_type, "Parsed link");

    if let Some(track) = link.as_track() {
        info!(?track, offset_ms = ?link.as_track_offset(), "Resolved track");
    }
    if let Some(album) = link.as_album() {
        info!(?album, "Resolved album");
    }
    if let Some(artist) = link.as_artist() {
        info!(?artist, "Resolved artist");
    }
    if let Some(user) = link.as_user() {
        info!(?user, "Resolved user");
    }
    if let Some(playlist) = link.as_playlist() {
        let back = playlist.link().map(|l| l.uri());
        info!(?playlist, link = ?back, "Resolved playlist");
    }
    if let Some(image) = link.as_image() {
        info!(?image, "Resolved image");
    }
}
