//! Link type tags reported by the native library.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a link points at.
///
/// The native library reports the type as a raw integer. Values this crate
/// does not know about map to [`LinkType::Unknown`] instead of failing, so a
/// newer native library never breaks type inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    Invalid,
    Track,
    Album,
    Artist,
    Search,
    Playlist,
    Profile,
    Starred,
    LocalTrack,
    Image,
    Rootlist,
    /// A tag outside the known range, carrying the raw value.
    Unknown(i32),
}

impl LinkType {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => LinkType::Invalid,
            1 => LinkType::Track,
            2 => LinkType::Album,
            3 => LinkType::Artist,
            4 => LinkType::Search,
            5 => LinkType::Playlist,
            6 => LinkType::Profile,
            7 => LinkType::Starred,
            8 => LinkType::LocalTrack,
            9 => LinkType::Image,
            10 => LinkType::Rootlist,
            other => LinkType::Unknown(other),
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            LinkType::Invalid => 0,
            LinkType::Track => 1,
            LinkType::Album => 2,
            LinkType::Artist => 3,
            LinkType::Search => 4,
            LinkType::Playlist => 5,
            LinkType::Profile => 6,
            LinkType::Starred => 7,
            LinkType::LocalTrack => 8,
            LinkType::Image => 9,
            LinkType::Rootlist => 10,
            LinkType::Unknown(raw) => raw,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Invalid => "invalid",
            LinkType::Track => "track",
            LinkType::Album => "album",
            LinkType::Artist => "artist",
            LinkType::Search => "search",
            LinkType::Playlist => "playlist",
            LinkType::Profile => "profile",
            LinkType::Starred => "starred",
            LinkType::LocalTrack => "localtrack",
            LinkType::Image => "image",
            LinkType::Rootlist => "rootlist",
            LinkType::Unknown(_) => "unknown",
        }
    }
}

impl From<i32> for LinkType {
    fn from(raw: i32) -> Self {
        LinkType::from_raw(raw)
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkType::Unknown(raw) => write!(f, "unknown({})", raw),
            other => f.write_str(other.as_str()),
        }
    }
}
