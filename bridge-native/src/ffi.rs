//! Raw libspotify declarations used by [`crate::LibSpotify`].

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_int};
use std::marker::{PhantomData, PhantomPinned};

macro_rules! opaque {
    ($($name:ident),* $(,)?) => {
        $(
            #[repr(C)]
            pub struct $name {
                _data: [u8; 0],
                _marker: PhantomData<(*mut u8, PhantomPinned)>,
            }
        )*
    };
}

opaque!(sp_session, sp_link, sp_track, sp_album, sp_artist, sp_user, sp_playlist, sp_image);

/// `sp_error`; zero is `SP_ERROR_OK`.
pub type sp_error = c_int;

/// `sp_linktype`
pub type sp_linktype = c_int;

pub const SP_ERROR_OK: sp_error = 0;

#[link(name = "spotify")]
extern "C" {
    pub fn sp_link_create_from_string(link: *const c_char) -> *mut sp_link;
    pub fn sp_link_create_from_track(track: *mut sp_track, offset: c_int) -> *mut sp_link;
    pub fn sp_link_create_from_album(album: *mut sp_album) -> *mut sp_link;
    pub fn sp_link_create_from_artist(artist: *mut sp_artist) -> *mut sp_link;
    pub fn sp_link_create_from_user(user: *mut sp_user) -> *mut sp_link;
    pub fn sp_link_create_from_playlist(playlist: *mut sp_playlist) -> *mut sp_link;
    pub fn sp_link_create_from_image(image: *mut sp_image) -> *mut sp_link;

    pub fn sp_link_as_string(link: *mut sp_link, buffer: *mut c_char, buffer_size: c_int)
        -> c_int;
    pub fn sp_link_type(link: *mut sp_link) -> sp_linktype;

    pub fn sp_link_as_track(link: *mut sp_link) -> *mut sp_track;
    pub fn sp_link_as_track_and_offset(link: *mut sp_link, offset: *mut c_int) -> *mut sp_track;
    pub fn sp_link_as_album(link: *mut sp_link) -> *mut sp_album;
    pub fn sp_link_as_artist(link: *mut sp_link) -> *mut sp_artist;
    pub fn sp_link_as_user(link: *mut sp_link) -> *mut sp_user;

    pub fn sp_playlist_create(session: *mut sp_session, link: *mut sp_link) -> *mut sp_playlist;
    pub fn sp_image_create_from_link(session: *mut sp_session, link: *mut sp_link)
        -> *mut sp_image;

    pub fn sp_link_add_ref(link: *mut sp_link) -> sp_error;
    pub fn sp_link_release(link: *mut sp_link) -> sp_error;
    pub fn sp_track_add_ref(track: *mut sp_track) -> sp_error;
    pub fn sp_track_release(track: *mut sp_track) -> sp_error;
    pub fn sp_album_add_ref(album: *mut sp_album) -> sp_error;
    pub fn sp_album_release(album: *mut sp_album) -> sp_error;
    pub fn sp_artist_add_ref(artist: *mut sp_artist) -> sp_error;
    pub fn sp_artist_release(artist: *mut sp_artist) -> sp_error;
    pub fn sp_user_add_ref(user: *mut sp_user) -> sp_error;
    pub fn sp_user_release(user: *mut sp_user) -> sp_error;
    pub fn sp_playlist_add_ref(playlist: *mut sp_playlist) -> sp_error;
    pub fn sp_playlist_release(playlist: *mut sp_playlist) -> sp_error;
    pub fn sp_image_add_ref(image: *mut sp_image) -> sp_error;
    pub fn sp_image_release(image: *mut sp_image) -> sp_error;
}
