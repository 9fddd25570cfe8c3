//! Wire DTOs and the in-memory store behind the mock backend.
//!
//! These types are defined independently from `tuneshare-core`; the core's
//! integration tests catch any drift between the two.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub album_id: Option<i64>,
    pub duration_seconds: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub cover_url: Option<String>,
    pub songs: Vec<Song>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub author: User,
    pub content: Option<String>,
    pub song: Option<Song>,
    pub album: Option<Album>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub likes: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub songs: Vec<Song>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author: User,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_pages: u32,
    pub total_elements: u64,
    pub last: bool,
    pub size: u32,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRef {
    pub song_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Slice `items` the way the real backend pages collections.
pub fn paginate<T>(items: Vec<T>, page: Option<u32>, size: Option<u32>) -> Page<T> {
    let page = page.unwrap_or(0);
    let size = size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE);
    let total_elements = items.len() as u64;
    let total_pages = total_elements.div_ceil(u64::from(size)) as u32;
    let content = items
        .into_iter()
        .skip((page as usize) * (size as usize))
        .take(size as usize)
        .collect();
    Page {
        content,
        total_pages,
        total_elements,
        last: page + 1 >= total_pages,
        size,
    }
}

pub(crate) struct Account {
    pub user: User,
    pub email: String,
    pub password: String,
}

pub(crate) struct StoredPost {
    pub post: Post,
    pub liked_by: BTreeSet<i64>,
}

/// Everything the mock backend knows.
#[derive(Default)]
pub struct Store {
    pub(crate) accounts: BTreeMap<i64, Account>,
    pub(crate) tokens: HashMap<String, i64>,
    pub(crate) friends: HashMap<i64, BTreeSet<i64>>,
    pub(crate) posts: BTreeMap<i64, StoredPost>,
    pub(crate) playlists: BTreeMap<i64, Playlist>,
    pub(crate) comments: BTreeMap<i64, Comment>,
    pub(crate) songs: BTreeMap<i64, Song>,
    pub(crate) albums: BTreeMap<i64, Album>,
    next_id: i64,
}

impl Store {
    /// A store with a small song catalog and no users.
    pub fn seeded() -> Self {
        let mut store = Store {
            next_id: 100,
            ..Store::default()
        };
        let catalog = [
            (1, "Blue Train", "John Coltrane", vec![(1, "Blue Train", 643), (2, "Moment's Notice", 550)]),
            (2, "Kind of Blue", "Miles Davis", vec![(3, "So What", 562), (4, "Blue in Green", 337)]),
            (3, "Blue Lines", "Massive Attack", vec![(5, "Unfinished Sympathy", 308)]),
        ];
        for (album_id, title, artist, tracks) in catalog {
            let songs: Vec<Song> = tracks
                .into_iter()
                .map(|(id, song_title, seconds)| Song {
                    id,
                    title: song_title.to_string(),
                    artist: artist.to_string(),
                    album_id: Some(album_id),
                    duration_seconds: Some(seconds),
                })
                .collect();
            for song in &songs {
                store.songs.insert(song.id, song.clone());
            }
            store.albums.insert(
                album_id,
                Album {
                    id: album_id,
                    title: title.to_string(),
                    artist: artist.to_string(),
                    cover_url: None,
                    songs,
                },
            );
        }
        store
    }

    pub(crate) fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn user(&self, id: i64) -> Option<&User> {
        self.accounts.get(&id).map(|account| &account.user)
    }
}
