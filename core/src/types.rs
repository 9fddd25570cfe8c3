//! Domain DTOs for the tuneshare backend.
//!
//! Response types mirror the backend's camelCase JSON. Upload inputs know how
//! to turn themselves into a `FormPayload`; the form keys are the backend's
//! field names.

use serde::{Deserialize, Serialize};

use crate::form::{FileField, FormPayload};

/// The envelope every collection endpoint returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_pages: u32,
    pub total_elements: u64,
    pub last: bool,
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 20;

    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self
        }
    }

    /// `page=..&size=..`, ready to follow a `?` or `&`.
    pub fn query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("page", &self.page.to_string())
            .append_pair("size", &self.size.to_string())
            .finish()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album_id: Option<i64>,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub author: User,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub song: Option<Song>,
    #[serde(default)]
    pub album: Option<Album>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub likes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author: User,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
}

/// Sign-up input; sent as a form because of the optional picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub profile_picture: Option<FileField>,
}

impl Registration {
    pub fn to_form(&self) -> FormPayload {
        FormPayload::new()
            .text("username", &self.username)
            .text("email", &self.email)
            .text("password", &self.password)
            .optional_file("profilePicture", self.profile_picture.clone())
    }
}

/// Partial profile edit. `None` fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<FileField>,
}

impl ProfileUpdate {
    pub fn to_form(&self) -> FormPayload {
        FormPayload::new()
            .optional_text("username", self.username.as_ref())
            .optional_text("bio", self.bio.as_ref())
            .optional_file("profilePicture", self.profile_picture.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub content: Option<String>,
    pub song_id: Option<i64>,
    pub album_id: Option<i64>,
    pub image: Option<FileField>,
    pub audio: Option<FileField>,
}

impl NewPost {
    pub fn to_form(&self) -> FormPayload {
        FormPayload::new()
            .optional_text("content", self.content.as_ref())
            .optional_text("songId", self.song_id)
            .optional_text("albumId", self.album_id)
            .optional_file("image", self.image.clone())
            .optional_file("audio", self.audio.clone())
    }
}

/// Playlist fields for create (`name` required by the backend) and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cover: Option<FileField>,
}

impl PlaylistForm {
    pub fn to_form(&self) -> FormPayload {
        FormPayload::new()
            .optional_text("name", self.name.as_ref())
            .optional_text("description", self.description.as_ref())
            .optional_file("cover", self.cover.clone())
    }
}
