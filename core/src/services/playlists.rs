use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::services::{decode, expect_success, paged};
use crate::types::{Page, PageRequest, Playlist, PlaylistForm};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SongRef {
    song_id: i64,
}

pub async fn my_playlists(api: &ApiClient, page: PageRequest) -> Result<Page<Playlist>, ApiError> {
    decode(api.get(&paged("/playlist", page)).await?)
}

pub async fn get_playlist(api: &ApiClient, id: i64) -> Result<Playlist, ApiError> {
    decode(api.get(&format!("/playlist/{id}")).await?)
}

pub async fn create_playlist(api: &ApiClient, playlist: &PlaylistForm) -> Result<Playlist, ApiError> {
    decode(api.post_form("/playlist", &playlist.to_form()).await?)
}

pub async fn update_playlist(
    api: &ApiClient,
    id: i64,
    changes: &PlaylistForm,
) -> Result<Playlist, ApiError> {
    decode(api.patch_form(&format!("/playlist/{id}"), &changes.to_form()).await?)
}

pub async fn add_song(api: &ApiClient, playlist_id: i64, song_id: i64) -> Result<Playlist, ApiError> {
    decode(
        api.put(&format!("/playlist/{playlist_id}/songs"), &SongRef { song_id })
            .await?,
    )
}

pub async fn remove_song(api: &ApiClient, playlist_id: i64, song_id: i64) -> Result<Playlist, ApiError> {
    decode(
        api.delete(&format!("/playlist/{playlist_id}/songs/{song_id}"))
            .await?,
    )
}

pub async fn delete_playlist(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    expect_success(api.delete(&format!("/playlist/{id}")).await?)
}
