//! Songs and albums.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::services::decode;
use crate::types::{Album, Page, PageRequest, Song};

pub async fn search_songs(api: &ApiClient, query: &str, page: PageRequest) -> Result<Page<Song>, ApiError> {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("query", query)
        .finish();
    decode(api.get(&format!("/songs/search?{query}&{}", page.query())).await?)
}

pub async fn get_song(api: &ApiClient, id: i64) -> Result<Song, ApiError> {
    decode(api.get(&format!("/songs/{id}")).await?)
}

pub async fn get_album(api: &ApiClient, id: i64) -> Result<Album, ApiError> {
    decode(api.get(&format!("/album/{id}")).await?)
}
