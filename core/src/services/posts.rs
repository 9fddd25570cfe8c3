use crate::client::ApiClient;
use crate::error::ApiError;
use crate::services::{decode, empty_body, expect_success, paged};
use crate::types::{NewPost, Page, PageRequest, Post};

/// Posts from the signed-in user and the people they follow.
pub async fn feed(api: &ApiClient, page: PageRequest) -> Result<Page<Post>, ApiError> {
    decode(api.get(&paged("/post", page)).await?)
}

pub async fn by_user(api: &ApiClient, user_id: i64, page: PageRequest) -> Result<Page<Post>, ApiError> {
    decode(api.get(&paged(&format!("/post/user/{user_id}"), page)).await?)
}

pub async fn get_post(api: &ApiClient, id: i64) -> Result<Post, ApiError> {
    decode(api.get(&format!("/post/{id}")).await?)
}

pub async fn create_post(api: &ApiClient, post: &NewPost) -> Result<Post, ApiError> {
    decode(api.post_form("/post", &post.to_form()).await?)
}

pub async fn like_post(api: &ApiClient, id: i64) -> Result<Post, ApiError> {
    decode(api.post(&format!("/post/{id}/like"), &empty_body()).await?)
}

pub async fn delete_post(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    expect_success(api.delete(&format!("/post/{id}")).await?)
}
