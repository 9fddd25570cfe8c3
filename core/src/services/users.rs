use crate::client::ApiClient;
use crate::error::ApiError;
use crate::services::{decode, empty_body, expect_success, paged};
use crate::types::{Page, PageRequest, ProfileUpdate, User};

pub async fn me(api: &ApiClient) -> Result<User, ApiError> {
    decode(api.get("/user/me").await?)
}

pub async fn get_user(api: &ApiClient, id: i64) -> Result<User, ApiError> {
    decode(api.get(&format!("/user/{id}")).await?)
}

pub async fn friends(api: &ApiClient, page: PageRequest) -> Result<Page<User>, ApiError> {
    decode(api.get(&paged("/user/friends", page)).await?)
}

pub async fn add_friend(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    expect_success(api.post(&format!("/user/friends/add/{id}"), &empty_body()).await?)
}

pub async fn remove_friend(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    expect_success(api.delete(&format!("/user/friends/remove/{id}")).await?)
}

/// Edit the signed-in profile; only the fields that are set are sent.
pub async fn update_profile(api: &ApiClient, update: &ProfileUpdate) -> Result<User, ApiError> {
    decode(api.patch_form("/user/me", &update.to_form()).await?)
}
