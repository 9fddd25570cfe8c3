use crate::client::ApiClient;
use crate::error::ApiError;
use crate::services::{decode, expect_success, paged};
use crate::types::{Comment, NewComment, Page, PageRequest};

pub async fn for_post(api: &ApiClient, post_id: i64, page: PageRequest) -> Result<Page<Comment>, ApiError> {
    decode(api.get(&paged(&format!("/comments/post/{post_id}"), page)).await?)
}

pub async fn add_comment(api: &ApiClient, post_id: i64, content: &str) -> Result<Comment, ApiError> {
    let body = NewComment {
        content: content.to_string(),
    };
    decode(api.post(&format!("/comments/post/{post_id}"), &body).await?)
}

pub async fn edit_comment(api: &ApiClient, id: i64, content: &str) -> Result<Comment, ApiError> {
    let body = NewComment {
        content: content.to_string(),
    };
    decode(api.patch(&format!("/comments/{id}"), &body).await?)
}

pub async fn delete_comment(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    expect_success(api.delete(&format!("/comments/{id}")).await?)
}
