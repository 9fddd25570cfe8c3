//! In-memory stand-in for the tuneshare backend.
//!
//! Serves the endpoints the client core consumes, with bearer tokens issued
//! by `/auth/login` and `/auth/signin`, plus `/debug/echo` which reports back
//! the method, headers, and multipart parts it received.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, delete, get, patch, post, put},
    Json, Router,
};
use tokio::{net::TcpListener, sync::RwLock};

mod handlers;
pub mod model;
pub mod upload;

pub use model::{Album, Comment, Page, Playlist, Post, Song, Store, TokenResponse, User};
pub use upload::{Echo, ReceivedPart};

#[derive(Clone)]
pub struct AppState {
    pub(crate) store: Arc<RwLock<Store>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

pub fn app() -> Router {
    router(AppState::new(Store::seeded()))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/signin", post(handlers::signin))
        .route("/user/me", get(handlers::me).patch(handlers::update_me))
        .route("/user/friends", get(handlers::list_friends))
        .route("/user/friends/add/{id}", post(handlers::add_friend))
        .route("/user/friends/remove/{id}", delete(handlers::remove_friend))
        .route("/user/{id}", get(handlers::get_user))
        .route("/post", get(handlers::feed).post(handlers::create_post))
        .route("/post/user/{id}", get(handlers::posts_by_user))
        .route("/post/{id}", get(handlers::get_post).delete(handlers::delete_post))
        .route("/post/{id}/like", post(handlers::like_post))
        .route("/playlist", get(handlers::my_playlists).post(handlers::create_playlist))
        .route(
            "/playlist/{id}",
            get(handlers::get_playlist)
                .patch(handlers::update_playlist)
                .delete(handlers::delete_playlist),
        )
        .route("/playlist/{id}/songs", put(handlers::add_song))
        .route("/playlist/{id}/songs/{song_id}", delete(handlers::remove_song))
        .route("/songs/search", get(handlers::search_songs))
        .route("/songs/{id}", get(handlers::get_song))
        .route("/album/{id}", get(handlers::get_album))
        .route(
            "/comments/post/{id}",
            get(handlers::list_comments).post(handlers::add_comment),
        )
        .route(
            "/comments/{id}",
            patch(handlers::edit_comment).delete(handlers::delete_comment),
        )
        .route("/debug/echo", any(upload::echo))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Error response with a JSON `{"message": ...}` body.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    message: &'static str,
}

impl Failure {
    pub(crate) fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    pub(crate) fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub(crate) fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "not the owner")
    }

    pub(crate) fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "missing or unknown bearer token")
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "message": self.message }));
        (self.status, body).into_response()
    }
}

/// The user a bearer token was issued to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CurrentUser(pub i64);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
            .ok_or_else(Failure::unauthorized)?;
        let store = state.store.read().await;
        store
            .tokens
            .get(token)
            .copied()
            .map(CurrentUser)
            .ok_or_else(Failure::unauthorized)
    }
}
