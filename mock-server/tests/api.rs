use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Echo, Page, Playlist, Post, Song, TokenResponse, User};
use tower::ServiceExt;

const BOUNDARY: &str = "XyZboundary";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn json_request(method: &str, uri: &str, token: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, bearer(token))
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str, token: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, bearer(token))
        .body(String::new())
        .unwrap()
}

/// Text fields, plus file fields when a filename is given.
fn multipart_request(
    method: &str,
    uri: &str,
    token: &str,
    fields: &[(&str, Option<&str>, &str)],
) -> Request<String> {
    let mut body = String::new();
    for (name, file_name, value) in fields {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )),
            None => body.push_str(&format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")),
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(http::header::AUTHORIZATION, bearer(token))
        .body(body)
        .unwrap()
}

async fn call(app: &Router, request: Request<String>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn sign_up(app: &Router, username: &str, email: &str) -> String {
    let resp = call(
        app,
        multipart_request(
            "POST",
            "/auth/signin",
            "",
            &[
                ("username", None, username),
                ("email", None, email),
                ("password", None, "secret"),
            ],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json::<TokenResponse>(resp).await.token
}

// --- auth ---

#[tokio::test]
async fn signin_then_login_issue_working_tokens() {
    let app = app();
    let first = sign_up(&app, "mia", "mia@example.com").await;

    let resp = call(
        &app,
        json_request(
            "POST",
            "/auth/login",
            "",
            r#"{"email":"mia@example.com","password":"secret"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let second = body_json::<TokenResponse>(resp).await.token;
    assert_ne!(first, second);

    for token in [first, second] {
        let resp = call(&app, empty_request("GET", "/user/me", &token)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let me: User = body_json(resp).await;
        assert_eq!(me.username, "mia");
    }
}

#[tokio::test]
async fn login_with_wrong_password_returns_401() {
    let app = app();
    sign_up(&app, "mia", "mia@example.com").await;
    let resp = call(
        &app,
        json_request(
            "POST",
            "/auth/login",
            "",
            r#"{"email":"mia@example.com","password":"nope"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_returns_409() {
    let app = app();
    sign_up(&app, "mia", "mia@example.com").await;
    let resp = call(
        &app,
        multipart_request(
            "POST",
            "/auth/signin",
            "",
            &[
                ("username", None, "other"),
                ("email", None, "mia@example.com"),
                ("password", None, "x"),
            ],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn empty_bearer_is_rejected() {
    let app = app();
    let resp = call(&app, empty_request("GET", "/user/me", "")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- users ---

#[tokio::test]
async fn friends_see_each_others_posts() {
    let app = app();
    let mia = sign_up(&app, "mia", "mia@example.com").await;
    let leo = sign_up(&app, "leo", "leo@example.com").await;

    let leo_id = body_json::<User>(call(&app, empty_request("GET", "/user/me", &leo)).await)
        .await
        .id;

    let resp = call(
        &app,
        multipart_request("POST", "/post", &leo, &[("content", None, "listening to So What"), ("songId", None, "3")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let feed: Page<Post> = body_json(call(&app, empty_request("GET", "/post", &mia)).await).await;
    assert!(feed.content.is_empty());

    let resp = call(
        &app,
        json_request("POST", &format!("/user/friends/add/{leo_id}"), &mia, "{}"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let feed: Page<Post> = body_json(call(&app, empty_request("GET", "/post?page=0&size=10", &mia)).await).await;
    assert_eq!(feed.total_elements, 1);
    assert_eq!(feed.content[0].song.as_ref().unwrap().title, "So What");

    let friends: Page<User> = body_json(call(&app, empty_request("GET", "/user/friends", &mia)).await).await;
    assert_eq!(friends.content[0].username, "leo");

    let resp = call(
        &app,
        empty_request("DELETE", &format!("/user/friends/remove/{leo_id}"), &mia),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let friends: Page<User> = body_json(call(&app, empty_request("GET", "/user/friends", &mia)).await).await;
    assert!(friends.content.is_empty());
}

#[tokio::test]
async fn unknown_user_returns_404() {
    let app = app();
    let token = sign_up(&app, "mia", "mia@example.com").await;
    let resp = call(&app, empty_request("GET", "/user/999999", &token)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_update_stores_picture_url() {
    let app = app();
    let token = sign_up(&app, "mia", "mia@example.com").await;
    let resp = call(
        &app,
        multipart_request(
            "PATCH",
            "/user/me",
            &token,
            &[("bio", None, "jazz mostly"), ("profilePicture", Some("me.jpg"), "JPEGDATA")],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me: User = body_json(resp).await;
    assert_eq!(me.bio.as_deref(), Some("jazz mostly"));
    assert!(me.profile_picture.unwrap().ends_with("/me.jpg"));
}

// --- playlists ---

#[tokio::test]
async fn playlist_lifecycle() {
    let app = app();
    let token = sign_up(&app, "mia", "mia@example.com").await;

    let resp = call(
        &app,
        multipart_request(
            "POST",
            "/playlist",
            &token,
            &[("name", None, "Late night"), ("cover", Some("cover.jpg"), "PNG")],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let playlist: Playlist = body_json(resp).await;
    assert!(playlist.cover_url.is_some());
    let id = playlist.id;

    let resp = call(
        &app,
        json_request("PUT", &format!("/playlist/{id}/songs"), &token, r#"{"songId":4}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let playlist: Playlist = body_json(resp).await;
    assert_eq!(playlist.songs.len(), 1);

    let resp = call(&app, empty_request("DELETE", &format!("/playlist/{id}/songs/4"), &token)).await;
    let playlist: Playlist = body_json(resp).await;
    assert!(playlist.songs.is_empty());

    let resp = call(&app, empty_request("DELETE", &format!("/playlist/{id}"), &token)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = call(&app, empty_request("GET", &format!("/playlist/{id}"), &token)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn playlist_without_name_returns_400() {
    let app = app();
    let token = sign_up(&app, "mia", "mia@example.com").await;
    let resp = call(
        &app,
        multipart_request("POST", "/playlist", &token, &[("description", None, "no name")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_owner_may_edit_a_playlist() {
    let app = app();
    let mia = sign_up(&app, "mia", "mia@example.com").await;
    let leo = sign_up(&app, "leo", "leo@example.com").await;
    let resp = call(&app, multipart_request("POST", "/playlist", &mia, &[("name", None, "Mine")])).await;
    let playlist: Playlist = body_json(resp).await;

    let resp = call(
        &app,
        multipart_request("PATCH", &format!("/playlist/{}", playlist.id), &leo, &[("name", None, "Ours")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- catalog ---

#[tokio::test]
async fn song_search_is_case_insensitive() {
    let app = app();
    let token = sign_up(&app, "mia", "mia@example.com").await;
    let resp = call(&app, empty_request("GET", "/songs/search?query=BLUE&size=10", &token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page<Song> = body_json(resp).await;
    let titles: Vec<_> = page.content.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["Blue Train", "Blue in Green"]);
}

// --- comments ---

#[tokio::test]
async fn comment_on_missing_post_returns_404() {
    let app = app();
    let token = sign_up(&app, "mia", "mia@example.com").await;
    let resp = call(
        &app,
        json_request("POST", "/comments/post/424242", &token, r#"{"content":"hi"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- echo ---

#[tokio::test]
async fn echo_reports_headers_and_parts() {
    let app = app();
    let resp = call(
        &app,
        multipart_request(
            "PATCH",
            "/debug/echo",
            "abc",
            &[("name", None, "a"), ("photo", Some("y.jpg"), "bytes")],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PATCH");
    assert!(echo
        .headers
        .iter()
        .any(|(k, v)| k == "authorization" && v == "Bearer abc"));
    assert_eq!(echo.parts.len(), 2);
    assert_eq!(echo.parts[0].text.as_deref(), Some("a"));
    assert_eq!(echo.parts[1].file_name.as_deref(), Some("y.jpg"));
    assert_eq!(echo.parts[1].content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(echo.parts[1].size, 5);
}

#[tokio::test]
async fn echo_returns_json_bodies_verbatim() {
    let app = app();
    let resp = call(&app, json_request("PUT", "/debug/echo", "", r#"{"a":1}"#)).await;
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.body.as_deref(), Some(r#"{"a":1}"#));
    assert!(echo.parts.is_empty());
}
