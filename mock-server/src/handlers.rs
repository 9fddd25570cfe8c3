use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::model::{
    paginate, Account, Album, Comment, CommentRequest, LoginRequest, Page, PageQuery, Playlist,
    Post, SearchQuery, Song, SongRef, Store, StoredPost, TokenResponse, User,
};
use crate::upload::{read_parts, stored_file_url, text_field};
use crate::{AppState, CurrentUser, Failure};

type Reply<T> = Result<Json<T>, Failure>;
type Created<T> = Result<(StatusCode, Json<T>), Failure>;

fn issue_token(store: &mut Store, user_id: i64) -> String {
    let token = Uuid::new_v4().to_string();
    store.tokens.insert(token.clone(), user_id);
    token
}

fn parse_id(raw: Option<&str>) -> Result<Option<i64>, Failure> {
    raw.map(|v| v.parse().map_err(|_| Failure::bad_request("ids must be integers")))
        .transpose()
}

// --- auth ---

pub(crate) async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Reply<TokenResponse> {
    let mut store = state.store.write().await;
    let user_id = store
        .accounts
        .values()
        .find(|a| a.email == input.email && a.password == input.password)
        .map(|a| a.user.id)
        .ok_or(Failure::new(StatusCode::UNAUTHORIZED, "invalid credentials"))?;
    let token = issue_token(&mut store, user_id);
    Ok(Json(TokenResponse { token }))
}

pub(crate) async fn signin(State(state): State<AppState>, multipart: Multipart) -> Created<TokenResponse> {
    let parts = read_parts(multipart).await?;
    let (Some(username), Some(email), Some(password)) = (
        text_field(&parts, "username"),
        text_field(&parts, "email"),
        text_field(&parts, "password"),
    ) else {
        return Err(Failure::bad_request("username, email and password are required"));
    };

    let mut store = state.store.write().await;
    if store.accounts.values().any(|a| a.email == email) {
        return Err(Failure::new(StatusCode::CONFLICT, "email already registered"));
    }
    let id = store.next_id();
    let user = User {
        id,
        username: username.to_string(),
        bio: None,
        profile_picture: stored_file_url(&parts, "profilePicture"),
    };
    store.accounts.insert(
        id,
        Account {
            user,
            email: email.to_string(),
            password: password.to_string(),
        },
    );
    let token = issue_token(&mut store, id);
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

// --- users ---

pub(crate) async fn me(State(state): State<AppState>, CurrentUser(me): CurrentUser) -> Reply<User> {
    let store = state.store.read().await;
    store
        .user(me)
        .cloned()
        .map(Json)
        .ok_or(Failure::not_found("user not found"))
}

pub(crate) async fn update_me(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    multipart: Multipart,
) -> Reply<User> {
    let parts = read_parts(multipart).await?;
    let username = text_field(&parts, "username");
    if username.is_some_and(str::is_empty) {
        return Err(Failure::bad_request("username cannot be empty"));
    }

    let mut store = state.store.write().await;
    let account = store
        .accounts
        .get_mut(&me)
        .ok_or(Failure::not_found("user not found"))?;
    if let Some(username) = username {
        account.user.username = username.to_string();
    }
    if let Some(bio) = text_field(&parts, "bio") {
        account.user.bio = Some(bio.to_string());
    }
    if let Some(url) = stored_file_url(&parts, "profilePicture") {
        account.user.profile_picture = Some(url);
    }
    Ok(Json(account.user.clone()))
}

pub(crate) async fn get_user(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Reply<User> {
    let store = state.store.read().await;
    store
        .user(id)
        .cloned()
        .map(Json)
        .ok_or(Failure::not_found("user not found"))
}

pub(crate) async fn list_friends(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Query(page): Query<PageQuery>,
) -> Reply<Page<User>> {
    let store = state.store.read().await;
    let friends: Vec<User> = store
        .friends
        .get(&me)
        .into_iter()
        .flatten()
        .filter_map(|id| store.user(*id).cloned())
        .collect();
    Ok(Json(paginate(friends, page.page, page.size)))
}

pub(crate) async fn add_friend(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, Failure> {
    if id == me {
        return Err(Failure::bad_request("cannot befriend yourself"));
    }
    let mut store = state.store.write().await;
    if store.user(id).is_none() {
        return Err(Failure::not_found("user not found"));
    }
    store.friends.entry(me).or_default().insert(id);
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn remove_friend(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i64>,
) -> StatusCode {
    let mut store = state.store.write().await;
    if let Some(friends) = store.friends.get_mut(&me) {
        friends.remove(&id);
    }
    StatusCode::NO_CONTENT
}

// --- posts ---

pub(crate) async fn feed(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Query(page): Query<PageQuery>,
) -> Reply<Page<Post>> {
    let store = state.store.read().await;
    let friends = store.friends.get(&me);
    let posts: Vec<Post> = store
        .posts
        .values()
        .rev()
        .filter(|p| p.post.author.id == me || friends.is_some_and(|f| f.contains(&p.post.author.id)))
        .map(|p| p.post.clone())
        .collect();
    Ok(Json(paginate(posts, page.page, page.size)))
}

pub(crate) async fn posts_by_user(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Reply<Page<Post>> {
    let store = state.store.read().await;
    if store.user(id).is_none() {
        return Err(Failure::not_found("user not found"));
    }
    let posts: Vec<Post> = store
        .posts
        .values()
        .rev()
        .filter(|p| p.post.author.id == id)
        .map(|p| p.post.clone())
        .collect();
    Ok(Json(paginate(posts, page.page, page.size)))
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    multipart: Multipart,
) -> Created<Post> {
    let parts = read_parts(multipart).await?;
    let song_id = parse_id(text_field(&parts, "songId"))?;
    let album_id = parse_id(text_field(&parts, "albumId"))?;
    let content = text_field(&parts, "content").map(str::to_string);
    let image_url = stored_file_url(&parts, "image");
    let audio_url = stored_file_url(&parts, "audio");
    if content.is_none() && song_id.is_none() && album_id.is_none() && image_url.is_none() && audio_url.is_none() {
        return Err(Failure::bad_request("a post needs content, music, or media"));
    }

    let mut store = state.store.write().await;
    let song = match song_id {
        Some(id) => Some(store.songs.get(&id).cloned().ok_or(Failure::not_found("song not found"))?),
        None => None,
    };
    let album = match album_id {
        Some(id) => Some(store.albums.get(&id).cloned().ok_or(Failure::not_found("album not found"))?),
        None => None,
    };
    let author = store.user(me).cloned().ok_or(Failure::unauthorized())?;
    let id = store.next_id();
    let post = Post {
        id,
        author,
        content,
        song,
        album,
        image_url,
        audio_url,
        likes: 0,
    };
    store.posts.insert(
        id,
        StoredPost {
            post: post.clone(),
            liked_by: Default::default(),
        },
    );
    Ok((StatusCode::CREATED, Json(post)))
}

pub(crate) async fn get_post(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Reply<Post> {
    let store = state.store.read().await;
    store
        .posts
        .get(&id)
        .map(|p| Json(p.post.clone()))
        .ok_or(Failure::not_found("post not found"))
}

pub(crate) async fn like_post(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i64>,
) -> Reply<Post> {
    let mut store = state.store.write().await;
    let stored = store.posts.get_mut(&id).ok_or(Failure::not_found("post not found"))?;
    stored.liked_by.insert(me);
    stored.post.likes = stored.liked_by.len() as u32;
    Ok(Json(stored.post.clone()))
}

pub(crate) async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, Failure> {
    let mut store = state.store.write().await;
    let stored = store.posts.get(&id).ok_or(Failure::not_found("post not found"))?;
    if stored.post.author.id != me {
        return Err(Failure::forbidden());
    }
    store.posts.remove(&id);
    store.comments.retain(|_, c| c.post_id != id);
    Ok(StatusCode::NO_CONTENT)
}

// --- playlists ---

fn owned_playlist(store: &mut Store, id: i64, me: i64) -> Result<&mut Playlist, Failure> {
    let playlist = store
        .playlists
        .get_mut(&id)
        .ok_or(Failure::not_found("playlist not found"))?;
    if playlist.owner_id != me {
        return Err(Failure::forbidden());
    }
    Ok(playlist)
}

pub(crate) async fn my_playlists(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Query(page): Query<PageQuery>,
) -> Reply<Page<Playlist>> {
    let store = state.store.read().await;
    let playlists: Vec<Playlist> = store
        .playlists
        .values()
        .filter(|p| p.owner_id == me)
        .cloned()
        .collect();
    Ok(Json(paginate(playlists, page.page, page.size)))
}

pub(crate) async fn create_playlist(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    multipart: Multipart,
) -> Created<Playlist> {
    let parts = read_parts(multipart).await?;
    let name = text_field(&parts, "name")
        .filter(|n| !n.is_empty())
        .ok_or(Failure::bad_request("playlist name is required"))?;
    let mut store = state.store.write().await;
    let id = store.next_id();
    let playlist = Playlist {
        id,
        name: name.to_string(),
        owner_id: me,
        description: text_field(&parts, "description").map(str::to_string),
        cover_url: stored_file_url(&parts, "cover"),
        songs: Vec::new(),
    };
    store.playlists.insert(id, playlist.clone());
    Ok((StatusCode::CREATED, Json(playlist)))
}

pub(crate) async fn get_playlist(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Reply<Playlist> {
    let store = state.store.read().await;
    store
        .playlists
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(Failure::not_found("playlist not found"))
}

pub(crate) async fn update_playlist(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Reply<Playlist> {
    let parts = read_parts(multipart).await?;
    let mut store = state.store.write().await;
    let playlist = owned_playlist(&mut store, id, me)?;
    if let Some(name) = text_field(&parts, "name") {
        playlist.name = name.to_string();
    }
    if let Some(description) = text_field(&parts, "description") {
        playlist.description = Some(description.to_string());
    }
    if let Some(url) = stored_file_url(&parts, "cover") {
        playlist.cover_url = Some(url);
    }
    Ok(Json(playlist.clone()))
}

pub(crate) async fn add_song(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<SongRef>,
) -> Reply<Playlist> {
    let mut store = state.store.write().await;
    let song = store
        .songs
        .get(&input.song_id)
        .cloned()
        .ok_or(Failure::not_found("song not found"))?;
    let playlist = owned_playlist(&mut store, id, me)?;
    if !playlist.songs.iter().any(|s| s.id == song.id) {
        playlist.songs.push(song);
    }
    Ok(Json(playlist.clone()))
}

pub(crate) async fn remove_song(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Path((id, song_id)): Path<(i64, i64)>,
) -> Reply<Playlist> {
    let mut store = state.store.write().await;
    let playlist = owned_playlist(&mut store, id, me)?;
    playlist.songs.retain(|s| s.id != song_id);
    Ok(Json(playlist.clone()))
}

pub(crate) async fn delete_playlist(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, Failure> {
    let mut store = state.store.write().await;
    owned_playlist(&mut store, id, me)?;
    store.playlists.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// --- catalog ---

pub(crate) async fn search_songs(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(search): Query<SearchQuery>,
) -> Reply<Page<Song>> {
    let needle = search.query.to_lowercase();
    let store = state.store.read().await;
    let songs: Vec<Song> = store
        .songs
        .values()
        .filter(|s| {
            s.title.to_lowercase().contains(&needle) || s.artist.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    Ok(Json(paginate(songs, search.page, search.size)))
}

pub(crate) async fn get_song(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Reply<Song> {
    let store = state.store.read().await;
    store
        .songs
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(Failure::not_found("song not found"))
}

pub(crate) async fn get_album(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Reply<Album> {
    let store = state.store.read().await;
    store
        .albums
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(Failure::not_found("album not found"))
}

// --- comments ---

pub(crate) async fn list_comments(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(post_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Reply<Page<Comment>> {
    let store = state.store.read().await;
    if !store.posts.contains_key(&post_id) {
        return Err(Failure::not_found("post not found"));
    }
    let comments: Vec<Comment> = store
        .comments
        .values()
        .filter(|c| c.post_id == post_id)
        .cloned()
        .collect();
    Ok(Json(paginate(comments, page.page, page.size)))
}

pub(crate) async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Path(post_id): Path<i64>,
    Json(input): Json<CommentRequest>,
) -> Created<Comment> {
    if input.content.trim().is_empty() {
        return Err(Failure::bad_request("comment cannot be empty"));
    }
    let mut store = state.store.write().await;
    if !store.posts.contains_key(&post_id) {
        return Err(Failure::not_found("post not found"));
    }
    let author = store.user(me).cloned().ok_or(Failure::unauthorized())?;
    let id = store.next_id();
    let comment = Comment {
        id,
        post_id,
        author,
        content: input.content,
    };
    store.comments.insert(id, comment.clone());
    Ok((StatusCode::CREATED, Json(comment)))
}

pub(crate) async fn edit_comment(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<CommentRequest>,
) -> Reply<Comment> {
    if input.content.trim().is_empty() {
        return Err(Failure::bad_request("comment cannot be empty"));
    }
    let mut store = state.store.write().await;
    let comment = store
        .comments
        .get_mut(&id)
        .ok_or(Failure::not_found("comment not found"))?;
    if comment.author.id != me {
        return Err(Failure::forbidden());
    }
    comment.content = input.content;
    Ok(Json(comment.clone()))
}

/// The comment's author or the post's author may delete it.
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, Failure> {
    let mut store = state.store.write().await;
    let comment = store
        .comments
        .get(&id)
        .ok_or(Failure::not_found("comment not found"))?;
    let post_author = store.posts.get(&comment.post_id).map(|p| p.post.author.id);
    if comment.author.id != me && post_author != Some(me) {
        return Err(Failure::forbidden());
    }
    store.comments.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
