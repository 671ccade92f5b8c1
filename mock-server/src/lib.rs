//! In-memory discussion-board backend mounted under `/api`.
//!
//! Sessions are a `session=<uuid>` cookie. Error responses carry a JSON
//! `{"error": "..."}` body. State lives in memory and is lost on restart.

pub mod error;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

use crate::error::ServerError;
use crate::store::Store;

pub use crate::store::{REMEMBER_SECONDS, SESSION_SECONDS};

pub const SESSION_COOKIE: &str = "session";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub like_count: u32,
    pub liked_by_current_user: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub liked: bool,
    pub like_count: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: u64,
}

// Missing fields deserialize as empty so the handlers can answer with the
// backend's own 400 message. Bodies that are not JSON at all are turned into
// `ServerError` by its `From<JsonRejection>` impl.

#[derive(Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Deserialize)]
pub struct CreatePostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct CommentInput {
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub search: Option<String>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/current-user", get(current_user))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post).delete(delete_post))
        .route("/posts/{id}/comments", get(list_comments).post(add_comment))
        .route("/posts/{id}/like", post(toggle_like));
    Router::new().nest("/api", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Value of the session cookie on the request, if any.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn session_cookie(token: &str, remember: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    if remember {
        cookie.push_str(&format!("; Max-Age={REMEMBER_SECONDS}"));
    }
    cookie
}

fn expired_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

async fn register(
    State(db): State<Db>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(input) = payload?;
    let mut store = db.write().await;
    let user = store.register(&input.username, &input.email, &input.password)?;
    let token = store.start_session(user.id, false);
    info!(user_id = user.id, "registered");
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(&token, false))],
        Json(json!({"message": "Registration successful", "user": user})),
    )
        .into_response())
}

async fn login(
    State(db): State<Db>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(input) = payload?;
    let mut store = db.write().await;
    let user = store.authenticate(&input.email, &input.password)?;
    let token = store.start_session(user.id, input.remember);
    info!(user_id = user.id, remember = input.remember, "logged in");
    Ok((
        [(header::SET_COOKIE, session_cookie(&token, input.remember))],
        Json(json!({"message": "Login successful", "user": user})),
    )
        .into_response())
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        db.write().await.end_session(token);
    }
    (
        [(header::SET_COOKIE, expired_cookie())],
        Json(json!({"message": "Logged out"})),
    )
        .into_response()
}

async fn current_user(State(db): State<Db>, headers: HeaderMap) -> Result<Json<User>, ServerError> {
    let store = db.read().await;
    store
        .session_user(session_token(&headers))
        .map(Json)
        .ok_or(ServerError::Unauthorized("Not authenticated"))
}

async fn list_posts(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Json<PostPage> {
    let page = params.page.unwrap_or(1).max(1);
    let search = params.search.unwrap_or_default();
    let store = db.read().await;
    Json(store.list_posts(page, &search, session_token(&headers)))
}

async fn get_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Post>, ServerError> {
    let store = db.read().await;
    store.get_post(id, session_token(&headers)).map(Json)
}

async fn create_post(
    State(db): State<Db>,
    headers: HeaderMap,
    payload: Result<Json<CreatePostInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ServerError> {
    let Json(input) = payload?;
    let post = db.write().await.create_post(
        session_token(&headers),
        &input.title,
        &input.content,
        input.tags,
    )?;
    info!(post_id = post.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

async fn delete_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ServerError> {
    db.write().await.delete_post(session_token(&headers), id)?;
    info!(post_id = id, "post deleted");
    Ok(Json(json!({"message": "Post deleted"})))
}

async fn list_comments(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ServerError> {
    let store = db.read().await;
    store.list_comments(id).map(Json)
}

async fn add_comment(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    payload: Result<Json<CommentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServerError> {
    let Json(input) = payload?;
    let comment = db
        .write()
        .await
        .add_comment(session_token(&headers), id, &input.content)?;
    Ok((StatusCode::CREATED, Json(json!({"comment": comment}))))
}

async fn toggle_like(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<LikeState>, ServerError> {
    let mut store = db.write().await;
    store.toggle_like(session_token(&headers), id).map(Json)
}
