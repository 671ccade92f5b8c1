//! In-memory state behind the mock backend: users, cookie sessions, posts,
//! comments and likes. All methods are synchronous; the router serialises
//! access through a `RwLock`.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::ServerError;
use crate::{Comment, LikeState, Post, PostPage, User};

pub const PAGE_SIZE: usize = 10;

struct UserRecord {
    id: i64,
    username: String,
    email: String,
    salt: String,
    password_hash: String,
}

impl UserRecord {
    fn public(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

struct PostRecord {
    id: i64,
    author_id: i64,
    title: String,
    content: String,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

/// Lifetime of a "remember me" session: seven days.
pub const REMEMBER_SECONDS: i64 = 7 * 24 * 60 * 60;
/// Lifetime of any other session.
pub const SESSION_SECONDS: i64 = 24 * 60 * 60;

struct SessionRecord {
    user_id: i64,
    expires_at: DateTime<Utc>,
}

struct CommentRecord {
    id: i64,
    post_id: i64,
    author_id: i64,
    content: String,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct Store {
    users: BTreeMap<i64, UserRecord>,
    sessions: HashMap<String, SessionRecord>,
    posts: BTreeMap<i64, PostRecord>,
    comments: BTreeMap<i64, CommentRecord>,
    /// (post id, user id)
    likes: HashSet<(i64, i64)>,
    next_id: i64,
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    // -- users and sessions -------------------------------------------------

    pub fn register(&mut self, username: &str, email: &str, password: &str) -> Result<User, ServerError> {
        if blank(username) || blank(email) || blank(password) {
            return Err(ServerError::BadRequest("All fields are required"));
        }
        let email = email.trim().to_lowercase();
        let username = username.trim().to_string();
        if self.users.values().any(|u| u.email == email) {
            return Err(ServerError::BadRequest("Email already registered"));
        }
        if self.users.values().any(|u| u.username == username) {
            return Err(ServerError::BadRequest("Username already taken"));
        }
        let id = self.next_id();
        let salt = Uuid::new_v4().simple().to_string();
        let record = UserRecord {
            id,
            password_hash: hash_password(&salt, password),
            salt,
            username,
            email,
        };
        let user = record.public();
        self.users.insert(id, record);
        Ok(user)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, ServerError> {
        let email = email.trim().to_lowercase();
        self.users
            .values()
            .find(|u| u.email == email && u.password_hash == hash_password(&u.salt, password))
            .map(UserRecord::public)
            .ok_or(ServerError::Unauthorized("Invalid email or password"))
    }

    pub fn start_session(&mut self, user_id: i64, remember: bool) -> String {
        let lifetime = if remember { REMEMBER_SECONDS } else { SESSION_SECONDS };
        self.start_session_until(user_id, Utc::now() + Duration::seconds(lifetime))
    }

    /// Expired sessions are dropped here, so the map only grows with live ones.
    fn start_session_until(&mut self, user_id: i64, expires_at: DateTime<Utc>) -> String {
        let now = Utc::now();
        self.sessions.retain(|_, session| session.expires_at > now);
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), SessionRecord { user_id, expires_at });
        token
    }

    pub fn end_session(&mut self, token: &str) {
        self.sessions.remove(token);
    }

    pub fn session_user(&self, token: Option<&str>) -> Option<User> {
        let session = self
            .sessions
            .get(token?)
            .filter(|session| session.expires_at > Utc::now())?;
        self.users.get(&session.user_id).map(UserRecord::public)
    }

    fn require_user(&self, token: Option<&str>) -> Result<User, ServerError> {
        self.session_user(token)
            .ok_or(ServerError::Unauthorized("Login required"))
    }

    // -- posts --------------------------------------------------------------

    fn render_post(&self, post: &PostRecord, viewer: Option<i64>) -> Post {
        let like_count = self.likes.iter().filter(|(p, _)| *p == post.id).count() as u32;
        Post {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            tags: post.tags.clone(),
            author: self.username(post.author_id),
            created_at: post.created_at,
            like_count,
            liked_by_current_user: viewer.is_some_and(|v| self.likes.contains(&(post.id, v))),
        }
    }

    fn username(&self, user_id: i64) -> String {
        self.users
            .get(&user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn viewer(&self, token: Option<&str>) -> Option<i64> {
        self.session_user(token).map(|u| u.id)
    }

    /// Newest first; `search` matches title, content or any tag, ignoring case.
    pub fn list_posts(&self, page: usize, search: &str, token: Option<&str>) -> PostPage {
        let viewer = self.viewer(token);
        let needle = search.trim().to_lowercase();
        let matches: Vec<&PostRecord> = self
            .posts
            .values()
            .rev()
            .filter(|p| {
                needle.is_empty()
                    || p.title.to_lowercase().contains(&needle)
                    || p.content.to_lowercase().contains(&needle)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect();
        let total = matches.len() as u64;
        let posts = matches
            .into_iter()
            .skip(page.saturating_sub(1).saturating_mul(PAGE_SIZE))
            .take(PAGE_SIZE)
            .map(|p| self.render_post(p, viewer))
            .collect();
        PostPage { posts, total }
    }

    pub fn get_post(&self, id: i64, token: Option<&str>) -> Result<Post, ServerError> {
        let post = self.posts.get(&id).ok_or(ServerError::NotFound("Post not found"))?;
        Ok(self.render_post(post, self.viewer(token)))
    }

    pub fn create_post(
        &mut self,
        token: Option<&str>,
        title: &str,
        content: &str,
        tags: Vec<String>,
    ) -> Result<Post, ServerError> {
        let user = self.require_user(token)?;
        if blank(title) || blank(content) {
            return Err(ServerError::BadRequest("Title and content are required"));
        }
        let id = self.next_id();
        let record = PostRecord {
            id,
            author_id: user.id,
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            tags: tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            created_at: Utc::now(),
        };
        let post = self.render_post(&record, Some(user.id));
        self.posts.insert(id, record);
        Ok(post)
    }

    /// Removes the post with its comments and likes.
    pub fn delete_post(&mut self, token: Option<&str>, id: i64) -> Result<(), ServerError> {
        let user = self.require_user(token)?;
        let post = self.posts.get(&id).ok_or(ServerError::NotFound("Post not found"))?;
        if post.author_id != user.id {
            return Err(ServerError::Forbidden("You can only delete your own posts"));
        }
        self.posts.remove(&id);
        self.comments.retain(|_, c| c.post_id != id);
        self.likes.retain(|(p, _)| *p != id);
        Ok(())
    }

    // -- comments and likes -------------------------------------------------

    fn render_comment(&self, comment: &CommentRecord) -> Comment {
        Comment {
            id: comment.id,
            post_id: comment.post_id,
            content: comment.content.clone(),
            author: self.username(comment.author_id),
            created_at: comment.created_at,
        }
    }

    /// Oldest first.
    pub fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, ServerError> {
        if !self.posts.contains_key(&post_id) {
            return Err(ServerError::NotFound("Post not found"));
        }
        Ok(self
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .map(|c| self.render_comment(c))
            .collect())
    }

    pub fn add_comment(
        &mut self,
        token: Option<&str>,
        post_id: i64,
        content: &str,
    ) -> Result<Comment, ServerError> {
        let user = self.require_user(token)?;
        if !self.posts.contains_key(&post_id) {
            return Err(ServerError::NotFound("Post not found"));
        }
        if blank(content) {
            return Err(ServerError::BadRequest("Comment cannot be empty"));
        }
        let id = self.next_id();
        let record = CommentRecord {
            id,
            post_id,
            author_id: user.id,
            content: content.trim().to_string(),
            created_at: Utc::now(),
        };
        let comment = self.render_comment(&record);
        self.comments.insert(id, record);
        Ok(comment)
    }

    pub fn toggle_like(&mut self, token: Option<&str>, post_id: i64) -> Result<LikeState, ServerError> {
        let user = self.require_user(token)?;
        if !self.posts.contains_key(&post_id) {
            return Err(ServerError::NotFound("Post not found"));
        }
        let key = (post_id, user.id);
        let liked = if self.likes.remove(&key) {
            false
        } else {
            self.likes.insert(key);
            true
        };
        let like_count = self.likes.iter().filter(|(p, _)| *p == post_id).count() as u32;
        Ok(LikeState { liked, like_count })
    }
}
