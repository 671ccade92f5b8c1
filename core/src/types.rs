//! Wire DTOs for the discussion-board API.
//!
//! # Design
//! The backend owns every entity; these types only describe the JSON the
//! client sends and receives. They mirror the mock server's schema but are
//! defined independently, and the end-to-end tests catch any drift.
//! Responses use camelCase field names.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PostId = i64;

/// The authenticated user, as reported by `/current-user`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub liked_by_current_user: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: PostId,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Like state of a post after a toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub liked: bool,
    pub like_count: u32,
}

/// One page of the post listing. `Default` is the empty result `{posts: [], total: 0}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
}

/// Query for the post listing. Pages start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub page: NonZeroU32,
    pub search: String,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            page: NonZeroU32::MIN,
            search: String::new(),
        }
    }
}

impl PostQuery {
    /// Returns `None` for page 0.
    pub fn page(page: u32) -> Option<Self> {
        Some(Self {
            page: NonZeroU32::new(page)?,
            search: String::new(),
        })
    }

    pub fn search(mut self, search: &str) -> Self {
        self.search = search.to_string();
        self
    }
}

/// Error payload the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// Envelope around the comment returned by `POST /posts/{id}/comments`.
#[derive(Debug, Deserialize)]
pub(crate) struct CommentEnvelope {
    pub comment: Comment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_reads_camel_case_fields() {
        let post: Post = serde_json::from_str(
            r#"{"id":7,"title":"T","content":"C","tags":["x"],"author":"ann",
                "createdAt":"2024-05-01T12:00:00Z","likeCount":3,"likedByCurrentUser":true}"#,
        )
        .unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.like_count, 3);
        assert!(post.liked_by_current_user);
        assert_eq!(post.created_at.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn post_like_fields_default_when_absent() {
        let post: Post = serde_json::from_str(
            r#"{"id":1,"title":"T","content":"C","author":"ann","createdAt":"2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert!(post.tags.is_empty());
        assert_eq!(post.like_count, 0);
        assert!(!post.liked_by_current_user);
    }

    #[test]
    fn empty_page_has_documented_shape() {
        let json = serde_json::to_value(PostPage::default()).unwrap();
        assert_eq!(json, serde_json::json!({"posts": [], "total": 0}));
    }

    #[test]
    fn post_query_rejects_page_zero() {
        assert!(PostQuery::page(0).is_none());
        let query = PostQuery::page(3).unwrap().search("rust");
        assert_eq!(query.page.get(), 3);
        assert_eq!(query.search, "rust");
    }

    #[test]
    fn credentials_remember_defaults_to_false() {
        let creds: Credentials =
            serde_json::from_str(r#"{"email":"a@b.c","password":"pw"}"#).unwrap();
        assert!(!creds.remember);
    }
}
