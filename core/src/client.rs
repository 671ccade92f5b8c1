//! Stateless HTTP request builder and response parser for the discussion-board API.
//!
//! # Design
//! `HubClient` holds only a `ClientConfig` and carries no mutable state
//! between calls. Each logical operation is split into a `build_*` method
//! that produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Whoever sits in between (a `Transport`, a test, a blocking
//! agent) executes the round-trip, keeping this half deterministic and free
//! of I/O.
//!
//! Any 2xx counts as success; the backend is not consistent about 200 vs 201.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{json_headers, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Comment, CommentEnvelope, Credentials, LikeState, NewComment, NewPost, Post, PostId, PostPage,
    PostQuery, Registration, User,
};

/// Synchronous, stateless client for the discussion-board API.
#[derive(Debug, Clone)]
pub struct HubClient {
    config: ClientConfig,
}

impl HubClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -- auth ---------------------------------------------------------------

    pub fn build_current_user(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/current-user")
    }

    pub fn build_register(&self, input: &Registration) -> Result<HttpRequest, ApiError> {
        require(&input.username, "username is required")?;
        require(&input.email, "email is required")?;
        require(&input.password, "password is required")?;
        self.with_json(HttpMethod::Post, "/register", input)
    }

    pub fn build_login(&self, input: &Credentials) -> Result<HttpRequest, ApiError> {
        require(&input.email, "email is required")?;
        require(&input.password, "password is required")?;
        self.with_json(HttpMethod::Post, "/login", input)
    }

    pub fn build_logout(&self) -> HttpRequest {
        self.bare(HttpMethod::Post, "/logout")
    }

    pub fn parse_current_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_json(response)
    }

    /// Register and login reply with `{}` or user info. The content is
    /// ignored but the body must still be JSON.
    pub fn parse_register(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_ack(response)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_ack(response)
    }

    /// Logout's body is never read.
    pub fn parse_logout(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    // -- posts --------------------------------------------------------------

    pub fn build_list_posts(&self, query: &PostQuery) -> HttpRequest {
        let path = format!(
            "/posts?page={}&search={}",
            query.page,
            urlencoding::encode(&query.search)
        );
        self.bare(HttpMethod::Get, &path)
    }

    pub fn build_get_post(&self, id: PostId) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/posts/{id}"))
    }

    pub fn build_create_post(&self, input: &NewPost) -> Result<HttpRequest, ApiError> {
        require(&input.title, "title is required")?;
        require(&input.content, "content is required")?;
        if input.tags.iter().all(|tag| tag.trim().is_empty()) {
            return Err(ApiError::InvalidInput("at least one tag is required"));
        }
        self.with_json(HttpMethod::Post, "/posts", input)
    }

    pub fn build_delete_post(&self, id: PostId) -> HttpRequest {
        self.bare(HttpMethod::Delete, &format!("/posts/{id}"))
    }

    pub fn parse_list_posts(&self, response: HttpResponse) -> Result<PostPage, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_ack(response)
    }

    pub fn parse_delete_post(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_ack(response)
    }

    // -- comments and likes -------------------------------------------------

    pub fn build_list_comments(&self, post_id: PostId) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/posts/{post_id}/comments"))
    }

    pub fn build_add_comment(
        &self,
        post_id: PostId,
        input: &NewComment,
    ) -> Result<HttpRequest, ApiError> {
        require(&input.content, "comment content is required")?;
        self.with_json(HttpMethod::Post, &format!("/posts/{post_id}/comments"), input)
    }

    pub fn build_toggle_like(&self, post_id: PostId) -> HttpRequest {
        self.bare(HttpMethod::Post, &format!("/posts/{post_id}/like"))
    }

    pub fn parse_list_comments(&self, response: HttpResponse) -> Result<Vec<Comment>, ApiError> {
        parse_json(response)
    }

    pub fn parse_add_comment(&self, response: HttpResponse) -> Result<Comment, ApiError> {
        parse_json::<CommentEnvelope>(response).map(|envelope| envelope.comment)
    }

    pub fn parse_toggle_like(&self, response: HttpResponse) -> Result<LikeState, ApiError> {
        parse_json(response)
    }

    // -- helpers ------------------------------------------------------------

    fn bare(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: self.config.endpoint(path),
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url: self.config.endpoint(path),
            headers: json_headers(),
            body: Some(body),
        })
    }
}

fn require(value: &str, message: &'static str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(message));
    }
    Ok(())
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_response(response))
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Acknowledgement replies: the body is decoded before the status is looked
/// at, so an HTML page from a proxy fails whatever its status.
fn parse_ack(response: HttpResponse) -> Result<(), ApiError> {
    serde_json::from_str::<serde_json::Value>(&response.body).map_err(|e| {
        ApiError::Deserialization(format!("HTTP {}: {e}", response.status))
    })?;
    check_status(&response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HubClient {
        HubClient::new(ClientConfig::new("http://localhost:5000"))
    }

    fn ok(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_current_user_produces_correct_request() {
        let req = client().build_current_user();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:5000/api/current-user");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_login_carries_remember_flag() {
        let input = Credentials {
            email: "ann@example.com".to_string(),
            password: "secret".to_string(),
            remember: true,
        };
        let req = client().build_login(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:5000/api/login");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"email": "ann@example.com", "password": "secret", "remember": true})
        );
    }

    #[test]
    fn build_register_rejects_blank_fields() {
        let input = Registration {
            username: "ann".to_string(),
            email: "  ".to_string(),
            password: "pw".to_string(),
        };
        let err = client().build_register(&input).unwrap_err();
        assert_eq!(err, ApiError::InvalidInput("email is required"));
    }

    #[test]
    fn build_logout_has_no_body() {
        let req = client().build_logout();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:5000/api/logout");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_list_posts_defaults_to_first_page() {
        let req = client().build_list_posts(&PostQuery::default());
        assert_eq!(req.url, "http://localhost:5000/api/posts?page=1&search=");
    }

    #[test]
    fn build_list_posts_encodes_search() {
        let query = PostQuery::page(2).unwrap().search("rust & c++");
        let req = client().build_list_posts(&query);
        assert_eq!(
            req.url,
            "http://localhost:5000/api/posts?page=2&search=rust%20%26%20c%2B%2B"
        );
    }

    #[test]
    fn build_create_post_requires_a_tag() {
        let input = NewPost {
            title: "T".to_string(),
            content: "C".to_string(),
            tags: vec![" ".to_string()],
        };
        let err = client().build_create_post(&input).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn build_delete_post_targets_the_post() {
        let req = client().build_delete_post(42);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:5000/api/posts/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_comment_and_like_paths() {
        let c = client();
        assert_eq!(c.build_list_comments(9).url, "http://localhost:5000/api/posts/9/comments");
        assert_eq!(c.build_toggle_like(9).url, "http://localhost:5000/api/posts/9/like");
        assert_eq!(c.build_toggle_like(9).method, HttpMethod::Post);
        let req = c
            .build_add_comment(9, &NewComment { content: "hi".to_string() })
            .unwrap();
        assert_eq!(req.body.as_deref(), Some(r#"{"content":"hi"}"#));
    }

    #[test]
    fn build_add_comment_rejects_empty_content() {
        let err = client()
            .build_add_comment(1, &NewComment { content: String::new() })
            .unwrap_err();
        assert_eq!(err, ApiError::InvalidInput("comment content is required"));
    }

    #[test]
    fn parse_current_user_success() {
        let user = client()
            .parse_current_user(ok(200, r#"{"id":1,"username":"ann","email":"ann@example.com"}"#))
            .unwrap();
        assert_eq!(user.username, "ann");
    }

    #[test]
    fn parse_current_user_unauthenticated() {
        let err = client()
            .parse_current_user(ok(401, r#"{"error":"Not authenticated"}"#))
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Not authenticated"));
    }

    #[test]
    fn parse_register_accepts_any_2xx() {
        assert!(client().parse_register(ok(201, "{}")).is_ok());
        assert!(client().parse_login(ok(200, r#"{"user":{"id":1}}"#)).is_ok());
    }

    #[test]
    fn acknowledgements_must_be_json() {
        let err = client().parse_register(ok(200, "<html>proxy</html>")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
        let err = client().parse_delete_post(ok(502, "Bad Gateway")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
        assert!(client().parse_logout(ok(200, "")).is_ok());
    }

    #[test]
    fn parse_add_comment_unwraps_envelope() {
        let comment = client()
            .parse_add_comment(ok(
                201,
                r#"{"comment":{"id":3,"postId":9,"content":"hi","author":"ann","createdAt":"2024-05-01T12:00:00Z"}}"#,
            ))
            .unwrap();
        assert_eq!(comment.content, "hi");
        assert_eq!(comment.post_id, 9);
    }

    #[test]
    fn parse_get_post_not_found() {
        let err = client().parse_get_post(ok(404, r#"{"error":"Post not found"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_list_posts_bad_json() {
        let err = client().parse_list_posts(ok(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_delete_post_forbidden() {
        let err = client()
            .parse_delete_post(ok(403, r#"{"error":"You can only delete your own posts"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 403, .. }));
    }

    #[test]
    fn parse_toggle_like_success() {
        let state = client()
            .parse_toggle_like(ok(200, r#"{"liked":true,"likeCount":4}"#))
            .unwrap();
        assert_eq!(state, LikeState { liked: true, like_count: 4 });
    }
}
