//! Async driver that runs each logical operation end to end.
//!
//! # Design
//! `HubSession` owns a `HubClient`, a `Transport` and an `Interaction`, and
//! for every operation does: confirm (destructive operations only), build,
//! execute, parse, notify. It never fails outward: reads come back as
//! `Fetched`, mutations as `Mutation`, and the remaining calls as `Option`.
//!
//! There is no cache, no retry and no cancellation. Methods take `&self`, so
//! any number of calls may be in flight at once; they share nothing but the
//! transport's cookie jar and resolve in whatever order the server answers.

use tracing::{debug, warn};

use crate::client::HubClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::interaction::Interaction;
use crate::operation::{Operation, View};
use crate::outcome::{Fetched, Mutation};
use crate::transport::Transport;
use crate::types::{
    Comment, Credentials, LikeState, NewComment, NewPost, Post, PostId, PostPage, PostQuery,
    Registration, User,
};

pub struct HubSession<T, I> {
    client: HubClient,
    transport: T,
    interaction: I,
}

impl<T: Transport, I: Interaction> HubSession<T, I> {
    pub fn new(config: ClientConfig, transport: T, interaction: I) -> Self {
        Self {
            client: HubClient::new(config),
            transport,
            interaction,
        }
    }

    pub fn client(&self) -> &HubClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn interaction(&self) -> &I {
        &self.interaction
    }

    // -- auth ---------------------------------------------------------------

    /// The logged-in user, or `None` when there is no session *or* the
    /// question could not be answered. Use `current_user` to tell them apart.
    pub async fn check_current_user(&self) -> Option<User> {
        self.current_user().await.data()
    }

    pub async fn current_user(&self) -> Fetched<User> {
        let request = self.client.build_current_user();
        let result = self
            .send(Operation::CheckCurrentUser, request)
            .await
            .and_then(|response| self.client.parse_current_user(response));
        Fetched::from_result(result)
    }

    pub async fn register(&self, input: &Registration) -> Mutation {
        self.mutate(
            Operation::Register,
            || self.client.build_register(input),
            |response| self.client.parse_register(response),
        )
        .await
    }

    pub async fn login(&self, input: &Credentials) -> Mutation {
        self.mutate(
            Operation::Login,
            || self.client.build_login(input),
            |response| self.client.parse_login(response),
        )
        .await
    }

    pub async fn logout(&self) -> Mutation {
        self.mutate(
            Operation::Logout,
            || Ok(self.client.build_logout()),
            |response| self.client.parse_logout(response),
        )
        .await
    }

    // -- posts --------------------------------------------------------------

    pub async fn list_posts(&self, query: &PostQuery) -> Fetched<PostPage> {
        let request = self.client.build_list_posts(query);
        self.fetch(Operation::ListPosts, request, |response| {
            self.client.parse_list_posts(response)
        })
        .await
    }

    pub async fn get_post(&self, id: PostId) -> Fetched<Post> {
        let request = self.client.build_get_post(id);
        self.fetch(Operation::GetPost, request, |response| {
            self.client.parse_get_post(response)
        })
        .await
    }

    pub async fn create_post(&self, input: &NewPost) -> Mutation {
        self.mutate(
            Operation::CreatePost,
            || self.client.build_create_post(input),
            |response| self.client.parse_create_post(response),
        )
        .await
    }

    pub async fn delete_post(&self, id: PostId) -> Mutation {
        self.mutate(
            Operation::DeletePost,
            || Ok(self.client.build_delete_post(id)),
            |response| self.client.parse_delete_post(response),
        )
        .await
    }

    // -- comments and likes -------------------------------------------------

    pub async fn list_comments(&self, post_id: PostId) -> Fetched<Vec<Comment>> {
        let request = self.client.build_list_comments(post_id);
        self.fetch(Operation::ListComments, request, |response| {
            self.client.parse_list_comments(response)
        })
        .await
    }

    /// The created comment, or `None` after notifying the user.
    pub async fn add_comment(&self, post_id: PostId, content: &str) -> Option<Comment> {
        let op = Operation::AddComment;
        let input = NewComment {
            content: content.to_string(),
        };
        let result = match self.client.build_add_comment(post_id, &input) {
            Ok(request) => self
                .send(op, request)
                .await
                .and_then(|response| self.client.parse_add_comment(response)),
            Err(err) => Err(err),
        };
        match result {
            Ok(comment) => Some(comment),
            Err(err) => {
                self.report(op, &err);
                None
            }
        }
    }

    /// The new like state, or `None`. Failures are not shown to the user.
    pub async fn toggle_like(&self, post_id: PostId) -> Option<LikeState> {
        let request = self.client.build_toggle_like(post_id);
        self.send(Operation::ToggleLike, request)
            .await
            .and_then(|response| self.client.parse_toggle_like(response))
            .ok()
    }

    // -- plumbing -----------------------------------------------------------

    async fn send(&self, op: Operation, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(operation = %op, method = %request.method, url = %request.url, "issuing request");
        match self.transport.execute(request).await {
            Ok(response) => {
                debug!(operation = %op, status = response.status, "response received");
                Ok(response)
            }
            Err(err) => {
                warn!(operation = %op, error = %err, "request failed");
                Err(err)
            }
        }
    }

    async fn fetch<D>(
        &self,
        op: Operation,
        request: HttpRequest,
        parse: impl FnOnce(HttpResponse) -> Result<D, ApiError>,
    ) -> Fetched<D> {
        let fetched = Fetched::from_result(self.send(op, request).await.and_then(parse));
        if let Some(err) = fetched.error() {
            warn!(operation = %op, error = %err, "read failed");
        }
        fetched
    }

    async fn mutate(
        &self,
        op: Operation,
        build: impl FnOnce() -> Result<HttpRequest, ApiError>,
        parse: impl FnOnce(HttpResponse) -> Result<(), ApiError>,
    ) -> Mutation {
        if let Some(prompt) = op.confirmation_prompt() {
            if !self.interaction.confirm(prompt) {
                debug!(operation = %op, "declined");
                return Mutation::Declined;
            }
        }

        let result = match build() {
            Ok(request) => self.send(op, request).await.and_then(parse),
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => {
                if let Some(notice) = op.success_notice() {
                    self.interaction.notify(notice);
                }
                Mutation::Done(op.destination().unwrap_or(View::Discussions))
            }
            Err(err) => {
                self.report(op, &err);
                Mutation::Failed(err)
            }
        }
    }

    fn report(&self, op: Operation, err: &ApiError) {
        if let Some(message) = failure_message(op, err) {
            self.interaction.notify(message);
        }
    }
}

/// Pick the notice for a failed operation: the server's own text when the
/// operation shows it, otherwise the operation's canned message.
fn failure_message(op: Operation, err: &ApiError) -> Option<&str> {
    op.failure_notice()?;
    if op.shows_server_message() {
        if let Some(message) = err.server_message() {
            return Some(message);
        }
    }
    match err {
        ApiError::Transport(_) | ApiError::Deserialization(_) => op.transport_notice(),
        _ => op.failure_notice(),
    }
}
