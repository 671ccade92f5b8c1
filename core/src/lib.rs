//! Client for the discussion-board REST API.
//!
//! # Overview
//! Two layers:
//! - `HubClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO pattern). It is
//!   deterministic and can be driven by any HTTP stack.
//! - `HubSession` drives `HubClient` over a `Transport`, asks an
//!   `Interaction` for confirmation before destructive operations, and
//!   turns every outcome into a value (`Fetched`, `Mutation`, `Option`)
//!   instead of an error the caller must handle.
//!
//! # Design
//! - The backend location comes from `ClientConfig`; nothing is global.
//! - Authentication is a server-issued cookie held by the transport's jar.
//!   The client keeps no token and no user record of its own; every read
//!   goes back to the server.
//! - Navigation after a mutation is reported (`Mutation::Done(View)`), never
//!   performed.
//! - DTOs are defined independently from the mock-server crate; the
//!   end-to-end tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod interaction;
pub mod operation;
pub mod outcome;
pub mod session;
pub mod transport;
pub mod types;

pub use client::HubClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use interaction::{Callbacks, Interaction, Silent};
pub use operation::{Operation, View};
pub use outcome::{Fetched, Mutation};
pub use session::HubSession;
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    Comment, Credentials, LikeState, NewComment, NewPost, Post, PostId, PostPage, PostQuery,
    Registration, User,
};
