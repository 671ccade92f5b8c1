//! Error types for the discussion-board API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant so read operations can tell "the post
//! does not exist" apart from "the request failed". Every other non-2xx
//! response lands in `Rejected`, carrying the server's `error` string when the
//! body had one. Status codes are not interpreted beyond that.

use crate::http::HttpResponse;
use crate::types::ErrorBody;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// A required field was empty; nothing was sent.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Rejected { status: u16, message: Option<String> },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Build the error for a non-2xx response.
    pub fn from_response(response: &HttpResponse) -> Self {
        if response.status == 404 {
            return ApiError::NotFound;
        }
        let message = serde_json::from_str::<ErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.is_empty());
        ApiError::Rejected {
            status: response.status,
            message,
        }
    }

    /// The server-provided message, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show a user: the server's message verbatim, else `fallback`.
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.server_message().unwrap_or(fallback)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
