//! Result shapes returned by `HubSession`.
//!
//! Reads return `Fetched`, which keeps "there is nothing" (`NotFound`, or an
//! empty `Data`) apart from "we could not find out" (`Failed`). Callers that
//! want the old collapse-to-empty behaviour ask for it explicitly with
//! `unwrap_or_default` or `data`.

use crate::error::ApiError;
use crate::operation::View;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Data(T),
    NotFound,
    Failed(ApiError),
}

impl<T> Fetched<T> {
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Fetched::Data(data),
            Err(ApiError::NotFound) => Fetched::NotFound,
            Err(err) => Fetched::Failed(err),
        }
    }

    pub fn data(self) -> Option<T> {
        match self {
            Fetched::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Fetched::Data(_))
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Fetched::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<T: Default> Fetched<T> {
    /// Collapse `NotFound` and `Failed` into the empty value.
    pub fn unwrap_or_default(self) -> T {
        self.data().unwrap_or_default()
    }
}

/// Outcome of a state-changing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// The server accepted the request. Carries the view the user would
    /// normally be taken to next; following it is the caller's choice.
    Done(View),
    /// The user declined the confirmation prompt. Nothing was sent.
    Declined,
    Failed(ApiError),
}

impl Mutation {
    pub fn is_done(&self) -> bool {
        matches!(self, Mutation::Done(_))
    }

    pub fn destination(&self) -> Option<View> {
        match self {
            Mutation::Done(view) => Some(*view),
            _ => None,
        }
    }
}
