//! Catalogue of logical operations: their user-facing text and where a view
//! layer should go once they succeed.
//!
//! The client never navigates. `Operation::destination` is advice for the
//! caller, which owns the decision.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CheckCurrentUser,
    Register,
    Login,
    Logout,
    ListPosts,
    GetPost,
    CreatePost,
    DeletePost,
    ListComments,
    AddComment,
    ToggleLike,
}

/// Pages a view layer can move to after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Discussions,
    Login,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Discussions => "/discussions.html",
            View::Login => "/login.html",
        }
    }
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CheckCurrentUser => "check_current_user",
            Operation::Register => "register",
            Operation::Login => "login",
            Operation::Logout => "logout",
            Operation::ListPosts => "list_posts",
            Operation::GetPost => "get_post",
            Operation::CreatePost => "create_post",
            Operation::DeletePost => "delete_post",
            Operation::ListComments => "list_comments",
            Operation::AddComment => "add_comment",
            Operation::ToggleLike => "toggle_like",
        }
    }

    /// Prompt that must be affirmed before the request is issued.
    pub fn confirmation_prompt(&self) -> Option<&'static str> {
        match self {
            Operation::Logout => Some("Are you sure you want to logout?"),
            Operation::DeletePost => Some("Are you sure you want to delete this post?"),
            _ => None,
        }
    }

    pub fn success_notice(&self) -> Option<&'static str> {
        match self {
            Operation::Register => Some("Registration successful! Welcome to The Hub!"),
            Operation::Login => Some("Login successful! Welcome back!"),
            Operation::Logout => Some("You have been logged out successfully!"),
            Operation::CreatePost => Some("Post created successfully!"),
            Operation::DeletePost => Some("Post deleted successfully"),
            _ => None,
        }
    }

    /// Shown when the server rejected the request without a message of its own.
    pub fn failure_notice(&self) -> Option<&'static str> {
        match self {
            Operation::Register => Some("Registration failed. Please try again."),
            Operation::Login => Some("Login failed. Please try again."),
            Operation::Logout => Some("Logout failed. Please try again."),
            Operation::CreatePost => Some("Failed to create post."),
            Operation::DeletePost => Some("Failed to delete post."),
            Operation::AddComment => Some("Failed to add comment."),
            _ => None,
        }
    }

    /// Shown when no response arrived at all.
    pub fn transport_notice(&self) -> Option<&'static str> {
        match self {
            Operation::Register => Some("An error occurred during registration. Please try again."),
            Operation::Login => Some("An error occurred during login. Please try again."),
            Operation::Logout => Some("An error occurred during logout."),
            Operation::CreatePost => Some("Failed to create post"),
            Operation::DeletePost => Some("Failed to delete post"),
            Operation::AddComment => Some("Failed to add comment"),
            _ => None,
        }
    }

    /// Whether the server's `error` text may be shown in place of the fallback.
    pub fn shows_server_message(&self) -> bool {
        !matches!(self, Operation::Logout)
    }

    pub fn destination(&self) -> Option<View> {
        match self {
            Operation::Register | Operation::Login | Operation::CreatePost | Operation::DeletePost => {
                Some(View::Discussions)
            }
            Operation::Logout => Some(View::Login),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
