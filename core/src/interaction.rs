//! User-facing callbacks: confirmation before destructive actions and
//! notices after outcomes.
//!
//! `confirm` is called synchronously before any request is built; returning
//! `false` ends the operation with nothing sent.

pub trait Interaction: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
    fn notify(&self, message: &str);
}

/// Adapts a pair of closures to `Interaction`.
pub struct Callbacks<C, N> {
    confirm: C,
    notify: N,
}

impl<C, N> Callbacks<C, N>
where
    C: Fn(&str) -> bool + Send + Sync,
    N: Fn(&str) + Send + Sync,
{
    pub fn new(confirm: C, notify: N) -> Self {
        Self { confirm, notify }
    }
}

impl<C, N> Interaction for Callbacks<C, N>
where
    C: Fn(&str) -> bool + Send + Sync,
    N: Fn(&str) + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        (self.confirm)(prompt)
    }

    fn notify(&self, message: &str) {
        (self.notify)(message)
    }
}

/// Confirms everything and drops notices. For scripts and headless hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Interaction for Silent {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }

    fn notify(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn callbacks_forward_to_closures() {
        let seen = Mutex::new(Vec::new());
        let callbacks = Callbacks::new(
            |prompt: &str| prompt.contains("delete"),
            |message: &str| seen.lock().unwrap().push(message.to_string()),
        );
        assert!(callbacks.confirm("Are you sure you want to delete this post?"));
        assert!(!callbacks.confirm("Are you sure you want to logout?"));
        callbacks.notify("done");
        assert_eq!(*seen.lock().unwrap(), vec!["done".to_string()]);
    }

    #[test]
    fn silent_confirms() {
        assert!(Silent.confirm("anything"));
    }
}
