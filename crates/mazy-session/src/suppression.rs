//! Correlation tokens for suppressing self-caused auth events.
//!
//! Every gateway call the controller initiates carries a freshly issued
//! token. The auth event the call produces carries the same token back, and
//! the event loop consumes it: a consumed token suppresses exactly one
//! notification. A boolean "ignore the next event" flag cannot express this
//! without racing concurrent calls.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct SuppressionTokens {
    next: AtomicU64,
    outstanding: Mutex<HashSet<u64>>,
}

impl SuppressionTokens {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token and mark it outstanding.
    pub fn issue(&self) -> u64 {
        let token = self.next.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(token);
        token
    }

    /// Consume an outstanding token. Returns `true` at most once per token.
    pub fn consume(&self, token: u64) -> bool {
        self.lock().remove(&token)
    }

    /// Withdraw a token whose call definitively produced no event.
    pub fn discard(&self, token: u64) {
        self.lock().remove(&token);
    }

    /// Tokens issued but not yet consumed or discarded. Every issued token
    /// must eventually leave this set one way or the other.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<u64>> {
        self.outstanding
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_token_suppresses_exactly_once() {
        let tokens = SuppressionTokens::new();
        let t = tokens.issue();
        assert!(tokens.consume(t));
        assert!(!tokens.consume(t), "second consume must not suppress");
    }

    #[test]
    fn tokens_are_independent() {
        let tokens = SuppressionTokens::new();
        let a = tokens.issue();
        let b = tokens.issue();
        assert_ne!(a, b);
        assert!(tokens.consume(b));
        assert!(tokens.consume(a));
    }

    #[test]
    fn unissued_tokens_never_suppress() {
        let tokens = SuppressionTokens::new();
        assert!(!tokens.consume(42));
    }

    #[test]
    fn discarded_tokens_never_suppress() {
        let tokens = SuppressionTokens::new();
        let t = tokens.issue();
        tokens.discard(t);
        assert!(!tokens.consume(t));
    }

    #[test]
    fn consume_and_discard_both_retire_tokens() {
        let tokens = SuppressionTokens::new();
        let a = tokens.issue();
        let b = tokens.issue();
        assert_eq!(tokens.outstanding(), 2);
        tokens.consume(a);
        tokens.discard(b);
        assert_eq!(tokens.outstanding(), 0);
    }
}
