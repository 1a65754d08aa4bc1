//! Access gate guarding the dashboard.
//!
//! This deters casual access; it is not authentication. There is no lockout,
//! no rate limiting and the secret is compared in plain text. When the
//! deployment does not configure a secret the built-in default applies,
//! which anyone reading the source knows.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateState {
    #[default]
    Locked,
    Unlocked,
}

impl GateState {
    /// State after an unlock attempt. A matching attempt while already
    /// unlocked keeps the gate open; a mismatch never changes the state.
    #[must_use]
    pub const fn after_attempt(self, matched: bool) -> Self {
        if matched { Self::Unlocked } else { self }
    }

    #[must_use]
    pub const fn after_lock(self) -> Self {
        Self::Locked
    }

    #[must_use]
    pub const fn is_unlocked(self) -> bool {
        matches!(self, Self::Unlocked)
    }
}

#[derive(Clone)]
pub struct AccessGate {
    secret: Arc<str>,
    state: GateState,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").field("secret", &"***").field("state", &self.state).finish()
    }
}

impl AccessGate {
    /// Creates a locked gate for the given secret.
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self { secret: secret.into(), state: GateState::Locked }
    }

    /// Exact, case-sensitive, untrimmed comparison against the secret.
    pub fn matches(&self, candidate: &str) -> bool {
        *self.secret == *candidate
    }

    /// Returns `true` and unlocks on a match; otherwise returns `false`
    /// and leaves the state untouched.
    pub fn attempt_unlock(&mut self, candidate: &str) -> bool {
        let matched = self.matches(candidate);
        self.state = self.state.after_attempt(matched);
        if !matched {
            tracing::info!("access gate rejected unlock attempt");
        }
        matched
    }

    pub fn lock(&mut self) {
        self.state = self.state.after_lock();
    }

    #[must_use]
    pub const fn state(&self) -> GateState {
        self.state
    }

    #[must_use]
    pub const fn is_unlocked(&self) -> bool {
        self.state.is_unlocked()
    }
}
