//! Deployment state machine.
//!
//! ```text
//! PendingSubmit ──→ Submitted ──→ Polling(1) ──→ ... ──→ Polling(n)
//!                                     │                      │
//!                                     └──→ Deployed ←────────┤
//!                                                            └──→ TimedOut
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentState {
    PendingSubmit,
    Submitted,
    /// Check number `n` (1-based) is in progress
    Polling(u32),
    Deployed,
    TimedOut,
}

impl DeploymentState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deployed | Self::TimedOut)
    }

    pub fn can_transition_to(&self, next: &DeploymentState) -> bool {
        use DeploymentState::*;
        match (self, next) {
            (PendingSubmit, Submitted) => true,
            (Submitted, Polling(1)) => true,
            (Polling(n), Polling(m)) => *m == n + 1,
            (Polling(_), Deployed | TimedOut) => true,
            _ => false,
        }
    }
}

/// Records the path a deployment took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTracker {
    state: DeploymentState,
    history: Vec<DeploymentState>,
}

impl Default for DeploymentTracker {
    fn default() -> Self {
        Self {
            state: DeploymentState::PendingSubmit,
            history: vec![DeploymentState::PendingSubmit],
        }
    }
}

impl DeploymentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DeploymentState {
        self.state
    }

    pub fn history(&self) -> &[DeploymentState] {
        &self.history
    }

    /// Move to `next`. Illegal transitions are ignored and reported.
    pub fn advance(&mut self, next: DeploymentState) -> bool {
        if !self.state.can_transition_to(&next) {
            tracing::error!(from = ?self.state, to = ?next, "Illegal deployment transition");
            return false;
        }
        self.state = next;
        self.history.push(next);
        true
    }
}
