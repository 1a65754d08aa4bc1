//! Dashboard session state and its transitions.
//!
//! `DashboardState` is plain data; every change goes through [`reduce`].
//! `DashboardSession` owns one state plus its gate and drives the store
//! calls. It takes `&mut self` for every operation, so a caller that wraps
//! it in a mutex gets all store calls of a session serialized.

use std::sync::Arc;

use patterning_core::{AccessGate, GateState, PatternRecord};
use serde::Serialize;

use crate::error::ServiceError;
use crate::pattern_service::PatternService;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardState {
    pub gate: GateState,
    /// Newest first, exactly as the store returned them.
    pub patterns: Vec<PatternRecord>,
    /// Generation of the fetch currently in flight.
    pub fetching: Option<u64>,
    /// Id whose delete is currently in flight.
    pub deleting: Option<String>,
    pub last_error: Option<String>,
    #[serde(skip)]
    next_generation: u64,
    /// Ids deleted while the current fetch was in flight.
    #[serde(skip)]
    deleted_during_fetch: Vec<String>,
}

impl DashboardState {
    /// Generation the next fetch should be tagged with.
    #[must_use]
    pub const fn next_generation(&self) -> u64 {
        self.next_generation
    }

    /// Nothing to show and nothing loading.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty() && self.fetching.is_none()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.patterns.iter().any(|p| p.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    Unlocked,
    Locked,
    FetchStarted { generation: u64 },
    FetchSucceeded { generation: u64, patterns: Vec<PatternRecord> },
    FetchFailed { generation: u64, message: String },
    DeleteStarted { id: String },
    DeleteSucceeded { id: String },
    DeleteFailed { id: String, message: String },
}

/// Apply one event to the state.
///
/// - A fetch completion only lands if its generation is still the one in
///   flight; anything older is dropped.
/// - A successful fetch replaces the list wholesale, minus ids whose delete
///   succeeded after that fetch started.
/// - A failed fetch or delete leaves the list untouched.
/// - Locking keeps the list but abandons any in-flight fetch.
#[must_use]
pub fn reduce(mut state: DashboardState, event: DashboardEvent) -> DashboardState {
    match event {
        DashboardEvent::Unlocked => {
            state.gate = state.gate.after_attempt(true);
        },
        DashboardEvent::Locked => {
            state.gate = state.gate.after_lock();
            state.fetching = None;
            state.deleting = None;
            state.deleted_during_fetch.clear();
        },
        DashboardEvent::FetchStarted { generation } => {
            state.fetching = Some(generation);
            state.next_generation = state.next_generation.max(generation.saturating_add(1));
            state.deleted_during_fetch.clear();
        },
        DashboardEvent::FetchSucceeded { generation, mut patterns } => {
            if state.fetching == Some(generation) {
                let deleted = std::mem::take(&mut state.deleted_during_fetch);
                patterns.retain(|p| !deleted.contains(&p.id));
                state.patterns = patterns;
                state.fetching = None;
                state.last_error = None;
            }
        },
        DashboardEvent::FetchFailed { generation, message } => {
            if state.fetching == Some(generation) {
                state.fetching = None;
                state.deleted_during_fetch.clear();
                state.last_error = Some(message);
            }
        },
        DashboardEvent::DeleteStarted { id } => {
            state.deleting = Some(id);
        },
        DashboardEvent::DeleteSucceeded { id } => {
            state.patterns.retain(|p| p.id != id);
            if state.fetching.is_some() {
                state.deleted_during_fetch.push(id.clone());
            }
            if state.deleting.as_deref() == Some(id.as_str()) {
                state.deleting = None;
            }
            state.last_error = None;
        },
        DashboardEvent::DeleteFailed { id, message } => {
            if state.deleting.as_deref() == Some(id.as_str()) {
                state.deleting = None;
            }
            state.last_error = Some(message);
        },
    }
    state
}

/// Explicit answer to "delete this voicing? this cannot be undone".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed { Self::Confirmed } else { Self::Declined }
    }
}

pub struct DashboardSession {
    gate: AccessGate,
    state: DashboardState,
    patterns: Arc<PatternService>,
}

impl DashboardSession {
    #[must_use]
    pub fn new(gate: AccessGate, patterns: Arc<PatternService>) -> Self {
        Self { gate, state: DashboardState::default(), patterns }
    }

    #[must_use]
    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    #[must_use]
    pub fn patterns(&self) -> &[PatternRecord] {
        &self.state.patterns
    }

    #[must_use]
    pub const fn is_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    fn apply(&mut self, event: DashboardEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    fn ensure_unlocked(&self) -> Result<(), ServiceError> {
        if self.gate.is_unlocked() { Ok(()) } else { Err(ServiceError::Locked) }
    }

    /// Check the access code; on a match unlock and load the list once.
    ///
    /// A failed initial load does not undo the unlock: the error is kept in
    /// `last_error` and the operator can refresh.
    pub async fn unlock(&mut self, candidate: &str) -> Result<(), ServiceError> {
        if !self.gate.attempt_unlock(candidate) {
            return Err(ServiceError::GateRejected);
        }
        self.apply(DashboardEvent::Unlocked);
        tracing::info!("dashboard unlocked");
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "initial pattern load failed after unlock");
        }
        Ok(())
    }

    pub fn lock(&mut self) {
        self.gate.lock();
        self.apply(DashboardEvent::Locked);
        tracing::info!("dashboard locked");
    }

    /// Re-fetch and replace the whole list. Returns the new length.
    pub async fn refresh(&mut self) -> Result<usize, ServiceError> {
        self.ensure_unlocked()?;
        let generation = self.state.next_generation();
        self.apply(DashboardEvent::FetchStarted { generation });

        match self.patterns.fetch_recent().await {
            Ok(patterns) => {
                let count = patterns.len();
                self.apply(DashboardEvent::FetchSucceeded { generation, patterns });
                tracing::debug!(generation, count, "pattern list replaced");
                Ok(count)
            },
            Err(e) => {
                self.apply(DashboardEvent::FetchFailed { generation, message: e.to_string() });
                Err(e)
            },
        }
    }

    /// Delete one voicing after explicit confirmation.
    ///
    /// The record leaves the list only once the store confirms the delete.
    pub async fn delete(
        &mut self,
        id: &str,
        confirmation: Confirmation,
    ) -> Result<(), ServiceError> {
        self.ensure_unlocked()?;
        if confirmation == Confirmation::Declined {
            return Err(ServiceError::ConfirmationRequired);
        }

        self.apply(DashboardEvent::DeleteStarted { id: id.to_owned() });
        match self.patterns.delete_by_id(id).await {
            Ok(()) => {
                self.apply(DashboardEvent::DeleteSucceeded { id: id.to_owned() });
                tracing::info!(id, "voicing deleted");
                Ok(())
            },
            Err(e) => {
                self.apply(DashboardEvent::DeleteFailed {
                    id: id.to_owned(),
                    message: e.to_string(),
                });
                Err(e)
            },
        }
    }
}
