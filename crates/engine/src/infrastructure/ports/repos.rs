//! Store port for narrative state and the decision log.

use async_trait::async_trait;
use std::collections::HashSet;

use storyweave_domain::{FragmentId, UserDecision, UserId, UserNarrativeState};

use super::error::RepoError;

/// Persistent store for per-user narrative state and decisions.
///
/// `commit` is the sole durable side-effect boundary of a transition: the
/// state snapshot and the optional decision row must land atomically, or
/// not at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NarrativeStateRepo: Send + Sync {
    async fn get(&self, user_id: UserId) -> Result<Option<UserNarrativeState>, RepoError>;

    /// Persist the state snapshot and, when present, append the decision
    /// row in the same commit.
    async fn commit<'a>(
        &self,
        state: &'a UserNarrativeState,
        decision: Option<&'a UserDecision>,
    ) -> Result<(), RepoError>;

    /// Page through a user's decisions, newest first. When
    /// `fragment_filter` is present, only decisions made from those
    /// fragments are counted and returned.
    async fn list_decisions(
        &self,
        user_id: UserId,
        fragment_filter: Option<HashSet<FragmentId>>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<UserDecision>, RepoError>;

    /// Every decision the user ever made, for aggregation.
    async fn all_decisions(&self, user_id: UserId) -> Result<Vec<UserDecision>, RepoError>;
}
