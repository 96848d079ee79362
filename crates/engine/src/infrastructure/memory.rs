//! In-memory reference implementation of the narrative state store.
//!
//! Storage is an abstract port; this adapter backs tests, local runs, and
//! any embedding that does its own durability elsewhere. State and the
//! decision log live behind one lock so `commit` stays atomic.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use storyweave_domain::{FragmentId, UserDecision, UserId, UserNarrativeState};

use crate::infrastructure::ports::{NarrativeStateRepo, RepoError};

#[derive(Default)]
struct Tables {
    states: HashMap<UserId, UserNarrativeState>,
    /// Append-only, insertion order == chronological order.
    decisions: Vec<UserDecision>,
}

/// HashMap-backed store; suitable for tests and single-process use.
#[derive(Default)]
pub struct InMemoryStateRepo {
    tables: RwLock<Tables>,
}

impl InMemoryStateRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of decision rows across all users (test inspection).
    pub async fn decision_count(&self) -> usize {
        self.tables.read().await.decisions.len()
    }
}

#[async_trait]
impl NarrativeStateRepo for InMemoryStateRepo {
    async fn get(&self, user_id: UserId) -> Result<Option<UserNarrativeState>, RepoError> {
        Ok(self.tables.read().await.states.get(&user_id).cloned())
    }

    async fn commit<'a>(
        &self,
        state: &'a UserNarrativeState,
        decision: Option<&'a UserDecision>,
    ) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.states.insert(state.user_id, state.clone());
        if let Some(decision) = decision {
            tables.decisions.push(decision.clone());
        }
        Ok(())
    }

    async fn list_decisions(
        &self,
        user_id: UserId,
        fragment_filter: Option<HashSet<FragmentId>>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<UserDecision>, RepoError> {
        let tables = self.tables.read().await;
        let page = tables
            .decisions
            .iter()
            .rev()
            .filter(|d| d.user_id == user_id)
            .filter(|d| {
                fragment_filter
                    .as_ref()
                    .is_none_or(|filter| filter.contains(&d.fragment_id))
            })
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok(page)
    }

    async fn all_decisions(&self, user_id: UserId) -> Result<Vec<UserDecision>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .decisions
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }
}
