//! In-memory collaborator adapters.
//!
//! Reference implementations of the auxiliary ports with inspectable
//! counters. They back the e2e tests and any embedding that wires the
//! real subsystems in later.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;
use tokio::sync::RwLock;

use storyweave_domain::{AchievementId, ChoiceId, FragmentId, LoreId, UserId};

use crate::infrastructure::ports::{
    Achievement, AchievementPort, CollaboratorError, LorePort, MetricsPort, PointsPort,
};

/// Accumulates granted points per user.
#[derive(Default)]
pub struct InMemoryPoints {
    totals: DashMap<UserId, i64>,
}

impl InMemoryPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self, user_id: UserId) -> i64 {
        self.totals.get(&user_id).map(|t| *t).unwrap_or(0)
    }
}

#[async_trait]
impl PointsPort for InMemoryPoints {
    async fn grant(&self, user_id: UserId, amount: i64) -> Result<(), CollaboratorError> {
        *self.totals.entry(user_id).or_insert(0) += amount;
        Ok(())
    }
}

/// Tracks held achievements per user; `grant` is a no-op for already-held
/// ids, which is where check-achievements idempotence comes from.
#[derive(Default)]
pub struct InMemoryAchievements {
    held: RwLock<HashSet<(UserId, AchievementId)>>,
}

impl InMemoryAchievements {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn holds(&self, user_id: UserId, id: &AchievementId) -> bool {
        self.held.read().await.contains(&(user_id, id.clone()))
    }
}

#[async_trait]
impl AchievementPort for InMemoryAchievements {
    async fn has(&self, user_id: UserId, id: &AchievementId) -> Result<bool, CollaboratorError> {
        Ok(self.held.read().await.contains(&(user_id, id.clone())))
    }

    async fn grant(
        &self,
        user_id: UserId,
        id: &AchievementId,
    ) -> Result<Option<Achievement>, CollaboratorError> {
        let mut held = self.held.write().await;
        if !held.insert((user_id, id.clone())) {
            return Ok(None);
        }
        Ok(Some(Achievement {
            id: id.clone(),
            name: id.as_str().to_string(),
        }))
    }
}

/// Records unlocked lore codes per user.
#[derive(Default)]
pub struct InMemoryLore {
    unlocked: RwLock<Vec<(UserId, LoreId)>>,
}

impl InMemoryLore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn unlocked_for(&self, user_id: UserId) -> Vec<LoreId> {
        self.unlocked
            .read()
            .await
            .iter()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, code)| code.clone())
            .collect()
    }
}

#[async_trait]
impl LorePort for InMemoryLore {
    async fn unlock(&self, user_id: UserId, code: &LoreId) -> Result<(), CollaboratorError> {
        self.unlocked.write().await.push((user_id, code.clone()));
        Ok(())
    }
}

/// Simple traversal counters keyed by fragment / (fragment, choice).
#[derive(Default)]
pub struct InMemoryMetrics {
    visits: DashMap<FragmentId, u64>,
    choices: DashMap<(FragmentId, ChoiceId), u64>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self, fragment: &FragmentId) -> u64 {
        self.visits.get(fragment).map(|v| *v).unwrap_or(0)
    }

    pub fn choices(&self, fragment: &FragmentId, choice: &ChoiceId) -> u64 {
        self.choices
            .get(&(fragment.clone(), choice.clone()))
            .map(|v| *v)
            .unwrap_or(0)
    }
}

#[async_trait]
impl MetricsPort for InMemoryMetrics {
    async fn record_fragment_visit(&self, fragment: &FragmentId) -> Result<(), CollaboratorError> {
        *self.visits.entry(fragment.clone()).or_insert(0) += 1;
        Ok(())
    }

    async fn record_choice(
        &self,
        fragment: &FragmentId,
        choice: &ChoiceId,
    ) -> Result<(), CollaboratorError> {
        *self
            .choices
            .entry((fragment.clone(), choice.clone()))
            .or_insert(0) += 1;
        Ok(())
    }
}
