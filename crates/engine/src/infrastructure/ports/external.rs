//! Collaborator port traits (user facts, points, achievements, lore,
//! metrics, checkpoints).
//!
//! The engine consumes these subsystems through narrow contracts; apart
//! from `UserFactsPort` they are all auxiliary - invoked after the
//! primary commit, with failures logged and swallowed.

use async_trait::async_trait;

use storyweave_domain::{
    AchievementId, ChoiceId, FragmentId, LoreId, UserFacts, UserId, UserNarrativeState,
};

use super::error::{CollaboratorError, RepoError};

/// An achievement granted by the achievement collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
}

/// Read-only snapshot provider for requirement evaluation and the VIP gate.
///
/// Facts lookups go to primary storage, so they share the repo error shape
/// and a failure here fails the transition (unlike the auxiliary ports).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserFactsPort: Send + Sync {
    async fn facts(&self, user_id: UserId) -> Result<UserFacts, RepoError>;
}

/// Fire-and-forget point granting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointsPort: Send + Sync {
    async fn grant(&self, user_id: UserId, amount: i64) -> Result<(), CollaboratorError>;
}

/// Achievement granting; idempotence lives behind `grant` (returns `None`
/// when the user already holds the achievement).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementPort: Send + Sync {
    async fn has(&self, user_id: UserId, id: &AchievementId) -> Result<bool, CollaboratorError>;

    async fn grant(
        &self,
        user_id: UserId,
        id: &AchievementId,
    ) -> Result<Option<Achievement>, CollaboratorError>;
}

/// Fire-and-forget lore/hint unlocking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LorePort: Send + Sync {
    async fn unlock(&self, user_id: UserId, code: &LoreId) -> Result<(), CollaboratorError>;
}

/// Best-effort traversal counters; never block the main transition.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsPort: Send + Sync {
    async fn record_fragment_visit(&self, fragment: &FragmentId) -> Result<(), CollaboratorError>;

    async fn record_choice(
        &self,
        fragment: &FragmentId,
        choice: &ChoiceId,
    ) -> Result<(), CollaboratorError>;
}

/// Extra durable snapshot taken when a checkpoint fragment is entered.
///
/// Failure degrades only the "resume precisely here" guarantee, not the
/// correctness of the live state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckpointPort: Send + Sync {
    async fn save(
        &self,
        user_id: UserId,
        state: &UserNarrativeState,
    ) -> Result<(), CollaboratorError>;
}
