//! Post-commit side effects.
//!
//! Transitions queue collaborator work while they compute and run the
//! queue only after the state commit succeeds. A collaborator failure is
//! logged and swallowed; the committed transition stands.

use std::sync::Arc;

use storyweave_domain::{AchievementId, ChoiceId, FragmentId, LoreId, UserId, UserNarrativeState};

use crate::infrastructure::ports::{
    Achievement, AchievementPort, CheckpointPort, LorePort, MetricsPort, PointsPort,
};

/// One unit of collaborator work queued during a transition.
#[derive(Debug, Clone)]
pub enum PostCommitAction {
    GrantPoints(i64),
    GrantAchievement(AchievementId),
    UnlockLore(LoreId),
    SaveCheckpoint(UserNarrativeState),
    RecordVisit(FragmentId),
    RecordChoice(FragmentId, ChoiceId),
}

/// Executes queued post-commit actions against the collaborator ports.
pub struct PostCommitRunner {
    points: Arc<dyn PointsPort>,
    achievements: Arc<dyn AchievementPort>,
    lore: Arc<dyn LorePort>,
    metrics: Arc<dyn MetricsPort>,
    checkpoints: Arc<dyn CheckpointPort>,
}

impl PostCommitRunner {
    pub fn new(
        points: Arc<dyn PointsPort>,
        achievements: Arc<dyn AchievementPort>,
        lore: Arc<dyn LorePort>,
        metrics: Arc<dyn MetricsPort>,
        checkpoints: Arc<dyn CheckpointPort>,
    ) -> Self {
        Self {
            points,
            achievements,
            lore,
            metrics,
            checkpoints,
        }
    }

    /// Run every action in queue order, returning the achievements that
    /// were actually granted (already-held ones come back `None` from the
    /// port and are skipped).
    pub async fn run(&self, user_id: UserId, actions: Vec<PostCommitAction>) -> Vec<Achievement> {
        let mut granted = Vec::new();

        for action in actions {
            match action {
                PostCommitAction::GrantPoints(amount) => {
                    if let Err(error) = self.points.grant(user_id, amount).await {
                        tracing::warn!(
                            user_id = %user_id,
                            amount,
                            error = %error,
                            "Point grant failed after commit"
                        );
                    }
                }
                PostCommitAction::GrantAchievement(id) => {
                    match self.achievements.grant(user_id, &id).await {
                        Ok(Some(achievement)) => granted.push(achievement),
                        Ok(None) => {}
                        Err(error) => {
                            tracing::warn!(
                                user_id = %user_id,
                                achievement_id = %id,
                                error = %error,
                                "Achievement grant failed after commit"
                            );
                        }
                    }
                }
                PostCommitAction::UnlockLore(code) => {
                    if let Err(error) = self.lore.unlock(user_id, &code).await {
                        tracing::warn!(
                            user_id = %user_id,
                            lore_id = %code,
                            error = %error,
                            "Lore unlock failed after commit"
                        );
                    }
                }
                PostCommitAction::SaveCheckpoint(state) => {
                    if let Err(error) = self.checkpoints.save(user_id, &state).await {
                        tracing::warn!(
                            user_id = %user_id,
                            error = %error,
                            "Checkpoint save failed after commit"
                        );
                    }
                }
                PostCommitAction::RecordVisit(fragment) => {
                    if let Err(error) = self.metrics.record_fragment_visit(&fragment).await {
                        tracing::warn!(
                            fragment_id = %fragment,
                            error = %error,
                            "Visit metric failed after commit"
                        );
                    }
                }
                PostCommitAction::RecordChoice(fragment, choice) => {
                    if let Err(error) = self.metrics.record_choice(&fragment, &choice).await {
                        tracing::warn!(
                            fragment_id = %fragment,
                            choice_id = %choice,
                            error = %error,
                            "Choice metric failed after commit"
                        );
                    }
                }
            }
        }

        granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        CollaboratorError, MockAchievementPort, MockCheckpointPort, MockLorePort, MockMetricsPort,
        MockPointsPort,
    };
    use mockall::predicate::*;

    fn runner(
        points: MockPointsPort,
        achievements: MockAchievementPort,
        lore: MockLorePort,
        metrics: MockMetricsPort,
        checkpoints: MockCheckpointPort,
    ) -> PostCommitRunner {
        PostCommitRunner::new(
            Arc::new(points),
            Arc::new(achievements),
            Arc::new(lore),
            Arc::new(metrics),
            Arc::new(checkpoints),
        )
    }

    #[tokio::test]
    async fn runs_every_action_and_collects_new_achievements() {
        let mut points = MockPointsPort::new();
        points
            .expect_grant()
            .with(eq(UserId::new(1)), eq(25))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut achievements = MockAchievementPort::new();
        achievements
            .expect_grant()
            .with(eq(UserId::new(1)), eq(AchievementId::new("first_story")))
            .times(1)
            .returning(|_, id| {
                Ok(Some(Achievement {
                    id: id.clone(),
                    name: "First Story".into(),
                }))
            });

        let mut metrics = MockMetricsPort::new();
        metrics
            .expect_record_fragment_visit()
            .with(eq(FragmentId::new("f1")))
            .times(1)
            .returning(|_| Ok(()));

        let runner = runner(
            points,
            achievements,
            MockLorePort::new(),
            metrics,
            MockCheckpointPort::new(),
        );

        let granted = runner
            .run(
                UserId::new(1),
                vec![
                    PostCommitAction::GrantPoints(25),
                    PostCommitAction::GrantAchievement(AchievementId::new("first_story")),
                    PostCommitAction::RecordVisit(FragmentId::new("f1")),
                ],
            )
            .await;

        assert_eq!(granted.len(), 1);
        assert_eq!(granted[0].id, AchievementId::new("first_story"));
    }

    #[tokio::test]
    async fn already_held_achievements_are_not_reported() {
        let mut achievements = MockAchievementPort::new();
        achievements.expect_grant().returning(|_, _| Ok(None));

        let runner = runner(
            MockPointsPort::new(),
            achievements,
            MockLorePort::new(),
            MockMetricsPort::new(),
            MockCheckpointPort::new(),
        );

        let granted = runner
            .run(
                UserId::new(1),
                vec![PostCommitAction::GrantAchievement(AchievementId::new(
                    "first_story",
                ))],
            )
            .await;

        assert!(granted.is_empty());
    }

    #[tokio::test]
    async fn one_failing_collaborator_does_not_stop_the_rest() {
        let mut points = MockPointsPort::new();
        points
            .expect_grant()
            .returning(|_, _| Err(CollaboratorError::new("points", "service down")));

        let mut lore = MockLorePort::new();
        lore.expect_unlock()
            .with(eq(UserId::new(1)), eq(LoreId::new("lore_1")))
            .times(1)
            .returning(|_, _| Ok(()));

        let runner = runner(
            points,
            MockAchievementPort::new(),
            lore,
            MockMetricsPort::new(),
            MockCheckpointPort::new(),
        );

        runner
            .run(
                UserId::new(1),
                vec![
                    PostCommitAction::GrantPoints(10),
                    PostCommitAction::UnlockLore(LoreId::new("lore_1")),
                ],
            )
            .await;
    }
}
