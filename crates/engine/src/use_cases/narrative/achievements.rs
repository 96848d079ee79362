//! Check achievements use case - re-evaluates milestone thresholds.

use std::sync::Arc;

use storyweave_domain::{AchievementId, UserId};

use crate::infrastructure::app_settings::NarrativeSettings;
use crate::infrastructure::ports::{Achievement, AchievementPort, NarrativeStateRepo};

use super::error::NarrativeError;
use super::progression::milestone_achievements;

/// Grants every milestone achievement the user currently qualifies for.
///
/// Transitions already queue milestone grants as they happen; this use
/// case exists for out-of-band sweeps (settings changed, backfill after
/// an outage) and is safe to repeat because the port reports
/// already-held grants as `None`.
pub struct CheckAchievements {
    settings: Arc<NarrativeSettings>,
    state_repo: Arc<dyn NarrativeStateRepo>,
    achievements: Arc<dyn AchievementPort>,
}

impl CheckAchievements {
    pub fn new(
        settings: Arc<NarrativeSettings>,
        state_repo: Arc<dyn NarrativeStateRepo>,
        achievements: Arc<dyn AchievementPort>,
    ) -> Self {
        Self {
            settings,
            state_repo,
            achievements,
        }
    }

    /// Returns only achievements granted by this call.
    pub async fn execute(&self, user_id: UserId) -> Result<Vec<Achievement>, NarrativeError> {
        let Some(state) = self.state_repo.get(user_id).await? else {
            return Ok(Vec::new());
        };

        let mut earned = milestone_achievements(&self.settings, &state);
        if state.completion_percent >= 100.0 {
            if let Some(story_id) = &state.active_story {
                earned.push(AchievementId::new(format!(
                    "{}{}",
                    self.settings.completion_achievement_prefix, story_id
                )));
            }
        }

        let mut granted = Vec::new();
        for id in earned {
            match self.achievements.grant(user_id, &id).await {
                Ok(Some(achievement)) => granted.push(achievement),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(
                        user_id = %user_id,
                        achievement_id = %id,
                        error = %error,
                        "Achievement sweep grant failed"
                    );
                }
            }
        }

        if !granted.is_empty() {
            tracing::info!(
                user_id = %user_id,
                granted = granted.len(),
                "Achievement sweep granted new achievements"
            );
        }

        Ok(granted)
    }
}
