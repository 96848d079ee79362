//! Navigate next use case - follows a fragment's linear continuation.

use std::sync::Arc;

use storyweave_domain::{StoryCatalog, UserId};

use crate::infrastructure::app_settings::NarrativeSettings;
use crate::infrastructure::locks::UserLocks;
use crate::infrastructure::ports::{ClockPort, NarrativeStateRepo, UserFactsPort};

use super::error::NarrativeError;
use super::post_commit::PostCommitRunner;
use super::progression::{enter_fragment, facts_with_state_flags, Entry, Progression};

/// Advances along `next_fragment` from the current position.
///
/// Only valid on fragments without choices; decision fragments demand a
/// choice and terminal fragments have nowhere to go. The target
/// fragment's own entry requirements gate the move.
pub struct NavigateNext {
    catalog: Arc<StoryCatalog>,
    settings: Arc<NarrativeSettings>,
    state_repo: Arc<dyn NarrativeStateRepo>,
    user_facts: Arc<dyn UserFactsPort>,
    post_commit: Arc<PostCommitRunner>,
    locks: Arc<UserLocks>,
    clock: Arc<dyn ClockPort>,
}

impl NavigateNext {
    pub fn new(
        catalog: Arc<StoryCatalog>,
        settings: Arc<NarrativeSettings>,
        state_repo: Arc<dyn NarrativeStateRepo>,
        user_facts: Arc<dyn UserFactsPort>,
        post_commit: Arc<PostCommitRunner>,
        locks: Arc<UserLocks>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            catalog,
            settings,
            state_repo,
            user_facts,
            post_commit,
            locks,
            clock,
        }
    }

    pub async fn execute(&self, user_id: UserId) -> Result<Progression, NarrativeError> {
        let _guard = self.locks.acquire(user_id).await;

        let mut state = self
            .state_repo
            .get(user_id)
            .await?
            .ok_or(NarrativeError::NoActiveStory)?;
        let story_id = state
            .active_story
            .clone()
            .ok_or(NarrativeError::NoActiveStory)?;
        let current_id = state
            .current_fragment
            .clone()
            .ok_or(NarrativeError::NoActiveStory)?;

        let current = self
            .catalog
            .fragment(&story_id, &current_id)
            .ok_or_else(|| {
                tracing::error!(
                    user_id = %user_id,
                    fragment_id = %current_id,
                    "state cursor points at missing content"
                );
                NarrativeError::FragmentLoad(current_id.clone())
            })?;

        if !current.choices.is_empty() {
            return Err(NarrativeError::ChoiceRequired(current_id));
        }
        let next_id = current
            .next_fragment
            .clone()
            .ok_or(NarrativeError::NoNextFragment(current_id))?;

        let target = self
            .catalog
            .fragment(&story_id, &next_id)
            .ok_or_else(|| NarrativeError::FragmentLoad(next_id.clone()))?
            .clone();

        if let Some(requirements) = &target.requirements {
            let facts = self.user_facts.facts(user_id).await?;
            let check = requirements.check(&facts_with_state_flags(facts, &state));
            if !check.satisfied {
                return Err(NarrativeError::RequirementsNotMet {
                    missing: check.missing,
                });
            }
        }

        let now = self.clock.now();
        let outcome = enter_fragment(
            &self.catalog,
            &self.settings,
            &mut state,
            &story_id,
            &target,
            Entry::Advance,
            now,
        );

        self.state_repo.commit(&state, None).await?;

        tracing::info!(
            user_id = %user_id,
            fragment_id = %target.id,
            "Advanced to next fragment"
        );

        let new_achievements = self.post_commit.run(user_id, outcome.actions).await;

        Ok(Progression {
            fragment: target,
            state,
            new_achievements,
            story_completed: outcome.story_completed,
        })
    }
}
