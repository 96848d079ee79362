//! Make choice use case - resolves a decision and advances the story.

use std::sync::Arc;

use storyweave_domain::{ChoiceId, StoryCatalog, UserDecision, UserId};

use crate::infrastructure::app_settings::NarrativeSettings;
use crate::infrastructure::locks::UserLocks;
use crate::infrastructure::ports::{ClockPort, NarrativeStateRepo, UserFactsPort};

use super::error::NarrativeError;
use super::post_commit::{PostCommitAction, PostCommitRunner};
use super::progression::{enter_fragment, facts_with_state_flags, Entry, Progression};

/// Resolves a choice on the user's current fragment.
///
/// The pipeline is: validate the choice belongs to the current fragment,
/// gate on its requirements, apply its effects to working copies, advance
/// onto the target fragment, then commit state and decision atomically.
/// Collaborator work queued along the way runs only after the commit. Any
/// failure before the commit leaves the stored state untouched.
pub struct MakeChoice {
    catalog: Arc<StoryCatalog>,
    settings: Arc<NarrativeSettings>,
    state_repo: Arc<dyn NarrativeStateRepo>,
    user_facts: Arc<dyn UserFactsPort>,
    post_commit: Arc<PostCommitRunner>,
    locks: Arc<UserLocks>,
    clock: Arc<dyn ClockPort>,
}

impl MakeChoice {
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

    pub async fn execute(
        &self,
        user_id: UserId,
        choice_id: &ChoiceId,
    ) -> Result<Progression, NarrativeError> {
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

        let choice = self
            .catalog
            .validate_choice(&story_id, &current_id, choice_id)
            .ok_or_else(|| NarrativeError::InvalidChoice {
                fragment: current_id.clone(),
                choice: choice_id.clone(),
            })?
            .clone();

        if let Some(requirements) = &choice.requirements {
            let facts = self.user_facts.facts(user_id).await?;
            let check = requirements.check(&facts_with_state_flags(facts, &state));
            if !check.satisfied {
                tracing::debug!(
                    user_id = %user_id,
                    choice_id = %choice_id,
                    missing = ?check.missing,
                    "Choice gated by requirements"
                );
                return Err(NarrativeError::RequirementsNotMet {
                    missing: check.missing,
                });
            }
        }

        let target = self
            .catalog
            .fragment(&story_id, &choice.next_fragment)
            .ok_or_else(|| NarrativeError::FragmentLoad(choice.next_fragment.clone()))?
            .clone();

        let now = self.clock.now();
        let mut decision = UserDecision::new(
            user_id,
            current_id.clone(),
            choice.id.clone(),
            choice.text.clone(),
            current.chapter,
            now,
        );

        if let Some(effects) = &choice.effects {
            effects.apply(&mut state, &mut decision);
        }
        state.total_decisions_made += 1;

        let mut outcome = enter_fragment(
            &self.catalog,
            &self.settings,
            &mut state,
            &story_id,
            &target,
            Entry::Advance,
            now,
        );
        outcome
            .actions
            .push(PostCommitAction::RecordChoice(current_id, choice.id.clone()));
        if self.settings.points_decision_made > 0 {
            outcome
                .actions
                .push(PostCommitAction::GrantPoints(self.settings.points_decision_made));
        }
        if decision.points_gained > 0 {
            outcome
                .actions
                .push(PostCommitAction::GrantPoints(decision.points_gained));
        }

        self.state_repo.commit(&state, Some(&decision)).await?;

        tracing::info!(
            user_id = %user_id,
            choice_id = %choice_id,
            fragment_id = %target.id,
            decisions = state.total_decisions_made,
            "Choice resolved"
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
