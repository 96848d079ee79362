//! Shared fragment-entry pipeline.
//!
//! Every forward transition (starting a story, making a choice, linear
//! navigation) ends by entering a fragment: move the cursor, bank the
//! fragment's rewards, recompute completion, and queue the collaborator
//! work that runs after commit. The pipeline only mutates the working
//! state copy; the caller commits it.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use storyweave_domain::{
    AchievementId, Fragment, FragmentKind, StoryCatalog, StoryId, UserFacts, UserNarrativeState,
};

use crate::infrastructure::app_settings::NarrativeSettings;
use crate::infrastructure::ports::Achievement;

use super::post_commit::PostCommitAction;

/// Story flag collecting fragment ids revealed by `unlock_fragments`
/// rewards.
pub const DISCOVERED_FRAGMENTS_FLAG: &str = "discovered_fragments";

/// Result of a successful narrative transition.
#[derive(Debug, Clone)]
pub struct Progression {
    /// The fragment the user now stands on.
    pub fragment: Fragment,
    /// The committed state snapshot.
    pub state: UserNarrativeState,
    /// Achievements newly granted by this transition.
    pub new_achievements: Vec<Achievement>,
    /// True when the entered fragment ends the story.
    pub story_completed: bool,
}

/// Facts used for gating combine the profile snapshot from the facts
/// port with the live story flags on the narrative state.
pub(crate) fn facts_with_state_flags(
    mut facts: UserFacts,
    state: &UserNarrativeState,
) -> UserFacts {
    for (key, value) in &state.story_flags {
        facts.story_flags.insert(key.clone(), value.clone());
    }
    facts
}

pub(crate) struct EnterOutcome {
    pub actions: Vec<PostCommitAction>,
    pub story_completed: bool,
}

/// How a fragment is being entered. Starting a story pins completion at
/// zero and grants no progress milestones; only forward progress after
/// the start moves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    Start,
    Advance,
}

/// Advance the working state onto `fragment` and queue its consequences.
pub(crate) fn enter_fragment(
    catalog: &StoryCatalog,
    settings: &NarrativeSettings,
    state: &mut UserNarrativeState,
    story_id: &StoryId,
    fragment: &Fragment,
    entry: Entry,
    now: DateTime<Utc>,
) -> EnterOutcome {
    let mut actions = Vec::new();

    state.advance_to(fragment.id.clone(), fragment.chapter);
    state.last_interaction_at = now;

    actions.push(PostCommitAction::RecordVisit(fragment.id.clone()));
    if settings.points_fragment_read > 0 {
        actions.push(PostCommitAction::GrantPoints(settings.points_fragment_read));
    }

    if let Some(rewards) = &fragment.rewards {
        if let Some(points) = rewards.points {
            actions.push(PostCommitAction::GrantPoints(points));
        }
        for achievement in &rewards.achievements {
            actions.push(PostCommitAction::GrantAchievement(achievement.clone()));
        }
        for lore in &rewards.lore_pieces {
            actions.push(PostCommitAction::UnlockLore(lore.clone()));
        }
        if !rewards.unlock_fragments.is_empty() {
            let entry = state
                .story_flags
                .entry(DISCOVERED_FRAGMENTS_FLAG)
                .or_insert_with(|| json!([]));
            if let Value::Array(discovered) = entry {
                for unlocked in &rewards.unlock_fragments {
                    let id = json!(unlocked.as_str());
                    if !discovered.contains(&id) {
                        discovered.push(id);
                    }
                }
            }
        }
    }

    match entry {
        Entry::Start => {
            state.completion_percent = 0.0;
        }
        Entry::Advance => {
            state.completion_percent =
                catalog.completion_percent(story_id, &state.fragments_visited);

            for achievement in milestone_achievements(settings, state) {
                actions.push(PostCommitAction::GrantAchievement(achievement));
            }
            if state.completion_percent >= 100.0 {
                actions.push(PostCommitAction::GrantAchievement(AchievementId::new(
                    format!("{}{}", settings.completion_achievement_prefix, story_id),
                )));
            }
        }
    }

    if fragment.kind == FragmentKind::Checkpoint {
        actions.push(PostCommitAction::SaveCheckpoint(state.clone()));
    }

    EnterOutcome {
        actions,
        story_completed: fragment.kind == FragmentKind::Ending,
    }
}

/// Milestone achievements the state currently qualifies for. The grant
/// path is idempotent, so re-queueing already-held ids is harmless.
pub(crate) fn milestone_achievements(
    settings: &NarrativeSettings,
    state: &UserNarrativeState,
) -> Vec<AchievementId> {
    let mut earned = Vec::new();

    for tier in &settings.decision_milestones {
        if state.total_decisions_made >= tier.min_decisions {
            earned.push(tier.achievement.clone());
        }
    }

    for tier in &settings.completion_milestones {
        if state.completion_percent >= tier.min_percent {
            earned.push(tier.achievement.clone());
        }
    }

    for tier in &settings.relationship_milestones {
        let score = state
            .relationship_scores
            .get(&tier.character)
            .copied()
            .unwrap_or(0);
        if score >= tier.min_score {
            earned.push(tier.achievement.clone());
        }
    }

    earned
}
