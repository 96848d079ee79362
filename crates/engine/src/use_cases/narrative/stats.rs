//! Get stats use case - aggregated view of a user's narrative activity.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use storyweave_domain::{FragmentKind, ItemId, StoryCatalog, StoryId, UserId};

use crate::infrastructure::ports::NarrativeStateRepo;

use super::error::NarrativeError;

/// Aggregates over the user's state and full decision log.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeStats {
    pub active_story: Option<StoryId>,
    pub current_chapter: u32,
    pub completion_percent: f32,
    pub total_decisions: u32,
    pub fragments_visited: usize,
    /// Visited fragments whose kind is `Ending`, across all stories.
    pub endings_reached: usize,
    /// Sum of points recorded on decisions.
    pub points_from_decisions: i64,
    /// Distinct items gained through decisions.
    pub items_collected: usize,
    pub relationship_scores: BTreeMap<String, i32>,
    pub play_time_hours: f64,
    pub started_at: DateTime<Utc>,
    pub last_played: DateTime<Utc>,
}

/// Computes stats; `None` for a user who never started a story.
pub struct GetStats {
    catalog: Arc<StoryCatalog>,
    state_repo: Arc<dyn NarrativeStateRepo>,
}

impl GetStats {
    pub fn new(catalog: Arc<StoryCatalog>, state_repo: Arc<dyn NarrativeStateRepo>) -> Self {
        Self {
            catalog,
            state_repo,
        }
    }

    pub async fn execute(&self, user_id: UserId) -> Result<Option<NarrativeStats>, NarrativeError> {
        let Some(state) = self.state_repo.get(user_id).await? else {
            return Ok(None);
        };

        let decisions = self.state_repo.all_decisions(user_id).await?;
        let points_from_decisions = decisions.iter().map(|d| d.points_gained).sum();
        let items_collected = decisions
            .iter()
            .flat_map(|d| d.items_gained.iter())
            .collect::<HashSet<&ItemId>>()
            .len();

        let endings_reached = state
            .fragments_visited
            .iter()
            .filter(|id| {
                self.catalog
                    .fragment_anywhere(id)
                    .is_some_and(|fragment| fragment.kind == FragmentKind::Ending)
            })
            .count();

        let play_time_hours = (state.last_interaction_at - state.started_at)
            .num_seconds()
            .max(0) as f64
            / 3600.0;

        Ok(Some(NarrativeStats {
            active_story: state.active_story.clone(),
            current_chapter: state.current_chapter,
            completion_percent: state.completion_percent,
            total_decisions: state.total_decisions_made,
            fragments_visited: state.fragments_visited.len(),
            endings_reached,
            points_from_decisions,
            items_collected,
            relationship_scores: state.relationship_scores.clone(),
            play_time_hours,
            started_at: state.started_at,
            last_played: state.last_interaction_at,
        }))
    }
}
