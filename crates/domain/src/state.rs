//! Per-user narrative state and the append-only decision log.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{ChoiceId, DecisionId, FragmentId, ItemId, StoryId, UserId};

/// Persistent per-user cursor into the story graph.
///
/// The only mutable, durable entity in the narrative core. `fragments_visited`
/// records traversal order (duplicates suppressed on append) and is also
/// searched positionally by the go-back operation; see [`Self::back_target`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserNarrativeState {
    pub user_id: UserId,
    pub active_story: Option<StoryId>,
    pub current_fragment: Option<FragmentId>,
    pub current_chapter: u32,
    pub fragments_visited: Vec<FragmentId>,
    /// Character name -> relationship score; unknown characters read as 0.
    pub relationship_scores: BTreeMap<String, i32>,
    /// Free-form story flags (key -> JSON value).
    pub story_flags: serde_json::Map<String, Value>,
    pub total_decisions_made: u32,
    /// Derived: distinct visited fragments over story size, 0-100.
    pub completion_percent: f32,
    pub started_at: DateTime<Utc>,
    pub last_interaction_at: DateTime<Utc>,
    pub vip_story_unlocked: bool,
}

impl UserNarrativeState {
    /// Fresh state for a user who has not started any story.
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            active_story: None,
            current_fragment: None,
            current_chapter: 0,
            fragments_visited: Vec::new(),
            relationship_scores: BTreeMap::new(),
            story_flags: serde_json::Map::new(),
            total_decisions_made: 0,
            completion_percent: 0.0,
            started_at: now,
            last_interaction_at: now,
            vip_story_unlocked: false,
        }
    }

    /// Reset the cursor to the start of a story. Visited history restarts
    /// at the starting fragment; flags and relationships carry over.
    pub fn begin_story(&mut self, story: StoryId, start: FragmentId, chapter: u32) {
        self.active_story = Some(story);
        self.current_fragment = Some(start.clone());
        self.current_chapter = chapter;
        self.fragments_visited = vec![start];
        self.completion_percent = 0.0;
    }

    /// Move the cursor onto a fragment, appending it to the visited list
    /// unless already present.
    pub fn advance_to(&mut self, fragment: FragmentId, chapter: u32) {
        if !self.fragments_visited.contains(&fragment) {
            self.fragments_visited.push(fragment.clone());
        }
        self.current_fragment = Some(fragment);
        self.current_chapter = chapter;
    }

    /// The fragment immediately preceding the current position in the
    /// visited list, if any.
    ///
    /// When the current fragment appears more than once (revisit after a
    /// go-back), the last occurrence is used, so repeated go-backs walk
    /// toward the start of the history rather than oscillating.
    pub fn back_target(&self) -> Option<&FragmentId> {
        let current = self.current_fragment.as_ref()?;
        let position = self.fragments_visited.iter().rposition(|f| f == current)?;
        if position == 0 {
            return None;
        }
        self.fragments_visited.get(position - 1)
    }

    /// Add a signed delta to a character's relationship score (missing
    /// scores read as 0).
    pub fn adjust_relationship(&mut self, character: &str, delta: i32) {
        *self.relationship_scores.entry(character.to_string()).or_insert(0) += delta;
    }

    /// Shallow-merge flags: new keys added, existing keys overwritten.
    pub fn merge_flags(&mut self, flags: &serde_json::Map<String, Value>) {
        for (key, value) in flags {
            self.story_flags.insert(key.clone(), value.clone());
        }
    }
}

/// One recorded user decision. Immutable once written; used for history
/// and statistics, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDecision {
    pub id: DecisionId,
    pub user_id: UserId,
    /// Fragment the choice was made from.
    pub fragment_id: FragmentId,
    pub choice_id: ChoiceId,
    /// Display text snapshot, kept stable even if content changes later.
    pub choice_text: String,
    pub chapter: u32,
    /// Points gained from this decision's effects.
    pub points_gained: i64,
    /// Items gained from this decision's effects.
    #[serde(default)]
    pub items_gained: Vec<ItemId>,
    pub made_at: DateTime<Utc>,
}

impl UserDecision {
    pub fn new(
        user_id: UserId,
        fragment_id: FragmentId,
        choice_id: ChoiceId,
        choice_text: impl Into<String>,
        chapter: u32,
        made_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DecisionId::new(),
            user_id,
            fragment_id,
            choice_id,
            choice_text: choice_text.into(),
            chapter,
            points_gained: 0,
            items_gained: Vec::new(),
            made_at,
        }
    }
}
