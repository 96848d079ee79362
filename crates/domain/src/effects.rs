//! Effect application - mutations applied to narrative state as a
//! consequence of a choice.
//!
//! `apply` mutates working copies only; the caller decides whether the
//! result is committed. Point *granting* is a collaborator concern that
//! happens after commit - here points are only recorded on the decision.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::ItemId;
use crate::state::{UserDecision, UserNarrativeState};

/// Mutations applied when a choice is selected. All sub-effects of one
/// value apply together or not at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    /// Character -> signed delta added to the existing relationship score.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, i32>,
    /// Shallow-merged into the user's story flags.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub story_flags: serde_json::Map<String, Value>,
    /// Item identifiers granted, recorded on the decision.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemId>,
    /// Points granted, recorded on the decision and forwarded to the
    /// points collaborator after commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
            && self.story_flags.is_empty()
            && self.items.is_empty()
            && self.points.is_none()
    }

    /// Apply every sub-effect onto the working copies of the user's state
    /// and the decision record being built.
    pub fn apply(&self, state: &mut UserNarrativeState, decision: &mut UserDecision) {
        for (character, delta) in &self.relationships {
            state.adjust_relationship(character, *delta);
        }

        state.merge_flags(&self.story_flags);

        if !self.items.is_empty() {
            decision.items_gained = self.items.clone();
        }

        if let Some(points) = self.points {
            decision.points_gained = points;
        }
    }

    pub fn with_relationship(mut self, character: impl Into<String>, delta: i32) -> Self {
        self.relationships.insert(character.into(), delta);
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>, value: Value) -> Self {
        self.story_flags.insert(flag.into(), value);
        self
    }

    pub fn with_item(mut self, item: impl Into<ItemId>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn with_points(mut self, points: i64) -> Self {
        self.points = Some(points);
        self
    }
}
