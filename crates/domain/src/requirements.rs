//! Requirement evaluation - predicates over user facts gating entry to
//! fragments and selection of choices.
//!
//! Evaluation is pure: no I/O, no mutation. Callers build a [`UserFacts`]
//! snapshot first so that gating stays deterministic and testable without
//! touching storage.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{AchievementId, ItemId};

/// Access role of the user on the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Free,
    Vip,
}

/// Read-only snapshot of user-derived facts used for gating.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFacts {
    pub role: UserRole,
    pub level: u32,
    pub points: i64,
    #[serde(default)]
    pub items: HashSet<ItemId>,
    #[serde(default)]
    pub achievements: HashSet<AchievementId>,
    /// Narrative story flags, free-form key -> value.
    #[serde(default)]
    pub story_flags: serde_json::Map<String, Value>,
}

impl UserFacts {
    pub fn is_vip(&self) -> bool {
        self.role == UserRole::Vip
    }
}

/// A requirement set: every present field must hold for the set to be
/// satisfied. An empty set trivially satisfies.
///
/// Flags use a BTreeMap so missing-reason order is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_points: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<AchievementId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub story_flags: BTreeMap<String, Value>,
}

/// Outcome of checking a requirement set against user facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementCheck {
    pub satisfied: bool,
    /// Human-readable reasons for each unmet requirement, in declaration
    /// order (level, points, items, achievements, flags).
    pub missing: Vec<String>,
}

impl Requirements {
    pub fn is_empty(&self) -> bool {
        self.min_level.is_none()
            && self.min_points.is_none()
            && self.items.is_empty()
            && self.achievements.is_empty()
            && self.story_flags.is_empty()
    }

    /// Evaluate this requirement set against a facts snapshot.
    pub fn check(&self, facts: &UserFacts) -> RequirementCheck {
        let mut missing = Vec::new();

        if let Some(min_level) = self.min_level {
            if facts.level < min_level {
                missing.push(format!("needs level {min_level}"));
            }
        }

        if let Some(min_points) = self.min_points {
            if facts.points < min_points {
                missing.push(format!("needs {min_points} points"));
            }
        }

        for item in &self.items {
            if !facts.items.contains(item) {
                missing.push(format!("needs item '{item}'"));
            }
        }

        for achievement in &self.achievements {
            if !facts.achievements.contains(achievement) {
                missing.push(format!("needs achievement '{achievement}'"));
            }
        }

        for (flag, expected) in &self.story_flags {
            if facts.story_flags.get(flag) != Some(expected) {
                missing.push(format!("story flag '{flag}' must be {expected}"));
            }
        }

        RequirementCheck {
            satisfied: missing.is_empty(),
            missing,
        }
    }

    pub fn with_min_level(mut self, level: u32) -> Self {
        self.min_level = Some(level);
        self
    }

    pub fn with_min_points(mut self, points: i64) -> Self {
        self.min_points = Some(points);
        self
    }

    pub fn with_item(mut self, item: impl Into<ItemId>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn with_achievement(mut self, achievement: impl Into<AchievementId>) -> Self {
        self.achievements.push(achievement.into());
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>, value: Value) -> Self {
        self.story_flags.insert(flag.into(), value);
        self
    }
}
