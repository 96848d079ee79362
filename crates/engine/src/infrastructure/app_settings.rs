//! Narrative engine settings.
//!
//! Point amounts, paging, and achievement thresholds. Settings are a
//! plain serde record: the embedding application decides where they come
//! from (file, database, hardcoded defaults) and passes them in at
//! composition time.

use serde::{Deserialize, Serialize};

use storyweave_domain::AchievementId;

/// Relationship milestone: reaching `min_score` with `character` grants
/// `achievement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipMilestone {
    pub character: String,
    pub min_score: i32,
    pub achievement: AchievementId,
}

/// Decision-count milestone: making `min_decisions` decisions grants
/// `achievement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionMilestone {
    pub min_decisions: u32,
    pub achievement: AchievementId,
}

/// Completion milestone: reaching `min_percent` story completion grants
/// `achievement`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionMilestone {
    pub min_percent: f32,
    pub achievement: AchievementId,
}

/// Tunable engine behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeSettings {
    /// Points granted for reading a fragment (start-story and
    /// navigate-next transitions).
    pub points_fragment_read: i64,
    /// Points granted for making a decision.
    pub points_decision_made: i64,
    /// Default page size for decision history.
    pub history_page_size: usize,
    /// Decision-count achievement tiers.
    pub decision_milestones: Vec<DecisionMilestone>,
    /// Completion-percent achievement tiers.
    pub completion_milestones: Vec<CompletionMilestone>,
    /// Relationship-score achievement tiers.
    pub relationship_milestones: Vec<RelationshipMilestone>,
    /// Prefix for the per-story full-completion achievement; the story id
    /// is appended ("narrative_complete_free").
    pub completion_achievement_prefix: String,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            points_fragment_read: 5,
            points_decision_made: 10,
            history_page_size: 20,
            decision_milestones: vec![
                DecisionMilestone {
                    min_decisions: 10,
                    achievement: AchievementId::new("narrative_10_decisions"),
                },
                DecisionMilestone {
                    min_decisions: 50,
                    achievement: AchievementId::new("narrative_50_decisions"),
                },
            ],
            completion_milestones: vec![CompletionMilestone {
                min_percent: 25.0,
                achievement: AchievementId::new("narrative_25_percent"),
            }],
            relationship_milestones: Vec::new(),
            completion_achievement_prefix: "narrative_complete_".into(),
        }
    }
}
