//! Story graph entities - stories, fragments, and choices.
//!
//! A story is a directed graph of fragments. Decision fragments branch
//! through choices; all other fragments either chain linearly through
//! `next_fragment` or terminate the chapter flow. These types are loaded
//! once at startup and never mutated by user activity.

use serde::{Deserialize, Serialize};

use crate::effects::Effects;
use crate::ids::{AchievementId, ChoiceId, FragmentId, LoreId, StoryId};
use crate::requirements::Requirements;

/// Kind of a story fragment, driving engine transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    /// Plain story content, advanced with `next_fragment`.
    Narrative,
    /// Presents choices; advanced by selecting one.
    Decision,
    /// Like narrative, but entering it triggers an extra durable snapshot.
    Checkpoint,
    /// Terminal fragment of a story branch.
    Ending,
}

/// Content granted for *arriving* at a fragment (distinct from choice
/// effects, which apply for *choosing*).
///
/// Each field is independently absent-or-present; an all-empty value
/// grants nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rewards {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<AchievementId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore_pieces: Vec<LoreId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unlock_fragments: Vec<FragmentId>,
}

impl Rewards {
    pub fn is_empty(&self) -> bool {
        self.points.is_none()
            && self.achievements.is_empty()
            && self.lore_pieces.is_empty()
            && self.unlock_fragments.is_empty()
    }
}

/// A labeled edge from a decision fragment to a target fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Unique within the owning fragment.
    pub id: ChoiceId,
    /// Display text, snapshotted onto decision records.
    pub text: String,
    /// Target fragment; must exist within the same story.
    pub next_fragment: FragmentId,
    /// Gate to *select* this choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,
    /// State mutations applied when this choice is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Effects>,
}

/// Atomic unit of story content; a node in the story graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Unique within the owning story.
    pub id: FragmentId,
    pub chapter: u32,
    pub kind: FragmentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
    /// Ordered choices; only meaningful when `kind` is `Decision`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    /// Linear successor for non-decision fragments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_fragment: Option<FragmentId>,
    /// Gate to *enter* this fragment (checked by forward navigation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,
    /// Granted on entering this fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards: Option<Rewards>,
}

impl Fragment {
    /// Look up a choice belonging to this fragment.
    pub fn choice(&self, choice_id: &ChoiceId) -> Option<&Choice> {
        self.choices.iter().find(|c| &c.id == choice_id)
    }

    /// Terminal within its chapter flow: no choices and no successor.
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty() && self.next_fragment.is_none()
    }
}

/// An authored story: metadata plus its fragment graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    #[serde(default)]
    pub requires_vip: bool,
    /// Designated entry fragment, fixed per story.
    pub start_fragment: FragmentId,
    pub fragments: Vec<Fragment>,
}

impl Story {
    pub fn fragment(&self, id: &FragmentId) -> Option<&Fragment> {
        self.fragments.iter().find(|f| &f.id == id)
    }
}

// Convenience constructors used by content fixtures and tests.
impl Fragment {
    pub fn narrative(id: impl Into<FragmentId>, chapter: u32, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            chapter,
            kind: FragmentKind::Narrative,
            title: None,
            body: body.into(),
            choices: Vec::new(),
            next_fragment: None,
            requirements: None,
            rewards: None,
        }
    }

    pub fn decision(
        id: impl Into<FragmentId>,
        chapter: u32,
        body: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Self {
        Self {
            choices,
            kind: FragmentKind::Decision,
            ..Self::narrative(id, chapter, body)
        }
    }

    pub fn with_kind(mut self, kind: FragmentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_next(mut self, next: impl Into<FragmentId>) -> Self {
        self.next_fragment = Some(next.into());
        self
    }

    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = Some(requirements);
        self
    }

    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = Some(rewards);
        self
    }
}

impl Choice {
    pub fn new(
        id: impl Into<ChoiceId>,
        text: impl Into<String>,
        next_fragment: impl Into<FragmentId>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            next_fragment: next_fragment.into(),
            requirements: None,
            effects: None,
        }
    }

    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = Some(requirements);
        self
    }

    pub fn with_effects(mut self, effects: Effects) -> Self {
        self.effects = Some(effects);
        self
    }
}
