//! Story catalog - immutable, in-memory lookup over loaded stories.
//!
//! Constructed once at startup from authored content and injected
//! explicitly (no ambient global lookup). All lookups are pure and
//! tolerate unknown ids by returning `None`; broken authored content is
//! rejected at construction time instead.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::ids::{ChoiceId, FragmentId, StoryId};
use crate::story::{Choice, Fragment, FragmentKind, Story};

/// Authored-content validation failure detected while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate story id: {0}")]
    DuplicateStory(StoryId),

    #[error("story {story}: duplicate fragment id: {fragment}")]
    DuplicateFragment { story: StoryId, fragment: FragmentId },

    #[error("story {story}: start fragment {fragment} does not exist")]
    MissingStartFragment { story: StoryId, fragment: FragmentId },

    #[error("story {story}: fragment {fragment} references unknown fragment {target}")]
    DanglingReference {
        story: StoryId,
        fragment: FragmentId,
        target: FragmentId,
    },

    #[error("story {story}: fragment {fragment} has both choices and next_fragment")]
    ConflictingExits { story: StoryId, fragment: FragmentId },

    #[error("story {story}: decision fragment {fragment} has no choices")]
    DecisionWithoutChoices { story: StoryId, fragment: FragmentId },

    #[error("story {story}: fragment {fragment} has duplicate choice id {choice}")]
    DuplicateChoice {
        story: StoryId,
        fragment: FragmentId,
        choice: ChoiceId,
    },
}

#[derive(Debug)]
struct StoryEntry {
    story: Story,
    fragments: HashMap<FragmentId, usize>,
}

/// Immutable directory of stories and their fragment graphs.
#[derive(Debug)]
pub struct StoryCatalog {
    stories: HashMap<StoryId, StoryEntry>,
}

impl StoryCatalog {
    /// Build a catalog, validating every story graph.
    pub fn new(stories: Vec<Story>) -> Result<Self, CatalogError> {
        let mut entries = HashMap::new();
        for story in stories {
            validate_story(&story)?;
            let fragments = story
                .fragments
                .iter()
                .enumerate()
                .map(|(index, fragment)| (fragment.id.clone(), index))
                .collect();
            let id = story.id.clone();
            if entries
                .insert(id.clone(), StoryEntry { story, fragments })
                .is_some()
            {
                return Err(CatalogError::DuplicateStory(id));
            }
        }
        Ok(Self { stories: entries })
    }

    pub fn story(&self, story_id: &StoryId) -> Option<&Story> {
        self.stories.get(story_id).map(|entry| &entry.story)
    }

    pub fn stories(&self) -> impl Iterator<Item = &Story> {
        self.stories.values().map(|entry| &entry.story)
    }

    /// The designated entry fragment, fixed per story.
    pub fn starting_fragment(&self, story_id: &StoryId) -> Option<&Fragment> {
        let entry = self.stories.get(story_id)?;
        self.fragment(story_id, &entry.story.start_fragment)
    }

    pub fn fragment(&self, story_id: &StoryId, fragment_id: &FragmentId) -> Option<&Fragment> {
        let entry = self.stories.get(story_id)?;
        let index = *entry.fragments.get(fragment_id)?;
        entry.story.fragments.get(index)
    }

    /// Resolve a choice only if it belongs to the given fragment.
    pub fn validate_choice(
        &self,
        story_id: &StoryId,
        fragment_id: &FragmentId,
        choice_id: &ChoiceId,
    ) -> Option<&Choice> {
        self.fragment(story_id, fragment_id)?.choice(choice_id)
    }

    /// Find a fragment in any story (used when resolving history entries
    /// without a story filter).
    pub fn fragment_anywhere(&self, fragment_id: &FragmentId) -> Option<&Fragment> {
        self.stories
            .values()
            .find_map(|entry| self.fragment(&entry.story.id, fragment_id))
    }

    /// Percentage of the story's fragments visited at least once.
    ///
    /// Distinct visited ids intersected with the story's fragments, over
    /// the story's fragment count. Saturates at 100; an empty or unknown
    /// story yields 0.
    pub fn completion_percent(&self, story_id: &StoryId, visited: &[FragmentId]) -> f32 {
        let Some(entry) = self.stories.get(story_id) else {
            return 0.0;
        };
        let total = entry.fragments.len();
        if total == 0 {
            return 0.0;
        }
        let distinct: HashSet<&FragmentId> = visited
            .iter()
            .filter(|id| entry.fragments.contains_key(*id))
            .collect();
        ((distinct.len() as f32 / total as f32) * 100.0).min(100.0)
    }
}

fn validate_story(story: &Story) -> Result<(), CatalogError> {
    let mut ids = HashSet::new();
    for fragment in &story.fragments {
        if !ids.insert(&fragment.id) {
            return Err(CatalogError::DuplicateFragment {
                story: story.id.clone(),
                fragment: fragment.id.clone(),
            });
        }
    }

    if !ids.contains(&story.start_fragment) {
        return Err(CatalogError::MissingStartFragment {
            story: story.id.clone(),
            fragment: story.start_fragment.clone(),
        });
    }

    for fragment in &story.fragments {
        if !fragment.choices.is_empty() && fragment.next_fragment.is_some() {
            return Err(CatalogError::ConflictingExits {
                story: story.id.clone(),
                fragment: fragment.id.clone(),
            });
        }

        if fragment.kind == FragmentKind::Decision && fragment.choices.is_empty() {
            return Err(CatalogError::DecisionWithoutChoices {
                story: story.id.clone(),
                fragment: fragment.id.clone(),
            });
        }

        if let Some(target) = &fragment.next_fragment {
            if !ids.contains(target) {
                return Err(CatalogError::DanglingReference {
                    story: story.id.clone(),
                    fragment: fragment.id.clone(),
                    target: target.clone(),
                });
            }
        }

        let mut choice_ids = HashSet::new();
        for choice in &fragment.choices {
            if !choice_ids.insert(&choice.id) {
                return Err(CatalogError::DuplicateChoice {
                    story: story.id.clone(),
                    fragment: fragment.id.clone(),
                    choice: choice.id.clone(),
                });
            }
            if !ids.contains(&choice.next_fragment) {
                return Err(CatalogError::DanglingReference {
                    story: story.id.clone(),
                    fragment: fragment.id.clone(),
                    target: choice.next_fragment.clone(),
                });
            }
        }
    }

    Ok(())
}
