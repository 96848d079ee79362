//! Error type shared by the narrative use cases.

use storyweave_domain::{ChoiceId, FragmentId, StoryId};

use crate::infrastructure::ports::RepoError;

/// Failure of a narrative operation. Every variant maps to a message fit
/// for showing to the end user via [`NarrativeError::user_message`].
#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("story not found: {0}")]
    StoryNotFound(StoryId),

    #[error("story {0} is not available to this user")]
    AccessDenied(StoryId),

    #[error("user has no active story")]
    NoActiveStory,

    #[error("fragment {fragment} has no choice {choice}")]
    InvalidChoice {
        fragment: FragmentId,
        choice: ChoiceId,
    },

    #[error("requirements not met: {}", missing.join(", "))]
    RequirementsNotMet { missing: Vec<String> },

    #[error("fragment not found in active story: {0}")]
    FragmentLoad(FragmentId),

    #[error("fragment {0} requires a choice to continue")]
    ChoiceRequired(FragmentId),

    #[error("fragment {0} has no continuation")]
    NoNextFragment(FragmentId),

    #[error("already at the start of the visited path")]
    CannotGoBack,

    #[error(transparent)]
    Persistence(#[from] RepoError),
}

impl NarrativeError {
    /// Message safe to show to the end user. Storage details stay in the
    /// logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::StoryNotFound(_) => "That story does not exist.".into(),
            Self::AccessDenied(_) => "This story is not available to you yet.".into(),
            Self::NoActiveStory => "You have not started a story yet.".into(),
            Self::InvalidChoice { .. } => "That option is not available here.".into(),
            Self::RequirementsNotMet { missing } => {
                format!("You cannot do that yet: {}.", missing.join(", "))
            }
            Self::FragmentLoad(_) => "This part of the story could not be loaded.".into(),
            Self::ChoiceRequired(_) => "Pick one of the options to continue.".into(),
            Self::NoNextFragment(_) => "This branch of the story has ended.".into(),
            Self::CannotGoBack => "You are at the beginning, there is nowhere to go back to.".into(),
            Self::Persistence(_) => "Something went wrong saving your progress. Try again.".into(),
        }
    }
}
