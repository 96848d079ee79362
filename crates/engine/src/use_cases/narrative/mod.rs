//! Narrative use cases - the operations a chat frontend drives.
//!
//! Mutating operations (start, choose, next, back) run under the
//! per-user lock and commit through the state repo before any
//! collaborator work happens. Read operations (current, history, stats)
//! take no lock and mutate nothing.

mod achievements;
mod current_fragment;
mod error;
mod go_back;
mod history;
mod make_choice;
mod navigate_next;
mod post_commit;
mod progression;
mod start_story;
mod stats;

#[cfg(test)]
pub(crate) mod fixtures;

use std::sync::Arc;

pub use achievements::CheckAchievements;
pub use current_fragment::{CurrentFragment, CurrentView};
pub use error::NarrativeError;
pub use go_back::GoBack;
pub use history::{GetHistory, HistoryEntry};
pub use make_choice::MakeChoice;
pub use navigate_next::NavigateNext;
pub use post_commit::{PostCommitAction, PostCommitRunner};
pub use progression::{Progression, DISCOVERED_FRAGMENTS_FLAG};
pub use start_story::StartStory;
pub use stats::{GetStats, NarrativeStats};

/// All narrative operations, wired once in `App::new`.
pub struct NarrativeUseCases {
    pub start_story: Arc<StartStory>,
    pub current_fragment: Arc<CurrentFragment>,
    pub make_choice: Arc<MakeChoice>,
    pub navigate_next: Arc<NavigateNext>,
    pub go_back: Arc<GoBack>,
    pub history: Arc<GetHistory>,
    pub stats: Arc<GetStats>,
    pub check_achievements: Arc<CheckAchievements>,
}

