//! Application composition.

use std::sync::Arc;

use storyweave_domain::StoryCatalog;

use crate::infrastructure::app_settings::NarrativeSettings;
use crate::infrastructure::locks::UserLocks;
use crate::infrastructure::ports::{
    AchievementPort, CheckpointPort, ClockPort, LorePort, MetricsPort, NarrativeStateRepo,
    PointsPort, UserFactsPort,
};
use crate::use_cases::narrative::{
    CheckAchievements, CurrentFragment, GetHistory, GetStats, GoBack, MakeChoice, NarrativeUseCases,
    NavigateNext, PostCommitRunner, StartStory,
};

/// Everything the engine consumes from the embedding application: the
/// state store plus the collaborator subsystems.
pub struct Ports {
    pub state_repo: Arc<dyn NarrativeStateRepo>,
    pub user_facts: Arc<dyn UserFactsPort>,
    pub points: Arc<dyn PointsPort>,
    pub achievements: Arc<dyn AchievementPort>,
    pub lore: Arc<dyn LorePort>,
    pub metrics: Arc<dyn MetricsPort>,
    pub checkpoints: Arc<dyn CheckpointPort>,
    pub clock: Arc<dyn ClockPort>,
}

/// Main application state: the wired narrative engine.
pub struct App {
    pub narrative: NarrativeUseCases,
}

impl App {
    /// Wire every use case against the catalog, settings, and ports.
    pub fn new(catalog: StoryCatalog, settings: NarrativeSettings, ports: Ports) -> Self {
        let catalog = Arc::new(catalog);
        let settings = Arc::new(settings);
        let locks = Arc::new(UserLocks::new());
        let post_commit = Arc::new(PostCommitRunner::new(
            ports.points,
            ports.achievements.clone(),
            ports.lore,
            ports.metrics,
            ports.checkpoints,
        ));

        let narrative = NarrativeUseCases {
            start_story: Arc::new(StartStory::new(
                catalog.clone(),
                settings.clone(),
                ports.state_repo.clone(),
                ports.user_facts.clone(),
                post_commit.clone(),
                locks.clone(),
                ports.clock.clone(),
            )),
            current_fragment: Arc::new(CurrentFragment::new(
                catalog.clone(),
                ports.state_repo.clone(),
            )),
            make_choice: Arc::new(MakeChoice::new(
                catalog.clone(),
                settings.clone(),
                ports.state_repo.clone(),
                ports.user_facts.clone(),
                post_commit.clone(),
                locks.clone(),
                ports.clock.clone(),
            )),
            navigate_next: Arc::new(NavigateNext::new(
                catalog.clone(),
                settings.clone(),
                ports.state_repo.clone(),
                ports.user_facts,
                post_commit,
                locks.clone(),
                ports.clock.clone(),
            )),
            go_back: Arc::new(GoBack::new(
                catalog.clone(),
                ports.state_repo.clone(),
                locks,
                ports.clock,
            )),
            history: Arc::new(GetHistory::new(
                catalog.clone(),
                settings.clone(),
                ports.state_repo.clone(),
            )),
            stats: Arc::new(GetStats::new(catalog, ports.state_repo.clone())),
            check_achievements: Arc::new(CheckAchievements::new(
                settings,
                ports.state_repo,
                ports.achievements,
            )),
        };

        Self { narrative }
    }
}
