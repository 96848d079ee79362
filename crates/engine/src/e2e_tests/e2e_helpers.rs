//! Shared harness for the E2E flows.

use std::sync::Arc;

use tokio::sync::RwLock;

use storyweave_domain::{UserFacts, UserId};

use crate::app::{App, Ports};
use crate::infrastructure::app_settings::NarrativeSettings;
use crate::infrastructure::checkpoint::InMemoryCheckpoint;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::collaborators::{
    InMemoryAchievements, InMemoryLore, InMemoryMetrics, InMemoryPoints,
};
use crate::infrastructure::memory::InMemoryStateRepo;
use crate::infrastructure::ports::{RepoError, UserFactsPort};
use crate::use_cases::narrative::fixtures::{catalog, fixed_now};

/// Facts adapter whose snapshot the test can swap mid-flow.
pub struct StubFacts {
    facts: RwLock<UserFacts>,
}

impl StubFacts {
    pub fn new(facts: UserFacts) -> Self {
        Self {
            facts: RwLock::new(facts),
        }
    }

    pub async fn set(&self, facts: UserFacts) {
        *self.facts.write().await = facts;
    }
}

#[async_trait::async_trait]
impl UserFactsPort for StubFacts {
    async fn facts(&self, _user_id: UserId) -> Result<UserFacts, RepoError> {
        Ok(self.facts.read().await.clone())
    }
}

/// Fully wired app over in-memory adapters, with handles kept for
/// inspection.
pub struct Harness {
    pub app: App,
    pub state_repo: Arc<InMemoryStateRepo>,
    pub facts: Arc<StubFacts>,
    pub points: Arc<InMemoryPoints>,
    pub achievements: Arc<InMemoryAchievements>,
    pub lore: Arc<InMemoryLore>,
    pub metrics: Arc<InMemoryMetrics>,
    pub checkpoints: Arc<InMemoryCheckpoint>,
}

pub fn harness() -> Harness {
    harness_with_settings(NarrativeSettings::default())
}

pub fn harness_with_settings(settings: NarrativeSettings) -> Harness {
    let state_repo = Arc::new(InMemoryStateRepo::new());
    let facts = Arc::new(StubFacts::new(UserFacts::default()));
    let points = Arc::new(InMemoryPoints::new());
    let achievements = Arc::new(InMemoryAchievements::new());
    let lore = Arc::new(InMemoryLore::new());
    let metrics = Arc::new(InMemoryMetrics::new());
    let checkpoints = Arc::new(InMemoryCheckpoint::new());

    let app = App::new(
        catalog(),
        settings,
        Ports {
            state_repo: state_repo.clone(),
            user_facts: facts.clone(),
            points: points.clone(),
            achievements: achievements.clone(),
            lore: lore.clone(),
            metrics: metrics.clone(),
            checkpoints: checkpoints.clone(),
            clock: Arc::new(FixedClock(fixed_now())),
        },
    );

    Harness {
        app,
        state_repo,
        facts,
        points,
        achievements,
        lore,
        metrics,
        checkpoints,
    }
}
