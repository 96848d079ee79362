//! Shared fixtures for use-case tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use storyweave_domain::{
    Choice, Effects, Fragment, FragmentId, FragmentKind, Requirements, Rewards, Story,
    StoryCatalog, StoryId, UserDecision, UserFacts, UserId, UserNarrativeState, UserRole,
};

use crate::infrastructure::collaborators::{
    InMemoryAchievements, InMemoryLore, InMemoryMetrics, InMemoryPoints,
};
use crate::infrastructure::checkpoint::InMemoryCheckpoint;

use super::post_commit::PostCommitRunner;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Two stories: a five-fragment free story covering every fragment kind
/// and a single-fragment VIP story.
///
/// free: f1 -> f2 (decide: c_trust / c_gated) -> f3 (checkpoint)
///       -> f4 (decide: c_end, entry gated on trusted_lucien) -> f5 (ending)
pub fn catalog() -> StoryCatalog {
    let free = Story {
        id: StoryId::new("free"),
        title: "Shadows of the Manor".into(),
        requires_vip: false,
        start_fragment: FragmentId::new("f1"),
        fragments: vec![
            Fragment::narrative("f1", 1, "The gates creak open.").with_next("f2"),
            Fragment::decision(
                "f2",
                1,
                "Lucien offers his hand.",
                vec![
                    Choice::new("c_trust", "Trust Lucien", "f3").with_effects(
                        Effects::default()
                            .with_relationship("lucien", 5)
                            .with_flag("trusted_lucien", json!(true))
                            .with_item("silver_key")
                            .with_points(25),
                    ),
                    Choice::new("c_gated", "Slip past the guards", "f3")
                        .with_requirements(Requirements::default().with_min_level(5)),
                ],
            )
            .with_title("The Masquerade"),
            Fragment::narrative("f3", 2, "You rest in the gallery.")
                .with_kind(FragmentKind::Checkpoint)
                .with_next("f4")
                .with_rewards(Rewards {
                    lore_pieces: vec!["lore_1".into()],
                    ..Rewards::default()
                }),
            Fragment::decision(
                "f4",
                2,
                "The vault door waits.",
                vec![Choice::new("c_end", "Open the vault", "f5")],
            )
            .with_requirements(Requirements::default().with_flag("trusted_lucien", json!(true))),
            Fragment::narrative("f5", 2, "The manor falls silent.")
                .with_kind(FragmentKind::Ending),
        ],
    };

    let vip = Story {
        id: StoryId::new("vip"),
        title: "The Crimson Salon".into(),
        requires_vip: true,
        start_fragment: FragmentId::new("v1"),
        fragments: vec![
            Fragment::narrative("v1", 1, "Velvet curtains part.").with_kind(FragmentKind::Ending),
        ],
    };

    StoryCatalog::new(vec![free, vip]).expect("fixture stories are valid")
}

pub fn facts() -> UserFacts {
    UserFacts::default()
}

pub fn vip_facts() -> UserFacts {
    UserFacts {
        role: UserRole::Vip,
        ..UserFacts::default()
    }
}

/// State for user 1 standing on `fragment` of the free story, with the
/// straight-line path up to it already visited.
pub fn state_on(fragment: &str) -> UserNarrativeState {
    let path = ["f1", "f2", "f3", "f4", "f5"];
    let position = path
        .iter()
        .position(|id| *id == fragment)
        .expect("fragment on the straight-line path");

    let mut state = UserNarrativeState::new(UserId::new(1), fixed_now());
    state.begin_story(StoryId::new("free"), FragmentId::new("f1"), 1);
    for id in &path[1..=position] {
        let chapter = if *id == "f2" { 1 } else { 2 };
        state.advance_to(FragmentId::new(*id), chapter);
    }
    state
}

pub fn decision_at(fragment: &str, choice: &str, made_at: DateTime<Utc>) -> UserDecision {
    UserDecision::new(
        UserId::new(1),
        FragmentId::new(fragment),
        choice.into(),
        format!("choice {choice}"),
        1,
        made_at,
    )
}

/// Runner over fresh in-memory collaborators; tests that do not inspect
/// collaborator outcomes use this instead of wiring five mocks.
pub fn quiet_post_commit() -> Arc<PostCommitRunner> {
    Arc::new(PostCommitRunner::new(
        Arc::new(InMemoryPoints::new()),
        Arc::new(InMemoryAchievements::new()),
        Arc::new(InMemoryLore::new()),
        Arc::new(InMemoryMetrics::new()),
        Arc::new(InMemoryCheckpoint::new()),
    ))
}
