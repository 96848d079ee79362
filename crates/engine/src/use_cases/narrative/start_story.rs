//! Start story use case - begins (or restarts) a story for a user.

use std::sync::Arc;

use storyweave_domain::{StoryCatalog, StoryId, UserId, UserNarrativeState};

use crate::infrastructure::app_settings::NarrativeSettings;
use crate::infrastructure::locks::UserLocks;
use crate::infrastructure::ports::{ClockPort, NarrativeStateRepo, UserFactsPort};

use super::error::NarrativeError;
use super::post_commit::PostCommitRunner;
use super::progression::{enter_fragment, facts_with_state_flags, Entry, Progression};

/// Places the user on the story's designated start fragment.
///
/// Starting a story the user is already in restarts it: the cursor and
/// visited history reset, story flags and relationship scores carry over.
pub struct StartStory {
    catalog: Arc<StoryCatalog>,
    settings: Arc<NarrativeSettings>,
    state_repo: Arc<dyn NarrativeStateRepo>,
    user_facts: Arc<dyn UserFactsPort>,
    post_commit: Arc<PostCommitRunner>,
    locks: Arc<UserLocks>,
    clock: Arc<dyn ClockPort>,
}

impl StartStory {
    pub fn new(
        catalog: Arc<StoryCatalog>,
        settings: Arc<NarrativeSettings>,
        state_repo: Arc<dyn NarrativeStateRepo>,
        user_facts: Arc<dyn UserFactsPort>,
        post_commit: Arc<PostCommitRunner>,
        locks: Arc<UserLocks>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            catalog,
            settings,
            state_repo,
            user_facts,
            post_commit,
            locks,
            clock,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        story_id: &StoryId,
    ) -> Result<Progression, NarrativeError> {
        let _guard = self.locks.acquire(user_id).await;

        let story = self
            .catalog
            .story(story_id)
            .ok_or_else(|| NarrativeError::StoryNotFound(story_id.clone()))?;

        let now = self.clock.now();
        let mut state = self
            .state_repo
            .get(user_id)
            .await?
            .unwrap_or_else(|| UserNarrativeState::new(user_id, now));

        let facts = self.user_facts.facts(user_id).await?;
        if story.requires_vip && !facts.is_vip() {
            return Err(NarrativeError::AccessDenied(story_id.clone()));
        }

        let start = self
            .catalog
            .starting_fragment(story_id)
            .ok_or_else(|| NarrativeError::FragmentLoad(story.start_fragment.clone()))?
            .clone();

        if let Some(requirements) = &start.requirements {
            let check = requirements.check(&facts_with_state_flags(facts, &state));
            if !check.satisfied {
                return Err(NarrativeError::RequirementsNotMet {
                    missing: check.missing,
                });
            }
        }

        if story.requires_vip {
            // Bookkeeping only; access is re-checked against the role on
            // every start.
            state.vip_story_unlocked = true;
        }

        state.begin_story(story_id.clone(), start.id.clone(), start.chapter);
        let outcome = enter_fragment(
            &self.catalog,
            &self.settings,
            &mut state,
            story_id,
            &start,
            Entry::Start,
            now,
        );

        self.state_repo.commit(&state, None).await?;

        tracing::info!(
            user_id = %user_id,
            story_id = %story_id,
            fragment_id = %start.id,
            "Story started"
        );

        let new_achievements = self.post_commit.run(user_id, outcome.actions).await;

        Ok(Progression {
            fragment: start,
            state,
            new_achievements,
            story_completed: outcome.story_completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockClockPort, MockNarrativeStateRepo, MockUserFactsPort,
    };
    use crate::use_cases::narrative::fixtures::{catalog, facts, quiet_post_commit, vip_facts};
    use chrono::{TimeZone, Utc};
    use mockall::predicate::*;
    use storyweave_domain::{FragmentId, UserFacts};

    fn use_case(
        state_repo: MockNarrativeStateRepo,
        user_facts: MockUserFactsPort,
    ) -> StartStory {
        let mut clock = MockClockPort::new();
        clock
            .expect_now()
            .returning(|| Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());

        StartStory::new(
            Arc::new(catalog()),
            Arc::new(NarrativeSettings::default()),
            Arc::new(state_repo),
            Arc::new(user_facts),
            quiet_post_commit(),
            Arc::new(UserLocks::new()),
            Arc::new(clock),
        )
    }

    fn facts_port(facts: UserFacts) -> MockUserFactsPort {
        let mut port = MockUserFactsPort::new();
        port.expect_facts().returning(move |_| Ok(facts.clone()));
        port
    }

    #[tokio::test]
    async fn starting_places_the_user_on_the_start_fragment() {
        let mut state_repo = MockNarrativeStateRepo::new();
        state_repo.expect_get().returning(|_| Ok(None));
        state_repo
            .expect_commit()
            .withf(|state, decision| {
                state.current_fragment == Some(FragmentId::new("f1")) && decision.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let use_case = use_case(state_repo, facts_port(facts()));
        let progression = use_case
            .execute(UserId::new(1), &StoryId::new("free"))
            .await
            .unwrap();

        assert_eq!(progression.fragment.id, FragmentId::new("f1"));
        assert_eq!(
            progression.state.fragments_visited,
            vec![FragmentId::new("f1")]
        );
        assert!(!progression.story_completed);
    }

    #[tokio::test]
    async fn unknown_story_is_rejected_without_touching_state() {
        let mut state_repo = MockNarrativeStateRepo::new();
        state_repo.expect_commit().times(0);

        let use_case = use_case(state_repo, facts_port(facts()));
        let result = use_case
            .execute(UserId::new(1), &StoryId::new("missing"))
            .await;

        assert!(matches!(result, Err(NarrativeError::StoryNotFound(_))));
    }

    #[tokio::test]
    async fn vip_story_is_denied_to_free_users() {
        let mut state_repo = MockNarrativeStateRepo::new();
        state_repo.expect_get().returning(|_| Ok(None));
        state_repo.expect_commit().times(0);

        let use_case = use_case(state_repo, facts_port(facts()));
        let result = use_case.execute(UserId::new(1), &StoryId::new("vip")).await;

        assert!(matches!(result, Err(NarrativeError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn vip_story_opens_for_vip_users() {
        let mut state_repo = MockNarrativeStateRepo::new();
        state_repo.expect_get().returning(|_| Ok(None));
        state_repo
            .expect_commit()
            .times(1)
            .returning(|_, _| Ok(()));

        let use_case = use_case(state_repo, facts_port(vip_facts()));
        let progression = use_case
            .execute(UserId::new(1), &StoryId::new("vip"))
            .await
            .unwrap();

        assert_eq!(progression.fragment.id, FragmentId::new("v1"));
    }

    #[tokio::test]
    async fn vip_access_is_rechecked_even_after_a_previous_unlock() {
        let mut state_repo = MockNarrativeStateRepo::new();
        state_repo.expect_get().with(eq(UserId::new(1))).returning(|_| {
            let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
            let mut state = UserNarrativeState::new(UserId::new(1), now);
            state.vip_story_unlocked = true;
            Ok(Some(state))
        });
        state_repo.expect_commit().times(0);

        let use_case = use_case(state_repo, facts_port(facts()));
        let result = use_case.execute(UserId::new(1), &StoryId::new("vip")).await;

        assert!(matches!(result, Err(NarrativeError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn starting_commits_zero_completion() {
        let mut state_repo = MockNarrativeStateRepo::new();
        state_repo.expect_get().returning(|_| Ok(None));
        state_repo
            .expect_commit()
            .withf(|state, _| state.completion_percent == 0.0)
            .times(1)
            .returning(|_, _| Ok(()));

        let use_case = use_case(state_repo, facts_port(facts()));
        let progression = use_case
            .execute(UserId::new(1), &StoryId::new("free"))
            .await
            .unwrap();

        assert_eq!(progression.state.completion_percent, 0.0);
    }

    #[tokio::test]
    async fn restart_resets_the_cursor_but_keeps_relationships() {
        let mut state_repo = MockNarrativeStateRepo::new();
        state_repo.expect_get().returning(|_| {
            let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
            let mut state = UserNarrativeState::new(UserId::new(1), now);
            state.begin_story(StoryId::new("free"), FragmentId::new("f1"), 1);
            state.advance_to(FragmentId::new("f2"), 1);
            state.adjust_relationship("lucien", 5);
            state.total_decisions_made = 3;
            Ok(Some(state))
        });
        state_repo
            .expect_commit()
            .withf(|state, _| {
                state.fragments_visited == vec![FragmentId::new("f1")]
                    && state.relationship_scores.get("lucien") == Some(&5)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let use_case = use_case(state_repo, facts_port(facts()));
        use_case
            .execute(UserId::new(1), &StoryId::new("free"))
            .await
            .unwrap();
    }
}
