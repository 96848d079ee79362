//! Go back use case - steps the cursor to the previously visited fragment.

use std::sync::Arc;

use storyweave_domain::{StoryCatalog, UserId};

use crate::infrastructure::locks::UserLocks;
use crate::infrastructure::ports::{ClockPort, NarrativeStateRepo};

use super::error::NarrativeError;
use super::progression::Progression;

/// Moves the cursor one step back along the visited path.
///
/// Going back is a review move, not an undo: visited history, decisions,
/// effects, and rewards all stand. Only the cursor (and chapter) change,
/// so stepping forward again re-walks the same graph without re-granting
/// anything that keys off first visits.
pub struct GoBack {
    catalog: Arc<StoryCatalog>,
    state_repo: Arc<dyn NarrativeStateRepo>,
    locks: Arc<UserLocks>,
    clock: Arc<dyn ClockPort>,
}

impl GoBack {
    pub fn new(
        catalog: Arc<StoryCatalog>,
        state_repo: Arc<dyn NarrativeStateRepo>,
        locks: Arc<UserLocks>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            catalog,
            state_repo,
            locks,
            clock,
        }
    }

    pub async fn execute(&self, user_id: UserId) -> Result<Progression, NarrativeError> {
        let _guard = self.locks.acquire(user_id).await;

        // With no story underway there is no path to step back along.
        let mut state = self
            .state_repo
            .get(user_id)
            .await?
            .ok_or(NarrativeError::CannotGoBack)?;
        let story_id = state
            .active_story
            .clone()
            .ok_or(NarrativeError::CannotGoBack)?;

        let target_id = state
            .back_target()
            .cloned()
            .ok_or(NarrativeError::CannotGoBack)?;
        let target = self
            .catalog
            .fragment(&story_id, &target_id)
            .ok_or_else(|| {
                tracing::error!(
                    user_id = %user_id,
                    fragment_id = %target_id,
                    "visited history names missing content"
                );
                NarrativeError::FragmentLoad(target_id.clone())
            })?
            .clone();

        state.current_fragment = Some(target_id);
        state.current_chapter = target.chapter;
        state.last_interaction_at = self.clock.now();

        self.state_repo.commit(&state, None).await?;

        tracing::info!(
            user_id = %user_id,
            fragment_id = %target.id,
            "Stepped back along the visited path"
        );

        Ok(Progression {
            fragment: target,
            state,
            new_achievements: Vec::new(),
            story_completed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockClockPort, MockNarrativeStateRepo};
    use crate::use_cases::narrative::fixtures::{catalog, fixed_now, state_on};
    use storyweave_domain::FragmentId;

    fn use_case(state_repo: MockNarrativeStateRepo) -> GoBack {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(fixed_now);

        GoBack::new(
            Arc::new(catalog()),
            Arc::new(state_repo),
            Arc::new(UserLocks::new()),
            Arc::new(clock),
        )
    }

    #[tokio::test]
    async fn steps_back_without_touching_history() {
        let mut repo = MockNarrativeStateRepo::new();
        repo.expect_get().returning(|_| Ok(Some(state_on("f3"))));
        repo.expect_commit()
            .withf(|state, decision| {
                state.current_fragment == Some(FragmentId::new("f2"))
                    && state.fragments_visited
                        == vec![
                            FragmentId::new("f1"),
                            FragmentId::new("f2"),
                            FragmentId::new("f3"),
                        ]
                    && decision.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let use_case = use_case(repo);
        let progression = use_case.execute(UserId::new(1)).await.unwrap();

        assert_eq!(progression.fragment.id, FragmentId::new("f2"));
        assert!(progression.new_achievements.is_empty());
    }

    #[tokio::test]
    async fn repeated_go_backs_walk_toward_the_start() {
        let mut repo = MockNarrativeStateRepo::new();
        repo.expect_get().returning(|_| {
            let mut state = state_on("f3");
            // Already stepped back once; cursor sits on f2, history intact.
            state.current_fragment = Some(FragmentId::new("f2"));
            Ok(Some(state))
        });
        repo.expect_commit().times(1).returning(|_, _| Ok(()));

        let use_case = use_case(repo);
        let progression = use_case.execute(UserId::new(1)).await.unwrap();

        assert_eq!(progression.fragment.id, FragmentId::new("f1"));
    }

    #[tokio::test]
    async fn at_the_start_there_is_nowhere_to_go() {
        let mut repo = MockNarrativeStateRepo::new();
        repo.expect_get().returning(|_| Ok(Some(state_on("f1"))));
        repo.expect_commit().times(0);

        let use_case = use_case(repo);
        let result = use_case.execute(UserId::new(1)).await;

        assert!(matches!(result, Err(NarrativeError::CannotGoBack)));
    }

    #[tokio::test]
    async fn missing_state_cannot_go_back() {
        let mut repo = MockNarrativeStateRepo::new();
        repo.expect_get().returning(|_| Ok(None));

        let use_case = use_case(repo);
        let result = use_case.execute(UserId::new(1)).await;

        assert!(matches!(result, Err(NarrativeError::CannotGoBack)));
    }
}
