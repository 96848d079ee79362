//! Current fragment use case - read-only view of the user's position.

use std::sync::Arc;

use storyweave_domain::{Fragment, StoryCatalog, UserId, UserNarrativeState};

use crate::infrastructure::ports::NarrativeStateRepo;

use super::error::NarrativeError;

/// The fragment a user currently stands on, paired with their state.
#[derive(Debug, Clone)]
pub struct CurrentView {
    pub fragment: Fragment,
    pub state: UserNarrativeState,
}

/// Resolves the user's current position without mutating anything.
pub struct CurrentFragment {
    catalog: Arc<StoryCatalog>,
    state_repo: Arc<dyn NarrativeStateRepo>,
}

impl CurrentFragment {
    pub fn new(catalog: Arc<StoryCatalog>, state_repo: Arc<dyn NarrativeStateRepo>) -> Self {
        Self {
            catalog,
            state_repo,
        }
    }

    pub async fn execute(&self, user_id: UserId) -> Result<CurrentView, NarrativeError> {
        let state = self
            .state_repo
            .get(user_id)
            .await?
            .ok_or(NarrativeError::NoActiveStory)?;
        let story_id = state
            .active_story
            .clone()
            .ok_or(NarrativeError::NoActiveStory)?;
        let fragment_id = state
            .current_fragment
            .clone()
            .ok_or(NarrativeError::NoActiveStory)?;

        let fragment = self
            .catalog
            .fragment(&story_id, &fragment_id)
            .ok_or_else(|| {
                tracing::error!(
                    user_id = %user_id,
                    fragment_id = %fragment_id,
                    "state cursor points at missing content"
                );
                NarrativeError::FragmentLoad(fragment_id.clone())
            })?
            .clone();

        Ok(CurrentView { fragment, state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockNarrativeStateRepo;
    use crate::use_cases::narrative::fixtures::{catalog, state_on};
    use storyweave_domain::FragmentId;

    fn use_case(state_repo: MockNarrativeStateRepo) -> CurrentFragment {
        CurrentFragment::new(Arc::new(catalog()), Arc::new(state_repo))
    }

    #[tokio::test]
    async fn returns_the_fragment_under_the_cursor() {
        let mut repo = MockNarrativeStateRepo::new();
        repo.expect_get().returning(|_| Ok(Some(state_on("f2"))));

        let view = use_case(repo).execute(UserId::new(1)).await.unwrap();

        assert_eq!(view.fragment.id, FragmentId::new("f2"));
        assert_eq!(view.fragment.choices.len(), 2);
        assert_eq!(view.state.current_fragment, Some(FragmentId::new("f2")));
    }

    #[tokio::test]
    async fn no_state_means_no_active_story() {
        let mut repo = MockNarrativeStateRepo::new();
        repo.expect_get().returning(|_| Ok(None));

        let result = use_case(repo).execute(UserId::new(1)).await;

        assert!(matches!(result, Err(NarrativeError::NoActiveStory)));
    }

    #[tokio::test]
    async fn cursor_on_retired_content_reports_fragment_load() {
        let mut repo = MockNarrativeStateRepo::new();
        repo.expect_get().returning(|_| {
            let mut state = state_on("f1");
            state.current_fragment = Some(FragmentId::new("removed"));
            Ok(Some(state))
        });

        let result = use_case(repo).execute(UserId::new(1)).await;

        assert!(matches!(result, Err(NarrativeError::FragmentLoad(_))));
    }
}
