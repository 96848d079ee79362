//! Get history use case - paginated view of a user's past decisions.

use std::collections::HashSet;
use std::sync::Arc;

use storyweave_domain::{StoryCatalog, StoryId, UserDecision, UserId};

use crate::infrastructure::app_settings::NarrativeSettings;
use crate::infrastructure::ports::NarrativeStateRepo;

use super::error::NarrativeError;

/// One decision with its fragment resolved back to display content.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub decision: UserDecision,
    /// Title of the fragment the decision was made from; falls back to
    /// the fragment id when the content was retired or has no title.
    pub fragment_title: String,
}

/// Pages through a user's decision log, newest first.
pub struct GetHistory {
    catalog: Arc<StoryCatalog>,
    settings: Arc<NarrativeSettings>,
    state_repo: Arc<dyn NarrativeStateRepo>,
}

impl GetHistory {
    pub fn new(
        catalog: Arc<StoryCatalog>,
        settings: Arc<NarrativeSettings>,
        state_repo: Arc<dyn NarrativeStateRepo>,
    ) -> Self {
        Self {
            catalog,
            settings,
            state_repo,
        }
    }

    /// When `story_filter` is set, only decisions made inside that story
    /// count toward the page. A `None` limit falls back to the configured
    /// page size.
    pub async fn execute(
        &self,
        user_id: UserId,
        story_filter: Option<&StoryId>,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<HistoryEntry>, NarrativeError> {
        let limit = limit.unwrap_or(self.settings.history_page_size);
        let fragment_filter = match story_filter {
            Some(story_id) => {
                let story = self
                    .catalog
                    .story(story_id)
                    .ok_or_else(|| NarrativeError::StoryNotFound(story_id.clone()))?;
                Some(
                    story
                        .fragments
                        .iter()
                        .map(|fragment| fragment.id.clone())
                        .collect::<HashSet<_>>(),
                )
            }
            None => None,
        };

        let decisions = self
            .state_repo
            .list_decisions(user_id, fragment_filter, limit, offset)
            .await?;

        Ok(decisions
            .into_iter()
            .map(|decision| {
                let fragment_title = self
                    .catalog
                    .fragment_anywhere(&decision.fragment_id)
                    .and_then(|fragment| fragment.title.clone())
                    .unwrap_or_else(|| decision.fragment_id.to_string());
                HistoryEntry {
                    decision,
                    fragment_title,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockNarrativeStateRepo;
    use crate::use_cases::narrative::fixtures::{catalog, decision_at, fixed_now};
    use mockall::predicate::*;
    use storyweave_domain::FragmentId;

    fn use_case(state_repo: MockNarrativeStateRepo) -> GetHistory {
        GetHistory::new(
            Arc::new(catalog()),
            Arc::new(NarrativeSettings::default()),
            Arc::new(state_repo),
        )
    }

    #[tokio::test]
    async fn resolves_titles_and_keeps_repo_order() {
        let mut repo = MockNarrativeStateRepo::new();
        repo.expect_list_decisions()
            .with(
                eq(UserId::new(1)),
                eq(None::<HashSet<FragmentId>>),
                eq(5usize),
                eq(0usize),
            )
            .times(1)
            .returning(|_, _, _, _| {
                Ok(vec![
                    decision_at("f2", "c_trust", fixed_now()),
                    decision_at("retired", "c_old", fixed_now()),
                ])
            });

        let entries = use_case(repo)
            .execute(UserId::new(1), None, Some(5), 0)
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].fragment_title, "The Masquerade");
        // Retired content falls back to the raw id.
        assert_eq!(entries[1].fragment_title, "retired");
    }

    #[tokio::test]
    async fn story_filter_narrows_to_that_story_s_fragments() {
        let mut repo = MockNarrativeStateRepo::new();
        repo.expect_list_decisions()
            .withf(|_, filter, _, _| {
                let filter = match filter {
                    Some(f) => f,
                    None => return false,
                };
                filter.contains(&FragmentId::new("f2")) && !filter.contains(&FragmentId::new("v1"))
            })
            .times(1)
            .returning(|_, _, _, _| Ok(Vec::new()));

        use_case(repo)
            .execute(UserId::new(1), Some(&StoryId::new("free")), Some(20), 0)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn default_page_size_comes_from_settings() {
        let mut repo = MockNarrativeStateRepo::new();
        repo.expect_list_decisions()
            .with(
                eq(UserId::new(1)),
                eq(None::<HashSet<FragmentId>>),
                eq(NarrativeSettings::default().history_page_size),
                eq(0usize),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(Vec::new()));

        use_case(repo)
            .execute(UserId::new(1), None, None, 0)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_story_filter_is_rejected() {
        let repo = MockNarrativeStateRepo::new();

        let result = use_case(repo)
            .execute(UserId::new(1), Some(&StoryId::new("missing")), Some(20), 0)
            .await;

        assert!(matches!(result, Err(NarrativeError::StoryNotFound(_))));
    }

    #[tokio::test]
    async fn empty_log_yields_an_empty_page() {
        let mut repo = MockNarrativeStateRepo::new();
        repo.expect_list_decisions()
            .returning(|_, _, _, _| Ok(Vec::new()));

        let entries = use_case(repo)
            .execute(UserId::new(1), None, Some(20), 0)
            .await
            .unwrap();

        assert!(entries.is_empty());
    }
}
