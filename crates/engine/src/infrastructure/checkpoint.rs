//! Checkpoint adapters - extra durable snapshots on checkpoint fragments.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use storyweave_domain::{UserId, UserNarrativeState};

use crate::infrastructure::ports::{CheckpointPort, CollaboratorError};

/// Writes one JSON snapshot file per user under a base directory.
///
/// The snapshot is the full serialized state; a resume flow can load it
/// even if the primary store lost the tail of the session.
pub struct FileCheckpoint {
    base_dir: PathBuf,
}

impl FileCheckpoint {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, user_id: UserId) -> PathBuf {
        self.base_dir.join(format!("checkpoint_{user_id}.json"))
    }

    /// Load the latest snapshot for a user, if one exists.
    pub async fn load(&self, user_id: UserId) -> Result<Option<UserNarrativeState>, CollaboratorError> {
        let path = self.path_for(user_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CollaboratorError::new("checkpoint", e)),
        };
        let state =
            serde_json::from_slice(&bytes).map_err(|e| CollaboratorError::new("checkpoint", e))?;
        Ok(Some(state))
    }
}

#[async_trait]
impl CheckpointPort for FileCheckpoint {
    async fn save(
        &self,
        user_id: UserId,
        state: &UserNarrativeState,
    ) -> Result<(), CollaboratorError> {
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| CollaboratorError::new("checkpoint", e))?;
        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| CollaboratorError::new("checkpoint", e))?;
        tokio::fs::write(self.path_for(user_id), json)
            .await
            .map_err(|e| CollaboratorError::new("checkpoint", e))?;
        Ok(())
    }
}

/// Keeps the last snapshot per user in memory (tests).
#[derive(Default)]
pub struct InMemoryCheckpoint {
    saves: RwLock<Vec<(UserId, UserNarrativeState)>>,
}

impl InMemoryCheckpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots ever taken for a user (test inspection).
    pub async fn save_count(&self, user_id: UserId) -> usize {
        self.saves
            .read()
            .await
            .iter()
            .filter(|(user, _)| *user == user_id)
            .count()
    }

    pub async fn latest(&self, user_id: UserId) -> Option<UserNarrativeState> {
        self.saves
            .read()
            .await
            .iter()
            .rev()
            .find(|(user, _)| *user == user_id)
            .map(|(_, state)| state.clone())
    }
}

#[async_trait]
impl CheckpointPort for InMemoryCheckpoint {
    async fn save(
        &self,
        user_id: UserId,
        state: &UserNarrativeState,
    ) -> Result<(), CollaboratorError> {
        self.saves.write().await.push((user_id, state.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use storyweave_domain::{FragmentId, StoryId};

    fn state(user: i64) -> UserNarrativeState {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut state = UserNarrativeState::new(UserId::new(user), now);
        state.begin_story(StoryId::new("free"), FragmentId::new("f1"), 1);
        state
    }

    #[tokio::test]
    async fn file_checkpoint_round_trips_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let checkpoint = FileCheckpoint::new(dir.path());
        let snapshot = state(7);

        checkpoint
            .save(UserId::new(7), &snapshot)
            .await
            .expect("save");
        let loaded = checkpoint.load(UserId::new(7)).await.expect("load");
        assert_eq!(loaded, Some(snapshot));
    }

    #[tokio::test]
    async fn missing_snapshot_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let checkpoint = FileCheckpoint::new(dir.path());
        assert_eq!(checkpoint.load(UserId::new(1)).await.expect("load"), None);
    }

    #[tokio::test]
    async fn in_memory_checkpoint_counts_saves() {
        let checkpoint = InMemoryCheckpoint::new();
        checkpoint
            .save(UserId::new(1), &state(1))
            .await
            .expect("save");
        checkpoint
            .save(UserId::new(1), &state(1))
            .await
            .expect("save");
        assert_eq!(checkpoint.save_count(UserId::new(1)).await, 2);
        assert!(checkpoint.latest(UserId::new(1)).await.is_some());
    }
}
