//! Story content loading.
//!
//! Stories are authored as JSON definition files, one story per file.
//! All files in the content directory are loaded at startup and handed to
//! [`StoryCatalog::new`], which validates the graphs.

use std::path::{Path, PathBuf};

use storyweave_domain::{CatalogError, Story, StoryCatalog};

/// Failure loading or validating authored story content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read content directory {dir}: {source}")]
    ReadDir {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read story file {file}: {source}")]
    ReadFile {
        file: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse story file {file}: {source}")]
    Parse {
        file: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid story content: {0}")]
    Invalid(#[from] CatalogError),
}

/// Load every `*.json` story definition under `dir`.
pub async fn load_stories(dir: impl AsRef<Path>) -> Result<Vec<Story>, ContentError> {
    let dir = dir.as_ref();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|source| {
        ContentError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        }
    })?;

    let mut stories = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|source| {
        ContentError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        }
    })? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let bytes = tokio::fs::read(&path).await.map_err(|source| {
            ContentError::ReadFile {
                file: path.clone(),
                source,
            }
        })?;
        let story: Story = serde_json::from_slice(&bytes).map_err(|source| {
            ContentError::Parse {
                file: path.clone(),
                source,
            }
        })?;
        tracing::debug!(story_id = %story.id, file = %path.display(), "Loaded story definition");
        stories.push(story);
    }

    // Directory iteration order is filesystem-dependent; keep catalogs
    // deterministic.
    stories.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(stories)
}

/// Load and validate a full catalog from a content directory.
pub async fn load_catalog(dir: impl AsRef<Path>) -> Result<StoryCatalog, ContentError> {
    let stories = load_stories(dir).await?;
    tracing::info!(story_count = stories.len(), "Story catalog loaded");
    Ok(StoryCatalog::new(stories)?)
}
