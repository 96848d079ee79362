//! StoryWeave Engine - content check entry point.
//!
//! Loads a story directory, validates every graph, and prints a summary.
//! Chat frontends embed the library crate directly; this binary exists
//! so authors can check content before shipping it.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storyweave_engine::infrastructure::content::load_catalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyweave_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let content_dir =
        std::env::var("STORYWEAVE_CONTENT_DIR").unwrap_or_else(|_| "content".into());

    tracing::info!("Validating stories in {}", content_dir);
    let catalog = load_catalog(&content_dir).await?;

    for story in catalog.stories() {
        tracing::info!(
            story_id = %story.id,
            fragments = story.fragments.len(),
            requires_vip = story.requires_vip,
            "{}",
            story.title
        );
    }

    Ok(())
}
