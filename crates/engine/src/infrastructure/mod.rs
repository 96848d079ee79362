//! Infrastructure layer - adapters and implementations behind the ports
//!
//! This layer contains:
//! - Ports: trait seams the use cases depend on
//! - Memory: in-memory state repository for tests and single-process use
//! - Collaborators: in-memory points, achievements, lore, and metrics
//! - Checkpoint: JSON file checkpoint writer
//! - Content: story catalog loading from JSON files
//! - Locks: per-user mutual exclusion
//! - Settings: tunable point amounts and achievement thresholds
//! - Clock: system time abstraction for testability

pub mod app_settings;
pub mod checkpoint;
pub mod clock;
pub mod collaborators;
pub mod content;
pub mod locks;
pub mod memory;
pub mod ports;

// Re-export clock adapter
pub use clock::SystemClock;

// Re-export settings
pub use app_settings::{
    CompletionMilestone, DecisionMilestone, NarrativeSettings, RelationshipMilestone,
};

// Re-export reference adapters
pub use checkpoint::{FileCheckpoint, InMemoryCheckpoint};
pub use collaborators::{InMemoryAchievements, InMemoryLore, InMemoryMetrics, InMemoryPoints};
pub use content::{load_catalog, load_stories, ContentError};
pub use memory::InMemoryStateRepo;

// Re-export per-user locking
pub use locks::UserLocks;
