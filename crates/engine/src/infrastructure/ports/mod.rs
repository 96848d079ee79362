//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is
//! concrete types. Ports exist for:
//! - The narrative state store (swap in-memory -> SQL/document store)
//! - Collaborator subsystems (points, achievements, lore, metrics,
//!   checkpoints) consumed through narrow contracts
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Store Ports
// =============================================================================
pub use repos::NarrativeStateRepo;

// =============================================================================
// Collaborator Ports
// =============================================================================
pub use external::{
    Achievement, AchievementPort, CheckpointPort, LorePort, MetricsPort, PointsPort,
    UserFactsPort,
};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{CollaboratorError, RepoError};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{
    MockAchievementPort, MockCheckpointPort, MockLorePort, MockMetricsPort, MockPointsPort,
    MockUserFactsPort,
};

#[cfg(test)]
pub use repos::MockNarrativeStateRepo;

#[cfg(test)]
pub use testing::MockClockPort;
