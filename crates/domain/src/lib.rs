//! StoryWeave domain - story graph types, requirement/effect rules, and
//! per-user narrative state.
//!
//! Everything here is pure and synchronous: the catalog is immutable
//! after construction, requirement checks and effect application operate
//! on in-memory snapshots, and all durable mutation happens behind the
//! engine's ports.

pub mod catalog;
pub mod effects;
pub mod ids;
pub mod requirements;
pub mod state;
pub mod story;

pub use catalog::{CatalogError, StoryCatalog};
pub use effects::Effects;
pub use ids::{
    AchievementId, ChoiceId, DecisionId, FragmentId, ItemId, LoreId, StoryId, UserId,
};
pub use requirements::{RequirementCheck, Requirements, UserFacts, UserRole};
pub use state::{UserDecision, UserNarrativeState};
pub use story::{Choice, Fragment, FragmentKind, Rewards, Story};
