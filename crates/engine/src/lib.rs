//! StoryWeave engine library.
//!
//! Application layer of the branching narrative engine: use cases over
//! the domain story graph, ports for storage and collaborator
//! subsystems, and reference adapters.
//!
//! ## Structure
//!
//! - `use_cases/` - Narrative operations (start, choose, navigate, stats)
//! - `infrastructure/` - Ports plus in-memory and file adapters
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// E2E flows over the in-memory adapters.
#[cfg(test)]
mod e2e_tests;

pub use app::{App, Ports};
