//! Engine E2E tests.
//!
//! These tests validate full narrative flows using:
//! - The in-memory state repo and collaborator adapters
//! - Complete App construction with all use cases
//!
//! Run with `cargo test -p storyweave-engine --lib e2e_tests`.

mod e2e_helpers;
