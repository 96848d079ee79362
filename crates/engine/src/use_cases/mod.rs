//! Use cases - application logic orchestrating domain types through ports.

pub mod narrative;
