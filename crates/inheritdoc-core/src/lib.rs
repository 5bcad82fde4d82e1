//! Core types, documentation trees, and utilities for inheritdoc expansion.
//!
//! This crate provides the foundational types used across the other inheritdoc crates:
//! - Identity names, documentation targets, and member documentation
//! - An arena-backed documentation-comment tree
//! - Selector paths for scoping substitutions to a subtree
//! - Missing-reference report records
//! - Error types

pub mod errors;
pub mod report;
pub mod selector;
pub mod tree;
pub mod types;

pub use errors::*;
pub use report::*;
pub use selector::*;
pub use tree::*;
pub use types::*;
