//! Differential comparison of compiled functions.
//!
//! Decides whether two versions of a compiled function are semantically
//! equivalent, tolerating differences introduced purely by recompilation:
//! renumbered structure fields, macro value changes, inlining decisions,
//! integer-width widening and structure-layout changes.
//!
//! The [`baseline`] module is the structural lock-step comparator
//! (position-based serial numbering); [`DiffComparator`] overrides and
//! extends it with recompilation-aware equivalence rules.

pub mod baseline;
mod config;
mod debug_info;
mod diff;

pub use config::*;
pub use debug_info::*;
pub use diff::*;
