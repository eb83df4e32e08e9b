//! Semantic diffing of two compiled versions of a module.
//!
//! Drives the function-pair comparator from `irdiff-cmp` over whole
//! modules: function pairs are matched by name, and when a mismatch
//! looks like logic moved into a helper function, the helper is inlined
//! into its caller and the pair is compared again.

mod compare;
mod error;
mod inline;

pub use compare::*;
pub use error::*;
pub use inline::inline_call;
pub use irdiff_cmp::{CompareConfig, DebugInfo, Side};
