//! Intermediate representation for semantic diffing of compiled modules.
//!
//! This crate provides the pure data model: types, constants, values,
//! instructions, basic blocks, functions and modules, plus a per-module
//! layout oracle and builder APIs. The comparison logic lives in
//! `irdiff-cmp`.

mod attrs;
mod builder;
mod function;
mod instr;
mod layout;
mod module;
mod types;
mod value;

pub use attrs::*;
pub use builder::*;
pub use function::*;
pub use instr::*;
pub use layout::*;
pub use module::*;
pub use types::*;
pub use value::*;
