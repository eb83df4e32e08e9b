//! Debug-info lookup tables.
//!
//! Built upstream from debug information; read-only during comparison.
//! Keyed per side because each module owns its own type and constant
//! arenas.

use irdiff_ir::{ConstId, ConstKind, Module, TypeId};
use rustc_hash::FxHashMap;

/// Which of the two compared modules a lookup refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The opposite side.
    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Lookup tables extracted from debug information: declared field names
/// of aggregate types and the textual form of macro/enumerator constants.
#[derive(Clone, Debug, Default)]
pub struct DebugInfo {
    field_names: FxHashMap<(Side, TypeId, u64), String>,
    macro_texts: FxHashMap<(Side, ConstId), String>,
}

impl DebugInfo {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the declared name of a field of an aggregate type.
    pub fn add_field_name(&mut self, side: Side, ty: TypeId, index: u64, name: &str) {
        self.field_names.insert((side, ty, index), name.to_string());
    }

    /// Record the textual form of the macro/enumerator a constant
    /// originated from.
    pub fn add_macro_text(&mut self, side: Side, constant: ConstId, text: &str) {
        self.macro_texts.insert((side, constant), text.to_string());
    }

    /// Declared name of a field, if known.
    pub fn field_name(&self, side: Side, ty: TypeId, index: u64) -> Option<&str> {
        self.field_names.get(&(side, ty, index)).map(String::as_str)
    }

    /// Recorded macro text of a constant, if known.
    pub fn macro_text(&self, side: Side, constant: ConstId) -> Option<&str> {
        self.macro_texts.get(&(side, constant)).map(String::as_str)
    }

    /// Textual form of a constant: its recorded macro text when known,
    /// otherwise its literal rendering.
    pub fn value_text(&self, side: Side, module: &Module, constant: ConstId) -> String {
        if let Some(text) = self.macro_text(side, constant) {
            return text.to_string();
        }
        match module.constant(constant).kind {
            ConstKind::Int { value, .. } => value.to_string(),
            ConstKind::Null => "null".to_string(),
            ConstKind::Undef => "undef".to_string(),
        }
    }
}
