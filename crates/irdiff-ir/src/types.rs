//! Type model.

/// Index of a type in a module's type arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Arena index as `usize`.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A type in the compiled-code representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    /// The empty type (function results with no value).
    Void,
    /// Basic block label type.
    Label,
    /// Integer type of a given bit width.
    Int { bits: u32 },
    /// Floating point type of a given bit width.
    Float { bits: u32 },
    /// Pointer type. The pointee is informational; structural comparison
    /// only looks at the address space.
    Ptr { pointee: TypeId, addr_space: u32 },
    /// Fixed-length array type.
    Array { elem: TypeId, len: u64 },
    /// Aggregate type: named, ordered sequence of typed fields.
    Struct {
        name: Option<String>,
        fields: Vec<TypeId>,
        packed: bool,
    },
    /// Function type.
    Function {
        ret: TypeId,
        params: Vec<TypeId>,
        varargs: bool,
    },
}

impl Type {
    /// Check if this is an integer type.
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int { .. })
    }

    /// Check if this is an aggregate (struct) type.
    pub const fn is_struct(&self) -> bool {
        matches!(self, Self::Struct { .. })
    }

    /// Check if this is an array type.
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Get the declared name of an aggregate type, if any.
    pub fn struct_name(&self) -> Option<&str> {
        match self {
            Self::Struct { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    /// Rank used by the structural comparator to order type kinds.
    pub const fn kind_rank(&self) -> u32 {
        match self {
            Self::Void => 0,
            Self::Label => 1,
            Self::Int { .. } => 2,
            Self::Float { .. } => 3,
            Self::Ptr { .. } => 4,
            Self::Array { .. } => 5,
            Self::Struct { .. } => 6,
            Self::Function { .. } => 7,
        }
    }
}
