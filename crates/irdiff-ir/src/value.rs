//! Values and constants.

use crate::types::TypeId;

/// Index of a constant in a module's constant arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstId(pub u32);

impl ConstId {
    /// Arena index as `usize`.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of an instruction in a function's instruction arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstId(pub u32);

impl InstId {
    /// Arena index as `usize`.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a basic block within a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// Block index as `usize`.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a function in a module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunId(pub u32);

impl FunId {
    /// Arena index as `usize`.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a global variable in a module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlobalId(pub u32);

impl GlobalId {
    /// Arena index as `usize`.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// An operand: a constant, an instruction result, an argument, a global
/// reference, a function reference or a block reference.
///
/// Identity for comparison purposes is positional (serial numbering), so
/// this is a small copyable index enum rather than a structural value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueRef {
    /// Function argument by position.
    Arg(u32),
    /// Result of an instruction.
    Inst(InstId),
    /// Literal constant.
    Const(ConstId),
    /// Global variable reference.
    Global(GlobalId),
    /// Function reference (e.g. a call's callee operand).
    Function(FunId),
    /// Basic block reference (branch targets, phi incoming blocks).
    Block(BlockId),
}

impl ValueRef {
    /// Check if this value is a constant for comparison purposes.
    /// Globals and function references count as constants; block
    /// references do not.
    pub const fn is_constant(self) -> bool {
        matches!(self, Self::Const(_) | Self::Global(_) | Self::Function(_))
    }

    /// Get the literal constant id, if this is one.
    pub const fn as_const(self) -> Option<ConstId> {
        match self {
            Self::Const(id) => Some(id),
            _ => None,
        }
    }

    /// Get the block id, if this is a block reference.
    pub const fn as_block(self) -> Option<BlockId> {
        match self {
            Self::Block(id) => Some(id),
            _ => None,
        }
    }
}

/// Payload of a literal constant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstKind {
    /// Integer constant. `value` holds the zero-extended numeric value.
    Int { bits: u32, value: u64 },
    /// Null pointer.
    Null,
    /// Undefined value.
    Undef,
}

impl ConstKind {
    /// Rank used by the structural comparator to order constant kinds.
    pub const fn kind_rank(&self) -> u32 {
        match self {
            Self::Int { .. } => 0,
            Self::Null => 1,
            Self::Undef => 2,
        }
    }

    /// Check if this constant is a zero or null value.
    pub const fn is_zero_value(&self) -> bool {
        matches!(self, Self::Null | Self::Int { value: 0, .. })
    }
}

/// A literal constant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constant {
    /// Type of the constant.
    pub ty: TypeId,
    /// Constant payload.
    pub kind: ConstKind,
}

impl Constant {
    /// Zero-extended integer value, if this is an integer or null constant.
    pub const fn int_value(&self) -> Option<u64> {
        match self.kind {
            ConstKind::Int { value, .. } => Some(value),
            ConstKind::Null => Some(0),
            ConstKind::Undef => None,
        }
    }
}

/// Integer comparison predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Predicate {
    Eq,
    Ne,
    Ugt,
    Uge,
    Ult,
    Ule,
    Sgt,
    Sge,
    Slt,
    Sle,
}

impl Predicate {
    /// The unsigned counterpart of this predicate. Sign-only differences
    /// are not meaningful for control flow.
    pub const fn unsigned(self) -> Self {
        match self {
            Self::Sgt => Self::Ugt,
            Self::Sge => Self::Uge,
            Self::Slt => Self::Ult,
            Self::Sle => Self::Ule,
            other => other,
        }
    }

    /// Numeric rank for structural comparison.
    pub const fn rank(self) -> u32 {
        match self {
            Self::Eq => 0,
            Self::Ne => 1,
            Self::Ugt => 2,
            Self::Uge => 3,
            Self::Ult => 4,
            Self::Ule => 5,
            Self::Sgt => 6,
            Self::Sge => 7,
            Self::Slt => 8,
            Self::Sle => 9,
        }
    }
}

/// Kind of a type-conversion instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastKind {
    Trunc,
    ZExt,
    SExt,
    Bitcast,
    PtrToInt,
    IntToPtr,
}

impl CastKind {
    /// Numeric rank for structural comparison.
    pub const fn rank(self) -> u32 {
        match self {
            Self::Trunc => 0,
            Self::ZExt => 1,
            Self::SExt => 2,
            Self::Bitcast => 3,
            Self::PtrToInt => 4,
            Self::IntToPtr => 5,
        }
    }
}

/// Binary arithmetic or bitwise operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    UDiv,
    SDiv,
    URem,
    SRem,
    And,
    Or,
    Xor,
    Shl,
    LShr,
    AShr,
}

impl BinOp {
    /// Numeric rank for structural comparison.
    pub const fn rank(self) -> u32 {
        match self {
            Self::Add => 0,
            Self::Sub => 1,
            Self::Mul => 2,
            Self::UDiv => 3,
            Self::SDiv => 4,
            Self::URem => 5,
            Self::SRem => 6,
            Self::And => 7,
            Self::Or => 8,
            Self::Xor => 9,
            Self::Shl => 10,
            Self::LShr => 11,
            Self::AShr => 12,
        }
    }
}
