//! Instructions.

use crate::attrs::AttributeList;
use crate::types::TypeId;
use crate::value::{BinOp, BlockId, CastKind, Predicate, ValueRef};

/// Operation of an instruction.
///
/// Operand conventions:
/// - `Call`: `[args…, callee]` (the callee occupies the trailing slot).
/// - `Gep`: `[base, indices…]`.
/// - `Br`: `[dest]` or `[cond, if_true, if_false]`.
/// - `Switch`: `[value, default, (case_value, dest)…]`.
/// - `Phi`: `[value, block, value, block, …]`.
/// - `Alloca` takes no operands; the allocated type and alignment are
///   part of the operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Binary(BinOp),
    Icmp(Predicate),
    Alloca { allocated: TypeId, align: u32 },
    Load { align: u32 },
    Store { align: u32 },
    Gep { source: TypeId },
    Cast(CastKind),
    Call,
    Phi,
    Select,
    Ret,
    Br,
    Switch,
    Unreachable,
}

impl Op {
    /// Opcode rank for structural comparison. Distinct operations get
    /// distinct ranks; per-operation state (predicates, alignments,
    /// allocated types) is compared separately.
    pub const fn opcode(&self) -> u32 {
        match self {
            Self::Binary(b) => 100 + b.rank(),
            Self::Icmp(_) => 1,
            Self::Alloca { .. } => 2,
            Self::Load { .. } => 3,
            Self::Store { .. } => 4,
            Self::Gep { .. } => 5,
            Self::Cast(k) => 200 + k.rank(),
            Self::Call => 6,
            Self::Phi => 7,
            Self::Select => 8,
            Self::Ret => 9,
            Self::Br => 10,
            Self::Switch => 11,
            Self::Unreachable => 12,
        }
    }

    /// Check if this is a call operation.
    pub const fn is_call(&self) -> bool {
        matches!(self, Self::Call)
    }

    /// Check if this is a stack allocation.
    pub const fn is_alloca(&self) -> bool {
        matches!(self, Self::Alloca { .. })
    }

    /// Check if this is a type conversion.
    pub const fn is_cast(&self) -> bool {
        matches!(self, Self::Cast(_))
    }

    /// Check if this operation terminates a basic block.
    pub const fn is_terminator(&self) -> bool {
        matches!(self, Self::Ret | Self::Br | Self::Switch | Self::Unreachable)
    }
}

/// A single instruction: an operation with an ordered operand list.
#[derive(Clone, Debug)]
pub struct Inst {
    /// The operation.
    pub op: Op,
    /// Result type (`Void` for instructions producing no value).
    pub ty: TypeId,
    /// Ordered operands.
    pub operands: Vec<ValueRef>,
    /// Call-site attributes (empty for non-calls).
    pub attrs: AttributeList,
}

impl Inst {
    /// Create an instruction with no call-site attributes.
    pub const fn new(op: Op, ty: TypeId, operands: Vec<ValueRef>) -> Self {
        Self {
            op,
            ty,
            operands,
            attrs: AttributeList::new(),
        }
    }

    /// An instruction whose presence does not affect semantics
    /// (stack allocation or cast) and that may be skipped when
    /// comparing control flow only.
    pub const fn may_ignore(&self) -> bool {
        self.op.is_alloca() || self.op.is_cast()
    }

    /// The callee operand of a call instruction (trailing slot).
    pub fn callee(&self) -> Option<ValueRef> {
        if self.op.is_call() {
            self.operands.last().copied()
        } else {
            None
        }
    }

    /// Call arguments (all operands except the trailing callee slot).
    pub fn call_args(&self) -> &[ValueRef] {
        if self.op.is_call() && !self.operands.is_empty() {
            &self.operands[..self.operands.len() - 1]
        } else {
            &[]
        }
    }

    /// Successor blocks of a terminator, in operand order.
    pub fn successors(&self) -> Vec<BlockId> {
        if !self.op.is_terminator() {
            return Vec::new();
        }
        self.operands
            .iter()
            .filter_map(|v| v.as_block())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::InstId;

    #[test]
    fn test_call_operand_convention() {
        let call = Inst::new(
            Op::Call,
            TypeId(0),
            vec![
                ValueRef::Arg(0),
                ValueRef::Arg(1),
                ValueRef::Function(crate::FunId(3)),
            ],
        );
        assert_eq!(call.callee(), Some(ValueRef::Function(crate::FunId(3))));
        assert_eq!(call.call_args().len(), 2);
    }

    #[test]
    fn test_successors_of_cond_branch() {
        let br = Inst::new(
            Op::Br,
            TypeId(0),
            vec![
                ValueRef::Inst(InstId(0)),
                ValueRef::Block(BlockId(1)),
                ValueRef::Block(BlockId(2)),
            ],
        );
        assert_eq!(br.successors(), vec![BlockId(1), BlockId(2)]);
    }

    #[test]
    fn test_may_ignore() {
        let alloca = Inst::new(
            Op::Alloca {
                allocated: TypeId(1),
                align: 8,
            },
            TypeId(2),
            vec![],
        );
        assert!(alloca.may_ignore());
        let ret = Inst::new(Op::Ret, TypeId(0), vec![]);
        assert!(!ret.may_ignore());
    }
}
