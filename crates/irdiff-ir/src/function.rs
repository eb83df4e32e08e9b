//! Functions and basic blocks.

use crate::attrs::AttributeList;
use crate::instr::Inst;
use crate::types::TypeId;
use crate::value::{BlockId, InstId};

/// Recognized intrinsic operations carried by declared functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intrinsic {
    /// Memory-set intrinsic: `memset(dest, value, size, …)`.
    Memset,
}

/// A basic block: an ordered sequence of instructions, the last of which
/// is a terminator.
#[derive(Clone, Debug, Default)]
pub struct Block {
    /// Instruction ids in execution order.
    pub insts: Vec<InstId>,
}

impl Block {
    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.insts.len()
    }

    /// Check if the block has no instructions.
    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }
}

/// A function: an ordered sequence of basic blocks plus an attribute list.
#[derive(Clone, Debug)]
pub struct Function {
    /// Symbol name.
    pub name: String,
    /// Function type.
    pub ty: TypeId,
    /// Pointer-to-function type (the type of a reference to this function).
    pub ptr_ty: TypeId,
    /// Parameter types, in order.
    pub params: Vec<TypeId>,
    /// Attribute list keyed by return/parameter/function index.
    pub attrs: AttributeList,
    /// Instruction arena. Blocks reference into this; entries may become
    /// unreferenced after inlining rewrites.
    pub insts: Vec<Inst>,
    /// Basic blocks in layout order; the first block is the entry.
    pub blocks: Vec<Block>,
    /// Recognized intrinsic, if this declaration is one.
    pub intrinsic: Option<Intrinsic>,
}

impl Function {
    /// Check if this function has no body.
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get an instruction by id.
    pub fn inst(&self, id: InstId) -> &Inst {
        &self.insts[id.index()]
    }

    /// Get a block by id.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    /// The entry block, if the function has a body.
    pub fn entry(&self) -> Option<BlockId> {
        if self.blocks.is_empty() {
            None
        } else {
            Some(BlockId(0))
        }
    }

    /// The instruction immediately following `id` within its block, if any.
    pub fn next_in_block(&self, id: InstId) -> Option<InstId> {
        for block in &self.blocks {
            if let Some(pos) = block.insts.iter().position(|&i| i == id) {
                return block.insts.get(pos + 1).copied();
            }
        }
        None
    }

    /// Successor blocks of the given block, in terminator operand order.
    pub fn successors(&self, block: BlockId) -> Vec<BlockId> {
        self.block(block)
            .insts
            .last()
            .map(|&last| self.inst(last).successors())
            .unwrap_or_default()
    }
}
