//! Module and function builder APIs.

use crate::attrs::Attr;
use crate::function::{Block, Function, Intrinsic};
use crate::instr::{Inst, Op};
use crate::layout::DataLayout;
use crate::module::{Global, Module};
use crate::types::{Type, TypeId};
use crate::value::{
    BinOp, BlockId, CastKind, ConstId, ConstKind, Constant, FunId, GlobalId, InstId, Predicate,
    ValueRef,
};

/// Builder for a module: interns types and constants, declares globals
/// and functions, and attaches function bodies.
pub struct ModuleBuilder {
    module: Module,
}

impl ModuleBuilder {
    /// Create a builder for a module with the given pointer width.
    pub fn new(name: &str, ptr_bits: u32) -> Self {
        Self {
            module: Module::new(name.to_string(), DataLayout::new(ptr_bits)),
        }
    }

    fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(pos) = self.module.types.iter().position(|t| *t == ty) {
            return TypeId(pos as u32);
        }
        self.module.types.push(ty);
        TypeId((self.module.types.len() - 1) as u32)
    }

    /// The void type.
    pub fn void(&mut self) -> TypeId {
        self.intern(Type::Void)
    }

    /// The basic block label type.
    pub fn label(&mut self) -> TypeId {
        self.intern(Type::Label)
    }

    /// Integer type of the given width.
    pub fn int(&mut self, bits: u32) -> TypeId {
        self.intern(Type::Int { bits })
    }

    /// Floating point type of the given width.
    pub fn float(&mut self, bits: u32) -> TypeId {
        self.intern(Type::Float { bits })
    }

    /// Pointer type in address space 0.
    pub fn ptr(&mut self, pointee: TypeId) -> TypeId {
        self.ptr_in(pointee, 0)
    }

    /// Pointer type in the given address space.
    pub fn ptr_in(&mut self, pointee: TypeId, addr_space: u32) -> TypeId {
        self.intern(Type::Ptr {
            pointee,
            addr_space,
        })
    }

    /// Fixed-length array type.
    pub fn array(&mut self, elem: TypeId, len: u64) -> TypeId {
        self.intern(Type::Array { elem, len })
    }

    /// Named aggregate type.
    pub fn structure(&mut self, name: &str, fields: &[TypeId], packed: bool) -> TypeId {
        self.intern(Type::Struct {
            name: Some(name.to_string()),
            fields: fields.to_vec(),
            packed,
        })
    }

    /// Anonymous aggregate type.
    pub fn anon_structure(&mut self, fields: &[TypeId], packed: bool) -> TypeId {
        self.intern(Type::Struct {
            name: None,
            fields: fields.to_vec(),
            packed,
        })
    }

    /// Function type.
    pub fn func_ty(&mut self, ret: TypeId, params: &[TypeId], varargs: bool) -> TypeId {
        self.intern(Type::Function {
            ret,
            params: params.to_vec(),
            varargs,
        })
    }

    fn intern_const(&mut self, c: Constant) -> ConstId {
        if let Some(pos) = self.module.consts.iter().position(|x| *x == c) {
            return ConstId(pos as u32);
        }
        self.module.consts.push(c);
        ConstId((self.module.consts.len() - 1) as u32)
    }

    /// Integer constant of the given width.
    pub fn const_int(&mut self, bits: u32, value: u64) -> ValueRef {
        let ty = self.int(bits);
        ValueRef::Const(self.intern_const(Constant {
            ty,
            kind: ConstKind::Int { bits, value },
        }))
    }

    /// Null constant of the given pointer type.
    pub fn const_null(&mut self, ty: TypeId) -> ValueRef {
        ValueRef::Const(self.intern_const(Constant {
            ty,
            kind: ConstKind::Null,
        }))
    }

    /// Declare a global variable of the given value type; the returned
    /// reference has pointer type.
    pub fn global(&mut self, name: &str, value_ty: TypeId) -> ValueRef {
        let ty = self.ptr(value_ty);
        self.module.globals.push(Global {
            name: name.to_string(),
            ty,
        });
        ValueRef::Global(GlobalId((self.module.globals.len() - 1) as u32))
    }

    /// Declare a function (no body).
    pub fn declare(&mut self, name: &str, ret: TypeId, params: &[TypeId]) -> FunId {
        let ty = self.func_ty(ret, params, false);
        let ptr_ty = self.ptr(ty);
        self.module.funcs.push(Function {
            name: name.to_string(),
            ty,
            ptr_ty,
            params: params.to_vec(),
            attrs: crate::AttributeList::new(),
            insts: Vec::new(),
            blocks: Vec::new(),
            intrinsic: None,
        });
        FunId((self.module.funcs.len() - 1) as u32)
    }

    /// Declare the memory-set intrinsic: `memset(ptr, i8, i64, i1)`.
    pub fn declare_memset(&mut self) -> FunId {
        let void = self.void();
        let i8t = self.int(8);
        let i8p = self.ptr(i8t);
        let i64t = self.int(64);
        let i1t = self.int(1);
        let f = self.declare("llvm.memset.p0i8.i64", void, &[i8p, i8t, i64t, i1t]);
        self.module.funcs[f.index()].intrinsic = Some(Intrinsic::Memset);
        f
    }

    /// Add an attribute at the given index of a function's attribute list.
    pub fn add_fn_attr(&mut self, f: FunId, index: u32, attr: Attr) {
        self.module.funcs[f.index()].attrs.add(index, attr);
    }

    /// A value referring to the given function.
    pub const fn fn_ref(&self, f: FunId) -> ValueRef {
        ValueRef::Function(f)
    }

    /// Start building a body for a declared function.
    pub fn body(&mut self) -> FunctionBuilder {
        FunctionBuilder::new(self.void())
    }

    /// Attach a finished body to a declared function.
    pub fn define(&mut self, f: FunId, body: FunctionBuilder) {
        let func = &mut self.module.funcs[f.index()];
        func.insts = body.insts;
        func.blocks = body.blocks;
    }

    /// Finish building and return the module.
    pub fn build(self) -> Module {
        self.module
    }

    /// Access the module being built.
    pub const fn module(&self) -> &Module {
        &self.module
    }
}

/// Builder for a function body: blocks and instructions.
pub struct FunctionBuilder {
    void: TypeId,
    insts: Vec<Inst>,
    blocks: Vec<Block>,
    current: BlockId,
}

impl FunctionBuilder {
    fn new(void: TypeId) -> Self {
        Self {
            void,
            insts: Vec::new(),
            blocks: vec![Block::default()],
            current: BlockId(0),
        }
    }

    /// The entry block.
    pub const fn entry(&self) -> BlockId {
        BlockId(0)
    }

    /// Create a new block and return its id (does not switch to it).
    pub fn block(&mut self) -> BlockId {
        self.blocks.push(Block::default());
        BlockId((self.blocks.len() - 1) as u32)
    }

    /// Switch the insertion point to the given block.
    pub const fn switch_to(&mut self, block: BlockId) {
        self.current = block;
    }

    fn push(&mut self, inst: Inst) -> ValueRef {
        let id = InstId(self.insts.len() as u32);
        self.insts.push(inst);
        self.blocks[self.current.index()].insts.push(id);
        ValueRef::Inst(id)
    }

    /// Stack allocation; the result has the given pointer type.
    pub fn alloca(&mut self, allocated: TypeId, ptr_ty: TypeId, align: u32) -> ValueRef {
        self.push(Inst::new(Op::Alloca { allocated, align }, ptr_ty, vec![]))
    }

    /// Binary operation.
    pub fn binary(&mut self, op: BinOp, ty: TypeId, lhs: ValueRef, rhs: ValueRef) -> ValueRef {
        self.push(Inst::new(Op::Binary(op), ty, vec![lhs, rhs]))
    }

    /// Integer comparison; the result has the given (boolean) type.
    pub fn icmp(
        &mut self,
        pred: Predicate,
        bool_ty: TypeId,
        lhs: ValueRef,
        rhs: ValueRef,
    ) -> ValueRef {
        self.push(Inst::new(Op::Icmp(pred), bool_ty, vec![lhs, rhs]))
    }

    /// Type conversion.
    pub fn cast(&mut self, kind: CastKind, to: TypeId, value: ValueRef) -> ValueRef {
        self.push(Inst::new(Op::Cast(kind), to, vec![value]))
    }

    /// Memory load.
    pub fn load(&mut self, ty: TypeId, ptr: ValueRef, align: u32) -> ValueRef {
        self.push(Inst::new(Op::Load { align }, ty, vec![ptr]))
    }

    /// Memory store.
    pub fn store(&mut self, value: ValueRef, ptr: ValueRef, align: u32) -> ValueRef {
        let void = self.void;
        self.push(Inst::new(Op::Store { align }, void, vec![value, ptr]))
    }

    /// Member/array access; operands are `[base, indices…]`.
    pub fn gep(
        &mut self,
        result_ty: TypeId,
        source: TypeId,
        base: ValueRef,
        indices: &[ValueRef],
    ) -> ValueRef {
        let mut operands = vec![base];
        operands.extend_from_slice(indices);
        self.push(Inst::new(Op::Gep { source }, result_ty, operands))
    }

    /// Call; the callee occupies the trailing operand slot.
    pub fn call(&mut self, ret_ty: TypeId, callee: ValueRef, args: &[ValueRef]) -> ValueRef {
        let mut operands = args.to_vec();
        operands.push(callee);
        self.push(Inst::new(Op::Call, ret_ty, operands))
    }

    /// Phi node; operands alternate value and incoming block.
    pub fn phi(&mut self, ty: TypeId, incoming: &[(ValueRef, BlockId)]) -> ValueRef {
        let mut operands = Vec::with_capacity(incoming.len() * 2);
        for &(value, block) in incoming {
            operands.push(value);
            operands.push(ValueRef::Block(block));
        }
        self.push(Inst::new(Op::Phi, ty, operands))
    }

    /// Select between two values.
    pub fn select(&mut self, ty: TypeId, cond: ValueRef, a: ValueRef, b: ValueRef) -> ValueRef {
        self.push(Inst::new(Op::Select, ty, vec![cond, a, b]))
    }

    /// Return with no value.
    pub fn ret(&mut self) -> ValueRef {
        let void = self.void;
        self.push(Inst::new(Op::Ret, void, vec![]))
    }

    /// Return a value.
    pub fn ret_val(&mut self, value: ValueRef) -> ValueRef {
        let void = self.void;
        self.push(Inst::new(Op::Ret, void, vec![value]))
    }

    /// Unconditional branch.
    pub fn br(&mut self, dest: BlockId) -> ValueRef {
        let void = self.void;
        self.push(Inst::new(Op::Br, void, vec![ValueRef::Block(dest)]))
    }

    /// Conditional branch.
    pub fn cond_br(&mut self, cond: ValueRef, if_true: BlockId, if_false: BlockId) -> ValueRef {
        let void = self.void;
        self.push(Inst::new(
            Op::Br,
            void,
            vec![cond, ValueRef::Block(if_true), ValueRef::Block(if_false)],
        ))
    }

    /// Unreachable terminator.
    pub fn unreachable(&mut self) -> ValueRef {
        let void = self.void;
        self.push(Inst::new(Op::Unreachable, void, vec![]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_interning() {
        let mut m = ModuleBuilder::new("m", 64);
        let a = m.int(32);
        let b = m.int(32);
        let c = m.int(64);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_constant_interning() {
        let mut m = ModuleBuilder::new("m", 64);
        let a = m.const_int(32, 5);
        let b = m.const_int(32, 5);
        let c = m.const_int(32, 6);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_simple_function_body() {
        let mut m = ModuleBuilder::new("m", 64);
        let i32t = m.int(32);
        let f = m.declare("add1", i32t, &[i32t]);
        let one = m.const_int(32, 1);
        let mut b = m.body();
        let sum = b.binary(BinOp::Add, i32t, ValueRef::Arg(0), one);
        b.ret_val(sum);
        m.define(f, b);
        let module = m.build();
        let func = module.func(f);
        assert!(!func.is_declaration());
        assert_eq!(func.blocks.len(), 1);
        assert_eq!(func.block(BlockId(0)).len(), 2);
    }

    #[test]
    fn test_branching_body_successors() {
        let mut m = ModuleBuilder::new("m", 64);
        let i1t = m.int(1);
        let void = m.void();
        let f = m.declare("branchy", void, &[i1t]);
        let mut b = m.body();
        let then_bb = b.block();
        let else_bb = b.block();
        b.cond_br(ValueRef::Arg(0), then_bb, else_bb);
        b.switch_to(then_bb);
        b.ret();
        b.switch_to(else_bb);
        b.ret();
        m.define(f, b);
        let module = m.build();
        let func = module.func(f);
        assert_eq!(func.successors(BlockId(0)), vec![then_bb, else_bb]);
        assert!(func.successors(then_bb).is_empty());
    }
}
