//! Differential function comparator.
//!
//! Wraps the baseline structural comparator with recompilation-aware
//! equivalence rules: field reordering recognized through debug-info
//! field names, allocation and memset sizes checked against the
//! aggregate's own computed size, macro value changes, integer-width
//! and cast relaxations under control-flow-only mode, and inline
//! requests when a mismatch looks like moved-out logic.

use std::cmp::Ordering;

use irdiff_ir::{
    Attr, AttributeList, BlockId, ConstKind, FunId, Function, Inst, InstId, Intrinsic, Module,
    Op, Type, TypeId, ValueRef,
};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::baseline;
use crate::config::CompareConfig;
use crate::debug_info::{DebugInfo, Side};

/// Function names recognized as memory allocators.
const ALLOC_FUNCTIONS: &[&str] = &[
    "malloc", "calloc", "kmalloc", "kzalloc", "kcalloc", "__kmalloc",
];

fn is_alloc_function(name: &str) -> bool {
    ALLOC_FUNCTIONS.contains(&name)
}

/// One side of a comparison: a module and a function in it.
#[derive(Clone, Copy)]
pub struct FnSide<'a> {
    /// The module.
    pub module: &'a Module,
    /// The compared function.
    pub fun_id: FunId,
}

impl<'a> FnSide<'a> {
    /// Create a side view.
    pub const fn new(module: &'a Module, fun_id: FunId) -> Self {
        Self { module, fun_id }
    }

    /// The compared function.
    pub fn func(&self) -> &'a Function {
        self.module.func(self.fun_id)
    }

    /// An instruction of the compared function.
    pub fn inst(&self, id: InstId) -> &'a Inst {
        self.func().inst(id)
    }

    /// A type of this side's module.
    pub fn ty(&self, id: TypeId) -> &'a Type {
        self.module.ty(id)
    }

    /// A constant of this side's module.
    pub fn constant(&self, id: irdiff_ir::ConstId) -> &'a irdiff_ir::Constant {
        self.module.constant(id)
    }

    /// A global of this side's module.
    pub fn global(&self, id: irdiff_ir::GlobalId) -> &'a irdiff_ir::Global {
        self.module.global(id)
    }

    /// Type of a value, if it has one (block references do not).
    pub fn value_type(&self, v: ValueRef) -> Option<TypeId> {
        match v {
            ValueRef::Arg(i) => self.func().params.get(i as usize).copied(),
            ValueRef::Inst(id) => Some(self.inst(id).ty),
            ValueRef::Const(c) => Some(self.module.constant(c).ty),
            ValueRef::Global(g) => Some(self.module.global(g).ty),
            ValueRef::Function(f) => Some(self.module.func(f).ptr_ty),
            ValueRef::Block(_) => None,
        }
    }

    /// Address space of a pointer-typed value (0 when not a pointer).
    pub fn pointer_address_space(&self, v: ValueRef) -> u32 {
        match self.value_type(v).map(|t| self.ty(t)) {
            Some(Type::Ptr { addr_space, .. }) => *addr_space,
            _ => 0,
        }
    }

    /// Directly referenced callee of a call instruction, if any.
    pub fn callee_fun(&self, inst: &Inst) -> Option<FunId> {
        match inst.callee() {
            Some(ValueRef::Function(f)) => Some(f),
            _ => None,
        }
    }

    /// The numeric values of a member/array access's indices, if all of
    /// them are integer constants.
    pub fn constant_indices(&self, inst: &Inst) -> Option<Vec<u64>> {
        let mut values = Vec::with_capacity(inst.operands.len().saturating_sub(1));
        for &idx in inst.operands.get(1..)? {
            let c = idx.as_const()?;
            values.push(self.module.constant(c).int_value()?);
        }
        Some(values)
    }
}

/// Request that the orchestrator inline a callee and retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InlineRequest {
    /// Side whose module the callee belongs to.
    pub side: Side,
    /// The callee to inline.
    pub callee: FunId,
}

/// Per-side serial-number maps: value to the order in which it was first
/// encountered during the current traversal.
#[derive(Default)]
pub(crate) struct SerialMaps {
    pub left: FxHashMap<ValueRef, usize>,
    pub right: FxHashMap<ValueRef, usize>,
}

impl SerialMaps {
    fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

/// Differential comparator for a pair of functions.
///
/// All transient state (serial-number maps, the inline-request slot) is
/// owned by the instance and scoped to one comparison attempt. Parallel
/// comparisons of different function pairs must use separate instances.
pub struct DiffComparator<'a> {
    pub(crate) left: FnSide<'a>,
    pub(crate) right: FnSide<'a>,
    pub(crate) sn: SerialMaps,
    di: &'a DebugInfo,
    config: CompareConfig,
    inline_request: Option<InlineRequest>,
}

impl<'a> DiffComparator<'a> {
    /// Create a comparator for a function pair.
    pub fn new(
        left: FnSide<'a>,
        right: FnSide<'a>,
        di: &'a DebugInfo,
        config: CompareConfig,
    ) -> Self {
        Self {
            left,
            right,
            sn: SerialMaps::default(),
            di,
            config,
            inline_request: None,
        }
    }

    /// Compare the two functions. Resets all transient state first.
    /// A not-equal verdict may leave an inline request behind; see
    /// [`Self::take_inline_request`].
    pub fn compare(&mut self) -> Ordering {
        self.sn.clear();
        self.inline_request = None;
        baseline::compare_functions(self)
    }

    /// Take the inline request recorded during the last comparison.
    pub const fn take_inline_request(&mut self) -> Option<InlineRequest> {
        self.inline_request.take()
    }

    fn side(&self, side: Side) -> FnSide<'a> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn request_inline(&mut self, side: Side, callee: FunId) {
        // First request wins within one attempt.
        if self.inline_request.is_none() {
            debug!(
                callee = %self.side(side).module.func(callee).name,
                ?side,
                "requesting inline"
            );
            self.inline_request = Some(InlineRequest { side, callee });
        }
    }

    /// Compare two member/array accesses. Delegates to the
    /// baseline first; on failure, tolerates renumbered fields of
    /// same-named aggregates when debug-info field names agree.
    pub fn cmp_geps(&mut self, l: InstId, r: InstId) -> Ordering {
        let original = baseline::cmp_geps(self, l, r);
        if original == Ordering::Equal {
            return original;
        }

        let (left, right) = (self.left, self.right);
        let il = left.inst(l);
        let ir = right.inst(r);
        let (Op::Gep { source: src_l }, Op::Gep { source: src_r }) = (&il.op, &ir.op) else {
            return original;
        };
        let (src_l, src_r) = (*src_l, *src_r);

        if !left.ty(src_l).is_struct() || !right.ty(src_r).is_struct() {
            // Not an aggregate access; the baseline verdict is final.
            return original;
        }
        if left.module.struct_name(src_l) != right.module.struct_name(src_r) {
            // Different structure names; equal indices could only match
            // by coincidence.
            return original;
        }

        let res = baseline::cmp_numbers(
            u64::from(left.pointer_address_space(il.operands[0])),
            u64::from(right.pointer_address_space(ir.operands[0])),
        );
        if res != Ordering::Equal {
            return res;
        }
        let res = baseline::cmp_numbers(
            (il.operands.len() - 1) as u64,
            (ir.operands.len() - 1) as u64,
        );
        if res != Ordering::Equal {
            return res;
        }

        let const_idx_l = left.constant_indices(il);
        let const_idx_r = right.constant_indices(ir);
        if let (Some(values_l), Some(values_r)) = (const_idx_l, const_idx_r) {
            for k in 0..values_l.len() {
                let ty_l = left.module.gep_indexed_type(src_l, &values_l[..k]);
                let ty_r = right.module.gep_indexed_type(src_r, &values_r[..k]);
                let struct_l = ty_l.filter(|&t| left.ty(t).is_struct());
                let struct_r = ty_r.filter(|&t| right.ty(t).is_struct());

                let (idx_op_l, idx_op_r) = (il.operands[k + 1], ir.operands[k + 1]);
                let (Some(st_l), Some(st_r)) = (struct_l, struct_r) else {
                    // Indexing a non-aggregate sub-type: positions must
                    // match.
                    let res = self.cmp_values(idx_op_l, idx_op_r);
                    if res != Ordering::Equal {
                        return res;
                    }
                    continue;
                };

                let name_l = self.di.field_name(Side::Left, st_l, values_l[k]);
                let name_r = self.di.field_name(Side::Right, st_r, values_r[k]);
                if name_l.is_none() || name_r.is_none() || name_l != name_r {
                    let res = self.cmp_values(idx_op_l, idx_op_r);
                    if res != Ordering::Equal {
                        return res;
                    }
                }
            }
            Ordering::Equal
        } else if il.operands.len() == 2 && ir.operands.len() == 2 {
            // A single non-constant index is an array element access;
            // member names are irrelevant, compare the index alone.
            self.cmp_values(il.operands[1], ir.operands[1])
        } else {
            // Indices cannot be matched by name when not constant.
            original
        }
    }

    /// Compare two attribute lists, ignoring inlining-related
    /// annotations: inlining decisions are a compilation detail.
    pub fn cmp_attrs(&mut self, l: &AttributeList, r: &AttributeList) -> Ordering {
        let mut l_clean = l.clone();
        let mut r_clean = r.clone();
        for index in l.indices().collect::<Vec<_>>() {
            l_clean = clean_attributes(&l_clean, index);
            if r_clean.has_attributes(index) {
                r_clean = clean_attributes(&r_clean, index);
            }
        }
        baseline::cmp_attrs(&l_clean, &r_clean)
    }

    /// Compare two operations: baseline verdict first, then the
    /// call/allocation/memset/comparison/alloca special cases.
    pub fn cmp_operations(&mut self, l: InstId, r: InstId) -> (Ordering, bool) {
        let (result, needs_operands) = baseline::cmp_operations(self, l, r);

        let (left, right) = (self.left, self.right);
        let il = left.inst(l);
        let ir = right.inst(r);

        if il.op.is_call() || ir.op.is_call() {
            if il.op.is_call() && ir.op.is_call() {
                if let (Some(callee_l), Some(callee_r)) =
                    (left.callee_fun(il), right.callee_fun(ir))
                {
                    let fun_l = left.module.func(callee_l);
                    let fun_r = right.module.func(callee_r);
                    if fun_l.name == fun_r.name {
                        if is_alloc_function(&fun_l.name)
                            && self.cmp_allocs(l, r) == Ordering::Equal
                        {
                            return (Ordering::Equal, false);
                        }
                        if fun_l.intrinsic == Some(Intrinsic::Memset)
                            && fun_r.intrinsic == Some(Intrinsic::Memset)
                            && self.cmp_memset(l, r) == Ordering::Equal
                        {
                            return (Ordering::Equal, false);
                        }
                        if result != Ordering::Equal
                            && self.config.control_flow_only
                            && il.operands.len().abs_diff(ir.operands.len()) == 1
                        {
                            return (self.cmp_calls_with_extra_arg(l, r), false);
                        }
                        if result != Ordering::Equal && !fun_l.is_declaration() {
                            // The calls differ; inlining the callee may
                            // resolve the mismatch on retry.
                            self.request_inline(Side::Left, callee_l);
                        }
                    }
                }
            } else {
                // One side is a call and the other is not: some logic
                // may have been moved into a helper function.
                let (side, view, inst) = if il.op.is_call() {
                    (Side::Left, left, il)
                } else {
                    (Side::Right, right, ir)
                };
                if let Some(callee) = view.callee_fun(inst) {
                    if !view.module.func(callee).is_declaration() {
                        self.request_inline(side, callee);
                    }
                }
            }
        }

        if result != Ordering::Equal {
            if self.config.control_flow_only {
                if let (Op::Icmp(pl), Op::Icmp(pr)) = (&il.op, &ir.op) {
                    // Signedness does not matter for control flow.
                    if pl.unsigned() == pr.unsigned() {
                        return (Ordering::Equal, needs_operands);
                    }
                }
            }
            if let (
                Op::Alloca {
                    allocated: ty_l,
                    align: align_l,
                },
                Op::Alloca {
                    allocated: ty_r,
                    align: align_r,
                },
            ) = (&il.op, &ir.op)
            {
                // Layout changes inside a same-named structure are
                // tolerated; alignment must still agree.
                let name_l = left.module.struct_name(*ty_l);
                let name_r = right.module.struct_name(*ty_r);
                if name_l.is_some() && name_l == name_r {
                    return (
                        baseline::cmp_numbers(u64::from(*align_l), u64::from(*align_r)),
                        needs_operands,
                    );
                }
            }
        }

        (result, needs_operands)
    }

    /// Compare two allocation calls, tolerating a changed size of
    /// a same-named aggregate when each side's constant size matches its
    /// own computed size.
    pub fn cmp_allocs(&mut self, l: InstId, r: InstId) -> Ordering {
        let (left, right) = (self.left, self.right);
        let il = left.inst(l);
        let ir = right.inst(r);
        let (size_l, size_r) = (il.operands[0], ir.operands[0]);

        if self.cmp_values(size_l, size_r) == Ordering::Equal {
            // Allocation sizes match; flags are ignored.
            return Ordering::Equal;
        }

        let struct_l = left
            .func()
            .next_in_block(l)
            .and_then(|n| bitcast_struct_type(left, n));
        let struct_r = right
            .func()
            .next_in_block(r)
            .and_then(|n| bitcast_struct_type(right, n));
        let (Some(st_l), Some(st_r)) = (struct_l, struct_r) else {
            return Ordering::Greater;
        };

        if !is_constant_int(left, size_l) || !is_constant_int(right, size_r) {
            return Ordering::Greater;
        }
        if self.cmp_struct_type_size_with_constant(Side::Left, st_l, size_l) != Ordering::Equal
            || self.cmp_struct_type_size_with_constant(Side::Right, st_r, size_r)
                != Ordering::Equal
            || left.module.struct_name(st_l) != right.module.struct_name(st_r)
        {
            return Ordering::Greater;
        }
        Ordering::Equal
    }

    /// Compare two memset calls, tolerating a changed size of the
    /// destination aggregate under the same conditions as allocations.
    pub fn cmp_memset(&mut self, l: InstId, r: InstId) -> Ordering {
        let (left, right) = (self.left, self.right);
        let il = left.inst(l);
        let ir = right.inst(r);
        let args_l: Vec<ValueRef> = il.call_args().to_vec();
        let args_r: Vec<ValueRef> = ir.call_args().to_vec();

        let res =
            baseline::cmp_numbers(args_l.len() as u64, args_r.len() as u64);
        if res != Ordering::Equal {
            return res;
        }

        // Compare all arguments except the size (index 2).
        for (i, (&al, &ar)) in args_l.iter().zip(args_r.iter()).enumerate() {
            if i == 2 {
                continue;
            }
            let res = self.cmp_values(al, ar);
            if res != Ordering::Equal {
                return res;
            }
        }

        if args_l.len() < 3 {
            return Ordering::Greater;
        }
        if self.cmp_values(args_l[2], args_r[2]) == Ordering::Equal {
            return Ordering::Equal;
        }

        let struct_l = resolve_struct_type(left, args_l[0]);
        let struct_r = resolve_struct_type(right, args_r[0]);
        let (Some(st_l), Some(st_r)) = (struct_l, struct_r) else {
            return Ordering::Greater;
        };
        if self.cmp_struct_type_size_with_constant(Side::Left, st_l, args_l[2]) != Ordering::Equal
            || self.cmp_struct_type_size_with_constant(Side::Right, st_r, args_r[2])
                != Ordering::Equal
            || left.module.struct_name(st_l) != right.module.struct_name(st_r)
        {
            return Ordering::Greater;
        }
        Ordering::Equal
    }

    /// Compare two basic blocks in lock-step. Under
    /// control-flow-only mode, unmatched ignorable instructions (stack
    /// allocations, casts) are skipped and their serial numbers
    /// discarded so the two traversals stay synchronized.
    pub fn cmp_basic_blocks(&mut self, bl: BlockId, br: BlockId) -> Ordering {
        let (left, right) = (self.left, self.right);
        let insts_l = &left.func().block(bl).insts;
        let insts_r = &right.func().block(br).insts;
        let mut i = 0;
        let mut j = 0;

        while i < insts_l.len() && j < insts_r.len() {
            let (l, r) = (insts_l[i], insts_r[j]);
            let (res, needs_operands) = self.cmp_operations(l, r);
            if res != Ordering::Equal {
                let ignore_l = left.inst(l).may_ignore();
                let ignore_r = right.inst(r).may_ignore();
                if self.config.control_flow_only && (ignore_l || ignore_r) {
                    trace!(?bl, ?br, i, j, "skipping ignorable instruction");
                    // Reset serial counters so numbering stays in sync,
                    // then retry with the ignorable side advanced.
                    self.sn.left.remove(&ValueRef::Inst(l));
                    self.sn.right.remove(&ValueRef::Inst(r));
                    if ignore_l {
                        i += 1;
                    } else {
                        j += 1;
                    }
                    continue;
                }
                return res;
            }

            if needs_operands {
                let il = left.inst(l);
                let ir = right.inst(r);
                debug_assert_eq!(
                    il.operands.len(),
                    ir.operands.len(),
                    "operand counts must match after a successful operation match"
                );
                for (&ol, &or) in il.operands.iter().zip(ir.operands.iter()) {
                    let res = self.cmp_values(ol, or);
                    if res != Ordering::Equal {
                        return res;
                    }
                }
            }

            i += 1;
            j += 1;
        }

        if i < insts_l.len() {
            return Ordering::Greater;
        }
        if j < insts_r.len() {
            return Ordering::Less;
        }
        Ordering::Equal
    }

    /// Compare two values: unwrap casts under control-flow-only
    /// mode, then delegate to the baseline; on failure tolerate macro
    /// value changes and block-count divergence.
    pub fn cmp_values(&mut self, l: ValueRef, r: ValueRef) -> Ordering {
        if self.config.control_flow_only {
            let cast_l = cast_operand(self.left, l);
            let cast_r = cast_operand(self.right, r);
            match (cast_l, cast_r) {
                (Some(ol), Some(or)) => return self.cmp_values(ol, or),
                (Some(ol), None) => return self.cmp_values(ol, r),
                (None, Some(or)) => return self.cmp_values(l, or),
                (None, None) => {}
            }
        }

        let result = baseline::cmp_values(self, l, r);
        if result != Ordering::Equal {
            if let (Some(const_l), Some(const_r)) = (l.as_const(), r.as_const()) {
                // A macro or enumerator may have been redefined between
                // the versions; match through its recorded textual form.
                if let Some(text) = self.di.macro_text(Side::Left, const_l) {
                    if text == self.di.value_text(Side::Right, self.right.module, const_r) {
                        return Ordering::Equal;
                    }
                }
            } else if let (ValueRef::Block(_), ValueRef::Block(_)) = (l, r) {
                // Differing block counts can be caused by functionality
                // moved into a helper; treat the blocks as equal and keep
                // comparing (inlining may be requested later). Remove a
                // freshly inserted entry so the serial maps stay
                // synchronized.
                if self.sn.left.len() != self.sn.right.len() {
                    if self.sn.left.get(&l) == Some(&(self.sn.left.len() - 1)) {
                        self.sn.left.remove(&l);
                    }
                    if self.sn.right.get(&r) == Some(&(self.sn.right.len() - 1)) {
                        self.sn.right.remove(&r);
                    }
                }
                return Ordering::Equal;
            }
        }
        result
    }

    /// Compare two calls whose argument counts differ by one: the
    /// extra trailing argument must be a constant zero/null, and all
    /// shared arguments must agree by type and value.
    pub fn cmp_calls_with_extra_arg(&mut self, l: InstId, r: InstId) -> Ordering {
        let (left, right) = (self.left, self.right);
        let il = left.inst(l);
        let ir = right.inst(r);

        let (extra_side, extra) = if il.operands.len() > ir.operands.len() {
            (Side::Left, il)
        } else {
            (Side::Right, ir)
        };

        // The extra argument sits just before the callee slot.
        let last_arg = extra.operands[extra.operands.len() - 2];
        let Some(const_id) = last_arg.as_const() else {
            return Ordering::Greater;
        };
        if !self
            .side(extra_side)
            .constant(const_id)
            .kind
            .is_zero_value()
        {
            return Ordering::Greater;
        }

        let res = self.cmp_types(il.ty, ir.ty);
        if res != Ordering::Equal {
            return res;
        }

        let shared = il.operands.len().min(ir.operands.len()) - 1;
        for k in 0..shared {
            let (op_l, op_r) = (il.operands[k], ir.operands[k]);
            let (Some(ty_l), Some(ty_r)) =
                (left.value_type(op_l), right.value_type(op_r))
            else {
                return Ordering::Greater;
            };
            let res = self.cmp_types(ty_l, ty_r);
            if res != Ordering::Equal {
                return res;
            }
            let res = self.cmp_values(op_l, op_r);
            if res != Ordering::Equal {
                return res;
            }
        }
        Ordering::Equal
    }

    /// Compare two types: under control-flow-only mode all integer
    /// types are equal and array types compare by element type alone.
    pub fn cmp_types(&mut self, l: TypeId, r: TypeId) -> Ordering {
        if self.config.control_flow_only {
            let tl = self.left.ty(l);
            let tr = self.right.ty(r);
            if tl.is_int() && tr.is_int() {
                return Ordering::Equal;
            }
            if let (Type::Array { elem: el, .. }, Type::Array { elem: er, .. }) = (tl, tr) {
                return self.cmp_types(*el, *er);
            }
        }
        baseline::cmp_types(self, l, r)
    }

    /// Compare two integer values: the baseline requires equal
    /// widths; under control-flow-only mode fall back to the numeric
    /// value.
    pub fn cmp_int_values(
        &mut self,
        l_bits: u32,
        l_value: u64,
        r_bits: u32,
        r_value: u64,
    ) -> Ordering {
        let result = baseline::cmp_apints(l_bits, l_value, r_bits, r_value);
        if result != Ordering::Equal && self.config.control_flow_only {
            return baseline::cmp_numbers(l_value, r_value);
        }
        result
    }

    /// Compare an aggregate type's computed in-memory size with a
    /// constant.
    pub fn cmp_struct_type_size_with_constant(
        &self,
        side: Side,
        ty: TypeId,
        size: ValueRef,
    ) -> Ordering {
        let view = self.side(side);
        let Some(const_id) = size.as_const() else {
            return Ordering::Greater;
        };
        let Some(value) = view.constant(const_id).int_value() else {
            return Ordering::Greater;
        };
        if value == view.module.store_size(ty) {
            Ordering::Equal
        } else {
            Ordering::Greater
        }
    }

    /// Whether control-flow-only mode is active.
    pub const fn control_flow_only(&self) -> bool {
        self.config.control_flow_only
    }
}

/// Strip inlining-related annotations at one index.
fn clean_attributes(attrs: &AttributeList, index: u32) -> AttributeList {
    attrs
        .without(index, Attr::AlwaysInline)
        .without(index, Attr::InlineHint)
        .without(index, Attr::NoInline)
}

/// The pre-cast operand of a cast instruction, if `v` is one.
fn cast_operand(side: FnSide<'_>, v: ValueRef) -> Option<ValueRef> {
    match v {
        ValueRef::Inst(id) => {
            let inst = side.inst(id);
            if inst.op.is_cast() {
                inst.operands.first().copied()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// The aggregate type a bitcast result points to, if the instruction is
/// a type reinterpretation to a pointer-to-aggregate.
fn bitcast_struct_type(side: FnSide<'_>, id: InstId) -> Option<TypeId> {
    let inst = side.inst(id);
    if !matches!(inst.op, Op::Cast(irdiff_ir::CastKind::Bitcast)) {
        return None;
    }
    pointee_struct(side, inst.ty)
}

/// The aggregate type a value points to, looking through a bitcast.
fn resolve_struct_type(side: FnSide<'_>, v: ValueRef) -> Option<TypeId> {
    if let ValueRef::Inst(id) = v {
        let inst = side.inst(id);
        if matches!(inst.op, Op::Cast(irdiff_ir::CastKind::Bitcast)) {
            if let Some(src) = inst.operands.first() {
                if let Some(ty) = side.value_type(*src) {
                    if let Some(st) = pointee_struct(side, ty) {
                        return Some(st);
                    }
                }
            }
        }
    }
    side.value_type(v).and_then(|ty| pointee_struct(side, ty))
}

/// The aggregate pointee of a pointer type, if any.
fn pointee_struct(side: FnSide<'_>, ty: TypeId) -> Option<TypeId> {
    match side.ty(ty) {
        Type::Ptr { pointee, .. } if side.ty(*pointee).is_struct() => Some(*pointee),
        _ => None,
    }
}

/// Whether a value is an integer constant on the given side.
fn is_constant_int(side: FnSide<'_>, v: ValueRef) -> bool {
    v.as_const()
        .is_some_and(|c| matches!(side.constant(c).kind, ConstKind::Int { .. }))
}

#[cfg(test)]
mod tests;
