//! Baseline structural comparator.
//!
//! Canonical lock-step comparison of two compiled-code graphs: each
//! first-seen value and block gets a position-based serial number per
//! side, and serial numbers act as identity proxies. Verdicts are
//! ternary ([`Ordering`]), used by callers as equal/not-equal.
//!
//! Nested comparisons are routed back through [`DiffComparator`]
//! methods so that the differential relaxations apply inside baseline
//! recursion; the differential layer in turn calls these functions
//! explicitly for the default behavior.

use std::cmp::Ordering;

use irdiff_ir::{
    AttributeList, ConstKind, InstId, Op, Type, TypeId, ValueRef,
};
use rustc_hash::FxHashSet;

use crate::diff::DiffComparator;

/// Compare two numbers.
pub fn cmp_numbers(l: u64, r: u64) -> Ordering {
    l.cmp(&r)
}

/// Compare two strings.
pub fn cmp_strings(l: &str, r: &str) -> Ordering {
    l.cmp(r)
}

/// Compare two integer values: bit width first, then zero-extended value.
pub fn cmp_apints(l_bits: u32, l_value: u64, r_bits: u32, r_value: u64) -> Ordering {
    let res = cmp_numbers(u64::from(l_bits), u64::from(r_bits));
    if res != Ordering::Equal {
        return res;
    }
    cmp_numbers(l_value, r_value)
}

/// Compare two types structurally. Pointers compare by address space
/// only; integers by width; aggregates field by field.
pub fn cmp_types(d: &mut DiffComparator<'_>, l: TypeId, r: TypeId) -> Ordering {
    let (left, right) = (d.left, d.right);
    let tl = left.ty(l);
    let tr = right.ty(r);

    let res = cmp_numbers(u64::from(tl.kind_rank()), u64::from(tr.kind_rank()));
    if res != Ordering::Equal {
        return res;
    }

    match (tl, tr) {
        (Type::Void, Type::Void) | (Type::Label, Type::Label) => Ordering::Equal,
        (Type::Int { bits: bl }, Type::Int { bits: br })
        | (Type::Float { bits: bl }, Type::Float { bits: br }) => {
            cmp_numbers(u64::from(*bl), u64::from(*br))
        }
        (Type::Ptr { addr_space: al, .. }, Type::Ptr { addr_space: ar, .. }) => {
            cmp_numbers(u64::from(*al), u64::from(*ar))
        }
        (
            Type::Array { elem: el, len: ll },
            Type::Array { elem: er, len: lr },
        ) => {
            let res = cmp_numbers(*ll, *lr);
            if res != Ordering::Equal {
                return res;
            }
            d.cmp_types(*el, *er)
        }
        (
            Type::Struct {
                fields: fl,
                packed: pl,
                ..
            },
            Type::Struct {
                fields: fr,
                packed: pr,
                ..
            },
        ) => {
            let res = cmp_numbers(u64::from(*pl), u64::from(*pr));
            if res != Ordering::Equal {
                return res;
            }
            let res = cmp_numbers(fl.len() as u64, fr.len() as u64);
            if res != Ordering::Equal {
                return res;
            }
            let pairs: Vec<(TypeId, TypeId)> =
                fl.iter().copied().zip(fr.iter().copied()).collect();
            for (el, er) in pairs {
                let res = d.cmp_types(el, er);
                if res != Ordering::Equal {
                    return res;
                }
            }
            Ordering::Equal
        }
        (
            Type::Function {
                ret: retl,
                params: pl,
                varargs: vl,
            },
            Type::Function {
                ret: retr,
                params: pr,
                varargs: vr,
            },
        ) => {
            let res = cmp_numbers(u64::from(*vl), u64::from(*vr));
            if res != Ordering::Equal {
                return res;
            }
            let res = cmp_numbers(pl.len() as u64, pr.len() as u64);
            if res != Ordering::Equal {
                return res;
            }
            let (retl, retr) = (*retl, *retr);
            let pairs: Vec<(TypeId, TypeId)> =
                pl.iter().copied().zip(pr.iter().copied()).collect();
            let res = d.cmp_types(retl, retr);
            if res != Ordering::Equal {
                return res;
            }
            for (el, er) in pairs {
                let res = d.cmp_types(el, er);
                if res != Ordering::Equal {
                    return res;
                }
            }
            Ordering::Equal
        }
        _ => unreachable!("kind ranks already compared"),
    }
}

/// Compare two constants: type first, then kind, then payload. Globals
/// and function references compare by name.
pub fn cmp_constants(d: &mut DiffComparator<'_>, l: ValueRef, r: ValueRef) -> Ordering {
    let (left, right) = (d.left, d.right);

    let category = |v: ValueRef| match v {
        ValueRef::Const(_) => 0u64,
        ValueRef::Global(_) => 1,
        ValueRef::Function(_) => 2,
        _ => 3,
    };
    let res = cmp_numbers(category(l), category(r));
    if res != Ordering::Equal {
        return res;
    }

    match (l, r) {
        (ValueRef::Const(cl), ValueRef::Const(cr)) => {
            let kl = left.constant(cl);
            let kr = right.constant(cr);
            let res = d.cmp_types(kl.ty, kr.ty);
            if res != Ordering::Equal {
                return res;
            }
            let res = cmp_numbers(
                u64::from(kl.kind.kind_rank()),
                u64::from(kr.kind.kind_rank()),
            );
            if res != Ordering::Equal {
                return res;
            }
            match (&kl.kind, &kr.kind) {
                (
                    ConstKind::Int {
                        bits: bl,
                        value: vl,
                    },
                    ConstKind::Int {
                        bits: br,
                        value: vr,
                    },
                ) => d.cmp_int_values(*bl, *vl, *br, *vr),
                (ConstKind::Null, ConstKind::Null)
                | (ConstKind::Undef, ConstKind::Undef) => Ordering::Equal,
                _ => unreachable!("kind ranks already compared"),
            }
        }
        (ValueRef::Global(gl), ValueRef::Global(gr)) => {
            let res = d.cmp_types(left.global(gl).ty, right.global(gr).ty);
            if res != Ordering::Equal {
                return res;
            }
            cmp_strings(&left.global(gl).name, &right.global(gr).name)
        }
        (ValueRef::Function(fl), ValueRef::Function(fr)) => {
            let res = d.cmp_types(left.module.func(fl).ty, right.module.func(fr).ty);
            if res != Ordering::Equal {
                return res;
            }
            cmp_strings(&left.module.func(fl).name, &right.module.func(fr).name)
        }
        _ => unreachable!("categories already compared"),
    }
}

/// Compare two values by position-based serial numbering. Constants are
/// compared structurally; every other value gets a per-side serial
/// number on first encounter and the numbers are compared.
pub fn cmp_values(d: &mut DiffComparator<'_>, l: ValueRef, r: ValueRef) -> Ordering {
    if l.is_constant() && r.is_constant() {
        return cmp_constants(d, l, r);
    }
    if l.is_constant() {
        return Ordering::Less;
    }
    if r.is_constant() {
        return Ordering::Greater;
    }

    let next_l = d.sn.left.len();
    let serial_l = *d.sn.left.entry(l).or_insert(next_l);
    let next_r = d.sn.right.len();
    let serial_r = *d.sn.right.entry(r).or_insert(next_r);
    cmp_numbers(serial_l as u64, serial_r as u64)
}

/// Compare two attribute lists lexicographically.
pub fn cmp_attrs(l: &AttributeList, r: &AttributeList) -> Ordering {
    for ((il, sl), (ir, sr)) in l.entries().iter().zip(r.entries().iter()) {
        let res = cmp_numbers(u64::from(*il), u64::from(*ir));
        if res != Ordering::Equal {
            return res;
        }
        let res = cmp_numbers(sl.len() as u64, sr.len() as u64);
        if res != Ordering::Equal {
            return res;
        }
        for (al, ar) in sl.iter().zip(sr.iter()) {
            let res = al.cmp(ar);
            if res != Ordering::Equal {
                return res;
            }
        }
    }
    cmp_numbers(l.entries().len() as u64, r.entries().len() as u64)
}

/// Compare two operations: opcode, operand count, result type, then
/// per-operation state. Returns the verdict and whether operand-by-
/// operand comparison should still proceed (false for member/array
/// accesses, which are compared wholesale).
pub fn cmp_operations(
    d: &mut DiffComparator<'_>,
    l: InstId,
    r: InstId,
) -> (Ordering, bool) {
    let (left, right) = (d.left, d.right);
    let il = left.inst(l);
    let ir = right.inst(r);

    let res = cmp_numbers(u64::from(il.op.opcode()), u64::from(ir.op.opcode()));
    if res != Ordering::Equal {
        return (res, true);
    }
    let res = cmp_numbers(il.operands.len() as u64, ir.operands.len() as u64);
    if res != Ordering::Equal {
        return (res, true);
    }
    let res = d.cmp_types(il.ty, ir.ty);
    if res != Ordering::Equal {
        return (res, true);
    }

    match (&il.op, &ir.op) {
        (Op::Gep { .. }, Op::Gep { .. }) => {
            // Member/array accesses are compared wholesale, indices
            // included; operands must not be compared again.
            return (d.cmp_geps(l, r), false);
        }
        (
            Op::Alloca {
                allocated: tl,
                align: al,
            },
            Op::Alloca {
                allocated: tr,
                align: ar,
            },
        ) => {
            let (tl, tr, al, ar) = (*tl, *tr, *al, *ar);
            let res = d.cmp_types(tl, tr);
            if res != Ordering::Equal {
                return (res, true);
            }
            let res = cmp_numbers(u64::from(al), u64::from(ar));
            if res != Ordering::Equal {
                return (res, true);
            }
        }
        (Op::Load { align: al }, Op::Load { align: ar })
        | (Op::Store { align: al }, Op::Store { align: ar }) => {
            let res = cmp_numbers(u64::from(*al), u64::from(*ar));
            if res != Ordering::Equal {
                return (res, true);
            }
        }
        (Op::Icmp(pl), Op::Icmp(pr)) => {
            let res = cmp_numbers(u64::from(pl.rank()), u64::from(pr.rank()));
            if res != Ordering::Equal {
                return (res, true);
            }
        }
        (Op::Call, Op::Call) => {
            let res = d.cmp_attrs(&il.attrs, &ir.attrs);
            if res != Ordering::Equal {
                return (res, true);
            }
        }
        _ => {}
    }

    (Ordering::Equal, true)
}

/// Compare two member/array accesses structurally: address space, then
/// accumulated constant offsets when both are computable, otherwise
/// source type and operands pairwise.
pub fn cmp_geps(d: &mut DiffComparator<'_>, l: InstId, r: InstId) -> Ordering {
    let (left, right) = (d.left, d.right);
    let il = left.inst(l);
    let ir = right.inst(r);
    let (Op::Gep { source: src_l }, Op::Gep { source: src_r }) = (&il.op, &ir.op) else {
        return Ordering::Greater;
    };
    let (src_l, src_r) = (*src_l, *src_r);

    let res = cmp_numbers(
        u64::from(left.pointer_address_space(il.operands[0])),
        u64::from(right.pointer_address_space(ir.operands[0])),
    );
    if res != Ordering::Equal {
        return res;
    }

    let offset_l = left
        .constant_indices(il)
        .and_then(|idx| left.module.gep_constant_offset(src_l, &idx));
    let offset_r = right
        .constant_indices(ir)
        .and_then(|idx| right.module.gep_constant_offset(src_r, &idx));
    if let (Some(ol), Some(or)) = (offset_l, offset_r) {
        return cmp_numbers(ol, or);
    }

    let res = d.cmp_types(src_l, src_r);
    if res != Ordering::Equal {
        return res;
    }
    let res = cmp_numbers(il.operands.len() as u64, ir.operands.len() as u64);
    if res != Ordering::Equal {
        return res;
    }
    let pairs: Vec<(ValueRef, ValueRef)> = il
        .operands
        .iter()
        .copied()
        .zip(ir.operands.iter().copied())
        .collect();
    for (ol, or) in pairs {
        let res = d.cmp_values(ol, or);
        if res != Ordering::Equal {
            return res;
        }
    }
    Ordering::Equal
}

/// Lock-step driver for a function pair: signature, parameter pairing,
/// then breadth-first block pairing. Block bodies are compared through
/// the differential basic-block comparator.
pub fn compare_functions(d: &mut DiffComparator<'_>) -> Ordering {
    let (left, right) = (d.left, d.right);
    let fl = left.func();
    let fr = right.func();

    let attrs_l = fl.attrs.clone();
    let attrs_r = fr.attrs.clone();
    let res = d.cmp_attrs(&attrs_l, &attrs_r);
    if res != Ordering::Equal {
        return res;
    }
    let res = cmp_numbers(fl.params.len() as u64, fr.params.len() as u64);
    if res != Ordering::Equal {
        return res;
    }
    let res = d.cmp_types(fl.ty, fr.ty);
    if res != Ordering::Equal {
        return res;
    }

    match (fl.is_declaration(), fr.is_declaration()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    for i in 0..fl.params.len() {
        let res = d.cmp_values(ValueRef::Arg(i as u32), ValueRef::Arg(i as u32));
        if res != Ordering::Equal {
            return res;
        }
    }

    let mut visited = FxHashSet::default();
    let mut worklist = Vec::new();
    let (Some(entry_l), Some(entry_r)) = (fl.entry(), fr.entry()) else {
        // Both have bodies at this point.
        return Ordering::Equal;
    };
    visited.insert(entry_l);
    worklist.push((entry_l, entry_r));

    while let Some((bl, br)) = worklist.pop() {
        let res = d.cmp_values(ValueRef::Block(bl), ValueRef::Block(br));
        if res != Ordering::Equal {
            return res;
        }
        let res = d.cmp_basic_blocks(bl, br);
        if res != Ordering::Equal {
            return res;
        }

        let succs_l = fl.successors(bl);
        let succs_r = fr.successors(br);
        let res = cmp_numbers(succs_l.len() as u64, succs_r.len() as u64);
        if res != Ordering::Equal {
            return res;
        }
        for (&sl, &sr) in succs_l.iter().zip(succs_r.iter()) {
            if visited.insert(sl) {
                worklist.push((sl, sr));
            }
        }
    }

    Ordering::Equal
}
