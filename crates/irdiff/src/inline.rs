//! Call-site inlining.
//!
//! Expands one direct call in place: the callee body is cloned into the
//! caller's arenas, the call's block is split around the site, callee
//! returns become branches to the continuation, and the branch chains
//! left behind by the expansion are merged away so the rewritten body
//! lines up instruction-for-instruction with naturally inlined code.

use irdiff_ir::{Block, BlockId, FunId, Function, Inst, InstId, Module, Op, ValueRef};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::{Error, Result};

/// Inline the first direct call to `callee` inside `caller`.
///
/// Returns `false` when `caller` contains no such call or `callee` has
/// no body to inline.
pub fn inline_call(module: &mut Module, caller: FunId, callee: FunId) -> Result<bool> {
    let callee_fn = module.func(callee).clone();
    if callee_fn.is_declaration() {
        return Ok(false);
    }

    let func = module.func_mut(caller);
    let mut site = None;
    'search: for (bi, block) in func.blocks.iter().enumerate() {
        for (pos, &id) in block.insts.iter().enumerate() {
            let inst = &func.insts[id.index()];
            if inst.op.is_call() && inst.callee() == Some(ValueRef::Function(callee)) {
                site = Some((bi, pos, id));
                break 'search;
            }
        }
    }
    let Some((site_block, site_pos, call_id)) = site else {
        return Ok(false);
    };
    debug!(
        caller = %func.name,
        callee = %callee_fn.name,
        block = site_block,
        "inlining call"
    );

    let call_inst = func.inst(call_id);
    let call_args: Vec<ValueRef> = call_inst.call_args().to_vec();
    let result_ty = call_inst.ty;

    // Split the call's block: everything after the call moves to a new
    // continuation block. The continuation inherits the old terminator,
    // so it is never empty.
    let tail: Vec<InstId> = func.blocks[site_block].insts.split_off(site_pos + 1);
    func.blocks[site_block].insts.pop();
    let Some(&tail_last) = tail.last() else {
        return Err(Error::Malformed {
            function: func.name.clone(),
            reason: "call instruction terminates a block".to_string(),
        });
    };
    let void_ty = func.inst(tail_last).ty;
    let cont = BlockId(func.blocks.len() as u32);
    func.blocks.push(Block { insts: tail });

    let inst_offset = func.insts.len() as u32;
    let block_offset = func.blocks.len() as u32;

    let remap = |v: ValueRef| -> Result<ValueRef> {
        Ok(match v {
            ValueRef::Arg(i) => {
                *call_args
                    .get(i as usize)
                    .ok_or_else(|| Error::ArgumentOutOfRange {
                        index: i,
                        callee: callee_fn.name.clone(),
                    })?
            }
            ValueRef::Inst(id) => ValueRef::Inst(InstId(id.0 + inst_offset)),
            ValueRef::Block(b) => ValueRef::Block(BlockId(b.0 + block_offset)),
            other => other,
        })
    };

    // Clone the callee's instruction arena with operands rewritten into
    // the caller's value space.
    for inst in &callee_fn.insts {
        let mut operands = Vec::with_capacity(inst.operands.len());
        for &v in &inst.operands {
            operands.push(remap(v)?);
        }
        func.insts.push(Inst {
            op: inst.op.clone(),
            ty: inst.ty,
            operands,
            attrs: inst.attrs.clone(),
        });
    }

    // Clone the callee's blocks; returns become branches to the
    // continuation.
    let mut ret_edges: Vec<(Option<ValueRef>, BlockId)> = Vec::new();
    for (bi, block) in callee_fn.blocks.iter().enumerate() {
        let new_block = BlockId(block_offset + bi as u32);
        let insts: Vec<InstId> = block
            .insts
            .iter()
            .map(|&id| InstId(id.0 + inst_offset))
            .collect();
        if let Some(&last) = insts.last() {
            let terminator = &mut func.insts[last.index()];
            if matches!(terminator.op, Op::Ret) {
                let value = terminator.operands.first().copied();
                *terminator = Inst::new(Op::Br, void_ty, vec![ValueRef::Block(cont)]);
                ret_edges.push((value, new_block));
            }
        }
        func.blocks.push(Block { insts });
    }

    // Branch from the split block into the inlined entry.
    let br_id = InstId(func.insts.len() as u32);
    func.insts.push(Inst::new(
        Op::Br,
        void_ty,
        vec![ValueRef::Block(BlockId(block_offset))],
    ));
    func.blocks[site_block].insts.push(br_id);

    // Route the returned value into the call result's uses: directly for
    // a single return, through a phi in the continuation otherwise.
    let values: Vec<(ValueRef, BlockId)> = ret_edges
        .iter()
        .filter_map(|&(v, b)| v.map(|v| (v, b)))
        .collect();
    let replacement = match values.len() {
        0 => None,
        1 => Some(values[0].0),
        _ => {
            let phi_id = InstId(func.insts.len() as u32);
            let mut operands = Vec::with_capacity(values.len() * 2);
            for &(v, b) in &values {
                operands.push(v);
                operands.push(ValueRef::Block(b));
            }
            func.insts.push(Inst::new(Op::Phi, result_ty, operands));
            func.blocks[cont.index()].insts.insert(0, phi_id);
            Some(ValueRef::Inst(phi_id))
        }
    };
    if let Some(to) = replacement {
        replace_uses(func, ValueRef::Inst(call_id), to);
    }

    merge_trivial_blocks(func);
    Ok(true)
}

/// Rewrite every operand equal to `from` into `to`.
fn replace_uses(func: &mut Function, from: ValueRef, to: ValueRef) {
    for inst in &mut func.insts {
        for v in &mut inst.operands {
            if *v == from {
                *v = to;
            }
        }
    }
}

/// Merge single-predecessor blocks into their unique unconditionally
/// branching predecessor until a fixpoint is reached. Single-incoming
/// phis in a merged block collapse to their value.
fn merge_trivial_blocks(func: &mut Function) {
    let Some(entry) = func.entry() else {
        return;
    };
    loop {
        let mut reachable = FxHashSet::default();
        let mut stack = vec![entry];
        reachable.insert(entry);
        while let Some(b) = stack.pop() {
            for s in func.successors(b) {
                if reachable.insert(s) {
                    stack.push(s);
                }
            }
        }
        let mut preds: FxHashMap<BlockId, usize> = FxHashMap::default();
        for &b in &reachable {
            for s in func.successors(b) {
                *preds.entry(s).or_insert(0) += 1;
            }
        }

        let mut merged = false;
        for index in 0..func.blocks.len() {
            let b = BlockId(index as u32);
            if !reachable.contains(&b) {
                continue;
            }
            let Some(&last) = func.block(b).insts.last() else {
                continue;
            };
            let terminator = func.inst(last);
            if !matches!(terminator.op, Op::Br) || terminator.operands.len() != 1 {
                continue;
            }
            let Some(succ) = terminator.operands[0].as_block() else {
                continue;
            };
            if succ == b || succ == entry || preds.get(&succ) != Some(&1) {
                continue;
            }

            let succ_insts = std::mem::take(&mut func.blocks[succ.index()].insts);
            let mut rewrites: Vec<(ValueRef, ValueRef)> = Vec::new();
            let mut kept = Vec::with_capacity(succ_insts.len());
            for id in succ_insts {
                let inst = &func.insts[id.index()];
                if matches!(inst.op, Op::Phi) && inst.operands.len() == 2 {
                    rewrites.push((ValueRef::Inst(id), inst.operands[0]));
                } else {
                    kept.push(id);
                }
            }
            let insts = &mut func.blocks[b.index()].insts;
            insts.pop();
            insts.extend(kept);
            for (from, to) in rewrites {
                replace_uses(func, from, to);
            }
            merged = true;
            break;
        }
        if !merged {
            return;
        }
    }
}
