use irdiff_ir::{BinOp, CastKind, ModuleBuilder, Predicate};

use super::*;

fn cfg(control_flow_only: bool) -> CompareConfig {
    CompareConfig {
        control_flow_only,
        ..CompareConfig::default()
    }
}

fn compare_pair(
    ml: &Module,
    fl: FunId,
    mr: &Module,
    fr: FunId,
    di: &DebugInfo,
    config: CompareConfig,
) -> Ordering {
    let mut d = DiffComparator::new(FnSide::new(ml, fl), FnSide::new(mr, fr), di, config);
    d.compare()
}

fn add_one_module(addend: u64) -> (Module, FunId) {
    let mut m = ModuleBuilder::new("m", 64);
    let i32t = m.int(32);
    let f = m.declare("add1", i32t, &[i32t]);
    let c = m.const_int(32, addend);
    let mut b = m.body();
    let sum = b.binary(BinOp::Add, i32t, ValueRef::Arg(0), c);
    b.ret_val(sum);
    m.define(f, b);
    (m.build(), f)
}

fn ret_const_module(bits: u32, value: u64) -> (Module, FunId, irdiff_ir::ConstId) {
    let mut m = ModuleBuilder::new("m", 64);
    let ty = m.int(bits);
    let f = m.declare("get", ty, &[]);
    let c = m.const_int(bits, value);
    let mut b = m.body();
    b.ret_val(c);
    m.define(f, b);
    (m.build(), f, c.as_const().unwrap())
}

fn branching_module(then_val: u64) -> (Module, FunId) {
    let mut m = ModuleBuilder::new("m", 64);
    let i1t = m.int(1);
    let i32t = m.int(32);
    let f = m.declare("pick", i32t, &[i1t]);
    let a = m.const_int(32, then_val);
    let fallback = m.const_int(32, 9);
    let mut b = m.body();
    let then_bb = b.block();
    let else_bb = b.block();
    b.cond_br(ValueRef::Arg(0), then_bb, else_bb);
    b.switch_to(then_bb);
    b.ret_val(a);
    b.switch_to(else_bb);
    b.ret_val(fallback);
    m.define(f, b);
    (m.build(), f)
}

/// `get_b(%pair*)`: a member access into struct `pair` at `field_index`,
/// then a load of the field.
fn field_access_module(fields: &[u32], field_index: u64) -> (Module, FunId, TypeId) {
    let mut m = ModuleBuilder::new("m", 64);
    let i64t = m.int(64);
    let field_tys: Vec<TypeId> = fields.iter().map(|&bits| m.int(bits)).collect();
    let st = m.structure("pair", &field_tys, false);
    let stp = m.ptr(st);
    let i64p = m.ptr(i64t);
    let f = m.declare("get_b", i64t, &[stp]);
    let zero = m.const_int(32, 0);
    let idx = m.const_int(32, field_index);
    let mut b = m.body();
    let field = b.gep(i64p, st, ValueRef::Arg(0), &[zero, idx]);
    let v = b.load(i64t, field, 8);
    b.ret_val(v);
    m.define(f, b);
    (m.build(), f, st)
}

/// `make()`: a `kmalloc` of `size` bytes bitcast to a pointer to struct
/// `buf` with `field_count` i32 fields.
fn alloc_module(field_count: usize, size: u64) -> (Module, FunId) {
    let mut m = ModuleBuilder::new("m", 64);
    let i32t = m.int(32);
    let i64t = m.int(64);
    let i8t = m.int(8);
    let i8p = m.ptr(i8t);
    let void = m.void();
    let fields = vec![i32t; field_count];
    let st = m.structure("buf", &fields, false);
    let stp = m.ptr(st);
    let kmalloc = m.declare("kmalloc", i8p, &[i64t, i64t]);
    let f = m.declare("make", void, &[]);
    let size_c = m.const_int(64, size);
    let flags = m.const_int(64, 0);
    let callee = m.fn_ref(kmalloc);
    let mut b = m.body();
    let raw = b.call(i8p, callee, &[size_c, flags]);
    b.cast(CastKind::Bitcast, stp, raw);
    b.ret();
    m.define(f, b);
    (m.build(), f)
}

/// `clear()`: a stack slot of struct `buf` zeroed via the memset
/// intrinsic with a `size` argument.
fn memset_module(field_count: usize, size: u64) -> (Module, FunId) {
    let mut m = ModuleBuilder::new("m", 64);
    let i32t = m.int(32);
    let i8t = m.int(8);
    let i8p = m.ptr(i8t);
    let void = m.void();
    let fields = vec![i32t; field_count];
    let st = m.structure("buf", &fields, false);
    let stp = m.ptr(st);
    let memset = m.declare_memset();
    let f = m.declare("clear", void, &[]);
    let zero8 = m.const_int(8, 0);
    let size_c = m.const_int(64, size);
    let not_volatile = m.const_int(1, 0);
    let callee = m.fn_ref(memset);
    let mut b = m.body();
    let slot = b.alloca(st, stp, 4);
    let raw = b.cast(CastKind::Bitcast, i8p, slot);
    b.call(void, callee, &[raw, zero8, size_c, not_volatile]);
    b.ret();
    m.define(f, b);
    (m.build(), f)
}

/// `caller(i32)`: calls `helper` forwarding its argument; `extra`, when
/// set, appends that constant as a trailing argument.
fn call_module(extra: Option<u64>) -> (Module, FunId) {
    let mut m = ModuleBuilder::new("m", 64);
    let i32t = m.int(32);
    let params: Vec<TypeId> = if extra.is_some() {
        vec![i32t, i32t]
    } else {
        vec![i32t]
    };
    let helper = m.declare("helper", i32t, &params);
    let f = m.declare("caller", i32t, &[i32t]);
    let mut args = vec![ValueRef::Arg(0)];
    if let Some(value) = extra {
        args.push(m.const_int(32, value));
    }
    let callee = m.fn_ref(helper);
    let mut b = m.body();
    let v = b.call(i32t, callee, &args);
    b.ret_val(v);
    m.define(f, b);
    (m.build(), f)
}

fn icmp_module(pred: Predicate) -> (Module, FunId) {
    let mut m = ModuleBuilder::new("m", 64);
    let i1t = m.int(1);
    let i32t = m.int(32);
    let f = m.declare("less", i1t, &[i32t, i32t]);
    let mut b = m.body();
    let c = b.icmp(pred, i1t, ValueRef::Arg(0), ValueRef::Arg(1));
    b.ret_val(c);
    m.define(f, b);
    (m.build(), f)
}

#[test]
fn test_identical_functions_equal() {
    let (ml, fl) = add_one_module(1);
    let (mr, fr) = add_one_module(1);
    let di = DebugInfo::new();
    let mut d = DiffComparator::new(
        FnSide::new(&ml, fl),
        FnSide::new(&mr, fr),
        &di,
        cfg(false),
    );
    assert_eq!(d.compare(), Ordering::Equal);
    assert_eq!(d.take_inline_request(), None);
}

#[test]
fn test_differing_constant_not_equal() {
    let (ml, fl) = add_one_module(1);
    let (mr, fr) = add_one_module(2);
    let di = DebugInfo::new();
    assert_ne!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
}

#[test]
fn test_branching_functions_equal() {
    let (ml, fl) = branching_module(7);
    let (mr, fr) = branching_module(7);
    let di = DebugInfo::new();
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );

    let (mr2, fr2) = branching_module(8);
    assert_ne!(
        compare_pair(&ml, fl, &mr2, fr2, &di, cfg(false)),
        Ordering::Equal
    );
}

#[test]
fn test_int_width_relaxed_in_control_flow_only() {
    let (ml, fl, _) = ret_const_module(8, 3);
    let (mr, fr, _) = ret_const_module(32, 3);
    let di = DebugInfo::new();
    assert_ne!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(true)),
        Ordering::Equal
    );

    // Numeric values must still agree.
    let (mr2, fr2, _) = ret_const_module(32, 4);
    assert_ne!(
        compare_pair(&ml, fl, &mr2, fr2, &di, cfg(true)),
        Ordering::Equal
    );
}

#[test]
fn test_macro_value_change_tolerated() {
    let (ml, fl, cl) = ret_const_module(32, 5);
    let (mr, fr, cr) = ret_const_module(32, 7);

    let mut di = DebugInfo::new();
    di.add_macro_text(Side::Left, cl, "MAX_RETRIES");
    di.add_macro_text(Side::Right, cr, "MAX_RETRIES");
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );

    // Without the right side's record the textual forms do not match.
    let mut di = DebugInfo::new();
    di.add_macro_text(Side::Left, cl, "MAX_RETRIES");
    assert_ne!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
}

#[test]
fn test_renumbered_field_matched_by_name() {
    let (ml, fl, st_l) = field_access_module(&[32, 64], 1);
    let (mr, fr, st_r) = field_access_module(&[64, 32], 0);

    let mut di = DebugInfo::new();
    di.add_field_name(Side::Left, st_l, 1, "b");
    di.add_field_name(Side::Right, st_r, 0, "b");
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );

    // Without field names the differing offsets are a real change.
    let di = DebugInfo::new();
    assert_ne!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
}

#[test]
fn test_field_rename_is_a_change() {
    let (ml, fl, st_l) = field_access_module(&[32, 64], 1);
    let (mr, fr, st_r) = field_access_module(&[64, 32], 0);

    let mut di = DebugInfo::new();
    di.add_field_name(Side::Left, st_l, 1, "b");
    di.add_field_name(Side::Right, st_r, 0, "c");
    assert_ne!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
}

#[test]
fn test_grown_allocation_tolerated() {
    // { i32, i32 } grew to { i32, i32, i32 }; each size matches its own
    // structure.
    let (ml, fl) = alloc_module(2, 8);
    let (mr, fr) = alloc_module(3, 12);
    let di = DebugInfo::new();
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
}

#[test]
fn test_wrong_allocation_size_not_equal() {
    let (ml, fl) = alloc_module(2, 8);
    let (mr, fr) = alloc_module(3, 16);
    let di = DebugInfo::new();
    assert_ne!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
}

#[test]
fn test_grown_memset_tolerated() {
    let (ml, fl) = memset_module(2, 8);
    let (mr, fr) = memset_module(3, 12);
    let di = DebugInfo::new();
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );

    let (mr2, fr2) = memset_module(3, 16);
    assert_ne!(
        compare_pair(&ml, fl, &mr2, fr2, &di, cfg(false)),
        Ordering::Equal
    );
}

#[test]
fn test_extra_zero_argument_tolerated_in_control_flow_only() {
    let (ml, fl) = call_module(Some(0));
    let (mr, fr) = call_module(None);
    let di = DebugInfo::new();
    assert_ne!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(true)),
        Ordering::Equal
    );

    // A non-zero extra argument changes behavior.
    let (ml2, fl2) = call_module(Some(5));
    assert_ne!(
        compare_pair(&ml2, fl2, &mr, fr, &di, cfg(true)),
        Ordering::Equal
    );
}

#[test]
fn test_ignorable_cast_skipped_in_control_flow_only() {
    let mut m = ModuleBuilder::new("old", 64);
    let i32t = m.int(32);
    let i64t = m.int(64);
    let fl = m.declare("widen", i64t, &[i32t]);
    let mut b = m.body();
    let w = b.cast(CastKind::SExt, i64t, ValueRef::Arg(0));
    b.ret_val(w);
    m.define(fl, b);
    let ml = m.build();

    let mut m = ModuleBuilder::new("new", 64);
    let i32t = m.int(32);
    let fr = m.declare("widen", i32t, &[i32t]);
    let mut b = m.body();
    b.ret_val(ValueRef::Arg(0));
    m.define(fr, b);
    let mr = m.build();

    let di = DebugInfo::new();
    assert_ne!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(true)),
        Ordering::Equal
    );
}

#[test]
fn test_ignorable_alloca_skipped_in_control_flow_only() {
    let mut m = ModuleBuilder::new("old", 64);
    let i32t = m.int(32);
    let i32p = m.ptr(i32t);
    let fl = m.declare("pass", i32t, &[i32t]);
    let mut b = m.body();
    b.alloca(i32t, i32p, 4);
    b.ret_val(ValueRef::Arg(0));
    m.define(fl, b);
    let ml = m.build();

    let mut m = ModuleBuilder::new("new", 64);
    let i32t = m.int(32);
    let fr = m.declare("pass", i32t, &[i32t]);
    let mut b = m.body();
    b.ret_val(ValueRef::Arg(0));
    m.define(fr, b);
    let mr = m.build();

    let di = DebugInfo::new();
    assert_ne!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(true)),
        Ordering::Equal
    );
}

#[test]
fn test_comparison_signedness_relaxed_in_control_flow_only() {
    let (ml, fl) = icmp_module(Predicate::Slt);
    let (mr, fr) = icmp_module(Predicate::Ult);
    let di = DebugInfo::new();
    assert_ne!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(true)),
        Ordering::Equal
    );

    // Direction still matters.
    let (mr2, fr2) = icmp_module(Predicate::Sgt);
    assert_ne!(
        compare_pair(&ml, fl, &mr2, fr2, &di, cfg(true)),
        Ordering::Equal
    );
}

#[test]
fn test_inline_attributes_ignored() {
    let mut m = ModuleBuilder::new("old", 64);
    let i32t = m.int(32);
    let fl = m.declare("add1", i32t, &[i32t]);
    m.add_fn_attr(fl, 2, Attr::AlwaysInline);
    let one = m.const_int(32, 1);
    let mut b = m.body();
    let sum = b.binary(BinOp::Add, i32t, ValueRef::Arg(0), one);
    b.ret_val(sum);
    m.define(fl, b);
    let ml = m.build();

    let (mr, fr) = add_one_module(1);
    let di = DebugInfo::new();
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
}

#[test]
fn test_other_attributes_still_compared() {
    let mut m = ModuleBuilder::new("old", 64);
    let i32t = m.int(32);
    let fl = m.declare("add1", i32t, &[i32t]);
    m.add_fn_attr(fl, 2, Attr::Cold);
    let one = m.const_int(32, 1);
    let mut b = m.body();
    let sum = b.binary(BinOp::Add, i32t, ValueRef::Arg(0), one);
    b.ret_val(sum);
    m.define(fl, b);
    let ml = m.build();

    let (mr, fr) = add_one_module(1);
    let di = DebugInfo::new();
    assert_ne!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
}

#[test]
fn test_call_site_inline_attr_ignored() {
    let caller = |site_attr: Option<Attr>| {
        let mut m = ModuleBuilder::new("m", 64);
        let i32t = m.int(32);
        let helper = m.declare("helper", i32t, &[i32t]);
        let f = m.declare("top", i32t, &[i32t]);
        let callee = m.fn_ref(helper);
        let mut b = m.body();
        let v = b.call(i32t, callee, &[ValueRef::Arg(0)]);
        b.ret_val(v);
        m.define(f, b);
        let mut module = m.build();
        if let (Some(attr), ValueRef::Inst(site)) = (site_attr, v) {
            module.func_mut(f).insts[site.index()].attrs.add(0, attr);
        }
        (module, f)
    };

    let (ml, fl) = caller(Some(Attr::AlwaysInline));
    let (mr, fr) = caller(None);
    let di = DebugInfo::new();
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );

    // A behavioral call-site attribute is still a change.
    let (ml2, fl2) = caller(Some(Attr::Cold));
    assert_ne!(
        compare_pair(&ml2, fl2, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
}

#[test]
fn test_unmatched_call_records_inline_request() {
    let mut m = ModuleBuilder::new("old", 64);
    let i32t = m.int(32);
    let helper = m.declare("helper", i32t, &[]);
    let one = m.const_int(32, 1);
    let mut hb = m.body();
    hb.ret_val(one);
    m.define(helper, hb);
    let fl = m.declare("top", i32t, &[]);
    let callee = m.fn_ref(helper);
    let mut b = m.body();
    let v = b.call(i32t, callee, &[]);
    b.ret_val(v);
    m.define(fl, b);
    let ml = m.build();

    let mut m = ModuleBuilder::new("new", 64);
    let i32t = m.int(32);
    let fr = m.declare("top", i32t, &[]);
    let one = m.const_int(32, 1);
    let mut b = m.body();
    b.ret_val(one);
    m.define(fr, b);
    let mr = m.build();

    let di = DebugInfo::new();
    let mut d = DiffComparator::new(
        FnSide::new(&ml, fl),
        FnSide::new(&mr, fr),
        &di,
        cfg(false),
    );
    assert_ne!(d.compare(), Ordering::Equal);
    assert_eq!(
        d.take_inline_request(),
        Some(InlineRequest {
            side: Side::Left,
            callee: helper,
        })
    );
    // The slot is cleared once taken.
    assert_eq!(d.take_inline_request(), None);
}

#[test]
fn test_divergent_block_refs_tolerated() {
    let (ml, fl) = add_one_module(1);
    let (mr, fr) = add_one_module(1);
    let di = DebugInfo::new();
    let mut d = DiffComparator::new(
        FnSide::new(&ml, fl),
        FnSide::new(&mr, fr),
        &di,
        cfg(false),
    );
    assert_eq!(
        d.cmp_values(ValueRef::Block(BlockId(0)), ValueRef::Block(BlockId(0))),
        Ordering::Equal
    );
    // The left side saw an extra block; serial numbers diverge but the
    // comparison is allowed to continue.
    assert_eq!(
        d.cmp_values(ValueRef::Block(BlockId(1)), ValueRef::Block(BlockId(0))),
        Ordering::Equal
    );
}

#[test]
fn test_declarations_compare_by_signature() {
    let mut m = ModuleBuilder::new("old", 64);
    let i32t = m.int(32);
    let fl = m.declare("ext", i32t, &[i32t]);
    let ml = m.build();

    let mut m = ModuleBuilder::new("new", 64);
    let i32t = m.int(32);
    let fr = m.declare("ext", i32t, &[i32t]);
    let mr = m.build();

    let di = DebugInfo::new();
    assert_eq!(
        compare_pair(&ml, fl, &mr, fr, &di, cfg(false)),
        Ordering::Equal
    );
}
