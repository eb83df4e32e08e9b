//! End-to-end comparisons of module versions, including the
//! inline-and-retry loop.

use irdiff::{CompareConfig, DebugInfo, Error, ModuleComparator, Verdict};
use irdiff_ir::{BinOp, CastKind, Module, ModuleBuilder, ValueRef};

fn config() -> CompareConfig {
    CompareConfig::default()
}

/// `bump(i32)`: returns its argument plus `addend`.
fn bump_module(name: &str, addend: u64) -> Module {
    let mut m = ModuleBuilder::new(name, 64);
    let i32t = m.int(32);
    let f = m.declare("bump", i32t, &[i32t]);
    let c = m.const_int(32, addend);
    let mut b = m.body();
    let sum = b.binary(BinOp::Add, i32t, ValueRef::Arg(0), c);
    b.ret_val(sum);
    m.define(f, b);
    m.build()
}

/// `top(i32)`: the add-one logic lives in a `helper` function.
fn helper_call_module(name: &str) -> Module {
    let mut m = ModuleBuilder::new(name, 64);
    let i32t = m.int(32);
    let helper = m.declare("helper", i32t, &[i32t]);
    let one = m.const_int(32, 1);
    let mut b = m.body();
    let sum = b.binary(BinOp::Add, i32t, ValueRef::Arg(0), one);
    b.ret_val(sum);
    m.define(helper, b);

    let top = m.declare("top", i32t, &[i32t]);
    let callee = m.fn_ref(helper);
    let mut b = m.body();
    let v = b.call(i32t, callee, &[ValueRef::Arg(0)]);
    b.ret_val(v);
    m.define(top, b);
    m.build()
}

/// `top(i32)`: the add-one logic is written out directly.
fn flat_module(name: &str) -> Module {
    let mut m = ModuleBuilder::new(name, 64);
    let i32t = m.int(32);
    let top = m.declare("top", i32t, &[i32t]);
    let one = m.const_int(32, 1);
    let mut b = m.body();
    let sum = b.binary(BinOp::Add, i32t, ValueRef::Arg(0), one);
    b.ret_val(sum);
    m.define(top, b);
    m.build()
}

#[test]
fn test_identical_modules_equal() {
    let mut cmp = ModuleComparator::new(
        bump_module("old", 1),
        bump_module("new", 1),
        DebugInfo::new(),
        config(),
    );
    assert_eq!(cmp.compare_function("bump").unwrap(), Verdict::Equal);
}

#[test]
fn test_changed_constant_not_equal() {
    let mut cmp = ModuleComparator::new(
        bump_module("old", 1),
        bump_module("new", 2),
        DebugInfo::new(),
        config(),
    );
    assert_eq!(cmp.compare_function("bump").unwrap(), Verdict::NotEqual);
}

#[test]
fn test_logic_moved_into_helper() {
    // The old version calls a helper; the new one was compiled with the
    // helper inlined. Inlining the old call should reconcile them.
    let mut cmp = ModuleComparator::new(
        helper_call_module("old"),
        flat_module("new"),
        DebugInfo::new(),
        config(),
    );
    assert_eq!(cmp.compare_function("top").unwrap(), Verdict::Equal);
}

#[test]
fn test_logic_moved_out_of_helper() {
    let mut cmp = ModuleComparator::new(
        flat_module("old"),
        helper_call_module("new"),
        DebugInfo::new(),
        config(),
    );
    assert_eq!(cmp.compare_function("top").unwrap(), Verdict::Equal);
}

#[test]
fn test_inlined_helper_with_real_change() {
    // Helper-based old version vs a flat new version computing +2:
    // inlining happens but the difference remains.
    let mut m = ModuleBuilder::new("new", 64);
    let i32t = m.int(32);
    let top = m.declare("top", i32t, &[i32t]);
    let two = m.const_int(32, 2);
    let mut b = m.body();
    let sum = b.binary(BinOp::Add, i32t, ValueRef::Arg(0), two);
    b.ret_val(sum);
    m.define(top, b);
    let new = m.build();

    let mut cmp = ModuleComparator::new(
        helper_call_module("old"),
        new,
        DebugInfo::new(),
        config(),
    );
    assert_eq!(cmp.compare_function("top").unwrap(), Verdict::NotEqual);
}

#[test]
fn test_control_flow_only_widening() {
    let mut m = ModuleBuilder::new("old", 64);
    let i32t = m.int(32);
    let i64t = m.int(64);
    let f = m.declare("widen", i64t, &[i32t]);
    let mut b = m.body();
    let w = b.cast(CastKind::SExt, i64t, ValueRef::Arg(0));
    b.ret_val(w);
    m.define(f, b);
    let old = m.build();

    let mut m = ModuleBuilder::new("new", 64);
    let i32t = m.int(32);
    let f = m.declare("widen", i32t, &[i32t]);
    let mut b = m.body();
    b.ret_val(ValueRef::Arg(0));
    m.define(f, b);
    let new = m.build();

    let mut cmp = ModuleComparator::new(
        old.clone(),
        new.clone(),
        DebugInfo::new(),
        config(),
    );
    assert_eq!(cmp.compare_function("widen").unwrap(), Verdict::NotEqual);

    let cfo = CompareConfig {
        control_flow_only: true,
        ..config()
    };
    let mut cmp = ModuleComparator::new(old, new, DebugInfo::new(), cfo);
    assert_eq!(cmp.compare_function("widen").unwrap(), Verdict::Equal);
}

#[test]
fn test_missing_function_is_error() {
    let mut cmp = ModuleComparator::new(
        bump_module("old", 1),
        bump_module("new", 1),
        DebugInfo::new(),
        config(),
    );
    assert!(matches!(
        cmp.compare_function("nope"),
        Err(Error::FunctionNotFound { .. })
    ));
}

#[test]
fn test_compare_all_reports_each_function() {
    let build = |name: &str, changed_addend: u64| {
        let mut m = ModuleBuilder::new(name, 64);
        let i32t = m.int(32);
        for (fname, addend) in [("stable", 1), ("changed", changed_addend)] {
            let f = m.declare(fname, i32t, &[i32t]);
            let c = m.const_int(32, addend);
            let mut b = m.body();
            let sum = b.binary(BinOp::Add, i32t, ValueRef::Arg(0), c);
            b.ret_val(sum);
            m.define(f, b);
        }
        m.build()
    };

    let mut cmp = ModuleComparator::new(
        build("old", 5),
        build("new", 6),
        DebugInfo::new(),
        config(),
    );
    let results = cmp.compare_all().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.contains(&("stable".to_string(), Verdict::Equal)));
    assert!(results.contains(&("changed".to_string(), Verdict::NotEqual)));
}
