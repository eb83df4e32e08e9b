//! Module-level comparison driver.

use std::cmp::Ordering;

use irdiff_cmp::{CompareConfig, DebugInfo, DiffComparator, FnSide, Side};
use irdiff_ir::Module;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::error::{Error, Result};
use crate::inline::inline_call;

/// Outcome of comparing one function pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Semantically equivalent up to recompilation differences.
    Equal,
    /// A real semantic difference was found.
    NotEqual,
}

impl Verdict {
    /// Check if the verdict is [`Verdict::Equal`].
    pub const fn is_equal(self) -> bool {
        matches!(self, Self::Equal)
    }
}

/// Compares functions across two versions of a module.
///
/// When a function pair differs only because logic moved into (or out
/// of) a helper, the comparator inlines the helper into its caller and
/// compares again, bounded by
/// [`CompareConfig::max_inline_attempts`].
pub struct ModuleComparator {
    left: Module,
    right: Module,
    di: DebugInfo,
    config: CompareConfig,
}

impl ModuleComparator {
    /// Create a comparator over two module versions.
    pub const fn new(left: Module, right: Module, di: DebugInfo, config: CompareConfig) -> Self {
        Self {
            left,
            right,
            di,
            config,
        }
    }

    /// Compare the function with the given name in both versions.
    pub fn compare_function(&mut self, name: &str) -> Result<Verdict> {
        let fl = self
            .left
            .func_by_name(name)
            .ok_or_else(|| Error::FunctionNotFound {
                name: name.to_string(),
                module: self.left.name.clone(),
            })?;
        let fr = self
            .right
            .func_by_name(name)
            .ok_or_else(|| Error::FunctionNotFound {
                name: name.to_string(),
                module: self.right.name.clone(),
            })?;

        let mut inlined: FxHashSet<(Side, String)> = FxHashSet::default();
        for attempt in 0..=self.config.max_inline_attempts {
            let request = {
                let mut d = DiffComparator::new(
                    FnSide::new(&self.left, fl),
                    FnSide::new(&self.right, fr),
                    &self.di,
                    self.config,
                );
                if d.compare() == Ordering::Equal {
                    debug!(name, attempt, "functions equal");
                    return Ok(Verdict::Equal);
                }
                d.take_inline_request()
            };
            let Some(req) = request else {
                debug!(name, attempt, "functions differ");
                return Ok(Verdict::NotEqual);
            };

            let (module, caller) = match req.side {
                Side::Left => (&mut self.left, fl),
                Side::Right => (&mut self.right, fr),
            };
            let callee_name = module.func(req.callee).name.clone();
            if !inlined.insert((req.side, callee_name.clone())) {
                // Already tried this callee; the difference is real.
                debug!(name, callee = %callee_name, "inlining exhausted");
                return Ok(Verdict::NotEqual);
            }
            debug!(
                name,
                attempt,
                callee = %callee_name,
                side = ?req.side,
                "inlining and retrying"
            );
            if !inline_call(module, caller, req.callee)? {
                return Ok(Verdict::NotEqual);
            }
        }
        Ok(Verdict::NotEqual)
    }

    /// Compare every function defined in both versions, by name.
    pub fn compare_all(&mut self) -> Result<Vec<(String, Verdict)>> {
        let names: Vec<String> = self
            .left
            .funcs
            .iter()
            .filter(|f| !f.is_declaration())
            .filter(|f| self.right.func_by_name(&f.name).is_some())
            .map(|f| f.name.clone())
            .collect();
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let verdict = self.compare_function(&name)?;
            results.push((name, verdict));
        }
        Ok(results)
    }

    /// The current left module (inlining may have rewritten it).
    pub const fn left(&self) -> &Module {
        &self.left
    }

    /// The current right module (inlining may have rewritten it).
    pub const fn right(&self) -> &Module {
        &self.right
    }
}
