//! Comparison configuration.

/// Options controlling a function-pair comparison.
#[derive(Clone, Copy, Debug)]
pub struct CompareConfig {
    /// Check only that control flow is equivalent: relaxes value/type
    /// distinctions that do not affect branching (integer widths, casts,
    /// comparison signedness, array lengths) and allows skipping
    /// ignorable instructions.
    pub control_flow_only: bool,
    /// Upper bound on inline-and-retry attempts per function pair.
    pub max_inline_attempts: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            control_flow_only: false,
            max_inline_attempts: 32,
        }
    }
}
