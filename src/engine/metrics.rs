//! Evaluation run metrics.
//!
//! The plain entry points only need the value and the diagnostics. The
//! verbose entry point also reports how long a run took and how much work it
//! did, which is mostly useful when probing pathological inputs such as
//! `999999d6` or thousands of nested parentheses.

use super::TierMask;
use crate::EvaluationResult;
use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for the run.
    pub total: Duration,
    /// Operator classes present anywhere in the (whitespace-stripped) input.
    pub tiers: TierMask,
    /// Number of parenthesis groups collapsed, at every recursion level.
    pub groups_collapsed: usize,
    /// Number of individual dice rolled.
    pub dice_rolled: u64,
    /// Deepest recursion level reached.
    pub max_depth: usize,
}

impl RunMetrics {
    pub(crate) fn collect(total: Duration, tiers: TierMask, result: &EvaluationResult) -> Self {
        RunMetrics {
            total,
            tiers,
            groups_collapsed: result.groups_collapsed,
            dice_rolled: result.dice_rolled,
            max_depth: result.max_depth,
        }
    }
}

/// Evaluator output bundled with its metrics.
#[derive(Debug, Clone)]
pub(crate) struct RunResult {
    /// Whitespace-stripped input that was evaluated.
    pub input: String,
    pub result: EvaluationResult,
    pub metrics: RunMetrics,
}
