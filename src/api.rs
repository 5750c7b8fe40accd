use crate::engine::{self, Roller, ThreadRoller};
use crate::{EvalError, TraceStep};
use std::time::Duration;

/// Limits and switches for one evaluation.
///
/// These are plain numbers so a host application can feed them from its own
/// configuration store.
#[derive(Debug, Clone)]
pub struct Options {
    /// Largest allowed dice count, in absolute value. `999999d6` is fine with
    /// the default, `1000000d6` is an error.
    pub max_rolls: u32,
    /// How many verbose (`D`) rolls are itemised in the roll summary before
    /// the rest collapse into `...`.
    pub max_verbose_dice: usize,
    /// Character budget for the individual rolls listed per dice roll.
    pub max_verbose_chars: usize,
    /// Render the reduction trace even when no error asked for it.
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { max_rolls: 999_999, max_verbose_dice: 8, max_verbose_chars: 80, verbose: false }
    }
}

/// Result of [`evaluate`] and friends.
///
/// Check [`Evaluation::error`] (or use [`Evaluation::value`]) before
/// trusting `value`: after an error it holds an arbitrary placeholder.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The evaluated input, whitespace stripped.
    pub text: String,
    pub value: f64,
    pub error: bool,
    /// Error messages, one per line.
    pub error_text: String,
    /// The reduction trace, one ` v: <step> with arg = <slice>` line per step.
    /// Empty unless an error forced it on or [`Options::verbose`] is set.
    pub verbose_trace: String,
    /// Individual rolls of verbose (`D`) dice, one line per roll.
    pub roll_summary: String,
}

impl Evaluation {
    pub fn is_ok(&self) -> bool {
        !self.error
    }

    /// The value, or `None` if evaluation failed.
    pub fn value(&self) -> Option<f64> {
        self.is_ok().then_some(self.value)
    }
}

/// Additional details returned by [`evaluate_verbose_with`].
#[derive(Debug, Clone)]
pub struct EvaluationDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Every reduction step, whether or not the trace was rendered.
    pub steps: Vec<TraceStep>,
    /// Every error, in the order it was recorded.
    pub errors: Vec<EvalError>,
    /// Operator classes found in the input (`additive`, `dice`, ...).
    pub tiers: Vec<String>,
    pub groups_collapsed: usize,
    pub dice_rolled: u64,
    pub max_depth: usize,
}

/// Result from [`evaluate_verbose_with`].
#[derive(Debug, Clone)]
pub struct EvaluationVerbose {
    pub evaluation: Evaluation,
    pub details: EvaluationDetails,
}

/// Evaluate `text` with default [`Options`].
///
/// # Example
/// ```
/// use dicemath::evaluate;
///
/// let out = evaluate("2^10 - 24");
/// assert_eq!(out.value(), Some(1000.0));
///
/// let out = evaluate("10/0");
/// assert!(out.error);
/// assert!(out.error_text.contains("divide by zero"));
/// ```
pub fn evaluate(text: &str) -> Evaluation {
    evaluate_with(text, &Options::default())
}

/// Evaluate `text` with the given `options`, rolling dice with the
/// thread-local generator.
pub fn evaluate_with(text: &str, options: &Options) -> Evaluation {
    evaluate_with_roller(text, options, &mut ThreadRoller)
}

/// Evaluate `text`, drawing every die from `roller`.
///
/// Use a [`SeededRoller`](crate::SeededRoller) (or your own [`Roller`]) for
/// reproducible dice.
pub fn evaluate_with_roller(text: &str, options: &Options, roller: &mut dyn Roller) -> Evaluation {
    let run = engine::Evaluator::new(options, roller).run_with_metrics(text);
    to_evaluation(run.input, &run.result)
}

/// Evaluate `text` and also return the raw trace, errors and run metrics.
pub fn evaluate_verbose_with(text: &str, options: &Options) -> EvaluationVerbose {
    let mut roller = ThreadRoller;
    let run = engine::Evaluator::new(options, &mut roller).run_with_metrics(text);

    let details = EvaluationDetails {
        total: run.metrics.total,
        steps: run.result.steps.clone(),
        errors: run.result.errors.clone(),
        tiers: run.metrics.tiers.names(),
        groups_collapsed: run.metrics.groups_collapsed,
        dice_rolled: run.metrics.dice_rolled,
        max_depth: run.metrics.max_depth,
    };

    EvaluationVerbose { evaluation: to_evaluation(run.input, &run.result), details }
}

fn to_evaluation(text: String, result: &crate::EvaluationResult) -> Evaluation {
    Evaluation {
        text,
        value: result.value,
        error: result.error_flag(),
        error_text: result.error_text(),
        verbose_trace: if result.verbose { result.render_trace() } else { String::new() },
        roll_summary: result.rolls.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeededRoller;

    #[test]
    fn evaluate_returns_value() {
        let res = evaluate("2 + 2");
        assert_eq!(res.text, "2+2");
        assert_eq!(res.value(), Some(4.0));
        assert!(res.error_text.is_empty());
        assert!(res.verbose_trace.is_empty());
        assert!(res.roll_summary.is_empty());
    }

    #[test]
    fn empty_input_is_an_error() {
        let res = evaluate("   ");
        assert!(res.error);
        assert_eq!(res.value(), None);
        assert_eq!(res.error_text, "Nothing to evaluate.");
    }

    #[test]
    fn verbose_option_renders_trace() {
        let opts = Options { verbose: true, ..Options::default() };
        let res = evaluate_with("1+2", &opts);
        assert_eq!(
            res.verbose_trace,
            " v: Parsed numerical value 1. with arg = 1\n v: Parsed numerical value 2. with arg = 2\n v: Added 1 + 2. with arg = 1+2\n"
        );
    }

    #[test]
    fn forced_verbose_errors_render_trace() {
        let res = evaluate("2*sqrt(0-4)");
        assert!(res.error);
        assert!(res.verbose_trace.contains("Parsing parentheses (0-4) into (-4)"));

        let res = evaluate("1/0");
        assert!(res.error);
        assert!(res.verbose_trace.is_empty());
    }

    #[test]
    fn seeded_roller_is_reproducible() {
        let opts = Options::default();
        let a = evaluate_with_roller("10D20", &opts, &mut SeededRoller::new(42));
        let b = evaluate_with_roller("10D20", &opts, &mut SeededRoller::new(42));
        assert_eq!(a.value, b.value);
        assert_eq!(a.roll_summary, b.roll_summary);
        assert!(a.roll_summary.starts_with("d20:"));
    }

    #[test]
    fn verbose_details_include_metrics() {
        let res = evaluate_verbose_with("(1+2)*3d1", &Options::default());
        assert_eq!(res.evaluation.value(), Some(9.0));
        assert_eq!(res.details.groups_collapsed, 1);
        assert_eq!(res.details.dice_rolled, 3);
        assert!(res.details.max_depth >= 2);
        assert_eq!(res.details.tiers, vec!["additive", "multiplicative", "dice", "parentheses", "letters"]);
        assert!(res.details.errors.is_empty());
        assert!(!res.details.steps.is_empty());
    }
}
