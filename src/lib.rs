//! Arithmetic expression evaluator with dice notation.
//!
//! `dicemath` reduces a free-form, user-typed expression such as
//! `2d6 + 3`, `(2+3)*4`, `2sqrt(9)` or `log(2, 8)` to a single `f64`, and
//! records every reduction step along the way so a caller can show *how* a
//! value was reached, or how far evaluation got before it failed.
//!
//! ```
//! let out = dicemath::evaluate("(2+3)*4");
//! assert_eq!(out.value(), Some(20.0));
//! ```
//!
//! Evaluation never panics and never returns early on the first problem:
//! every error is recorded and the caller checks [`Evaluation::error`] before
//! trusting [`Evaluation::value`].

extern crate self as dicemath;

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod symbols;

pub use api::{
    Evaluation, EvaluationDetails, EvaluationVerbose, Options, evaluate, evaluate_verbose_with, evaluate_with,
    evaluate_with_roller,
};
pub use engine::{Roller, SeededRoller, ThreadRoller};
pub use error::{ErrorKind, EvalError};

// --- Symbols ----------------------------------------------------------------

/// How many arguments a [`Symbol`] consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Arity {
    /// A named constant.
    Zero,
    /// A function of exactly one argument.
    One,
    /// A function taking a `[a;b;...]` argument list of `min..=max` entries.
    Many { min: usize, max: usize },
}

/// A named constant or function.
///
/// The argument count is checked against `arity`, then `domain` checks the
/// values. `eval` is only called once both pass.
pub(crate) struct Symbol {
    pub name: &'static str,
    pub arity: Arity,
    pub eval: fn(&[f64]) -> f64,
    pub domain: fn(&[f64]) -> bool,
}

impl Symbol {
    /// Whether `count` arguments are accepted at all.
    pub fn accepts(&self, count: usize) -> bool {
        match self.arity {
            Arity::Zero => count == 0,
            Arity::One => count == 1,
            Arity::Many { min, max } => (min..=max).contains(&count),
        }
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Symbol")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("eval", &"<function>")
            .field("domain", &"<predicate>")
            .finish()
    }
}

// --- Diagnostic sink --------------------------------------------------------

/// Longest slice a trace step keeps, in characters. Longer slices end in `...`.
pub(crate) const MAX_TRACE_SOURCE: usize = 160;

/// One reduction step: what happened, and the slice it happened to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub message: String,
    pub source: String,
}

/// Accumulator shared by every recursion level of one evaluation.
///
/// Errors and trace steps are append-only. Once an error is recorded the
/// running value is meaningless, but evaluation keeps going so the trace
/// shows how far it got.
#[derive(Debug, Clone)]
pub(crate) struct EvaluationResult {
    pub value: f64,
    pub errors: Vec<EvalError>,
    pub verbose: bool,
    pub steps: Vec<TraceStep>,
    pub rolls: String,
    max_verbose_dice: usize,
    dice_groups: usize,
    pub dice_rolled: u64,
    pub groups_collapsed: usize,
    depth: usize,
    pub max_depth: usize,
}

impl EvaluationResult {
    pub fn new(max_verbose_dice: usize) -> Self {
        EvaluationResult {
            value: 0.0,
            errors: Vec::new(),
            verbose: false,
            steps: Vec::new(),
            rolls: String::new(),
            max_verbose_dice,
            dice_groups: 0,
            dice_rolled: 0,
            groups_collapsed: 0,
            depth: 0,
            max_depth: 0,
        }
    }

    pub fn error_flag(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Record `error` and return the sentinel value `1`.
    pub fn throw(&mut self, error: EvalError) -> f64 {
        log::trace!("error: {error}");
        if error.forces_verbose() {
            self.verbose = true;
        }
        self.errors.push(error);
        1.0
    }

    pub fn echo(&mut self, message: impl Into<String>, source: &str) {
        let message = message.into();
        let source = match source.char_indices().nth(MAX_TRACE_SOURCE) {
            Some((idx, _)) => format!("{}...", &source[..idx]),
            None => source.to_string(),
        };
        log::trace!("{message} [{source}]");
        self.steps.push(TraceStep { message, source });
    }

    pub fn error_text(&self) -> String {
        self.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n")
    }

    /// Render the trace, one ` v: <step> with arg = <slice>` line per step.
    pub fn render_trace(&self) -> String {
        self.steps.iter().map(|s| format!(" v: {} with arg = {}\n", s.message, s.source)).collect()
    }

    pub(crate) fn enter(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // Roll summary. Only the first `max_verbose_dice` verbose rolls are
    // itemised; later ones collapse into a single "...".

    pub(crate) fn new_dice(&mut self, faces: u32) {
        self.dice_groups += 1;
        if self.dice_groups > self.max_verbose_dice {
            if self.dice_groups == self.max_verbose_dice + 1 {
                self.rolls.push_str("...");
            }
            return;
        }
        self.rolls.push_str(&format!("d{faces}:"));
    }

    pub(crate) fn new_roll(&mut self, roll: i64) {
        if self.dice_groups > self.max_verbose_dice {
            return;
        }
        self.rolls.push_str(&format!(" {roll},"));
    }

    pub(crate) fn end_dice(&mut self, truncated: bool) {
        if self.dice_groups > self.max_verbose_dice {
            return;
        }
        if self.rolls.ends_with(',') {
            self.rolls.pop();
        }
        if truncated {
            self.rolls.push_str("...");
        }
        self.rolls.push('\n');
    }
}
