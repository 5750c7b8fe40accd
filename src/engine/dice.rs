//! Dice and factorial primitives.
//!
//! Both are stateless apart from the shared `EvaluationResult` they report
//! into. Randomness goes through the [`Roller`] trait so tests can swap the
//! thread-local generator for a seeded or scripted one.

use crate::api::Options;
use crate::{EvalError, EvaluationResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of die rolls.
pub trait Roller {
    /// Roll one `faces`-sided die: uniform over `1..=faces`.
    ///
    /// `faces` is always at least 1.
    fn roll_die(&mut self, faces: u32) -> u32;
}

/// Rolls with `rand::thread_rng`, fetched fresh for every die.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRoller;

impl Roller for ThreadRoller {
    fn roll_die(&mut self, faces: u32) -> u32 {
        rand::thread_rng().gen_range(1..=faces)
    }
}

/// Deterministic roller for reproducible runs.
#[derive(Debug, Clone)]
pub struct SeededRoller {
    rng: StdRng,
}

impl SeededRoller {
    pub fn new(seed: u64) -> Self {
        SeededRoller { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Roller for SeededRoller {
    fn roll_die(&mut self, faces: u32) -> u32 {
        self.rng.gen_range(1..=faces)
    }
}

/// Sum of `count` rolls of a `faces`-sided die.
///
/// Both operands are rounded to the nearest integer. A negative count rolls
/// `|count|` dice and negates every roll. `verbose` (the `D` operator) also
/// itemises the rolls in the roll summary, within the configured caps.
pub(crate) fn roll(
    count: f64,
    faces: f64,
    result: &mut EvaluationResult,
    roller: &mut dyn Roller,
    options: &Options,
    verbose: bool,
) -> f64 {
    let source = format!("{count}d{faces}");
    let rounded = count.round();
    if !rounded.is_finite() || rounded.abs() > f64::from(options.max_rolls) {
        return result.throw(EvalError::TooManyRolls { count, max: options.max_rolls });
    }

    // Bounded by `max_rolls` above.
    let dice = rounded.abs() as u64;
    if dice == 0 {
        result.echo("Rolled 0 dice.", &source);
        return 0.0;
    }

    let faces = faces.round();
    if faces.is_nan() || faces < 1.0 {
        return result.throw(EvalError::FacelessDie);
    }
    let faces = faces.min(f64::from(u32::MAX)) as u32;
    let sign: i64 = if rounded < 0.0 { -1 } else { 1 };

    if verbose {
        result.new_dice(faces);
    }

    let mut sum = 0.0;
    let mut listed = String::new();
    let mut trace_chars = 0;
    let mut shown = 0;
    for _ in 0..dice {
        let value = i64::from(roller.roll_die(faces)) * sign;
        sum += value as f64;

        if trace_chars < options.max_verbose_chars {
            let text = value.to_string();
            trace_chars += text.len() + 2;
            shown += 1;
            if verbose {
                result.new_roll(value);
            }
            if !listed.is_empty() {
                listed.push_str(", ");
            }
            listed.push_str(&text);
        }
    }
    result.dice_rolled += dice;

    let truncated = shown < dice;
    if verbose {
        result.end_dice(truncated);
    }
    let ellipsis = if truncated { ", ..." } else { "" };
    let minus = if sign < 0 { "-" } else { "" };
    result.echo(format!("Rolled values: {listed}{ellipsis} on {minus}{dice}d{faces}."), &source);
    sum
}

/// `x!`, with `x` rounded to the nearest integer.
///
/// Anything below 2 yields 1. Overflow to infinity is an error that forces
/// the trace on, since the overflowing operand is often computed.
pub(crate) fn factorial(x: f64, result: &mut EvaluationResult) -> f64 {
    let n = x.round();
    let mut value = 1.0_f64;
    let mut i = n;
    while i > 1.0 {
        value *= i;
        if value.is_infinite() {
            return result.throw(EvalError::FactorialOverflow);
        }
        i -= 1.0;
    }

    result.echo(format!("Calculated the factorial of {x}, rounded to {n}!"), &format!("{x}!"));
    value
}
