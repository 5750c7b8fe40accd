//! Precedence evaluator.
//!
//! `Evaluator::evaluate` reduces one slice of an expression to a number. The
//! slice is never tokenized: after parentheses are collapsed (`parens.rs`)
//! each tier below is scanned **right to left** and the slice is split at the
//! first operator found, both halves are evaluated recursively and combined.
//! When no tier applies, the slice must be a symbol application or a literal.
//!
//! ```text
//! tier   operators      neutral   notes
//! 1      + -            0         sign after E or another operator
//! 2      * × / ÷        1         x/0 is an error
//! 3      ^              1         0^0 is an error
//! 4      d D %          1         dice roll, remainder
//! 5      trailing !     1         factorial
//! 6      symbols                  [coefficient] name [argument]
//! 7      literal                  [_] digits [. digits] [E[+-]digits]
//! ```
//!
//! The *neutral* value is what an empty operand evaluates to, which is how
//! `-5`, `+5` and `d20` work without a separate unary grammar.
//!
//! Splitting at the rightmost operator makes every tier left-associative,
//! including `^`: `2^3^2` is `(2^3)^2 = 64`, not `2^9`.
//!
//! Operators inside a `[...]` argument list belong to that list and are
//! never split on at this level.

use super::dice::{Roller, factorial, roll};
use super::metrics::{RunMetrics, RunResult};
use super::parens::NEGATIVE_MARKER;
use super::scan::TierMask;
use crate::api::Options;
use crate::{Arity, EvalError, EvaluationResult, Symbol, symbols};
use std::time::Instant;

/// A reusable evaluator bound to one set of options and one roller.
pub(crate) struct Evaluator<'a> {
    options: &'a Options,
    roller: &'a mut dyn Roller,
}

/// Characters after which `+` and `-` are a sign rather than an operator.
fn is_sign_position(prev: char) -> bool {
    matches!(prev, 'E' | '+' | '-' | '*' | '×' | '/' | '÷' | '^' | 'd' | 'D' | '%')
}

/// Find the rightmost operator in `ops` outside any `[...]` list.
///
/// For the additive tier, `signs` skips `+`/`-` in sign position.
fn rightmost_operator(expr: &str, ops: &[char], signs: bool) -> Option<(usize, char)> {
    let mut depth = 0_i32;
    for (idx, c) in expr.char_indices().rev() {
        match c {
            ']' => depth += 1,
            '[' => depth -= 1,
            _ if depth == 0 && ops.contains(&c) => {
                if signs && expr[..idx].chars().next_back().is_some_and(is_sign_position) {
                    continue;
                }
                return Some((idx, c));
            }
            _ => {}
        }
    }
    None
}

/// Parse a plain decimal literal, honouring the negative marker.
pub(crate) fn parse_literal(expr: &str) -> Result<f64, EvalError> {
    let re = regex!(r"^(_?)((?:\d+\.?\d*|\.\d+)(?:E[+-]?\d+)?)$");
    let Some(caps) = re.captures(expr) else {
        return Err(if expr.contains('E') {
            EvalError::MalformedExponent { found: expr.to_string() }
        } else {
            EvalError::Unparsable { found: expr.to_string() }
        });
    };

    let digits = caps.get(2).map_or("", |m| m.as_str());
    let value: f64 = digits.parse().map_err(|_| EvalError::Unparsable { found: expr.to_string() })?;
    if !value.is_finite() {
        return Err(EvalError::NonFinite { found: expr.to_string() });
    }
    let negative = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
    Ok(if negative { -value } else { value })
}

/// Split a leading numeric coefficient (`2` in `2sqrt9`) from the rest.
fn split_coefficient(expr: &str) -> (&str, &str) {
    let end = expr.find(|c: char| !(c.is_ascii_digit() || c == '.' || c == NEGATIVE_MARKER)).unwrap_or(expr.len());
    expr.split_at(end)
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(options: &'a Options, roller: &'a mut dyn Roller) -> Self {
        Evaluator { options, roller }
    }

    /// Evaluate a whole user-supplied expression.
    ///
    /// Whitespace is stripped first; an expression with nothing left is an
    /// error rather than the neutral value.
    pub(crate) fn run_with_metrics(&mut self, text: &str) -> RunResult {
        let started = Instant::now();
        let input: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let mut result = EvaluationResult::new(self.options.max_verbose_dice);

        result.value = if input.is_empty() {
            result.throw(EvalError::EmptyInput)
        } else {
            self.evaluate(&input, &mut result, 1.0)
        };
        if self.options.verbose {
            result.verbose = true;
        }

        let metrics = RunMetrics::collect(started.elapsed(), TierMask::scan(&input), &result);
        log::debug!(
            "evaluated \"{input}\" = {} ({} errors, {} steps, {:?})",
            result.value,
            result.errors.len(),
            result.steps.len(),
            metrics.total
        );
        RunResult { input, result, metrics }
    }

    /// Evaluate `expr`, or return `neutral` if it is empty.
    ///
    /// Never fails: errors go to `result` and yield the sentinel `1`.
    pub(crate) fn evaluate(&mut self, expr: &str, result: &mut EvaluationResult, neutral: f64) -> f64 {
        if expr.is_empty() {
            return neutral;
        }
        result.enter();
        let value = self.reduce(expr, result);
        result.leave();
        value
    }

    fn reduce(&mut self, expr: &str, result: &mut EvaluationResult) -> f64 {
        let collapsed;
        let expr = if expr.contains(['(', ')']) {
            match self.collapse_parentheses(expr, result) {
                Some(flat) => {
                    collapsed = flat;
                    collapsed.as_str()
                }
                None => return 1.0,
            }
        } else {
            expr
        };
        let mask = TierMask::scan(expr);

        if mask.contains(TierMask::ADDITIVE) {
            if let Some((idx, op)) = rightmost_operator(expr, &['+', '-'], true) {
                return self.additive(expr, idx, op, result);
            }
        }
        if mask.contains(TierMask::MULTIPLICATIVE) {
            if let Some((idx, op)) = rightmost_operator(expr, &['*', '×', '/', '÷'], false) {
                return self.multiplicative(expr, idx, op, result);
            }
        }
        if mask.contains(TierMask::POWER) {
            if let Some((idx, op)) = rightmost_operator(expr, &['^'], false) {
                return self.power(expr, idx, op, result);
            }
        }
        if mask.intersects(TierMask::DICE | TierMask::REMAINDER) {
            if let Some((idx, op)) = rightmost_operator(expr, &['d', 'D', '%'], false) {
                return self.dice_or_remainder(expr, idx, op, result);
            }
        }
        if let Some(operand) = expr.strip_suffix('!') {
            let x = self.evaluate(operand, result, 1.0);
            return factorial(x, result);
        }
        if let Some(value) = self.apply_symbol(expr, result) {
            return value;
        }

        match parse_literal(expr) {
            Ok(value) => {
                result.echo(format!("Parsed numerical value {value}."), expr);
                value
            }
            Err(err) => result.throw(err),
        }
    }

    fn operands(
        &mut self,
        expr: &str,
        idx: usize,
        op: char,
        result: &mut EvaluationResult,
        neutral: f64,
    ) -> (f64, f64) {
        let a = self.evaluate(&expr[..idx], result, neutral);
        let b = self.evaluate(&expr[idx + op.len_utf8()..], result, neutral);
        (a, b)
    }

    fn additive(&mut self, expr: &str, idx: usize, op: char, result: &mut EvaluationResult) -> f64 {
        let (a, b) = self.operands(expr, idx, op, result, 0.0);
        if op == '+' {
            result.echo(format!("Added {a} + {b}."), expr);
            a + b
        } else {
            result.echo(format!("Subtracted {a} - {b}."), expr);
            a - b
        }
    }

    fn multiplicative(&mut self, expr: &str, idx: usize, op: char, result: &mut EvaluationResult) -> f64 {
        let (a, b) = self.operands(expr, idx, op, result, 1.0);
        match op {
            '/' | '÷' if b == 0.0 => result.throw(EvalError::DivideByZero),
            '/' | '÷' => {
                result.echo(format!("Divided {a} / {b}."), expr);
                a / b
            }
            _ => {
                result.echo(format!("Multiplied {a} * {b}."), expr);
                a * b
            }
        }
    }

    fn power(&mut self, expr: &str, idx: usize, op: char, result: &mut EvaluationResult) -> f64 {
        let (a, b) = self.operands(expr, idx, op, result, 1.0);
        if a == 0.0 && b == 0.0 {
            return result.throw(EvalError::ZeroPowZero);
        }
        result.echo(format!("Evaluated {a} ^ {b}."), expr);
        a.powf(b)
    }

    fn dice_or_remainder(&mut self, expr: &str, idx: usize, op: char, result: &mut EvaluationResult) -> f64 {
        let (a, b) = self.operands(expr, idx, op, result, 1.0);
        match op {
            'd' => roll(a, b, result, &mut *self.roller, self.options, false),
            'D' => roll(a, b, result, &mut *self.roller, self.options, true),
            _ if b == 0.0 => result.throw(EvalError::RemainderByZero),
            _ => {
                result.echo(format!("Calculated the remainder of {a} % {b}."), expr);
                a % b
            }
        }
    }

    /// `[coefficient] name [arguments]`, or `None` if no symbol matches.
    fn apply_symbol(&mut self, expr: &str, result: &mut EvaluationResult) -> Option<f64> {
        let (coefficient, rest) = split_coefficient(expr);
        let (symbol, len) = symbols::lookup_prefix(rest)?;
        let tail = &rest[len..];

        let factor = if coefficient.is_empty() {
            1.0
        } else {
            result.echo(format!("Parsing function multiplicand \"{coefficient}\""), expr);
            self.evaluate(coefficient, result, 1.0)
        };

        let value = match symbol.arity {
            Arity::Zero => self.constant(symbol, tail, expr, result),
            Arity::One | Arity::Many { .. } => self.function(symbol, tail, expr, result),
        };
        Some(factor * value)
    }

    /// A constant, multiplied by whatever follows it (`pi2`, `pie`).
    fn constant(&mut self, symbol: &Symbol, tail: &str, expr: &str, result: &mut EvaluationResult) -> f64 {
        let value = (symbol.eval)(&[]);
        result.echo(format!("Parsed constant {} = {value}.", symbol.name), expr);
        if tail.is_empty() { value } else { value * self.evaluate(tail, result, 1.0) }
    }

    fn function(&mut self, symbol: &Symbol, tail: &str, expr: &str, result: &mut EvaluationResult) -> f64 {
        let args = if tail.is_empty() {
            return result.throw(EvalError::MissingArgument { name: symbol.name });
        } else if tail.starts_with('[') {
            match self.argument_list(symbol, tail, result) {
                Some(args) => args,
                None => return 1.0,
            }
        } else {
            vec![self.evaluate(tail, result, 1.0)]
        };

        if !symbol.accepts(args.len()) {
            return result.throw(EvalError::InvalidArguments { name: symbol.name, found: tail.to_string() });
        }
        if !(symbol.domain)(&args) {
            return result.throw(EvalError::Domain { name: symbol.name, args });
        }

        let value = (symbol.eval)(&args);
        match args.as_slice() {
            [a] => result.echo(format!("Evaluating {} of {a}.", symbol.name), expr),
            _ => {
                let list = args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join("; ");
                result.echo(format!("Evaluating multivar function {} with parameter array [{list}].", symbol.name), expr)
            }
        }
        value
    }

    /// Evaluate each `;`-separated entry of a `[a;b;...]` list.
    ///
    /// Returns `None` after recording an error for a malformed list.
    fn argument_list(&mut self, symbol: &Symbol, tail: &str, result: &mut EvaluationResult) -> Option<Vec<f64>> {
        let unbalanced = || EvalError::UnbalancedBrackets { name: symbol.name, found: tail.to_string() };

        let mut depth = 0_i32;
        let mut close = None;
        for (idx, c) in tail.char_indices() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(idx);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(close) = close else {
            result.throw(unbalanced());
            return None;
        };
        if close + 1 != tail.len() {
            result.throw(EvalError::InvalidArguments { name: symbol.name, found: tail.to_string() });
            return None;
        }

        let inner = &tail[1..close];
        let mut pieces = Vec::new();
        let mut depth = 0_i32;
        let mut start = 0;
        for (idx, c) in inner.char_indices() {
            match c {
                '[' => depth += 1,
                ']' => depth -= 1,
                ';' if depth == 0 => {
                    pieces.push(&inner[start..idx]);
                    start = idx + 1;
                }
                _ => {}
            }
        }
        pieces.push(&inner[start..]);

        if pieces.iter().any(|p| p.is_empty()) {
            result.throw(EvalError::InvalidArguments { name: symbol.name, found: tail.to_string() });
            return None;
        }

        result.echo(format!("Parsing {} arguments for function {}.", pieces.len(), symbol.name), tail);
        Some(pieces.into_iter().map(|p| self.evaluate(p, result, 1.0)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SeededRoller;

    fn eval(expr: &str) -> (f64, EvaluationResult) {
        let opts = Options::default();
        let mut roller = SeededRoller::new(7);
        let mut result = EvaluationResult::new(opts.max_verbose_dice);
        let value = Evaluator::new(&opts, &mut roller).evaluate(expr, &mut result, 1.0);
        (value, result)
    }

    fn ok(expr: &str) -> f64 {
        let (value, result) = eval(expr);
        assert!(!result.error_flag(), "unexpected error for '{expr}': {}", result.error_text());
        value
    }

    fn err(expr: &str) -> Vec<EvalError> {
        let (_, result) = eval(expr);
        assert!(result.error_flag(), "expected an error for '{expr}'");
        result.errors
    }

    #[test]
    fn empty_operand_yields_neutral() {
        let opts = Options::default();
        let mut roller = SeededRoller::new(1);
        let mut result = EvaluationResult::new(8);
        let mut ev = Evaluator::new(&opts, &mut roller);
        assert_eq!(ev.evaluate("", &mut result, 0.0), 0.0);
        assert_eq!(ev.evaluate("", &mut result, 1.0), 1.0);
        assert!(result.steps.is_empty());
    }

    #[test]
    fn additive_tier() {
        assert_eq!(ok("2+2"), 4.0);
        assert_eq!(ok("10-4-3"), 3.0);
        assert_eq!(ok("-5"), -5.0);
        assert_eq!(ok("+5"), 5.0);
        assert_eq!(ok("2--3"), 5.0);
        assert_eq!(ok("2*-3"), -6.0);
        assert_eq!(ok("2^-1"), 0.5);
    }

    #[test]
    fn e_notation_is_not_split() {
        assert_eq!(ok("1E-3"), 0.001);
        assert_eq!(ok("2*1E+2"), 200.0);
        assert_eq!(ok("1E2-1"), 99.0);
    }

    #[test]
    fn multiplicative_tier() {
        assert_eq!(ok("3*4"), 12.0);
        assert_eq!(ok("3×4"), 12.0);
        assert_eq!(ok("12/4/3"), 1.0);
        assert_eq!(ok("12÷4"), 3.0);
        assert_eq!(ok("2+3*4"), 14.0);
        assert_eq!(err("10/0"), vec![EvalError::DivideByZero]);
        assert_eq!(err("1÷(1-1)"), vec![EvalError::DivideByZero]);
    }

    #[test]
    fn power_is_left_associative() {
        assert_eq!(ok("2^3"), 8.0);
        assert_eq!(ok("2^3^2"), 64.0);
        assert_eq!(ok("2*3^2"), 18.0);
        assert_eq!(ok("-2^2"), -4.0);
        assert_eq!(ok("(0-2)^2"), 4.0);
        assert_eq!(err("0^0"), vec![EvalError::ZeroPowZero]);
    }

    #[test]
    fn remainder() {
        assert_eq!(ok("10%3"), 1.0);
        assert_eq!(ok("7.5%2"), 1.5);
        assert_eq!(err("4%0"), vec![EvalError::RemainderByZero]);
    }

    #[test]
    fn dice_tier() {
        assert_eq!(ok("1d1"), 1.0);
        assert_eq!(ok("d1"), 1.0);
        assert_eq!(ok("5d1+1"), 6.0);
        assert_eq!(ok("0d6"), 0.0);
        let (value, result) = eval("4d6");
        assert!((4.0..=24.0).contains(&value));
        assert_eq!(result.dice_rolled, 4);
        assert_eq!(err("2d0"), vec![EvalError::FacelessDie]);
    }

    #[test]
    fn verbose_dice_fill_roll_summary() {
        let (_, result) = eval("3D1");
        assert_eq!(result.rolls, "d1: 1, 1, 1\n");
        let (_, result) = eval("3d1");
        assert!(result.rolls.is_empty());
    }

    #[test]
    fn factorial_tier() {
        assert_eq!(ok("3!"), 6.0);
        assert_eq!(ok("0!"), 1.0);
        assert_eq!(ok("3!!"), 720.0);
        assert_eq!(ok("2*3!"), 12.0);
        assert_eq!(ok("(1+2)!"), 6.0);
        assert_eq!(ok("(0*-1)!"), 1.0);
        assert_eq!(ok("(ceil(0-0.5))!"), 1.0);
        assert_eq!(err("200!"), vec![EvalError::FactorialOverflow]);
    }

    #[test]
    fn parentheses() {
        assert_eq!(ok("(2+3)*4"), 20.0);
        assert_eq!(ok("2(3+4)"), 14.0);
        assert_eq!(ok("(1+1)(2+2)"), 8.0);
        assert_eq!(ok("((((1))))"), 1.0);
        assert_eq!(err("(1+2"), vec![EvalError::UnbalancedOpening]);
        assert_eq!(err("1+2)"), vec![EvalError::UnbalancedClosing]);
    }

    #[test]
    fn constants() {
        assert_eq!(ok("pi"), std::f64::consts::PI);
        assert_eq!(ok("2pi"), 2.0 * std::f64::consts::PI);
        assert_eq!(ok("pi2"), std::f64::consts::PI * 2.0);
        assert_eq!(ok("PI"), std::f64::consts::PI);
        assert_eq!(ok("electron"), 1.60217662e-19);
        assert_eq!(ok("c"), 299792458.0);
        assert_eq!(ok("ee"), std::f64::consts::E * std::f64::consts::E);
    }

    #[test]
    fn unary_functions() {
        assert_eq!(ok("sqrt(9)"), 3.0);
        assert_eq!(ok("2sqrt(9)"), 6.0);
        assert_eq!(ok("sqrt(9)2"), 6.0);
        assert_eq!(ok("Sqrt(16)+1"), 5.0);
        assert_eq!(ok("abs(0-3)"), 3.0);
        assert_eq!(ok("floor(2.7)"), 2.0);
        assert_eq!(ok("ceil(2.1)"), 3.0);
        assert_eq!(ok("sqrt(2)^2").round(), 2.0);
    }

    #[test]
    fn domain_violations() {
        assert_eq!(err("sqrt(0-1)"), vec![EvalError::Domain { name: "sqrt", args: vec![-1.0] }]);
        assert_eq!(err("ln(0)"), vec![EvalError::Domain { name: "ln", args: vec![0.0] }]);
        assert_eq!(err("arcsin(2)"), vec![EvalError::Domain { name: "arcsin", args: vec![2.0] }]);
        let (_, result) = eval("sqrt(0-1)");
        assert!(result.verbose);
    }

    #[test]
    fn multi_argument_functions() {
        assert!((ok("log(2,8)") - 3.0).abs() < 1e-12);
        assert_eq!(ok("log(100)"), 2.0);
        assert_eq!(ok("max(1,5,3)"), 5.0);
        assert_eq!(ok("min(4,2+1,9)"), 3.0);
        assert_eq!(ok("max(1,max(2,7))"), 7.0);
        assert_eq!(ok("2max(1,3)"), 6.0);
        assert_eq!(ok("max(1,2)(3)"), 6.0);
        assert_eq!(ok("max(1,2)+1"), 3.0);
        assert_eq!(ok("max(1,2)3"), 6.0);
    }

    #[test]
    fn malformed_argument_lists() {
        assert_eq!(err("log(1,8)"), vec![EvalError::Domain { name: "log", args: vec![1.0, 8.0] }]);
        assert_eq!(err("max(,3)"), vec![EvalError::InvalidArguments { name: "max", found: "[;3]".to_string() }]);
        assert_eq!(err("sqrt(4,9)"), vec![EvalError::InvalidArguments { name: "sqrt", found: "[4;9]".to_string() }]);
        assert_eq!(err("sqrt"), vec![EvalError::MissingArgument { name: "sqrt" }]);
        let errors = err("log(1,2,3)");
        assert_eq!(errors, vec![EvalError::InvalidArguments { name: "log", found: "[1;2;3]".to_string() }]);
        assert_eq!(errors[0].kind(), crate::ErrorKind::Syntax);
        assert_eq!(
            err("max[1;2"),
            vec![EvalError::UnbalancedBrackets { name: "max", found: "[1;2".to_string() }]
        );
    }

    #[test]
    fn literals() {
        assert_eq!(parse_literal("12"), Ok(12.0));
        assert_eq!(parse_literal("1.5"), Ok(1.5));
        assert_eq!(parse_literal(".5"), Ok(0.5));
        assert_eq!(parse_literal("_2"), Ok(-2.0));
        assert_eq!(parse_literal("1E3"), Ok(1000.0));
        assert_eq!(parse_literal("1.2.3"), Err(EvalError::Unparsable { found: "1.2.3".to_string() }));
        assert_eq!(parse_literal("2E"), Err(EvalError::MalformedExponent { found: "2E".to_string() }));
        assert_eq!(parse_literal("1E999"), Err(EvalError::NonFinite { found: "1E999".to_string() }));
        assert!(parse_literal("inf").is_err());
    }

    #[test]
    fn unknown_words_are_unparsable() {
        assert_eq!(err("foo"), vec![EvalError::Unparsable { found: "foo".to_string() }]);
        assert!(eval("foo").1.verbose);
    }

    #[test]
    fn evaluation_continues_after_errors() {
        let errors = err("1/0+sqrt(0-1)");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], EvalError::DivideByZero);

        let (_, result) = eval("1/0+2*3");
        assert!(result.steps.iter().any(|s| s.message == "Multiplied 2 * 3."));
    }

    #[test]
    fn trace_records_reductions() {
        let (_, result) = eval("(2+3)*4");
        let messages: Vec<&str> = result.steps.iter().map(|s| s.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Parsed numerical value 2.",
                "Parsed numerical value 3.",
                "Added 2 + 3.",
                "Parsing parentheses (2+3) into (5)",
                "Parsed numerical value 5.",
                "Parsed numerical value 4.",
                "Multiplied 5 * 4.",
            ]
        );
        assert_eq!(result.groups_collapsed, 1);
    }
}
