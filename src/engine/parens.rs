//! Parenthesis resolution.
//!
//! Grouping is removed before any operator is looked at. Each step finds the
//! innermost balanced `(...)` group (the one closed by the first `)`) and
//! rewrites the expression string around it:
//!
//! ```text
//! 2(3+4)      ->  2*7          single value, implicit multiplication
//! (0-3)^2     ->  _3^2         negative values use the `_` marker
//! log(2,8)    ->  log[2;8]     argument list, evaluated later by `log`
//! ```
//!
//! An argument list is *not* evaluated here: it is kept as `[a;b;...]` so
//! that a preceding function name can consume it during symbol application.

use super::Evaluator;
use crate::{EvalError, EvaluationResult};

/// Marker for a negative substituted value. `-` would be taken as an
/// operator by the additive tier.
pub(crate) const NEGATIVE_MARKER: char = '_';

/// Locate the innermost group as `(open, close)` byte offsets.
///
/// `Ok(None)` means the expression has no parentheses left.
pub(crate) fn innermost_group(expr: &str) -> Result<Option<(usize, usize)>, EvalError> {
    let mut opens = Vec::new();
    for (idx, c) in expr.char_indices() {
        match c {
            '(' => opens.push(idx),
            ')' => {
                return match opens.pop() {
                    Some(open) => Ok(Some((open, idx))),
                    None => Err(EvalError::UnbalancedClosing),
                };
            }
            _ => {}
        }
    }
    if opens.is_empty() { Ok(None) } else { Err(EvalError::UnbalancedOpening) }
}

/// Rewrite top-level commas of an argument list to `;`.
///
/// Commas inside an already rewritten `[...]` list are left alone.
fn split_arguments(content: &str) -> Option<String> {
    let mut depth = 0_i32;
    let mut found = false;
    let rewritten = content
        .chars()
        .map(|c| match c {
            '[' => {
                depth += 1;
                c
            }
            ']' => {
                depth -= 1;
                c
            }
            ',' if depth == 0 => {
                found = true;
                ';'
            }
            _ => c,
        })
        .collect::<String>();
    found.then_some(rewritten)
}

/// Characters after which a substituted value needs an explicit `*`.
fn ends_operand(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '!' | ']')
}

/// Characters before which a substituted value needs an explicit `*`.
fn starts_operand(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

impl Evaluator<'_> {
    /// Remove every parenthesis group from `expr`, innermost first.
    ///
    /// Returns `None` after recording an error for unbalanced input.
    pub(crate) fn collapse_parentheses(&mut self, expr: &str, result: &mut EvaluationResult) -> Option<String> {
        let mut current = expr.to_string();
        loop {
            match innermost_group(&current) {
                Ok(Some((open, close))) => {
                    current = self.resolve_group(&current, open, close, result);
                    result.groups_collapsed += 1;
                }
                Ok(None) => return Some(current),
                Err(err) => {
                    result.throw(err);
                    return None;
                }
            }
        }
    }

    /// Replace the group spanning `open..=close` in `expr`.
    pub(crate) fn resolve_group(
        &mut self,
        expr: &str,
        open: usize,
        close: usize,
        result: &mut EvaluationResult,
    ) -> String {
        let left = &expr[..open];
        let content = &expr[open + 1..close];
        let right = &expr[close + 1..];

        let star_right = if right.chars().next().is_some_and(starts_operand) { "*" } else { "" };

        if let Some(arguments) = split_arguments(content) {
            result.echo(format!("Parsing function parameters \"{content}\""), expr);
            return format!("{left}[{arguments}]{star_right}{right}");
        }

        let star_left = if left.chars().next_back().is_some_and(ends_operand) { "*" } else { "" };

        let value = if content.is_empty() {
            result.throw(EvalError::Unparsable { found: "()".to_string() })
        } else {
            self.evaluate(content, result, 1.0)
        };
        result.echo(format!("Parsing parentheses ({content}) into ({value})"), expr);

        // `-0` would print a real minus sign.
        let value = if value == 0.0 {
            0.0
        } else if value.is_finite() {
            value
        } else {
            result.throw(EvalError::NonFinite { found: content.to_string() })
        };
        let literal = if value < 0.0 { format!("{NEGATIVE_MARKER}{}", -value) } else { value.to_string() };

        format!("{left}{star_left}{literal}{star_right}{right}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Options;
    use crate::engine::ThreadRoller;

    fn collapse(expr: &str) -> (Option<String>, EvaluationResult) {
        let opts = Options::default();
        let mut roller = ThreadRoller;
        let mut result = EvaluationResult::new(opts.max_verbose_dice);
        let out = Evaluator::new(&opts, &mut roller).collapse_parentheses(expr, &mut result);
        (out, result)
    }

    #[test]
    fn finds_innermost_group() {
        assert_eq!(innermost_group("(1+(2*3))"), Ok(Some((3, 7))));
        assert_eq!(innermost_group("1+2"), Ok(None));
        assert_eq!(innermost_group("1)+(2"), Err(EvalError::UnbalancedClosing));
        assert_eq!(innermost_group("((1)"), Ok(Some((1, 3))));
        assert_eq!(innermost_group("(1"), Err(EvalError::UnbalancedOpening));
    }

    #[test]
    fn inserts_implicit_multiplication() {
        assert_eq!(collapse("2(3)").0.as_deref(), Some("2*3"));
        assert_eq!(collapse("(3)2").0.as_deref(), Some("3*2"));
        assert_eq!(collapse("(2)(3)").0.as_deref(), Some("2*3"));
        assert_eq!(collapse("pi(2)").0.as_deref(), Some("pi2"));
    }

    #[test]
    fn negative_values_use_marker() {
        assert_eq!(collapse("(1-4)^2").0.as_deref(), Some("_3^2"));
        assert_eq!(collapse("2(0-1.5)").0.as_deref(), Some("2*_1.5"));
    }

    #[test]
    fn negative_zero_is_plain_zero() {
        let (out, result) = collapse("(0*-1)!");
        assert_eq!(out.as_deref(), Some("0!"));
        assert!(result.errors.is_empty());
    }

    #[test]
    fn non_finite_group_is_an_error() {
        let (out, result) = collapse("(1E300*1E300)+1");
        assert_eq!(out.as_deref(), Some("1+1"));
        assert_eq!(result.errors, vec![EvalError::NonFinite { found: "1E300*1E300".to_string() }]);

        let (out, result) = collapse("(0^(0-1))");
        assert_eq!(out.as_deref(), Some("1"));
        assert_eq!(result.errors, vec![EvalError::NonFinite { found: "0^_1".to_string() }]);
    }

    #[test]
    fn argument_lists_are_deferred() {
        assert_eq!(collapse("log(2,8)").0.as_deref(), Some("log[2;8]"));
        assert_eq!(collapse("max(1,max(2,3))").0.as_deref(), Some("max[1;max[2;3]]"));
        assert_eq!(collapse("max(1+1,3)").0.as_deref(), Some("max[1+1;3]"));
        assert_eq!(collapse("max(1,2)3").0.as_deref(), Some("max[1;2]*3"));
    }

    #[test]
    fn unbalanced_input_is_an_error() {
        let (out, result) = collapse("(1+2))");
        assert_eq!(out, None);
        assert_eq!(result.errors, vec![EvalError::UnbalancedClosing]);

        let (out, result) = collapse("((1+2)");
        assert_eq!(out, None);
        assert_eq!(result.errors, vec![EvalError::UnbalancedOpening]);
    }

    #[test]
    fn empty_group_is_an_error() {
        let (_, result) = collapse("2()");
        assert_eq!(result.errors, vec![EvalError::Unparsable { found: "()".to_string() }]);
    }
}
