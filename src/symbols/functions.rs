use crate::Symbol;
use crate::symbols::predicates::{is_positive, is_strict_positive, is_unit_interval, not_nan, valid_log_args};

pub fn get() -> Vec<Symbol> {
    vec![
        symbol!(unary: "abs" => f64::abs),
        symbol!(unary: "sqrt" => f64::sqrt, domain: is_positive),
        symbol!(unary: "cbrt" => f64::cbrt),
        symbol!(unary: "ln" => f64::ln, domain: is_strict_positive),
        symbol!(unary: "tan" => f64::tan),
        symbol!(unary: "sin" => f64::sin),
        symbol!(unary: "cos" => f64::cos),
        symbol!(unary: "arctan" => f64::atan),
        symbol!(unary: "arcsin" => f64::asin, domain: is_unit_interval),
        symbol!(unary: "arccos" => f64::acos, domain: is_unit_interval),
        symbol!(unary: "ceil" => f64::ceil),
        symbol!(unary: "floor" => f64::floor),
        symbol!(many: "max" => max, args: 1..=usize::MAX, domain: not_nan),
        symbol!(many: "min" => min, args: 1..=usize::MAX, domain: not_nan),
        symbol!(many: "log" => log, args: 1..=2, domain: valid_log_args),
    ]
}

fn max(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn min(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::INFINITY, f64::min)
}

/// `log(b, a)` is the base-`b` logarithm of `a`; `log(a)` is base 10.
fn log(args: &[f64]) -> f64 {
    match args {
        [a] => a.log10(),
        [b, a] => a.ln() / b.ln(),
        _ => f64::NAN,
    }
}
