//! Domain predicates.
//!
//! Unary predicates take the single argument; the `symbol!` macro wraps them
//! with the one-argument length check. Multi-argument predicates see the
//! whole vector, after its length was checked against the symbol's arity.

pub fn is_positive(x: f64) -> bool {
    x >= 0.0
}

pub fn is_strict_positive(x: f64) -> bool {
    x > 0.0
}

/// `|x| <= 1`, the domain of `arcsin` and `arccos`.
pub fn is_unit_interval(x: f64) -> bool {
    x.abs() <= 1.0
}

pub fn not_nan(args: &[f64]) -> bool {
    args.iter().all(|a| !a.is_nan())
}

/// `log(b, a)`: both positive and the base not 1. A lone argument is a
/// base-10 logarithm and only needs to be positive. The argument count is
/// checked before this runs.
pub fn valid_log_args(args: &[f64]) -> bool {
    match args {
        [a] => *a > 0.0,
        [b, a] => *b > 0.0 && *b != 1.0 && *a > 0.0,
        _ => false,
    }
}
