#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a `Symbol` table entry.
///
/// ```text
/// symbol!(constant: "pi" = PI)
/// symbol!(unary: "sqrt" => f64::sqrt, domain: |x| x >= 0.0)
/// symbol!(many: "log" => log, args: 1..=2, domain: valid_log_args)
/// ```
///
/// Unary symbols without an explicit domain accept any single argument.
#[macro_export]
macro_rules! symbol {
    (constant: $name:literal = $value:expr) => {
        $crate::Symbol {
            name: $name,
            arity: $crate::Arity::Zero,
            eval: |_: &[f64]| -> f64 { $value },
            domain: |args: &[f64]| -> bool { args.is_empty() },
        }
    };
    (unary: $name:literal => $f:expr $(,)?) => {
        $crate::symbol!(unary: $name => $f, domain: |_: f64| true)
    };
    (unary: $name:literal => $f:expr, domain: $domain:expr $(,)?) => {
        $crate::Symbol {
            name: $name,
            arity: $crate::Arity::One,
            eval: |args: &[f64]| -> f64 { args.first().copied().map_or(f64::NAN, $f) },
            domain: |args: &[f64]| -> bool {
                match args {
                    [x] => ($domain)(*x),
                    _ => false,
                }
            },
        }
    };
    (many: $name:literal => $f:expr, args: $min:literal ..= $max:expr, domain: $domain:expr $(,)?) => {
        $crate::Symbol {
            name: $name,
            arity: $crate::Arity::Many { min: $min, max: $max },
            eval: $f,
            domain: $domain,
        }
    };
}
