//! The static symbol table: named constants and functions.
//!
//! Symbols are built once, on first use, and never change afterwards. Each
//! entry pairs an evaluation function with a *domain predicate* over the
//! argument vector; the evaluator checks the predicate first and reports a
//! domain error instead of ever calling a function outside its domain.
//!
//! ## Name matching
//!
//! Expressions are not tokenized, so a symbol is found by prefix:
//! `sqrt9`, `pi2` and `log[2;8]` all start with a symbol name followed by
//! its argument text. The longest matching name wins (`electron` over `e`,
//! `cos` over `c`). Names of two or more characters also match without
//! regard to ASCII case; single-letter names (`e`, `c`, `k`, `G`) only match
//! exactly, which keeps `1E5` an E-notation literal.

#[path = "symbols/constants.rs"]
mod constants;
#[path = "symbols/functions.rs"]
mod functions;
#[path = "symbols/predicates.rs"]
mod predicates;

use crate::Symbol;
use once_cell::sync::Lazy;

static SYMBOLS: Lazy<Vec<Symbol>> = Lazy::new(|| {
    let mut table = constants::get();
    table.extend(functions::get());
    table
});

/// All known symbols, constants first.
pub(crate) fn all() -> &'static [Symbol] {
    &SYMBOLS
}

/// Find the longest symbol name that prefixes `text`.
///
/// Returns the symbol and the byte length of the matched prefix.
pub(crate) fn lookup_prefix(text: &str) -> Option<(&'static Symbol, usize)> {
    all()
        .iter()
        .filter(|sym| matches_prefix(text, sym.name))
        .max_by_key(|sym| sym.name.len())
        .map(|sym| (sym, sym.name.len()))
}

fn matches_prefix(text: &str, name: &str) -> bool {
    if text.starts_with(name) {
        return true;
    }
    name.len() >= 2 && text.get(..name.len()).is_some_and(|head| head.eq_ignore_ascii_case(name))
}
