use crate::Symbol;
use std::f64::consts::{E, PI, TAU};

/// Mathematical and physical constants (SI units).
pub fn get() -> Vec<Symbol> {
    vec![
        symbol!(constant: "epsilon" = 8.8541878128e-12),
        symbol!(constant: "electron" = 1.60217662e-19),
        symbol!(constant: "phi" = 1.618033988749),
        symbol!(constant: "G" = 6.67408e-11),
        symbol!(constant: "pi" = PI),
        symbol!(constant: "tau" = TAU),
        symbol!(constant: "mu0" = 1.25663706212e-6),
        symbol!(constant: "k" = 8.9875517923e9),
        symbol!(constant: "e" = E),
        symbol!(constant: "c" = 299792458.0),
    ]
}
