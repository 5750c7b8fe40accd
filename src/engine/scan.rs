//! Tier scanning (input pre-classification).
//!
//! Before walking the precedence tiers, the evaluator inspects the slice once
//! and records which operator classes occur in it at all. A tier whose bit is
//! missing is skipped without a right-to-left walk.
//!
//! This is a *heuristic* scan: it ignores bracket depth and the sign rules
//! of the additive tier, so a bit may be set for an operator the tier walk
//! later declines to split on. False positives only cost a walk; there are no
//! false negatives.

bitflags::bitflags! {
    /// Coarse operator classes present in an expression slice.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TierMask: u16 {
        const ADDITIVE       = 1 << 0;
        const MULTIPLICATIVE = 1 << 1;
        const POWER          = 1 << 2;
        const DICE           = 1 << 3;
        const REMAINDER      = 1 << 4;
        const FACTORIAL      = 1 << 5;
        const PARENTHESES    = 1 << 6;
        const ARGUMENT_LIST  = 1 << 7;
        const LETTERS        = 1 << 8;
    }
}

impl TierMask {
    /// Scan `expr` for operator classes.
    pub fn scan(expr: &str) -> Self {
        let mut mask = TierMask::empty();
        for c in expr.chars() {
            mask |= match c {
                '+' | '-' => TierMask::ADDITIVE,
                '*' | '×' | '/' | '÷' => TierMask::MULTIPLICATIVE,
                '^' => TierMask::POWER,
                'd' | 'D' => TierMask::DICE | TierMask::LETTERS,
                '%' => TierMask::REMAINDER,
                '!' => TierMask::FACTORIAL,
                '(' | ')' => TierMask::PARENTHESES,
                '[' | ']' | ';' => TierMask::ARGUMENT_LIST,
                c if c.is_alphabetic() => TierMask::LETTERS,
                _ => TierMask::empty(),
            };
        }
        mask
    }

    /// Lowercase names of the set bits, for reports.
    pub fn names(&self) -> Vec<String> {
        self.iter_names().map(|(name, _)| name.to_ascii_lowercase()).collect()
    }
}
