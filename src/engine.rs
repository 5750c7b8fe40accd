//! Evaluation engine.
//!
//! This module holds the recursive evaluator and the primitives it calls.
//! The submodules under `src/engine/` are declared with `#[path]` so the
//! public paths (`crate::engine::Evaluator`, `crate::engine::Roller`) stay
//! flat.
//!
//! ## How the parts work together
//!
//! ```text
//! input ── strip whitespace ──┐
//!                             v
//!               Evaluator::evaluate (evaluator.rs)
//!                 │
//!                 ├─ collapse_parentheses (parens.rs)
//!                 │    - innermost group first
//!                 │    - `(a,b)` -> `[a;b]`, `(x)` -> literal
//!                 │
//!                 ├─ TierMask::scan (scan.rs)   skip absent tiers
//!                 │
//!                 ├─ tiers, rightmost split first:
//!                 │    + -  │  * × / ÷  │  ^  │  d D %  │  !
//!                 │           roll / factorial (dice.rs)
//!                 │
//!                 ├─ symbol application (crate::symbols)
//!                 └─ literal
//!                             │
//!                             v
//!                    EvaluationResult (value, errors, trace, rolls)
//! ```
//!
//! Every level receives the same `&mut EvaluationResult`. Nothing here
//! returns early on error: a failing step records an `EvalError`, yields the
//! sentinel `1`, and its siblings are still evaluated and traced.
//!
//! ## Responsibilities by module
//!
//! - `evaluator.rs`: the precedence tiers, symbol application, literals.
//! - `parens.rs`: finds and collapses one innermost parenthesis group.
//! - `scan.rs`: cheap pre-classification of which operator tiers occur.
//! - `dice.rs`: the `Roller` seam, dice summation and factorial.
//! - `metrics.rs`: timing and counters for a whole run.
//!
//! ## Debugging
//!
//! Every trace step and error is also emitted as a `log` record at `trace`
//! level; run the binary with `RUST_LOG=dicemath=trace` to see them live.

#[path = "engine/dice.rs"]
mod dice;
#[path = "engine/evaluator.rs"]
mod evaluator;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parens.rs"]
mod parens;
#[path = "engine/scan.rs"]
mod scan;

pub use dice::{Roller, SeededRoller, ThreadRoller};
pub(crate) use evaluator::Evaluator;
pub(crate) use scan::TierMask;
