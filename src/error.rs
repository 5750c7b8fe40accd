//! Evaluation errors.
//!
//! None of these abort an evaluation. They are recorded in the shared
//! [`EvaluationResult`](crate::EvaluationResult) while the recursive walk keeps
//! going, so a single call can report several of them.

use thiserror::Error;

/// Coarse classification of an [`EvalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input: parentheses, literals, argument lists.
    Syntax,
    /// An argument outside a function's domain.
    Domain,
    /// A well-formed operation with no defined result.
    Arithmetic,
}

/// A single diagnostic recorded during evaluation.
///
/// The `Display` output is the message shown to the end user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Nothing to evaluate.")]
    EmptyInput,

    #[error("Unbalanced or unexpected closing parenthesis found.")]
    UnbalancedClosing,

    #[error("Unbalanced or unexpected opening parenthesis found.")]
    UnbalancedOpening,

    #[error("Unbalanced brackets in the argument list of function {name}. Found \"{found}\".")]
    UnbalancedBrackets { name: &'static str, found: String },

    #[error("Failed to parse string \"{found}\".")]
    Unparsable { found: String },

    #[error("Malformed scientific notation in \"{found}\".")]
    MalformedExponent { found: String },

    #[error("Invalid arguments for multiparametric function {name}. Found \"{found}\".")]
    InvalidArguments { name: &'static str, found: String },

    #[error("Missing argument for function {name}.")]
    MissingArgument { name: &'static str },

    #[error("Value [{}] not included in the domain of function \"{name}\".", join_args(.args))]
    Domain { name: &'static str, args: Vec<f64> },

    #[error("Attempt to divide by zero.")]
    DivideByZero,

    #[error("Attempt to take the remainder of a division by zero.")]
    RemainderByZero,

    #[error("Attempt to evaluate zero to the power of zero.")]
    ZeroPowZero,

    #[error("Result of local expression \"{found}\" is not a finite number.")]
    NonFinite { found: String },

    #[error("Overflow in factorial operation, result of local expression is infinity.")]
    FactorialOverflow,

    #[error("Attempt to roll a die with less than one face.")]
    FacelessDie,

    #[error("Exceeded maximum allowed random operations ({count} > {max}).")]
    TooManyRolls { count: f64, max: u32 },
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::EmptyInput
            | EvalError::UnbalancedClosing
            | EvalError::UnbalancedOpening
            | EvalError::UnbalancedBrackets { .. }
            | EvalError::Unparsable { .. }
            | EvalError::MalformedExponent { .. }
            | EvalError::InvalidArguments { .. }
            | EvalError::MissingArgument { .. } => ErrorKind::Syntax,
            EvalError::Domain { .. } => ErrorKind::Domain,
            EvalError::DivideByZero
            | EvalError::RemainderByZero
            | EvalError::ZeroPowZero
            | EvalError::NonFinite { .. }
            | EvalError::FactorialOverflow
            | EvalError::FacelessDie
            | EvalError::TooManyRolls { .. } => ErrorKind::Arithmetic,
        }
    }

    /// Errors whose cause is only visible in the reduction trace.
    ///
    /// Recording one of these switches the trace on regardless of options.
    pub fn forces_verbose(&self) -> bool {
        matches!(self, EvalError::FactorialOverflow | EvalError::Domain { .. } | EvalError::Unparsable { .. })
    }
}

fn join_args(args: &[f64]) -> String {
    args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(EvalError::DivideByZero.to_string(), "Attempt to divide by zero.");
        assert_eq!(
            EvalError::TooManyRolls { count: 1000000.0, max: 999999 }.to_string(),
            "Exceeded maximum allowed random operations (1000000 > 999999)."
        );
        assert_eq!(
            EvalError::Domain { name: "log", args: vec![1.0, 8.0] }.to_string(),
            "Value [1; 8] not included in the domain of function \"log\"."
        );
    }

    #[test]
    fn classification() {
        assert_eq!(EvalError::UnbalancedClosing.kind(), ErrorKind::Syntax);
        assert_eq!(EvalError::Domain { name: "sqrt", args: vec![-1.0] }.kind(), ErrorKind::Domain);
        assert_eq!(EvalError::ZeroPowZero.kind(), ErrorKind::Arithmetic);
        assert!(EvalError::FactorialOverflow.forces_verbose());
        assert!(!EvalError::DivideByZero.forces_verbose());
    }
}
