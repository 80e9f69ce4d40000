//! Evaluation errors.

use std::error::Error;
use std::fmt;

/// A runtime evaluation failure.
///
/// Static problems are caught during preprocessing and land in the
/// validation report; these are the residue that only the live position
/// can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The game was handed over without running the preprocessing pass.
    NotPreprocessed,
    /// An arithmetic operation trapped, e.g. division by a divisor that
    /// evaluated to zero at runtime.
    ArithmeticTrap { operation: &'static str },
    /// A move targeted a site outside the board.
    OutOfRange { site: i32, limit: usize },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPreprocessed => {
                write!(f, "the game has not been preprocessed")
            }
            Self::ArithmeticTrap { operation } => {
                write!(f, "arithmetic trap in '{operation}'")
            }
            Self::OutOfRange { site, limit } => {
                write!(f, "site {site} is outside the board (limit {limit})")
            }
        }
    }
}

impl Error for EvalError {}

pub type EvalResult<T> = Result<T, EvalError>;
