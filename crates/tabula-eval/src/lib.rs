//! The Tabula evaluation engine.
//!
//! A preprocessed [`tabula_tree::Game`] is immutable and shared; all
//! per-playthrough mutation lives in a [`Context`]: the position, the
//! move history, and the typed scratch slots that parents publish for
//! their children during tree walks.

pub mod board;
pub mod context;
pub mod error;
pub mod evaluator;

pub use board::{State, Trial};
pub use context::{Context, Scratch};
pub use error::{EvalError, EvalResult};
pub use evaluator::NodeRef;
