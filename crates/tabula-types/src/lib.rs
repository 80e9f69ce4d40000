//! Shared core types for the Tabula engine.
//!
//! Everything here is pure data: bit sets for game-wide feature flags,
//! the concept taxonomy, scratch-slot enumerations, the domain values
//! produced by node evaluation, and the validation report accumulated
//! during preprocessing. No crate in the workspace sits below this one.

pub mod concept;
pub mod flags;
pub mod report;
pub mod slots;
pub mod value;

pub use concept::{Concept, ConceptSet};
pub use flags::GameFlags;
pub use report::{ValidationCode, ValidationIssue, ValidationKind, ValidationReport, MAX_ISSUES};
pub use slots::{EvalSlot, SlotSet};
pub use value::{
    BoardGraph, DomainValue, ElementType, Move, Region, Site, UNDEFINED,
};
