//! The static validation report.
//!
//! Preprocessing never fails fast on a structurally invalid tree: every
//! missing-requirement and will-crash finding is appended here so a
//! single compilation attempt surfaces all problems. Hosts consume the
//! report as structured JSON; they must not parse free-form strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of issues stored before the report only counts.
pub const MAX_ISSUES: usize = 64;

/// What a validation finding means for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationKind {
    /// The tree references something the equipment does not define.
    MissingRequirement,
    /// The configuration is guaranteed to fail at evaluation time.
    WillCrash,
}

/// Numeric issue code. The range determines the kind:
/// 100–199 missing-requirement, 200–299 will-crash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ValidationCode(pub u16);

impl ValidationCode {
    // ── Missing requirements (V100–V199) ──
    pub const UNDEFINED_REGION: Self = Self(100);
    pub const UNDEFINED_PIECE: Self = Self(101);
    pub const EMPTY_OPERATOR: Self = Self(102);

    // ── Will-crash (V200–V299) ──
    pub const DIVISION_BY_ZERO: Self = Self(200);
    pub const SITE_OUT_OF_RANGE: Self = Self(201);
    pub const RECURSIVE_NO_MOVES: Self = Self(202);

    /// The kind implied by this code's range.
    pub fn kind(self) -> ValidationKind {
        if self.0 < 200 {
            ValidationKind::MissingRequirement
        } else {
            ValidationKind::WillCrash
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

/// One finding, located by the slash-joined node path from the game root
/// (e.g. `rules/play/or[1]/add/if`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: ValidationCode,
    pub kind: ValidationKind,
    pub message: String,
    pub path: String,
}

impl ValidationIssue {
    pub fn new(code: ValidationCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            kind: code.kind(),
            message: message.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ValidationKind::MissingRequirement => "missing requirement",
            ValidationKind::WillCrash => "will crash",
        };
        write!(f, "{} [{}] {}: {}", self.code, kind, self.path, self.message)
    }
}

/// Accumulates findings across the whole preprocessing pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
    total: usize,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an issue, respecting the storage cap. The total always
    /// counts every finding.
    pub fn push(&mut self, issue: ValidationIssue) {
        if self.issues.len() < MAX_ISSUES {
            self.issues.push(issue);
        }
        self.total += 1;
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_clean(&self) -> bool {
        self.total == 0
    }

    pub fn has_missing_requirement(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.kind == ValidationKind::MissingRequirement)
    }

    pub fn has_will_crash(&self) -> bool {
        self.issues.iter().any(|i| i.kind == ValidationKind::WillCrash)
    }
}
