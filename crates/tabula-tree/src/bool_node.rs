//! Boolean-producing nodes.

use crate::int_node::IntNode;
use crate::node::{element_flag, NodeCache, StaticProps};
use crate::region_node::RegionNode;
use tabula_types::{Concept, ConceptSet, ElementType, GameFlags, SlotSet};

/// A boolean-producing node.
#[derive(Debug, Clone, PartialEq)]
pub struct BoolNode {
    pub kind: BoolKind,
    pub cache: NodeCache,
}

/// Comparison operators over two int subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
        }
    }

    pub fn apply(self, left: i32, right: i32) -> bool {
        match self {
            Self::Eq => left == right,
            Self::NotEq => left != right,
            Self::Less => left < right,
            Self::LessEq => left <= right,
            Self::Greater => left > right,
            Self::GreaterEq => left >= right,
        }
    }
}

/// The kind of a boolean node.
#[derive(Debug, Clone, PartialEq)]
pub enum BoolKind {
    /// `true` / `false`
    Constant(bool),
    /// Logical negation of a subtree.
    Not(Box<BoolNode>),
    /// Conjunction over all children.
    And(Vec<BoolNode>),
    /// Disjunction over all children.
    Or(Vec<BoolNode>),
    /// Comparison of two int subtrees.
    Compare {
        op: CompareOp,
        left: Box<IntNode>,
        right: Box<IntNode>,
    },
    /// The cell site named by the subtree holds no piece.
    IsEmpty(Box<IntNode>),
    /// The cell site named by the subtree holds a piece.
    IsOccupied(Box<IntNode>),
    /// The site is a member of the region.
    IsIn {
        site: Box<IntNode>,
        region: Box<RegionNode>,
    },
    /// The last move's destination is of the given element type.
    /// False when no move has been made yet.
    LastToIs(ElementType),
    /// The mover has no legal move.
    NoMoves,
}

impl BoolNode {
    pub fn new(kind: BoolKind) -> Self {
        Self { kind, cache: NodeCache::default() }
    }

    pub fn constant(value: bool) -> Self {
        Self::new(BoolKind::Constant(value))
    }

    // ── Node contract ─────────────────────────────────────────────────────

    /// Flags this node alone contributes, independent of its children.
    pub fn flat_flags(&self) -> GameFlags {
        match &self.kind {
            BoolKind::LastToIs(element) => {
                GameFlags::USES_LAST_MOVE | element_flag(*element)
            }
            _ => GameFlags::empty(),
        }
    }

    /// Concepts this node alone contributes.
    pub fn flat_concepts(&self) -> ConceptSet {
        match &self.kind {
            BoolKind::Constant(_) => ConceptSet::EMPTY,
            BoolKind::Not(_) => ConceptSet::of(&[Concept::Negation]),
            BoolKind::And(_) => ConceptSet::of(&[Concept::Conjunction]),
            BoolKind::Or(_) => ConceptSet::of(&[Concept::Disjunction]),
            BoolKind::Compare { .. } => ConceptSet::of(&[Concept::Comparison]),
            BoolKind::IsEmpty(_) => ConceptSet::of(&[Concept::EmptySites]),
            BoolKind::IsOccupied(_) => ConceptSet::of(&[Concept::OccupiedSites]),
            BoolKind::IsIn { .. } => ConceptSet::of(&[Concept::Sites]),
            BoolKind::LastToIs(_) => ConceptSet::of(&[Concept::LastMove]),
            BoolKind::NoMoves => ConceptSet::of(&[Concept::Moves]),
        }
    }

    /// Scratch slots this node itself reads (before recursion).
    pub fn reads_flat(&self) -> SlotSet {
        SlotSet::EMPTY
    }

    /// Scratch slots this node itself writes (before recursion).
    pub fn writes_flat(&self) -> SlotSet {
        SlotSet::EMPTY
    }

    /// Cached recursive flags; falls back to the flat set before
    /// preprocessing.
    pub fn flags(&self) -> GameFlags {
        self.cache.props().map_or_else(|| self.flat_flags(), |p| p.flags)
    }

    /// Cached recursive concepts.
    pub fn concepts(&self) -> ConceptSet {
        self.cache
            .props()
            .map_or_else(|| self.flat_concepts(), |p| p.concepts)
    }

    /// Cached recursive scratch-slot reads.
    pub fn reads_recursive(&self) -> SlotSet {
        self.cache.props().map_or_else(|| self.reads_flat(), |p| p.reads)
    }

    /// Cached recursive scratch-slot writes.
    pub fn writes_recursive(&self) -> SlotSet {
        self.cache
            .props()
            .map_or_else(|| self.writes_flat(), |p| p.writes)
    }

    /// True iff evaluation returns the same value for every call within
    /// a single game. Meaningful only after preprocessing.
    pub fn is_static(&self) -> bool {
        self.cache.props().is_some_and(|p| p.is_static)
    }

    pub fn set_props(&mut self, props: StaticProps) {
        self.cache.set_props(props);
    }

    /// Natural-language rendering of the subtree.
    pub fn describe(&self) -> String {
        match &self.kind {
            BoolKind::Constant(value) => value.to_string(),
            BoolKind::Not(child) => format!("not {}", child.describe()),
            BoolKind::And(children) => join_described(children, " and "),
            BoolKind::Or(children) => join_described(children, " or "),
            BoolKind::Compare { op, left, right } => {
                format!("{} {} {}", left.describe(), op.symbol(), right.describe())
            }
            BoolKind::IsEmpty(site) => format!("site {} is empty", site.describe()),
            BoolKind::IsOccupied(site) => {
                format!("site {} is occupied", site.describe())
            }
            BoolKind::IsIn { site, region } => {
                format!("site {} is in {}", site.describe(), region.describe())
            }
            BoolKind::LastToIs(element) => {
                format!("the last move's destination is a {element}")
            }
            BoolKind::NoMoves => "the mover has no legal move".to_string(),
        }
    }
}

fn join_described(children: &[BoolNode], sep: &str) -> String {
    let parts: Vec<String> = children.iter().map(BoolNode::describe).collect();
    format!("({})", parts.join(sep))
}
