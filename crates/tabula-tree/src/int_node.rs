//! Int-producing nodes.

use crate::node::{NodeCache, StaticProps};
use crate::region_node::RegionNode;
use tabula_types::{Concept, ConceptSet, EvalSlot, GameFlags, SlotSet};

/// An int-producing node.
#[derive(Debug, Clone, PartialEq)]
pub struct IntNode {
    pub kind: IntKind,
    pub cache: NodeCache,
}

/// The kind of an int node.
#[derive(Debug, Clone, PartialEq)]
pub enum IntKind {
    /// A literal integer.
    Constant(i32),
    /// The current value of a scratch slot, `UNDEFINED` if unset.
    Var(EvalSlot),
    /// The player whose turn it is.
    Mover,
    /// Destination site index of the last move, `UNDEFINED` if no move
    /// has been made yet.
    LastTo,
    /// Origin site index of the last move, `UNDEFINED` if absent.
    LastFrom,
    /// Sum over all children.
    Add(Vec<IntNode>),
    /// Left minus right.
    Sub(Box<IntNode>, Box<IntNode>),
    /// Product over all children.
    Mul(Vec<IntNode>),
    /// Left divided by right (truncating). A constant-zero divisor is a
    /// will-crash validation finding; a runtime zero is an arithmetic trap.
    Div(Box<IntNode>, Box<IntNode>),
    /// Number of sites in the region.
    Count(Box<RegionNode>),
}

impl IntNode {
    pub fn new(kind: IntKind) -> Self {
        Self { kind, cache: NodeCache::default() }
    }

    pub fn constant(value: i32) -> Self {
        Self::new(IntKind::Constant(value))
    }

    // ── Node contract ─────────────────────────────────────────────────────

    pub fn flat_flags(&self) -> GameFlags {
        match &self.kind {
            IntKind::Add(_) | IntKind::Sub(..) | IntKind::Mul(_) | IntKind::Div(..) => {
                GameFlags::ARITHMETIC
            }
            IntKind::Count(_) => GameFlags::COUNTING,
            IntKind::LastTo | IntKind::LastFrom => GameFlags::USES_LAST_MOVE,
            _ => GameFlags::empty(),
        }
    }

    pub fn flat_concepts(&self) -> ConceptSet {
        match &self.kind {
            IntKind::Add(_) => ConceptSet::of(&[Concept::Addition]),
            IntKind::Sub(..) => ConceptSet::of(&[Concept::Subtraction]),
            IntKind::Mul(_) => ConceptSet::of(&[Concept::Multiplication]),
            IntKind::Div(..) => ConceptSet::of(&[Concept::Division]),
            IntKind::Count(_) => ConceptSet::of(&[Concept::Counting]),
            IntKind::LastTo | IntKind::LastFrom => ConceptSet::of(&[Concept::LastMove]),
            _ => ConceptSet::EMPTY,
        }
    }

    pub fn reads_flat(&self) -> SlotSet {
        match &self.kind {
            IntKind::Var(slot) => SlotSet::of(&[*slot]),
            _ => SlotSet::EMPTY,
        }
    }

    pub fn writes_flat(&self) -> SlotSet {
        SlotSet::EMPTY
    }

    pub fn flags(&self) -> GameFlags {
        self.cache.props().map_or_else(|| self.flat_flags(), |p| p.flags)
    }

    pub fn concepts(&self) -> ConceptSet {
        self.cache
            .props()
            .map_or_else(|| self.flat_concepts(), |p| p.concepts)
    }

    pub fn reads_recursive(&self) -> SlotSet {
        self.cache.props().map_or_else(|| self.reads_flat(), |p| p.reads)
    }

    pub fn writes_recursive(&self) -> SlotSet {
        self.cache
            .props()
            .map_or_else(|| self.writes_flat(), |p| p.writes)
    }

    pub fn is_static(&self) -> bool {
        self.cache.props().is_some_and(|p| p.is_static)
    }

    pub fn set_props(&mut self, props: StaticProps) {
        self.cache.set_props(props);
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            IntKind::Constant(value) => value.to_string(),
            IntKind::Var(slot) => format!("the current {}", slot.keyword()),
            IntKind::Mover => "the mover".to_string(),
            IntKind::LastTo => "the last move's destination".to_string(),
            IntKind::LastFrom => "the last move's origin".to_string(),
            IntKind::Add(children) => join_op(children, " + "),
            IntKind::Sub(left, right) => {
                format!("({} - {})", left.describe(), right.describe())
            }
            IntKind::Mul(children) => join_op(children, " * "),
            IntKind::Div(left, right) => {
                format!("({} / {})", left.describe(), right.describe())
            }
            IntKind::Count(region) => {
                format!("the number of sites in {}", region.describe())
            }
        }
    }
}

fn join_op(children: &[IntNode], sep: &str) -> String {
    let parts: Vec<String> = children.iter().map(IntNode::describe).collect();
    format!("({})", parts.join(sep))
}
