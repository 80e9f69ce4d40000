//! Region-producing nodes.

use crate::int_node::IntNode;
use crate::node::{NodeCache, StaticProps};
use tabula_types::{Concept, ConceptSet, EvalSlot, GameFlags, SlotSet};

/// A region-producing node.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionNode {
    pub kind: RegionKind,
    pub cache: NodeCache,
}

/// The kind of a region node. All regions are over cell sites.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionKind {
    /// Every cell site of the board.
    All,
    /// Cell sites holding no piece.
    Empty,
    /// Cell sites holding a piece, optionally restricted to one player.
    Occupied { player: Option<Box<IntNode>> },
    /// A named equipment region. Resolved into the node cache during
    /// preprocessing; an unknown name is a missing-requirement finding
    /// and binds the empty region.
    Named(String),
    /// A literal set of sites.
    Sites(Vec<usize>),
    /// The region pushed into the scratch context by an iterating parent.
    FromContext,
    /// Set union over all children.
    Union(Vec<RegionNode>),
    /// Set intersection over all children.
    Intersection(Vec<RegionNode>),
    /// Left minus right.
    Difference(Box<RegionNode>, Box<RegionNode>),
}

impl RegionNode {
    pub fn new(kind: RegionKind) -> Self {
        Self { kind, cache: NodeCache::default() }
    }

    pub fn all() -> Self {
        Self::new(RegionKind::All)
    }

    // ── Node contract ─────────────────────────────────────────────────────

    pub fn flat_flags(&self) -> GameFlags {
        match &self.kind {
            RegionKind::Named(_) => GameFlags::USES_NAMED_REGION,
            RegionKind::Union(_)
            | RegionKind::Intersection(_)
            | RegionKind::Difference(..) => GameFlags::USES_REGION_ALGEBRA,
            _ => GameFlags::empty(),
        }
    }

    pub fn flat_concepts(&self) -> ConceptSet {
        match &self.kind {
            RegionKind::All | RegionKind::Named(_) | RegionKind::Sites(_) => {
                ConceptSet::of(&[Concept::Sites])
            }
            RegionKind::Empty => ConceptSet::of(&[Concept::EmptySites]),
            RegionKind::Occupied { .. } => ConceptSet::of(&[Concept::OccupiedSites]),
            RegionKind::FromContext => ConceptSet::EMPTY,
            RegionKind::Union(_)
            | RegionKind::Intersection(_)
            | RegionKind::Difference(..) => ConceptSet::of(&[Concept::RegionAlgebra]),
        }
    }

    pub fn reads_flat(&self) -> SlotSet {
        match &self.kind {
            RegionKind::FromContext => SlotSet::of(&[EvalSlot::Region]),
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
            RegionKind::All => "all board sites".to_string(),
            RegionKind::Empty => "the empty sites".to_string(),
            RegionKind::Occupied { player: None } => "the occupied sites".to_string(),
            RegionKind::Occupied { player: Some(p) } => {
                format!("the sites occupied by player {}", p.describe())
            }
            RegionKind::Named(name) => format!("the region '{name}'"),
            RegionKind::Sites(sites) => format!("the sites {sites:?}"),
            RegionKind::FromContext => "the region under iteration".to_string(),
            RegionKind::Union(children) => join_set_op(children, " or "),
            RegionKind::Intersection(children) => join_set_op(children, " and "),
            RegionKind::Difference(left, right) => {
                format!("{} without {}", left.describe(), right.describe())
            }
        }
    }
}

fn join_set_op(children: &[RegionNode], sep: &str) -> String {
    let parts: Vec<String> = children.iter().map(RegionNode::describe).collect();
    format!("({})", parts.join(sep))
}
