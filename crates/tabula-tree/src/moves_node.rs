//! Move-producing nodes.
//!
//! Move generation is where the scratch context earns its keep: a parent
//! writes the slot a child predicate will read (the candidate `to` site,
//! the iteration site) immediately before evaluating that child, and
//! restores the slot afterwards so siblings never observe stale values.

use crate::bool_node::BoolNode;
use crate::node::{NodeCache, StaticProps};
use crate::region_node::RegionNode;
use tabula_types::{Concept, ConceptSet, EvalSlot, GameFlags, SlotSet};

/// A move-producing node.
#[derive(Debug, Clone, PartialEq)]
pub struct MovesNode {
    pub kind: MovesKind,
    pub cache: NodeCache,
}

/// The kind of a moves node.
#[derive(Debug, Clone, PartialEq)]
pub enum MovesKind {
    /// The mover passes.
    Pass,
    /// Place a piece on each empty site of `to` that satisfies the
    /// condition. Writes the To slot around the condition.
    Add {
        to: Box<RegionNode>,
        condition: Option<Box<BoolNode>>,
    },
    /// Move a mover's piece from each site of `from` to each empty site
    /// of `to` satisfying the condition. Writes the From and To slots.
    FromTo {
        from: Box<RegionNode>,
        to: Box<RegionNode>,
        condition: Option<Box<BoolNode>>,
    },
    /// Union of all children's move sets.
    Or(Vec<MovesNode>),
    /// Branch on a runtime condition. Both branches still contribute
    /// their full static properties.
    If {
        condition: Box<BoolNode>,
        then: Box<MovesNode>,
        otherwise: Option<Box<MovesNode>>,
    },
    /// Evaluate the generator once per site of the region, with the
    /// Site and Region slots pushed for the generator to read.
    ForEachSite {
        region: Box<RegionNode>,
        generator: Box<MovesNode>,
    },
}

impl MovesNode {
    pub fn new(kind: MovesKind) -> Self {
        Self { kind, cache: NodeCache::default() }
    }

    pub fn pass() -> Self {
        Self::new(MovesKind::Pass)
    }

    // ── Node contract ─────────────────────────────────────────────────────

    pub fn flat_flags(&self) -> GameFlags {
        match &self.kind {
            MovesKind::Pass => GameFlags::PASS_MOVES,
            MovesKind::Add { .. } => GameFlags::PLACEMENT_MOVES,
            MovesKind::FromTo { .. } => GameFlags::MOVEMENT_MOVES,
            MovesKind::Or(_) => GameFlags::empty(),
            MovesKind::If { .. } => GameFlags::CONDITIONAL_MOVES,
            MovesKind::ForEachSite { .. } => GameFlags::SITE_ITERATION,
        }
    }

    pub fn flat_concepts(&self) -> ConceptSet {
        match &self.kind {
            MovesKind::Pass => ConceptSet::of(&[Concept::PassDecision]),
            MovesKind::Add { .. } => ConceptSet::of(&[Concept::Placement]),
            MovesKind::FromTo { .. } => ConceptSet::of(&[Concept::Movement]),
            MovesKind::Or(_) => ConceptSet::of(&[Concept::Moves]),
            MovesKind::If { .. } => ConceptSet::of(&[Concept::ConditionalMoves]),
            MovesKind::ForEachSite { .. } => ConceptSet::of(&[Concept::SiteIteration]),
        }
    }

    pub fn reads_flat(&self) -> SlotSet {
        SlotSet::EMPTY
    }

    pub fn writes_flat(&self) -> SlotSet {
        match &self.kind {
            MovesKind::Add { .. } => SlotSet::of(&[EvalSlot::To]),
            MovesKind::FromTo { .. } => SlotSet::of(&[EvalSlot::From, EvalSlot::To]),
            MovesKind::ForEachSite { .. } => {
                SlotSet::of(&[EvalSlot::Site, EvalSlot::Region])
            }
            _ => SlotSet::EMPTY,
        }
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
            MovesKind::Pass => "pass".to_string(),
            MovesKind::Add { to, condition } => match condition {
                Some(cond) => format!(
                    "place a piece on {} where {}",
                    to.describe(),
                    cond.describe()
                ),
                None => format!("place a piece on {}", to.describe()),
            },
            MovesKind::FromTo { from, to, condition } => {
                let base = format!(
                    "move a piece from {} to {}",
                    from.describe(),
                    to.describe()
                );
                match condition {
                    Some(cond) => format!("{base} where {}", cond.describe()),
                    None => base,
                }
            }
            MovesKind::Or(children) => {
                let parts: Vec<String> =
                    children.iter().map(MovesNode::describe).collect();
                format!("either {}", parts.join(" or "))
            }
            MovesKind::If { condition, then, otherwise } => match otherwise {
                Some(other) => format!(
                    "if {} then {} else {}",
                    condition.describe(),
                    then.describe(),
                    other.describe()
                ),
                None => format!("if {} then {}", condition.describe(), then.describe()),
            },
            MovesKind::ForEachSite { region, generator } => format!(
                "for each site of {}: {}",
                region.describe(),
                generator.describe()
            ),
        }
    }
}
