//! Int-array-producing nodes.
//!
//! There is no implicit coercion between domains: a region cannot be
//! used where an int array is expected. [`ArrayKind::FromRegion`] is the
//! explicit adapter, and its output order (ascending site index) is part
//! of the contract.

use crate::node::{NodeCache, StaticProps};
use crate::region_node::RegionNode;
use tabula_types::{Concept, ConceptSet, GameFlags, SlotSet};

/// An int-array-producing node.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub kind: ArrayKind,
    pub cache: NodeCache,
}

/// The kind of an int-array node.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayKind {
    /// A literal array, kept in the order written.
    Literal(Vec<i32>),
    /// The sites of a region, in ascending order.
    FromRegion(Box<RegionNode>),
    /// Sorted, deduplicated union over all children.
    Union(Vec<ArrayNode>),
}

impl ArrayNode {
    pub fn new(kind: ArrayKind) -> Self {
        Self { kind, cache: NodeCache::default() }
    }

    // ── Node contract ─────────────────────────────────────────────────────

    pub fn flat_flags(&self) -> GameFlags {
        GameFlags::empty()
    }

    pub fn flat_concepts(&self) -> ConceptSet {
        match &self.kind {
            ArrayKind::Literal(_) => ConceptSet::EMPTY,
            ArrayKind::FromRegion(_) | ArrayKind::Union(_) => {
                ConceptSet::of(&[Concept::Sites])
            }
        }
    }

    pub fn reads_flat(&self) -> SlotSet {
        SlotSet::EMPTY
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
            ArrayKind::Literal(values) => format!("the array {values:?}"),
            ArrayKind::FromRegion(region) => {
                format!("the sites of {} as an array", region.describe())
            }
            ArrayKind::Union(children) => {
                let parts: Vec<String> =
                    children.iter().map(ArrayNode::describe).collect();
                format!("the union of ({})", parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_contributes_nothing() {
        let node = ArrayNode::new(ArrayKind::Literal(vec![3, 1, 2]));
        assert_eq!(node.flat_flags(), GameFlags::empty());
        assert_eq!(node.flat_concepts(), ConceptSet::EMPTY);
    }

    #[test]
    fn adapter_contributes_sites_concept() {
        let node = ArrayNode::new(ArrayKind::FromRegion(Box::new(RegionNode::all())));
        assert!(node.flat_concepts().contains(Concept::Sites));
    }
}
