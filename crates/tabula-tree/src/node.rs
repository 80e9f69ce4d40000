//! Per-node cached state, populated once by the preprocessing pass.

use tabula_types::{BoardGraph, ConceptSet, ElementType, GameFlags, Region, SlotSet};

/// The derived static properties of a subtree, frozen after preprocessing.
///
/// All fields are recursive unions over the node and its descendants,
/// except `is_static`, which is a conjunction with per-variant overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticProps {
    pub flags: GameFlags,
    pub concepts: ConceptSet,
    pub reads: SlotSet,
    pub writes: SlotSet,
    /// True iff the subtree evaluates to the same value for every call
    /// within a single game.
    pub is_static: bool,
}

/// Cached derived state on a node.
///
/// Empty at construction; written exactly once per preprocessing run.
/// Re-running the pass overwrites (never re-unions), so preprocessing is
/// idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeCache {
    props: Option<StaticProps>,
    /// Resolved named-region binding, for nodes that refer to equipment
    /// regions symbolically.
    region: Option<Region>,
    /// Resolved board graph, for graph generator nodes.
    graph: Option<BoardGraph>,
}

impl NodeCache {
    pub fn props(&self) -> Option<StaticProps> {
        self.props
    }

    pub fn set_props(&mut self, props: StaticProps) {
        self.props = Some(props);
    }

    pub fn is_preprocessed(&self) -> bool {
        self.props.is_some()
    }

    pub fn resolved_region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    pub fn bind_region(&mut self, region: Region) {
        self.region = Some(region);
    }

    pub fn resolved_graph(&self) -> Option<&BoardGraph> {
        self.graph.as_ref()
    }

    pub fn bind_graph(&mut self, graph: BoardGraph) {
        self.graph = Some(graph);
    }
}

/// The feature flag implied by using an element type.
pub(crate) fn element_flag(element: ElementType) -> GameFlags {
    match element {
        ElementType::Cell => GameFlags::USES_CELL,
        ElementType::Vertex => GameFlags::USES_VERTEX,
        ElementType::Edge => GameFlags::USES_EDGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_starts_empty() {
        let cache = NodeCache::default();
        assert!(!cache.is_preprocessed());
        assert!(cache.props().is_none());
        assert!(cache.resolved_region().is_none());
        assert!(cache.resolved_graph().is_none());
    }

    #[test]
    fn set_props_overwrites() {
        let mut cache = NodeCache::default();
        let first = StaticProps {
            flags: GameFlags::USES_CELL,
            concepts: ConceptSet::EMPTY,
            reads: SlotSet::EMPTY,
            writes: SlotSet::EMPTY,
            is_static: true,
        };
        cache.set_props(first);
        let second = StaticProps { is_static: false, ..first };
        cache.set_props(second);
        assert_eq!(cache.props(), Some(second));
    }
}
