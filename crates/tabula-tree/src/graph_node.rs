//! Graph-producing nodes: board generators.
//!
//! A graph node describes the board's topology. Preprocessing resolves
//! the generator into a concrete [`BoardGraph`] cached on the node, so
//! play-time queries never rebuild the graph.

use crate::node::{NodeCache, StaticProps};
use tabula_types::{BoardGraph, Concept, ConceptSet, GameFlags, SlotSet};

/// A graph-producing node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub kind: GraphKind,
    pub cache: NodeCache,
}

/// The kind of a graph node.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphKind {
    /// A square grid of `side` × `side` cells.
    Square { side: usize },
    /// A rectangular grid of `rows` × `cols` cells.
    Rectangle { rows: usize, cols: usize },
}

impl GraphNode {
    pub fn new(kind: GraphKind) -> Self {
        Self { kind, cache: NodeCache::default() }
    }

    pub fn square(side: usize) -> Self {
        Self::new(GraphKind::Square { side })
    }

    /// Build the concrete graph this generator describes.
    pub fn generate(&self) -> BoardGraph {
        match self.kind {
            GraphKind::Square { side } => BoardGraph::square(side),
            GraphKind::Rectangle { rows, cols } => BoardGraph::rectangle(rows, cols),
        }
    }

    // ── Node contract ─────────────────────────────────────────────────────

    pub fn flat_flags(&self) -> GameFlags {
        // A grid board defines sites of all three element types.
        GameFlags::USES_CELL | GameFlags::USES_VERTEX | GameFlags::USES_EDGE
    }

    pub fn flat_concepts(&self) -> ConceptSet {
        match self.kind {
            GraphKind::Square { .. } => ConceptSet::of(&[Concept::SquareShape]),
            GraphKind::Rectangle { .. } => ConceptSet::of(&[Concept::RectangleShape]),
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
        match self.kind {
            GraphKind::Square { side } => format!("a {side}x{side} square board"),
            GraphKind::Rectangle { rows, cols } => {
                format!("a {rows}x{cols} rectangular board")
            }
        }
    }
}
