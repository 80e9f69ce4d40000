//! The compiled node tree.
//!
//! A game description compiles into trees of typed nodes, one closed
//! enumeration per produced domain: boolean, int, int-array, region,
//! moves, and graph. Every node is a `{ kind, cache }` pair — the kind
//! holds the variant's parameters and exclusively-owned children, the
//! cache holds derived properties frozen by the one-time preprocessing
//! pass (recursive flag/concept/slot unions, staticness, resolved
//! symbolic bindings). After preprocessing the tree is immutable and
//! safely shareable read-only across threads.

pub mod array_node;
pub mod bool_node;
pub mod game;
pub mod graph_node;
pub mod int_node;
pub mod moves_node;
pub mod node;
pub mod region_node;

pub use array_node::{ArrayKind, ArrayNode};
pub use bool_node::{BoolKind, BoolNode, CompareOp};
pub use game::{EndOutcome, EndRule, Equipment, Game, GameProps, NamedRegion, Piece, Rules};
pub use graph_node::{GraphKind, GraphNode};
pub use int_node::{IntKind, IntNode};
pub use moves_node::{MovesKind, MovesNode};
pub use node::{NodeCache, StaticProps};
pub use region_node::{RegionKind, RegionNode};
