//! Domain values produced by node evaluation.
//!
//! Each node domain (boolean, int, int-array, region, moves, graph) has a
//! concrete value type here; there is no implicit coercion between them.
//! Conversions are explicit adapter nodes in the tree (e.g. region to
//! int-array), never silent casts inside the evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for "no such site": returned by int accessors whose subject
/// does not exist yet, e.g. the destination of the last move before any
/// move has been made.
pub const UNDEFINED: i32 = -1;

// ══════════════════════════════════════════════════════════════════════════════
// Elements & Sites
// ══════════════════════════════════════════════════════════════════════════════

/// The kind of graph element a site lives on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Cell,
    Vertex,
    Edge,
}

impl ElementType {
    /// Grammar keyword for this element type.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Cell => "cell",
            Self::Vertex => "vertex",
            Self::Edge => "edge",
        }
    }

    /// Parse a grammar keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "cell" => Some(Self::Cell),
            "vertex" => Some(Self::Vertex),
            "edge" => Some(Self::Edge),
            _ => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A site: an index into the board's elements of one type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Site {
    pub index: usize,
    pub element: ElementType,
}

impl Site {
    pub fn cell(index: usize) -> Self {
        Self { index, element: ElementType::Cell }
    }

    pub fn vertex(index: usize) -> Self {
        Self { index, element: ElementType::Vertex }
    }

    pub fn edge(index: usize) -> Self {
        Self { index, element: ElementType::Edge }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.index)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Region
// ══════════════════════════════════════════════════════════════════════════════

/// An ordered, deduplicated set of site indices.
///
/// The ordering is part of the contract: converting a region to an int
/// array always yields ascending indices, so downstream iteration order
/// is fixed and reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region(Vec<usize>);

impl Region {
    /// Build a region from arbitrary indices; sorts and deduplicates.
    pub fn new(mut sites: Vec<usize>) -> Self {
        sites.sort_unstable();
        sites.dedup();
        Self(sites)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// The contiguous region `[0, count)`.
    pub fn range(count: usize) -> Self {
        Self((0..count).collect())
    }

    pub fn sites(&self) -> &[usize] {
        &self.0
    }

    pub fn contains(&self, site: usize) -> bool {
        self.0.binary_search(&site).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn union(&self, other: &Region) -> Region {
        let mut sites = self.0.clone();
        sites.extend_from_slice(&other.0);
        Region::new(sites)
    }

    pub fn intersection(&self, other: &Region) -> Region {
        Region(self.iter().filter(|&s| other.contains(s)).collect())
    }

    pub fn difference(&self, other: &Region) -> Region {
        Region(self.iter().filter(|&s| !other.contains(s)).collect())
    }

    /// Explicit adapter to the int-array domain, ascending order.
    pub fn to_int_array(&self) -> Vec<i32> {
        self.iter().map(|s| s as i32).collect()
    }
}

impl FromIterator<usize> for Region {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Region::new(iter.into_iter().collect())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Moves
// ══════════════════════════════════════════════════════════════════════════════

/// An atomic game move: a placement (`to` only), a displacement
/// (`from` → `to`), or a pass (neither).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Option<Site>,
    pub to: Option<Site>,
    /// 1-based player who makes the move.
    pub mover: u8,
}

impl Move {
    /// A placement move for `mover` at `to`.
    pub fn place(to: Site, mover: u8) -> Self {
        Self { from: None, to: Some(to), mover }
    }

    /// A displacement move for `mover` from `from` to `to`.
    pub fn between(from: Site, to: Site, mover: u8) -> Self {
        Self { from: Some(from), to: Some(to), mover }
    }

    /// A pass for `mover`.
    pub fn pass(mover: u8) -> Self {
        Self { from: None, to: None, mover }
    }

    pub fn is_pass(&self) -> bool {
        self.to.is_none()
    }

    /// Element type of the destination, if the move has one. Defined
    /// accessor used by last-move predicates.
    pub fn to_element(&self) -> Option<ElementType> {
        self.to.map(|site| site.element)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.to) {
            (Some(from), Some(to)) => write!(f, "p{}: {} - {}", self.mover, from, to),
            (None, Some(to)) => write!(f, "p{}: + {}", self.mover, to),
            _ => write!(f, "p{}: pass", self.mover),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Board graph
// ══════════════════════════════════════════════════════════════════════════════

/// The board as a graph: cells, vertices, and edges, with cell adjacency.
///
/// Built once by a graph generator node and cached during preprocessing;
/// read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardGraph {
    rows: usize,
    cols: usize,
    /// Vertex pairs, one per edge.
    edges: Vec<(usize, usize)>,
    /// Orthogonal cell adjacency, indexed by cell.
    cell_adjacency: Vec<Vec<usize>>,
}

impl BoardGraph {
    /// A square grid of `side` × `side` cells.
    pub fn square(side: usize) -> Self {
        Self::rectangle(side, side)
    }

    /// A rectangular grid of `rows` × `cols` cells. Vertices sit on the
    /// grid intersections; edges connect orthogonally adjacent vertices.
    pub fn rectangle(rows: usize, cols: usize) -> Self {
        let vertex = |r: usize, c: usize| r * (cols + 1) + c;

        let mut edges = Vec::new();
        for r in 0..=rows {
            for c in 0..cols {
                edges.push((vertex(r, c), vertex(r, c + 1)));
            }
        }
        for r in 0..rows {
            for c in 0..=cols {
                edges.push((vertex(r, c), vertex(r + 1, c)));
            }
        }

        let mut cell_adjacency = vec![Vec::new(); rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                let cell = r * cols + c;
                if c > 0 {
                    cell_adjacency[cell].push(cell - 1);
                }
                if c + 1 < cols {
                    cell_adjacency[cell].push(cell + 1);
                }
                if r > 0 {
                    cell_adjacency[cell].push(cell - cols);
                }
                if r + 1 < rows {
                    cell_adjacency[cell].push(cell + cols);
                }
            }
        }

        Self { rows, cols, edges, cell_adjacency }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cell sites; the extent most range checks care about.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of sites of the given element type.
    pub fn count(&self, element: ElementType) -> usize {
        match element {
            ElementType::Cell => self.rows * self.cols,
            ElementType::Vertex => (self.rows + 1) * (self.cols + 1),
            ElementType::Edge => self.edges.len(),
        }
    }

    /// All sites of the given element type, as a region.
    pub fn sites(&self, element: ElementType) -> Region {
        Region::range(self.count(element))
    }

    /// The vertex endpoints of an edge.
    pub fn edge_endpoints(&self, edge: usize) -> Option<(usize, usize)> {
        self.edges.get(edge).copied()
    }

    /// Orthogonally adjacent cells of a cell.
    pub fn adjacent_cells(&self, cell: usize) -> &[usize] {
        self.cell_adjacency
            .get(cell)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// DomainValue
// ══════════════════════════════════════════════════════════════════════════════

/// The result of evaluating a node through the generic query interface.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainValue {
    Bool(bool),
    Int(i32),
    Array(Vec<i32>),
    Region(Region),
    Moves(Vec<Move>),
    Graph(BoardGraph),
}

impl DomainValue {
    /// Human-readable domain name for diagnostics.
    pub fn domain_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Array(_) => "int-array",
            Self::Region(_) => "region",
            Self::Moves(_) => "moves",
            Self::Graph(_) => "graph",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_is_sorted_and_deduplicated() {
        let region = Region::new(vec![5, 1, 3, 1, 5]);
        assert_eq!(region.sites(), &[1, 3, 5]);
        assert_eq!(region.len(), 3);
        assert!(region.contains(3));
        assert!(!region.contains(2));
    }

    #[test]
    fn region_algebra() {
        let a = Region::new(vec![0, 1, 2, 3]);
        let b = Region::new(vec![2, 3, 4]);
        assert_eq!(a.union(&b).sites(), &[0, 1, 2, 3, 4]);
        assert_eq!(a.intersection(&b).sites(), &[2, 3]);
        assert_eq!(a.difference(&b).sites(), &[0, 1]);
    }

    #[test]
    fn region_to_int_array_is_ascending() {
        let region = Region::new(vec![8, 0, 4]);
        assert_eq!(region.to_int_array(), vec![0, 4, 8]);
    }

    #[test]
    fn square_graph_counts() {
        let g = BoardGraph::square(3);
        assert_eq!(g.count(ElementType::Cell), 9);
        assert_eq!(g.count(ElementType::Vertex), 16);
        // 4 rows of 3 horizontal edges + 3 rows of 4 vertical edges.
        assert_eq!(g.count(ElementType::Edge), 24);
    }

    #[test]
    fn rectangle_graph_adjacency() {
        let g = BoardGraph::rectangle(2, 3);
        // Corner cell 0 touches 1 (right) and 3 (below).
        let mut adj = g.adjacent_cells(0).to_vec();
        adj.sort_unstable();
        assert_eq!(adj, vec![1, 3]);
        // Middle cell 1 touches 0, 2, 4.
        let mut adj = g.adjacent_cells(1).to_vec();
        adj.sort_unstable();
        assert_eq!(adj, vec![0, 2, 4]);
    }

    #[test]
    fn move_accessors() {
        let mv = Move::place(Site::vertex(7), 1);
        assert_eq!(mv.to_element(), Some(ElementType::Vertex));
        assert_eq!(mv.from, None);
        assert!(!mv.is_pass());
        let mv = Move::between(Site::cell(0), Site::cell(1), 2);
        assert_eq!(mv.to_element(), Some(ElementType::Cell));
        assert_eq!(mv.from, Some(Site::cell(0)));
        let mv = Move::pass(1);
        assert!(mv.is_pass());
        assert_eq!(mv.to_element(), None);
    }

    #[test]
    fn element_keywords_round_trip() {
        for element in [ElementType::Cell, ElementType::Vertex, ElementType::Edge] {
            assert_eq!(ElementType::from_keyword(element.keyword()), Some(element));
        }
        assert_eq!(ElementType::from_keyword("face"), None);
    }

    #[test]
    fn move_serializes_to_json() {
        let mv = Move::place(Site::cell(4), 1);
        let json = serde_json::to_string(&mv).unwrap();
        assert!(json.contains("\"cell\""));
        let back: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mv);
    }
}
