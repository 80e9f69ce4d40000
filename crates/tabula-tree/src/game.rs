//! The `Game` root aggregate.
//!
//! A game owns the entire compiled tree: the equipment (board generator,
//! named regions, piece types) and the rules (start, play, end). It is
//! constructed once from a description, mutated only during its single
//! preprocessing pass, and immutable during play — which makes it safe
//! to share read-only across any number of concurrently evaluating
//! contexts.

use crate::bool_node::BoolNode;
use crate::graph_node::GraphNode;
use crate::moves_node::MovesNode;
use tabula_types::{BoardGraph, ConceptSet, GameFlags, Region};

/// A named equipment region: a literal set of cell sites referenced
/// symbolically from the rules.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRegion {
    pub name: String,
    pub sites: Region,
}

/// A piece type available in the game.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub name: String,
    /// 1-based owning player.
    pub owner: u8,
}

/// The game's equipment: the board plus named regions and pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct Equipment {
    pub board: GraphNode,
    pub regions: Vec<NamedRegion>,
    pub pieces: Vec<Piece>,
}

impl Equipment {
    pub fn new(board: GraphNode) -> Self {
        Self { board, regions: Vec::new(), pieces: Vec::new() }
    }

    pub fn with_region(mut self, name: impl Into<String>, sites: Region) -> Self {
        self.regions.push(NamedRegion { name: name.into(), sites });
        self
    }

    pub fn with_piece(mut self, name: impl Into<String>, owner: u8) -> Self {
        self.pieces.push(Piece { name: name.into(), owner });
        self
    }

    pub fn region(&self, name: &str) -> Option<&NamedRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn piece(&self, name: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.name == name)
    }
}

/// The outcome an end rule assigns, relative to the mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOutcome {
    Win,
    Loss,
    Draw,
}

impl EndOutcome {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Draw => "draw",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "win" => Some(Self::Win),
            "loss" => Some(Self::Loss),
            "draw" => Some(Self::Draw),
            _ => None,
        }
    }
}

/// One end rule: when the condition holds, the game ends with the
/// outcome for the mover.
#[derive(Debug, Clone, PartialEq)]
pub struct EndRule {
    pub condition: BoolNode,
    pub outcome: EndOutcome,
}

/// The rules of the game.
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    /// Moves applied once before play begins (initial setup).
    pub start: Option<MovesNode>,
    /// The legal-move generator consulted every turn.
    pub play: MovesNode,
    /// End rules, checked in order after every move.
    pub end: Vec<EndRule>,
}

/// Game-level derived state, computed once after the whole tree exists.
#[derive(Debug, Clone, PartialEq)]
pub struct GameProps {
    /// Union of every subtree's flags.
    pub flags: GameFlags,
    /// Union of every subtree's concepts.
    pub concepts: ConceptSet,
    /// The resolved board graph.
    pub board: BoardGraph,
}

/// The root aggregate owning the compiled tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub name: String,
    /// Number of players, 1-based movers `1..=players`.
    pub players: u8,
    pub equipment: Equipment,
    pub rules: Rules,
    digest: Option<String>,
    props: Option<GameProps>,
}

impl Game {
    pub fn new(
        name: impl Into<String>,
        players: u8,
        equipment: Equipment,
        rules: Rules,
    ) -> Self {
        Self {
            name: name.into(),
            players,
            equipment,
            rules,
            digest: None,
            props: None,
        }
    }

    /// SHA-256 digest of the canonical description, set by the compiler.
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn set_digest(&mut self, digest: String) {
        self.digest = Some(digest);
    }

    /// Game-level derived properties; `None` until preprocessing runs.
    pub fn props(&self) -> Option<&GameProps> {
        self.props.as_ref()
    }

    pub fn set_props(&mut self, props: GameProps) {
        self.props = Some(props);
    }

    pub fn is_preprocessed(&self) -> bool {
        self.props.is_some()
    }

    /// Aggregated flags over the whole tree; empty before preprocessing.
    pub fn flags(&self) -> GameFlags {
        self.props.as_ref().map_or_else(GameFlags::empty, |p| p.flags)
    }

    /// Aggregated concepts over the whole tree.
    pub fn concepts(&self) -> ConceptSet {
        self.props
            .as_ref()
            .map_or(ConceptSet::EMPTY, |p| p.concepts)
    }

    /// The resolved board graph; `None` before preprocessing.
    pub fn board(&self) -> Option<&BoardGraph> {
        self.props.as_ref().map(|p| &p.board)
    }
}
