//! Mutable per-trial position state and move history.

use crate::error::{EvalError, EvalResult};
use tabula_types::{BoardGraph, ElementType, Move, Region, Site};

/// The mutable position of one trial: piece ownership per site, the
/// current mover, and the turn counter.
///
/// Ownership is stored per element type so vertex and edge games share
/// the representation with cell games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    cells: Vec<Option<u8>>,
    vertices: Vec<Option<u8>>,
    edges: Vec<Option<u8>>,
    mover: u8,
    players: u8,
    turn: u32,
}

impl State {
    pub fn new(board: &BoardGraph, players: u8) -> Self {
        Self {
            cells: vec![None; board.count(ElementType::Cell)],
            vertices: vec![None; board.count(ElementType::Vertex)],
            edges: vec![None; board.count(ElementType::Edge)],
            mover: 1,
            players: players.max(1),
            turn: 0,
        }
    }

    /// 1-based player whose turn it is.
    pub fn mover(&self) -> u8 {
        self.mover
    }

    pub fn players(&self) -> u8 {
        self.players
    }

    /// Completed moves so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    fn sites_of(&self, element: ElementType) -> &[Option<u8>] {
        match element {
            ElementType::Cell => &self.cells,
            ElementType::Vertex => &self.vertices,
            ElementType::Edge => &self.edges,
        }
    }

    fn sites_of_mut(&mut self, element: ElementType) -> &mut [Option<u8>] {
        match element {
            ElementType::Cell => &mut self.cells,
            ElementType::Vertex => &mut self.vertices,
            ElementType::Edge => &mut self.edges,
        }
    }

    /// Owner of the piece at a site, `None` if empty or out of range.
    pub fn owner_at(&self, site: Site) -> Option<u8> {
        self.sites_of(site.element).get(site.index).copied().flatten()
    }

    /// True iff the cell index is on the board and holds no piece.
    pub fn is_empty_cell(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    pub fn is_occupied_cell(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(Some(_)))
    }

    /// Every empty cell, as a region.
    pub fn empty_cells(&self) -> Region {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, owner)| owner.is_none())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Every occupied cell, optionally restricted to one owner.
    pub fn occupied_cells(&self, by: Option<u8>) -> Region {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, owner)| match by {
                Some(player) => **owner == Some(player),
                None => owner.is_some(),
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Put a piece for `owner` at a site.
    pub fn place(&mut self, site: Site, owner: u8) -> EvalResult<()> {
        let slots = self.sites_of_mut(site.element);
        let limit = slots.len();
        match slots.get_mut(site.index) {
            Some(slot) => {
                *slot = Some(owner);
                Ok(())
            }
            None => Err(EvalError::OutOfRange { site: site.index as i32, limit }),
        }
    }

    /// Take the piece off a site, returning its owner.
    pub fn remove(&mut self, site: Site) -> EvalResult<Option<u8>> {
        let slots = self.sites_of_mut(site.element);
        let limit = slots.len();
        match slots.get_mut(site.index) {
            Some(slot) => Ok(slot.take()),
            None => Err(EvalError::OutOfRange { site: site.index as i32, limit }),
        }
    }

    /// Mutate the position by one move and advance the turn.
    pub fn apply(&mut self, mv: &Move) -> EvalResult<()> {
        if let Some(from) = mv.from {
            let owner = self.remove(from)?.unwrap_or(mv.mover);
            if let Some(to) = mv.to {
                self.place(to, owner)?;
            }
        } else if let Some(to) = mv.to {
            self.place(to, mv.mover)?;
        }
        self.mover = if self.mover >= self.players { 1 } else { self.mover + 1 };
        self.turn += 1;
        Ok(())
    }

    /// Revert one move. Moves never capture, so the inverse is fully
    /// determined by the move itself.
    pub fn undo(&mut self, mv: &Move) -> EvalResult<()> {
        if let Some(to) = mv.to {
            let owner = self.remove(to)?;
            if let Some(from) = mv.from {
                self.place(from, owner.unwrap_or(mv.mover))?;
            }
        }
        self.mover = if self.mover <= 1 { self.players } else { self.mover - 1 };
        self.turn = self.turn.saturating_sub(1);
        Ok(())
    }
}

/// The move history of one trial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trial {
    moves: Vec<Move>,
}

impl Trial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    /// The most recent move, `None` before any move has been made.
    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> State {
        State::new(&BoardGraph::square(3), 2)
    }

    #[test]
    fn placement_round_trip() {
        let mut s = state();
        assert!(s.is_empty_cell(4));

        let mv = Move::place(Site::cell(4), 1);
        s.apply(&mv).unwrap();
        assert_eq!(s.owner_at(Site::cell(4)), Some(1));
        assert_eq!(s.mover(), 2);
        assert_eq!(s.turn(), 1);

        s.undo(&mv).unwrap();
        assert!(s.is_empty_cell(4));
        assert_eq!(s.mover(), 1);
        assert_eq!(s.turn(), 0);
    }

    #[test]
    fn displacement_keeps_owner() {
        let mut s = state();
        s.place(Site::cell(0), 2).unwrap();

        let mv = Move::between(Site::cell(0), Site::cell(1), 1);
        s.apply(&mv).unwrap();
        assert!(s.is_empty_cell(0));
        assert_eq!(s.owner_at(Site::cell(1)), Some(2));

        s.undo(&mv).unwrap();
        assert_eq!(s.owner_at(Site::cell(0)), Some(2));
        assert!(s.is_empty_cell(1));
    }

    #[test]
    fn pass_only_advances_the_turn() {
        let mut s = state();
        s.apply(&Move::pass(1)).unwrap();
        assert_eq!(s.empty_cells().len(), 9);
        assert_eq!(s.mover(), 2);
        s.apply(&Move::pass(2)).unwrap();
        assert_eq!(s.mover(), 1);
    }

    #[test]
    fn occupancy_regions() {
        let mut s = state();
        s.place(Site::cell(0), 1).unwrap();
        s.place(Site::cell(8), 2).unwrap();
        assert_eq!(s.empty_cells().len(), 7);
        assert_eq!(s.occupied_cells(None).sites(), &[0, 8]);
        assert_eq!(s.occupied_cells(Some(1)).sites(), &[0]);
        assert_eq!(s.occupied_cells(Some(3)).len(), 0);
    }

    #[test]
    fn out_of_range_placement_errors() {
        let mut s = state();
        assert!(matches!(
            s.place(Site::cell(99), 1),
            Err(EvalError::OutOfRange { .. })
        ));
    }

    #[test]
    fn vertex_sites_are_independent_of_cells() {
        let mut s = state();
        s.place(Site::vertex(4), 1).unwrap();
        assert!(s.is_empty_cell(4));
        assert_eq!(s.owner_at(Site::vertex(4)), Some(1));
    }

    #[test]
    fn trial_tracks_last_move() {
        let mut trial = Trial::new();
        assert!(trial.last_move().is_none());
        trial.record(Move::place(Site::cell(0), 1));
        trial.record(Move::pass(2));
        assert_eq!(trial.len(), 2);
        assert!(trial.last_move().unwrap().is_pass());
        trial.pop();
        assert_eq!(trial.last_move().unwrap().to, Some(Site::cell(0)));
    }
}
