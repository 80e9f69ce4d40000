//! The per-trial evaluation context.

use tabula_tree::{EndOutcome, Game};
use tabula_types::{BoardGraph, EvalSlot, Move, Region, UNDEFINED};

use crate::board::{State, Trial};
use crate::error::{EvalError, EvalResult};

/// The typed scratch slots: transient values a parent node publishes
/// immediately before evaluating a child, and restores afterwards.
///
/// All int slots read [`UNDEFINED`] while unset, so a child evaluated
/// outside its intended parent degrades to a defined value instead of
/// crashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scratch {
    from: Option<i32>,
    to: Option<i32>,
    between: Option<i32>,
    site: Option<i32>,
    level: Option<i32>,
    player: Option<i32>,
    value: Option<i32>,
    region: Option<Region>,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, slot: EvalSlot) -> &mut Option<i32> {
        match slot {
            EvalSlot::From => &mut self.from,
            EvalSlot::To => &mut self.to,
            EvalSlot::Between => &mut self.between,
            EvalSlot::Site => &mut self.site,
            EvalSlot::Level => &mut self.level,
            EvalSlot::Player => &mut self.player,
            EvalSlot::Value => &mut self.value,
            EvalSlot::Region => {
                panic!("the region slot holds a region, not an int")
            }
        }
    }

    /// Current value of an int slot, [`UNDEFINED`] if unset.
    pub fn get(&self, slot: EvalSlot) -> i32 {
        let value = match slot {
            EvalSlot::From => self.from,
            EvalSlot::To => self.to,
            EvalSlot::Between => self.between,
            EvalSlot::Site => self.site,
            EvalSlot::Level => self.level,
            EvalSlot::Player => self.player,
            EvalSlot::Value => self.value,
            EvalSlot::Region => None,
        };
        value.unwrap_or(UNDEFINED)
    }

    /// Swap a new state into an int slot, returning the previous one so
    /// the caller can restore it.
    pub fn swap(&mut self, slot: EvalSlot, value: Option<i32>) -> Option<i32> {
        std::mem::replace(self.slot_mut(slot), value)
    }

    /// The region under iteration, if any.
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Swap the region slot, returning the previous one.
    pub fn swap_region(&mut self, region: Option<Region>) -> Option<Region> {
        std::mem::replace(&mut self.region, region)
    }
}

/// A per-trial evaluation context over a shared preprocessed [`Game`].
///
/// Holds everything mutable about one playthrough: the position, the
/// move history, and the scratch slots. The game itself stays read-only,
/// so any number of contexts can run over it concurrently.
pub struct Context<'g> {
    pub(crate) game: &'g Game,
    pub(crate) board: &'g BoardGraph,
    pub(crate) state: State,
    pub(crate) trial: Trial,
    pub(crate) scratch: Scratch,
}

impl<'g> Context<'g> {
    /// Open a fresh trial. Fails if the game skipped preprocessing; the
    /// evaluator depends on resolved caches throughout.
    pub fn new(game: &'g Game) -> EvalResult<Self> {
        let board = game.board().ok_or(EvalError::NotPreprocessed)?;
        let mut ctx = Self {
            game,
            board,
            state: State::new(board, game.players),
            trial: Trial::new(),
            scratch: Scratch::new(),
        };
        ctx.setup()?;
        Ok(ctx)
    }

    /// Apply the start rules to the initial position. Start placements
    /// mutate the state directly and never enter the trial history.
    fn setup(&mut self) -> EvalResult<()> {
        let game = self.game;
        if let Some(start) = &game.rules.start {
            let moves = self.eval_moves(start)?;
            for mv in &moves {
                if let Some(to) = mv.to {
                    self.state.place(to, mv.mover)?;
                }
            }
        }
        Ok(())
    }

    pub fn game(&self) -> &'g Game {
        self.game
    }

    pub fn board(&self) -> &'g BoardGraph {
        self.board
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn trial(&self) -> &Trial {
        &self.trial
    }

    /// The legal moves of the current position.
    pub fn legal_moves(&mut self) -> EvalResult<Vec<Move>> {
        let game = self.game;
        self.eval_moves(&game.rules.play)
    }

    /// Apply one move: mutate the position and record it in the trial.
    pub fn apply(&mut self, mv: Move) -> EvalResult<()> {
        self.state.apply(&mv)?;
        self.trial.record(mv);
        Ok(())
    }

    /// Revert the most recent move, if any.
    pub fn undo(&mut self) -> EvalResult<()> {
        if let Some(mv) = self.trial.pop() {
            self.state.undo(&mv)?;
        }
        Ok(())
    }

    /// Check the end rules in order; the first satisfied condition
    /// decides. `None` while the game is still live.
    pub fn check_end(&mut self) -> EvalResult<Option<EndOutcome>> {
        let game = self.game;
        for rule in &game.rules.end {
            if self.eval_bool(&rule.condition)? {
                return Ok(Some(rule.outcome));
            }
        }
        Ok(None)
    }
}
