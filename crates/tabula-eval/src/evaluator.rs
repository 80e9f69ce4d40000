//! Tree evaluation against the live context.
//!
//! Each domain gets one `eval_*` method on [`Context`]. Slot-publishing
//! parents follow a strict discipline: swap the slot in, evaluate the
//! child through a helper so the previous value is restored before any
//! `?` can return, and assert in debug builds that the node declared the
//! slot in its write set.

use tabula_tree::{
    ArrayKind, ArrayNode, BoolKind, BoolNode, Game, GraphNode, IntKind, IntNode, MovesKind,
    MovesNode, RegionKind, RegionNode,
};
use tabula_types::{
    BoardGraph, DomainValue, EvalSlot, Move, Region, Site, UNDEFINED,
};

use crate::context::Context;
use crate::error::{EvalError, EvalResult};

/// A borrowed node of any domain, for the generic query interface.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Bool(&'a BoolNode),
    Int(&'a IntNode),
    Array(&'a ArrayNode),
    Region(&'a RegionNode),
    Moves(&'a MovesNode),
    Graph(&'a GraphNode),
}

impl Context<'_> {
    /// Evaluate any node to its domain value.
    pub fn evaluate(&mut self, node: NodeRef<'_>) -> EvalResult<DomainValue> {
        match node {
            NodeRef::Bool(n) => self.eval_bool(n).map(DomainValue::Bool),
            NodeRef::Int(n) => self.eval_int(n).map(DomainValue::Int),
            NodeRef::Array(n) => self.eval_array(n).map(DomainValue::Array),
            NodeRef::Region(n) => self.eval_region(n).map(DomainValue::Region),
            NodeRef::Moves(n) => self.eval_moves(n).map(DomainValue::Moves),
            NodeRef::Graph(n) => self.eval_graph(n).map(DomainValue::Graph),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Booleans
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_bool(&mut self, node: &BoolNode) -> EvalResult<bool> {
        match &node.kind {
            BoolKind::Constant(value) => Ok(*value),
            BoolKind::Not(child) => Ok(!self.eval_bool(child)?),
            BoolKind::And(children) => {
                for child in children {
                    if !self.eval_bool(child)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            BoolKind::Or(children) => {
                for child in children {
                    if self.eval_bool(child)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            BoolKind::Compare { op, left, right } => {
                let left = self.eval_int(left)?;
                let right = self.eval_int(right)?;
                Ok(op.apply(left, right))
            }
            BoolKind::IsEmpty(site) => {
                let site = self.eval_int(site)?;
                Ok(usize::try_from(site)
                    .is_ok_and(|idx| self.state.is_empty_cell(idx)))
            }
            BoolKind::IsOccupied(site) => {
                let site = self.eval_int(site)?;
                Ok(usize::try_from(site)
                    .is_ok_and(|idx| self.state.is_occupied_cell(idx)))
            }
            BoolKind::IsIn { site, region } => {
                let site = self.eval_int(site)?;
                let region = self.eval_region(region)?;
                Ok(usize::try_from(site).is_ok_and(|idx| region.contains(idx)))
            }
            BoolKind::LastToIs(element) => Ok(self
                .trial
                .last_move()
                .and_then(Move::to_element)
                == Some(*element)),
            BoolKind::NoMoves => {
                let game: &Game = self.game;
                Ok(self.eval_moves(&game.rules.play)?.is_empty())
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Ints
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_int(&mut self, node: &IntNode) -> EvalResult<i32> {
        match &node.kind {
            IntKind::Constant(value) => Ok(*value),
            IntKind::Var(slot) => {
                debug_assert!(
                    node.reads_flat().contains(*slot),
                    "undeclared slot read"
                );
                Ok(self.scratch.get(*slot))
            }
            IntKind::Mover => Ok(i32::from(self.state.mover())),
            IntKind::LastTo => Ok(self
                .trial
                .last_move()
                .and_then(|mv| mv.to)
                .map_or(UNDEFINED, |site| site.index as i32)),
            IntKind::LastFrom => Ok(self
                .trial
                .last_move()
                .and_then(|mv| mv.from)
                .map_or(UNDEFINED, |site| site.index as i32)),
            IntKind::Add(children) => {
                let mut sum = 0i32;
                for child in children {
                    sum = sum.wrapping_add(self.eval_int(child)?);
                }
                Ok(sum)
            }
            IntKind::Sub(left, right) => {
                Ok(self.eval_int(left)?.wrapping_sub(self.eval_int(right)?))
            }
            IntKind::Mul(children) => {
                let mut product = 1i32;
                for child in children {
                    product = product.wrapping_mul(self.eval_int(child)?);
                }
                Ok(product)
            }
            IntKind::Div(left, right) => {
                let divisor = self.eval_int(right)?;
                if divisor == 0 {
                    return Err(EvalError::ArithmeticTrap { operation: "/" });
                }
                Ok(self.eval_int(left)?.wrapping_div(divisor))
            }
            IntKind::Count(region) => {
                let region = self.eval_region(region)?;
                Ok(region.len() as i32)
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Regions
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_region(&mut self, node: &RegionNode) -> EvalResult<Region> {
        match &node.kind {
            RegionKind::All => Ok(Region::range(self.board.cell_count())),
            RegionKind::Empty => Ok(self.state.empty_cells()),
            RegionKind::Occupied { player } => {
                let by = match player {
                    None => None,
                    Some(player) => {
                        let value = self.eval_int(player)?;
                        match u8::try_from(value) {
                            Ok(p) => Some(p),
                            // No such player owns anything.
                            Err(_) => return Ok(Region::empty()),
                        }
                    }
                };
                Ok(self.state.occupied_cells(by))
            }
            RegionKind::Named(_) => node
                .cache
                .resolved_region()
                .cloned()
                .ok_or(EvalError::NotPreprocessed),
            RegionKind::Sites(sites) => Ok(Region::new(sites.clone())),
            RegionKind::FromContext => {
                Ok(self.scratch.region().cloned().unwrap_or_else(Region::empty))
            }
            RegionKind::Union(children) => {
                let mut acc = Region::empty();
                for child in children {
                    acc = acc.union(&self.eval_region(child)?);
                }
                Ok(acc)
            }
            RegionKind::Intersection(children) => {
                let mut iter = children.iter();
                let mut acc = match iter.next() {
                    Some(first) => self.eval_region(first)?,
                    None => return Ok(Region::empty()),
                };
                for child in iter {
                    acc = acc.intersection(&self.eval_region(child)?);
                }
                Ok(acc)
            }
            RegionKind::Difference(left, right) => {
                let left = self.eval_region(left)?;
                let right = self.eval_region(right)?;
                Ok(left.difference(&right))
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Arrays
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_array(&mut self, node: &ArrayNode) -> EvalResult<Vec<i32>> {
        match &node.kind {
            ArrayKind::Literal(values) => Ok(values.clone()),
            ArrayKind::FromRegion(region) => {
                Ok(self.eval_region(region)?.to_int_array())
            }
            ArrayKind::Union(children) => {
                let mut acc = Vec::new();
                for child in children {
                    acc.extend(self.eval_array(child)?);
                }
                acc.sort_unstable();
                acc.dedup();
                Ok(acc)
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Graphs
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_graph(&mut self, node: &GraphNode) -> EvalResult<BoardGraph> {
        match node.cache.resolved_graph() {
            Some(graph) => Ok(graph.clone()),
            None => Ok(node.generate()),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Moves
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_moves(&mut self, node: &MovesNode) -> EvalResult<Vec<Move>> {
        let mover = self.state.mover();
        match &node.kind {
            MovesKind::Pass => Ok(vec![Move::pass(mover)]),
            MovesKind::Add { to, condition } => {
                debug_assert!(node.writes_flat().contains(EvalSlot::To));
                let candidates = self.eval_region(to)?;
                let mut moves = Vec::new();
                for site in candidates.iter() {
                    if !self.state.is_empty_cell(site) {
                        continue;
                    }
                    if self.passes(condition.as_deref(), EvalSlot::To, site)? {
                        moves.push(Move::place(Site::cell(site), mover));
                    }
                }
                Ok(moves)
            }
            MovesKind::FromTo { from, to, condition } => {
                debug_assert!(node.writes_flat().contains(EvalSlot::From));
                let origins = self.eval_region(from)?;
                let targets = self.eval_region(to)?;
                let mut moves = Vec::new();
                for origin in origins.iter() {
                    if self.state.owner_at(Site::cell(origin)) != Some(mover) {
                        continue;
                    }
                    for target in targets.iter() {
                        if !self.state.is_empty_cell(target) {
                            continue;
                        }
                        let ok = self.with_slot(EvalSlot::From, origin, |ctx| {
                            ctx.passes(condition.as_deref(), EvalSlot::To, target)
                        })?;
                        if ok {
                            moves.push(Move::between(
                                Site::cell(origin),
                                Site::cell(target),
                                mover,
                            ));
                        }
                    }
                }
                Ok(moves)
            }
            MovesKind::Or(children) => {
                let mut moves = Vec::new();
                for child in children {
                    moves.extend(self.eval_moves(child)?);
                }
                Ok(moves)
            }
            MovesKind::If { condition, then, otherwise } => {
                if self.eval_bool(condition)? {
                    self.eval_moves(then)
                } else {
                    match otherwise {
                        Some(otherwise) => self.eval_moves(otherwise),
                        None => Ok(Vec::new()),
                    }
                }
            }
            MovesKind::ForEachSite { region, generator } => {
                debug_assert!(node.writes_flat().contains(EvalSlot::Site));
                let sites = self.eval_region(region)?;
                let prev_region = self.scratch.swap_region(Some(sites.clone()));
                let result = self.for_each_site(&sites, generator);
                self.scratch.swap_region(prev_region);
                result
            }
        }
    }

    fn for_each_site(
        &mut self,
        sites: &Region,
        generator: &MovesNode,
    ) -> EvalResult<Vec<Move>> {
        let mut moves = Vec::new();
        for site in sites.iter() {
            let generated = self.with_slot(EvalSlot::Site, site, |ctx| {
                ctx.eval_moves(generator)
            })?;
            moves.extend(generated);
        }
        Ok(moves)
    }

    /// Evaluate an optional condition with `slot` published as `site`.
    /// A missing condition always passes.
    fn passes(
        &mut self,
        condition: Option<&BoolNode>,
        slot: EvalSlot,
        site: usize,
    ) -> EvalResult<bool> {
        match condition {
            None => Ok(true),
            Some(condition) => {
                self.with_slot(slot, site, |ctx| ctx.eval_bool(condition))
            }
        }
    }

    /// Publish an int slot around a child evaluation. The previous value
    /// is restored before the result (success or error) propagates.
    fn with_slot<T>(
        &mut self,
        slot: EvalSlot,
        site: usize,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        let prev = self.scratch.swap(slot, Some(site as i32));
        let result = f(self);
        self.scratch.swap(slot, prev);
        result
    }
}
