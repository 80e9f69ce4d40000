//! The one-time preprocessing pass.
//!
//! Runs bottom-up over the whole compiled tree and freezes every node's
//! derived properties: recursive flag/concept unions, scratch-slot
//! dependency sets, and staticness. Symbolic references (named regions,
//! the board generator) are resolved into node caches on the way.
//!
//! Structural problems never abort the pass. Each finding is appended to
//! the [`ValidationReport`] with a degraded-but-safe binding in place
//! (an unknown region binds empty), so one run surfaces every issue in a
//! description.

use std::collections::HashMap;

use tabula_types::{
    ConceptSet, GameFlags, Region, SlotSet, ValidationCode, ValidationIssue, ValidationReport,
};
use tabula_tree::{
    BoolKind, BoolNode, Game, GameProps, IntKind, IntNode, MovesKind, MovesNode, RegionKind,
    RegionNode, StaticProps,
};

/// Preprocess a game in place, accumulating findings into `report`.
///
/// Idempotent: a second run recomputes and overwrites every cache, and
/// reports the same findings again into whatever report it is given.
pub fn run(game: &mut Game, report: &mut ValidationReport) {
    // The board resolves first; everything downstream needs its extent.
    let graph = game.equipment.board.generate();
    let board_props = StaticProps {
        flags: game.equipment.board.flat_flags(),
        concepts: game.equipment.board.flat_concepts(),
        reads: SlotSet::EMPTY,
        writes: SlotSet::EMPTY,
        is_static: true,
    };
    game.equipment.board.set_props(board_props);
    game.equipment.board.cache.bind_graph(graph.clone());

    let cell_count = graph.cell_count();

    // Equipment regions are literal, so range-check them here once.
    let mut regions = HashMap::new();
    for (idx, named) in game.equipment.regions.iter().enumerate() {
        for &site in named.sites.sites() {
            if site >= cell_count {
                report.push(ValidationIssue::new(
                    ValidationCode::SITE_OUT_OF_RANGE,
                    format!(
                        "site {site} in region '{}' exceeds the board's {cell_count} cells",
                        named.name
                    ),
                    format!("equipment/namedRegion[{idx}]"),
                ));
            }
        }
        regions.insert(named.name.clone(), named.sites.clone());
    }

    let mut pass = Pass { regions, cell_count, in_play: false, play_props: None, report };

    // Play goes first: 'noMoves' anywhere else re-enters move generation,
    // so its footprint is play's footprint.
    let mut props = board_props;
    pass.in_play = true;
    let play_props = pass.moves(&mut game.rules.play, "rules/play");
    pass.in_play = false;
    pass.play_props = Some(play_props);
    merge(&mut props, play_props);
    if let Some(start) = game.rules.start.as_mut() {
        merge(&mut props, pass.moves(start, "rules/start"));
    }
    for (idx, rule) in game.rules.end.iter_mut().enumerate() {
        let path = format!("rules/end[{idx}]");
        merge(&mut props, pass.boolean(&mut rule.condition, &path));
    }

    // A game that places or moves pieces needs at least one piece type.
    let moves_pieces = props
        .flags
        .intersects(GameFlags::PLACEMENT_MOVES | GameFlags::MOVEMENT_MOVES);
    if moves_pieces && game.equipment.pieces.is_empty() {
        report.push(ValidationIssue::new(
            ValidationCode::UNDEFINED_PIECE,
            "the rules place or move pieces but the equipment defines none",
            "equipment",
        ));
    }

    game.set_props(GameProps {
        flags: props.flags,
        concepts: props.concepts,
        board: graph,
    });
}

struct Pass<'r> {
    regions: HashMap<String, Region>,
    cell_count: usize,
    /// True while walking `rules.play` itself.
    in_play: bool,
    /// Play's frozen properties, available once it has been walked.
    play_props: Option<StaticProps>,
    report: &'r mut ValidationReport,
}

/// Fold a child's recursive properties into the parent's accumulator.
fn merge(base: &mut StaticProps, child: StaticProps) {
    base.flags |= child.flags;
    base.concepts |= child.concepts;
    base.reads |= child.reads;
    base.writes |= child.writes;
    base.is_static &= child.is_static;
}

/// The starting accumulator for a node: its flat contributions plus the
/// variant's intrinsic staticness (ANDed with the children's later).
fn seed(flags: GameFlags, concepts: ConceptSet, reads: SlotSet, is_static: bool) -> StaticProps {
    StaticProps { flags, concepts, reads, writes: SlotSet::EMPTY, is_static }
}

impl Pass<'_> {
    fn issue(&mut self, code: ValidationCode, message: String, path: &str) {
        self.report.push(ValidationIssue::new(code, message, path));
    }

    fn empty_operator(&mut self, keyword: &str, path: &str) {
        self.issue(
            ValidationCode::EMPTY_OPERATOR,
            format!("'{keyword}' has no operands"),
            path,
        );
    }

    // ── Booleans ──────────────────────────────────────────────────────────

    fn boolean(&mut self, node: &mut BoolNode, path: &str) -> StaticProps {
        let is_static = !matches!(
            node.kind,
            BoolKind::IsEmpty(_)
                | BoolKind::IsOccupied(_)
                | BoolKind::LastToIs(_)
                | BoolKind::NoMoves
        );
        let mut props = seed(node.flat_flags(), node.flat_concepts(), node.reads_flat(), is_static);

        match &mut node.kind {
            BoolKind::Constant(_) | BoolKind::LastToIs(_) => {}
            BoolKind::NoMoves => {
                if self.in_play {
                    // Evaluating 'noMoves' generates the play moves, so a
                    // 'noMoves' under play recurses without bound.
                    self.issue(
                        ValidationCode::RECURSIVE_NO_MOVES,
                        "'noMoves' inside the play rule re-enters move generation without bound"
                            .to_string(),
                        path,
                    );
                } else if let Some(play) = self.play_props {
                    // 'noMoves' walks the whole play tree; its slot
                    // footprint is play's, not its own empty flat sets.
                    props.reads |= play.reads;
                    props.writes |= play.writes;
                }
            }
            BoolKind::Not(child) => {
                merge(&mut props, self.boolean(child, &format!("{path}/not")));
            }
            BoolKind::And(children) => {
                if children.is_empty() {
                    self.empty_operator("and", path);
                }
                for (idx, child) in children.iter_mut().enumerate() {
                    merge(&mut props, self.boolean(child, &format!("{path}/and[{idx}]")));
                }
            }
            BoolKind::Or(children) => {
                if children.is_empty() {
                    self.empty_operator("or", path);
                }
                for (idx, child) in children.iter_mut().enumerate() {
                    merge(&mut props, self.boolean(child, &format!("{path}/or[{idx}]")));
                }
            }
            BoolKind::Compare { op, left, right } => {
                let symbol = op.symbol();
                merge(&mut props, self.integer(left, &format!("{path}/{symbol}/left")));
                merge(&mut props, self.integer(right, &format!("{path}/{symbol}/right")));
            }
            BoolKind::IsEmpty(site) => {
                merge(&mut props, self.integer(site, &format!("{path}/isEmpty/site")));
            }
            BoolKind::IsOccupied(site) => {
                merge(&mut props, self.integer(site, &format!("{path}/isOccupied/site")));
            }
            BoolKind::IsIn { site, region } => {
                merge(&mut props, self.integer(site, &format!("{path}/isIn/site")));
                merge(&mut props, self.region(region, &format!("{path}/isIn/region")));
            }
        }

        node.set_props(props);
        props
    }

    // ── Ints ──────────────────────────────────────────────────────────────

    fn integer(&mut self, node: &mut IntNode, path: &str) -> StaticProps {
        let is_static = !matches!(
            node.kind,
            IntKind::Var(_) | IntKind::Mover | IntKind::LastTo | IntKind::LastFrom
        );
        let mut props = seed(node.flat_flags(), node.flat_concepts(), node.reads_flat(), is_static);

        match &mut node.kind {
            IntKind::Constant(_)
            | IntKind::Var(_)
            | IntKind::Mover
            | IntKind::LastTo
            | IntKind::LastFrom => {}
            IntKind::Add(children) => {
                for (idx, child) in children.iter_mut().enumerate() {
                    merge(&mut props, self.integer(child, &format!("{path}/+[{idx}]")));
                }
            }
            IntKind::Sub(left, right) => {
                merge(&mut props, self.integer(left, &format!("{path}/-/left")));
                merge(&mut props, self.integer(right, &format!("{path}/-/right")));
            }
            IntKind::Mul(children) => {
                for (idx, child) in children.iter_mut().enumerate() {
                    merge(&mut props, self.integer(child, &format!("{path}/*[{idx}]")));
                }
            }
            IntKind::Div(left, right) => {
                merge(&mut props, self.integer(left, &format!("{path}//left")));
                merge(&mut props, self.integer(right, &format!("{path}//right")));
                // A constant-zero divisor is decidable now; a dynamic
                // zero stays a runtime trap.
                if matches!(right.kind, IntKind::Constant(0)) {
                    self.issue(
                        ValidationCode::DIVISION_BY_ZERO,
                        "divisor is the constant 0".to_string(),
                        path,
                    );
                }
            }
            IntKind::Count(region) => {
                merge(&mut props, self.region(region, &format!("{path}/count")));
            }
        }

        node.set_props(props);
        props
    }

    // ── Regions ───────────────────────────────────────────────────────────

    fn region(&mut self, node: &mut RegionNode, path: &str) -> StaticProps {
        let is_static = !matches!(
            node.kind,
            RegionKind::Empty | RegionKind::Occupied { .. } | RegionKind::FromContext
        );
        let mut props = seed(node.flat_flags(), node.flat_concepts(), node.reads_flat(), is_static);

        match &mut node.kind {
            RegionKind::All | RegionKind::Empty | RegionKind::FromContext => {}
            RegionKind::Occupied { player } => {
                if let Some(player) = player {
                    merge(&mut props, self.integer(player, &format!("{path}/occupied/by")));
                }
            }
            RegionKind::Named(name) => {
                let resolved = match self.regions.get(name.as_str()) {
                    Some(region) => region.clone(),
                    None => {
                        self.issue(
                            ValidationCode::UNDEFINED_REGION,
                            format!("region '{name}' is not defined by the equipment"),
                            path,
                        );
                        Region::empty()
                    }
                };
                node.cache.bind_region(resolved);
            }
            RegionKind::Sites(sites) => {
                for &site in sites.iter() {
                    if site >= self.cell_count {
                        self.issue(
                            ValidationCode::SITE_OUT_OF_RANGE,
                            format!(
                                "site {site} exceeds the board's {} cells",
                                self.cell_count
                            ),
                            path,
                        );
                    }
                }
            }
            RegionKind::Union(children) => {
                if children.is_empty() {
                    self.empty_operator("union", path);
                }
                for (idx, child) in children.iter_mut().enumerate() {
                    merge(&mut props, self.region(child, &format!("{path}/union[{idx}]")));
                }
            }
            RegionKind::Intersection(children) => {
                if children.is_empty() {
                    self.empty_operator("intersection", path);
                }
                for (idx, child) in children.iter_mut().enumerate() {
                    merge(
                        &mut props,
                        self.region(child, &format!("{path}/intersection[{idx}]")),
                    );
                }
            }
            RegionKind::Difference(left, right) => {
                merge(&mut props, self.region(left, &format!("{path}/difference/source")));
                merge(
                    &mut props,
                    self.region(right, &format!("{path}/difference/subtrahend")),
                );
            }
        }

        node.set_props(props);
        props
    }

    // ── Moves ─────────────────────────────────────────────────────────────

    fn moves(&mut self, node: &mut MovesNode, path: &str) -> StaticProps {
        // Move generation always depends on the position.
        let mut props =
            seed(node.flat_flags(), node.flat_concepts(), node.reads_flat(), false);
        props.writes = node.writes_flat();

        match &mut node.kind {
            MovesKind::Pass => {}
            MovesKind::Add { to, condition } => {
                merge(&mut props, self.region(to, &format!("{path}/add/to")));
                if let Some(condition) = condition {
                    merge(&mut props, self.boolean(condition, &format!("{path}/add/if")));
                }
            }
            MovesKind::FromTo { from, to, condition } => {
                merge(&mut props, self.region(from, &format!("{path}/fromTo/from")));
                merge(&mut props, self.region(to, &format!("{path}/fromTo/to")));
                if let Some(condition) = condition {
                    merge(&mut props, self.boolean(condition, &format!("{path}/fromTo/if")));
                }
            }
            MovesKind::Or(children) => {
                if children.is_empty() {
                    self.empty_operator("or", path);
                }
                for (idx, child) in children.iter_mut().enumerate() {
                    merge(&mut props, self.moves(child, &format!("{path}/or[{idx}]")));
                }
            }
            MovesKind::If { condition, then, otherwise } => {
                merge(&mut props, self.boolean(condition, &format!("{path}/if/condition")));
                // Both branches contribute: flags and concepts describe
                // what the game can do, not one playthrough.
                merge(&mut props, self.moves(then, &format!("{path}/if/then")));
                if let Some(otherwise) = otherwise {
                    merge(&mut props, self.moves(otherwise, &format!("{path}/if/else")));
                }
            }
            MovesKind::ForEachSite { region, generator } => {
                merge(&mut props, self.region(region, &format!("{path}/forEach/region")));
                merge(&mut props, self.moves(generator, &format!("{path}/forEach/moves")));
            }
        }

        props.is_static = false;
        node.set_props(props);
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_tree::{EndOutcome, EndRule, Equipment, GraphNode, Rules};
    use tabula_types::{Concept, EvalSlot};

    fn game_with_play(play: MovesNode) -> Game {
        Game::new(
            "Test",
            2,
            Equipment::new(GraphNode::square(3)).with_piece("Disc", 1),
            Rules { start: None, play, end: Vec::new() },
        )
    }

    fn add_to_empty() -> MovesNode {
        MovesNode::new(MovesKind::Add {
            to: Box::new(RegionNode::new(RegionKind::Empty)),
            condition: None,
        })
    }

    #[test]
    fn aggregates_flags_bottom_up() {
        let mut game = game_with_play(add_to_empty());
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);

        assert!(report.is_clean());
        assert!(game.is_preprocessed());
        assert!(game.flags().contains(GameFlags::PLACEMENT_MOVES));
        assert!(game.concepts().contains(Concept::Placement));
        assert!(game.concepts().contains(Concept::EmptySites));
        assert_eq!(game.board().map(|b| b.cell_count()), Some(9));
    }

    #[test]
    fn recursive_props_superset_of_flat() {
        let mut game = game_with_play(add_to_empty());
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);

        let play = &game.rules.play;
        assert!(play.flags().contains(play.flat_flags()));
        assert!(play.flat_concepts().is_subset_of(play.concepts()));
        assert!(play.writes_flat().is_subset_of(play.writes_recursive()));
    }

    #[test]
    fn recursive_props_equal_flat_union_of_children() {
        let condition = BoolNode::new(BoolKind::IsEmpty(Box::new(IntNode::new(
            IntKind::Var(EvalSlot::Site),
        ))));
        let inner = MovesNode::new(MovesKind::Add {
            to: Box::new(RegionNode::new(RegionKind::Empty)),
            condition: Some(Box::new(condition)),
        });
        let play = MovesNode::new(MovesKind::ForEachSite {
            region: Box::new(RegionNode::all()),
            generator: Box::new(inner),
        });
        let mut game = game_with_play(play);
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);

        let play = &game.rules.play;
        let MovesKind::ForEachSite { region, generator } = &play.kind else {
            panic!("play changed shape");
        };
        assert_eq!(
            play.flags(),
            play.flat_flags() | region.flags() | generator.flags()
        );
        assert_eq!(
            play.concepts(),
            play.flat_concepts() | region.concepts() | generator.concepts()
        );
        assert_eq!(
            play.reads_recursive(),
            play.reads_flat() | region.reads_recursive() | generator.reads_recursive()
        );
        assert_eq!(
            play.writes_recursive(),
            play.writes_flat() | region.writes_recursive() | generator.writes_recursive()
        );
    }

    #[test]
    fn no_moves_inside_play_is_will_crash() {
        // (play (if (noMoves) (pass) (pass))): generating play's moves
        // evaluates the condition, which generates play's moves again.
        let play = MovesNode::new(MovesKind::If {
            condition: Box::new(BoolNode::new(BoolKind::NoMoves)),
            then: Box::new(MovesNode::pass()),
            otherwise: Some(Box::new(MovesNode::pass())),
        });
        let mut game = game_with_play(play);
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);

        assert!(report.has_will_crash());
        let issue = &report.issues()[0];
        assert_eq!(issue.code, ValidationCode::RECURSIVE_NO_MOVES);
        assert_eq!(issue.path, "rules/play/if/condition");
        assert!(game.is_preprocessed());
    }

    #[test]
    fn no_moves_in_end_condition_inherits_play_footprint() {
        let condition = BoolNode::new(BoolKind::IsEmpty(Box::new(IntNode::new(
            IntKind::Var(EvalSlot::Site),
        ))));
        let inner = MovesNode::new(MovesKind::Add {
            to: Box::new(RegionNode::new(RegionKind::Empty)),
            condition: Some(Box::new(condition)),
        });
        let play = MovesNode::new(MovesKind::ForEachSite {
            region: Box::new(RegionNode::all()),
            generator: Box::new(inner),
        });
        let mut game = Game::new(
            "Test",
            2,
            Equipment::new(GraphNode::square(3)).with_piece("Disc", 1),
            Rules {
                start: None,
                play,
                end: vec![EndRule {
                    condition: BoolNode::new(BoolKind::NoMoves),
                    outcome: EndOutcome::Loss,
                }],
            },
        );
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);

        assert!(report.is_clean());
        let end = &game.rules.end[0].condition;
        let play = &game.rules.play;
        assert_eq!(end.reads_recursive(), play.reads_recursive());
        assert_eq!(end.writes_recursive(), play.writes_recursive());
    }

    #[test]
    fn undefined_region_reports_and_binds_empty() {
        let play = MovesNode::new(MovesKind::Add {
            to: Box::new(RegionNode::new(RegionKind::Named("home".into()))),
            condition: None,
        });
        let mut game = game_with_play(play);
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);

        assert!(report.has_missing_requirement());
        let issue = &report.issues()[0];
        assert_eq!(issue.code, ValidationCode::UNDEFINED_REGION);
        assert_eq!(issue.path, "rules/play/add/to");

        // The pass still completed with a safe binding.
        assert!(game.is_preprocessed());
        if let MovesKind::Add { to, .. } = &game.rules.play.kind {
            assert_eq!(to.cache.resolved_region().map(|r| r.len()), Some(0));
        } else {
            panic!("play changed shape");
        }
    }

    #[test]
    fn constant_zero_divisor_is_reported_not_thrown() {
        let condition = BoolNode::new(BoolKind::Compare {
            op: tabula_tree::CompareOp::Eq,
            left: Box::new(IntNode::new(IntKind::Div(
                Box::new(IntNode::constant(6)),
                Box::new(IntNode::constant(0)),
            ))),
            right: Box::new(IntNode::constant(1)),
        });
        let play = MovesNode::new(MovesKind::If {
            condition: Box::new(condition),
            then: Box::new(MovesNode::pass()),
            otherwise: None,
        });
        let mut game = game_with_play(play);
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);

        assert!(report.has_will_crash());
        assert_eq!(report.issues()[0].code, ValidationCode::DIVISION_BY_ZERO);
        assert!(game.is_preprocessed());
    }

    #[test]
    fn dynamic_divisor_is_not_reported() {
        let condition = BoolNode::new(BoolKind::Compare {
            op: tabula_tree::CompareOp::Eq,
            left: Box::new(IntNode::new(IntKind::Div(
                Box::new(IntNode::constant(6)),
                Box::new(IntNode::new(IntKind::Mover)),
            ))),
            right: Box::new(IntNode::constant(3)),
        });
        let play = MovesKind::If {
            condition: Box::new(condition),
            then: Box::new(MovesNode::pass()),
            otherwise: None,
        };
        let mut game = game_with_play(MovesNode::new(play));
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);
        assert!(!report.has_will_crash());
    }

    #[test]
    fn out_of_range_literal_site() {
        let play = MovesNode::new(MovesKind::Add {
            to: Box::new(RegionNode::new(RegionKind::Sites(vec![4, 99]))),
            condition: None,
        });
        let mut game = game_with_play(play);
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);

        assert!(report.has_will_crash());
        assert_eq!(report.issues()[0].code, ValidationCode::SITE_OUT_OF_RANGE);
    }

    #[test]
    fn empty_operator_reported() {
        let play = MovesNode::new(MovesKind::If {
            condition: Box::new(BoolNode::new(BoolKind::And(Vec::new()))),
            then: Box::new(MovesNode::pass()),
            otherwise: None,
        });
        let mut game = game_with_play(play);
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);

        assert!(report.has_missing_requirement());
        let issue = &report.issues()[0];
        assert_eq!(issue.code, ValidationCode::EMPTY_OPERATOR);
        assert_eq!(issue.path, "rules/play/if/condition");
    }

    #[test]
    fn placement_without_pieces_is_missing_requirement() {
        let mut game = Game::new(
            "Test",
            2,
            Equipment::new(GraphNode::square(3)),
            Rules { start: None, play: add_to_empty(), end: Vec::new() },
        );
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);

        assert!(report
            .issues()
            .iter()
            .any(|i| i.code == ValidationCode::UNDEFINED_PIECE));
    }

    #[test]
    fn preprocessing_is_idempotent() {
        let mut game = game_with_play(add_to_empty());
        let mut first_report = ValidationReport::new();
        run(&mut game, &mut first_report);
        let flags = game.flags();
        let concepts = game.concepts();

        let mut second_report = ValidationReport::new();
        run(&mut game, &mut second_report);
        assert_eq!(game.flags(), flags);
        assert_eq!(game.concepts(), concepts);
        assert_eq!(second_report.total(), first_report.total());
    }

    #[test]
    fn scratch_dependencies_propagate() {
        // (forEach (all) (add to:(sites ...) if:(isEmpty (var site))))
        let condition = BoolNode::new(BoolKind::IsEmpty(Box::new(IntNode::new(
            IntKind::Var(EvalSlot::Site),
        ))));
        let inner = MovesNode::new(MovesKind::Add {
            to: Box::new(RegionNode::new(RegionKind::Empty)),
            condition: Some(Box::new(condition)),
        });
        let play = MovesNode::new(MovesKind::ForEachSite {
            region: Box::new(RegionNode::all()),
            generator: Box::new(inner),
        });
        let mut game = game_with_play(play);
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);

        let play = &game.rules.play;
        assert!(play.reads_recursive().contains(EvalSlot::Site));
        assert!(play.writes_recursive().contains(EvalSlot::Site));
        assert!(play.writes_recursive().contains(EvalSlot::To));
        assert!(!play.is_static());
    }

    #[test]
    fn static_subtrees_are_marked() {
        let condition = BoolNode::new(BoolKind::Compare {
            op: tabula_tree::CompareOp::Less,
            left: Box::new(IntNode::constant(1)),
            right: Box::new(IntNode::constant(2)),
        });
        let play = MovesKind::If {
            condition: Box::new(condition),
            then: Box::new(MovesNode::pass()),
            otherwise: None,
        };
        let mut game = game_with_play(MovesNode::new(play));
        let mut report = ValidationReport::new();
        run(&mut game, &mut report);

        if let MovesKind::If { condition, .. } = &game.rules.play.kind {
            assert!(condition.is_static());
        } else {
            panic!("play changed shape");
        }
        assert!(!game.rules.play.is_static());
    }
}
