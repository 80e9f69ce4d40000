//! End-to-end evaluation tests: compile a description, open a context,
//! and play.

use tabula_compiler::{compile, kw, Production};
use tabula_eval::{Context, EvalError, NodeRef};
use tabula_tree::{EndOutcome, Equipment, Game, GraphNode, MovesNode, Rules};
use tabula_types::{DomainValue, Move, Site, UNDEFINED};

fn game(players: i64, board: Production, extras: Vec<Production>, rules: Production) -> Game {
    let mut equipment = Production::new("equipment").with(board);
    for extra in extras {
        equipment = equipment.with(extra);
    }
    let root = Production::new("game")
        .with("Test")
        .with(Production::new("players").with(players))
        .with(equipment)
        .with(rules);
    let compiled = compile(&root).unwrap();
    assert!(compiled.report.is_clean(), "{:?}", compiled.report.issues());
    compiled.game
}

fn disc(owner: i64) -> Production {
    Production::new("piece").with("Disc").with(owner)
}

fn play(moves: Production) -> Production {
    Production::new("rules").with(Production::new("play").with(moves))
}

fn add_to_empty() -> Production {
    Production::new("add").with_named("to", Production::new("empty"))
}

#[test]
fn placement_game_has_one_move_per_empty_cell() {
    let game = game(
        2,
        Production::new("square").with(3i64),
        vec![disc(1), disc(2)],
        play(add_to_empty()),
    );
    let mut ctx = Context::new(&game).unwrap();

    let moves = ctx.legal_moves().unwrap();
    assert_eq!(moves.len(), 9);
    assert!(moves.iter().all(|m| m.mover == 1));

    ctx.apply(moves[4]).unwrap();
    assert_eq!(ctx.state().mover(), 2);

    let moves = ctx.legal_moves().unwrap();
    assert_eq!(moves.len(), 8);
    assert!(moves.iter().all(|m| m.to != Some(Site::cell(4))));
    assert!(moves.iter().all(|m| m.mover == 2));
}

#[test]
fn undo_restores_position_and_mover() {
    let game = game(
        2,
        Production::new("square").with(3i64),
        vec![disc(1), disc(2)],
        play(add_to_empty()),
    );
    let mut ctx = Context::new(&game).unwrap();

    let moves = ctx.legal_moves().unwrap();
    ctx.apply(moves[0]).unwrap();
    assert_eq!(ctx.trial().len(), 1);

    ctx.undo().unwrap();
    assert_eq!(ctx.trial().len(), 0);
    assert_eq!(ctx.state().mover(), 1);
    assert_eq!(ctx.legal_moves().unwrap().len(), 9);
}

#[test]
fn last_move_predicates_before_any_move() {
    // (lastToIs cell) is false and (lastTo) is UNDEFINED on a fresh
    // trial; neither errors.
    let rules = Production::new("rules")
        .with(Production::new("play").with(
            Production::new("if")
                .with(Production::new("lastToIs").with(kw("cell")))
                .with(Production::new("pass"))
                .with(add_to_empty()),
        ))
        .with(
            Production::new("end")
                .with(
                    Production::new("=")
                        .with(Production::new("lastTo"))
                        .with(i64::from(UNDEFINED)),
                )
                .with(kw("draw")),
        );
    let game = game(
        2,
        Production::new("square").with(3i64),
        vec![disc(1), disc(2)],
        rules,
    );
    let mut ctx = Context::new(&game).unwrap();

    // No last move: the else branch generates placements, and the end
    // condition (lastTo = UNDEFINED) holds.
    assert_eq!(ctx.legal_moves().unwrap().len(), 9);
    assert_eq!(ctx.check_end().unwrap(), Some(EndOutcome::Draw));

    let moves = ctx.legal_moves().unwrap();
    ctx.apply(moves[0]).unwrap();
    // Now there is a cell destination: the then branch passes, and the
    // end condition no longer holds.
    let moves = ctx.legal_moves().unwrap();
    assert_eq!(moves.len(), 1);
    assert!(moves[0].is_pass());
    assert_eq!(ctx.check_end().unwrap(), None);
}

#[test]
fn last_to_element_distinguishes_vertex_from_cell() {
    let game = game(
        2,
        Production::new("square").with(3i64),
        vec![disc(1), disc(2)],
        play(add_to_empty()),
    );
    let mut ctx = Context::new(&game).unwrap();
    let registry = tabula_compiler::default_registry();
    let on_vertex = registry
        .bind_bool(&Production::new("lastToIs").with(kw("vertex")))
        .unwrap();
    let on_cell = registry
        .bind_bool(&Production::new("lastToIs").with(kw("cell")))
        .unwrap();

    assert!(!ctx.eval_bool(&on_vertex).unwrap());
    assert!(!ctx.eval_bool(&on_cell).unwrap());

    ctx.apply(Move::place(Site::cell(4), 1)).unwrap();
    assert!(ctx.eval_bool(&on_cell).unwrap());
    assert!(!ctx.eval_bool(&on_vertex).unwrap());

    ctx.apply(Move::place(Site::vertex(7), 2)).unwrap();
    assert!(ctx.eval_bool(&on_vertex).unwrap());
    assert!(!ctx.eval_bool(&on_cell).unwrap());
}

#[test]
fn from_to_generates_origin_target_pairs() {
    let rules = Production::new("rules")
        .with(
            Production::new("start").with(
                Production::new("add").with_named(
                    "to",
                    Production::new("sites").with(0i64),
                ),
            ),
        )
        .with(
            Production::new("play").with(
                Production::new("fromTo")
                    .with_named(
                        "from",
                        Production::new("occupied")
                            .with_named("by", Production::new("mover")),
                    )
                    .with_named("to", Production::new("empty")),
            ),
        );
    let game = game(
        2,
        Production::new("square").with(3i64),
        vec![disc(1), disc(2)],
        rules,
    );
    let mut ctx = Context::new(&game).unwrap();

    // The start rule placed a disc at cell 0 outside the trial history.
    assert!(ctx.trial().is_empty());
    assert!(ctx.state().is_occupied_cell(0));

    let moves = ctx.legal_moves().unwrap();
    assert_eq!(moves.len(), 8);
    assert!(moves.iter().all(|m| m.from == Some(Site::cell(0))));

    // Player 2 owns nothing, so after any move they cannot move at all.
    ctx.apply(moves[0]).unwrap();
    assert_eq!(ctx.legal_moves().unwrap().len(), 0);
}

#[test]
fn for_each_site_publishes_the_site_slot() {
    // One pass per site of the named region: the generator reads the
    // iteration slot through a condition.
    let rules = play(
        Production::new("forEach")
            .with(Production::new("region").with("zone"))
            .with(
                Production::new("add").with_named(
                    "to",
                    Production::new("sites").with(8i64),
                ).with_named(
                    "if",
                    Production::new("!=")
                        .with(Production::new("var").with(kw("site")))
                        .with(0i64),
                ),
            ),
    );
    let game = game(
        2,
        Production::new("square").with(3i64),
        vec![
            Production::new("namedRegion")
                .with("zone")
                .with(0i64)
                .with(1i64)
                .with(2i64),
            disc(1),
        ],
        rules,
    );
    let mut ctx = Context::new(&game).unwrap();

    // Sites 1 and 2 pass the condition, site 0 does not.
    let moves = ctx.legal_moves().unwrap();
    assert_eq!(moves.len(), 2);
    assert!(moves.iter().all(|m| m.to == Some(Site::cell(8))));
}

#[test]
fn conditional_play_switches_branches() {
    let rules = play(
        Production::new("if")
            .with(
                Production::new("=")
                    .with(Production::new("count").with(Production::new("empty")))
                    .with(9i64),
            )
            .with(
                Production::new("add")
                    .with_named("to", Production::new("sites").with(4i64)),
            )
            .with(Production::new("pass")),
    );
    let game = game(
        2,
        Production::new("square").with(3i64),
        vec![disc(1), disc(2)],
        rules,
    );
    let mut ctx = Context::new(&game).unwrap();

    let moves = ctx.legal_moves().unwrap();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].to, Some(Site::cell(4)));

    ctx.apply(moves[0]).unwrap();
    let moves = ctx.legal_moves().unwrap();
    assert_eq!(moves.len(), 1);
    assert!(moves[0].is_pass());
}

#[test]
fn end_rule_fires_when_board_fills() {
    let rules = Production::new("rules")
        .with(Production::new("play").with(add_to_empty()))
        .with(
            Production::new("end")
                .with(Production::new("noMoves"))
                .with(kw("loss")),
        );
    let game = game(
        2,
        Production::new("rectangle").with(1i64).with(2i64),
        vec![disc(1), disc(2)],
        rules,
    );
    let mut ctx = Context::new(&game).unwrap();

    assert_eq!(ctx.check_end().unwrap(), None);
    let moves = ctx.legal_moves().unwrap();
    ctx.apply(moves[0]).unwrap();
    assert_eq!(ctx.check_end().unwrap(), None);
    let moves = ctx.legal_moves().unwrap();
    ctx.apply(moves[0]).unwrap();

    // Board full: the mover has no legal move.
    assert_eq!(ctx.check_end().unwrap(), Some(EndOutcome::Loss));
}

#[test]
fn generic_query_interface_over_all_domains() {
    let game = game(
        2,
        Production::new("square").with(3i64),
        vec![disc(1), disc(2)],
        play(add_to_empty()),
    );
    let mut ctx = Context::new(&game).unwrap();

    // (array (all)) lists every cell in ascending order.
    let prod = Production::new("array").with(Production::new("all"));
    let node = tabula_compiler::default_registry().bind_array(&prod).unwrap();
    let value = ctx.evaluate(NodeRef::Array(&node)).unwrap();
    assert_eq!(
        value,
        DomainValue::Array((0..9).collect::<Vec<i32>>())
    );

    // (difference (all) (sites 0 1)) drops the named sites.
    let prod = Production::new("difference")
        .with(Production::new("all"))
        .with(Production::new("sites").with(0i64).with(1i64));
    let node = tabula_compiler::default_registry().bind_region(&prod).unwrap();
    match ctx.evaluate(NodeRef::Region(&node)).unwrap() {
        DomainValue::Region(region) => {
            assert_eq!(region.len(), 7);
            assert!(!region.contains(0));
            assert!(!region.contains(1));
        }
        other => panic!("wrong domain: {}", other.domain_name()),
    }
}

#[test]
fn runtime_division_by_zero_traps() {
    // The divisor is dynamic (lastTo + 1), so preprocessing stays quiet;
    // on a fresh trial it evaluates to 0 and the evaluator traps.
    let rules = Production::new("rules")
        .with(Production::new("play").with(add_to_empty()))
        .with(
            Production::new("end")
                .with(
                    Production::new("=")
                        .with(
                            Production::new("/").with(6i64).with(
                                Production::new("+")
                                    .with(Production::new("lastTo"))
                                    .with(1i64),
                            ),
                        )
                        .with(1i64),
                )
                .with(kw("win")),
        );
    let game = game(
        2,
        Production::new("square").with(3i64),
        vec![disc(1), disc(2)],
        rules,
    );
    let mut ctx = Context::new(&game).unwrap();

    assert_eq!(
        ctx.check_end(),
        Err(EvalError::ArithmeticTrap { operation: "/" })
    );

    // After a move at cell 5 the divisor is 6 and the rule fires.
    let mv = ctx
        .legal_moves()
        .unwrap()
        .into_iter()
        .find(|m| m.to == Some(Site::cell(5)))
        .unwrap();
    ctx.apply(mv).unwrap();
    assert_eq!(ctx.check_end().unwrap(), Some(EndOutcome::Win));
}

#[test]
fn unpreprocessed_game_is_rejected() {
    let game = Game::new(
        "Raw",
        2,
        Equipment::new(GraphNode::square(3)),
        Rules { start: None, play: MovesNode::pass(), end: Vec::new() },
    );
    assert!(matches!(Context::new(&game), Err(EvalError::NotPreprocessed)));
}

#[test]
fn static_condition_is_idempotent_across_positions() {
    let game = game(
        2,
        Production::new("square").with(3i64),
        vec![disc(1), disc(2)],
        play(
            Production::new("if")
                .with(
                    Production::new("=")
                        .with(Production::new("count").with(Production::new("all")))
                        .with(9i64),
                )
                .with(add_to_empty())
                .with(Production::new("pass")),
        ),
    );
    let condition = match &game.rules.play.kind {
        tabula_tree::MovesKind::If { condition, .. } => condition.as_ref(),
        _ => panic!("play changed shape"),
    };
    assert!(condition.is_static());

    let mut ctx = Context::new(&game).unwrap();
    let first = ctx.eval_bool(condition).unwrap();
    let mv = ctx.legal_moves().unwrap()[0];
    ctx.apply(mv).unwrap();
    let second = ctx.eval_bool(condition).unwrap();
    assert_eq!(first, second);
    assert!(first);
}

#[test]
fn move_generation_is_deterministic() {
    let game = game(
        2,
        Production::new("square").with(3i64),
        vec![disc(1), disc(2)],
        play(
            Production::new("or")
                .with(add_to_empty())
                .with(Production::new("pass")),
        ),
    );
    let mut a = Context::new(&game).unwrap();
    let mut b = Context::new(&game).unwrap();
    assert_eq!(a.legal_moves().unwrap(), b.legal_moves().unwrap());

    let mv = a.legal_moves().unwrap()[0];
    a.apply(mv).unwrap();
    b.apply(mv).unwrap();
    assert_eq!(a.legal_moves().unwrap(), b.legal_moves().unwrap());
}

#[test]
fn contexts_share_one_game_concurrently() {
    let game = game(
        2,
        Production::new("square").with(3i64),
        vec![disc(1), disc(2)],
        play(add_to_empty()),
    );

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let mut ctx = Context::new(&game).unwrap();
                let moves = ctx.legal_moves().unwrap();
                assert_eq!(moves.len(), 9);
                ctx.apply(moves[0]).unwrap();
                assert_eq!(ctx.legal_moves().unwrap().len(), 8);
            });
        }
    });
}
