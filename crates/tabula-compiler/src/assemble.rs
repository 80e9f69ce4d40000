//! Assembly of the game-level structure.
//!
//! The top of a description is structural rather than node-producing:
//! `game`, `players`, `equipment`, `namedRegion`, `piece`, `rules`,
//! `start`, `play`, and `end` shape the [`Game`] aggregate, and only
//! their leaves go through the node registry. They are matched by hand
//! here because their arity and ordering rules are positional and
//! domain-crossing in ways the parameter matcher does not model.

use tabula_types::Region;
use tabula_tree::{
    BoolNode, EndOutcome, EndRule, Equipment, Game, MovesNode, NamedRegion, Piece, Rules,
};

use crate::binder::{Arg, ArgValue, BindError, BindResult, Production, Registry};

/// Assemble a complete [`Game`] from its root production.
pub fn assemble(registry: &Registry, root: &Production) -> BindResult<Game> {
    if root.keyword != "game" {
        return Err(BindError::structure(
            &root.keyword,
            "a description must start with a 'game' production",
        ));
    }

    let name = expect_string(root, 0, "name")?;
    let mut players: Option<u8> = None;
    let mut equipment: Option<Equipment> = None;
    let mut rules: Option<Rules> = None;

    for arg in root.args.iter().skip(1) {
        let prod = expect_production("game", arg)?;
        match prod.keyword.as_str() {
            "players" => {
                let count = expect_int(prod, 0, "count")?;
                let count = u8::try_from(count).ok().filter(|&c| c >= 1).ok_or_else(|| {
                    BindError::structure("players", "player count must be between 1 and 255")
                })?;
                set_once("game", "players", &mut players, count)?;
            }
            "equipment" => {
                let built = assemble_equipment(registry, prod)?;
                set_once("game", "equipment", &mut equipment, built)?;
            }
            "rules" => {
                let built = assemble_rules(registry, prod)?;
                set_once("game", "rules", &mut rules, built)?;
            }
            other => {
                return Err(BindError::structure(
                    "game",
                    format!("unexpected '{other}' production"),
                ))
            }
        }
    }

    let players = players
        .ok_or_else(|| BindError::structure("game", "missing 'players' production"))?;
    let equipment = equipment
        .ok_or_else(|| BindError::structure("game", "missing 'equipment' production"))?;
    let rules =
        rules.ok_or_else(|| BindError::structure("game", "missing 'rules' production"))?;

    Ok(Game::new(name, players, equipment, rules))
}

fn assemble_equipment(registry: &Registry, prod: &Production) -> BindResult<Equipment> {
    let mut board = None;
    let mut equipment: Option<Equipment> = None;

    for arg in &prod.args {
        let child = expect_production("equipment", arg)?;
        match child.keyword.as_str() {
            "namedRegion" => {
                let name = expect_string(child, 0, "name")?;
                let sites = child
                    .args
                    .iter()
                    .skip(1)
                    .map(|a| match &a.value {
                        ArgValue::Int(v) if *v >= 0 => Ok(*v as usize),
                        _ => Err(BindError::structure(
                            "namedRegion",
                            "sites must be non-negative ints",
                        )),
                    })
                    .collect::<BindResult<Vec<usize>>>()?;
                let equipment = equipment.as_mut().ok_or_else(|| {
                    BindError::structure("equipment", "the board must come first")
                })?;
                if equipment.region(&name).is_some() {
                    return Err(BindError::structure(
                        "namedRegion",
                        format!("region '{name}' defined twice"),
                    ));
                }
                equipment.regions.push(NamedRegion { name, sites: Region::new(sites) });
            }
            "piece" => {
                let name = expect_string(child, 0, "name")?;
                let owner = expect_int(child, 1, "owner")?;
                let owner = u8::try_from(owner).ok().filter(|&o| o >= 1).ok_or_else(|| {
                    BindError::structure("piece", "owner must be a player number")
                })?;
                let equipment = equipment.as_mut().ok_or_else(|| {
                    BindError::structure("equipment", "the board must come first")
                })?;
                equipment.pieces.push(Piece { name, owner });
            }
            _ => {
                // Anything else must be a board generator.
                let node = registry.bind_graph(child)?;
                if board.is_some() {
                    return Err(BindError::structure(
                        "equipment",
                        "more than one board generator",
                    ));
                }
                board = Some(node.clone());
                equipment = Some(Equipment::new(node));
            }
        }
    }

    equipment.ok_or_else(|| BindError::structure("equipment", "missing a board generator"))
}

fn assemble_rules(registry: &Registry, prod: &Production) -> BindResult<Rules> {
    let mut start: Option<MovesNode> = None;
    let mut play: Option<MovesNode> = None;
    let mut end = Vec::new();

    for arg in &prod.args {
        let child = expect_production("rules", arg)?;
        match child.keyword.as_str() {
            "start" => {
                let moves = single_moves(registry, child)?;
                set_once("rules", "start", &mut start, moves)?;
            }
            "play" => {
                let moves = single_moves(registry, child)?;
                set_once("rules", "play", &mut play, moves)?;
            }
            "end" => {
                end.push(assemble_end(registry, child)?);
            }
            other => {
                return Err(BindError::structure(
                    "rules",
                    format!("unexpected '{other}' production"),
                ))
            }
        }
    }

    let play =
        play.ok_or_else(|| BindError::structure("rules", "missing 'play' production"))?;
    Ok(Rules { start, play, end })
}

fn assemble_end(registry: &Registry, prod: &Production) -> BindResult<EndRule> {
    if prod.args.len() != 2 {
        return Err(BindError::structure(
            "end",
            "expected a condition and an outcome",
        ));
    }
    let condition = match &prod.args[0].value {
        ArgValue::Production(p) => registry.bind_bool(p)?,
        ArgValue::Bool(v) => BoolNode::constant(*v),
        other => {
            return Err(BindError::structure(
                "end",
                format!("condition must be a production, got {}", other.category()),
            ))
        }
    };
    let outcome = match &prod.args[1].value {
        ArgValue::Keyword(word) => EndOutcome::from_keyword(word).ok_or_else(|| {
            BindError::structure("end", format!("unknown outcome '{word}'"))
        })?,
        other => {
            return Err(BindError::structure(
                "end",
                format!("outcome must be a keyword, got {}", other.category()),
            ))
        }
    };
    Ok(EndRule { condition, outcome })
}

fn single_moves(registry: &Registry, prod: &Production) -> BindResult<MovesNode> {
    if prod.args.len() != 1 {
        return Err(BindError::structure(
            &prod.keyword,
            "expected exactly one moves production",
        ));
    }
    match &prod.args[0].value {
        ArgValue::Production(p) => registry.bind_moves(p),
        other => Err(BindError::structure(
            &prod.keyword,
            format!("expected a moves production, got {}", other.category()),
        )),
    }
}

// ── Positional helpers ────────────────────────────────────────────────────────

fn expect_production<'a>(context: &str, arg: &'a Arg) -> BindResult<&'a Production> {
    match &arg.value {
        ArgValue::Production(p) => Ok(p),
        other => Err(BindError::structure(
            context,
            format!("expected a production, got {}", other.category()),
        )),
    }
}

fn expect_string(prod: &Production, index: usize, what: &str) -> BindResult<String> {
    match prod.args.get(index).map(|a| &a.value) {
        Some(ArgValue::Str(v)) => Ok(v.clone()),
        Some(other) => Err(BindError::structure(
            &prod.keyword,
            format!("{what} must be a string, got {}", other.category()),
        )),
        None => Err(BindError::structure(&prod.keyword, format!("missing {what}"))),
    }
}

fn expect_int(prod: &Production, index: usize, what: &str) -> BindResult<i64> {
    match prod.args.get(index).map(|a| &a.value) {
        Some(ArgValue::Int(v)) => Ok(*v),
        Some(other) => Err(BindError::structure(
            &prod.keyword,
            format!("{what} must be an int, got {}", other.category()),
        )),
        None => Err(BindError::structure(&prod.keyword, format!("missing {what}"))),
    }
}

fn set_once<T>(context: &str, what: &str, slot: &mut Option<T>, value: T) -> BindResult<()> {
    if slot.is_some() {
        return Err(BindError::structure(
            context,
            format!("'{what}' given more than once"),
        ));
    }
    *slot = Some(value);
    Ok(())
}
