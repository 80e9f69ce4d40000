//! The built-in production table.
//!
//! Every grammar keyword maps to one entry here: its parameter metadata
//! and a factory that builds the typed node. Keywords that exist in more
//! than one domain (like `or`, shared by bool and moves) disambiguate
//! from the domains of their bound arguments.

use tabula_types::{ElementType, EvalSlot};
use tabula_tree::{
    ArrayKind, ArrayNode, BoolKind, BoolNode, CompareOp, GraphKind, GraphNode, IntKind, IntNode,
    MovesKind, MovesNode, RegionKind, RegionNode,
};

use crate::binder::{
    ArgValue, BindError, BindResult, BoundArgs, NodeValue, ParamMeta, ProductionSpec, Registry,
};

// Parameter tables live in consts so the specs can borrow them for
// 'static.
const NO_PARAMS: &[ParamMeta] = &[];
const CONDITION: &[ParamMeta] = &[ParamMeta::required("condition")];
const CONDITIONS: &[ParamMeta] = &[ParamMeta::variadic("conditions")];
const CHILDREN: &[ParamMeta] = &[ParamMeta::variadic("children")];
const BINARY: &[ParamMeta] = &[ParamMeta::required("left"), ParamMeta::required("right")];
const SITE: &[ParamMeta] = &[ParamMeta::required("site")];
const SITE_IN_REGION: &[ParamMeta] =
    &[ParamMeta::required("site"), ParamMeta::required("region")];
const ELEMENT: &[ParamMeta] = &[ParamMeta::required("element")];
const SLOT: &[ParamMeta] = &[ParamMeta::required("slot")];
const TERMS: &[ParamMeta] = &[ParamMeta::variadic("terms")];
const FACTORS: &[ParamMeta] = &[ParamMeta::variadic("factors")];
const REGION: &[ParamMeta] = &[ParamMeta::required("region")];
const REGIONS: &[ParamMeta] = &[ParamMeta::variadic("regions")];
const OCCUPIED_BY: &[ParamMeta] = &[ParamMeta::optional_named("by")];
const SITE_LIST: &[ParamMeta] = &[ParamMeta::variadic("sites")];
const NAME: &[ParamMeta] = &[ParamMeta::required("name")];
const DIFFERENCE: &[ParamMeta] =
    &[ParamMeta::required("source"), ParamMeta::required("subtrahend")];
const VALUES: &[ParamMeta] = &[ParamMeta::variadic("values")];
const ADD: &[ParamMeta] = &[
    ParamMeta::named("to").with_alias("destination"),
    ParamMeta::optional_named("if"),
    ParamMeta::hidden("piece"),
];
const FROM_TO: &[ParamMeta] = &[
    ParamMeta::named("from"),
    ParamMeta::named("to"),
    ParamMeta::optional_named("if"),
];
const IF: &[ParamMeta] = &[
    ParamMeta::required("condition"),
    ParamMeta::required("then"),
    ParamMeta::optional("else"),
];
const FOR_EACH: &[ParamMeta] =
    &[ParamMeta::required("region"), ParamMeta::required("moves")];
const SIDE: &[ParamMeta] = &[ParamMeta::required("side")];
const ROWS_COLS: &[ParamMeta] =
    &[ParamMeta::required("rows"), ParamMeta::required("cols")];

/// Build the registry holding every built-in production.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    register_bool(&mut registry);
    register_int(&mut registry);
    register_region(&mut registry);
    register_array(&mut registry);
    register_moves(&mut registry);
    register_graph(&mut registry);
    registry
}

// ══════════════════════════════════════════════════════════════════════════════
// Boolean productions
// ══════════════════════════════════════════════════════════════════════════════

fn register_bool(registry: &mut Registry) {
    registry.register(ProductionSpec {
        keyword: "true",
        aliases: &[],
        params: NO_PARAMS,
        factory: |_, _| Ok(NodeValue::Bool(BoolNode::constant(true))),
    });

    registry.register(ProductionSpec {
        keyword: "false",
        aliases: &[],
        params: NO_PARAMS,
        factory: |_, _| Ok(NodeValue::Bool(BoolNode::constant(false))),
    });

    registry.register(ProductionSpec {
        keyword: "not",
        aliases: &[],
        params: CONDITION,
        factory: |registry, args| {
            let child = args.bool_node(registry, "condition")?;
            Ok(NodeValue::Bool(BoolNode::new(BoolKind::Not(Box::new(child)))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "and",
        aliases: &[],
        params: CONDITIONS,
        factory: |registry, args| {
            let children = bool_children(registry, args, "conditions")?;
            Ok(NodeValue::Bool(BoolNode::new(BoolKind::And(children))))
        },
    });

    // `or` is overloaded: over bools it is disjunction, over moves it is
    // the union of move sets. The children decide.
    registry.register(ProductionSpec {
        keyword: "or",
        aliases: &[],
        params: CHILDREN,
        factory: |registry, args| {
            let children = args.bind_many(registry, "children")?;
            if children.iter().any(|c| matches!(c, NodeValue::Moves(_))) {
                let moves = children
                    .into_iter()
                    .map(|child| match child {
                        NodeValue::Moves(node) => Ok(node),
                        _ => Err(BindError::MixedDomains { keyword: "or".to_string() }),
                    })
                    .collect::<BindResult<Vec<_>>>()?;
                return Ok(NodeValue::Moves(MovesNode::new(MovesKind::Or(moves))));
            }
            let bools = children
                .into_iter()
                .map(|child| match child {
                    NodeValue::Bool(node) => Ok(node),
                    _ => Err(BindError::MixedDomains { keyword: "or".to_string() }),
                })
                .collect::<BindResult<Vec<_>>>()?;
            Ok(NodeValue::Bool(BoolNode::new(BoolKind::Or(bools))))
        },
    });

    compare(registry, "=", &["eq"], CompareOp::Eq);
    compare(registry, "!=", &[], CompareOp::NotEq);
    compare(registry, "<", &[], CompareOp::Less);
    compare(registry, "<=", &[], CompareOp::LessEq);
    compare(registry, ">", &[], CompareOp::Greater);
    compare(registry, ">=", &[], CompareOp::GreaterEq);

    registry.register(ProductionSpec {
        keyword: "isEmpty",
        aliases: &[],
        params: SITE,
        factory: |registry, args| {
            let site = args.int_node(registry, "site")?;
            Ok(NodeValue::Bool(BoolNode::new(BoolKind::IsEmpty(Box::new(site)))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "isOccupied",
        aliases: &[],
        params: SITE,
        factory: |registry, args| {
            let site = args.int_node(registry, "site")?;
            Ok(NodeValue::Bool(BoolNode::new(BoolKind::IsOccupied(Box::new(site)))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "isIn",
        aliases: &[],
        params: SITE_IN_REGION,
        factory: |registry, args| {
            let site = args.int_node(registry, "site")?;
            let region = args.region_node(registry, "region")?;
            Ok(NodeValue::Bool(BoolNode::new(BoolKind::IsIn {
                site: Box::new(site),
                region: Box::new(region),
            })))
        },
    });

    registry.register(ProductionSpec {
        keyword: "lastToIs",
        aliases: &[],
        params: ELEMENT,
        factory: |_, args| {
            let word = args.keyword_arg("element")?;
            let element = ElementType::from_keyword(word).ok_or_else(|| {
                BindError::TypeMismatch {
                    keyword: "lastToIs".to_string(),
                    param: "element".to_string(),
                    expected: "element type (cell, vertex, edge)",
                    found: word.to_string(),
                }
            })?;
            Ok(NodeValue::Bool(BoolNode::new(BoolKind::LastToIs(element))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "noMoves",
        aliases: &[],
        params: NO_PARAMS,
        factory: |_, _| Ok(NodeValue::Bool(BoolNode::new(BoolKind::NoMoves))),
    });
}

fn compare(
    registry: &mut Registry,
    keyword: &'static str,
    aliases: &'static [&'static str],
    op: CompareOp,
) {
    // Factories are plain fn pointers, so the operator is recovered from
    // the keyword instead of captured.
    registry.register(ProductionSpec {
        keyword,
        aliases,
        params: BINARY,
        factory: compare_factory(op),
    });
}

fn compare_factory(op: CompareOp) -> crate::binder::Factory {
    match op {
        CompareOp::Eq => |r, a| compare_node(r, a, CompareOp::Eq),
        CompareOp::NotEq => |r, a| compare_node(r, a, CompareOp::NotEq),
        CompareOp::Less => |r, a| compare_node(r, a, CompareOp::Less),
        CompareOp::LessEq => |r, a| compare_node(r, a, CompareOp::LessEq),
        CompareOp::Greater => |r, a| compare_node(r, a, CompareOp::Greater),
        CompareOp::GreaterEq => |r, a| compare_node(r, a, CompareOp::GreaterEq),
    }
}

fn compare_node(registry: &Registry, args: &BoundArgs<'_>, op: CompareOp) -> BindResult<NodeValue> {
    let left = args.int_node(registry, "left")?;
    let right = args.int_node(registry, "right")?;
    Ok(NodeValue::Bool(BoolNode::new(BoolKind::Compare {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })))
}

fn bool_children(
    registry: &Registry,
    args: &BoundArgs<'_>,
    param: &str,
) -> BindResult<Vec<BoolNode>> {
    args.bind_many(registry, param)?
        .into_iter()
        .map(|child| match child {
            NodeValue::Bool(node) => Ok(node),
            _ => Err(BindError::MixedDomains {
                keyword: args.production_keyword().to_string(),
            }),
        })
        .collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// Integer productions
// ══════════════════════════════════════════════════════════════════════════════

fn register_int(registry: &mut Registry) {
    registry.register(ProductionSpec {
        keyword: "var",
        aliases: &[],
        params: SLOT,
        factory: |_, args| {
            let word = args.keyword_arg("slot")?;
            let slot = EvalSlot::from_keyword(word).ok_or_else(|| BindError::TypeMismatch {
                keyword: "var".to_string(),
                param: "slot".to_string(),
                expected: "scratch slot name",
                found: word.to_string(),
            })?;
            Ok(NodeValue::Int(IntNode::new(IntKind::Var(slot))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "mover",
        aliases: &[],
        params: NO_PARAMS,
        factory: |_, _| Ok(NodeValue::Int(IntNode::new(IntKind::Mover))),
    });

    registry.register(ProductionSpec {
        keyword: "lastTo",
        aliases: &[],
        params: NO_PARAMS,
        factory: |_, _| Ok(NodeValue::Int(IntNode::new(IntKind::LastTo))),
    });

    registry.register(ProductionSpec {
        keyword: "lastFrom",
        aliases: &[],
        params: NO_PARAMS,
        factory: |_, _| Ok(NodeValue::Int(IntNode::new(IntKind::LastFrom))),
    });

    registry.register(ProductionSpec {
        keyword: "+",
        aliases: &["add-int"],
        params: TERMS,
        factory: |registry, args| {
            let terms = int_children(registry, args, "terms")?;
            Ok(NodeValue::Int(IntNode::new(IntKind::Add(terms))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "-",
        aliases: &[],
        params: BINARY,
        factory: |registry, args| {
            let left = args.int_node(registry, "left")?;
            let right = args.int_node(registry, "right")?;
            Ok(NodeValue::Int(IntNode::new(IntKind::Sub(
                Box::new(left),
                Box::new(right),
            ))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "*",
        aliases: &["mul"],
        params: FACTORS,
        factory: |registry, args| {
            let factors = int_children(registry, args, "factors")?;
            Ok(NodeValue::Int(IntNode::new(IntKind::Mul(factors))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "/",
        aliases: &["div"],
        params: BINARY,
        factory: |registry, args| {
            let left = args.int_node(registry, "left")?;
            let right = args.int_node(registry, "right")?;
            Ok(NodeValue::Int(IntNode::new(IntKind::Div(
                Box::new(left),
                Box::new(right),
            ))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "count",
        aliases: &[],
        params: REGION,
        factory: |registry, args| {
            let region = args.region_node(registry, "region")?;
            Ok(NodeValue::Int(IntNode::new(IntKind::Count(Box::new(region)))))
        },
    });
}

fn int_children(
    registry: &Registry,
    args: &BoundArgs<'_>,
    param: &str,
) -> BindResult<Vec<IntNode>> {
    args.bind_many(registry, param)?
        .into_iter()
        .map(|child| match child {
            NodeValue::Int(node) => Ok(node),
            _ => Err(BindError::MixedDomains {
                keyword: args.production_keyword().to_string(),
            }),
        })
        .collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// Region productions
// ══════════════════════════════════════════════════════════════════════════════

fn register_region(registry: &mut Registry) {
    registry.register(ProductionSpec {
        keyword: "all",
        aliases: &[],
        params: NO_PARAMS,
        factory: |_, _| Ok(NodeValue::Region(RegionNode::all())),
    });

    registry.register(ProductionSpec {
        keyword: "empty",
        aliases: &[],
        params: NO_PARAMS,
        factory: |_, _| Ok(NodeValue::Region(RegionNode::new(RegionKind::Empty))),
    });

    registry.register(ProductionSpec {
        keyword: "occupied",
        aliases: &[],
        params: OCCUPIED_BY,
        factory: |registry, args| {
            let player = args.opt_int_node(registry, "by")?;
            Ok(NodeValue::Region(RegionNode::new(RegionKind::Occupied {
                player: player.map(Box::new),
            })))
        },
    });

    registry.register(ProductionSpec {
        keyword: "sites",
        aliases: &[],
        params: SITE_LIST,
        factory: |_, args| {
            let sites = args.sizes("sites")?;
            Ok(NodeValue::Region(RegionNode::new(RegionKind::Sites(sites))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "region",
        aliases: &[],
        params: NAME,
        factory: |_, args| {
            let name = args.string("name")?;
            Ok(NodeValue::Region(RegionNode::new(RegionKind::Named(
                name.to_string(),
            ))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "union",
        aliases: &[],
        params: REGIONS,
        factory: |registry, args| {
            let children = args.bind_many(registry, "regions")?;
            // Unions exist for regions and int arrays; the children pick.
            if children.iter().any(|c| matches!(c, NodeValue::Array(_))) {
                let arrays = children
                    .into_iter()
                    .map(|child| match child {
                        NodeValue::Array(node) => Ok(node),
                        _ => Err(BindError::MixedDomains { keyword: "union".to_string() }),
                    })
                    .collect::<BindResult<Vec<_>>>()?;
                return Ok(NodeValue::Array(ArrayNode::new(ArrayKind::Union(arrays))));
            }
            let regions = region_values("union", children)?;
            Ok(NodeValue::Region(RegionNode::new(RegionKind::Union(regions))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "intersection",
        aliases: &[],
        params: REGIONS,
        factory: |registry, args| {
            let regions = region_values("intersection", args.bind_many(registry, "regions")?)?;
            Ok(NodeValue::Region(RegionNode::new(RegionKind::Intersection(
                regions,
            ))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "difference",
        aliases: &[],
        params: DIFFERENCE,
        factory: |registry, args| {
            let source = args.region_node(registry, "source")?;
            let subtrahend = args.region_node(registry, "subtrahend")?;
            Ok(NodeValue::Region(RegionNode::new(RegionKind::Difference(
                Box::new(source),
                Box::new(subtrahend),
            ))))
        },
    });

    registry.register(ProductionSpec {
        keyword: "iterated",
        aliases: &[],
        params: NO_PARAMS,
        factory: |_, _| Ok(NodeValue::Region(RegionNode::new(RegionKind::FromContext))),
    });
}

fn region_values(keyword: &str, children: Vec<NodeValue>) -> BindResult<Vec<RegionNode>> {
    children
        .into_iter()
        .map(|child| match child {
            NodeValue::Region(node) => Ok(node),
            _ => Err(BindError::MixedDomains { keyword: keyword.to_string() }),
        })
        .collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// Array productions
// ══════════════════════════════════════════════════════════════════════════════

fn register_array(registry: &mut Registry) {
    registry.register(ProductionSpec {
        keyword: "array",
        aliases: &["ints"],
        params: VALUES,
        factory: |registry, args| {
            // A literal list of ints, or the sites of a region as ints.
            let raw = args.many("values");
            if raw.len() == 1 {
                if let ArgValue::Production(p) = raw[0] {
                    if let NodeValue::Region(region) = registry.bind(p)? {
                        return Ok(NodeValue::Array(ArrayNode::new(ArrayKind::FromRegion(
                            Box::new(region),
                        ))));
                    }
                }
            }
            let values = args.ints("values")?;
            Ok(NodeValue::Array(ArrayNode::new(ArrayKind::Literal(values))))
        },
    });
}

// ══════════════════════════════════════════════════════════════════════════════
// Move productions
// ══════════════════════════════════════════════════════════════════════════════

fn register_moves(registry: &mut Registry) {
    registry.register(ProductionSpec {
        keyword: "pass",
        aliases: &[],
        params: NO_PARAMS,
        factory: |_, _| Ok(NodeValue::Moves(MovesNode::pass())),
    });

    registry.register(ProductionSpec {
        keyword: "add",
        aliases: &[],
        params: ADD,
        factory: |registry, args| {
            let to = args.region_node(registry, "to")?;
            let condition = args.opt_bool_node(registry, "if")?;
            Ok(NodeValue::Moves(MovesNode::new(MovesKind::Add {
                to: Box::new(to),
                condition: condition.map(Box::new),
            })))
        },
    });

    registry.register(ProductionSpec {
        keyword: "fromTo",
        aliases: &[],
        params: FROM_TO,
        factory: |registry, args| {
            let from = args.region_node(registry, "from")?;
            let to = args.region_node(registry, "to")?;
            let condition = args.opt_bool_node(registry, "if")?;
            Ok(NodeValue::Moves(MovesNode::new(MovesKind::FromTo {
                from: Box::new(from),
                to: Box::new(to),
                condition: condition.map(Box::new),
            })))
        },
    });

    registry.register(ProductionSpec {
        keyword: "if",
        aliases: &[],
        params: IF,
        factory: |registry, args| {
            let condition = args.bool_node(registry, "condition")?;
            let then = args.moves_node(registry, "then")?;
            let otherwise = args.opt_moves_node(registry, "else")?;
            Ok(NodeValue::Moves(MovesNode::new(MovesKind::If {
                condition: Box::new(condition),
                then: Box::new(then),
                otherwise: otherwise.map(Box::new),
            })))
        },
    });

    registry.register(ProductionSpec {
        keyword: "forEach",
        aliases: &[],
        params: FOR_EACH,
        factory: |registry, args| {
            let region = args.region_node(registry, "region")?;
            let generator = args.moves_node(registry, "moves")?;
            Ok(NodeValue::Moves(MovesNode::new(MovesKind::ForEachSite {
                region: Box::new(region),
                generator: Box::new(generator),
            })))
        },
    });
}

// ══════════════════════════════════════════════════════════════════════════════
// Graph productions
// ══════════════════════════════════════════════════════════════════════════════

fn register_graph(registry: &mut Registry) {
    registry.register(ProductionSpec {
        keyword: "square",
        aliases: &[],
        params: SIDE,
        factory: |_, args| {
            let side = args.size("side")?;
            Ok(NodeValue::Graph(GraphNode::square(side)))
        },
    });

    registry.register(ProductionSpec {
        keyword: "rectangle",
        aliases: &[],
        params: ROWS_COLS,
        factory: |_, args| {
            let rows = args.size("rows")?;
            let cols = args.size("cols")?;
            Ok(NodeValue::Graph(GraphNode::new(GraphKind::Rectangle {
                rows,
                cols,
            })))
        },
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::{kw, Production};

    #[test]
    fn bind_comparison() {
        let registry = default_registry();
        let prod = Production::new("=")
            .with(Production::new("mover"))
            .with(1i64);
        let node = registry.bind_bool(&prod).unwrap();
        assert!(matches!(node.kind, BoolKind::Compare { op: CompareOp::Eq, .. }));
    }

    #[test]
    fn or_disambiguates_by_domain() {
        let registry = default_registry();

        let bool_or = Production::new("or").with(true).with(false);
        assert!(matches!(registry.bind(&bool_or), Ok(NodeValue::Bool(_))));

        let moves_or = Production::new("or")
            .with(Production::new("pass"))
            .with(Production::new("pass"));
        assert!(matches!(registry.bind(&moves_or), Ok(NodeValue::Moves(_))));
    }

    #[test]
    fn or_rejects_mixed_domains() {
        let registry = default_registry();
        let mixed = Production::new("or")
            .with(Production::new("pass"))
            .with(true);
        assert!(matches!(
            registry.bind(&mixed),
            Err(BindError::MixedDomains { .. })
        ));
    }

    #[test]
    fn mixed_domains_error_names_the_production() {
        let registry = default_registry();
        let mixed = Production::new("intersection")
            .with(Production::new("all"))
            .with(true);
        assert_eq!(
            registry.bind(&mixed),
            Err(BindError::MixedDomains { keyword: "intersection".to_string() })
        );
    }

    #[test]
    fn named_parameter_binds_by_name_or_alias() {
        let registry = default_registry();
        let prod = Production::new("add").with_named("to", Production::new("empty"));
        assert!(registry.bind_moves(&prod).is_ok());

        let aliased =
            Production::new("add").with_named("destination", Production::new("empty"));
        assert!(registry.bind_moves(&aliased).is_ok());

        // A positional argument cannot fill a named-only parameter.
        let positional = Production::new("add").with(Production::new("empty"));
        assert!(matches!(
            registry.bind(&positional),
            Err(BindError::TooManyArguments { .. })
        ));
    }

    #[test]
    fn missing_required_named_parameter() {
        let registry = default_registry();
        let prod = Production::new("add");
        assert!(matches!(
            registry.bind(&prod),
            Err(BindError::MissingParameter { .. })
        ));
    }

    #[test]
    fn hidden_parameter_rejected() {
        let registry = default_registry();
        let prod = Production::new("add")
            .with_named("to", Production::new("empty"))
            .with_named("piece", 1i64);
        assert!(matches!(
            registry.bind(&prod),
            Err(BindError::HiddenParameter { .. })
        ));
    }

    #[test]
    fn unknown_keyword() {
        let registry = default_registry();
        let prod = Production::new("teleport");
        assert!(matches!(
            registry.bind(&prod),
            Err(BindError::UnknownKeyword(_))
        ));
    }

    #[test]
    fn domain_mismatch_on_typed_bind() {
        let registry = default_registry();
        let prod = Production::new("pass");
        assert!(matches!(
            registry.bind_bool(&prod),
            Err(BindError::DomainMismatch { expected: "bool", .. })
        ));
    }

    #[test]
    fn last_to_is_takes_element_keyword() {
        let registry = default_registry();
        let prod = Production::new("lastToIs").with(kw("vertex"));
        let node = registry.bind_bool(&prod).unwrap();
        assert!(matches!(node.kind, BoolKind::LastToIs(ElementType::Vertex)));

        let bad = Production::new("lastToIs").with(kw("hexagon"));
        assert!(registry.bind(&bad).is_err());
    }

    #[test]
    fn var_reads_slot_keyword() {
        let registry = default_registry();
        let prod = Production::new("var").with(kw("to"));
        let node = registry.bind_int(&prod).unwrap();
        assert!(matches!(node.kind, IntKind::Var(EvalSlot::To)));
    }

    #[test]
    fn union_over_arrays_builds_array_union() {
        let registry = default_registry();
        let prod = Production::new("union")
            .with(Production::new("array").with(1i64).with(2i64))
            .with(Production::new("array").with(3i64));
        assert!(matches!(registry.bind(&prod), Ok(NodeValue::Array(_))));
    }

    #[test]
    fn array_from_region() {
        let registry = default_registry();
        let prod = Production::new("array").with(Production::new("all"));
        let node = registry.bind_array(&prod).unwrap();
        assert!(matches!(node.kind, ArrayKind::FromRegion(_)));
    }

    #[test]
    fn too_many_positional_arguments() {
        let registry = default_registry();
        let prod = Production::new("not").with(true).with(false);
        assert!(matches!(
            registry.bind(&prod),
            Err(BindError::TooManyArguments { .. })
        ));
    }
}
