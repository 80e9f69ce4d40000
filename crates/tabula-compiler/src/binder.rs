//! The grammar binder.
//!
//! The external parser hands the compiler fully-structured productions
//! (keyword plus named/positional arguments); the binder maps them onto
//! typed node constructors through an explicit registry. Parameter
//! metadata (name, alias, optionality, anonymity, hiding) is declared as
//! data next to each factory, so the same table serves both binding and
//! grammar-metadata queries. There is no reflection anywhere.

use std::collections::HashMap;
use thiserror::Error;

use tabula_tree::{ArrayNode, BoolKind, BoolNode, GraphNode, IntNode, MovesNode, RegionNode};

// ══════════════════════════════════════════════════════════════════════════════
// Productions
// ══════════════════════════════════════════════════════════════════════════════

/// A structured grammar production: an s-expression-like keyword with
/// arguments, already tokenized and shaped by the external parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Production {
    pub keyword: String,
    pub args: Vec<Arg>,
}

impl Production {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self { keyword: keyword.into(), args: Vec::new() }
    }

    /// Append a positional argument.
    pub fn with(mut self, value: impl Into<ArgValue>) -> Self {
        self.args.push(Arg { name: None, value: value.into() });
        self
    }

    /// Append a named argument.
    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.args.push(Arg { name: Some(name.into()), value: value.into() });
        self
    }

    /// Canonical textual rendering, used for the description digest.
    /// Structurally equal productions always render identically.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push('(');
        out.push_str(&self.keyword);
        for arg in &self.args {
            out.push(' ');
            if let Some(name) = &arg.name {
                out.push_str(name);
                out.push(':');
            }
            arg.value.render_into(out);
        }
        out.push(')');
    }
}

/// One argument of a production.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub name: Option<String>,
    pub value: ArgValue,
}

/// An argument value. Keywords are bare words (element types, slots,
/// outcomes); productions nest.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Bool(bool),
    Str(String),
    Keyword(String),
    Production(Production),
}

impl ArgValue {
    /// Human-readable value category for diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
            Self::Keyword(_) => "keyword",
            Self::Production(_) => "production",
        }
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Self::Int(v) => out.push_str(&v.to_string()),
            Self::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            Self::Str(v) => {
                out.push('"');
                out.push_str(v);
                out.push('"');
            }
            Self::Keyword(v) => out.push_str(v),
            Self::Production(p) => p.render_into(out),
        }
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<Production> for ArgValue {
    fn from(v: Production) -> Self {
        Self::Production(v)
    }
}

/// Shorthand for a bare keyword argument.
pub fn kw(word: &str) -> ArgValue {
    ArgValue::Keyword(word.to_string())
}

// ══════════════════════════════════════════════════════════════════════════════
// Parameter metadata
// ══════════════════════════════════════════════════════════════════════════════

/// Declared metadata for one constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamMeta {
    pub name: &'static str,
    /// Alternative grammar name.
    pub alias: Option<&'static str>,
    /// May be omitted.
    pub optional: bool,
    /// May be supplied positionally, without a name.
    pub anonymous: bool,
    /// Internal-only: never bindable from the grammar.
    pub hidden: bool,
    /// Collects every remaining positional argument.
    pub variadic: bool,
}

impl ParamMeta {
    /// A required positional parameter.
    pub const fn required(name: &'static str) -> Self {
        Self { name, alias: None, optional: false, anonymous: true, hidden: false, variadic: false }
    }

    /// An optional positional parameter.
    pub const fn optional(name: &'static str) -> Self {
        Self { optional: true, ..Self::required(name) }
    }

    /// A required parameter that must be supplied by name.
    pub const fn named(name: &'static str) -> Self {
        Self { anonymous: false, ..Self::required(name) }
    }

    /// An optional parameter that must be supplied by name.
    pub const fn optional_named(name: &'static str) -> Self {
        Self { optional: true, anonymous: false, ..Self::required(name) }
    }

    /// A variadic positional parameter (zero or more arguments).
    pub const fn variadic(name: &'static str) -> Self {
        Self { optional: true, variadic: true, ..Self::required(name) }
    }

    /// An internal-only parameter, invisible to the grammar.
    pub const fn hidden(name: &'static str) -> Self {
        Self { optional: true, hidden: true, ..Self::required(name) }
    }

    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    fn matches(&self, name: &str) -> bool {
        self.name == name || self.alias == Some(name)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Errors
// ══════════════════════════════════════════════════════════════════════════════

/// Construction-time binding errors. These abort compilation; static
/// validation findings do not (they go to the report instead).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("unknown production '{0}'")]
    UnknownKeyword(String),

    #[error("production '{keyword}': missing required parameter '{param}'")]
    MissingParameter { keyword: String, param: String },

    #[error("production '{keyword}': unknown parameter '{name}'")]
    UnknownParameter { keyword: String, name: String },

    #[error("production '{keyword}': parameter '{param}' bound twice")]
    DuplicateParameter { keyword: String, param: String },

    #[error("production '{keyword}': parameter '{param}' is internal and cannot be supplied")]
    HiddenParameter { keyword: String, param: String },

    #[error("production '{keyword}': too many positional arguments")]
    TooManyArguments { keyword: String },

    #[error("production '{keyword}': parameter '{param}' expects {expected}, got {found}")]
    TypeMismatch {
        keyword: String,
        param: String,
        expected: &'static str,
        found: String,
    },

    #[error("expected a {expected} production, got {found}")]
    DomainMismatch { expected: &'static str, found: &'static str },

    #[error("production '{keyword}': arguments mix domains")]
    MixedDomains { keyword: String },

    #[error("production '{keyword}': {message}")]
    Structure { keyword: String, message: String },
}

impl BindError {
    /// Shorthand for structural errors raised while assembling the
    /// game-level productions.
    pub fn structure(keyword: &str, message: impl Into<String>) -> Self {
        Self::Structure { keyword: keyword.to_string(), message: message.into() }
    }
}

pub type BindResult<T> = Result<T, BindError>;

// ══════════════════════════════════════════════════════════════════════════════
// Node values
// ══════════════════════════════════════════════════════════════════════════════

/// The typed result of binding one production: a node of one of the six
/// domains. Domains never coerce into each other.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Bool(BoolNode),
    Int(IntNode),
    Array(ArrayNode),
    Region(RegionNode),
    Moves(MovesNode),
    Graph(GraphNode),
}

impl NodeValue {
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

// ══════════════════════════════════════════════════════════════════════════════
// Registry
// ══════════════════════════════════════════════════════════════════════════════

/// A typed factory: builds a node from bound arguments, recursing
/// through the registry for child productions.
pub type Factory = fn(&Registry, &BoundArgs<'_>) -> BindResult<NodeValue>;

/// One registered production: keyword, aliases, parameter metadata, and
/// the factory that instantiates it.
pub struct ProductionSpec {
    pub keyword: &'static str,
    pub aliases: &'static [&'static str],
    pub params: &'static [ParamMeta],
    pub factory: Factory,
}

/// The production registry: maps keywords (and aliases) to specs.
#[derive(Default)]
pub struct Registry {
    specs: Vec<ProductionSpec>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a production. Later registrations of the same keyword
    /// are rejected silently in release builds and loudly in debug.
    pub fn register(&mut self, spec: ProductionSpec) {
        debug_assert!(
            !self.index.contains_key(spec.keyword),
            "duplicate production keyword '{}'",
            spec.keyword
        );
        let idx = self.specs.len();
        self.index.entry(spec.keyword).or_insert(idx);
        for alias in spec.aliases {
            debug_assert!(!self.index.contains_key(alias));
            self.index.entry(alias).or_insert(idx);
        }
        self.specs.push(spec);
    }

    /// Look up a keyword or alias.
    pub fn spec(&self, keyword: &str) -> Option<&ProductionSpec> {
        self.index.get(keyword).map(|&idx| &self.specs[idx])
    }

    /// All registered productions, for grammar-metadata queries.
    pub fn productions(&self) -> impl Iterator<Item = &ProductionSpec> {
        self.specs.iter()
    }

    /// Bind a production to a typed node.
    pub fn bind(&self, production: &Production) -> BindResult<NodeValue> {
        let spec = self
            .spec(&production.keyword)
            .ok_or_else(|| BindError::UnknownKeyword(production.keyword.clone()))?;
        let bound = match_args(spec, production)?;
        (spec.factory)(self, &bound)
    }

    pub fn bind_bool(&self, production: &Production) -> BindResult<BoolNode> {
        match self.bind(production)? {
            NodeValue::Bool(node) => Ok(node),
            other => Err(domain_mismatch("bool", &other)),
        }
    }

    pub fn bind_int(&self, production: &Production) -> BindResult<IntNode> {
        match self.bind(production)? {
            NodeValue::Int(node) => Ok(node),
            other => Err(domain_mismatch("int", &other)),
        }
    }

    pub fn bind_array(&self, production: &Production) -> BindResult<ArrayNode> {
        match self.bind(production)? {
            NodeValue::Array(node) => Ok(node),
            other => Err(domain_mismatch("int-array", &other)),
        }
    }

    pub fn bind_region(&self, production: &Production) -> BindResult<RegionNode> {
        match self.bind(production)? {
            NodeValue::Region(node) => Ok(node),
            other => Err(domain_mismatch("region", &other)),
        }
    }

    pub fn bind_moves(&self, production: &Production) -> BindResult<MovesNode> {
        match self.bind(production)? {
            NodeValue::Moves(node) => Ok(node),
            other => Err(domain_mismatch("moves", &other)),
        }
    }

    pub fn bind_graph(&self, production: &Production) -> BindResult<GraphNode> {
        match self.bind(production)? {
            NodeValue::Graph(node) => Ok(node),
            other => Err(domain_mismatch("graph", &other)),
        }
    }
}

fn domain_mismatch(expected: &'static str, found: &NodeValue) -> BindError {
    BindError::DomainMismatch { expected, found: found.domain_name() }
}

// ══════════════════════════════════════════════════════════════════════════════
// Argument matching
// ══════════════════════════════════════════════════════════════════════════════

enum BoundValue<'a> {
    Unset,
    One(&'a ArgValue),
    Many(Vec<&'a ArgValue>),
}

/// Arguments of one production after matching against its parameter
/// metadata: every parameter has a slot, resolved by name, alias, or
/// position.
pub struct BoundArgs<'a> {
    keyword: &'static str,
    params: &'static [ParamMeta],
    values: Vec<BoundValue<'a>>,
}

fn match_args<'a>(spec: &ProductionSpec, production: &'a Production) -> BindResult<BoundArgs<'a>> {
    let keyword = spec.keyword;
    let mut values: Vec<BoundValue<'a>> =
        spec.params.iter().map(|_| BoundValue::Unset).collect();

    let mut cursor = 0usize;
    for arg in &production.args {
        match &arg.name {
            Some(name) => {
                let idx = spec
                    .params
                    .iter()
                    .position(|p| p.matches(name))
                    .ok_or_else(|| BindError::UnknownParameter {
                        keyword: keyword.to_string(),
                        name: name.clone(),
                    })?;
                let param = &spec.params[idx];
                if param.hidden {
                    return Err(BindError::HiddenParameter {
                        keyword: keyword.to_string(),
                        param: param.name.to_string(),
                    });
                }
                if !matches!(values[idx], BoundValue::Unset) {
                    return Err(BindError::DuplicateParameter {
                        keyword: keyword.to_string(),
                        param: param.name.to_string(),
                    });
                }
                values[idx] = BoundValue::One(&arg.value);
            }
            None => {
                // Advance to the next positionally-bindable parameter.
                while cursor < spec.params.len() {
                    let param = &spec.params[cursor];
                    let open = param.anonymous
                        && !param.hidden
                        && (param.variadic || matches!(values[cursor], BoundValue::Unset));
                    if open {
                        break;
                    }
                    cursor += 1;
                }
                if cursor >= spec.params.len() {
                    return Err(BindError::TooManyArguments { keyword: keyword.to_string() });
                }
                if spec.params[cursor].variadic {
                    match &mut values[cursor] {
                        BoundValue::Many(items) => items.push(&arg.value),
                        slot => *slot = BoundValue::Many(vec![&arg.value]),
                    }
                } else {
                    values[cursor] = BoundValue::One(&arg.value);
                    cursor += 1;
                }
            }
        }
    }

    for (idx, param) in spec.params.iter().enumerate() {
        let missing = !param.optional
            && !param.hidden
            && !param.variadic
            && matches!(values[idx], BoundValue::Unset);
        if missing {
            return Err(BindError::MissingParameter {
                keyword: keyword.to_string(),
                param: param.name.to_string(),
            });
        }
    }

    Ok(BoundArgs { keyword, params: spec.params, values })
}

impl<'a> BoundArgs<'a> {
    fn slot(&self, param: &str) -> &BoundValue<'a> {
        let idx = self
            .params
            .iter()
            .position(|p| p.name == param)
            .unwrap_or_else(|| panic!("factory asked for undeclared parameter '{param}'"));
        &self.values[idx]
    }

    fn mismatch(&self, param: &str, expected: &'static str, found: &ArgValue) -> BindError {
        BindError::TypeMismatch {
            keyword: self.keyword.to_string(),
            param: param.to_string(),
            expected,
            found: found.category().to_string(),
        }
    }

    /// The single value bound to `param`, if any.
    pub fn get(&self, param: &str) -> Option<&'a ArgValue> {
        match self.slot(param) {
            BoundValue::One(value) => Some(*value),
            _ => None,
        }
    }

    /// All values bound to a variadic `param`.
    pub fn many(&self, param: &str) -> Vec<&'a ArgValue> {
        match self.slot(param) {
            BoundValue::Many(items) => items.clone(),
            BoundValue::One(value) => vec![*value],
            BoundValue::Unset => Vec::new(),
        }
    }

    // ── Scalar accessors ──────────────────────────────────────────────────

    pub fn int(&self, param: &str) -> BindResult<i64> {
        match self.get(param) {
            Some(ArgValue::Int(v)) => Ok(*v),
            Some(other) => Err(self.mismatch(param, "int", other)),
            None => Err(self.missing(param)),
        }
    }

    /// A non-negative int, as a usize.
    pub fn size(&self, param: &str) -> BindResult<usize> {
        let v = self.int(param)?;
        usize::try_from(v).map_err(|_| BindError::TypeMismatch {
            keyword: self.keyword.to_string(),
            param: param.to_string(),
            expected: "non-negative int",
            found: v.to_string(),
        })
    }

    pub fn string(&self, param: &str) -> BindResult<&'a str> {
        match self.get(param) {
            Some(ArgValue::Str(v)) => Ok(v),
            Some(other) => Err(self.mismatch(param, "string", other)),
            None => Err(self.missing(param)),
        }
    }

    pub fn keyword_arg(&self, param: &str) -> BindResult<&'a str> {
        match self.get(param) {
            Some(ArgValue::Keyword(v)) => Ok(v),
            Some(other) => Err(self.mismatch(param, "keyword", other)),
            None => Err(self.missing(param)),
        }
    }

    // ── Node accessors ────────────────────────────────────────────────────

    /// Bind a single argument to a node of any domain. Int and bool
    /// literals lift to constant nodes; everything else must be a
    /// production.
    pub fn bind_value(&self, registry: &Registry, param: &str, value: &ArgValue) -> BindResult<NodeValue> {
        match value {
            ArgValue::Production(p) => registry.bind(p),
            ArgValue::Int(v) => {
                let v = i32::try_from(*v).map_err(|_| BindError::TypeMismatch {
                    keyword: self.keyword.to_string(),
                    param: param.to_string(),
                    expected: "32-bit int",
                    found: v.to_string(),
                })?;
                Ok(NodeValue::Int(IntNode::constant(v)))
            }
            ArgValue::Bool(v) => Ok(NodeValue::Bool(BoolNode::new(BoolKind::Constant(*v)))),
            other => Err(self.mismatch(param, "production", other)),
        }
    }

    pub fn bool_node(&self, registry: &Registry, param: &str) -> BindResult<BoolNode> {
        match self.opt_bool_node(registry, param)? {
            Some(node) => Ok(node),
            None => Err(self.missing(param)),
        }
    }

    pub fn opt_bool_node(&self, registry: &Registry, param: &str) -> BindResult<Option<BoolNode>> {
        match self.get(param) {
            None => Ok(None),
            Some(value) => match self.bind_value(registry, param, value)? {
                NodeValue::Bool(node) => Ok(Some(node)),
                other => Err(domain_mismatch("bool", &other)),
            },
        }
    }

    pub fn int_node(&self, registry: &Registry, param: &str) -> BindResult<IntNode> {
        match self.opt_int_node(registry, param)? {
            Some(node) => Ok(node),
            None => Err(self.missing(param)),
        }
    }

    pub fn opt_int_node(&self, registry: &Registry, param: &str) -> BindResult<Option<IntNode>> {
        match self.get(param) {
            None => Ok(None),
            Some(value) => match self.bind_value(registry, param, value)? {
                NodeValue::Int(node) => Ok(Some(node)),
                other => Err(domain_mismatch("int", &other)),
            },
        }
    }

    pub fn region_node(&self, registry: &Registry, param: &str) -> BindResult<RegionNode> {
        match self.get(param) {
            None => Err(self.missing(param)),
            Some(value) => match self.bind_value(registry, param, value)? {
                NodeValue::Region(node) => Ok(node),
                other => Err(domain_mismatch("region", &other)),
            },
        }
    }

    pub fn moves_node(&self, registry: &Registry, param: &str) -> BindResult<MovesNode> {
        match self.opt_moves_node(registry, param)? {
            Some(node) => Ok(node),
            None => Err(self.missing(param)),
        }
    }

    pub fn opt_moves_node(&self, registry: &Registry, param: &str) -> BindResult<Option<MovesNode>> {
        match self.get(param) {
            None => Ok(None),
            Some(value) => match self.bind_value(registry, param, value)? {
                NodeValue::Moves(node) => Ok(Some(node)),
                other => Err(domain_mismatch("moves", &other)),
            },
        }
    }

    /// Bind every value of a variadic parameter.
    pub fn bind_many(&self, registry: &Registry, param: &str) -> BindResult<Vec<NodeValue>> {
        self.many(param)
            .into_iter()
            .map(|value| self.bind_value(registry, param, value))
            .collect()
    }

    /// Variadic int literals, as usizes.
    pub fn sizes(&self, param: &str) -> BindResult<Vec<usize>> {
        self.many(param)
            .into_iter()
            .map(|value| match value {
                ArgValue::Int(v) => usize::try_from(*v).map_err(|_| BindError::TypeMismatch {
                    keyword: self.keyword.to_string(),
                    param: param.to_string(),
                    expected: "non-negative int",
                    found: v.to_string(),
                }),
                other => Err(self.mismatch(param, "int", other)),
            })
            .collect()
    }

    /// Variadic int literals, as i32s.
    pub fn ints(&self, param: &str) -> BindResult<Vec<i32>> {
        self.many(param)
            .into_iter()
            .map(|value| match value {
                ArgValue::Int(v) => i32::try_from(*v).map_err(|_| BindError::TypeMismatch {
                    keyword: self.keyword.to_string(),
                    param: param.to_string(),
                    expected: "32-bit int",
                    found: v.to_string(),
                }),
                other => Err(self.mismatch(param, "int", other)),
            })
            .collect()
    }

    pub fn production_keyword(&self) -> &'static str {
        self.keyword
    }

    fn missing(&self, param: &str) -> BindError {
        BindError::MissingParameter {
            keyword: self.keyword.to_string(),
            param: param.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_is_canonical() {
        let prod = Production::new("add")
            .with_named("to", Production::new("empty"))
            .with_named("if", true);
        assert_eq!(prod.render(), "(add to:(empty) if:true)");
    }

    #[test]
    fn render_nested() {
        let prod = Production::new("=")
            .with(Production::new("count").with(Production::new("all")))
            .with(9i64);
        assert_eq!(prod.render(), "(= (count (all)) 9)");
    }

    #[test]
    fn param_meta_builders() {
        let p = ParamMeta::named("to").with_alias("destination");
        assert!(!p.anonymous);
        assert!(!p.optional);
        assert!(p.matches("to"));
        assert!(p.matches("destination"));
        assert!(!p.matches("from"));

        let h = ParamMeta::hidden("piece");
        assert!(h.hidden);
        assert!(h.optional);
    }
}
