//! The Tabula compiler.
//!
//! Turns a structured game description (productions handed over by an
//! external parser) into a ready-to-evaluate [`Game`]:
//!
//! 1. **Bind** — the registry maps each production onto a typed node
//!    constructor, enforcing parameter metadata and domain typing.
//!    Binding errors abort compilation.
//! 2. **Preprocess** — one bottom-up pass freezes every node's derived
//!    properties and resolves symbolic references. Structural findings
//!    accumulate in a [`ValidationReport`] instead of aborting, so a
//!    single run surfaces every problem.
//!
//! The compiled game also carries a SHA-256 digest of its canonical
//! rendering, so hosts can key caches on the description itself.

pub mod assemble;
pub mod binder;
pub mod preprocess;
pub mod registry;

use sha2::{Digest, Sha256};

use tabula_tree::Game;
use tabula_types::ValidationReport;

pub use assemble::assemble;
pub use binder::{
    kw, Arg, ArgValue, BindError, BindResult, BoundArgs, NodeValue, ParamMeta, Production,
    ProductionSpec, Registry,
};
pub use registry::default_registry;

/// The result of a successful compilation: the preprocessed game plus
/// every static validation finding.
#[derive(Debug)]
pub struct CompiledGame {
    pub game: Game,
    pub report: ValidationReport,
}

/// Compile a description with the built-in production registry.
pub fn compile(root: &Production) -> BindResult<CompiledGame> {
    compile_with(&default_registry(), root)
}

/// Compile a description with a caller-extended registry.
pub fn compile_with(registry: &Registry, root: &Production) -> BindResult<CompiledGame> {
    let mut game = assemble(registry, root)?;
    game.set_digest(digest(root));

    let mut report = ValidationReport::new();
    preprocess::run(&mut game, &mut report);

    Ok(CompiledGame { game, report })
}

/// Hex SHA-256 of the canonical rendering of a description.
pub fn digest(root: &Production) -> String {
    let mut hasher = Sha256::new();
    hasher.update(root.render().as_bytes());
    let bytes = hasher.finalize();
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
