//! ezyc: a transpiler from the ezy language to C.
//!
//! The pipeline is lexer → parser → AST → transpiler, each stage in its own
//! module. `compile` is the one entry point the binary (and integration
//! tests) need; everything else is exposed for unit testing and for anyone
//! embedding the pipeline directly.

pub mod arena;
pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod transpiler;
pub mod types;

pub use config::TranspilerConfig;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};

/// Run the full pipeline over `src`, returning the generated C source plus
/// every diagnostic collected along the way. Errors during parsing do not
/// stop the run — the parser recovers per top-level form — so callers
/// should check `diagnostics.has_errors()` rather than relying on a bare
/// `Result`.
pub fn compile(src: &str, config: &TranspilerConfig) -> (String, Diagnostics) {
    let result = parser::Parser::new(src, config).parse();
    let mut diagnostics = result.diagnostics;
    let c_source = transpiler::transpile(&result.nodes, result.top_level, &mut diagnostics, config);
    (c_source, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_minimal_program() {
        let (c_source, diagnostics) = compile("fn int32 add(int32 a, int32 b) { let int32 c = a + b; }", &TranspilerConfig::default());
        assert!(!diagnostics.has_errors());
        assert!(c_source.contains("int32_t add(int32_t a, int32_t b)"));
    }
}
