//! Transpiler configuration.
//!
//! A plain struct with `Default` and builder-style `with_*` methods,
//! threaded through `Parser`/`Transpiler` construction. Exists mainly so
//! tests can exercise arena growth/shrink behavior with small block sizes
//! without waiting on megabyte-scale inputs.

use crate::arena::DEFAULT_BLOCK_SIZE;
use crate::transpiler::DEFAULT_CHUNK_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranspilerConfig {
    /// Size in bytes of each block in the parser's bump arena.
    pub arena_block_size: usize,
    /// Size in bytes of each output chunk in the transpiler's C-source
    /// chunk chain.
    pub output_chunk_size: usize,
}

impl TranspilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arena_block_size(mut self, size: usize) -> Self {
        self.arena_block_size = size;
        self
    }

    pub fn with_output_chunk_size(mut self, size: usize) -> Self {
        self.output_chunk_size = size;
        self
    }
}

impl Default for TranspilerConfig {
    fn default() -> Self {
        TranspilerConfig {
            arena_block_size: DEFAULT_BLOCK_SIZE,
            output_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
