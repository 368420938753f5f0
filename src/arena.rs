//! Bump allocator for parser-owned byte storage.
//!
//! Backs the parameter/argument array grow-then-shrink pattern used by the
//! parser (see `parser.rs`). Each block is a fixed-size byte buffer; `alloc`
//! bumps a frontier within the head block, appending a new block when the
//! current one has no room. `rewind_last` undoes the most recent allocation
//! iff it is still the most recent allocation (pointer-equality check against
//! the bump frontier), which is what lets the parser "overallocate, then
//! shrink to fit" without a general-purpose free.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Default block size: 1 MiB per block.
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

const ALIGN: usize = 8;

struct Block {
    buf: NonNull<u8>,
    size: usize,
    used: usize,
    next: Option<Box<Block>>,
}

impl Block {
    fn new(size: usize) -> Self {
        let layout = Layout::from_size_align(size, ALIGN).expect("arena block layout");
        // SAFETY: layout has non-zero size (block_size is always > 0) and
        // proper alignment; alloc_zeroed returns either a valid pointer or
        // null, which we check below.
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        let buf = NonNull::new(ptr).unwrap_or_else(|| alloc::handle_alloc_error(layout));
        Block {
            buf,
            size,
            used: 0,
            next: None,
        }
    }

    fn remaining(&self) -> usize {
        self.size - self.used
    }

    /// Pointer to the current bump frontier of this block.
    fn frontier(&self) -> *mut u8 {
        // SAFETY: `used` is always <= `size`, so this stays within the
        // allocation (one-past-the-end is allowed for pointer arithmetic).
        unsafe { self.buf.as_ptr().add(self.used) }
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        let layout = Layout::from_size_align(self.size, ALIGN).expect("arena block layout");
        // SAFETY: `buf` was allocated with this exact layout in `Block::new`
        // and has not been freed elsewhere.
        unsafe { alloc::dealloc(self.buf.as_ptr(), layout) };
    }
}

/// A singly-linked chain of fixed-size byte blocks supporting bump
/// allocation, last-allocation rewind, and full reset.
///
/// Out-of-memory on block append is fatal (`panic!`), matching the source
/// language's "abort with diagnostic" failure semantics for this component.
pub struct Arena {
    block_size: usize,
    head: Block,
}

impl Arena {
    pub fn new() -> Self {
        Self::with_block_size(DEFAULT_BLOCK_SIZE)
    }

    pub fn with_block_size(block_size: usize) -> Self {
        assert!(block_size > 0, "arena block size must be non-zero");
        Arena {
            block_size,
            head: Block::new(block_size),
        }
    }

    /// Allocate `n` bytes, 8-byte aligned, returning a raw pointer into one
    /// of the arena's blocks. Appends a new block when the head has no
    /// room; fatal if a block large enough for `n` cannot be appended.
    pub fn alloc(&mut self, n: usize) -> *mut u8 {
        if n > self.head_reachable_block().remaining() {
            self.grow_for(n);
        }
        let block = self.head_reachable_block_mut();
        let ptr = block.frontier();
        block.used += n;
        ptr
    }

    /// Attempt to undo the most recent allocation of `n` bytes at `ptr`.
    /// Succeeds iff `ptr + n` equals the current bump frontier of some block
    /// in the chain, in which case that block's `used` count is decremented
    /// by `n`. A no-op (returns `false`) otherwise.
    pub fn rewind_last(&mut self, n: usize, ptr: *mut u8) -> bool {
        let mut block = &mut self.head;
        loop {
            // SAFETY: comparing two pointers derived from the same
            // allocation (or unrelated ones, which compare unequal); no
            // dereference happens here.
            if unsafe { ptr.add(n) } == block.frontier() {
                block.used -= n;
                return true;
            }
            match block.next.as_deref_mut() {
                Some(next) => block = next,
                None => return false,
            }
        }
    }

    /// Release all non-head blocks and reset the head block's used count to
    /// zero. The head block itself is retained (never freed) for reuse.
    pub fn clear(&mut self) {
        self.head.next = None;
        self.head.used = 0;
    }

    fn head_reachable_block(&self) -> &Block {
        let mut block = &self.head;
        while let Some(next) = block.next.as_deref() {
            block = next;
        }
        block
    }

    fn head_reachable_block_mut(&mut self) -> &mut Block {
        let mut block = &mut self.head;
        while block.next.is_some() {
            block = block.next.as_deref_mut().expect("checked is_some");
        }
        block
    }

    fn grow_for(&mut self, n: usize) {
        let size = n.max(self.block_size);
        let mut block = &mut self.head;
        while block.next.is_some() {
            block = block.next.as_deref_mut().expect("checked is_some");
        }
        block.next = Some(Box::new(Block::new(size)));
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

/// A growable array backed by arena storage, used by the parser to collect
/// function parameters and call arguments.
///
/// Mirrors the source language's "start at capacity 16 (or 8), double on
/// overflow, shrink to the final count" pattern: each growth step rewinds
/// the previous allocation (when it is still the most recent one) before
/// bumping a larger block, so the arena's footprint tracks real usage
/// rather than the high-water capacity. `finish` performs the final
/// shrink-to-fit and hands back a plain `Vec<T>` for the AST to own, per
/// the growable-vector alternative the design notes sanction.
///
/// Generic over any `T`, not just `Copy` types: every relocation here is a
/// raw move (`ptr::write`/`ptr::read`/`copy_nonoverlapping`) of logically
/// uninitialized memory, never a duplication that could double-drop — the
/// arena itself has no destructor for the bytes it hands out.
pub struct ArenaArray<T> {
    ptr: *mut T,
    len: usize,
    cap: usize,
}

impl<T> ArenaArray<T> {
    pub fn with_capacity(arena: &mut Arena, cap: usize) -> Self {
        let bytes = cap * std::mem::size_of::<T>();
        let ptr = arena.alloc(bytes) as *mut T;
        ArenaArray { ptr, len: 0, cap }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Push a value, doubling capacity (via arena rewind + realloc + copy)
    /// when full.
    pub fn push(&mut self, arena: &mut Arena, value: T) {
        if self.len == self.cap {
            self.grow(arena);
        }
        // SAFETY: `self.len < self.cap` after the grow above, and `ptr` was
        // sized for `cap` elements of `T`.
        unsafe { std::ptr::write(self.ptr.add(self.len), value) };
        self.len += 1;
    }

    fn grow(&mut self, arena: &mut Arena) {
        let elem_size = std::mem::size_of::<T>();
        let old_bytes = self.cap * elem_size;
        let old_ptr = self.ptr as *mut u8;
        let rewound = arena.rewind_last(old_bytes, old_ptr);
        let new_cap = (self.cap * 2).max(1);
        let new_bytes = new_cap * elem_size;
        let new_ptr = arena.alloc(new_bytes) as *mut T;
        if !rewound || new_ptr != self.ptr {
            // SAFETY: both ptr and new_ptr point to valid, non-overlapping
            // (or coincident, in the rewound case) regions of at least
            // `self.len` elements of T.
            unsafe { std::ptr::copy_nonoverlapping(self.ptr, new_ptr, self.len) };
        }
        self.ptr = new_ptr;
        self.cap = new_cap;
    }

    /// Shrink the arena allocation to exactly `self.len` elements and copy
    /// the contents out into an owned `Vec<T>`.
    pub fn finish(self, arena: &mut Arena) -> Vec<T> {
        let elem_size = std::mem::size_of::<T>();
        let old_bytes = self.cap * elem_size;
        if self.cap > self.len {
            arena.rewind_last(old_bytes, self.ptr as *mut u8);
            if self.len > 0 {
                let shrunk = arena.alloc(self.len * elem_size) as *mut T;
                if shrunk != self.ptr {
                    // SAFETY: `self.ptr` held `self.len` valid elements
                    // before the rewind above freed the tail of the
                    // allocation; the rewind only un-bumps the frontier, it
                    // does not clobber memory, so the source bytes are
                    // still readable. `shrunk != self.ptr` here, so the
                    // regions are genuinely non-overlapping.
                    unsafe { std::ptr::copy_nonoverlapping(self.ptr, shrunk, self.len) };
                }
                return (0..self.len)
                    .map(|i| unsafe { std::ptr::read(shrunk.add(i)) })
                    .collect();
            }
            return Vec::new();
        }
        (0..self.len)
            .map(|i| unsafe { std::ptr::read(self.ptr.add(i)) })
            .collect()
    }
}
