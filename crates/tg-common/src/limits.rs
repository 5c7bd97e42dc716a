//! Centralized limits and thresholds for the checker.
//!
//! Shared constants for recursion depths and walk bounds used by the binder
//! and the normalizer. Keeping them here avoids duplicate definitions with
//! inconsistent values.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth the normalizer follows before failing.
///
/// Every nested sub-expression adds a frame to the normalizer's recursion.
/// Past this depth normalization fails with a recursion-limit diagnostic
/// instead of overflowing the stack.
///
/// # JavaScript example
///
/// ```javascript
/// // Deeply chained binary expressions produced by code generators:
/// const x = 1 + 1 + 1 + 1 + 1 /* ... thousands of terms ... */;
///
/// // Deeply nested calls:
/// f(f(f(f(f(f(f(f(/* ... */))))))));
/// ```
pub const MAX_EXPR_NORMALIZE_DEPTH: u32 = 500;

/// Maximum depth for nested statement walking: blocks inside blocks and
/// function bodies inside function bodies, counted together.
pub const MAX_STATEMENT_DEPTH: u32 = 500;

/// Maximum depth when lowering nested type annotations.
pub const MAX_ANNOTATION_DEPTH: u32 = 100;

/// Maximum depth for structural relation checks and substitution in the
/// solver. Recursive object shapes bail out as "not assignable" past it.
pub const MAX_RELATION_DEPTH: u32 = 100;

// =============================================================================
// Walk Bounds
// =============================================================================

/// Maximum number of parent links followed when walking up the scope tree.
///
/// Scope trees are acyclic by construction; the bound only turns a corrupted
/// parent chain into a failed lookup instead of an infinite loop.
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;

// =============================================================================
// Stack Growth
// =============================================================================

/// Remaining stack below which `stacker::maybe_grow` allocates a new segment.
pub const STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each stack segment allocated by `stacker::maybe_grow`.
pub const STACK_GROW_SIZE: usize = 2 * 1024 * 1024;
