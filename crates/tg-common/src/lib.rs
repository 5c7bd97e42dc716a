//! Common types and utilities for the typegraph checker.
//!
//! This crate provides foundational types used across all typegraph crates:
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`)
//! - Checker limits and thresholds
//! - Diagnostics shared by the binder and the checker
//! - Tracing subscriber setup

// String interning for property names and literal keys
pub mod interner;
pub use interner::{Atom, Interner};

// Span - Source location tracking (byte offsets plus line/column of the start)
pub mod span;
pub use span::Span;

// Centralized limits and thresholds
pub mod limits;

// Diagnostics
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Tracing subscriber configuration (TG_LOG / TG_LOG_FORMAT)
pub mod tracing_config;
