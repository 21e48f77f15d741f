/*
 * Locklint - Lock Discipline Analyzer for Go
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Span, Location, ObjectId)
 * - features/    : Vertical slices (parsing → syntax → flow/operations/
 *                  objects/package_desc → checking)
 * - config/      : Analyzer configuration
 * - api/         : Directory-level analysis entry points
 *
 * The analyzer proves, per package, that lock/unlock discipline on
 * annotated objects holds along every control-flow path: no re-entrant
 * locking, no unlocking an unlocked object, no calling a function whose
 * declared lock requirements the caller does not meet, no guarded
 * access without the guard held.
 */

// Crate-level lint configuration
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::collapsible_else_if)] // else if clarity
#![allow(clippy::match_like_matches_macro)] // Match for readability

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Directory-level analysis API
pub mod api;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use api::{analyze_dirs, analyze_sources, AnalysisOutcome};
pub use config::{AnalyzerConfig, CheckerKind};
pub use errors::{LocklintError, Result};
pub use features::checking::{CheckError, Report};
