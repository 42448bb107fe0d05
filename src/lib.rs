//! # Context Statusline
//!
//! Renders a single status line for an interactive coding session from a
//! JSON snapshot the host pipes on stdin:
//!
//! ```text
//! [Opus] Context: 50% | Cost: $0.0123 | [app] | main
//! ```
//!
//! Nothing here is fatal. Missing or malformed fields fall back to their
//! defaults (0%, `0.0000`, no branch) and the line is always printed.
//!
//! ## Features
//!
//! - `git` (default): gix-backed branch resolver
//! - `colors` (default): opt-in terminal colors via owo-colors

/// Command-line arguments and environment configuration
pub mod cli;

/// Line assembly for text and JSON output
pub mod display;

/// Best-effort branch lookup
pub mod git;

/// Snapshot and git data models
pub mod models;

/// Context window percentage and severity
pub mod usage;

/// Stdin, cost and path formatting helpers
pub mod utils;

pub use display::{RenderOptions, StatusLine, render};
pub use git::{BranchResolver, HeadFileResolver};
pub use models::SessionSnapshot;
