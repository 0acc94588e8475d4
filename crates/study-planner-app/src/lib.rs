//! Application layer for the study planner.
//!
//! This crate provides the reducer, the persisted session with its undo buffer,
//! configuration, and filter helpers shared by the CLI and interactive shell.

pub mod async_session;
pub mod config;
pub mod filter_util;
pub mod reducer;
pub mod seed;
pub mod session;
pub mod task_patch;

// Re-exports for convenience
pub use async_session::SharedTaskSession;
pub use config::{DEFAULT_STORAGE_KEY, DEFAULT_UNDO_WINDOW_MS, MAX_UNDO_WINDOW_MS, PlannerConfig};
pub use filter_util::{FilterBuildError, FilterBuildResult, ViewQueryBuilder};
pub use reducer::{Action, apply, reduce};
pub use seed::default_seed;
pub use session::{PendingDelete, TaskSession, UndoTicket};
pub use task_patch::TaskPatch;
