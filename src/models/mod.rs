pub mod git;
pub mod hook;

pub use git::GitState;
pub use hook::{
    CurrentUsage, HookContextWindow, HookCost, HookModel, HookWorkspace, SessionSnapshot,
};
