//! # Git Module
//!
//! Best-effort branch lookup for the workspace directory.
//!
//! Every resolver answers `Option<String>` and never returns an error: a
//! missing `.git`, an unreadable `HEAD`, or a detached HEAD all mean "no
//! branch", and the statusline simply omits the suffix.
//!
//! ## Resolvers
//!
//! - [`HeadFileResolver`]: reads `<dir>/.git/HEAD` directly (default)
//! - [`GixBranchResolver`]: asks gix for HEAD's referent (feature `git`)
//! - any `Fn(&Path) -> Option<String>` closure

use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::models::GitState;

static HEAD_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ref:\s*refs/heads/(.+)$").unwrap());

static GITDIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^gitdir:\s*(.+)$").unwrap());

pub trait BranchResolver {
    /// Branch checked out in `dir`, if any.
    fn resolve(&self, dir: &Path) -> Option<String>;
}

impl<F> BranchResolver for F
where
    F: Fn(&Path) -> Option<String>,
{
    fn resolve(&self, dir: &Path) -> Option<String> {
        self(dir)
    }
}

/// Run a resolver and normalize its answer into a [`GitState`].
pub fn read_git_state(resolver: &dyn BranchResolver, dir: &Path) -> Option<GitState> {
    resolver.resolve(dir).and_then(GitState::new)
}

/// Extract the branch from the contents of a HEAD file.
///
/// `ref: refs/heads/feature/x` yields `feature/x`; a raw commit id or any
/// other ref yields `None`.
pub fn parse_head_ref(contents: &str) -> Option<String> {
    let line = contents.lines().next()?.trim();
    let caps = HEAD_REF_RE.captures(line)?;
    let name = caps.get(1)?.as_str().trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Reads `.git/HEAD` under the workspace directory without walking upward.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadFileResolver;

impl HeadFileResolver {
    fn read_head(&self, dir: &Path) -> Result<Option<String>> {
        let git_dir = match metadata_dir(dir)? {
            Some(d) => d,
            None => return Ok(None),
        };
        let head_path = git_dir.join("HEAD");
        let contents = fs::read_to_string(&head_path)
            .with_context(|| format!("read {}", head_path.display()))?;
        trace!(head = %contents.trim(), "read HEAD");
        Ok(parse_head_ref(&contents))
    }
}

impl BranchResolver for HeadFileResolver {
    fn resolve(&self, dir: &Path) -> Option<String> {
        match self.read_head(dir) {
            Ok(branch) => branch,
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "branch lookup failed");
                None
            }
        }
    }
}

/// Locate the metadata directory for `dir`.
///
/// `.git` is normally a directory. Linked worktrees and submodules use a
/// `.git` file holding `gitdir: <path>`, relative paths being relative to `dir`.
fn metadata_dir(dir: &Path) -> Result<Option<PathBuf>> {
    let dotgit = dir.join(".git");
    if dotgit.is_dir() {
        return Ok(Some(dotgit));
    }
    if !dotgit.is_file() {
        trace!(dir = %dir.display(), "no .git entry");
        return Ok(None);
    }
    let contents = fs::read_to_string(&dotgit)
        .with_context(|| format!("read {}", dotgit.display()))?;
    let Some(target) = contents
        .lines()
        .next()
        .and_then(|line| GITDIR_RE.captures(line.trim()))
        .and_then(|caps| caps.get(1))
        .map(|m| PathBuf::from(m.as_str().trim()))
    else {
        bail!("{} has no gitdir line", dotgit.display());
    };
    let target = if target.is_absolute() {
        target
    } else {
        dir.join(target)
    };
    if target.is_dir() {
        Ok(Some(target))
    } else {
        bail!("gitdir {} is not a directory", target.display())
    }
}

/// Opens the repository at the workspace directory with gix.
#[cfg(feature = "git")]
#[derive(Debug, Default, Clone, Copy)]
pub struct GixBranchResolver;

#[cfg(feature = "git")]
impl BranchResolver for GixBranchResolver {
    fn resolve(&self, dir: &Path) -> Option<String> {
        let repo = match gix::open(dir) {
            Ok(repo) => repo,
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "gix open failed");
                return None;
            }
        };
        let head = repo.head().ok()?;
        // Detached HEAD has no referent
        let name = head.referent_name()?;
        let full = name.as_bstr().to_string();
        let short = full.strip_prefix("refs/heads/")?;
        Some(short.to_string())
    }
}
