//! Line assembly for text and JSON output.
//!
//! The text shape is fixed:
//! `[<model>] Context: <pct>%<marker> | Cost: <prefix><cost> | [<dir>]<branch>`

#[cfg(feature = "colors")]
use owo_colors::OwoColorize;
use std::path::Path;
use tracing::debug;

use crate::git::{BranchResolver, read_git_state};
use crate::models::{GitState, SessionSnapshot};
use crate::usage::{ContextUsage, Severity};
use crate::utils::{DEFAULT_CURRENCY_PREFIX, dir_label, format_cost};

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub currency_prefix: String,
    /// ANSI color on the percentage and branch. Ignored without the
    /// `colors` feature.
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            currency_prefix: DEFAULT_CURRENCY_PREFIX.to_string(),
            color: false,
        }
    }
}

/// Every derived field of one statusline tick.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub model: String,
    pub context: ContextUsage,
    /// Cost as reported by the host; `None` when absent or non-numeric
    pub cost_usd: Option<f64>,
    pub current_dir: Option<String>,
    pub dir_label: String,
    pub git: Option<GitState>,
}

impl StatusLine {
    /// Derive all fields from a snapshot. Branch lookup is skipped when no
    /// resolver is given or the snapshot carries no directory.
    pub fn build(snapshot: &SessionSnapshot, resolver: Option<&dyn BranchResolver>) -> Self {
        let current_dir = snapshot.current_dir().map(str::to_string);
        let git = match (resolver, current_dir.as_deref()) {
            (Some(resolver), Some(dir)) => read_git_state(resolver, Path::new(dir)),
            _ => None,
        };
        let line = Self {
            model: snapshot.model_name().unwrap_or_default().to_string(),
            context: ContextUsage::from_window(snapshot.context_window.as_ref()),
            cost_usd: snapshot.total_cost_usd(),
            dir_label: current_dir.as_deref().map(dir_label).unwrap_or_default().to_string(),
            current_dir,
            git,
        };
        debug!(
            percent = line.context.percent,
            used = ?line.context.used_tokens,
            size = ?line.context.window_size,
            cost = ?line.cost_usd,
            branch = ?line.git.as_ref().map(|g| g.branch.as_str()),
            "derived statusline fields"
        );
        line
    }

    pub fn cost_formatted(&self) -> String {
        format_cost(self.cost_usd)
    }

    /// Plain single line, never carrying escape sequences.
    pub fn to_text(&self, currency_prefix: &str) -> String {
        self.assemble(currency_prefix, self.context.label(), self.branch_suffix())
    }

    /// Text line, colored when `opts.color` is set and colors are compiled in.
    pub fn render(&self, opts: &RenderOptions) -> String {
        if opts.color {
            self.assemble(
                &opts.currency_prefix,
                paint_context(self.context.label(), self.context.severity),
                self.git
                    .as_ref()
                    .map(|g| format!(" | {}", paint_branch(&g.branch)))
                    .unwrap_or_default(),
            )
        } else {
            self.to_text(&opts.currency_prefix)
        }
    }

    fn branch_suffix(&self) -> String {
        self.git.as_ref().map(GitState::suffix).unwrap_or_default()
    }

    fn assemble(&self, currency_prefix: &str, context: String, branch: String) -> String {
        format!(
            "[{}] Context: {} | Cost: {}{} | [{}]{}",
            sanitize(&self.model),
            context,
            currency_prefix,
            self.cost_formatted(),
            sanitize(&self.dir_label),
            branch
        )
    }
}

/// Host-supplied text must not break the single-line contract.
fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

#[cfg(feature = "colors")]
fn paint_context(label: String, severity: Severity) -> String {
    match severity {
        Severity::High => label.red().bold().to_string(),
        Severity::Medium => label.yellow().to_string(),
        Severity::None => label.green().to_string(),
    }
}

#[cfg(not(feature = "colors"))]
fn paint_context(label: String, _severity: Severity) -> String {
    label
}

#[cfg(feature = "colors")]
fn paint_branch(branch: &str) -> String {
    branch.cyan().to_string()
}

#[cfg(not(feature = "colors"))]
fn paint_branch(branch: &str) -> String {
    branch.to_string()
}

/// Render a snapshot straight to the text line.
pub fn render(
    snapshot: &SessionSnapshot,
    resolver: Option<&dyn BranchResolver>,
    opts: &RenderOptions,
) -> String {
    StatusLine::build(snapshot, resolver).render(opts)
}

pub fn build_json_output(line: &StatusLine, currency_prefix: &str) -> serde_json::Value {
    serde_json::json!({
        "model": {
            "display_name": line.model,
        },
        "context": line.context,
        "cost": {
            "total_cost_usd": line.cost_usd,
            "is_reported": line.cost_usd.is_some(),
            "formatted": line.cost_formatted(),
            "prefix": currency_prefix,
        },
        "workspace": {
            "current_dir": line.current_dir,
            "label": line.dir_label,
        },
        "git": line.git,
        "line": line.to_text(currency_prefix),
    })
}

pub fn json_line(line: &StatusLine, currency_prefix: &str) -> anyhow::Result<String> {
    let json = build_json_output(line, currency_prefix);
    Ok(serde_json::to_string(&json)?)
}
