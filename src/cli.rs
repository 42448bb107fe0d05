use clap::ArgAction;
use clap::ValueEnum;
use clap::builder::FalseyValueParser;
use clap::error::ErrorKind;
use std::convert::Infallible;

use crate::git::{BranchResolver, HeadFileResolver};
use crate::utils::DEFAULT_CURRENCY_PREFIX;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchSourceArg {
    /// Read <dir>/.git/HEAD directly
    HeadFile,
    /// Open the repository with gix (requires the `git` feature)
    Gix,
    /// Never look up a branch
    Off,
}

/// Unknown sources fall back to `head-file` so a stale env value never
/// stops the line from rendering.
fn parse_branch_source(s: &str) -> Result<BranchSourceArg, Infallible> {
    Ok(BranchSourceArg::from_str(s, true).unwrap_or(BranchSourceArg::HeadFile))
}

#[derive(clap::Parser, Debug)]
#[command(version, about = "Render a one-line session status from a JSON snapshot on stdin")]
pub struct Args {
    /// Literal placed before the cost figure
    #[arg(long, env = "STATUSLINE_CURRENCY_PREFIX", default_value = DEFAULT_CURRENCY_PREFIX)]
    pub currency_prefix: String,

    /// Where the branch name comes from: head-file|gix|off
    #[arg(
        long,
        env = "STATUSLINE_BRANCH_SOURCE",
        default_value = "head-file",
        value_parser = parse_branch_source
    )]
    pub branch_source: BranchSourceArg,

    /// Emit JSON instead of the text line
    #[arg(long)]
    pub json: bool,

    /// Color the percentage and branch (NO_COLOR always disables)
    #[arg(
        long,
        env = "STATUSLINE_COLOR",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub color: bool,

    /// Debug mode: write diagnostics to stderr
    #[arg(
        long,
        env = "STATUSLINE_DEBUG",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub debug: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            currency_prefix: DEFAULT_CURRENCY_PREFIX.to_string(),
            branch_source: BranchSourceArg::HeadFile,
            json: false,
            color: false,
            debug: false,
        }
    }
}

impl Args {
    /// Parse argv and env. `--help`/`--version` exit as usual; any other
    /// parse error is reported on stderr and the defaults are used, so the
    /// status line is still printed.
    pub fn parse() -> Self {
        match <Args as clap::Parser>::try_parse() {
            Ok(args) => args,
            Err(err)
                if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
            {
                err.exit()
            }
            Err(err) => {
                let _ = err.print();
                Self::default()
            }
        }
    }

    /// Resolver selected by `--branch-source`; `None` disables probing.
    pub fn branch_resolver(&self) -> Option<Box<dyn BranchResolver>> {
        match self.branch_source {
            BranchSourceArg::HeadFile => Some(Box::new(HeadFileResolver)),
            BranchSourceArg::Gix => {
                #[cfg(feature = "git")]
                {
                    Some(Box::new(crate::git::GixBranchResolver))
                }
                #[cfg(not(feature = "git"))]
                {
                    tracing::debug!("built without gix, reading HEAD directly");
                    Some(Box::new(HeadFileResolver))
                }
            }
            BranchSourceArg::Off => None,
        }
    }

    pub fn color_enabled(&self, no_color_set: bool) -> bool {
        self.color && !no_color_set
    }
}
