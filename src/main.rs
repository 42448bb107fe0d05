use anyhow::{Context, Result};
use std::io::Write;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use context_statusline::cli::Args;
use context_statusline::display::{RenderOptions, StatusLine, json_line};
use context_statusline::models::SessionSnapshot;
use context_statusline::utils::read_stdin;

/// Diagnostics go to stderr only; stdout carries the single status line.
fn init_tracing(debug: bool) {
    let default = if debug { "context_statusline=debug" } else { "off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    // A failed read renders the default line rather than breaking the prompt
    let stdin = read_stdin().unwrap_or_else(|err| {
        debug!(error = %err, "stdin read failed");
        Vec::new()
    });
    let snapshot = SessionSnapshot::from_slice(&stdin);

    let resolver = args.branch_resolver();
    let line = StatusLine::build(&snapshot, resolver.as_deref());

    let out = if args.json {
        json_line(&line, &args.currency_prefix)?
    } else {
        let opts = RenderOptions {
            currency_prefix: args.currency_prefix.clone(),
            color: args.color_enabled(std::env::var_os("NO_COLOR").is_some()),
        };
        line.render(&opts)
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{out}").context("write status line")?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}
