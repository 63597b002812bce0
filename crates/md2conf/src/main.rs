//! md2conf CLI - Markdown to Confluence publisher.
//!
//! Renders a markdown file to Confluence storage format and, with `--publish`,
//! creates or updates the page of the same title in a space. Without
//! `--publish` the page is only rendered and Confluence is never contacted.

mod error;
mod output;
mod publish;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use output::Output;
use publish::PublishArgs;

/// Default log filter when neither `--loglevel` nor `RUST_LOG` is set.
const DEFAULT_LOG_LEVEL: &str = "info";

/// md2conf - Markdown to Confluence publisher.
#[derive(Parser)]
#[command(name = "md2conf", version, about)]
struct Cli {
    /// Log level or filter directive (e.g. debug, md2conf_confluence=trace).
    #[arg(short, long)]
    loglevel: Option<String>,

    #[command(flatten)]
    args: PublishArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.loglevel.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.args.execute() {
        output.error(&format!("Error: {err}"));
        if let Some(details) = err.response_details() {
            output.error(&details);
        }
        std::process::exit(1);
    }
}

/// `--loglevel` wins, then `RUST_LOG`, then the default. Unparsable
/// directives fall back to the default.
fn log_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::try_new(level.to_lowercase()).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}
