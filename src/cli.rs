use anyhow::Result;
use clap::{ArgAction, Parser};

use crate::model::{RunConfig, DEFAULT_LEGEND_CAP};
use crate::pipeline;
use crate::supervisor;

/// The auto help short flag is disabled so `-h` can mean historic overlay;
/// `--help` is re-added explicitly below.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "caseplot",
    version,
    about = "Plot summary and restart vectors from simulation cases",
    disable_help_flag = true
)]
pub struct Cli {
    /// Overlay historic vector variants (reference case only)
    #[arg(short = 'h', long = "historic")]
    pub historic: bool,

    /// Suppress all legends
    #[arg(short = 'n', long = "no-legend")]
    pub no_legend: bool,

    /// Draw every series in one shared figure
    #[arg(short = 's', long = "single")]
    pub single: bool,

    /// Disable legend truncation (default keeps the first 5 cases)
    #[arg(short = 'l', long = "no-cap")]
    pub no_cap: bool,

    /// Case decks and vector identifiers, in any order. Anything that opens
    /// as a case deck is a case; the rest are vector tokens.
    #[arg(required = true)]
    pub tokens: Vec<String>,

    #[arg(long = "help", action = ArgAction::HelpLong, help = "Print help")]
    help: Option<bool>,
}

/// Build the per-pass configuration handed to every rendering unit.
pub fn build_config(args: &Cli) -> RunConfig {
    RunConfig {
        tokens: args.tokens.clone(),
        historic: args.historic,
        single: args.single,
        no_legend: args.no_legend,
        legend_cap: if args.no_cap {
            None
        } else {
            Some(DEFAULT_LEGEND_CAP)
        },
    }
}

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);

    // Validation pass: the fatal-input conditions (no openable case, nothing
    // resolved) abort here with a plain error, before the terminal is touched.
    // The rendering unit still re-resolves from scratch on every (re)start.
    pipeline::assemble_pass(&cfg)?;

    supervisor::run_supervisor(cfg).await
}
