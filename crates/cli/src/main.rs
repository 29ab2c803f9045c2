//! Trace-driven cache simulator CLI.
//!
//! This binary replays an access trace through a cache hierarchy. It performs:
//! 1. **Trace run:** Read a trace file, simulate it, and print the statistics report (or JSON).
//! 2. **Event capture:** Optionally write the backing-store event stream to a file.
//! 3. **Config dump:** Print the default hierarchy configuration as JSON.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cachesim_core::Simulator;
use cachesim_core::config::Config;
use cachesim_core::memory::events::{EventSink, NullSink, TextSink};
use cachesim_core::sim::TraceReader;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven multi-level cache simulator",
    long_about = "Replay a memory-access trace through a configurable hierarchy of set-associative caches.\n\nTrace lines are `<op> <addr> <size> [gap]` with op L/R/LOAD or S/W/STORE.\n\nExamples:\n  cachesim run --trace app.trace\n  cachesim run --trace app.trace --config hierarchy.json --events mem.txt\n  cachesim config > hierarchy.json"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace file and print the statistics report.
    Run {
        /// Access trace to replay.
        #[arg(short, long)]
        trace: PathBuf,

        /// JSON hierarchy configuration (built-in L1/L2 default otherwise).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write backing-store events (`META <delta> R|W <addr>`) to this file.
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Print the statistics as JSON instead of the text report.
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as JSON.
    Config,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            trace,
            config,
            events,
            json,
        } => cmd_run(&trace, config.as_deref(), events.as_deref(), json),
        Commands::Config => cmd_config(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(Config::from_json(&text)?)
}

/// Replays `trace` and prints the report. Events go to `events` when given.
fn cmd_run(
    trace: &Path,
    config: Option<&Path>,
    events: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let sink: Box<dyn EventSink> = match events {
        Some(path) => {
            let file = File::create(path).map_err(|e| format!("{}: {e}", path.display()))?;
            Box::new(TextSink::new(BufWriter::new(file)))
        }
        None => Box::new(NullSink),
    };

    let mut sim = Simulator::with_sink(&config, sink)?;
    info!(trace = %trace.display(), "replaying trace");
    let reports = sim.run(TraceReader::open(trace)?)?;
    sim.flush()?;
    if sim.accesses() == 0 {
        warn!(trace = %trace.display(), "trace contained no accesses");
    }

    let stats = sim.stats();
    let mut out = io::stdout().lock();
    if json {
        writeln!(out, "{}", stats.to_json()?)?;
    } else {
        write!(out, "{stats}")?;
        for report in &reports {
            writeln!(
                out,
                "epoch {:>6}: {} pages, {} accesses, {} pages total",
                report.epoch, report.distinct_pages, report.accesses, report.total_pages
            )?;
        }
    }
    Ok(())
}

fn cmd_config() -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(&Config::default())?;
    println!("{json}");
    Ok(())
}
