//! goenum CLI - generates enum methods for marked Go types.
//!
//! Features:
//! - `dir/...` recursive path arguments, like the `go` tool
//! - Rayon-powered parallel processing
//! - goenum.toml configuration (excludes, jobs, formatter)
//! - Plain or JSON run summaries

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};

use goenum_core::{init_structured_logging, print_json, print_plain, Goenum, RewriteSummary};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generates validation, listing, null handling and schema methods for Go enums",
    after_help = "Files are not reformatted unless goenum.toml sets a formatter command,\n\
                  for example: formatter = [\"gofmt\"]. The command reads the rewritten\n\
                  file on stdin and must print the formatted file on stdout.",
    disable_help_flag = true
)]
pub struct Cli {
    /// File, directory, or `dir/...` for a recursive walk
    #[arg(default_value = ".")]
    path: String,

    /// Print every processed file
    #[arg(short, long)]
    verbose: bool,

    /// Mark generated and removed code with provenance comments
    #[arg(short, long)]
    debug: bool,

    /// Write results to stdout instead of the files
    #[arg(short, long)]
    print: bool,

    /// Number of worker threads
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Output the run summary in JSON format
    #[arg(long)]
    json: bool,

    /// Config file to use instead of goenum.toml in the target directory
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Print usage and exit
    #[arg(short, long, action = ArgAction::SetTrue)]
    help: bool,
}

/// Maps parsed flags onto the library builder.
fn build(cli: &Cli) -> Goenum {
    let mut run = Goenum::new(cli.path.clone())
        .verbose(cli.verbose)
        .debug(cli.debug)
        .print(cli.print);
    if let Some(jobs) = cli.jobs {
        run = run.jobs(jobs);
    }
    if let Some(config) = &cli.config {
        run = run.config_file(config);
    }
    run
}

fn run(cli: &Cli) -> Result<RewriteSummary> {
    build(cli)
        .run()
        .with_context(|| format!("Failed to process {}", cli.path))
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] goenum internal error: {}", info);
        eprintln!("[PANIC] No files were written after this point.");
    }));

    // JSON to stderr, respects RUST_LOG
    init_structured_logging();

    let cli = Cli::parse();

    if cli.help {
        eprintln!("{}", Cli::command().render_help());
        std::process::exit(2);
    }

    let summary = match run(&cli) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("goenum error: {:#}", e);
            std::process::exit(1);
        }
    };

    if cli.json {
        print_json(&summary);
    } else if !summary.is_success() || (cli.verbose && !cli.print) {
        print_plain(&summary);
    }

    std::process::exit(if summary.is_success() { 0 } else { 1 });
}
