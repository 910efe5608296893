//! Command-line front end.
//!
//! Usage:
//!   gtfodora --list-functions [--unix | --win]
//!   gtfodora --list-all
//!   gtfodora -f sudo [--unix]
//!   gtfodora -f download -s Certutil.exe
//!   gtfodora -s find --json

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use gtfodora::{
    Catalog, GitFetcher, IngestError, PlatformFilter, QueryError, Request, Settings, execute,
    ingest, refresh_sources,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: i32 = 1;
const EXIT_UNKNOWN_CAPABILITY: i32 = 2;
const EXIT_EMPTY_CATALOG: i32 = 3;

#[derive(Parser, Debug)]
#[command(name = "gtfodora")]
#[command(about = "Look up Unix (GTFOBins) and Windows (LOLBAS) binaries by name or capability")]
struct Cli {
    /// Directory in which the gtfo/ and lolbas/ repositories are cloned.
    #[arg(long = "clone-path", value_name = "DIR")]
    clone_path: Option<PathBuf>,
    /// List the functions (capabilities) that can be queried.
    #[arg(long = "list-functions")]
    list_functions: bool,
    /// List every binary in the collection.
    #[arg(long = "list-all")]
    list_all: bool,
    /// Restrict the search to Unix binaries (GTFOBins).
    #[arg(long)]
    unix: bool,
    /// Restrict the search to Windows binaries (LOLBAS).
    #[arg(long)]
    win: bool,
    /// Only consider binaries offering this function.
    #[arg(short = 'f', long = "function", value_name = "FUNCTION")]
    function: Option<String>,
    /// Search for this binary and print its details.
    #[arg(short = 's', long = "search", value_name = "BINARY")]
    search: Option<String>,
    /// Use the local checkouts as they are; do not clone or pull.
    #[arg(long)]
    offline: bool,
    /// Print results as JSON.
    #[arg(long)]
    json: bool,
    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(exit_code(&err));
    }
}

fn run() -> Result<()> {
    let cli = parse_cli();
    init_tracing(cli.verbose);

    let filter = PlatformFilter::from_flags(cli.unix, cli.win);
    let request = Request::from_flags(
        cli.list_functions,
        cli.list_all,
        cli.function.as_deref(),
        cli.search.as_deref(),
    );
    if request == Request::Usage {
        usage(EXIT_FAILURE);
    }

    let settings = Settings::resolve(cli.clone_path.clone(), cli.offline);
    debug!(?settings, ?request, ?filter, "resolved invocation");

    let catalog = if request.needs_catalog() {
        load_catalog(&settings)?
    } else {
        Catalog::new()
    };

    let report = execute(&request, filter, &catalog)?;
    let rendered = if cli.json {
        let mut json = report.to_json()?;
        json.push('\n');
        json
    } else {
        report.to_text()
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("writing report to stdout")?;
    Ok(())
}

/// Parse arguments. Help and version exit 0; malformed arguments exit with
/// `EXIT_FAILURE` so they never share a code with query errors.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                eprint!("{err}");
                std::process::exit(EXIT_FAILURE);
            }
        },
    }
}

fn load_catalog(settings: &Settings) -> Result<Catalog> {
    if !settings.offline {
        refresh_sources(&GitFetcher::default(), &settings.clone_root);
    }
    let report = ingest(&settings.clone_root)?;
    debug!(
        binaries = report.catalog.len(),
        warnings = report.warnings.len(),
        "catalog ready"
    );
    Ok(report.catalog)
}

fn init_tracing(verbose: bool) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("gtfodora=debug")
    } else {
        EnvFilter::new("gtfodora=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<QueryError>().is_some() {
        EXIT_UNKNOWN_CAPABILITY
    } else if err.downcast_ref::<IngestError>().is_some() {
        EXIT_EMPTY_CATALOG
    } else {
        EXIT_FAILURE
    }
}

fn usage(code: i32) -> ! {
    let help = Cli::command().render_help();
    eprintln!(
        "{help}\nSelect one of --list-functions, --list-all, --function or --search.\n\nExamples:\n  gtfodora -f sudo --unix\n  gtfodora -f download -s Certutil.exe\n  gtfodora -s find"
    );
    std::process::exit(code);
}
