//! config-spec CLI
//!
//! Usage:
//!   config-spec [OPTIONS] <INPUT>
//!
//! Options:
//!   -o, --output <DIR>     Directory for generated examples (default: <INPUT>/generated)
//!   -c, --config <FILE>    Settings file (TOML format)
//!       --check            Verify existing examples are up to date instead of writing
//!   -v, --verbose          Increase log verbosity (repeatable)
//!   -h, --help             Print help

use std::path::PathBuf;
use std::process;

use clap::Parser;

use config_spec::output::{find_stale, write_outputs};
use config_spec::{generate, logging, Settings, Workspace};

#[derive(Parser)]
#[command(name = "config-spec")]
#[command(about = "Compile configuration specs into example configuration files")]
struct Cli {
    /// Input directory with spec documents and a templates/ subdirectory
    input: PathBuf,

    /// Directory for generated examples (default: <INPUT>/generated)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verify existing examples are up to date instead of writing them
    #[arg(long)]
    check: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Load settings
    let settings = match &cli.config {
        Some(path) => match Settings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Settings::default(),
    };

    // Load templates and spec documents
    let workspace = match Workspace::load(&cli.input) {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("{}", e.format());
            process::exit(1);
        }
    };

    let report = generate(&workspace, &settings.render);
    for failure in &report.failures {
        eprintln!("Error: {}", failure);
    }

    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.join("generated"));
    let extension = settings.output_extension.as_str();

    let mut ok = report.is_success();
    if cli.check {
        match find_stale(&report.generated, &output_dir, extension) {
            Ok(stale) => {
                for path in &stale {
                    eprintln!("Out of date: {}", path.display());
                }
                ok &= stale.is_empty();
            }
            Err(e) => {
                eprintln!("Error reading '{}': {}", output_dir.display(), e);
                process::exit(1);
            }
        }
    } else {
        match write_outputs(&report.generated, &output_dir, extension) {
            Ok(written) => {
                for path in &written {
                    println!("{}", path.display());
                }
            }
            Err(e) => {
                eprintln!("Error writing to '{}': {}", output_dir.display(), e);
                process::exit(1);
            }
        }
    }

    if !ok {
        process::exit(1);
    }
}
