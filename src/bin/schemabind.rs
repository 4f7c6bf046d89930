//! schemabind: generate Python data-access bindings from schema metadata
//!
//! # Usage
//!
//! ```bash
//! # Bindings for every table, view, proc and enum
//! schemabind schema.json --dialect postgres --schema public
//!
//! # Custom queries into one file
//! schemabind queries.json --mode query --single queries.py -o out.json
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use schemabind::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemabind")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate Python data-access bindings from schema metadata", long_about = None)]
#[command(after_help = "EXAMPLES:
    schemabind schema.json --dialect mysql
    schemabind schema.json -d oracle --oracle-type godror --escape all
    schemabind queries.json --mode query -S queries.py")]
struct Cli {
    /// Schema document (JSON)
    input: PathBuf,

    /// Config file (defaults to ./schemabind.toml, then the user config dir)
    #[arg(short, long, env = "SCHEMABIND_CONFIG")]
    config: Option<PathBuf>,

    /// SQL dialect
    #[arg(short, long, env = "SCHEMABIND_DIALECT")]
    dialect: Option<Dialect>,

    /// Schema name prefixed onto tables and routines
    #[arg(short, long)]
    schema: Option<String>,

    /// Generate from the schema or from custom queries
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Write every binding to this one file
    #[arg(short = 'S', long)]
    single: Option<String>,

    /// Package qualifying custom types
    #[arg(long)]
    custom: Option<String>,

    /// Identifiers to quote (schema, table, column, all, none)
    #[arg(short, long, value_delimiter = ',')]
    escape: Vec<String>,

    /// Oracle driver variant (ora, godror)
    #[arg(long)]
    oracle_type: Option<OracleType>,

    /// Suffix for short names that collide with generated names
    #[arg(long)]
    conflict: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Schema,
    Query,
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Schema => Mode::Schema,
            ModeArg::Query => Mode::Query,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(out) if out.is_ok() => {}
        Ok(out) => {
            eprintln!(
                "{} {} unit(s) failed",
                "Error:".red().bold(),
                out.failures.len()
            );
            for f in &out.failures {
                eprintln!("  {} {}", f.unit.yellow(), f.error);
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("schemabind={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file values with the command line applied on top.
fn options(cli: &Cli) -> Result<GenerateOptions> {
    let mut opts = GenerateOptions::load(cli.config.as_deref()).context("loading config")?;
    if let Some(d) = cli.dialect {
        opts.dialect = d;
    }
    if let Some(s) = &cli.schema {
        opts.schema = s.clone();
    }
    if let Some(m) = cli.mode {
        opts.mode = m.into();
    }
    if cli.single.is_some() {
        opts.single = cli.single.clone();
    }
    if cli.custom.is_some() {
        opts.custom_package = cli.custom.clone();
    }
    if !cli.escape.is_empty() {
        opts.escape = cli.escape.clone();
    }
    if cli.oracle_type.is_some() {
        opts.oracle_type = cli.oracle_type;
    }
    if let Some(c) = &cli.conflict {
        opts.naming.conflict_suffix = c.clone();
    }
    Ok(opts)
}

fn run(cli: &Cli) -> Result<Output> {
    let opts = options(cli)?;
    let set = Set::load(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let out = generate(&set, opts)?;

    let json = serde_json::to_string_pretty(&out)?;
    match &cli.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            println!(
                "{} {} file(s) -> {}",
                "✓".green(),
                out.files.len(),
                path.display().to_string().cyan()
            );
        }
        None => println!("{json}"),
    }
    Ok(out)
}
