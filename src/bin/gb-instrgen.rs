use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gb_instrgen::GenConfig;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate the Game Boy dispatch switch and opcode tables from a JSON opcode table"
)]
struct Opts {
    /// JSON config; flags below override its fields
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Opcode table (512 records)
    #[arg(long, value_name = "JSON")]
    table: Option<PathBuf>,
    /// Template carrying the anchor comments
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,
    /// Where to write the generated source
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// More logging (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let level = match opts.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut cfg = match &opts.config {
        Some(path) => GenConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GenConfig::default(),
    };
    if let Some(table) = opts.table {
        cfg.table = table;
    }
    if let Some(template) = opts.template {
        cfg.template = template;
    }
    if let Some(output) = opts.output {
        cfg.output = output;
    }

    let report = gb_instrgen::run(&cfg)
        .with_context(|| format!("generating {}", cfg.output.display()))?;
    println!(
        "{}: {} cases ({} defined, {} undefined, {} hand-written)",
        cfg.output.display(),
        report.cases,
        report.defined,
        report.undefined,
        report.excluded
    );
    Ok(())
}
