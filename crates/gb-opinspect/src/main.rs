use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use gb_instrgen::driver::load_normalized;
use gb_opinspect::{describe_case, parse_opcode, summarize, text_listing};

#[derive(Parser, Debug)]
#[command(author, version, about = "Game Boy opcode table inspector", long_about = None)]
struct Cli {
    /// Opcode table (512 records)
    #[arg(long, value_name = "JSON", default_value = "instruction-data.json")]
    table: PathBuf,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized table
    Dump {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Print the generated case for one opcode (hex or dec; CB xx is 0x1xx)
    Case { opcode: String },
    /// Count opcodes per category
    Summary {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let set = load_normalized(&cli.table)
        .with_context(|| format!("loading {}", cli.table.display()))?;

    match cli.cmd {
        Command::Dump { format, out } => {
            let text = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&set)?,
                OutputFormat::Text => text_listing(&set).join("\n"),
            };
            if let Some(path) = out {
                std::fs::write(path, text)?;
            } else {
                println!("{text}");
            }
        }
        Command::Case { opcode } => {
            let opcode = parse_opcode(&opcode)?;
            for line in describe_case(&set, opcode)? {
                println!("{line}");
            }
        }
        Command::Summary { format } => {
            let s = summarize(&set);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&s)?),
                OutputFormat::Text => {
                    for (cat, n) in &s.by_category {
                        println!("  {cat:<12} {n}");
                    }
                    println!("  {:<12} {}", "undefined", s.undefined);
                    println!("  {:<12} {}", "hand-written", s.excluded);
                }
            }
        }
    }

    Ok(())
}
