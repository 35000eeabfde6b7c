//! sqlscalar command-line interface

use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlscalar::cli::aggregate::{self, AggregateConfig};
use sqlscalar::cli::convert::{self, ConvertAs, ConvertConfig};
use sqlscalar::cli::output::{self, ColorMode, OutputFormat};
use sqlscalar::cli::{load_options, types};
use sqlscalar::temporal::RoundMode;
use sqlscalar::types::{install, TypeRegistry};
use std::path::PathBuf;

/// SQL scalar type tool
#[derive(Parser)]
#[command(name = "sqlscalar")]
#[command(author, version, about = "SQL scalar type aggregation and temporal conversion", long_about = None)]
struct Cli {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Pretty, global = true)]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    /// Temporal conversion options (JSON file)
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered types
    Types,

    /// Aggregate operand types for a purpose
    Aggregate {
        /// result, comparison, min_max, num_op, add, subtract, multiply, divide, modulo
        #[arg(short, long, default_value = "result")]
        purpose: String,

        /// Operand type names
        #[arg(required = true, num_args = 2..)]
        operands: Vec<String>,
    },

    /// Convert a literal to a temporal value
    Convert {
        /// How to read the literal
        #[arg(short = 'a', long = "as", value_enum, default_value_t = ConvertAs::Text)]
        convert_as: ConvertAs,

        /// Rounding mode (none, truncate, round)
        #[arg(short, long)]
        round: Option<RoundMode>,

        /// Fractional second digits (0-6)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=6))]
        decimals: Option<u8>,

        /// Literal to convert
        #[arg(allow_hyphen_values = true)]
        literal: String,
    },
}

fn run(cli: Cli) -> Result<()> {
    install(TypeRegistry::with_extensions()?);
    let registry = sqlscalar::types::global();

    match cli.command {
        Commands::Types => {
            let report = types::types_report(&registry);
            output::print_output(&report, cli.format, cli.output.as_deref())
        }

        Commands::Aggregate { purpose, operands } => {
            let config = AggregateConfig { purpose, operands };
            let report = aggregate::aggregate_report(&registry, &config)?;
            output::print_output(&report, cli.format, cli.output.as_deref())
        }

        Commands::Convert {
            convert_as,
            round,
            decimals,
            literal,
        } => {
            let config = ConvertConfig {
                literal,
                convert_as,
                round,
                decimals,
                options: load_options(cli.options.as_deref())?,
            };
            let report = convert::convert(&config)?;
            for diagnostic in &report.diagnostics {
                eprintln!("{}", diagnostic.to_colored_string());
            }
            output::print_output(&report.value, cli.format, cli.output.as_deref())
        }
    }
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    output::setup_colors(cli.color);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
