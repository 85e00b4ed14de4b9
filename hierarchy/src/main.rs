//! Hierarchy CLI - Build the company hierarchy document
//!
//! # Main Command
//!
//! ```bash
//! hierarchy                          # data/DearTechPeople-Data.csv → json/data_hierarchy.json
//! hierarchy --entries plain --unrooted -o -
//! ```
//!
//! Every build flag can also come from the environment (or a `.env` file),
//! e.g. `HIERARCHY_INPUT`, `HIERARCHY_OUTPUT`, `HIERARCHY_ZERO_COUNTS`.
//!
//! # Debug Commands
//!
//! ```bash
//! hierarchy parse input.csv          # Just parse CSV to JSON rows
//! hierarchy validate output.json     # Check a document against the hierarchy schema
//! ```

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use hierarchy::logs::{log_error, log_info, log_success, LogFormat, LOGGER};
use hierarchy::{
    format_delimiter, parse_bytes, render_document, run, validate_hierarchy, write_document, BuildOptions,
    EntryStyle, HierarchyConfig, HierarchyTree, ZeroCountPolicy, DEFAULT_ROOT_NAME,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_INPUT: &str = "data/DearTechPeople-Data.csv";
const DEFAULT_OUTPUT: &str = "json/data_hierarchy.json";

/// Output path meaning "write to stdout".
const STDOUT_PATH: &str = "-";

#[derive(Parser)]
#[command(name = "hierarchy")]
#[command(about = "Group the DearTechPeople company table into a sector / customer base hierarchy", long_about = None)]
struct Cli {
    #[command(flatten)]
    build: BuildArgs,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format (text or json)
    #[arg(long, global = true, env = "HIERARCHY_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct BuildArgs {
    /// Input CSV file
    #[arg(short, long, env = "HIERARCHY_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output JSON file ("-" for stdout)
    #[arg(short, long, env = "HIERARCHY_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long, env = "HIERARCHY_DELIMITER")]
    delimiter: Option<char>,

    /// Company entries: plain names or gender percentages
    #[arg(long, env = "HIERARCHY_ENTRIES", default_value = "gender")]
    entries: EntryStyle,

    /// Name of the root node
    #[arg(long, env = "HIERARCHY_ROOT_NAME", default_value = DEFAULT_ROOT_NAME)]
    root_name: String,

    /// Emit the sector list without a root node
    #[arg(
        long,
        env = "HIERARCHY_UNROOTED",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    unrooted: bool,

    /// Companies with zero male and zero female employees: reject, zero or even
    #[arg(long, env = "HIERARCHY_ZERO_COUNTS", default_value = "reject")]
    zero_counts: ZeroCountPolicy,

    /// Skip schema validation of the document
    #[arg(long)]
    no_validate: bool,
}

impl BuildArgs {
    fn config(&self) -> HierarchyConfig {
        let config = HierarchyConfig::default()
            .with_entries(self.entries)
            .with_zero_counts(self.zero_counts);

        if self.unrooted {
            config.unrooted()
        } else {
            config.with_root_name(self.root_name.clone())
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV file and output its rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a hierarchy JSON document against the schema
    Validate {
        /// Input JSON file
        input: PathBuf,
    },
}

fn main() {
    // Load .env file (if present) before clap reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOGGER.set_quiet(cli.quiet);
    LOGGER.set_format(cli.log_format);

    let result = match cli.command {
        Some(Commands::Parse {
            input,
            delimiter,
            output,
        }) => cmd_parse(&input, delimiter, output.as_deref()),

        Some(Commands::Validate { input }) => cmd_validate(&input),

        None => cmd_build(&cli.build),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_build(args: &BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = BuildOptions {
        delimiter: args.delimiter,
        config: args.config(),
        skip_validation: args.no_validate,
    };

    let output = if args.output == Path::new(STDOUT_PATH) {
        None
    } else {
        Some(args.output.as_path())
    };

    run(&args.input, output, &options)?;

    log_success("✨ Done!");
    Ok(())
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("📄 Parsing CSV: {}", input.display()));

    let bytes = fs::read(input)?;
    let result = parse_bytes(&bytes, delimiter)?;

    log_info(format!("Encoding: {}", result.encoding));
    log_info(format!(
        "Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    ));
    log_info(format!("Columns: {}", result.headers.join(", ")));
    log_success(format!("Parsed {} records", result.records.len()));

    let json = render_document(&result.records)?;
    write_document(&json, output)?;

    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("✔️  Validating: {}", input.display()));

    let content = fs::read_to_string(input)?;
    let document: Value = serde_json::from_str(&content)?;

    if let Err(errors) = validate_hierarchy(&document) {
        for err in errors.iter().take(5) {
            log_error(err.as_str());
        }
        return Err(format!("{} schema violation(s)", errors.len()).into());
    }

    let tree: HierarchyTree = serde_json::from_value(document)?;
    let stats = tree.stats();
    log_success(format!(
        "Valid hierarchy: {} sectors, {} customer bases, {} companies",
        stats.sectors, stats.customer_bases, stats.companies
    ));

    Ok(())
}
