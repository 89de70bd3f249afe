//! rbiclean CLI - bank branch directory cleaner
//!
//! A command-line tool for normalizing and combining IFSC/MICR directory
//! sheets into a single master CSV.

mod logging;

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use logging::{init_logging, LogConfig, LogFormat};
use rbiclean::{
    combine_csvs, normalize_line, AbbreviationTable, Normalizer, ProcessOptions, RawRecord,
    SubstitutionFilterSet,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const DEFAULT_MASTER: &str = "master.csv";

/// Clean and combine bank branch directory sheets
#[derive(Parser)]
#[command(
    name = "rbiclean",
    version,
    about = "Clean and combine bank branch directory sheets",
    long_about = "rbiclean - normalizes IFSC/MICR bank branch directory sheets.\n\n\
                  Reads nine-column CSV sheets (BANK, IFSC, MICR, BRANCH, ADDRESS,\n\
                  CONTACT, CITY, DISTRICT, STATE), cleans every field and writes one\n\
                  combined master CSV with an ABBREVIATION column.\n\n\
                  Usage:\n  \
                  rbiclean <csv_dir>                Combine into master.csv\n  \
                  rbiclean <csv_dir> <master>       Combine into <master>\n  \
                  rbiclean line --address <text>    Clean a single address line"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory of CSV sheets (for default combine)
    #[arg(global = false)]
    input: Option<PathBuf>,

    /// Master CSV path (for default combine)
    #[arg(global = false)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine every sheet in a directory into one master CSV (default command)
    Combine {
        /// Directory of CSV sheets
        input: PathBuf,

        /// Master CSV path (default: master.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        tables: TableArgs,

        /// Skip malformed rows instead of failing
        #[arg(long)]
        lenient: bool,

        /// Disable parallel processing
        #[arg(long)]
        sequential: bool,

        /// Keep non-ASCII characters in input cells
        #[arg(long)]
        keep_unicode: bool,
    },

    /// Normalize a single line of text
    Line {
        /// Text to normalize
        text: String,

        /// Apply address rules (keywords, duplicate clauses, ordinals)
        #[arg(short, long)]
        address: bool,
    },

    /// Normalize one record and print it as JSON
    Record {
        /// The nine fields: BANK IFSC MICR BRANCH ADDRESS CONTACT CITY DISTRICT STATE
        #[arg(
            num_args = 9,
            value_names = [
                "BANK", "IFSC", "MICR", "BRANCH", "ADDRESS", "CONTACT", "CITY", "DISTRICT", "STATE"
            ]
        )]
        fields: Vec<String>,

        #[command(flatten)]
        tables: TableArgs,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Look up the abbreviation of a bank name
    Lookup {
        /// Bank name
        name: String,

        /// Abbreviation table (JSON); the bundled table when omitted
        #[arg(long)]
        banks: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Lookup table locations shared by several commands.
#[derive(clap::Args, Default)]
struct TableArgs {
    /// Abbreviation table (JSON); the bundled table when omitted
    #[arg(long)]
    banks: Option<PathBuf>,

    /// Substitution filters (JSON); none when omitted
    #[arg(long)]
    filters: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_ansi(!cli.no_color);
    if let Err(e) = init_logging(&config) {
        eprintln!("{}: {}", "Warning".yellow().bold(), e);
    }

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Handle default command (rbiclean <csv_dir> [master])
    let Some(command) = cli.command else {
        if let Some(input) = cli.input {
            let output = cli.output.unwrap_or_else(|| PathBuf::from(DEFAULT_MASTER));
            return run_combine(&input, &output, &TableArgs::default(), ProcessOptions::default());
        }

        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Combine {
            input,
            output,
            tables,
            lenient,
            sequential,
            keep_unicode,
        } => {
            let mut options = ProcessOptions::new();
            if lenient {
                options = options.lenient();
            }
            if sequential {
                options = options.sequential();
            }
            if keep_unicode {
                options = options.keep_unicode();
            }

            let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_MASTER));
            run_combine(&input, &output, &tables, options)?;
        }

        Commands::Line { text, address } => {
            write_output(&normalize_line(&text, address))?;
        }

        Commands::Record {
            fields,
            tables,
            compact,
        } => {
            let normalizer = tables.load()?;
            let raw = RawRecord::from_fields(fields, 1)?;
            let clean = normalizer.normalize(&raw);

            let json = if compact {
                serde_json::to_string(&clean)?
            } else {
                serde_json::to_string_pretty(&clean)?
            };
            write_output(&json)?;
        }

        Commands::Lookup { name, banks } => {
            let table = load_table(banks.as_deref())?;
            let abbreviation = rbiclean::get_abbreviation(&normalize_line(&name, false), &table);

            if abbreviation.is_empty() {
                println!("{} No abbreviation for {}", "!".yellow().bold(), name);
            } else {
                write_output(&abbreviation)?;
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

impl TableArgs {
    fn load(&self) -> rbiclean::Result<Normalizer> {
        let mut normalizer = Normalizer::new(load_table(self.banks.as_deref())?);
        if let Some(path) = &self.filters {
            normalizer = normalizer.with_filters(SubstitutionFilterSet::from_path(path)?);
        }
        Ok(normalizer)
    }
}

fn load_table(path: Option<&Path>) -> rbiclean::Result<AbbreviationTable> {
    match path {
        Some(path) => AbbreviationTable::from_path(path),
        None => AbbreviationTable::builtin(),
    }
}

/// Run the combine command - cleans every sheet into one master file
fn run_combine(
    input: &Path,
    output: &Path,
    tables: &TableArgs,
    options: ProcessOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = create_spinner("Loading tables...");
    let normalizer = tables.load()?;

    pb.set_message(format!("Combining sheets in {}...", input.display()));
    let result = combine_csvs(input, output, &normalizer, &options);
    pb.finish_and_clear();
    let summary = result?;

    // Print summary
    println!("{}", "Combine Complete".green().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Output".bold(), output.display());
    println!("  {} {} sheets", "✓".green(), summary.files);
    println!("  {} {} rows written", "✓".green(), summary.rows_written);
    if summary.rows_skipped > 0 {
        println!("  {} {} malformed rows skipped", "!".yellow(), summary.rows_skipped);
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "rbiclean".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Bank branch directory (IFSC/MICR) normalizer");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(content: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command() {
        let cli = Cli::try_parse_from(["rbiclean", "sheets"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.input, Some(PathBuf::from("sheets")));
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_record_needs_nine_fields() {
        assert!(Cli::try_parse_from(["rbiclean", "record", "a", "b"]).is_err());

        let cli = Cli::try_parse_from([
            "rbiclean", "record", "1", "2", "3", "4", "5", "6", "7", "8", "9", "--compact",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Record { ref fields, compact: true, .. }) if fields.len() == 9
        ));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["rbiclean", "line", "x", "-vv", "--log-format", "json"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_no_color_flag() {
        let cli = Cli::try_parse_from(["rbiclean", "sheets", "--no-color"]).unwrap();
        assert!(cli.no_color);
        assert_eq!(cli.input, Some(PathBuf::from("sheets")));

        let cli = Cli::try_parse_from(["rbiclean", "lookup", "--no-color", "uco bank"]).unwrap();
        assert!(cli.no_color);
    }
}
