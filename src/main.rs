//! Hoku - Main entrypoint.
//!
//! Command-line front end for building, querying and inspecting persisted
//! Bloom filters. It loads configuration, initializes the logging system and
//! dispatches the requested subcommand.

use clap::{Parser, Subcommand};
use hoku_lib::config::{ConfigLoader, FilterSettings, HokuConfig, LogConfig, Validate, ENV_PREFIX};
use hoku_lib::data_structures::hoku_bloom_filter::HokuBloomFilter;
use hoku_lib::error::{HokuError, HokuResult};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for Hoku.
#[derive(Parser, Debug)]
#[clap(name = "hoku", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser, global = true)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Build a filter from newline-delimited elements and persist it
    Create {
        /// Path of the filter file to write
        #[clap(short, long, value_parser)]
        output: PathBuf,

        /// File with one element per line, stdin when omitted
        #[clap(short, long, value_parser)]
        input: Option<PathBuf>,

        /// Number of elements the filter is designed for
        #[clap(long)]
        capacity: Option<u32>,

        /// Target false positive rate
        #[clap(long, conflicts_with = "size_bytes")]
        probability: Option<f64>,

        /// Explicit size of the bit store in bytes
        #[clap(long, requires = "hashes")]
        size_bytes: Option<usize>,

        /// Explicit number of probes per element
        #[clap(long, requires = "size_bytes")]
        hashes: Option<usize>,
    },

    /// Check elements against a persisted filter
    Query {
        /// Path of the filter file to read
        #[clap(short, long, value_parser)]
        filter: PathBuf,

        /// Elements to look up
        #[clap(required = true)]
        elements: Vec<String>,
    },

    /// Print the parameters and load of a persisted filter as JSON
    Inspect {
        /// Path of the filter file to read
        #[clap(short, long, value_parser)]
        filter: PathBuf,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system.
///
/// Log records go to stderr so command output on stdout stays machine readable.
fn init_logging(log: &LogConfig) -> HokuResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_line_number(log.source_location)
        .with_file(log.source_location)
        .with_thread_names(true);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.pretty().finish())
    };

    result.map_err(|e| HokuError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

/// Main entry point for the application.
fn main() -> ExitCode {
    let args = Args::parse();
    let loader = ConfigLoader::new(args.config.as_deref(), ENV_PREFIX);

    let result = match loader.load() {
        Ok(config) => init_logging(&config.log).and_then(|()| run(args.command, config)),
        Err(e) => {
            // Logging falls back to defaults so the failure is still reported
            let _ = init_logging(&LogConfig::default());
            Err(e.into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(command: Command, config: HokuConfig) -> HokuResult<()> {
    match command {
        Command::Create {
            output,
            input,
            capacity,
            probability,
            size_bytes,
            hashes,
        } => {
            let settings = FilterSettings {
                expected_items: capacity.unwrap_or(config.filter.expected_items),
                false_positive_rate: probability.unwrap_or(config.filter.false_positive_rate),
                size_bytes: size_bytes.or(config.filter.size_bytes),
                hash_count: hashes.or(config.filter.hash_count),
                max_memory_bytes: config.filter.max_memory_bytes,
            };
            // An explicit rate on the command line wins over configured explicit sizing
            let settings = match probability {
                Some(_) => FilterSettings {
                    size_bytes: None,
                    hash_count: None,
                    ..settings
                },
                None => settings,
            };
            settings.validate()?;
            create(&settings, input.as_deref(), &output)
        }
        Command::Query { filter, elements } => {
            let filter = load_filter(&filter)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for element in elements {
                let verdict = if filter.might_contain(element.as_bytes())? {
                    "maybe"
                } else {
                    "absent"
                };
                writeln!(out, "{element}\t{verdict}")?;
            }
            Ok(())
        }
        Command::Inspect { filter } => {
            let summary = load_filter(&filter)?.summary();
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Command::Validate => {
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            info!("Generating default configuration");
            let toml = HokuConfig::default().to_toml()?;

            create_parent_dirs(&output)?;
            std::fs::write(&output, toml)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}

fn create(settings: &FilterSettings, input: Option<&Path>, output: &Path) -> HokuResult<()> {
    let filter = HokuBloomFilter::with_config(settings.to_filter_config())?;
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };

    for line in reader.split(b'\n') {
        let mut element = line?;
        if element.last() == Some(&b'\r') {
            element.pop();
        }
        if !element.is_empty() {
            filter.add(&element)?;
        }
    }

    create_parent_dirs(output)?;
    let mut writer = BufWriter::new(File::create(output)?);
    filter.write_to(&mut writer)?;
    writer.flush()?;

    info!(
        elements = filter.current_count(),
        bit_capacity = filter.bit_capacity(),
        hash_count = filter.hash_count(),
        "Filter written to {:?}",
        output
    );
    Ok(())
}

fn load_filter(path: &Path) -> HokuResult<HokuBloomFilter> {
    let filter = HokuBloomFilter::read_from(BufReader::new(File::open(path)?))?;
    Ok(filter)
}

fn create_parent_dirs(path: &Path) -> HokuResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
