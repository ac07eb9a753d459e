//! clibra CLI - local store of 1-second candles built from exchange trade archives.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clibra_lib::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "clibra")]
#[command(about = "Build and query a local store of 1-second candles", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Store root directory. Defaults to ~/.clibra
    #[arg(long, env = "CLIBRA_HOME", global = true)]
    root: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch trades and store 1-second candles for every missing day
    Update {
        /// Exchange identifier (e.g., bybit)
        exchange: String,

        /// Symbol as listed by the exchange (e.g., BTCUSDT)
        symbol: String,

        /// First day (YYYYMMDD or YYYY-MM-DD)
        begin: String,

        /// Last day, inclusive (YYYYMMDD or YYYY-MM-DD)
        end: String,

        /// Days processed concurrently
        #[arg(long, default_value_t = UpdateOptions::DEFAULT_WORKERS)]
        workers: usize,
    },

    /// Run every update listed in a procedure file
    UpdateFrom {
        /// File with one `exchange symbol begin end` line per update
        file: PathBuf,

        /// Days processed concurrently
        #[arg(long, default_value_t = UpdateOptions::DEFAULT_WORKERS)]
        workers: usize,
    },

    /// Resample stored days into one file of candles
    Generate {
        /// Exchange identifier (e.g., bybit)
        exchange: String,

        /// Symbol as listed by the exchange (e.g., BTCUSDT)
        symbol: String,

        /// First day (YYYYMMDD or YYYY-MM-DD)
        begin: String,

        /// Last day, inclusive (YYYYMMDD or YYYY-MM-DD)
        end: String,

        /// Candle width: seconds, or with a unit suffix (90s, 5m, 1h, 1d)
        interval: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::CsvGz)]
        format: Format,
    },

    /// Run every generate listed in a procedure file
    GenerateFrom {
        /// File with one `exchange symbol begin end interval` line per export
        file: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::CsvGz)]
        format: Format,
    },

    /// Delete stored days
    Remove {
        /// Exchange identifier (e.g., bybit)
        exchange: String,

        /// Symbol as listed by the exchange (e.g., BTCUSDT)
        symbol: String,

        /// First day (YYYYMMDD or YYYY-MM-DD)
        begin: String,

        /// Last day, inclusive (YYYYMMDD or YYYY-MM-DD)
        end: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show disk usage and stored date coverage
    Show,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let store = PartitionStore::new(cli.root.map_or_else(StoreConfig::default, StoreConfig::new));
    let quiet = cli.quiet;

    match command {
        Commands::Update {
            exchange,
            symbol,
            begin,
            end,
            workers,
        } => {
            let request = UpdateRequest::parse(&exchange, &symbol, &begin, &end)?;
            commands::update::update(&store, vec![request], workers, quiet).await
        }
        Commands::UpdateFrom { file, workers } => {
            let text = read_procedure_file(&file)?;
            let requests = parse_update_procedure(&text)?;
            commands::update::update(&store, requests, workers, quiet).await
        }
        Commands::Generate {
            exchange,
            symbol,
            begin,
            end,
            interval,
            output_dir,
            format,
        } => {
            let request =
                GenerateRequest::parse(&exchange, &symbol, &begin, &end, &interval, output_dir)?
                    .with_format(format.into());
            commands::generate::generate(&store, vec![request], quiet).await
        }
        Commands::GenerateFrom {
            file,
            output_dir,
            format,
        } => {
            let text = read_procedure_file(&file)?;
            let requests = parse_generate_procedure(&text, &output_dir, format.into())?;
            commands::generate::generate(&store, requests, quiet).await
        }
        Commands::Remove {
            exchange,
            symbol,
            begin,
            end,
            yes,
        } => {
            let request = RemoveRequest::parse(&exchange, &symbol, &begin, &end)?;
            commands::remove::remove(&store, &request, yes, quiet)
        }
        Commands::Show => commands::show::show(&store),
    }
}
