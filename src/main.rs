use std::path::PathBuf;
use std::time::Duration;

use chainscan::chain::{ChainSet, QuoteCurrencies};
use chainscan::config::Config;
use chainscan::exchange::Exchange;
use chainscan::snapshot;
use chainscan::utils::logger::setup_logger;
use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use log::info;

/// Discovers the canonical trading chains of an exchange snapshot
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Exchange snapshot to read (JSON)
    #[arg(short, long, default_value = "snapshot.json")]
    snapshot: PathBuf,

    /// Main quote currency, overrides CHAINSCAN_MAIN_QUOTE_CURRENCY
    #[arg(long)]
    main_quote: Option<String>,

    /// Longest chain to search for, overrides CHAINSCAN_MAX_CHAIN_LENGTH
    #[arg(long)]
    max_length: Option<usize>,

    /// Time budget of the pass in milliseconds, overrides CHAINSCAN_DEADLINE_MS
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// What to print, chains by default
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output modes
#[derive(Subcommand)]
enum Commands {
    /// Discover and print every canonical chain (default)
    Chains,
    /// Print the quote currencies of the exchange
    Quotes,
}

impl Cli {
    /// Applies the command line overrides on top of the environment
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env_unvalidated()?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Overwrites the values given on the command line
    fn apply(&self, config: &mut Config) {
        if let Some(currency) = &self.main_quote {
            config.main_quote_currency.clone_from(currency);
        }
        if let Some(length) = self.max_length {
            config.max_chain_length = length;
        }
        if self.deadline_ms.is_some() {
            config.deadline_ms = self.deadline_ms;
        }
    }
}

/// Prints every chain, one per line or as a JSON array
fn print_chains(chains: &ChainSet, json: bool) -> Result<()> {
    if json {
        let chains = chains.values().collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&chains)?);
        return Ok(());
    }
    for chain in chains.values() {
        println!("{chain}");
    }
    println!("\nFound {} chains", chains.len());
    Ok(())
}

/// Prints both quote currency sets
fn print_quotes(quotes: &QuoteCurrencies, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "all": quotes.all_quote_currencies(),
            "quote": quotes.quote_currencies(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    println!(
        "All quote currencies: {}",
        quotes.all_quote_currencies().iter().join(", ")
    );
    println!(
        "Quote currencies:     {}",
        quotes.quote_currencies().iter().join(", ")
    );
    Ok(())
}

/// Runs the discovery pass behind a progress bar
fn discover(exchange: &Exchange, config: &Config) -> Result<ChainSet> {
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?,
    );
    progress.enable_steady_tick(Duration::from_millis(100));

    let chains = exchange.create_chains_with(config, |step| {
        progress.set_length(step.total as u64);
        progress.set_position(step.step as u64);
        progress.set_message(format!("length {} from {}", step.depth, step.currency));
    });
    progress.finish_and_clear();

    chains.wrap_err_with(|| format!("Chain discovery failed on {}", exchange.name()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;
    setup_logger(config.log_level)?;

    info!(
        "Scanning {} with main quote currency {} up to length {}",
        config.exchange, config.main_quote_currency, config.max_chain_length
    );
    let exchange = snapshot::load(&cli.snapshot, &config.exchange)?;

    match cli.command {
        Some(Commands::Quotes) => print_quotes(&exchange.quote_currencies(), cli.json)?,
        Some(Commands::Chains) | None => {
            let chains = discover(&exchange, &config)?;
            print_chains(&chains, cli.json)?;
        }
    }

    Ok(())
}
