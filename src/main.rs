//! OddsEngine - Command line entry point
//!
//! Runs the engine's calculators from the shell: odds conversion, single
//! wager payout, arbitrage stake split and drop classification.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use odds_engine::config::load_config;
use odds_engine::odds::{compute_drop, OddsSnapshot};
use odds_engine::{
    ArbitrageStakeDistributor, BettingCalculator, DecimalOdds, DropThreshold, MovementDetector,
    OddsConverter, OddsFormat, RawOdds,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "ODDS_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert raw odds into every format
    Convert {
        /// Raw odds, e.g. 2.50, +150, -200, 3/2
        raw: String,
        /// Format of bare numbers in the input
        #[arg(long)]
        from: Option<OddsFormat>,
    },
    /// Return and profit of a single wager
    Payout {
        #[arg(long)]
        stake: Decimal,
        /// Raw odds in any format
        #[arg(long, allow_hyphen_values = true)]
        odds: String,
    },
    /// Equal-return stake split across all outcomes of a market
    Arb {
        /// Total stake; defaults to the configured calculator stake
        #[arg(long)]
        stake: Option<Decimal>,
        /// Best decimal odds per outcome
        #[arg(required = true, num_args = 2..)]
        odds: Vec<Decimal>,
    },
    /// Drop percentage between two prices
    Drop {
        #[arg(long)]
        previous: Decimal,
        #[arg(long)]
        current: Decimal,
        /// Threshold in percent; defaults to the configured threshold
        #[arg(long)]
        threshold: Option<Decimal>,
    },
}

fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = load_config(Some(&args.config))?;

    // Initialize logging
    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Configuration file: {}", args.config);

    let output = match args.command {
        Command::Convert { raw, from } => {
            let guess = from.or(config.odds.source_format_guess);
            let odds = OddsConverter::to_decimal(&RawOdds::from(raw.as_str()), guess);
            info!("Converting {:?} (valid: {})", raw, odds.is_some());
            json!({
                "input": raw,
                "decimal": OddsConverter::format_in_format(odds, OddsFormat::Decimal),
                "moneyline": OddsConverter::format_in_format(odds, OddsFormat::Moneyline),
                "fractional": OddsConverter::format_in_format(odds, OddsFormat::Fractional),
                "display": OddsConverter::format_in_format(odds, config.odds.display_format),
            })
        }
        Command::Payout { stake, odds } => {
            let decimal = parse_odds(&odds, config.odds.source_format_guess)?;
            let wager = BettingCalculator::calculate_with_odds(stake, decimal)?;
            serde_json::to_value(wager)?
        }
        Command::Arb { stake, odds } => {
            let total = stake.unwrap_or(config.arbitrage.default_total_stake);
            let opportunity = ArbitrageStakeDistributor::distribute(&odds, total)?;
            let sure_bet = opportunity.is_sure_bet();
            info!(
                "{}-way market, profit {}%",
                odds.len(),
                opportunity.profit_percent.round_dp(2)
            );
            json!({
                "sure_bet": sure_bet,
                "opportunity": opportunity.rounded(config.arbitrage.money_decimal_places),
            })
        }
        Command::Drop {
            previous,
            current,
            threshold,
        } => {
            let threshold = threshold
                .map(DropThreshold::new)
                .unwrap_or(config.movement.default_threshold);
            let snapshot = OddsSnapshot::new(DecimalOdds::new(previous)?, DecimalOdds::new(current)?);
            let detector = MovementDetector::new(threshold);
            json!({
                "drop_percent": compute_drop(previous, current),
                "is_drop": snapshot.is_drop(),
                "threshold": threshold.percent(),
                "significant": detector.is_significant(&snapshot),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_odds(raw: &str, guess: Option<OddsFormat>) -> Result<DecimalOdds> {
    OddsConverter::to_decimal(&RawOdds::from(raw), guess)
        .ok_or_else(|| anyhow!("invalid odds: {:?}", raw))
}
