//! # tezza-quote
//!
//! Command-line quote preview for the Tezza pricing engine.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tezza-quote quote <FILE> [--pretty]   price a JSON request file        │
//! │  tezza-quote price --base-cost <CENTS> unit price for one product      │
//! │  tezza-quote tiers                     volume discount table            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rates come from `TEZZA_*` environment variables (see
//! [`tezza_orders::EngineConfig`]). Logs go to stderr, results to stdout.

mod request;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tezza_core::pricing::{self, VOLUME_TIERS};
use tezza_core::{Money, Percentage, ProductCost};
use tezza_orders::{EngineConfig, OrderService};

use crate::request::QuoteFile;

#[derive(Parser)]
#[command(name = "tezza-quote", version, about = "Price custom-goods orders")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Price the items in a JSON request file
    Quote {
        /// Path to the request file
        file: PathBuf,

        /// Pretty-print the quote
        #[arg(long)]
        pretty: bool,
    },

    /// Show the unit price of a single product at a quantity
    Price {
        /// Material cost per unit, in cents
        #[arg(long)]
        base_cost: i64,

        #[arg(long, default_value_t = 1)]
        quantity: i64,

        /// Overhead percentage; defaults to the configured overhead
        #[arg(long)]
        overhead: Option<Decimal>,

        /// Customization surcharge per unit, in cents
        #[arg(long, default_value_t = 0)]
        customization_cost: i64,

        /// Include the customization surcharge
        #[arg(long)]
        customized: bool,
    },

    /// Print the volume discount tiers
    Tiers,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = EngineConfig::load().context("Invalid TEZZA_* configuration")?;

    match cli.command {
        Command::Quote { file, pretty } => quote(&file, pretty, config),
        Command::Price {
            base_cost,
            quantity,
            overhead,
            customization_cost,
            customized,
        } => {
            let cost = ProductCost {
                base_cost: Money::from_cents(base_cost),
                overhead_percentage: overhead
                    .map(Percentage::new)
                    .unwrap_or(config.pricing.default_overhead_percentage),
                labor_hours: Decimal::ZERO,
                customization_cost: Money::from_cents(customization_cost),
            };
            price(&cost, quantity, customized, &config)
        }
        Command::Tiers => {
            tiers();
            Ok(())
        }
    }
}

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn quote(file: &Path, pretty: bool, config: EngineConfig) -> Result<()> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let default_overhead = config.pricing.default_overhead_percentage;
    let (catalog, request) = QuoteFile::parse(&json)?.into_parts(default_overhead)?;

    let service = OrderService::new(catalog, config);
    let quote = service.quote(&request)?;

    info!(
        lines = quote.lines.len(),
        total = %quote.totals.total_amount,
        margin = %quote.profit_margin,
        "Quote ready"
    );

    let output = if pretty {
        serde_json::to_string_pretty(&quote)?
    } else {
        serde_json::to_string(&quote)?
    };
    println!("{output}");
    Ok(())
}

fn price(cost: &ProductCost, quantity: i64, customized: bool, config: &EngineConfig) -> Result<()> {
    let unit = pricing::unit_price(cost, quantity, customized)?;
    let discount = pricing::volume_discount_percentage(quantity)?;
    let retail = pricing::suggested_retail_price(cost, config.pricing.target_margin)?;
    let margin = pricing::profit_margin(unit, Money::from_decimal(cost.loaded_cost()));
    let line_total = pricing::line_total(unit, quantity)?;

    println!("unit price:       {unit}");
    println!("line total:       {line_total}");
    println!("volume discount:  {discount}");
    println!("margin at price:  {margin}%");
    println!(
        "suggested retail: {retail} ({} margin)",
        config.pricing.target_margin
    );
    Ok(())
}

fn tiers() {
    for tier in VOLUME_TIERS {
        let range = match tier.max_quantity {
            Some(max) => format!("{}-{}", tier.min_quantity, max),
            None => format!("{}+", tier.min_quantity),
        };
        let discount = Percentage::new(tier.discount * Decimal::ONE_HUNDRED);
        println!("{range:>8}  {discount}");
    }
}
