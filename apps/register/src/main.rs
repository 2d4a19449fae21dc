//! # till-register CLI
//!
//! Drives a register from the shell. The cart and ledger persist between
//! invocations, so a sale can be rung up one command at a time.
//!
//! ```sh
//! till-register add "Salty Peanut"
//! till-register add "Caribbean"
//! till-register status
//! till-register commit          # writes sale_<date>_<time>.csv
//! till-register export-daily    # writes daily_sales_<date>.csv
//! till-register reset-day
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

use till_core::{ProductCatalogEntry, SortDirection};
use till_register::telemetry::init_tracing;
use till_register::{Register, RegisterConfig, RegisterError, RegisterResult};

#[derive(Parser, Debug)]
#[command(name = "till-register", version, about = "Single-till cart and sales ledger")]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "TILL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the cart and the number of recorded sales.
    Status,
    /// Search the catalog by name or brand.
    Search {
        #[arg(default_value = "")]
        term: String,
        /// Cheapest first instead of most expensive first.
        #[arg(long)]
        ascending: bool,
    },
    /// Add one unit of a catalog product to the cart.
    Add { name: String },
    /// Remove one unit of a product from the cart.
    Remove { name: String },
    /// Record the cart as a sale and export it.
    Commit,
    /// Export the per-product summary of all recorded sales.
    ExportDaily,
    /// Empty the cart without recording it.
    ResetCart,
    /// Clear every recorded sale.
    ResetDay,
    /// Validate the configuration and exit.
    Check,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> RegisterResult<()> {
    let config = RegisterConfig::load(cli.config)?;

    if let Command::Check = cli.command {
        println!("{config:#?}");
        return Ok(());
    }

    let mut register = Register::open(&config)?;

    match cli.command {
        Command::Status => print_status(&register),
        Command::Search { term, ascending } => {
            let direction = if ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            let catalog = register.catalog().ok_or_else(no_catalog)?;
            let exporter = register.ledger().exporter();
            for product in catalog.filter(&term, direction) {
                let price = exporter.format_money(product.price);
                println!("{price:>12}  {} / {}", product.brand, product.name);
            }
        }
        Command::Add { name } => {
            let product = register
                .product(&name)
                .cloned()
                .ok_or_else(|| unknown_product(&name))?;
            let quantity = register.increase(&product);
            println!("{name}: {quantity}");
        }
        Command::Remove { name } => {
            let product = match register.product(&name).cloned() {
                Some(product) => product,
                None => register
                    .cart()
                    .lines()
                    .iter()
                    .find(|line| line.name == name)
                    .map(|line| ProductCatalogEntry::new(&line.brand, &line.name, line.price()))
                    .ok_or_else(|| unknown_product(&name))?,
            };
            let quantity = register.decrease(&product);
            println!("{name}: {quantity}");
        }
        Command::Commit => match register.commit() {
            Some(receipt) => println!(
                "{} ({} lines, {})",
                receipt.export.filename,
                receipt.entries.len(),
                register.ledger().exporter().format_money(receipt.grand_total())
            ),
            None => println!("Cart is empty"),
        },
        Command::ExportDaily => match register.export_daily() {
            Some(export) => println!("{}", export.filename),
            None => println!("No sales recorded"),
        },
        Command::ResetCart => register.reset_cart(),
        Command::ResetDay => register.reset_day(),
        Command::Check => {}
    }

    Ok(())
}

fn print_status(register: &Register) {
    let exporter = register.ledger().exporter();
    for group in register.cart().grouped_by_brand() {
        println!("{}  {}", group.brand, exporter.format_money(group.subtotal()));
        for line in &group.lines {
            println!(
                "    {} x{}  {}",
                line.name,
                line.quantity,
                exporter.format_money(line.line_total())
            );
        }
    }
    println!("Cart total: {}", exporter.format_money(register.cart().grand_total()));
    println!(
        "Recorded: {} entries, {}",
        register.ledger().len(),
        exporter.format_money(register.ledger().grand_total())
    );
}

fn no_catalog() -> RegisterError {
    RegisterError::Config("no catalog_path configured".into())
}

fn unknown_product(name: &str) -> RegisterError {
    RegisterError::Config(format!("Unknown product: '{name}'"))
}
