//! data-runner: headless dataset builder for the banking analytics
//! dashboard.
//!
//! Usage:
//!   data-runner --seed 42 --customers 10000 --days-back 365 --data-dir data
//!   data-runner --data-dir data --regenerate

use anyhow::{bail, Context, Result};
use bankdash_core::{
    analytics,
    config::GeneratorConfig,
    dataset::BankingDataset,
    generator,
};
use std::env;
use std::path::PathBuf;

struct Args {
    config: GeneratorConfig,
    data_dir: PathBuf,
    regenerate: bool,
}

fn parse_args() -> Result<Args> {
    let mut config = GeneratorConfig::default();
    let mut data_dir = PathBuf::from("data");
    let mut regenerate = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().context("--seed requires a value")?;
                config.seed = value.parse().context("--seed must be an integer")?;
            }
            "--customers" => {
                let value = args.next().context("--customers requires a value")?;
                config.num_customers = value.parse().context("--customers must be an integer")?;
            }
            "--days-back" => {
                let value = args.next().context("--days-back requires a value")?;
                config.days_back = value.parse().context("--days-back must be an integer")?;
            }
            "--data-dir" => {
                data_dir = PathBuf::from(args.next().context("--data-dir requires a value")?);
            }
            "--regenerate" => regenerate = true,
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(Args {
        config,
        data_dir,
        regenerate,
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    log::info!(
        "effective config: {}",
        serde_json::to_string(&args.config)?
    );

    let dataset = if args.regenerate {
        let dataset = generator::generate(&args.config);
        dataset.save_csv(&args.data_dir)?;
        dataset
    } else {
        BankingDataset::load_or_generate(&args.data_dir, &args.config)?
    };

    println!("=== Dataset Summary ===");
    println!("customers:        {}", dataset.customers.len());
    println!("transactions:     {}", dataset.transactions.len());
    println!("product holdings: {}", dataset.products.len());

    let insights = analytics::generate_insights(
        &dataset.customers,
        &dataset.transactions,
        &dataset.products,
    );
    println!("\n=== Insights ===");
    println!("{}", insights.top_segment);
    println!("{}", insights.top_transaction);
    println!("{}", insights.fraud_rate);
    println!("{}", insights.top_product);

    Ok(())
}
