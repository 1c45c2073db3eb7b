//! The three-table dataset, its filter contract, and CSV persistence.
//!
//! A dataset is immutable once built. Filtering produces a new copy;
//! reloading or regenerating is a full replace, there is no partial
//! update path.

use crate::{
    config::GeneratorConfig,
    error::{DashError, DashResult},
    generator,
    model::{CustomerRecord, ProductHoldingRecord, ProductType, Segment, TransactionRecord},
};
use chrono::NaiveDate;
use std::path::Path;

pub const CUSTOMERS_FILE: &str = "customers.csv";
pub const TRANSACTIONS_FILE: &str = "transactions.csv";
pub const PRODUCTS_FILE: &str = "products.csv";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BankingDataset {
    pub customers: Vec<CustomerRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub products: Vec<ProductHoldingRecord>,
}

/// Sidebar-style filter: each table is restricted independently.
/// `None` on a field means "no restriction".
#[derive(Debug, Clone, Default)]
pub struct DatasetFilter {
    /// Inclusive date range applied to transactions.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Accepted customer segments.
    pub segments: Option<Vec<Segment>>,
    /// Accepted product types.
    pub product_types: Option<Vec<ProductType>>,
}

impl BankingDataset {
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty() && self.transactions.is_empty() && self.products.is_empty()
    }

    /// Produce filtered copies of the three tables by simple predicate
    /// inclusion. Transactions filter by date, customers by segment,
    /// products by product type; the tables are not cross-restricted.
    pub fn filtered(&self, filter: &DatasetFilter) -> BankingDataset {
        let transactions = match filter.date_range {
            Some((start, end)) => self
                .transactions
                .iter()
                .filter(|t| t.transaction_date >= start && t.transaction_date <= end)
                .cloned()
                .collect(),
            None => self.transactions.clone(),
        };

        let customers = match &filter.segments {
            Some(segments) => self
                .customers
                .iter()
                .filter(|c| segments.contains(&c.segment))
                .cloned()
                .collect(),
            None => self.customers.clone(),
        };

        let products = match &filter.product_types {
            Some(types) => self
                .products
                .iter()
                .filter(|p| types.contains(&p.product_type))
                .cloned()
                .collect(),
            None => self.products.clone(),
        };

        BankingDataset {
            customers,
            transactions,
            products,
        }
    }

    /// Write the three tables as CSV files (header row, ISO-8601 dates,
    /// literal true/false booleans) under `dir`, creating it if needed.
    pub fn save_csv(&self, dir: &Path) -> DashResult<()> {
        std::fs::create_dir_all(dir)?;
        write_table(&dir.join(CUSTOMERS_FILE), &self.customers)?;
        write_table(&dir.join(TRANSACTIONS_FILE), &self.transactions)?;
        write_table(&dir.join(PRODUCTS_FILE), &self.products)?;
        log::info!(
            "saved dataset to {}: {} customers, {} transactions, {} product holdings",
            dir.display(),
            self.customers.len(),
            self.transactions.len(),
            self.products.len()
        );
        Ok(())
    }

    /// Load all three tables from `dir`. Files are taken as-is; the
    /// generator's range invariants are NOT re-validated for externally
    /// supplied data.
    pub fn load_csv(dir: &Path) -> DashResult<BankingDataset> {
        Ok(BankingDataset {
            customers: read_table(&dir.join(CUSTOMERS_FILE))?,
            transactions: read_table(&dir.join(TRANSACTIONS_FILE))?,
            products: read_table(&dir.join(PRODUCTS_FILE))?,
        })
    }

    /// Load the persisted dataset if all three files parse; otherwise
    /// regenerate from the config and persist the fresh copy. Missing
    /// or malformed files are recoverable, never fatal.
    pub fn load_or_generate(dir: &Path, config: &GeneratorConfig) -> DashResult<BankingDataset> {
        match Self::load_csv(dir) {
            Ok(dataset) => {
                log::info!("loaded persisted dataset from {}", dir.display());
                Ok(dataset)
            }
            Err(err) => {
                log::warn!("could not load dataset from {}: {err}; regenerating", dir.display());
                let dataset = generator::generate(config);
                dataset.save_csv(dir)?;
                Ok(dataset)
            }
        }
    }
}

fn write_table<T: serde::Serialize>(path: &Path, rows: &[T]) -> DashResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_table<T: serde::de::DeserializeOwned>(path: &Path) -> DashResult<Vec<T>> {
    if !path.exists() {
        return Err(DashError::MissingFile(path.display().to_string()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}
