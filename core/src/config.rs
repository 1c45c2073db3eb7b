//! Generation parameters.
//!
//! The config is a plain value: same config (seed included) in, same
//! dataset out. `today` is pinned on the config rather than read from
//! the wall clock inside the generator, so two runs with the same
//! config are byte-identical even across midnight.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The twelve cities customers are drawn from, uniformly.
pub const CITIES: [&str; 12] = [
    "São Paulo",
    "Rio de Janeiro",
    "Brasília",
    "Salvador",
    "Fortaleza",
    "Belo Horizonte",
    "Manaus",
    "Curitiba",
    "Recife",
    "Porto Alegre",
    "Goiânia",
    "Belém",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Master seed. Every stage RNG stream derives from it.
    pub seed: u64,
    pub num_customers: usize,
    /// Transactions are dated within [today - days_back, today).
    pub days_back: i64,
    /// Reference date for all relative date arithmetic.
    #[serde(default = "default_today")]
    pub today: NaiveDate,
}

fn default_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_customers: 10_000,
            days_back: 365,
            today: default_today(),
        }
    }
}

impl GeneratorConfig {
    /// Small deterministic config for tests: fixed date, few customers.
    pub fn for_tests(seed: u64, num_customers: usize) -> Self {
        Self {
            seed,
            num_customers,
            days_back: 365,
            today: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        }
    }
}
