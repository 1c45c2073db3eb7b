//! bankdash-core — synthetic banking dataset generation and analytics.
//!
//! Two halves, consumed by an external presentation layer:
//!   1. A seeded generator producing three related tables
//!      (customers, transactions, product holdings).
//!   2. A set of pure aggregate queries over those tables
//!      (volume trends, fraud statistics, CLV, risk scoring, ...).
//!
//! The tables are immutable once generated or loaded; every analytics
//! function only borrows them, so callers may run queries in any order
//! or in parallel without synchronization.

pub mod analytics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod model;
pub mod rng;
pub mod types;
