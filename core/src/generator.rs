//! Synthetic dataset generation.
//!
//! Three stages, each on its own seeded RNG stream: customers,
//! then transactions for the active customers, then product holdings.
//! Same config in, byte-identical tables out.
//!
//! Out-of-range draws saturate at the documented bounds (clamp,
//! never resample) so the draw count per record stays fixed and the
//! streams stay reproducible.

use crate::{
    config::{GeneratorConfig, CITIES},
    dataset::BankingDataset,
    model::{Channel, CustomerRecord, ProductHoldingRecord, ProductType, TransactionRecord, TransactionType},
    rng::{RngBank, StageRng, StageSlot},
    types::round2,
};
use chrono::Duration;

/// Generate the full three-table dataset for the given config.
pub fn generate(config: &GeneratorConfig) -> BankingDataset {
    let bank = RngBank::new(config.seed);

    let mut rng = bank.for_stage(StageSlot::Customer);
    let customers = generate_customers(config, &mut rng);

    let mut rng = bank.for_stage(StageSlot::Transaction);
    let transactions = generate_transactions(config, &customers, &mut rng);

    let mut rng = bank.for_stage(StageSlot::Product);
    let products = generate_products(&customers, &mut rng);

    log::info!(
        "generated dataset: {} customers, {} transactions, {} product holdings (seed={})",
        customers.len(),
        transactions.len(),
        products.len(),
        config.seed
    );

    BankingDataset {
        customers,
        transactions,
        products,
    }
}

fn generate_customers(config: &GeneratorConfig, rng: &mut StageRng) -> Vec<CustomerRecord> {
    use crate::model::Segment;

    let weights: Vec<f64> = Segment::ALL.iter().map(|s| s.weight()).collect();
    let mut customers = Vec::with_capacity(config.num_customers);

    for i in 0..config.num_customers {
        let age = rng.normal(45.0, 15.0);
        let income = rng.log_normal(10.0, 0.8);
        let segment = Segment::ALL[rng.pick_weighted(&weights)];
        let city = CITIES[rng.next_u64_below(CITIES.len() as u64) as usize];
        let account_opening_date = config.today - Duration::days(rng.uniform_i64(30, 3650));
        let is_active = rng.chance(0.85);
        let credit_score = rng.normal(650.0, 100.0);
        let num_products = rng.poisson(2.5) + 1;

        // Segment adjustment first, then saturate at the bounds.
        let income = (income * segment.income_multiplier()).clamp(1000.0, 500_000.0);

        customers.push(CustomerRecord {
            customer_id: format!("CUST_{:06}", i + 1),
            age: age.clamp(18.0, 80.0),
            income,
            segment,
            city: city.to_string(),
            account_opening_date,
            is_active,
            credit_score: credit_score.clamp(300.0, 850.0),
            num_products: num_products.clamp(1, 8) as u32,
        });
    }

    customers
}

fn generate_transactions(
    config: &GeneratorConfig,
    customers: &[CustomerRecord],
    rng: &mut StageRng,
) -> Vec<TransactionRecord> {
    const WITHDRAWAL_AMOUNTS: [f64; 4] = [50.0, 100.0, 200.0, 500.0];

    let channel_weights: Vec<f64> = Channel::ALL.iter().map(|c| c.weight()).collect();
    let days_back = config.days_back.max(1);
    let mut transactions = Vec::new();

    for customer in customers {
        if !customer.is_active {
            continue;
        }

        // Sample, then scale, then truncate. The order is observable
        // in the count distribution; do not fold the multiplier into
        // the Poisson mean.
        let count = (rng.poisson(30.0) as f64 * customer.segment.txn_multiplier()) as usize;

        for _ in 0..count {
            let transaction_date =
                config.today - Duration::days(rng.uniform_i64(0, days_back));
            let transaction_type =
                TransactionType::ALL[rng.next_u64_below(TransactionType::ALL.len() as u64) as usize];

            let base_amount = match transaction_type {
                TransactionType::Pix | TransactionType::Ted | TransactionType::Doc => {
                    rng.log_normal(6.0, 1.5)
                }
                TransactionType::CartaoDebito | TransactionType::CartaoCredito => {
                    rng.log_normal(4.0, 1.0)
                }
                TransactionType::Saque => {
                    WITHDRAWAL_AMOUNTS[rng.next_u64_below(WITHDRAWAL_AMOUNTS.len() as u64) as usize]
                }
                _ => rng.log_normal(5.0, 1.2),
            };

            // Wealthier customers move more money.
            let amount = (base_amount * (customer.income / 5000.0)).clamp(1.0, 50_000.0);

            // Fraud prior is independent of amount.
            let is_fraud = rng.chance(0.01);
            let channel = Channel::ALL[rng.pick_weighted(&channel_weights)];

            transactions.push(TransactionRecord {
                transaction_id: format!("TXN_{:08}", transactions.len() + 1),
                customer_id: customer.customer_id.clone(),
                transaction_date,
                transaction_type,
                amount: round2(amount),
                is_fraud,
                channel,
            });
        }
    }

    transactions
}

fn generate_products(customers: &[CustomerRecord], rng: &mut StageRng) -> Vec<ProductHoldingRecord> {
    let mut products = Vec::new();

    for customer in customers {
        let picks = rng.sample_distinct(customer.num_products as usize, ProductType::ALL.len());

        for idx in picks {
            let product_type = ProductType::ALL[idx];

            // Balance scale depends on the product bucket; all buckets
            // grow with customer income.
            let balance = match product_type {
                ProductType::ContaCorrente => rng.log_normal(8.0, 1.0) * (customer.income / 10_000.0),
                ProductType::Poupanca => rng.log_normal(9.0, 1.2) * (customer.income / 8_000.0),
                ProductType::Investimentos => rng.log_normal(10.0, 1.5) * (customer.income / 5_000.0),
                _ => rng.log_normal(7.0, 1.0) * (customer.income / 15_000.0),
            };

            let opening_date =
                customer.account_opening_date + Duration::days(rng.uniform_i64(0, 365));

            products.push(ProductHoldingRecord {
                customer_id: customer.customer_id.clone(),
                product_type,
                balance: round2(balance.max(0.0)),
                opening_date,
                is_active: rng.chance(0.9),
            });
        }
    }

    products
}
