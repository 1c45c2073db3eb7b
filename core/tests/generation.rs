//! Generated-table invariants: field bounds, referential consistency,
//! id assignment, and graceful degradation on degenerate configs.

use bankdash_core::{config::GeneratorConfig, generator};
use chrono::Duration;
use std::collections::{HashMap, HashSet};

#[test]
fn customer_fields_stay_in_bounds() {
    let config = GeneratorConfig::for_tests(42, 2000);
    let dataset = generator::generate(&config);

    assert_eq!(dataset.customers.len(), 2000);
    for c in &dataset.customers {
        assert!((18.0..=80.0).contains(&c.age), "{}: age {} out of range", c.customer_id, c.age);
        assert!(
            (1000.0..=500_000.0).contains(&c.income),
            "{}: income {} out of range",
            c.customer_id,
            c.income
        );
        assert!(
            (300.0..=850.0).contains(&c.credit_score),
            "{}: credit score {} out of range",
            c.customer_id,
            c.credit_score
        );
        assert!(
            (1..=8).contains(&c.num_products),
            "{}: num_products {} out of range",
            c.customer_id,
            c.num_products
        );
        assert!(c.account_opening_date <= config.today - Duration::days(30));
        assert!(c.account_opening_date >= config.today - Duration::days(3650));
    }
}

#[test]
fn product_types_are_distinct_per_customer() {
    let dataset = generator::generate(&GeneratorConfig::for_tests(42, 500));

    let mut seen: HashMap<&str, HashSet<&str>> = HashMap::new();
    for p in &dataset.products {
        let types = seen.entry(p.customer_id.as_str()).or_default();
        assert!(
            types.insert(p.product_type.as_str()),
            "{} holds {} twice",
            p.customer_id,
            p.product_type
        );
    }
}

#[test]
fn product_count_and_opening_window_match_the_customer() {
    let dataset = generator::generate(&GeneratorConfig::for_tests(11, 300));

    let mut counts: HashMap<&str, u32> = HashMap::new();
    let by_id: HashMap<&str, _> = dataset
        .customers
        .iter()
        .map(|c| (c.customer_id.as_str(), c))
        .collect();

    for p in &dataset.products {
        *counts.entry(p.customer_id.as_str()).or_default() += 1;
        let customer = by_id[p.customer_id.as_str()];
        assert!(
            p.opening_date >= customer.account_opening_date,
            "product opened before the account"
        );
        assert!(
            p.opening_date < customer.account_opening_date + Duration::days(365),
            "product opened more than a year after the account"
        );
    }

    for c in &dataset.customers {
        assert_eq!(
            counts.get(c.customer_id.as_str()).copied().unwrap_or(0),
            c.num_products,
            "{}: holding count does not match num_products",
            c.customer_id
        );
    }
}

#[test]
fn transactions_reference_only_active_customers() {
    let config = GeneratorConfig::for_tests(42, 500);
    let dataset = generator::generate(&config);

    let active: HashSet<&str> = dataset
        .customers
        .iter()
        .filter(|c| c.is_active)
        .map(|c| c.customer_id.as_str())
        .collect();

    assert!(!dataset.transactions.is_empty());
    for t in &dataset.transactions {
        assert!(
            active.contains(t.customer_id.as_str()),
            "{} belongs to an inactive or unknown customer {}",
            t.transaction_id,
            t.customer_id
        );
        assert!(t.transaction_date <= config.today);
        assert!(t.transaction_date > config.today - Duration::days(config.days_back));
        assert!(
            (1.0..=50_000.0).contains(&t.amount),
            "{}: amount {} out of range",
            t.transaction_id,
            t.amount
        );
        // Amounts are stored at 2dp.
        assert!(((t.amount * 100.0).round() - t.amount * 100.0).abs() < 1e-6);
    }
}

#[test]
fn transaction_ids_are_sequential_in_generation_order() {
    let dataset = generator::generate(&GeneratorConfig::for_tests(3, 100));

    for (i, t) in dataset.transactions.iter().enumerate() {
        assert_eq!(
            t.transaction_id,
            format!("TXN_{:08}", i + 1),
            "ids must be assigned sequentially across the full table"
        );
    }
}

#[test]
fn fraud_prior_is_about_one_percent() {
    let dataset = generator::generate(&GeneratorConfig::for_tests(42, 1000));

    let fraud = dataset.transactions.iter().filter(|t| t.is_fraud).count();
    let rate = fraud as f64 / dataset.transactions.len() as f64;
    assert!(
        (0.005..0.02).contains(&rate),
        "fraud rate {rate} is far from the 1% prior"
    );
}

#[test]
fn zero_customers_yield_empty_tables() {
    let dataset = generator::generate(&GeneratorConfig::for_tests(42, 0));

    assert!(dataset.customers.is_empty());
    assert!(dataset.transactions.is_empty());
    assert!(dataset.products.is_empty());
}

#[test]
fn premium_customers_transact_more_than_bronze() {
    use bankdash_core::model::Segment;

    let dataset = generator::generate(&GeneratorConfig::for_tests(42, 2000));

    let mut txn_counts: HashMap<&str, u64> = HashMap::new();
    for t in &dataset.transactions {
        *txn_counts.entry(t.customer_id.as_str()).or_default() += 1;
    }

    let mean_for = |segment: Segment| {
        let active: Vec<_> = dataset
            .customers
            .iter()
            .filter(|c| c.segment == segment && c.is_active)
            .collect();
        let total: u64 = active
            .iter()
            .map(|c| txn_counts.get(c.customer_id.as_str()).copied().unwrap_or(0))
            .sum();
        total as f64 / active.len() as f64
    };

    let premium = mean_for(Segment::Premium);
    let bronze = mean_for(Segment::Bronze);
    assert!(
        premium > bronze * 2.0,
        "Premium mean {premium} should be ~3x Bronze mean {bronze}"
    );
}
