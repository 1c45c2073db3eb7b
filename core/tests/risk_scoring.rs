//! Risk scoring: composite score arithmetic, missing-aggregate fill,
//! and bucket boundaries.

use bankdash_core::{
    analytics::{self, RiskLevel},
    model::{Channel, CustomerRecord, Segment, TransactionRecord, TransactionType},
};
use chrono::NaiveDate;

fn customer(id: &str, credit_score: f64) -> CustomerRecord {
    CustomerRecord {
        customer_id: id.to_string(),
        age: 40.0,
        income: 5_000.0,
        segment: Segment::Silver,
        city: "Recife".to_string(),
        account_opening_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        is_active: true,
        credit_score,
        num_products: 2,
    }
}

fn txn(id: u32, customer_id: &str, amount: f64, is_fraud: bool) -> TransactionRecord {
    TransactionRecord {
        transaction_id: format!("TXN_{id:08}"),
        customer_id: customer_id.to_string(),
        transaction_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        transaction_type: TransactionType::Pix,
        amount,
        is_fraud,
        channel: Channel::Mobile,
    }
}

#[test]
fn bucket_boundaries_are_inclusive_on_the_upper_edge() {
    assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(10.0), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(10.01), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(25.0), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(25.01), RiskLevel::High);
    assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
    assert_eq!(RiskLevel::from_score(50.01), RiskLevel::Critical);
    assert_eq!(RiskLevel::from_score(100.0), RiskLevel::Critical);
    assert_eq!(RiskLevel::from_score(150.0), RiskLevel::Critical);
}

#[test]
fn customers_without_transactions_score_on_credit_alone() {
    let customers = vec![customer("CUST_000001", 850.0), customer("CUST_000002", 749.9)];

    let rows = analytics::risk_analysis(&customers, &[]);

    assert_eq!(rows.len(), 2);
    // Missing aggregates fill as zero before scoring.
    assert_eq!(rows[0].transaction_count, 0);
    assert_eq!(rows[0].total_amount, 0.0);
    assert_eq!(rows[0].std_amount, 0.0);
    assert_eq!(rows[0].risk_score, 0.0);
    assert_eq!(rows[0].risk_level, RiskLevel::Low);

    // (850 − 749.9)/10 = 10.01, just over the Low boundary.
    assert_eq!(rows[1].risk_score, 10.01);
    assert_eq!(rows[1].risk_level, RiskLevel::Medium);
}

#[test]
fn volatility_term_uses_sample_stddev_over_mean() {
    let customers = vec![customer("CUST_000001", 650.0)];
    let transactions = vec![
        txn(1, "CUST_000001", 100.0, false),
        txn(2, "CUST_000001", 300.0, false),
    ];

    let rows = analytics::risk_analysis(&customers, &transactions);
    let row = &rows[0];

    assert_eq!(row.transaction_count, 2);
    assert!((row.avg_amount - 200.0).abs() < 1e-9);
    // Sample stddev of {100, 300} is sqrt(20000) ≈ 141.4214.
    assert!((row.std_amount - 20_000f64.sqrt()).abs() < 1e-9);
    // 141.4214/200 × 10 + (850-650)/10 = 7.0711 + 20 → 27.07.
    assert_eq!(row.risk_score, 27.07);
    assert_eq!(row.risk_level, RiskLevel::High);
}

#[test]
fn single_transaction_has_zero_stddev() {
    let customers = vec![customer("CUST_000001", 850.0)];
    let transactions = vec![txn(1, "CUST_000001", 500.0, false)];

    let rows = analytics::risk_analysis(&customers, &transactions);

    assert_eq!(rows[0].std_amount, 0.0, "one sample has no spread");
    assert_eq!(rows[0].risk_score, 0.0);
}

#[test]
fn each_fraud_adds_fifty_points() {
    let customers = vec![customer("CUST_000001", 850.0), customer("CUST_000002", 850.0)];
    let transactions = vec![
        txn(1, "CUST_000001", 100.0, true),
        txn(2, "CUST_000002", 100.0, true),
        txn(3, "CUST_000002", 100.0, true),
    ];

    let rows = analytics::risk_analysis(&customers, &transactions);

    assert_eq!(rows[0].fraud_count, 1);
    assert_eq!(rows[0].risk_score, 50.0);
    assert_eq!(rows[0].risk_level, RiskLevel::High, "50 is still inside the High bucket");

    assert_eq!(rows[1].fraud_count, 2);
    // Two identical amounts: stddev 0, so exactly 100.
    assert_eq!(rows[1].risk_score, 100.0);
    assert_eq!(rows[1].risk_level, RiskLevel::Critical);
}

#[test]
fn output_follows_customer_input_order() {
    let customers = vec![customer("CUST_000009", 700.0), customer("CUST_000001", 700.0)];

    let rows = analytics::risk_analysis(&customers, &[]);

    assert_eq!(rows[0].customer_id, "CUST_000009");
    assert_eq!(rows[1].customer_id, "CUST_000001");
}
