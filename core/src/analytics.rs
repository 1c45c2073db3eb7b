//! Aggregate reporting queries over the three tables.
//!
//! Every function here is pure: it borrows its input slices, derives a
//! fresh result table or summary, and never mutates the source. All
//! functions are independent and safe to call in any order or in
//! parallel.
//!
//! Shared edge-case policy:
//!   - Empty inputs yield empty/zero-valued results, never a panic.
//!   - Rate computations with a zero denominator yield 0, except the
//!     risk score's volatility ratio which floors the denominator at 1.
//!
//! Join semantics are explicit: customer⋈product and
//! customer⋈transaction joins are left outer on `customer_id`, and a
//! customer with no matching rows contributes zero to the joined
//! aggregates but still appears in per-customer and per-segment output.

use crate::{
    model::{
        Channel, CustomerRecord, ProductHoldingRecord, ProductType, Segment, TransactionRecord,
        TransactionType,
    },
    types::round2,
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

// ── Per-day and per-type transaction rollups ─────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub volume: f64,
}

/// Sum of transaction amounts per calendar day, ascending by date.
pub fn daily_transaction_volume(transactions: &[TransactionRecord]) -> Vec<DailyVolume> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for txn in transactions {
        *by_day.entry(txn.transaction_date).or_insert(0.0) += txn.amount;
    }
    by_day
        .into_iter()
        .map(|(date, volume)| DailyVolume { date, volume })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeCount {
    pub transaction_type: TransactionType,
    pub count: u64,
}

/// Transaction counts per type, most frequent first.
/// Ties keep first-appearance order.
pub fn transaction_type_distribution(transactions: &[TransactionRecord]) -> Vec<TypeCount> {
    let mut counts: Vec<TypeCount> = Vec::new();
    for txn in transactions {
        match counts.iter_mut().find(|c| c.transaction_type == txn.transaction_type) {
            Some(entry) => entry.count += 1,
            None => counts.push(TypeCount {
                transaction_type: txn.transaction_type,
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

// ── Segment and product rollups (customer⋈product left join) ─────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub segment: Segment,
    pub avg_balance: f64,
    pub total_balance: f64,
    pub product_count: u64,
    pub customer_count: u64,
    pub avg_income: f64,
    pub avg_credit_score: f64,
}

#[derive(Default)]
struct SegmentAcc {
    balance_sum: f64,
    product_count: u64,
    customer_count: u64,
    income_sum: f64,
    credit_sum: f64,
    joined_rows: u64,
}

/// Per-segment rollup of the customer⋈product left join.
///
/// Balance aggregates cover matched product rows only; income and
/// credit score average over the joined rows, so a customer with k
/// products weighs k times and a customer with none weighs once.
/// Output sorted by segment label.
pub fn customer_segment_analysis(
    customers: &[CustomerRecord],
    products: &[ProductHoldingRecord],
) -> Vec<SegmentSummary> {
    let products_by_customer = group_products(products);
    let mut by_segment: HashMap<Segment, SegmentAcc> = HashMap::new();

    for customer in customers {
        let acc = by_segment.entry(customer.segment).or_default();
        acc.customer_count += 1;

        let holdings = products_by_customer
            .get(customer.customer_id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        // Left join: no holdings still yields one joined row with a
        // null balance contribution.
        let rows = holdings.len().max(1) as u64;
        acc.joined_rows += rows;
        acc.income_sum += customer.income * rows as f64;
        acc.credit_sum += customer.credit_score * rows as f64;

        for holding in holdings {
            acc.balance_sum += holding.balance;
            acc.product_count += 1;
        }
    }

    let mut summaries: Vec<SegmentSummary> = by_segment
        .into_iter()
        .map(|(segment, acc)| SegmentSummary {
            segment,
            avg_balance: round2(mean(acc.balance_sum, acc.product_count)),
            total_balance: round2(acc.balance_sum),
            product_count: acc.product_count,
            customer_count: acc.customer_count,
            avg_income: round2(mean(acc.income_sum, acc.joined_rows)),
            avg_credit_score: round2(mean(acc.credit_sum, acc.joined_rows)),
        })
        .collect();
    summaries.sort_by(|a, b| a.segment.as_str().cmp(b.segment.as_str()));
    summaries
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub product_type: ProductType,
    pub total_balance: f64,
    pub avg_balance: f64,
    pub account_count: u64,
    pub customer_count: u64,
}

/// Per-product-type balance rollup, sorted by product label.
pub fn product_performance(products: &[ProductHoldingRecord]) -> Vec<ProductSummary> {
    struct Acc<'a> {
        balance_sum: f64,
        account_count: u64,
        customers: HashSet<&'a str>,
    }

    let mut by_type: HashMap<ProductType, Acc<'_>> = HashMap::new();
    for holding in products {
        let acc = by_type.entry(holding.product_type).or_insert_with(|| Acc {
            balance_sum: 0.0,
            account_count: 0,
            customers: HashSet::new(),
        });
        acc.balance_sum += holding.balance;
        acc.account_count += 1;
        acc.customers.insert(holding.customer_id.as_str());
    }

    let mut summaries: Vec<ProductSummary> = by_type
        .into_iter()
        .map(|(product_type, acc)| ProductSummary {
            product_type,
            total_balance: round2(acc.balance_sum),
            avg_balance: round2(mean(acc.balance_sum, acc.account_count)),
            account_count: acc.account_count,
            customer_count: acc.customers.len() as u64,
        })
        .collect();
    summaries.sort_by(|a, b| a.product_type.as_str().cmp(b.product_type.as_str()));
    summaries
}

// ── Fraud reporting ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct FraudStatistics {
    pub total_transactions: u64,
    pub fraud_count: u64,
    /// Fraction in [0, 1]; 0 when there are no transactions.
    pub fraud_rate: f64,
    pub fraud_amount: f64,
    /// 0 when there are no fraudulent transactions.
    pub avg_fraud_amount: f64,
    pub total_amount: f64,
}

/// Scalar fraud summary over the whole transaction table.
pub fn fraud_statistics(transactions: &[TransactionRecord]) -> FraudStatistics {
    let mut stats = FraudStatistics {
        total_transactions: transactions.len() as u64,
        ..Default::default()
    };
    for txn in transactions {
        stats.total_amount += txn.amount;
        if txn.is_fraud {
            stats.fraud_count += 1;
            stats.fraud_amount += txn.amount;
        }
    }
    stats.fraud_rate = mean(stats.fraud_count as f64, stats.total_transactions);
    stats.avg_fraud_amount = mean(stats.fraud_amount, stats.fraud_count);
    stats
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FraudTrendPoint {
    pub date: NaiveDate,
    pub fraud_count: u64,
    pub total_count: u64,
    /// Percentage, 2dp.
    pub fraud_rate: f64,
}

/// Daily fraud counts and rate, ascending by date.
pub fn fraud_trend(transactions: &[TransactionRecord]) -> Vec<FraudTrendPoint> {
    let mut by_day: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for txn in transactions {
        let (fraud, total) = by_day.entry(txn.transaction_date).or_insert((0, 0));
        *total += 1;
        if txn.is_fraud {
            *fraud += 1;
        }
    }
    by_day
        .into_iter()
        .map(|(date, (fraud_count, total_count))| FraudTrendPoint {
            date,
            fraud_count,
            total_count,
            fraud_rate: round2(mean(fraud_count as f64, total_count) * 100.0),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub channel: Channel,
    pub total_volume: f64,
    pub avg_amount: f64,
    pub transaction_count: u64,
    pub fraud_count: u64,
    /// Percentage, 2dp.
    pub fraud_rate: f64,
}

/// Per-channel volume and fraud rollup, sorted by channel label.
pub fn channel_analysis(transactions: &[TransactionRecord]) -> Vec<ChannelSummary> {
    #[derive(Default)]
    struct Acc {
        volume: f64,
        count: u64,
        fraud: u64,
    }

    let mut by_channel: HashMap<Channel, Acc> = HashMap::new();
    for txn in transactions {
        let acc = by_channel.entry(txn.channel).or_default();
        acc.volume += txn.amount;
        acc.count += 1;
        if txn.is_fraud {
            acc.fraud += 1;
        }
    }

    let mut summaries: Vec<ChannelSummary> = by_channel
        .into_iter()
        .map(|(channel, acc)| ChannelSummary {
            channel,
            total_volume: round2(acc.volume),
            avg_amount: round2(mean(acc.volume, acc.count)),
            transaction_count: acc.count,
            fraud_count: acc.fraud,
            fraud_rate: round2(mean(acc.fraud as f64, acc.count) * 100.0),
        })
        .collect();
    summaries.sort_by(|a, b| a.channel.as_str().cmp(b.channel.as_str()));
    summaries
}

// ── Per-customer value and risk ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerValue {
    pub customer_id: String,
    pub total_balance: f64,
    pub product_count: u64,
    pub income: f64,
    pub segment: Segment,
    pub credit_score: f64,
    pub account_opening_date: NaiveDate,
    pub account_age_days: i64,
    pub estimated_clv: f64,
}

/// Customer lifetime value: one row per customer (left join with
/// holdings), sorted by customer id.
///
/// estimated_clv = total_balance × product_count × (age_days/365 + 1),
/// so a customer with no holdings scores exactly 0.
pub fn customer_lifetime_value(
    customers: &[CustomerRecord],
    products: &[ProductHoldingRecord],
    as_of: NaiveDate,
) -> Vec<CustomerValue> {
    let products_by_customer = group_products(products);

    let mut rows: Vec<CustomerValue> = customers
        .iter()
        .map(|customer| {
            let holdings = products_by_customer
                .get(customer.customer_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let total_balance: f64 = holdings.iter().map(|h| h.balance).sum();
            let product_count = holdings.len() as u64;
            let account_age_days = (as_of - customer.account_opening_date).num_days();
            let tenure_factor = account_age_days as f64 / 365.0 + 1.0;

            CustomerValue {
                customer_id: customer.customer_id.clone(),
                total_balance: round2(total_balance),
                product_count,
                income: customer.income,
                segment: customer.segment,
                credit_score: customer.credit_score,
                account_opening_date: customer.account_opening_date,
                account_age_days,
                estimated_clv: round2(total_balance * product_count as f64 * tenure_factor),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.customer_id.cmp(&b.customer_id));
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Bucket a composite risk score. Boundaries are inclusive on the
    /// upper edge; anything above 50 is Critical.
    pub fn from_score(score: f64) -> RiskLevel {
        if score <= 10.0 {
            Self::Low
        } else if score <= 25.0 {
            Self::Medium
        } else if score <= 50.0 {
            Self::High
        } else {
            Self::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRisk {
    pub customer_id: String,
    pub segment: Segment,
    pub credit_score: f64,
    pub total_amount: f64,
    pub avg_amount: f64,
    pub std_amount: f64,
    pub transaction_count: u64,
    pub fraud_count: u64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

/// Per-customer risk scoring over the customer⋈transaction left join,
/// in customer input order.
///
/// risk_score = fraud_count×50
///            + (std_amount / avg_amount, avg floored at 1)×10
///            + (850 − credit_score)/10
///
/// Customers with no transactions score on credit alone (the missing
/// aggregates fill as 0 before scoring).
pub fn risk_analysis(
    customers: &[CustomerRecord],
    transactions: &[TransactionRecord],
) -> Vec<CustomerRisk> {
    #[derive(Default)]
    struct Acc {
        sum: f64,
        sum_sq: f64,
        count: u64,
        fraud: u64,
    }

    let mut by_customer: HashMap<&str, Acc> = HashMap::new();
    for txn in transactions {
        let acc = by_customer.entry(txn.customer_id.as_str()).or_default();
        acc.sum += txn.amount;
        acc.sum_sq += txn.amount * txn.amount;
        acc.count += 1;
        if txn.is_fraud {
            acc.fraud += 1;
        }
    }

    customers
        .iter()
        .map(|customer| {
            let empty = Acc::default();
            let acc = by_customer
                .get(customer.customer_id.as_str())
                .unwrap_or(&empty);

            let avg = mean(acc.sum, acc.count);
            let std = sample_std(acc.sum, acc.sum_sq, acc.count);
            let volatility = std / if avg == 0.0 { 1.0 } else { avg };
            let risk_score = round2(
                acc.fraud as f64 * 50.0 + volatility * 10.0 + (850.0 - customer.credit_score) / 10.0,
            );

            CustomerRisk {
                customer_id: customer.customer_id.clone(),
                segment: customer.segment,
                credit_score: customer.credit_score,
                total_amount: acc.sum,
                avg_amount: avg,
                std_amount: std,
                transaction_count: acc.count,
                fraud_count: acc.fraud,
                risk_score,
                risk_level: RiskLevel::from_score(risk_score),
            }
        })
        .collect()
}

// ── Monthly trends ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    /// First day of the calendar month.
    pub month: NaiveDate,
    pub total_volume: f64,
    pub avg_amount: f64,
    pub transaction_count: u64,
    pub fraud_count: u64,
    pub active_customers: u64,
    /// Month-over-month % change; None for the first month.
    pub volume_growth: Option<f64>,
    pub customer_growth: Option<f64>,
}

/// Calendar-month rollup with month-over-month growth, ascending.
pub fn monthly_trends(transactions: &[TransactionRecord]) -> Vec<MonthlyTrend> {
    struct Acc<'a> {
        volume: f64,
        count: u64,
        fraud: u64,
        customers: HashSet<&'a str>,
    }

    let mut by_month: BTreeMap<(i32, u32), Acc<'_>> = BTreeMap::new();
    for txn in transactions {
        let key = (txn.transaction_date.year(), txn.transaction_date.month());
        let acc = by_month.entry(key).or_insert_with(|| Acc {
            volume: 0.0,
            count: 0,
            fraud: 0,
            customers: HashSet::new(),
        });
        acc.volume += txn.amount;
        acc.count += 1;
        if txn.is_fraud {
            acc.fraud += 1;
        }
        acc.customers.insert(txn.customer_id.as_str());
    }

    let mut trends = Vec::with_capacity(by_month.len());
    let mut prior: Option<(f64, u64)> = None;
    for ((year, month), acc) in by_month {
        let active_customers = acc.customers.len() as u64;
        let (volume_growth, customer_growth) = match prior {
            Some((prior_volume, prior_customers)) => (
                pct_change(prior_volume, acc.volume),
                pct_change(prior_customers as f64, active_customers as f64),
            ),
            None => (None, None),
        };
        prior = Some((acc.volume, active_customers));

        trends.push(MonthlyTrend {
            // Month keys come from valid dates, so day 1 always exists.
            month: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            total_volume: round2(acc.volume),
            avg_amount: round2(mean(acc.volume, acc.count)),
            transaction_count: acc.count,
            fraud_count: acc.fraud,
            active_customers,
            volume_growth,
            customer_growth,
        });
    }
    trends
}

// ── Automated insights ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub top_segment: String,
    pub top_transaction: String,
    pub fraud_rate: String,
    pub top_product: String,
}

/// Four free-text headline insights derived from the other rollups.
/// Empty tables produce a defined "no data" phrasing.
pub fn generate_insights(
    customers: &[CustomerRecord],
    transactions: &[TransactionRecord],
    products: &[ProductHoldingRecord],
) -> Insights {
    let top_segment = most_common(customers.iter().map(|c| c.segment))
        .map(|s| format!("The largest customer segment is {s}"))
        .unwrap_or_else(|| "No customer data available".to_string());

    let top_transaction = transaction_type_distribution(transactions)
        .first()
        .map(|t| format!("Most common transaction type is {}", t.transaction_type))
        .unwrap_or_else(|| "No transaction data available".to_string());

    let stats = fraud_statistics(transactions);
    let fraud_rate = format!("Current fraud rate is {:.2}%", stats.fraud_rate * 100.0);

    let mut top_product = "No product data available".to_string();
    let mut top_balance = f64::NEG_INFINITY;
    for summary in product_performance(products) {
        // Strict comparison: first product wins balance ties.
        if summary.total_balance > top_balance {
            top_balance = summary.total_balance;
            top_product = format!("Highest balance product is {}", summary.product_type);
        }
    }

    Insights {
        top_segment,
        top_transaction,
        fraud_rate,
        top_product,
    }
}

// ── Shared helpers ───────────────────────────────────────────────────────────

fn group_products<'a>(
    products: &'a [ProductHoldingRecord],
) -> HashMap<&'a str, Vec<&'a ProductHoldingRecord>> {
    let mut by_customer: HashMap<&str, Vec<&ProductHoldingRecord>> = HashMap::new();
    for holding in products {
        by_customer
            .entry(holding.customer_id.as_str())
            .or_default()
            .push(holding);
    }
    by_customer
}

/// sum/count with a zero-denominator default of 0.
fn mean(sum: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Sample standard deviation (n−1 denominator); 0 below two samples.
fn sample_std(sum: f64, sum_sq: f64, count: u64) -> f64 {
    if count < 2 {
        return 0.0;
    }
    let n = count as f64;
    let variance = (sum_sq - sum * sum / n) / (n - 1.0);
    variance.max(0.0).sqrt()
}

fn pct_change(prior: f64, current: f64) -> Option<f64> {
    if prior == 0.0 {
        None
    } else {
        Some(round2((current - prior) / prior * 100.0))
    }
}

fn most_common<T: Copy + PartialEq>(items: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, u64)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(value, _)| *value == item) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }
    let mut best: Option<(T, u64)> = None;
    for (value, count) in counts {
        // Strict comparison keeps the first-seen value on ties.
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
