//! Shared primitive types used across generator and analytics.

/// Stable customer identifier, format `CUST_NNNNNN`.
pub type CustomerId = String;

/// Stable transaction identifier, format `TXN_NNNNNNNN`,
/// assigned sequentially across the whole table in generation order.
pub type TransactionId = String;

/// Round a monetary or ratio value to 2 decimal places.
/// All persisted amounts and reported rates carry 2dp.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
