//! Per-vendor running totals.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::classify::OTHER_LABEL;
use crate::types::Transaction;

/// Count and decimal total for one vendor label.
///
/// Decimal accumulation: the source amounts have exactly two fraction
/// digits, and summing many small charges through binary floats would
/// drift.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceTotal {
    pub service: String,
    pub count: usize,
    pub total: Decimal,
}

/// Accumulate classified records into buckets keyed by service label,
/// created lazily in first-attribution order. Records whose amount fails
/// to parse are skipped — the validator upstream should have caught them.
pub fn aggregate(txns: &[Transaction]) -> Vec<ServiceTotal> {
    let mut buckets: Vec<ServiceTotal> = Vec::new();

    for txn in txns {
        let Some(amount) = txn.amount_value() else {
            continue;
        };
        let label = txn.service.as_deref().unwrap_or(OTHER_LABEL);

        match buckets.iter_mut().find(|b| b.service == label) {
            Some(bucket) => {
                bucket.count += 1;
                bucket.total += amount;
            }
            None => buckets.push(ServiceTotal {
                service: label.to_string(),
                count: 1,
                total: amount,
            }),
        }
    }

    buckets
}
