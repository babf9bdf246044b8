//! Remove repeated records within one extraction run.

use std::collections::HashSet;

use crate::types::Transaction;

/// Drop records that duplicate an earlier one, comparing on
/// (trans_date, post_date, description, amount). First occurrence wins;
/// surviving order matches first-occurrence order.
///
/// Statement and page are deliberately not part of the key: two OCR passes
/// over adjacent images of the same document can emit the same transaction
/// twice.
pub fn dedupe(txns: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(txns.len());

    for txn in txns {
        if seen.insert(txn.dedup_key()) {
            unique.push(txn);
        }
    }

    unique
}
