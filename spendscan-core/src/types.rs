//! Transaction record shared by every pipeline stage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One candidate transaction line, as extracted from a statement page.
///
/// Date fields stay raw `DD/MM/YY` tokens — the statement's own notation is
/// what lands in the CSV export, so nothing is re-rendered through a calendar
/// type. A record is never mutated after validation; classification only
/// attaches `service`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Source document identifier, recovered from the image filename
    /// (commonly `YYYY-MM-DD`).
    pub statement_id: String,
    /// 1-based page number within the statement.
    pub page: u32,
    /// Transaction date token (`DD/MM/YY`, year may have 4 digits).
    pub trans_date: String,
    /// Posting date token, same shape.
    pub post_date: String,
    /// Free-text merchant description, arbitrary punctuation allowed.
    pub description: String,
    /// Amount as printed on the statement: optional comma grouping,
    /// optional leading minus, two fraction digits.
    pub amount: String,
    /// Vendor label, present only after classification.
    pub service: Option<String>,
}

impl Transaction {
    /// Amount as a decimal, with thousands separators stripped.
    /// `None` when the token is not a number.
    pub fn amount_value(&self) -> Option<Decimal> {
        self.amount.replace(',', "").trim().parse::<Decimal>().ok()
    }

    /// Identity used for deduplication. Statement and page are excluded:
    /// the same transaction can be extracted twice from adjacent passes
    /// over the same document.
    pub fn dedup_key(&self) -> (String, String, String, String) {
        (
            self.trans_date.clone(),
            self.post_date.clone(),
            self.description.clone(),
            self.amount.clone(),
        )
    }
}
