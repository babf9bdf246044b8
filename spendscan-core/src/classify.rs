//! Vendor classification by ordered keyword matching.
//!
//! Rules are an ordered table evaluated first-match-wins, so the more
//! specific combinations (STRIPE + Z.AI) can't be shadowed by adding a
//! broader rule below them.

use rust_decimal::Decimal;

use crate::types::Transaction;

/// Fallback label for records already known to be AI-related but matching
/// no specific vendor signature.
pub const OTHER_LABEL: &str = "Other AI Service";

/// One classification rule. A rule matches when any of its signature
/// groups has all of its substrings present in the uppercased description.
pub struct VendorRule {
    pub signatures: &'static [&'static [&'static str]],
    pub label: &'static str,
}

/// Vendor signature table, in priority order.
pub const VENDOR_RULES: &[VendorRule] = &[
    VendorRule { signatures: &[&["OPENROUTER"]], label: "OpenRouter AI" },
    VendorRule { signatures: &[&["ANTHROPIC"]], label: "Anthropic AI" },
    VendorRule { signatures: &[&["RUNPOD"]], label: "RunPod GPU" },
    VendorRule { signatures: &[&["KIE.AI"], &["KIE AI"]], label: "Kie.ai" },
    VendorRule { signatures: &[&["BUDGIEAI"], &["BUDGIE AI"]], label: "BudgieAI" },
    VendorRule { signatures: &[&["DIGITALOCEAN"]], label: "DigitalOcean" },
    VendorRule { signatures: &[&["STRIPE", "Z.AI"]], label: "Z.AI Service" },
    VendorRule { signatures: &[&["GOOGLE", "CLOUD"]], label: "Google Cloud" },
];

/// First rule whose signature matches the description, case-insensitive.
pub fn match_vendor(description: &str) -> Option<&'static str> {
    let desc = description.to_uppercase();
    VENDOR_RULES
        .iter()
        .find(|rule| {
            rule.signatures
                .iter()
                .any(|group| group.iter().all(|needle| desc.contains(needle)))
        })
        .map(|rule| rule.label)
}

/// How the classifier treats records with no matching signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyMode {
    /// The extraction step returned *all* transactions; classification
    /// doubles as the AI filter. Unmatched records are dropped, and so are
    /// non-positive amounts (refunds, credits, statement payments).
    FilterExpenses,
    /// The extraction step was prompted to return AI transactions only.
    /// Unmatched records fall back to the tool-assigned label when one was
    /// extracted, else to [`OTHER_LABEL`]. No sign filtering.
    LabelAll,
}

/// Attach vendor labels, applying the mode's filtering policy.
/// Input order is preserved for surviving records.
pub fn classify(txns: Vec<Transaction>, mode: ClassifyMode) -> Vec<Transaction> {
    let mut out = Vec::with_capacity(txns.len());

    for mut txn in txns {
        match mode {
            ClassifyMode::FilterExpenses => {
                let Some(label) = match_vendor(&txn.description) else {
                    continue;
                };
                let Some(amount) = txn.amount_value() else {
                    continue;
                };
                if amount <= Decimal::ZERO {
                    continue;
                }
                txn.service = Some(label.to_string());
            }
            ClassifyMode::LabelAll => {
                // The rule table stays authoritative over whatever label the
                // tool put in the fifth segment.
                txn.service = match match_vendor(&txn.description) {
                    Some(label) => Some(label.to_string()),
                    None => Some(txn.service.take().unwrap_or_else(|| OTHER_LABEL.to_string())),
                };
            }
        }
        out.push(txn);
    }

    out
}
