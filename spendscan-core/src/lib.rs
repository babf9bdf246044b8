//! spendscan-core: deterministic transaction pipeline — line parsing,
//! deduplication, vendor classification, aggregation, and report/CSV output.
//!
//! Everything here runs on plain text and never talks to the extraction tool,
//! so the whole pipeline is testable against canned fixtures.

pub mod aggregate;
pub mod classify;
pub mod dedup;
pub mod parse;
pub mod report;
pub mod types;

pub use aggregate::{ServiceTotal, aggregate};
pub use classify::{ClassifyMode, OTHER_LABEL, VendorRule, classify, match_vendor};
pub use dedup::dedupe;
pub use parse::{clean_output, parse_ocr_text, parse_page};
pub use types::Transaction;
