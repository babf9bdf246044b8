//! Parse extraction-tool output into transactions.
//!
//! Two accepted line shapes:
//!   pipe-delimited (what the tool is prompted to return):
//!     19/05/25|20/05/25|ANTHROPIC ANTHROPIC.COMUS USD 5.35|182.70
//!     19/05/25|20/05/25|ANTHROPIC ANTHROPIC.COMUS USD 5.35|182.70|Anthropic AI
//!   fixed-column OCR text:
//!     19/05/25  20/05/25  ANTHROPIC ANTHROPIC.COMUS USD 5.35      182.70
//!
//! Everything else — prose, headers, payment-slip text, markdown fences,
//! the NO_TRANSACTIONS sentinel — is dropped without error. The tool's
//! output is best-effort and noisy lines are expected, not exceptional.

use anyhow::Result;
use regex::Regex;

use crate::types::Transaction;

/// Sentinel the tool returns for a page with no transaction table
/// (e.g. a payment slip).
pub const NO_TRANSACTIONS: &str = "NO_TRANSACTIONS";

/// Sentinel for the extract-and-classify prompt variant.
pub const NO_AI_TRANSACTIONS: &str = "NO_AI_TRANSACTIONS";

/// Strip markdown code fences the tool sometimes wraps its answer in.
pub fn clean_output(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Parse one page worth of tool output into validated transactions.
///
/// Tolerates fence wrapping, explanatory prose around the expected lines,
/// header echoes, and the no-transactions sentinels. Never fails on
/// arbitrary input; lines that don't match the pipe shape are skipped.
pub fn parse_page(raw: &str, statement_id: &str, page: u32) -> Result<Vec<Transaction>> {
    let date_re = Regex::new(r"^\d{2}/\d{2}/\d{2}")?;

    let output = clean_output(raw);
    if output.is_empty() || output.starts_with("ERROR") {
        return Ok(Vec::new());
    }

    let mut txns = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty()
            || line.starts_with(NO_TRANSACTIONS)
            || line.starts_with(NO_AI_TRANSACTIONS)
            || line.starts_with("DATE|POSTING")
        {
            continue;
        }
        if let Some(txn) = parse_pipe_line(&date_re, line, statement_id, page) {
            txns.push(txn);
        }
    }

    Ok(txns)
}

/// Pipe-delimited shape: at least 4 segments, segment 0 starts with a
/// `DD/MM/YY` token. Segment 4, when present, is the tool-assigned service
/// label (extract-and-classify variant).
fn parse_pipe_line(
    date_re: &Regex,
    line: &str,
    statement_id: &str,
    page: u32,
) -> Option<Transaction> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 4 || !date_re.is_match(parts[0].trim()) {
        return None;
    }

    let service = parts
        .get(4)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let txn = Transaction {
        statement_id: statement_id.to_string(),
        page,
        trans_date: parts[0].trim().to_string(),
        post_date: parts[1].trim().to_string(),
        description: parts[2].trim().to_string(),
        amount: parts[3].trim().to_string(),
        service,
    };

    validate(date_re, &txn).then_some(txn)
}

/// Fixed-column OCR fallback: date, date, non-greedy description, then a
/// signed two-decimal amount at line end. Non-matching lines (headers,
/// footers, payment-slip text) are skipped.
pub fn parse_ocr_text(text: &str, statement_id: &str, page: u32) -> Result<Vec<Transaction>> {
    let date_re = Regex::new(r"^\d{2}/\d{2}/\d{2}")?;
    let row_re = Regex::new(concat!(
        r"^(?P<trans>\d{2}/\d{2}/\d{2,4})\s+",
        r"(?P<post>\d{2}/\d{2}/\d{2,4})\s+",
        r"(?P<desc>.+?)\s+",
        r"(?P<amt>-?[\d,]+\.\d{2})$"
    ))?;

    let mut txns = Vec::new();
    for line in text.lines() {
        if let Some(caps) = row_re.captures(line.trim()) {
            let txn = Transaction {
                statement_id: statement_id.to_string(),
                page,
                trans_date: caps["trans"].to_string(),
                post_date: caps["post"].to_string(),
                description: caps["desc"].trim().to_string(),
                amount: caps["amt"].to_string(),
                service: None,
            };
            if validate(&date_re, &txn) {
                txns.push(txn);
            }
        }
    }

    Ok(txns)
}

/// Record validation: both date tokens match the minimum `DD/MM/YY` shape
/// and the amount parses as a decimal once separators are stripped. No
/// record with an unparseable amount goes downstream.
fn validate(date_re: &Regex, txn: &Transaction) -> bool {
    date_re.is_match(&txn.trans_date)
        && date_re.is_match(&txn.post_date)
        && txn.amount_value().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_basic_pipe_line() {
        let txns = parse_page(
            "19/05/25|20/05/25|ANTHROPIC ANTHROPIC.COMUS USD 5.35|182.70",
            "2025-06-01",
            1,
        )
        .unwrap();
        assert_eq!(txns.len(), 1);
        let t = &txns[0];
        assert_eq!(t.trans_date, "19/05/25");
        assert_eq!(t.post_date, "20/05/25");
        assert_eq!(t.description, "ANTHROPIC ANTHROPIC.COMUS USD 5.35");
        assert_eq!(t.amount, "182.70");
        assert_eq!(t.statement_id, "2025-06-01");
        assert_eq!(t.page, 1);
        assert_eq!(t.service, None);
    }

    #[test]
    fn test_segments_are_trimmed() {
        let txns = parse_page(
            " 18/12/24 | 20/12/24 | SHOPEE BANGKOK TH | 199.00 ",
            "s",
            1,
        )
        .unwrap();
        assert_eq!(txns[0].trans_date, "18/12/24");
        assert_eq!(txns[0].description, "SHOPEE BANGKOK TH");
        assert_eq!(txns[0].amount, "199.00");
    }

    #[test]
    fn test_fifth_segment_becomes_service() {
        let txns = parse_page(
            "19/05/25|20/05/25|ANTHROPIC ANTHROPIC.COMUS USD 5.35|182.70|Anthropic AI",
            "s",
            1,
        )
        .unwrap();
        assert_eq!(txns[0].service.as_deref(), Some("Anthropic AI"));
    }

    #[test]
    fn test_strips_markdown_fences() {
        let raw = "```\n19/05/25|20/05/25|ANTHROPIC|182.70\n```";
        let txns = parse_page(raw, "s", 1).unwrap();
        assert_eq!(txns.len(), 1);
    }

    #[test]
    fn test_sentinel_yields_zero_records() {
        assert!(parse_page("NO_TRANSACTIONS", "s", 1).unwrap().is_empty());
        assert!(parse_page("NO_AI_TRANSACTIONS", "s", 2).unwrap().is_empty());
        assert!(parse_page("```\nNO_TRANSACTIONS\n```", "s", 1).unwrap().is_empty());
    }

    #[test]
    fn test_error_output_yields_zero_records() {
        assert!(parse_page("ERROR: Timeout", "s", 1).unwrap().is_empty());
    }

    #[test]
    fn test_prose_around_lines_is_ignored() {
        let raw = "Here are the transactions I found:\n\
                   19/05/25|20/05/25|ANTHROPIC|182.70\n\
                   Let me know if you need anything else.";
        let txns = parse_page(raw, "s", 1).unwrap();
        assert_eq!(txns.len(), 1);
    }

    #[test]
    fn test_header_echo_is_rejected() {
        let raw = "DATE|POSTING_DATE|DESCRIPTION|AMOUNT\n19/05/25|20/05/25|ANTHROPIC|182.70";
        let txns = parse_page(raw, "s", 1).unwrap();
        assert_eq!(txns.len(), 1);
    }

    #[test]
    fn test_too_few_segments_rejected() {
        assert!(parse_page("19/05/25|20/05/25|ANTHROPIC", "s", 1).unwrap().is_empty());
    }

    #[test]
    fn test_non_date_first_segment_rejected() {
        assert!(parse_page("total|20/05/25|ANTHROPIC|182.70", "s", 1).unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_amount_rejected() {
        assert!(parse_page("19/05/25|20/05/25|ANTHROPIC|N/A", "s", 1).unwrap().is_empty());
    }

    #[test]
    fn test_never_panics_on_noise() {
        for noise in [
            "",
            "|||",
            "| | | |",
            "```json",
            "ยอดรวมทั้งสิ้น 12,345.67",
            "19/05/25",
            "\u{0}\u{1}\u{2}|x|y|z",
        ] {
            let _ = parse_page(noise, "s", 1).unwrap();
        }
    }

    #[test]
    fn test_preserves_input_order() {
        let raw = "19/05/25|20/05/25|A|1.00\n20/05/25|21/05/25|B|2.00\n21/05/25|22/05/25|C|3.00";
        let txns = parse_page(raw, "s", 1).unwrap();
        let descs: Vec<_> = txns.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_ocr_rows() {
        let text = "\
KTC VISA PLATINUM
19/05/25  20/05/25  ANTHROPIC ANTHROPIC.COMUS USD 5.35      182.70
07/01/25  07/01/25  Payment-KTB Internet                  -8,851.33
Please pay before the due date.
";
        let txns = parse_ocr_text(text, "2025-06-01", 1).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].description, "ANTHROPIC ANTHROPIC.COMUS USD 5.35");
        assert_eq!(txns[0].amount, "182.70");
        assert_eq!(txns[1].amount, "-8,851.33");
    }

    #[test]
    fn test_ocr_four_digit_year() {
        let txns = parse_ocr_text("19/05/2025  20/05/2025  SHOPEE BANGKOK TH  199.00", "s", 1)
            .unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].trans_date, "19/05/2025");
    }

    #[test]
    fn test_ocr_rejects_headers_and_slip_text() {
        let text = "Trans. Date  Posting Date  Description  Amount\nAmount due 8,851.33";
        assert!(parse_ocr_text(text, "s", 1).unwrap().is_empty());
    }
}
