//! End-to-end pipeline scenarios on canned extraction output:
//! parse → dedupe → classify → aggregate → report.

use rust_decimal::Decimal;
use spendscan_core::{
    ClassifyMode, aggregate, classify, dedupe, parse_page, report,
};
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn test_anthropic_line_flows_to_bucket() {
    let raw = "19/05/25|20/05/25|ANTHROPIC ANTHROPIC.COMUS USD 5.35|182.70";
    let txns = parse_page(raw, "2025-06-01", 1).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].trans_date, "19/05/25");
    assert_eq!(txns[0].post_date, "20/05/25");
    assert_eq!(txns[0].description, "ANTHROPIC ANTHROPIC.COMUS USD 5.35");
    assert_eq!(txns[0].amount, "182.70");

    let classified = classify(dedupe(txns), ClassifyMode::FilterExpenses);
    assert_eq!(classified[0].service.as_deref(), Some("Anthropic AI"));

    let buckets = aggregate(&classified);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].service, "Anthropic AI");
    assert_eq!(buckets[0].count, 1);
    assert_eq!(buckets[0].total, dec("182.70"));
}

#[test]
fn test_statement_payment_excluded_in_filter_mode() {
    // Negative amounts are credits/payments, not AI spend.
    let raw = "07/01/25|07/01/25|Payment-KTB Internet|-8,851.33";
    let txns = parse_page(raw, "2025-01-07", 1).unwrap();
    assert_eq!(txns[0].amount_value(), Some(dec("-8851.33")));

    let classified = classify(txns, ClassifyMode::FilterExpenses);
    assert!(classified.is_empty());
}

#[test]
fn test_two_passes_same_page_dedupe_to_one() {
    let raw = "19/05/25|20/05/25|ANTHROPIC ANTHROPIC.COMUS USD 5.35|182.70";
    let mut txns = parse_page(raw, "2025-06-01", 1).unwrap();
    txns.extend(parse_page(raw, "2025-06-01", 1).unwrap());
    assert_eq!(txns.len(), 2);
    assert_eq!(dedupe(txns).len(), 1);
}

#[test]
fn test_sentinel_page_is_not_an_error() {
    let raw = "```\nNO_TRANSACTIONS\n```";
    assert!(parse_page(raw, "2025-06-01", 2).unwrap().is_empty());
}

#[test]
fn test_zai_rule_outranks_google_cloud_rule() {
    let raw = "19/05/25|20/05/25|STRIPE Z.AI GOOGLE CLOUD RESELLER|120.00";
    let classified = classify(
        parse_page(raw, "s", 1).unwrap(),
        ClassifyMode::FilterExpenses,
    );
    assert_eq!(classified[0].service.as_deref(), Some("Z.AI Service"));
}

#[test]
fn test_full_statement_run_filter_mode() {
    // A realistic mixed page: AI spend, shopping, a refund, a payment,
    // tool prose, and a duplicated line from a second pass.
    let raw = "\
Here is the transaction data:
```
18/12/24|20/12/24|SHOPEE BANGKOK TH|199.00
19/05/25|20/05/25|ANTHROPIC ANTHROPIC.COMUS USD 5.35|182.70
19/05/25|20/05/25|ANTHROPIC ANTHROPIC.COMUS USD 5.35|182.70
01/09/25|02/09/25|OPENROUTER, INC OPENROUTER.AIUS USD 5.80|191.91
02/09/25|03/09/25|OPENROUTER, INC OPENROUTER.AIUS USD 31.10|1,065.40
03/09/25|04/09/25|ANTHROPIC ANTHROPIC.COMUS USD -5.00|-170.55
07/01/25|07/01/25|Payment-KTB Internet|-8,851.33
```
";
    let txns = parse_page(raw, "2025-09-05", 1).unwrap();
    assert_eq!(txns.len(), 7);

    let unique = dedupe(txns);
    assert_eq!(unique.len(), 6);

    let classified = classify(unique, ClassifyMode::FilterExpenses);
    // Shopee, the refund, and the payment are gone.
    assert_eq!(classified.len(), 3);

    let buckets = aggregate(&classified);
    let openrouter = buckets.iter().find(|b| b.service == "OpenRouter AI").unwrap();
    assert_eq!(openrouter.count, 2);
    assert_eq!(openrouter.total, dec("1257.31"));

    let summary = report::render_summary(&buckets);
    assert!(summary.contains("AI TRANSACTION SUMMARY"));
    assert!(summary.contains("1,257.31 THB"));
    // OpenRouter has the larger total, so it renders first.
    assert!(summary.find("OpenRouter AI").unwrap() < summary.find("Anthropic AI").unwrap());
    assert!(summary.contains("1,440.01 THB"));
}

#[test]
fn test_brain_variant_label_mode() {
    // Extract-and-classify output: five segments, tool-assigned labels.
    let raw = "\
19/05/25|20/05/25|ANTHROPIC ANTHROPIC.COMUS USD 5.35|182.70|Anthropic AI
01/09/25|02/09/25|SOME NEW LLM VENDOR|99.00|
02/09/25|03/09/25|FAL.AI SAN FRANCISCO US|45.00|Fal.ai
";
    let classified = classify(
        dedupe(parse_page(raw, "2025-09-05", 1).unwrap()),
        ClassifyMode::LabelAll,
    );
    assert_eq!(classified.len(), 3);
    assert_eq!(classified[0].service.as_deref(), Some("Anthropic AI"));
    // Empty fifth segment falls back to the generic label.
    assert_eq!(classified[1].service.as_deref(), Some("Other AI Service"));
    // No rule matches, so the tool's label is kept.
    assert_eq!(classified[2].service.as_deref(), Some("Fal.ai"));
}

#[test]
fn test_sheets_rows_from_classified_run() {
    let raw = "\
19/05/25|20/05/25|ANTHROPIC ANTHROPIC.COMUS USD 5.35|182.70
18/12/24|20/12/24|OPENROUTER, INC OPENROUTER.AIUS USD 5.80|191.91
";
    let classified = classify(
        dedupe(parse_page(raw, "2025-06-01", 1).unwrap()),
        ClassifyMode::FilterExpenses,
    );
    let rows = report::sheet_rows(&classified);
    assert_eq!(rows.len(), 2);
    // Ascending by date: December 2024 before May 2025.
    assert_eq!(rows[0].service, "OpenRouter AI");
    assert_eq!(rows[0].month, "December");
    assert_eq!(rows[1].service, "Anthropic AI");
    assert_eq!(rows[1].price, dec("182.70"));
}

#[test]
fn test_aggregate_total_matches_sum_per_label() {
    let raw = "\
01/01/25|01/01/25|RUNPOD.IO CHARGE|35.00
02/01/25|02/01/25|RUNPOD.IO CHARGE TWO|17.53
03/01/25|03/01/25|RUNPOD.IO CHARGE THREE|0.47
";
    let classified = classify(
        parse_page(raw, "2025-01-31", 1).unwrap(),
        ClassifyMode::FilterExpenses,
    );
    let buckets = aggregate(&classified);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].count, 3);
    assert_eq!(buckets[0].total, dec("53.00"));
}
