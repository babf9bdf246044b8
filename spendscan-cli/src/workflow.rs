//! The sequential per-page extraction loop.
//!
//! One image at a time: call the tool, parse whatever came back, move on.
//! A failed or timed-out extraction yields zero records for that page and
//! the batch continues — fewer results, never an aborted run.

use std::time::Duration;

use anyhow::Result;
use spendscan_core::{Transaction, parse_page};
use spendscan_extract::{PageExtractor, PageImage};

/// Extract transactions from every page image, in order, with a fixed
/// courtesy delay between tool invocations.
pub async fn extract_pages(
    extractor: &impl PageExtractor,
    prompt: &str,
    pages: &[PageImage],
    delay: Duration,
) -> Result<Vec<Transaction>> {
    let mut all = Vec::new();

    for (idx, page) in pages.iter().enumerate() {
        let name = page
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<non-utf8>");
        println!(
            "  [{}/{}] Processing: {} ({} - page {})",
            idx + 1,
            pages.len(),
            name,
            page.statement_id,
            page.page
        );

        match extractor.extract(prompt, &page.path).await {
            Ok(raw) => {
                let txns = parse_page(&raw, &page.statement_id, page.page)?;
                if txns.is_empty() {
                    println!("    [INFO] No transactions on this page");
                } else {
                    println!("    [OK] Found {} transaction(s):", txns.len());
                    for t in &txns {
                        println!(
                            "      {:<10} {:<10} {:<48} {:>12}",
                            t.trans_date,
                            t.post_date,
                            truncate(&t.description, 45),
                            t.amount
                        );
                    }
                    all.extend(txns);
                }
            }
            // Per-page degrade: zero records, keep going.
            Err(e) => eprintln!("    [ERROR] {e}"),
        }

        if idx + 1 < pages.len() {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(all)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}...")
    }
}
