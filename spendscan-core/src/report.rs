//! Report rendering and CSV output.
//!
//! Three surfaces: the console summary table, the transaction CSV export
//! (spreadsheet-importable, optional UTF-8 BOM for tools that need it to
//! detect the encoding of Thai description text), and the sheets-ready CSV
//! with localized headers.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::aggregate::ServiceTotal;
use crate::types::Transaction;

const BOM: &[u8] = b"\xef\xbb\xbf";

/// Format a decimal with comma thousands grouping and two fraction digits.
pub fn format_thb(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}

/// Render the per-vendor summary table, sorted by total descending.
/// The sort is stable, so equal totals keep first-attribution order.
pub fn render_summary(buckets: &[ServiceTotal]) -> String {
    let mut sorted: Vec<&ServiceTotal> = buckets.iter().collect();
    sorted.sort_by(|a, b| b.total.cmp(&a.total));

    let bar = "=".repeat(70);
    let mut out = String::new();
    out.push_str(&bar);
    out.push_str("\nAI TRANSACTION SUMMARY\n");
    out.push_str(&bar);
    out.push_str("\n\n");

    for b in &sorted {
        out.push_str(&format!(
            "{:.<50} {:>3} txns  {:>12} THB\n",
            b.service,
            b.count,
            format_thb(b.total)
        ));
    }

    let total_count: usize = sorted.iter().map(|b| b.count).sum();
    let total_amount: Decimal = sorted.iter().map(|b| b.total).sum();

    out.push('\n');
    out.push_str(&"-".repeat(70));
    out.push_str(&format!(
        "\n{:.<50} {:>3} txns  {:>12} THB\n",
        "TOTAL",
        total_count,
        format_thb(total_amount)
    ));
    out.push_str(&bar);
    out.push('\n');
    out
}

/// Write transactions as CSV. Columns: Statement ID, Page, Transaction
/// Date, Posting Date, Description, Amount (THB), plus Service when
/// classification labels are included.
pub fn write_transactions_csv(
    path: impl AsRef<Path>,
    txns: &[Transaction],
    include_service: bool,
    with_bom: bool,
) -> Result<()> {
    let path = path.as_ref();
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    if with_bom {
        file.write_all(BOM)?;
    }
    write_transactions(&mut file, txns, include_service)
}

fn write_transactions<W: Write>(
    writer: W,
    txns: &[Transaction],
    include_service: bool,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![
        "Statement ID",
        "Page",
        "Transaction Date",
        "Posting Date",
        "Description",
        "Amount (THB)",
    ];
    if include_service {
        header.push("Service");
    }
    wtr.write_record(&header)?;

    for t in txns {
        let mut row = vec![
            t.statement_id.clone(),
            t.page.to_string(),
            t.trans_date.clone(),
            t.post_date.clone(),
            t.description.clone(),
            t.amount.clone(),
        ];
        if include_service {
            row.push(t.service.clone().unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Read back a transaction CSV written by [`write_transactions_csv`].
/// Columns are located by header name, so the Service column is optional.
pub fn read_transactions_csv(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_transactions_csv(&text)
}

/// Parse transaction CSV text (BOM tolerated).
pub fn parse_transactions_csv(text: &str) -> Result<Vec<Transaction>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rdr = csv::Reader::from_reader(text.as_bytes());

    let headers = rdr.headers().context("reading CSV header")?.clone();
    let col = |name: &str| headers.iter().position(|h| h == name);

    let statement_id = col("Statement ID").context("missing 'Statement ID' column")?;
    let page = col("Page").context("missing 'Page' column")?;
    let trans_date = col("Transaction Date").context("missing 'Transaction Date' column")?;
    let post_date = col("Posting Date").context("missing 'Posting Date' column")?;
    let description = col("Description").context("missing 'Description' column")?;
    let amount = col("Amount (THB)").context("missing 'Amount (THB)' column")?;
    let service = col("Service");

    let mut txns = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let get = |i: usize| record.get(i).unwrap_or("").trim().to_string();

        txns.push(Transaction {
            statement_id: get(statement_id),
            page: get(page).parse().unwrap_or(1),
            trans_date: get(trans_date),
            post_date: get(post_date),
            description: get(description),
            amount: get(amount),
            service: service.map(get).filter(|s| !s.is_empty()),
        });
    }

    Ok(txns)
}

/// One row of the spreadsheet-ready export.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub date: String,
    pub month: String,
    pub service: String,
    pub price: Decimal,
}

/// Parse a `DD/MM/YY` or `DD/MM/YYYY` token into a calendar date.
/// Two-digit years are read as 20YY.
pub fn parse_dmy(token: &str) -> Option<NaiveDate> {
    let mut it = token.split('/');
    let day: u32 = it.next()?.parse().ok()?;
    let month: u32 = it.next()?.parse().ok()?;
    let year_str = it.next()?;
    if it.next().is_some() {
        return None;
    }
    let year: i32 = match year_str.len() {
        2 => 2000 + year_str.parse::<i32>().ok()?,
        4 => year_str.parse().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Build sheet rows from classified transactions, sorted ascending by
/// transaction date. Records with an unparseable date or amount, or no
/// service label, are skipped.
pub fn sheet_rows(txns: &[Transaction]) -> Vec<SheetRow> {
    let mut rows: Vec<(NaiveDate, SheetRow)> = txns
        .iter()
        .filter_map(|t| {
            let date = parse_dmy(&t.trans_date)?;
            let price = t.amount_value()?;
            let service = t.service.clone()?;
            Some((
                date,
                SheetRow {
                    date: t.trans_date.clone(),
                    month: date.format("%B").to_string(),
                    service,
                    price,
                },
            ))
        })
        .collect();

    rows.sort_by_key(|(date, _)| *date);
    rows.into_iter().map(|(_, row)| row).collect()
}

/// Write the sheets CSV: Thai headers, one row per transaction with
/// quantity fixed at 1 and total equal to price. BOM is always written —
/// the target spreadsheet tool needs it to read the Thai headers.
pub fn write_sheets_csv(path: impl AsRef<Path>, rows: &[SheetRow]) -> Result<()> {
    let path = path.as_ref();
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    file.write_all(BOM)?;
    write_sheets(&mut file, rows)
}

fn write_sheets<W: Write>(writer: W, rows: &[SheetRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["วันที่", "month(hide)", "รายการ", "ราคา", "จำนวน", "รวม"])?;

    for r in rows {
        wtr.write_record([
            r.date.as_str(),
            r.month.as_str(),
            r.service.as_str(),
            &r.price.to_string(),
            "1",
            &r.price.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
