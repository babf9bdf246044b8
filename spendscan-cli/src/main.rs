use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use spendscan_core::{ClassifyMode, aggregate, classify, dedupe, report};
use spendscan_extract::{discover_pages, prompts, rasterize_dir};

mod config;
mod workflow;

#[derive(Parser, Debug)]
#[command(name = "spendscan", version, about = "AI-spend reports from credit-card statement PDFs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full workflow: rasterize PDFs, extract all transactions, keep AI
    /// spend, write CSV and print the summary
    Run {
        /// Directory containing statement PDFs
        dir: PathBuf,

        /// Output directory (default: <dir>/workflow_output)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Like `run`, but the AI tool classifies at extraction time and
    /// returns only AI-related transactions with service labels
    Brain {
        /// Directory containing statement PDFs
        dir: PathBuf,

        /// Output directory (default: <dir>/workflow_output)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Extract every transaction from already-converted page images
    Extract {
        /// Directory of <statement_id>_page_<n>.jpg images
        images: PathBuf,

        /// Output CSV path
        #[arg(long, default_value = "all_transactions.csv")]
        out: PathBuf,
    },

    /// Reformat a transaction CSV export for spreadsheet import
    Sheets {
        /// Transaction CSV (as written by `run` or `extract`)
        csv: PathBuf,

        /// Output CSV path
        #[arg(long, default_value = "ai_transactions_for_sheets.csv")]
        out: PathBuf,
    },

    /// Write a default ~/.spendscan/config.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run { dir, out } => {
            run_workflow(dir, out, prompts::EXTRACT_ALL, ClassifyMode::FilterExpenses).await?;
        }
        Command::Brain { dir, out } => {
            run_workflow(dir, out, prompts::EXTRACT_AI_ONLY, ClassifyMode::LabelAll).await?;
        }
        Command::Extract { images, out } => {
            extract_images(images, out).await?;
        }
        Command::Sheets { csv, out } => {
            format_sheets(csv, out)?;
        }
        Command::Init => {
            config::init_config()?;
        }
    }

    Ok(())
}

async fn run_workflow(
    dir: PathBuf,
    out: Option<PathBuf>,
    prompt: &str,
    mode: ClassifyMode,
) -> Result<()> {
    let bar = "=".repeat(70);
    println!("{bar}\nAI Transaction Extraction Workflow\n{bar}\n");

    let cfg = config::load_config()?;
    preflight(&cfg.extract.command)?;

    let out_dir = out.unwrap_or_else(|| dir.join("workflow_output"));
    let jpeg_dir = out_dir.join("jpeg_converted");

    println!("[STEP 1] Converting PDFs to JPEG images...");
    let images = rasterize_dir(&dir, &jpeg_dir, &cfg.convert.command).await?;
    if images.is_empty() {
        bail!("no images converted from {}", dir.display());
    }
    println!("[OK] Total images converted: {}\n", images.len());

    println!("[STEP 2] Extracting transactions from images...");
    let pages = discover_pages(&jpeg_dir)?;
    let extractor = cfg.extract.extractor();
    let txns = workflow::extract_pages(&extractor, prompt, &pages, cfg.extract.delay()).await?;
    println!("[OK] Extracted {} total transactions\n", txns.len());

    println!("[STEP 3] Filtering and classifying...");
    let before = txns.len();
    let unique = dedupe(txns);
    println!("[OK] {} transactions after deduplication (was {})", unique.len(), before);
    let classified = classify(unique, mode);
    println!("[OK] {} AI transactions\n", classified.len());

    let csv_path = out_dir.join("ai_transactions.csv");
    report::write_transactions_csv(&csv_path, &classified, true, true)
        .with_context(|| format!("writing {}", csv_path.display()))?;

    println!("[STEP 4] Generating summary...\n");
    let buckets = aggregate(&classified);
    print!("{}", report::render_summary(&buckets));

    println!("\n{bar}\nWORKFLOW COMPLETE\n{bar}\n");
    println!("Output file: {}", csv_path.display());
    print_import_instructions(&csv_path);
    Ok(())
}

async fn extract_images(images: PathBuf, out: PathBuf) -> Result<()> {
    let cfg = config::load_config()?;
    preflight(&cfg.extract.command)?;

    let pages = discover_pages(&images)?;
    if pages.is_empty() {
        bail!("no page images found in {}", images.display());
    }
    println!("Found {} images to process\n", pages.len());

    let extractor = cfg.extract.extractor();
    let txns =
        workflow::extract_pages(&extractor, prompts::EXTRACT_ALL, &pages, cfg.extract.delay())
            .await?;

    println!("\nTotal transactions before deduplication: {}", txns.len());
    let unique = dedupe(txns);
    println!("Total transactions after deduplication: {}", unique.len());

    report::write_transactions_csv(&out, &unique, false, false)
        .with_context(|| format!("writing {}", out.display()))?;
    println!("\n[SUCCESS] Transactions saved to: {}", out.display());
    Ok(())
}

fn format_sheets(csv: PathBuf, out: PathBuf) -> Result<()> {
    let txns = report::read_transactions_csv(&csv)?;

    // Classification doubles as the AI filter here: the input export may
    // contain every transaction on the statements.
    let classified = classify(txns, ClassifyMode::FilterExpenses);
    let rows = report::sheet_rows(&classified);

    report::write_sheets_csv(&out, &rows)
        .with_context(|| format!("writing {}", out.display()))?;

    println!("[OK] Formatted {} AI transactions for spreadsheet import", rows.len());
    println!("[OK] Saved to: {}\n", out.display());

    if !rows.is_empty() {
        println!("Sample data:");
        for r in rows.iter().take(5) {
            println!(
                "  {:<10} {:<10} {:<25} {:>10}",
                r.date,
                r.month,
                r.service,
                report::format_thb(r.price)
            );
        }
        if rows.len() > 5 {
            println!("  ... and {} more rows", rows.len() - 5);
        }
    }

    print_import_instructions(&out);
    Ok(())
}

fn preflight(command: &str) -> Result<()> {
    if which::which(command).is_err() {
        bail!(
            "extraction tool `{command}` not found on PATH.\n\
             Install it, or point [extract].command in ~/.spendscan/config.toml \
             at a compatible CLI (run `spendscan init` to write the default config)."
        );
    }
    Ok(())
}

fn print_import_instructions(path: &std::path::Path) {
    println!("\nTo import into Google Sheets:");
    println!("  1. Open Google Sheets");
    println!("  2. File > Import");
    println!("  3. Upload: {}", path.display());
    println!("  4. Choose 'Replace spreadsheet' or 'Append to current sheet'");
}
