//! PDF rasterization, delegated to an external converter.
//!
//! The converter is treated as a black box with the `pdftoppm` calling
//! convention: `<converter> -jpeg -r 144 <pdf> <prefix>` writing
//! `<prefix>-<n>.jpg` per page. Output is renamed to the
//! `<stem>_page_<n>.jpg` convention the rest of the pipeline parses,
//! preserving page order.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use regex::Regex;
use tokio::process::Command;

/// Convert every PDF in `input_dir` into page JPEGs under `out_dir`.
///
/// No PDFs in the input directory halts the run before any processing;
/// a converter failure on one PDF is reported and skipped.
pub async fn rasterize_dir(
    input_dir: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    converter: &str,
) -> Result<Vec<PathBuf>> {
    let input_dir = input_dir.as_ref();
    let out_dir = out_dir.as_ref();

    let mut pdfs: Vec<PathBuf> = fs::read_dir(input_dir)
        .with_context(|| format!("reading {}", input_dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    pdfs.sort();

    if pdfs.is_empty() {
        bail!("no PDF files found in {}", input_dir.display());
    }

    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    println!("[OK] Found {} PDF file(s)", pdfs.len());

    let mut images = Vec::new();
    for pdf in &pdfs {
        let Some(stem) = pdf.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        println!("  Converting: {}", pdf.display());

        let prefix = out_dir.join(stem);
        let status = Command::new(converter)
            .arg("-jpeg")
            .arg("-r")
            .arg("144")
            .arg(pdf)
            .arg(&prefix)
            .status()
            .await
            .with_context(|| format!("spawning {converter}"))?;

        if !status.success() {
            eprintln!("    [ERROR] {converter} exited with {status} for {}", pdf.display());
            continue;
        }

        let mut pages = collect_pages(out_dir, stem)?;
        println!("    [OK] Converted {} page(s)", pages.len());
        images.append(&mut pages);
    }

    Ok(images)
}

/// Rename the converter's `<stem>-<n>.jpg` output (page numbers may be
/// zero-padded) to `<stem>_page_<n>.jpg`, returning the renamed paths in
/// page order.
fn collect_pages(out_dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    let re = Regex::new(&format!(r"^{}-0*(\d+)\.jpg$", regex::escape(stem)))?;

    let mut numbered = Vec::new();
    for entry in fs::read_dir(out_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(caps) = re.captures(name) {
            let page: u32 = caps[1].parse().unwrap_or(1);
            numbered.push((page, path));
        }
    }
    numbered.sort_by_key(|(page, _)| *page);

    let mut renamed = Vec::new();
    for (page, path) in numbered {
        let target = out_dir.join(format!("{stem}_page_{page}.jpg"));
        fs::rename(&path, &target)
            .with_context(|| format!("renaming {} -> {}", path.display(), target.display()))?;
        renamed.push(target);
    }

    Ok(renamed)
}
