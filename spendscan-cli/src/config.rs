use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use spendscan_extract::OpencodeExtractor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub extract: ExtractSection,
    pub convert: ConvertSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractSection {
    /// AI CLI to shell out to (default: "opencode")
    pub command: String,
    /// Model identifier passed via -m
    pub model: String,
    /// Extra args inserted before the image flag (provider profile etc.)
    pub args: Vec<String>,
    /// Per-page extraction timeout
    pub timeout_secs: u64,
    /// Courtesy delay between successive extractions
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertSection {
    /// pdftoppm-compatible PDF rasterizer
    pub command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extract: ExtractSection {
                command: "opencode".to_string(),
                model: "kimi-for-coding/k2p5".to_string(),
                args: Vec::new(),
                timeout_secs: 120,
                delay_ms: 1000,
            },
            convert: ConvertSection {
                command: "pdftoppm".to_string(),
            },
        }
    }
}

impl ExtractSection {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn extractor(&self) -> OpencodeExtractor {
        let mut ex = OpencodeExtractor::new(
            &self.command,
            &self.model,
            Duration::from_secs(self.timeout_secs),
        );
        ex.extra_args = self.args.clone();
        ex
    }
}

pub fn spendscan_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".spendscan"))
}

pub fn ensure_spendscan_home() -> Result<PathBuf> {
    let dir = spendscan_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_spendscan_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
