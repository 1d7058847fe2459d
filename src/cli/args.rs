//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

/// Recoda - Recode, label and summarize categorical survey data
#[derive(Parser, Debug)]
#[command(name = "recoda")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Recode plan file (JSON): selected columns, sentinel, continuous
    /// columns, collapse rules, label maps, report and model choices
    #[arg(short, long)]
    pub plan: PathBuf,

    /// Output file path (CSV or Parquet, determined by extension).
    /// Defaults to the input directory with a '_recoded' suffix
    /// (e.g., data.csv → data_recoded.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Higher values improve type detection for ambiguous columns but may
    /// be slower. Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Skip the descriptive summary and exploratory views
    #[arg(long, default_value = "false")]
    pub skip_report: bool,

    /// Skip the logistic model fit
    #[arg(long, default_value = "false")]
    pub skip_model: bool,
}

impl Cli {
    /// Get the output path, deriving from the input if not explicitly
    /// provided. The derived path is in the same directory as the input
    /// with a '_recoded' suffix.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let parent = self
                .input
                .parent()
                .unwrap_or_else(|| std::path::Path::new("."));
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            let extension = self
                .input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("csv");
            parent.join(format!("{}_recoded.{}", stem, extension))
        })
    }
}
