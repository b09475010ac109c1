use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::batch::{self, RunOptions};
use crate::config::{Layout, LayoutOverrides};
use crate::data::model::Dataset;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert wide filter / QE TSV files to tall layout in place"
)]
pub struct Cli {
    /// Directory holding the default data folders (defaults to the executable's directory)
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// JSON file overriding the directory layout
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub filters_dir: Option<PathBuf>,

    #[arg(long)]
    pub qe_dir: Option<PathBuf>,

    /// Where files that fail to convert are moved
    #[arg(long)]
    pub quarantine_dir: Option<PathBuf>,

    /// File extension to convert
    #[arg(long)]
    pub extension: Option<String>,

    /// Only process one dataset
    #[arg(long, value_enum)]
    pub only: Option<Only>,

    /// Parse and transpose without writing, moving or deleting anything
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long)]
    pub no_progress: bool,

    /// Also write the run summary as JSON
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Only {
    Filters,
    Qe,
}

impl Cli {
    /// Resolve the layout: base dir, then config file, then flags.
    pub fn layout(&self) -> Result<Layout> {
        let mut layout = match &self.base_dir {
            Some(base) => Layout::under(base),
            None => Layout::beside_executable()?,
        };

        if let Some(config) = &self.config {
            let overrides = LayoutOverrides::from_json_file(config)?;
            let config_dir = config.parent().map(|p| p.to_path_buf()).unwrap_or_default();
            layout = layout.apply(overrides, Some(&config_dir));
        }

        let flags = LayoutOverrides {
            filters_dir: self.filters_dir.clone(),
            qe_dir: self.qe_dir.clone(),
            quarantine_dir: self.quarantine_dir.clone(),
            extension: self.extension.clone(),
        };
        Ok(layout.apply(flags, None))
    }

    pub fn run_options(&self) -> RunOptions {
        let datasets = match self.only {
            Some(Only::Filters) => vec![Dataset::Filters],
            Some(Only::Qe) => vec![Dataset::QuantumEfficiency],
            None => Dataset::ALL.to_vec(),
        };
        RunOptions {
            datasets,
            dry_run: self.dry_run,
            show_progress: !self.no_progress,
        }
    }
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    });
    // RUST_LOG, when set, wins over -v.
    builder.parse_default_env();
    builder.format_timestamp_secs().init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let layout = cli.layout()?;
    log::info!(
        "Filters: {}, QE: {}, quarantine: {}",
        layout.filters_dir.display(),
        layout.qe_dir.display(),
        layout.quarantine_dir.display()
    );

    println!("Converting files...");
    let summary = batch::run(&layout, &cli.run_options())?;
    print!("{summary}");

    if let Some(path) = &cli.report_json {
        let json = serde_json::to_string_pretty(&summary).context("serializing run summary")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report {}", path.display()))?;
        log::info!("Wrote report to {}", path.display());
    }
    Ok(())
}
