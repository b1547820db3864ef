//! cbl-analyzer - cement bond and casing collar log evaluation
//!
//! # Usage
//!
//! ```bash
//! # Cement quality, TOC and perforation verdicts
//! cbl-analyzer cement --log well.las --perforations perfs.txt --amplitude 72 --toc 1500
//!
//! # Collar detection and cut proposal
//! cbl-analyzer collars --log well.las --gain 0.15
//!
//! # Full JSON report
//! cbl-analyzer report --log well.las --perforations perfs.txt --output report.json
//! ```
//!
//! # Environment Variables
//!
//! - `CBL_ANALYZER_CONFIG`: Path to the analysis config TOML
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cbl_analyzer::analysis::{self, AnalysisParams};
use cbl_analyzer::config::AnalysisConfig;
use cbl_analyzer::loader::load_log;
use cbl_analyzer::perforations::parse_perforation_table;
use cbl_analyzer::quality_control::summarize;
use cbl_analyzer::report::{narrative, AnalysisReport};
use cbl_analyzer::types::{IntervalVerdict, PerforationInterval, QualityLabel, WellLog};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "cbl-analyzer")]
#[command(about = "Cement bond log (CBL) and casing collar log (CCL) analyzer")]
#[command(version)]
struct CliArgs {
    /// Path to the analysis config TOML (overrides CBL_ANALYZER_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Cement quality: top of cement and perforation-interval verdicts
    Cement {
        /// Well log (LAS 2.0 or delimited table)
        #[arg(long)]
        log: PathBuf,
        /// Two-column perforation table (top, base)
        #[arg(long)]
        perforations: Option<PathBuf>,
        #[command(flatten)]
        overrides: CementOverrides,
    },

    /// Collar detection and cut proposal from the CCL curve
    Collars {
        #[arg(long)]
        log: PathBuf,
        #[command(flatten)]
        overrides: CollarOverrides,
    },

    /// Curve statistics and missing-data counts
    Qc {
        #[arg(long)]
        log: PathBuf,
    },

    /// Run every analysis and emit the JSON report
    Report {
        #[arg(long)]
        log: PathBuf,
        #[arg(long)]
        perforations: Option<PathBuf>,
        /// Write the report here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Include the per-sample quality column
        #[arg(long)]
        include_samples: bool,
        #[command(flatten)]
        cement: CementOverrides,
        #[command(flatten)]
        collars: CollarOverrides,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(clap::Args, Debug)]
struct CementOverrides {
    /// Free-pipe reference amplitude (mV)
    #[arg(long)]
    amplitude: Option<f64>,
    /// Theoretical top of cement
    #[arg(long)]
    toc: Option<f64>,
    /// Margin added to both ends of each perforation interval
    #[arg(long)]
    margin: Option<f64>,
}

#[derive(clap::Args, Debug)]
struct CollarOverrides {
    /// CCL gain fraction in [0, 1]
    #[arg(long)]
    gain: Option<f64>,
    /// Nominal collar spacing (joint length)
    #[arg(long)]
    spacing: Option<f64>,
    /// Spacing and duplicate tolerance
    #[arg(long)]
    tolerance: Option<f64>,
    /// Cut lookback window above each collar
    #[arg(long)]
    lookback: Option<f64>,
}

impl CementOverrides {
    fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(v) = self.amplitude {
            config.cement.free_pipe_amplitude = v;
        }
        if let Some(v) = self.toc {
            config.cement.theoretical_toc = v;
        }
        if let Some(v) = self.margin {
            config.cement.margin = v;
        }
    }
}

impl CollarOverrides {
    fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(v) = self.gain {
            config.collars.gain_fraction = v;
        }
        if let Some(v) = self.spacing {
            config.collars.spacing = v;
        }
        if let Some(v) = self.tolerance {
            config.collars.tolerance = v;
        }
        if let Some(v) = self.lookback {
            config.cut.lookback = v;
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(AnalysisConfig::load()),
    }
}

fn load_well(path: &Path, config: &AnalysisConfig) -> Result<WellLog> {
    let mut log = load_log(path, &config.loader)
        .with_context(|| format!("Failed to load well log {}", path.display()))?;
    if !config.well.name.is_empty() {
        log.well_name = config.well.name.clone();
    }
    Ok(log)
}

fn load_perforations(path: Option<&Path>) -> Result<Vec<PerforationInterval>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read perforation table {}", path.display()))?;
    let intervals = parse_perforation_table(&text)
        .with_context(|| format!("Invalid perforation table {}", path.display()))?;
    info!(path = %path.display(), intervals = intervals.len(), "Loaded perforation table");
    Ok(intervals)
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_cement(log: &WellLog, perforations: &[PerforationInterval], params: &AnalysisParams) -> Result<()> {
    let cement = analysis::analyze_cement(&log.samples, perforations, params)?;

    println!("Well: {}", log.well_name);
    println!(
        "Theoretical TOC: {:.2}   Calculated TOC: {}   ({} readings)",
        cement.toc.theoretical_toc,
        fmt_opt(cement.toc.calculated_toc),
        cement.toc.candidate_count
    );
    if let Some(ref verdict) = cement.toc.range_verdict {
        println!(
            "Range {:.2}-{:.2}: {}",
            verdict.window.top,
            verdict.window.base,
            percentages_line(verdict)
        );
        println!(
            "{}",
            narrative::conclusion(
                verdict.dominant_label,
                Some(verdict.dominant_percentage()),
                cement.toc.calculated_toc
            )
        );
    }

    if !cement.intervals.is_empty() {
        println!();
        println!("{:>10} {:>10} {:>8} {:>9}  Breakdown", "Top", "Base", "Samples", "Dominant");
        for v in &cement.intervals {
            let (top, base) = v.interval.map_or((v.window.top, v.window.base), |i| (i.top, i.base));
            println!(
                "{:>10.2} {:>10.2} {:>8} {:>9}  {}",
                top,
                base,
                v.sample_count,
                v.dominant_label,
                percentages_line(v)
            );
        }
        if let Some(text) = narrative::interval_conclusion(&cement.intervals) {
            println!("{text}");
        }
    }

    for w in &cement.warnings {
        println!("WARNING: {w}");
    }
    Ok(())
}

fn percentages_line(verdict: &IntervalVerdict) -> String {
    QualityLabel::ALL
        .iter()
        .map(|&l| format!("{l} {:.1}%", verdict.percentage(l)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn run_collars(log: &WellLog, params: &AnalysisParams) -> Result<()> {
    let result = analysis::analyze_collars(log, params)?;

    println!("Well: {}", log.well_name);
    if let Some(t) = result.thresholds {
        println!(
            "CCL thresholds (gain {:.2}): upper {:.3}, lower {:.3}",
            t.gain_fraction, t.upper, t.lower
        );
    }

    if !result.scan.collars.is_empty() {
        println!();
        println!("{:<7} {:>10} {:>10}  Validity", "Collar", "Depth", "CCL");
        for c in &result.scan.collars {
            println!("{:<7} {:>10.2} {:>10.3}  {:?}", c.label, c.depth, c.ccl, c.validity);
        }
    }

    if !result.cuts.candidates.is_empty() {
        println!();
        println!("{:<7} {:>17} {:>8} {:>8} {:>8}  Qualifies", "Collar", "Range", "Samples", "LIBRE%", "AGARRE%");
        for c in &result.cuts.candidates {
            println!(
                "{:<7} {:>8.2}-{:<8.2} {:>8} {:>8.1} {:>8.1}  {}",
                c.collar_label,
                c.range_top,
                c.range_base,
                c.sample_count,
                c.free_percentage,
                c.stuck_percentage,
                if c.qualifies { "yes" } else { "no" }
            );
        }
    }

    match result.cuts.proposal {
        Some(ref p) => println!(
            "Proposed cut: {:.2} ({} at {:.2})",
            p.cut_depth, p.collar_label, p.collar_depth
        ),
        None => println!("Proposed cut: none"),
    }
    for w in &result.warnings {
        println!("WARNING: {w}");
    }
    Ok(())
}

fn run_qc(log: &WellLog) {
    let summary = summarize(log);
    println!("Well: {}   Samples: {}", summary.well_name, summary.sample_count);
    println!(
        "Depth: {} - {}   Step: {}",
        fmt_opt(summary.top_depth),
        fmt_opt(summary.bottom_depth),
        fmt_opt(summary.depth_step)
    );
    println!();
    println!(
        "{:<10} {:>8} {:>8} {:>8} {:>10} {:>10} {:>10} {:>10}",
        "Curve", "Count", "Missing", "Miss%", "Min", "Max", "Mean", "StdDev"
    );
    for c in &summary.curves {
        println!(
            "{:<10} {:>8} {:>8} {:>8.1} {:>10} {:>10} {:>10} {:>10}",
            c.mnemonic,
            c.count,
            c.missing,
            c.missing_percentage(),
            fmt_opt(c.min),
            fmt_opt(c.max),
            fmt_opt(c.mean),
            fmt_opt(c.std_dev)
        );
    }

    let matrix = &summary.correlations;
    if matrix.curves.len() > 1 {
        println!();
        println!("Correlation (Pearson)");
        let header: String = matrix.curves.iter().map(|c| format!(" {c:>8}")).collect();
        println!("{:<10}{header}", "");
        for (name, row) in matrix.curves.iter().zip(&matrix.values) {
            let cells: String = row
                .iter()
                .map(|r| r.map_or_else(|| format!(" {:>8}", "-"), |r| format!(" {r:>8.2}")))
                .collect();
            println!("{name:<10}{cells}");
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.json_logs);

    let mut config = load_config(args.config.as_deref())?;

    match args.command {
        SubCommand::Cement {
            log,
            perforations,
            overrides,
        } => {
            overrides.apply(&mut config);
            config.validate().context("Invalid analysis parameters")?;
            let well = load_well(&log, &config)?;
            let perforations = load_perforations(perforations.as_deref())?;
            run_cement(&well, &perforations, &AnalysisParams::from_config(&config))?;
        }
        SubCommand::Collars { log, overrides } => {
            overrides.apply(&mut config);
            config.validate().context("Invalid analysis parameters")?;
            let well = load_well(&log, &config)?;
            run_collars(&well, &AnalysisParams::from_config(&config))?;
        }
        SubCommand::Qc { log } => {
            let well = load_well(&log, &config)?;
            run_qc(&well);
        }
        SubCommand::Report {
            log,
            perforations,
            output,
            include_samples,
            cement,
            collars,
        } => {
            cement.apply(&mut config);
            collars.apply(&mut config);
            config.validate().context("Invalid analysis parameters")?;

            let well = load_well(&log, &config)?;
            let perforations = load_perforations(perforations.as_deref())?;
            let params = AnalysisParams::from_config(&config);
            let outcome = analysis::run(&well, &perforations, &params)?;
            let report = AnalysisReport::build(&well, &config, &params, outcome, include_samples);

            match output {
                Some(path) => report.write_to(&path)?,
                None => println!("{}", report.to_json()?),
            }
        }
        SubCommand::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
