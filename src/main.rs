//! steady-points - find steady operational points in a CSV table

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use steady_points::pipeline::{analyse_operational_points, LOG_FILE};
use steady_points::AnalysisConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "steady-points")]
#[command(about = "Find steady-state operational points in process data", long_about = None)]
#[command(version)]
struct Cli {
    /// Rule file (YAML, TOML or JSON)
    #[arg(short, long, env = "STEADY_POINTS_CONFIG")]
    config: PathBuf,

    /// Input table (CSV or XLSX)
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for result files and the log
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Log filter, e.g. `info` or `steady_window=debug`
    #[arg(long, env = "STEADY_POINTS_LOG", default_value = "info")]
    log_level: String,

    /// Only log to the file in the output directory
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("cannot create output directory {}", cli.output_dir.display()))?;
    init_tracing(&cli)?;

    let config = AnalysisConfig::load_validated(&cli.config)
        .with_context(|| format!("invalid configuration {}", cli.config.display()))?;

    let report = analyse_operational_points(&config, &cli.input, &cli.output_dir)
        .with_context(|| format!("analysis of {} failed", cli.input.display()))?;

    if !cli.quiet {
        println!(
            "{} operational point(s) in {} of {} rows",
            report.point_count(),
            report.filtered_rows,
            report.input_rows
        );
        println!("  {}", report.points_path.display());
        println!("  {}", report.means_path.display());
    }
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let log_path = cli.output_dir.join(LOG_FILE);
    let log_file = File::create(&log_path)
        .with_context(|| format!("cannot create log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_new(&cli.log_level)
        .with_context(|| format!("invalid log filter '{}'", cli.log_level))?;
    let stderr_layer = (!cli.quiet).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(log_file)))
        .init();
    Ok(())
}
