use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

use scan_dwc::app::{ConvertRequest, ConvertUseCase, InputSource};
use scan_dwc::constants::DEFAULT_SAMPLING_SEED;
use scan_dwc::observability;
use scan_dwc::parser::{self, InputFormat};
use scan_dwc::pipeline::sampling::SamplingRate;
use scan_dwc::pipeline::{RunOutcome, RunReport};
use scan_dwc::survey;
use scan_dwc::Settings;

/// Exit status when the batch was rejected for data problems
const EXIT_REJECTED: u8 = 2;

#[derive(Parser)]
#[command(name = "scan_dwc")]
#[command(about = "Transforms VectorBase search exports into SCAN Darwin Core format")]
#[command(version)]
struct Cli {
    /// TOML file overriding vocabularies, field mapping or output columns
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write a Prometheus text snapshot of run metrics to this file
    #[arg(long, global = true)]
    metrics_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an export into a Darwin Core CSV, committing only a clean batch
    Convert {
        /// Export file (CSV or JSON)
        #[arg(long, required_unless_present = "url", conflicts_with = "url")]
        input: Option<PathBuf>,

        /// Download the JSON export from this URL instead of reading a file
        #[arg(long)]
        url: Option<String>,

        /// Final output path; written only when no problems are found
        #[arg(long)]
        output: PathBuf,

        /// Input format; inferred from the file extension when omitted
        #[arg(long, value_enum)]
        format: Option<InputFormat>,

        /// Percentage of records to keep (0-100)
        #[arg(long)]
        sample: Option<u32>,

        /// Seed for reproducible sampling
        #[arg(long, default_value_t = DEFAULT_SAMPLING_SEED)]
        seed: u64,

        /// Download timeout in seconds
        #[arg(long, default_value_t = 120)]
        timeout_secs: u64,
    },
    /// Print the distinct values of a field, one per line
    Terms {
        /// Export file (CSV or JSON)
        input: PathBuf,

        /// Source field to survey
        #[arg(long, default_value = "species")]
        field: String,

        /// Count each value of a multi-valued field separately
        #[arg(long)]
        split: bool,

        #[arg(long, value_enum)]
        format: Option<InputFormat>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    observability::init_logging();

    // Usage errors exit 1 like any other pre-flight failure, keeping 2 for
    // rejected batches
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let metrics_handle = match observability::init() {
        Ok(handle) => Some(handle),
        Err(e) => {
            error!("Metrics unavailable: {}", e);
            None
        }
    };

    let result = run(cli.command, cli.config).await;

    if let (Some(path), Some(handle)) = (cli.metrics_file, metrics_handle) {
        if let Err(e) = std::fs::write(&path, handle.render()) {
            error!("Failed to write metrics snapshot to {}: {}", path.display(), e);
        }
    }

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Convert {
            input,
            url,
            output,
            format,
            sample,
            seed,
            timeout_secs,
        } => {
            // Pre-flight: everything here fails before any record is read
            let sampling = sample
                .map(SamplingRate::new)
                .transpose()
                .context("invalid --sample")?
                .map(|rate| (rate, seed));
            let settings = Settings::load(config.as_deref()).context("loading configuration")?;

            let source = match (input, url) {
                (Some(path), _) => {
                    let format = format.unwrap_or_else(|| InputFormat::from_path(&path));
                    InputSource::File { path, format }
                }
                (None, Some(url)) => InputSource::Url {
                    url,
                    timeout: Duration::from_secs(timeout_secs),
                },
                (None, None) => anyhow::bail!("either --input or --url is required"),
            };

            info!("🔄 Converting export into {}", output.display());
            let report = ConvertUseCase::new(settings)
                .execute(ConvertRequest {
                    source,
                    output,
                    sampling,
                })
                .await
                .context("conversion failed")?;

            print_report(&report);

            Ok(match report.outcome {
                RunOutcome::Committed(_) => ExitCode::SUCCESS,
                RunOutcome::Rejected(_) => ExitCode::from(EXIT_REJECTED),
            })
        }
        Commands::Terms {
            input,
            field,
            split,
            format,
        } => {
            let format = format.unwrap_or_else(|| InputFormat::from_path(&input));
            let records = parser::read_records(&input, format)
                .with_context(|| format!("reading {}", input.display()))?;

            for term in survey::unique_terms(&records, &field, split) {
                println!("{}", term);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_report(report: &RunReport) {
    let stats = &report.stats;
    println!("\n📊 Conversion results:");
    println!("   Records read: {}", stats.read);
    for (reason, count) in &stats.skipped {
        println!("   Skipped ({}): {}", reason, count);
    }
    println!("   Sampled out: {}", stats.sampled_out);
    println!("   Rows staged: {}", stats.written);

    match &report.outcome {
        RunOutcome::Committed(receipt) => {
            println!("✅ Committed {} rows to {}", receipt.rows, receipt.location);
            println!("   sha256: {}", receipt.sha256);
        }
        RunOutcome::Rejected(problems) => {
            println!("\n⚠️  {} problems found; output not written:", problems.len());
            for problem in problems {
                println!("   - {}", problem);
            }
        }
    }
}
