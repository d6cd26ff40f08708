//! HabitLens CLI - Command-line interface for the behavioral analytics engine
//!
//! Commands:
//! - features: Assemble daily feature vectors from per-day session logs
//! - dataset: Build a supervised training dataset from a feature history
//! - weekly: Summarize a week of per-day model outputs
//! - advise: Generate gated weekly advice from a summary
//! - doctor: Diagnose configuration and session-state health
//! - schema: Print input/output schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use habitlens::advice::{AdviceEngine, AdviceSession, AdviceTriggerContext};
use habitlens::assembler::DailyFeatureAssembler;
use habitlens::types::{AppSession, DailyBehaviorFeatures, ModelOutput, WeeklyBehaviorSummary};
use habitlens::windowing::TrainingDatasetAssembler;
use habitlens::weekly::WeeklyAnalyzer;
use habitlens::{FEATURE_DIMENSION, HABITLENS_VERSION, PRODUCER_NAME};

/// HabitLens - On-device behavioral analytics for smartphone usage signals
#[derive(Parser)]
#[command(name = "habitlens")]
#[command(version = HABITLENS_VERSION)]
#[command(about = "Transform app session logs into behavioral features and advice", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble daily feature vectors from per-day session logs
    Features {
        /// Input file path (use - for stdin); JSON array of day records
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,
    },

    /// Build a supervised training dataset from per-day session logs
    Dataset {
        /// Input file path (use - for stdin); JSON array of day records
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Sliding window size in days
        #[arg(long, default_value = "7")]
        window_size: usize,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,
    },

    /// Summarize a week of per-day model outputs
    Weekly {
        /// Input file path (use - for stdin); JSON array of model outputs
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,
    },

    /// Generate gated weekly advice from a weekly summary
    Advise {
        /// Input file path (use - for stdin); one weekly summary as JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Days of data behind the summary
        #[arg(long, default_value = "7")]
        days_observed: u32,

        /// Most-used app over the week
        #[arg(long)]
        dominant_app: Option<String>,

        /// Clock window with the most usage (e.g. "evening")
        #[arg(long)]
        dominant_window: Option<String>,

        /// Advice session state file; loaded if present, saved after the run
        #[arg(long)]
        session: Option<PathBuf>,

        /// Bypass the weekly gating window
        #[arg(long)]
        force_refresh: bool,

        /// Seed for the template draw (deterministic output)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,
    },

    /// Diagnose configuration and session-state health
    Doctor {
        /// Check an advice session state file
        #[arg(long)]
        session: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print
        #[arg(value_enum)]
        schema_type: SchemaType,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (per-day session records)
    Input,
    /// Output schema (daily feature vector)
    Output,
}

/// One day of session data as it appears in input files
#[derive(serde::Deserialize)]
struct DayRecord {
    date: NaiveDate,
    sessions: Vec<AppSession>,
}

/// One day of assembled features as it appears in output files
#[derive(serde::Serialize)]
struct DayFeatures {
    date: NaiveDate,
    features: DailyBehaviorFeatures,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), HabitLensCliError> {
    match cli.command {
        Commands::Features {
            input,
            output,
            output_format,
        } => cmd_features(&input, &output, output_format),

        Commands::Dataset {
            input,
            output,
            window_size,
            output_format,
        } => cmd_dataset(&input, &output, window_size, output_format),

        Commands::Weekly {
            input,
            output,
            output_format,
        } => cmd_weekly(&input, &output, output_format),

        Commands::Advise {
            input,
            output,
            days_observed,
            dominant_app,
            dominant_window,
            session,
            force_refresh,
            seed,
            output_format,
        } => cmd_advise(
            &input,
            &output,
            days_observed,
            dominant_app,
            dominant_window,
            session.as_deref(),
            force_refresh,
            seed,
            output_format,
        ),

        Commands::Doctor { session, json } => cmd_doctor(session.as_deref(), json),

        Commands::Schema { schema_type } => cmd_schema(schema_type),
    }
}

fn cmd_features(
    input: &Path,
    output: &Path,
    output_format: OutputFormat,
) -> Result<(), HabitLensCliError> {
    let days = read_day_records(input)?;

    let history: Vec<(NaiveDate, Vec<AppSession>)> =
        days.into_iter().map(|d| (d.date, d.sessions)).collect();
    let map = DailyFeatureAssembler::assemble_history(&history);

    let mut results: Vec<DayFeatures> = map
        .into_iter()
        .map(|(date, features)| DayFeatures { date, features })
        .collect();
    results.sort_by_key(|d| d.date);

    write_output(output, &serialize(&results, &output_format)?)
}

fn cmd_dataset(
    input: &Path,
    output: &Path,
    window_size: usize,
    output_format: OutputFormat,
) -> Result<(), HabitLensCliError> {
    let days = read_day_records(input)?;

    let history: Vec<(NaiveDate, Vec<AppSession>)> =
        days.into_iter().map(|d| (d.date, d.sessions)).collect();
    let map = DailyFeatureAssembler::assemble_history(&history);
    let dataset = TrainingDatasetAssembler::assemble(&map, window_size);

    write_output(output, &serialize(&dataset, &output_format)?)
}

fn cmd_weekly(
    input: &Path,
    output: &Path,
    output_format: OutputFormat,
) -> Result<(), HabitLensCliError> {
    let input_data = read_input(input)?;
    let outputs: Vec<ModelOutput> = serde_json::from_str(&input_data)?;

    let summary = WeeklyAnalyzer::analyze(&outputs);
    write_output(output, &serialize(&summary, &output_format)?)
}

#[allow(clippy::too_many_arguments)]
fn cmd_advise(
    input: &Path,
    output: &Path,
    days_observed: u32,
    dominant_app: Option<String>,
    dominant_window: Option<String>,
    session_path: Option<&Path>,
    force_refresh: bool,
    seed: Option<u64>,
    output_format: OutputFormat,
) -> Result<(), HabitLensCliError> {
    let input_data = read_input(input)?;
    let summary: WeeklyBehaviorSummary = serde_json::from_str(&input_data)?;

    let mut ctx = AdviceTriggerContext::from_summary(summary, days_observed);
    if let Some(app) = dominant_app {
        ctx = ctx.with_dominant_app(app);
    }
    if let Some(window) = dominant_window {
        ctx = ctx.with_dominant_time_window(window);
    }

    let mut session = match session_path {
        Some(path) if path.exists() => {
            let json = fs::read_to_string(path)?;
            serde_json::from_str(&json)?
        }
        _ => AdviceSession::new(),
    };

    let mut engine = match seed {
        Some(seed) => AdviceEngine::with_seed(seed),
        None => AdviceEngine::new(),
    };

    let advice = engine.evaluate(&mut session, &ctx, Utc::now(), force_refresh);

    if let Some(path) = session_path {
        fs::write(path, serde_json::to_string_pretty(&session)?)?;
    }

    write_output(output, &serialize(&advice, &output_format)?)
}

fn cmd_doctor(session: Option<&Path>, json: bool) -> Result<(), HabitLensCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "habitlens_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("HabitLens version {}", HABITLENS_VERSION),
    });

    checks.push(DoctorCheck {
        name: "feature_dimension".to_string(),
        status: CheckStatus::Ok,
        message: format!("Daily feature vector width: {}", FEATURE_DIMENSION),
    });

    if let Some(session_path) = session {
        if session_path.exists() {
            match fs::read_to_string(session_path) {
                Ok(content) => match serde_json::from_str::<AdviceSession>(&content) {
                    Ok(state) => {
                        let cached = state.cached_advice.len();
                        checks.push(DoctorCheck {
                            name: "session".to_string(),
                            status: CheckStatus::Ok,
                            message: format!("Session file valid ({} cached advice items)", cached),
                        });
                    }
                    Err(e) => {
                        checks.push(DoctorCheck {
                            name: "session".to_string(),
                            status: CheckStatus::Error,
                            message: format!("Invalid session JSON: {}", e),
                        });
                    }
                },
                Err(e) => {
                    checks.push(DoctorCheck {
                        name: "session".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Cannot read session file: {}", e),
                    });
                }
            }
        } else {
            checks.push(DoctorCheck {
                name: "session".to_string(),
                status: CheckStatus::Warning,
                message: "Session file does not exist".to_string(),
            });
        }
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (streaming mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: HABITLENS_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("HabitLens Doctor Report");
        println!("=======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(HabitLensCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType) -> Result<(), HabitLensCliError> {
    match schema_type {
        SchemaType::Input => {
            println!("Input Schema: day records");
            println!();
            println!("A JSON array of per-day session logs:");
            println!();
            println!("  [{{");
            println!("    \"date\": \"2024-03-01\",");
            println!("    \"sessions\": [{{");
            println!("      \"app_name\": \"com.social.app\",");
            println!("      \"start_time\": \"2024-03-01T09:00:00Z\",");
            println!("      \"end_time\": \"2024-03-01T09:30:00Z\"");
            println!("    }}]");
            println!("  }}]");
            println!();
            println!("Sessions may arrive unordered; the assembler sorts them.");
            println!("A day with an empty sessions array is a valid zero-usage day.");
        }
        SchemaType::Output => {
            println!("Output Schema: daily feature vector");
            println!();
            println!("Each day yields a {}-field struct in five blocks:", FEATURE_DIMENSION);
            println!();
            println!("- usage volume: screen time, session counts, top-app shares");
            println!("- temporal rhythm: clock-window ratios, entropy, circadian alignment");
            println!("- interaction: app diversity, switching, reopen loops, launcher share");
            println!("- stability: day-over-day deltas and profile similarity");
            println!("- cognitive: fragmentation, distraction load, rigidity, habit strength");
            println!();
            println!("Reserved fields are fixed at 0.0 until their signal sources land.");
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, HabitLensCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn read_day_records(input: &Path) -> Result<Vec<DayRecord>, HabitLensCliError> {
    let input_data = read_input(input)?;
    let days: Vec<DayRecord> = serde_json::from_str(&input_data)?;
    if days.is_empty() {
        return Err(HabitLensCliError::NoDays);
    }
    Ok(days)
}

fn serialize<T: serde::Serialize>(
    value: &T,
    format: &OutputFormat,
) -> Result<String, HabitLensCliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(value)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), HabitLensCliError> {
    if output.to_string_lossy() == "-" {
        println!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

// Error types

#[derive(Debug)]
enum HabitLensCliError {
    Io(io::Error),
    Json(serde_json::Error),
    NoDays,
    DoctorFailed,
}

impl From<io::Error> for HabitLensCliError {
    fn from(e: io::Error) -> Self {
        HabitLensCliError::Io(e)
    }
}

impl From<serde_json::Error> for HabitLensCliError {
    fn from(e: serde_json::Error) -> Self {
        HabitLensCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<HabitLensCliError> for CliError {
    fn from(e: HabitLensCliError) -> Self {
        match e {
            HabitLensCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            HabitLensCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'habitlens schema input' for the expected shape".to_string()),
            },
            HabitLensCliError::NoDays => CliError {
                code: "NO_DAYS".to_string(),
                message: "No day records found in input".to_string(),
                hint: Some("Ensure input file is a non-empty JSON array".to_string()),
            },
            HabitLensCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
