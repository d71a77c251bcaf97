use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use enrichment_tracker::{
    ExportTarget, MagnitudePolicy, PipelineController, PipelineJob, ProcessorConfig,
    SettingsStore, Timestamp,
};

/// Enrichment tracking data processor: counts minutes of interaction per
/// hour from wearable motion-sensor recordings.
#[derive(Parser, Debug)]
#[command(name = "enrichment-tracker", version, about)]
struct Args {
    /// Raw tracking-data file (header line, then whitespace-separated rows)
    input: PathBuf,

    /// Interaction threshold; defaults to the saved settings value
    #[arg(long)]
    threshold: Option<f64>,

    /// Crop start bound as "YYYY MM DD HH MM SS" (exclusive)
    #[arg(long)]
    start: Option<String>,

    /// Crop end bound as "YYYY MM DD HH MM SS" (exclusive)
    #[arg(long)]
    end: Option<String>,

    /// Directory to write the enrichment CSV into; omit to skip export
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Base name for exported files; defaults to the input file stem
    #[arg(long)]
    name: Option<String>,

    /// Magnitude policy for the threshold test: "signed" or "absolute"
    #[arg(long)]
    policy: Option<String>,

    /// Also export the raw per-sample activity series
    #[arg(long)]
    save_raw: bool,

    /// Settings file path
    #[arg(long, default_value = "enrichment-settings.json")]
    settings: PathBuf,
}

fn parse_bound(text: &str) -> Result<Timestamp> {
    let fields: Vec<i64> = text
        .split_whitespace()
        .map(|token| {
            token
                .parse()
                .with_context(|| format!("time bound component {token:?} is not an integer"))
        })
        .collect::<Result<_>>()?;
    if fields.len() != 6 {
        bail!("time bound must have 6 components (\"YYYY MM DD HH MM SS\"), got {text:?}");
    }
    Ok(Timestamp {
        year: fields[0] as i32,
        month: fields[1] as u32,
        day: fields[2] as u32,
        hour: fields[3] as u32,
        minute: fields[4] as u32,
        second: fields[5] as u32,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let store = SettingsStore::new(args.settings.clone())?;
    let saved = store.processing();

    let threshold = args.threshold.unwrap_or(saved.threshold);
    let magnitude_policy = match args.policy.as_deref() {
        Some("signed") => MagnitudePolicy::Signed,
        Some("absolute") => MagnitudePolicy::Absolute,
        Some(other) => bail!("unknown magnitude policy {other:?} (expected signed or absolute)"),
        None => saved.magnitude_policy,
    };

    let crop = match (&args.start, &args.end) {
        (Some(start), Some(end)) => Some((parse_bound(start)?, parse_bound(end)?)),
        (None, None) => None,
        _ => bail!("--start and --end must be given together"),
    };

    let data_name = match &args.name {
        Some(name) => name.clone(),
        None => args
            .input
            .file_stem()
            .context("input path has no file name")?
            .to_string_lossy()
            .into_owned(),
    };
    let export = args.output_dir.clone().map(|output_dir| ExportTarget {
        output_dir,
        data_name,
    });

    let job = PipelineJob {
        input: args.input,
        crop,
        config: ProcessorConfig {
            threshold,
            magnitude_policy,
        },
        export,
        export_raw_activity: args.save_raw || saved.auto_save_raw,
    };

    let mut controller = PipelineController::new();
    controller.start(job)?;
    let outcome = controller
        .finish()
        .await?
        .context("pipeline run was cancelled")?;

    println!(
        "Recording spans {} to {}",
        outcome.first_timestamp, outcome.last_timestamp
    );
    println!("Year,Month,Day,Hour,Minutes of Interaction");
    for row in &outcome.result.hourly {
        println!(
            "{},{},{},{},{}",
            row.year, row.month, row.day, row.hour, row.minutes_of_interaction
        );
    }
    if let Some(path) = outcome.exported_to {
        println!("Saved to {}", path.display());
    }

    Ok(())
}
