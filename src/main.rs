//! Runscope CLI
//!
//! One subcommand per inspection pipeline, plus the GPU memory monitor.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use runscope::{
    config::AppConfig,
    error::ensure_input,
    loader::load_event_dir,
    monitor::{spawn_signal_listener, GpuMonitor, MonitorSettings, NvidiaSmi, ShutdownToken},
    parse::{parse_summary, parse_text_log, BASELINE_KEYWORDS},
    report::{
        compare_cross_namespace, compare_final, ComparisonTable, FinalPerformance, KeyDiff,
        KeyDiffReport, ReportStyle, StatsReport,
    },
    run::{Namespace, RunRecord},
};

/// Baseline metrics listed in the final-performance section.
const KEY_METRICS: &[&str] = &[
    "average_step_reward",
    "reach_target_reward",
    "push_reward",
    "collision_punishment",
    "value_loss",
    "policy_loss",
    "dist_entropy",
];

#[derive(Parser)]
#[command(name = "runscope")]
#[command(version)]
#[command(about = "Inspect and compare MAPPO/HAPPO training runs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file overriding the default run paths
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize event-file metrics of two runs and diff their metric names
    Events {
        /// Baseline event directory
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Candidate event directory
        #[arg(long)]
        candidate: Option<PathBuf>,
    },

    /// Compare a baseline text log against a heterogeneous-agent summary
    Compare {
        /// Baseline text log
        #[arg(long)]
        baseline_log: Option<PathBuf>,

        /// Candidate summary JSON
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Baseline statistics with trends, plus candidate run inspection
    Stats {
        /// Baseline text log
        #[arg(long)]
        baseline_log: Option<PathBuf>,

        /// Candidate run directories (repeatable)
        #[arg(long = "run")]
        runs: Vec<PathBuf>,
    },

    /// Compare final values of two text logs
    Diff {
        /// Left-hand text log
        left: PathBuf,

        /// Right-hand text log
        right: PathBuf,

        /// Label for the left-hand run
        #[arg(long, default_value = "MAPPO")]
        left_label: String,

        /// Label for the right-hand run
        #[arg(long, default_value = "HAPPO")]
        right_label: String,
    },

    /// Poll GPU memory usage into a log file
    GpuMonitor {
        /// Seconds between samples
        #[arg(short, long)]
        interval: Option<u64>,

        /// Log file to append to
        #[arg(short, long)]
        log_file: Option<PathBuf>,

        /// Stop after this many hours
        #[arg(long)]
        hours: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .compact()
        .init();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Events {
            baseline,
            candidate,
        } => {
            if let Some(dir) = baseline {
                config.baseline_event_dir = dir;
            }
            if let Some(dir) = candidate {
                config.candidate_event_dir = dir;
            }
            run_events(&config)?;
        }

        Commands::Compare {
            baseline_log,
            summary,
        } => {
            if let Some(path) = baseline_log {
                config.baseline_log = path;
            }
            if let Some(path) = summary {
                config.candidate_summary = path;
            }
            run_compare(&config)?;
        }

        Commands::Stats { baseline_log, runs } => {
            if let Some(path) = baseline_log {
                config.baseline_log = path;
            }
            if !runs.is_empty() {
                config.candidate_runs = runs;
            }
            run_stats(&config)?;
        }

        Commands::Diff {
            left,
            right,
            left_label,
            right_label,
        } => {
            run_diff(&left, &right, &left_label, &right_label)?;
        }

        Commands::GpuMonitor {
            interval,
            log_file,
            hours,
        } => {
            if let Some(secs) = interval {
                config.monitor.interval_secs = secs;
            }
            if let Some(path) = log_file {
                config.monitor.log_file = path;
            }
            if hours.is_some() {
                config.monitor.duration_hours = hours;
            }
            run_gpu_monitor(&config)?;
        }
    }

    Ok(())
}

/// Print a missing-input message; returns `true` when the path exists.
fn require(path: &Path, what: &str) -> bool {
    match ensure_input(path, what) {
        Ok(()) => true,
        Err(e) => {
            println!("ERROR: {e}");
            false
        }
    }
}

fn run_events(config: &AppConfig) -> Result<()> {
    info!("Loading MAPPO data...");
    let mappo = load_event_dir(&config.baseline_event_dir)?;
    info!("Loading HAPPO data...");
    let happo = load_event_dir(&config.candidate_event_dir)?;

    print!("{}", StatsReport::new("Baseline MAPPO", mappo.as_ref(), ReportStyle::Overview));
    print!("{}", StatsReport::new("HAPPO", happo.as_ref(), ReportStyle::Overview));

    println!("\n{}", "=".repeat(60));
    println!("Comparison of Common Metrics");
    println!("{}\n", "=".repeat(60));

    if let (Some(mappo), Some(happo)) = (&mappo, &happo) {
        let diff = KeyDiff::between(mappo, happo);
        print!(
            "{}",
            KeyDiffReport::new("MAPPO", "HAPPO", mappo.len(), happo.len(), &diff)
        );
    }
    Ok(())
}

fn run_compare(config: &AppConfig) -> Result<()> {
    if !require(&config.baseline_log, "MAPPO log")
        || !require(&config.candidate_summary, "HAPPO summary")
    {
        return Ok(());
    }

    info!("Parsing logs...");
    let mappo = parse_text_log(&config.baseline_log, BASELINE_KEYWORDS)
        .with_context(|| format!("Failed to parse {}", config.baseline_log.display()))?;
    let happo = parse_summary(&config.candidate_summary)
        .with_context(|| format!("Failed to parse {}", config.candidate_summary.display()))?;

    let wide = "=".repeat(80);
    let thin = "-".repeat(80);
    println!("\n{wide}\nTRAINING COMPARISON: MAPPO vs HAPPO\n{wide}\n");
    println!("MAPPO Configuration:");
    println!("  - Centralized training, centralized execution");
    println!("  - Single shared policy\n");
    println!("HAPPO Configuration:");
    println!("  - Heterogeneous-Agent PPO");
    println!("  - Separate policies per agent (agent0, agent1)");
    println!("  - Shared critic\n");

    let heading = format!("\n{thin}\nMAPPO Final Performance\n{thin}");
    print!("{}", FinalPerformance::new(&heading, &mappo).keys(KEY_METRICS));

    println!("\n{thin}\nHAPPO Final Performance\n{thin}");
    for (namespace, set) in happo.iter() {
        let heading = format!("\n{}:", namespace.title());
        let listing = FinalPerformance::new(&heading, set).indent(2);
        if namespace == Namespace::Rewards {
            print!("{}", listing.with_mean());
        } else {
            print!("{listing}");
        }
    }

    let rows = compare_cross_namespace(&mappo, &happo);
    print!(
        "{}",
        ComparisonTable::new("KEY COMPARISONS", "MAPPO", "HAPPO", &rows).wide()
    );

    println!("\n\nNOTES:");
    println!("- MAPPO uses a single shared policy for all agents");
    println!("- HAPPO uses separate policies for heterogeneous agents (more flexible)");
    println!("- Higher entropy = more exploration (can be good or bad depending on stage)");
    println!("- Lower value loss = better value function estimation");
    println!("- Reward improvement shows learning effectiveness\n");
    Ok(())
}

fn run_stats(config: &AppConfig) -> Result<()> {
    if !require(&config.baseline_log, "MAPPO log") {
        return Ok(());
    }

    info!("Parsing MAPPO logs...");
    let mappo = parse_text_log(&config.baseline_log, BASELINE_KEYWORDS)
        .with_context(|| format!("Failed to parse {}", config.baseline_log.display()))?;
    print!("{}", StatsReport::new("MAPPO (baseline)", Some(&mappo), ReportStyle::Trend));

    let rule = "=".repeat(70);
    println!("\n\n{rule}\nHAPPO Runs Information\n{rule}");

    for dir in &config.candidate_runs {
        let Some(run) = RunRecord::inspect(dir)
            .with_context(|| format!("Failed to inspect {}", dir.display()))?
        else {
            continue;
        };

        println!("\nRun: {}", run.run_id());
        println!("  Directory: {}", run.path().display());
        if let Some(entries) = run.log_entries() {
            println!("  Log subdirs: {}", entries.join(", "));
        }
        if let Some(count) = run.checkpoint_count() {
            println!("  Models: {count} checkpoints");
        }
        if run.config().is_some() {
            let show = |v: Option<&serde_json::Value>| {
                v.map_or_else(
                    || "unknown".to_string(),
                    |v| v.as_str().map_or_else(|| v.to_string(), String::from),
                )
            };
            println!("  Algorithm: {}", show(run.algorithm()));
            println!("  Num envs: {}", show(run.num_envs()));
            println!("  Episode length: {}", show(run.episode_length()));
            println!("  Total steps: {}", show(run.total_steps()));
        }
    }
    Ok(())
}

fn run_diff(left: &Path, right: &Path, left_label: &str, right_label: &str) -> Result<()> {
    if !require(left, left_label) || !require(right, right_label) {
        return Ok(());
    }

    let left_set = parse_text_log(left, BASELINE_KEYWORDS)
        .with_context(|| format!("Failed to parse {}", left.display()))?;
    let right_set = parse_text_log(right, BASELINE_KEYWORDS)
        .with_context(|| format!("Failed to parse {}", right.display()))?;

    let title = format!("Final Metrics Comparison ({left_label} vs {right_label})");
    let rows = compare_final(&left_set, &right_set);
    print!(
        "{}",
        ComparisonTable::new(&title, left_label, right_label, &rows)
    );
    Ok(())
}

fn run_gpu_monitor(config: &AppConfig) -> Result<()> {
    let settings = MonitorSettings::from(&config.monitor);
    let rule = "=".repeat(80);

    println!("GPU VRAM Monitor");
    println!("{rule}");
    println!("Log file: {}", settings.log_file.display());
    println!("Interval: {} seconds", config.monitor.interval_secs);
    match config.monitor.duration_hours.filter(|_| settings.duration.is_some()) {
        Some(hours) => println!("Duration: {hours} hours ({:.0} minutes)", hours * 60.0),
        None => println!("Duration: Infinite (press Ctrl+C to stop)"),
    }
    println!("{rule}\n");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let summary = runtime.block_on(async {
        let token = ShutdownToken::new();
        spawn_signal_listener(token.clone());
        GpuMonitor::new(NvidiaSmi::new(), settings).run(&token).await
    })?;

    println!("\n{rule}");
    println!(
        "Stopped after {:.2} hours ({:?})",
        summary.elapsed.as_secs_f64() / 3600.0,
        summary.reason
    );
    println!("Total logs: {}", summary.samples);
    println!("{rule}");
    Ok(())
}
