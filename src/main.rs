// SYNOID Motion Entry Point
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use synoid_motion::config::EngineConfig;
use synoid_motion::motion::catalog::RuleCatalog;
use synoid_motion::motion::content::ContentAnalyzer;
use synoid_motion::motion::enforcer::RuleEnforcer;
use synoid_motion::motion::preferences::apply_preferences;
use synoid_motion::motion::spec::AnimationSpec;
use synoid_motion::motion::store::{CorrectionStore, JsonFileBackend, NewCorrection};
use synoid_motion::motion::templates::TemplateSelector;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "synoid-motion")]
#[command(about = "SYNOID Motion Rules Engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze script text for energy, complexity and duration
    Analyze {
        /// Script text (or use --file)
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Read script text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Number of scenes planned
        #[arg(short, long, default_value_t = 1)]
        scenes: usize,
    },

    /// Compute the formula duration for a scene count
    Duration {
        #[arg(short, long)]
        scenes: u32,

        /// Frames per scene (clamped to 60-90)
        #[arg(short, long)]
        frames_per_scene: Option<u32>,
    },

    /// Rank templates against a request
    Select {
        #[arg(short, long)]
        request: String,

        /// Shortlist size
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Validate an animation spec (exit code 1 when invalid)
    Validate {
        /// Path to the spec JSON
        #[arg(short, long)]
        spec: PathBuf,
    },

    /// Auto-repair a spec with learned preferences
    Fix {
        #[arg(short, long)]
        spec: PathBuf,

        /// Where to write the repaired spec (prints when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Record a user correction from a JSON file
    Correct {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Count one generation run
    Generation,

    /// Show learning statistics
    Stats,

    /// Discard all learned rules
    Reset,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_spec(path: &Path) -> Result<AnimationSpec> {
    let data = fs::read_to_string(path).with_context(|| format!("Failed to read spec {:?}", path))?;
    serde_json::from_str(&data).with_context(|| format!("Invalid animation spec {:?}", path))
}

fn open_store(config: &EngineConfig) -> CorrectionStore<JsonFileBackend> {
    CorrectionStore::open(JsonFileBackend::new(&config.store_path))
}

fn main() -> Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = EngineConfig::load();
    let args = Cli::parse();

    match args.command {
        Commands::Analyze { text, file, scenes } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {:?}", path))?,
                (None, None) => anyhow::bail!("Provide --text or --file"),
            };
            print_json(&ContentAnalyzer::default().analyze(&text, scenes))?;
        }
        Commands::Duration {
            scenes,
            frames_per_scene,
        } => {
            let breakdown = RuleCatalog::professional().calculate_duration(
                scenes,
                frames_per_scene.unwrap_or(config.default_frames_per_scene),
            );
            print_json(&breakdown)?;
            info!(
                "{} frames = {:.2}s at {} fps",
                breakdown.total_frames,
                breakdown.seconds(config.fps),
                config.fps
            );
        }
        Commands::Select { request, top } => {
            let selector = TemplateSelector::new(config.library());
            let picks = selector.select(&request, top.unwrap_or(config.top_n));
            print_json(&picks)?;
        }
        Commands::Validate { spec } => {
            let spec = read_spec(&spec)?;
            let store = open_store(&config);
            let report = RuleEnforcer::new(store.rules()).enforce_all(&spec);
            print_json(&report)?;
            if !report.valid {
                std::process::exit(1);
            }
        }
        Commands::Fix { spec, output } => {
            let spec = read_spec(&spec)?;
            let store = open_store(&config);
            let outcome = apply_preferences(&spec, store.rules());
            for issue in &outcome.prevented_issues {
                info!("{}", issue);
            }
            match output {
                Some(path) => {
                    fs::write(&path, serde_json::to_string_pretty(&outcome.modified)?)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    print_json(&outcome.applied_rules)?;
                }
                None => print_json(&outcome)?,
            }
        }
        Commands::Correct { file } => {
            let data = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read correction {:?}", file))?;
            let new: NewCorrection = serde_json::from_str(&data)
                .with_context(|| format!("Invalid correction {:?}", file))?;
            let mut store = open_store(&config);
            let correction = store.record_correction(new);
            if correction.learned_rule.is_none() {
                warn!("No rule could be derived from {}", correction.id);
            }
            print_json(&correction)?;
        }
        Commands::Generation => {
            let mut store = open_store(&config);
            let total = store.record_generation();
            info!("Generation #{} recorded", total);
        }
        Commands::Stats => {
            print_json(&open_store(&config).stats())?;
        }
        Commands::Reset => {
            open_store(&config).reset();
        }
    }

    Ok(())
}
