mod autopilot;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use labspace_common::ExperimentId;
use labspace_data::{Catalog, load_config, validate_config};
use labspace_kernel::{LabConfig, LabStore};
use labspace_render::{DebugTextRenderer, RenderView, Renderer};
use labspace_session::LabSession;
use labspace_tools::LabInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "labspace-cli", about = "CLI tool for labspace operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Lab tuning config (YAML). Missing files fall back to defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Equipment/experiment catalog (YAML). Defaults to the built-in one.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// List equipment and experiments in the catalog
    Catalog,
    /// Run an experiment start to finish with a scripted user
    Run {
        /// Experiment id
        experiment: String,
        /// RNG seed for colours and bench jitter
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Override the pitch clamp, in degrees
        #[arg(long)]
        max_pitch: Option<f32>,
        /// Print the final inspector summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the inspector view of a freshly seeded lab
    Inspect {
        /// Start and arrange this experiment first
        #[arg(short, long)]
        experiment: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin().context("built-in catalog is invalid")?,
    };
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("labspace-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", labspace_kernel::crate_info());
            println!("data: {}", labspace_data::crate_info());
            println!("input: {}", labspace_input::crate_info());
            println!("render: {}", labspace_render::crate_info());
            println!("interact: {}", labspace_interact::crate_info());
            println!("progress: {}", labspace_progress::crate_info());
            println!("session: {}", labspace_session::crate_info());
            println!("tools: {}", labspace_tools::crate_info());
        }
        Commands::Catalog => {
            println!("Equipment ({}):", catalog.equipment.len());
            for e in &catalog.equipment {
                println!("  {:<16} {:<14} {}", e.id, e.category, e.name);
            }
            println!("Experiments ({}):", catalog.experiments.len());
            for x in &catalog.experiments {
                println!(
                    "  {:<16} {:<10} {:<13} {} ({} steps)",
                    x.id,
                    x.subject,
                    x.difficulty,
                    x.name,
                    x.steps.len()
                );
            }
        }
        Commands::Run {
            experiment,
            seed,
            max_pitch,
            json,
        } => {
            let mut config = config;
            if let Some(p) = max_pitch {
                config.max_pitch_deg = p.abs();
                validate_config(&config)?;
            }
            run(catalog, config, seed, &ExperimentId::from(experiment), json)?;
        }
        Commands::Inspect { experiment, json } => {
            let mut store = catalog.into_store(config, 0)?;
            if let Some(id) = experiment {
                let id = ExperimentId::from(id);
                if store.state().experiment(&id).is_none() {
                    bail!("no experiment named {id}");
                }
                store.start_experiment(&id);
                store.arrange_equipment_for_experiment(&id);
            }
            inspect(&store, json)?;
        }
    }

    Ok(())
}

fn run(
    catalog: Catalog,
    config: LabConfig,
    seed: u64,
    id: &ExperimentId,
    json: bool,
) -> anyhow::Result<()> {
    let steps = catalog
        .experiments
        .iter()
        .find(|x| &x.id == id)
        .map(|x| x.steps.clone())
        .with_context(|| format!("no experiment named {id}"))?;

    let mut session = LabSession::new(catalog.into_store(config, seed)?);
    session.apply(|store| {
        store.start_experiment(id);
        store.arrange_equipment_for_experiment(id);
    });
    tracing::info!(experiment = %id, steps = steps.len(), seed, "running experiment");

    let view = RenderView::default();
    for step in &steps {
        for done in autopilot::perform_step(&mut session, step, &view) {
            if !json {
                println!("completed {}: {}", done.step, done.description);
            }
        }
    }

    let store = session.store();
    if json {
        println!("{}", serde_json::to_string_pretty(&LabInspector::summary(store))?);
    } else {
        print!("{}", DebugTextRenderer::new().render(store.state(), &view));
    }

    let completed = store.state().experiment(id).is_some_and(|x| x.completed);
    if !completed {
        bail!("experiment {id} did not complete");
    }
    Ok(())
}

fn inspect(store: &LabStore, json: bool) -> anyhow::Result<()> {
    let summary = LabInspector::summary(store);
    let equipment: Vec<_> = LabInspector::list_equipment(store)
        .iter()
        .filter_map(|id| LabInspector::inspect_equipment(store, id))
        .collect();
    if json {
        let doc = serde_json::json!({ "summary": summary, "equipment": equipment });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("{summary}");
        for info in &equipment {
            println!("  {info}");
        }
    }
    Ok(())
}
