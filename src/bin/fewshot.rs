//! Command-line front end: list the catalog or write a sampled task to disk.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fewshot_tasks::{
    tasks::{self, TaskConfig},
    DatasetBundle,
};

#[derive(Parser)]
#[command(name = "fewshot")]
#[command(about = "Few-shot task registry and balanced sampler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: log::LevelFilter,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered tasks
    List,

    /// Load a task, sample it and write every split as JSON lines
    Sample {
        /// Task name, e.g. `emotion`
        task: String,

        /// JSON file with a TaskConfig; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,

        /// Per-label cap; omit to keep the full splits
        #[arg(short = 'k', long)]
        num_samples: Option<usize>,

        #[arg(long)]
        cache_dir: Option<PathBuf>,

        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Fail when a label has fewer than two training examples
        #[arg(long)]
        strict: bool,

        /// Output directory
        #[arg(short, long, default_value = "out")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::List => {
            for task in tasks::TASKS.iter() {
                let metrics: Vec<_> = task.metrics.iter().map(|m| m.name()).collect();
                println!(
                    "{:<14} labels={} metrics={}",
                    task.name,
                    task.num_labels,
                    metrics.join(",")
                );
            }
        }
        Commands::Sample {
            task,
            config,
            seed,
            num_samples,
            cache_dir,
            data_dir,
            strict,
            out,
        } => {
            let mut cfg = match config {
                Some(path) => load_config(&path)?,
                None => TaskConfig::default(),
            };
            if let Some(seed) = seed {
                cfg.seed = seed;
            }
            if num_samples.is_some() {
                cfg.num_samples = num_samples;
            }
            if let Some(dir) = cache_dir {
                cfg.cache_dir = dir;
            }
            if data_dir.is_some() {
                cfg.data_dir = data_dir;
            }
            cfg.require_every_label |= strict;

            let task = tasks::resolve(&task, cfg)?;
            let bundle = task
                .get_datasets()
                .with_context(|| format!("preparing task {}", task.name()))?;
            write_bundle(&bundle, &out.join(task.name()))?;
        }
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<TaskConfig> {
    let file = File::open(path).with_context(|| format!("Failed to open config: {:?}", path))?;
    serde_json::from_reader(file).with_context(|| format!("Failed to parse config: {:?}", path))
}

fn write_bundle(bundle: &DatasetBundle, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for (name, examples) in bundle.iter() {
        let path = dir.join(format!("{name}.jsonl"));
        let mut o = BufWriter::new(
            File::create(&path).with_context(|| format!("creating {}", path.display()))?,
        );
        for example in examples {
            serde_json::to_writer(&mut o, example)?;
            o.write_all(b"\n")?;
        }
        o.flush()?;
        log::info!("Wrote {} examples to {}", examples.len(), path.display());
    }
    Ok(())
}
