//! trainer-rs - Offline fine-tuning job for the scam classifier
//!
//! One-shot batch pipeline: load CSV, drop bad rows, random train/val
//! split, tokenize, fine-tune, checkpoint per epoch, write final artifacts.
//! There is no retry or resumption; a failed run starts over.

mod dataset;
mod train;

use anyhow::ensure;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use train::{FineTuner, TrainerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "trainer-rs",
    about = "Fine-tune the scam message classifier from a labeled CSV dataset"
)]
struct Args {
    /// CSV file with `text` and `label` columns
    #[arg(long, default_value = "dataset.csv")]
    dataset: PathBuf,

    /// Directory with the pretrained base model (config.json,
    /// tokenizer.json, model.safetensors)
    #[arg(long, default_value = "base-model")]
    base_model: PathBuf,

    /// Output directory for checkpoints and final artifacts
    #[arg(long, default_value = "model")]
    output: PathBuf,

    #[arg(long, default_value_t = 3)]
    epochs: usize,

    #[arg(long, default_value_t = 8)]
    batch_size: usize,

    #[arg(long, default_value_t = 5e-5)]
    learning_rate: f64,

    #[arg(long, default_value_t = 512)]
    max_seq_len: usize,

    /// Fraction of the dataset held out for validation
    #[arg(long, default_value_t = 0.2)]
    val_fraction: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trainer_rs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting trainer-rs v{}", env!("CARGO_PKG_VERSION"));
    info!("  Dataset: {}", args.dataset.display());
    info!("  Base model: {}", args.base_model.display());
    info!("  Output: {}", args.output.display());

    let examples = dataset::load_csv(&args.dataset)?;
    ensure!(
        !examples.is_empty(),
        "dataset '{}' contains no usable rows",
        args.dataset.display()
    );

    let (train_set, val_set) = dataset::split_train_val(examples, args.val_fraction);
    info!(
        "Split: {} training / {} validation examples",
        train_set.len(),
        val_set.len()
    );

    let config = TrainerConfig {
        epochs: args.epochs,
        batch_size: args.batch_size,
        learning_rate: args.learning_rate,
        max_seq_len: args.max_seq_len,
        ..Default::default()
    };

    let tuner = FineTuner::new(&args.base_model, config)?;
    let history = tuner.run(&train_set, &val_set, &args.output)?;

    tuner.save_final(&args.output)?;

    let log_path = args.output.join("training_log.json");
    std::fs::write(&log_path, serde_json::to_string_pretty(&history)?)?;
    info!("Training metrics written to {}", log_path.display());

    if let Some(last) = history.last() {
        info!(
            "Final validation accuracy: {:.3} (loss {:.4})",
            last.val_accuracy, last.val_loss
        );
    }
    info!("Model and tokenizer saved to {}", args.output.display());

    Ok(())
}
