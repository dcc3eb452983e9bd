//! Fine-tuning loop
//!
//! Loads the pretrained base encoder into a trainable variable store, runs
//! AdamW over mini-batches of tokenized examples, evaluates on the
//! validation split each epoch, and persists checkpoints plus the final
//! artifacts (weights, tokenizer, model config) to the output directory.

use anyhow::{Context, Result};
use candle_core::{Device, Tensor, D};
use candle_nn::loss::cross_entropy;
use candle_nn::{AdamW, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use candle_transformers::models::bert::{Config as BertConfig, DTYPE};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

use scamguard_rs::classifier::BertClassifier;

use crate::dataset::TrainingExample;

/// Hyperparameters for one training run
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub max_seq_len: usize,
    /// Log a progress line every this many optimizer steps
    pub log_every: usize,
    /// Keep at most this many epoch checkpoints on disk
    pub keep_checkpoints: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            epochs: 3,
            batch_size: 8,
            learning_rate: 5e-5,
            max_seq_len: 512,
            log_every: 100,
            keep_checkpoints: 2,
        }
    }
}

/// Metrics collected at the end of each epoch
#[derive(Debug, Clone, Serialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub train_loss: f32,
    pub val_loss: f32,
    pub val_accuracy: f32,
}

/// Fine-tunes a pretrained BERT encoder with a fresh two-class head.
pub struct FineTuner {
    model: BertClassifier,
    varmap: VarMap,
    tokenizer: Tokenizer,
    device: Device,
    config: TrainerConfig,
    base_config_path: PathBuf,
}

impl FineTuner {
    /// Build a trainable model from a base-model directory containing
    /// `config.json`, `tokenizer.json` and `model.safetensors`.
    ///
    /// Encoder weights are overwritten with the pretrained checkpoint; the
    /// classification head has no pretrained counterpart and keeps its
    /// fresh random initialization.
    pub fn new(base_dir: &Path, config: TrainerConfig) -> Result<Self> {
        let device = Device::Cpu;

        let base_config_path = base_dir.join("config.json");
        let bert_config: BertConfig = serde_json::from_str(
            &fs::read_to_string(&base_config_path).with_context(|| {
                format!("Cannot read model config '{}'", base_config_path.display())
            })?,
        )?;

        let mut tokenizer = Tokenizer::from_file(base_dir.join("tokenizer.json"))
            .map_err(anyhow::Error::msg)?;
        tokenizer.with_padding(Some(PaddingParams::default()));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_seq_len,
                ..Default::default()
            }))
            .map_err(anyhow::Error::msg)?;

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DTYPE, &device);
        let model = BertClassifier::load(vb, &bert_config)?;

        let (loaded, fresh) =
            load_pretrained(&varmap, &base_dir.join("model.safetensors"), &device)?;
        info!(
            "Loaded {} pretrained tensors ({} newly initialized)",
            loaded, fresh
        );

        Ok(Self {
            model,
            varmap,
            tokenizer,
            device,
            config,
            base_config_path,
        })
    }

    /// Run the full training loop and return per-epoch metrics.
    pub fn run(
        &self,
        train: &[TrainingExample],
        val: &[TrainingExample],
        output: &Path,
    ) -> Result<Vec<EpochMetrics>> {
        let mut optimizer = AdamW::new(
            self.varmap.all_vars(),
            ParamsAdamW {
                lr: self.config.learning_rate,
                ..Default::default()
            },
        )?;

        let mut history = Vec::with_capacity(self.config.epochs);

        for epoch in 1..=self.config.epochs {
            let train_loss = self.run_epoch(&mut optimizer, train, epoch)?;
            let (val_loss, val_accuracy) = self.evaluate(val)?;

            info!(
                "Epoch {}/{}: train_loss={:.4} val_loss={:.4} val_accuracy={:.3}",
                epoch, self.config.epochs, train_loss, val_loss, val_accuracy
            );

            self.save_checkpoint(output, epoch)?;

            history.push(EpochMetrics {
                epoch,
                train_loss,
                val_loss,
                val_accuracy,
            });
        }

        Ok(history)
    }

    fn run_epoch(
        &self,
        optimizer: &mut AdamW,
        examples: &[TrainingExample],
        epoch: usize,
    ) -> Result<f32> {
        let mut total_loss = 0f32;
        let mut steps = 0usize;

        for chunk in examples.chunks(self.config.batch_size) {
            let batch = self.encode_batch(chunk)?;
            let logits =
                self.model
                    .forward(&batch.input_ids, &batch.token_type_ids, &batch.attention_mask)?;
            let loss = cross_entropy(&logits, &batch.labels)?;
            optimizer.backward_step(&loss)?;

            total_loss += loss.to_scalar::<f32>()?;
            steps += 1;

            if steps % self.config.log_every == 0 {
                info!(
                    "Epoch {} step {}: loss={:.4}",
                    epoch,
                    steps,
                    total_loss / steps as f32
                );
            }
        }

        Ok(total_loss / steps.max(1) as f32)
    }

    /// Average loss and accuracy over the validation split.
    fn evaluate(&self, examples: &[TrainingExample]) -> Result<(f32, f32)> {
        if examples.is_empty() {
            warn!("Validation split is empty, skipping evaluation");
            return Ok((0.0, 0.0));
        }

        let mut total_loss = 0f32;
        let mut batches = 0usize;
        let mut correct = 0usize;

        for chunk in examples.chunks(self.config.batch_size) {
            let batch = self.encode_batch(chunk)?;
            let logits =
                self.model
                    .forward(&batch.input_ids, &batch.token_type_ids, &batch.attention_mask)?;

            total_loss += cross_entropy(&logits, &batch.labels)?.to_scalar::<f32>()?;
            batches += 1;

            let predictions = logits.argmax(D::Minus1)?.to_vec1::<u32>()?;
            correct += predictions
                .iter()
                .zip(chunk.iter())
                .filter(|(pred, example)| **pred == example.label)
                .count();
        }

        let loss = total_loss / batches.max(1) as f32;
        let accuracy = correct as f32 / examples.len() as f32;

        Ok((loss, accuracy))
    }

    /// Tokenize a chunk of examples into padded batch tensors.
    fn encode_batch(&self, examples: &[TrainingExample]) -> Result<Batch> {
        let texts: Vec<&str> = examples.iter().map(|e| e.text.as_str()).collect();
        let encodings = self
            .tokenizer
            .encode_batch(texts, true)
            .map_err(anyhow::Error::msg)?;

        let mut input_ids = Vec::with_capacity(encodings.len());
        let mut token_type_ids = Vec::with_capacity(encodings.len());
        let mut attention_mask = Vec::with_capacity(encodings.len());

        for encoding in &encodings {
            input_ids.push(Tensor::new(encoding.get_ids(), &self.device)?);
            token_type_ids.push(Tensor::new(encoding.get_type_ids(), &self.device)?);
            attention_mask.push(Tensor::new(encoding.get_attention_mask(), &self.device)?);
        }

        let labels: Vec<u32> = examples.iter().map(|e| e.label).collect();

        Ok(Batch {
            input_ids: Tensor::stack(&input_ids, 0)?,
            token_type_ids: Tensor::stack(&token_type_ids, 0)?,
            attention_mask: Tensor::stack(&attention_mask, 0)?,
            labels: Tensor::new(labels.as_slice(), &self.device)?,
        })
    }

    fn save_checkpoint(&self, output: &Path, epoch: usize) -> Result<()> {
        let dir = output.join(format!("checkpoint-{}", epoch));
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        self.varmap.save(dir.join("model.safetensors"))?;

        prune_checkpoints(output, self.config.keep_checkpoints)?;

        Ok(())
    }

    /// Persist the final model, tokenizer and config to the output
    /// directory in the layout the inference service loads.
    pub fn save_final(&self, output: &Path) -> Result<()> {
        fs::create_dir_all(output)
            .with_context(|| format!("Cannot create output dir '{}'", output.display()))?;

        self.varmap.save(output.join("model.safetensors"))?;
        self.tokenizer
            .save(output.join("tokenizer.json"), false)
            .map_err(anyhow::Error::msg)?;
        fs::copy(&self.base_config_path, output.join("config.json"))?;

        Ok(())
    }
}

struct Batch {
    input_ids: Tensor,
    token_type_ids: Tensor,
    attention_mask: Tensor,
    labels: Tensor,
}

/// Copy pretrained tensors into the variable store by name.
///
/// Returns (loaded, fresh) counts; variables absent from the checkpoint
/// (the classification head) keep their random initialization.
fn load_pretrained(varmap: &VarMap, path: &Path, device: &Device) -> Result<(usize, usize)> {
    let tensors = candle_core::safetensors::load(path, device)
        .with_context(|| format!("Cannot read pretrained weights '{}'", path.display()))?;

    let data = varmap.data().lock().unwrap();
    let mut loaded = 0usize;
    let mut fresh = 0usize;

    for (name, var) in data.iter() {
        match tensors.get(name) {
            Some(tensor) => {
                var.set(tensor)?;
                loaded += 1;
            }
            None => {
                debug!("No pretrained weight for {}", name);
                fresh += 1;
            }
        }
    }

    Ok((loaded, fresh))
}

/// Remove the oldest `checkpoint-N` directories beyond the retention limit.
fn prune_checkpoints(output: &Path, keep: usize) -> Result<()> {
    let mut checkpoints: Vec<(u64, PathBuf)> = Vec::new();

    for entry in fs::read_dir(output)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(n) = name
            .strip_prefix("checkpoint-")
            .and_then(|s| s.parse::<u64>().ok())
        {
            if entry.path().is_dir() {
                checkpoints.push((n, entry.path()));
            }
        }
    }

    checkpoints.sort_by_key(|(n, _)| *n);

    while checkpoints.len() > keep {
        let (_, path) = checkpoints.remove(0);
        debug!("Removing old checkpoint {}", path.display());
        fs::remove_dir_all(&path)?;
    }

    Ok(())
}
