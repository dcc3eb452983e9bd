//! Model loading and single-message inference

use candle_core::{Device, Tensor, D};
use candle_nn::ops::softmax;
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{Config as BertConfig, DTYPE};
use std::path::Path;
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};
use tracing::info;

use crate::error::{Result, ScamError};

use super::bert::BertClassifier;
use super::types::{Classification, Label};

/// A loaded classifier ready to score messages.
///
/// Holds the model weights, tokenizer and device; created once at startup
/// and shared read-only across request handlers.
pub struct MessageClassifier {
    model: BertClassifier,
    tokenizer: Tokenizer,
    device: Device,
}

impl MessageClassifier {
    /// Load model and tokenizer from an artifact directory containing
    /// `config.json`, `tokenizer.json` and `model.safetensors`.
    pub fn load(artifact_dir: &Path, max_seq_len: usize) -> Result<Self> {
        let device = Device::Cpu;

        let config_path = artifact_dir.join("config.json");
        let config: BertConfig =
            serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

        let mut tokenizer = Tokenizer::from_file(artifact_dir.join("tokenizer.json"))
            .map_err(|e| ScamError::Tokenizer(e.to_string()))?;
        tokenizer.with_padding(Some(PaddingParams::default()));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_seq_len,
                ..Default::default()
            }))
            .map_err(|e| ScamError::Tokenizer(e.to_string()))?;

        // Weights load as plain tensors, so no gradient tape is ever built
        // on the inference path.
        let weights_path = artifact_dir.join("model.safetensors");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)?
        };
        let model = BertClassifier::load(vb, &config)?;

        info!("Loaded classifier from {}", artifact_dir.display());

        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }

    /// Classify one message: tokenize, forward pass, softmax, argmax.
    pub fn classify(&self, text: &str) -> Result<Classification> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ScamError::Tokenizer(e.to_string()))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let token_type_ids =
            Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = self
            .model
            .forward(&input_ids, &token_type_ids, &attention_mask)?;
        let probs = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?;

        let (index, score) = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, p)| (i, *p))
            .unwrap_or((0, 0.0));

        let label = Label::from_class_index(index);

        Ok(Classification {
            label,
            score,
            explanation: label.explanation().to_string(),
        })
    }
}
