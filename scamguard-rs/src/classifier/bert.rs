//! BERT encoder with a two-class classification head
//!
//! The encoder itself comes from candle-transformers; this module only adds
//! the linear head over the [CLS] position. Weight names are `bert.*` for
//! the encoder and `classifier.*` for the head, so artifacts written by the
//! trainer load back unchanged here.

use candle_core::{IndexOp, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};

use super::types::NUM_LABELS;

/// Binary sequence classifier over a pretrained BERT encoder
pub struct BertClassifier {
    encoder: BertModel,
    head: Linear,
}

impl BertClassifier {
    /// Build the classifier from a variable store.
    ///
    /// Works both for inference (weights memory-mapped from safetensors)
    /// and for training (weights backed by a `VarMap`).
    pub fn load(vb: VarBuilder, config: &BertConfig) -> candle_core::Result<Self> {
        let encoder = BertModel::load(vb.pp("bert"), config)?;
        let head = linear(config.hidden_size, NUM_LABELS, vb.pp("classifier"))?;
        Ok(Self { encoder, head })
    }

    /// One forward pass: token ids in, raw logits of shape `[batch, 2]` out.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> candle_core::Result<Tensor> {
        let hidden = self
            .encoder
            .forward(input_ids, token_type_ids, Some(attention_mask))?;
        // Hidden state at the [CLS] position pools the sequence
        let cls = hidden.i((.., 0))?;
        self.head.forward(&cls)
    }
}
