//! ONNX Runtime sentiment classifier for 3-class sequence-classification models.
//!
//! Targets exports of `cardiffnlp/twitter-roberta-base-sentiment-latest` and
//! similar heads. The model directory must contain `model.onnx` and
//! `tokenizer.json`; an optional `config.json` supplies `id2label`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use ort::session::Session;
use ort::value::Tensor;
use serde::Deserialize;
use tokenizers::Tokenizer;
use tracing::info;

use crate::{ClassProbabilities, ContextualClassifier};

const MAX_SEQ_LEN: usize = 512;

/// Contextual sentiment classifier backed by ONNX Runtime.
///
/// The session sits behind a mutex so one loaded model can be shared by
/// reference across every analysis in the process.
pub struct OnnxSentimentClassifier {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    uses_token_type_ids: bool,
}

#[derive(Deserialize)]
struct ModelConfig {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

impl OnnxSentimentClassifier {
    /// Load a classifier from a directory containing `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );

        let session = Session::builder()?.commit_from_file(&model_path)?;

        // BERT-style exports take token_type_ids, RoBERTa exports do not.
        let uses_token_type_ids = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_SEQ_LEN,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;
        tokenizer.with_padding(None);

        let labels = read_labels(&model_dir.join("config.json"))?;

        info!(
            model = %model_path.display(),
            labels = ?labels,
            uses_token_type_ids,
            "loaded sentiment classifier"
        );
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels,
            uses_token_type_ids,
        })
    }

    /// Raw logits for one text.
    pub fn logits(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let seq_len = encoding.get_ids().len();
        let shape = [1i64, seq_len as i64];

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        let ids_tensor = Tensor::from_array((shape, input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, attention_mask.into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("session mutex poisoned: {e}"))?;

        let outputs = if self.uses_token_type_ids {
            let token_type_ids: Vec<i64> =
                encoding.get_type_ids().iter().map(|&t| t as i64).collect();
            let type_tensor = Tensor::from_array((shape, token_type_ids.into_boxed_slice()))?;
            session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
                "token_type_ids" => type_tensor,
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
            ])?
        };

        // Logits: [1, num_labels].
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.len() == 2 && dims[0] == 1 && dims[1] == 3,
            "unexpected output shape: {dims:?}, expected [1, 3]"
        );

        Ok(output_data.to_vec())
    }
}

impl ContextualClassifier for OnnxSentimentClassifier {
    fn classify(&self, text: &str) -> anyhow::Result<ClassProbabilities> {
        let logits = self.logits(text)?;
        Ok(ClassProbabilities::from_logits(&logits, &self.labels))
    }
}

/// Read `id2label` from a Hugging Face `config.json`, ordered by id.
fn read_labels(config_path: &Path) -> anyhow::Result<Vec<String>> {
    if !config_path.exists() {
        return Ok(vec![]);
    }
    let raw = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    let config: ModelConfig = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", config_path.display()))?;
    Ok(labels_by_id(config.id2label))
}

fn labels_by_id(id2label: HashMap<String, String>) -> Vec<String> {
    let mut pairs: Vec<(usize, String)> = id2label
        .into_iter()
        .filter_map(|(id, label)| id.parse().ok().map(|id| (id, label)))
        .collect();
    pairs.sort_by_key(|(id, _)| *id);
    pairs.into_iter().map(|(_, label)| label).collect()
}
