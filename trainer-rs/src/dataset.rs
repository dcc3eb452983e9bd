//! CSV dataset loading and train/validation split

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// One labeled training example. Label 0 is safe, 1 is scam.
#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub text: String,
    pub label: u32,
}

/// Raw CSV row before cleaning. Both columns are required by header name;
/// everything else in the file is ignored.
#[derive(Debug, Deserialize)]
struct RawRow {
    text: Option<String>,
    label: Option<String>,
}

/// Load labeled examples from a CSV file with `text` and `label` columns.
///
/// Rows with a missing or empty field, or a label that does not coerce to
/// 0 or 1, are dropped with a warning rather than aborting the run.
pub fn load_csv(path: &Path) -> Result<Vec<TrainingExample>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Cannot open dataset '{}'", path.display()))?;

    let mut examples = Vec::new();
    let mut dropped = 0usize;

    for row in reader.deserialize() {
        let row: RawRow = row.context("Malformed CSV row")?;
        match clean_row(row) {
            Some(example) => examples.push(example),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!("Dropped {} rows with missing or invalid fields", dropped);
    }
    info!("Loaded {} examples from {}", examples.len(), path.display());

    Ok(examples)
}

fn clean_row(row: RawRow) -> Option<TrainingExample> {
    let text = row.text?;
    if text.trim().is_empty() {
        return None;
    }

    let raw_label = row.label?;
    let raw_label = raw_label.trim();
    // Coerce to integer; "1.0" style floats appear in exported datasets
    let label = raw_label
        .parse::<u32>()
        .ok()
        .or_else(|| raw_label.parse::<f64>().ok().map(|f| f as u32))?;
    if label > 1 {
        return None;
    }

    Some(TrainingExample { text, label })
}

/// Randomly shuffle `examples` and split off a validation fraction.
///
/// The split is stratify-free: classes are only balanced to the extent the
/// shuffle makes them so.
pub fn split_train_val<T>(mut examples: Vec<T>, val_fraction: f64) -> (Vec<T>, Vec<T>) {
    examples.shuffle(&mut rand::thread_rng());

    let total = examples.len();
    let val_len = ((total as f64) * val_fraction).round() as usize;
    let val = examples.split_off(total - val_len.min(total));

    (examples, val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = write_csv(
            "text,label\n\
             \"Congratulations, you won a prize!\",1\n\
             \"Lunch at noon?\",0\n",
        );

        let examples = load_csv(file.path()).unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].label, 1);
        assert_eq!(examples[1].label, 0);
        assert_eq!(examples[1].text, "Lunch at noon?");
    }

    #[test]
    fn test_rows_with_missing_fields_dropped() {
        let file = write_csv(
            "text,label\n\
             \"Missing label\",\n\
             ,1\n\
             \"Bad label\",spam\n\
             \"Out of range\",3\n\
             \"Kept\",1\n",
        );

        let examples = load_csv(file.path()).unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].text, "Kept");
    }

    #[test]
    fn test_float_label_coerced() {
        let file = write_csv("text,label\n\"Float label\",1.0\n");

        let examples = load_csv(file.path()).unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].label, 1);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(load_csv(Path::new("/nonexistent/dataset.csv")).is_err());
    }

    #[test]
    fn test_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val) = split_train_val(items, 0.2);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(), 20);
    }

    #[test]
    fn test_split_preserves_all_items() {
        let items: Vec<usize> = (0..53).collect();
        let (train, val) = split_train_val(items, 0.2);
        assert_eq!(train.len() + val.len(), 53);
    }

    #[test]
    fn test_split_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, val) = split_train_val(items, 0.2);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }
}
