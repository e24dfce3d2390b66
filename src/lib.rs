//! # dpeval
//!
//! Scoring engine for document parsing output.
//!
//! A reference dataset and a prediction dataset, both in the canonical JSON
//! schema, are compared on two axes:
//!
//! - **NID**: normalized indel distance between the reading-order text of
//!   each document pair
//! - **TEDS / TEDS-S**: tree-edit-distance similarity of paired tables, with
//!   and without cell content
//!
//! ## Quick Start
//!
//! ```no_run
//! use dpeval::{evaluate_files, EvalOptions};
//!
//! fn main() -> dpeval::Result<()> {
//!     let report = evaluate_files("reference.json", "prediction.json", &EvalOptions::default())?;
//!     println!("{}", dpeval::evaluate::to_text(&report));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Lenient loading**: malformed documents are reported and skipped
//! - **Vendor normalization**: per-vendor category maps behind a registry
//! - **Table pairing**: greedy IoU or document order
//! - **Parallel processing**: documents are scored with Rayon

pub mod error;
pub mod evaluate;
pub mod layout;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod table;

// Re-export commonly used types
pub use error::{Error, Result};
pub use evaluate::{
    evaluate, CorpusScores, DocumentResult, EvalMode, EvalOptions, EvaluationReport, JsonFormat,
};
pub use layout::{nid, LayoutScorer, ReadingOrder, ReadingOrderSerializer};
pub use loader::{load_file, load_str, ErrorMode, LoadOptions};
pub use model::{
    BoundingBox, Category, Content, Dataset, Document, Element, Point, RejectedDocument,
    TableTree,
};
pub use normalize::{CategoryNormalizer, NormalizerRegistry};
pub use table::{build_tree, TablePairing, TableResult, TedsScore, TedsScorer};

use std::path::Path;

/// Load two dataset files and score the prediction against the reference.
///
/// # Arguments
///
/// * `label_path` - Reference (ground truth) JSON file
/// * `pred_path` - Prediction JSON file
/// * `options` - Evaluation options
///
/// # Example
///
/// ```no_run
/// use dpeval::{evaluate_files, EvalMode, EvalOptions};
///
/// let options = EvalOptions::new().with_mode(EvalMode::Table);
/// let report = evaluate_files("reference.json", "prediction.json", &options).unwrap();
/// println!("TEDS: {:?}", report.scores.teds);
/// ```
pub fn evaluate_files<P: AsRef<Path>, Q: AsRef<Path>>(
    label_path: P,
    pred_path: Q,
    options: &EvalOptions,
) -> Result<EvaluationReport> {
    Evaluator::new()
        .with_eval_options(options.clone())
        .evaluate_files(label_path, pred_path)
}

/// NID between the reading-order text of two documents.
///
/// # Example
///
/// ```
/// use dpeval::{score_layout, Category, Content, Document, Element};
///
/// let para = |text: &str| {
///     Element::with_rect(0, Category::Paragraph, 1, (0.0, 0.0, 10.0, 10.0), Content::text(text))
/// };
/// let reference = Document::new("a.pdf", vec![para("abc")]);
/// let prediction = Document::new("a.pdf", vec![para("adc")]);
/// assert!((score_layout(&reference, &prediction) - 2.0 / 3.0).abs() < 1e-9);
/// ```
pub fn score_layout(reference: &Document, prediction: &Document) -> f64 {
    LayoutScorer::default().score(reference, Some(prediction))
}

/// TEDS and TEDS-S between two HTML tables.
///
/// # Example
///
/// ```
/// use dpeval::score_table_html;
///
/// let html = "<table><tr><td>a</td></tr></table>";
/// let score = score_table_html(html, html)?;
/// assert_eq!(score.teds, 1.0);
/// # Ok::<(), dpeval::Error>(())
/// ```
pub fn score_table_html(reference: &str, prediction: &str) -> Result<TedsScore> {
    let malformed = |side: &str, e: table::MalformedTable| Error::MalformedTable {
        document: side.to_string(),
        table_id: 0,
        reason: e.reason,
    };
    let reference = build_tree(reference).map_err(|e| malformed("reference", e))?;
    let prediction = build_tree(prediction).map_err(|e| malformed("prediction", e))?;

    // Without a time budget scoring always completes.
    TedsScorer::new()
        .score(&reference, &prediction)
        .map_err(|e| Error::Timeout {
            document: "prediction".to_string(),
            table_id: 0,
            elapsed_ms: e.elapsed.as_millis(),
        })
}

/// Builder for loading and scoring datasets.
///
/// # Example
///
/// ```no_run
/// use dpeval::{EvalMode, Evaluator};
///
/// let report = Evaluator::new()
///     .strict()
///     .with_vendor("microsoft")?
///     .mode(EvalMode::All)
///     .sequential()
///     .evaluate_files("reference.json", "prediction.json")?;
/// println!("{}", dpeval::evaluate::to_text(&report));
/// # Ok::<(), dpeval::Error>(())
/// ```
pub struct Evaluator {
    load_options: LoadOptions,
    eval_options: EvalOptions,
    registry: NormalizerRegistry,
}

impl Evaluator {
    /// Create a new Evaluator builder.
    pub fn new() -> Self {
        Self {
            load_options: LoadOptions::default(),
            eval_options: EvalOptions::default(),
            registry: NormalizerRegistry::with_defaults(),
        }
    }

    /// Fail on the first schema error instead of skipping the document.
    pub fn strict(mut self) -> Self {
        self.load_options = self.load_options.strict();
        self
    }

    /// Skip malformed documents with a warning.
    pub fn lenient(mut self) -> Self {
        self.load_options = self.load_options.lenient();
        self
    }

    /// Normalize categories of the prediction side with a registered vendor map.
    pub fn with_vendor(mut self, name: &str) -> Result<Self> {
        let normalizer = self.registry.get(name).ok_or_else(|| {
            Error::InvalidOption(format!(
                "unknown vendor '{}' (expected one of: {})",
                name,
                self.registry.names().join(", ")
            ))
        })?;
        self.load_options = self.load_options.with_normalizer(normalizer);
        Ok(self)
    }

    /// Register a custom category normalizer.
    pub fn register_normalizer(mut self, normalizer: std::sync::Arc<dyn CategoryNormalizer>) -> Self {
        self.registry.register(normalizer);
        self
    }

    /// Set the evaluation mode.
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.eval_options = self.eval_options.with_mode(mode);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.eval_options = self.eval_options.sequential();
        self
    }

    /// Replace the evaluation options.
    pub fn with_eval_options(mut self, options: EvalOptions) -> Self {
        self.eval_options = options;
        self
    }

    /// Load both files and score them.
    ///
    /// The reference is always loaded with canonical categories; a vendor
    /// normalizer only applies to the prediction.
    pub fn evaluate_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        label_path: P,
        pred_path: Q,
    ) -> Result<EvaluationReport> {
        let reference_options = LoadOptions::new().with_error_mode(self.load_options.error_mode);
        let reference = load_file(label_path, &reference_options)?;
        let prediction = load_file(pred_path, &self.load_options)?;
        self.evaluate(&reference, &prediction)
    }

    /// Score two loaded datasets.
    pub fn evaluate(&self, reference: &Dataset, prediction: &Dataset) -> Result<EvaluationReport> {
        evaluate::evaluate(reference, prediction, &self.eval_options)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
