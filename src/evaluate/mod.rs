//! Dataset-level evaluation.
//!
//! Every reference document is scored against the prediction document with
//! the same id and the per-document results are averaged into corpus scores.
//! Documents are independent, so they are scored in parallel unless
//! [`EvalOptions::parallel`] is off; results keep the reference order.

mod options;
mod report;

pub use options::{EvalMode, EvalOptions};
pub use report::{to_json, to_text, CorpusScores, DocumentResult, EvaluationReport, JsonFormat};

use std::collections::BTreeMap;

use chrono::Utc;
use rayon::prelude::*;

use crate::error::Result;
use crate::layout::LayoutScorer;
use crate::loader::check_pair;
use crate::model::{Category, Dataset, Document, RejectedDocument};
use crate::table::TableScorer;

/// Score a prediction dataset against a reference dataset.
///
/// Reference documents without a prediction score 0 on every metric.
/// Documents rejected on either side are listed in the report and left out
/// of every average.
///
/// # Example
///
/// ```no_run
/// use dpeval::evaluate::{evaluate, EvalOptions};
/// use dpeval::loader::{load_file, LoadOptions};
///
/// let load = LoadOptions::default();
/// let reference = load_file("reference.json", &load)?;
/// let prediction = load_file("prediction.json", &load)?;
///
/// let report = evaluate(&reference, &prediction, &EvalOptions::default())?;
/// println!("NID: {:?}", report.scores.nid);
/// # Ok::<(), dpeval::Error>(())
/// ```
pub fn evaluate(
    reference: &Dataset,
    prediction: &Dataset,
    options: &EvalOptions,
) -> Result<EvaluationReport> {
    check_pair(reference, prediction)?;

    let rejected = collect_rejected(reference, prediction);
    let documents: Vec<&Document> = reference
        .iter()
        .filter(|doc| {
            if prediction.is_rejected(&doc.id) {
                log::warn!("{} was rejected in the prediction; excluding it", doc.id);
                false
            } else {
                true
            }
        })
        .collect();

    let scorer = DocumentScorer {
        options,
        layout: LayoutScorer::new(options.serializer()),
        tables: options.table_scorer(),
    };

    let results: Vec<DocumentResult> = if options.parallel {
        documents
            .par_iter()
            .map(|doc| scorer.score(doc, prediction.get(&doc.id)))
            .collect()
    } else {
        documents
            .iter()
            .map(|doc| scorer.score(doc, prediction.get(&doc.id)))
            .collect()
    };

    Ok(build_report(options, results, rejected))
}

struct DocumentScorer<'a> {
    options: &'a EvalOptions,
    layout: LayoutScorer,
    tables: TableScorer,
}

impl DocumentScorer<'_> {
    fn score(&self, reference: &Document, prediction: Option<&Document>) -> DocumentResult {
        log::debug!("Scoring {}", reference.id);
        let mode = self.options.mode;

        let nid = mode
            .includes_layout()
            .then(|| self.layout.score(reference, prediction));
        let category_nid = if mode.includes_layout() && self.options.per_category {
            self.layout.score_by_category(reference, prediction)
        } else {
            BTreeMap::new()
        };
        let tables = if mode.includes_tables() {
            self.tables.score_document(reference, prediction)
        } else {
            Vec::new()
        };

        DocumentResult {
            id: reference.id.clone(),
            missing_prediction: prediction.is_none(),
            nid,
            category_nid,
            tables,
        }
    }
}

fn collect_rejected(reference: &Dataset, prediction: &Dataset) -> Vec<RejectedDocument> {
    let tag = |side: &str, r: &RejectedDocument| RejectedDocument {
        id: r.id.clone(),
        reason: format!("{}: {}", side, r.reason),
    };
    reference
        .rejected
        .iter()
        .map(|r| tag("reference", r))
        .chain(prediction.rejected.iter().map(|r| tag("prediction", r)))
        .collect()
}

fn build_report(
    options: &EvalOptions,
    documents: Vec<DocumentResult>,
    rejected: Vec<RejectedDocument>,
) -> EvaluationReport {
    let mode = options.mode;
    let mut scores = CorpusScores::default();

    if mode.includes_layout() {
        let values: Vec<f64> = documents.iter().filter_map(|d| d.nid).collect();
        scores.nid = Some(mean_or_zero(&values, "No documents to score for NID"));

        let mut by_category: BTreeMap<Category, Vec<f64>> = BTreeMap::new();
        for doc in &documents {
            for (category, score) in &doc.category_nid {
                by_category.entry(*category).or_default().push(*score);
            }
        }
        scores.category_nid = by_category
            .into_iter()
            .map(|(category, values)| (category, mean(&values)))
            .collect();
    }

    let tables: Vec<_> = documents.iter().flat_map(|d| d.tables.iter()).collect();
    if mode.includes_tables() {
        let teds: Vec<f64> = tables.iter().map(|t| t.teds).collect();
        let teds_s: Vec<f64> = tables.iter().map(|t| t.teds_s).collect();
        scores.teds = Some(mean_or_zero(&teds, "No tables found in the reference"));
        scores.teds_s = Some(mean(&teds_s));
    }

    EvaluationReport {
        generated_at: Utc::now(),
        mode,
        document_count: documents.len(),
        missing_predictions: documents.iter().filter(|d| d.missing_prediction).count(),
        table_count: tables.len(),
        failed_tables: tables.iter().filter(|t| t.failure.is_some()).count(),
        scores,
        rejected,
        documents,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn mean_or_zero(values: &[f64], warning: &str) -> f64 {
    if values.is_empty() {
        log::warn!("{}; reporting 0", warning);
    }
    mean(values)
}
