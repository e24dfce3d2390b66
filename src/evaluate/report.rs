//! Evaluation report and its renderings.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EvalMode;
use crate::error::{Error, Result};
use crate::model::{Category, RejectedDocument};
use crate::table::TableResult;

/// Scores of one reference document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Document identifier (filename key)
    pub id: String,

    /// The prediction side had no document with this id
    pub missing_prediction: bool,

    /// Reading-order NID, when layout scoring ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nid: Option<f64>,

    /// NID per category, when requested
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category_nid: BTreeMap<Category, f64>,

    /// One entry per reference table, when table scoring ran
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<TableResult>,
}

/// Corpus-level means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusScores {
    /// Mean NID over scored documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nid: Option<f64>,

    /// Mean TEDS over reference tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teds: Option<f64>,

    /// Mean TEDS-S over reference tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teds_s: Option<f64>,

    /// Mean per-category NID
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category_nid: BTreeMap<Category, f64>,
}

/// Result of scoring a prediction dataset against a reference dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// When the report was produced (UTC)
    pub generated_at: DateTime<Utc>,

    /// Metrics that were computed
    pub mode: EvalMode,

    /// Number of documents scored
    pub document_count: usize,

    /// Number of scored documents without a prediction
    pub missing_predictions: usize,

    /// Number of reference tables scored
    pub table_count: usize,

    /// Number of reference tables scored as a complete mismatch
    pub failed_tables: usize,

    /// Corpus means
    pub scores: CorpusScores,

    /// Documents excluded by schema validation on either side
    pub rejected: Vec<RejectedDocument>,

    /// Per-document detail
    pub documents: Vec<DocumentResult>,
}

impl EvaluationReport {
    /// Look up the result of one document.
    pub fn document(&self, id: &str) -> Option<&DocumentResult> {
        self.documents.iter().find(|d| d.id == id)
    }
}

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a report to JSON.
pub fn to_json(report: &EvaluationReport, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(report),
        JsonFormat::Compact => serde_json::to_string(report),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Human-readable summary of a report.
pub fn to_text(report: &EvaluationReport) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Documents: {}", report.document_count);
    if report.missing_predictions > 0 {
        let _ = writeln!(out, "Missing predictions: {}", report.missing_predictions);
    }
    if !report.rejected.is_empty() {
        let _ = writeln!(out, "Rejected documents: {}", report.rejected.len());
        for rejected in &report.rejected {
            let _ = writeln!(out, "  {}: {}", rejected.id, rejected.reason);
        }
    }

    if let Some(nid) = report.scores.nid {
        let _ = writeln!(out, "NID Score: {:.4}", nid);
    }
    for (category, score) in &report.scores.category_nid {
        let _ = writeln!(out, "  {}: {:.4}", category, score);
    }

    if report.mode.includes_tables() {
        let _ = writeln!(
            out,
            "Tables: {} ({} failed)",
            report.table_count, report.failed_tables
        );
    }
    if let Some(teds) = report.scores.teds {
        let _ = writeln!(out, "TEDS Score: {:.4}", teds);
    }
    if let Some(teds_s) = report.scores.teds_s {
        let _ = writeln!(out, "TEDS-S Score: {:.4}", teds_s);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> EvaluationReport {
        EvaluationReport {
            generated_at: Utc::now(),
            mode: EvalMode::All,
            document_count: 2,
            missing_predictions: 1,
            table_count: 3,
            failed_tables: 1,
            scores: CorpusScores {
                nid: Some(0.5),
                teds: Some(0.25),
                teds_s: Some(0.75),
                category_nid: BTreeMap::new(),
            },
            rejected: vec![RejectedDocument {
                id: "bad.pdf".to_string(),
                reason: "missing id".to_string(),
            }],
            documents: Vec::new(),
        }
    }

    #[test]
    fn test_to_text() {
        let text = to_text(&report());
        assert!(text.contains("NID Score: 0.5000"));
        assert!(text.contains("TEDS Score: 0.2500"));
        assert!(text.contains("TEDS-S Score: 0.7500"));
        assert!(text.contains("bad.pdf: missing id"));
        assert!(text.contains("Tables: 3 (1 failed)"));
    }

    #[test]
    fn test_text_skips_metrics_not_computed() {
        let mut report = report();
        report.mode = EvalMode::Layout;
        report.scores.teds = None;
        report.scores.teds_s = None;

        let text = to_text(&report);
        assert!(text.contains("NID Score"));
        assert!(!text.contains("TEDS"));
        assert!(!text.contains("Tables:"));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&report(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"generated_at\""));
        assert!(json.contains("\"mode\": \"all\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&report(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let parsed: EvaluationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.scores.teds_s, Some(0.75));
    }
}
