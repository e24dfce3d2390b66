//! Table structure scoring (TEDS / TEDS-S).
//!
//! Reference tables are paired with predicted tables, both sides are parsed
//! into table trees, and each pair is compared by tree edit distance. A
//! table that cannot be scored (malformed markup, no matching prediction,
//! time budget exceeded) counts as a complete mismatch; the failure is logged
//! and recorded on its [`TableResult`].

mod builder;
mod extractor;
mod ted;
mod teds;

pub use builder::{build_tree, MalformedTable, MAX_SPAN};
pub use extractor::{pair_tables, TablePair, TablePairing};
pub use ted::{
    normalized_token_distance, tree_edit_distance, tree_edit_distance_within, ContentCost,
    DeadlineExceeded, StructureCost, TreeCost,
};
pub use teds::{similarity, TedsScore, TedsScorer};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{Document, Element, TableTree};

/// Score of one reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableResult {
    /// Reference table element id
    pub reference_id: i64,

    /// Paired prediction table element id
    pub prediction_id: Option<i64>,

    /// Bounding-box IoU of the pair
    pub iou: f64,

    /// Structure and content similarity
    pub teds: f64,

    /// Structure-only similarity
    pub teds_s: f64,

    /// Why the table was scored as a complete mismatch, if it was
    pub failure: Option<String>,
}

impl TableResult {
    fn miss(pair: &TablePair<'_>, failure: Option<String>) -> Self {
        Self {
            reference_id: pair.reference.id,
            prediction_id: pair.prediction.map(|p| p.id),
            iou: pair.iou,
            teds: 0.0,
            teds_s: 0.0,
            failure,
        }
    }
}

/// Scores the tables of a document pair.
#[derive(Debug, Clone, Default)]
pub struct TableScorer {
    pairing: TablePairing,
    min_iou: f64,
    teds: TedsScorer,
}

impl TableScorer {
    /// Create a scorer.
    pub fn new(pairing: TablePairing, min_iou: f64, teds: TedsScorer) -> Self {
        Self {
            pairing,
            min_iou,
            teds,
        }
    }

    /// Score every reference table of a document.
    ///
    /// A missing prediction document scores 0 on every reference table.
    pub fn score_document(&self, reference: &Document, prediction: Option<&Document>) -> Vec<TableResult> {
        pair_tables(reference, prediction, self.pairing, self.min_iou)
            .iter()
            .map(|pair| self.score_pair(&reference.id, pair))
            .collect()
    }

    fn score_pair(&self, document: &str, pair: &TablePair<'_>) -> TableResult {
        let Some(predicted) = pair.prediction else {
            log::debug!(
                "Reference table {} in {} has no matching prediction",
                pair.reference.id,
                document
            );
            return TableResult::miss(pair, None);
        };

        match self.score_trees(document, pair, predicted) {
            Ok(result) => result,
            Err(err) if err.is_table_recoverable() => {
                log::warn!("{}; scoring as a complete mismatch", err);
                TableResult::miss(pair, Some(err.to_string()))
            }
            Err(err) => {
                log::error!("{}; scoring as a complete mismatch", err);
                TableResult::miss(pair, Some(err.to_string()))
            }
        }
    }

    fn score_trees(
        &self,
        document: &str,
        pair: &TablePair<'_>,
        predicted: &Element,
    ) -> Result<TableResult, Error> {
        let ref_tree = parse_side(document, pair.reference)?;
        let pred_tree = parse_side(document, predicted)?;

        let score = self
            .teds
            .score(&ref_tree, &pred_tree)
            .map_err(|exceeded| Error::Timeout {
                document: document.to_string(),
                table_id: pair.reference.id,
                elapsed_ms: exceeded.elapsed.as_millis(),
            })?;

        Ok(TableResult {
            reference_id: pair.reference.id,
            prediction_id: Some(predicted.id),
            iou: pair.iou,
            teds: score.teds,
            teds_s: score.teds_s,
            failure: None,
        })
    }
}

fn parse_side(document: &str, element: &Element) -> Result<TableTree, Error> {
    build_tree(&element.content.html).map_err(|e| Error::MalformedTable {
        document: document.to_string(),
        table_id: element.id,
        reason: e.reason,
    })
}
