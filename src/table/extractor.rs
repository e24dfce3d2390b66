//! Pairing reference tables with predicted tables.

use crate::layout::reading_order_cmp;
use crate::model::{Document, Element};

/// How reference and predicted tables are paired within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TablePairing {
    /// Greedy highest-IoU-first on the same page
    #[default]
    Iou,
    /// k-th reference table with k-th predicted table in reading order
    DocumentOrder,
}

impl std::str::FromStr for TablePairing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iou" => Ok(TablePairing::Iou),
            "document-order" | "document_order" | "order" => Ok(TablePairing::DocumentOrder),
            other => Err(format!("unknown table pairing '{}'", other)),
        }
    }
}

/// A reference table and the predicted table it was paired with, if any.
#[derive(Debug, Clone, Copy)]
pub struct TablePair<'a> {
    /// Reference table element
    pub reference: &'a Element,
    /// Matched prediction table element
    pub prediction: Option<&'a Element>,
    /// IoU of the two bounding boxes (0 when unmatched)
    pub iou: f64,
}

/// Pair every reference table of a document with at most one predicted table.
///
/// Results follow the reference tables' reading order. Unmatched reference
/// tables come back with `prediction: None`; predicted tables left over are
/// dropped and do not count against the document.
pub fn pair_tables<'a>(
    reference: &'a Document,
    prediction: Option<&'a Document>,
    pairing: TablePairing,
    min_iou: f64,
) -> Vec<TablePair<'a>> {
    let mut ref_tables: Vec<&Element> = reference.tables().collect();
    ref_tables.sort_by(|a, b| reading_order_cmp(a, b));

    let mut pred_tables: Vec<&Element> = prediction
        .map(|doc| doc.tables().collect())
        .unwrap_or_default();
    pred_tables.sort_by(|a, b| reading_order_cmp(a, b));

    let assignment = match pairing {
        TablePairing::Iou => greedy_iou(&ref_tables, &pred_tables, min_iou),
        TablePairing::DocumentOrder => (0..ref_tables.len())
            .map(|i| (i < pred_tables.len()).then_some(i))
            .collect(),
    };

    ref_tables
        .iter()
        .zip(assignment)
        .map(|(&r, matched)| {
            let prediction = matched.map(|j| pred_tables[j]);
            let iou = prediction.map_or(0.0, |p| r.bbox().iou(&p.bbox()));
            TablePair {
                reference: r,
                prediction,
                iou,
            }
        })
        .collect()
}

/// Greedy assignment: repeatedly take the highest-IoU pair whose tables are
/// both still free. Ties break on reference id, then prediction id.
fn greedy_iou(ref_tables: &[&Element], pred_tables: &[&Element], min_iou: f64) -> Vec<Option<usize>> {
    let mut candidates: Vec<(f64, usize, usize)> = Vec::new();
    for (i, r) in ref_tables.iter().enumerate() {
        for (j, p) in pred_tables.iter().enumerate() {
            if r.page != p.page {
                continue;
            }
            let iou = r.bbox().iou(&p.bbox());
            if iou > min_iou {
                candidates.push((iou, i, j));
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| ref_tables[a.1].id.cmp(&ref_tables[b.1].id))
            .then_with(|| pred_tables[a.2].id.cmp(&pred_tables[b.2].id))
    });

    let mut assignment = vec![None; ref_tables.len()];
    let mut pred_used = vec![false; pred_tables.len()];
    for (iou, i, j) in candidates {
        if assignment[i].is_some() || pred_used[j] {
            continue;
        }
        log::debug!(
            "Paired reference table {} with predicted table {} (IoU {:.3})",
            ref_tables[i].id,
            pred_tables[j].id,
            iou
        );
        assignment[i] = Some(j);
        pred_used[j] = true;
    }

    let unused = pred_used.iter().filter(|used| !**used).count();
    if unused > 0 {
        log::debug!("{} predicted tables left unpaired", unused);
    }

    assignment
}
