//! Tree-edit-distance based similarity (TEDS / TEDS-S).

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::ted::{tree_edit_distance_within, ContentCost, DeadlineExceeded, StructureCost};
use crate::model::TableTree;

/// TEDS and TEDS-S for one table pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TedsScore {
    /// Structure and content similarity
    pub teds: f64,
    /// Structure-only similarity
    pub teds_s: f64,
}

impl TedsScore {
    /// Both metrics at their minimum (complete mismatch).
    pub const MISS: TedsScore = TedsScore {
        teds: 0.0,
        teds_s: 0.0,
    };

    /// Both metrics at their maximum.
    pub const PERFECT: TedsScore = TedsScore {
        teds: 1.0,
        teds_s: 1.0,
    };
}

/// Turns a tree edit distance into a similarity in [0, 1].
pub fn similarity(distance: f64, reference: &TableTree, prediction: &TableTree) -> f64 {
    let nodes = reference.node_count().max(prediction.node_count());
    if nodes == 0 {
        return 1.0;
    }
    (1.0 - distance / nodes as f64).clamp(0.0, 1.0)
}

/// Computes TEDS and TEDS-S for table tree pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TedsScorer {
    timeout: Option<Duration>,
}

impl TedsScorer {
    /// Create a scorer without a time budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up on a table pair after `timeout` of wall-clock time.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Score a pair of trees built with cell content.
    ///
    /// The budget covers both computations together.
    pub fn score(
        &self,
        reference: &TableTree,
        prediction: &TableTree,
    ) -> Result<TedsScore, DeadlineExceeded> {
        let deadline = self.timeout.map(|t| Instant::now() + t);

        let content_distance =
            tree_edit_distance_within(&reference.root, &prediction.root, &ContentCost, deadline)?;
        let structure_distance =
            tree_edit_distance_within(&reference.root, &prediction.root, &StructureCost, deadline)?;

        Ok(TedsScore {
            teds: similarity(content_distance, reference, prediction),
            teds_s: similarity(structure_distance, reference, prediction),
        })
    }
}
