//! Evaluation options and configuration.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::layout::{ReadingOrder, ReadingOrderSerializer};
use crate::model::Category;
use crate::table::{TablePairing, TableScorer, TedsScorer};

/// Which metrics to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalMode {
    /// Reading-order text only (NID)
    Layout,
    /// Table structure only (TEDS / TEDS-S)
    Table,
    /// Both
    #[default]
    All,
}

impl EvalMode {
    /// Whether NID is computed.
    pub fn includes_layout(&self) -> bool {
        matches!(self, EvalMode::Layout | EvalMode::All)
    }

    /// Whether TEDS / TEDS-S are computed.
    pub fn includes_tables(&self) -> bool {
        matches!(self, EvalMode::Table | EvalMode::All)
    }
}

impl std::str::FromStr for EvalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "layout" | "nid" => Ok(EvalMode::Layout),
            "table" | "teds" => Ok(EvalMode::Table),
            "all" => Ok(EvalMode::All),
            other => Err(format!("unknown evaluation mode '{}'", other)),
        }
    }
}

/// Options for scoring a dataset pair.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Metrics to compute
    pub mode: EvalMode,

    /// Categories left out of the reading-order text
    pub ignore_categories: HashSet<Category>,

    /// Character placed between text fragments
    pub separator: char,

    /// Substrings deleted from the serialized text
    pub strings_to_remove: Vec<String>,

    /// How elements are ordered before serialization
    pub reading_order: ReadingOrder,

    /// Apply NFC normalization to serialized text
    pub normalize_unicode: bool,

    /// How tables are paired within a document
    pub pairing: TablePairing,

    /// IoU a table pair must exceed under IoU pairing
    pub min_iou: f64,

    /// Also report NID per category
    pub per_category: bool,

    /// Score documents in parallel
    pub parallel: bool,

    /// Wall-clock budget per table pair
    pub table_timeout: Option<Duration>,
}

impl EvalOptions {
    /// Create new evaluation options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the evaluation mode.
    pub fn with_mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the ignored categories.
    pub fn with_ignored(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.ignore_categories = categories.into_iter().collect();
        self
    }

    /// Set the fragment separator.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Replace the substrings removed from serialized text.
    pub fn with_strings_to_remove<S: Into<String>>(
        mut self,
        strings: impl IntoIterator<Item = S>,
    ) -> Self {
        self.strings_to_remove = strings.into_iter().map(Into::into).collect();
        self
    }

    /// Set the reading order.
    pub fn with_reading_order(mut self, order: ReadingOrder) -> Self {
        self.reading_order = order;
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Set the table pairing strategy.
    pub fn with_pairing(mut self, pairing: TablePairing) -> Self {
        self.pairing = pairing;
        self
    }

    /// Set the IoU threshold for table pairing.
    pub fn with_min_iou(mut self, min_iou: f64) -> Self {
        self.min_iou = min_iou.clamp(0.0, 1.0);
        self
    }

    /// Enable or disable the per-category NID breakdown.
    pub fn with_per_category(mut self, enabled: bool) -> Self {
        self.per_category = enabled;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the per-table time budget.
    pub fn with_table_timeout(mut self, timeout: Duration) -> Self {
        self.table_timeout = Some(timeout);
        self
    }

    /// Serializer configured from these options.
    pub fn serializer(&self) -> ReadingOrderSerializer {
        ReadingOrderSerializer::new()
            .with_order(self.reading_order)
            .with_separator(self.separator)
            .with_ignored(self.ignore_categories.iter().copied())
            .with_strings_to_remove(self.strings_to_remove.iter().cloned())
            .with_unicode_normalization(self.normalize_unicode)
    }

    /// Table scorer configured from these options.
    pub fn table_scorer(&self) -> TableScorer {
        TableScorer::new(
            self.pairing,
            self.min_iou,
            TedsScorer::new().with_timeout(self.table_timeout),
        )
    }
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            mode: EvalMode::All,
            ignore_categories: [Category::Table, Category::Figure, Category::Chart]
                .into_iter()
                .collect(),
            separator: ' ',
            strings_to_remove: vec!["\n".to_string()],
            reading_order: ReadingOrder::Geometric,
            normalize_unicode: true,
            pairing: TablePairing::Iou,
            min_iou: 0.0,
            per_category: false,
            parallel: true,
            table_timeout: None,
        }
    }
}
