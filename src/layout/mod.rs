//! Reading-order (NID) scoring.
//!
//! Each document is serialized into one reading-order string per side and
//! the two strings are compared with the normalized indel distance.

mod nid;
mod serializer;

pub use nid::{indel_distance, nid};
pub use serializer::{
    reading_order_cmp, strip_markdown, text_fragment, ReadingOrder, ReadingOrderSerializer,
};

use std::collections::BTreeMap;

use crate::model::{Category, Document};

/// Scores documents on reading-order text.
#[derive(Debug, Clone, Default)]
pub struct LayoutScorer {
    serializer: ReadingOrderSerializer,
}

impl LayoutScorer {
    /// Create a scorer around a serializer.
    pub fn new(serializer: ReadingOrderSerializer) -> Self {
        Self { serializer }
    }

    /// The serializer in use.
    pub fn serializer(&self) -> &ReadingOrderSerializer {
        &self.serializer
    }

    /// NID of one document. A missing prediction scores 0.
    pub fn score(&self, reference: &Document, prediction: Option<&Document>) -> f64 {
        let Some(prediction) = prediction else {
            return 0.0;
        };
        let r = self.serializer.serialize(reference);
        let p = self.serializer.serialize(prediction);
        nid(&r, &p)
    }

    /// NID of one document computed separately for each included category.
    ///
    /// Categories with no text on either side are left out. With a missing
    /// prediction, every category present in the reference scores 0.
    pub fn score_by_category(
        &self,
        reference: &Document,
        prediction: Option<&Document>,
    ) -> BTreeMap<Category, f64> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| self.serializer.includes(*c))
            .filter_map(|category| {
                let r = self.serializer.serialize_category(reference, category);
                let p = prediction
                    .map(|doc| self.serializer.serialize_category(doc, category))
                    .unwrap_or_default();
                if r.is_empty() && p.is_empty() {
                    return None;
                }
                let score = if prediction.is_some() { nid(&r, &p) } else { 0.0 };
                Some((category, score))
            })
            .collect()
    }
}
