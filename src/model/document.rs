//! Document-level types.

use super::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A loaded document: a filename and its layout elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier (filename key in the dataset)
    pub id: String,

    /// Elements in annotation order
    pub elements: Vec<Element>,
}

impl Document {
    /// Create a new document.
    pub fn new(id: impl Into<String>, elements: Vec<Element>) -> Self {
        Self {
            id: id.into(),
            elements,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get an element by id.
    pub fn get(&self, id: i64) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Table elements in annotation order.
    pub fn tables(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.is_table())
    }

}

/// A document that failed schema validation and was excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedDocument {
    /// Document identifier
    pub id: String,

    /// Why it was rejected
    pub reason: String,
}

/// A collection of documents keyed by filename.
///
/// Keys are kept sorted so every run walks documents in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Documents by filename
    pub documents: BTreeMap<String, Document>,

    /// Documents excluded during loading
    pub rejected: Vec<RejectedDocument>,
}

impl Dataset {
    /// Create a new empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, replacing any document with the same id.
    pub fn insert(&mut self, document: Document) {
        self.documents.insert(document.id.clone(), document);
    }

    /// Record a rejected document.
    pub fn reject(&mut self, id: impl Into<String>, reason: impl Into<String>) {
        self.rejected.push(RejectedDocument {
            id: id.into(),
            reason: reason.into(),
        });
    }

    /// Get a document by id.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Whether the dataset has a document with this id.
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Whether a document with this id was rejected during loading.
    pub fn is_rejected(&self, id: &str) -> bool {
        self.rejected.iter().any(|r| r.id == id)
    }

    /// Number of loaded documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if no documents were loaded.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Iterate over documents in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }
}

impl FromIterator<Document> for Dataset {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for doc in iter {
            dataset.insert(doc);
        }
        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Content};

    fn element(id: i64, category: Category, page: u32) -> Element {
        Element::with_rect(id, category, page, (0.0, 0.0, 1.0, 1.0), Content::text("t"))
    }

    #[test]
    fn test_document_queries() {
        let doc = Document::new(
            "a.jpg",
            vec![
                element(0, Category::Paragraph, 1),
                element(1, Category::Table, 1),
                element(2, Category::Table, 2),
            ],
        );

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.tables().count(), 2);
        assert_eq!(doc.get(1).map(|e| e.category), Some(Category::Table));
        assert!(doc.get(9).is_none());
    }

    #[test]
    fn test_dataset_sorted_ids() {
        let dataset: Dataset = ["c.jpg", "a.jpg", "b.jpg"]
            .into_iter()
            .map(|id| Document::new(id, Vec::new()))
            .collect();

        let ids: Vec<&str> = dataset.ids().collect();
        assert_eq!(ids, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn test_dataset_reject() {
        let mut dataset = Dataset::new();
        dataset.reject("bad.jpg", "missing elements");
        assert!(dataset.is_rejected("bad.jpg"));
        assert!(dataset.is_empty());
    }
}
