//! Canonical JSON loader.
//!
//! Reads a mapping from document filename to `{ "elements": [...] }` and
//! validates every element into the typed [`model`](crate::model)
//! representation. Validation happens per document: in lenient mode a
//! malformed document is logged, recorded in [`Dataset::rejected`] and left
//! out, while the rest of the file still loads.

mod options;

pub use options::{ErrorMode, LoadOptions};

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{Category, Content, Dataset, Document, Element, Point};

/// Number of corner points every element polygon must have.
pub const POLYGON_POINTS: usize = 4;

#[derive(Debug, Deserialize)]
struct RawDocument {
    elements: Option<Vec<RawElement>>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    coordinates: Option<Vec<Point>>,
    category: Option<String>,
    id: Option<i64>,
    page: Option<u32>,
    content: Option<RawContent>,
}

#[derive(Debug, Deserialize)]
struct RawContent {
    text: Option<String>,
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    markdown: Option<String>,
}

/// Load a dataset from a `.json` file.
///
/// # Example
///
/// ```no_run
/// use dpeval::loader::{load_file, LoadOptions};
///
/// let reference = load_file("reference.json", &LoadOptions::default())?;
/// println!("{} documents", reference.len());
/// # Ok::<(), dpeval::Error>(())
/// ```
pub fn load_file<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Dataset> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File {} not found", path.display()),
        )));
    }

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if !is_json {
        return Err(Error::UnsupportedFormat(format!(
            "{} (expected a .json file)",
            path.display()
        )));
    }

    log::debug!("Loading dataset from {}", path.display());
    let data = fs::read_to_string(path)?;
    load_str(&data, options)
}

/// Load a dataset from a JSON string.
pub fn load_str(json: &str, options: &LoadOptions) -> Result<Dataset> {
    let value: Value = serde_json::from_str(json)?;
    load_value(value, options)
}

/// Load a dataset from an already-parsed JSON value.
pub fn load_value(value: Value, options: &LoadOptions) -> Result<Dataset> {
    let raw: BTreeMap<String, Value> = match value {
        Value::Object(map) => map.into_iter().collect(),
        other => {
            return Err(Error::schema(
                "<root>",
                format!("expected an object keyed by filename, found {}", kind_of(&other)),
            ))
        }
    };

    let mut dataset = Dataset::new();
    for (id, doc_value) in raw {
        match parse_document(&id, doc_value, options) {
            Ok(doc) => dataset.insert(doc),
            Err(err) => match options.error_mode {
                ErrorMode::Strict => return Err(err),
                ErrorMode::Lenient => {
                    log::warn!("Excluding document: {}", err);
                    let reason = match err {
                        Error::Schema { message, .. } => message,
                        other => other.to_string(),
                    };
                    dataset.reject(id, reason);
                }
            },
        }
    }

    log::debug!(
        "Loaded {} documents ({} rejected)",
        dataset.len(),
        dataset.rejected.len()
    );
    Ok(dataset)
}

/// Check that a reference and prediction dataset can be scored together.
///
/// Both sides must contain at least one document (loaded or rejected).
/// Reference documents missing from the prediction are not an error; they
/// are scored as a complete miss. Prediction documents unknown to the
/// reference are ignored.
pub fn check_pair(reference: &Dataset, prediction: &Dataset) -> Result<()> {
    if reference.is_empty() && reference.rejected.is_empty() {
        return Err(Error::EmptyDataset("reference has no documents".into()));
    }
    if prediction.is_empty() && prediction.rejected.is_empty() {
        return Err(Error::EmptyDataset("prediction has no documents".into()));
    }

    for id in reference.ids() {
        if !prediction.contains(id) && !prediction.is_rejected(id) {
            log::warn!("{} not found in prediction; scoring it as a complete miss", id);
        }
    }
    for id in prediction.ids() {
        if !reference.contains(id) && !reference.is_rejected(id) {
            log::warn!("{} is not in the reference; ignoring it", id);
        }
    }

    Ok(())
}

fn parse_document(id: &str, value: Value, options: &LoadOptions) -> Result<Document> {
    let raw: RawDocument = serde_json::from_value(value)
        .map_err(|e| Error::schema(id, format!("invalid document object: {}", e)))?;

    let raw_elements = raw
        .elements
        .ok_or_else(|| Error::schema(id, "missing 'elements' key"))?;

    let mut seen = HashSet::with_capacity(raw_elements.len());
    let mut elements = Vec::with_capacity(raw_elements.len());
    for (index, raw_elem) in raw_elements.into_iter().enumerate() {
        let element = validate_element(id, index, raw_elem, options)?;
        if !seen.insert(element.id) {
            return Err(Error::schema(
                id,
                format!("duplicate element id {}", element.id),
            ));
        }
        elements.push(element);
    }

    Ok(Document::new(id, elements))
}

fn validate_element(
    doc_id: &str,
    index: usize,
    raw: RawElement,
    options: &LoadOptions,
) -> Result<Element> {
    let missing = |field: &str| Error::schema(doc_id, format!("element #{} has no '{}'", index, field));

    let raw_category = raw.category.ok_or_else(|| missing("category"))?;
    let category = resolve_category(&raw_category, options).ok_or_else(|| {
        Error::schema(
            doc_id,
            format!("element #{} has unknown category '{}'", index, raw_category),
        )
    })?;

    let id = raw.id.ok_or_else(|| missing("id"))?;

    let coordinates = raw.coordinates.ok_or_else(|| missing("coordinates"))?;
    if coordinates.len() != POLYGON_POINTS {
        return Err(Error::schema(
            doc_id,
            format!(
                "element {} has {} coordinate points, expected {}",
                id,
                coordinates.len(),
                POLYGON_POINTS
            ),
        ));
    }
    if coordinates.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(Error::schema(
            doc_id,
            format!("element {} has non-finite coordinates", id),
        ));
    }

    let page = raw.page.unwrap_or(1);
    if page == 0 {
        return Err(Error::schema(
            doc_id,
            format!("element {} has page 0 (pages are 1-based)", id),
        ));
    }

    let raw_content = raw.content.ok_or_else(|| missing("content"))?;
    let content = Content {
        text: raw_content.text.ok_or_else(|| missing("content.text"))?,
        html: raw_content.html.unwrap_or_default(),
        markdown: raw_content.markdown.unwrap_or_default(),
    };

    Ok(Element::new(id, category, coordinates, page, content))
}

fn resolve_category(raw: &str, options: &LoadOptions) -> Option<Category> {
    match options.normalizer {
        Some(ref normalizer) => normalizer.normalize(raw),
        None => raw.parse().ok(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizerRegistry;

    const VALID: &str = r#"{
        "doc_a.jpg": {
            "elements": [
                {
                    "coordinates": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 10, "y": 5}, {"x": 0, "y": 5}],
                    "category": "Paragraph",
                    "id": 0,
                    "page": 1,
                    "content": {"text": "Hello", "html": "", "markdown": ""}
                },
                {
                    "coordinates": [{"x": 0, "y": 10}, {"x": 10, "y": 10}, {"x": 10, "y": 20}, {"x": 0, "y": 20}],
                    "category": "table",
                    "id": 1,
                    "content": {"text": "", "html": "<table><tr><td>1</td></tr></table>"}
                }
            ]
        }
    }"#;

    #[test]
    fn test_load_valid() {
        let dataset = load_str(VALID, &LoadOptions::default()).unwrap();
        let doc = dataset.get("doc_a.jpg").unwrap();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.elements[0].category, Category::Paragraph);
        assert_eq!(doc.elements[1].category, Category::Table);
        assert_eq!(doc.elements[1].page, 1);
        assert_eq!(doc.elements[1].content.markdown, "");
    }

    #[test]
    fn test_unknown_category_rejected() {
        let json = VALID.replace("\"Paragraph\"", "\"Sidebar\"");
        let dataset = load_str(&json, &LoadOptions::default()).unwrap();

        assert!(dataset.is_empty());
        assert_eq!(dataset.rejected.len(), 1);
        assert!(dataset.rejected[0].reason.contains("Sidebar"));
    }

    #[test]
    fn test_strict_mode_fails() {
        let json = VALID.replace("\"Paragraph\"", "\"Sidebar\"");
        let err = load_str(&json, &LoadOptions::new().strict()).unwrap_err();
        assert!(matches!(err, Error::Schema { ref document, .. } if document == "doc_a.jpg"));
    }

    #[test]
    fn test_wrong_point_count() {
        let json = r#"{"d": {"elements": [{
            "coordinates": [{"x": 0, "y": 0}, {"x": 1, "y": 1}],
            "category": "paragraph", "id": 3, "content": {"text": "x"}
        }]}}"#;
        let err = load_str(json, &LoadOptions::new().strict()).unwrap_err();
        assert!(err.to_string().contains("2 coordinate points"));
    }

    #[test]
    fn test_missing_elements_and_text() {
        let json = r#"{
            "no_elements": {"items": []},
            "no_text": {"elements": [{
                "coordinates": [{"x": 0, "y": 0}, {"x": 1, "y": 0}, {"x": 1, "y": 1}, {"x": 0, "y": 1}],
                "category": "paragraph", "id": 3, "content": {"html": ""}
            }]},
            "ok": {"elements": []}
        }"#;
        let dataset = load_str(json, &LoadOptions::default()).unwrap();

        assert_eq!(dataset.len(), 1);
        assert!(dataset.is_rejected("no_elements"));
        assert!(dataset.is_rejected("no_text"));
    }

    #[test]
    fn test_duplicate_ids() {
        let json = VALID.replace("\"id\": 1", "\"id\": 0");
        let dataset = load_str(&json, &LoadOptions::default()).unwrap();
        assert!(dataset.rejected[0].reason.contains("duplicate element id 0"));
    }

    #[test]
    fn test_root_must_be_object() {
        let err = load_str("[1, 2]", &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_vendor_normalizer() {
        let json = VALID.replace("\"Paragraph\"", "\"PageHeader\"");
        let registry = NormalizerRegistry::with_defaults();
        let options = LoadOptions::new().with_normalizer(registry.get("microsoft").unwrap());

        let dataset = load_str(&json, &options).unwrap();
        let doc = dataset.get("doc_a.jpg").unwrap();
        assert_eq!(doc.elements[0].category, Category::Header);
    }

    #[test]
    fn test_check_pair_empty() {
        let reference = load_str(VALID, &LoadOptions::default()).unwrap();
        let empty = Dataset::new();

        assert!(matches!(
            check_pair(&reference, &empty),
            Err(Error::EmptyDataset(_))
        ));
        assert!(check_pair(&reference, &reference).is_ok());
    }
}
