//! Integration tests for loading datasets from disk.

use std::io::Write;

use dpeval::loader::{load_file, LoadOptions};
use dpeval::{Category, Error};
use tempfile::NamedTempFile;

const DATASET: &str = r##"{
    "scan_01.jpg": {
        "elements": [
            {
                "coordinates": [{"x": 10, "y": 40}, {"x": 200, "y": 40}, {"x": 200, "y": 60}, {"x": 10, "y": 60}],
                "category": "paragraph",
                "id": 1,
                "page": 1,
                "content": {"text": "Second line", "html": "", "markdown": ""}
            },
            {
                "coordinates": [{"x": 10, "y": 10}, {"x": 200, "y": 10}, {"x": 200, "y": 30}, {"x": 10, "y": 30}],
                "category": "heading1",
                "id": 0,
                "content": {"text": "Heading", "html": "", "markdown": "# Heading"}
            }
        ]
    }
}"##;

fn temp_with_suffix(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_file() {
    let file = temp_with_suffix(".json", DATASET);
    let dataset = load_file(file.path(), &LoadOptions::default()).unwrap();

    assert_eq!(dataset.len(), 1);
    let doc = dataset.get("scan_01.jpg").unwrap();
    assert_eq!(doc.len(), 2);

    let heading = doc.get(0).unwrap();
    assert_eq!(heading.category, Category::Heading1);
    assert_eq!(heading.page, 1);
    assert_eq!(heading.content.markdown, "# Heading");
}

#[test]
fn test_missing_file() {
    let result = load_file("/nonexistent/reference.json", &LoadOptions::default());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_wrong_extension() {
    let file = temp_with_suffix(".txt", DATASET);
    let result = load_file(file.path(), &LoadOptions::default());
    assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
}

#[test]
fn test_invalid_json() {
    let file = temp_with_suffix(".json", "{ not json");
    let result = load_file(file.path(), &LoadOptions::default());
    assert!(matches!(result, Err(Error::Json(_))));
}

#[test]
fn test_rejected_document_keeps_others() {
    let contents = r#"{
        "ok.pdf": {"elements": []},
        "broken.pdf": {"elements": [{"category": "paragraph", "id": 0}]}
    }"#;
    let file = temp_with_suffix(".json", contents);

    let dataset = load_file(file.path(), &LoadOptions::new().lenient()).unwrap();
    assert!(dataset.contains("ok.pdf"));
    assert!(dataset.is_rejected("broken.pdf"));

    let strict = load_file(file.path(), &LoadOptions::new().strict());
    assert!(matches!(strict, Err(Error::Schema { ref document, .. }) if document == "broken.pdf"));
}
