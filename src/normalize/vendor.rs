//! Built-in vendor category maps.

use super::CategoryNormalizer;
use crate::model::Category;
use std::collections::HashMap;

/// Accepts canonical names only (case-insensitive).
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl CategoryNormalizer for IdentityNormalizer {
    fn name(&self) -> &str {
        "identity"
    }

    fn normalize(&self, raw: &str) -> Option<Category> {
        raw.parse().ok()
    }
}

/// Table-driven normalizer for one vendor.
///
/// Lookup order: exact vendor name, then canonical name, then the fallback
/// category (if any).
#[derive(Debug, Clone)]
pub struct MappedNormalizer {
    name: String,
    map: HashMap<String, Category>,
    fallback: Option<Category>,
}

impl MappedNormalizer {
    /// Create a normalizer from `(vendor name, category)` pairs.
    pub fn new<'a>(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (&'a str, Category)>,
        fallback: Option<Category>,
    ) -> Self {
        Self {
            name: name.into().to_lowercase(),
            map: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            fallback,
        }
    }

    /// Maps shipped for the products the benchmark was run against.
    ///
    /// Unknown vendor classes fall back to `paragraph`.
    pub fn builtin() -> Vec<MappedNormalizer> {
        use Category::*;

        vec![
            Self::new(
                "upstage",
                std::iter::empty::<(&str, Category)>(),
                Some(Paragraph),
            ),
            Self::new(
                "microsoft",
                [
                    ("Title", Heading1),
                    ("SectionHeading", Heading1),
                    ("footnote", Footnote),
                    ("PageHeader", Header),
                    ("PageFooter", Footer),
                    ("Paragraph", Paragraph),
                    ("Subheading", Heading1),
                    ("SectionMarks", Paragraph),
                    ("PageNumber", Paragraph),
                ],
                Some(Paragraph),
            ),
            Self::new(
                "aws",
                [
                    ("LAYOUT_TEXT", Paragraph),
                    ("LAYOUT_LIST", List),
                    ("LAYOUT_HEADER", Header),
                    ("LAYOUT_FOOTER", Footer),
                    ("LAYOUT_PAGE_NUMBER", Paragraph),
                    ("LAYOUT_FIGURE", Figure),
                    ("LAYOUT_TABLE", Table),
                    ("LAYOUT_TITLE", Heading1),
                    ("LAYOUT_SECTION_HEADER", Heading1),
                    ("TABLE", Table),
                ],
                Some(Paragraph),
            ),
            Self::new(
                "google",
                [
                    ("paragraph", Paragraph),
                    ("footer", Footer),
                    ("header", Header),
                    ("heading-1", Heading1),
                    ("heading-2", Heading1),
                    ("heading-3", Heading1),
                    ("table", Table),
                    ("title", Heading1),
                ],
                Some(Paragraph),
            ),
            Self::new(
                "llamaparse",
                [("text", Paragraph), ("heading", Heading1), ("table", Table)],
                Some(Paragraph),
            ),
            Self::new(
                "unstructured",
                [
                    ("NarrativeText", Paragraph),
                    ("ListItem", Paragraph),
                    ("Title", Heading1),
                    ("Address", Paragraph),
                    ("Header", Header),
                    ("Footer", Footer),
                    ("UncategorizedText", Paragraph),
                    ("Formula", Equation),
                    ("FigureCaption", Caption),
                    ("Table", Table),
                    ("PageBreak", Paragraph),
                    ("Image", Figure),
                    ("PageNumber", Paragraph),
                    ("CodeSnippet", Paragraph),
                ],
                Some(Paragraph),
            ),
        ]
    }
}

impl CategoryNormalizer for MappedNormalizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn normalize(&self, raw: &str) -> Option<Category> {
        self.map
            .get(raw)
            .copied()
            .or_else(|| raw.parse().ok())
            .or(self.fallback)
    }
}
