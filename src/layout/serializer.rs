//! Reading-order serialization of layout elements.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::{Category, Document, Element};

static MD_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").expect("valid regex"));
static MD_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid regex"));
static MD_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]+").expect("valid regex"));
static MD_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*>[ \t]?").expect("valid regex"));
static MD_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*+][ \t]+").expect("valid regex"));
static MD_ORDERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\d+[.)][ \t]+").expect("valid regex"));
static MD_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,3}|~~|`+").expect("valid regex"));
static MD_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\w])_{1,3}([^_\n]+?)_{1,3}([^\w]|$)").expect("valid regex")
});

/// How elements are ordered before serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingOrder {
    /// Page, then vertical center, then horizontal center, then id
    #[default]
    Geometric,
    /// Keep the order in which elements were annotated
    AsGiven,
}

impl std::str::FromStr for ReadingOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "geometric" => Ok(ReadingOrder::Geometric),
            "as-given" | "as_given" | "given" => Ok(ReadingOrder::AsGiven),
            other => Err(format!("unknown reading order '{}'", other)),
        }
    }
}

/// Serializes a document's text-bearing elements into one reading-order string.
#[derive(Debug, Clone)]
pub struct ReadingOrderSerializer {
    order: ReadingOrder,
    separator: char,
    ignore: HashSet<Category>,
    strings_to_remove: Vec<String>,
    normalize_unicode: bool,
}

impl ReadingOrderSerializer {
    /// Create a serializer with the default policy: geometric order, a single
    /// space between fragments, tables / figures / charts ignored, newlines
    /// removed, NFC normalization on.
    pub fn new() -> Self {
        Self {
            order: ReadingOrder::Geometric,
            separator: ' ',
            ignore: [Category::Table, Category::Figure, Category::Chart]
                .into_iter()
                .collect(),
            strings_to_remove: vec!["\n".to_string()],
            normalize_unicode: true,
        }
    }

    /// Set the ordering policy.
    pub fn with_order(mut self, order: ReadingOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the separator placed between fragments.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Replace the set of ignored categories.
    pub fn with_ignored(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.ignore = categories.into_iter().collect();
        self
    }

    /// Replace the list of substrings removed from the serialized text.
    pub fn with_strings_to_remove<S: Into<String>>(
        mut self,
        strings: impl IntoIterator<Item = S>,
    ) -> Self {
        self.strings_to_remove = strings.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable Unicode NFC normalization.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Whether elements of a category contribute to the serialization.
    pub fn includes(&self, category: Category) -> bool {
        category.carries_reading_text() && !self.ignore.contains(&category)
    }

    /// Serialize every included element of the document.
    pub fn serialize(&self, doc: &Document) -> String {
        self.serialize_filtered(doc, |_| true)
    }

    /// Serialize only the elements of one category.
    ///
    /// Returns an empty string when the category is not included.
    pub fn serialize_category(&self, doc: &Document, category: Category) -> String {
        self.serialize_filtered(doc, |e| e.category == category)
    }

    fn serialize_filtered(&self, doc: &Document, keep: impl Fn(&Element) -> bool) -> String {
        let mut elements: Vec<&Element> = doc
            .elements
            .iter()
            .filter(|e| self.includes(e.category) && keep(e))
            .collect();

        if self.order == ReadingOrder::Geometric {
            elements.sort_by(|a, b| reading_order_cmp(a, b));
        }

        let mut output = String::new();
        for element in elements {
            let fragment = text_fragment(element);
            if fragment.is_empty() {
                continue;
            }
            if !output.is_empty() {
                output.push(self.separator);
            }
            output.push_str(&fragment);
        }

        for s in &self.strings_to_remove {
            if !s.is_empty() {
                output = output.replace(s.as_str(), "");
            }
        }

        if self.normalize_unicode {
            output.nfc().collect()
        } else {
            output
        }
    }
}

impl Default for ReadingOrderSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two elements in reading order.
///
/// Page first, then the vertical and horizontal centers of the bounding
/// polygon, with the element id as the final tie-breaker so the order is
/// total and deterministic.
pub fn reading_order_cmp(a: &Element, b: &Element) -> Ordering {
    let ca = a.bbox().center();
    let cb = b.bbox().center();
    a.page
        .cmp(&b.page)
        .then_with(|| ca.y.total_cmp(&cb.y))
        .then_with(|| ca.x.total_cmp(&cb.x))
        .then_with(|| a.id.cmp(&b.id))
}

/// Text an element contributes: plain text if present, else its Markdown
/// with formatting markers stripped.
pub fn text_fragment(element: &Element) -> String {
    if !element.content.text.is_empty() {
        element.content.text.clone()
    } else {
        strip_markdown(&element.content.markdown)
    }
}

/// Remove Markdown formatting markers, keeping the readable text.
pub fn strip_markdown(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let text = MD_IMAGE.replace_all(markdown, "$1");
    let text = MD_LINK.replace_all(&text, "$1");
    let text = MD_HEADING.replace_all(&text, "");
    let text = MD_QUOTE.replace_all(&text, "");
    let text = MD_BULLET.replace_all(&text, "");
    let text = MD_ORDERED.replace_all(&text, "");
    let mut text = MD_EMPHASIS.replace_all(&text, "").into_owned();

    // Neighbouring runs share their separator, so one pass only strips every other run.
    loop {
        let stripped = MD_UNDERSCORE.replace_all(&text, "${1}${2}${3}").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }

    text.trim().to_string()
}
