//! Layout element types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical layout category.
///
/// Every vendor output is normalized into one of these twelve classes before
/// it reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Table (scored by TEDS / TEDS-S)
    Table,
    /// Body paragraph
    Paragraph,
    /// Figure or image
    Figure,
    /// Chart or plot
    Chart,
    /// Running page header
    Header,
    /// Running page footer
    Footer,
    /// Figure or table caption
    Caption,
    /// Display equation (HTML / LaTeX content)
    Equation,
    /// Heading of any level
    Heading1,
    /// List or list item
    List,
    /// Index or table of contents
    Index,
    /// Footnote
    Footnote,
}

impl Category {
    /// All canonical categories.
    pub const ALL: [Category; 12] = [
        Category::Table,
        Category::Paragraph,
        Category::Figure,
        Category::Chart,
        Category::Header,
        Category::Footer,
        Category::Caption,
        Category::Equation,
        Category::Heading1,
        Category::List,
        Category::Index,
        Category::Footnote,
    ];

    /// Canonical lowercase name as it appears in the JSON schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Table => "table",
            Category::Paragraph => "paragraph",
            Category::Figure => "figure",
            Category::Chart => "chart",
            Category::Header => "header",
            Category::Footer => "footer",
            Category::Caption => "caption",
            Category::Equation => "equation",
            Category::Heading1 => "heading1",
            Category::List => "list",
            Category::Index => "index",
            Category::Footnote => "footnote",
        }
    }

    /// Whether elements of this category ever carry reading-order text.
    ///
    /// Tables go through the tree-edit path, figures and charts have no
    /// ground-truth text, and equations carry HTML / LaTeX only.
    pub fn carries_reading_text(&self) -> bool {
        !matches!(
            self,
            Category::Table | Category::Figure | Category::Chart | Category::Equation
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// A point in page pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate (grows downwards)
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub min_x: f64,
    /// Top edge
    pub min_y: f64,
    /// Right edge
    pub max_x: f64,
    /// Bottom edge
    pub max_y: f64,
}

impl BoundingBox {
    /// Smallest box enclosing all points. Returns `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.iter().skip(1).fold(init, |b, p| Self {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Box width.
    pub fn width(&self) -> f64 {
        (self.max_x - self.min_x).max(0.0)
    }

    /// Box height.
    pub fn height(&self) -> f64 {
        (self.max_y - self.min_y).max(0.0)
    }

    /// Box area.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Intersection-over-union with another box, in [0, 1].
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let ix = (self.max_x.min(other.max_x) - self.min_x.max(other.min_x)).max(0.0);
        let iy = (self.max_y.min(other.max_y) - self.min_y.max(other.min_y)).max(0.0);
        let intersection = ix * iy;
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            (intersection / union).clamp(0.0, 1.0)
        }
    }
}

/// Element content payload.
///
/// Exactly one field is meaningful per category: `html` for tables and
/// equations, `markdown` or `text` for text-bearing categories. Unused fields
/// are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Plain text
    pub text: String,
    /// HTML markup
    #[serde(default)]
    pub html: String,
    /// Markdown
    #[serde(default)]
    pub markdown: String,
}

impl Content {
    /// Content with plain text only.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Content with HTML only.
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Default::default()
        }
    }

    /// Content with Markdown only.
    pub fn markdown(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            ..Default::default()
        }
    }
}

/// A validated layout element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Id, unique within the document
    pub id: i64,

    /// Canonical category
    pub category: Category,

    /// Four corner points of the region
    pub coordinates: Vec<Point>,

    /// 1-based page number
    pub page: u32,

    /// Content payload
    pub content: Content,
}

impl Element {
    /// Create a new element.
    pub fn new(
        id: i64,
        category: Category,
        coordinates: Vec<Point>,
        page: u32,
        content: Content,
    ) -> Self {
        Self {
            id,
            category,
            coordinates,
            page,
            content,
        }
    }

    /// Create an element from an axis-aligned rectangle.
    pub fn with_rect(
        id: i64,
        category: Category,
        page: u32,
        (x0, y0, x1, y1): (f64, f64, f64, f64),
        content: Content,
    ) -> Self {
        let coordinates = vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ];
        Self::new(id, category, coordinates, page, content)
    }

    /// Bounding box of the element polygon.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::enclosing(&self.coordinates).unwrap_or(BoundingBox {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        })
    }

    /// Whether this is a table element.
    pub fn is_table(&self) -> bool {
        self.category == Category::Table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!("Paragraph".parse::<Category>(), Ok(Category::Paragraph));
        assert_eq!("heading1".parse::<Category>(), Ok(Category::Heading1));
        assert_eq!(" TABLE ".parse::<Category>(), Ok(Category::Table));
        assert!("sidebar".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Footnote).unwrap();
        assert_eq!(json, "\"footnote\"");
    }

    #[test]
    fn test_reading_text_categories() {
        assert!(Category::Paragraph.carries_reading_text());
        assert!(!Category::Table.carries_reading_text());
        assert!(!Category::Equation.carries_reading_text());
    }

    #[test]
    fn test_iou() {
        let a = BoundingBox::enclosing(&[Point::new(0.0, 0.0), Point::new(10.0, 10.0)]).unwrap();
        let b = BoundingBox::enclosing(&[Point::new(5.0, 0.0), Point::new(15.0, 10.0)]).unwrap();
        assert!((a.iou(&b) - 50.0 / 150.0).abs() < 1e-9);
        assert_eq!(a.iou(&a), 1.0);

        let far = BoundingBox::enclosing(&[Point::new(20.0, 20.0), Point::new(30.0, 30.0)]).unwrap();
        assert_eq!(a.iou(&far), 0.0);
    }

    #[test]
    fn test_degenerate_iou() {
        let p = BoundingBox::enclosing(&[Point::new(1.0, 1.0)]).unwrap();
        assert_eq!(p.iou(&p), 0.0);
    }

    #[test]
    fn test_element_center() {
        let e = Element::with_rect(1, Category::Paragraph, 1, (0.0, 10.0, 100.0, 30.0), Content::text("x"));
        let c = e.bbox().center();
        assert_eq!(c, Point::new(50.0, 20.0));
    }
}
