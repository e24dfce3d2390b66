//! Document model types for evaluation input.
//!
//! This module defines the canonical representation shared by the reference
//! annotations and every parser's predictions: documents made of categorized
//! layout elements, plus the table trees built from table markup.

mod document;
mod element;
mod table;

pub use document::{Dataset, Document, RejectedDocument};
pub use element::{BoundingBox, Category, Content, Element, Point};
pub use table::{NodeKind, TableNode, TableTree};
