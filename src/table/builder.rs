//! HTML table markup to table tree.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::model::{TableNode, TableTree};

/// Largest accepted `colspan` / `rowspan`.
pub const MAX_SPAN: u32 = 1000;

/// Table markup could not be turned into a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct MalformedTable {
    /// What was wrong with the markup
    pub reason: String,
}

impl MalformedTable {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Parse table HTML into a [`TableTree`] with cell content tokens.
///
/// Markup without a `<table>` wrapper is wrapped in one. `<thead>`,
/// `<tbody>` and `<tfoot>` are transparent and `<th>` is treated as `<td>`.
/// When the markup holds several tables (a redundant wrapper splits into
/// two under HTML parsing rules), the first one that has rows is used.
pub fn build_tree(html: &str) -> Result<TableTree, MalformedTable> {
    let html = html.trim();
    if html.is_empty() {
        return Err(MalformedTable::new("empty table markup"));
    }

    let markup = if html.to_ascii_lowercase().contains("<table") {
        html.to_string()
    } else {
        format!("<table>{}</table>", html)
    };

    let fragment = Html::parse_fragment(&markup);
    let table_selector =
        Selector::parse("table").map_err(|e| MalformedTable::new(format!("selector: {:?}", e)))?;

    let table = fragment
        .select(&table_selector)
        .find(|t| !direct_rows(t).is_empty())
        .ok_or_else(|| MalformedTable::new("table has no rows"))?;

    let mut rows = Vec::new();
    let mut carry: Vec<u32> = Vec::new();
    let mut declared: Option<usize> = None;

    for (row_index, row) in direct_rows(&table).into_iter().enumerate() {
        let mut cells = Vec::new();
        let mut col = 0usize;

        for cell in direct_cells(&row) {
            let colspan = span_attr(&cell, "colspan", row_index)?;
            let rowspan = span_attr(&cell, "rowspan", row_index)?;

            while col < carry.len() && carry[col] > 0 {
                col += 1;
            }
            let end = col.checked_add(colspan as usize).ok_or_else(|| {
                MalformedTable::new(format!("row {} overflows the column index", row_index))
            })?;
            if carry.len() < end {
                carry.resize(end, 0);
            }
            for slot in &mut carry[col..end] {
                *slot = rowspan;
            }
            col = end;

            cells.push(TableNode::cell(colspan, rowspan, cell_tokens(&cell)));
        }

        let width = carry.iter().rposition(|&c| c > 0).map_or(0, |i| i + 1);
        match declared {
            None => declared = Some(width),
            Some(columns) if width > columns => {
                return Err(MalformedTable::new(format!(
                    "row {} spans {} columns but the table declares {}",
                    row_index, width, columns
                )));
            }
            Some(_) => {}
        }

        for slot in carry.iter_mut() {
            *slot = slot.saturating_sub(1);
        }
        rows.push(TableNode::row(cells));
    }

    Ok(TableTree::new(TableNode::table(rows), declared.unwrap_or(0)))
}

/// Rows directly under the table, lifting rows out of section elements.
fn direct_rows<'a>(table: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|e| e.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

fn direct_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
        .collect()
}

fn span_attr(cell: &ElementRef<'_>, name: &str, row_index: usize) -> Result<u32, MalformedTable> {
    let Some(raw) = cell.value().attr(name) else {
        return Ok(1);
    };
    match raw.trim().parse::<u32>() {
        Ok(span) if span > MAX_SPAN => Err(MalformedTable::new(format!(
            "{} {} in row {} exceeds {}",
            name, span, row_index, MAX_SPAN
        ))),
        Ok(span) if span > 0 => Ok(span),
        _ => Err(MalformedTable::new(format!(
            "invalid {} '{}' in row {}",
            name, raw, row_index
        ))),
    }
}

/// Content tokens of a cell: `<tag>` / `</tag>` for nested elements and one
/// token per character of text. Whitespace is kept as written.
fn cell_tokens(cell: &ElementRef<'_>) -> Vec<String> {
    let mut tokens = Vec::new();
    push_tokens(cell, &mut tokens);
    tokens
}

fn push_tokens(element: &ElementRef<'_>, tokens: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            tokens.extend(text.chars().map(String::from));
        } else if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            tokens.push(format!("<{}>", name));
            push_tokens(&child_element, tokens);
            tokens.push(format!("</{}>", name));
        }
    }
}
