//! Table tree types.

use serde::{Deserialize, Serialize};

/// Kind of a table tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Table root
    Table,
    /// Table row
    Row,
    /// Table cell (`td` or `th`)
    Cell,
}

impl NodeKind {
    /// Tag name used when printing the tree.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Table => "table",
            NodeKind::Row => "tr",
            NodeKind::Cell => "td",
        }
    }
}

/// A node of a table tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNode {
    /// Node kind
    pub kind: NodeKind,

    /// Number of columns spanned (cells only, 1 otherwise)
    pub colspan: u32,

    /// Number of rows spanned (cells only, 1 otherwise)
    pub rowspan: u32,

    /// Cell content tokens (empty for non-cells and in structure-only trees)
    pub content: Vec<String>,

    /// Child nodes
    pub children: Vec<TableNode>,
}

impl TableNode {
    /// Create the table root.
    pub fn table(rows: Vec<TableNode>) -> Self {
        Self {
            kind: NodeKind::Table,
            colspan: 1,
            rowspan: 1,
            content: Vec::new(),
            children: rows,
        }
    }

    /// Create a row.
    pub fn row(cells: Vec<TableNode>) -> Self {
        Self {
            kind: NodeKind::Row,
            colspan: 1,
            rowspan: 1,
            content: Vec::new(),
            children: cells,
        }
    }

    /// Create a cell with content tokens.
    pub fn cell(colspan: u32, rowspan: u32, content: Vec<String>) -> Self {
        Self {
            kind: NodeKind::Cell,
            colspan,
            rowspan,
            content,
            children: Vec::new(),
        }
    }

    /// Create a cell whose content is the characters of `text`.
    pub fn text_cell(text: &str) -> Self {
        Self::cell(1, 1, text.chars().map(String::from).collect())
    }

    /// Whether two nodes agree on tag and spans.
    pub fn same_shape(&self, other: &TableNode) -> bool {
        self.kind == other.kind && self.colspan == other.colspan && self.rowspan == other.rowspan
    }

    /// Number of nodes in the subtree rooted here.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TableNode::node_count).sum::<usize>()
    }

    /// Bracket notation, useful for debugging and test assertions.
    pub fn bracket(&self) -> String {
        let mut out = String::from("{");
        out.push_str(self.kind.tag());
        if self.kind == NodeKind::Cell {
            out.push_str(&format!(
                " colspan={} rowspan={} text={:?}",
                self.colspan,
                self.rowspan,
                self.content.concat()
            ));
        }
        for child in &self.children {
            out.push_str(&child.bracket());
        }
        out.push('}');
        out
    }
}

/// A table parsed into a tree of rows and cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableTree {
    /// Root node
    pub root: TableNode,

    /// Declared column count (span-aware width of the first row)
    pub columns: usize,
}

impl TableTree {
    /// Create a tree from its root.
    pub fn new(root: TableNode, columns: usize) -> Self {
        Self { root, columns }
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.root.children.len()
    }

    /// Iterate over all cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &TableNode> {
        self.root.children.iter().flat_map(|r| r.children.iter())
    }
}
