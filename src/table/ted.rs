//! Tree edit distance (Zhang–Shasha).
//!
//! Ordered trees are numbered in postorder. For every pair of keyroots the
//! forest distance table is filled and subtree distances are memoized in a
//! `|A| × |B|` table, giving the exact minimum-cost edit script under the
//! supplied [`TreeCost`].

use std::time::{Duration, Instant};

use crate::model::{NodeKind, TableNode};

/// Cost model for tree edit operations.
pub trait TreeCost {
    /// Cost of inserting `node`.
    fn insert(&self, _node: &TableNode) -> f64 {
        1.0
    }

    /// Cost of deleting `node`.
    fn delete(&self, _node: &TableNode) -> f64 {
        1.0
    }

    /// Cost of relabeling `a` into `b`.
    fn relabel(&self, a: &TableNode, b: &TableNode) -> f64;
}

/// Structure-only cost (TEDS-S): relabel is 0 when tag and spans match, else 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureCost;

impl TreeCost for StructureCost {
    fn relabel(&self, a: &TableNode, b: &TableNode) -> f64 {
        if a.same_shape(b) {
            0.0
        } else {
            1.0
        }
    }
}

/// Structure and content cost (TEDS).
///
/// Cells with matching shape cost the normalized Levenshtein distance
/// between their content token sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentCost;

impl TreeCost for ContentCost {
    fn relabel(&self, a: &TableNode, b: &TableNode) -> f64 {
        if !a.same_shape(b) {
            return 1.0;
        }
        if a.kind == NodeKind::Cell && (!a.content.is_empty() || !b.content.is_empty()) {
            return normalized_token_distance(&a.content, &b.content);
        }
        0.0
    }
}

/// Levenshtein distance between token sequences divided by the longer length.
pub fn normalized_token_distance(a: &[String], b: &[String]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }
    strsim::generic_levenshtein(&a.to_vec(), &b.to_vec()) as f64 / longest as f64
}

/// The computation ran past its wall-clock budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineExceeded {
    /// Time spent before giving up
    pub elapsed: Duration,
}

struct Postorder<'a> {
    nodes: Vec<&'a TableNode>,
    leftmost: Vec<usize>,
    keyroots: Vec<usize>,
}

impl<'a> Postorder<'a> {
    fn new(root: &'a TableNode) -> Self {
        let mut nodes = Vec::new();
        let mut leftmost = Vec::new();
        Self::walk(root, &mut nodes, &mut leftmost);

        // A keyroot is the highest-numbered node for each distinct leftmost leaf.
        let mut last_with_leaf = vec![None; nodes.len()];
        for (i, &l) in leftmost.iter().enumerate() {
            last_with_leaf[l] = Some(i);
        }
        let mut keyroots: Vec<usize> = last_with_leaf.into_iter().flatten().collect();
        keyroots.sort_unstable();

        Self {
            nodes,
            leftmost,
            keyroots,
        }
    }

    fn walk(node: &'a TableNode, nodes: &mut Vec<&'a TableNode>, leftmost: &mut Vec<usize>) -> usize {
        let mut first_leaf = None;
        for child in &node.children {
            let child_leaf = Self::walk(child, nodes, leftmost);
            first_leaf.get_or_insert(child_leaf);
        }
        let index = nodes.len();
        nodes.push(node);
        let leaf = first_leaf.unwrap_or(index);
        leftmost.push(leaf);
        leaf
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Minimum-cost edit distance between two trees.
pub fn tree_edit_distance<C: TreeCost>(a: &TableNode, b: &TableNode, cost: &C) -> f64 {
    // Without a deadline the computation always completes.
    tree_edit_distance_within(a, b, cost, None).unwrap_or(f64::INFINITY)
}

/// Tree edit distance that gives up once `deadline` has passed.
pub fn tree_edit_distance_within<C: TreeCost>(
    a: &TableNode,
    b: &TableNode,
    cost: &C,
    deadline: Option<Instant>,
) -> Result<f64, DeadlineExceeded> {
    let started = Instant::now();
    let ta = Postorder::new(a);
    let tb = Postorder::new(b);
    let mut tree_dist = vec![vec![0.0f64; tb.len()]; ta.len()];

    for &i in &ta.keyroots {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Err(DeadlineExceeded {
                    elapsed: started.elapsed(),
                });
            }
        }
        for &j in &tb.keyroots {
            forest_distance(&ta, &tb, i, j, cost, &mut tree_dist);
        }
    }

    Ok(tree_dist[ta.len() - 1][tb.len() - 1])
}

fn forest_distance<C: TreeCost>(
    ta: &Postorder<'_>,
    tb: &Postorder<'_>,
    i: usize,
    j: usize,
    cost: &C,
    tree_dist: &mut [Vec<f64>],
) {
    let li = ta.leftmost[i];
    let lj = tb.leftmost[j];
    let m = i - li + 2;
    let n = j - lj + 2;

    let mut fd = vec![vec![0.0f64; n]; m];
    for x in 1..m {
        fd[x][0] = fd[x - 1][0] + cost.delete(ta.nodes[x + li - 1]);
    }
    for y in 1..n {
        fd[0][y] = fd[0][y - 1] + cost.insert(tb.nodes[y + lj - 1]);
    }

    for x in 1..m {
        let i1 = x + li - 1;
        let del = cost.delete(ta.nodes[i1]);
        for y in 1..n {
            let j1 = y + lj - 1;
            let ins = cost.insert(tb.nodes[j1]);

            if ta.leftmost[i1] == li && tb.leftmost[j1] == lj {
                let value = (fd[x - 1][y] + del)
                    .min(fd[x][y - 1] + ins)
                    .min(fd[x - 1][y - 1] + cost.relabel(ta.nodes[i1], tb.nodes[j1]));
                fd[x][y] = value;
                tree_dist[i1][j1] = value;
            } else {
                let p = ta.leftmost[i1] - li;
                let q = tb.leftmost[j1] - lj;
                fd[x][y] = (fd[x - 1][y] + del)
                    .min(fd[x][y - 1] + ins)
                    .min(fd[p][q] + tree_dist[i1][j1]);
            }
        }
    }
}
