//! Category tree
//!
//! Categories arrive as `/`-separated paths on products (`Fashion/Shoes`) or
//! as nested JSON from the backend. Both become `CategoryNode` trees whose
//! depth is bounded by `MAX_CATEGORY_DEPTH`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const MAX_CATEGORY_DEPTH: usize = 8;
pub const PATH_SEPARATOR: char = '/';

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub name: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

/// A node as it appears on screen after flattening.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub count: u32,
    pub has_children: bool,
    pub expanded: bool,
}

impl CategoryNode {
    pub fn leaf(name: impl Into<String>, count: u32) -> Self { Self { name: name.into(), count, children: vec![] } }

    /// Builds a forest from category paths. Each path adds one to the count
    /// of every node along it. Segments past `max_depth` count toward the
    /// deepest node kept.
    pub fn from_paths<'a, I: IntoIterator<Item = &'a str>>(paths: I, max_depth: usize) -> Vec<CategoryNode> {
        let max_depth = max_depth.max(1);
        let mut roots: Vec<CategoryNode> = Vec::new();
        for path in paths {
            let segments: Vec<&str> = path.split(PATH_SEPARATOR).map(str::trim).filter(|s| !s.is_empty()).take(max_depth).collect();
            let mut level = &mut roots;
            for segment in segments {
                let idx = match level.iter().position(|n| n.name == segment) {
                    Some(i) => i,
                    None => { level.push(CategoryNode::leaf(segment, 0)); level.len() - 1 }
                };
                let node = &mut level[idx];
                node.count += 1;
                level = &mut node.children;
            }
        }
        sort_forest(&mut roots);
        roots
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(CategoryNode::depth).max().unwrap_or(0)
    }

    /// Drops everything below `max_depth` levels, this node being level 1.
    pub fn prune(mut self, max_depth: usize) -> Self {
        if max_depth <= 1 {
            self.children.clear();
        } else {
            self.children = self.children.into_iter().map(|c| c.prune(max_depth - 1)).collect();
        }
        self
    }
}

fn sort_forest(nodes: &mut [CategoryNode]) {
    nodes.sort_by(|a, b| a.name.cmp(&b.name));
    for n in nodes.iter_mut() { sort_forest(&mut n.children); }
}

/// Paths of the nodes a shopper has expanded in the filter sidebar.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpandedPaths(BTreeSet<String>);

impl ExpandedPaths {
    pub fn is_expanded(&self, path: &str) -> bool { self.0.contains(path) }

    pub fn toggle(&self, path: &str) -> Self {
        let mut next = self.0.clone();
        if !next.remove(path) { next.insert(path.to_string()); }
        Self(next)
    }
}

/// Flattens the forest in display order, descending only into expanded nodes.
pub fn visible_rows(forest: &[CategoryNode], expanded: &ExpandedPaths) -> Vec<CategoryRow> {
    let mut rows = Vec::new();
    push_rows(forest, "", 0, expanded, &mut rows);
    rows
}

fn push_rows(nodes: &[CategoryNode], prefix: &str, depth: usize, expanded: &ExpandedPaths, rows: &mut Vec<CategoryRow>) {
    if depth >= MAX_CATEGORY_DEPTH { return; }
    for node in nodes {
        let path = if prefix.is_empty() { node.name.clone() } else { format!("{}{}{}", prefix, PATH_SEPARATOR, node.name) };
        let open = !node.children.is_empty() && expanded.is_expanded(&path);
        rows.push(CategoryRow {
            path: path.clone(), name: node.name.clone(), depth, count: node.count,
            has_children: !node.children.is_empty(), expanded: open,
        });
        if open { push_rows(&node.children, &path, depth + 1, expanded, rows); }
    }
}
