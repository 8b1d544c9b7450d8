use serde::Serialize;

use crate::{NodeId, Tree};

/// Where to draw a node, in grid cells. Leaves are one column wide, rows are depths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub left: usize,
    pub top: usize,
    /// Columns spanned by the subtree.
    pub width: usize,
    /// Rows spanned by the subtree.
    pub height: usize,
    /// Column the node itself is drawn at.
    pub anchor: usize,
}

/// Positions of all nodes, indexed by [`NodeId`].
pub fn layout(tree: &Tree) -> Vec<Position> {
    let mut positions = vec![Position::default(); tree.num_nodes()];
    // Columns spanned by the children of each node. `0` for leaves.
    let mut spans = vec![0; tree.num_nodes()];

    // Sizes bottom up. Children come after their parent in breadth-first order.
    for node in tree.node_ids().rev() {
        let mut height = 1;
        for child in tree.children(node) {
            spans[node.0] += positions[child.0].width;
            height = height.max(positions[child.0].height + 1);
        }
        let position = &mut positions[node.0];
        position.top = tree.depth(node);
        position.width = spans[node.0].max(1);
        position.height = height;
    }

    // Columns top down. Each child starts where its left sibling ends.
    for node in tree.node_ids() {
        let left = positions[node.0].left;
        positions[node.0].anchor = left + spans[node.0] / 2;
        let mut column = left;
        for child in tree.children(node) {
            positions[child.0].left = column;
            column += positions[child.0].width;
        }
    }
    positions
}

const CELL: usize = 4;

/// Plain text picture of the tree: labels on the grid, values listed below it.
pub fn draw(tree: &Tree) -> String {
    let positions = layout(tree);
    let root = positions[NodeId::ROOT.0];
    let mut rows = vec![vec![' '; root.width * CELL]; root.height];
    for node in tree.node_ids() {
        let position = positions[node.0];
        for (offset, c) in node.label().chars().enumerate() {
            if let Some(cell) = rows[position.top].get_mut(position.anchor * CELL + offset) {
                *cell = c;
            }
        }
    }

    let mut text = String::new();
    for row in rows {
        text.push_str(row.iter().collect::<String>().trim_end());
        text.push('\n');
    }
    let leaves = tree
        .node_ids()
        .filter_map(|node| tree.value(node).map(|value| format!("{node}={value}")))
        .collect::<Vec<_>>();
    text.push_str(&leaves.join(" "));
    text.push('\n');
    text
}
