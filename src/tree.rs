use std::{collections::VecDeque, fmt, ops::Range};

use serde::Serialize;

use crate::{ParseError, Player, ShapeMismatch, label::label};

/// Index of a node in a [`Tree`]. Since nodes are stored in breadth-first order, the index
/// also determines the alphabetic label of the node, which is what [`fmt::Display`] prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn label(self) -> String {
        label(self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A game tree with values at its leaves. Nodes can have arbitrary numbers of children.
///
/// All nodes are stored in one vector in breadth-first order. As a consequence the children of
/// every node are adjacent in that vector, so a node only needs to remember the range its
/// children occupy. It also means every child comes after its parent, so a pass over the nodes in
/// reverse order visits all children before their parent.
///
/// # Panics
///
/// Methods taking a [`NodeId`] panic if the id does not belong to this tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Decode a tree from its breadth-first shape.
    ///
    /// # Parameters
    ///
    /// * `level_sizes`: `level_sizes[i]` is the number of children of the `i`-th node in
    ///   breadth-first order. `0` marks a leaf explicitly. Nodes past the end of `level_sizes` are
    ///   leaves as well.
    /// * `leaf_values`: Values of all the leaves, in breadth-first order. Must not be NaN.
    pub fn build(level_sizes: &[usize], leaf_values: &[f64]) -> Result<Self, ShapeMismatch> {
        let mut nodes = vec![Node::new(0)];
        for (index, &size) in level_sizes.iter().enumerate() {
            let Some(node) = nodes.get(index) else {
                return Err(ShapeMismatch::FrontierExhausted { index });
            };
            let depth = node.depth + 1;
            let children_begin = nodes.len();
            nodes.extend((0..size).map(|_| Node::new(depth)));
            if size != 0 {
                nodes[index].children_begin = children_begin;
                nodes[index].children_end = nodes.len();
            }
        }

        let leaves = nodes.iter().filter(|node| node.is_leaf()).count();
        if leaves != leaf_values.len() {
            return Err(ShapeMismatch::LeafCount {
                leaves,
                values: leaf_values.len(),
            });
        }
        for ((index, node), &value) in nodes
            .iter_mut()
            .enumerate()
            .filter(|(_, node)| node.is_leaf())
            .zip(leaf_values)
        {
            if value.is_nan() {
                return Err(ShapeMismatch::NotANumber {
                    node: NodeId(index),
                });
            }
            node.value = Some(value);
        }
        Ok(Self { nodes })
    }

    /// Read a tree from nested parentheses. A number is a leaf, a group is an inner node, e.g.
    /// `((5 6) (7 4 5) 3)`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut parser = Parser { text, offset: 0 };
        let parsed = parser.expression()?;
        parser.skip_whitespace();
        if let Some(found) = parser.peek() {
            return Err(ParseError::Unexpected {
                offset: parser.offset,
                found,
            });
        }

        let mut level_sizes = Vec::new();
        let mut leaf_values = Vec::new();
        let mut queue = VecDeque::from([0]);
        while let Some(index) = queue.pop_front() {
            match &parsed[index] {
                Nested::Leaf(value) => {
                    level_sizes.push(0);
                    leaf_values.push(*value);
                }
                Nested::Group(children) => {
                    level_sizes.push(children.len());
                    queue.extend(children);
                }
            }
        }
        Ok(Self::build(&level_sizes, &leaf_values)?)
    }

    /// Assign an intrinsic value to a node. For an inner node this short-circuits the exploration
    /// of its children.
    pub fn override_value(&mut self, node: NodeId, value: f64) -> Result<(), ShapeMismatch> {
        if value.is_nan() {
            return Err(ShapeMismatch::NotANumber { node });
        }
        self.nodes[node.0].value = Some(value);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn remove_value(&mut self, node: NodeId) {
        self.nodes[node.0].value = None;
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in breadth-first order.
    pub fn node_ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator + use<> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn value(&self, node: NodeId) -> Option<f64> {
        self.nodes[node.0].value
    }

    pub fn depth(&self, node: NodeId) -> usize {
        self.nodes[node.0].depth
    }

    pub fn children(&self, node: NodeId) -> impl ExactSizeIterator<Item = NodeId> + use<> {
        self.nodes[node.0].children().map(NodeId)
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node.0].is_leaf()
    }

    /// Player to move at `node` if `root_player` moves at the root.
    pub fn player(&self, node: NodeId, root_player: Player) -> Player {
        root_player.at_depth(self.depth(node))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    /// Index into `Tree::nodes` where the children of this node start. `0` if the node does not
    /// have children.
    children_begin: usize,
    /// Index one past the last child of this node. `0` if the node does not have children.
    children_end: usize,
    depth: usize,
    /// Known at leaves. At inner nodes an override.
    value: Option<f64>,
}

impl Node {
    fn new(depth: usize) -> Self {
        Self {
            children_begin: 0,
            children_end: 0,
            depth,
            value: None,
        }
    }

    fn children(&self) -> Range<usize> {
        self.children_begin..self.children_end
    }

    fn is_leaf(&self) -> bool {
        self.children_begin == self.children_end
    }
}

/// Intermediate form of the nested notation, before it is flattened into breadth-first order.
/// Nodes are numbered in the order they appear in the text, so the root is `0`.
enum Nested {
    Leaf(f64),
    Group(Vec<usize>),
}

struct Parser<'a> {
    text: &'a str,
    offset: usize,
}

impl Parser<'_> {
    /// Read one complete expression. Groups still open are kept on an explicit stack, so the depth
    /// of the nesting is only limited by memory.
    fn expression(&mut self) -> Result<Vec<Nested>, ParseError> {
        let mut parsed = Vec::new();
        // Index in `parsed` and offset of each open group.
        let mut open: Vec<(usize, usize)> = Vec::new();
        loop {
            self.skip_whitespace();
            let index = parsed.len();
            let start = self.offset;
            let nested = match self.peek() {
                None => return Err(ParseError::UnexpectedEnd),
                Some(')') => {
                    let Some((group, opened)) = open.pop() else {
                        return Err(ParseError::Unexpected {
                            offset: start,
                            found: ')',
                        });
                    };
                    if matches!(&parsed[group], Nested::Group(children) if children.is_empty()) {
                        return Err(ParseError::EmptyGroup { offset: opened });
                    }
                    self.offset += 1;
                    if open.is_empty() {
                        return Ok(parsed);
                    }
                    continue;
                }
                Some('(') => {
                    self.offset += 1;
                    Nested::Group(Vec::new())
                }
                Some(_) => Nested::Leaf(self.number()?),
            };
            if let Some(&(parent, _)) = open.last() {
                if let Nested::Group(children) = &mut parsed[parent] {
                    children.push(index);
                }
            }
            let is_group = matches!(nested, Nested::Group(_));
            parsed.push(nested);
            if is_group {
                open.push((index, start));
            } else if open.is_empty() {
                return Ok(parsed);
            }
        }
    }

    fn number(&mut self) -> Result<f64, ParseError> {
        let start = self.offset;
        let rest = &self.text[start..];
        let len = rest
            .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .unwrap_or(rest.len());
        let text = &rest[..len];
        self.offset += len;
        text.parse::<f64>()
            .ok()
            .filter(|value| !value.is_nan())
            .ok_or_else(|| ParseError::Number {
                offset: start,
                text: text.to_owned(),
            })
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.text[self.offset..];
        self.offset += rest.len() - rest.trim_start().len();
    }

    fn peek(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }
}
