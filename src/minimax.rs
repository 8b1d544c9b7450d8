use std::mem;

use crate::{
    MalformedTree, NodeId, Player, Tree,
    exploration::{Window, backed_up_value},
};

/// Minimax value of the root, evaluating every node. Used as a reference for the walk.
pub fn minimax(tree: &Tree, root_player: Player) -> Result<f64, MalformedTree> {
    // Children come after their parents, so in reverse order every child is done first. Errors
    // only count if some ancestor actually needs the value.
    let mut values = vec![Ok(0.0); tree.num_nodes()];
    for node in tree.node_ids().rev() {
        let value = match tree.value(node) {
            Some(value) => Ok(value),
            None => tree
                .children(node)
                .map(|child| values[child.0])
                .collect::<Result<Vec<_>, _>>()
                .and_then(|children| {
                    backed_up_value(node, tree.player(node, root_player), None, children)
                }),
        };
        values[node.0] = value;
    }
    values[NodeId::ROOT.0]
}

/// Result of [`alpha_beta`].
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    pub value: f64,
    /// Children cut off, because the window of their parent collapsed or their parent has an
    /// intrinsic value. Sorted by node. Descendants of these are not listed.
    pub pruned: Vec<NodeId>,
}

/// Alpha-beta search visiting children in order.
pub fn alpha_beta(tree: &Tree, root_player: Player) -> Result<Search, MalformedTree> {
    let mut pruned = Vec::new();
    let mut ancestors = Vec::new();
    let mut current = Call::new(tree, NodeId::ROOT, root_player, Window::FULL);
    loop {
        if let Some(child) = current.next_child() {
            let call = Call::new(tree, child, current.player.other(), current.window);
            ancestors.push(mem::replace(&mut current, call));
            continue;
        }
        pruned.extend(current.children.by_ref());
        let value = backed_up_value(
            current.node,
            current.player,
            current.intrinsic,
            mem::take(&mut current.values),
        )?;
        let Some(parent) = ancestors.pop() else {
            pruned.sort();
            return Ok(Search { value, pruned });
        };
        current = parent;
        current.absorb(value);
    }
}

/// A node on the stack of [`alpha_beta`].
struct Call {
    node: NodeId,
    player: Player,
    intrinsic: Option<f64>,
    window: Window,
    /// Children not searched yet.
    children: std::vec::IntoIter<NodeId>,
    values: Vec<f64>,
}

impl Call {
    fn new(tree: &Tree, node: NodeId, player: Player, pass_down: Window) -> Self {
        Self {
            node,
            player,
            intrinsic: tree.value(node),
            window: pass_down,
            children: tree.children(node).collect::<Vec<_>>().into_iter(),
            values: Vec::new(),
        }
    }

    fn next_child(&mut self) -> Option<NodeId> {
        if self.intrinsic.is_some() || self.window.is_closed() {
            None
        } else {
            self.children.next()
        }
    }

    fn absorb(&mut self, value: f64) {
        let pass_up = self.window.pass_up(self.player.other(), value);
        self.window = self.window.fold(self.player, pass_up);
        self.values.push(value);
    }
}

#[cfg(test)]
mod test {
    use super::{alpha_beta, minimax};
    use crate::{NodeId, Player, Tree};

    #[test]
    fn textbook_example() {
        let tree = Tree::parse("((3 12 8) (2 4 6) (14 5 2))").unwrap();

        assert_eq!(Ok(3.0), minimax(&tree, Player::Max));
        let search = alpha_beta(&tree, Player::Max).unwrap();
        assert_eq!(3.0, search.value);
        // After seeing 2 below C, Max will never choose C.
        assert_eq!(vec![NodeId(8), NodeId(9)], search.pruned);
    }

    #[test]
    fn overrides_short_circuit() {
        let mut tree = Tree::parse("((3 12) (2 4))").unwrap();
        tree.override_value(NodeId(2), 10.0).unwrap();

        assert_eq!(Ok(10.0), minimax(&tree, Player::Max));
        assert_eq!(Ok(10.0), minimax(&tree, Player::Min));
        let search = alpha_beta(&tree, Player::Max).unwrap();
        assert_eq!(10.0, search.value);
        assert_eq!(vec![NodeId(5), NodeId(6)], search.pruned);
    }

    #[test]
    fn deep_chain() {
        let depth = 100_000;
        let tree = Tree::build(&vec![1; depth], &[4.0]).unwrap();

        assert_eq!(Ok(4.0), minimax(&tree, Player::Max));
        let search = alpha_beta(&tree, Player::Min).unwrap();
        assert_eq!(4.0, search.value);
        assert!(search.pruned.is_empty());
    }
}
