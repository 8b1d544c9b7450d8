use log::trace;
use serde::Serialize;

use crate::{
    Error, IllegalMove, MalformedTree, NodeId, Player, Tree,
    exploration::{Exploration, Window, backed_up_value},
};

/// A resolved child as its parent remembers it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Explored {
    pub node: NodeId,
    pub value: f64,
    pub pass_up: Window,
    /// Running window of the parent right after `pass_up` has been folded into it.
    pub window: Window,
}

/// State of a node entered during the walk.
///
/// The children of the node are partitioned into `pending`, `explored` and `pruned`. At most one
/// further child sits in the question slot, from its selection until it reports its value back to
/// this frame. Together they always make up all the children of the node, each exactly once and in
/// their original order within each collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    node: NodeId,
    player: Player,
    /// Value the tree assigns to the node. Set for leaves and overridden inner nodes.
    intrinsic: Option<f64>,
    exploration: Exploration,
    /// Window passed down, tightened by the window of each explored child.
    window: Window,
    pending: Vec<NodeId>,
    explored: Vec<Explored>,
    pruned: Vec<NodeId>,
    question: Option<NodeId>,
    /// Value of the question child once it is resolved, but before it has been left.
    answer: Option<f64>,
}

impl Frame {
    fn new(tree: &Tree, node: NodeId, player: Player, pass_down: Window) -> Self {
        Self {
            node,
            player,
            intrinsic: tree.value(node),
            exploration: Exploration::new(pass_down),
            window: pass_down,
            pending: tree.children(node).collect(),
            explored: Vec::new(),
            pruned: Vec::new(),
            question: None,
            answer: None,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn exploration(&self) -> &Exploration {
        &self.exploration
    }

    /// The latest known window of this node.
    pub fn window(&self) -> Window {
        self.window
    }

    pub fn pending(&self) -> &[NodeId] {
        &self.pending
    }

    pub fn explored(&self) -> &[Explored] {
        &self.explored
    }

    pub fn pruned(&self) -> &[NodeId] {
        &self.pruned
    }

    pub fn question(&self) -> Option<NodeId> {
        self.question
    }

    /// Value of the question child. `None` until the child is resolved.
    pub fn answer(&self) -> Option<f64> {
        self.answer
    }

    pub fn value(&self) -> Option<f64> {
        self.exploration.value()
    }

    pub fn is_resolved(&self) -> bool {
        self.exploration.is_resolved()
    }

    /// `true` if no further child needs to be explored before the node can be resolved. Either
    /// because the value is given, all children have been explored, or the window collapsed.
    pub fn is_done(&self) -> bool {
        self.intrinsic.is_some() || self.pending.is_empty() || self.window.is_closed()
    }

    /// The value the node backs up to its parent, given the children explored so far.
    pub fn backed_up_value(&self) -> Result<f64, MalformedTree> {
        backed_up_value(
            self.node,
            self.player,
            self.intrinsic,
            self.explored.iter().map(|explored| explored.value),
        )
    }

    fn is_explored(&self, child: NodeId) -> bool {
        self.explored.iter().any(|explored| explored.node == child)
    }

    /// Fold the window of a resolved child into the running window and remember the child as
    /// explored. Once the window collapses all pending children are pruned at once.
    fn absorb(&mut self, child: NodeId, value: f64, pass_up: Window) {
        self.question = None;
        self.answer = None;
        self.window = self.window.fold(self.player, pass_up);
        trace!("{} folds {} into its window: {}", self.node, child, self.window);
        if !self.is_explored(child) {
            self.explored.push(Explored {
                node: child,
                value,
                pass_up,
                window: self.window,
            });
        }
        if self.window.is_closed() && !self.pending.is_empty() {
            trace!("{} prunes {:?}", self.node, self.pending);
            self.pruned.append(&mut self.pending);
        }
    }
}

/// Cursor over a [`Tree`] used to walk it one alpha-beta decision at a time.
///
/// The zipper owns the frame of the node in focus and the frames of all its ancestors (the
/// breadcrumbs). Frames of children which have been left again are kept, indexed by node, so
/// they can be revisited.
#[derive(Debug, Clone, PartialEq)]
pub struct Zipper<'t> {
    tree: &'t Tree,
    focus: Frame,
    /// Frames of the ancestors of the focus. Root first, parent of the focus last.
    breadcrumbs: Vec<Frame>,
    /// Frames of nodes which have been resolved and left again.
    visited: Vec<Option<Frame>>,
}

impl<'t> Zipper<'t> {
    /// Focus on the root of `tree` with a full window. `root_player` moves at the root.
    pub fn new(tree: &'t Tree, root_player: Player) -> Self {
        Self {
            tree,
            focus: Frame::new(tree, NodeId::ROOT, root_player, Window::FULL),
            breadcrumbs: Vec::new(),
            visited: vec![None; tree.num_nodes()],
        }
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    pub fn focus(&self) -> &Frame {
        &self.focus
    }

    pub fn breadcrumbs(&self) -> &[Frame] {
        &self.breadcrumbs
    }

    /// Frames from the root down to the focus.
    pub fn path(&self) -> impl Iterator<Item = &Frame> {
        self.breadcrumbs.iter().chain([&self.focus])
    }

    /// Frame of any node entered so far.
    pub fn frame(&self, node: NodeId) -> Option<&Frame> {
        self.path()
            .find(|frame| frame.node == node)
            .or_else(|| self.visited.get(node.0).and_then(Option::as_ref))
    }

    pub fn is_at_root(&self) -> bool {
        self.breadcrumbs.is_empty()
    }

    /// Mark a pending child of the focus as the one to explore next. It stays in the question slot
    /// of the focus until it is left again.
    pub fn select_child(&mut self, child: NodeId) -> Result<(), IllegalMove> {
        let focus = &mut self.focus;
        if focus.is_resolved() {
            return Err(IllegalMove::AlreadyResolved);
        }
        if let Some(question) = focus.question {
            return Err(IllegalMove::QuestionOccupied(question));
        }
        if focus.is_done() {
            return Err(IllegalMove::Done);
        }
        let Some(position) = focus.pending.iter().position(|&pending| pending == child) else {
            return Err(IllegalMove::NotPending(child));
        };
        focus.pending.remove(position);
        focus.question = Some(child);
        Ok(())
    }

    /// Enter the selected child. It inherits the running window of the focus.
    pub fn descend(&mut self) -> Result<(), IllegalMove> {
        let Some(child) = self.focus.question else {
            return Err(IllegalMove::NoQuestion);
        };
        let frame = Frame::new(
            self.tree,
            child,
            self.focus.player.other(),
            self.focus.window,
        );
        let parent = std::mem::replace(&mut self.focus, frame);
        self.breadcrumbs.push(parent);
        Ok(())
    }

    /// Resolve the focus. `value` must match the value the focus backs up. Children which are
    /// still pending at this point (due to an intrinsic value) are pruned.
    pub fn resolve_value(&mut self, value: f64) -> Result<f64, Error> {
        let focus = &mut self.focus;
        if focus.is_resolved() {
            return Err(IllegalMove::AlreadyResolved.into());
        }
        if let Some(question) = focus.question {
            return Err(IllegalMove::QuestionOccupied(question).into());
        }
        if !focus.is_done() {
            return Err(IllegalMove::NotDone.into());
        }
        let backed_up = focus.backed_up_value()?;
        if value != backed_up {
            return Err(IllegalMove::WrongValue { given: value }.into());
        }
        focus.exploration = focus.exploration.resolve(focus.player, backed_up)?;
        focus.pruned.append(&mut focus.pending);
        if let Some(parent) = self.breadcrumbs.last_mut() {
            if parent.question == Some(focus.node) {
                parent.answer = Some(backed_up);
            }
        }
        Ok(backed_up)
    }

    /// Return to the parent of the resolved focus and fold the result into it.
    ///
    /// # Return
    ///
    /// The new focus. [`IllegalMove::Terminal`] if the focus is the root.
    pub fn ascend(&mut self) -> Result<NodeId, IllegalMove> {
        let Exploration::Resolved { value, pass_up, .. } = self.focus.exploration else {
            return Err(IllegalMove::Unresolved);
        };
        let Some(mut parent) = self.breadcrumbs.pop() else {
            return Err(IllegalMove::Terminal);
        };
        let child = self.focus.node;
        parent.absorb(child, value, pass_up);
        let left = std::mem::replace(&mut self.focus, parent);
        self.visited[child.0] = Some(left);
        Ok(self.focus.node)
    }

    /// Enter an already explored child again to inspect it. Ascending from it changes nothing in
    /// the focus.
    pub fn revisit(&mut self, child: NodeId) -> Result<(), IllegalMove> {
        if let Some(question) = self.focus.question {
            return Err(IllegalMove::QuestionOccupied(question));
        }
        if !self.focus.is_explored(child) {
            return Err(IllegalMove::NotExplored(child));
        }
        let Some(frame) = self.visited[child.0].take() else {
            return Err(IllegalMove::NotExplored(child));
        };
        let parent = std::mem::replace(&mut self.focus, frame);
        self.breadcrumbs.push(parent);
        Ok(())
    }
}
