use thiserror::Error;

use crate::NodeId;

/// An event which is not valid in the current state of the walk. Always recoverable: the walk is
/// left exactly as it was before the event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IllegalMove {
    #[error("{0} is not a pending child of the focus")]
    NotPending(NodeId),
    #[error("{0} is not an explored child of the focus")]
    NotExplored(NodeId),
    #[error("{0} is already selected")]
    QuestionOccupied(NodeId),
    #[error("no child is selected")]
    NoQuestion,
    #[error("focus still has children to explore")]
    NotDone,
    #[error("focus needs no further exploration")]
    Done,
    #[error("focus is already resolved")]
    AlreadyResolved,
    #[error("focus is not resolved yet")]
    Unresolved,
    #[error("{given} is not the value backed up by the focus")]
    WrongValue { given: f64 },
    #[error("event is not valid while {0}")]
    OutOfOrder(&'static str),
    #[error("walk is complete")]
    Terminal,
}

/// A node without an intrinsic value and without any explored child reached resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{node} has neither a value nor an explored child")]
pub struct MalformedTree {
    pub node: NodeId,
}

/// Level sizes and leaf values which do not describe a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeMismatch {
    /// A level size was given, but every node created so far already has its size.
    #[error("level size #{index} has no node left to describe")]
    FrontierExhausted { index: usize },
    #[error("tree has {leaves} leaves, but {values} values were given")]
    LeafCount { leaves: usize, values: usize },
    #[error("value of {node} is not a number")]
    NotANumber { node: NodeId },
}

/// Errors reading the nested parenthesis notation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { offset: usize, found: char },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("empty group at offset {offset}")]
    EmptyGroup { offset: usize },
    #[error("invalid number {text:?} at offset {offset}")]
    Number { offset: usize, text: String },
    #[error(transparent)]
    Shape(#[from] ShapeMismatch),
}

/// Outcome of a rejected event at the protocol boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    IllegalMove(#[from] IllegalMove),
    #[error(transparent)]
    MalformedTree(#[from] MalformedTree),
}

impl Error {
    /// `true` if the walk may continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::IllegalMove(_))
    }
}
