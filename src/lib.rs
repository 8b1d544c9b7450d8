//! Walk a game tree one alpha-beta decision at a time.
//!
//! A [`Protocol`] owns a [`Zipper`] over a [`Tree`] and accepts [`Event`]s which select, enter,
//! resolve and leave nodes, exactly reproducing the bookkeeping of alpha-beta pruning. Every
//! intermediate state can be inspected as a stack of [`Table`]s.

mod config;
mod error;
mod exploration;
mod label;
mod layout;
mod minimax;
mod player;
mod protocol;
mod table;
mod tree;
mod walk;
mod zipper;

pub use self::{
    config::{Order, WalkConfig},
    error::{Error, IllegalMove, MalformedTree, ParseError, ShapeMismatch},
    exploration::{Bound, Exploration, Window, backed_up_value},
    label::label,
    layout::{Position, draw, layout},
    minimax::{Search, alpha_beta, minimax},
    player::Player,
    protocol::{Event, Protocol, State},
    table::{HeaderRow, QuestionRow, RowStatus, Table, ValueRow, tables},
    tree::{NodeId, Tree},
    walk::{InOrder, Selector, Shuffled, Walk, next_event, replay, walk},
    zipper::{Explored, Frame, Zipper},
};
