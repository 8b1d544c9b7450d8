use std::fmt;

use serde::Serialize;

use crate::{
    NodeId, Player, Zipper,
    exploration::{Bound, Window},
    zipper::Frame,
};

/// What is shown for a single frame of the walk: one header, one row per child which is done in
/// the order of the children, and a row for the child currently being asked about.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub player: Player,
    pub header: HeaderRow,
    pub rows: Vec<ValueRow>,
    pub question: Option<QuestionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderRow {
    pub node: NodeId,
    pub label: String,
    pub pass_down: Window,
    /// Running window of the node.
    pub window: Window,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Explored,
    Pruned,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRow {
    pub node: NodeId,
    pub label: String,
    pub status: RowStatus,
    /// `None` for pruned children.
    pub value: Option<f64>,
    /// `None` for pruned children.
    pub pass_up: Option<Window>,
    /// Running window of the parent after this row.
    pub window: Window,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionRow {
    pub node: NodeId,
    pub label: String,
    /// Blank until the child is resolved.
    pub value: Option<f64>,
}

impl Table {
    pub fn new(frame: &Frame) -> Self {
        let explored = frame.explored().iter().map(|explored| ValueRow {
            node: explored.node,
            label: explored.node.label(),
            status: RowStatus::Explored,
            value: Some(explored.value),
            pass_up: Some(explored.pass_up),
            window: explored.window,
        });
        let pruned = frame.pruned().iter().map(|&node| ValueRow {
            node,
            label: node.label(),
            status: RowStatus::Pruned,
            value: None,
            pass_up: None,
            window: frame.window(),
        });
        let mut rows: Vec<ValueRow> = explored.chain(pruned).collect();
        rows.sort_by_key(|row| row.node);

        let question = frame.question().map(|node| QuestionRow {
            node,
            label: node.label(),
            value: frame.answer(),
        });

        Self {
            player: frame.player(),
            header: HeaderRow {
                node: frame.node(),
                label: frame.node().label(),
                pass_down: frame.exploration().pass_down(),
                window: frame.window(),
                value: frame.value(),
            },
            rows,
            question,
        }
    }
}

/// Tables for every frame from the root down to the focus.
pub fn tables(zipper: &Zipper) -> Vec<Table> {
    zipper.path().map(Table::new).collect()
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let player = match self.player {
            Player::Max => "max",
            Player::Min => "min",
        };
        write!(f, "{} ({player}) {}", self.header.label, self.header.window)?;
        if let Some(value) = self.header.value {
            write!(f, " = {value}")?;
        }
        writeln!(f)?;
        for row in &self.rows {
            match (row.status, row.value) {
                (RowStatus::Explored, Some(value)) => writeln!(
                    f,
                    "  {:<4} {:>6}  α {:>4}  β {:>4}",
                    row.label,
                    value,
                    Bound(row.window.alpha).to_string(),
                    Bound(row.window.beta).to_string(),
                )?,
                _ => writeln!(f, "  {:<4} pruned", row.label)?,
            }
        }
        if let Some(question) = &self.question {
            match question.value {
                Some(value) => writeln!(f, "  {:<4} {:>6}  ?", question.label, value)?,
                None => writeln!(f, "  {:<4} {:>6}", question.label, "?")?,
            }
        }
        Ok(())
    }
}
