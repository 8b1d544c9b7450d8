use std::fmt;

use serde::Serialize;

use crate::{IllegalMove, MalformedTree, NodeId, Player};

/// Bounds `[alpha, beta]` of the search window. `alpha` is the value the maximizing player is
/// already assured of, `beta` the value the minimizing player is already assured of.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Window {
    pub alpha: f64,
    pub beta: f64,
}

impl Window {
    /// Window of the root: nothing is known yet.
    pub const FULL: Window = Window {
        alpha: f64::NEG_INFINITY,
        beta: f64::INFINITY,
    };

    /// Once the window collapses no further child can change the value backed up to the parent,
    /// so the remaining children can be pruned.
    pub fn is_closed(&self) -> bool {
        self.alpha >= self.beta
    }

    /// Tighten the running window of a node owned by `player` with the window passed up by one
    /// of its resolved children. A maximizing node may only raise `alpha`, a minimizing node may
    /// only lower `beta`.
    pub fn fold(self, player: Player, pass_up: Window) -> Window {
        match player {
            Player::Max => Window {
                alpha: self.alpha.max(pass_up.alpha),
                ..self
            },
            Player::Min => Window {
                beta: self.beta.min(pass_up.beta),
                ..self
            },
        }
    }

    /// The window a node owned by `player` reports to its parent once it resolves to `value`.
    /// `self` is the window the node received from the parent. The parent moves for the other
    /// player, so the value tightens the parent's opposite bound.
    pub fn pass_up(self, player: Player, value: f64) -> Window {
        match player {
            Player::Max => Window {
                alpha: self.alpha,
                beta: value.min(self.beta),
            },
            Player::Min => Window {
                alpha: value.max(self.alpha),
                beta: self.beta,
            },
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::FULL
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", Bound(self.alpha), Bound(self.beta))
    }
}

/// Prints infinite bounds as `-∞` and `+∞`.
pub struct Bound(pub f64);

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == f64::INFINITY {
            f.write_str("+∞")
        } else if self.0 == f64::NEG_INFINITY {
            f.write_str("-∞")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Alpha-beta bookkeeping of a single visited node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Exploration {
    /// The node has been entered, but its value is not known yet.
    Unresolved {
        /// Window inherited from the parent at the time the node was entered.
        pass_down: Window,
    },
    /// The minimax value of the node is known.
    Resolved {
        pass_down: Window,
        value: f64,
        /// Window the parent should fold into its own running window.
        pass_up: Window,
    },
}

impl Exploration {
    pub fn new(pass_down: Window) -> Self {
        Exploration::Unresolved { pass_down }
    }

    /// Upgrade to [`Exploration::Resolved`]. The window passed up is derived from `value` and the
    /// window passed down.
    pub fn resolve(self, player: Player, value: f64) -> Result<Self, IllegalMove> {
        match self {
            Exploration::Unresolved { pass_down } => Ok(Exploration::Resolved {
                pass_down,
                value,
                pass_up: pass_down.pass_up(player, value),
            }),
            Exploration::Resolved { .. } => Err(IllegalMove::AlreadyResolved),
        }
    }

    pub fn pass_down(&self) -> Window {
        match self {
            Exploration::Unresolved { pass_down } | Exploration::Resolved { pass_down, .. } => {
                *pass_down
            }
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Exploration::Unresolved { .. } => None,
            Exploration::Resolved { value, .. } => Some(*value),
        }
    }

    pub fn pass_up(&self) -> Option<Window> {
        match self {
            Exploration::Unresolved { .. } => None,
            Exploration::Resolved { pass_up, .. } => Some(*pass_up),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Exploration::Resolved { .. })
    }
}

/// The value `node` backs up to its parent. An intrinsic value wins unconditionally. Otherwise it is
/// the value `player` prefers among the children actually explored; pruned children do not
/// contribute.
pub fn backed_up_value(
    node: NodeId,
    player: Player,
    intrinsic: Option<f64>,
    explored: impl IntoIterator<Item = f64>,
) -> Result<f64, MalformedTree> {
    if let Some(value) = intrinsic {
        return Ok(value);
    }
    explored
        .into_iter()
        .reduce(|a, b| player.prefer(a, b))
        .ok_or(MalformedTree { node })
}
