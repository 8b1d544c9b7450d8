use serde::{Deserialize, Serialize};

/// The side to move at a node. Strictly alternates with depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    #[default]
    Max,
    Min,
}

impl Player {
    /// Yield the other player.
    pub fn other(&self) -> Player {
        match self {
            Player::Max => Player::Min,
            Player::Min => Player::Max,
        }
    }

    /// The player to move at `depth`, if `self` moves at the root.
    pub fn at_depth(self, depth: usize) -> Player {
        if depth % 2 == 0 { self } else { self.other() }
    }

    /// Of two values, the one this player prefers.
    pub fn prefer(&self, a: f64, b: f64) -> f64 {
        match self {
            Player::Max => a.max(b),
            Player::Min => a.min(b),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Player;

    #[test]
    fn alternates_by_depth() {
        assert_eq!(Player::Max, Player::Max.at_depth(0));
        assert_eq!(Player::Min, Player::Max.at_depth(1));
        assert_eq!(Player::Max, Player::Min.at_depth(3));
        assert_eq!(Player::Max, Player::Min.other());
    }

    #[test]
    fn preferences() {
        assert_eq!(7.0, Player::Max.prefer(3.0, 7.0));
        assert_eq!(3.0, Player::Min.prefer(3.0, 7.0));
    }
}
