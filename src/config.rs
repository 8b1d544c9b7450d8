use rand::{SeedableRng as _, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Player,
    walk::{InOrder, Selector, Shuffled},
};

/// Order in which an automated walk explores the children of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    #[default]
    InOrder,
    Shuffled,
}

/// How to walk a tree. Missing fields take their default.
///
/// ```json
/// { "root-player": "min", "order": "shuffled", "seed": 7 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct WalkConfig {
    /// Player to move at the root.
    pub root_player: Player,
    pub order: Order,
    /// Seed for [`Order::Shuffled`].
    pub seed: u64,
}

impl WalkConfig {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn selector(&self) -> Box<dyn Selector> {
        match self.order {
            Order::InOrder => Box::new(InOrder),
            Order::Shuffled => Box::new(Shuffled::new(StdRng::seed_from_u64(self.seed))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Order, WalkConfig};
    use crate::{NodeId, Player};

    #[test]
    fn defaults() {
        let config = WalkConfig::from_json("{}").unwrap();

        assert_eq!(WalkConfig::default(), config);
        assert_eq!(Player::Max, config.root_player);
        assert_eq!(Order::InOrder, config.order);
    }

    #[test]
    fn read_json() {
        let config =
            WalkConfig::from_json(r#"{ "root-player": "min", "order": "shuffled", "seed": 7 }"#)
                .unwrap();

        assert_eq!(Player::Min, config.root_player);
        assert_eq!(Order::Shuffled, config.order);
        assert_eq!(7, config.seed);
        let pending = [NodeId(1), NodeId(2)];
        assert!(pending.contains(&config.selector().select(&pending).unwrap()));
    }

    #[test]
    fn reject_unknown_fields() {
        assert!(WalkConfig::from_json(r#"{ "depth": 3 }"#).is_err());
    }
}
