use std::iter;

use alpha_beta_walk::{
    Event, NodeId, Player, Protocol, Shuffled, Tree, minimax, next_event, replay, walk,
};
use rand::{Rng, SeedableRng as _, rngs::StdRng};

/// A tree of depth up to four with up to three children per node and small integer leaves.
fn random_tree(rng: &mut impl Rng) -> Tree {
    let mut level_sizes = Vec::new();
    let mut depths = vec![0];
    let mut index = 0;
    while index < depths.len() {
        let depth = depths[index];
        let size = match depth {
            0 => rng.random_range(1..=3),
            4 => 0,
            _ => rng.random_range(0..=3),
        };
        level_sizes.push(size);
        depths.extend(iter::repeat_n(depth + 1, size));
        index += 1;
    }
    let leaves = level_sizes.iter().filter(|&&size| size == 0).count();
    let leaf_values: Vec<f64> = (0..leaves)
        .map(|_| rng.random_range(-9..=9) as f64)
        .collect();
    Tree::build(&level_sizes, &leaf_values).unwrap()
}

fn check_invariants(tree: &Tree, protocol: &Protocol) {
    let zipper = protocol.zipper();
    for frame in tree.node_ids().filter_map(|node| zipper.frame(node)) {
        let mut children: Vec<NodeId> = frame
            .pending()
            .iter()
            .copied()
            .chain(frame.explored().iter().map(|explored| explored.node))
            .chain(frame.pruned().iter().copied())
            .chain(frame.question())
            .collect();
        children.sort();
        assert_eq!(tree.children(frame.node()).collect::<Vec<_>>(), children);
        assert_eq!(
            frame.value().is_some(),
            frame.exploration().pass_up().is_some()
        );
        // Only frames on the path hold a question.
        assert!(frame.question().is_none() || zipper.path().any(|on_path| on_path == frame));
    }

    // Every ancestor asks about the child the walk is in, unless that child is revisited.
    for (parent, child) in zipper.path().zip(zipper.path().skip(1)) {
        let revisited = parent
            .explored()
            .iter()
            .any(|explored| explored.node == child.node());
        assert!(parent.question() == Some(child.node()) || revisited);
        assert_eq!(parent.answer(), child.value().filter(|_| !revisited));
    }
}

fn pruned_sets(tree: &Tree, protocol: &Protocol) -> Vec<Vec<NodeId>> {
    tree.node_ids()
        .map(|node| {
            protocol
                .zipper()
                .frame(node)
                .map(|frame| frame.pruned().to_vec())
                .unwrap_or_default()
        })
        .collect()
}

#[test]
fn any_order_finds_minimax_value() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let tree = random_tree(&mut rng);
        let root_player = if rng.random_bool(0.5) {
            Player::Max
        } else {
            Player::Min
        };
        let mut protocol = Protocol::new(&tree, root_player);
        let mut selector = Shuffled::new(StdRng::seed_from_u64(rng.random()));

        let walk = walk(&mut protocol, &mut selector).unwrap();

        assert_eq!(minimax(&tree, root_player), Ok(walk.value));
    }
}

#[test]
fn invariants_hold_at_every_step() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let tree = random_tree(&mut rng);
        let mut protocol = Protocol::new(&tree, Player::Max);
        let mut selector = Shuffled::new(StdRng::seed_from_u64(rng.random()));
        let mut pruned = pruned_sets(&tree, &protocol);

        while let Some(event) = next_event(&protocol, &mut selector).unwrap() {
            protocol.send(event).unwrap();
            check_invariants(&tree, &protocol);

            // Nothing ever leaves a pruned set.
            let now = pruned_sets(&tree, &protocol);
            for (before, after) in pruned.iter().zip(&now) {
                assert!(after.starts_with(before));
            }
            pruned = now;

            // Pruned children can not be selected, so never be entered.
            for &child in protocol.zipper().focus().pruned() {
                let mut attempt = protocol.clone();
                assert!(attempt.send(Event::SelectChild(child)).is_err());
            }
        }
    }
}

#[test]
fn walks_are_deterministic() {
    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..20 {
        let tree = random_tree(&mut rng);
        let seed = rng.random();

        let mut first = Protocol::new(&tree, Player::Min);
        let first_walk = walk(&mut first, &mut Shuffled::new(StdRng::seed_from_u64(seed))).unwrap();
        let mut second = Protocol::new(&tree, Player::Min);
        let second_walk =
            walk(&mut second, &mut Shuffled::new(StdRng::seed_from_u64(seed))).unwrap();
        assert_eq!(first_walk, second_walk);
        assert_eq!(first, second);

        let mut replayed = Protocol::new(&tree, Player::Min);
        replay(&mut replayed, &first_walk.events).unwrap();
        assert_eq!(first, replayed);
    }
}

#[test]
fn rejected_events_change_nothing() {
    let mut rng = StdRng::seed_from_u64(99);
    let tree = random_tree(&mut rng);
    let mut protocol = Protocol::new(&tree, Player::Max);
    let mut selector = Shuffled::new(StdRng::seed_from_u64(5));
    let nonsense = [
        Event::GoDown,
        Event::GoUp,
        Event::FillAlphaBeta(f64::NAN),
        Event::SelectChild(NodeId::ROOT),
        Event::Revisit(NodeId::ROOT),
    ];

    while let Some(event) = next_event(&protocol, &mut selector).unwrap() {
        for illegal in nonsense.iter().filter(|&&other| other != event) {
            let before = protocol.clone();
            assert!(protocol.send(*illegal).is_err());
            assert_eq!(before, protocol);
        }
        protocol.send(event).unwrap();
    }
}
