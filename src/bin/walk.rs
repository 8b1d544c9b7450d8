//! Walk a game tree with alpha-beta pruning and print every table along the way.
//!
//! The tree is given either as breadth-first level sizes and leaf values, or in nested
//! parentheses. Without a tree the walk runs on a small built-in example.

use std::{fs, path::PathBuf};

use alpha_beta_walk::{
    Order, Player, Protocol, Tree, WalkConfig, alpha_beta, draw, minimax, next_event,
};
use anyhow::{Context as _, anyhow};
use clap::Parser;
use log::info;

const EXAMPLE: &str = "((((5 6) (7 4 5)) ((3))) (((6) (6 9)) ((7))) (((5)) ((9 8) (6))))";

#[derive(Parser, Debug)]
#[command(name = "walk")]
#[command(about = "Step through alpha-beta pruning over a game tree")]
struct Args {
    /// Tree in nested parentheses, e.g. "((3 5) (2 9))"
    #[arg(long, conflicts_with_all = ["sizes", "values"])]
    nested: Option<String>,

    /// Number of children of each node in breadth-first order, comma separated
    #[arg(long, value_delimiter = ',', requires = "values")]
    sizes: Vec<usize>,

    /// Leaf values in breadth-first order, comma separated
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    values: Vec<f64>,

    /// JSON file with a walk configuration. Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Let the minimizing player move at the root
    #[arg(long)]
    min_root: bool,

    /// Explore children in random order
    #[arg(long)]
    shuffle: bool,

    /// Seed for --shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Print the tables after every step
    #[arg(long)]
    steps: bool,

    /// Print tables as JSON
    #[arg(long)]
    json: bool,

    /// Draw the tree before walking it
    #[arg(long)]
    draw: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<WalkConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                WalkConfig::from_json(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => WalkConfig::default(),
        };
        if self.min_root {
            config.root_player = Player::Min;
        }
        if self.shuffle {
            config.order = Order::Shuffled;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }

    fn tree(&self) -> anyhow::Result<Tree> {
        let tree = match &self.nested {
            Some(nested) => Tree::parse(nested)?,
            None if !self.values.is_empty() => Tree::build(&self.sizes, &self.values)?,
            None => Tree::parse(EXAMPLE)?,
        };
        Ok(tree)
    }
}

fn print_tables(protocol: &Protocol, json: bool) -> anyhow::Result<()> {
    let tables = protocol.tables();
    if json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
    } else {
        for table in tables {
            println!("{table}");
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.config()?;
    let tree = args.tree()?;
    info!("walking {} nodes with {config:?}", tree.num_nodes());

    if args.draw {
        println!("{}", draw(&tree));
    }

    let mut protocol = Protocol::new(&tree, config.root_player);
    let mut selector = config.selector();
    let mut steps = 0;
    while let Some(event) = next_event(&protocol, &mut *selector)? {
        let state = protocol.send(event)?;
        steps += 1;
        if args.steps {
            println!("#{steps} {event} -> {state}");
            print_tables(&protocol, args.json)?;
        }
    }
    if !args.steps {
        print_tables(&protocol, args.json)?;
    }

    let value = protocol
        .root_value()
        .ok_or_else(|| anyhow!("walk ended without a root value"))?;
    let reference = minimax(&tree, config.root_player)?;
    if value != reference {
        return Err(anyhow!("walk found {value}, but minimax is {reference}"));
    }
    let zipper = protocol.zipper();
    let pruned: usize = tree
        .node_ids()
        .filter_map(|node| zipper.frame(node))
        .map(|frame| frame.pruned().len())
        .sum();
    println!("root value {value} after {steps} steps, {pruned} children pruned");
    if config.order == Order::InOrder {
        let search = alpha_beta(&tree, config.root_player)?;
        info!("recursive alpha-beta prunes {}", search.pruned.len());
    }
    Ok(())
}
