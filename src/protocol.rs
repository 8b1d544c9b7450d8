use std::fmt;

use log::debug;
use serde::Serialize;

use crate::{Error, IllegalMove, MalformedTree, NodeId, Player, Table, Tree, Zipper, table};

/// Where the walk stands. Derived from the zipper after every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum State {
    /// The focus has pending children and none is selected.
    AwaitingChildSelection,
    /// A child is selected, but not entered yet.
    AwaitingDescendOrResolve,
    /// No further child needs to be explored. The focus waits for its value.
    FocusResolvable,
    /// The focus is resolved and waits to report to its parent.
    AwaitingAscend,
    /// The root is resolved and has been left. Nothing more to do.
    Terminal,
}

impl State {
    fn description(self) -> &'static str {
        match self {
            State::AwaitingChildSelection => "awaiting child selection",
            State::AwaitingDescendOrResolve => "awaiting descend",
            State::FocusResolvable => "focus is resolvable",
            State::AwaitingAscend => "awaiting ascend",
            State::Terminal => "terminal",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Input driving the walk, as issued by a user or an automated driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Event {
    SelectChild(NodeId),
    GoDown,
    /// Answer with the value the focus backs up.
    FillAlphaBeta(f64),
    GoUp,
    /// Enter an explored child again to inspect it.
    Revisit(NodeId),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::SelectChild(child) => write!(f, "select {child}"),
            Event::GoDown => f.write_str("go down"),
            Event::FillAlphaBeta(value) => write!(f, "fill {value}"),
            Event::GoUp => f.write_str("go up"),
            Event::Revisit(child) => write!(f, "revisit {child}"),
        }
    }
}

/// Owns the zipper and only ever changes it in response to an [`Event`] legal in the current
/// [`State`]. Rejected events leave the zipper untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Protocol<'t> {
    zipper: Zipper<'t>,
    /// Latched once `GoUp` is sent at the resolved root.
    terminal: bool,
    /// Latched once the tree turned out to be malformed. The walk can not continue.
    aborted: Option<MalformedTree>,
}

impl<'t> Protocol<'t> {
    pub fn new(tree: &'t Tree, root_player: Player) -> Self {
        Self {
            zipper: Zipper::new(tree, root_player),
            terminal: false,
            aborted: None,
        }
    }

    /// Read only view of the walk.
    pub fn zipper(&self) -> &Zipper<'t> {
        &self.zipper
    }

    pub fn state(&self) -> State {
        let focus = self.zipper.focus();
        if self.terminal {
            State::Terminal
        } else if focus.is_resolved() {
            State::AwaitingAscend
        } else if focus.question().is_some() {
            State::AwaitingDescendOrResolve
        } else if focus.is_done() {
            State::FocusResolvable
        } else {
            State::AwaitingChildSelection
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Value of the root, once the walk is complete.
    pub fn root_value(&self) -> Option<f64> {
        if self.terminal {
            self.zipper.focus().value()
        } else {
            None
        }
    }

    /// One table per frame from the root down to the focus.
    pub fn tables(&self) -> Vec<Table> {
        table::tables(&self.zipper)
    }

    /// Apply `event` and report the state it leads to.
    pub fn send(&mut self, event: Event) -> Result<State, Error> {
        if let Some(malformed) = self.aborted {
            return Err(malformed.into());
        }
        let state = self.state();
        match self.transition(state, event) {
            Ok(()) => {
                let next = self.state();
                debug!("{event} at {}: {state} -> {next}", self.zipper.focus().node());
                Ok(next)
            }
            Err(error) => {
                debug!("rejected {event} while {state}: {error}");
                if let Error::MalformedTree(malformed) = error {
                    self.aborted = Some(malformed);
                }
                Err(error)
            }
        }
    }

    fn transition(&mut self, state: State, event: Event) -> Result<(), Error> {
        match (state, event) {
            (State::Terminal, _) => Err(IllegalMove::Terminal.into()),
            (State::AwaitingChildSelection, Event::SelectChild(child)) => {
                Ok(self.zipper.select_child(child)?)
            }
            (State::AwaitingDescendOrResolve, Event::GoDown) => Ok(self.zipper.descend()?),
            (State::FocusResolvable, Event::FillAlphaBeta(value)) => {
                self.zipper.resolve_value(value).map(|_| ())
            }
            (State::AwaitingAscend, Event::GoUp) => match self.zipper.ascend() {
                Ok(_) => Ok(()),
                Err(IllegalMove::Terminal) => {
                    self.terminal = true;
                    Ok(())
                }
                Err(illegal) => Err(illegal.into()),
            },
            (
                State::AwaitingChildSelection | State::FocusResolvable | State::AwaitingAscend,
                Event::Revisit(child),
            ) => Ok(self.zipper.revisit(child)?),
            (state, _) => Err(IllegalMove::OutOfOrder(state.description()).into()),
        }
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::{Event, Protocol, State};
    use crate::{Error, IllegalMove, MalformedTree, NodeId, Player, Tree};

    fn send_all(protocol: &mut Protocol, events: &[Event]) -> State {
        let mut state = protocol.state();
        for &event in events {
            state = protocol.send(event).unwrap();
        }
        state
    }

    #[test]
    fn states_follow_the_walk() {
        let tree = Tree::parse("((3 5) 2)").unwrap();
        let mut protocol = Protocol::new(&tree, Player::Max);
        let (b, c, d) = (NodeId(1), NodeId(2), NodeId(3));

        assert_eq!(State::AwaitingChildSelection, protocol.state());
        assert_eq!(
            Ok(State::AwaitingDescendOrResolve),
            protocol.send(Event::SelectChild(c))
        );
        // Leaves are resolvable right after entering them.
        assert_eq!(Ok(State::FocusResolvable), protocol.send(Event::GoDown));
        assert_eq!(
            Ok(State::AwaitingAscend),
            protocol.send(Event::FillAlphaBeta(2.0))
        );
        assert_eq!(Ok(State::AwaitingChildSelection), protocol.send(Event::GoUp));

        protocol.send(Event::SelectChild(b)).unwrap();
        assert_eq!(Ok(State::AwaitingChildSelection), protocol.send(Event::GoDown));
        protocol.send(Event::SelectChild(d)).unwrap();
        protocol.send(Event::GoDown).unwrap();
        protocol.send(Event::FillAlphaBeta(3.0)).unwrap();
        // B (min) has 3 now, while A (max) is assured 2. E could still lower B's value below 3.
        assert_eq!(Ok(State::AwaitingChildSelection), protocol.send(Event::GoUp));
    }

    #[test]
    fn walk_to_terminal_and_stay_there() {
        let tree = Tree::parse("(4 7)").unwrap();
        let mut protocol = Protocol::new(&tree, Player::Min);
        let state = send_all(
            &mut protocol,
            &[
                Event::SelectChild(NodeId(2)),
                Event::GoDown,
                Event::FillAlphaBeta(7.0),
                Event::GoUp,
                Event::SelectChild(NodeId(1)),
                Event::GoDown,
                Event::FillAlphaBeta(4.0),
                Event::GoUp,
                Event::FillAlphaBeta(4.0),
            ],
        );
        assert_eq!(State::AwaitingAscend, state);
        assert_eq!(None, protocol.root_value());

        assert_eq!(Ok(State::Terminal), protocol.send(Event::GoUp));
        assert!(protocol.is_terminal());
        assert_eq!(Some(4.0), protocol.root_value());

        let terminal = protocol.clone();
        assert_eq!(
            Err(Error::IllegalMove(IllegalMove::Terminal)),
            protocol.send(Event::GoUp)
        );
        assert_eq!(terminal, protocol);
    }

    #[test]
    fn events_out_of_order_are_rejected() {
        let tree = Tree::parse("((3 5) 2)").unwrap();
        let mut protocol = Protocol::new(&tree, Player::Max);
        let initial = protocol.clone();

        assert_matches!(
            protocol.send(Event::GoDown),
            Err(Error::IllegalMove(IllegalMove::OutOfOrder(_)))
        );
        assert_matches!(
            protocol.send(Event::FillAlphaBeta(3.0)),
            Err(Error::IllegalMove(IllegalMove::OutOfOrder(_)))
        );
        assert_matches!(
            protocol.send(Event::GoUp),
            Err(Error::IllegalMove(IllegalMove::OutOfOrder(_)))
        );
        assert_eq!(
            Err(Error::IllegalMove(IllegalMove::NotPending(NodeId(3)))),
            protocol.send(Event::SelectChild(NodeId(3)))
        );
        assert_eq!(
            Err(Error::IllegalMove(IllegalMove::NotExplored(NodeId(1)))),
            protocol.send(Event::Revisit(NodeId(1)))
        );
        assert_eq!(initial, protocol);
    }

    #[test]
    fn malformed_tree_aborts_the_walk() {
        let mut tree = Tree::parse("(1 2)").unwrap();
        tree.remove_value(NodeId(1));
        let mut protocol = Protocol::new(&tree, Player::Max);

        // Recoverable errors do not abort anything.
        assert!(
            protocol
                .send(Event::GoUp)
                .unwrap_err()
                .is_recoverable()
        );
        protocol.send(Event::SelectChild(NodeId(1))).unwrap();
        assert_eq!(Ok(State::FocusResolvable), protocol.send(Event::GoDown));

        let malformed = Error::MalformedTree(MalformedTree { node: NodeId(1) });
        assert_eq!(Err(malformed.clone()), protocol.send(Event::FillAlphaBeta(1.0)));
        assert!(!malformed.is_recoverable());
        assert_eq!(Err(malformed), protocol.send(Event::SelectChild(NodeId(2))));
    }
}
