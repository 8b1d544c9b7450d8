use rand::{Rng, seq::IndexedRandom as _};

use crate::{Error, Event, IllegalMove, NodeId, Protocol, State};

/// Decides which of the pending children of the focus to explore next.
pub trait Selector {
    /// `None` only if `pending` is empty.
    fn select(&mut self, pending: &[NodeId]) -> Option<NodeId>;
}

/// Explore children from left to right, like the classic recursive algorithm.
pub struct InOrder;

impl Selector for InOrder {
    fn select(&mut self, pending: &[NodeId]) -> Option<NodeId> {
        pending.first().copied()
    }
}

/// Explore children in random order.
pub struct Shuffled<R> {
    rng: R,
}

impl<R> Shuffled<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Selector for Shuffled<R> {
    fn select(&mut self, pending: &[NodeId]) -> Option<NodeId> {
        pending.choose(&mut self.rng).copied()
    }
}

/// A walk driven to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Walk {
    /// Value of the root.
    pub value: f64,
    /// Every event sent, in order.
    pub events: Vec<Event>,
}

/// The legal event which advances the walk, answering with correct values. `None` once the walk
/// is complete.
pub fn next_event<S>(protocol: &Protocol, selector: &mut S) -> Result<Option<Event>, Error>
where
    S: Selector + ?Sized,
{
    let focus = protocol.zipper().focus();
    let event = match protocol.state() {
        State::Terminal => return Ok(None),
        State::AwaitingChildSelection => {
            let child = selector
                .select(focus.pending())
                .ok_or(IllegalMove::Done)?;
            Event::SelectChild(child)
        }
        State::AwaitingDescendOrResolve => Event::GoDown,
        State::FocusResolvable => Event::FillAlphaBeta(focus.backed_up_value()?),
        State::AwaitingAscend => Event::GoUp,
    };
    Ok(Some(event))
}

/// Drive `protocol` from wherever it stands to the end of the walk.
pub fn walk<S>(protocol: &mut Protocol, selector: &mut S) -> Result<Walk, Error>
where
    S: Selector + ?Sized,
{
    let mut events = Vec::new();
    while let Some(event) = next_event(protocol, selector)? {
        protocol.send(event)?;
        events.push(event);
    }
    let value = protocol.root_value().ok_or(IllegalMove::Unresolved)?;
    Ok(Walk { value, events })
}

/// Send `events` in order, stopping at the first one rejected.
pub fn replay(protocol: &mut Protocol, events: &[Event]) -> Result<State, Error> {
    let mut state = protocol.state();
    for &event in events {
        state = protocol.send(event)?;
    }
    Ok(state)
}
