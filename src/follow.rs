//! A generic walk over all paths through a pattern.
//!
//! Starting at an element, the walk moves through the pattern in matching
//! direction, forking the caller's state wherever the paths diverge (groups,
//! optional quantifiers, lookarounds, loops) and joining the forks where they
//! meet again. Every analysis of the form "what happens after position P"
//! is an implementation of [`FollowOperations`].
//!
//! The walk is linear in the number of reachable elements on average;
//! because a join point can be re-entered from every loop around it, the
//! worst case is quadratic.

use crate::{
    ast::{Assertion, Node, NodeId, Pattern},
    backreference::position,
    direction::{MatchingDirection, matching_direction},
};

/// How the walk treats the start element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Enter the start element, then continue after it.
    Enter,
    /// Start right after the start element.
    Next,
}

/// Why a path ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEnd {
    /// The path reached the end (or start, right to left) of the pattern.
    Pattern,
    /// The path reached the end of the lookaround it is in.
    Assertion,
}

/// The operations a [`follow_paths`] walk applies to its state.
///
/// Only [`FollowOperations::join`] is required. All other operations
/// default to passing the state through unchanged.
pub trait FollowOperations<S: Clone> {
    /// Combines the states of paths that meet again.
    fn join(&self, states: Vec<S>, direction: MatchingDirection) -> S;

    /// Creates the state of a new path branching off `state`.
    fn fork(&self, state: &S, _direction: MatchingDirection) -> S {
        state.clone()
    }

    /// Combines the state of the path that continues past a lookaround with
    /// the joined state of the paths through the lookaround itself.
    fn assert(
        &self,
        state: S,
        _direction: MatchingDirection,
        _assertion: S,
        _assertion_direction: MatchingDirection,
    ) -> S {
        state
    }

    /// Called before the walk descends into `element`.
    fn enter(
        &self,
        _pattern: &Pattern,
        _element: NodeId,
        state: S,
        _direction: MatchingDirection,
    ) -> S {
        state
    }

    /// Called after the walk went through `element`.
    fn leave(
        &self,
        _pattern: &Pattern,
        _element: NodeId,
        state: S,
        _direction: MatchingDirection,
    ) -> S {
        state
    }

    /// Called when a path ends.
    fn end_path(&self, state: S, _direction: MatchingDirection, _reason: PathEnd) -> S {
        state
    }

    /// Whether the walk descends into the children of `element`.
    fn continue_into(
        &self,
        _pattern: &Pattern,
        _element: NodeId,
        _state: &S,
        _direction: MatchingDirection,
    ) -> bool {
        true
    }

    /// Whether the path continues after `element`.
    fn continue_after(
        &self,
        _pattern: &Pattern,
        _element: NodeId,
        _state: &S,
        _direction: MatchingDirection,
    ) -> bool {
        true
    }
}

/// Follows every path starting at `start` and returns the joined state of
/// all of them.
///
/// If `direction` is `None`, the matching direction of `start` is used.
///
/// # Panics
///
/// Panics if `start` is not an element (e.g. the root, an alternative, or a
/// node inside a character class).
pub fn follow_paths<S, O>(
    pattern: &Pattern,
    start: NodeId,
    mode: StartMode,
    initial: S,
    operations: &O,
    direction: Option<MatchingDirection>,
) -> S
where
    S: Clone,
    O: FollowOperations<S> + ?Sized,
{
    assert!(
        pattern.node(start).is_element() && !is_class_member(pattern, start),
        "paths can only be followed from an element, not a {}",
        pattern.node(start).kind_name()
    );

    let direction = direction.unwrap_or_else(|| matching_direction(pattern, start));
    let walker = Walker {
        pattern,
        operations,
    };

    let mut state = initial;
    if mode == StartMode::Enter {
        state = walker.enter(start, state, direction);
    }
    walker.next(start, state, direction)
}

fn is_class_member(pattern: &Pattern, id: NodeId) -> bool {
    pattern
        .parent(id)
        .is_some_and(|p| matches!(pattern.node(p), Node::CharacterClass { .. }))
}

enum Next {
    /// `continue_after` stopped the path.
    Stop,
    End(PathEnd),
    Element(NodeId),
}

struct Walker<'a, O: ?Sized> {
    pattern: &'a Pattern,
    operations: &'a O,
}

impl<O: ?Sized> Walker<'_, O> {
    fn enter<S>(&self, element: NodeId, state: S, direction: MatchingDirection) -> S
    where
        S: Clone,
        O: FollowOperations<S>,
    {
        let ops = self.operations;
        let mut state = ops.enter(self.pattern, element, state, direction);

        if ops.continue_into(self.pattern, element, &state, direction) {
            match self.pattern.node(element) {
                Node::Assertion(Assertion::Lookaround {
                    kind, alternatives, ..
                }) => {
                    let inner = MatchingDirection::of_lookaround(*kind);
                    let paths = alternatives
                        .iter()
                        .map(|&alt| {
                            self.enter_alternative(alt, ops.fork(&state, direction), inner)
                        })
                        .collect();
                    let assertion = ops.join(paths, inner);
                    let assertion = ops.end_path(assertion, inner, PathEnd::Assertion);
                    state = ops.assert(state, direction, assertion, inner);
                }
                Node::Group { alternatives } | Node::CapturingGroup { alternatives, .. } => {
                    let paths = alternatives
                        .iter()
                        .map(|&alt| {
                            self.enter_alternative(alt, ops.fork(&state, direction), direction)
                        })
                        .collect();
                    state = ops.join(paths, direction);
                }
                Node::Quantifier(q) if q.max == 0 => {}
                Node::Quantifier(q) if q.min == 0 => {
                    let entered = self.enter(q.element, ops.fork(&state, direction), direction);
                    state = ops.join(vec![state, entered], direction);
                }
                Node::Quantifier(q) => {
                    state = self.enter(q.element, state, direction);
                }
                _ => {}
            }
        }

        ops.leave(self.pattern, element, state, direction)
    }

    fn enter_alternative<S>(
        &self,
        alternative: NodeId,
        mut state: S,
        direction: MatchingDirection,
    ) -> S
    where
        S: Clone,
        O: FollowOperations<S>,
    {
        let Node::Alternative { elements } = self.pattern.node(alternative) else {
            panic!("expected an alternative");
        };
        for &element in direction.ordered(elements) {
            state = self.enter(element, state, direction);
            if !self
                .operations
                .continue_after(self.pattern, element, &state, direction)
            {
                break;
            }
        }
        state
    }

    fn next<S>(&self, mut element: NodeId, mut state: S, direction: MatchingDirection) -> S
    where
        S: Clone,
        O: FollowOperations<S>,
    {
        let ops = self.operations;
        loop {
            let mut loops = Vec::new();
            let after = self.next_element(element, &state, direction, &mut loops);

            // Paths leaving a loop body may go around once more.
            for quantifier in loops {
                let again = self.enter(quantifier, ops.fork(&state, direction), direction);
                state = ops.join(vec![state, again], direction);
            }

            match after {
                Next::Stop => return state,
                Next::End(reason) => return ops.end_path(state, direction, reason),
                Next::Element(next) => {
                    state = self.enter(next, state, direction);
                    element = next;
                }
            }
        }
    }

    /// Finds the element matched after `element`, recording every quantifier
    /// with `max > 1` the path leaves on the way (innermost first).
    fn next_element<S>(
        &self,
        element: NodeId,
        state: &S,
        direction: MatchingDirection,
        loops: &mut Vec<NodeId>,
    ) -> Next
    where
        S: Clone,
        O: FollowOperations<S>,
    {
        if !self
            .operations
            .continue_after(self.pattern, element, state, direction)
        {
            return Next::Stop;
        }

        let Some(parent) = self.pattern.parent(element) else {
            panic!("the root has no next element");
        };
        match self.pattern.node(parent) {
            Node::Quantifier(q) => {
                if q.max > 1 {
                    loops.push(parent);
                }
                self.next_element(parent, state, direction, loops)
            }
            Node::Alternative { elements } => {
                let index = position(elements, element);
                if let Some(&next) = direction.next(elements, index) {
                    return Next::Element(next);
                }

                let Some(outer) = self.pattern.parent(parent) else {
                    unreachable!("an alternative always has a parent");
                };
                match self.pattern.node(outer) {
                    Node::Pattern { .. } => Next::End(PathEnd::Pattern),
                    Node::Assertion(_) => Next::End(PathEnd::Assertion),
                    Node::Group { .. } | Node::CapturingGroup { .. } => {
                        self.next_element(outer, state, direction, loops)
                    }
                    other => panic!("an alternative cannot be a child of a {}", other.kind_name()),
                }
            }
            other => panic!("a {} has no next element", other.kind_name()),
        }
    }
}
