//! Random tree shapes and a small backtracking matcher for property tests.

#![allow(dead_code)]

use regex_analysis::{
    Flags, LenBound, Node, NodeId, Pattern, PatternBuilder, char_set_of_element,
    ast::{Assertion, LookaroundKind, Quantifier},
};

/// A small random tree shape for property tests.
#[derive(Clone, Debug)]
pub enum Shape {
    Char(u8),
    Star(Box<Shape>),
    Optional(Box<Shape>),
    Never(Box<Shape>),
    Seq(Vec<Shape>),
    Alt(Vec<Shape>),
    Look(bool, Box<Shape>),
    Capture(Box<Shape>),
    Reference,
}

impl Shape {
    fn children(&self) -> Vec<&Shape> {
        match self {
            Shape::Char(_) | Shape::Reference => Vec::new(),
            Shape::Star(inner)
            | Shape::Optional(inner)
            | Shape::Never(inner)
            | Shape::Look(_, inner)
            | Shape::Capture(inner) => vec![&**inner],
            Shape::Seq(items) | Shape::Alt(items) => items.iter().collect(),
        }
    }

    fn count(&self, predicate: &dyn Fn(&Shape) -> bool) -> usize {
        usize::from(predicate(self))
            + self
                .children()
                .iter()
                .map(|c| c.count(predicate))
                .sum::<usize>()
    }

    pub fn has_lookaround(&self) -> bool {
        self.count(&|s: &Shape| matches!(s, Shape::Look(..))) > 0
    }

    /// An upper bound of the shortest input needed to take any path through
    /// the shape once, with every loop entered at most once.
    pub fn path_bound(&self) -> usize {
        let chars = self.count(&|s: &Shape| matches!(s, Shape::Char(_)));
        let captured = self.count(&|s: &Shape| match s {
            Shape::Capture(inner) => inner.count(&|s: &Shape| matches!(s, Shape::Char(_))) > 0,
            _ => false,
        });
        let references = self.count(&|s: &Shape| matches!(s, Shape::Reference));
        chars + if captured > 0 { references * chars } else { 0 }
    }
}

pub fn arbitrary_shape(g: &mut quickcheck::Gen, depth: u32) -> Shape {
    use quickcheck::Arbitrary;

    let choice = if depth == 0 { 0 } else { u8::arbitrary(g) % 9 };
    let inner = |g: &mut quickcheck::Gen| Box::new(arbitrary_shape(g, depth - 1));
    let many = |g: &mut quickcheck::Gen| {
        (0..=usize::from(u8::arbitrary(g) % 3))
            .map(|_| arbitrary_shape(g, depth - 1))
            .collect()
    };
    match choice {
        1 => Shape::Star(inner(g)),
        2 => Shape::Optional(inner(g)),
        3 => Shape::Never(inner(g)),
        4 => Shape::Seq(many(g)),
        5 => Shape::Alt(many(g)),
        6 => Shape::Look(bool::arbitrary(g), inner(g)),
        7 => Shape::Capture(inner(g)),
        8 => Shape::Reference,
        _ => Shape::Char(u8::arbitrary(g) % 3),
    }
}

impl quickcheck::Arbitrary for Shape {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        arbitrary_shape(g, 3)
    }
}

/// Builds `shape` as an element, recording every element created.
pub fn build_shape(b: &mut PatternBuilder, shape: &Shape, ids: &mut Vec<NodeId>) -> NodeId {
    let wrap = |b: &mut PatternBuilder, inner: &Shape, ids: &mut Vec<NodeId>| {
        let element = build_shape(b, inner, ids);
        let alt = b.alternative([element]);
        b.group([alt])
    };
    let id = match shape {
        Shape::Char(c) => b.char(char::from(b'a' + c)),
        Shape::Star(inner) => {
            let group = wrap(b, inner, ids);
            b.star(group)
        }
        Shape::Optional(inner) => {
            let group = wrap(b, inner, ids);
            b.optional(group)
        }
        Shape::Never(inner) => {
            let group = wrap(b, inner, ids);
            b.quantifier(group, 0, LenBound::Finite(0), true).unwrap()
        }
        Shape::Seq(items) => {
            let elements: Vec<_> = items.iter().map(|s| build_shape(b, s, ids)).collect();
            let alt = b.alternative(elements);
            b.group([alt])
        }
        Shape::Alt(items) => {
            let alternatives: Vec<_> = items
                .iter()
                .map(|s| {
                    let element = build_shape(b, s, ids);
                    b.alternative([element])
                })
                .collect();
            b.group(alternatives)
        }
        Shape::Look(negate, inner) => {
            let element = build_shape(b, inner, ids);
            let alt = b.alternative([element]);
            b.lookahead(*negate, [alt])
        }
        Shape::Capture(inner) => {
            let element = build_shape(b, inner, ids);
            let alt = b.alternative([element]);
            b.capturing_group([alt])
        }
        Shape::Reference => b.backreference(1),
    };
    ids.push(id);
    id
}

/// Every word over `alphabet` with at most `max_len` letters.
pub fn words(alphabet: &[u8], max_len: usize) -> Vec<Vec<u8>> {
    let mut all = vec![Vec::new()];
    let mut last = vec![Vec::new()];
    for _ in 0..max_len {
        let next: Vec<Vec<u8>> = last
            .iter()
            .flat_map(|word: &Vec<u8>| {
                alphabet.iter().map(move |&c| {
                    let mut next = word.clone();
                    next.push(c);
                    next
                })
            })
            .collect();
        all.extend(next.iter().cloned());
        last = next;
    }
    all
}

/// Capture spans by group index; index 0 is unused.
type Captures = Vec<Option<(usize, usize)>>;

type Accept<'k> = &'k mut dyn FnMut(usize, Captures) -> bool;

/// A backtracking matcher with ECMAScript semantics for lookaheads,
/// capture resets in loops, and the empty iteration check.
struct Matcher<'a> {
    pattern: &'a Pattern,
    input: &'a [u8],
    flags: Flags,
}

impl Matcher<'_> {
    /// Matches `id` at `pos` and calls `accept` for every way it can end,
    /// in backtracking order, until `accept` returns `true`.
    fn run(&self, id: NodeId, pos: usize, caps: Captures, accept: Accept<'_>) -> bool {
        match self.pattern.node(id) {
            Node::Pattern { alternatives } | Node::Group { alternatives } => {
                self.alternatives(alternatives, pos, caps, accept)
            }
            Node::CapturingGroup {
                index,
                alternatives,
                ..
            } => {
                let index = *index as usize;
                self.alternatives(alternatives, pos, caps, &mut |end: usize, mut caps: Captures| {
                    caps[index] = Some((pos, end));
                    accept(end, caps)
                })
            }
            Node::Alternative { elements } => self.sequence(elements, pos, caps, accept),
            Node::Character(_) | Node::CharacterClass { .. } | Node::CharacterSet(_) => {
                let set = char_set_of_element(self.pattern, id, &self.flags);
                match self.input.get(pos) {
                    Some(&c) if set.has(u32::from(c)) => accept(pos + 1, caps),
                    _ => false,
                }
            }
            Node::Quantifier(q) => self.repeat(q, 0, pos, caps, accept),
            Node::Backreference { group } => {
                let Node::CapturingGroup { index, .. } = self.pattern.node(*group) else {
                    panic!("backreference to a non-capturing node");
                };
                match caps[*index as usize] {
                    None => accept(pos, caps),
                    Some((start, end)) => {
                        let captured = &self.input[start..end];
                        if self.input[pos..].starts_with(captured) {
                            accept(pos + captured.len(), caps)
                        } else {
                            false
                        }
                    }
                }
            }
            Node::Assertion(assertion) => self.assertion(assertion, pos, caps, accept),
            Node::CharacterClassRange { .. } => panic!("a class range is not an element"),
        }
    }

    fn alternatives(
        &self,
        alternatives: &[NodeId],
        pos: usize,
        caps: Captures,
        accept: Accept<'_>,
    ) -> bool {
        for &alt in alternatives {
            if self.run(alt, pos, caps.clone(), accept) {
                return true;
            }
        }
        false
    }

    fn sequence(
        &self,
        elements: &[NodeId],
        pos: usize,
        caps: Captures,
        accept: Accept<'_>,
    ) -> bool {
        match elements.split_first() {
            None => accept(pos, caps),
            Some((&first, rest)) => self.run(first, pos, caps, &mut |end: usize, caps: Captures| {
                self.sequence(rest, end, caps, accept)
            }),
        }
    }

    fn repeat(
        &self,
        q: &Quantifier,
        count: u32,
        pos: usize,
        caps: Captures,
        accept: Accept<'_>,
    ) -> bool {
        if count < q.min {
            return self.iterate(q, count, pos, caps, accept);
        }
        let more = q.max > count;
        if q.greedy {
            (more && self.iterate(q, count, pos, caps.clone(), accept)) || accept(pos, caps)
        } else {
            accept(pos, caps.clone()) || (more && self.iterate(q, count, pos, caps, accept))
        }
    }

    fn iterate(
        &self,
        q: &Quantifier,
        count: u32,
        pos: usize,
        mut caps: Captures,
        accept: Accept<'_>,
    ) -> bool {
        self.clear_captures(q.element, &mut caps);
        self.run(q.element, pos, caps, &mut |end: usize, caps: Captures| {
            // Optional iterations must consume something.
            if count >= q.min && end == pos {
                return false;
            }
            self.repeat(q, count + 1, end, caps, accept)
        })
    }

    fn clear_captures(&self, id: NodeId, caps: &mut Captures) {
        let node = self.pattern.node(id);
        if let Node::CapturingGroup { index, .. } = node {
            caps[*index as usize] = None;
        }
        for &child in node.children() {
            self.clear_captures(child, caps);
        }
    }

    fn assertion(
        &self,
        assertion: &Assertion,
        pos: usize,
        caps: Captures,
        accept: Accept<'_>,
    ) -> bool {
        let holds = match assertion {
            Assertion::Start => pos == 0,
            Assertion::End => pos == self.input.len(),
            Assertion::WordBoundary { negate } => {
                let is_word = |i: usize| {
                    self.input
                        .get(i)
                        .is_some_and(|&c| c.is_ascii_alphanumeric() || c == b'_')
                };
                let boundary = (pos > 0 && is_word(pos - 1)) != is_word(pos);
                boundary != *negate
            }
            Assertion::Lookaround {
                kind: LookaroundKind::Lookahead,
                negate,
                alternatives,
            } => {
                // The first match wins; its captures are kept.
                let mut found = None;
                let mut first = |_: usize, inner: Captures| {
                    found = Some(inner);
                    true
                };
                self.alternatives(alternatives, pos, caps.clone(), &mut first);
                return match (found, *negate) {
                    (Some(inner), false) => accept(pos, inner),
                    (None, true) => accept(pos, caps),
                    _ => false,
                };
            }
            Assertion::Lookaround { .. } => unimplemented!("lookbehind"),
        };
        holds && accept(pos, caps)
    }
}

/// The ends of every match of `pattern` that starts at the beginning of
/// `input`.
pub fn match_ends(pattern: &Pattern, input: &[u8]) -> Vec<usize> {
    let matcher = Matcher {
        pattern,
        input,
        flags: Flags::default(),
    };
    let mut ends = Vec::new();
    let caps = vec![None; pattern.capture_count() + 1];
    matcher.run(pattern.root(), 0, caps, &mut |end: usize, _: Captures| {
        if !ends.contains(&end) {
            ends.push(end);
        }
        false
    });
    ends
}

/// Returns `true` if `pattern` matches all of `input`.
pub fn accepts(pattern: &Pattern, input: &[u8]) -> bool {
    match_ends(pattern, input).contains(&input.len())
}
