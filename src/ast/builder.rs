use super::{
    Assertion, Character, CharacterSetKind, LenBound, LookaroundKind, Node, NodeData, NodeId,
    Pattern, Quantifier, UnicodeProperty,
};
use crate::{Error, Result, charset::CharRange, charset::predefined};
use std::ops::Range;

/// Builds a [`Pattern`] bottom-up.
///
/// Children are created first and then handed to their parent; capture
/// indices, backreference targets, parent links, and source spans are filled
/// in by [`PatternBuilder::finish`].
///
/// ```
/// use regex_analysis::PatternBuilder;
///
/// // (a)?\1
/// let mut b = PatternBuilder::new();
/// let a = b.seq("a");
/// let group = b.capturing_group([a]);
/// let optional = b.optional(group);
/// let reference = b.backreference(1);
/// let top = b.alternative([optional, reference]);
/// let pattern = b.finish([top]).unwrap();
/// assert_eq!(pattern.source(), r"(a)?\1");
/// ```
#[derive(Debug, Default)]
pub struct PatternBuilder {
    nodes: Vec<Node>,
    references: Vec<(NodeId, GroupRef)>,
}

#[derive(Debug)]
enum GroupRef {
    Index(u32),
    Name(String),
}

impl PatternBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or_else(|_| {
            panic!("a pattern cannot have more than {} nodes", u32::MAX)
        }));
        self.nodes.push(node);
        id
    }

    pub fn char(&mut self, c: char) -> NodeId {
        self.push(Node::Character(Character::new(u32::from(c))))
    }

    /// A character with an explicit surface form, e.g. `(0x41, r"\x41")`.
    pub fn code_point(&mut self, value: u32, raw: impl Into<String>) -> NodeId {
        self.push(Node::Character(Character {
            value,
            raw: raw.into(),
        }))
    }

    /// One character node per character of `text`.
    pub fn literal(&mut self, text: &str) -> Vec<NodeId> {
        text.chars().map(|c| self.char(c)).collect()
    }

    /// An alternative matching `text` literally.
    pub fn seq(&mut self, text: &str) -> NodeId {
        let elements = self.literal(text);
        self.alternative(elements)
    }

    pub fn any(&mut self) -> NodeId {
        self.push(Node::CharacterSet(CharacterSetKind::Any))
    }

    pub fn digit(&mut self, negate: bool) -> NodeId {
        self.push(Node::CharacterSet(CharacterSetKind::Digit { negate }))
    }

    pub fn space(&mut self, negate: bool) -> NodeId {
        self.push(Node::CharacterSet(CharacterSetKind::Space { negate }))
    }

    pub fn word(&mut self, negate: bool) -> NodeId {
        self.push(Node::CharacterSet(CharacterSetKind::Word { negate }))
    }

    /// `\p{key=value}`, `\p{key}`, or their negated `\P` forms.
    ///
    /// # Errors
    ///
    /// If the property is unknown, an [`Error`] is returned.
    pub fn property(&mut self, key: &str, value: Option<&str>, negate: bool) -> Result<NodeId> {
        let ranges = predefined::resolve_property(key, value)?;
        Ok(self.push(Node::CharacterSet(CharacterSetKind::Property(
            UnicodeProperty {
                key: key.to_owned(),
                value: value.map(str::to_owned),
                negate,
                ranges,
            },
        ))))
    }

    /// A class range `min-max`.
    ///
    /// # Errors
    ///
    /// If `min > max`, an [`Error`] is returned.
    pub fn range(&mut self, min: char, max: char) -> Result<NodeId> {
        let range = CharRange::new(u32::from(min), u32::from(max))?;
        Ok(self.push(Node::CharacterClassRange {
            min: Character::new(range.min),
            max: Character::new(range.max),
        }))
    }

    pub fn class(&mut self, negate: bool, elements: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.push(Node::CharacterClass {
            negate,
            elements: elements.into_iter().collect(),
        })
    }

    pub fn alternative(&mut self, elements: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.push(Node::Alternative {
            elements: elements.into_iter().collect(),
        })
    }

    pub fn group(&mut self, alternatives: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.push(Node::Group {
            alternatives: alternatives.into_iter().collect(),
        })
    }

    pub fn capturing_group(&mut self, alternatives: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.push(Node::CapturingGroup {
            index: 0,
            name: None,
            alternatives: alternatives.into_iter().collect(),
        })
    }

    pub fn named_group(
        &mut self,
        name: &str,
        alternatives: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        self.push(Node::CapturingGroup {
            index: 0,
            name: Some(name.to_owned()),
            alternatives: alternatives.into_iter().collect(),
        })
    }

    /// # Errors
    ///
    /// If `min` exceeds `max`, an [`Error`] is returned.
    pub fn quantifier(
        &mut self,
        element: NodeId,
        min: u32,
        max: LenBound,
        greedy: bool,
    ) -> Result<NodeId> {
        if max < min {
            return Err(Error::InvalidQuantifier { min, max });
        }
        Ok(self.push(Node::Quantifier(Quantifier {
            min,
            max,
            greedy,
            element,
        })))
    }

    pub fn star(&mut self, element: NodeId) -> NodeId {
        self.repeat(element, 0, LenBound::Infinite)
    }

    pub fn plus(&mut self, element: NodeId) -> NodeId {
        self.repeat(element, 1, LenBound::Infinite)
    }

    pub fn optional(&mut self, element: NodeId) -> NodeId {
        self.repeat(element, 0, LenBound::Finite(1))
    }

    fn repeat(&mut self, element: NodeId, min: u32, max: LenBound) -> NodeId {
        self.push(Node::Quantifier(Quantifier {
            min,
            max,
            greedy: true,
            element,
        }))
    }

    /// `\index`. The group is resolved by [`PatternBuilder::finish`].
    pub fn backreference(&mut self, index: u32) -> NodeId {
        let id = self.push(Node::Backreference { group: NodeId(0) });
        self.references.push((id, GroupRef::Index(index)));
        id
    }

    /// `\k<name>`. The group is resolved by [`PatternBuilder::finish`].
    pub fn named_backreference(&mut self, name: &str) -> NodeId {
        let id = self.push(Node::Backreference { group: NodeId(0) });
        self.references.push((id, GroupRef::Name(name.to_owned())));
        id
    }

    pub fn start(&mut self) -> NodeId {
        self.push(Node::Assertion(Assertion::Start))
    }

    pub fn end(&mut self) -> NodeId {
        self.push(Node::Assertion(Assertion::End))
    }

    pub fn word_boundary(&mut self, negate: bool) -> NodeId {
        self.push(Node::Assertion(Assertion::WordBoundary { negate }))
    }

    pub fn lookahead(
        &mut self,
        negate: bool,
        alternatives: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        self.lookaround(LookaroundKind::Lookahead, negate, alternatives)
    }

    pub fn lookbehind(
        &mut self,
        negate: bool,
        alternatives: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        self.lookaround(LookaroundKind::Lookbehind, negate, alternatives)
    }

    fn lookaround(
        &mut self,
        kind: LookaroundKind,
        negate: bool,
        alternatives: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        self.push(Node::Assertion(Assertion::Lookaround {
            kind,
            negate,
            alternatives: alternatives.into_iter().collect(),
        }))
    }

    /// Creates the root from the top-level alternatives and checks the tree.
    ///
    /// # Errors
    ///
    /// If a node is attached twice or never, a node appears where its kind
    /// is not allowed, or a backreference has no target group, an [`Error`]
    /// is returned.
    pub fn finish(mut self, alternatives: impl IntoIterator<Item = NodeId>) -> Result<Pattern> {
        let root = self.push(Node::Pattern {
            alternatives: alternatives.into_iter().collect(),
        });

        let mut parents = vec![None; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        let mut groups = Vec::new();

        // Pre-order in source order, so capture indices follow the opening
        // parentheses.
        visited[root.index()] = true;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let parent = &self.nodes[id.index()];
            if parent.alternatives().is_some_and(<[NodeId]>::is_empty) {
                return Err(Error::MissingAlternatives {
                    kind: parent.kind_name(),
                });
            }
            for &child in parent.children() {
                let Some(node) = self.nodes.get(child.index()) else {
                    return Err(Error::DetachedNode { index: child.index() });
                };
                if visited[child.index()] {
                    return Err(Error::NodeReused { index: child.index() });
                }
                check_child(parent, node)?;
                visited[child.index()] = true;
                parents[child.index()] = Some(id);
            }
            stack.extend(parent.children().iter().rev());

            if let Node::CapturingGroup { .. } = parent {
                groups.push(id);
            }
        }

        if let Some(index) = visited.iter().position(|v| !v) {
            return Err(Error::DetachedNode { index });
        }

        for (position, &id) in groups.iter().enumerate() {
            if let Node::CapturingGroup { index, .. } = &mut self.nodes[id.index()] {
                *index = u32::try_from(position + 1).unwrap_or(u32::MAX);
            }
        }

        for (id, target) in std::mem::take(&mut self.references) {
            let group = match &target {
                GroupRef::Index(index) => usize::try_from(*index)
                    .ok()
                    .and_then(|i| i.checked_sub(1))
                    .and_then(|i| groups.get(i).copied())
                    .ok_or(Error::UnresolvedBackreference(*index))?,
                GroupRef::Name(name) => groups
                    .iter()
                    .copied()
                    .find(|g| {
                        matches!(&self.nodes[g.index()],
                            Node::CapturingGroup { name: Some(n), .. } if n == name)
                    })
                    .ok_or_else(|| Error::UnknownGroupName(name.clone()))?,
            };
            self.nodes[id.index()] = Node::Backreference { group };
        }

        let mut source = String::new();
        let mut spans = vec![0..0; self.nodes.len()];
        render(&self.nodes, root, &mut source, &mut spans);

        let nodes = self
            .nodes
            .into_iter()
            .zip(parents)
            .zip(spans)
            .map(|((node, parent), span)| NodeData { node, parent, span })
            .collect();

        Ok(Pattern::new(nodes, root, groups, source))
    }
}

fn check_child(parent: &Node, child: &Node) -> Result<()> {
    let allowed = match parent {
        Node::Pattern { .. }
        | Node::Group { .. }
        | Node::CapturingGroup { .. }
        | Node::Assertion(Assertion::Lookaround { .. }) => {
            matches!(child, Node::Alternative { .. })
        }
        Node::Alternative { .. } => child.is_element(),
        Node::Quantifier(_) => match child {
            Node::Assertion(Assertion::Lookaround { kind, .. }) => {
                *kind == LookaroundKind::Lookahead
            }
            Node::Assertion(_) | Node::Quantifier(_) => false,
            other => other.is_element(),
        },
        Node::CharacterClass { .. } => matches!(
            child,
            Node::Character(_)
                | Node::CharacterClassRange { .. }
                | Node::CharacterSet(
                    CharacterSetKind::Digit { .. }
                        | CharacterSetKind::Space { .. }
                        | CharacterSetKind::Word { .. }
                        | CharacterSetKind::Property(_)
                )
        ),
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(Error::UnexpectedNode {
            kind: child.kind_name(),
            parent: parent.kind_name(),
        })
    }
}

fn render(nodes: &[Node], id: NodeId, out: &mut String, spans: &mut [Range<usize>]) {
    let start = out.len();
    let alternatives = |out: &mut String, spans: &mut [Range<usize>], alts: &[NodeId]| {
        for (i, &alt) in alts.iter().enumerate() {
            if i > 0 {
                out.push('|');
            }
            render(nodes, alt, out, spans);
        }
    };

    match &nodes[id.index()] {
        Node::Pattern { alternatives: alts } => alternatives(out, spans, alts),
        Node::Alternative { elements } => {
            for &element in elements {
                render(nodes, element, out, spans);
            }
        }
        Node::Group { alternatives: alts } => {
            out.push_str("(?:");
            alternatives(out, spans, alts);
            out.push(')');
        }
        Node::CapturingGroup {
            name,
            alternatives: alts,
            ..
        } => {
            match name {
                Some(name) => {
                    out.push_str("(?<");
                    out.push_str(name);
                    out.push('>');
                }
                None => out.push('('),
            }
            alternatives(out, spans, alts);
            out.push(')');
        }
        Node::Quantifier(q) => {
            render(nodes, q.element, out, spans);
            out.push_str(&q.suffix());
        }
        Node::Character(c) => out.push_str(&c.raw),
        Node::CharacterClass { negate, elements } => {
            out.push_str(if *negate { "[^" } else { "[" });
            for &element in elements {
                render(nodes, element, out, spans);
            }
            out.push(']');
        }
        Node::CharacterClassRange { min, max } => {
            out.push_str(&min.raw);
            out.push('-');
            out.push_str(&max.raw);
        }
        Node::CharacterSet(kind) => match kind {
            CharacterSetKind::Any => out.push('.'),
            CharacterSetKind::Digit { negate } => out.push_str(if *negate { r"\D" } else { r"\d" }),
            CharacterSetKind::Space { negate } => out.push_str(if *negate { r"\S" } else { r"\s" }),
            CharacterSetKind::Word { negate } => out.push_str(if *negate { r"\W" } else { r"\w" }),
            CharacterSetKind::Property(p) => {
                out.push_str(if p.negate { r"\P{" } else { r"\p{" });
                out.push_str(&p.key);
                if let Some(value) = &p.value {
                    out.push('=');
                    out.push_str(value);
                }
                out.push('}');
            }
        },
        Node::Backreference { group } => match &nodes[group.index()] {
            Node::CapturingGroup {
                name: Some(name), ..
            } => {
                out.push_str(r"\k<");
                out.push_str(name);
                out.push('>');
            }
            Node::CapturingGroup { index, .. } => {
                out.push('\\');
                out.push_str(&index.to_string());
            }
            other => unreachable!("backreference resolved to a {}", other.kind_name()),
        },
        Node::Assertion(assertion) => match assertion {
            Assertion::Start => out.push('^'),
            Assertion::End => out.push('$'),
            Assertion::WordBoundary { negate } => {
                out.push_str(if *negate { r"\B" } else { r"\b" });
            }
            Assertion::Lookaround {
                kind,
                negate,
                alternatives: alts,
            } => {
                out.push_str(match (kind, negate) {
                    (LookaroundKind::Lookahead, false) => "(?=",
                    (LookaroundKind::Lookahead, true) => "(?!",
                    (LookaroundKind::Lookbehind, false) => "(?<=",
                    (LookaroundKind::Lookbehind, true) => "(?<!",
                });
                alternatives(out, spans, alts);
                out.push(')');
            }
        },
    }

    spans[id.index()] = start..out.len();
}
