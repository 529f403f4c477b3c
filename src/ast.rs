//! The pattern tree the analyses run on.

pub mod builder;
pub mod flags;
pub mod node;
pub mod quantifier;

pub use self::{
    builder::PatternBuilder,
    flags::Flags,
    node::{Assertion, Character, CharacterSetKind, LookaroundKind, Node, UnicodeProperty},
    quantifier::{LenBound, Quantifier},
};
use std::ops::Range;

/// The address of a node inside its [`Pattern`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub(crate) node: Node,
    pub(crate) parent: Option<NodeId>,
    pub(crate) span: Range<usize>,
}

/// An immutable regular expression tree.
///
/// Nodes live in an arena and own their children top-down; the parent of
/// every node except the root is recorded as a plain [`NodeId`]. Use
/// [`PatternBuilder`] to create one.
#[derive(Clone, Debug)]
pub struct Pattern {
    nodes: Vec<NodeData>,
    root: NodeId,
    groups: Vec<NodeId>,
    source: String,
}

impl Pattern {
    #[must_use]
    pub(crate) fn new(
        nodes: Vec<NodeData>,
        root: NodeId,
        groups: Vec<NodeId>,
        source: String,
    ) -> Self {
        Self {
            nodes,
            root,
            groups,
            source,
        }
    }

    /// The [`Node::Pattern`] node.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The number of nodes in the tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this pattern.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.data(id).node
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    /// The byte range of the node inside [`Pattern::source`].
    #[inline]
    #[must_use]
    pub fn span(&self, id: NodeId) -> Range<usize> {
        self.data(id).span.clone()
    }

    /// The source text of the node.
    #[must_use]
    pub fn raw(&self, id: NodeId) -> &str {
        &self.source[self.span(id)]
    }

    /// The source text of the whole pattern, without delimiters or flags.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The capturing group with the given 1-based index.
    #[must_use]
    pub fn capturing_group(&self, index: u32) -> Option<NodeId> {
        let index = usize::try_from(index).ok()?.checked_sub(1)?;
        self.groups.get(index).copied()
    }

    /// The capturing group with the given name.
    #[must_use]
    pub fn capturing_group_by_name(&self, name: &str) -> Option<NodeId> {
        self.groups.iter().copied().find(|&id| {
            matches!(self.node(id), Node::CapturingGroup { name: Some(n), .. } if n == name)
        })
    }

    /// The number of capturing groups.
    #[inline]
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.groups.len()
    }

    /// The alternatives of a pattern, group, or lookaround node.
    ///
    /// # Panics
    ///
    /// Panics if the node has no alternatives.
    #[must_use]
    pub fn alternatives_of(&self, id: NodeId) -> &[NodeId] {
        let node = self.node(id);
        node.alternatives()
            .unwrap_or_else(|| panic!("a {} has no alternatives", node.kind_name()))
    }

    /// The parent, grandparent, ... of `id`, up to and including the root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            pattern: self,
            next: self.parent(id),
        }
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `id`.
    #[must_use]
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// The deepest node that is `a`, `b`, or an ancestor of both.
    #[must_use]
    pub fn closest_common_ancestor(&self, a: NodeId, b: NodeId) -> NodeId {
        let path_a: Vec<_> = std::iter::once(a).chain(self.ancestors(a)).collect();
        std::iter::once(b)
            .chain(self.ancestors(b))
            .find(|n| path_a.contains(n))
            .unwrap_or(self.root)
    }

    /// Returns `true` if `id` or any node below it satisfies `predicate`.
    pub fn has_descendant(&self, id: NodeId, mut predicate: impl FnMut(&Node) -> bool) -> bool {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let node = self.node(next);
            if predicate(node) {
                return true;
            }
            stack.extend_from_slice(node.children());
        }
        false
    }

    /// The capturing group a backreference resolves to.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a backreference.
    #[must_use]
    pub fn resolved_group(&self, id: NodeId) -> NodeId {
        match self.node(id) {
            Node::Backreference { group } => *group,
            other => panic!("expected a backreference, got a {}", other.kind_name()),
        }
    }

    #[inline]
    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

/// An iterator over the ancestors of a node. See [`Pattern::ancestors`].
pub struct Ancestors<'a> {
    pattern: &'a Pattern,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.pattern.parent(current);
        Some(current)
    }
}
