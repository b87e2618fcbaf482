//! Arena-backed syntax tree and the incremental builder used while matching.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. The parent
//! link is a plain index used for navigation; ownership is the arena's.
//!
//! # Building
//!
//! [`AstBuilder`] keeps a single "current node" cursor. Opening a node
//! appends it as the last child of the current node and descends into it;
//! committing or discarding moves back up to the parent. While a node is
//! open every node allocated after it is one of its descendants, so
//! discarding is a truncation of the arena to the node's index.
//!
//! [`AstBuilder::checkpoint`] / [`AstBuilder::rollback`] undo everything a
//! failed attempt built, including nodes it already committed. They are the
//! tree half of a parser snapshot and are always paired with a cursor
//! restore.
//!
//! # Contract Violations
//!
//! Committing or discarding with no open node, or finishing with a node
//! still open, is a bug in a combinator rather than bad input. These panic.

use std::fmt::{self, Write as _};

use smallvec::SmallVec;

use crate::span::Span;

/// Label of the implicit root node.
pub const ROOT_LABEL: &str = "ast";

/// Index into the node arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node, always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        NodeId(u32::try_from(index).unwrap_or_else(|_| panic!("node arena exceeds u32::MAX")))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// One labeled node of the syntax tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node {
    label: &'static str,
    span: Span,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl Node {
    fn new(label: &'static str, start: u32, parent: Option<NodeId>) -> Self {
        Node {
            label,
            span: Span::point(start),
            parent,
            children: SmallVec::new(),
        }
    }

    /// The grammar construct that produced this node.
    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Source range matched by this node.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Parent node, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in source order.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The matched substring of `source`.
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        source.get(self.span.to_range()).unwrap_or_default()
    }
}

/// Saved builder state, produced by [`AstBuilder::checkpoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeMark {
    len: u32,
    current: NodeId,
    child_count: u32,
}

/// Incremental tree construction with exact undo.
#[derive(Clone, Debug)]
pub struct AstBuilder {
    nodes: Vec<Node>,
    current: NodeId,
}

impl AstBuilder {
    /// Create a builder whose root node is open at offset 0.
    pub fn new() -> Self {
        AstBuilder {
            nodes: vec![Node::new(ROOT_LABEL, 0, None)],
            current: NodeId::ROOT,
        }
    }

    /// The active insertion point.
    #[inline]
    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Returns `true` if any node other than the root is open.
    #[inline]
    pub fn has_open_node(&self) -> bool {
        self.current != NodeId::ROOT
    }

    /// Number of nodes allocated, provisional ones included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Open a provisional node as the last child of the current node and
    /// make it current.
    pub fn open_node(&mut self, label: &'static str, start: u32) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node::new(label, start, Some(self.current)));
        self.nodes[self.current.index()].children.push(id);
        self.current = id;
        id
    }

    /// Fix the current node's end offset and move back to its parent.
    ///
    /// # Panics
    ///
    /// Panics if no node is open.
    pub fn commit_node(&mut self, end: u32) {
        let node = &mut self.nodes[self.current.index()];
        let Some(parent) = node.parent else {
            panic!("commit_node called with no open node");
        };
        debug_assert!(
            node.span.start <= end,
            "node `{}` would end at {end} before its start {}",
            node.label,
            node.span.start
        );
        node.span.end = end;
        self.current = parent;
    }

    /// Drop the current node and its whole subtree, then move back to its
    /// parent. The parent's other children are untouched.
    ///
    /// # Panics
    ///
    /// Panics if no node is open.
    pub fn discard_node(&mut self) {
        let id = self.current;
        let Some(parent) = self.nodes[id.index()].parent else {
            panic!("discard_node called with no open node");
        };
        self.nodes.truncate(id.index());
        let popped = self.nodes[parent.index()].children.pop();
        debug_assert_eq!(popped, Some(id), "open node was not its parent's last child");
        self.current = parent;
    }

    /// Save the builder state before a speculative attempt.
    pub fn checkpoint(&self) -> TreeMark {
        TreeMark {
            len: to_u32(self.nodes.len()),
            current: self.current,
            child_count: to_u32(self.nodes[self.current.index()].children.len()),
        }
    }

    /// Undo everything built since `mark`, committed nodes included.
    ///
    /// # Panics
    ///
    /// Panics if a node opened after `mark` is still open.
    pub fn rollback(&mut self, mark: TreeMark) {
        assert_eq!(
            self.current, mark.current,
            "rollback with a node still open since the checkpoint"
        );
        self.nodes.truncate(mark.len as usize);
        self.nodes[mark.current.index()]
            .children
            .truncate(mark.child_count as usize);
    }

    /// Commit the root at `end` and return the finished tree.
    ///
    /// # Panics
    ///
    /// Panics if any non-root node is still open.
    pub fn finish(mut self, end: u32) -> Ast {
        assert!(
            !self.has_open_node(),
            "parse finished with node `{}` still open",
            self.nodes[self.current.index()].label
        );
        self.nodes[NodeId::ROOT.index()].span.end = end;
        Ast { nodes: self.nodes }
    }
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A finished syntax tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    /// The root node's id.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// The root node.
    #[inline]
    pub fn root_node(&self) -> &Node {
        self.get(NodeId::ROOT)
    }

    /// Look up a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Children of `id` in source order.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).children()
    }

    /// Labels of the children of `id`, in order.
    pub fn child_labels(&self, id: NodeId) -> Vec<&'static str> {
        self.children(id)
            .iter()
            .map(|&child| self.get(child).label())
            .collect()
    }

    /// The substring of `source` matched by `id`.
    pub fn text<'src>(&self, id: NodeId, source: &'src str) -> &'src str {
        self.get(id).text(source)
    }

    /// Total number of nodes, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in arena order (a parent always precedes its children).
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId::from_index(index), node))
    }

    /// Pre-order walk of `id` and its descendants.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            ast: self,
            stack: vec![id],
        }
    }

    /// Number of nodes on the longest downward path from `id`, counting
    /// `id` itself.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(id, 1)];
        while let Some((id, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(self.children(id).iter().map(|&child| (child, level + 1)));
        }
        deepest
    }

    /// Indented outline of the tree, one node per line.
    ///
    /// Leaf nodes also show the text they matched.
    pub fn dump(&self, source: &str) -> String {
        let mut out = String::new();
        let mut stack = vec![(NodeId::ROOT, 0)];
        while let Some((id, indent)) = stack.pop() {
            let node = self.get(id);
            let _ = write!(out, "{:indent$}{} {}", "", node.label, node.span, indent = indent * 2);
            if node.children.is_empty() {
                let _ = write!(out, " {:?}", node.text(source));
            }
            out.push('\n');
            stack.extend(node.children.iter().rev().map(|&child| (child, indent + 1)));
        }
        out
    }
}

/// Pre-order iterator returned by [`Ast::descendants`].
pub struct Descendants<'a> {
    ast: &'a Ast,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.ast.children(id).iter().rev().copied());
        Some(id)
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
