//! # Document Tree
//!
//! An n-ary tree of nodes stored in a single arena and addressed by
//! `NodeId`. Each node optionally wraps a `Block` (the synthetic root wraps
//! none), owns an ordered list of children and records its parent.
//!
//! The tree also keeps the open-node stack used while scanning:
//! `stack[0]` is always the root and the last entry is the active node.
//!
//! ## Modules
//!
//! - **`iter`**: explicit-stack pre-order and post-order traversals
//! - **`structure`**: the diagnostic `render_structure()` dump
//!
//! ## Sources
//!
//! Blocks index into source buffers owned by the tree. A parse starts with
//! one source; splicing an included file's tree adds that file's buffer, so
//! every block keeps pointing at the text it was recognized in.

pub mod iter;
pub mod structure;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::blocks::Block;

pub use iter::{Postorder, Preorder};

/// Handle of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a source buffer inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(usize);

impl SourceId {
    /// The buffer the tree was created from.
    pub const MAIN: SourceId = SourceId(0);
}

/// A text buffer blocks point into, with the file it came from if any.
#[derive(Debug, Clone)]
pub struct Source {
    pub path: Option<PathBuf>,
    pub text: Arc<str>,
}

#[derive(Debug, Clone)]
pub struct Node {
    block: Option<Block>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Children were replaced by an interpreted include.
    spliced: bool,
}

impl Node {
    fn new(block: Option<Block>, parent: Option<NodeId>) -> Self {
        Self {
            block,
            parent,
            children: Vec::new(),
            spliced: false,
        }
    }

    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_childless(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_spliced(&self) -> bool {
        self.spliced
    }
}

#[derive(Debug, Clone)]
pub struct DocumentTree {
    sources: Vec<Source>,
    nodes: Vec<Node>,
    stack: Vec<NodeId>,
}

impl DocumentTree {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self::from_source(Source {
            path: None,
            text: text.into(),
        })
    }

    pub fn from_source(source: Source) -> Self {
        Self {
            sources: vec![source],
            nodes: vec![Node::new(None, None)],
            stack: vec![NodeId(0)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn block(&self, id: NodeId) -> Option<&Block> {
        self.node(id).block()
    }

    pub fn source(&self, id: SourceId) -> &Source {
        &self.sources[id.0]
    }

    /// The text the tree was created from.
    pub fn text(&self) -> &str {
        &self.sources[SourceId::MAIN.0].text
    }

    pub fn path(&self) -> Option<&Path> {
        self.sources[SourceId::MAIN.0].path.as_deref()
    }

    /// The buffer `block` was recognized in.
    pub fn text_of(&self, block: &Block) -> &str {
        &self.sources[block.source().0].text
    }

    /// The open-node stack, root first.
    pub fn open_nodes(&self) -> &[NodeId] {
        &self.stack
    }

    /// The innermost open node, or `None` when only the root is open.
    pub fn active(&self) -> Option<NodeId> {
        match self.stack.as_slice() {
            [_root] => None,
            [.., last] => Some(*last),
            [] => None,
        }
    }

    pub fn active_block(&self) -> Option<&Block> {
        self.active().and_then(|id| self.block(id))
    }

    /// Attaches `block` as the last child of the active node (or the root)
    /// and makes it the active node.
    pub fn push(&mut self, block: Block) -> NodeId {
        let parent = self.stack[self.stack.len() - 1];
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(Some(block), Some(parent)));
        self.nodes[parent.0].children.push(id);
        self.stack.push(id);
        id
    }

    /// Pops the active node and records its end: a close marker of
    /// `marker_len` bytes starting at `at`. Returns `None` if only the root
    /// is open.
    pub fn close(&mut self, at: usize, marker_len: usize) -> Option<NodeId> {
        if self.stack.len() <= 1 {
            return None;
        }
        let id = self.stack.pop()?;
        if let Some(block) = self.nodes[id.0].block.as_mut() {
            block.finish(at, marker_len);
        }
        Some(id)
    }

    /// Force-closes every open node at the end of the main text, in stack
    /// order. Stops at the first node that may not be closed by EOF and
    /// returns it; that node and everything inside it stay open.
    pub fn close_at_eof(&mut self) -> Result<(), NodeId> {
        let end = self.text().len();
        while self.stack.len() > 1 {
            let id = self.stack[1];
            let closeable = self.nodes[id.0]
                .block
                .as_ref()
                .is_some_and(|b| b.block_type().flags().closeable_by_eof);
            if !closeable {
                return Err(id);
            }
            if let Some(block) = self.nodes[id.0].block.as_mut() {
                block.finish(end, 0);
            }
            self.stack.remove(1);
        }
        Ok(())
    }

    /// Renders the whole document.
    pub fn render(&self) -> String {
        self.render_node(self.root())
    }

    /// Post-order composition: a leaf renders as `process(None)`, an
    /// interior node as `process(children)`, the root as its children.
    ///
    /// Walks the subtree with `Postorder`, keeping the rendered children of
    /// each open level in `levels`, so nesting depth does not grow the call
    /// stack.
    pub fn render_node(&self, id: NodeId) -> String {
        let mut levels: Vec<Vec<String>> = vec![Vec::new()];
        for (node, depth) in Postorder::new(self, id) {
            if levels.len() < depth + 2 {
                levels.resize_with(depth + 2, Vec::new);
            }
            let children = std::mem::take(&mut levels[depth + 1]).concat();
            let rendered = self.compose(node, children);
            levels[depth].push(rendered);
        }
        levels.swap_remove(0).concat()
    }

    /// Concatenated renders of a node's children.
    pub fn render_children(&self, id: NodeId) -> String {
        self.node(id)
            .children
            .iter()
            .map(|&child| self.render_node(child))
            .collect()
    }

    /// Renders one node given its children's concatenated renders.
    fn compose(&self, id: NodeId, children: String) -> String {
        let node = self.node(id);
        let Some(block) = node.block() else {
            return children;
        };
        let text = self.text_of(block);
        if node.is_childless() && !node.spliced {
            block.process(text, None)
        } else {
            block.process(text, Some(&children))
        }
    }

    /// The text inside a block: its children's renders, or the source
    /// between its markers when it has none.
    pub fn inner_text(&self, id: NodeId) -> String {
        let node = self.node(id);
        match node.block() {
            Some(block) if node.is_childless() => block
                .body_span()
                .map(|span| span.slice(self.text_of(block)).to_string())
                .unwrap_or_default(),
            _ => self.render_children(id),
        }
    }

    /// Replaces the children of `target` with the root children of
    /// `subtree`. The subtree's nodes and sources are moved into this tree;
    /// its synthetic root is dropped.
    pub fn splice(&mut self, target: NodeId, subtree: DocumentTree) {
        let node_offset = self.nodes.len();
        let source_offset = self.sources.len();
        let sub_root = subtree.root();
        // Sub-node `i` (i >= 1) lands at `node_offset + i - 1`.
        let remap = |id: NodeId| NodeId(node_offset + id.0 - 1);

        let new_children: Vec<NodeId> = subtree
            .node(sub_root)
            .children
            .iter()
            .map(|&c| remap(c))
            .collect();

        self.sources.extend(subtree.sources);
        for mut node in subtree.nodes.into_iter().skip(1) {
            node.parent = match node.parent {
                Some(p) if p == sub_root => Some(target),
                Some(p) => Some(remap(p)),
                None => None,
            };
            for child in &mut node.children {
                *child = remap(*child);
            }
            if let Some(block) = node.block.as_mut() {
                block.set_source(SourceId(block.source().0 + source_offset));
            }
            self.nodes.push(node);
        }

        let old_children = std::mem::replace(&mut self.nodes[target.0].children, new_children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }
        self.nodes[target.0].spliced = true;
    }

    /// Depth-first pre-order traversal from the root.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::new(self, self.root())
    }

    /// Depth-first post-order traversal from the root.
    pub fn postorder(&self) -> Postorder<'_> {
        Postorder::new(self, self.root())
    }

    /// Nodes whose block has the given name, in pre-order.
    pub fn iter_matching<'a>(&'a self, name: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.preorder()
            .filter(move |&(id, _)| self.block(id).is_some_and(|b| b.name() == name))
            .map(|(id, _)| id)
    }
}
