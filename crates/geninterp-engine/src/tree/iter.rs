use super::{DocumentTree, NodeId};

/// Depth-first pre-order traversal yielding `(node, depth)`.
///
/// Driven by an explicit stack, so arbitrarily deep trees do not recurse.
/// Cloning the iterator, or asking the tree for a new one, restarts it.
#[derive(Clone)]
pub struct Preorder<'a> {
    tree: &'a DocumentTree,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Preorder<'a> {
    pub fn new(tree: &'a DocumentTree, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![(start, 0)],
        }
    }
}

impl Iterator for Preorder<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let children = self.tree.node(id).children();
        self.stack
            .extend(children.iter().rev().map(|&child| (child, depth + 1)));
        Some((id, depth))
    }
}

/// Depth-first post-order traversal yielding `(node, depth)`: children
/// before their parent, the start node last.
#[derive(Clone)]
pub struct Postorder<'a> {
    tree: &'a DocumentTree,
    /// `(node, depth, children_pushed)`
    stack: Vec<(NodeId, usize, bool)>,
}

impl<'a> Postorder<'a> {
    pub fn new(tree: &'a DocumentTree, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![(start, 0, false)],
        }
    }
}

impl Iterator for Postorder<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, depth, expanded) = self.stack.pop()?;
            let children = self.tree.node(id).children();
            if expanded || children.is_empty() {
                return Some((id, depth));
            }
            self.stack.push((id, depth, true));
            self.stack
                .extend(children.iter().rev().map(|&child| (child, depth + 1, false)));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::blocks::{Block, BlockType};
    use crate::tree::SourceId;

    /// `{{a}b}` with plain leaves.
    fn nested() -> DocumentTree {
        let bracket = Arc::new(BlockType::delimited("bracket", "{", "}"));
        let plain = Arc::new(BlockType::plain());
        let mut tree = DocumentTree::new("{{a}b}");
        tree.push(Block::new(bracket.clone(), SourceId::MAIN, 0));
        tree.push(Block::new(bracket, SourceId::MAIN, 1));
        tree.push(Block::new(plain.clone(), SourceId::MAIN, 2));
        tree.close(3, 0);
        tree.close(3, 1);
        tree.push(Block::new(plain, SourceId::MAIN, 4));
        tree.close(5, 0);
        tree.close(5, 1);
        tree
    }

    fn labels(tree: &DocumentTree, order: impl Iterator<Item = (NodeId, usize)>) -> Vec<String> {
        order
            .map(|(id, depth)| match tree.block(id) {
                Some(b) => format!("{depth}:{}@{}", b.name(), b.begin()),
                None => format!("{depth}:root"),
            })
            .collect()
    }

    #[test]
    fn preorder_visits_parents_first() {
        let tree = nested();
        assert_eq!(
            labels(&tree, tree.preorder()),
            vec![
                "0:root",
                "1:bracket@0",
                "2:bracket@1",
                "3:plain@2",
                "2:plain@4"
            ]
        );
    }

    #[test]
    fn postorder_visits_children_first() {
        let tree = nested();
        assert_eq!(
            labels(&tree, tree.postorder()),
            vec![
                "3:plain@2",
                "2:bracket@1",
                "2:plain@4",
                "1:bracket@0",
                "0:root"
            ]
        );
    }

    #[test]
    fn cloned_iterator_restarts_from_the_same_point() {
        let tree = nested();
        let mut iter = tree.preorder();
        iter.next();
        let rest: Vec<_> = iter.clone().collect();
        assert_eq!(rest, iter.collect::<Vec<_>>());
    }

    #[test]
    fn single_root_tree() {
        let tree = DocumentTree::new("");
        assert_eq!(tree.preorder().count(), 1);
        assert_eq!(tree.postorder().count(), 1);
    }
}
