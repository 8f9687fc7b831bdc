// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::ops::{Index, IndexMut};

/// Tree whose nodes are stored in a vector and refer to their children by index.
///
/// Nodes can be created detached from the tree (`add(None, item)`) and attached later
/// with [`attach`](VecTree::attach); each node has at most one parent.
#[derive(Clone, PartialEq, Debug)]
pub struct VecTree<T> {
    nodes: Vec<Node<T>>,
    root: Option<usize>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Node<T> {
    data: T,
    children: Vec<usize>
}

// ---------------------------------------------------------------------------------------------

impl<T> VecTree<T> {
    pub fn new() -> Self {
        VecTree { nodes: Vec::new(), root: None }
    }

    pub fn get_root(&self) -> Option<usize> {
        self.root
    }

    /// Adds a new node and makes it the root.
    pub fn add_root(&mut self, item: T) -> usize {
        let index = self.add(None, item);
        self.root = Some(index);
        index
    }

    /// Adds a new node as the last child of `parent_index`, or a detached node if `None`.
    pub fn add(&mut self, parent_index: Option<usize>, item: T) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node::new(item));
        if let Some(parent) = parent_index {
            self.nodes[parent].children.push(index);
        }
        index
    }

    pub fn add_iter<U: IntoIterator<Item = T>>(&mut self, parent_index: Option<usize>, items: U) -> Vec<usize> {
        items.into_iter().map(|item| self.add(parent_index, item)).collect()
    }

    /// Attaches the existing node `child_index` as last child of `parent_index`.
    pub fn attach(&mut self, parent_index: usize, child_index: usize) {
        assert!(child_index < self.nodes.len());
        self.nodes[parent_index].children.push(child_index);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> &T {
        &self.nodes[index].data
    }

    pub fn get_mut(&mut self, index: usize) -> &mut T {
        &mut self.nodes[index].data
    }

    pub fn children(&self, index: usize) -> &[usize] {
        &self.nodes[index].children
    }

    /// Pre-order, depth-first iterator from the root, which returns node indices.
    pub fn iter_pre(&self) -> VecTreePreIter<'_, T> {
        VecTreePreIter { tree: self, stack: self.root.into_iter().collect() }
    }
}

impl<T> Default for VecTree<T> {
    fn default() -> Self {
        VecTree::new()
    }
}

impl<T> Node<T> {
    pub fn new(data: T) -> Self {
        Node { data, children: Vec::new() }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn data(&self) -> &T {
        &self.data
    }
}

impl<T> Index<usize> for VecTree<T> {
    type Output = Node<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

impl<T> IndexMut<usize> for VecTree<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.nodes[index]
    }
}

// ---------------------------------------------------------------------------------------------

pub struct VecTreePreIter<'a, T> {
    tree: &'a VecTree<T>,
    stack: Vec<usize>,
}

impl<T> Iterator for VecTreePreIter<'_, T> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        self.stack.extend(self.tree.nodes[index].children.iter().rev());
        Some(index)
    }
}

// ---------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn build_tree() -> VecTree<String> {
        let mut tree = VecTree::new();
        let root = tree.add_root("Program".to_string());
        let end = tree.add(None, "$".to_string());
        let list = tree.add(Some(root), "Declaration-list".to_string());
        let children = tree.add_iter(Some(list), ["Declaration", "Declaration-list"].map(|s| s.to_string()));
        tree.add(Some(children[1]), "epsilon".to_string());
        tree.attach(root, end);
        tree
    }

    #[test]
    fn add_and_attach() {
        let tree = build_tree();
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.get_root(), Some(0));
        assert_eq!(tree.children(0), &[2, 1]);
        assert_eq!(tree.children(2), &[3, 4]);
        assert!(!tree[3].has_children());
        assert_eq!(tree.get(tree.children(4)[0]), "epsilon");
    }

    #[test]
    fn preorder() {
        let tree = build_tree();
        let result = tree.iter_pre().map(|i| tree.get(i).as_str()).collect::<Vec<_>>();
        assert_eq!(result, vec!["Program", "Declaration-list", "Declaration", "Declaration-list", "epsilon", "$"]);
        assert_eq!(VecTree::<u8>::new().iter_pre().count(), 0);
    }

    #[test]
    fn modify() {
        let mut tree = build_tree();
        tree.get_mut(3).push_str("!");
        assert_eq!(tree[3].data(), "Declaration!");
        assert_ne!(tree, build_tree());
    }
}
