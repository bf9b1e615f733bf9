//! DOM Node Operations
//!
//! Core node manipulation: appendChild, insertBefore, detach, and the
//! wrap/unwrap surgery used to scaffold containers.

use crate::{DomTree, NodeId};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} not found")]
    NotFound(NodeId),

    #[error("hierarchy request error: {0:?} cannot be inserted here")]
    HierarchyRequest(NodeId),

    #[error("node {0:?} cannot hold children")]
    InvalidNodeType(NodeId),

    #[error("node {0:?} has no parent")]
    NotAChild(NodeId),
}

impl DomTree {
    fn check(&self, id: NodeId) -> DomResult<()> {
        if self.get(id).is_some() {
            Ok(())
        } else {
            Err(DomError::NotFound(id))
        }
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check(parent)?;
        self.check(child)?;
        if !self.nodes[parent.index()].is_container() {
            return Err(DomError::InvalidNodeType(parent));
        }
        if child == NodeId::ROOT || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest(child));
        }
        Ok(())
    }

    /// Link a detached `child` before `reference` (NONE = append)
    fn link(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let prev = if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[child.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[child.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.check_insert(parent, child)?;
        self.unlink(child);
        self.link(parent, child, NodeId::NONE);
        Ok(child)
    }

    /// Insert `new_child` before `reference` (or append when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.check_insert(parent, new_child)?;

        let mut reference = reference.unwrap_or(NodeId::NONE);
        if reference.is_valid() {
            self.check(reference)?;
            if self.nodes[reference.index()].parent != parent {
                return Err(DomError::NotAChild(reference));
            }
            if reference == new_child {
                reference = self.nodes[new_child.index()].next_sibling;
            }
        }

        self.unlink(new_child);
        self.link(parent, new_child, reference);
        Ok(new_child)
    }

    /// Unlink a node from its parent; detached nodes are left as they are
    pub fn detach(&mut self, node: NodeId) -> DomResult<()> {
        self.check(node)?;
        self.unlink(node);
        Ok(())
    }

    /// Detach every child of `parent`
    pub fn clear_children(&mut self, parent: NodeId) -> DomResult<()> {
        self.check(parent)?;
        for child in self.child_ids(parent) {
            self.unlink(child);
        }
        Ok(())
    }

    /// Put `wrapper` where `node` is and move `node` inside it
    pub fn wrap(&mut self, node: NodeId, wrapper: NodeId) -> DomResult<NodeId> {
        self.check(node)?;
        let parent = self.parent(node).ok_or(DomError::NotAChild(node))?;
        self.insert_before(parent, wrapper, Some(node))?;
        self.append_child(wrapper, node)?;
        Ok(wrapper)
    }

    /// Move every child of `parent` into `wrapper`, then append `wrapper`
    pub fn wrap_children(&mut self, parent: NodeId, wrapper: NodeId) -> DomResult<NodeId> {
        self.check_insert(parent, wrapper)?;
        if !self.nodes[wrapper.index()].is_container() {
            return Err(DomError::InvalidNodeType(wrapper));
        }
        self.unlink(wrapper);
        for child in self.child_ids(parent) {
            self.unlink(child);
            self.link(wrapper, child, NodeId::NONE);
        }
        self.link(parent, wrapper, NodeId::NONE);
        Ok(wrapper)
    }

    /// Replace `node` by its children, returning the moved children
    pub fn unwrap(&mut self, node: NodeId) -> DomResult<Vec<NodeId>> {
        self.check(node)?;
        let parent = self.parent(node).ok_or(DomError::NotAChild(node))?;
        let children = self.child_ids(node);
        for &child in &children {
            self.unlink(child);
            self.link(parent, child, node);
        }
        self.unlink(node);
        Ok(children)
    }

    /// Deep-copy a subtree of `source` into this arena, detached
    pub fn import_subtree(&mut self, source: &DomTree, source_id: NodeId) -> DomResult<NodeId> {
        let node = source.get(source_id).ok_or(DomError::NotFound(source_id))?;
        let copy = self.push(node.unlinked_clone());
        for (child, _) in source.children(source_id) {
            let child_copy = self.import_subtree(source, child)?;
            self.link(copy, child_copy, NodeId::NONE);
        }
        Ok(copy)
    }
}
