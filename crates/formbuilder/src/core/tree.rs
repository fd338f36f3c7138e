#[cfg(debug_assertions)]
use std::collections::HashSet;

use slotmap::SlotMap;

use super::{
    error::{Error, Result},
    field::FieldNode,
    id::{Container, FieldId},
};

/// Arena of placed and detached fields, plus the form's top-level list.
#[derive(Debug, Clone, Default)]
pub struct FieldTree {
    /// All fields, attached or not.
    nodes: SlotMap<FieldId, FieldNode>,
    /// Top-level fields in order.
    root: Vec<FieldId>,
    /// Counter for generated ids and names.
    seq: u64,
}

impl FieldTree {
    /// Construct an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field.
    pub fn get(&self, id: FieldId) -> Option<&FieldNode> {
        self.nodes.get(id)
    }

    /// Look up a field mutably.
    pub(crate) fn get_mut(&mut self, id: FieldId) -> Option<&mut FieldNode> {
        self.nodes.get_mut(id)
    }

    /// Look up a field, failing if it is not live.
    pub fn node(&self, id: FieldId) -> Result<&FieldNode> {
        self.nodes.get(id).ok_or(Error::FieldNotFound(id))
    }

    /// Look up a field mutably, failing if it is not live.
    pub(crate) fn node_mut(&mut self, id: FieldId) -> Result<&mut FieldNode> {
        self.nodes.get_mut(id).ok_or(Error::FieldNotFound(id))
    }

    /// Is the field live?
    pub fn contains(&self, id: FieldId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live fields, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Are there no fields at all?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a field by its string id.
    pub fn find(&self, string_id: &str) -> Option<FieldId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.id == string_id)
            .map(|(id, _)| id)
    }

    /// Top-level fields.
    pub fn root_children(&self) -> &[FieldId] {
        &self.root
    }

    /// Children of a container. Empty for unknown fields.
    pub fn children(&self, container: Container) -> &[FieldId] {
        match container {
            Container::Root => &self.root,
            Container::Field(id) => self.nodes.get(id).map_or(&[][..], |n| n.children.as_slice()),
        }
    }

    /// Mutable child list of a container.
    fn list_mut(&mut self, container: Container) -> Option<&mut Vec<FieldId>> {
        match container {
            Container::Root => Some(&mut self.root),
            Container::Field(id) => self.nodes.get_mut(id).map(|n| &mut n.children),
        }
    }

    /// Advance and return the id sequence.
    pub(crate) fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Add a field to the arena without attaching it. It stays in the arena
    /// until it is removed with its subtree.
    pub(crate) fn create_detached(&mut self, node: FieldNode) -> FieldId {
        self.nodes.insert(node)
    }

    /// Return true if `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: FieldId, node: FieldId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_field(id);
        }
        false
    }

    /// Is the field reachable from the form's top-level list?
    pub fn is_attached(&self, id: FieldId) -> bool {
        let mut current = id;
        loop {
            match self.parent(current) {
                Some(Container::Root) => return true,
                Some(Container::Field(p)) => current = p,
                None => return false,
            }
        }
    }

    /// Containing list of a field.
    pub fn parent(&self, id: FieldId) -> Option<Container> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Parent field, if the field is nested.
    pub fn parent_field(&self, id: FieldId) -> Option<FieldId> {
        self.parent(id).and_then(|c| c.field())
    }

    /// Position of a field in its containing list.
    pub fn index_of(&self, id: FieldId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// The field after this one in its containing list.
    pub fn next_sibling(&self, id: FieldId) -> Option<FieldId> {
        let parent = self.parent(id)?;
        let index = self.index_of(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// The field before this one in its containing list.
    pub fn prev_sibling(&self, id: FieldId) -> Option<FieldId> {
        let parent = self.parent(id)?;
        let index = self.index_of(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// First child of a field.
    pub fn first_child(&self, id: FieldId) -> Option<FieldId> {
        self.children(Container::Field(id)).first().copied()
    }

    /// First top-level field.
    pub fn first_field(&self) -> Option<FieldId> {
        self.root.first().copied()
    }

    /// Validate an insertion without performing it.
    fn check_insert(&self, id: FieldId, parent: Container) -> Result<()> {
        if !self.nodes.contains_key(id) {
            return Err(Error::FieldNotFound(id));
        }
        if let Container::Field(p) = parent {
            let pnode = self.node(p)?;
            if p == id || self.is_ancestor(id, p) {
                return Err(Error::WouldCreateCycle {
                    parent: p,
                    child: id,
                });
            }
            if !pnode.accepts_children() {
                return Err(Error::NotAContainer(p));
            }
        }
        Ok(())
    }

    /// Move a field to `index` in `parent`, detaching it from wherever it is.
    /// The index is clamped to the length of the list after detaching. Returns
    /// the index the field landed at. Nothing changes if validation fails.
    pub(crate) fn insert(&mut self, id: FieldId, index: usize, parent: Container) -> Result<usize> {
        self.check_insert(id, parent)?;
        self.unlink(id);
        let list = self.list_mut(parent).ok_or(Error::FieldNotFound(id))?;
        let index = index.min(list.len());
        list.insert(index, id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Some(parent);
        }
        self.debug_assert_tree_invariants();
        Ok(index)
    }

    /// Detach a field from its parent. A no-op for detached fields.
    pub(crate) fn detach(&mut self, id: FieldId) -> Result<()> {
        if !self.nodes.contains_key(id) {
            return Err(Error::FieldNotFound(id));
        }
        self.unlink(id);
        self.debug_assert_tree_invariants();
        Ok(())
    }

    /// Remove a field from its parent's list and clear its parent pointer.
    fn unlink(&mut self, id: FieldId) {
        let Some(parent) = self.nodes.get_mut(id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(list) = self.list_mut(parent) {
            list.retain(|c| *c != id);
        }
    }

    /// Remove a field and all its descendants from the arena. Returns the
    /// removed ids in post-order.
    pub(crate) fn remove_subtree(&mut self, id: FieldId) -> Result<Vec<FieldId>> {
        if !self.nodes.contains_key(id) {
            return Err(Error::FieldNotFound(id));
        }
        let post_order = self.subtree_post_order(id);
        self.unlink(id);
        for node_id in &post_order {
            self.nodes.remove(*node_id);
        }
        self.debug_assert_tree_invariants();
        Ok(post_order)
    }

    /// Collect a subtree in pre-order, including the root.
    pub fn subtree_pre_order(&self, root: FieldId) -> Vec<FieldId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            out.push(node_id);
            for child in node.children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Collect a subtree in post-order, including the root.
    fn subtree_post_order(&self, root: FieldId) -> Vec<FieldId> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((node_id, visited)) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            if visited {
                out.push(node_id);
                continue;
            }
            stack.push((node_id, true));
            for child in node.children.iter().rev() {
                stack.push((*child, false));
            }
        }
        out
    }

    /// Every attached field in document order.
    pub fn pre_order(&self) -> Vec<FieldId> {
        self.root
            .iter()
            .flat_map(|id| self.subtree_pre_order(*id))
            .collect()
    }

    /// Assert structural invariants in debug builds.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_assert_tree_invariants(&self) {
        self.debug_assert_links(Container::Root, &self.root);
        for (id, node) in self.nodes.iter() {
            debug_assert!(
                node.accepts_children() || node.children.is_empty(),
                "non-container {id:?} has children"
            );
            self.debug_assert_links(Container::Field(id), &node.children);
            if let Some(parent) = node.parent {
                let count = self.children(parent).iter().filter(|c| **c == id).count();
                debug_assert_eq!(count, 1, "{id:?} listed {count} times under {parent:?}");
            }
            self.debug_assert_no_cycle(id);
        }
    }

    /// Assert that the parent chain from `start` terminates.
    #[cfg(debug_assertions)]
    fn debug_assert_no_cycle(&self, start: FieldId) {
        let mut seen = HashSet::new();
        let mut current = Some(start);
        while let Some(id) = current {
            let fresh = seen.insert(id);
            debug_assert!(fresh, "cycle through {id:?}");
            if !fresh {
                return;
            }
            current = self.parent_field(id);
        }
    }

    /// Assert structural invariants in debug builds.
    #[cfg(not(debug_assertions))]
    pub(crate) fn debug_assert_tree_invariants(&self) {}

    /// Assert that every entry of a child list points back at its container.
    #[cfg(debug_assertions)]
    fn debug_assert_links(&self, container: Container, children: &[FieldId]) {
        let mut seen = HashSet::with_capacity(children.len());
        for child in children {
            debug_assert!(seen.insert(*child), "duplicate child {child:?} in {container:?}");
            let parent = self.nodes.get(*child).and_then(|n| n.parent);
            debug_assert_eq!(
                parent,
                Some(container),
                "child {child:?} parent mismatch in {container:?}"
            );
        }
    }
}
