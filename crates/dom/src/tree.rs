//! Host tree operations.
//!
//! The [`Dom`] struct owns an `Arena<Node>` and provides tree-manipulation
//! methods that keep the intrusive parent/child/sibling links consistent and
//! report every change to the [`ObserverRegistry`].

use arena::Arena;
use log::trace;

use crate::node::{Attr, ElementData, Node, NodeData, NodeId};
use crate::observer::{MutationRecord, ObserveOptions, ObserverId, ObserverRegistry};
use crate::style::InlineStyle;

// ---------------------------------------------------------------------------
// Dom
// ---------------------------------------------------------------------------

/// The complete host tree, rooted at a document node.
pub struct Dom {
    pub nodes: Arena<Node>,
    document: NodeId,
    observers: ObserverRegistry,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create a tree containing only the document node.
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let document = nodes.allocate(Node::new(NodeData::Document));
        Self {
            nodes,
            document,
            observers: ObserverRegistry::new(),
        }
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    // =======================================================================
    // Node creation
    // =======================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag_name: &str, attrs: Vec<Attr>) -> NodeId {
        self.nodes.allocate(Node::new(NodeData::Element(ElementData {
            tag_name: tag_name.to_string(),
            attrs,
        })))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.nodes.allocate(Node::new(NodeData::Text {
            data: data.to_string(),
        }))
    }

    // =======================================================================
    // Tree mutation
    // =======================================================================

    /// Append `child` as the last child of `parent`, moving it out of its
    /// current parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` into `parent`'s child list immediately before
    /// `reference`, or at the end when `reference` is `None`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if !self.nodes.contains(parent) || !self.nodes.contains(child) || parent == child {
            return;
        }
        if let Some(r) = reference {
            if self.parent(r) != Some(parent) {
                return;
            }
        }
        if let Some(old_parent) = self.parent(child) {
            self.remove_child(old_parent, child);
        }

        let prev = match reference {
            Some(r) => self.nodes.get(r).and_then(|n| n.prev_sibling),
            None => self.nodes.get(parent).and_then(|n| n.last_child),
        };

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        match prev {
            Some(p) => {
                if let Some(node) = self.nodes.get_mut(p) {
                    node.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    node.first_child = Some(child);
                }
            }
        }
        match reference {
            Some(r) => {
                if let Some(node) = self.nodes.get_mut(r) {
                    node.prev_sibling = Some(child);
                }
            }
            None => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    node.last_child = Some(child);
                }
            }
        }

        self.record(MutationRecord::ChildList {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
    }

    /// Remove `child` from `parent`'s child list. The child stays allocated
    /// as a detached root. Wrong-parent calls are no-ops.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) != Some(parent) {
            return;
        }
        let (prev, next) = match self.nodes.get(child) {
            Some(n) => (n.prev_sibling, n.next_sibling),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.nodes.get_mut(p) {
                    node.next_sibling = next;
                }
            }
            None => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    node.first_child = next;
                }
            }
        }
        match next {
            Some(n) => {
                if let Some(node) = self.nodes.get_mut(n) {
                    node.prev_sibling = prev;
                }
            }
            None => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    node.last_child = prev;
                }
            }
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }

        self.record(MutationRecord::ChildList {
            target: parent,
            added: Vec::new(),
            removed: vec![child],
        });
    }

    /// Detach `node` from whatever parent it has.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            self.remove_child(parent, node);
        }
    }

    /// Detach `node` and free it together with its whole subtree. Handles to
    /// any of those nodes go stale.
    pub fn destroy(&mut self, node: NodeId) {
        if node == self.document {
            return;
        }
        self.remove(node);
        let mut doomed = self.descendants(node);
        doomed.push(node);
        for id in doomed {
            self.nodes.deallocate(id);
        }
    }

    // =======================================================================
    // Traversal
    // =======================================================================

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    /// Return the immediate children of `parent` in tree order.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.nodes.get(parent).and_then(|n| n.first_child);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.nodes.get(id).and_then(|n| n.next_sibling);
        }
        out
    }

    /// Element children only, in tree order.
    pub fn element_children(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent)
            .into_iter()
            .filter(|&id| self.is_element(id))
            .collect()
    }

    /// Ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(node);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.parent(id);
        }
        out
    }

    /// All descendants of `node` in pre-order (not including `node` itself).
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    /// `true` if `node` is `ancestor` or lies below it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).contains(&ancestor)
    }

    /// `true` if `node` is alive and reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.nodes.contains(node) && self.contains(self.document, node)
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(Node::is_element)
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut ids = vec![node];
        ids.extend(self.descendants(node));
        ids.into_iter()
            .filter_map(|id| match &self.nodes.get(id)?.data {
                NodeData::Text { data } => Some(data.as_str()),
                _ => None,
            })
            .collect()
    }

    // =======================================================================
    // Attributes and inline style
    // =======================================================================

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node)?.as_element()?.attr(name)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    /// Write an attribute. A record is queued even when the value is
    /// unchanged, as hosts do.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(elem) = self.nodes.get_mut(node).and_then(Node::as_element_mut) else {
            return;
        };
        let old_value = match elem.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => Some(std::mem::replace(&mut attr.value, value.to_string())),
            None => {
                elem.attrs.push(Attr::new(name, value));
                None
            }
        };
        self.record(MutationRecord::Attributes {
            target: node,
            name: name.to_string(),
            old_value,
        });
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let Some(elem) = self.nodes.get_mut(node).and_then(Node::as_element_mut) else {
            return;
        };
        let Some(pos) = elem.attrs.iter().position(|a| a.name == name) else {
            return;
        };
        let old = elem.attrs.remove(pos);
        self.record(MutationRecord::Attributes {
            target: node,
            name: name.to_string(),
            old_value: Some(old.value),
        });
    }

    /// Read one inline style property.
    pub fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        let source = self.get_attribute(node, "style")?;
        InlineStyle::parse(source).get(property).map(str::to_string)
    }

    /// Write one inline style property through the `style` attribute, leaving
    /// the other declarations untouched.
    pub fn set_style_property(&mut self, node: NodeId, property: &str, value: &str) {
        if !self.is_element(node) {
            return;
        }
        let mut style = InlineStyle::parse(self.get_attribute(node, "style").unwrap_or(""));
        style.set(property, value);
        self.set_attribute(node, "style", &style.to_attr_value());
    }

    // =======================================================================
    // Observation
    // =======================================================================

    pub fn observe(&mut self, target: NodeId, options: ObserveOptions) -> ObserverId {
        self.observers.observe(target, options)
    }

    /// Safe to call on an already-disconnected id.
    pub fn disconnect(&mut self, id: ObserverId) {
        self.observers.disconnect(id);
    }

    pub fn is_observing(&self, id: ObserverId) -> bool {
        self.observers.is_active(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn take_notify_request(&mut self) -> bool {
        self.observers.take_notify_request()
    }

    pub fn take_records(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.observers.take_records(id)
    }

    pub fn take_batches(&mut self) -> Vec<(ObserverId, Vec<MutationRecord>)> {
        self.observers.take_batches()
    }

    fn record(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let target = record.target();
        let mut lineage = vec![target];
        lineage.extend(self.ancestors(target));
        trace!("queue {record:?}");
        self.observers.queue(record, &lineage);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
