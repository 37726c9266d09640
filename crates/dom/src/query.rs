//! Element queries.
//!
//! The handful of selector shapes user scripts rely on, expressed as
//! predicates instead of a selector engine: attribute equality, role plus
//! accessible label, and nearest matching ancestor.

use crate::node::NodeId;
use crate::tree::Dom;

impl Dom {
    /// First element in the subtree of `root` (inclusive, pre-order) that
    /// satisfies `pred`.
    pub fn query_first<F>(&self, root: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&Dom, NodeId) -> bool,
    {
        std::iter::once(root)
            .chain(self.descendants(root))
            .find(|&id| self.is_element(id) && pred(self, id))
    }

    /// Every element in the subtree of `root` (inclusive, pre-order) that
    /// satisfies `pred`.
    pub fn query_all<F>(&self, root: NodeId, pred: F) -> Vec<NodeId>
    where
        F: Fn(&Dom, NodeId) -> bool,
    {
        std::iter::once(root)
            .chain(self.descendants(root))
            .filter(|&id| self.is_element(id) && pred(self, id))
            .collect()
    }

    /// Nearest inclusive ancestor element of `node` that satisfies `pred`.
    pub fn closest<F>(&self, node: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&Dom, NodeId) -> bool,
    {
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|&id| self.is_element(id) && pred(self, id))
    }

    /// `[name="value"]`
    pub fn attr_equals(&self, node: NodeId, name: &str, value: &str) -> bool {
        self.get_attribute(node, name) == Some(value)
    }

    /// `[role="…"][aria-label="…"]` anywhere in the document.
    pub fn find_by_role_and_label(&self, role: &str, label: &str) -> Option<NodeId> {
        self.query_first(self.document(), |dom, id| {
            dom.attr_equals(id, "role", role) && dom.attr_equals(id, "aria-label", label)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::node::Attr;
    use crate::tree::Dom;

    #[test]
    fn role_and_label_lookup() {
        let mut dom = Dom::new();
        let doc = dom.document();
        let other = dom.create_element("div", vec![Attr::new("role", "list"), Attr::new("aria-label", "Other calendars")]);
        let mine = dom.create_element("div", vec![Attr::new("role", "list"), Attr::new("aria-label", "My calendars")]);
        dom.append_child(doc, other);
        dom.append_child(doc, mine);
        assert_eq!(dom.find_by_role_and_label("list", "My calendars"), Some(mine));
        assert_eq!(dom.find_by_role_and_label("list", "Missing"), None);
    }

    #[test]
    fn closest_is_inclusive() {
        let mut dom = Dom::new();
        let doc = dom.document();
        let list = dom.create_element("div", vec![Attr::new("role", "list")]);
        let row = dom.create_element("div", Vec::new());
        let label = dom.create_element("span", Vec::new());
        dom.append_child(doc, list);
        dom.append_child(list, row);
        dom.append_child(row, label);

        let is_list = |d: &Dom, id| d.attr_equals(id, "role", "list");
        assert_eq!(dom.closest(label, is_list), Some(list));
        assert_eq!(dom.closest(list, is_list), Some(list));
        assert_eq!(dom.closest(doc, is_list), None);
    }

    #[test]
    fn query_all_skips_text() {
        let mut dom = Dom::new();
        let doc = dom.document();
        let a = dom.create_element("div", vec![Attr::new("aria-hidden", "false")]);
        let b = dom.create_element("div", vec![Attr::new("aria-hidden", "true")]);
        let t = dom.create_text("x");
        dom.append_child(doc, a);
        dom.append_child(doc, b);
        dom.append_child(a, t);
        let found = dom.query_all(doc, |d, id| d.attr_equals(id, "aria-hidden", "false"));
        assert_eq!(found, vec![a]);
    }
}
