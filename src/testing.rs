//! Fake calendar pages for tests.

use dom::{Attr, Dom, NodeId};

/// One calendar row to render.
#[derive(Clone, Debug)]
pub struct Row {
    label: String,
    offset: Option<f64>,
    data_text: bool,
}

impl Row {
    /// Row whose label sits in a `[data-text]` span.
    pub fn labeled(label: &str, offset: f64) -> Self {
        Self {
            label: label.to_string(),
            offset: Some(offset),
            data_text: true,
        }
    }

    /// Row whose label is bare text.
    pub fn text(label: &str, offset: f64) -> Self {
        Self {
            label: label.to_string(),
            offset: Some(offset),
            data_text: false,
        }
    }

    /// Row the host has not positioned yet.
    pub fn unlaid(label: &str) -> Self {
        Self {
            label: label.to_string(),
            offset: None,
            data_text: true,
        }
    }
}

pub struct CalendarPage {
    pub dom: Dom,
    pub group: NodeId,
    pub list: NodeId,
    pub rows: Vec<NodeId>,
}

impl CalendarPage {
    /// `document > div > div[role=list][aria-label=…] > rows`
    pub fn section(label: &str, rows: &[Row]) -> Self {
        let mut dom = Dom::new();
        let doc = dom.document();
        let group = dom.create_element("div", Vec::new());
        dom.append_child(doc, group);
        let (list, rows) = append_section(&mut dom, group, label, rows);
        Self { dom, group, list, rows }
    }

    /// `document > div[aria-hidden=false][data-collapsed=…] > div[role=list] > rows`
    pub fn grouped(rows: &[Row], expanded: bool) -> Self {
        let mut dom = Dom::new();
        let doc = dom.document();
        let collapsed = if expanded { "false" } else { "true" };
        let group = dom.create_element(
            "div",
            vec![Attr::new("aria-hidden", "false"), Attr::new("data-collapsed", collapsed)],
        );
        dom.append_child(doc, group);
        let list = dom.create_element("div", vec![Attr::new("role", "list")]);
        dom.append_child(group, list);
        let rows = append_rows(&mut dom, list, rows);
        Self { dom, group, list, rows }
    }

    pub fn transform(&self, row: NodeId) -> Option<String> {
        self.dom.style_property(row, "transform")
    }

    pub fn height(&self) -> Option<String> {
        self.dom.style_property(self.list, "height")
    }
}

/// Render a labeled list under `parent`; the list height is `rows × step`.
pub fn append_section(dom: &mut Dom, parent: NodeId, label: &str, rows: &[Row]) -> (NodeId, Vec<NodeId>) {
    let list = dom.create_element("div", vec![Attr::new("role", "list"), Attr::new("aria-label", label)]);
    dom.append_child(parent, list);
    let ids = append_rows(dom, list, rows);
    (list, ids)
}

fn append_rows(dom: &mut Dom, list: NodeId, rows: &[Row]) -> Vec<NodeId> {
    let step = rows.get(1).and_then(|r| r.offset).unwrap_or(40.0);
    dom.set_style_property(list, "height", &format!("{}px", step * rows.len() as f64));
    rows.iter()
        .map(|row| {
            let mut attrs = vec![Attr::new("role", "listitem")];
            if let Some(y) = row.offset {
                attrs.push(Attr::new("style", &format!("transform: translateY({y}px)")));
            }
            let el = dom.create_element("div", attrs);
            let text = dom.create_text(&row.label);
            if row.data_text {
                let span = dom.create_element("span", vec![Attr::new("data-text", &row.label)]);
                dom.append_child(span, text);
                dom.append_child(el, span);
            } else {
                dom.append_child(el, text);
            }
            dom.append_child(list, el);
            el
        })
        .collect()
}
