//! Locating target lists and deciding which rows go.

use dom::{Dom, NodeId};

use crate::config::{Config, ListLocator};

const LABEL_ATTR: &str = "data-text";

/// Every list the locator currently resolves to, in document order without
/// duplicates.
pub fn locate_lists(dom: &Dom, config: &Config) -> Vec<NodeId> {
    match &config.locator {
        ListLocator::Section { label } => dom.find_by_role_and_label("list", label).into_iter().collect(),
        ListLocator::ExpandedGroups => {
            let mut lists = Vec::new();
            for group in expanded_groups(dom) {
                let label = dom.query_first(group, |d, id| config.hides(&d.text_content(id)));
                let list = label.and_then(|l| dom.closest(l, |d, id| d.attr_equals(id, "role", "list")));
                if let Some(list) = list {
                    if !lists.contains(&list) {
                        lists.push(list);
                    }
                }
            }
            lists
        }
    }
}

/// `[aria-hidden="false"][data-collapsed="false"]`
pub fn expanded_groups(dom: &Dom) -> Vec<NodeId> {
    dom.query_all(dom.document(), |d, id| {
        d.attr_equals(id, "aria-hidden", "false") && d.attr_equals(id, "data-collapsed", "false")
    })
}

/// `true` if any element in the row carries a hidden label, either as its
/// `data-text` attribute or as its whole trimmed text.
pub fn is_disallowed(dom: &Dom, config: &Config, row: NodeId) -> bool {
    dom.query_first(row, |d, id| {
        d.get_attribute(id, LABEL_ATTR).is_some_and(|t| config.hides(t)) || config.hides(&d.text_content(id))
    })
    .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CalendarPage, Row};

    #[test]
    fn section_locator_uses_role_and_label() {
        let page = CalendarPage::section("My calendars", &[Row::labeled("Work", 0.0)]);
        let config = Config::default();
        assert_eq!(locate_lists(&page.dom, &config), vec![page.list]);
    }

    #[test]
    fn section_locator_ignores_other_sections() {
        let page = CalendarPage::section("Other calendars", &[Row::labeled("Birthdays", 0.0)]);
        assert!(locate_lists(&page.dom, &Config::default()).is_empty());
    }

    #[test]
    fn data_text_label_is_matched() {
        let page = CalendarPage::section(
            "My calendars",
            &[Row::labeled("Work", 0.0), Row::labeled(" Tasks ", 40.0)],
        );
        let config = Config::default();
        assert!(!is_disallowed(&page.dom, &config, page.rows[0]));
        assert!(is_disallowed(&page.dom, &config, page.rows[1]));
    }

    #[test]
    fn plain_text_label_is_matched() {
        let page = CalendarPage::section("My calendars", &[Row::text("Birthdays", 0.0), Row::text("Birthdays of friends", 40.0)]);
        let config = Config::default();
        assert!(is_disallowed(&page.dom, &config, page.rows[0]));
        assert!(!is_disallowed(&page.dom, &config, page.rows[1]));
    }

    #[test]
    fn expanded_groups_locator_finds_list_around_label() {
        let mut page = CalendarPage::grouped(&[Row::text("Work", 0.0), Row::text("Birthdays", 40.0)], false);
        let config = Config::birthdays_only();
        assert!(locate_lists(&page.dom, &config).is_empty());

        page.dom.set_attribute(page.group, "data-collapsed", "false");
        assert_eq!(expanded_groups(&page.dom), vec![page.group]);
        assert_eq!(locate_lists(&page.dom, &config), vec![page.list]);
    }
}
