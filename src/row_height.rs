//! Row-height inference.
//!
//! The host lays rows out at `index × rowHeight`, so row 0 sits at 0 and the
//! offset of row 1 is the row height. Once inferred, the value is cached on
//! the list instance as a marker attribute; a fresh instance has no marker
//! and is inferred again.

use dom::{Dom, NodeId};
use log::debug;

use crate::error::{SyncError, SyncResult};
use crate::geometry;

/// Infer the row height from the current rows of `list`.
pub fn infer_row_height(dom: &Dom, list: NodeId) -> SyncResult<f64> {
    let rows = dom.element_children(list);
    let second = *rows.get(1).ok_or(SyncError::NotFound("second row"))?;
    let transform = dom
        .style_property(second, "transform")
        .ok_or(SyncError::NotFound("row transform"))?;
    let offset = geometry::parse_translate_y(&transform)?;
    // NaN fails this test too.
    if !(offset >= 1.0) {
        return Err(SyncError::DegenerateRowHeight(offset));
    }
    Ok(offset)
}

/// The row height cached on `list`, if a valid one is present.
pub fn cached_row_height(dom: &Dom, list: NodeId, marker: &str) -> Option<f64> {
    let value: f64 = dom.get_attribute(list, marker)?.trim().parse().ok()?;
    (value >= 1.0 && value.is_finite()).then_some(value)
}

/// Cached height, or a fresh inference that is then cached. `None` means
/// the caller must skip geometry for this pass.
pub fn resolve_row_height(dom: &mut Dom, list: NodeId, marker: &str) -> Option<f64> {
    if let Some(height) = cached_row_height(dom, list, marker) {
        return Some(height);
    }
    match infer_row_height(dom, list) {
        Ok(height) => {
            debug!("inferred row height {height}px for list {list:?}");
            dom.set_attribute(list, marker, &height.to_string());
            Some(height)
        }
        Err(err) => {
            debug!("row height unavailable for list {list:?}: {err}");
            None
        }
    }
}

/// Drop the cache from a list instance that is no longer observed.
pub fn forget_row_height(dom: &mut Dom, list: NodeId, marker: &str) {
    if dom.has_attribute(list, marker) {
        dom.remove_attribute(list, marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ROW_HEIGHT_ATTR as MARKER;
    use crate::testing::{CalendarPage, Row};

    #[test]
    fn infers_from_second_row() {
        let page = CalendarPage::section(
            "My calendars",
            &[Row::labeled("Work", 0.0), Row::labeled("Home", 40.0), Row::labeled("Gym", 80.0)],
        );
        assert_eq!(infer_row_height(&page.dom, page.list), Ok(40.0));
    }

    #[test]
    fn single_row_is_not_found() {
        let page = CalendarPage::section("My calendars", &[Row::labeled("Work", 0.0)]);
        assert_eq!(
            infer_row_height(&page.dom, page.list),
            Err(SyncError::NotFound("second row"))
        );
    }

    #[test]
    fn unlaid_row_is_not_found() {
        let page = CalendarPage::section("My calendars", &[Row::labeled("Work", 0.0), Row::unlaid("Home")]);
        assert_eq!(
            infer_row_height(&page.dom, page.list),
            Err(SyncError::NotFound("row transform"))
        );
    }

    #[test]
    fn zero_and_negative_offsets_are_degenerate() {
        let page = CalendarPage::section("My calendars", &[Row::labeled("Work", 0.0), Row::labeled("Home", 0.0)]);
        assert_eq!(
            infer_row_height(&page.dom, page.list),
            Err(SyncError::DegenerateRowHeight(0.0))
        );
        let page = CalendarPage::section("My calendars", &[Row::labeled("Work", 0.0), Row::labeled("Home", 0.5)]);
        assert!(infer_row_height(&page.dom, page.list).is_err());
    }

    #[test]
    fn resolve_caches_on_the_instance() {
        let mut page = CalendarPage::section("My calendars", &[Row::labeled("Work", 0.0), Row::labeled("Home", 36.0)]);
        assert_eq!(resolve_row_height(&mut page.dom, page.list, MARKER), Some(36.0));
        assert_eq!(page.dom.get_attribute(page.list, MARKER), Some("36"));

        // Later geometry changes do not re-infer.
        page.dom.set_style_property(page.rows[1], "transform", "translateY(99px)");
        assert_eq!(resolve_row_height(&mut page.dom, page.list, MARKER), Some(36.0));

        forget_row_height(&mut page.dom, page.list, MARKER);
        assert_eq!(cached_row_height(&page.dom, page.list, MARKER), None);
        assert_eq!(resolve_row_height(&mut page.dom, page.list, MARKER), Some(99.0));
    }

    #[test]
    fn failed_inference_is_not_cached() {
        let mut page = CalendarPage::section("My calendars", &[Row::labeled("Birthdays", 0.0)]);
        assert_eq!(resolve_row_height(&mut page.dom, page.list, MARKER), None);
        assert!(!page.dom.has_attribute(page.list, MARKER));
    }

    #[test]
    fn invalid_marker_is_ignored() {
        let mut page = CalendarPage::section("My calendars", &[Row::labeled("Work", 0.0), Row::labeled("Home", 30.0)]);
        page.dom.set_attribute(page.list, MARKER, "0");
        assert_eq!(cached_row_height(&page.dom, page.list, MARKER), None);
        assert_eq!(resolve_row_height(&mut page.dom, page.list, MARKER), Some(30.0));
    }
}
