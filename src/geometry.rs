//! Geometry codec.
//!
//! Reads and writes a row's vertical offset (the `translateY(<n>px)`
//! component of its inline `transform`) and a list's total `height`. Writes
//! touch only that component, skip no-op writes, and are registered with the
//! [`SuppressionTable`] before they reach the tree.

use dom::{Dom, NodeId};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{SyncError, SyncResult};
use crate::suppression::{SuppressionTable, WriteKind};

// First `translateY(<n>px)` component, any letter case.
static TRANSLATE_Y: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)translateY\(\s*(-?\d+(?:\.\d+)?)px\s*\)").expect("valid translateY regex")
});

static PIXELS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(-?\d+(?:\.\d+)?)px\s*$").expect("valid pixel regex"));

/// Extract the `translateY` pixel offset from a compound transform.
pub fn parse_translate_y(transform: &str) -> SyncResult<f64> {
    let caps = TRANSLATE_Y
        .captures(transform)
        .ok_or_else(|| SyncError::UnparseableGeometry(transform.to_string()))?;
    caps[1]
        .parse()
        .map_err(|_| SyncError::UnparseableGeometry(transform.to_string()))
}

/// Parse a bare pixel length such as `120px`.
pub fn parse_pixels(value: &str) -> SyncResult<f64> {
    let caps = PIXELS
        .captures(value)
        .ok_or_else(|| SyncError::UnparseableGeometry(value.to_string()))?;
    caps[1]
        .parse()
        .map_err(|_| SyncError::UnparseableGeometry(value.to_string()))
}

/// `transform` with its `translateY` component set to `y` pixels. Other
/// components keep their exact text.
pub fn with_translate_y(transform: &str, y: f64) -> String {
    let component = format!("translateY({y}px)");
    if TRANSLATE_Y.is_match(transform) {
        TRANSLATE_Y
            .replace(transform, regex::NoExpand(&component))
            .into_owned()
    } else {
        format!("{transform} {component}").trim().to_string()
    }
}

/// The row's vertical offset, or `None` if it has no parseable
/// `translateY(<n>px)`.
pub fn read_offset(dom: &Dom, row: NodeId) -> Option<f64> {
    let transform = dom.style_property(row, "transform")?;
    parse_translate_y(&transform).ok()
}

/// The list's inline pixel height, if any.
pub fn read_height(dom: &Dom, list: NodeId) -> Option<f64> {
    let height = dom.style_property(list, "height")?;
    parse_pixels(&height).ok()
}

/// Set the row's vertical offset. Returns whether the tree was written.
pub fn write_offset(dom: &mut Dom, suppression: &mut SuppressionTable, row: NodeId, y: f64) -> bool {
    let old = dom.style_property(row, "transform").unwrap_or_default();
    let new = with_translate_y(&old, y);
    if new == old {
        return false;
    }
    suppression.register(row, WriteKind::Style);
    dom.set_style_property(row, "transform", &new);
    true
}

/// Set the list's total height to `px` pixels. Returns whether the tree was
/// written.
pub fn write_height(dom: &mut Dom, suppression: &mut SuppressionTable, list: NodeId, px: f64) -> bool {
    let new = format!("{px}px");
    if dom.style_property(list, "height").as_deref() == Some(new.as_str()) {
        return false;
    }
    suppression.register(list, WriteKind::Style);
    dom.set_style_property(list, "height", &new);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::Attr;
    use pretty_assertions::assert_eq;

    fn row_with_style(style: &str) -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let row = dom.create_element("div", vec![Attr::new("style", style)]);
        let doc = dom.document();
        dom.append_child(doc, row);
        (dom, row)
    }

    #[test]
    fn parses_translate_y_variants() {
        assert_eq!(parse_translate_y("translateY(40px)"), Ok(40.0));
        assert_eq!(parse_translate_y("TRANSLATEY( -12.5px )"), Ok(-12.5));
        assert_eq!(parse_translate_y("scale(2) translateY(0px) rotate(3deg)"), Ok(0.0));
    }

    #[test]
    fn rejects_non_pixel_and_missing() {
        assert!(parse_translate_y("translateY(2em)").is_err());
        assert!(parse_translate_y("translateY(abc)").is_err());
        assert!(parse_translate_y("translateX(40px)").is_err());
        assert!(parse_translate_y("").is_err());
    }

    #[test]
    fn read_offset_absent_transform() {
        let (dom, row) = row_with_style("color: red");
        assert_eq!(read_offset(&dom, row), None);
    }

    #[test]
    fn replaces_only_translate_y() {
        assert_eq!(
            with_translate_y("scale(1.2) translateY(40px)", 20.0),
            "scale(1.2) translateY(20px)"
        );
        assert_eq!(
            with_translate_y("translateY( 40px ) rotate(1deg)", 0.0),
            "translateY(0px) rotate(1deg)"
        );
    }

    #[test]
    fn appends_when_missing() {
        assert_eq!(with_translate_y("", 40.0), "translateY(40px)");
        assert_eq!(with_translate_y("scale(2)", 80.0), "scale(2) translateY(80px)");
        assert_eq!(with_translate_y("translateY(1em)", 5.5), "translateY(1em) translateY(5.5px)");
    }

    #[test]
    fn write_offset_preserves_foreign_style() {
        let (mut dom, row) = row_with_style("opacity: 0.5; transform: scale(1.2) translateY(40px)");
        let mut supp = SuppressionTable::new();
        assert!(write_offset(&mut dom, &mut supp, row, 20.0));
        assert_eq!(
            dom.get_attribute(row, "style"),
            Some("opacity: 0.5; transform: scale(1.2) translateY(20px);")
        );
        assert!(supp.is_pending(row, WriteKind::Style));
    }

    #[test]
    fn write_offset_is_idempotent() {
        let (mut dom, row) = row_with_style("transform: translateY(40px)");
        let mut supp = SuppressionTable::new();
        assert!(write_offset(&mut dom, &mut supp, row, 30.0));
        let first = dom.get_attribute(row, "style").map(str::to_string);
        assert!(!write_offset(&mut dom, &mut supp, row, 30.0));
        assert_eq!(dom.get_attribute(row, "style").map(str::to_string), first);
        assert_eq!(supp.len(), 1);
    }

    #[test]
    fn write_height_replaces_value() {
        let (mut dom, list) = row_with_style("height: 120px; overflow: hidden");
        let mut supp = SuppressionTable::new();
        assert!(write_height(&mut dom, &mut supp, list, 80.0));
        assert_eq!(read_height(&dom, list), Some(80.0));
        assert_eq!(
            dom.get_attribute(list, "style"),
            Some("height: 80px; overflow: hidden;")
        );
        assert!(!write_height(&mut dom, &mut supp, list, 80.0));
    }

    #[test]
    fn parse_pixels_is_strict() {
        assert_eq!(parse_pixels(" 60px "), Ok(60.0));
        assert!(parse_pixels("60").is_err());
        assert!(parse_pixels("calc(60px)").is_err());
    }
}
