//! Repack engine.
//!
//! Assigns every surviving row the offset `index × rowHeight` and the list
//! the height `rowHeight × count`, leaving no gaps. All writes go through the
//! geometry codec, so repacking an already packed list writes nothing.

use dom::{Dom, NodeId};

use crate::geometry;
use crate::suppression::SuppressionTable;

/// What one repack actually changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepackReport {
    pub offsets_written: usize,
    pub height_written: bool,
}

impl RepackReport {
    pub fn is_noop(&self) -> bool {
        self.offsets_written == 0 && !self.height_written
    }
}

/// Repack `rows`, which must be the list's rows in current tree order.
pub fn repack(
    dom: &mut Dom,
    suppression: &mut SuppressionTable,
    list: NodeId,
    rows: &[NodeId],
    row_height: f64,
) -> RepackReport {
    let mut report = RepackReport::default();
    for (i, &row) in rows.iter().enumerate() {
        if geometry::write_offset(dom, suppression, row, i as f64 * row_height) {
            report.offsets_written += 1;
        }
    }
    report.height_written = geometry::write_height(dom, suppression, list, row_height * rows.len() as f64);
    report
}
