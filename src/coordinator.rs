//! Mutation coordinator.
//!
//! Two states:
//!
//! ```text
//!             target list found (bind: sync once, attach list watch)
//!   Searching ─────────────────────────────────────────────────▶ Bound(list)
//!       ▲                                                           │
//!       └───────────────────────────────────────────────────────────┘
//!             bound list detached (drop list watch and row height)
//! ```
//!
//! A document-wide watch lives for the whole session. While searching it
//! looks for the list; while bound it only probes whether the list is still
//! connected (and, for the expanded-groups locator, rescans when a group
//! opens). The list watch handles rows being added/removed and style drift.
//! Records caused by the engine's own writes are dropped through the
//! [`SuppressionTable`].

use dom::{Dom, MutationRecord, NodeId, ObserveOptions, ObserverId};
use log::{debug, info, trace};

use crate::config::Config;
use crate::policy;
use crate::repack;
use crate::row_height;
use crate::suppression::{SuppressionTable, WriteKind};

const ARIA_HIDDEN: &str = "aria-hidden";
const DATA_COLLAPSED: &str = "data-collapsed";
const STYLE: &str = "style";

/// Where the coordinator is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Searching,
    Bound(NodeId),
}

/// Running counters, for logs and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub binds: usize,
    pub unbinds: usize,
    pub filter_passes: usize,
    pub repack_passes: usize,
    /// Filter passes that had no row height and skipped geometry.
    pub degraded_passes: usize,
    pub rows_removed: usize,
    pub records_suppressed: usize,
}

#[derive(Debug)]
struct Binding {
    list: NodeId,
    watch: ObserverId,
}

pub struct Coordinator {
    config: Config,
    document_watch: Option<ObserverId>,
    binding: Option<Binding>,
    suppression: SuppressionTable,
    stats: SyncStats,
}

impl Coordinator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            document_watch: None,
            binding: None,
            suppression: SuppressionTable::new(),
            stats: SyncStats::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> SyncState {
        match &self.binding {
            Some(b) => SyncState::Bound(b.list),
            None => SyncState::Searching,
        }
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    pub fn suppression(&self) -> &SuppressionTable {
        &self.suppression
    }

    // =======================================================================
    // Lifecycle
    // =======================================================================

    /// Attach the document watch and process whatever is already rendered.
    pub fn start(&mut self, dom: &mut Dom) {
        if self.document_watch.is_none() {
            let mut options = ObserveOptions::subtree_child_list();
            if self.config.locator.watches_groups() {
                options = options.with_attributes(&[ARIA_HIDDEN, DATA_COLLAPSED]);
            }
            let doc = dom.document();
            self.document_watch = Some(dom.observe(doc, options));
        }
        self.scan(dom);
    }

    /// Detach everything. Safe to call repeatedly.
    pub fn stop(&mut self, dom: &mut Dom) {
        self.unbind(dom);
        if let Some(watch) = self.document_watch.take() {
            dom.disconnect(watch);
        }
        self.suppression.clear();
    }

    /// Route one delivered batch.
    pub fn handle_batch(&mut self, dom: &mut Dom, observer: ObserverId, records: &[MutationRecord]) {
        trace!("{} record(s) for {observer:?}", records.len());
        if Some(observer) == self.document_watch {
            self.on_document_batch(dom, records);
        } else if self.binding.as_ref().is_some_and(|b| b.watch == observer) {
            self.on_list_batch(dom, records);
        }
    }

    /// Scheduling boundary: age the suppression table.
    pub fn end_of_tick(&mut self) {
        self.suppression.advance();
    }

    // =======================================================================
    // Batches
    // =======================================================================

    fn on_document_batch(&mut self, dom: &mut Dom, records: &[MutationRecord]) {
        let was_bound = self.binding.is_some();
        let lost_binding = was_bound && !self.ensure_connected(dom);

        let groups = self.config.locator.watches_groups();
        let relevant = records.iter().any(|r| match r {
            MutationRecord::ChildList { added, .. } => !added.is_empty(),
            MutationRecord::Attributes { name, .. } => groups && (name == ARIA_HIDDEN || name == DATA_COLLAPSED),
        });
        // A match may already be rendered when the bound list goes away.
        if lost_binding || (relevant && (groups || self.binding.is_none())) {
            self.scan(dom);
        }
    }

    fn on_list_batch(&mut self, dom: &mut Dom, records: &[MutationRecord]) {
        if !self.ensure_connected(dom) {
            self.scan(dom);
            return;
        }
        let Some(list) = self.binding.as_ref().map(|b| b.list) else {
            return;
        };

        for record in records {
            match record {
                MutationRecord::ChildList { added, removed, .. } => {
                    let own_removal = added.is_empty()
                        && !removed.is_empty()
                        && removed
                            .iter()
                            .all(|&n| self.suppression.is_pending(n, WriteKind::Removal));
                    if own_removal {
                        for &n in removed {
                            self.suppression.consume(n, WriteKind::Removal);
                        }
                        self.stats.records_suppressed += 1;
                        continue;
                    }
                    self.sync_list(dom, list);
                }
                MutationRecord::Attributes { target, name, .. } if name == STYLE => {
                    if self.suppression.consume(*target, WriteKind::Style) {
                        self.stats.records_suppressed += 1;
                        continue;
                    }
                    let cached = row_height::cached_row_height(dom, list, &self.config.row_height_attr);
                    if let Some(height) = cached {
                        trace!("external style change on {target:?}, repacking");
                        let rows = dom.element_children(list);
                        self.repack(dom, list, &rows, height);
                    }
                }
                MutationRecord::Attributes { .. } => {}
            }
        }
    }

    // =======================================================================
    // Transitions
    // =======================================================================

    /// Find target lists and process them, binding the first one if nothing
    /// is bound.
    fn scan(&mut self, dom: &mut Dom) {
        let lists = policy::locate_lists(dom, &self.config);
        if lists.is_empty() {
            trace!("no target list rendered yet");
            return;
        }
        for list in lists {
            if self.binding.is_none() {
                self.bind(dom, list);
            } else {
                self.sync_list(dom, list);
            }
        }
    }

    fn bind(&mut self, dom: &mut Dom, list: NodeId) {
        info!("bound to list {list:?}");
        self.stats.binds += 1;
        self.sync_list(dom, list);
        // Written before the list watch existed: no record will ever match.
        self.suppression.clear();
        let watch = dom.observe(list, ObserveOptions::subtree_child_list().with_attributes(&[STYLE]));
        self.binding = Some(Binding { list, watch });
    }

    fn unbind(&mut self, dom: &mut Dom) {
        let Some(binding) = self.binding.take() else {
            return;
        };
        info!("list {:?} detached, searching again", binding.list);
        self.stats.unbinds += 1;
        dom.disconnect(binding.watch);
        row_height::forget_row_height(dom, binding.list, &self.config.row_height_attr);
    }

    /// Drop the binding if its list left the tree. Returns whether a list is
    /// still bound.
    fn ensure_connected(&mut self, dom: &mut Dom) -> bool {
        let Some(list) = self.binding.as_ref().map(|b| b.list) else {
            return false;
        };
        if dom.is_connected(list) {
            return true;
        }
        self.unbind(dom);
        false
    }

    // =======================================================================
    // Passes
    // =======================================================================

    /// Filter + repack: remove disallowed rows, then repack the survivors in
    /// their current tree order.
    fn sync_list(&mut self, dom: &mut Dom, list: NodeId) {
        let rows = dom.element_children(list);
        if rows.is_empty() {
            return;
        }
        self.stats.filter_passes += 1;

        // Inferred before removal: row 1 may be the row that goes.
        let row_height = row_height::resolve_row_height(dom, list, &self.config.row_height_attr);

        let doomed: Vec<NodeId> = rows
            .into_iter()
            .filter(|&row| policy::is_disallowed(dom, &self.config, row))
            .collect();
        for &row in &doomed {
            self.suppression.register(row, WriteKind::Removal);
            dom.remove(row);
        }
        if !doomed.is_empty() {
            debug!("removed {} row(s) from list {list:?}", doomed.len());
            self.stats.rows_removed += doomed.len();
        }

        match row_height {
            Some(height) => {
                let survivors = dom.element_children(list);
                self.repack(dom, list, &survivors, height);
            }
            None => {
                debug!("list {list:?} left unpacked this pass");
                self.stats.degraded_passes += 1;
            }
        }
    }

    fn repack(&mut self, dom: &mut Dom, list: NodeId, rows: &[NodeId], height: f64) {
        self.stats.repack_passes += 1;
        let report = repack::repack(dom, &mut self.suppression, list, rows, height);
        if !report.is_noop() {
            debug!(
                "repacked list {list:?}: {} rows at {height}px, {} offsets written",
                rows.len(),
                report.offsets_written
            );
        }
    }
}
