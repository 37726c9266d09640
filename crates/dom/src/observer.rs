//! Mutation observation.
//!
//! Implements the host side of the change-detection contract:
//!   1. A script registers a watch on a subtree with [`ObserveOptions`].
//!   2. Every tree or attribute mutation is matched against all live
//!      registrations and queued as a [`MutationRecord`].
//!   3. The first queued record raises a notify request; the page turns it
//!      into one micro-task that drains every registration's batch.
//!
//! Records are never delivered re-entrantly: anything queued while a batch is
//! being handled waits for the next notify pass.

use crate::node::NodeId;

/// Identifies one registration created by [`ObserverRegistry::observe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What a registration wants to hear about.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObserveOptions {
    /// Child insertions/removals.
    pub child_list: bool,
    /// Attribute changes.
    pub attributes: bool,
    /// Extend the watch from the target to all of its descendants.
    pub subtree: bool,
    /// Restrict `attributes` to these names. `None` means every attribute.
    pub attribute_filter: Option<Vec<String>>,
}

impl ObserveOptions {
    /// Structural changes anywhere below the target.
    pub fn subtree_child_list() -> Self {
        Self {
            child_list: true,
            subtree: true,
            ..Self::default()
        }
    }

    /// Add attribute watching limited to `names`.
    pub fn with_attributes(mut self, names: &[&str]) -> Self {
        self.attributes = true;
        self.attribute_filter = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    fn accepts(&self, record: &MutationRecord) -> bool {
        match record {
            MutationRecord::ChildList { .. } => self.child_list,
            MutationRecord::Attributes { name, .. } => {
                self.attributes
                    && self
                        .attribute_filter
                        .as_ref()
                        .is_none_or(|names| names.iter().any(|n| n == name))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One observed change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationRecord {
    /// Children of `target` were inserted and/or removed.
    ChildList {
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    /// Attribute `name` of `target` was written.
    Attributes {
        target: NodeId,
        name: String,
        old_value: Option<String>,
    },
}

impl MutationRecord {
    pub fn target(&self) -> NodeId {
        match self {
            MutationRecord::ChildList { target, .. } | MutationRecord::Attributes { target, .. } => {
                *target
            }
        }
    }

    pub fn attribute_name(&self) -> Option<&str> {
        match self {
            MutationRecord::Attributes { name, .. } => Some(name),
            MutationRecord::ChildList { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

struct Registration {
    id: ObserverId,
    target: NodeId,
    options: ObserveOptions,
    pending: Vec<MutationRecord>,
}

/// All live watches on one tree, with their undelivered records.
#[derive(Default)]
pub struct ObserverRegistry {
    registrations: Vec<Registration>,
    next_id: u64,
    notify_requested: bool,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, target: NodeId, options: ObserveOptions) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.registrations.push(Registration {
            id,
            target,
            options,
            pending: Vec::new(),
        });
        id
    }

    /// Drop a registration and its undelivered records. Returns `false` if it
    /// was already gone.
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    pub fn is_active(&self, id: ObserverId) -> bool {
        self.registrations.iter().any(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Queue `record` on every registration interested in it.
    ///
    /// `lineage` is the record target followed by its ancestors, nearest
    /// first; subtree registrations match on any of them.
    pub fn queue(&mut self, record: MutationRecord, lineage: &[NodeId]) {
        let target = record.target();
        for reg in &mut self.registrations {
            let in_scope = reg.target == target || (reg.options.subtree && lineage.contains(&reg.target));
            if in_scope && reg.options.accepts(&record) {
                reg.pending.push(record.clone());
                self.notify_requested = true;
            }
        }
    }

    /// Returns `true` if records were queued since the last call, and clears the flag.
    pub fn take_notify_request(&mut self) -> bool {
        std::mem::take(&mut self.notify_requested)
    }

    /// Drain the pending records of one registration.
    pub fn take_records(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.registrations
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| std::mem::take(&mut r.pending))
            .unwrap_or_default()
    }

    /// Drain every non-empty batch, in registration order.
    pub fn take_batches(&mut self) -> Vec<(ObserverId, Vec<MutationRecord>)> {
        self.registrations
            .iter_mut()
            .filter(|r| !r.pending.is_empty())
            .map(|r| (r.id, std::mem::take(&mut r.pending)))
            .collect()
    }
}
