//! # gcal_declutter
//!
//! Keeps the calendar sidebar free of unwanted rows. The host renders the
//! list as absolutely positioned rows (`translateY(index × rowHeight)`) in a
//! container of fixed height, and re-renders it whenever it likes. The engine
//! removes disallowed rows, repacks the survivors without gaps and follows
//! the list across re-renders, ignoring the mutation records its own writes
//! cause.
//!
//! Layers, bottom-up:
//!
//! - [`geometry`]: read/write of row offsets and list height.
//! - [`row_height`]: inference and per-instance caching of the row pitch.
//! - [`repack`]: dense re-layout of the surviving rows.
//! - [`coordinator`]: the searching/bound state machine over host mutations.
//! - [`script`]: the engine as a [`page::UserScript`].

#![forbid(unsafe_code)]

pub mod config;
pub mod coordinator;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod policy;
pub mod repack;
pub mod row_height;
pub mod script;
pub mod suppression;

#[cfg(test)]
mod testing;

pub use config::{Config, ListLocator};
pub use coordinator::{Coordinator, SyncState, SyncStats};
pub use error::{ConfigError, SyncError, SyncResult};
pub use script::DeclutterScript;
