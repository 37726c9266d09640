//! DOM crate: the host tree a user script runs against.
//!
//! Arena-based element tree with inline styles and mutation observation.
//! Uses generational indices from the `arena` crate instead of Rc/RefCell.

pub mod node;
pub mod observer;
pub mod query;
pub mod style;
pub mod tree;

pub use node::*;
pub use observer::{MutationRecord, ObserveOptions, ObserverId, ObserverRegistry};
pub use style::InlineStyle;
pub use tree::Dom;
