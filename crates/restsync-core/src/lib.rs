//! Configuration-tree reconciliation for RESTCONF devices.
//!
//! The engine decides whether a live tree fetched from a device and a
//! desired tree describe the same configuration, tolerating the ways device
//! APIs drift in representation:
//!
//! - **[`value`]**: the [`Value`] tree shared by every pass, with a single
//!   canonical string rendering used wherever leaves are compared.
//! - **[`prune`]**: strip ignored keys, and drop read-only `state` branches
//!   that sit next to a writable `config` branch.
//! - **[`normalize`]**: numbers become strings, `"true"`/`"false"` become
//!   booleans.
//! - **[`equality`]**: type-tolerant, order-insensitive comparison.
//! - **[`filter`]**: narrow the live tree with a JMESPath expression before
//!   it is compared.
//! - **[`diff`]**: before/after [`ChangeRecord`]s and pluggable diff backends.
//! - **[`reconcile`]**: the GET → compare → write workflow over any
//!   [`Transport`](restsync_api::Transport), and [`Session`] to drive it
//!   against a real device.

pub mod config;
pub mod diff;
pub mod equality;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod prune;
pub mod reconcile;
pub mod session;
pub mod value;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConnectionConfig, DeviceCredentials, TlsVerification};
pub use diff::{ChangeRecord, DiffBackend, DiffMode, NoDiff, StructuralDiff};
pub use equality::{trees_equal, trees_equal_in_place};
pub use error::CoreError;
pub use filter::{JmesPathQuery, TreeFilter};
pub use normalize::{normalize, numbers_to_strings, strings_to_bools};
pub use prune::{prune_keys, prune_parallel_state};
pub use reconcile::{
    PostReport, ReconcileReport, ReconcileRequest, ResourceState, WriteMethod, post, reconcile,
};
pub use session::Session;
pub use value::{Key, Mapping, Value};
