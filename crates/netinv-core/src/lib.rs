//! Domain layer for the `netinv` inventory manager.
//!
//! This crate owns everything that does not touch a terminal:
//!
//! - **Domain model** ([`model`]) — the [`Device`] record, its fixed
//!   vocabularies ([`DeviceType`], [`NetworkTier`], [`Service`]), and the
//!   session-scoped surrogate [`DeviceId`].
//! - **Validators** ([`validate`]) — pure syntax/range checks for names,
//!   IPs, service tags, and VLAN lists.
//! - **Device store** ([`store`]) — the canonical in-memory collection
//!   with fail-soft load and whole-file atomic save.
//! - **Record operations** ([`ops`]) — create/search/update/delete with
//!   per-field re-validation and collection-wide uniqueness checks.
//! - **Navigation stack** ([`nav`]) — the back/home menu history state
//!   machine the interactive shell dispatches on.
//! - **Reports** ([`report`]) — aggregate statistics and the plain-text
//!   export.
//! - **Reachability probe** ([`probe`]) — ping invocation and outcome
//!   classification.

pub mod error;
pub mod model;
pub mod nav;
pub mod ops;
pub mod probe;
pub mod report;
pub mod store;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::{CoreError, PersistenceError, ProbeError, ValidationError};
pub use model::{Device, DeviceId, DeviceType, NetworkTier, Service};
pub use nav::NavStack;
pub use ops::{DeviceDraft, TypeChange};
pub use probe::{ProbeOutcome, ProbeReport};
pub use report::InventoryStats;
pub use store::{Inventory, LoadOutcome};
