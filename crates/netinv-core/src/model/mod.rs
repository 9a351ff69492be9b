// ── Inventory domain model ──
//
// Canonical record types for the managed inventory. The persisted JSON
// layout (uppercase keys, "N/A" sentinels) is fixed by the on-disk
// format and lives in `device.rs` alongside the types.

pub mod device;
pub mod device_id;

pub use device::{Device, DeviceType, NetworkTier, Service};
pub use device_id::DeviceId;
