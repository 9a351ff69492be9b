// ── Surrogate record identity ──
//
// Mutable fields (name, IP) cannot anchor lookups while they are being
// edited, so every record carries an identifier assigned at creation and
// never persisted. Records loaded from disk get a fresh one.

use std::fmt;

use uuid::Uuid;

/// Stable, session-scoped identifier for a [`Device`](super::Device).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(Uuid);

impl DeviceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
