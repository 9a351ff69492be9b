// ── Core error types ──
//
// One enum per failure family, unified under `CoreError`. Validation and
// probe errors are recoverable at the point of occurrence; persistence
// and navigation errors bubble to the session loop, which reports and
// recovers rather than crashing.

use std::io;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use thiserror::Error;

/// Malformed, out-of-range, or duplicate field input. Always recoverable;
/// the operator retries or abandons the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name may only contain letters, digits, spaces, '-', '.' and '_'")]
    InvalidFormat,

    #[error("name must be between 3 and 50 characters (got {len})")]
    InvalidLength { len: usize },

    #[error("'{input}' is not a valid IP: expected four dot-separated numbers, e.g. 192.168.1.10")]
    MalformedIp { input: String },

    #[error("octet '{octet}' must be a number between 0 and 255")]
    InvalidOctet { octet: String },

    #[error("first octet 0 is reserved (\"this network\")")]
    ZeroNetwork,

    #[error("127.x.x.x addresses are reserved for loopback")]
    Loopback,

    #[error("224.x.x.x through 239.x.x.x are reserved for multicast")]
    Multicast,

    #[error("240.x.x.x and above are reserved for future use")]
    ReservedRange,

    #[error("255.255.255.255 is the limited broadcast address")]
    LimitedBroadcast,

    #[error("unknown service tag '{0}'")]
    UnknownService(String),

    #[error("VLAN '{token}' is not a valid number")]
    VlanNotNumeric { token: String },

    #[error("VLAN {vlan} is outside the valid range 1-4094")]
    VlanOutOfRange { vlan: u32 },

    #[error("the name '{name}' is already in use by another device")]
    DuplicateName { name: String },

    #[error("the IP {ip} is already assigned to '{holder}'")]
    DuplicateIp { ip: Ipv4Addr, holder: String },
}

/// Backing-file failure. Load failures degrade to an empty collection;
/// save failures leave the in-memory state authoritative.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid inventory file: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reachability probe failure. Reported, never fatal to the session.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("the ping utility was not found on this system")]
    UtilityMissing,

    #[error("ping did not finish within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("failed to run ping: {0}")]
    Io(io::Error),
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("menu history is inconsistent: {message}")]
    Navigation { message: String },
}
