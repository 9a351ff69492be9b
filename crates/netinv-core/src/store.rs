//! The device store: the canonical in-memory collection and its mirror
//! on disk.
//!
//! The whole collection is rewritten on every mutation; the format is a
//! single pretty-printed JSON array. Collections are assumed small (tens
//! to low hundreds of records), so there is no incremental persistence.

use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;
use crate::model::{Device, DeviceId};

/// How opening the backing file went. A corrupt or unreadable file must
/// not prevent the session from starting, so failures degrade to an
/// empty collection and are surfaced here instead of as an `Err`.
#[derive(Debug)]
pub enum LoadOutcome {
    /// File existed and parsed; carries the record count.
    Loaded(usize),
    /// No backing file yet; starting fresh.
    Missing,
    /// File existed but could not be read or parsed.
    Failed(PersistenceError),
}

/// Owner of the ordered device collection and its backing file.
#[derive(Debug)]
pub struct Inventory {
    devices: Vec<Device>,
    path: PathBuf,
}

impl Inventory {
    /// Open the inventory at `path`, fail-soft.
    pub fn open(path: impl Into<PathBuf>) -> (Self, LoadOutcome) {
        let path = path.into();
        let (devices, outcome) = match read_devices(&path) {
            Ok(Some(devices)) => {
                let count = devices.len();
                (devices, LoadOutcome::Loaded(count))
            }
            Ok(None) => (Vec::new(), LoadOutcome::Missing),
            Err(err) => {
                tracing::warn!(error = %err, "inventory load failed, starting empty");
                (Vec::new(), LoadOutcome::Failed(err))
            }
        };
        (Self { devices, path }, outcome)
    }

    /// In-memory construction for tests and tooling; `save` writes to `path`.
    pub fn with_devices(path: impl Into<PathBuf>, devices: Vec<Device>) -> Self {
        Self {
            devices,
            path: path.into(),
        }
    }

    /// Persist the full collection. Writes a sibling temp file first and
    /// renames it over the target so a failed write cannot truncate the
    /// previous snapshot.
    pub fn save(&self) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(&self.devices).map_err(|source| {
            PersistenceError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        tracing::debug!(path = %self.path.display(), count = self.devices.len(), "inventory saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.devices.iter_mut().find(|d| d.id == id)
    }

    pub(crate) fn push(&mut self, device: Device) {
        self.devices.push(device);
    }

    pub(crate) fn remove(&mut self, id: DeviceId) -> Option<Device> {
        let idx = self.devices.iter().position(|d| d.id == id)?;
        Some(self.devices.remove(idx))
    }

    /// The device (other than `exclude`) already using `name`,
    /// case-insensitively.
    pub fn name_conflict(&self, name: &str, exclude: Option<DeviceId>) -> Option<&Device> {
        let wanted = name.trim().to_lowercase();
        self.devices
            .iter()
            .filter(|d| Some(d.id) != exclude)
            .find(|d| d.name.to_lowercase() == wanted)
    }

    /// The device (other than `exclude`) already holding `ip`.
    pub fn ip_conflict(&self, ip: Ipv4Addr, exclude: Option<DeviceId>) -> Option<&Device> {
        self.devices
            .iter()
            .filter(|d| Some(d.id) != exclude)
            .find(|d| d.ip == Some(ip))
    }
}

/// Read and parse the backing file. `Ok(None)` means the file does not
/// exist yet.
fn read_devices(path: &Path) -> Result<Option<Vec<Device>>, PersistenceError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistenceError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let devices = serde_json::from_str(&raw).map_err(|source| PersistenceError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(devices))
}
