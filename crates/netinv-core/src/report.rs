//! Aggregate statistics and the plain-text export.
//!
//! Both read the collection, never mutate it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use strum::IntoEnumIterator;

use crate::error::PersistenceError;
use crate::model::{Device, DeviceType, NetworkTier, Service};

/// Aggregates over the whole collection.
///
/// Distributions are sorted by descending count; VLAN usage breaks count
/// ties by ascending VLAN id so the ordering is total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryStats {
    pub total: usize,
    pub by_type: Vec<(DeviceType, usize)>,
    pub by_location: Vec<(NetworkTier, usize)>,
    pub service_usage: Vec<(Service, usize)>,
    pub devices_with_vlans: usize,
    pub vlan_assignments: usize,
    pub vlan_usage: Vec<(u16, usize)>,
}

impl InventoryStats {
    pub fn collect(devices: &[Device]) -> Self {
        let mut by_type: Vec<(DeviceType, usize)> = DeviceType::iter()
            .map(|t| (t, devices.iter().filter(|d| d.device_type == t).count()))
            .filter(|&(_, n)| n > 0)
            .collect();
        by_type.sort_by(|a, b| b.1.cmp(&a.1));

        let mut by_location: Vec<(NetworkTier, usize)> = NetworkTier::iter()
            .map(|tier| {
                (
                    tier,
                    devices.iter().filter(|d| d.location == Some(tier)).count(),
                )
            })
            .filter(|&(_, n)| n > 0)
            .collect();
        by_location.sort_by(|a, b| b.1.cmp(&a.1));

        let mut service_usage: Vec<(Service, usize)> = Service::iter()
            .map(|s| {
                (
                    s,
                    devices.iter().filter(|d| d.services.contains(&s)).count(),
                )
            })
            .filter(|&(_, n)| n > 0)
            .collect();
        service_usage.sort_by(|a, b| b.1.cmp(&a.1));

        let mut vlan_counts: BTreeMap<u16, usize> = BTreeMap::new();
        let mut devices_with_vlans = 0;
        let mut vlan_assignments = 0;
        for device in devices {
            if device.vlans.is_empty() {
                continue;
            }
            devices_with_vlans += 1;
            vlan_assignments += device.vlans.len();
            for &vlan in &device.vlans {
                *vlan_counts.entry(vlan).or_insert(0) += 1;
            }
        }
        let mut vlan_usage: Vec<_> = vlan_counts.into_iter().collect();
        vlan_usage.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        Self {
            total: devices.len(),
            by_type,
            by_location,
            service_usage,
            devices_with_vlans,
            vlan_assignments,
            vlan_usage,
        }
    }
}

/// Write a timestamped snapshot of all records into `dir`, creating the
/// directory if needed. Returns the path of the file written.
pub fn export_report(
    devices: &[Device],
    dir: &Path,
    operator: &str,
) -> Result<PathBuf, PersistenceError> {
    let now = Local::now();
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| PersistenceError::Write { path, source }
    };

    fs::create_dir_all(dir).map_err(write_err(dir))?;
    let path = dir.join(now.format("device_report_%Y-%m-%d_%H-%M-%S.txt").to_string());
    fs::write(&path, render_report(devices, operator, now)).map_err(write_err(&path))?;
    tracing::info!(path = %path.display(), count = devices.len(), "report exported");
    Ok(path)
}

/// Render the export body. Pure so tests can pin the layout.
fn render_report(devices: &[Device], operator: &str, at: DateTime<Local>) -> String {
    use std::fmt::Write;

    let rule = "=".repeat(78);
    let thin_rule = "-".repeat(78);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "  NETWORK DEVICE INVENTORY REPORT ({})",
        at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "  Generated by: {operator}");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out);

    if devices.is_empty() {
        let _ = writeln!(out, "No devices on record.");
    }
    for (idx, device) in devices.iter().enumerate() {
        let services = if device.services.is_empty() {
            "None".to_owned()
        } else {
            device
                .services
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let vlans = if device.vlans.is_empty() {
            "None".to_owned()
        } else {
            device
                .vlans
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let _ = writeln!(out, "Device #{}", idx + 1);
        let _ = writeln!(out, "  Name: {}", device.name);
        let _ = writeln!(out, "  IP: {}", device.ip_display());
        let _ = writeln!(out, "  Type: {}", device.device_type);
        let _ = writeln!(out, "  Location: {}", device.location_display());
        let _ = writeln!(out, "  Services: {services}");
        let _ = writeln!(out, "  VLANs: {vlans}");
        let _ = writeln!(out, "{thin_rule}");
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Total devices in report: {}", devices.len());
    let _ = writeln!(out, "{rule}");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::DeviceId;
    use pretty_assertions::assert_eq;
    use std::net::Ipv4Addr;

    fn device(
        name: &str,
        device_type: DeviceType,
        location: Option<NetworkTier>,
        services: Vec<Service>,
        vlans: Vec<u16>,
    ) -> Device {
        Device {
            id: DeviceId::new(),
            device_type,
            name: name.into(),
            ip: Some(Ipv4Addr::new(10, 0, 0, 1)),
            location,
            services,
            vlans,
        }
    }

    fn fleet() -> Vec<Device> {
        vec![
            device(
                "core-rtr-1",
                DeviceType::Router,
                Some(NetworkTier::Core),
                vec![Service::Dns, Service::Dhcp],
                vec![10, 20],
            ),
            device(
                "edge-sw-1",
                DeviceType::Switch,
                Some(NetworkTier::Access),
                vec![],
                vec![10],
            ),
            device(
                "edge-sw-2",
                DeviceType::Switch,
                Some(NetworkTier::Access),
                vec![],
                vec![],
            ),
            device("files-srv", DeviceType::Server, None, vec![Service::Dns], vec![]),
        ]
    }

    #[test]
    fn stats_count_types_locations_services_and_vlans() {
        let stats = InventoryStats::collect(&fleet());

        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_type[0], (DeviceType::Switch, 2));
        assert_eq!(stats.by_type.len(), 3);
        assert_eq!(stats.by_location[0], (NetworkTier::Access, 2));
        assert_eq!(stats.by_location[1], (NetworkTier::Core, 1));
        assert_eq!(stats.service_usage[0], (Service::Dns, 2));
        assert_eq!(stats.devices_with_vlans, 2);
        assert_eq!(stats.vlan_assignments, 3);
        assert_eq!(stats.vlan_usage, vec![(10, 2), (20, 1)]);
    }

    #[test]
    fn stats_of_empty_collection_are_all_zero() {
        let stats = InventoryStats::collect(&[]);
        assert_eq!(stats, InventoryStats::default());
    }

    #[test]
    fn rendered_report_has_one_block_per_device_and_a_total() {
        let devices = fleet();
        let body = render_report(&devices, "avery", Local::now());

        assert!(body.contains("Generated by: avery"));
        for (idx, device) in devices.iter().enumerate() {
            assert!(body.contains(&format!("Device #{}", idx + 1)));
            assert!(body.contains(&format!("  Name: {}", device.name)));
        }
        assert!(body.contains("  Services: DNS, DHCP"));
        assert!(body.contains("  VLANs: None"));
        assert!(body.contains("Total devices in report: 4"));
    }

    #[test]
    fn export_creates_the_directory_and_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("reports");
        let path = export_report(&fleet(), &reports, "avery").unwrap();

        assert!(path.starts_with(&reports));
        let body = fs::read_to_string(path).unwrap();
        assert!(body.contains("Total devices in report: 4"));
    }
}
