//! Record operations.
//!
//! Every mutation re-validates the touched fields, re-checks uniqueness
//! against all *other* records, applies the change, and persists the full
//! collection before returning. A validation failure leaves the record
//! untouched. A save failure surfaces as `CoreError::Persistence` but
//! does NOT roll the mutation back: the in-memory state stays
//! authoritative for the rest of the session.

use std::net::Ipv4Addr;

use crate::error::{CoreError, ValidationError};
use crate::model::{Device, DeviceId, DeviceType, NetworkTier, Service};
use crate::store::Inventory;
use crate::validate;

/// Candidate fields for a new record. Nothing is constructed until the
/// whole draft validates.
#[derive(Debug, Clone)]
pub struct DeviceDraft {
    pub device_type: DeviceType,
    pub name: String,
    pub ip: Option<Ipv4Addr>,
    pub location: Option<NetworkTier>,
    pub services: Vec<Service>,
    pub vlans: Vec<u16>,
}

/// Result of retyping a device. `review_advised` flags that the record
/// kept services or a location that may no longer fit the new type;
/// they are deliberately not cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeChange {
    pub changed: bool,
    pub review_advised: bool,
}

/// Validate a whole draft and, if it passes, commit the new record.
pub fn create_device(inv: &mut Inventory, draft: DeviceDraft) -> Result<DeviceId, CoreError> {
    validate::validate_name(&draft.name)?;
    check_name_free(inv, &draft.name, None)?;
    if let Some(ip) = draft.ip {
        check_ip_free(inv, ip, None)?;
    }

    let device = Device {
        id: DeviceId::new(),
        device_type: draft.device_type,
        name: draft.name.trim().to_owned(),
        ip: draft.ip,
        location: draft.location,
        services: dedup_services(draft.services),
        vlans: dedup_vlans(draft.vlans),
    };
    let id = device.id;
    inv.push(device);
    inv.save()?;
    Ok(id)
}

/// Case-insensitive substring search on name, preserving store order.
pub fn search_by_name<'inv>(inv: &'inv Inventory, query: &str) -> Vec<&'inv Device> {
    let needle = query.trim().to_lowercase();
    inv.devices()
        .iter()
        .filter(|d| d.name.to_lowercase().contains(&needle))
        .collect()
}

/// Rename a device. Returns `false` when the name was already current.
pub fn rename_device(inv: &mut Inventory, id: DeviceId, new_name: &str) -> Result<bool, CoreError> {
    validate::validate_name(new_name)?;
    check_name_free(inv, new_name, Some(id))?;

    let device = get_mut(inv, id)?;
    let new_name = new_name.trim();
    if device.name == new_name {
        return Ok(false);
    }
    device.name = new_name.to_owned();
    inv.save()?;
    Ok(true)
}

/// Assign or clear a device's IP.
pub fn set_ip(inv: &mut Inventory, id: DeviceId, ip: Option<Ipv4Addr>) -> Result<bool, CoreError> {
    if let Some(ip) = ip {
        check_ip_free(inv, ip, Some(id))?;
    }

    let device = get_mut(inv, id)?;
    if device.ip == ip {
        return Ok(false);
    }
    device.ip = ip;
    inv.save()?;
    Ok(true)
}

/// Retype a device. Services and location are kept as-is even when they
/// no longer fit the new type; the returned advisory tells the caller to
/// suggest a review instead of silently clearing operator data.
pub fn set_device_type(
    inv: &mut Inventory,
    id: DeviceId,
    device_type: DeviceType,
) -> Result<TypeChange, CoreError> {
    let device = get_mut(inv, id)?;
    if device.device_type == device_type {
        return Ok(TypeChange {
            changed: false,
            review_advised: false,
        });
    }
    device.device_type = device_type;
    let review_advised = (!device_type.hosts_services() && !device.services.is_empty())
        || (!device_type.expects_location() && device.location.is_some());
    inv.save()?;
    Ok(TypeChange {
        changed: true,
        review_advised,
    })
}

/// Assign or clear a device's network tier.
pub fn set_location(
    inv: &mut Inventory,
    id: DeviceId,
    location: Option<NetworkTier>,
) -> Result<bool, CoreError> {
    let device = get_mut(inv, id)?;
    if device.location == location {
        return Ok(false);
    }
    device.location = location;
    inv.save()?;
    Ok(true)
}

/// Add service tags. Tags already present are skipped; the returned list
/// holds what was actually added. Saves only on a real change.
pub fn add_services(
    inv: &mut Inventory,
    id: DeviceId,
    tags: &[Service],
) -> Result<Vec<Service>, CoreError> {
    let device = get_mut(inv, id)?;
    let mut added = Vec::new();
    for &tag in tags {
        if !device.services.contains(&tag) && !added.contains(&tag) {
            added.push(tag);
        }
    }
    if added.is_empty() {
        return Ok(added);
    }
    device.services.extend(&added);
    inv.save()?;
    Ok(added)
}

/// Remove service tags. Returns what was actually removed.
pub fn remove_services(
    inv: &mut Inventory,
    id: DeviceId,
    tags: &[Service],
) -> Result<Vec<Service>, CoreError> {
    let device = get_mut(inv, id)?;
    let mut removed = Vec::new();
    for &tag in tags {
        if device.services.contains(&tag) && !removed.contains(&tag) {
            removed.push(tag);
        }
    }
    if removed.is_empty() {
        return Ok(removed);
    }
    device.services.retain(|tag| !removed.contains(tag));
    inv.save()?;
    Ok(removed)
}

/// Add VLANs, keeping the set sorted. Returns what was actually added.
pub fn add_vlans(inv: &mut Inventory, id: DeviceId, vlans: &[u16]) -> Result<Vec<u16>, CoreError> {
    for &vlan in vlans {
        if !(validate::VLAN_MIN..=validate::VLAN_MAX).contains(&vlan) {
            return Err(ValidationError::VlanOutOfRange {
                vlan: u32::from(vlan),
            }
            .into());
        }
    }

    let device = get_mut(inv, id)?;
    let mut added = Vec::new();
    for &vlan in vlans {
        if !device.vlans.contains(&vlan) && !added.contains(&vlan) {
            added.push(vlan);
        }
    }
    if added.is_empty() {
        return Ok(added);
    }
    device.vlans.extend(&added);
    device.vlans.sort_unstable();
    inv.save()?;
    Ok(added)
}

/// Remove VLANs. Returns what was actually removed.
pub fn remove_vlans(
    inv: &mut Inventory,
    id: DeviceId,
    vlans: &[u16],
) -> Result<Vec<u16>, CoreError> {
    let device = get_mut(inv, id)?;
    let mut removed = Vec::new();
    for &vlan in vlans {
        if device.vlans.contains(&vlan) && !removed.contains(&vlan) {
            removed.push(vlan);
        }
    }
    if removed.is_empty() {
        return Ok(removed);
    }
    device.vlans.retain(|vlan| !removed.contains(vlan));
    inv.save()?;
    Ok(removed)
}

/// Remove a record outright. Confirmation is the caller's business.
pub fn delete_device(inv: &mut Inventory, id: DeviceId) -> Result<Device, CoreError> {
    let device = inv.remove(id).ok_or_else(|| CoreError::DeviceNotFound {
        identifier: id.to_string(),
    })?;
    inv.save()?;
    Ok(device)
}

// ── Shared checks ───────────────────────────────────────────────────

fn get_mut(inv: &mut Inventory, id: DeviceId) -> Result<&mut Device, CoreError> {
    inv.get_mut(id).ok_or_else(|| CoreError::DeviceNotFound {
        identifier: id.to_string(),
    })
}

fn check_name_free(
    inv: &Inventory,
    name: &str,
    exclude: Option<DeviceId>,
) -> Result<(), CoreError> {
    if inv.name_conflict(name, exclude).is_some() {
        return Err(ValidationError::DuplicateName {
            name: name.trim().to_owned(),
        }
        .into());
    }
    Ok(())
}

fn check_ip_free(inv: &Inventory, ip: Ipv4Addr, exclude: Option<DeviceId>) -> Result<(), CoreError> {
    if let Some(holder) = inv.ip_conflict(ip, exclude) {
        return Err(ValidationError::DuplicateIp {
            ip,
            holder: holder.name.clone(),
        }
        .into());
    }
    Ok(())
}

fn dedup_services(services: Vec<Service>) -> Vec<Service> {
    let mut out = Vec::with_capacity(services.len());
    for service in services {
        if !out.contains(&service) {
            out.push(service);
        }
    }
    out
}

fn dedup_vlans(mut vlans: Vec<u16>) -> Vec<u16> {
    vlans.sort_unstable();
    vlans.dedup();
    vlans
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::LoadOutcome;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn scratch_inventory() -> (TempDir, Inventory) {
        let dir = tempfile::tempdir().unwrap();
        let inv = Inventory::with_devices(dir.path().join("devices.json"), Vec::new());
        (dir, inv)
    }

    fn router_draft() -> DeviceDraft {
        DeviceDraft {
            device_type: DeviceType::Router,
            name: "core-rtr-1".into(),
            ip: Some(Ipv4Addr::new(10, 0, 0, 1)),
            location: Some(NetworkTier::Core),
            services: vec![],
            vlans: vec![10, 20],
        }
    }

    #[test]
    fn create_persists_and_round_trips() {
        let (_dir, mut inv) = scratch_inventory();
        create_device(&mut inv, router_draft()).unwrap();

        let (reloaded, outcome) = Inventory::open(inv.path());
        assert!(matches!(outcome, LoadOutcome::Loaded(1)));
        let device = &reloaded.devices()[0];
        assert_eq!(device.device_type, DeviceType::Router);
        assert_eq!(device.name, "core-rtr-1");
        assert_eq!(device.ip, Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(device.location, Some(NetworkTier::Core));
        assert!(device.services.is_empty());
        assert_eq!(device.vlans, vec![10, 20]);
    }

    #[test]
    fn create_rejects_case_insensitive_name_collision() {
        let (_dir, mut inv) = scratch_inventory();
        create_device(&mut inv, router_draft()).unwrap();

        let mut collision = router_draft();
        collision.name = "Core-Rtr-1".into();
        collision.ip = None;
        let err = create_device(&mut inv, collision).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::DuplicateName { .. })
        ));
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn create_rejects_duplicate_ip() {
        let (_dir, mut inv) = scratch_inventory();
        create_device(&mut inv, router_draft()).unwrap();

        let mut collision = router_draft();
        collision.name = "core-rtr-2".into();
        let err = create_device(&mut inv, collision).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::DuplicateIp { .. })
        ));
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn create_deduplicates_draft_sets() {
        let (_dir, mut inv) = scratch_inventory();
        let mut draft = router_draft();
        draft.device_type = DeviceType::Server;
        draft.services = vec![Service::Dns, Service::Web, Service::Dns];
        draft.vlans = vec![30, 10, 30];
        let id = create_device(&mut inv, draft).unwrap();

        let device = inv.get(id).unwrap();
        assert_eq!(device.services, vec![Service::Dns, Service::Web]);
        assert_eq!(device.vlans, vec![10, 30]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let (_dir, mut inv) = scratch_inventory();
        create_device(&mut inv, router_draft()).unwrap();
        let mut second = router_draft();
        second.name = "edge-sw-1".into();
        second.ip = None;
        create_device(&mut inv, second).unwrap();

        let hits = search_by_name(&inv, "RTR");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "core-rtr-1");
        assert!(search_by_name(&inv, "printer").is_empty());
    }

    #[test]
    fn rename_collision_leaves_both_names_unchanged() {
        let (_dir, mut inv) = scratch_inventory();
        let first = create_device(&mut inv, router_draft()).unwrap();
        let mut second_draft = router_draft();
        second_draft.name = "core-rtr-2".into();
        second_draft.ip = None;
        let second = create_device(&mut inv, second_draft).unwrap();

        let err = rename_device(&mut inv, second, "Core-Rtr-1").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::DuplicateName { .. })
        ));
        assert_eq!(inv.get(first).unwrap().name, "core-rtr-1");
        assert_eq!(inv.get(second).unwrap().name, "core-rtr-2");
    }

    #[test]
    fn rename_survives_a_reload() {
        let (_dir, mut inv) = scratch_inventory();
        let id = create_device(&mut inv, router_draft()).unwrap();
        assert!(rename_device(&mut inv, id, "core-rtr-9").unwrap());

        let (reloaded, _) = Inventory::open(inv.path());
        assert_eq!(reloaded.devices()[0].name, "core-rtr-9");
    }

    #[test]
    fn rename_to_own_name_is_a_noop() {
        let (_dir, mut inv) = scratch_inventory();
        let id = create_device(&mut inv, router_draft()).unwrap();
        assert!(!rename_device(&mut inv, id, "core-rtr-1").unwrap());
    }

    #[test]
    fn set_ip_enforces_uniqueness_excluding_self() {
        let (_dir, mut inv) = scratch_inventory();
        let first = create_device(&mut inv, router_draft()).unwrap();
        let mut second_draft = router_draft();
        second_draft.name = "core-rtr-2".into();
        second_draft.ip = None;
        let second = create_device(&mut inv, second_draft).unwrap();

        // Re-assigning its own IP is fine (and a no-op).
        assert!(!set_ip(&mut inv, first, Some(Ipv4Addr::new(10, 0, 0, 1))).unwrap());

        let err = set_ip(&mut inv, second, Some(Ipv4Addr::new(10, 0, 0, 1))).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::DuplicateIp { .. })
        ));
        assert_eq!(inv.get(second).unwrap().ip, None);
    }

    #[test]
    fn retyping_keeps_stale_fields_but_advises_review() {
        let (_dir, mut inv) = scratch_inventory();
        let mut draft = router_draft();
        draft.services = vec![Service::Dhcp];
        let id = create_device(&mut inv, draft).unwrap();

        let change = set_device_type(&mut inv, id, DeviceType::Printer).unwrap();
        assert!(change.changed);
        assert!(change.review_advised);

        // Permissive by design: nothing was cleared.
        let device = inv.get(id).unwrap();
        assert_eq!(device.services, vec![Service::Dhcp]);
        assert_eq!(device.location, Some(NetworkTier::Core));
    }

    #[test]
    fn service_membership_add_remove() {
        let (_dir, mut inv) = scratch_inventory();
        let mut draft = router_draft();
        draft.device_type = DeviceType::Server;
        draft.services = vec![Service::Dns];
        let id = create_device(&mut inv, draft).unwrap();

        let added = add_services(&mut inv, id, &[Service::Dns, Service::Web]).unwrap();
        assert_eq!(added, vec![Service::Web]);
        assert_eq!(inv.get(id).unwrap().services, vec![Service::Dns, Service::Web]);

        let removed = remove_services(&mut inv, id, &[Service::Dns, Service::Mail]).unwrap();
        assert_eq!(removed, vec![Service::Dns]);
        assert_eq!(inv.get(id).unwrap().services, vec![Service::Web]);
    }

    #[test]
    fn vlan_membership_add_remove() {
        let (_dir, mut inv) = scratch_inventory();
        let id = create_device(&mut inv, router_draft()).unwrap();

        let added = add_vlans(&mut inv, id, &[20, 5]).unwrap();
        assert_eq!(added, vec![5]);
        assert_eq!(inv.get(id).unwrap().vlans, vec![5, 10, 20]);

        let err = add_vlans(&mut inv, id, &[0]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::VlanOutOfRange { vlan: 0 })
        ));

        let removed = remove_vlans(&mut inv, id, &[10, 99]).unwrap();
        assert_eq!(removed, vec![10]);
        assert_eq!(inv.get(id).unwrap().vlans, vec![5, 20]);
    }

    #[test]
    fn delete_removes_exactly_one_and_persists() {
        let (_dir, mut inv) = scratch_inventory();
        let first = create_device(&mut inv, router_draft()).unwrap();
        let mut second_draft = router_draft();
        second_draft.name = "core-rtr-2".into();
        second_draft.ip = None;
        create_device(&mut inv, second_draft).unwrap();

        let removed = delete_device(&mut inv, first).unwrap();
        assert_eq!(removed.name, "core-rtr-1");
        assert_eq!(inv.len(), 1);

        let (reloaded, outcome) = Inventory::open(inv.path());
        assert!(matches!(outcome, LoadOutcome::Loaded(1)));
        assert_eq!(reloaded.devices()[0].name, "core-rtr-2");
    }

    #[test]
    fn delete_unknown_id_is_an_error() {
        let (_dir, mut inv) = scratch_inventory();
        create_device(&mut inv, router_draft()).unwrap();
        let err = delete_device(&mut inv, DeviceId::new()).unwrap_err();
        assert!(matches!(err, CoreError::DeviceNotFound { .. }));
        assert_eq!(inv.len(), 1);
    }
}
