//! Field-by-field editing of an existing record, plus the dedicated
//! service-membership menu.
//!
//! A failed validation reports and leaves the record untouched; the
//! operator can retry the field or move on to another one.

use strum::IntoEnumIterator;

use netinv_core::{CoreError, DeviceId, DeviceType, Service, ops};

use crate::error::CliError;
use crate::session::{Flow, Session};
use crate::ui;

use super::util;

/// Pick a device, then loop over its editable fields.
pub fn modify(session: &mut Session) -> Result<Flow, CliError> {
    ui::title("MODIFY DEVICE", Some(&session.operator));

    if session.inventory.is_empty() {
        ui::warn("There are no devices to modify.");
        ui::pause()?;
        session.nav.back();
        return Ok(Flow::Continue);
    }

    let candidates: Vec<_> = session.inventory.devices().iter().collect();
    let id = match util::pick_device("Device to modify", &candidates)? {
        util::Picked::Device(id) => id,
        util::Picked::Nav(nav) => return super::nav_flow(nav, session),
    };

    loop {
        let Some(device) = session.inventory.get(id) else {
            break;
        };
        ui::title(&format!("MODIFYING: {}", device.name), Some(&session.operator));
        println!("{}\n", ui::device_detail(device));

        let fields = [
            "Name".to_owned(),
            "IP address".to_owned(),
            "Device type".to_owned(),
            "Network tier".to_owned(),
            "Services".to_owned(),
            "VLANs".to_owned(),
        ];
        let Some(field) = ui::select_or_cancel("Field to change (Cancel to finish)", &fields)?
        else {
            break;
        };

        let result = match field {
            0 => edit_name(session, id),
            1 => edit_ip(session, id),
            2 => edit_type(session, id),
            3 => edit_location(session, id),
            4 => edit_services(session, id),
            5 => edit_vlans(session, id),
            _ => Ok(()),
        };
        match result {
            Ok(()) => {}
            // Field-level validation failures were already reported by
            // the prompt loops; anything surfacing here is a late check.
            Err(CliError::Core(CoreError::Validation(err))) => ui::error(&err.to_string()),
            Err(err) => return Err(err),
        }
    }

    session.nav.back();
    Ok(Flow::Continue)
}

fn edit_name(session: &mut Session, id: DeviceId) -> Result<(), CliError> {
    let Some(new_name) = util::prompt_name(
        &session.inventory,
        "New name (Enter to keep the current one)",
        Some(id),
    )?
    else {
        return Ok(());
    };
    if ops::rename_device(&mut session.inventory, id, &new_name)? {
        ui::success("Name updated.");
    } else {
        ui::info("Name unchanged.");
    }
    Ok(())
}

fn edit_ip(session: &mut Session, id: DeviceId) -> Result<(), CliError> {
    let current = session.inventory.get(id).map(|d| d.ip);
    match util::prompt_ip(&session.inventory, current, Some(id))? {
        util::IpEntry::Keep => ui::info("IP unchanged."),
        util::IpEntry::Set(ip) => {
            if ops::set_ip(&mut session.inventory, id, ip)? {
                ui::success("IP updated.");
            } else {
                ui::info("IP unchanged.");
            }
        }
    }
    Ok(())
}

fn edit_type(session: &mut Session, id: DeviceId) -> Result<(), CliError> {
    let types: Vec<DeviceType> = DeviceType::iter().collect();
    let labels: Vec<String> = types.iter().map(ToString::to_string).collect();
    let Some(idx) = ui::select_or_cancel("New device type", &labels)? else {
        return Ok(());
    };

    let change = ops::set_device_type(&mut session.inventory, id, types[idx])?;
    if change.changed {
        ui::success("Device type updated.");
        if change.review_advised {
            // Kept on purpose; flag it rather than silently clearing.
            ui::warn("The services and network tier were kept; review whether they still apply.");
        }
    } else {
        ui::info("Device type unchanged.");
    }
    Ok(())
}

fn edit_location(session: &mut Session, id: DeviceId) -> Result<(), CliError> {
    let tier = util::prompt_location("New network tier (Cancel to unset)")?;
    if tier.is_none() && !ui::confirm("Set the network tier to N/A?", false)? {
        ui::info("Network tier unchanged.");
        return Ok(());
    }
    if ops::set_location(&mut session.inventory, id, tier)? {
        ui::success("Network tier updated.");
    } else {
        ui::info("Network tier unchanged.");
    }
    Ok(())
}

fn edit_services(session: &mut Session, id: DeviceId) -> Result<(), CliError> {
    let Some(device) = session.inventory.get(id) else {
        return Ok(());
    };
    if !device.device_type.hosts_services() {
        ui::warn(&format!(
            "Services do not usually apply to a {}.",
            device.device_type
        ));
        if !ui::confirm("Manage them anyway?", false)? {
            return Ok(());
        }
    }
    service_membership(session, id)
}

/// Add/remove loop over one device's service set. Add offers only the
/// complement of what is already assigned.
fn service_membership(session: &mut Session, id: DeviceId) -> Result<(), CliError> {
    loop {
        let Some(device) = session.inventory.get(id) else {
            return Ok(());
        };
        let current = device.services.clone();
        ui::info(&format!(
            "Current services: {}",
            if current.is_empty() {
                "None".to_owned()
            } else {
                current
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        ));

        let actions = ["Add services".to_owned(), "Remove services".to_owned()];
        let Some(action) = ui::select_or_cancel("Service action (Cancel to finish)", &actions)?
        else {
            return Ok(());
        };

        if action == 0 {
            let available: Vec<Service> =
                Service::iter().filter(|s| !current.contains(s)).collect();
            if available.is_empty() {
                ui::info("Every service tag is already assigned.");
                continue;
            }
            let picked = util::prompt_services("Services to add (space toggles)", &available)?;
            let added = ops::add_services(&mut session.inventory, id, &picked)?;
            if added.is_empty() {
                ui::info("No services added.");
            } else {
                ui::success(&format!(
                    "Added: {}",
                    added
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
        } else {
            if current.is_empty() {
                ui::info("There are no services to remove.");
                continue;
            }
            let picked = util::prompt_services("Services to remove (space toggles)", &current)?;
            let removed = ops::remove_services(&mut session.inventory, id, &picked)?;
            if removed.is_empty() {
                ui::info("No services removed.");
            } else {
                ui::success(&format!(
                    "Removed: {}",
                    removed
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
        }
    }
}

/// Add/remove loop over one device's VLAN set.
fn edit_vlans(session: &mut Session, id: DeviceId) -> Result<(), CliError> {
    loop {
        let Some(device) = session.inventory.get(id) else {
            return Ok(());
        };
        let current = device.vlans.clone();
        ui::info(&format!(
            "Current VLANs: {}",
            if current.is_empty() {
                "None".to_owned()
            } else {
                current
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        ));

        let actions = ["Add VLANs".to_owned(), "Remove VLANs".to_owned()];
        let Some(action) = ui::select_or_cancel("VLAN action (Cancel to finish)", &actions)?
        else {
            return Ok(());
        };

        if action == 0 {
            let vlans = util::prompt_vlans("VLANs to add (1-4094, comma-separated)")?;
            if vlans.is_empty() {
                continue;
            }
            let added = ops::add_vlans(&mut session.inventory, id, &vlans)?;
            if added.is_empty() {
                ui::info("Those VLANs are already assigned.");
            } else {
                ui::success(&format!(
                    "Added VLANs: {}",
                    added
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
        } else {
            if current.is_empty() {
                ui::info("There are no VLANs to remove.");
                continue;
            }
            let labels: Vec<String> = current.iter().map(|v| format!("VLAN {v}")).collect();
            let Some(idx) = ui::select_or_cancel("VLAN to remove", &labels)? else {
                continue;
            };
            let removed = ops::remove_vlans(&mut session.inventory, id, &[current[idx]])?;
            if let Some(vlan) = removed.first() {
                ui::success(&format!("Removed VLAN {vlan}."));
            }
        }
    }
}

/// The dedicated services menu from the root: restricted to device types
/// that conventionally host services.
pub fn manage_services(session: &mut Session) -> Result<Flow, CliError> {
    ui::title("MANAGE SERVICES", Some(&session.operator));

    let eligible: Vec<_> = session
        .inventory
        .devices()
        .iter()
        .filter(|d| d.device_type.hosts_services())
        .collect();
    if eligible.is_empty() {
        ui::warn("No eligible devices (server, router, or firewall) on record.");
        ui::pause()?;
        session.nav.back();
        return Ok(Flow::Continue);
    }

    let id = match util::pick_device("Device to manage services for", &eligible)? {
        util::Picked::Device(id) => id,
        util::Picked::Nav(nav) => return super::nav_flow(nav, session),
    };

    service_membership(session, id)?;
    session.nav.back();
    Ok(Flow::Continue)
}
