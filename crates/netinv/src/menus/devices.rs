//! Device lifecycle menus: add, list, search, delete.

use std::time::Duration;

use owo_colors::OwoColorize;
use strum::IntoEnumIterator;

use netinv_core::{CoreError, DeviceDraft, DeviceType, ops};

use crate::error::CliError;
use crate::session::{Flow, Session};
use crate::ui;

use super::util;

/// Walk the operator through a full draft, then commit it in one go.
pub fn add(session: &mut Session) -> Result<Flow, CliError> {
    ui::title("ADD DEVICE", Some(&session.operator));

    let types: Vec<DeviceType> = DeviceType::iter().collect();
    let labels: Vec<String> = types.iter().map(ToString::to_string).collect();
    let Some(idx) = ui::select_or_cancel("Device type", &labels)? else {
        session.nav.back();
        return Ok(Flow::Continue);
    };
    let device_type = types[idx];

    let Some(name) = util::prompt_name(&session.inventory, "Device name (3-50 characters)", None)?
    else {
        ui::info("Add cancelled.");
        session.nav.back();
        return Ok(Flow::Continue);
    };

    let ip = match util::prompt_ip(&session.inventory, None, None)? {
        util::IpEntry::Set(ip) => ip,
        util::IpEntry::Keep => None,
    };

    // Network tier: required-flavored for routers/switches, opt-in
    // otherwise.
    let location = if device_type.expects_location() {
        let tier = util::prompt_location("Network tier")?;
        if tier.is_none() {
            ui::info("Leaving the network tier unset.");
        }
        tier
    } else if ui::confirm(
        &format!("Specify a network tier for this {device_type}?"),
        false,
    )? {
        util::prompt_location("Network tier")?
    } else {
        None
    };

    let services = if device_type.hosts_services() {
        let all: Vec<_> = netinv_core::Service::iter().collect();
        util::prompt_services("Services hosted by this device (space toggles)", &all)?
    } else {
        Vec::new()
    };

    let vlans = if ui::confirm(&format!("Assign VLANs to this {device_type}?"), false)? {
        util::prompt_vlans("VLANs (1-4094, comma-separated, Enter for none)")?
    } else {
        Vec::new()
    };

    let draft = DeviceDraft {
        device_type,
        name: name.clone(),
        ip,
        location,
        services,
        vlans,
    };
    match ops::create_device(&mut session.inventory, draft) {
        Ok(_) => {
            ui::progress("Saving the new device...", Duration::from_millis(600));
            ui::success(&format!("Device '{name}' added."));
        }
        Err(CoreError::Validation(err)) => {
            ui::error(&format!("The device was not added: {err}"));
        }
        Err(err) => return Err(err.into()),
    }
    ui::pause()?;
    session.nav.back();
    Ok(Flow::Continue)
}

/// Read-only table of the whole collection.
pub fn list(session: &mut Session) -> Result<Flow, CliError> {
    ui::title("ALL DEVICES", Some(&session.operator));

    if session.inventory.is_empty() {
        ui::warn("There are no devices on record yet.");
    } else {
        let devices: Vec<_> = session.inventory.devices().iter().collect();
        println!("{}", ui::device_table(&devices));
    }
    ui::pause()?;
    session.nav.back();
    Ok(Flow::Continue)
}

/// Case-insensitive substring search on name.
pub fn search(session: &mut Session) -> Result<Flow, CliError> {
    ui::title("SEARCH DEVICES", Some(&session.operator));

    if session.inventory.is_empty() {
        ui::warn("There are no devices to search.");
        ui::pause()?;
        session.nav.back();
        return Ok(Flow::Continue);
    }

    let query = ui::input("Name or part of a name (Enter to cancel)")?;
    if query.is_empty() {
        ui::info("Search cancelled.");
        session.nav.back();
        return Ok(Flow::Continue);
    }

    let matches = ops::search_by_name(&session.inventory, &query);
    if matches.is_empty() {
        ui::warn(&format!("No devices match '{query}'."));
    } else {
        ui::progress("Searching...", Duration::from_millis(300));
        println!("{}", format!("Matches for '{query}':").bold());
        println!("{}", ui::device_table(&matches));
    }
    ui::pause()?;
    session.nav.back();
    Ok(Flow::Continue)
}

/// Confirmed, irreversible removal of one record.
pub fn delete(session: &mut Session) -> Result<Flow, CliError> {
    ui::title("DELETE DEVICE", Some(&session.operator));

    if session.inventory.is_empty() {
        ui::warn("There are no devices to delete.");
        ui::pause()?;
        session.nav.back();
        return Ok(Flow::Continue);
    }

    let candidates: Vec<_> = session.inventory.devices().iter().collect();
    let id = match util::pick_device("Device to delete", &candidates)? {
        util::Picked::Device(id) => id,
        util::Picked::Nav(nav) => return super::nav_flow(nav, session),
    };
    let name = session
        .inventory
        .get(id)
        .map(|d| d.name.clone())
        .unwrap_or_default();

    println!("{}", "⚠ This action is irreversible.".red().bold());
    if ui::confirm(
        &format!("Really delete '{name}'?"),
        false,
    )? {
        ops::delete_device(&mut session.inventory, id)?;
        ui::progress("Deleting and saving...", Duration::from_millis(600));
        ui::success(&format!("Device '{name}' deleted."));
    } else {
        ui::info("Deletion cancelled.");
    }
    ui::pause()?;
    session.nav.back();
    Ok(Flow::Continue)
}
