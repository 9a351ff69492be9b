//! Shared helpers for menu handlers: device pickers and the retry-loop
//! field prompts.
//!
//! Prompts validate at the boundary and loop until the input passes or
//! the operator backs out, so the record operations downstream only ever
//! see well-formed values (they still re-validate).

use std::net::Ipv4Addr;

use dialoguer::{MultiSelect, theme::ColorfulTheme};
use strum::IntoEnumIterator;

use netinv_core::{Device, DeviceId, Inventory, NetworkTier, Service, validate};

use crate::error::CliError;
use crate::ui;

/// A device picker outcome: a selection, or one of the navigation
/// entries every non-root menu exposes.
pub enum Picked {
    Device(DeviceId),
    Nav(ui::NavChoice),
}

/// Pick a device out of `candidates`, with back/home/quit appended.
pub fn pick_device(prompt: &str, candidates: &[&Device]) -> Result<Picked, CliError> {
    let labels: Vec<String> = candidates.iter().map(|d| ui::device_label(d)).collect();
    match ui::select_with_nav(prompt, &labels, false)? {
        ui::NavChoice::Item(idx) => Ok(Picked::Device(candidates[idx].id)),
        nav => Ok(Picked::Nav(nav)),
    }
}

/// Prompt for a device name until it validates and is free. Empty input
/// cancels. `exclude` skips the record being edited in the uniqueness
/// check.
pub fn prompt_name(
    inv: &Inventory,
    prompt: &str,
    exclude: Option<DeviceId>,
) -> Result<Option<String>, CliError> {
    loop {
        let name = ui::input(prompt)?;
        if name.is_empty() {
            return Ok(None);
        }
        if let Err(err) = validate::validate_name(&name) {
            ui::error(&err.to_string());
            continue;
        }
        if let Some(holder) = inv.name_conflict(&name, exclude) {
            ui::warn(&format!(
                "The name '{name}' is already used by '{}'.",
                holder.name
            ));
            continue;
        }
        return Ok(Some(name));
    }
}

/// Outcome of the IP prompt: a value to set, or "keep what's there".
pub enum IpEntry {
    Set(Option<Ipv4Addr>),
    Keep,
}

/// Prompt for an IP until it validates and is free. Empty input keeps
/// the current value when editing (`current` is `Some`), or means
/// "unset" when creating.
pub fn prompt_ip(
    inv: &Inventory,
    current: Option<Option<Ipv4Addr>>,
    exclude: Option<DeviceId>,
) -> Result<IpEntry, CliError> {
    let prompt = match current {
        Some(ip) => format!(
            "IP address (current: {}, Enter to keep)",
            ip.map_or_else(|| "N/A".to_owned(), |ip| ip.to_string())
        ),
        None => "IP address (Enter if none)".to_owned(),
    };
    loop {
        let raw = ui::input(&prompt)?;
        if raw.is_empty() && current.is_some() {
            return Ok(IpEntry::Keep);
        }
        match validate::validate_ip(&raw) {
            Ok(None) => return Ok(IpEntry::Set(None)),
            Ok(Some(ip)) => {
                if let Some(holder) = inv.ip_conflict(ip, exclude) {
                    ui::warn(&format!(
                        "The IP {ip} is already assigned to '{}'.",
                        holder.name
                    ));
                    continue;
                }
                return Ok(IpEntry::Set(Some(ip)));
            }
            Err(err) => {
                ui::error(&err.to_string());
                ui::info("Examples: 192.168.1.10, 10.0.0.5");
            }
        }
    }
}

/// Pick a network tier, or `None` to leave/keep it unset.
pub fn prompt_location(prompt: &str) -> Result<Option<NetworkTier>, CliError> {
    let tiers: Vec<NetworkTier> = NetworkTier::iter().collect();
    let labels: Vec<String> = tiers.iter().map(ToString::to_string).collect();
    Ok(ui::select_or_cancel(prompt, &labels)?.map(|idx| tiers[idx]))
}

/// Multi-select over `offered` service tags. Cancelling (no toggles) is
/// just the empty selection.
pub fn prompt_services(prompt: &str, offered: &[Service]) -> Result<Vec<Service>, CliError> {
    if offered.is_empty() {
        return Ok(Vec::new());
    }
    let labels: Vec<String> = offered.iter().map(ToString::to_string).collect();
    let picked = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&labels)
        .interact()
        .map_err(|e| CliError::from_prompt(&e))?;
    Ok(picked.into_iter().map(|idx| offered[idx]).collect())
}

/// Prompt for a comma-separated VLAN list until it parses. Empty input
/// yields the empty set. Duplicates inside one entry warn, not fail.
pub fn prompt_vlans(prompt: &str) -> Result<Vec<u16>, CliError> {
    loop {
        let raw = ui::input(prompt)?;
        match validate::validate_vlans(&raw) {
            Ok(parsed) => {
                for vlan in &parsed.duplicates {
                    ui::warn(&format!("VLAN {vlan} was listed twice; keeping one."));
                }
                return Ok(parsed.vlans);
            }
            Err(err) => ui::error(&err.to_string()),
        }
    }
}
