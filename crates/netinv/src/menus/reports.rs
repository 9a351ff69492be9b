//! Statistics view and the text-file export.

use std::time::Duration;

use chrono::Local;
use owo_colors::OwoColorize;

use netinv_core::{InventoryStats, report};

use crate::error::CliError;
use crate::session::{Flow, Session};
use crate::ui;

pub fn statistics(session: &mut Session) -> Result<Flow, CliError> {
    ui::title("INVENTORY STATISTICS", Some(&session.operator));

    if session.inventory.is_empty() {
        ui::warn("There are no devices to report on.");
        ui::pause()?;
        session.nav.back();
        return Ok(Flow::Continue);
    }

    let stats = InventoryStats::collect(session.inventory.devices());

    println!("{}", "📌 Summary".purple().bold());
    println!("  Total devices: {}", stats.total);
    println!("  Generated by:  {}", session.operator);
    println!(
        "  At:            {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    println!("\n{}", "🔢 By device type".purple().bold());
    for (device_type, count) in &stats.by_type {
        println!("  {}: {count}", device_type.to_string().yellow());
    }

    println!("\n{}", "📍 By network tier".purple().bold());
    if stats.by_location.is_empty() {
        println!("  No device has a network tier assigned.");
    }
    for (tier, count) in &stats.by_location {
        println!("  {}: {count}", tier.to_string().yellow());
    }

    println!("\n{}", "🛠 Service usage".purple().bold());
    if stats.service_usage.is_empty() {
        println!("  No services configured on any device.");
    }
    for (service, count) in &stats.service_usage {
        println!("  {}: {count} device(s)", service.to_string().yellow());
    }

    println!("\n{}", "🔗 VLAN usage".purple().bold());
    if stats.vlan_usage.is_empty() {
        println!("  No VLANs configured on any device.");
    } else {
        println!("  Devices with VLANs:     {}", stats.devices_with_vlans);
        println!("  Total VLAN assignments: {}", stats.vlan_assignments);
        for (vlan, count) in &stats.vlan_usage {
            println!("  {}: {count} device(s)", format!("VLAN {vlan}").yellow());
        }
    }

    println!();
    ui::pause()?;
    session.nav.back();
    Ok(Flow::Continue)
}

pub fn export(session: &mut Session) -> Result<Flow, CliError> {
    ui::title("EXPORT REPORT", Some(&session.operator));

    if session.inventory.is_empty() {
        ui::warn("There are no devices to export.");
        ui::pause()?;
        session.nav.back();
        return Ok(Flow::Continue);
    }

    ui::progress("Writing the report...", Duration::from_millis(500));
    let path = report::export_report(
        session.inventory.devices(),
        &session.reports_dir,
        &session.operator,
    )
    .map_err(netinv_core::CoreError::from)?;
    ui::success(&format!("Report exported to {}", path.display()));

    ui::pause()?;
    session.nav.back();
    Ok(Flow::Continue)
}
