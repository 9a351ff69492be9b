//! Reachability menu: pick an addressed device, run the probe, show the
//! verdict and the raw transcript.

use owo_colors::OwoColorize;

use netinv_core::{ProbeError, ProbeOutcome, probe};

use crate::error::CliError;
use crate::session::{Flow, Session};
use crate::ui;

use super::util;

pub fn probe_menu(session: &mut Session) -> Result<Flow, CliError> {
    ui::title("PING A DEVICE", Some(&session.operator));

    let addressed: Vec<_> = session
        .inventory
        .devices()
        .iter()
        .filter(|d| d.ip.is_some())
        .collect();
    if addressed.is_empty() {
        ui::warn("No devices have an IP assigned; nothing to ping.");
        ui::pause()?;
        session.nav.back();
        return Ok(Flow::Continue);
    }

    let id = match util::pick_device("Device to ping", &addressed)? {
        util::Picked::Device(id) => id,
        util::Picked::Nav(nav) => return super::nav_flow(nav, session),
    };
    let Some(ip) = session.inventory.get(id).and_then(|d| d.ip) else {
        session.nav.back();
        return Ok(Flow::Continue);
    };

    ui::title(&format!("PING {ip}"), Some(&session.operator));
    ui::info(&format!(
        "Sending {} echo requests (timeout {}s), please wait...",
        probe::ECHO_COUNT,
        probe::PROBE_TIMEOUT.as_secs()
    ));
    println!();

    // Probe failures are reported, never fatal to the session.
    match probe::ping(ip) {
        Ok(report) => {
            println!("{}", "──── ping output ────".blue());
            if !report.stdout.is_empty() {
                println!("{}", report.stdout);
            }
            if !report.stderr.is_empty() {
                println!("{}", report.stderr.red());
            }
            println!("{}", "─────────────────────".blue());

            match report.outcome {
                ProbeOutcome::Success => ui::success(&format!("{ip} is reachable.")),
                ProbeOutcome::SoftFailure => ui::warn(&format!(
                    "The ping command finished cleanly but every probe to {ip} was lost."
                )),
                ProbeOutcome::HardFailure => ui::error(&format!(
                    "{ip} appears unreachable (ping exit code {}).",
                    report
                        .exit_code
                        .map_or_else(|| "unknown".to_owned(), |c| c.to_string())
                )),
            }
        }
        Err(ProbeError::Timeout { timeout_secs }) => {
            ui::error(&format!("Ping to {ip} gave up after {timeout_secs}s."));
        }
        Err(ProbeError::UtilityMissing) => {
            ui::error("The ping utility is not installed or not on PATH.");
        }
        Err(ProbeError::Io(err)) => {
            ui::error(&format!("Ping could not be run: {err}"));
        }
    }

    ui::pause()?;
    // Stay in this menu so the operator can probe another device.
    Ok(Flow::Continue)
}
