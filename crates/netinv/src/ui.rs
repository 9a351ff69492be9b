//! Terminal presentation: framed titles, status messages, the cosmetic
//! progress bar, and device rendering.
//!
//! Everything here is display-only; prompts that *decide* something live
//! next to the menu logic and only borrow the wrappers below.

use std::thread;
use std::time::Duration;

use console::Term;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use netinv_core::Device;

use crate::error::CliError;

const FRAME_WIDTH: usize = 70;

// ── Screen chrome ───────────────────────────────────────────────────

pub fn clear_screen() {
    let _ = Term::stdout().clear_screen();
}

/// Framed section title, optionally naming the active operator.
pub fn title(text: &str, operator: Option<&str>) {
    clear_screen();
    let rule = "═".repeat(FRAME_WIDTH);
    println!("{}", rule.blue());
    println!("{}", centered(text).purple().bold());
    if let Some(operator) = operator {
        println!("{}", centered(&format!("Operator: {operator}")).cyan());
    }
    println!("{}", rule.blue());
    println!();
}

fn centered(text: &str) -> String {
    let len = text.chars().count();
    if len >= FRAME_WIDTH {
        return text.to_owned();
    }
    let pad = (FRAME_WIDTH - len) / 2;
    format!("{}{text}", " ".repeat(pad))
}

// ── Status messages ─────────────────────────────────────────────────

pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg.blue());
}

pub fn success(msg: &str) {
    println!("{} {}", "✔".green().bold(), msg.green());
}

pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg.yellow());
}

pub fn error(msg: &str) {
    println!("{} {}", "✖".red().bold(), msg.red());
}

/// Block until the operator presses Enter.
pub fn pause() -> Result<(), CliError> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Press Enter to continue")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| CliError::from_prompt(&e))?;
    Ok(())
}

// ── Progress bar ────────────────────────────────────────────────────

/// Cosmetic 20-step progress animation spread over `duration`.
pub fn progress(message: &str, duration: Duration) {
    const STEPS: u64 = 20;
    let bar = ProgressBar::new(STEPS);
    bar.set_style(
        ProgressStyle::with_template("{msg}\n[{bar:20.green}] {percent}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█░ "),
    );
    bar.set_message(message.to_owned());
    let step = duration / u32::try_from(STEPS).unwrap_or(20);
    for _ in 0..STEPS {
        bar.inc(1);
        thread::sleep(step);
    }
    bar.finish_and_clear();
}

// ── Prompt wrappers ─────────────────────────────────────────────────

/// A menu selection that may instead be a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavChoice {
    Item(usize),
    Back,
    Home,
    Quit,
}

/// Select over `items` with the session navigation entries appended.
/// The root menu exposes only Quit; everywhere else gets back and home
/// too.
pub fn select_with_nav(
    prompt: &str,
    items: &[String],
    at_root: bool,
) -> Result<NavChoice, CliError> {
    let mut entries = items.to_vec();
    let back_at = if at_root {
        None
    } else {
        entries.push("⬅ Back".into());
        Some(entries.len() - 1)
    };
    let home_at = if at_root {
        None
    } else {
        entries.push("🏠 Main menu".into());
        Some(entries.len() - 1)
    };
    entries.push("🚪 Quit".into());
    let quit_at = entries.len() - 1;

    let picked = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&entries)
        .default(0)
        .interact()
        .map_err(|e| CliError::from_prompt(&e))?;

    if Some(picked) == back_at {
        Ok(NavChoice::Back)
    } else if Some(picked) == home_at {
        Ok(NavChoice::Home)
    } else if picked == quit_at {
        Ok(NavChoice::Quit)
    } else {
        Ok(NavChoice::Item(picked))
    }
}

/// Plain select, returning `None` when the appended Cancel entry is
/// chosen.
pub fn select_or_cancel(prompt: &str, items: &[String]) -> Result<Option<usize>, CliError> {
    let mut entries = items.to_vec();
    entries.push("Cancel".into());
    let picked = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&entries)
        .default(0)
        .interact()
        .map_err(|e| CliError::from_prompt(&e))?;
    if picked == entries.len() - 1 {
        Ok(None)
    } else {
        Ok(Some(picked))
    }
}

pub fn input(prompt: &str) -> Result<String, CliError> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| CliError::from_prompt(&e))?;
    Ok(value.trim().to_owned())
}

pub fn confirm(prompt: &str, default: bool) -> Result<bool, CliError> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| CliError::from_prompt(&e))
}

// ── Device rendering ────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "#")]
    idx: usize,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Services")]
    services: String,
    #[tabled(rename = "VLANs")]
    vlans: String,
}

impl DeviceRow {
    fn new(idx: usize, device: &Device) -> Self {
        Self {
            idx,
            device_type: device.device_type.to_string(),
            name: device.name.clone(),
            ip: device.ip_display(),
            location: device.location_display(),
            services: join_or(&device.services, "None"),
            vlans: join_or(&device.vlans, "None"),
        }
    }
}

fn join_or<T: ToString>(items: &[T], empty: &str) -> String {
    if items.is_empty() {
        empty.to_owned()
    } else {
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Tabular listing of `devices`, numbered from 1.
pub fn device_table(devices: &[&Device]) -> String {
    let rows: Vec<DeviceRow> = devices
        .iter()
        .enumerate()
        .map(|(i, d)| DeviceRow::new(i + 1, d))
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Key/value detail block for one device.
pub fn device_detail(device: &Device) -> String {
    [
        format!("Type:     {}", device.device_type),
        format!("Name:     {}", device.name),
        format!("IP:       {}", device.ip_display()),
        format!("Location: {}", device.location_display()),
        format!("Services: {}", join_or(&device.services, "None")),
        format!("VLANs:    {}", join_or(&device.vlans, "None")),
    ]
    .join("\n")
}

/// Short one-line label used in selection lists.
pub fn device_label(device: &Device) -> String {
    format!(
        "{} ({}, {})",
        device.name,
        device.device_type,
        device.ip_display()
    )
}
