//! Session lifecycle: startup, the login gate, the dispatch loop, and
//! the error-log boundary.
//!
//! The loop is the recovery point of the whole program. Validation and
//! probe errors never reach it (handled where they occur); anything that
//! does — persistence failures, prompt failures, plain bugs — is logged
//! to the error file, reported, and answered by resetting the navigation
//! stack to the root menu. In-memory operator work is preserved; only
//! `main` ever terminates the process.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;

use netinv_config::Config;
use netinv_core::{Inventory, LoadOutcome, NavStack};

use crate::cli::Cli;
use crate::error::CliError;
use crate::menus::{self, MenuId};
use crate::ui;

pub const MAX_LOGIN_ATTEMPTS: u32 = 3;

/// What a menu handler tells the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything a menu handler needs, threaded explicitly instead of
/// living in globals.
pub struct Session {
    pub operator: String,
    pub nav: NavStack<MenuId>,
    pub inventory: Inventory,
    pub reports_dir: PathBuf,
    pub error_log: PathBuf,
}

/// Full run: configuration, store load, login, dispatch loop.
pub fn run(args: &Cli) -> Result<(), CliError> {
    let mut config = netinv_config::load_config_or_default();
    if let Some(ref path) = args.data_file {
        config.inventory_file = Some(path.clone());
    }
    if let Some(ref dir) = args.reports_dir {
        config.reports_dir = Some(dir.clone());
    }

    ui::title("NETWORK DEVICE INVENTORY MANAGER", None);
    ui::progress("Starting up...", Duration::from_millis(800));

    let inventory_path = config.inventory_path();
    let (inventory, outcome) = Inventory::open(&inventory_path);
    match outcome {
        LoadOutcome::Loaded(count) => ui::info(&format!(
            "Loaded {count} device(s) from {}.",
            inventory_path.display()
        )),
        LoadOutcome::Missing => ui::warn(&format!(
            "{} not found; starting with an empty inventory.",
            inventory_path.display()
        )),
        LoadOutcome::Failed(err) => {
            ui::error(&format!("{err}; starting with an empty inventory."));
            log_error(&config.error_log_path(), "inventory load", &err);
            ui::pause()?;
        }
    }

    let operator = login(&config)?;

    let mut session = Session {
        operator,
        nav: NavStack::new(MenuId::Root),
        inventory,
        reports_dir: config.reports_path(),
        error_log: config.error_log_path(),
    };

    loop {
        let menu = match session.nav.current() {
            Some(menu) => menu,
            None => {
                // The history should never empty; if it somehow does,
                // recover to the root instead of crashing.
                tracing::warn!("navigation history lost, resetting to root");
                ui::warn("Menu history was lost; returning to the main menu.");
                session.nav.reset(MenuId::Root);
                MenuId::Root
            }
        };

        match menus::dispatch(menu, &mut session) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => return Ok(()),
            Err(CliError::Interrupted) => return Err(CliError::Interrupted),
            Err(err) => {
                tracing::error!(error = %err, ?menu, "menu handler failed");
                log_error(&session.error_log, &format!("menu {menu:?}"), &err);
                ui::error(&format!("{err}"));
                ui::info("Returning to the main menu; unsaved in-memory changes are kept.");
                let _ = ui::pause();
                session.nav.reset(MenuId::Root);
            }
        }
    }
}

/// Three attempts against the allow-list, then the process terminates.
fn login(config: &Config) -> Result<String, CliError> {
    for attempt in 1..=MAX_LOGIN_ATTEMPTS {
        ui::title("SIGN IN", None);
        let username = ui::input("👤 Username")?;
        let password =
            rpassword::prompt_password("🔑 Password: ").map_err(|err| CliError::Prompt {
                reason: err.to_string(),
            })?;

        if config.authenticate(&username, password.trim()) {
            ui::progress("Authenticating...", Duration::from_millis(800));
            ui::success(&format!("Welcome, {username}!"));
            return Ok(username);
        }

        let remaining = MAX_LOGIN_ATTEMPTS - attempt;
        if remaining > 0 {
            ui::error(&format!(
                "Invalid username or password. Attempts remaining: {remaining}"
            ));
            std::thread::sleep(Duration::from_secs(1));
        }
    }
    ui::error("Too many failed attempts. Closing.");
    Err(CliError::LoginFailed)
}

/// Append a timestamped entry to the plain-text error log. Best-effort:
/// a log failure must never take down the session.
pub fn log_error(path: &Path, context: &str, err: &dyn std::fmt::Display) {
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| {
            writeln!(
                file,
                "--- {} | {context} ---\n{err}\n",
                Local::now().format("%Y-%m-%d %H:%M:%S")
            )
        });
    if let Err(log_err) = result {
        tracing::warn!(error = %log_err, path = %path.display(), "could not write error log");
    }
}
