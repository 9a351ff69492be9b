//! Menu dispatch table.
//!
//! The navigation stack holds [`MenuId`] values; this module maps each
//! one to its handler. Handlers run one interaction pass and return,
//! letting the session loop re-dispatch whatever is now on top of the
//! stack — that is what makes "back" well-defined regardless of how a
//! menu was reached.

pub mod devices;
pub mod edit;
pub mod ping;
pub mod reports;
mod util;

use std::time::Duration;

use crate::error::CliError;
use crate::session::{Flow, Session};
use crate::ui;

/// Every reachable menu, root first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuId {
    Root,
    AddDevice,
    ListDevices,
    SearchDevices,
    ModifyDevice,
    ManageServices,
    DeleteDevice,
    Statistics,
    Ping,
    ExportReport,
}

pub fn dispatch(menu: MenuId, session: &mut Session) -> Result<Flow, CliError> {
    match menu {
        MenuId::Root => root(session),
        MenuId::AddDevice => devices::add(session),
        MenuId::ListDevices => devices::list(session),
        MenuId::SearchDevices => devices::search(session),
        MenuId::ModifyDevice => edit::modify(session),
        MenuId::ManageServices => edit::manage_services(session),
        MenuId::DeleteDevice => devices::delete(session),
        MenuId::Statistics => reports::statistics(session),
        MenuId::Ping => ping::probe_menu(session),
        MenuId::ExportReport => reports::export(session),
    }
}

/// The main menu: pick an action, push its menu, let the loop take over.
fn root(session: &mut Session) -> Result<Flow, CliError> {
    ui::title("NETWORK DEVICE INVENTORY", Some(&session.operator));

    let entries: Vec<(String, MenuId)> = vec![
        ("📱 Add a device".into(), MenuId::AddDevice),
        ("📜 List all devices".into(), MenuId::ListDevices),
        ("🔍 Search devices by name".into(), MenuId::SearchDevices),
        ("✏ Modify a device".into(), MenuId::ModifyDevice),
        ("🛠 Manage device services".into(), MenuId::ManageServices),
        ("❌ Delete a device".into(), MenuId::DeleteDevice),
        ("📊 Statistics".into(), MenuId::Statistics),
        ("🌐 Ping a device".into(), MenuId::Ping),
        ("📁 Export report".into(), MenuId::ExportReport),
    ];
    let labels: Vec<String> = entries.iter().map(|(label, _)| label.clone()).collect();

    match ui::select_with_nav("Select an option", &labels, true)? {
        ui::NavChoice::Item(idx) => {
            let (label, menu) = &entries[idx];
            ui::progress(label, Duration::from_millis(400));
            session.nav.push(*menu);
            Ok(Flow::Continue)
        }
        ui::NavChoice::Quit => confirm_quit(session),
        // Root offers neither; treat as a redraw.
        ui::NavChoice::Back | ui::NavChoice::Home => Ok(Flow::Continue),
    }
}

/// Quit is always confirmed; declining returns to the current menu.
pub fn confirm_quit(session: &mut Session) -> Result<Flow, CliError> {
    ui::title("QUIT", Some(&session.operator));
    if ui::confirm("Are you sure you want to quit?", false)? {
        ui::progress("Closing the session...", Duration::from_millis(600));
        ui::success("Goodbye!");
        Ok(Flow::Quit)
    } else {
        ui::info("Quit cancelled.");
        Ok(Flow::Continue)
    }
}

/// Resolve a navigation request coming out of a submenu prompt into the
/// flow the handler should return.
pub(crate) fn nav_flow(choice: ui::NavChoice, session: &mut Session) -> Result<Flow, CliError> {
    match choice {
        ui::NavChoice::Back => {
            session.nav.back();
            Ok(Flow::Continue)
        }
        ui::NavChoice::Home => {
            session.nav.home();
            Ok(Flow::Continue)
        }
        ui::NavChoice::Quit => confirm_quit(session),
        // An item is not a navigation request; just redraw.
        ui::NavChoice::Item(_) => Ok(Flow::Continue),
    }
}
