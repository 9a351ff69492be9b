//! Clap definition for the `netinv` binary.
//!
//! There are no sub-commands: a bare invocation launches the interactive
//! menu session. The flags only tune where state lives and how loud the
//! diagnostics are.

use std::path::PathBuf;

use clap::Parser;

/// netinv -- interactive inventory manager for network devices
#[derive(Debug, Parser)]
#[command(
    name = "netinv",
    version,
    about = "Record, browse, and probe your network device inventory",
    long_about = "An interactive terminal inventory manager for network devices.\n\n\
        Launches a menu-driven session: record devices (type, name, IP,\n\
        network tier, services, VLANs), search and edit them, generate\n\
        statistics, export text reports, and ping entries straight from\n\
        the inventory."
)]
pub struct Cli {
    /// Inventory file to use instead of the configured one
    #[arg(long, value_name = "PATH", env = "NETINV_INVENTORY_FILE")]
    pub data_file: Option<PathBuf>,

    /// Directory for exported reports instead of the configured one
    #[arg(long, value_name = "DIR", env = "NETINV_REPORTS_DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}
