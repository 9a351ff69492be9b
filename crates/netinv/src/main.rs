mod cli;
mod error;
mod menus;
mod session;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    install_panic_log();

    if let Err(err) = session::run(&cli) {
        if matches!(err, CliError::Interrupted) {
            // Graceful interrupt: clean exit, nothing to log.
            eprintln!("Interrupted; closing.");
            std::process::exit(err.exit_code());
        }
        let code = err.exit_code();
        let config = netinv_config::load_config_or_default();
        session::log_error(&config.error_log_path(), "top level", &err);
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// A crash anywhere still leaves a trace in the plain-text error log.
fn install_panic_log() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let config = netinv_config::load_config_or_default();
        let backtrace = std::backtrace::Backtrace::force_capture();
        session::log_error(
            &config.error_log_path(),
            "panic",
            &format!("{info}\n{backtrace}"),
        );
        default_hook(info);
    }));
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
