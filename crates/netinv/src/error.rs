//! CLI error type with miette diagnostics.
//!
//! Almost everything inside a menu handler is recovered at the session
//! loop; only errors that escape `session::run` reach the process
//! boundary, where `exit_code` decides how we terminate.

use miette::Diagnostic;
use thiserror::Error;

use netinv_core::CoreError;

/// Process exit codes: 0 on graceful exit or interrupt, 1 on an
/// unhandled top-level failure.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("login failed: too many invalid attempts")]
    #[diagnostic(
        code(netinv::login_failed),
        help("Check the operator allow-list in the config file.")
    )]
    LoginFailed,

    /// Operator hit Ctrl-C at a prompt. Unwinds to `main`, exits 0.
    #[error("interrupted")]
    #[diagnostic(code(netinv::interrupted))]
    Interrupted,

    #[error("interactive prompt failed: {reason}")]
    #[diagnostic(
        code(netinv::prompt),
        help("netinv needs an interactive terminal to run.")
    )]
    Prompt { reason: String },

    #[error(transparent)]
    #[diagnostic(code(netinv::core))]
    Core(#[from] CoreError),
}

impl CliError {
    /// Map a dialoguer failure, keeping Ctrl-C distinguishable.
    pub fn from_prompt(err: &dialoguer::Error) -> Self {
        match err {
            dialoguer::Error::IO(io_err)
                if io_err.kind() == std::io::ErrorKind::Interrupted =>
            {
                Self::Interrupted
            }
            other => Self::Prompt {
                reason: other.to_string(),
            },
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted => exit_code::SUCCESS,
            _ => exit_code::GENERAL,
        }
    }
}
