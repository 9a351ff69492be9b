//! Configuration for the `netinv` binary.
//!
//! TOML file + `NETINV_`-prefixed environment variables over serialized
//! defaults, resolved against platform config/data directories. The
//! operator allow-list lives here too: authentication is a fixed set of
//! username/password pairs, configurable but static for a session.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config structs ──────────────────────────────────────────────────

/// One entry in the operator allow-list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Operator {
    pub username: String,
    /// Plaintext by design: the allow-list is a fixed local credential
    /// table, not an identity system.
    pub password: String,
}

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Where the device collection is persisted. Defaults to
    /// `devices.json` in the platform data directory.
    pub inventory_file: Option<PathBuf>,

    /// Where text reports are exported. Defaults to `reports/` in the
    /// platform data directory.
    pub reports_dir: Option<PathBuf>,

    /// Accounts allowed to open a session.
    #[serde(default = "default_operators")]
    pub operators: Vec<Operator>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory_file: None,
            reports_dir: None,
            operators: default_operators(),
        }
    }
}

fn default_operators() -> Vec<Operator> {
    // The stock accounts of the tool; deployments override them in the
    // config file.
    ["Emanuel", "Felipe", "Nicolas"]
        .into_iter()
        .map(|username| Operator {
            username: username.to_owned(),
            password: "pruebaredes".to_owned(),
        })
        .collect()
}

impl Config {
    /// Check a login attempt against the allow-list.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.operators
            .iter()
            .any(|op| op.username == username && op.password == password)
    }

    /// The inventory file to use, honoring the configured override.
    pub fn inventory_path(&self) -> PathBuf {
        self.inventory_file
            .clone()
            .unwrap_or_else(|| data_dir().join("devices.json"))
    }

    /// The reports directory to use, honoring the configured override.
    pub fn reports_path(&self) -> PathBuf {
        self.reports_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("reports"))
    }

    /// The error log sits next to the inventory file.
    pub fn error_log_path(&self) -> PathBuf {
        self.inventory_path()
            .with_file_name("netinv-errors.log")
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "netinv", "netinv").map_or_else(
        || home_fallback().join(".config").join("netinv").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the data directory via XDG / platform conventions.
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("io", "netinv", "netinv").map_or_else(
        || home_fallback().join(".local").join("share").join("netinv"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn home_fallback() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()))
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("NETINV_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, falling back to defaults when no file exists or the file
/// is unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stock_allow_list_has_three_operators() {
        let cfg = Config::default();
        assert_eq!(cfg.operators.len(), 3);
        assert!(cfg.authenticate("Emanuel", "pruebaredes"));
    }

    #[test]
    fn authentication_is_exact_match() {
        let cfg = Config::default();
        assert!(!cfg.authenticate("emanuel", "pruebaredes"));
        assert!(!cfg.authenticate("Emanuel", "wrong"));
        assert!(!cfg.authenticate("nobody", "pruebaredes"));
    }

    #[test]
    fn overrides_win_over_derived_paths() {
        let cfg = Config {
            inventory_file: Some(PathBuf::from("/tmp/custom.json")),
            reports_dir: Some(PathBuf::from("/tmp/out")),
            ..Config::default()
        };
        assert_eq!(cfg.inventory_path(), PathBuf::from("/tmp/custom.json"));
        assert_eq!(cfg.reports_path(), PathBuf::from("/tmp/out"));
        assert_eq!(cfg.error_log_path(), PathBuf::from("/tmp/netinv-errors.log"));
    }

    #[test]
    fn toml_fragment_extends_defaults() {
        let cfg: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                inventory_file = "/srv/netinv/devices.json"

                [[operators]]
                username = "avery"
                password = "s3cret"
                "#,
            ))
            .extract()
            .unwrap();

        assert_eq!(
            cfg.inventory_path(),
            PathBuf::from("/srv/netinv/devices.json")
        );
        assert!(cfg.authenticate("avery", "s3cret"));
        // The fragment replaces, not appends, the operator table.
        assert!(!cfg.authenticate("Emanuel", "pruebaredes"));
    }
}
