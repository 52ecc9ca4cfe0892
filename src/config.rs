use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{ConnectionSettings, ScheduleOptions, TlsVerification};
use crate::auth::Credentials;
use crate::migration::MigrationJob;

/// Contents of `config.toml`
///
/// ```toml
/// url = "https://suma.example.com"
/// login = "spupgapi"
/// hostname = "myserver"
/// target = "sp7"
/// tls = { mode = "ca-file", path = "/etc/pki/trust/anchors/RHN-ORG-TRUSTED-SSL-CERT" }
///
/// [schedule]
/// allow_vendor_change = true
/// earliest_occurrence = "2025-09-01T00:00:00Z"
/// optional_child_channels = []
/// ```
///
/// The password is deliberately not read from this file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub login: Option<String>,
    pub hostname: Option<String>,
    pub target: Option<String>,
    pub tls: Option<TlsVerification>,
    pub timeout_secs: Option<u64>,
    pub schedule: ScheduleOptions,
}

impl FileConfig {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("suma-migrate");
        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file
    ///
    /// An explicitly given path must exist. The default path is optional and
    /// an absent file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::get_config_path()?;
                if !path.exists() {
                    debug!("No config file at {:?}, using defaults", path);
                    return Ok(Self::default());
                }
                path
            }
        };

        debug!("Loading config from: {:?}", config_path);
        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config = Self::from_toml(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Values given on the command line or through `SUMA_*` variables
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub login: Option<String>,
    pub hostname: Option<String>,
    pub target: Option<String>,
    pub earliest: Option<DateTime<Utc>>,
    pub ca_file: Option<PathBuf>,
    pub insecure: bool,
    pub list_only: bool,
}

/// Fully resolved run configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub connection: ConnectionSettings,
    pub job: MigrationJob,
}

impl Settings {
    /// Merge overrides over the file config; overrides win
    ///
    /// `credentials` turns the merged login into full credentials, normally
    /// [`Credentials::resolve`].
    pub fn resolve<F>(file: FileConfig, overrides: Overrides, credentials: F) -> Result<Settings>
    where
        F: FnOnce(Option<String>, &str) -> Result<Credentials>,
    {
        let url = required(overrides.url.or(file.url), "server URL", "--url", "SUMA_URL")?;
        let hostname = required(
            overrides.hostname.or(file.hostname),
            "hostname",
            "--hostname",
            "SUMA_HOSTNAME",
        )?;
        let target = if overrides.list_only {
            overrides
                .target
                .or(file.target)
                .map(|target| target.trim().to_string())
                .unwrap_or_default()
        } else {
            required(
                overrides.target.or(file.target),
                "target version",
                "--target",
                "SUMA_TARGET",
            )?
        };

        let tls = match (overrides.insecure, overrides.ca_file) {
            (true, Some(_)) => anyhow::bail!("--insecure and --ca-file are mutually exclusive"),
            (true, None) => TlsVerification::Insecure,
            (false, Some(path)) => TlsVerification::CaFile(path),
            (false, None) => file.tls.unwrap_or_default(),
        };

        let mut schedule = file.schedule;
        if let Some(earliest) = overrides.earliest {
            schedule.earliest_occurrence = earliest;
        }

        let credentials = credentials(overrides.login.or(file.login), &url)?;

        Ok(Settings {
            connection: ConnectionSettings {
                url,
                tls,
                timeout: file.timeout_secs.map(Duration::from_secs),
            },
            job: MigrationJob {
                credentials,
                hostname,
                target,
                schedule,
                list_only: overrides.list_only,
            },
        })
    }
}

fn required(value: Option<String>, what: &str, flag: &str, env: &str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => anyhow::bail!("No {} configured; pass {} or set {}", what, flag, env),
    }
}
