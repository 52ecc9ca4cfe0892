use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(name = "suma-migrate")]
#[command(version)]
#[command(about = "Schedule a dry-run SUSE Manager product migration for one host")]
#[command(
    after_help = "The API password is read from SUMA_PASSWORD (a .env file in the working \
                  directory is honoured) or prompted for on a terminal."
)]
pub struct Cli {
    /// Config file (default: <config dir>/suma-migrate/config.toml)
    #[arg(long, env = "SUMA_CONFIG")]
    pub config: Option<PathBuf>,

    /// SUSE Manager server URL, e.g. https://suma.example.com
    #[arg(long, env = "SUMA_URL")]
    pub url: Option<String>,

    /// API login
    #[arg(long, env = "SUMA_LOGIN")]
    pub login: Option<String>,

    /// Hostname of the managed system to migrate
    #[arg(long, env = "SUMA_HOSTNAME")]
    pub hostname: Option<String>,

    /// Substring of the desired base channel label (case-insensitive), e.g. sp7
    #[arg(long, env = "SUMA_TARGET")]
    pub target: Option<String>,

    /// Earliest occurrence of the scheduled action (RFC 3339)
    #[arg(long, env = "SUMA_EARLIEST")]
    pub earliest: Option<DateTime<Utc>>,

    /// Trust this PEM certificate as an additional root
    #[arg(long, env = "SUMA_CA_FILE", conflicts_with = "insecure")]
    pub ca_file: Option<PathBuf>,

    /// Disable TLS certificate verification
    #[arg(long, env = "SUMA_INSECURE")]
    pub insecure: bool,

    /// List the available migration targets and stop
    #[arg(long)]
    pub list_targets: bool,

    /// Write diagnostics to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase diagnostic verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            login: self.login.clone(),
            hostname: self.hostname.clone(),
            target: self.target.clone(),
            earliest: self.earliest,
            ca_file: self.ca_file.clone(),
            insecure: self.insecure,
            list_only: self.list_targets,
        }
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "suma-migrate",
            "--url",
            "https://suma",
            "--hostname",
            "myserver",
            "--target",
            "sp7",
            "--earliest",
            "2025-09-01T00:00:00Z",
            "--list-targets",
            "-vv",
        ])
        .unwrap();

        let overrides = cli.overrides();

        assert_eq!(overrides.url.as_deref(), Some("https://suma"));
        assert_eq!(overrides.hostname.as_deref(), Some("myserver"));
        assert_eq!(
            overrides.earliest.map(|e| e.to_rfc3339()),
            Some("2025-09-01T00:00:00+00:00".to_string())
        );
        assert!(overrides.list_only);
        assert_eq!(cli.log_filter(), "debug");
    }

    #[test]
    fn test_insecure_conflicts_with_ca_file() {
        let result = Cli::try_parse_from([
            "suma-migrate",
            "--insecure",
            "--ca-file",
            "/etc/ssl/suma-ca.pem",
        ]);
        assert!(result.is_err());
    }
}
