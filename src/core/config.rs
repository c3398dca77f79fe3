//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::Project;

/// SMTP transport settings for outgoing report e-mails
///
/// The password is never stored in a config file; it comes from the
/// `PQT_SMTP_PASSWORD` environment variable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// SMTP relay host
    pub host: Option<String>,

    /// SMTP port (default 587)
    pub port: Option<u16>,

    /// SMTP username
    pub username: Option<String>,

    /// From mailbox, e.g. `PQT Reports <reports@example.com>`
    pub from: Option<String>,
}

/// PQT configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default recipient for `--email` without an address
    pub mail_to: Option<String>,

    /// SMTP transport settings
    pub smtp: SmtpConfig,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/pqt/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Project config (.pqt/config.yaml)
        if let Ok(project) = Project::discover() {
            let project_config_path = project.pqt_dir().join("config.yaml");
            if project_config_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&project_config_path) {
                    if let Ok(project_config) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(project_config);
                    }
                }
            }
        }

        // 4. Environment variables
        if let Ok(mail_to) = std::env::var("PQT_MAIL_TO") {
            config.mail_to = Some(mail_to);
        }
        if let Ok(host) = std::env::var("PQT_SMTP_HOST") {
            config.smtp.host = Some(host);
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pqt")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.mail_to.is_some() {
            self.mail_to = other.mail_to;
        }
        if other.smtp.host.is_some() {
            self.smtp.host = other.smtp.host;
        }
        if other.smtp.port.is_some() {
            self.smtp.port = other.smtp.port;
        }
        if other.smtp.username.is_some() {
            self.smtp.username = other.smtp.username;
        }
        if other.smtp.from.is_some() {
            self.smtp.from = other.smtp.from;
        }
    }

    /// SMTP password from the environment, if set
    pub fn smtp_password(&self) -> Option<String> {
        std::env::var("PQT_SMTP_PASSWORD").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_precedence() {
        let mut base = Config {
            mail_to: Some("base@example.com".to_string()),
            ..Config::default()
        };
        let over = Config {
            mail_to: Some("buyer@example.com".to_string()),
            ..Config::default()
        };
        base.merge(over);
        assert_eq!(base.mail_to.as_deref(), Some("buyer@example.com"));
    }

    #[test]
    fn test_merge_keeps_base_when_other_empty() {
        let mut base = Config {
            mail_to: Some("base@example.com".to_string()),
            ..Config::default()
        };
        base.merge(Config::default());
        assert_eq!(base.mail_to.as_deref(), Some("base@example.com"));
    }

    #[test]
    fn test_smtp_section_parses() {
        let cfg: Config = serde_yml::from_str(
            "smtp:\n  host: smtp.example.com\n  port: 2525\n  username: bot\n",
        )
        .unwrap();
        assert_eq!(cfg.smtp.host.as_deref(), Some("smtp.example.com"));
        assert_eq!(cfg.smtp.port, Some(2525));
        assert_eq!(cfg.smtp.username.as_deref(), Some("bot"));
    }
}
