//! Shared configuration for the Jaalee CLI.
//!
//! TOML account profiles, credential resolution (env var indirection +
//! plaintext), and translation to `jaalee_core::AccountConfig`. The
//! setup wizard writes its emitted credential back through this crate;
//! account-email uniqueness for the wizard is sourced from here too.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use jaalee_core::{AccountConfig, Credential};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("account '{name}' not found (available: {available})")]
    UnknownAccount { name: String, available: String },

    #[error("no accounts configured -- run the login wizard first")]
    NoAccounts,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

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

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Account profile used when none is named on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_account: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles. `BTreeMap` keeps the file diff-stable.
    #[serde(default)]
    pub accounts: BTreeMap<String, AccountProfile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Poll interval in seconds. The vendor rate-limits to one request
    /// per minute; the default leaves headroom.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// IANA timezone sent with login requests.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Base URL override (staging). Unset means the production cloud.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            time_zone: default_time_zone(),
            base_url: None,
        }
    }
}

fn default_poll_interval() -> u64 {
    120
}
fn default_time_zone() -> String {
    "UTC".into()
}

/// A named account profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AccountProfile {
    /// Account email -- the unique identity enforced by the wizard.
    pub email: String,

    /// Long-lived token (plaintext -- prefer `token_env`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name containing the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// Per-account timezone override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    /// Per-account poll interval override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "jaalee", "jaalee").map_or_else(
        || PathBuf::from(".jaalee.toml"),
        |dirs| dirs.config_dir().join("jaalee.toml"),
    )
}

// ── Load / save ─────────────────────────────────────────────────────

/// Load configuration: defaults < TOML file < `JAALEE_*` environment.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading configuration");
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("JAALEE_").split("__"))
        .extract()?;
    Ok(config)
}

/// Write the configuration back to `path`, creating parent directories.
pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = toml::to_string_pretty(config)?;
    std::fs::write(path, rendered)?;
    debug!(path = %path.display(), "configuration saved");
    Ok(())
}

impl Config {
    /// All configured account emails -- the uniqueness set handed to
    /// the setup wizard.
    pub fn registered_emails(&self) -> Vec<String> {
        self.accounts.values().map(|a| a.email.clone()).collect()
    }

    /// Pick an account profile: the named one, else the configured
    /// default, else the sole profile.
    pub fn account(&self, name: Option<&str>) -> Result<(&str, &AccountProfile), ConfigError> {
        let available = || {
            self.accounts
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };

        if let Some(name) = name {
            return self
                .accounts
                .get_key_value(name)
                .map(|(k, v)| (k.as_str(), v))
                .ok_or_else(|| ConfigError::UnknownAccount {
                    name: name.into(),
                    available: available(),
                });
        }

        if let Some(default) = &self.default_account {
            if let Some((k, v)) = self.accounts.get_key_value(default) {
                return Ok((k.as_str(), v));
            }
        }

        let mut profiles = self.accounts.iter();
        match (profiles.next(), profiles.next()) {
            (Some((k, v)), None) => Ok((k.as_str(), v)),
            (None, _) => Err(ConfigError::NoAccounts),
            _ => Err(ConfigError::UnknownAccount {
                name: "(none)".into(),
                available: available(),
            }),
        }
    }

    /// Resolve a profile into a runtime [`AccountConfig`].
    ///
    /// Token precedence: `token_env` indirection, then plaintext.
    pub fn resolve(&self, name: Option<&str>) -> Result<AccountConfig, ConfigError> {
        let (_, profile) = self.account(name)?;

        let token: Option<SecretString> = profile
            .token_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .or_else(|| profile.token.clone())
            .map(Into::into);

        let mut config = AccountConfig::new(profile.email.clone());
        config.token = token;
        config.time_zone = profile
            .time_zone
            .clone()
            .unwrap_or_else(|| self.defaults.time_zone.clone());
        config.poll_interval = Duration::from_secs(
            profile
                .poll_interval_secs
                .unwrap_or(self.defaults.poll_interval_secs),
        );
        config.base_url = self
            .defaults
            .base_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|e| ConfigError::Validation {
                    field: "defaults.base_url".into(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        Ok(config)
    }

    /// Persist a credential emitted by the setup wizard under `name`,
    /// making it the default account if none is set.
    pub fn store_credential(&mut self, name: &str, credential: &Credential) {
        let profile = self.accounts.entry(name.to_owned()).or_default();
        profile.email.clone_from(&credential.email);
        profile.token = Some(credential.token.expose_secret().to_owned());

        if self.default_account.is_none() {
            self.default_account = Some(name.to_owned());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_gives_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = load(Path::new("does-not-exist.toml")).unwrap();
            assert!(config.accounts.is_empty());
            assert_eq!(config.defaults.poll_interval_secs, 120);
            assert_eq!(config.defaults.time_zone, "UTC");
            Ok(())
        });
    }

    #[test]
    fn load_profile_and_resolve() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "jaalee.toml",
                r#"
                    default_account = "home"

                    [defaults]
                    time_zone = "Europe/Berlin"

                    [accounts.home]
                    email = "a@b.com"
                    token = "T1"

                    [accounts.lab]
                    email = "lab@b.com"
                    poll_interval_secs = 30
                "#,
            )?;

            let config = load(Path::new("jaalee.toml")).unwrap();

            let home = config.resolve(None).unwrap();
            assert_eq!(home.email, "a@b.com");
            assert_eq!(home.time_zone, "Europe/Berlin");
            assert_eq!(home.poll_interval.as_secs(), 120);
            assert_eq!(
                home.token.as_ref().map(secrecy::ExposeSecret::expose_secret),
                Some("T1")
            );

            let lab = config.resolve(Some("lab")).unwrap();
            assert_eq!(lab.poll_interval.as_secs(), 30);
            assert!(lab.token.is_none());

            let mut emails = config.registered_emails();
            emails.sort();
            assert_eq!(emails, vec!["a@b.com", "lab@b.com"]);
            Ok(())
        });
    }

    #[test]
    fn token_env_takes_precedence() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "jaalee.toml",
                r#"
                    [accounts.home]
                    email = "a@b.com"
                    token = "plaintext"
                    token_env = "HOME_TOKEN"
                "#,
            )?;
            jail.set_env("HOME_TOKEN", "from-env");

            let config = load(Path::new("jaalee.toml")).unwrap();
            let resolved = config.resolve(None).unwrap();
            assert_eq!(
                resolved
                    .token
                    .as_ref()
                    .map(secrecy::ExposeSecret::expose_secret),
                Some("from-env")
            );
            Ok(())
        });
    }

    #[test]
    fn unknown_account_lists_available() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "jaalee.toml",
                r#"
                    [accounts.home]
                    email = "a@b.com"
                "#,
            )?;

            let config = load(Path::new("jaalee.toml")).unwrap();
            match config.resolve(Some("nope")) {
                Err(ConfigError::UnknownAccount { ref available, .. }) => {
                    assert!(available.contains("home"));
                }
                other => panic!("expected UnknownAccount, got: {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn store_credential_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jaalee.toml");

        let mut config = Config::default();
        config.store_credential(
            "home",
            &Credential {
                email: "a@b.com".into(),
                token: "T1".to_string().into(),
            },
        );
        save(&config, &path).unwrap();

        let reloaded = load(&path).unwrap();
        assert_eq!(reloaded.default_account.as_deref(), Some("home"));
        let resolved = reloaded.resolve(None).unwrap();
        assert_eq!(resolved.email, "a@b.com");
        assert_eq!(
            resolved
                .token
                .as_ref()
                .map(secrecy::ExposeSecret::expose_secret),
            Some("T1")
        );
    }

    #[test]
    fn bad_base_url_is_a_validation_error() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "jaalee.toml",
                r#"
                    [defaults]
                    base_url = "not a url"

                    [accounts.home]
                    email = "a@b.com"
                "#,
            )?;

            let config = load(Path::new("jaalee.toml")).unwrap();
            assert!(matches!(
                config.resolve(None),
                Err(ConfigError::Validation { .. })
            ));
            Ok(())
        });
    }
}
