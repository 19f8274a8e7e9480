//! Effective environment for the supervised child.
//!
//! The supervisor never writes to the process-wide environment. Instead it
//! snapshots the supervised variables once, fills in defaults for the ones
//! that are absent, and hands the resulting [`EffectiveEnvironment`] to the
//! launcher explicitly.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::num::ParseIntError;
use std::process::Command;
use std::str::FromStr;
use thiserror::Error;

pub const HOST: &str = "N8N_HOST";
pub const PORT: &str = "N8N_PORT";
pub const PROTOCOL: &str = "N8N_PROTOCOL";
pub const EDITOR_BASE_URL: &str = "N8N_EDITOR_BASE_URL";

/// A supervised variable and the value installed when it is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvDefault {
    pub name: String,
    pub value: String,
}

impl EnvDefault {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Built-in defaults for the n8n server.
pub fn builtin_defaults() -> Vec<EnvDefault> {
    vec![
        EnvDefault::new(HOST, "0.0.0.0"),
        EnvDefault::new(PORT, "8443"),
        EnvDefault::new(PROTOCOL, "https"),
        EnvDefault::new(EDITOR_BASE_URL, "https://iqv2.onrender.com"),
    ]
}

/// Layer configured default values over a base table.
///
/// Names already in `base` get the overriding value in place; new names are
/// appended in sorted order.
pub fn merge_defaults(
    mut base: Vec<EnvDefault>,
    overrides: &BTreeMap<String, String>,
) -> Vec<EnvDefault> {
    for (name, value) in overrides {
        match base.iter_mut().find(|d| &d.name == name) {
            Some(existing) => existing.value = value.clone(),
            None => base.push(EnvDefault::new(name.clone(), value.clone())),
        }
    }
    base
}

/// The supervised variables as they will be handed to the child.
#[derive(Debug, Clone, Default)]
pub struct EffectiveEnvironment {
    vars: BTreeMap<String, OsString>,
    filled: Vec<String>,
}

impl EffectiveEnvironment {
    /// Snapshot the real process environment and fill in `defaults`.
    pub fn from_process(defaults: &[EnvDefault]) -> Self {
        configure_environment(defaults, |name| std::env::var_os(name))
    }

    /// Look up a supervised variable.
    pub fn get(&self, name: &str) -> Option<&OsStr> {
        self.vars.get(name).map(OsString::as_os_str)
    }

    /// Look up a supervised variable for display purposes.
    pub fn get_lossy(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(OsStr::to_string_lossy)
    }

    /// All supervised variables, sorted by name.
    pub fn vars(&self) -> &BTreeMap<String, OsString> {
        &self.vars
    }

    /// Names whose value came from a default rather than the environment.
    pub fn filled(&self) -> &[String] {
        &self.filled
    }

    /// Layer the supervised variables over the ambient environment that
    /// `command` inherits.
    pub fn apply(&self, command: &mut Command) {
        command.envs(self.vars());
    }
}

/// Build the effective environment.
///
/// For each default, a value returned by `lookup` is kept unchanged (even
/// if it is empty or not valid UTF-8); otherwise the default is installed.
/// Values are not validated.
pub fn configure_environment<F>(defaults: &[EnvDefault], lookup: F) -> EffectiveEnvironment
where
    F: Fn(&str) -> Option<OsString>,
{
    let mut env = EffectiveEnvironment::default();
    for default in defaults {
        let value = match lookup(&default.name) {
            Some(existing) => existing,
            None => {
                env.filled.push(default.name.clone());
                OsString::from(&default.value)
            }
        };
        env.vars.insert(default.name.clone(), value);
    }
    env
}

/// Scheme the server listens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl FromStr for Protocol {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(SettingsError::UnknownProtocol(other.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Https => f.write_str("https"),
        }
    }
}

/// Why the effective environment does not describe a usable server address.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{0} is not valid UTF-8")]
    NotUnicode(&'static str),

    #[error("N8N_PORT '{value}' is not a port number: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("N8N_PORT must be between 1 and 65535")]
    ZeroPort,

    #[error("N8N_PROTOCOL '{0}' must be 'http' or 'https'")]
    UnknownProtocol(String),
}

/// Typed view of the server variables.
///
/// The child receives the raw strings regardless; this is only used to
/// describe the configuration and to warn about values n8n will reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
    pub editor_base_url: Option<String>,
}

impl ServerSettings {
    pub fn from_env(env: &EffectiveEnvironment) -> Result<Self, SettingsError> {
        let host = required(env, HOST)?.to_string();

        let raw_port = required(env, PORT)?;
        let port: u16 = raw_port
            .parse()
            .map_err(|source| SettingsError::InvalidPort {
                value: raw_port.to_string(),
                source,
            })?;
        if port == 0 {
            return Err(SettingsError::ZeroPort);
        }

        let protocol = required(env, PROTOCOL)?.parse()?;

        let editor_base_url = match env.get(EDITOR_BASE_URL) {
            Some(value) => Some(
                value
                    .to_str()
                    .ok_or(SettingsError::NotUnicode(EDITOR_BASE_URL))?
                    .to_string(),
            ),
            None => None,
        };

        Ok(Self {
            host,
            port,
            protocol,
            editor_base_url,
        })
    }
}

fn required<'a>(
    env: &'a EffectiveEnvironment,
    name: &'static str,
) -> Result<&'a str, SettingsError> {
    env.get(name)
        .ok_or(SettingsError::Missing(name))?
        .to_str()
        .ok_or(SettingsError::NotUnicode(name))
}
