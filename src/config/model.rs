//! LauncherConfig struct definition and default implementation.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Configuration for the launcher.
///
/// ```yaml
/// command: "n8n start"
/// defaults:
///   N8N_PORT: "5678"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Child command line, split with shell quoting rules.
    #[serde(default = "default_command")]
    pub command: String,

    /// Default values for environment variables, applied only when the
    /// variable is absent from the launcher's own environment. Entries
    /// override the built-in n8n defaults of the same name.
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
}

fn default_command() -> String {
    "n8n start".to_string()
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            defaults: BTreeMap::new(),
        }
    }
}
