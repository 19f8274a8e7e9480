//! Config loading, validation, and command resolution.

use super::model::LauncherConfig;
use crate::environment::{EnvDefault, builtin_defaults, merge_defaults};
use crate::error::{Result, SupervisorError};
use crate::supervisor::LaunchSpec;
use std::path::Path;

impl LauncherConfig {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(LauncherConfig)` - Successfully loaded and validated config
    /// * `Err(SupervisorError::Config)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            SupervisorError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: LauncherConfig = serde_yaml::from_str(yaml)
            .map_err(|e| SupervisorError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `command` must contain at least one word after shell splitting
    /// - `defaults` names must be non-empty and free of `=` and NUL
    /// - `defaults` values must be free of NUL
    pub fn validate(&self) -> Result<()> {
        self.argv()?;

        for (name, value) in &self.defaults {
            if name.is_empty() {
                return Err(SupervisorError::Config(
                    "config validation failed: defaults names must be non-empty".to_string(),
                ));
            }
            if name.contains('=') || name.contains('\0') {
                return Err(SupervisorError::Config(format!(
                    "config validation failed: '{}' is not a valid environment variable name",
                    name.escape_debug()
                )));
            }
            if value.contains('\0') {
                return Err(SupervisorError::Config(format!(
                    "config validation failed: default for '{}' contains a NUL byte",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Split `command` into program and arguments.
    pub fn argv(&self) -> Result<Vec<String>> {
        let args = shell_words::split(&self.command).map_err(|e| {
            SupervisorError::Config(format!(
                "failed to parse command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                self.command, e
            ))
        })?;

        if args.is_empty() {
            return Err(SupervisorError::Config(format!(
                "command is empty after parsing: '{}'",
                self.command
            )));
        }

        Ok(args)
    }

    /// Resolve what to launch, preferring an explicit command line.
    pub fn launch_spec(&self, override_argv: &[String]) -> Result<LaunchSpec> {
        let argv = if override_argv.is_empty() {
            self.argv()?
        } else {
            override_argv.to_vec()
        };

        let mut words = argv.into_iter();
        let program = words
            .next()
            .ok_or_else(|| SupervisorError::Config("command is empty".to_string()))?;
        Ok(LaunchSpec::new(program, words))
    }

    /// Built-in defaults with this config's overrides layered on top.
    pub fn env_defaults(&self) -> Vec<EnvDefault> {
        merge_defaults(builtin_defaults(), &self.defaults)
    }
}
