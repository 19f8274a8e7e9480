//! Launcher configuration for n8n-launch.
//!
//! An optional YAML file can replace the child command and override or extend
//! the environment defaults. Parsing is forward-compatible (unknown fields are
//! ignored) and every field has a default, so an empty file is valid.

mod model;
mod operations;


pub use model::LauncherConfig;
