// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional `squad.toml` at the pipelines root
//!
//! ```toml
//! concurrency_window = "5s"
//! output_categories = ["sources", "agents", "tasks", "templates", "data"]
//!
//! [[roles]]
//! key = "oalanicolas"
//! persona = "Alan Nicolas"
//! role = "Mind Cloning Architect"
//! phases = ["research", "source_validation"]
//! handoff_to = "pedro-valerio"
//! ```
//!
//! A `[[roles]]` list replaces the built-in registry entirely. It must still
//! define every role the pipeline assigns phases to.

use serde::Deserialize;
use sq_core::error::io_at;
use sq_core::{RoleDescriptor, RoleRegistry, SquadError, PIPELINE};
use sq_engine::discovery::DEFAULT_CATEGORIES;
use sq_storage::RecencyGuard;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const CONFIG_FILE: &str = "squad.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default, with = "humantime_serde")]
    concurrency_window: Option<Duration>,
    #[serde(default)]
    output_categories: Option<Vec<String>>,
    #[serde(default)]
    roles: Option<Vec<RoleDescriptor>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub concurrency_window: Duration,
    pub output_categories: Vec<String>,
    pub registry: RoleRegistry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency_window: RecencyGuard::DEFAULT_WINDOW,
            output_categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            registry: RoleRegistry::builtin(),
        }
    }
}

impl Config {
    /// Load `<root>/squad.toml`, falling back to defaults when it is absent
    pub fn load(root: &Path) -> Result<Self, SquadError> {
        let path = root.join(CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), "loading config");
                Self::parse(&content, &path.display().to_string())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(io_at(path)(e)),
        }
    }

    pub fn parse(content: &str, source_name: &str) -> Result<Self, SquadError> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| SquadError::InvalidConfig {
            source_name: source_name.to_string(),
            reason: e.message().to_string(),
        })?;

        let defaults = Self::default();
        let registry = match file.roles {
            Some(roles) => {
                let registry = RoleRegistry::new(roles, source_name)?;
                check_pipeline_roles(&registry, source_name)?;
                registry
            }
            None => defaults.registry,
        };
        Ok(Self {
            concurrency_window: file
                .concurrency_window
                .unwrap_or(defaults.concurrency_window),
            output_categories: file.output_categories.unwrap_or(defaults.output_categories),
            registry,
        })
    }

    pub fn guard(&self) -> RecencyGuard {
        RecencyGuard::new(self.concurrency_window)
    }
}

/// Phase records name their role by key, so each one must stay resolvable
fn check_pipeline_roles(registry: &RoleRegistry, source_name: &str) -> Result<(), SquadError> {
    let keys = registry.keys();
    match PIPELINE
        .roles_in_order()
        .into_iter()
        .find(|role| !keys.iter().any(|key| key == role))
    {
        Some(missing) => Err(SquadError::InvalidConfig {
            source_name: source_name.to_string(),
            reason: format!("no role configured for pipeline role {}", missing),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
