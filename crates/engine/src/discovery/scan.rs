// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem-backed output discovery

use super::OutputDiscovery;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Category directories scanned when none are configured
pub const DEFAULT_CATEGORIES: [&str; 5] = ["sources", "agents", "tasks", "templates", "data"];

/// Lists the entries of each category directory under the squad directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryScan {
    categories: Vec<String>,
}

impl DirectoryScan {
    pub fn new(categories: Vec<String>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

impl Default for DirectoryScan {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect())
    }
}

impl OutputDiscovery for DirectoryScan {
    fn discover(&self, squad_dir: &Path) -> Vec<String> {
        let mut outputs = Vec::new();
        for category in &self.categories {
            let dir = squad_dir.join(category);
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "skipping category");
                    continue;
                }
            };
            let mut names: Vec<String> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().to_string())
                .filter(|name| !name.starts_with('.'))
                .collect();
            names.sort();
            outputs.extend(names.into_iter().map(|name| format!("{}/{}", category, name)));
        }
        outputs
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
