// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Active squad pointer
//!
//! A single-line text file at the pipelines root naming the run that commands
//! fall back to when no slug is given. Last writer wins; it is re-read on every
//! resolution and never cached.

use sq_core::error::io_at;
use sq_core::{Slug, SquadError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const ACTIVE_POINTER_FILE: &str = ".active-squad";

#[derive(Debug, Clone)]
pub struct ActivePointer {
    path: PathBuf,
}

impl ActivePointer {
    /// Pointer stored under the given pipelines root
    pub fn under(root: &Path) -> Self {
        Self {
            path: root.join(ACTIVE_POINTER_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw pointer value; `None` when the file is missing or blank
    pub fn read(&self) -> Result<Option<String>, SquadError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let value = content.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_at(&self.path)(e)),
        }
    }

    /// Resolve the pointer to a slug.
    ///
    /// Fails with `NO_ACTIVE_SQUAD` when nothing is recorded and `INVALID_SLUG`
    /// when the recorded value is not a slug.
    pub fn resolve(&self) -> Result<Slug, SquadError> {
        let value = self.read()?.ok_or(SquadError::NoActiveSquad)?;
        Slug::new(value)
    }

    pub fn write(&self, slug: &Slug) -> Result<(), SquadError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_at(parent))?;
        }
        fs::write(&self.path, slug.as_str()).map_err(io_at(&self.path))
    }
}

#[cfg(test)]
#[path = "pointer_tests.rs"]
mod tests;
