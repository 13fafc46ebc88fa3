// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target run selection for one invocation

use sq_core::{Slug, SquadError};
use sq_storage::ActivePointer;
use tracing::debug;

/// Where the target slug came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugSource {
    Explicit,
    ActivePointer,
}

/// The run an invocation operates on, resolved once at the edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub slug: Slug,
    pub source: SlugSource,
}

impl Session {
    /// An explicit slug wins; otherwise the active pointer is consulted.
    ///
    /// An explicit value is validated like any other slug.
    pub fn resolve(explicit: Option<&str>, pointer: &ActivePointer) -> Result<Self, SquadError> {
        let session = match explicit {
            Some(value) => Self {
                slug: Slug::new(value)?,
                source: SlugSource::Explicit,
            },
            None => Self {
                slug: pointer.resolve()?,
                source: SlugSource::ActivePointer,
            },
        };
        debug!(slug = %session.slug, source = ?session.source, "resolved session");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sq_storage::ActivePointer;
    use std::fs;

    #[test]
    fn explicit_slug_wins_over_pointer() {
        let dir = tempfile::tempdir().unwrap();
        let pointer = ActivePointer::under(dir.path());
        pointer.write(&Slug::new("other").unwrap()).unwrap();

        let session = Session::resolve(Some("acme"), &pointer).unwrap();

        assert_eq!(session.slug.as_str(), "acme");
        assert_eq!(session.source, SlugSource::Explicit);
    }

    #[test]
    fn falls_back_to_pointer() {
        let dir = tempfile::tempdir().unwrap();
        let pointer = ActivePointer::under(dir.path());
        pointer.write(&Slug::new("acme").unwrap()).unwrap();

        let session = Session::resolve(None, &pointer).unwrap();

        assert_eq!(session.slug.as_str(), "acme");
        assert_eq!(session.source, SlugSource::ActivePointer);
    }

    #[test]
    fn nothing_to_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let pointer = ActivePointer::under(dir.path());
        let err = Session::resolve(None, &pointer).unwrap_err();
        assert_eq!(err.code(), "NO_ACTIVE_SQUAD");
    }

    #[test]
    fn explicit_slug_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        let pointer = ActivePointer::under(dir.path());
        let err = Session::resolve(Some("Acme-Legal"), &pointer).unwrap_err();
        assert_eq!(err.code(), "INVALID_SLUG");
    }

    #[test]
    fn malformed_pointer_is_invalid_slug() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".active-squad"), "Not A Slug\n").unwrap();
        let pointer = ActivePointer::under(dir.path());
        let err = Session::resolve(None, &pointer).unwrap_err();
        assert_eq!(err.code(), "INVALID_SLUG");
    }
}
