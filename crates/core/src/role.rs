// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Role registry
//!
//! Maps a role key to its persona, responsibility, phases and hand-off target.
//! The hand-off order is the registry order.

use crate::error::SquadError;
use crate::phase::{Phase, PIPELINE};
use serde::{Deserialize, Serialize};

/// A role that owns one or more phases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleDescriptor {
    pub key: String,
    /// Persona display name
    pub persona: String,
    /// Responsibility label
    pub role: String,
    pub phases: Vec<Phase>,
    /// Next role once this one's phases are complete
    #[serde(default)]
    pub handoff_to: Option<String>,
    /// Location of the persona definition
    #[serde(default)]
    pub source: Option<String>,
}

/// Personas of the built-in roles, in hand-off order
const BUILTIN_PERSONAS: [(&str, &str, &str); 3] = [
    ("oalanicolas", "Alan Nicolas", "Mind Cloning Architect"),
    ("pedro-valerio", "Pedro Valério", "Process Absolutist"),
    ("squad-chief", "Squad Chief", "Integration Orchestrator"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct RoleRegistry {
    roles: Vec<RoleDescriptor>,
}

impl RoleRegistry {
    /// Registry whose phases and hand-offs come straight from the phase table
    pub fn builtin() -> Self {
        let order = PIPELINE.roles_in_order();
        let roles = BUILTIN_PERSONAS
            .iter()
            .map(|(key, persona, role)| RoleDescriptor {
                key: key.to_string(),
                persona: persona.to_string(),
                role: role.to_string(),
                phases: PIPELINE.phases_for_role(key),
                handoff_to: order
                    .iter()
                    .position(|k| k == key)
                    .and_then(|i| order.get(i + 1))
                    .map(|k| k.to_string()),
                source: Some(format!("squads/squad-creator/agents/{}.md", key)),
            })
            .collect();
        Self { roles }
    }

    /// Build a registry from configuration data.
    ///
    /// Keys must be unique and non-empty, and every hand-off target must be a
    /// registered key.
    pub fn new(roles: Vec<RoleDescriptor>, source_name: &str) -> Result<Self, SquadError> {
        let invalid = |reason: String| SquadError::InvalidConfig {
            source_name: source_name.to_string(),
            reason,
        };

        if roles.is_empty() {
            return Err(invalid("role registry is empty".to_string()));
        }
        for (i, role) in roles.iter().enumerate() {
            if role.key.trim().is_empty() {
                return Err(invalid(format!("role #{} has an empty key", i + 1)));
            }
            if roles[..i].iter().any(|r| r.key == role.key) {
                return Err(invalid(format!("duplicate role key: {}", role.key)));
            }
        }
        for role in &roles {
            if let Some(target) = &role.handoff_to {
                if !roles.iter().any(|r| &r.key == target) {
                    return Err(invalid(format!(
                        "role {} hands off to unknown role {}",
                        role.key, target
                    )));
                }
            }
        }
        Ok(Self { roles })
    }

    pub fn roles(&self) -> &[RoleDescriptor] {
        &self.roles
    }

    pub fn keys(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.key.clone()).collect()
    }

    /// Look up a role, failing with `INVALID_AGENT` for unknown keys
    pub fn get(&self, key: &str) -> Result<&RoleDescriptor, SquadError> {
        self.roles
            .iter()
            .find(|r| r.key == key)
            .ok_or_else(|| SquadError::InvalidAgent {
                received: key.to_string(),
                valid_keys: self.keys(),
            })
    }

    /// Predecessor in hand-off order; `None` for the first role
    pub fn handoff_from(&self, key: &str) -> Option<&str> {
        let idx = self.roles.iter().position(|r| r.key == key)?;
        idx.checked_sub(1)
            .and_then(|prev| self.roles.get(prev))
            .map(|r| r.key.as_str())
    }

    pub fn handoff_to(&self, key: &str) -> Option<&str> {
        self.roles
            .iter()
            .find(|r| r.key == key)
            .and_then(|r| r.handoff_to.as_deref())
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "role_tests.rs"]
mod tests;
