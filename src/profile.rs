//! The style profile document: one inferred rule per dimension, serialized
//! as JSON with deterministic key ordering.

use crate::infer::{Dimension, InferredRule, RuleValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("failed to read profile from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Profile header: which tool produced it and from how many files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMeta {
    pub tool: String,
    pub version: String,
    pub files: u64,
}

/// A learned style profile for one repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleProfile {
    pub meta: ProfileMeta,
    /// Dimension name → rule, in stable (sorted) key order.
    pub rules: BTreeMap<String, InferredRule<RuleValue>>,
}

impl StyleProfile {
    pub fn new(files: u64) -> Self {
        Self {
            meta: ProfileMeta {
                tool: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                files,
            },
            rules: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, dim: Dimension, rule: InferredRule<RuleValue>) {
        self.rules.insert(dim.name().to_string(), rule);
    }

    pub fn rule(&self, dim: Dimension) -> Option<&InferredRule<RuleValue>> {
        self.rules.get(dim.name())
    }

    pub fn rule_mut(&mut self, dim: Dimension) -> Option<&mut InferredRule<RuleValue>> {
        self.rules.get_mut(dim.name())
    }

    /// The enforced keyword value for a dimension, if any.
    pub fn enforced_keyword(&self, dim: Dimension) -> Option<&str> {
        self.rule(dim)
            .filter(|r| r.is_enforced())
            .and_then(|r| r.value.as_ref())
            .and_then(|v| v.as_keyword())
    }

    /// The enforced numeric value for a dimension, if any.
    pub fn enforced_number(&self, dim: Dimension) -> Option<u32> {
        self.rule(dim)
            .filter(|r| r.is_enforced())
            .and_then(|r| r.value.as_ref())
            .and_then(|v| v.as_number())
    }

    pub fn enforced_count(&self) -> usize {
        self.rules.values().filter(|r| r.is_enforced()).count()
    }

    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(input: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ProfileError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let contents = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }
}
