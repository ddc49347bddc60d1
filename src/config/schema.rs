use crate::infer::Thresholds;
use serde::Deserialize;
use std::fmt;

/// Top-level tool configuration, loaded from `restyler.toml`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ToolConfig {
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

impl ToolConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.thresholds.min_evidence == 0 {
            issues.push(ValidationIssue::OutOfRange {
                field: "thresholds.min_evidence",
                message: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.thresholds.min_confidence) {
            issues.push(ValidationIssue::OutOfRange {
                field: "thresholds.min_confidence",
                message: "must be within [0, 1]".to_string(),
            });
        }
        if self.scan.max_file_bytes == 0 {
            issues.push(ValidationIssue::OutOfRange {
                field: "scan.max_file_bytes",
                message: "must be at least 1".to_string(),
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// The inference thresholds this config describes.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_evidence: self.thresholds.min_evidence,
            min_confidence: self.thresholds.min_confidence,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub min_evidence: u64,
    pub min_confidence: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        let defaults = Thresholds::default();
        Self {
            min_evidence: defaults.min_evidence,
            min_confidence: defaults.min_confidence,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory names skipped during discovery.
    pub ignore_dirs: Vec<String>,
    /// Files larger than this are skipped (generated bundles, vendored blobs).
    pub max_file_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: [
                "node_modules",
                ".git",
                "dist",
                "build",
                "coverage",
                "vendor",
                ".next",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_file_bytes: 1_048_576,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    OutOfRange {
        field: &'static str,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::OutOfRange { field, message } => {
                write!(f, "config field '{field}' is invalid: {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ToolConfig::default().validate().is_ok());
    }

    #[test]
    fn default_ignore_dirs_cover_generated_trees() {
        let scan = ScanConfig::default();
        assert!(scan.ignore_dirs.iter().any(|d| d == "node_modules"));
        assert!(scan.ignore_dirs.iter().any(|d| d == ".git"));
    }

    #[test]
    fn invalid_confidence_is_rejected() {
        let mut config = ToolConfig::default();
        config.thresholds.min_confidence = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_evidence_is_rejected() {
        let mut config = ToolConfig::default();
        config.thresholds.min_evidence = 0;
        assert!(config.validate().is_err());
    }
}
