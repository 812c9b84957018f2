//! Configuration for diff and merge runs, loadable from TOML.
//!
//! ```toml
//! path_limits = ["spec.template", "data.*"]
//! ignore = ["metadata.resourceVersion"]
//! tolerance = 1e-9
//! absolute_tolerance = 0.001
//! ```
//!
//! Every field is optional; missing fields take the defaults of
//! [`DiffOptions`].

use crate::diff::DiffOptions;
use crate::errors::Result;
use crate::path::Path;
use crate::path_limit::PathLimit;
use crate::tolerance::EPSILON;
use serde::{Deserialize, Serialize};

fn default_tolerance() -> f64 {
    EPSILON
}

fn default_true() -> bool {
    true
}

/// Settings for a single diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Dotted path-limit patterns; `None` disables path-limit reporting
    pub path_limits: Option<Vec<String>>,
    /// Dotted paths of keys to skip
    pub ignore: Vec<String>,
    pub expand: bool,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    pub absolute_tolerance: Option<f64>,
    #[serde(default = "default_true")]
    pub dot_notation: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            path_limits: None,
            ignore: Vec::new(),
            expand: false,
            tolerance: EPSILON,
            absolute_tolerance: None,
            dot_notation: true,
        }
    }
}

impl DiffConfig {
    /// # Errors
    ///
    /// Returns `Config` for malformed TOML or unknown fields.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// # Errors
    ///
    /// Returns `InvalidPathPattern` for a malformed path limit.
    pub fn to_diff_options(&self) -> Result<DiffOptions> {
        let mut options = DiffOptions::new()
            .with_expand(self.expand)
            .with_tolerance(self.tolerance)
            .with_dot_notation(self.dot_notation);
        if let Some(abs) = self.absolute_tolerance {
            options = options.with_absolute_tolerance(abs);
        }
        if let Some(patterns) = &self.path_limits {
            options = options.with_path_limit(PathLimit::from_dotted(patterns)?);
        }
        for key in &self.ignore {
            options = options.ignore_dotted(key);
        }
        Ok(options)
    }
}

/// Settings for a three-way merge.
///
/// Merges always diff with `expand` on and a path limit present, so neither
/// is configurable here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    pub path_limits: Vec<String>,
    pub ignore: Vec<String>,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    pub absolute_tolerance: Option<f64>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            path_limits: Vec::new(),
            ignore: Vec::new(),
            tolerance: EPSILON,
            absolute_tolerance: None,
        }
    }
}

impl MergeConfig {
    /// # Errors
    ///
    /// Returns `Config` for malformed TOML or unknown fields.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// # Errors
    ///
    /// Returns `InvalidPathPattern` for a malformed pattern.
    pub fn path_limit(&self) -> Result<PathLimit> {
        PathLimit::from_dotted(&self.path_limits)
    }

    /// Options used for both branch diffs of a merge.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPathPattern` for a malformed path limit.
    pub fn to_diff_options(&self) -> Result<DiffOptions> {
        let mut options = DiffOptions::new()
            .with_expand(true)
            .with_path_limit(self.path_limit()?)
            .with_tolerance(self.tolerance);
        if let Some(abs) = self.absolute_tolerance {
            options = options.with_absolute_tolerance(abs);
        }
        for key in &self.ignore {
            options = options.ignore_path(Path::parse_dotted(key));
        }
        Ok(options)
    }
}
