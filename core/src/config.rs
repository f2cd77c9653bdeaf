//! Check options.
//!
//! Loaded from JSON (e.g. a bench or server config file) and range-checked
//! the same way on every path into the struct.

use serde::Deserialize;

use crate::error::{PathError, Result};

/// Smallest accepted `max_visited` bound.
pub const MIN_MAX_VISITED: usize = 1;

/// Largest accepted `max_visited` bound.
pub const MAX_MAX_VISITED: usize = u32::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathOptions {
    /// Abort a cycle with `ResourceLimit` once this many search states exist.
    /// Unset means unbounded.
    pub max_visited: Option<usize>,
    /// Report exhaustion without scanning when the start node is not in the graph.
    pub check_start_node: bool,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            max_visited: None,
            check_start_node: true,
        }
    }
}

impl PathOptions {
    /// Parse and validate a JSON options document.
    pub fn from_json(text: &str) -> Result<Self> {
        let opts: PathOptions = serde_json::from_str(text)?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn with_max_visited(mut self, limit: usize) -> Result<Self> {
        self.max_visited = Some(limit);
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.max_visited {
            if !(MIN_MAX_VISITED..=MAX_MAX_VISITED).contains(&limit) {
                return Err(PathError::Config(format!(
                    "max_visited must be in {}..={}, got {}",
                    MIN_MAX_VISITED, MAX_MAX_VISITED, limit
                )));
            }
        }
        Ok(())
    }
}
