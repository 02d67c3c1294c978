//! Runtime configuration parsed from environment variables.

use plan::consts::{DEFAULT_HISTORY_DEPTH, DEFAULT_MAX_GRID_CELLS};
use plan::session::RouteConfig;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid { var: &'static str, value: String, expected: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppConfig {
    /// Routing cell size; `None` follows the plan's grid spacing.
    pub cell_size: Option<f64>,
    pub max_grid_cells: usize,
    pub history_depth: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { cell_size: None, max_grid_cells: DEFAULT_MAX_GRID_CELLS, history_depth: DEFAULT_HISTORY_DEPTH }
    }
}

impl AppConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `BOOTHMAP_CELL_SIZE`: positive number; plan grid spacing when absent
    /// - `BOOTHMAP_MAX_GRID_CELLS`: default 4000000
    /// - `BOOTHMAP_HISTORY_DEPTH`: default 100
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let cell_size = match lookup("BOOTHMAP_CELL_SIZE") {
            Some(raw) => Some(parse_cell_size("BOOTHMAP_CELL_SIZE", &raw)?),
            None => defaults.cell_size,
        };
        let max_grid_cells = match lookup("BOOTHMAP_MAX_GRID_CELLS") {
            Some(raw) => parse_count("BOOTHMAP_MAX_GRID_CELLS", &raw)?,
            None => defaults.max_grid_cells,
        };
        let history_depth = match lookup("BOOTHMAP_HISTORY_DEPTH") {
            Some(raw) => parse_count("BOOTHMAP_HISTORY_DEPTH", &raw)?,
            None => defaults.history_depth,
        };
        Ok(Self { cell_size, max_grid_cells, history_depth })
    }

    #[must_use]
    pub fn route_config(&self) -> RouteConfig {
        RouteConfig { cell_size: self.cell_size, max_cells: self.max_grid_cells }
    }
}

/// Parse a routing cell size, rejecting zero, negatives and non-finite values.
pub fn parse_cell_size(var: &'static str, raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ConfigError::Invalid { var, value: raw.to_owned(), expected: "a positive number" }),
    }
}

fn parse_count(var: &'static str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::Invalid { var, value: raw.to_owned(), expected: "a non-negative integer" })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
