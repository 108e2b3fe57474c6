//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the statutory
//! tables from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

use super::types::{LaborConfig, MinimumWageConfig, MinimumWageTable, TaxRules};

/// Loads and provides access to the statutory tables.
///
/// # Directory Structure
///
/// ```text
/// config/kr_labor/
/// ├── minimum_wage.yaml    # Hourly minimum wage by year
/// └── retirement_tax.yaml  # Service deduction tiers and tax brackets
/// ```
///
/// # Example
///
/// ```no_run
/// use labor_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/kr_labor")?;
/// let hourly = loader.get_minimum_wage(2024)?;
/// println!("2024 minimum wage: {}원", hourly);
/// # Ok::<(), labor_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: LaborConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if a required file is missing, contains invalid
    /// YAML, or describes an incomplete table (no rates, a bounded top
    /// bracket, unsorted brackets).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let minimum_wage_path = path.join("minimum_wage.yaml");
        let minimum_wage = Self::load_yaml::<MinimumWageConfig>(&minimum_wage_path)?;
        if minimum_wage.rates.is_empty() {
            return Err(EngineError::ConfigParseError {
                path: minimum_wage_path.display().to_string(),
                message: "rates must not be empty".to_string(),
            });
        }

        let tax_path = path.join("retirement_tax.yaml");
        let tax_rules = Self::load_yaml::<TaxRules>(&tax_path)?;
        tax_rules
            .validate()
            .map_err(|message| EngineError::ConfigParseError {
                path: tax_path.display().to_string(),
                message,
            })?;

        Ok(Self {
            config: LaborConfig::new(minimum_wage, tax_rules),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &LaborConfig {
        &self.config
    }

    /// Returns the minimum wage table.
    pub fn minimum_wage_table(&self) -> &MinimumWageTable {
        self.config.minimum_wage()
    }

    /// Returns the retirement income tax rules.
    pub fn tax_rules(&self) -> &TaxRules {
        self.config.tax_rules()
    }

    /// Gets the statutory hourly minimum wage for a calendar year.
    ///
    /// Returns `MinimumWageNotFound` when the year is not in the table.
    pub fn get_minimum_wage(&self, year: i32) -> EngineResult<Decimal> {
        self.config.minimum_wage().hourly_wage(year)
    }
}
