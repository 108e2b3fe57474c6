//! Configuration loading and management for the labor calculation engine.
//!
//! This module loads the statutory tables the calculators depend on: the
//! hourly minimum wage by year and the retirement income tax rules.
//!
//! # Example
//!
//! ```no_run
//! use labor_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/kr_labor").unwrap();
//! println!("Tax rules for {}", config.tax_rules().effective_year);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    LaborConfig, MinimumWageConfig, MinimumWageRate, MinimumWageTable, ServiceDeductionTier,
    TaxBracket, TaxRules,
};
