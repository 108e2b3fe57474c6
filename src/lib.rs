//! Korean labor-law calculation engine
//!
//! This crate calculates annual leave entitlement, severance pay, the
//! three-month average wage, retirement income tax, and minimum wage
//! compliance under the Labor Standards Act, the Employee Retirement Benefit
//! Security Act, the Income Tax Act and the Minimum Wage Act. Statutory
//! tables are loaded from YAML and every result carries an audit trail.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
