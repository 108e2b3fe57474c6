//! Saved calculation results.
//!
//! Users may keep calculation results for later reference. Records are
//! immutable once created; they can be listed per user and deleted.

mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineResult;

pub use memory::InMemoryStore;

/// The calculator a saved result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    /// Annual leave entitlement.
    AnnualLeave,
    /// Severance pay.
    Severance,
    /// Three-month average wage.
    AverageWage,
    /// Retirement income tax.
    RetirementTax,
    /// Minimum wage compliance.
    MinimumWage,
}

impl std::fmt::Display for CalculationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalculationType::AnnualLeave => write!(f, "annual_leave"),
            CalculationType::Severance => write!(f, "severance"),
            CalculationType::AverageWage => write!(f, "average_wage"),
            CalculationType::RetirementTax => write!(f, "retirement_tax"),
            CalculationType::MinimumWage => write!(f, "minimum_wage"),
        }
    }
}

impl std::str::FromStr for CalculationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "annual_leave" => Ok(CalculationType::AnnualLeave),
            "severance" => Ok(CalculationType::Severance),
            "average_wage" => Ok(CalculationType::AverageWage),
            "retirement_tax" => Ok(CalculationType::RetirementTax),
            "minimum_wage" => Ok(CalculationType::MinimumWage),
            _ => Err(format!("Invalid CalculationType: {}", s)),
        }
    }
}

/// A stored calculation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCalculation {
    /// Record id.
    pub id: Uuid,
    /// Owner of the record.
    pub user_id: String,
    /// Calculator that produced the payload.
    pub calculation_type: CalculationType,
    /// Optional user-supplied label.
    pub label: Option<String>,
    /// The serialized result record.
    pub payload: serde_json::Value,
    /// When the record was saved.
    pub created_at: DateTime<Utc>,
}

/// A calculation result to be saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalculation {
    /// Calculator that produced the payload.
    pub calculation_type: CalculationType,
    /// Optional user-supplied label.
    #[serde(default)]
    pub label: Option<String>,
    /// The serialized result record.
    pub payload: serde_json::Value,
}

/// Persistence for saved calculation results.
pub trait CalculationStore: Send + Sync {
    /// Saves a new record for `user_id` and returns it.
    fn create(&self, user_id: &str, new: NewCalculation) -> EngineResult<SavedCalculation>;

    /// Lists a user's records, oldest first, optionally filtered by type.
    fn list(
        &self,
        user_id: &str,
        calculation_type: Option<CalculationType>,
    ) -> EngineResult<Vec<SavedCalculation>>;

    /// Deletes one of a user's records.
    ///
    /// Fails with [`crate::error::EngineError::RecordNotFound`] when the
    /// record does not exist or belongs to another user.
    fn delete(&self, user_id: &str, id: Uuid) -> EngineResult<()>;
}
