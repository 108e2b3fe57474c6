//! Audit trail models.
//!
//! Every calculator records the statutory rules it applied as a sequence of
//! [`AuditStep`]s so a result can be explained line by line.

use serde::{Deserialize, Serialize};

/// A single step in the audit trail recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use labor_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "service_deduction".to_string(),
///     rule_name: "Service Deduction".to_string(),
///     clause_ref: "소득세법 제48조".to_string(),
///     input: serde_json::json!({"years_of_service": 10}),
///     output: serde_json::json!({"deduction": "40000000"}),
///     reasoning: "15,000,000 + 5 × 5,000,000".to_string(),
/// };
/// assert_eq!(step.step_number, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number, starting at 1.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute article for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Collects audit steps and numbers them in the order they are recorded.
#[derive(Debug, Default)]
pub struct AuditTrail {
    steps: Vec<AuditStep>,
}

impl AuditTrail {
    /// Creates an empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step and returns its number.
    pub fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        clause_ref: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: impl Into<String>,
    ) -> u32 {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            clause_ref: clause_ref.to_string(),
            input,
            output,
            reasoning: reasoning.into(),
        });
        step_number
    }

    /// Consumes the trail and returns the recorded steps.
    pub fn into_steps(self) -> Vec<AuditStep> {
        self.steps
    }
}
