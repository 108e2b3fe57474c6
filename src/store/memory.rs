//! In-process calculation store.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::{CalculationStore, CalculationType, NewCalculation, SavedCalculation};

/// A [`CalculationStore`] that keeps records in memory, keyed by user.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, Vec<SavedCalculation>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> EngineError {
    EngineError::CalculationError {
        message: "calculation store lock poisoned".to_string(),
    }
}

impl CalculationStore for InMemoryStore {
    fn create(&self, user_id: &str, new: NewCalculation) -> EngineResult<SavedCalculation> {
        let record = SavedCalculation {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            calculation_type: new.calculation_type,
            label: new.label,
            payload: new.payload,
            created_at: Utc::now(),
        };

        let mut records = self.records.write().map_err(|_| poisoned())?;
        records
            .entry(user_id.to_string())
            .or_default()
            .push(record.clone());

        debug!(user_id, id = %record.id, calculation_type = %record.calculation_type, "Saved calculation");
        Ok(record)
    }

    fn list(
        &self,
        user_id: &str,
        calculation_type: Option<CalculationType>,
    ) -> EngineResult<Vec<SavedCalculation>> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records
            .get(user_id)
            .map(|saved| {
                saved
                    .iter()
                    .filter(|r| calculation_type.is_none_or(|t| r.calculation_type == t))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn delete(&self, user_id: &str, id: Uuid) -> EngineResult<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let saved = records
            .get_mut(user_id)
            .ok_or_else(|| EngineError::RecordNotFound { id: id.to_string() })?;

        let before = saved.len();
        saved.retain(|r| r.id != id);
        if saved.len() == before {
            return Err(EngineError::RecordNotFound { id: id.to_string() });
        }
        Ok(())
    }
}
