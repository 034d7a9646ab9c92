//! On-disk JSON snapshot of schedules and budget plans.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use bursar_core::budget::BudgetPlan;
use bursar_core::recurrence::ScheduleDefinition;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Everything the store holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Payment schedules.
    #[serde(default)]
    pub schedules: Vec<ScheduleDefinition>,
    /// Budget plans with their entries.
    #[serde(default)]
    pub plans: Vec<BudgetPlan>,
}

impl Snapshot {
    /// Reads and checks a snapshot file.
    pub fn read(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: Self = serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        snapshot.check_unique()?;
        Ok(snapshot)
    }

    /// Writes the snapshot as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| StoreError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rejects repeated schedule IDs, plan IDs and plan years.
    pub fn check_unique(&self) -> Result<(), StoreError> {
        let mut schedule_ids = HashSet::new();
        if let Some(dup) = self.schedules.iter().find(|s| !schedule_ids.insert(s.id)) {
            return Err(StoreError::Duplicate {
                kind: "schedule id",
                key: dup.id.to_string(),
            });
        }

        let mut plan_ids = HashSet::new();
        if let Some(dup) = self.plans.iter().find(|p| !plan_ids.insert(p.id)) {
            return Err(StoreError::Duplicate {
                kind: "plan id",
                key: dup.id.to_string(),
            });
        }

        let mut years = HashSet::new();
        if let Some(dup) = self.plans.iter().find(|p| !years.insert(p.year)) {
            return Err(StoreError::Duplicate {
                kind: "plan year",
                key: dup.year.to_string(),
            });
        }

        Ok(())
    }
}
