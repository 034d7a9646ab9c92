//! In-memory repositories backed by a snapshot.

use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bursar_core::budget::BudgetPlan;
use bursar_core::recurrence::ScheduleDefinition;
use bursar_core::repository::{BudgetPlanRepository, RepositoryError, ScheduleRepository};
use bursar_shared::types::{BudgetPlanId, ScheduleId};
use tracing::info;

use crate::error::StoreError;
use crate::snapshot::Snapshot;

/// Schedules and plans held in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<Snapshot>,
}

impl InMemoryStore {
    /// Wraps a snapshot after checking it for duplicates.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        snapshot.check_unique()?;
        Ok(Self {
            data: RwLock::new(snapshot),
        })
    }

    /// Loads a snapshot file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let snapshot = Snapshot::read(path)?;
        info!(
            path = %path.display(),
            schedules = snapshot.schedules.len(),
            plans = snapshot.plans.len(),
            "Loaded snapshot"
        );
        Self::from_snapshot(snapshot)
    }

    /// Writes the current contents to `path`.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        self.read()?.write(path)?;
        info!(path = %path.display(), "Saved snapshot");
        Ok(())
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Result<Snapshot, StoreError> {
        Ok(self.read()?.clone())
    }

    /// Inserts a plan or replaces the one with the same ID.
    pub fn upsert_plan(&self, plan: BudgetPlan) -> Result<(), StoreError> {
        let mut data = self.write()?;
        if data.plans.iter().any(|p| p.year == plan.year && p.id != plan.id) {
            return Err(StoreError::Duplicate {
                kind: "plan year",
                key: plan.year.to_string(),
            });
        }
        match data.plans.iter_mut().find(|p| p.id == plan.id) {
            Some(existing) => *existing = plan,
            None => data.plans.push(plan),
        }
        Ok(())
    }

    /// Inserts a schedule or replaces the one with the same ID.
    pub fn upsert_schedule(&self, schedule: ScheduleDefinition) -> Result<(), StoreError> {
        let mut data = self.write()?;
        match data.schedules.iter_mut().find(|s| s.id == schedule.id) {
            Some(existing) => *existing = schedule,
            None => data.schedules.push(schedule),
        }
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Snapshot>, StoreError> {
        self.data.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Snapshot>, StoreError> {
        self.data.write().map_err(|_| StoreError::Poisoned)
    }
}

impl ScheduleRepository for InMemoryStore {
    fn find_schedule(&self, id: ScheduleId) -> Result<Option<ScheduleDefinition>, RepositoryError> {
        Ok(self.read()?.schedules.iter().find(|s| s.id == id).cloned())
    }

    fn list_active_schedules(&self) -> Result<Vec<ScheduleDefinition>, RepositoryError> {
        Ok(self
            .read()?
            .schedules
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect())
    }
}

impl BudgetPlanRepository for InMemoryStore {
    fn find_plan(&self, id: BudgetPlanId) -> Result<Option<BudgetPlan>, RepositoryError> {
        Ok(self.read()?.plans.iter().find(|p| p.id == id).cloned())
    }

    fn find_plan_by_year(&self, year: i32) -> Result<Option<BudgetPlan>, RepositoryError> {
        Ok(self.read()?.plans.iter().find(|p| p.year == year).cloned())
    }
}
