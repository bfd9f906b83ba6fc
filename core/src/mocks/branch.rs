//! In-memory branch store.

use super::lock;
use crate::error::{CoreError, Result};
use crate::model::{Branch, BranchId};
use crate::providers::BranchRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory [`BranchRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryBranchRepository {
    branches: Arc<Mutex<HashMap<BranchId, Branch>>>,
}

impl InMemoryBranchRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BranchRepository for InMemoryBranchRepository {
    async fn create(&self, branch: &Branch) -> Result<()> {
        let mut branches = lock(&self.branches, "branch")?;
        if branches.contains_key(&branch.id) {
            return Err(CoreError::Conflict(format!("branch {} already exists", branch.id)));
        }
        branches.insert(branch.id, branch.clone());
        Ok(())
    }

    async fn update(&self, branch: &Branch) -> Result<()> {
        let mut branches = lock(&self.branches, "branch")?;
        let stored = branches
            .get_mut(&branch.id)
            .ok_or_else(|| CoreError::not_found("branch", branch.id))?;
        stored.name.clone_from(&branch.name);
        stored.location.clone_from(&branch.location);
        Ok(())
    }

    async fn delete(&self, id: BranchId) -> Result<()> {
        lock(&self.branches, "branch")?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("branch", id))
    }

    async fn get(&self, id: BranchId) -> Result<Branch> {
        lock(&self.branches, "branch")?
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("branch", id))
    }

    async fn list(&self) -> Result<Vec<Branch>> {
        let mut branches: Vec<Branch> = lock(&self.branches, "branch")?.values().cloned().collect();
        branches.sort_by_key(|b| (b.created_at, b.id));
        Ok(branches)
    }
}
