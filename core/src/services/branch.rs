//! Branch service.

use crate::environment::Clock;
use crate::error::{CoreError, Result};
use crate::model::{Branch, BranchId};
use crate::providers::{BoothRepository, BranchRepository};
use crate::validation::require_non_empty;
use serde::Deserialize;
use std::sync::Arc;

/// Input for [`BranchService::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBranch {
    /// Display name.
    pub name: String,

    /// Free-text address.
    #[serde(default)]
    pub location: Option<String>,
}

/// Input for [`BranchService::update`]. Both fields are replaced.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBranch {
    /// Display name.
    pub name: String,

    /// Free-text address; `None` clears it.
    #[serde(default)]
    pub location: Option<String>,
}

/// Branch CRUD.
#[derive(Clone)]
pub struct BranchService {
    branches: Arc<dyn BranchRepository>,
    booths: Arc<dyn BoothRepository>,
    clock: Arc<dyn Clock>,
}

impl BranchService {
    /// Create the service.
    #[must_use]
    pub fn new(
        branches: Arc<dyn BranchRepository>,
        booths: Arc<dyn BoothRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            branches,
            booths,
            clock,
        }
    }

    /// Create a branch.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name, or a store error.
    pub async fn create(&self, input: CreateBranch) -> Result<Branch> {
        require_non_empty("name", &input.name)?;

        let branch = Branch {
            id: BranchId::new(),
            name: input.name,
            location: input.location,
            created_at: self.clock.now(),
        };
        self.branches.create(&branch).await?;

        tracing::info!(branch_id = %branch.id, "Branch created");
        Ok(branch)
    }

    /// Replace name and location of a branch.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name, `NotFound` for an unknown id.
    pub async fn update(&self, id: BranchId, input: UpdateBranch) -> Result<Branch> {
        require_non_empty("name", &input.name)?;

        let mut branch = self.branches.get(id).await?;
        branch.name = input.name;
        branch.location = input.location;
        self.branches.update(&branch).await?;
        Ok(branch)
    }

    /// Delete a branch that has no booths left.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `Conflict` while booths still
    /// belong to the branch.
    pub async fn delete(&self, id: BranchId) -> Result<()> {
        self.branches.get(id).await?;
        let booths = self.booths.list(Some(id)).await?;
        if !booths.is_empty() {
            return Err(CoreError::Conflict(format!(
                "branch {id} still has {} booth(s)",
                booths.len()
            )));
        }
        self.branches.delete(id).await?;
        tracing::info!(branch_id = %id, "Branch deleted");
        Ok(())
    }

    /// Fetch a branch.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: BranchId) -> Result<Branch> {
        self.branches.get(id).await
    }

    /// List all branches.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn list(&self) -> Result<Vec<Branch>> {
        self.branches.list().await
    }
}
