//! Branch store trait.

use crate::error::Result;
use crate::model::{Branch, BranchId};
use async_trait::async_trait;

/// Branch persistence.
#[async_trait]
pub trait BranchRepository: Send + Sync {
    /// Insert a new branch.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    async fn create(&self, branch: &Branch) -> Result<()>;

    /// Overwrite name and location of an existing branch.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the branch does not exist.
    async fn update(&self, branch: &Branch) -> Result<()>;

    /// Delete a branch.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the branch does not exist.
    async fn delete(&self, id: BranchId) -> Result<()>;

    /// Fetch a branch.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the branch does not exist.
    async fn get(&self, id: BranchId) -> Result<Branch>;

    /// List all branches, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn list(&self) -> Result<Vec<Branch>>;
}
