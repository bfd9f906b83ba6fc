//! In-memory booth store.

use super::lock;
use crate::error::{CoreError, Result};
use crate::model::{Booth, BoothId, BranchId};
use crate::providers::BoothRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory [`BoothRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoothRepository {
    booths: Arc<Mutex<HashMap<BoothId, Booth>>>,
}

impl InMemoryBoothRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoothRepository for InMemoryBoothRepository {
    async fn create(&self, booth: &Booth) -> Result<()> {
        let mut booths = lock(&self.booths, "booth")?;
        if booths.contains_key(&booth.id) {
            return Err(CoreError::Conflict(format!("booth {} already exists", booth.id)));
        }
        booths.insert(booth.id, booth.clone());
        Ok(())
    }

    async fn update(&self, booth: &Booth) -> Result<()> {
        let mut booths = lock(&self.booths, "booth")?;
        let stored = booths
            .get_mut(&booth.id)
            .ok_or_else(|| CoreError::not_found("booth", booth.id))?;
        stored.branch_id = booth.branch_id;
        stored.name.clone_from(&booth.name);
        stored.booth_type = booth.booth_type;
        stored.status = booth.status;
        stored.config.clone_from(&booth.config);
        Ok(())
    }

    async fn delete(&self, id: BoothId) -> Result<()> {
        lock(&self.booths, "booth")?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("booth", id))
    }

    async fn get(&self, id: BoothId) -> Result<Booth> {
        lock(&self.booths, "booth")?
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("booth", id))
    }

    async fn list(&self, branch_id: Option<BranchId>) -> Result<Vec<Booth>> {
        let mut booths: Vec<Booth> = lock(&self.booths, "booth")?
            .values()
            .filter(|b| branch_id.is_none_or(|id| b.branch_id == id))
            .cloned()
            .collect();
        booths.sort_by_key(|b| (b.created_at, b.id));
        Ok(booths)
    }

    async fn initialize_token_version(&self, id: BoothId) -> Result<Booth> {
        let mut booths = lock(&self.booths, "booth")?;
        let booth = booths
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("booth", id))?;
        if booth.token_version == 0 {
            booth.token_version = 1;
        }
        Ok(booth.clone())
    }

    async fn bump_token_version(&self, id: BoothId) -> Result<Booth> {
        let mut booths = lock(&self.booths, "booth")?;
        let booth = booths
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("booth", id))?;
        booth.token_version = Booth::next_token_version(booth.token_version);
        Ok(booth.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{BoothStatus, BoothType, JsonObject};
    use chrono::Utc;

    fn booth(token_version: i32) -> Booth {
        Booth {
            id: BoothId::new(),
            branch_id: BranchId::new(),
            name: "A".into(),
            booth_type: BoothType::Virtual,
            status: BoothStatus::Active,
            config: JsonObject::new(),
            token_version,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_update_ignores_token_version() {
        let repo = InMemoryBoothRepository::new();
        let mut b = booth(3);
        repo.create(&b).await.unwrap();
        b.token_version = 99;
        b.name = "B".into();
        repo.update(&b).await.unwrap();
        let stored = repo.get(b.id).await.unwrap();
        assert_eq!(stored.token_version, 3);
        assert_eq!(stored.name, "B");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_bumps_are_not_lost() {
        let repo = Arc::new(InMemoryBoothRepository::new());
        let b = booth(1);
        repo.create(&b).await.unwrap();
        let id = b.id;

        let bumps = (0..50).map(|_| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.bump_token_version(id).await })
        });
        for result in futures::future::join_all(bumps).await {
            result.unwrap().unwrap();
        }

        assert_eq!(repo.get(id).await.unwrap().token_version, 51);
    }

    #[tokio::test]
    async fn test_initialize_only_from_zero() {
        let repo = InMemoryBoothRepository::new();
        let fresh = booth(0);
        let used = booth(7);
        repo.create(&fresh).await.unwrap();
        repo.create(&used).await.unwrap();

        assert_eq!(repo.initialize_token_version(fresh.id).await.unwrap().token_version, 1);
        assert_eq!(repo.initialize_token_version(fresh.id).await.unwrap().token_version, 1);
        assert_eq!(repo.initialize_token_version(used.id).await.unwrap().token_version, 7);
    }
}
