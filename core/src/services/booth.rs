//! Booth service.
//!
//! Manages booth records. The token version is owned by
//! [`crate::token::BoothTokenAuthority`]; nothing here writes it.

use crate::environment::Clock;
use crate::error::{CoreError, Result};
use crate::model::{Booth, BoothId, BoothStatus, BoothType, BranchId, JsonObject};
use crate::providers::{BoothRepository, BranchRepository, SessionRepository, TelemetryRepository};
use crate::validation::require_non_empty;
use serde::Deserialize;
use std::sync::Arc;

/// Input for [`BoothService::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooth {
    /// Owning branch; must exist.
    pub branch_id: BranchId,

    /// Display name.
    pub name: String,

    /// Booth type, `physical` when omitted.
    #[serde(rename = "type", default)]
    pub booth_type: Option<BoothType>,

    /// Status, `active` when omitted.
    #[serde(default)]
    pub status: Option<BoothStatus>,

    /// Booth settings.
    #[serde(default)]
    pub config: JsonObject,
}

/// Input for [`BoothService::update`].
///
/// `branch_id`, `name` and `config` are replaced; `type` and `status` only
/// when supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBooth {
    /// Owning branch; must exist.
    pub branch_id: BranchId,

    /// Display name.
    pub name: String,

    /// New type, if changing.
    #[serde(rename = "type", default)]
    pub booth_type: Option<BoothType>,

    /// New status, if changing.
    #[serde(default)]
    pub status: Option<BoothStatus>,

    /// Booth settings.
    #[serde(default)]
    pub config: JsonObject,
}

/// Booth CRUD.
#[derive(Clone)]
pub struct BoothService {
    booths: Arc<dyn BoothRepository>,
    branches: Arc<dyn BranchRepository>,
    sessions: Arc<dyn SessionRepository>,
    telemetry: Arc<dyn TelemetryRepository>,
    clock: Arc<dyn Clock>,
}

impl BoothService {
    /// Create the service.
    #[must_use]
    pub fn new(
        booths: Arc<dyn BoothRepository>,
        branches: Arc<dyn BranchRepository>,
        sessions: Arc<dyn SessionRepository>,
        telemetry: Arc<dyn TelemetryRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            booths,
            branches,
            sessions,
            telemetry,
            clock,
        }
    }

    /// Create a booth with `token_version = 0`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name, `NotFound` if the branch does
    /// not exist.
    pub async fn create(&self, input: CreateBooth) -> Result<Booth> {
        require_non_empty("name", &input.name)?;
        self.branches.get(input.branch_id).await?;

        let booth = Booth {
            id: BoothId::new(),
            branch_id: input.branch_id,
            name: input.name,
            booth_type: input.booth_type.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            config: input.config,
            token_version: 0,
            created_at: self.clock.now(),
        };
        self.booths.create(&booth).await?;

        tracing::info!(booth_id = %booth.id, branch_id = %booth.branch_id, "Booth created");
        Ok(booth)
    }

    /// Update a booth.
    ///
    /// Moving a booth to another branch invalidates its outstanding tokens,
    /// since validation compares the token's branch with the stored one.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name, `NotFound` for an unknown
    /// booth or branch.
    pub async fn update(&self, id: BoothId, input: UpdateBooth) -> Result<Booth> {
        require_non_empty("name", &input.name)?;

        let mut booth = self.booths.get(id).await?;
        if booth.branch_id != input.branch_id {
            self.branches.get(input.branch_id).await?;
        }

        booth.branch_id = input.branch_id;
        booth.name = input.name;
        if let Some(booth_type) = input.booth_type {
            booth.booth_type = booth_type;
        }
        if let Some(status) = input.status {
            booth.status = status;
        }
        booth.config = input.config;

        self.booths.update(&booth).await?;
        Ok(booth)
    }

    /// Delete a booth that has no sessions left, together with its logs and
    /// analytics events.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `Conflict` while sessions still
    /// belong to the booth.
    pub async fn delete(&self, id: BoothId) -> Result<()> {
        self.booths.get(id).await?;
        let sessions = self.sessions.list(id, None).await?;
        if !sessions.is_empty() {
            return Err(CoreError::Conflict(format!(
                "booth {id} still has {} session(s)",
                sessions.len()
            )));
        }
        self.telemetry.purge_booth(id).await?;
        self.booths.delete(id).await?;
        tracing::info!(booth_id = %id, "Booth deleted");
        Ok(())
    }

    /// Fetch a booth.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: BoothId) -> Result<Booth> {
        self.booths.get(id).await
    }

    /// List booths, optionally of one branch.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn list(&self, branch_id: Option<BranchId>) -> Result<Vec<Booth>> {
        self.booths.list(branch_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::environment::SystemClock;
    use crate::mocks::{
        InMemoryBoothRepository, InMemoryBranchRepository, InMemorySessionRepository,
        InMemoryTelemetryRepository,
    };
    use crate::model::{BoothLog, BoothLogId, Branch, LogLevel, Session, SessionId, SessionStatus};
    use chrono::Utc;

    struct Fixture {
        service: BoothService,
        booths: Arc<InMemoryBoothRepository>,
        sessions: Arc<InMemorySessionRepository>,
        telemetry: Arc<InMemoryTelemetryRepository>,
        branch: Branch,
    }

    async fn fixture() -> Fixture {
        let branches = Arc::new(InMemoryBranchRepository::new());
        let branch = Branch {
            id: BranchId::new(),
            name: "Central".into(),
            location: None,
            created_at: Utc::now(),
        };
        branches.create(&branch).await.unwrap();
        let booths = Arc::new(InMemoryBoothRepository::new());
        let sessions = Arc::new(InMemorySessionRepository::new());
        let telemetry = Arc::new(InMemoryTelemetryRepository::new());
        let service = BoothService::new(
            booths.clone(),
            branches,
            sessions.clone(),
            telemetry.clone(),
            Arc::new(SystemClock),
        );
        Fixture {
            service,
            booths,
            sessions,
            telemetry,
            branch,
        }
    }

    async fn setup() -> (BoothService, Arc<InMemoryBoothRepository>, Branch) {
        let f = fixture().await;
        (f.service, f.booths, f.branch)
    }

    fn create_input(branch_id: BranchId) -> CreateBooth {
        CreateBooth {
            branch_id,
            name: "Booth A".into(),
            booth_type: None,
            status: None,
            config: JsonObject::new(),
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let (service, _, branch) = setup().await;
        let booth = service.create(create_input(branch.id)).await.unwrap();
        assert_eq!(booth.booth_type, BoothType::Physical);
        assert_eq!(booth.status, BoothStatus::Active);
        assert_eq!(booth.token_version, 0);
    }

    #[tokio::test]
    async fn test_create_requires_existing_branch() {
        let (service, _, _) = setup().await;
        let result = service.create(create_input(BranchId::new())).await;
        assert!(matches!(result, Err(CoreError::NotFound { resource: "branch", .. })));
    }

    #[tokio::test]
    async fn test_update_keeps_type_and_token_version() {
        let (service, booths, branch) = setup().await;
        let booth = service.create(create_input(branch.id)).await.unwrap();
        booths.bump_token_version(booth.id).await.unwrap();

        let updated = service
            .update(
                booth.id,
                UpdateBooth {
                    branch_id: branch.id,
                    name: "Booth B".into(),
                    booth_type: None,
                    status: Some(BoothStatus::Inactive),
                    config: JsonObject::new(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Booth B");
        assert_eq!(updated.booth_type, BoothType::Physical);
        assert_eq!(updated.status, BoothStatus::Inactive);
        assert_eq!(booths.get(booth.id).await.unwrap().token_version, 1);
    }

    #[tokio::test]
    async fn test_list_by_branch() {
        let (service, _, branch) = setup().await;
        service.create(create_input(branch.id)).await.unwrap();
        service.create(create_input(branch.id)).await.unwrap();

        assert_eq!(service.list(Some(branch.id)).await.unwrap().len(), 2);
        assert!(service.list(Some(BranchId::new())).await.unwrap().is_empty());
        assert_eq!(service.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_rejected_while_sessions_remain() {
        let f = fixture().await;
        let booth = f.service.create(create_input(f.branch.id)).await.unwrap();
        let session = Session {
            id: SessionId::new(),
            booth_id: booth.id,
            user_id: None,
            voucher_id: None,
            payment_id: None,
            started_at: Some(Utc::now()),
            finished_at: None,
            status: SessionStatus::Started,
            total_price: None,
            booth_snapshot: JsonObject::new(),
            phone_temp: None,
        };
        f.sessions.create(&session).await.unwrap();

        let result = f.service.delete(booth.id).await;
        assert!(matches!(result, Err(CoreError::Conflict(_))));
        assert!(f.service.get(booth.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_purges_telemetry() {
        let f = fixture().await;
        let booth = f.service.create(create_input(f.branch.id)).await.unwrap();
        let entry = BoothLog {
            id: BoothLogId::new(),
            booth_id: booth.id,
            event_type: "printer_jam".into(),
            level: LogLevel::Error,
            message: None,
            created_at: Utc::now(),
        };
        f.telemetry.append_log(&entry).await.unwrap();

        f.service.delete(booth.id).await.unwrap();
        assert!(f.telemetry.recent_logs(booth.id, 10).await.unwrap().is_empty());
        assert!(matches!(
            f.service.get(booth.id).await,
            Err(CoreError::NotFound { resource: "booth", .. })
        ));
    }
}
