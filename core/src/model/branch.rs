//! Branch entity.

use super::BranchId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A physical location operating one or more booths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch ID.
    pub id: BranchId,

    /// Display name.
    pub name: String,

    /// Free-text address or area.
    pub location: Option<String>,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}
