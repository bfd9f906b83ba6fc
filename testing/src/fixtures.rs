//! Fixture builders.
//!
//! Each builder returns an entity with sensible defaults; tweak the public
//! fields afterwards for the case under test.

use chrono::{DateTime, Utc};
use photobooth_core::model::{
    Booth, BoothId, BoothStatus, BoothType, Branch, BranchId, Frame, FrameId, JsonObject, Photo,
    PhotoId, Session, SessionId, SessionStatus, Voucher, VoucherId, VoucherType, VoucherUnit,
};

/// A branch named `name`.
#[must_use]
pub fn branch(name: &str, created_at: DateTime<Utc>) -> Branch {
    Branch {
        id: BranchId::new(),
        name: name.to_string(),
        location: Some("Bangkok".to_string()),
        created_at,
    }
}

/// An active physical booth of `branch` that has never been issued a token.
#[must_use]
pub fn booth(branch: &Branch, created_at: DateTime<Utc>) -> Booth {
    Booth {
        id: BoothId::new(),
        branch_id: branch.id,
        name: format!("{} booth", branch.name),
        booth_type: BoothType::Physical,
        status: BoothStatus::Active,
        config: JsonObject::new(),
        token_version: 0,
        created_at,
    }
}

/// A started session on `booth_id`.
#[must_use]
pub fn session(booth_id: BoothId, started_at: DateTime<Utc>) -> Session {
    Session {
        id: SessionId::new(),
        booth_id,
        user_id: None,
        voucher_id: None,
        payment_id: None,
        started_at: Some(started_at),
        finished_at: None,
        status: SessionStatus::Started,
        total_price: Some(150.0),
        booth_snapshot: JsonObject::new(),
        phone_temp: None,
    }
}

/// An unframed, unfiltered capture of `session_id`.
#[must_use]
pub fn photo(session_id: SessionId, created_at: DateTime<Utc>) -> Photo {
    Photo {
        id: PhotoId::new(),
        session_id,
        frame_id: None,
        filter_id: None,
        storage_url: format!("s3://captures/{session_id}/1.jpg"),
        composition: JsonObject::new(),
        rendered_url: None,
        created_at,
    }
}

/// An active frame named `name`.
#[must_use]
pub fn frame(name: &str, created_at: DateTime<Utc>) -> Frame {
    Frame {
        id: FrameId::new(),
        name: name.to_string(),
        theme: None,
        file_url: format!("s3://frames/{name}.png"),
        active: true,
        created_at,
    }
}

/// An active 50 % discount voucher without a validity window.
#[must_use]
pub fn voucher(code: &str, max_usage: i32, created_at: DateTime<Utc>) -> Voucher {
    Voucher {
        id: VoucherId::new(),
        code: code.to_string(),
        voucher_type: VoucherType::Discount,
        value: 50.0,
        unit: VoucherUnit::Percent,
        max_usage,
        used_count: 0,
        valid_from: None,
        valid_to: None,
        active: true,
        created_at,
    }
}
