//! Voucher service.
//!
//! Voucher administration. Redemption lives in [`crate::ledger`];
//! nothing here writes `used_count`.

use crate::environment::Clock;
use crate::error::{CoreError, Result};
use crate::model::{Redemption, Voucher, VoucherId, VoucherType, VoucherUnit};
use crate::providers::VoucherRepository;
use crate::validation::{validate_amount, validate_voucher_code, validate_window};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Input for [`VoucherService::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVoucher {
    /// Unique redemption code.
    pub code: String,

    /// Voucher type.
    #[serde(rename = "type")]
    pub voucher_type: VoucherType,

    /// Amount in `unit`.
    #[serde(default)]
    pub value: f64,

    /// Unit of `value`.
    pub unit: VoucherUnit,

    /// Usage cap; `0` is stored as `1`, negative means unlimited.
    #[serde(default)]
    pub max_usage: i32,

    /// Start of the validity window (Unix seconds on the wire).
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub valid_from: Option<DateTime<Utc>>,

    /// End of the validity window (Unix seconds on the wire).
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub valid_to: Option<DateTime<Utc>>,

    /// Active flag, `true` when omitted.
    #[serde(default)]
    pub active: Option<bool>,
}

/// Input for [`VoucherService::update`]. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVoucher {
    /// Amount in `unit`.
    #[serde(default)]
    pub value: Option<f64>,

    /// Unit of `value`.
    #[serde(default)]
    pub unit: Option<VoucherUnit>,

    /// Usage cap.
    #[serde(default)]
    pub max_usage: Option<i32>,

    /// Start of the validity window (Unix seconds on the wire).
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub valid_from: Option<DateTime<Utc>>,

    /// End of the validity window (Unix seconds on the wire).
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub valid_to: Option<DateTime<Utc>>,

    /// Active flag.
    #[serde(default)]
    pub active: Option<bool>,
}

/// Voucher CRUD.
#[derive(Clone)]
pub struct VoucherService {
    vouchers: Arc<dyn VoucherRepository>,
    clock: Arc<dyn Clock>,
}

impl VoucherService {
    /// Create the service.
    #[must_use]
    pub fn new(vouchers: Arc<dyn VoucherRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { vouchers, clock }
    }

    /// Create a voucher with `used_count = 0`.
    ///
    /// # Errors
    ///
    /// - `Validation` for a malformed code, negative value or inverted
    ///   window
    /// - `Conflict` if the code is taken
    #[tracing::instrument(skip(self, input), fields(voucher_code = %input.code))]
    pub async fn create(&self, input: CreateVoucher) -> Result<Voucher> {
        validate_voucher_code(&input.code)?;
        validate_amount("value", input.value)?;
        validate_window(input.valid_from, input.valid_to)?;

        let voucher = Voucher {
            id: VoucherId::new(),
            code: input.code,
            voucher_type: input.voucher_type,
            value: input.value,
            unit: input.unit,
            max_usage: if input.max_usage == 0 { 1 } else { input.max_usage },
            used_count: 0,
            valid_from: input.valid_from,
            valid_to: input.valid_to,
            active: input.active.unwrap_or(true),
            created_at: self.clock.now(),
        };
        self.vouchers.create(&voucher).await?;

        tracing::info!(voucher_id = %voucher.id, max_usage = voucher.max_usage, "Voucher created");
        Ok(voucher)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `Validation` for a negative
    /// value, a window that would end up inverted or a usage cap below the
    /// recorded uses.
    pub async fn update(&self, id: VoucherId, input: UpdateVoucher) -> Result<Voucher> {
        if let Some(value) = input.value {
            validate_amount("value", value)?;
        }

        let mut voucher = self.vouchers.get(id).await?;
        if let Some(value) = input.value {
            voucher.value = value;
        }
        if let Some(unit) = input.unit {
            voucher.unit = unit;
        }
        if let Some(max_usage) = input.max_usage {
            voucher.max_usage = max_usage;
        }
        if input.valid_from.is_some() {
            voucher.valid_from = input.valid_from;
        }
        if input.valid_to.is_some() {
            voucher.valid_to = input.valid_to;
        }
        if let Some(active) = input.active {
            voucher.active = active;
        }
        validate_window(voucher.valid_from, voucher.valid_to)?;
        if voucher.is_limited() && voucher.used_count > voucher.max_usage {
            return Err(CoreError::Validation(format!(
                "max_usage {} is below the {} uses already recorded",
                voucher.max_usage, voucher.used_count
            )));
        }

        self.vouchers.update(&voucher).await?;
        // Re-read so the returned used_count is the stored one.
        self.vouchers.get(id).await
    }

    /// Delete a voucher.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn delete(&self, id: VoucherId) -> Result<()> {
        self.vouchers.delete(id).await?;
        tracing::info!(voucher_id = %id, "Voucher deleted");
        Ok(())
    }

    /// Fetch a voucher.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: VoucherId) -> Result<Voucher> {
        self.vouchers.get(id).await
    }

    /// Fetch a voucher by code.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown code.
    pub async fn get_by_code(&self, code: &str) -> Result<Voucher> {
        self.vouchers.get_by_code(code).await
    }

    /// List vouchers.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn list(&self, active_only: bool) -> Result<Vec<Voucher>> {
        self.vouchers.list(active_only).await
    }

    /// List the redemptions of a voucher.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown voucher.
    pub async fn list_redemptions(&self, id: VoucherId) -> Result<Vec<Redemption>> {
        self.vouchers.get(id).await?;
        self.vouchers.list_redemptions(id).await
    }
}
