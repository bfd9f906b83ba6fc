//! `PostgreSQL` voucher and redemption store.

use crate::{corrupt_row, database_error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use photobooth_core::model::{
    NewRedemption, Redemption, RedemptionId, SessionId, Voucher, VoucherId,
};
use photobooth_core::providers::VoucherRepository;
use photobooth_core::{CoreError, Result};
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, code, type, value, unit, max_usage, used_count, valid_from, valid_to, \
                       active, created_at";

const REDEMPTION_COLUMNS: &str = "id, voucher_id, session_id, tel, discount, created_at";

#[derive(sqlx::FromRow)]
struct VoucherRow {
    id: Uuid,
    code: String,
    #[sqlx(rename = "type")]
    voucher_type: String,
    value: f64,
    unit: String,
    max_usage: i32,
    used_count: i32,
    valid_from: Option<DateTime<Utc>>,
    valid_to: Option<DateTime<Utc>>,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<VoucherRow> for Voucher {
    type Error = CoreError;

    fn try_from(row: VoucherRow) -> Result<Self> {
        Ok(Self {
            id: VoucherId(row.id),
            code: row.code,
            voucher_type: row.voucher_type.parse().map_err(|e| corrupt_row("vouchers.type", &e))?,
            value: row.value,
            unit: row.unit.parse().map_err(|e| corrupt_row("vouchers.unit", &e))?,
            max_usage: row.max_usage,
            used_count: row.used_count,
            valid_from: row.valid_from,
            valid_to: row.valid_to,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RedemptionRow {
    id: Uuid,
    voucher_id: Uuid,
    session_id: Uuid,
    tel: Option<String>,
    discount: Option<f64>,
    created_at: DateTime<Utc>,
}

impl From<RedemptionRow> for Redemption {
    fn from(row: RedemptionRow) -> Self {
        Self {
            id: RedemptionId(row.id),
            voucher_id: VoucherId(row.voucher_id),
            session_id: SessionId(row.session_id),
            tel: row.tel,
            discount: row.discount,
            created_at: row.created_at,
        }
    }
}

/// `PostgreSQL` voucher repository.
///
/// # Concurrency
///
/// [`VoucherRepository::record_redemption`] runs
/// `UPDATE ... SET used_count = used_count + 1 WHERE ... used_count < max_usage`
/// and the redemption `INSERT` in one transaction. Concurrent redemptions
/// queue on the voucher's row lock and re-evaluate the condition after the
/// previous one commits, so the cap cannot be overshot.
#[derive(Clone)]
pub struct PostgresVoucherRepository {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresVoucherRepository {
    /// Create a new `PostgreSQL` voucher repository.
    ///
    /// # Arguments
    ///
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoucherRepository for PostgresVoucherRepository {
    async fn create(&self, voucher: &Voucher) -> Result<()> {
        let sql = format!(
            "INSERT INTO vouchers ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        );
        sqlx::query(&sql)
            .bind(voucher.id.0)
            .bind(&voucher.code)
            .bind(voucher.voucher_type.as_str())
            .bind(voucher.value)
            .bind(voucher.unit.as_str())
            .bind(voucher.max_usage)
            .bind(voucher.used_count)
            .bind(voucher.valid_from)
            .bind(voucher.valid_to)
            .bind(voucher.active)
            .bind(voucher.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("create voucher", &e))?;
        Ok(())
    }

    async fn update(&self, voucher: &Voucher) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE vouchers
            SET value = $2, unit = $3, max_usage = $4, valid_from = $5, valid_to = $6, active = $7
            WHERE id = $1
            ",
        )
        .bind(voucher.id.0)
        .bind(voucher.value)
        .bind(voucher.unit.as_str())
        .bind(voucher.max_usage)
        .bind(voucher.valid_from)
        .bind(voucher.valid_to)
        .bind(voucher.active)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("update voucher", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("voucher", voucher.id));
        }
        Ok(())
    }

    async fn delete(&self, id: VoucherId) -> Result<()> {
        let result = sqlx::query("DELETE FROM vouchers WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("delete voucher", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("voucher", id));
        }
        Ok(())
    }

    async fn get(&self, id: VoucherId) -> Result<Voucher> {
        let sql = format!("SELECT {COLUMNS} FROM vouchers WHERE id = $1");
        sqlx::query_as::<_, VoucherRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("get voucher", &e))?
            .ok_or_else(|| CoreError::not_found("voucher", id))?
            .try_into()
    }

    async fn get_by_code(&self, code: &str) -> Result<Voucher> {
        let sql = format!("SELECT {COLUMNS} FROM vouchers WHERE code = $1");
        sqlx::query_as::<_, VoucherRow>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("get voucher by code", &e))?
            .ok_or_else(|| CoreError::not_found("voucher", code))?
            .try_into()
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Voucher>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM vouchers WHERE (NOT $1 OR active) ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, VoucherRow>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("list vouchers", &e))?;

        rows.into_iter().map(Voucher::try_from).collect()
    }

    async fn record_redemption(
        &self,
        voucher_id: VoucherId,
        redemption: NewRedemption,
        redeemed_at: DateTime<Utc>,
    ) -> Result<Option<(Redemption, Voucher)>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("begin redemption", &e))?;

        let sql = format!(
            r"
            UPDATE vouchers
            SET used_count = used_count + 1
            WHERE id = $1 AND (max_usage <= 0 OR used_count < max_usage)
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, VoucherRow>(&sql)
            .bind(voucher_id.0)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| database_error("increment voucher usage", &e))?;

        let Some(row) = row else {
            let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM vouchers WHERE id = $1")
                .bind(voucher_id.0)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| database_error("check voucher", &e))?
                .is_some();
            tx.rollback()
                .await
                .map_err(|e| database_error("roll back redemption", &e))?;

            return if exists {
                Ok(None)
            } else {
                Err(CoreError::not_found("voucher", voucher_id))
            };
        };
        let voucher = Voucher::try_from(row)?;

        let redemption = redemption.into_redemption(voucher_id, redeemed_at);
        let sql = format!(
            "INSERT INTO voucher_redemptions ({REDEMPTION_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)"
        );
        sqlx::query(&sql)
            .bind(redemption.id.0)
            .bind(redemption.voucher_id.0)
            .bind(redemption.session_id.0)
            .bind(&redemption.tel)
            .bind(redemption.discount)
            .bind(redemption.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| database_error("record redemption", &e))?;

        tx.commit()
            .await
            .map_err(|e| database_error("commit redemption", &e))?;

        Ok(Some((redemption, voucher)))
    }

    async fn list_redemptions(&self, voucher_id: VoucherId) -> Result<Vec<Redemption>> {
        let sql = format!(
            "SELECT {REDEMPTION_COLUMNS} FROM voucher_redemptions WHERE voucher_id = $1 \
             ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, RedemptionRow>(&sql)
            .bind(voucher_id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("list redemptions", &e))?;

        Ok(rows.into_iter().map(Redemption::from).collect())
    }

    async fn list_session_redemptions(&self, session_id: SessionId) -> Result<Vec<Redemption>> {
        let sql = format!(
            "SELECT {REDEMPTION_COLUMNS} FROM voucher_redemptions WHERE session_id = $1 \
             ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, RedemptionRow>(&sql)
            .bind(session_id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("list session redemptions", &e))?;

        Ok(rows.into_iter().map(Redemption::from).collect())
    }
}
