//! Voucher Redemption Ledger.
//!
//! Checks a voucher's eligibility and records a redemption, keeping
//! `used_count` equal to the number of successful redemptions. The usage
//! cap is enforced twice: once against the loaded row (so the caller gets
//! the precise reason) and once inside the store's atomic conditional
//! increment (so concurrent redemptions can never overshoot it).

use crate::constants::metric_names;
use crate::environment::Clock;
use crate::error::{CoreError, IneligibleReason, Result};
use crate::model::{NewRedemption, Redemption, Voucher};
use crate::providers::VoucherRepository;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of a successful redemption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedemptionReceipt {
    /// The recorded redemption.
    pub redemption: Redemption,

    /// The voucher after the increment.
    pub voucher: Voucher,
}

/// Records voucher redemptions.
#[derive(Clone)]
pub struct VoucherLedger {
    vouchers: Arc<dyn VoucherRepository>,
    clock: Arc<dyn Clock>,
}

impl VoucherLedger {
    /// Create a ledger backed by `vouchers`, reading time from `clock`.
    #[must_use]
    pub fn new(vouchers: Arc<dyn VoucherRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { vouchers, clock }
    }

    /// Redeem the voucher identified by `code`.
    ///
    /// Eligibility checks run in order (active, not yet valid, expired,
    /// usage limit) and the first failure wins. A rejected redemption
    /// writes nothing.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no voucher has this code
    /// - `VoucherIneligible` with the failing [`IneligibleReason`]
    /// - `Database` if the store fails
    #[tracing::instrument(skip(self, redemption), fields(session_id = %redemption.session_id))]
    pub async fn redeem(&self, code: &str, redemption: NewRedemption) -> Result<RedemptionReceipt> {
        let voucher = self.vouchers.get_by_code(code).await?;
        let now = self.clock.now();

        if let Err(reason) = voucher.check_eligibility(now) {
            return Err(reject(code, reason));
        }

        let Some((redemption, voucher)) = self
            .vouchers
            .record_redemption(voucher.id, redemption, now)
            .await?
        else {
            // Another redemption consumed the last use after our read.
            return Err(reject(code, IneligibleReason::UsageLimitReached));
        };

        metrics::counter!(metric_names::VOUCHER_REDEMPTIONS, "outcome" => "redeemed").increment(1);
        tracing::info!(
            voucher_code = code,
            used_count = voucher.used_count,
            max_usage = voucher.max_usage,
            "Voucher redeemed"
        );

        Ok(RedemptionReceipt {
            redemption,
            voucher,
        })
    }
}

fn reject(code: &str, reason: IneligibleReason) -> CoreError {
    metrics::counter!(metric_names::VOUCHER_REDEMPTIONS, "outcome" => reason.as_label()).increment(1);
    tracing::info!(voucher_code = code, reason = %reason, "Voucher redemption rejected");
    CoreError::VoucherIneligible(reason)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::mocks::InMemoryVoucherRepository;
    use crate::model::{SessionId, VoucherId, VoucherType, VoucherUnit};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    struct PinnedClock(DateTime<Utc>);

    impl Clock for PinnedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn voucher(code: &str, max_usage: i32) -> Voucher {
        Voucher {
            id: VoucherId::new(),
            code: code.into(),
            voucher_type: VoucherType::Discount,
            value: 50.0,
            unit: VoucherUnit::Percent,
            max_usage,
            used_count: 0,
            valid_from: None,
            valid_to: None,
            active: true,
            created_at: now(),
        }
    }

    fn request() -> NewRedemption {
        NewRedemption {
            session_id: SessionId::new(),
            tel: Some("0812345678".into()),
            discount: Some(50.0),
        }
    }

    async fn ledger_with(voucher: &Voucher) -> (Arc<InMemoryVoucherRepository>, VoucherLedger) {
        let vouchers = Arc::new(InMemoryVoucherRepository::new());
        vouchers.create(voucher).await.unwrap();
        let ledger = VoucherLedger::new(vouchers.clone(), Arc::new(PinnedClock(now())));
        (vouchers, ledger)
    }

    #[tokio::test]
    async fn test_welcome50_single_use() {
        let (vouchers, ledger) = ledger_with(&voucher("WELCOME50", 1)).await;

        let receipt = ledger.redeem("WELCOME50", request()).await.unwrap();
        assert_eq!(receipt.voucher.used_count, 1);
        assert_eq!(receipt.redemption.voucher_id, receipt.voucher.id);
        assert_eq!(receipt.redemption.created_at, now());

        let second = ledger.redeem("WELCOME50", request()).await;
        assert_eq!(
            second,
            Err(CoreError::VoucherIneligible(IneligibleReason::UsageLimitReached))
        );
        assert_eq!(
            second.unwrap_err().to_string(),
            "voucher usage limit reached"
        );

        let redemptions = vouchers.list_redemptions(receipt.voucher.id).await.unwrap();
        assert_eq!(redemptions.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_code() {
        let (_, ledger) = ledger_with(&voucher("A", 1)).await;
        let result = ledger.redeem("B", request()).await;
        assert!(matches!(result, Err(CoreError::NotFound { resource: "voucher", .. })));
    }

    #[tokio::test]
    async fn test_expired_voucher_writes_nothing() {
        let mut v = voucher("OLD", 5);
        v.valid_to = Some(now() - Duration::days(1));
        let (vouchers, ledger) = ledger_with(&v).await;

        let result = ledger.redeem("OLD", request()).await;
        assert_eq!(result, Err(CoreError::VoucherIneligible(IneligibleReason::Expired)));

        let stored = vouchers.get(v.id).await.unwrap();
        assert_eq!(stored.used_count, 0);
        assert!(vouchers.list_redemptions(v.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_yet_valid() {
        let mut v = voucher("SOON", 5);
        v.valid_from = Some(now() + Duration::hours(1));
        let (_, ledger) = ledger_with(&v).await;
        let result = ledger.redeem("SOON", request()).await.unwrap_err();
        assert_eq!(result.to_string(), "voucher not yet valid");
    }

    #[tokio::test]
    async fn test_inactive_checked_first() {
        let mut v = voucher("OFF", 1);
        v.active = false;
        v.valid_to = Some(now() - Duration::days(1));
        let (vouchers, ledger) = ledger_with(&v).await;

        let result = ledger.redeem("OFF", request()).await.unwrap_err();
        assert_eq!(result.to_string(), "voucher inactive");
        assert_eq!(vouchers.get(v.id).await.unwrap().used_count, 0);
    }

    #[tokio::test]
    async fn test_unlimited_voucher_keeps_counting() {
        let (_, ledger) = ledger_with(&voucher("FOREVER", 0)).await;
        for expected in 1..=5 {
            let receipt = ledger.redeem("FOREVER", request()).await.unwrap();
            assert_eq!(receipt.voucher.used_count, expected);
        }
    }

    #[tokio::test]
    async fn test_same_session_may_redeem_twice() {
        let (vouchers, ledger) = ledger_with(&voucher("STACK", 3)).await;
        let req = request();
        ledger.redeem("STACK", req.clone()).await.unwrap();
        let receipt = ledger.redeem("STACK", req).await.unwrap();
        assert_eq!(receipt.voucher.used_count, 2);
        assert_eq!(vouchers.list_redemptions(receipt.voucher.id).await.unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_redemptions_never_exceed_max_usage() {
        const MAX: i32 = 5;
        const EXTRA: i32 = 7;

        let v = voucher("RUSH", MAX);
        let (vouchers, ledger) = ledger_with(&v).await;

        let attempts = (0..MAX + EXTRA).map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.redeem("RUSH", request()).await })
        });
        let results = futures::future::join_all(attempts).await;

        let mut succeeded = 0;
        let mut exhausted = 0;
        for result in results {
            match result.unwrap() {
                Ok(_) => succeeded += 1,
                Err(CoreError::VoucherIneligible(IneligibleReason::UsageLimitReached)) => {
                    exhausted += 1;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(succeeded, MAX);
        assert_eq!(exhausted, EXTRA);
        assert_eq!(vouchers.get(v.id).await.unwrap().used_count, MAX);
        assert_eq!(vouchers.list_redemptions(v.id).await.unwrap().len(), MAX as usize);
    }

    proptest! {
        #[test]
        fn prop_used_count_matches_successes(max_usage in -2i32..6, attempts in 0usize..12) {
            tokio_test::block_on(async {
                let v = voucher("PROP", max_usage);
                let (vouchers, ledger) = ledger_with(&v).await;

                let mut successes = 0;
                for _ in 0..attempts {
                    if ledger.redeem("PROP", request()).await.is_ok() {
                        successes += 1;
                    }
                }

                let stored = vouchers.get(v.id).await.unwrap();
                prop_assert_eq!(stored.used_count, successes);
                if max_usage > 0 {
                    prop_assert!(stored.used_count <= max_usage);
                } else {
                    prop_assert_eq!(successes as usize, attempts);
                }
                Ok(())
            })?;
        }
    }
}
