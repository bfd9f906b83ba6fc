//! Property-based testing utilities using proptest.

use photobooth_core::model::{VoucherType, VoucherUnit};
use photobooth_core::services::CreateVoucher;
use proptest::prelude::*;

/// Well-formed voucher codes.
pub fn voucher_code() -> impl Strategy<Value = String> {
    "[A-Z0-9][A-Za-z0-9_-]{0,31}"
}

/// Creation requests for active discount vouchers with a code from
/// [`voucher_code`] and a usage cap in `max_usage`.
pub fn create_voucher(
    max_usage: impl Strategy<Value = i32>,
) -> impl Strategy<Value = CreateVoucher> {
    (voucher_code(), max_usage, 0.0..=100.0f64).prop_map(|(code, max_usage, value)| {
        CreateVoucher {
            code,
            voucher_type: VoucherType::Discount,
            value,
            unit: VoucherUnit::Percent,
            max_usage,
            valid_from: None,
            valid_to: None,
            active: None,
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::TestEnv;
    use photobooth_core::model::NewRedemption;
    use photobooth_core::validation::validate_voucher_code;
    use photobooth_core::{CoreError, IneligibleReason};

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    proptest! {
        #[test]
        fn prop_generated_codes_are_valid(code in voucher_code()) {
            prop_assert!(validate_voucher_code(&code).is_ok());
        }

        #[test]
        fn prop_used_count_never_exceeds_cap(
            input in create_voucher(1..6i32),
            attempts in 0..10usize,
        ) {
            let (redeemed, rejected, stored, recorded) = block_on(async {
                let env = TestEnv::new();
                let (_, booth) = env.seed_booth().await.unwrap();
                let voucher = env.voucher_service.create(input.clone()).await.unwrap();

                let (mut redeemed, mut rejected) = (0usize, 0usize);
                for _ in 0..attempts {
                    let session = env.seed_session(&booth).await.unwrap();
                    let redemption = NewRedemption {
                        session_id: session.id,
                        tel: None,
                        discount: Some(input.value),
                    };
                    match env.ledger.redeem(&input.code, redemption).await {
                        Ok(_) => redeemed += 1,
                        Err(CoreError::VoucherIneligible(IneligibleReason::UsageLimitReached)) => {
                            rejected += 1;
                        }
                        Err(other) => panic!("unexpected redemption error: {other}"),
                    }
                }

                let stored = env.voucher_service.get(voucher.id).await.unwrap().used_count;
                let recorded = env.voucher_service.list_redemptions(voucher.id).await.unwrap().len();
                (redeemed, rejected, stored, recorded)
            });

            let cap = usize::try_from(input.max_usage).unwrap();
            prop_assert_eq!(redeemed, attempts.min(cap));
            prop_assert_eq!(redeemed + rejected, attempts);
            prop_assert_eq!(usize::try_from(stored).unwrap(), redeemed);
            prop_assert_eq!(recorded, redeemed);
        }

        #[test]
        fn prop_codes_are_unique(input in create_voucher(-1..3i32)) {
            let (first, second) = block_on(async {
                let env = TestEnv::new();
                let first = env.voucher_service.create(input.clone()).await;
                let second = env.voucher_service.create(input).await;
                (first, second)
            });
            prop_assert!(first.is_ok());
            prop_assert!(matches!(second, Err(CoreError::Conflict(_))));
        }
    }
}
