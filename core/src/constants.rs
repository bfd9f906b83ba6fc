//! Core constants.

/// Value of the `type` claim carried by every booth access token.
pub const BOOTH_ACCESS_TOKEN_TYPE: &str = "booth_access";

/// Metric names recorded by the core.
pub mod metric_names {
    /// Tokens signed, labelled by `operation` (`register` | `regenerate`).
    pub const BOOTH_TOKENS_ISSUED: &str = "photobooth_booth_tokens_issued_total";

    /// Token validations, labelled by `outcome` (`ok` | `invalid` | `mismatch`).
    pub const BOOTH_TOKEN_VALIDATIONS: &str = "photobooth_booth_token_validations_total";

    /// Redemption attempts, labelled by `outcome` (`redeemed` or the
    /// ineligibility reason).
    pub const VOUCHER_REDEMPTIONS: &str = "photobooth_voucher_redemptions_total";
}

/// Register descriptions for every core metric with the installed recorder.
pub fn describe_metrics() {
    metrics::describe_counter!(
        metric_names::BOOTH_TOKENS_ISSUED,
        "Total number of booth access tokens issued"
    );
    metrics::describe_counter!(
        metric_names::BOOTH_TOKEN_VALIDATIONS,
        "Total number of booth access token validations"
    );
    metrics::describe_counter!(
        metric_names::VOUCHER_REDEMPTIONS,
        "Total number of voucher redemption attempts"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_share_prefix() {
        for name in [
            metric_names::BOOTH_TOKENS_ISSUED,
            metric_names::BOOTH_TOKEN_VALIDATIONS,
            metric_names::VOUCHER_REDEMPTIONS,
        ] {
            assert!(name.starts_with("photobooth_"));
            assert!(name.ends_with("_total"));
        }
    }
}
