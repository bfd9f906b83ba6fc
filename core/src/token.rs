//! Booth Token Authority.
//!
//! Issues, rotates and validates HMAC-signed booth access tokens. A token
//! asserts "booth X of branch Y holding version V". Validation always
//! re-reads the booth, so bumping the booth's `token_version` revokes every
//! token issued before the bump.
//!
//! # Example
//!
//! ```
//! use photobooth_core::mocks::InMemoryBoothRepository;
//! use photobooth_core::model::{Booth, BoothId, BoothStatus, BoothType, BranchId, JsonObject};
//! use photobooth_core::providers::BoothRepository;
//! use photobooth_core::{BoothTokenAuthority, SystemClock, TokenConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> photobooth_core::Result<()> {
//! let booths = Arc::new(InMemoryBoothRepository::new());
//! let booth = Booth {
//!     id: BoothId::new(),
//!     branch_id: BranchId::new(),
//!     name: "Lobby".into(),
//!     booth_type: BoothType::Physical,
//!     status: BoothStatus::Active,
//!     config: JsonObject::new(),
//!     token_version: 0,
//!     created_at: chrono::Utc::now(),
//! };
//! booths.create(&booth).await?;
//!
//! let authority = BoothTokenAuthority::new(booths, Arc::new(SystemClock), TokenConfig::new("secret"));
//! let token = authority.register(booth.id, Some(booth.branch_id)).await?;
//! let identity = authority.validate(&token).await?;
//! assert_eq!(identity.booth_id, booth.id);
//! assert_eq!(identity.token_version, 1);
//! # Ok(())
//! # }
//! ```

use crate::config::TokenConfig;
use crate::constants::{metric_names, BOOTH_ACCESS_TOKEN_TYPE};
use crate::environment::Clock;
use crate::error::{CoreError, Result};
use crate::model::{Booth, BoothId, BranchId};
use crate::providers::BoothRepository;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Signing algorithm for issued tokens.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted on validation. HMAC family only; anything else
/// (including `none` and asymmetric algorithms) is rejected.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Clock skew tolerated when checking `exp`, in seconds.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// Claim set of a booth access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoothClaims {
    /// Booth the token was issued to.
    #[serde(default)]
    pub booth_id: String,

    /// Branch the booth belonged to at issuance.
    #[serde(default)]
    pub branch_id: String,

    /// Booth token version at issuance.
    #[serde(default)]
    pub token_version: i32,

    /// Always [`BOOTH_ACCESS_TOKEN_TYPE`].
    #[serde(rename = "type", default)]
    pub token_type: String,

    /// Issued at (Unix seconds).
    #[serde(default)]
    pub iat: i64,

    /// Expiry (Unix seconds), present only when a TTL is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl BoothClaims {
    /// Check the claim shape and parse the identity it asserts.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidToken`] if the type is wrong, an id is
    /// empty or not a UUID, or the version is not positive.
    pub fn identity(&self) -> Result<ValidatedToken> {
        if self.token_type != BOOTH_ACCESS_TOKEN_TYPE
            || self.booth_id.is_empty()
            || self.branch_id.is_empty()
            || self.token_version <= 0
        {
            return Err(CoreError::InvalidToken);
        }

        let booth_id = BoothId::parse(&self.booth_id).map_err(|_| CoreError::InvalidToken)?;
        let branch_id = BranchId::parse(&self.branch_id).map_err(|_| CoreError::InvalidToken)?;

        Ok(ValidatedToken {
            booth_id,
            branch_id,
            token_version: self.token_version,
        })
    }
}

/// Identity established by a successfully validated token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidatedToken {
    /// Authenticated booth.
    pub booth_id: BoothId,

    /// Branch of the authenticated booth.
    pub branch_id: BranchId,

    /// Version the token was issued for (equal to the booth's current one).
    pub token_version: i32,
}

/// Mints and validates booth access tokens.
pub struct BoothTokenAuthority {
    booths: Arc<dyn BoothRepository>,
    clock: Arc<dyn Clock>,
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl BoothTokenAuthority {
    /// Create an authority backed by `booths`.
    ///
    /// `clock` stamps `iat`/`exp` on issued tokens and decides whether a
    /// presented token has expired.
    #[must_use]
    pub fn new(booths: Arc<dyn BoothRepository>, clock: Arc<dyn Clock>, config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret());
        let decoding_key = DecodingKey::from_secret(config.secret());

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // `exp` is optional and checked in `decode` against the clock.
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;

        Self {
            booths,
            clock,
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issue a token for a booth, initializing its version on first use.
    ///
    /// # Arguments
    ///
    /// * `booth_id` - Booth requesting a token
    /// * `branch_id` - Branch the caller claims the booth belongs to; checked
    ///   when supplied
    ///
    /// # Errors
    ///
    /// - `NotFound` if the booth does not exist
    /// - `TokenMismatch` if `branch_id` differs from the booth's branch
    /// - `Internal` if signing fails
    #[tracing::instrument(skip(self))]
    pub async fn register(&self, booth_id: BoothId, branch_id: Option<BranchId>) -> Result<String> {
        let booth = self.booths.get(booth_id).await?;

        if let Some(branch_id) = branch_id {
            if booth.branch_id != branch_id {
                tracing::warn!(
                    expected = %booth.branch_id,
                    supplied = %branch_id,
                    "Booth registration with wrong branch"
                );
                return Err(CoreError::TokenMismatch);
            }
        }

        let booth = if booth.token_version == 0 {
            self.booths.initialize_token_version(booth_id).await?
        } else {
            booth
        };

        let token = self.sign(&booth)?;
        metrics::counter!(metric_names::BOOTH_TOKENS_ISSUED, "operation" => "register").increment(1);
        tracing::info!(token_version = booth.token_version, "Booth token issued");
        Ok(token)
    }

    /// Bump the booth's version and issue a token for the new version.
    ///
    /// Every token issued before this call stops validating once the bump
    /// is committed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the booth does not exist
    /// - `Internal` if signing fails
    #[tracing::instrument(skip(self))]
    pub async fn regenerate(&self, booth_id: BoothId) -> Result<String> {
        let booth = self.booths.bump_token_version(booth_id).await?;

        let token = self.sign(&booth)?;
        metrics::counter!(metric_names::BOOTH_TOKENS_ISSUED, "operation" => "regenerate").increment(1);
        tracing::info!(token_version = booth.token_version, "Booth token regenerated");
        Ok(token)
    }

    /// Validate a token against its signature and the booth's live state.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` for bad signature, encoding, algorithm, expiry or
    ///   claim shape
    /// - `NotFound` if the booth no longer exists
    /// - `TokenMismatch` if the booth's branch or version changed
    pub async fn validate(&self, token: &str) -> Result<ValidatedToken> {
        let identity = match self.decode(token).and_then(|claims| claims.identity()) {
            Ok(identity) => identity,
            Err(e) => {
                record_validation("invalid");
                return Err(e);
            }
        };

        let booth = self.booths.get(identity.booth_id).await?;

        if booth.branch_id != identity.branch_id || booth.token_version != identity.token_version {
            tracing::debug!(
                booth_id = %identity.booth_id,
                token_version = identity.token_version,
                current_version = booth.token_version,
                "Booth token does not match booth state"
            );
            record_validation("mismatch");
            return Err(CoreError::TokenMismatch);
        }

        record_validation("ok");
        Ok(identity)
    }

    /// Verify the signature and decode the claims without consulting the
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidToken`] for any signature or format
    /// problem.
    pub fn decode(&self, token: &str) -> Result<BoothClaims> {
        let claims = jsonwebtoken::decode::<BoothClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Booth token rejected");
                CoreError::InvalidToken
            })?;

        let now = self.clock.now().timestamp();
        if claims.exp.is_some_and(|exp| exp < now - EXPIRY_LEEWAY_SECS) {
            tracing::debug!(exp = claims.exp, now, "Booth token expired");
            return Err(CoreError::InvalidToken);
        }
        Ok(claims)
    }

    fn sign(&self, booth: &Booth) -> Result<String> {
        let now = self.clock.now();
        let claims = BoothClaims {
            booth_id: booth.id.to_string(),
            branch_id: booth.branch_id.to_string(),
            token_version: booth.token_version,
            token_type: BOOTH_ACCESS_TOKEN_TYPE.to_string(),
            iat: now.timestamp(),
            exp: self.config.ttl.map(|ttl| (now + ttl).timestamp()),
        };

        jsonwebtoken::encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| CoreError::Internal(format!("failed to sign booth token: {e}")))
    }
}

impl fmt::Debug for BoothTokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoothTokenAuthority")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn record_validation(outcome: &'static str) {
    metrics::counter!(metric_names::BOOTH_TOKEN_VALIDATIONS, "outcome" => outcome).increment(1);
}
