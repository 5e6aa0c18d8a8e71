//! Deal-claim workflow service.
//!
//! Implements [`ClaimDealCommand`]: eligibility check, guarded recording, and
//! best-effort confirmation email. Only the first two can fail the claim.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    ClaimConfirmation, ClaimDealCommand, ClaimRepository, ClaimRepositoryError,
    ConfirmationCodeGenerator, GuardedInsert, NotificationSender,
};
use crate::domain::{
    ClaimOutcome, ClaimPhase, ClaimRequest, ClaimedDeal, Error, ExpiryPolicy, LimitScope,
    NotificationStatus,
};

/// Message returned to callers when a claim could not be stored.
pub const CLAIM_FAILED_MESSAGE: &str = "Failed to claim deal. Please try again.";

/// Claim workflow over a claim store and a notification sender.
#[derive(Clone)]
pub struct ClaimDealService<R: ?Sized, N: ?Sized> {
    claims: Arc<R>,
    notifier: Arc<N>,
    codes: Arc<dyn ConfirmationCodeGenerator>,
    clock: Arc<dyn Clock>,
    scope: LimitScope,
    expiry: ExpiryPolicy,
}

impl<R: ?Sized, N: ?Sized> ClaimDealService<R, N> {
    /// Create a service counting per restaurant with the default expiry.
    pub fn new(
        claims: Arc<R>,
        notifier: Arc<N>,
        codes: Arc<dyn ConfirmationCodeGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            claims,
            notifier,
            codes,
            clock,
            scope: LimitScope::default(),
            expiry: ExpiryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: LimitScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn with_expiry_policy(mut self, expiry: ExpiryPolicy) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn scope(&self) -> LimitScope {
        self.scope
    }
}

fn map_claim_error(error: ClaimRepositoryError) -> Error {
    match error {
        ClaimRepositoryError::Connection { message } => {
            warn!(%message, "claim store unavailable");
            Error::service_unavailable(CLAIM_FAILED_MESSAGE)
        }
        ClaimRepositoryError::Query { message } => {
            warn!(%message, "claim store query failed");
            Error::internal(CLAIM_FAILED_MESSAGE)
        }
    }
}

fn enter(phase: ClaimPhase, request: &ClaimRequest) {
    info!(
        claim.phase = phase.as_str(),
        user_id = %request.user().id(),
        restaurant_id = %request.restaurant_id(),
        deal_index = request.deal_index(),
        "claim workflow transition"
    );
}

#[async_trait]
impl<R: ?Sized, N: ?Sized> ClaimDealCommand for ClaimDealService<R, N>
where
    R: ClaimRepository,
    N: NotificationSender,
{
    async fn claim(&self, request: ClaimRequest) -> Result<ClaimOutcome, Error> {
        let key = self.scope.key_for(&request);
        let limit = request.limit();

        enter(ClaimPhase::CheckingEligibility, &request);
        let existing = self
            .claims
            .count_claims(&key)
            .await
            .map_err(map_claim_error)?;
        if !limit.allows(existing) {
            enter(ClaimPhase::Rejected, &request);
            return Ok(ClaimOutcome::Rejected { limit, existing });
        }
        enter(ClaimPhase::Eligible, &request);

        let claimed_at = self.clock.utc();
        let code = self
            .codes
            .generate(request.restaurant_name())
            .map_err(|err| Error::internal(format!("confirmation code generation failed: {err}")))?;
        let expires_at = self.expiry.expires_at(claimed_at, request.redeem_on());
        let claim = ClaimedDeal::from_request(&request, code, claimed_at, expires_at);

        enter(ClaimPhase::Recording, &request);
        match self.claims.record_within_limit(&claim, limit, &key).await {
            Ok(GuardedInsert::Recorded) => enter(ClaimPhase::Recorded, &request),
            Ok(GuardedInsert::LimitReached { existing }) => {
                enter(ClaimPhase::Rejected, &request);
                return Ok(ClaimOutcome::Rejected { limit, existing });
            }
            Err(error) => {
                enter(ClaimPhase::RecordFailed, &request);
                return Err(map_claim_error(error));
            }
        }

        enter(ClaimPhase::NotifyingEmail, &request);
        let confirmation = ClaimConfirmation::new(&claim, request.user());
        let notification = match self.notifier.send_claim_confirmation(&confirmation).await {
            Ok(()) => {
                enter(ClaimPhase::NotifySucceeded, &request);
                NotificationStatus::Delivered
            }
            Err(error) => {
                warn!(
                    %error,
                    error_kind = error.kind(),
                    confirmation_code = %claim.confirmation_code,
                    "claim confirmation email failed"
                );
                enter(ClaimPhase::NotifyFailed, &request);
                NotificationStatus::Failed
            }
        };

        Ok(ClaimOutcome::Recorded {
            claim,
            notification,
        })
    }
}

#[cfg(test)]
#[path = "claim_service_tests.rs"]
mod tests;
