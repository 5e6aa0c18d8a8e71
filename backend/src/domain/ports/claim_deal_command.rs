//! Driving port for claiming a deal.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    ClaimOutcome, ClaimRequest, ClaimedDeal, ConfirmationCode, Error, ExpiryPolicy,
    NotificationStatus,
};

/// Claim workflow entry point.
///
/// Limit rejection is reported as [`ClaimOutcome::Rejected`]; `Err` is
/// reserved for failures where no claim was stored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimDealCommand: Send + Sync {
    async fn claim(&self, request: ClaimRequest) -> Result<ClaimOutcome, Error>;
}

/// Accepts every claim without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureClaimDealCommand;

#[async_trait]
impl ClaimDealCommand for FixtureClaimDealCommand {
    async fn claim(&self, request: ClaimRequest) -> Result<ClaimOutcome, Error> {
        let code = ConfirmationCode::from_parts(request.restaurant_name(), "00000000")
            .map_err(|err| Error::internal(err.to_string()))?;
        let now = Utc::now();
        let expires_at = ExpiryPolicy::default().expires_at(now, request.redeem_on());
        Ok(ClaimOutcome::Recorded {
            claim: ClaimedDeal::from_request(&request, code, now, expires_at),
            notification: NotificationStatus::Delivered,
        })
    }
}
