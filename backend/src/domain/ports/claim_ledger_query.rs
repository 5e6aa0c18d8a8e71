//! Driving port for the admin claim ledger.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, ClaimLedgerFilter, ClaimedDeal, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimLedgerQuery: Send + Sync {
    /// Claims matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `forbidden` when `requester` is not an admin.
    async fn list(
        &self,
        requester: &AuthenticatedUser,
        filter: &ClaimLedgerFilter,
    ) -> Result<Vec<ClaimedDeal>, Error>;
}

/// Empty ledger used when handlers are wired without persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureClaimLedgerQuery;

#[async_trait]
impl ClaimLedgerQuery for FixtureClaimLedgerQuery {
    async fn list(
        &self,
        _requester: &AuthenticatedUser,
        _filter: &ClaimLedgerFilter,
    ) -> Result<Vec<ClaimedDeal>, Error> {
        Ok(Vec::new())
    }
}
