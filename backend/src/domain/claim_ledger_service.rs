//! Admin claim ledger service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{ClaimLedgerQuery, ClaimRepository, ClaimRepositoryError};
use crate::domain::{AdminPolicy, AuthenticatedUser, ClaimLedgerFilter, ClaimedDeal, Error};

/// Lists claimed deals for configured admin identities.
#[derive(Clone)]
pub struct ClaimLedgerService<R: ?Sized> {
    claims: Arc<R>,
    admins: Arc<AdminPolicy>,
}

impl<R: ?Sized> ClaimLedgerService<R> {
    pub fn new(claims: Arc<R>, admins: Arc<AdminPolicy>) -> Self {
        Self { claims, admins }
    }
}

fn map_ledger_error(error: ClaimRepositoryError) -> Error {
    match error {
        ClaimRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("claim repository unavailable: {message}"))
        }
        ClaimRepositoryError::Query { message } => {
            Error::internal(format!("claim repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R: ?Sized> ClaimLedgerQuery for ClaimLedgerService<R>
where
    R: ClaimRepository,
{
    async fn list(
        &self,
        requester: &AuthenticatedUser,
        filter: &ClaimLedgerFilter,
    ) -> Result<Vec<ClaimedDeal>, Error> {
        if !self.admins.is_admin(requester) {
            warn!(user_id = %requester.id(), "non-admin attempted to read the claim ledger");
            return Err(Error::forbidden("admin access required"));
        }
        let claims = self.claims.list_claims().await.map_err(map_ledger_error)?;
        Ok(claims
            .into_iter()
            .filter(|claim| filter.matches(claim))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockClaimRepository;
    use crate::domain::{ConfirmationCode, EmailAddress, ErrorCode, RestaurantId, UserId};
    use chrono::Utc;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    fn person(email: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::random(),
            EmailAddress::new(email).expect("email"),
            None,
        )
    }

    fn claim(email: &str, restaurant: &str) -> ClaimedDeal {
        let now = Utc::now();
        ClaimedDeal {
            id: Uuid::new_v4(),
            user_id: UserId::random(),
            user_email: EmailAddress::new(email).expect("email"),
            restaurant_id: RestaurantId::from_name(restaurant),
            restaurant_name: restaurant.to_owned(),
            deal_title: "Free dessert".to_owned(),
            deal_description: "Free dessert with any main".to_owned(),
            confirmation_code: ConfirmationCode::from_parts(restaurant, "ZZZZ9999").expect("code"),
            expires_at: now,
            claimed_at: now,
        }
    }

    #[fixture]
    fn admins() -> Arc<AdminPolicy> {
        Arc::new(AdminPolicy::new([
            EmailAddress::new(AdminPolicy::DEFAULT_ADMIN).expect("email"),
        ]))
    }

    #[rstest]
    #[tokio::test]
    async fn non_admins_are_forbidden(admins: Arc<AdminPolicy>) {
        let mut repo = MockClaimRepository::new();
        repo.expect_list_claims().never();
        let service = ClaimLedgerService::new(Arc::new(repo), admins);

        let error = service
            .list(&person("ada@example.com"), &ClaimLedgerFilter::default())
            .await
            .expect_err("forbidden");

        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn admins_see_filtered_claims(admins: Arc<AdminPolicy>) {
        let mut repo = MockClaimRepository::new();
        repo.expect_list_claims().times(1).return_once(|| {
            Ok(vec![
                claim("ada@example.com", "Source"),
                claim("bob@example.com", "Tasty Burger"),
            ])
        });
        let service = ClaimLedgerService::new(Arc::new(repo), admins);

        let claims = service
            .list(
                &person(AdminPolicy::DEFAULT_ADMIN),
                &ClaimLedgerFilter::new(Some("tasty")),
            )
            .await
            .expect("ledger");

        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].user_email.as_ref(), "bob@example.com");
    }

    #[rstest]
    #[tokio::test]
    async fn store_outage_maps_to_service_unavailable(admins: Arc<AdminPolicy>) {
        let mut repo = MockClaimRepository::new();
        repo.expect_list_claims()
            .times(1)
            .return_once(|| Err(ClaimRepositoryError::connection("refused")));
        let service = ClaimLedgerService::new(Arc::new(repo), admins);

        let error = service
            .list(&person(AdminPolicy::DEFAULT_ADMIN), &ClaimLedgerFilter::default())
            .await
            .expect_err("outage");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
