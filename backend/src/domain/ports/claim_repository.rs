//! Port abstraction for claimed-deal persistence.
//!
//! Adapters count existing claims, record new ones behind a limit guard, and
//! list the ledger. The guard re-checks the count and inserts as one atomic
//! step so concurrent attempts cannot both pass a limit.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClaimCountKey, ClaimedDeal, OfferLimit};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by claim repository adapters.
    pub enum ClaimRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "claim repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "claim repository query failed: {message}",
    }
}

/// Result of a guarded insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedInsert {
    /// The claim was stored.
    Recorded,
    /// `existing` claims already exhaust the limit; nothing was stored.
    LimitReached { existing: u32 },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimRepository: Send + Sync {
    /// Count stored claims matching `key`.
    async fn count_claims(&self, key: &ClaimCountKey) -> Result<u32, ClaimRepositoryError>;

    /// Store `claim` unless the claims matching `key` already reach `limit`.
    ///
    /// Count and insert happen atomically with respect to other calls using
    /// the same key.
    async fn record_within_limit(
        &self,
        claim: &ClaimedDeal,
        limit: OfferLimit,
        key: &ClaimCountKey,
    ) -> Result<GuardedInsert, ClaimRepositoryError>;

    /// Every stored claim, newest first.
    async fn list_claims(&self) -> Result<Vec<ClaimedDeal>, ClaimRepositoryError>;
}

/// In-process claim store used in development and tests.
///
/// A single async mutex spans count and insert, which makes
/// [`ClaimRepository::record_within_limit`] atomic.
#[derive(Debug, Default, Clone)]
pub struct FixtureClaimRepository {
    claims: Arc<Mutex<Vec<ClaimedDeal>>>,
}

impl FixtureClaimRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored claims in insertion order.
    pub async fn snapshot(&self) -> Vec<ClaimedDeal> {
        self.claims.lock().await.clone()
    }
}

fn count_matching(claims: &[ClaimedDeal], key: &ClaimCountKey) -> u32 {
    let count = claims.iter().filter(|claim| key.matches(claim)).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[async_trait]
impl ClaimRepository for FixtureClaimRepository {
    async fn count_claims(&self, key: &ClaimCountKey) -> Result<u32, ClaimRepositoryError> {
        Ok(count_matching(&self.claims.lock().await, key))
    }

    async fn record_within_limit(
        &self,
        claim: &ClaimedDeal,
        limit: OfferLimit,
        key: &ClaimCountKey,
    ) -> Result<GuardedInsert, ClaimRepositoryError> {
        let mut claims = self.claims.lock().await;
        let existing = count_matching(&claims, key);
        if !limit.allows(existing) {
            return Ok(GuardedInsert::LimitReached { existing });
        }
        claims.push(claim.clone());
        Ok(GuardedInsert::Recorded)
    }

    async fn list_claims(&self) -> Result<Vec<ClaimedDeal>, ClaimRepositoryError> {
        let mut claims = self.claims.lock().await.clone();
        claims.sort_by(|a, b| b.claimed_at.cmp(&a.claimed_at));
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ClaimedDeal, ConfirmationCode, EmailAddress, RestaurantId, UserId};
    use chrono::{Duration, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    fn claim(user_id: &UserId, deal_title: &str, minutes_ago: i64) -> ClaimedDeal {
        let claimed_at = Utc::now() - Duration::minutes(minutes_ago);
        ClaimedDeal {
            id: Uuid::new_v4(),
            user_id: user_id.clone(),
            user_email: EmailAddress::new("ada@example.com").expect("email"),
            restaurant_id: RestaurantId::from_name("Source"),
            restaurant_name: "Source".to_owned(),
            deal_title: deal_title.to_owned(),
            deal_description: "Free with any pizza".to_owned(),
            confirmation_code: ConfirmationCode::from_parts("Source", "AAAA0000").expect("code"),
            expires_at: claimed_at + Duration::days(7),
            claimed_at,
        }
    }

    fn key(user_id: &UserId, deal_title: Option<&str>) -> ClaimCountKey {
        ClaimCountKey {
            user_id: user_id.clone(),
            restaurant_id: RestaurantId::from_name("Source"),
            deal_title: deal_title.map(str::to_owned),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn guarded_insert_stops_at_the_limit() {
        let repo = FixtureClaimRepository::new();
        let user = UserId::random();
        let limit = OfferLimit::new(2);

        for _ in 0..2 {
            let outcome = repo
                .record_within_limit(&claim(&user, "Free dessert", 0), limit, &key(&user, None))
                .await
                .expect("insert");
            assert_eq!(outcome, GuardedInsert::Recorded);
        }
        let third = repo
            .record_within_limit(&claim(&user, "Free dessert", 0), limit, &key(&user, None))
            .await
            .expect("insert");

        assert_eq!(third, GuardedInsert::LimitReached { existing: 2 });
        assert_eq!(repo.snapshot().await.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn counts_respect_the_key() {
        let repo = FixtureClaimRepository::new();
        let user = UserId::random();
        let other = UserId::random();
        let rows = [
            (&user, "Free dessert"),
            (&user, "Free draft beer"),
            (&other, "Free dessert"),
        ];
        for (owner, title) in rows {
            repo.record_within_limit(
                &claim(owner, title, 0),
                OfferLimit::UNLIMITED,
                &key(owner, None),
            )
            .await
                .expect("insert");
        }

        assert_eq!(repo.count_claims(&key(&user, None)).await, Ok(2));
        assert_eq!(repo.count_claims(&key(&user, Some("Free dessert"))).await, Ok(1));
        assert_eq!(repo.count_claims(&key(&other, None)).await, Ok(1));
    }

    #[rstest]
    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = FixtureClaimRepository::new();
        let user = UserId::random();
        for (title, age) in [("old", 30), ("new", 1), ("middle", 10)] {
            repo.record_within_limit(
                &claim(&user, title, age),
                OfferLimit::UNLIMITED,
                &key(&user, None),
            )
            .await
            .expect("insert");
        }

        let titles: Vec<_> = repo
            .list_claims()
            .await
            .expect("list")
            .into_iter()
            .map(|claim| claim.deal_title)
            .collect();
        assert_eq!(titles, ["new", "middle", "old"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_respect_a_limit_of_one() {
        let repo = FixtureClaimRepository::new();
        let user = UserId::random();

        let attempts = (0..8).map(|_| {
            let repo = repo.clone();
            let user = user.clone();
            tokio::spawn(async move {
                repo.record_within_limit(
                    &claim(&user, "Free dessert", 0),
                    OfferLimit::new(1),
                    &key(&user, None),
                )
                .await
            })
        });
        let outcomes = futures::future::join_all(attempts).await;

        let recorded = outcomes
            .into_iter()
            .map(|joined| joined.expect("task").expect("insert"))
            .filter(|outcome| *outcome == GuardedInsert::Recorded)
            .count();
        assert_eq!(recorded, 1);
        assert_eq!(repo.snapshot().await.len(), 1);
    }
}
