//! PostgreSQL-backed claim repository.
//!
//! The guarded insert runs in one transaction that first takes a
//! transaction-scoped advisory lock derived from the counting key, so two
//! attempts for the same key serialise while unrelated keys proceed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::domain::ports::{ClaimRepository, ClaimRepositoryError, GuardedInsert};
use crate::domain::{ClaimCountKey, ClaimedDeal, OfferLimit};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ClaimedDealRow, NewClaimedDealRow};
use super::pool::{DbPool, PoolError};
use super::schema::claimed_deals;

const ADVISORY_LOCK_SQL: &str = "SELECT pg_advisory_xact_lock($1)";

/// Diesel-backed implementation of [`ClaimRepository`].
#[derive(Clone)]
pub struct DieselClaimRepository {
    pool: DbPool,
}

impl DieselClaimRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ClaimRepositoryError {
    map_basic_pool_error(error, ClaimRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ClaimRepositoryError {
    map_basic_diesel_error(
        error,
        ClaimRepositoryError::query,
        ClaimRepositoryError::connection,
    )
}

/// Advisory lock id for a counting key: the first eight bytes of its SHA-256.
pub(crate) fn lock_key(key: &ClaimCountKey) -> i64 {
    let digest = Sha256::digest(key.canonical().as_bytes());
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(bytes)
}

async fn count_matching(
    conn: &mut AsyncPgConnection,
    key: &ClaimCountKey,
) -> Result<i64, diesel::result::Error> {
    let mut query = claimed_deals::table
        .filter(claimed_deals::user_id.eq(*key.user_id.as_uuid()))
        .filter(claimed_deals::restaurant_id.eq(key.restaurant_id.as_ref()))
        .into_boxed();
    if let Some(title) = key.deal_title.as_deref() {
        query = query.filter(claimed_deals::deal_title.eq(title));
    }
    query.count().get_result(conn).await
}

fn to_count(count: i64) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[async_trait]
impl ClaimRepository for DieselClaimRepository {
    async fn count_claims(&self, key: &ClaimCountKey) -> Result<u32, ClaimRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count = count_matching(&mut conn, key)
            .await
            .map_err(map_diesel_error)?;
        Ok(to_count(count))
    }

    async fn record_within_limit(
        &self,
        claim: &ClaimedDeal,
        limit: OfferLimit,
        key: &ClaimCountKey,
    ) -> Result<GuardedInsert, ClaimRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewClaimedDealRow::from(claim);
        let lock_id = lock_key(key);

        conn.transaction(|conn| {
            async move {
                diesel::sql_query(ADVISORY_LOCK_SQL)
                    .bind::<BigInt, _>(lock_id)
                    .execute(conn)
                    .await?;

                let existing = to_count(count_matching(conn, key).await?);
                if !limit.allows(existing) {
                    return Ok(GuardedInsert::LimitReached { existing });
                }

                diesel::insert_into(claimed_deals::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(GuardedInsert::Recorded)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_claims(&self) -> Result<Vec<ClaimedDeal>, ClaimRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ClaimedDealRow> = claimed_deals::table
            .select(ClaimedDealRow::as_select())
            .order(claimed_deals::claimed_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                ClaimedDeal::try_from(row).map_err(|err| {
                    warn!(claim_id = %id, %err, "stored claim failed validation");
                    ClaimRepositoryError::query(format!("stored claim {id} is invalid: {err}"))
                })
            })
            .collect()
    }
}
