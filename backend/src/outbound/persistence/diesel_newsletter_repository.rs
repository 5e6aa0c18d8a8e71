//! PostgreSQL-backed newsletter subscription repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel_async::RunQueryDsl;

use crate::domain::EmailAddress;
use crate::domain::ports::{NewsletterRepository, NewsletterRepositoryError, SubscriptionInsert};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewSubscriptionRow;
use super::pool::DbPool;
use super::schema::newsletter_subscriptions;

/// Diesel-backed implementation of [`NewsletterRepository`].
#[derive(Clone)]
pub struct DieselNewsletterRepository {
    pool: DbPool,
}

impl DieselNewsletterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NewsletterRepository for DieselNewsletterRepository {
    async fn subscribe(
        &self,
        email: &EmailAddress,
        subscribed_at: DateTime<Utc>,
    ) -> Result<SubscriptionInsert, NewsletterRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, NewsletterRepositoryError::connection))?;

        let inserted = diesel::insert_into(newsletter_subscriptions::table)
            .values(&NewSubscriptionRow {
                email: email.as_ref(),
                subscribed_at,
            })
            .on_conflict(newsletter_subscriptions::email)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| {
                map_basic_diesel_error(
                    err,
                    NewsletterRepositoryError::query,
                    NewsletterRepositoryError::connection,
                )
            })?;

        Ok(if inserted == 0 {
            SubscriptionInsert::AlreadySubscribed
        } else {
            SubscriptionInsert::Created
        })
    }
}
