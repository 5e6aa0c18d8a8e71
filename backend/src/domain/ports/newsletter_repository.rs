//! Port abstraction for newsletter subscription persistence.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::EmailAddress;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by newsletter repository adapters.
    pub enum NewsletterRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "newsletter repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "newsletter repository query failed: {message}",
    }
}

/// Result of an insert-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionInsert {
    Created,
    AlreadySubscribed,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    /// Store `email` unless it is already subscribed.
    async fn subscribe(
        &self,
        email: &EmailAddress,
        subscribed_at: DateTime<Utc>,
    ) -> Result<SubscriptionInsert, NewsletterRepositoryError>;
}

/// In-process subscription list.
#[derive(Debug, Default, Clone)]
pub struct FixtureNewsletterRepository {
    subscribers: Arc<Mutex<BTreeMap<EmailAddress, DateTime<Utc>>>>,
}

impl FixtureNewsletterRepository {
    pub async fn len(&self) -> usize {
        self.subscribers.lock().await.len()
    }
}

#[async_trait]
impl NewsletterRepository for FixtureNewsletterRepository {
    async fn subscribe(
        &self,
        email: &EmailAddress,
        subscribed_at: DateTime<Utc>,
    ) -> Result<SubscriptionInsert, NewsletterRepositoryError> {
        let mut subscribers = self.subscribers.lock().await;
        if subscribers.contains_key(email) {
            return Ok(SubscriptionInsert::AlreadySubscribed);
        }
        subscribers.insert(email.clone(), subscribed_at);
        Ok(SubscriptionInsert::Created)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn second_subscription_is_reported() {
        let repo = FixtureNewsletterRepository::default();
        let email = EmailAddress::new("ada@example.com").expect("email");

        let first = repo.subscribe(&email, Utc::now()).await.expect("first");
        let second = repo.subscribe(&email, Utc::now()).await.expect("second");

        assert_eq!(first, SubscriptionInsert::Created);
        assert_eq!(second, SubscriptionInsert::AlreadySubscribed);
        assert_eq!(repo.len().await, 1);
    }
}
