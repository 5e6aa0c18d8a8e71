//! Newsletter subscription service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    NewsletterCommand, NewsletterRepository, NewsletterRepositoryError, NotificationSender,
    SubscriptionInsert, SubscriptionOutcome,
};
use crate::domain::{EmailAddress, Error};

/// Subscribes addresses once and requests a confirmation email.
#[derive(Clone)]
pub struct NewsletterService<R: ?Sized, N: ?Sized> {
    subscriptions: Arc<R>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized, N: ?Sized> NewsletterService<R, N> {
    pub fn new(subscriptions: Arc<R>, notifier: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            subscriptions,
            notifier,
            clock,
        }
    }
}

fn map_subscription_error(error: NewsletterRepositoryError) -> Error {
    match error {
        NewsletterRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("newsletter repository unavailable: {message}"))
        }
        NewsletterRepositoryError::Query { message } => {
            Error::internal(format!("newsletter repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R: ?Sized, N: ?Sized> NewsletterCommand for NewsletterService<R, N>
where
    R: NewsletterRepository,
    N: NotificationSender,
{
    async fn subscribe(&self, email: EmailAddress) -> Result<SubscriptionOutcome, Error> {
        let inserted = self
            .subscriptions
            .subscribe(&email, self.clock.utc())
            .await
            .map_err(map_subscription_error)?;
        if inserted == SubscriptionInsert::AlreadySubscribed {
            info!(recipient = %email, "newsletter subscription already exists");
            return Ok(SubscriptionOutcome::AlreadySubscribed);
        }

        let confirmation_sent = match self.notifier.send_newsletter_confirmation(&email).await {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    %error,
                    error_kind = error.kind(),
                    recipient = %email,
                    "newsletter confirmation email failed"
                );
                false
            }
        };
        Ok(SubscriptionOutcome::Subscribed { confirmation_sent })
    }
}
