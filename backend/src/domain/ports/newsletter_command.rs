//! Driving port for newsletter subscriptions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{EmailAddress, Error};

/// Result of a subscription request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubscriptionOutcome {
    /// New subscriber; `confirmation_sent` reports the email request.
    Subscribed { confirmation_sent: bool },
    AlreadySubscribed,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsletterCommand: Send + Sync {
    async fn subscribe(&self, email: EmailAddress) -> Result<SubscriptionOutcome, Error>;
}

/// Treats every address as a new subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNewsletterCommand;

#[async_trait]
impl NewsletterCommand for FixtureNewsletterCommand {
    async fn subscribe(&self, _email: EmailAddress) -> Result<SubscriptionOutcome, Error> {
        Ok(SubscriptionOutcome::Subscribed {
            confirmation_sent: true,
        })
    }
}
