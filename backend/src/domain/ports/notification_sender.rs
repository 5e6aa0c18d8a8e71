//! Port abstraction for outbound email notifications.
//!
//! Rendering and delivery belong to the remote email functions; adapters only
//! hand over the facts an email needs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AuthenticatedUser, ClaimedDeal, EmailAddress};

use super::define_port_error;

define_port_error! {
    /// Errors raised while requesting a notification.
    pub enum NotificationError {
        /// Network failure or unexpected upstream status.
        Transport { message: String } => "notification transport failed: {message}",
        /// The upstream did not answer in time.
        Timeout { message: String } => "notification request timed out: {message}",
        /// The upstream throttled the request.
        RateLimited { message: String } => "notification request was rate limited: {message}",
        /// The upstream rejected the payload.
        InvalidRequest { message: String } => "notification request was rejected: {message}",
    }
}

/// Facts needed to render a claim confirmation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimConfirmation {
    pub recipient: EmailAddress,
    /// Display name, or the generic salutation when none is known.
    pub recipient_name: String,
    pub restaurant_name: String,
    pub deal_title: String,
    pub deal_description: String,
    pub confirmation_code: String,
    pub expires_at: DateTime<Utc>,
}

impl ClaimConfirmation {
    pub fn new(claim: &ClaimedDeal, user: &AuthenticatedUser) -> Self {
        Self {
            recipient: claim.user_email.clone(),
            recipient_name: user.salutation().to_owned(),
            restaurant_name: claim.restaurant_name.clone(),
            deal_title: claim.deal_title.clone(),
            deal_description: claim.deal_description.clone(),
            confirmation_code: claim.confirmation_code.to_string(),
            expires_at: claim.expires_at,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Ask for a claim confirmation email.
    async fn send_claim_confirmation(
        &self,
        confirmation: &ClaimConfirmation,
    ) -> Result<(), NotificationError>;

    /// Ask for a newsletter subscription confirmation email.
    async fn send_newsletter_confirmation(
        &self,
        email: &EmailAddress,
    ) -> Result<(), NotificationError>;
}

/// Sender that only logs what it would have sent.
///
/// Used when no email functions endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationSender;

#[async_trait]
impl NotificationSender for FixtureNotificationSender {
    async fn send_claim_confirmation(
        &self,
        confirmation: &ClaimConfirmation,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            recipient = %confirmation.recipient,
            restaurant = %confirmation.restaurant_name,
            confirmation_code = %confirmation.confirmation_code,
            "claim confirmation email skipped: no email functions configured"
        );
        Ok(())
    }

    async fn send_newsletter_confirmation(
        &self,
        email: &EmailAddress,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            recipient = %email,
            "newsletter confirmation email skipped: no email functions configured"
        );
        Ok(())
    }
}
