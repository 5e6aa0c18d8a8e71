//! Reqwest-backed email functions adapter.
//!
//! This adapter owns transport details only: bearer authentication, request
//! serialisation, and timeout and HTTP error mapping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{DealEmailDto, NewsletterEmailDto};
use crate::domain::EmailAddress;
use crate::domain::ports::{ClaimConfirmation, NotificationError, NotificationSender};
use crate::outbound::http_support::{
    HttpAdapterError, UpstreamFailure, UpstreamFailureKind, classify_status, classify_transport,
    client, endpoint,
};

const DEAL_EMAIL_FUNCTION: &str = "send-deal-email";
const NEWSLETTER_FUNCTION: &str = "send-confirmation";

/// Notification sender that calls the remote email functions over HTTP.
pub struct EmailFunctionsSender {
    client: Client,
    deal_email: Url,
    newsletter: Url,
    api_key: Zeroizing<String>,
}

impl EmailFunctionsSender {
    /// Build a sender for the functions rooted at `functions_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// base URL cannot carry a path.
    pub fn new(
        functions_url: &Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, HttpAdapterError> {
        Ok(Self {
            client: client(timeout)?,
            deal_email: endpoint(functions_url, &[DEAL_EMAIL_FUNCTION])?,
            newsletter: endpoint(functions_url, &[NEWSLETTER_FUNCTION])?,
            api_key: Zeroizing::new(api_key.into()),
        })
    }

    async fn invoke<B: Serialize + Sync>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(self.api_key.as_str())
            .json(body)
            .send()
            .await
            .map_err(|err| map_failure(classify_transport(&err)))?;

        let status = response.status();
        if status.is_success() {
            debug!(%url, status = status.as_u16(), "email function accepted request");
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| map_failure(classify_transport(&err)))?;
        Err(map_failure(classify_status(status, body.as_ref())))
    }
}

#[async_trait]
impl NotificationSender for EmailFunctionsSender {
    async fn send_claim_confirmation(
        &self,
        confirmation: &ClaimConfirmation,
    ) -> Result<(), NotificationError> {
        self.invoke(&self.deal_email, &DealEmailDto::from(confirmation))
            .await
    }

    async fn send_newsletter_confirmation(
        &self,
        email: &EmailAddress,
    ) -> Result<(), NotificationError> {
        self.invoke(
            &self.newsletter,
            &NewsletterEmailDto {
                email: email.as_ref(),
            },
        )
        .await
    }
}

fn map_failure(failure: UpstreamFailure) -> NotificationError {
    match failure.kind {
        UpstreamFailureKind::Timeout => NotificationError::timeout(failure.message),
        UpstreamFailureKind::RateLimited => NotificationError::rate_limited(failure.message),
        UpstreamFailureKind::Rejected => NotificationError::invalid_request(failure.message),
        UpstreamFailureKind::Transport => NotificationError::transport(failure.message),
    }
}
