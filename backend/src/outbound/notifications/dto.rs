//! Request bodies for the remote email functions.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::domain::ports::ClaimConfirmation;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DealEmailDto<'a> {
    pub(super) user_email: &'a str,
    pub(super) user_name: &'a str,
    pub(super) restaurant_name: &'a str,
    pub(super) deal_title: &'a str,
    pub(super) confirmation_id: &'a str,
    pub(super) expiry_date: String,
    pub(super) deal_description: &'a str,
}

impl<'a> From<&'a ClaimConfirmation> for DealEmailDto<'a> {
    fn from(confirmation: &'a ClaimConfirmation) -> Self {
        Self {
            user_email: confirmation.recipient.as_ref(),
            user_name: confirmation.recipient_name.as_str(),
            restaurant_name: confirmation.restaurant_name.as_str(),
            deal_title: confirmation.deal_title.as_str(),
            confirmation_id: confirmation.confirmation_code.as_str(),
            expiry_date: confirmation
                .expires_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            deal_description: confirmation.deal_description.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NewsletterEmailDto<'a> {
    pub(super) email: &'a str,
}
