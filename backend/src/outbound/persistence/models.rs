//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! to and from domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    ClaimValidationError, ClaimedDeal, ConfirmationCode, EmailAddress, RestaurantId, UserId,
};

use super::schema::{claimed_deals, newsletter_subscriptions};

/// Row struct for reading from the claimed_deals table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = claimed_deals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClaimedDealRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub deal_title: String,
    pub deal_description: String,
    pub confirmation_code: String,
    pub expires_at: DateTime<Utc>,
    pub claimed_at: DateTime<Utc>,
}

/// Insertable struct for recording a claim.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = claimed_deals)]
pub(crate) struct NewClaimedDealRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: &'a str,
    pub restaurant_id: &'a str,
    pub restaurant_name: &'a str,
    pub deal_title: &'a str,
    pub deal_description: &'a str,
    pub confirmation_code: &'a str,
    pub expires_at: DateTime<Utc>,
    pub claimed_at: DateTime<Utc>,
}

impl<'a> From<&'a ClaimedDeal> for NewClaimedDealRow<'a> {
    fn from(claim: &'a ClaimedDeal) -> Self {
        Self {
            id: claim.id,
            user_id: *claim.user_id.as_uuid(),
            user_email: claim.user_email.as_ref(),
            restaurant_id: claim.restaurant_id.as_ref(),
            restaurant_name: claim.restaurant_name.as_str(),
            deal_title: claim.deal_title.as_str(),
            deal_description: claim.deal_description.as_str(),
            confirmation_code: claim.confirmation_code.as_ref(),
            expires_at: claim.expires_at,
            claimed_at: claim.claimed_at,
        }
    }
}

/// Stored rows that no longer satisfy domain validation.
#[derive(Debug, thiserror::Error)]
pub(crate) enum RowConversionError {
    #[error("invalid stored email: {0}")]
    Email(#[from] crate::domain::UserValidationError),
    #[error("invalid stored restaurant id: {0}")]
    Restaurant(#[from] crate::domain::CatalogueValidationError),
    #[error("invalid stored confirmation code: {0}")]
    Code(#[from] ClaimValidationError),
}

impl TryFrom<ClaimedDealRow> for ClaimedDeal {
    type Error = RowConversionError;

    fn try_from(row: ClaimedDealRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            user_email: EmailAddress::new(row.user_email)?,
            restaurant_id: RestaurantId::parse(row.restaurant_id)?,
            restaurant_name: row.restaurant_name,
            deal_title: row.deal_title,
            deal_description: row.deal_description,
            confirmation_code: ConfirmationCode::parse(row.confirmation_code)?,
            expires_at: row.expires_at,
            claimed_at: row.claimed_at,
        })
    }
}

/// Insertable struct for newsletter subscriptions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = newsletter_subscriptions)]
pub(crate) struct NewSubscriptionRow<'a> {
    pub email: &'a str,
    pub subscribed_at: DateTime<Utc>,
}
