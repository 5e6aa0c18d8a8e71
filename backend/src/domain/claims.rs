//! Deal-claim domain types.
//!
//! A claim attempt starts as a [`ClaimRequest`], validated once against the
//! catalogue, and ends as a [`ClaimOutcome`]. Limit rejection is an outcome,
//! not an error: callers decide how to present it.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalogue::{OfferLimit, Restaurant, RestaurantId};
use crate::domain::{AuthenticatedUser, EmailAddress, UserId};

/// Validation errors raised while building claim values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimValidationError {
    #[error("deal index {index} is out of range; {restaurant} offers {available} deals")]
    DealIndexOutOfRange {
        restaurant: String,
        index: usize,
        available: usize,
    },
    #[error("redemption date {date} is before today ({today})")]
    RedeemDateInPast { date: NaiveDate, today: NaiveDate },
    #[error("confirmation code suffix must be {expected} characters from 0-9 and A-Z")]
    InvalidConfirmationSuffix { expected: usize },
    #[error("confirmation code must not be empty")]
    EmptyConfirmationCode,
}

/// Which recorded claims count toward a deal's limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitScope {
    /// Count every claim the user holds at the restaurant.
    #[default]
    Restaurant,
    /// Count only claims for the selected deal title.
    Deal,
}

impl LimitScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Deal => "deal",
        }
    }

    /// Counting key for `request` under this scope.
    pub fn key_for(self, request: &ClaimRequest) -> ClaimCountKey {
        ClaimCountKey {
            user_id: request.user().id().clone(),
            restaurant_id: request.restaurant_id().clone(),
            deal_title: match self {
                Self::Restaurant => None,
                Self::Deal => Some(request.deal_title().to_owned()),
            },
        }
    }
}

impl fmt::Display for LimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for unknown limit scopes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown limit scope {0:?}; expected restaurant or deal")]
pub struct UnknownLimitScope(pub String);

impl FromStr for LimitScope {
    type Err = UnknownLimitScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restaurant" => Ok(Self::Restaurant),
            "deal" => Ok(Self::Deal),
            _ => Err(UnknownLimitScope(s.to_owned())),
        }
    }
}

/// Rows matching this key count toward a limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaimCountKey {
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    /// `Some` under [`LimitScope::Deal`].
    pub deal_title: Option<String>,
}

impl ClaimCountKey {
    pub fn matches(&self, claim: &ClaimedDeal) -> bool {
        claim.user_id == self.user_id
            && claim.restaurant_id == self.restaurant_id
            && self
                .deal_title
                .as_deref()
                .is_none_or(|title| claim.deal_title == title)
    }

    /// Stable text form, used to derive lock keys.
    pub fn canonical(&self) -> String {
        match &self.deal_title {
            Some(title) => format!("{}|{}|{}", self.user_id, self.restaurant_id, title),
            None => format!("{}|{}", self.user_id, self.restaurant_id),
        }
    }
}

/// A validated claim attempt.
///
/// ## Invariants
/// - `deal_index` addresses an existing deal of the restaurant.
/// - `redeem_on`, when present, is not before the day the request was built.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRequest {
    user: AuthenticatedUser,
    restaurant_id: RestaurantId,
    restaurant_name: String,
    deal_index: usize,
    deal_title: String,
    deal_description: String,
    limit: OfferLimit,
    redeem_on: Option<NaiveDate>,
}

impl ClaimRequest {
    /// Validate a claim for the deal at `deal_index`.
    ///
    /// `today` is the current UTC date; a `redeem_on` before it is rejected.
    pub fn new(
        user: AuthenticatedUser,
        restaurant: &Restaurant,
        deal_index: usize,
        redeem_on: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, ClaimValidationError> {
        let deal =
            restaurant
                .deal(deal_index)
                .ok_or_else(|| ClaimValidationError::DealIndexOutOfRange {
                    restaurant: restaurant.name().to_owned(),
                    index: deal_index,
                    available: restaurant.deals().len(),
                })?;
        if let Some(date) = redeem_on.filter(|date| *date < today) {
            return Err(ClaimValidationError::RedeemDateInPast { date, today });
        }
        Ok(Self {
            user,
            restaurant_id: restaurant.id().clone(),
            restaurant_name: restaurant.name().to_owned(),
            deal_index,
            deal_title: deal.title().to_owned(),
            deal_description: deal.description().to_owned(),
            limit: deal.limit(),
            redeem_on,
        })
    }

    pub fn user(&self) -> &AuthenticatedUser {
        &self.user
    }
    pub fn restaurant_id(&self) -> &RestaurantId {
        &self.restaurant_id
    }
    pub fn restaurant_name(&self) -> &str {
        self.restaurant_name.as_str()
    }
    pub fn deal_index(&self) -> usize {
        self.deal_index
    }
    pub fn deal_title(&self) -> &str {
        self.deal_title.as_str()
    }
    pub fn deal_description(&self) -> &str {
        self.deal_description.as_str()
    }
    pub fn limit(&self) -> OfferLimit {
        self.limit
    }
    pub fn redeem_on(&self) -> Option<NaiveDate> {
        self.redeem_on
    }
}

/// Code staff use to look up a claim, e.g. `THEBO-4K9Z2QX1`.
///
/// # Examples
/// ```
/// use tastetrail::domain::ConfirmationCode;
///
/// let code = ConfirmationCode::from_parts("The Boiling Crab", "4K9Z2QX1").expect("valid");
/// assert_eq!(code.as_ref(), "THEBO-4K9Z2QX1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    /// Length of the random suffix.
    pub const SUFFIX_LEN: usize = 8;
    /// Maximum length of the restaurant-derived prefix.
    pub const PREFIX_MAX: usize = 5;
    /// Characters the suffix is drawn from.
    pub const ALPHABET: &'static [u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    const FALLBACK_PREFIX: &'static str = "DEAL";

    /// Prefix derived from a restaurant name.
    pub fn prefix_for(restaurant_name: &str) -> String {
        let prefix: String = restaurant_name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .take(Self::PREFIX_MAX)
            .map(|ch| ch.to_ascii_uppercase())
            .collect();
        if prefix.is_empty() {
            Self::FALLBACK_PREFIX.to_owned()
        } else {
            prefix
        }
    }

    /// Assemble a code from a restaurant name and a generated suffix.
    pub fn from_parts(restaurant_name: &str, suffix: &str) -> Result<Self, ClaimValidationError> {
        let valid = suffix.len() == Self::SUFFIX_LEN
            && suffix.bytes().all(|byte| Self::ALPHABET.contains(&byte));
        if !valid {
            return Err(ClaimValidationError::InvalidConfirmationSuffix {
                expected: Self::SUFFIX_LEN,
            });
        }
        Ok(Self(format!("{}-{suffix}", Self::prefix_for(restaurant_name))))
    }

    /// Accept a stored code verbatim.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ClaimValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ClaimValidationError::EmptyConfirmationCode);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ConfirmationCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ConfirmationCode> for String {
    fn from(value: ConfirmationCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for ConfirmationCode {
    type Error = ClaimValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

const LAST_SECOND: i64 = 24 * 60 * 60 - 1;

/// How long a claim stays redeemable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    default_validity: Duration,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            default_validity: Duration::days(7),
        }
    }
}

impl ExpiryPolicy {
    pub fn new(default_validity: Duration) -> Self {
        Self { default_validity }
    }

    /// End of `redeem_on` (23:59:59 UTC) when given, else
    /// `claimed_at + default_validity`.
    pub fn expires_at(
        &self,
        claimed_at: DateTime<Utc>,
        redeem_on: Option<NaiveDate>,
    ) -> DateTime<Utc> {
        match redeem_on {
            Some(date) => {
                let start_of_day = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
                start_of_day + Duration::seconds(LAST_SECOND)
            }
            None => claimed_at + self.default_validity,
        }
    }
}

/// A recorded redemption. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimedDeal {
    pub id: Uuid,
    pub user_id: UserId,
    pub user_email: EmailAddress,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub deal_title: String,
    pub deal_description: String,
    pub confirmation_code: ConfirmationCode,
    pub expires_at: DateTime<Utc>,
    pub claimed_at: DateTime<Utc>,
}

impl ClaimedDeal {
    /// Record for a validated request.
    pub fn from_request(
        request: &ClaimRequest,
        confirmation_code: ConfirmationCode,
        claimed_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: request.user().id().clone(),
            user_email: request.user().email().clone(),
            restaurant_id: request.restaurant_id().clone(),
            restaurant_name: request.restaurant_name().to_owned(),
            deal_title: request.deal_title().to_owned(),
            deal_description: request.deal_description().to_owned(),
            confirmation_code,
            expires_at,
            claimed_at,
        }
    }
}

/// Workflow phases, emitted as `claim.phase` tracing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimPhase {
    CheckingEligibility,
    Rejected,
    Eligible,
    Recording,
    RecordFailed,
    Recorded,
    NotifyingEmail,
    NotifyFailed,
    NotifySucceeded,
}

impl ClaimPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CheckingEligibility => "checking_eligibility",
            Self::Rejected => "rejected",
            Self::Eligible => "eligible",
            Self::Recording => "recording",
            Self::RecordFailed => "record_failed",
            Self::Recorded => "recorded",
            Self::NotifyingEmail => "notifying_email",
            Self::NotifyFailed => "notify_failed",
            Self::NotifySucceeded => "notify_succeeded",
        }
    }

    /// Whether a claim row exists once this phase is reached.
    pub fn is_persisted(self) -> bool {
        matches!(
            self,
            Self::Recorded | Self::NotifyingEmail | Self::NotifyFailed | Self::NotifySucceeded
        )
    }
}

/// Whether the confirmation email went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationStatus {
    Delivered,
    Failed,
}

/// Result of a claim attempt that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The user already holds `existing` claims against `limit`.
    Rejected { limit: OfferLimit, existing: u32 },
    /// The claim was stored; email delivery may still have failed.
    Recorded {
        claim: ClaimedDeal,
        notification: NotificationStatus,
    },
}

impl ClaimOutcome {
    pub fn claim(&self) -> Option<&ClaimedDeal> {
        match self {
            Self::Recorded { claim, .. } => Some(claim),
            Self::Rejected { .. } => None,
        }
    }
}

/// Emails allowed to read the claim ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPolicy {
    emails: HashSet<EmailAddress>,
}

impl AdminPolicy {
    /// The default development admin.
    pub const DEFAULT_ADMIN: &'static str = "admin@tastetrail.com";

    pub fn new(emails: impl IntoIterator<Item = EmailAddress>) -> Self {
        Self {
            emails: emails.into_iter().collect(),
        }
    }

    pub fn is_admin(&self, user: &AuthenticatedUser) -> bool {
        self.emails.contains(user.email())
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// Free-text filter for the claim ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimLedgerFilter {
    needle: Option<String>,
}

impl ClaimLedgerFilter {
    pub fn new(raw: Option<&str>) -> Self {
        let needle = raw
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());
        Self { needle }
    }

    /// Case-insensitive match on user email, restaurant name, or deal title.
    pub fn matches(&self, claim: &ClaimedDeal) -> bool {
        let Some(needle) = self.needle.as_deref() else {
            return true;
        };
        claim.user_email.as_ref().contains(needle)
            || claim.restaurant_name.to_lowercase().contains(needle)
            || claim.deal_title.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests;
