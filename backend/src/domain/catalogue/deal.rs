//! Deal entity and per-customer redemption limit.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::CatalogueValidationError;
use super::validation::validate_non_empty_field;

/// Maximum redemptions of a deal per customer. Zero means unlimited.
///
/// # Examples
/// ```
/// use tastetrail::domain::OfferLimit;
///
/// assert!(OfferLimit::new(0).allows(1_000));
/// assert!(OfferLimit::new(2).allows(1));
/// assert!(!OfferLimit::new(2).allows(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferLimit(u32);

impl OfferLimit {
    pub const UNLIMITED: Self = Self(0);

    pub const fn new(limit: u32) -> Self {
        Self(limit)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_unlimited(self) -> bool {
        self.0 == 0
    }

    /// Whether one more claim is allowed when `existing` claims are on record.
    pub const fn allows(self, existing: u32) -> bool {
        self.is_unlimited() || existing < self.0
    }
}

impl fmt::Display for OfferLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unlimited() {
            f.write_str("Unlimited")
        } else {
            write!(f, "{}x every 90 days", self.0)
        }
    }
}

/// Advertised saving, kept as display strings such as `$7`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsEstimate {
    pub average: String,
    pub up_to: String,
}

/// Input payload for [`Deal::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealDraft {
    pub deal_title: String,
    pub deal_description: String,
    pub potential_savings: SavingsEstimate,
    #[serde(default)]
    pub offer_per_customer_limit: u32,
}

/// Promotional offer belonging to exactly one restaurant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    title: String,
    description: String,
    savings: SavingsEstimate,
    limit: OfferLimit,
}

impl Deal {
    /// Validate and construct a deal.
    pub fn new(draft: DealDraft) -> Result<Self, CatalogueValidationError> {
        Ok(Self {
            title: validate_non_empty_field(draft.deal_title, "deal.title")?,
            description: validate_non_empty_field(draft.deal_description, "deal.description")?,
            savings: draft.potential_savings,
            limit: OfferLimit::new(draft.offer_per_customer_limit),
        })
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
    pub fn savings(&self) -> &SavingsEstimate {
        &self.savings
    }
    pub fn limit(&self) -> OfferLimit {
        self.limit
    }
}
