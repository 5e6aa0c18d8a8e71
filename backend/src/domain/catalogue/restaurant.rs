//! Restaurant entity and its identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::CatalogueValidationError;
use super::deal::{Deal, DealDraft};
use super::validation::{ensure_valid_rating, validate_non_empty_field};

/// Stable restaurant identifier derived from the display name.
///
/// Derivation: lowercase, collapse each whitespace run to `-`, drop
/// apostrophes. Other punctuation is kept.
///
/// # Examples
/// ```
/// use tastetrail::domain::RestaurantId;
///
/// let id = RestaurantId::from_name("Mr Bartley's Burger Cottage");
/// assert_eq!(id.as_ref(), "mr-bartleys-burger-cottage");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RestaurantId(String);

impl RestaurantId {
    /// Derive the identifier for a restaurant name.
    pub fn from_name(name: &str) -> Self {
        let mut id = String::with_capacity(name.len());
        let mut in_whitespace = false;
        for ch in name.chars() {
            if ch.is_whitespace() {
                if !in_whitespace {
                    id.push('-');
                }
                in_whitespace = true;
                continue;
            }
            in_whitespace = false;
            if ch == '\'' {
                continue;
            }
            id.extend(ch.to_lowercase());
        }
        Self(id)
    }

    /// Accept an identifier supplied by a client, e.g. a path segment.
    pub fn parse(raw: impl Into<String>) -> Result<Self, CatalogueValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() || raw.chars().any(char::is_whitespace) {
            return Err(CatalogueValidationError::EmptyField {
                field: "restaurant.id",
            });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for RestaurantId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RestaurantId> for String {
    fn from(value: RestaurantId) -> Self {
        value.0
    }
}

impl TryFrom<String> for RestaurantId {
    type Error = CatalogueValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Price tier shown as one to four dollar signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriceRange {
    Budget,
    Moderate,
    Upscale,
    Luxury,
}

impl PriceRange {
    /// Parse the `$`..`$$$$` notation.
    pub fn parse(raw: &str) -> Result<Self, CatalogueValidationError> {
        match raw.trim() {
            "$" => Ok(Self::Budget),
            "$$" => Ok(Self::Moderate),
            "$$$" => Ok(Self::Upscale),
            "$$$$" => Ok(Self::Luxury),
            other => Err(CatalogueValidationError::InvalidPriceRange {
                field: "restaurant.price_range",
                value: other.to_owned(),
            }),
        }
    }

    /// Dollar-sign notation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "$",
            Self::Moderate => "$$",
            Self::Upscale => "$$$",
            Self::Luxury => "$$$$",
        }
    }

    pub fn is_fine_dining(self) -> bool {
        matches!(self, Self::Upscale | Self::Luxury)
    }
}

/// One line of opening hours, e.g. `Tuesday-Sunday` / `11:00 AM - 10:00 PM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    pub days: String,
    pub hours: String,
}

/// Highlighted menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub name: String,
    pub description: String,
    pub price: String,
}

/// Input payload for [`Restaurant::new`], matching the catalogue JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDraft {
    pub name: String,
    pub image: String,
    pub location: String,
    pub neighborhood: String,
    pub rating: f32,
    pub price_range: String,
    pub cuisine: String,
    pub deal_text: String,
    pub deal_description: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub opening_hours: Vec<OpeningHours>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub menu_highlights: Vec<MenuItem>,
    pub deals: Vec<DealDraft>,
}

/// Restaurant with at least one claimable deal.
///
/// ## Invariants
/// - `id` is derived from `name` via [`RestaurantId::from_name`].
/// - `deals` is non-empty.
/// - `rating` lies within `0.0..=5.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    id: RestaurantId,
    name: String,
    image: String,
    location: String,
    neighborhood: String,
    rating: f32,
    price_range: PriceRange,
    cuisine: String,
    deal_text: String,
    deal_description: String,
    full_description: String,
    address: String,
    opening_hours: Vec<OpeningHours>,
    phone_number: String,
    website: String,
    menu_highlights: Vec<MenuItem>,
    deals: Vec<Deal>,
    search_text: String,
}

impl Restaurant {
    /// Validate and construct a restaurant.
    pub fn new(draft: RestaurantDraft) -> Result<Self, CatalogueValidationError> {
        Self::try_from(draft)
    }

    pub fn id(&self) -> &RestaurantId {
        &self.id
    }
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
    pub fn image(&self) -> &str {
        self.image.as_str()
    }
    pub fn location(&self) -> &str {
        self.location.as_str()
    }
    pub fn neighborhood(&self) -> &str {
        self.neighborhood.as_str()
    }
    pub fn rating(&self) -> f32 {
        self.rating
    }
    pub fn price_range(&self) -> PriceRange {
        self.price_range
    }
    pub fn cuisine(&self) -> &str {
        self.cuisine.as_str()
    }
    pub fn deal_text(&self) -> &str {
        self.deal_text.as_str()
    }
    pub fn deal_description(&self) -> &str {
        self.deal_description.as_str()
    }
    pub fn full_description(&self) -> &str {
        self.full_description.as_str()
    }
    pub fn address(&self) -> &str {
        self.address.as_str()
    }
    pub fn opening_hours(&self) -> &[OpeningHours] {
        &self.opening_hours
    }
    pub fn phone_number(&self) -> &str {
        self.phone_number.as_str()
    }
    pub fn website(&self) -> &str {
        self.website.as_str()
    }
    pub fn menu_highlights(&self) -> &[MenuItem] {
        &self.menu_highlights
    }
    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Deal at `index`, if any.
    pub fn deal(&self, index: usize) -> Option<&Deal> {
        self.deals.get(index)
    }

    /// Lowercased text that free-text search runs against.
    pub(super) fn search_text(&self) -> &str {
        self.search_text.as_str()
    }
}

fn build_search_text(draft: &RestaurantDraft) -> String {
    let deal_titles = draft
        .deals
        .iter()
        .map(|deal| deal.deal_title.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let deal_descriptions = draft
        .deals
        .iter()
        .map(|deal| deal.deal_description.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let menu_names = draft
        .menu_highlights
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let menu_descriptions = draft
        .menu_highlights
        .iter()
        .map(|item| item.description.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    [
        draft.name.as_str(),
        draft.cuisine.as_str(),
        draft.location.as_str(),
        draft.deal_text.as_str(),
        draft.neighborhood.as_str(),
        draft.deal_description.as_str(),
        deal_titles.as_str(),
        deal_descriptions.as_str(),
        menu_names.as_str(),
        menu_descriptions.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

impl TryFrom<RestaurantDraft> for Restaurant {
    type Error = CatalogueValidationError;

    fn try_from(draft: RestaurantDraft) -> Result<Self, Self::Error> {
        let search_text = build_search_text(&draft);
        let name = validate_non_empty_field(draft.name, "restaurant.name")?;
        ensure_valid_rating(draft.rating, "restaurant.rating")?;
        let price_range = PriceRange::parse(&draft.price_range)?;
        if draft.deals.is_empty() {
            return Err(CatalogueValidationError::NoDeals { name });
        }
        let deals = draft
            .deals
            .into_iter()
            .map(Deal::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: RestaurantId::from_name(&name),
            name,
            image: draft.image,
            location: draft.location,
            neighborhood: draft.neighborhood,
            rating: draft.rating,
            price_range,
            cuisine: draft.cuisine,
            deal_text: draft.deal_text,
            deal_description: draft.deal_description,
            full_description: draft.full_description,
            address: draft.address,
            opening_hours: draft.opening_hours,
            phone_number: draft.phone_number,
            website: draft.website,
            menu_highlights: draft.menu_highlights,
            deals,
            search_text,
        })
    }
}
