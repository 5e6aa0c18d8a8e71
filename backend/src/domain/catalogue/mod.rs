//! Restaurant catalogue domain types.
//!
//! The catalogue is immutable reference data loaded once at startup. It owns
//! restaurant identity, the deals each restaurant offers, and the listing
//! rules (featured subset, free-text search, category filters).

use std::collections::HashSet;

mod deal;
mod restaurant;
mod search;
mod validation;


pub use deal::{Deal, DealDraft, OfferLimit, SavingsEstimate};
pub use restaurant::{
    MenuItem, OpeningHours, PriceRange, Restaurant, RestaurantDraft, RestaurantId,
};
pub use search::{
    CatalogueCategory, CatalogueFilter, POPULAR_RATING_THRESHOLD, SearchQuery, UnknownCategory,
};

/// Number of restaurants surfaced on the listing page when the source data
/// does not say otherwise.
pub const DEFAULT_FEATURED_COUNT: usize = 9;

/// Validation errors returned by catalogue constructors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogueValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} must be between 0 and 5, got {rating}")]
    InvalidRating { field: &'static str, rating: f32 },
    #[error("{field} must be one of $, $$, $$$, $$$$; got {value:?}")]
    InvalidPriceRange { field: &'static str, value: String },
    #[error("restaurant {name:?} must offer at least one deal")]
    NoDeals { name: String },
    #[error("restaurant id {id:?} is derived from more than one restaurant name")]
    DuplicateRestaurant { id: String },
    #[error("catalogue must contain at least one restaurant")]
    EmptyCatalogue,
}

/// Validated, read-only set of restaurants.
///
/// ## Invariants
/// - Contains at least one restaurant.
/// - Restaurant ids are unique.
/// - Source order is preserved; the first `featured_count` entries form the
///   featured listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantCatalogue {
    restaurants: Vec<Restaurant>,
    featured_count: usize,
}

impl RestaurantCatalogue {
    /// Build a catalogue from validated restaurants.
    pub fn new(
        restaurants: Vec<Restaurant>,
        featured_count: usize,
    ) -> Result<Self, CatalogueValidationError> {
        if restaurants.is_empty() {
            return Err(CatalogueValidationError::EmptyCatalogue);
        }
        let mut seen = HashSet::with_capacity(restaurants.len());
        for restaurant in &restaurants {
            if !seen.insert(restaurant.id().as_ref()) {
                return Err(CatalogueValidationError::DuplicateRestaurant {
                    id: restaurant.id().to_string(),
                });
            }
        }
        Ok(Self {
            restaurants,
            featured_count,
        })
    }

    /// Every restaurant, in source order.
    pub fn all(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// Restaurants shown on the listing page.
    pub fn featured(&self) -> &[Restaurant] {
        let end = self.featured_count.min(self.restaurants.len());
        self.restaurants.get(..end).unwrap_or_default()
    }

    /// Look up a restaurant by id, including non-featured entries.
    pub fn find(&self, id: &RestaurantId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|restaurant| restaurant.id() == id)
    }

    /// Featured restaurants matching `filter`, in source order.
    pub fn browse(&self, filter: &CatalogueFilter) -> Vec<&Restaurant> {
        self.featured()
            .iter()
            .filter(|restaurant| filter.matches(restaurant))
            .collect()
    }
}
