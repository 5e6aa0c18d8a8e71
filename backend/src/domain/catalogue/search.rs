//! Listing filters: free-text search and category chips.

use std::str::FromStr;

use super::restaurant::Restaurant;

/// Minimum rating for the `popular` category.
pub const POPULAR_RATING_THRESHOLD: f32 = 4.3;

/// Free-text query split into lowercase terms.
///
/// A restaurant matches when every term occurs somewhere in its searchable
/// text (name, cuisine, location, deal copy, neighbourhood, and menu).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    /// Parse raw input; blank input matches everything.
    pub fn parse(raw: &str) -> Self {
        let terms = raw
            .trim()
            .to_lowercase()
            .split(' ')
            .filter(|term| !term.is_empty())
            .map(str::to_owned)
            .collect();
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        let haystack = restaurant.search_text();
        self.terms.iter().all(|term| haystack.contains(term.as_str()))
    }
}

/// Category chips on the listing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogueCategory {
    #[default]
    All,
    Deals,
    Popular,
    /// No "added at" data exists yet, so every restaurant counts as new.
    New,
    FineDining,
}

impl CatalogueCategory {
    pub fn matches(self, restaurant: &Restaurant) -> bool {
        match self {
            Self::All | Self::New => true,
            Self::Deals => !restaurant.deals().is_empty(),
            Self::Popular => restaurant.rating() >= POPULAR_RATING_THRESHOLD,
            Self::FineDining => restaurant.price_range().is_fine_dining(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Deals => "deals",
            Self::Popular => "popular",
            Self::New => "new",
            Self::FineDining => "fine-dining",
        }
    }
}

/// Error returned for unknown category names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category {0:?}; expected all, deals, popular, new, or fine-dining")]
pub struct UnknownCategory(pub String);

impl FromStr for CatalogueCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace([' ', '_'], "-");
        match normalised.as_str() {
            "all" => Ok(Self::All),
            "deals" => Ok(Self::Deals),
            "popular" => Ok(Self::Popular),
            "new" => Ok(Self::New),
            "fine-dining" => Ok(Self::FineDining),
            _ => Err(UnknownCategory(s.to_owned())),
        }
    }
}

/// Search plus category, applied together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueFilter {
    pub query: SearchQuery,
    pub category: CatalogueCategory,
}

impl CatalogueFilter {
    pub fn new(query: SearchQuery, category: CatalogueCategory) -> Self {
        Self { query, category }
    }

    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        self.query.matches(restaurant) && self.category.matches(restaurant)
    }
}
