//! Catalogue API handlers.
//!
//! ```text
//! GET /api/v1/restaurants?q=pizza&category=popular
//! GET /api/v1/restaurants/{id}
//! GET /api/v1/restaurants/{id}/deals/{index}/{direction}
//! ```
//!
//! The catalogue is public; no session is required.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    CarouselError, CatalogueFilter, Deal, DealCarousel, Error, MenuItem, OpeningHours,
    Restaurant, SearchQuery,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    deal_index_error, find_restaurant, parse_category, parse_direction,
};

/// Listing filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRestaurantsQuery {
    /// Space-separated terms; every term must match.
    pub q: Option<String>,
    /// One of `all`, `deals`, `popular`, `new`, `fine-dining`.
    pub category: Option<String>,
}

/// Advertised saving for a deal.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavingsResponse {
    #[schema(example = "$7")]
    pub average: String,
    #[schema(example = "$10")]
    pub up_to: String,
}

/// Deal as shown on a restaurant page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealResponse {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub potential_savings: SavingsResponse,
    /// Zero means unlimited.
    pub offer_per_customer_limit: u32,
    #[schema(example = "2x every 90 days")]
    pub limit_label: String,
}

impl DealResponse {
    fn new(index: usize, deal: &Deal) -> Self {
        Self {
            index,
            title: deal.title().to_owned(),
            description: deal.description().to_owned(),
            potential_savings: SavingsResponse {
                average: deal.savings().average.clone(),
                up_to: deal.savings().up_to.clone(),
            },
            offer_per_customer_limit: deal.limit().get(),
            limit_label: deal.limit().to_string(),
        }
    }
}

/// Listing card.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSummaryResponse {
    #[schema(example = "mr-bartleys-burger-cottage")]
    pub id: String,
    pub name: String,
    pub image: String,
    pub location: String,
    pub neighborhood: String,
    pub rating: f32,
    #[schema(example = "$$")]
    pub price_range: String,
    pub cuisine: String,
    pub deal_text: String,
    pub deal_description: String,
    pub deal_count: usize,
}

impl From<&Restaurant> for RestaurantSummaryResponse {
    fn from(restaurant: &Restaurant) -> Self {
        Self {
            id: restaurant.id().to_string(),
            name: restaurant.name().to_owned(),
            image: restaurant.image().to_owned(),
            location: restaurant.location().to_owned(),
            neighborhood: restaurant.neighborhood().to_owned(),
            rating: restaurant.rating(),
            price_range: restaurant.price_range().as_str().to_owned(),
            cuisine: restaurant.cuisine().to_owned(),
            deal_text: restaurant.deal_text().to_owned(),
            deal_description: restaurant.deal_description().to_owned(),
            deal_count: restaurant.deals().len(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHoursResponse {
    #[schema(example = "Tuesday-Sunday")]
    pub days: String,
    #[schema(example = "11:00 AM - 10:00 PM")]
    pub hours: String,
}

impl From<&OpeningHours> for OpeningHoursResponse {
    fn from(value: &OpeningHours) -> Self {
        Self {
            days: value.days.clone(),
            hours: value.hours.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    pub name: String,
    pub description: String,
    pub price: String,
}

impl From<&MenuItem> for MenuItemResponse {
    fn from(value: &MenuItem) -> Self {
        Self {
            name: value.name.clone(),
            description: value.description.clone(),
            price: value.price.clone(),
        }
    }
}

/// Restaurant page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetailResponse {
    #[serde(flatten)]
    pub summary: RestaurantSummaryResponse,
    pub full_description: String,
    pub address: String,
    pub opening_hours: Vec<OpeningHoursResponse>,
    pub phone_number: String,
    pub website: String,
    pub menu_highlights: Vec<MenuItemResponse>,
    pub deals: Vec<DealResponse>,
}

impl From<&Restaurant> for RestaurantDetailResponse {
    fn from(restaurant: &Restaurant) -> Self {
        Self {
            summary: RestaurantSummaryResponse::from(restaurant),
            full_description: restaurant.full_description().to_owned(),
            address: restaurant.address().to_owned(),
            opening_hours: restaurant
                .opening_hours()
                .iter()
                .map(OpeningHoursResponse::from)
                .collect(),
            phone_number: restaurant.phone_number().to_owned(),
            website: restaurant.website().to_owned(),
            menu_highlights: restaurant
                .menu_highlights()
                .iter()
                .map(MenuItemResponse::from)
                .collect(),
            deals: restaurant
                .deals()
                .iter()
                .enumerate()
                .map(|(index, deal)| DealResponse::new(index, deal))
                .collect(),
        }
    }
}

/// Deal selected after a carousel step.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealStepResponse {
    pub restaurant_id: String,
    pub deal_count: usize,
    pub deal: DealResponse,
}

/// List featured restaurants, optionally searched and filtered.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants",
    params(ListRestaurantsQuery),
    responses(
        (status = 200, description = "Featured restaurants", body = [RestaurantSummaryResponse]),
        (status = 400, description = "Unknown category", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listRestaurants",
    security([])
)]
#[get("/restaurants")]
pub async fn list_restaurants(
    state: web::Data<HttpState>,
    query: web::Query<ListRestaurantsQuery>,
) -> ApiResult<web::Json<Vec<RestaurantSummaryResponse>>> {
    let ListRestaurantsQuery { q, category } = query.into_inner();
    let filter = CatalogueFilter::new(
        SearchQuery::parse(q.as_deref().unwrap_or_default()),
        parse_category(category.as_deref())?,
    );
    let listing = state
        .catalogue
        .browse(&filter)
        .into_iter()
        .map(RestaurantSummaryResponse::from)
        .collect();
    Ok(web::Json(listing))
}

/// Fetch one restaurant, including entries outside the featured listing.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant id derived from its name")),
    responses(
        (status = 200, description = "Restaurant", body = RestaurantDetailResponse),
        (status = 404, description = "Unknown restaurant", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getRestaurant",
    security([])
)]
#[get("/restaurants/{id}")]
pub async fn get_restaurant(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RestaurantDetailResponse>> {
    let restaurant = find_restaurant(&state.catalogue, &path.into_inner())?;
    Ok(web::Json(RestaurantDetailResponse::from(restaurant)))
}

/// Step the deal carousel from `index` in `direction`, wrapping at the ends.
///
/// The response is delayed by the configured transition timing.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{id}/deals/{index}/{direction}",
    params(
        ("id" = String, Path, description = "Restaurant id"),
        ("index" = usize, Path, description = "Currently selected deal index"),
        ("direction" = String, Path, description = "`next` or `previous`")
    ),
    responses(
        (status = 200, description = "Newly selected deal", body = DealStepResponse),
        (status = 400, description = "Index out of range or unknown direction", body = ErrorSchema),
        (status = 404, description = "Unknown restaurant", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "stepDeal",
    security([])
)]
#[get("/restaurants/{id}/deals/{index}/{direction}")]
pub async fn step_deal(
    state: web::Data<HttpState>,
    path: web::Path<(String, usize, String)>,
) -> ApiResult<web::Json<DealStepResponse>> {
    let (id, index, direction) = path.into_inner();
    let restaurant = find_restaurant(&state.catalogue, &id)?;
    let direction = parse_direction(&direction)?;
    let available = restaurant.deals().len();
    let mut carousel = DealCarousel::at(index, available)
        .map_err(|err: CarouselError| deal_index_error(err.to_string(), index, available))?;
    carousel.step(direction, state.carousel).await;

    let selected = carousel.index();
    let deal = restaurant.deal(selected).ok_or_else(|| {
        Error::internal(format!("carousel selected missing deal {selected}"))
    })?;
    Ok(web::Json(DealStepResponse {
        restaurant_id: restaurant.id().to_string(),
        deal_count: carousel.len(),
        deal: DealResponse::new(selected, deal),
    }))
}

#[cfg(test)]
#[path = "restaurants_tests.rs"]
mod tests;
