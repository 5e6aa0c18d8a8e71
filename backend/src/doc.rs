//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `inbound::http`, the schema
//! wrappers for domain types ([`ErrorSchema`], [`ErrorCodeSchema`],
//! [`ClaimedDealSchema`]), and the session cookie security scheme. Swagger
//! UI serves it at `/docs` in debug builds.

use crate::inbound::http::claims::{ClaimDealRequest, ClaimDealResponse, ClaimStatus};
use crate::inbound::http::newsletter::{SubscribeRequest, SubscribeResponse};
use crate::inbound::http::restaurants::{
    DealResponse, DealStepResponse, MenuItemResponse, OpeningHoursResponse,
    RestaurantDetailResponse, RestaurantSummaryResponse, SavingsResponse,
};
use crate::inbound::http::schemas::{ClaimedDealSchema, ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    CurrentUserResponse, LoginRequest, SignupRequestBody, SignupResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "TasteTrail API",
        description = "Restaurant deals around Cambridge: browse, sign in, then claim deals."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::restaurants::list_restaurants,
        crate::inbound::http::restaurants::get_restaurant,
        crate::inbound::http::restaurants::step_deal,
        crate::inbound::http::claims::claim_deal,
        crate::inbound::http::admin::list_claims,
        crate::inbound::http::newsletter::subscribe,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ClaimedDealSchema,
        SignupRequestBody,
        SignupResponse,
        LoginRequest,
        CurrentUserResponse,
        RestaurantSummaryResponse,
        RestaurantDetailResponse,
        OpeningHoursResponse,
        MenuItemResponse,
        DealResponse,
        SavingsResponse,
        DealStepResponse,
        ClaimDealRequest,
        ClaimDealResponse,
        ClaimStatus,
        SubscribeRequest,
        SubscribeResponse,
    )),
    tags(
        (name = "session", description = "Sign-in and the current identity"),
        (name = "catalogue", description = "Restaurants and their deals"),
        (name = "claims", description = "Claiming deals"),
        (name = "admin", description = "Claim ledger for administrators"),
        (name = "newsletter", description = "Deals newsletter"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
