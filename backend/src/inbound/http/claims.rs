//! Deal claim handler.
//!
//! ```text
//! POST /api/v1/restaurants/source/claims {"dealIndex":0,"redeemOn":"2026-10-20"}
//! ```
//!
//! A limit rejection is `409 conflict` with details
//! `{ "code": "claim_limit_reached", "limit": N }`. A claim that was stored
//! but whose confirmation email failed is still `201`, with
//! `status = "claimedEmailFailed"`.

use actix_web::{HttpResponse, post, web};
use chrono::NaiveDate;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    ClaimOutcome, ClaimRequest, ClaimedDeal, Error, NotificationStatus, OfferLimit,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ClaimedDealSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{find_restaurant, map_claim_validation_error};

/// Claim request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDealRequest {
    /// Index of the deal currently shown by the carousel.
    pub deal_index: usize,
    /// Day the customer intends to redeem; the claim expires at its end.
    #[schema(value_type = Option<String>, format = Date, example = "2026-10-20")]
    pub redeem_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ClaimStatus {
    Claimed,
    /// Stored, but the confirmation email was not delivered.
    ClaimedEmailFailed,
}

/// Successful claim.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDealResponse {
    pub status: ClaimStatus,
    pub email_delivered: bool,
    pub message: String,
    #[schema(value_type = ClaimedDealSchema)]
    pub claim: ClaimedDeal,
}

impl ClaimDealResponse {
    fn new(claim: ClaimedDeal, notification: NotificationStatus) -> Self {
        match notification {
            NotificationStatus::Delivered => Self {
                status: ClaimStatus::Claimed,
                email_delivered: true,
                message: format!("Deal claimed! Confirmation sent to {}", claim.user_email),
                claim,
            },
            NotificationStatus::Failed => Self {
                status: ClaimStatus::ClaimedEmailFailed,
                email_delivered: false,
                message: "Deal claimed but email delivery failed. Please check your account."
                    .to_owned(),
                claim,
            },
        }
    }
}

fn limit_reached(limit: OfferLimit, existing: u32) -> Error {
    Error::conflict(format!(
        "You have reached the maximum limit of {} claims for this restaurant's deals",
        limit.get()
    ))
    .with_details(json!({
        "code": "claim_limit_reached",
        "limit": limit.get(),
        "existing": existing,
    }))
}

/// Claim a deal for the signed-in user.
#[utoipa::path(
    post,
    path = "/api/v1/restaurants/{id}/claims",
    params(("id" = String, Path, description = "Restaurant id")),
    request_body = ClaimDealRequest,
    responses(
        (status = 201, description = "Deal claimed", body = ClaimDealResponse),
        (status = 400, description = "Invalid deal index or redeem date", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown restaurant", body = ErrorSchema),
        (status = 409, description = "Claim limit reached", body = ErrorSchema),
        (status = 503, description = "Claim store unavailable", body = ErrorSchema),
        (status = 500, description = "Claim failed", body = ErrorSchema)
    ),
    tags = ["claims"],
    operation_id = "claimDeal"
)]
#[post("/restaurants/{id}/claims")]
pub async fn claim_deal(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ClaimDealRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user()?;
    let restaurant = find_restaurant(&state.catalogue, &path.into_inner())?;
    let ClaimDealRequest {
        deal_index,
        redeem_on,
    } = payload.into_inner();
    let request = ClaimRequest::new(
        user,
        restaurant,
        deal_index,
        redeem_on,
        state.clock.utc().date_naive(),
    )
    .map_err(map_claim_validation_error)?;

    match state.claims.claim(request).await? {
        ClaimOutcome::Rejected { limit, existing } => Err(limit_reached(limit, existing)),
        ClaimOutcome::Recorded {
            claim,
            notification,
        } => {
            info!(
                claim_id = %claim.id,
                restaurant = %claim.restaurant_id,
                ?notification,
                "deal claimed"
            );
            Ok(HttpResponse::Created().json(ClaimDealResponse::new(claim, notification)))
        }
    }
}

#[cfg(test)]
#[path = "claims_tests.rs"]
mod tests;
