//! Newsletter subscription handler.
//!
//! ```text
//! POST /api/v1/newsletter/subscriptions {"email":"ada@example.com"}
//! ```
//!
//! Subscribing twice is not an error: the second call answers `200` with
//! `alreadySubscribed = true`.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SubscriptionOutcome;
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{EMAIL, parse_email};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub already_subscribed: bool,
    pub confirmation_sent: bool,
}

/// Subscribe an address to the deals newsletter.
#[utoipa::path(
    post,
    path = "/api/v1/newsletter/subscriptions",
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscribed", body = SubscribeResponse),
        (status = 200, description = "Already subscribed", body = SubscribeResponse),
        (status = 400, description = "Invalid email", body = ErrorSchema),
        (status = 503, description = "Subscription store unavailable", body = ErrorSchema)
    ),
    tags = ["newsletter"],
    operation_id = "subscribeNewsletter",
    security([])
)]
#[post("/newsletter/subscriptions")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    payload: web::Json<SubscribeRequest>,
) -> ApiResult<HttpResponse> {
    let raw = payload.into_inner().email;
    if raw.trim().is_empty() {
        return Err(Error::invalid_request("Please enter your email address")
            .with_details(serde_json::json!({ "field": "email", "code": "missing_email" })));
    }
    let email = parse_email(&raw, EMAIL)?;
    let response = match state.newsletter.subscribe(email).await? {
        SubscriptionOutcome::Subscribed { confirmation_sent } => {
            HttpResponse::Created().json(SubscribeResponse {
                already_subscribed: false,
                confirmation_sent,
            })
        }
        SubscriptionOutcome::AlreadySubscribed => HttpResponse::Ok().json(SubscribeResponse {
            already_subscribed: true,
            confirmation_sent: false,
        }),
    };
    Ok(response)
}
