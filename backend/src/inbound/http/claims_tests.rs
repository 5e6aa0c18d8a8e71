//! Tests for the deal claim handler.

use super::*;
use crate::domain::ports::{FixtureIdentityProvider, MockClaimDealCommand};
use crate::domain::{CLAIM_FAILED_MESSAGE, ConfirmationCode, ExpiryPolicy};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::test_utils::{
    fixture_ports, login_cookie, state_with, test_session_middleware,
};
use crate::inbound::http::users::login;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;
use serde_json::Value;
use std::sync::Arc;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

async fn claim_app(
    ports: HttpStatePorts,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    claim_app_with(state_with(ports)).await
}

async fn claim_app_with(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .service(web::scope("/api/v1").service(login).service(claim_deal)),
    )
    .await
}

async fn post_claim<S>(
    app: &S,
    restaurant: &str,
    body: Value,
    cookie: Option<Cookie<'static>>,
) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/restaurants/{restaurant}/claims"))
        .set_json(body);
    if let Some(cookie) = cookie {
        request = request.cookie(cookie);
    }
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    (status, serde_json::from_slice(&bytes).expect("response JSON"))
}

fn recorded(request: ClaimRequest, notification: NotificationStatus) -> ClaimOutcome {
    let now = Utc::now();
    let code = ConfirmationCode::from_parts(request.restaurant_name(), "4K9Z2QX1")
        .expect("valid code");
    let expires_at = ExpiryPolicy::default().expires_at(now, request.redeem_on());
    ClaimOutcome::Recorded {
        claim: ClaimedDeal::from_request(&request, code, now, expires_at),
        notification,
    }
}

fn ports_with(command: MockClaimDealCommand) -> HttpStatePorts {
    let mut ports = fixture_ports();
    ports.claims = Arc::new(command);
    ports
}

#[actix_web::test]
async fn claiming_requires_a_session() {
    let app = claim_app(fixture_ports()).await;
    let (status, body) = post_claim(&app, "source", json!({ "dealIndex": 0 }), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn successful_claim_is_created_with_confirmation_details() {
    let app = claim_app(fixture_ports()).await;
    let cookie = login_cookie(&app).await;

    let (status, body) =
        post_claim(&app, "source", json!({ "dealIndex": 1 }), Some(cookie)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "claimed");
    assert_eq!(body["emailDelivered"], true);
    assert_eq!(
        body["message"],
        format!(
            "Deal claimed! Confirmation sent to {}",
            FixtureIdentityProvider::EMAIL
        )
    );
    assert_eq!(body["claim"]["restaurantId"], "source");
    assert_eq!(body["claim"]["dealTitle"], "Free draft beer");
    assert_eq!(body["claim"]["userEmail"], FixtureIdentityProvider::EMAIL);
    let code = body["claim"]["confirmationCode"].as_str().expect("code");
    assert!(code.starts_with("SOURC-"), "unexpected code {code}");
}

#[actix_web::test]
async fn failed_email_is_reported_as_degraded_success() {
    let mut command = MockClaimDealCommand::new();
    command
        .expect_claim()
        .times(1)
        .returning(|request| Ok(recorded(request, NotificationStatus::Failed)));
    let app = claim_app(ports_with(command)).await;
    let cookie = login_cookie(&app).await;

    let (status, body) =
        post_claim(&app, "source", json!({ "dealIndex": 0 }), Some(cookie)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "claimedEmailFailed");
    assert_eq!(body["emailDelivered"], false);
    assert_eq!(body["claim"]["dealTitle"], "Free dessert");
}

#[actix_web::test]
async fn reached_limit_is_a_conflict() {
    let mut command = MockClaimDealCommand::new();
    command.expect_claim().times(1).returning(|_| {
        Ok(ClaimOutcome::Rejected {
            limit: OfferLimit::new(1),
            existing: 1,
        })
    });
    let app = claim_app(ports_with(command)).await;
    let cookie = login_cookie(&app).await;

    let (status, body) =
        post_claim(&app, "source", json!({ "dealIndex": 0 }), Some(cookie)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["details"]["code"], "claim_limit_reached");
    assert_eq!(body["details"]["limit"], 1);
}

#[rstest]
#[case::store_unreachable(
    crate::domain::Error::service_unavailable(CLAIM_FAILED_MESSAGE),
    StatusCode::SERVICE_UNAVAILABLE
)]
#[case::store_query_failed(
    crate::domain::Error::internal(CLAIM_FAILED_MESSAGE),
    StatusCode::INTERNAL_SERVER_ERROR
)]
#[actix_web::test]
async fn persistence_failure_reports_claim_failure(
    #[case] error: crate::domain::Error,
    #[case] expected: StatusCode,
) {
    let mut command = MockClaimDealCommand::new();
    command.expect_claim().times(1).return_once(move |_| Err(error));
    let app = claim_app(ports_with(command)).await;
    let cookie = login_cookie(&app).await;

    let (status, body) =
        post_claim(&app, "source", json!({ "dealIndex": 0 }), Some(cookie)).await;
    assert_eq!(status, expected);
    assert_eq!(body["message"], CLAIM_FAILED_MESSAGE);
}

#[rstest]
#[case::index_out_of_range(json!({ "dealIndex": 7 }), "deal_index_out_of_range")]
#[case::redeem_date_in_past(
    json!({ "dealIndex": 0, "redeemOn": "2020-01-01" }),
    "redeem_date_in_past"
)]
#[actix_web::test]
async fn invalid_claims_never_reach_the_workflow(#[case] body: Value, #[case] code: &str) {
    let mut command = MockClaimDealCommand::new();
    command.expect_claim().never();
    let app = claim_app(ports_with(command)).await;
    let cookie = login_cookie(&app).await;

    let (status, response) = post_claim(&app, "source", body, Some(cookie)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["details"]["code"], code);
}

#[rstest]
#[case::day_before(json!({ "dealIndex": 0, "redeemOn": "2026-03-13" }), StatusCode::BAD_REQUEST)]
#[case::same_day(json!({ "dealIndex": 0, "redeemOn": "2026-03-14" }), StatusCode::CREATED)]
#[case::day_after(json!({ "dealIndex": 0, "redeemOn": "2026-03-15" }), StatusCode::CREATED)]
#[actix_web::test]
async fn redeem_dates_are_judged_against_the_state_clock(
    #[case] body: Value,
    #[case] expected: StatusCode,
) {
    let utc_now = Utc
        .with_ymd_and_hms(2026, 3, 14, 23, 30, 0)
        .single()
        .expect("valid timestamp");
    let state = state_with(fixture_ports()).with_clock(Arc::new(FixtureClock { utc_now }));
    let app = claim_app_with(state).await;
    let cookie = login_cookie(&app).await;

    let (status, _) = post_claim(&app, "source", body, Some(cookie)).await;
    assert_eq!(status, expected);
}

#[actix_web::test]
async fn unknown_restaurant_is_not_found() {
    let mut command = MockClaimDealCommand::new();
    command.expect_claim().never();
    let app = claim_app(ports_with(command)).await;
    let cookie = login_cookie(&app).await;

    let (status, _) =
        post_claim(&app, "nowhere", json!({ "dealIndex": 0 }), Some(cookie)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
