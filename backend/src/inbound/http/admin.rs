//! Admin claim ledger.
//!
//! ```text
//! GET /api/v1/admin/claims?q=source
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

use crate::domain::{ClaimLedgerFilter, ClaimedDeal};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ClaimedDealSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClaimLedgerQueryParams {
    /// Case-insensitive match on user email, restaurant name, or deal title.
    pub q: Option<String>,
}

/// List recorded claims, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/claims",
    params(ClaimLedgerQueryParams),
    responses(
        (status = 200, description = "Claim ledger", body = [ClaimedDealSchema]),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema),
        (status = 503, description = "Claim store unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listClaims"
)]
#[get("/admin/claims")]
pub async fn list_claims(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ClaimLedgerQueryParams>,
) -> ApiResult<web::Json<Vec<ClaimedDeal>>> {
    let user = session.require_user()?;
    let filter = ClaimLedgerFilter::new(query.q.as_deref());
    let claims = state.ledger.list(&user, &filter).await?;
    debug!(count = claims.len(), "claim ledger listed");
    Ok(web::Json(claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockClaimLedgerQuery;
    use crate::domain::Error;
    use crate::inbound::http::test_utils::{
        fixture_ports, login_cookie, state_with, test_session_middleware,
    };
    use crate::inbound::http::users::login;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use std::sync::Arc;

    async fn call_ledger(ledger: MockClaimLedgerQuery, uri: &str, signed_in: bool) -> StatusCode {
        let mut ports = fixture_ports();
        ports.ledger = Arc::new(ledger);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(login).service(list_claims)),
        )
        .await;
        let mut request = actix_test::TestRequest::get().uri(uri);
        if signed_in {
            request = request.cookie(login_cookie(&app).await);
        }
        actix_test::call_service(&app, request.to_request())
            .await
            .status()
    }

    #[actix_web::test]
    async fn ledger_passes_the_search_filter_through() {
        let mut ledger = MockClaimLedgerQuery::new();
        ledger
            .expect_list()
            .withf(|_, filter| *filter == ClaimLedgerFilter::new(Some("source")))
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let status = call_ledger(ledger, "/api/v1/admin/claims?q=Source", true).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[actix_web::test]
    async fn ledger_requires_a_session() {
        let mut ledger = MockClaimLedgerQuery::new();
        ledger.expect_list().never();
        let status = call_ledger(ledger, "/api/v1/admin/claims", false).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case::not_admin(Error::forbidden("admin access required"), StatusCode::FORBIDDEN)]
    #[case::store_down(
        Error::service_unavailable("claim store unavailable"),
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[actix_web::test]
    async fn ledger_errors_map_to_statuses(#[case] error: Error, #[case] expected: StatusCode) {
        let mut ledger = MockClaimLedgerQuery::new();
        ledger.expect_list().times(1).return_once(move |_, _| Err(error));
        let status = call_ledger(ledger, "/api/v1/admin/claims", true).await;
        assert_eq!(status, expected);
    }
}
