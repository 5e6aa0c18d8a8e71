//! Test helpers for inbound HTTP components.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;

use crate::domain::ports::{
    FixtureClaimDealCommand, FixtureClaimLedgerQuery, FixtureIdentityProvider,
    FixtureNewsletterCommand,
};
use crate::domain::{CarouselTiming, IdentityLoginService, RestaurantCatalogue};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::catalogue::load_catalogue;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The bundled catalogue, parsed once per test binary.
pub fn bundled_catalogue() -> Arc<RestaurantCatalogue> {
    static CATALOGUE: OnceLock<Arc<RestaurantCatalogue>> = OnceLock::new();
    CATALOGUE
        .get_or_init(|| Arc::new(load_catalogue(None).expect("bundled catalogue is valid")))
        .clone()
}

/// Ports backed by fixtures; sign-in accepts the fixture admin account.
pub fn fixture_ports() -> HttpStatePorts {
    HttpStatePorts {
        login: Arc::new(IdentityLoginService::new(Arc::new(FixtureIdentityProvider))),
        claims: Arc::new(FixtureClaimDealCommand),
        ledger: Arc::new(FixtureClaimLedgerQuery),
        newsletter: Arc::new(FixtureNewsletterCommand),
    }
}

/// State over `ports` and the bundled catalogue with instant carousel steps.
pub fn state_with(ports: HttpStatePorts) -> HttpState {
    HttpState::new(ports, bundled_catalogue()).with_carousel_timing(CarouselTiming {
        fade: Duration::ZERO,
        settle: Duration::ZERO,
    })
}

/// Sign in as the fixture admin and return the session cookie.
pub async fn login_cookie<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({
            "email": FixtureIdentityProvider::EMAIL,
            "password": FixtureIdentityProvider::PASSWORD,
        }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "fixture login succeeds");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
