//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{ClaimDealCommand, ClaimLedgerQuery, LoginService, NewsletterCommand};
use crate::domain::{CarouselTiming, RestaurantCatalogue};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub claims: Arc<dyn ClaimDealCommand>,
    pub ledger: Arc<dyn ClaimLedgerQuery>,
    pub newsletter: Arc<dyn NewsletterCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub claims: Arc<dyn ClaimDealCommand>,
    pub ledger: Arc<dyn ClaimLedgerQuery>,
    pub newsletter: Arc<dyn NewsletterCommand>,
    pub catalogue: Arc<RestaurantCatalogue>,
    pub carousel: CarouselTiming,
    /// Source of "today" for request validation.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from a ports bundle and the loaded catalogue.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use tastetrail::domain::IdentityLoginService;
    /// use tastetrail::domain::ports::{
    ///     FixtureClaimDealCommand, FixtureClaimLedgerQuery, FixtureIdentityProvider,
    ///     FixtureNewsletterCommand,
    /// };
    /// use tastetrail::inbound::http::state::{HttpState, HttpStatePorts};
    /// use tastetrail::outbound::catalogue::load_catalogue;
    ///
    /// let ports = HttpStatePorts {
    ///     login: Arc::new(IdentityLoginService::new(Arc::new(FixtureIdentityProvider))),
    ///     claims: Arc::new(FixtureClaimDealCommand),
    ///     ledger: Arc::new(FixtureClaimLedgerQuery),
    ///     newsletter: Arc::new(FixtureNewsletterCommand),
    /// };
    /// let catalogue = load_catalogue(None).expect("bundled catalogue");
    /// let state = HttpState::new(ports, Arc::new(catalogue));
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, catalogue: Arc<RestaurantCatalogue>) -> Self {
        let HttpStatePorts {
            login,
            claims,
            ledger,
            newsletter,
        } = ports;
        Self {
            login,
            claims,
            ledger,
            newsletter,
            catalogue,
            carousel: CarouselTiming::default(),
            clock: Arc::new(DefaultClock),
        }
    }

    /// Use `clock` instead of the system clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the carousel transition timing.
    #[must_use]
    pub fn with_carousel_timing(mut self, timing: CarouselTiming) -> Self {
        self.carousel = timing;
        self
    }
}
