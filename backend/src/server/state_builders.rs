//! Builders choosing between real adapters and in-process fixtures.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use tastetrail::domain::ports::{
    ClaimDealCommand, ClaimLedgerQuery, ClaimRepository, FixtureClaimRepository,
    FixtureIdentityProvider, FixtureNewsletterRepository, FixtureNotificationSender,
    IdentityProvider, LoginService, NewsletterCommand, NewsletterRepository, NotificationSender,
    RandomConfirmationCodes,
};
use tastetrail::domain::{
    ClaimDealService, ClaimLedgerService, IdentityLoginService, NewsletterService,
    RestaurantCatalogue,
};
use tastetrail::inbound::http::health::StoreKind;
use tastetrail::inbound::http::state::{HttpState, HttpStatePorts};
use tastetrail::outbound::HttpAdapterError;
use tastetrail::outbound::identity::GoTrueIdentityProvider;
use tastetrail::outbound::notifications::EmailFunctionsSender;
use tastetrail::outbound::persistence::{DieselClaimRepository, DieselNewsletterRepository};

use super::ServerConfig;

fn build_identity_provider(
    config: &ServerConfig,
) -> Result<Arc<dyn IdentityProvider>, HttpAdapterError> {
    match &config.auth {
        Some(auth) => {
            info!(url = %auth.url, "signing in against the identity provider");
            Ok(Arc::new(GoTrueIdentityProvider::new(
                &auth.url,
                auth.api_key.clone(),
                config.http_timeout,
            )?))
        }
        None => {
            warn!(
                email = FixtureIdentityProvider::EMAIL,
                "no identity provider configured; using the fixture account"
            );
            Ok(Arc::new(FixtureIdentityProvider))
        }
    }
}

fn build_notifier(
    config: &ServerConfig,
) -> Result<Arc<dyn NotificationSender>, HttpAdapterError> {
    match &config.functions {
        Some(functions) => Ok(Arc::new(EmailFunctionsSender::new(
            &functions.url,
            functions.key.clone(),
            config.http_timeout,
        )?)),
        None => {
            warn!("no email functions configured; confirmation emails are only logged");
            Ok(Arc::new(FixtureNotificationSender))
        }
    }
}

/// Claim and newsletter stores; both live in Postgres or both in memory.
fn build_stores(
    config: &ServerConfig,
) -> (Arc<dyn ClaimRepository>, Arc<dyn NewsletterRepository>) {
    match &config.db_pool {
        Some(pool) => (
            Arc::new(DieselClaimRepository::new(pool.clone())),
            Arc::new(DieselNewsletterRepository::new(pool.clone())),
        ),
        None => (
            Arc::new(FixtureClaimRepository::new()),
            Arc::new(FixtureNewsletterRepository::default()),
        ),
    }
}

pub(crate) fn store_kind(config: &ServerConfig) -> StoreKind {
    if config.db_pool.is_some() {
        StoreKind::Postgres
    } else {
        StoreKind::InMemory
    }
}

fn build_ports(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> Result<HttpStatePorts, HttpAdapterError> {
    let provider = build_identity_provider(config)?;
    let notifier = build_notifier(config)?;
    let (claims, subscriptions) = build_stores(config);

    let claim_service = ClaimDealService::new(
        claims.clone(),
        notifier.clone(),
        Arc::new(RandomConfirmationCodes),
        clock.clone(),
    )
    .with_scope(config.limit_scope)
    .with_expiry_policy(config.expiry);
    info!(
        scope = %claim_service.scope(),
        admins = config.admins.len(),
        "claim limits configured"
    );

    Ok(HttpStatePorts {
        login: Arc::new(IdentityLoginService::new(provider)) as Arc<dyn LoginService>,
        claims: Arc::new(claim_service) as Arc<dyn ClaimDealCommand>,
        ledger: Arc::new(ClaimLedgerService::new(
            claims,
            Arc::new(config.admins.clone()),
        )) as Arc<dyn ClaimLedgerQuery>,
        newsletter: Arc::new(NewsletterService::new(subscriptions, notifier, clock))
            as Arc<dyn NewsletterCommand>,
    })
}

/// Build the handler state over the configured adapters.
///
/// # Errors
///
/// Returns [`HttpAdapterError`] when an HTTP adapter cannot be constructed.
pub(super) fn build_http_state(
    config: &ServerConfig,
    catalogue: Arc<RestaurantCatalogue>,
) -> Result<HttpState, HttpAdapterError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = build_ports(config, clock.clone())?;
    Ok(HttpState::new(ports, catalogue).with_clock(clock))
}
