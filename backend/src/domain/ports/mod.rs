//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, notification sender, identity provider,
//! confirmation codes) are implemented by outbound adapters. Driving ports
//! (login, claim, ledger, newsletter) are consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod claim_deal_command;
mod claim_ledger_query;
mod claim_repository;
mod confirmation_codes;
mod identity_provider;
mod login_service;
mod newsletter_command;
mod newsletter_repository;
mod notification_sender;

#[cfg(test)]
pub use claim_deal_command::MockClaimDealCommand;
pub use claim_deal_command::{ClaimDealCommand, FixtureClaimDealCommand};
#[cfg(test)]
pub use claim_ledger_query::MockClaimLedgerQuery;
pub use claim_ledger_query::{ClaimLedgerQuery, FixtureClaimLedgerQuery};
#[cfg(test)]
pub use claim_repository::MockClaimRepository;
pub use claim_repository::{
    ClaimRepository, ClaimRepositoryError, FixtureClaimRepository, GuardedInsert,
};
#[cfg(test)]
pub use confirmation_codes::MockConfirmationCodeGenerator;
pub use confirmation_codes::{
    ConfirmationCodeGenerator, FixtureConfirmationCodes, RandomConfirmationCodes,
};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    FixtureIdentityProvider, IdentityProvider, IdentityProviderError, Registration,
};
pub use login_service::{LoginService, SignupOutcome};
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use newsletter_command::MockNewsletterCommand;
pub use newsletter_command::{FixtureNewsletterCommand, NewsletterCommand, SubscriptionOutcome};
#[cfg(test)]
pub use newsletter_repository::MockNewsletterRepository;
pub use newsletter_repository::{
    FixtureNewsletterRepository, NewsletterRepository, NewsletterRepositoryError,
    SubscriptionInsert,
};
#[cfg(test)]
pub use notification_sender::MockNotificationSender;
pub use notification_sender::{
    ClaimConfirmation, FixtureNotificationSender, NotificationError, NotificationSender,
};
