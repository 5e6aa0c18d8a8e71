//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - `Error` and `ErrorCode`: transport-agnostic failure payload.
//! - `AuthenticatedUser`: identity held in the session.
//! - `RestaurantCatalogue`: read-only restaurants and deals.
//! - `ClaimRequest` and `ClaimOutcome`: the deal-claim workflow boundary.

pub mod auth;
pub mod catalogue;
pub mod claim_ledger_service;
pub mod claim_service;
pub mod claims;
pub mod deal_carousel;
pub mod error;
pub mod login_service;
pub mod newsletter_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    FULL_NAME_MIN_LEN, LoginCredentials, LoginValidationError, PASSWORD_MIN_LEN, PhoneNumber,
    SignupDraft, SignupRequest, SignupValidationError,
};
pub use self::catalogue::{
    CatalogueCategory, CatalogueFilter, CatalogueValidationError, DEFAULT_FEATURED_COUNT, Deal,
    DealDraft, MenuItem, OfferLimit, OpeningHours, POPULAR_RATING_THRESHOLD, PriceRange,
    Restaurant, RestaurantCatalogue, RestaurantDraft, RestaurantId, SavingsEstimate, SearchQuery,
    UnknownCategory,
};
pub use self::claim_ledger_service::ClaimLedgerService;
pub use self::claim_service::{CLAIM_FAILED_MESSAGE, ClaimDealService};
pub use self::claims::{
    AdminPolicy, ClaimCountKey, ClaimLedgerFilter, ClaimOutcome, ClaimPhase, ClaimRequest,
    ClaimValidationError, ClaimedDeal, ConfirmationCode, ExpiryPolicy, LimitScope,
    NotificationStatus, UnknownLimitScope,
};
pub use self::deal_carousel::{
    CarouselError, CarouselTiming, DealCarousel, StepDirection, UnknownDirection,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::login_service::{IdentityLoginService, MANUAL_SIGN_IN_MESSAGE, SIGNED_UP_MESSAGE};
pub use self::newsletter_service::NewsletterService;
pub use self::trace_id::TraceId;
pub use self::user::{
    AuthenticatedUser, DISPLAY_NAME_MAX, DisplayName, EmailAddress, FALLBACK_CUSTOMER_NAME,
    UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use tastetrail::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
