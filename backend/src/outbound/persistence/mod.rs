//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories implement the claim and newsletter ports over
//! `diesel-async` with `bb8` pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: pool and Diesel failures map to the port's
//!   `Connection`/`Query` variants.

mod diesel_basic_error_mapping;
mod diesel_claim_repository;
mod diesel_newsletter_repository;
mod models;
mod pool;
mod schema;

pub use diesel_claim_repository::DieselClaimRepository;
pub use diesel_newsletter_repository::DieselNewsletterRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
