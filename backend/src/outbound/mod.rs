//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed claim and newsletter repositories
//!   using Diesel ORM
//! - **identity**: GoTrue-compatible password sign-in over HTTP
//! - **notifications**: remote email functions over HTTP
//! - **catalogue**: JSON restaurant catalogue loader
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod catalogue;
mod http_support;
pub mod identity;
pub mod notifications;
pub mod persistence;

pub use http_support::HttpAdapterError;
