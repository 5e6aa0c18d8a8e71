//! Identity provider outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `IdentityProvider`
//! port against a GoTrue-compatible password grant endpoint.

mod dto;
mod http_provider;

pub use http_provider::GoTrueIdentityProvider;
