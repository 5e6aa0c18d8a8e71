//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers depend only on [`state::HttpState`]; [`configure_api`] mounts
//! them under a scope chosen by the caller (normally `/api/v1`).

use actix_web::web;

pub mod admin;
pub mod claims;
pub mod error;
pub mod health;
pub mod newsletter;
pub mod restaurants;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every API handler on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::signup)
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(restaurants::list_restaurants)
        .service(restaurants::step_deal)
        .service(restaurants::get_restaurant)
        .service(claims::claim_deal)
        .service(admin::list_claims)
        .service(newsletter::subscribe);
}
