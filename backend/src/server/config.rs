//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use tastetrail::domain::{AdminPolicy, ExpiryPolicy, LimitScope};
use tastetrail::inbound::http::session_config::SessionSettings;
use tastetrail::outbound::persistence::DbPool;
use tastetrail::settings::{AppSettings, AuthEndpoint, FunctionsEndpoint, SettingsError};

/// Everything needed to build the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) auth: Option<AuthEndpoint>,
    pub(crate) functions: Option<FunctionsEndpoint>,
    pub(crate) http_timeout: Duration,
    pub(crate) admins: AdminPolicy,
    pub(crate) limit_scope: LimitScope,
    pub(crate) expiry: ExpiryPolicy,
}

impl ServerConfig {
    /// Derive the server configuration from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a configured value does not parse.
    pub fn from_settings(
        settings: &AppSettings,
        session: SessionSettings,
    ) -> Result<Self, SettingsError> {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Ok(Self {
            key,
            cookie_secure,
            same_site,
            bind_addr: settings.bind_addr()?,
            db_pool: None,
            auth: settings.auth()?,
            functions: settings.functions()?,
            http_timeout: settings.http_timeout(),
            admins: settings.admin_policy()?,
            limit_scope: settings.limit_scope()?,
            expiry: settings.expiry_policy(),
        })
    }

    /// Attach a database connection pool; claims and subscriptions then
    /// persist in Postgres instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
