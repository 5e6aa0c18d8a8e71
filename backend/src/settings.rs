//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `TASTETRAIL_*` environment variables, and
//! configuration files, in that order of precedence. Optional integrations
//! (Postgres, the identity provider, the email functions) fall back to
//! in-process fixtures when left unset.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::SameSite;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::domain::{AdminPolicy, EmailAddress, ExpiryPolicy, LimitScope};
use crate::inbound::http::session_config::{
    SESSION_KEY_DEFAULT_PATH, SessionConfigError, SessionToggles, parse_same_site,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid {name} {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("{configured} is set but {missing} is not")]
    Incomplete {
        configured: &'static str,
        missing: &'static str,
    },
    #[error(transparent)]
    Session(#[from] SessionConfigError),
}

impl SettingsError {
    fn invalid(name: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            name,
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Email-functions endpoint and bearer key.
#[derive(Debug, Clone)]
pub struct FunctionsEndpoint {
    pub url: Url,
    pub key: String,
}

/// Identity provider endpoint and API key.
#[derive(Debug, Clone)]
pub struct AuthEndpoint {
    pub url: Url,
    pub api_key: String,
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TASTETRAIL")]
pub struct AppSettings {
    /// Socket address to listen on; defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// Postgres URL for the claim store; unset keeps claims in memory.
    pub database_url: Option<String>,
    /// Path to the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated session key when the key file is missing.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark session cookies `Secure`; defaults to `true`.
    pub cookie_secure: Option<bool>,
    /// `Strict`, `Lax` or `None`; defaults to `Lax`.
    pub cookie_same_site: Option<String>,
    /// Base URL of the serverless email functions.
    pub functions_url: Option<String>,
    pub functions_key: Option<String>,
    /// Base URL of the GoTrue-compatible auth service, e.g. `https://x/auth/v1`.
    pub auth_url: Option<String>,
    pub auth_api_key: Option<String>,
    /// Admin emails; the environment form is comma-separated.
    #[serde(default, deserialize_with = "one_or_many")]
    pub admin_emails: Option<Vec<String>>,
    /// JSON catalogue overriding the bundled one.
    pub catalogue_path: Option<PathBuf>,
    /// `restaurant` or `deal`.
    pub limit_scope: Option<String>,
    /// Timeout for outbound HTTP calls, in seconds.
    pub http_timeout_secs: Option<u64>,
    /// Days a claim stays valid when no redemption date is given.
    pub claim_validity_days: Option<u32>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|err| SettingsError::invalid("bind_addr", raw, err))
    }

    /// Whether session cookies carry `Secure`, falling back to `true`.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn session_toggles(&self) -> Result<SessionToggles, SettingsError> {
        let same_site = match self.cookie_same_site.as_deref() {
            Some(raw) => parse_same_site(raw)?,
            None => SameSite::Lax,
        };
        Ok(SessionToggles {
            key_file: self
                .session_key_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH)),
            allow_ephemeral: self.session_allow_ephemeral,
            cookie_secure: self.cookie_secure(),
            same_site,
        })
    }

    pub fn functions(&self) -> Result<Option<FunctionsEndpoint>, SettingsError> {
        let Some(raw) = non_blank(self.functions_url.as_deref()) else {
            return Ok(None);
        };
        let key = non_blank(self.functions_key.as_deref()).ok_or(SettingsError::Incomplete {
            configured: "functions_url",
            missing: "functions_key",
        })?;
        Ok(Some(FunctionsEndpoint {
            url: parse_url("functions_url", raw)?,
            key: key.to_owned(),
        }))
    }

    pub fn auth(&self) -> Result<Option<AuthEndpoint>, SettingsError> {
        let Some(raw) = non_blank(self.auth_url.as_deref()) else {
            return Ok(None);
        };
        let api_key = non_blank(self.auth_api_key.as_deref()).ok_or(SettingsError::Incomplete {
            configured: "auth_url",
            missing: "auth_api_key",
        })?;
        Ok(Some(AuthEndpoint {
            url: parse_url("auth_url", raw)?,
            api_key: api_key.to_owned(),
        }))
    }

    /// Configured admins, or the default development admin.
    pub fn admin_policy(&self) -> Result<AdminPolicy, SettingsError> {
        let configured = self
            .admin_emails
            .iter()
            .flatten()
            .flat_map(|entry| entry.split(','))
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                EmailAddress::new(entry)
                    .map_err(|err| SettingsError::invalid("admin_emails", entry, err))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let policy = AdminPolicy::new(configured);
        if !policy.is_empty() {
            return Ok(policy);
        }
        EmailAddress::new(AdminPolicy::DEFAULT_ADMIN)
            .map(|admin| AdminPolicy::new([admin]))
            .map_err(|err| SettingsError::invalid("admin_emails", AdminPolicy::DEFAULT_ADMIN, err))
    }

    pub fn limit_scope(&self) -> Result<LimitScope, SettingsError> {
        match non_blank(self.limit_scope.as_deref()) {
            Some(raw) => raw
                .parse()
                .map_err(|err| SettingsError::invalid("limit_scope", raw, err)),
            None => Ok(LimitScope::default()),
        }
    }

    /// Claim expiry; unset or zero keeps the seven-day default.
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        match self.claim_validity_days.filter(|days| *days > 0) {
            Some(days) => ExpiryPolicy::new(chrono::Duration::days(i64::from(days))),
            None => ExpiryPolicy::default(),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS))
    }
}

/// Accepts a single string or a list; a lone environment value arrives unsplit.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::One(entry) => vec![entry],
            OneOrMany::Many(entries) => entries,
        }),
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw).map_err(|err| SettingsError::invalid(name, raw, err))
}
