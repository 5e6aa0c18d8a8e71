//! Session cookie settings.
//!
//! Turns the session toggles from [`crate::settings::AppSettings`] into a
//! signing key and cookie policy. Debug builds tolerate a missing key file
//! and fall back to an ephemeral key; release builds do not unless
//! explicitly allowed.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zeroize::Zeroize;

pub const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// # Examples
    ///
    /// ```rust
    /// use tastetrail::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session toggles as configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToggles {
    pub key_file: PathBuf,
    pub allow_ephemeral: bool,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Validated session settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SameSite=None requires secure session cookies")]
    InsecureSameSiteNone,
    #[error("ephemeral session keys are not allowed in release builds")]
    EphemeralNotAllowed,
    #[error("unknown SameSite policy {0:?}; expected Strict, Lax or None")]
    UnknownSameSite(String),
}

/// Parse a `SameSite` policy name, case-insensitively.
pub fn parse_same_site(raw: &str) -> Result<SameSite, SessionConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" => Ok(SameSite::None),
        _ => Err(SessionConfigError::UnknownSameSite(raw.to_owned())),
    }
}

/// Validate the toggles and load the signing key.
///
/// # Errors
///
/// Release builds reject ephemeral keys, short keys, unreadable key files,
/// and `SameSite=None` without secure cookies.
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if toggles.allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    if toggles.same_site == SameSite::None && !toggles.cookie_secure {
        if mode.is_debug() {
            warn!("SameSite=None without secure cookies; browsers may reject the session");
        } else {
            return Err(SessionConfigError::InsecureSameSiteNone);
        }
    }
    let key = load_key(&toggles.key_file, mode, toggles.allow_ephemeral)?;
    info!(fingerprint = %key_fingerprint(&key), "session key loaded");
    Ok(SessionSettings {
        key,
        cookie_secure: toggles.cookie_secure,
        same_site: toggles.same_site,
    })
}

fn load_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match read_key_bytes(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_key_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "key path has no file name")
    })?;
    Dir::open_ambient_dir(parent, ambient_authority())?.read(name)
}

/// First eight bytes of the SHA-256 of the signing key, hex encoded.
///
/// Safe to log; identifies which key is active.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn key_file(len: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp key file");
        file.write_all(&vec![b'k'; len]).expect("write key");
        file
    }

    fn toggles(key_file: PathBuf) -> SessionToggles {
        SessionToggles {
            key_file,
            allow_ephemeral: false,
            cookie_secure: true,
            same_site: SameSite::Strict,
        }
    }

    #[rstest]
    #[case::debug(BuildMode::Debug)]
    #[case::release(BuildMode::Release)]
    fn key_file_is_derived_deterministically(#[case] mode: BuildMode) {
        let file = key_file(SESSION_KEY_MIN_LEN);
        let first = session_settings(&toggles(file.path().to_path_buf()), mode).expect("settings");
        let second =
            session_settings(&toggles(file.path().to_path_buf()), mode).expect("settings");
        assert_eq!(key_fingerprint(&first.key), key_fingerprint(&second.key));
        assert!(first.cookie_secure);
    }

    #[rstest]
    fn release_rejects_short_keys() {
        let file = key_file(16);
        let err = session_settings(&toggles(file.path().to_path_buf()), BuildMode::Release)
            .err()
            .expect("short key rejected");
        assert!(matches!(err, SessionConfigError::KeyTooShort { length: 16, .. }));
    }

    #[rstest]
    fn missing_key_falls_back_in_debug_only() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent");
        assert!(session_settings(&toggles(missing.clone()), BuildMode::Debug).is_ok());
        let err = session_settings(&toggles(missing), BuildMode::Release)
            .err()
            .expect("missing key rejected");
        assert!(matches!(err, SessionConfigError::KeyRead { .. }));
    }

    #[rstest]
    fn release_rejects_ephemeral_keys() {
        let file = key_file(SESSION_KEY_MIN_LEN);
        let mut config = toggles(file.path().to_path_buf());
        config.allow_ephemeral = true;
        let err = session_settings(&config, BuildMode::Release)
            .err()
            .expect("ephemeral rejected");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    fn release_rejects_insecure_same_site_none() {
        let file = key_file(SESSION_KEY_MIN_LEN);
        let mut config = toggles(file.path().to_path_buf());
        config.cookie_secure = false;
        config.same_site = SameSite::None;
        let err = session_settings(&config, BuildMode::Release)
            .err()
            .expect("insecure None rejected");
        assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
        assert!(session_settings(&config, BuildMode::Debug).is_ok());
    }

    #[rstest]
    #[case::strict("Strict", SameSite::Strict)]
    #[case::lax(" lax ", SameSite::Lax)]
    #[case::none("NONE", SameSite::None)]
    fn same_site_names_parse(#[case] raw: &str, #[case] expected: SameSite) {
        assert_eq!(parse_same_site(raw).expect("known policy"), expected);
    }

    #[rstest]
    fn fingerprint_is_short_lowercase_hex() {
        let fingerprint = key_fingerprint(&Key::generate());
        assert_eq!(fingerprint.len(), FINGERPRINT_BYTES * 2);
        assert!(
            fingerprint
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }
}
