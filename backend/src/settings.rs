//! Server configuration loaded via OrthoConfig.
//!
//! Values come from `STOREFRONT_*` environment variables, an optional
//! configuration file and CLI flags, in increasing precedence.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::paystack::DEFAULT_PAYSTACK_BASE_URL;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_KEY_PATH: &str = "/var/run/secrets/session_key";
const DEFAULT_SESSION_TTL_HOURS: i64 = 720;
const DEFAULT_PAYSTACK_TIMEOUT_SECS: u64 = 10;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Runtime settings for the storefront server.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STOREFRONT")]
pub struct StorefrontSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL; without it the server runs on in-memory adapters.
    pub database_url: Option<String>,
    /// Apply embedded migrations at startup.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// File holding the cookie signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark session cookies `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// `SameSite` policy: `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// Rolling session lifetime in hours.
    pub session_ttl_hours: Option<i64>,
    /// Paystack secret key; verification is refused when unset.
    pub paystack_secret_key: Option<String>,
    /// Paystack API base URL.
    pub paystack_base_url: Option<String>,
    /// Paystack request timeout in seconds.
    pub paystack_timeout_secs: Option<u64>,
}

impl std::fmt::Debug for StorefrontSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontSettings")
            .field("bind_addr", &self.bind_addr())
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("run_migrations", &self.run_migrations)
            .field("pool_max_size", &self.pool_max_size())
            .field("session_key_file", &self.session_key_file())
            .field("session_allow_ephemeral", &self.session_allow_ephemeral)
            .field("cookie_secure", &self.cookie_secure)
            .field("session_same_site", &self.session_same_site)
            .field("session_ttl_hours", &self.session_ttl_hours())
            .field(
                "paystack_secret_key",
                &self.paystack_secret_key.as_ref().map(|_| "<redacted>"),
            )
            .field("paystack_base_url", &self.paystack_base_url())
            .field("paystack_timeout", &self.paystack_timeout())
            .finish()
    }
}

impl StorefrontSettings {
    /// Listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Non-blank database URL, if configured.
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_PATH))
    }

    pub fn session_ttl_hours(&self) -> i64 {
        self.session_ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS)
    }

    /// Non-blank Paystack secret key, if configured.
    pub fn paystack_secret_key(&self) -> Option<&str> {
        non_blank(self.paystack_secret_key.as_deref())
    }

    pub fn paystack_base_url(&self) -> &str {
        non_blank(self.paystack_base_url.as_deref()).unwrap_or(DEFAULT_PAYSTACK_BASE_URL)
    }

    pub fn paystack_timeout(&self) -> Duration {
        Duration::from_secs(
            self.paystack_timeout_secs
                .unwrap_or(DEFAULT_PAYSTACK_TIMEOUT_SECS),
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
