//! Application state shared across handlers.

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::ExposeSecret;
use sqlx::SqlitePool;

use crate::config::ServerConfig;
use crate::services::metals::MetalsClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: SqlitePool,
    metals: MetalsClient,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Token signing keys are derived from the configured JWT secret once,
    /// here, so handlers never touch the raw secret.
    #[must_use]
    pub fn new(config: ServerConfig, pool: SqlitePool) -> Self {
        let metals = MetalsClient::new(&config.metals);
        let secret = config.jwt_secret.expose_secret().as_bytes();
        let encoding_key = EncodingKey::from_secret(secret);
        let decoding_key = DecodingKey::from_secret(secret);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                metals,
                encoding_key,
                decoding_key,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the metals spot-price client.
    #[must_use]
    pub fn metals(&self) -> &MetalsClient {
        &self.inner.metals
    }

    /// Get the key used to sign bearer tokens.
    #[must_use]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Get the key used to verify bearer tokens.
    #[must_use]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }
}
