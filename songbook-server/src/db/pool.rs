//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. Every connection is
//! opened with a server-side `statement_timeout` equal to the operation
//! deadline, so a statement abandoned by its caller is also cancelled by
//! PostgreSQL.

use std::str::FromStr;
use std::time::Duration;

use songbook_core::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

/// How long to wait for a free connection before giving up.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Build connect options from configuration.
///
/// A configured URL wins; otherwise the discrete host/port/user fields are
/// used together with the password taken from the environment.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let options = match &config.url {
        Some(url) => PgConnectOptions::from_str(url)?,
        None => {
            let mut options = PgConnectOptions::new()
                .host(&config.host)
                .port(config.port)
                .username(&config.username)
                .database(&config.dbname)
                .ssl_mode(PgSslMode::from_str(&config.sslmode)?);
            if let Some(password) = &config.password {
                options = options.password(password);
            }
            options
        }
    };

    let timeout_ms = config.operation_timeout().as_millis().to_string();
    Ok(options.options([("statement_timeout", timeout_ms)]))
}

/// Create a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if the options are invalid or the connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&config.database).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(connect_options(config)?, config.max_connections).await
}

/// Create a PostgreSQL connection pool with custom options.
pub async fn create_pool_with_options(
    options: PgConnectOptions,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await
}
