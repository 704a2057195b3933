//! # Database Pool Management
//!
//! Connection pool creation and configuration for PostgreSQL.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Database Connection Pool                              │
//! │                                                                         │
//! │  Process Startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::from_env() ← DB_HOST, DB_PORT, DB_NAME, DB_USER, DB_PASS     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Connect once, log failure, no retry      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────┐                              │
//! │  │              PgPool                   │                              │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐      │                              │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...  │  (max_connections)           │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘      │                              │
//! │  └───────────────────────────────────────┘                              │
//! │       │                                                                 │
//! │       │ Each repository call acquires one connection                    │
//! │       │ and returns it when the query finishes                          │
//! │       ▼                                                                 │
//! │  Request 1 ──► Conn1                                                    │
//! │  Request 2 ──► Conn2                                                    │
//! │  Request N ──► waits up to connect_timeout, then PoolExhausted          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::property::PropertyRepository;
use crate::repository::reservation::ReservationRepository;
use crate::repository::user::UserRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("localhost", "lightbnb")
///     .credentials("vagrant", "123")
///     .max_connections(10);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Server host name.
    pub host: String,

    /// Server port.
    /// Default: 5432
    pub port: u16,

    /// Database name.
    pub database: String,

    /// Login role.
    pub user: String,

    /// Login password.
    pub password: Option<String>,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Server-side `statement_timeout`. `None` leaves the server default.
    pub statement_timeout: Option<Duration>,

    /// Whether to run migrations on connect.
    /// Default: false (the schema is usually managed by the web app's setup)
    pub run_migrations: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig::new("localhost", "lightbnb")
    }
}

impl DbConfig {
    /// Creates a configuration for `database` on `host` with default
    /// pool settings.
    pub fn new(host: impl Into<String>, database: impl Into<String>) -> Self {
        DbConfig {
            host: host.into(),
            port: 5432,
            database: database.into(),
            user: "vagrant".to_string(),
            password: None,
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            statement_timeout: None,
            run_migrations: false,
        }
    }

    /// Loads configuration from the process environment.
    ///
    /// ## Variables
    /// | Variable                  | Default     |
    /// |---------------------------|-------------|
    /// | `DB_HOST`                 | `localhost` |
    /// | `DB_PORT`                 | `5432`      |
    /// | `DB_NAME`                 | `lightbnb`  |
    /// | `DB_USER`                 | `vagrant`   |
    /// | `DB_PASS`                 | (none)      |
    /// | `DB_MAX_CONNECTIONS`      | `5`         |
    /// | `DB_CONNECT_TIMEOUT_SECS` | `30`        |
    /// | `DB_STATEMENT_TIMEOUT_MS` | (none)      |
    pub fn from_env() -> DbResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DbConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> DbResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DbConfig::default();

        if let Some(host) = lookup("DB_HOST") {
            config.host = host;
        }
        if let Some(port) = parse_var(&lookup, "DB_PORT")? {
            config.port = port;
        }
        if let Some(database) = lookup("DB_NAME") {
            config.database = database;
        }
        if let Some(user) = lookup("DB_USER") {
            config.user = user;
        }
        config.password = lookup("DB_PASS");

        if let Some(max) = parse_var(&lookup, "DB_MAX_CONNECTIONS")? {
            config.max_connections = max;
        }
        if let Some(secs) = parse_var(&lookup, "DB_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout = Duration::from_secs(secs);
        }
        config.statement_timeout =
            parse_var(&lookup, "DB_STATEMENT_TIMEOUT_MS")?.map(Duration::from_millis);

        Ok(config)
    }

    /// Sets the login role and password.
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = Some(password.into());
        self
    }

    /// Sets the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the server-side statement timeout.
    pub fn statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = Some(timeout);
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Builds the sqlx connect options. The password is never logged.
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user);

        if let Some(password) = &self.password {
            options = options.password(password);
        }

        if let Some(timeout) = self.statement_timeout {
            let millis = timeout.as_millis().to_string();
            options = options.options([("statement_timeout", millis.as_str())]);
        }

        options
    }
}

/// Parses an optional environment value, naming the variable on failure.
fn parse_var<F, T>(lookup: &F, key: &str) -> DbResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DbError::InvalidConfig(key.to_string())),
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cloning is cheap: clones share the same pool. Pass a `Database` (or
/// a bare `PgPool` via [`Database::from_pool`]) to whatever needs it
/// instead of reaching for a global.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::from_env()?).await?;
///
/// let criteria = SearchCriteria::default().city("Vancouver");
/// let listings = db.properties().search(&criteria, ResultLimit::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The PostgreSQL connection pool.
    pool: PgPool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Builds connect options from the config
    /// 2. Opens the pool (the first connection is made eagerly)
    /// 3. Runs migrations (if enabled)
    ///
    /// A failed connection is logged and returned. It is not retried.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            user = %config.user,
            "Initializing database connection"
        );

        let connect_options = config.connect_options();
        debug!("Connection options configured");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to connect to database");
                DbError::ConnectionFailed(e.to_string())
            })?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Wraps an existing pool (tests, or a pool shared with other code).
    pub fn from_pool(pool: PgPool) -> Self {
        Database { pool }
    }

    /// Runs database migrations.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns the user repository.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Returns the reservation repository.
    pub fn reservations(&self) -> ReservationRepository {
        ReservationRepository::new(self.pool.clone())
    }

    /// Returns the property repository.
    pub fn properties(&self) -> PropertyRepository {
        PropertyRepository::new(self.pool.clone())
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations fail with
    /// `DbError::ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
