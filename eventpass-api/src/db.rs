//! PostgreSQL Record Store
//!
//! Connection pooling with deadpool-postgres and the [`UserStore`],
//! [`EventStore`] and [`RecordStore`] implementations over it. Every call is
//! bounded by a statement deadline and recorded in the DB metrics. Errors
//! come back as [`StoreError`] categories; raw driver text is only logged.

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use deadpool_postgres::{
    Config, ManagerConfig, Object, Pool, PoolConfig, PoolError, RecyclingMethod, Runtime,
    Timeouts,
};
use eventpass_core::{
    CredentialVerifier, EntityType, Event, ExposeSecret, NewEvent, NewUser, SecretString,
    StoreError, StoreResult, UniqueField, User,
};
use eventpass_storage::{EventStore, RecordStore, Transaction, UserStore};
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row};

use crate::config::env_or;
use crate::error::{ApiError, ApiResult};
use crate::schema::{USERS_EMAIL_KEY, USERS_USERNAME_KEY};
use crate::telemetry::metrics::observe_db;

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug)]
pub struct DbConfig {
    /// Full connection URL; takes precedence over the individual fields
    pub url: Option<SecretString>,
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: SecretString,
    /// Maximum pool size
    pub max_size: usize,
    /// Wait/create/recycle timeout for pooled connections
    pub timeout: Duration,
    /// Upper bound on a single store call
    pub statement_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            dbname: "eventpass".to_string(),
            user: "postgres".to_string(),
            password: SecretString::from(String::new()),
            max_size: 16,
            timeout: Duration::from_secs(30),
            statement_timeout: Duration::from_secs(10),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    ///
    /// `DATABASE_URL` wins over `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(SecretString::from),
            host: std::env::var("DB_HOST").unwrap_or(defaults.host),
            port: env_or("DB_PORT", defaults.port),
            dbname: std::env::var("DB_NAME").unwrap_or(defaults.dbname),
            user: std::env::var("DB_USER").unwrap_or(defaults.user),
            password: std::env::var("DB_PASSWORD")
                .map(SecretString::from)
                .unwrap_or(defaults.password),
            max_size: env_or("EVENTPASS_DB_POOL_SIZE", defaults.max_size),
            timeout: Duration::from_secs(env_or("EVENTPASS_DB_TIMEOUT_SECS", 30)),
            statement_timeout: Duration::from_secs(env_or(
                "EVENTPASS_DB_STATEMENT_TIMEOUT_SECS",
                10,
            )),
        }
    }

    /// Create a connection pool from this configuration.
    ///
    /// No connection is opened here; the first `get()` does that.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        match &self.url {
            Some(url) => cfg.url = Some(url.expose_secret().to_string()),
            None => {
                cfg.host = Some(self.host.clone());
                cfg.port = Some(self.port);
                cfg.dbname = Some(self.dbname.clone());
                cfg.user = Some(self.user.clone());
                cfg.password = Some(self.password.expose_secret().to_string());
            }
        }

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut timeouts = Timeouts::default();
        timeouts.wait = Some(self.timeout);
        timeouts.create = Some(self.timeout);
        timeouts.recycle = Some(self.timeout);
        let mut pool_cfg = PoolConfig::new(self.max_size);
        pool_cfg.timeouts = timeouts;
        cfg.pool = Some(pool_cfg);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// QUERIES
// ============================================================================

const INSERT_USER: &str = "INSERT INTO users \
    (user_id, first_name, last_name, username, email, password_verifier, phone) \
    VALUES ($1, $2, $3, $4, $5, $6, $7)";

const SELECT_USER_BY_ID: &str = "SELECT user_id, first_name, last_name, username, email, \
    password_verifier, phone, created_at FROM users WHERE user_id = $1";

const SELECT_USER_BY_USERNAME: &str = "SELECT user_id, first_name, last_name, username, email, \
    password_verifier, phone, created_at FROM users WHERE username = $1";

const INSERT_EVENT: &str = "INSERT INTO events \
    (event_id, title, description, location, date, start_time, end_time, created_by, total_slots) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)";

const SELECT_EVENT: &str = "SELECT event_id, title, description, location, date, start_time, \
    end_time, created_by, total_slots, created_at FROM events WHERE event_id = $1";

async fn insert_user(client: &Client, user: &NewUser) -> StoreResult<()> {
    client
        .execute(
            INSERT_USER,
            &[
                &user.user_id,
                &user.first_name,
                &user.last_name,
                &user.username,
                &user.email,
                &user.password_verifier.as_str(),
                &user.phone,
            ],
        )
        .await
        .map_err(|e| map_pg_error(EntityType::User, e))?;
    Ok(())
}

async fn select_user(client: &Client, query: &str, key: &str) -> StoreResult<User> {
    let row = client
        .query_opt(query, &[&key])
        .await
        .map_err(|e| map_pg_error(EntityType::User, e))?
        .ok_or_else(|| StoreError::NotFound {
            entity: EntityType::User,
            key: key.to_string(),
        })?;
    row_to_user(&row).map_err(|e| decode_error(EntityType::User, e))
}

async fn insert_event(client: &Client, event: &NewEvent) -> StoreResult<()> {
    client
        .execute(
            INSERT_EVENT,
            &[
                &event.event_id,
                &event.title,
                &event.description,
                &event.location,
                &event.date,
                &event.start_time,
                &event.end_time,
                &event.created_by,
                &event.total_slots,
            ],
        )
        .await
        .map_err(|e| map_pg_error(EntityType::Event, e))?;
    Ok(())
}

async fn select_event(client: &Client, event_id: &str) -> StoreResult<Event> {
    let row = client
        .query_opt(SELECT_EVENT, &[&event_id])
        .await
        .map_err(|e| map_pg_error(EntityType::Event, e))?
        .ok_or_else(|| StoreError::NotFound {
            entity: EntityType::Event,
            key: event_id.to_string(),
        })?;
    row_to_event(&row).map_err(|e| decode_error(EntityType::Event, e))
}

fn row_to_user(row: &Row) -> Result<User, tokio_postgres::Error> {
    Ok(User {
        user_id: row.try_get("user_id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        password_verifier: CredentialVerifier::from_stored(
            row.try_get::<_, String>("password_verifier")?,
        ),
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_event(row: &Row) -> Result<Event, tokio_postgres::Error> {
    Ok(Event {
        event_id: row.try_get("event_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        location: row.try_get("location")?,
        date: row.try_get("date")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        created_by: row.try_get("created_by")?,
        total_slots: row.try_get("total_slots")?,
        created_at: row.try_get("created_at")?,
    })
}

// ============================================================================
// ERROR MAPPING
// ============================================================================

/// Attribute a unique-constraint violation to the field it guards.
fn field_for_constraint(constraint: Option<&str>) -> UniqueField {
    match constraint {
        Some(USERS_USERNAME_KEY) => UniqueField::Username,
        Some(USERS_EMAIL_KEY) => UniqueField::Email,
        Some(name) if name.ends_with("_pkey") => UniqueField::Id,
        _ => UniqueField::Unknown,
    }
}

fn map_pg_error(entity: EntityType, err: tokio_postgres::Error) -> StoreError {
    if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        let field = field_for_constraint(err.as_db_error().and_then(|db| db.constraint()));
        return StoreError::Conflict { entity, field };
    }
    map_client_error(err)
}

/// Map a driver error that cannot be a uniqueness conflict.
fn map_client_error(err: tokio_postgres::Error) -> StoreError {
    if let Some(db_err) = err.as_db_error() {
        tracing::error!(
            code = ?db_err.code(),
            message = %db_err.message(),
            "Database error"
        );
        return StoreError::Backend {
            reason: db_err.message().to_string(),
        };
    }
    tracing::warn!(error = %err, "Database connection failure");
    StoreError::Unavailable {
        reason: err.to_string(),
    }
}

fn map_pool_error(err: PoolError) -> StoreError {
    match err {
        PoolError::Timeout(_) => StoreError::Timeout {
            operation: "acquire connection".to_string(),
        },
        other => {
            tracing::warn!(error = %other, "Connection pool failure");
            StoreError::Unavailable {
                reason: other.to_string(),
            }
        }
    }
}

fn decode_error(entity: EntityType, err: tokio_postgres::Error) -> StoreError {
    tracing::error!(entity = %entity, error = %err, "Failed to decode row");
    StoreError::Backend {
        reason: format!("malformed {} row", entity),
    }
}

fn transaction_finished() -> StoreError {
    StoreError::Backend {
        reason: "transaction already finished".to_string(),
    }
}

/// Run a store call under `limit`, recording its outcome.
async fn with_deadline<T, F>(operation: &str, limit: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    let start = Instant::now();
    let result = match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            operation: operation.to_string(),
        }),
    };
    let healthy = match &result {
        Ok(_) => true,
        Err(e) => !(e.is_connectivity() || matches!(e, StoreError::Backend { .. })),
    };
    observe_db(operation, healthy, start.elapsed());
    result
}

// ============================================================================
// POOLED STORE
// ============================================================================

/// Pooled PostgreSQL store. Each direct call checks out its own connection
/// and runs in autocommit mode.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
    statement_timeout: Duration,
}

impl PgStore {
    /// Create a new store with the given pool.
    pub fn new(pool: Pool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    /// Create a new store from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool, config.statement_timeout))
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Health check - verifies database connectivity.
    pub async fn health_check(&self) -> ApiResult<()> {
        let conn = self.pool.get().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    async fn conn(&self) -> StoreResult<Object> {
        self.pool.get().await.map_err(map_pool_error)
    }
}

impl std::fmt::Debug for PgStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStore")
            .field("pool_size", &self.pool.status().size)
            .field("statement_timeout", &self.statement_timeout)
            .finish()
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: &NewUser) -> StoreResult<()> {
        with_deadline("create_user", self.statement_timeout, async {
            let conn = self.conn().await?;
            insert_user(&conn, user).await
        })
        .await
    }

    async fn get_user(&self, user_id: &str) -> StoreResult<User> {
        with_deadline("get_user", self.statement_timeout, async {
            let conn = self.conn().await?;
            select_user(&conn, SELECT_USER_BY_ID, user_id).await
        })
        .await
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<User> {
        with_deadline("get_user_by_username", self.statement_timeout, async {
            let conn = self.conn().await?;
            select_user(&conn, SELECT_USER_BY_USERNAME, username).await
        })
        .await
    }
}

#[async_trait]
impl EventStore for PgStore {
    async fn create_event(&self, event: &NewEvent) -> StoreResult<()> {
        with_deadline("create_event", self.statement_timeout, async {
            let conn = self.conn().await?;
            insert_event(&conn, event).await
        })
        .await
    }

    async fn get_event(&self, event_id: &str) -> StoreResult<Event> {
        with_deadline("get_event", self.statement_timeout, async {
            let conn = self.conn().await?;
            select_event(&conn, event_id).await
        })
        .await
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn Transaction>> {
        let limit = self.statement_timeout;
        let conn = with_deadline("begin", limit, async {
            let conn = self.conn().await?;
            conn.batch_execute("BEGIN").await.map_err(map_client_error)?;
            Ok(conn)
        })
        .await?;

        Ok(Box::new(PgTransaction {
            conn: Some(conn),
            statement_timeout: limit,
        }))
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// One pooled connection held inside `BEGIN ... COMMIT`.
///
/// A connection whose transaction state is unknown (dropped handle, failed
/// COMMIT) is detached from the pool instead of being recycled; closing it
/// makes the server abort the open transaction.
pub struct PgTransaction {
    conn: Option<Object>,
    statement_timeout: Duration,
}

impl PgTransaction {
    fn client(&self) -> StoreResult<&Object> {
        self.conn.as_ref().ok_or_else(transaction_finished)
    }

    async fn finish(mut self: Box<Self>, statement: &'static str) -> StoreResult<()> {
        let conn = self.conn.take().ok_or_else(transaction_finished)?;
        let operation = statement.to_ascii_lowercase();
        let result = with_deadline(&operation, self.statement_timeout, async {
            conn.batch_execute(statement)
                .await
                .map_err(map_client_error)
        })
        .await;

        if result.is_err() {
            drop(Object::take(conn));
        }
        result
    }
}

#[async_trait]
impl UserStore for PgTransaction {
    async fn create_user(&self, user: &NewUser) -> StoreResult<()> {
        with_deadline("tx_create_user", self.statement_timeout, async {
            insert_user(self.client()?, user).await
        })
        .await
    }

    async fn get_user(&self, user_id: &str) -> StoreResult<User> {
        with_deadline("tx_get_user", self.statement_timeout, async {
            select_user(self.client()?, SELECT_USER_BY_ID, user_id).await
        })
        .await
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<User> {
        with_deadline("tx_get_user_by_username", self.statement_timeout, async {
            select_user(self.client()?, SELECT_USER_BY_USERNAME, username).await
        })
        .await
    }
}

#[async_trait]
impl EventStore for PgTransaction {
    async fn create_event(&self, event: &NewEvent) -> StoreResult<()> {
        with_deadline("tx_create_event", self.statement_timeout, async {
            insert_event(self.client()?, event).await
        })
        .await
    }

    async fn get_event(&self, event_id: &str) -> StoreResult<Event> {
        with_deadline("tx_get_event", self.statement_timeout, async {
            select_event(self.client()?, event_id).await
        })
        .await
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.finish("COMMIT").await
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.finish("ROLLBACK").await
    }
}

impl Drop for PgTransaction {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::warn!("Transaction dropped before commit or rollback, discarding connection");
            drop(Object::take(conn));
        }
    }
}
