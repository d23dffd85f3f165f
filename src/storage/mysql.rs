//! MySQL storage
//!
//! Holds the connection pool and executes [`BoundQuery`]s against it, every execution goes
//! through the [`RetryPolicy`]

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::Arguments;
use sqlx::FromRow;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlArguments;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::mysql::MySqlDatabaseError;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::mysql::MySqlRow;

use crate::countries::Country;
use crate::destinations::Destination;
use crate::destinations::DestinationRow;
use crate::utils::env_lookup;
use crate::utils::parse_var_or;

use super::CreateDestinationValues;
use super::Error;
use super::ListingQuery;
use super::Result;
use super::RetryPolicy;
use super::Storage;
use super::UpdateDestinationValues;
use super::query;
use super::query::BoundQuery;
use super::query::Param;

/// MySQL error numbers worth another attempt
///
/// Lock wait timeout, deadlock, server gone away
const RETRYABLE_ERROR_NUMBERS: [u16; 3] = [1205, 1213, 2006];

/// Lost connection during query, the statement may have run
const LOST_CONNECTION_ERROR_NUMBER: u16 = 2013;

/// Database configuration
pub enum Config {
    /// Detect configuration from environment
    DetectConfig,

    /// Use existing connection
    ExistingConnection(MySqlPool),
}

/// Pool settings as read from the environment
#[derive(Debug)]
struct PoolSettings {
    /// Maximum connections checked out at the same time
    connection_limit: u32,

    /// How long a caller waits for a free connection
    acquire_timeout: Duration,

    /// How long the initial connect may take
    connect_timeout: Duration,
}

impl PoolSettings {
    fn from_lookup<L>(lookup: L) -> anyhow::Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            connection_limit: parse_var_or(&lookup, "DB_CONNECTION_LIMIT", 10)?,
            acquire_timeout: Duration::from_secs(parse_var_or(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                10,
            )?),
            connect_timeout: Duration::from_secs(parse_var_or(
                &lookup,
                "DB_CONNECT_TIMEOUT_SECS",
                10,
            )?),
        })
    }
}

/// Where to connect to
///
/// `DATABASE_URL` wins, otherwise the separate `DB_*` variables are used
fn connect_options<L>(lookup: L) -> anyhow::Result<MySqlConnectOptions>
where
    L: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

    if let Some(url) = var("DATABASE_URL") {
        return MySqlConnectOptions::from_str(&url).context("Invalid `DATABASE_URL`");
    }

    Ok(MySqlConnectOptions::new()
        .host(&var("DB_HOST").unwrap_or_else(|| String::from("localhost")))
        .port(parse_var_or(&lookup, "DB_PORT", 3306)?)
        .username(&var("DB_USER").unwrap_or_else(|| String::from("root")))
        .password(&var("DB_PASSWORD").unwrap_or_default())
        .database(&var("DB_NAME").unwrap_or_else(|| String::from("hotel_catalog"))))
}

/// Metadata of a write statement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Execution {
    /// Rows touched by the statement
    pub rows_affected: u64,

    /// ID generated by an insert, 0 otherwise
    pub last_insert_id: u64,
}

/// MySQL storage
#[derive(Clone)]
pub struct Database {
    /// Pool of connections
    connection_pool: MySqlPool,

    /// Retry behavior for every statement
    retry: RetryPolicy,
}

impl Database {
    /// Create a new MySQL storage
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        match config {
            Config::DetectConfig => Self::new().await,
            Config::ExistingConnection(pool) => Ok(Self::new_with_pool(pool)),
        }
    }

    /// Create MySQL storage from the environment
    async fn new() -> anyhow::Result<Self> {
        let settings = PoolSettings::from_lookup(env_lookup)?;
        let options = connect_options(env_lookup)?;

        tracing::debug!("Connecting to database with {settings:?}");

        let connect = MySqlPoolOptions::new()
            .max_connections(settings.connection_limit)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options);

        let connection_pool = tokio::time::timeout(settings.connect_timeout, connect)
            .await
            .context("Timed out connecting to the database")?
            .context("Could not connect to the database")?;

        Ok(Self::new_with_pool(connection_pool))
    }

    /// Create MySQL storage with existing pool
    fn new_with_pool(connection_pool: MySqlPool) -> Self {
        Self {
            connection_pool,
            retry: RetryPolicy::default(),
        }
    }

    /// Close the pool, waits for checked-out connections to be returned
    pub async fn close(&self) {
        self.connection_pool.close().await;
    }

    /// Fetch all rows of a statement
    pub async fn fetch_all<T>(&self, query: &BoundQuery) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin + 'static,
    {
        query.validate()?;
        log_statement(query);

        let pool = &self.connection_pool;
        self.retry
            .run(move || async move {
                sqlx::query_as_with::<_, T, _>(&query.sql, arguments(&query.params)?)
                    .fetch_all(pool)
                    .await
                    .map_err(Error::from)
            })
            .await
    }

    /// Fetch the single number a statement selects
    pub async fn fetch_count(&self, query: &BoundQuery) -> Result<i64> {
        query.validate()?;
        log_statement(query);

        let pool = &self.connection_pool;
        self.retry
            .run(move || async move {
                sqlx::query_scalar_with::<_, i64, _>(&query.sql, arguments(&query.params)?)
                    .fetch_one(pool)
                    .await
                    .map_err(Error::from)
            })
            .await
    }

    /// Execute a write statement that can safely run twice
    pub async fn execute(&self, query: &BoundQuery) -> Result<Execution> {
        self.execute_when(query, Error::is_transient).await
    }

    /// Execute an insert
    ///
    /// A connection lost while the insert was in flight is not retried: the row may already
    /// exist, and a second attempt would duplicate it. The error goes back to the caller instead.
    pub async fn insert(&self, query: &BoundQuery) -> Result<Execution> {
        self.execute_when(query, |err| err.is_transient() && !err.may_have_applied())
            .await
    }

    async fn execute_when<R>(&self, query: &BoundQuery, retryable: R) -> Result<Execution>
    where
        R: Fn(&Error) -> bool,
    {
        query.validate()?;
        log_statement(query);

        let pool = &self.connection_pool;
        self.retry
            .run_when(
                move || async move {
                    sqlx::query_with(&query.sql, arguments(&query.params)?)
                        .execute(pool)
                        .await
                        .map(|result| Execution {
                            rows_affected: result.rows_affected(),
                            last_insert_id: result.last_insert_id(),
                        })
                        .map_err(Error::from)
                },
                retryable,
            )
            .await
    }
}

#[async_trait]
impl Storage for Database {
    async fn find_destinations(&self, listing: &ListingQuery) -> Result<Vec<DestinationRow>> {
        self.fetch_all(&listing.rows()).await
    }

    async fn count_destinations(&self, listing: &ListingQuery) -> Result<i64> {
        self.fetch_count(&listing.count()).await
    }

    async fn find_destination_by_id(&self, id: i64) -> Result<Vec<Destination>> {
        self.fetch_all(&query::find_destination(id)).await
    }

    async fn find_all_countries(&self) -> Result<Vec<Country>> {
        self.fetch_all(&query::list_countries()).await
    }

    async fn create_destination(&self, values: &CreateDestinationValues<'_>) -> Result<i64> {
        let execution = self.insert(&query::insert_destination(values)).await?;

        i64::try_from(execution.last_insert_id).map_err(|err| Error::Query(err.to_string()))
    }

    async fn update_destination(&self, values: &UpdateDestinationValues<'_>) -> Result<()> {
        let execution = self.execute(&query::update_destination(values)).await?;

        if execution.rows_affected == 0 {
            tracing::debug!("Update of destination {} matched no rows", values.id);
        }

        Ok(())
    }

    async fn delete_destination(&self, id: i64) -> Result<()> {
        let execution = self.execute(&query::delete_destination(id)).await?;

        if execution.rows_affected == 0 {
            tracing::debug!("Delete of destination {id} matched no rows");
        }

        Ok(())
    }
}

fn log_statement(query: &BoundQuery) {
    tracing::trace!(
        "Executing statement with {} parameters: {}",
        query.params.len(),
        query.sql
    );
}

/// Bind all parameters, in order
fn arguments(params: &[Param]) -> Result<MySqlArguments> {
    let mut arguments = MySqlArguments::default();

    for param in params {
        let added = match param {
            Param::Text(value) => arguments.add(value.clone()),
            Param::Int(value) => arguments.add(*value),
            Param::Unsigned(value) => arguments.add(*value),
        };

        added.map_err(|err| Error::Query(err.to_string()))?;
    }

    Ok(arguments)
}

/// How a failed statement should be treated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Failure {
    /// Never reached the server, or rejected in a way that clears up
    Retryable,

    /// Connection lost mid-statement
    Interrupted,

    /// Retrying will not help
    Permanent,
}

fn classify_error_number(number: u16) -> Failure {
    if number == LOST_CONNECTION_ERROR_NUMBER {
        Failure::Interrupted
    } else if RETRYABLE_ERROR_NUMBERS.contains(&number) {
        Failure::Retryable
    } else {
        Failure::Permanent
    }
}

fn classify(err: &sqlx::Error) -> Failure {
    match err {
        sqlx::Error::Io(_) => Failure::Interrupted,
        sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut | sqlx::Error::WorkerCrashed => {
            Failure::Retryable
        }
        sqlx::Error::Database(database_error) => database_error
            .try_downcast_ref::<MySqlDatabaseError>()
            .map_or(Failure::Permanent, |error| {
                classify_error_number(error.number())
            }),
        _ => Failure::Permanent,
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match classify(&err) {
            Failure::Retryable => Self::Connection(err.to_string()),
            Failure::Interrupted => Self::Interrupted(err.to_string()),
            Failure::Permanent => Self::Query(err.to_string()),
        }
    }
}
