pub mod queries;

use std::str::FromStr;

use secrecy::ExposeSecret;
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use queries::categories::Category;
pub use queries::questions::Question;

use crate::configuration::DatabaseSettings;

/// Failure kinds surfaced by the query functions.
///
/// Handlers match on these instead of collapsing every failure into one status.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("row not found")]
    NotFound,
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error(transparent)]
    Backend(sqlx::Error),
}

impl From<sqlx::Error> for QueryError {
    fn from(error: sqlx::Error) -> Self {
        let constraint = match &error {
            sqlx::Error::RowNotFound => return QueryError::NotFound,
            sqlx::Error::Database(db_error) if !matches!(db_error.kind(), ErrorKind::Other) => {
                Some(db_error.message().to_owned())
            }
            _ => None,
        };
        match constraint {
            Some(message) => QueryError::Constraint(message),
            None => QueryError::Backend(error),
        }
    }
}

pub type QueryResult<T> = Result<T, QueryError>;

pub async fn establish_connection(settings: &DatabaseSettings) -> Result<SqlitePool, sqlx::Error> {
    let options =
        SqliteConnectOptions::from_str(settings.url.expose_secret())?.create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // a single connection that never recycles, otherwise the in-memory database vanishes
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_row_maps_to_not_found() {
        assert!(matches!(
            QueryError::from(sqlx::Error::RowNotFound),
            QueryError::NotFound
        ));
    }

    #[test]
    fn pool_errors_map_to_backend() {
        assert!(matches!(
            QueryError::from(sqlx::Error::PoolTimedOut),
            QueryError::Backend(_)
        ));
    }

    #[tokio::test]
    async fn not_null_violation_maps_to_constraint() {
        let pool = memory_pool().await;

        let error = sqlx::query("INSERT INTO questions (question, answer) VALUES (NULL, 'x')")
            .execute(&pool)
            .await
            .unwrap_err();

        assert!(matches!(QueryError::from(error), QueryError::Constraint(_)));
    }
}
