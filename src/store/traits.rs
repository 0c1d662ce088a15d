use std::time::Duration;

use crate::model::Survey;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("database operation timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// The only component that talks to the database.
///
/// Arguments are always bound as parameters, never formatted into `sql`.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// Round-trip to the database, returning the observed latency.
    async fn ping(&self) -> Result<Duration, StoreError>;
    async fn query(&self, sql: &str, args: &[String]) -> Result<Vec<Survey>, StoreError>;
    async fn begin(&self) -> Result<Box<dyn GatewayTransaction>, StoreError>;
}

/// A store transaction bound to one request.
///
/// Dropping it without calling [`GatewayTransaction::commit`] rolls it back.
#[async_trait::async_trait]
pub trait GatewayTransaction: Send {
    async fn query(&mut self, sql: &str, args: &[String]) -> Result<Vec<Survey>, StoreError>;
    /// Returns the number of rows affected.
    async fn execute(&mut self, sql: &str, args: &[String]) -> Result<u64, StoreError>;
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
