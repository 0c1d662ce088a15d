use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::{Query, QueryAs};
use sqlx::{Connection, PgPool, Postgres};

use crate::model::Survey;
use crate::store::traits::{Gateway, GatewayTransaction, StoreError};

#[derive(Debug, Clone)]
pub struct PostgresGateway {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresGateway {
    /// Open a pool and check that the database answers.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let pool = bounded(
            timeout,
            PgPoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(timeout)
                .connect(database_url),
        )
        .await
        .context("Failed to create PostgreSQL connection pool")?;

        let gateway = Self::from_pool(pool, timeout);
        gateway.ping().await.context("Database ping failed")?;
        Ok(gateway)
    }

    pub fn from_pool(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl Gateway for PostgresGateway {
    async fn ping(&self) -> Result<Duration, StoreError> {
        let start = Instant::now();
        bounded(self.timeout, async {
            let mut conn = self.pool.acquire().await?;
            conn.ping().await
        })
        .await?;
        Ok(start.elapsed())
    }

    async fn query(&self, sql: &str, args: &[String]) -> Result<Vec<Survey>, StoreError> {
        bounded(self.timeout, bind_rows(sql, args).fetch_all(&self.pool)).await
    }

    async fn begin(&self) -> Result<Box<dyn GatewayTransaction>, StoreError> {
        let tx = bounded(self.timeout, self.pool.begin()).await?;
        Ok(Box::new(PostgresTransaction {
            tx,
            timeout: self.timeout,
        }))
    }
}

pub struct PostgresTransaction {
    tx: sqlx::Transaction<'static, Postgres>,
    timeout: Duration,
}

#[async_trait::async_trait]
impl GatewayTransaction for PostgresTransaction {
    async fn query(&mut self, sql: &str, args: &[String]) -> Result<Vec<Survey>, StoreError> {
        bounded(self.timeout, bind_rows(sql, args).fetch_all(&mut *self.tx)).await
    }

    async fn execute(&mut self, sql: &str, args: &[String]) -> Result<u64, StoreError> {
        let result = bounded(self.timeout, bind_exec(sql, args).execute(&mut *self.tx)).await?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let PostgresTransaction { tx, timeout } = *self;
        bounded(timeout, tx.commit()).await
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        let PostgresTransaction { tx, timeout } = *self;
        bounded(timeout, tx.rollback()).await
    }
}

async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| StoreError::Timeout(timeout))?
        .map_err(StoreError::from)
}

fn bind_rows<'q>(sql: &'q str, args: &'q [String]) -> QueryAs<'q, Postgres, Survey, PgArguments> {
    args.iter()
        .fold(sqlx::query_as::<_, Survey>(sql), |query, arg| query.bind(arg.as_str()))
}

fn bind_exec<'q>(sql: &'q str, args: &'q [String]) -> Query<'q, Postgres, PgArguments> {
    args.iter()
        .fold(sqlx::query(sql), |query, arg| query.bind(arg.as_str()))
}
