//! In-memory [`Gateway`] that replays scripted responses and records every
//! call, for exercising the repository and handlers without PostgreSQL.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::model::Survey;
use crate::store::traits::{Gateway, GatewayTransaction, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Ping,
    Query {
        sql: String,
        args: Vec<String>,
        in_transaction: bool,
    },
    Execute {
        sql: String,
        args: Vec<String>,
    },
    Begin,
    Commit,
    Rollback,
}

#[derive(Debug, Clone)]
pub enum Response {
    Rows(Vec<Survey>),
    Affected(u64),
    Fail,
}

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<Response>,
    calls: Vec<Call>,
    ping_latency: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedGateway {
    script: Arc<Mutex<Script>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ping(self, latency: Duration) -> Self {
        self.script.lock().ping_latency = Some(latency);
        self
    }

    pub fn rows(self, rows: Vec<Survey>) -> Self {
        self.push(Response::Rows(rows))
    }

    pub fn affected(self, count: u64) -> Self {
        self.push(Response::Affected(count))
    }

    pub fn fail(self) -> Self {
        self.push(Response::Fail)
    }

    fn push(self, response: Response) -> Self {
        self.script.lock().responses.push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().calls.clone()
    }

    pub fn pending(&self) -> usize {
        self.script.lock().responses.len()
    }

    pub fn committed(&self) -> bool {
        self.calls().contains(&Call::Commit)
    }

    pub fn executed(&self) -> Vec<(String, Vec<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Execute { sql, args } => Some((sql, args)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.script.lock().calls.push(call);
    }

    fn next_rows(&self, call: Call) -> Result<Vec<Survey>, StoreError> {
        let mut script = self.script.lock();
        script.calls.push(call);
        match script.responses.pop_front() {
            Some(Response::Rows(rows)) => Ok(rows),
            other => Err(unexpected(other)),
        }
    }

    fn next_affected(&self, call: Call) -> Result<u64, StoreError> {
        let mut script = self.script.lock();
        script.calls.push(call);
        match script.responses.pop_front() {
            Some(Response::Affected(count)) => Ok(count),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(response: Option<Response>) -> StoreError {
    let message = match response {
        Some(Response::Fail) => "scripted failure".to_string(),
        Some(other) => format!("unexpected scripted response {:?}", other),
        None => "no scripted response left".to_string(),
    };
    StoreError::Database(sqlx::Error::Protocol(message))
}

#[async_trait::async_trait]
impl Gateway for ScriptedGateway {
    async fn ping(&self) -> Result<Duration, StoreError> {
        let mut script = self.script.lock();
        script.calls.push(Call::Ping);
        script
            .ping_latency
            .ok_or(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn query(&self, sql: &str, args: &[String]) -> Result<Vec<Survey>, StoreError> {
        self.next_rows(Call::Query {
            sql: sql.to_string(),
            args: args.to_vec(),
            in_transaction: false,
        })
    }

    async fn begin(&self) -> Result<Box<dyn GatewayTransaction>, StoreError> {
        self.record(Call::Begin);
        Ok(Box::new(ScriptedTransaction {
            gateway: self.clone(),
            finished: false,
        }))
    }
}

struct ScriptedTransaction {
    gateway: ScriptedGateway,
    finished: bool,
}

#[async_trait::async_trait]
impl GatewayTransaction for ScriptedTransaction {
    async fn query(&mut self, sql: &str, args: &[String]) -> Result<Vec<Survey>, StoreError> {
        self.gateway.next_rows(Call::Query {
            sql: sql.to_string(),
            args: args.to_vec(),
            in_transaction: true,
        })
    }

    async fn execute(&mut self, sql: &str, args: &[String]) -> Result<u64, StoreError> {
        self.gateway.next_affected(Call::Execute {
            sql: sql.to_string(),
            args: args.to_vec(),
        })
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut tx = self;
        tx.finished = true;
        tx.gateway.record(Call::Commit);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        let mut tx = self;
        tx.finished = true;
        tx.gateway.record(Call::Rollback);
        Ok(())
    }
}

impl Drop for ScriptedTransaction {
    fn drop(&mut self) {
        if !self.finished {
            self.gateway.record(Call::Rollback);
        }
    }
}
