use std::sync::Arc;
use std::time::Duration;

use crate::model::HealthStatus;
use crate::store::Gateway;

/// Reports database reachability and the broker placeholder.
pub struct HealthReporter<G: Gateway> {
    gateway: Option<Arc<G>>,
    broker_status: String,
}

impl<G: Gateway> HealthReporter<G> {
    pub fn new(gateway: Option<Arc<G>>, broker_status: impl Into<String>) -> Self {
        Self {
            gateway,
            broker_status: broker_status.into(),
        }
    }

    pub async fn report(&self) -> HealthStatus {
        let database = match &self.gateway {
            Some(gateway) => match gateway.ping().await {
                Ok(latency) => format!("UP {}", format_latency(latency)),
                Err(_) => "DOWN".to_string(),
            },
            None => "DOWN".to_string(),
        };

        // No live broker check yet; the configured value is reported as-is.
        HealthStatus {
            database,
            rabbitmq: self.broker_status.clone(),
        }
    }
}

/// Latency truncated to whole milliseconds, e.g. `100ms`.
fn format_latency(latency: Duration) -> String {
    format!("{}ms", latency.as_millis())
}
