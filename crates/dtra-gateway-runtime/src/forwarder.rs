use std::sync::Arc;

use async_trait::async_trait;
use dtra_core::Result;
use dtra_metrics::record_radius_exchange;
use dtra_radius::{RadiusClient, RadiusRequest, RadiusResult};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::coordinator::{ExchangeCoordinator, ForwardJob};

/// Performs one RADIUS exchange, bounded by `deadline`
#[async_trait]
pub trait RadiusTransport: Send + Sync + 'static {
    async fn exchange(&self, request: &RadiusRequest, deadline: Instant) -> Result<RadiusResult>;
}

#[async_trait]
impl RadiusTransport for RadiusClient {
    async fn exchange(&self, request: &RadiusRequest, deadline: Instant) -> Result<RadiusResult> {
        RadiusClient::exchange(self, request, deadline).await
    }
}

/// Drains the forwarding queue, one task per job
pub struct RadiusForwarder<T: RadiusTransport> {
    transport: Arc<T>,
    coordinator: Arc<ExchangeCoordinator>,
}

impl<T: RadiusTransport> RadiusForwarder<T> {
    pub fn new(transport: Arc<T>, coordinator: Arc<ExchangeCoordinator>) -> Self {
        Self {
            transport,
            coordinator,
        }
    }

    /// Drain the queue until it closes
    pub async fn run(self, mut jobs: mpsc::Receiver<ForwardJob>) {
        info!("RADIUS forwarder started");
        while let Some(job) = jobs.recv().await {
            let transport = self.transport.clone();
            let coordinator = self.coordinator.clone();
            tokio::spawn(async move {
                forward(transport.as_ref(), &coordinator, job).await;
            });
        }
        info!("Forwarding queue closed, RADIUS forwarder stopped");
    }
}

async fn forward<T: RadiusTransport>(transport: &T, coordinator: &ExchangeCoordinator, job: ForwardJob) {
    let kind = job.request.kind();
    let result = match transport.exchange(&job.request, job.deadline).await {
        Ok(result) => result,
        Err(e) => {
            warn!(key = %job.key, kind, error = %e, "RADIUS exchange failed");
            RadiusResult::Failed(e.to_string())
        }
    };

    debug!(key = %job.key, kind, outcome = result.outcome(), "RADIUS exchange finished");
    record_radius_exchange(kind, result.outcome());
    coordinator.deliver(&job.key, result);
}
