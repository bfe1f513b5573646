use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dtra_core::{GatewayError, Result};
use dtra_metrics::{
    EXCHANGES_IN_FLIGHT, EXCHANGE_LATENCY_SECONDS, EXCHANGE_TIMEOUTS_TOTAL, LATE_RESULTS_TOTAL,
};
use dtra_radius::{RadiusRequest, RadiusResult};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Identity of one exchange: the Diameter Session-Id plus a serial that keeps
/// concurrent requests of the same session apart
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExchangeKey {
    pub session_id: String,
    pub serial: u64,
}

impl fmt::Display for ExchangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.session_id, self.serial)
    }
}

/// Unit of work for the forwarder
#[derive(Debug)]
pub struct ForwardJob {
    pub key: ExchangeKey,
    pub request: RadiusRequest,
    pub deadline: Instant,
}

/// How an exchange ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Resolved(RadiusResult),
    TimedOut,
}

type Registry = DashMap<ExchangeKey, oneshot::Sender<RadiusResult>>;

/// A submitted exchange awaiting its result.
///
/// Dropping it without waiting releases the registry entry.
#[derive(Debug)]
pub struct Exchange {
    key: ExchangeKey,
    started: Instant,
    deadline: Instant,
    result: oneshot::Receiver<RadiusResult>,
    registry: Arc<Registry>,
}

impl Exchange {
    pub fn key(&self) -> &ExchangeKey {
        &self.key
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl Drop for Exchange {
    fn drop(&mut self) {
        if self.registry.remove(&self.key).is_some() {
            EXCHANGES_IN_FLIGHT.dec();
        }
    }
}

/// Pairs each forwarded RADIUS request with the task waiting for its result.
///
/// Entries are keyed, so a result can only ever reach the exchange it was
/// requested under. Removal from the registry is the single point where
/// delivery and timeout race; whichever removes the entry owns the outcome.
pub struct ExchangeCoordinator {
    registry: Arc<Registry>,
    queue: mpsc::Sender<ForwardJob>,
    serial: AtomicU64,
    timeout: Duration,
}

impl ExchangeCoordinator {
    /// Create a coordinator and the receiving end of its forwarding queue
    pub fn new(queue_capacity: usize, timeout: Duration) -> (Self, mpsc::Receiver<ForwardJob>) {
        let (queue, jobs) = mpsc::channel(queue_capacity);
        let coordinator = Self {
            registry: Arc::new(DashMap::new()),
            queue,
            serial: AtomicU64::new(0),
            timeout,
        };
        (coordinator, jobs)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Register an exchange and queue its RADIUS request.
    /// Waits for queue capacity when the forwarder is behind.
    pub async fn submit(&self, session_id: &str, request: RadiusRequest) -> Result<Exchange> {
        let key = ExchangeKey {
            session_id: session_id.to_string(),
            serial: self.serial.fetch_add(1, Ordering::Relaxed),
        };
        let (tx, rx) = oneshot::channel();
        self.registry.insert(key.clone(), tx);
        EXCHANGES_IN_FLIGHT.inc();

        let started = Instant::now();
        let exchange = Exchange {
            key: key.clone(),
            started,
            deadline: started + self.timeout,
            result: rx,
            registry: self.registry.clone(),
        };

        let job = ForwardJob {
            key,
            request,
            deadline: exchange.deadline,
        };
        // On failure `exchange` is dropped here, releasing the entry
        self.queue
            .send(job)
            .await
            .map_err(|_| GatewayError::QueueClosed)?;

        debug!(key = %exchange.key, "Exchange submitted");
        Ok(exchange)
    }

    /// Wait up to `timeout` for the exchange's result, and never past the
    /// deadline the forwarder was given at submit
    pub async fn wait(&self, mut exchange: Exchange, timeout: Duration) -> ExchangeOutcome {
        let until = exchange.deadline.min(Instant::now() + timeout);
        let outcome = match tokio::time::timeout_at(until, &mut exchange.result).await {
            Ok(Ok(result)) => ExchangeOutcome::Resolved(result),
            Ok(Err(_)) => ExchangeOutcome::TimedOut,
            Err(_) => {
                if self.registry.remove(&exchange.key).is_some() {
                    EXCHANGES_IN_FLIGHT.dec();
                    EXCHANGE_TIMEOUTS_TOTAL.inc();
                    let e = GatewayError::CorrelationTimeout(timeout.as_millis() as u64);
                    warn!(key = %exchange.key, error = %e, "Exchange reclaimed");
                    ExchangeOutcome::TimedOut
                } else {
                    // deliver removed the entry first; its send follows without yielding
                    match (&mut exchange.result).await {
                        Ok(result) => ExchangeOutcome::Resolved(result),
                        Err(_) => ExchangeOutcome::TimedOut,
                    }
                }
            }
        };

        if matches!(outcome, ExchangeOutcome::Resolved(_)) {
            EXCHANGE_LATENCY_SECONDS.observe(exchange.started.elapsed().as_secs_f64());
        }
        outcome
    }

    /// Hand a result to the exchange registered under `key`.
    /// Returns false when nobody is waiting any more.
    pub fn deliver(&self, key: &ExchangeKey, result: RadiusResult) -> bool {
        match self.registry.remove(key) {
            Some((_, tx)) => {
                EXCHANGES_IN_FLIGHT.dec();
                if tx.send(result).is_err() {
                    warn!(%key, "Exchange waiter went away before delivery");
                    return false;
                }
                true
            }
            None => {
                LATE_RESULTS_TOTAL.inc();
                warn!(%key, "Dropping RADIUS result for unknown or expired exchange");
                false
            }
        }
    }

    /// Exchanges registered and not yet resolved
    pub fn in_flight(&self) -> usize {
        self.registry.len()
    }
}
