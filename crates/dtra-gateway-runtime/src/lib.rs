//! Async side of the gateway: exchange correlation, the RADIUS forwarding
//! worker and the per-request handler.

pub mod coordinator;
pub mod forwarder;
pub mod handler;

pub use coordinator::{Exchange, ExchangeCoordinator, ExchangeKey, ExchangeOutcome, ForwardJob};
pub use forwarder::{RadiusForwarder, RadiusTransport};
pub use handler::{DiameterGatewayHandler, HandlerOutcome};
