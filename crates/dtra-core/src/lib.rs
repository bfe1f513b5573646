// Error types module
pub mod error;

// Diameter protocol module
pub mod diameter;

// Peer transport abstraction
pub mod transport;

// Re-export commonly used types
pub use error::{GatewayError, ErrorSeverity, Result};
pub use diameter::{DiameterHeader, DiameterAvp, DiameterPacket};
pub use transport::PeerTransport;
