// RADIUS attribute and code definitions
pub mod attribute;

// Packet codec and authenticators
pub mod packet;
pub mod auth;

// Requests and results exchanged with the gateway
pub mod request;

// UDP client
pub mod client;

// Re-export commonly used types
pub use attribute::{AttributeType, RadiusAttribute, RadiusCode};
pub use client::{RadiusClient, RadiusClientConfig};
pub use packet::RadiusPacket;
pub use request::{
    AccessRequest, AccessResult, AccountingRequest, AccountingResult, AcctStatusType,
    RadiusRequest, RadiusResult,
};
