//! Diameter listener and process wiring for the gateway

pub mod app;
pub mod base;
pub mod codec;
pub mod network;

pub use app::Gateway;
pub use base::BaseProtocol;
pub use codec::{DiameterCodec, InboundFrame};
pub use network::{handle_connection, TcpServer};
