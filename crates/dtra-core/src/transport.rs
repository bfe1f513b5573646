use crate::error::Result;
use std::net::{IpAddr, SocketAddr};
use tokio::io::{AsyncRead, AsyncWrite};

/// Byte stream to a Diameter peer.
/// Implemented for TCP.
pub trait PeerTransport: AsyncRead + AsyncWrite + Send + Unpin {
    /// Get remote peer address
    fn peer_addr(&self) -> Result<SocketAddr>;

    /// Get local address
    fn local_addr(&self) -> Result<SocketAddr>;

    /// Remote IP, used as the NAS address of translated RADIUS requests
    fn peer_ip(&self) -> Result<IpAddr> {
        Ok(self.peer_addr()?.ip())
    }
}

impl PeerTransport for tokio::net::TcpStream {
    fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(tokio::net::TcpStream::peer_addr(self)?)
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        Ok(tokio::net::TcpStream::local_addr(self)?)
    }
}
