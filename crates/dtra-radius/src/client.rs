use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use dtra_core::{GatewayError, Result};
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use crate::auth::verify_response;
use crate::packet::{RadiusPacket, RADIUS_AUTH_LEN, RADIUS_HDR_LEN, RADIUS_MAX_LEN};
use crate::request::{RadiusRequest, RadiusResult};

/// Where and how to reach the RADIUS server
#[derive(Debug, Clone)]
pub struct RadiusClientConfig {
    /// Server host name or address, without port
    pub server: String,
    pub secret: String,
    pub auth_port: u16,
    pub acct_port: u16,
    /// Retransmission interval while waiting for a response
    pub retry_interval: Duration,
}

impl Default for RadiusClientConfig {
    fn default() -> Self {
        Self {
            server: "127.0.0.1".to_string(),
            secret: String::new(),
            auth_port: 1812,
            acct_port: 1813,
            retry_interval: Duration::from_secs(1),
        }
    }
}

/// RADIUS UDP client. One socket per exchange; safe to share across tasks.
pub struct RadiusClient {
    config: RadiusClientConfig,
    next_id: AtomicU8,
}

impl RadiusClient {
    pub fn new(config: RadiusClientConfig) -> Self {
        Self {
            config,
            next_id: AtomicU8::new(rand::random()),
        }
    }

    pub fn config(&self) -> &RadiusClientConfig {
        &self.config
    }

    fn port_for(&self, request: &RadiusRequest) -> u16 {
        match request {
            RadiusRequest::Access(_) => self.config.auth_port,
            RadiusRequest::Accounting(_) => self.config.acct_port,
        }
    }

    /// Send `request` and wait for its response until `deadline`.
    /// The request is retransmitted every `retry_interval` meanwhile.
    pub async fn exchange(&self, request: &RadiusRequest, deadline: Instant) -> Result<RadiusResult> {
        let identifier = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (bytes, authenticator) = request.to_packet(identifier, self.config.secret.as_bytes())?;

        let port = self.port_for(request);
        let server = lookup_host((self.config.server.as_str(), port))
            .await?
            .next()
            .ok_or_else(|| {
                GatewayError::Forwarding(format!("cannot resolve {}:{port}", self.config.server))
            })?;

        let bind: SocketAddr = if server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind).await?;
        socket.connect(server).await?;

        debug!(
            %server,
            identifier,
            kind = request.kind(),
            "Sending RADIUS request"
        );

        match timeout_at(deadline, self.send_and_wait(&socket, &bytes, identifier, &authenticator)).await {
            Ok(response) => Ok(request.result_from(&response?)),
            Err(_) => Err(GatewayError::Forwarding(format!(
                "no response from {server} before deadline"
            ))),
        }
    }

    async fn send_and_wait(
        &self,
        socket: &UdpSocket,
        bytes: &[u8],
        identifier: u8,
        authenticator: &[u8; RADIUS_AUTH_LEN],
    ) -> Result<RadiusPacket> {
        let mut buf = vec![0u8; RADIUS_MAX_LEN];
        let mut retry = tokio::time::interval(self.config.retry_interval);

        loop {
            tokio::select! {
                _ = retry.tick() => {
                    socket.send(bytes).await?;
                }
                received = socket.recv(&mut buf) => {
                    let n = received?;
                    let data = &buf[..n];

                    let packet = match RadiusPacket::decode(data) {
                        Ok(packet) => packet,
                        Err(e) => {
                            warn!(error = %e, "Discarding malformed RADIUS response");
                            continue;
                        }
                    };
                    if packet.identifier != identifier || !packet.code.is_response() {
                        warn!(
                            identifier = packet.identifier,
                            expected = identifier,
                            code = %packet.code,
                            "Discarding unexpected RADIUS packet"
                        );
                        continue;
                    }

                    let length = usize::from(u16::from_be_bytes([data[2], data[3]])).max(RADIUS_HDR_LEN);
                    if !verify_response(&data[..length], authenticator, self.config.secret.as_bytes()) {
                        warn!(identifier, "Discarding RADIUS response with bad authenticator");
                        continue;
                    }

                    return Ok(packet);
                }
            }
        }
    }
}
