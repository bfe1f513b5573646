use std::net::SocketAddr;
use std::sync::Arc;

use dtra_core::{DiameterPacket, GatewayError, PeerTransport, Result};
use dtra_gateway_runtime::{DiameterGatewayHandler, HandlerOutcome};
use dtra_metrics::ACTIVE_CONNECTIONS;
use dtra_shared::{command_name, CMD_AAR, CMD_AIR, CMD_CCR, CMD_DPR};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info, warn};

use crate::base::BaseProtocol;
use crate::codec::{DiameterCodec, InboundFrame};

/// Answers queued for one connection's writer
const WRITE_QUEUE: usize = 64;

enum Outbound {
    Packet(DiameterPacket),
    /// Write, then shut the connection down
    Last(DiameterPacket),
}

fn outbound(outcome: HandlerOutcome) -> Option<Outbound> {
    match outcome {
        HandlerOutcome::Reply(packet) => Some(Outbound::Packet(packet)),
        HandlerOutcome::ReplyAndClose(packet) => Some(Outbound::Last(packet)),
        HandlerOutcome::Ignore => None,
    }
}

/// TCP server for Diameter peers
pub struct TcpServer {
    listener: TcpListener,
    handler: DiameterGatewayHandler,
    base: Arc<BaseProtocol>,
}

impl TcpServer {
    /// Bind the listening socket
    pub async fn bind(addr: &str, handler: DiameterGatewayHandler, base: Arc<BaseProtocol>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            handler,
            base,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept loop; one task per connection
    pub async fn run(self) -> Result<()> {
        info!(addr = %self.local_addr()?, "Diameter listener started");

        loop {
            match self.listener.accept().await {
                Ok((socket, addr)) => {
                    info!(peer = %addr, "New connection");
                    let handler = self.handler.clone();
                    let base = self.base.clone();

                    tokio::spawn(async move {
                        ACTIVE_CONNECTIONS.inc();
                        if let Err(e) = handle_connection(socket, handler, base).await {
                            error!(peer = %addr, error = %e, "Connection error");
                        }
                        ACTIVE_CONNECTIONS.dec();
                        info!(peer = %addr, "Connection closed");
                    });
                }
                Err(e) => {
                    error!(error = %e, "Accept error");
                }
            }
        }
    }
}

/// Serve one peer until it disconnects, a DPA has been written, or framing
/// breaks. Requests are handled concurrently; answers go out in completion
/// order.
pub async fn handle_connection<T: PeerTransport + 'static>(
    stream: T,
    handler: DiameterGatewayHandler,
    base: Arc<BaseProtocol>,
) -> Result<()> {
    let peer = stream.peer_ip()?;
    let local = stream.local_addr()?.ip();
    let (reader, writer) = tokio::io::split(stream);
    let mut frames = FramedRead::new(reader, DiameterCodec);
    let mut sink = FramedWrite::new(writer, DiameterCodec);

    let (tx, mut rx) = mpsc::channel::<Outbound>(WRITE_QUEUE);
    let mut writer_task = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            match outbound {
                Outbound::Packet(packet) => sink.send(packet).await?,
                Outbound::Last(packet) => {
                    sink.send(packet).await?;
                    sink.close().await?;
                    break;
                }
            }
        }
        Ok::<_, GatewayError>(())
    });

    loop {
        tokio::select! {
            frame = frames.next() => {
                let packet = match frame {
                    None => break,
                    Some(Err(e)) => {
                        warn!(%peer, error = %e, "Unrecoverable framing error");
                        break;
                    }
                    Some(Ok(InboundFrame::Malformed { header, reason })) => {
                        if let Some(out) = outbound(handler.reject_malformed(&header, &reason)) {
                            let _ = tx.send(out).await;
                        }
                        continue;
                    }
                    Some(Ok(InboundFrame::Packet(packet))) => packet,
                };

                if let Some(answer) = base.answer(&packet, local) {
                    let _ = tx.send(Outbound::Packet(answer)).await;
                    continue;
                }

                match packet.header.command_code {
                    CMD_AIR | CMD_AAR | CMD_CCR | CMD_DPR => {
                        let handler = handler.clone();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            if let Some(out) = outbound(handler.dispatch(packet, peer).await) {
                                let _ = tx.send(out).await;
                            }
                        });
                    }
                    other => {
                        debug!(%peer, command_code = other, command = command_name(other), "Ignoring message");
                    }
                }
            }
            finished = &mut writer_task => {
                // Writer is done after a DPA or a write failure
                return match finished {
                    Ok(result) => result,
                    Err(e) => Err(GatewayError::Internal(format!("writer task: {e}"))),
                };
            }
        }
    }

    // Peer stopped sending; flush what is still queued
    drop(tx);
    match writer_task.await {
        Ok(result) => result,
        Err(e) => Err(GatewayError::Internal(format!("writer task: {e}"))),
    }
}
