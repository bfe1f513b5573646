use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use dtra_core::{DiameterHeader, DiameterPacket, ErrorSeverity, GatewayError};
use dtra_gateway_core::{
    result_code_for, timeout_result_code, DiameterAnswer, DiameterRequest, Forwarding,
    MessageTranslator,
};
use dtra_metrics::{record_answer, record_request};
use dtra_shared::{command_name, AVP_SESSION_ID, RESULT_CODE_SUCCESS, RESULT_CODE_UNABLE_TO_COMPLY};
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

use crate::coordinator::{ExchangeCoordinator, ExchangeOutcome};

/// What the connection should do after a request was handled
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    Reply(DiameterPacket),
    /// Reply, then close the connection (DPA)
    ReplyAndClose(DiameterPacket),
    Ignore,
}

/// Runs one Diameter request through decode, forwarding and answer building
#[derive(Clone)]
pub struct DiameterGatewayHandler {
    translator: Arc<MessageTranslator>,
    coordinator: Arc<ExchangeCoordinator>,
}

/// Log a per-request failure at the level of its severity
fn log_failure(e: &GatewayError, session_id: &str, command_code: u32, what: &str) {
    let retryable = e.is_retryable();
    match e.severity() {
        ErrorSeverity::Info => info!(session_id, command_code, retryable, error = %e, "{what}"),
        ErrorSeverity::Warning => warn!(session_id, command_code, retryable, error = %e, "{what}"),
        ErrorSeverity::Error | ErrorSeverity::Critical => {
            error!(session_id, command_code, retryable, error = %e, "{what}")
        }
    }
}

fn raw_session_id(packet: &DiameterPacket) -> Option<String> {
    packet
        .find_avp(AVP_SESSION_ID)
        .and_then(|avp| avp.as_str())
        .map(String::from)
}

impl DiameterGatewayHandler {
    pub fn new(translator: Arc<MessageTranslator>, coordinator: Arc<ExchangeCoordinator>) -> Self {
        Self {
            translator,
            coordinator,
        }
    }

    /// Handle `packet` on its own task. A panic in the task still produces
    /// an UNABLE_TO_COMPLY answer.
    pub async fn dispatch(&self, packet: DiameterPacket, peer: IpAddr) -> HandlerOutcome {
        let header = packet.header.clone();
        let session_id = raw_session_id(&packet);

        let handler = self.clone();
        match tokio::spawn(async move { handler.handle(packet, peer).await }).await {
            Ok(outcome) => outcome,
            Err(e) => self.aborted(&header, session_id.as_deref(), e),
        }
    }

    /// UNABLE_TO_COMPLY answer for a request whose task panicked or was cancelled
    fn aborted(&self, header: &DiameterHeader, session_id: Option<&str>, e: JoinError) -> HandlerOutcome {
        error!(
            session_id = session_id.unwrap_or(""),
            command_code = header.command_code,
            panicked = e.is_panic(),
            error = %e,
            "Request task aborted"
        );
        self.reply(
            self.translator
                .error_answer(header, session_id, RESULT_CODE_UNABLE_TO_COMPLY),
        )
    }

    /// Answer a frame whose AVPs could not be parsed. Only requests get an answer.
    pub fn reject_malformed(&self, header: &DiameterHeader, reason: &str) -> HandlerOutcome {
        warn!(command_code = header.command_code, %reason, "Malformed Diameter message");
        if !header.is_request() {
            return HandlerOutcome::Ignore;
        }
        self.reply(
            self.translator
                .error_answer(header, None, RESULT_CODE_UNABLE_TO_COMPLY),
        )
    }

    /// Decode, translate, forward and answer one request
    pub async fn handle(&self, packet: DiameterPacket, peer: IpAddr) -> HandlerOutcome {
        record_request(command_name(packet.header.command_code));

        let (header, request) = match self.translator.decode(&packet) {
            Ok(decoded) => decoded,
            Err(GatewayError::UnmappedRequest(reason)) => {
                debug!(command_code = packet.header.command_code, %reason, "Ignoring message");
                return HandlerOutcome::Ignore;
            }
            Err(e) => {
                let session_id = raw_session_id(&packet);
                log_failure(
                    &e,
                    session_id.as_deref().unwrap_or(""),
                    packet.header.command_code,
                    "Failed to decode request",
                );
                let answer = self.translator.error_answer(
                    &packet.header,
                    session_id.as_deref(),
                    e.to_result_code(),
                );
                return self.reply(answer);
            }
        };

        let radius_request = match self.translator.to_radius(&request, peer) {
            Ok(Forwarding::Radius(radius_request)) => radius_request,
            Ok(Forwarding::NotNeeded) => {
                info!(%peer, "Disconnect-Peer-Request received");
                let answer =
                    self.translator
                        .to_diameter_answer(&header, &request, RESULT_CODE_SUCCESS, None);
                record_answer(answer.result_code);
                return HandlerOutcome::ReplyAndClose(answer.packet);
            }
            Err(e) => {
                log_failure(
                    &e,
                    request.session_id().unwrap_or(""),
                    header.command_code,
                    "Request cannot be translated",
                );
                let answer = self
                    .translator
                    .error_answer(&header, request.session_id(), e.to_result_code());
                return self.reply(answer);
            }
        };

        self.reply(self.forward(&header, &request, radius_request).await)
    }

    async fn forward(
        &self,
        header: &DiameterHeader,
        request: &DiameterRequest,
        radius_request: dtra_radius::RadiusRequest,
    ) -> DiameterAnswer {
        let session_id = request.session_id().unwrap_or("");

        let exchange = match self.coordinator.submit(session_id, radius_request).await {
            Ok(exchange) => exchange,
            Err(e) => {
                log_failure(&e, session_id, header.command_code, "Cannot queue RADIUS request");
                return self
                    .translator
                    .error_answer(header, request.session_id(), e.to_result_code());
            }
        };

        let timeout: Duration = self.coordinator.timeout();
        let (result_code, result) = match self.coordinator.wait(exchange, timeout).await {
            ExchangeOutcome::Resolved(result) => (result_code_for(request, &result), Some(result)),
            ExchangeOutcome::TimedOut => (timeout_result_code(request), None),
        };

        info!(
            session_id,
            command = request.command_name(),
            outcome = result.as_ref().map(|r| r.outcome()).unwrap_or("timeout"),
            result_code,
            "Request answered"
        );
        self.translator
            .to_diameter_answer(header, request, result_code, result.as_ref())
    }

    fn reply(&self, answer: DiameterAnswer) -> HandlerOutcome {
        record_answer(answer.result_code);
        HandlerOutcome::Reply(answer.packet)
    }
}
