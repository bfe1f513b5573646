use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dtra_codec::{decode_grouped_avp, encode_grouped_avp};
use dtra_core::diameter::AVP_FLAG_MANDATORY;
use dtra_core::{DiameterAvp, DiameterHeader, DiameterPacket, Result};
use dtra_diameter_dict::DictionaryManager;
use dtra_gateway_core::{MessageTranslator, TranslatorSettings};
use dtra_gateway_runtime::{
    DiameterGatewayHandler, ExchangeCoordinator, HandlerOutcome, RadiusForwarder, RadiusTransport,
};
use dtra_radius::{
    AccessResult, AccountingResult, RadiusCode, RadiusRequest, RadiusResult,
};
use dtra_shared::*;
use tokio::time::Instant;

/// Answers by username: "accept" gets 10.0.0.5/1400, "silent" never answers,
/// anything else is rejected. Accounting requests always succeed.
struct ScriptedRadius;

#[async_trait]
impl RadiusTransport for ScriptedRadius {
    async fn exchange(&self, request: &RadiusRequest, _deadline: Instant) -> Result<RadiusResult> {
        match request {
            RadiusRequest::Access(access) => match access.username.as_str() {
                "accept" => Ok(RadiusResult::Access(AccessResult {
                    code: RadiusCode::AccessAccept,
                    framed_ip: Some("10.0.0.5".parse().unwrap()),
                    framed_mtu: Some(1400),
                })),
                "silent" => std::future::pending().await,
                _ => Ok(RadiusResult::Access(AccessResult {
                    code: RadiusCode::AccessReject,
                    framed_ip: None,
                    framed_mtu: None,
                })),
            },
            RadiusRequest::Accounting(acct) if acct.username == "silent" => {
                std::future::pending().await
            }
            RadiusRequest::Accounting(_) => Ok(RadiusResult::Accounting(AccountingResult {
                code: RadiusCode::AccountingResponse,
            })),
        }
    }
}

fn handler() -> DiameterGatewayHandler {
    dtra_logging::init_test();
    let translator = Arc::new(MessageTranslator::new(
        TranslatorSettings::new("dtra.test", "test"),
        Arc::new(DictionaryManager::new()),
    ));
    let (coordinator, jobs) = ExchangeCoordinator::new(100, Duration::from_secs(5));
    let coordinator = Arc::new(coordinator);
    tokio::spawn(RadiusForwarder::new(Arc::new(ScriptedRadius), coordinator.clone()).run(jobs));
    DiameterGatewayHandler::new(translator, coordinator)
}

fn peer() -> IpAddr {
    "192.0.2.1".parse().unwrap()
}

fn text(code: u32, value: &str) -> DiameterAvp {
    DiameterAvp::mandatory(code, value.as_bytes().to_vec())
}

fn unsigned(code: u32, value: u32) -> DiameterAvp {
    DiameterAvp::mandatory(code, value.to_be_bytes().to_vec())
}

fn request(command: u32, app: u32, avps: Vec<DiameterAvp>) -> DiameterPacket {
    let mut header = DiameterHeader::request(command, app);
    header.hop_by_hop_id = 0xAABB;
    header.end_to_end_id = 0xCCDD;
    let mut packet = DiameterPacket::new(header);
    packet.avps = avps;
    packet
}

fn air(user: &str) -> DiameterPacket {
    request(
        CMD_AIR,
        APP_ID_S6A,
        vec![
            text(AVP_SESSION_ID, "mme.test;77;88"),
            text(AVP_ORIGIN_HOST, "mme.test"),
            text(AVP_ORIGIN_REALM, "test"),
            text(AVP_USER_NAME, user),
        ],
    )
}

fn ccr(user: &str, cc_request_type: u32) -> DiameterPacket {
    let subscription = encode_grouped_avp(
        AVP_SUBSCRIPTION_ID,
        None,
        AVP_FLAG_MANDATORY,
        &[unsigned(AVP_SUBSCRIPTION_ID_TYPE, 1), text(AVP_SUBSCRIPTION_ID_DATA, user)],
    )
    .unwrap();
    request(
        CMD_CCR,
        APP_ID_CREDIT_CONTROL,
        vec![
            text(AVP_SESSION_ID, "pgw.test;1234;5678"),
            unsigned(AVP_AUTH_APPLICATION_ID, APP_ID_CREDIT_CONTROL),
            unsigned(AVP_CC_REQUEST_TYPE, cc_request_type),
            unsigned(AVP_CC_REQUEST_NUMBER, 0),
            subscription,
        ],
    )
}

fn reply(outcome: HandlerOutcome) -> DiameterPacket {
    match outcome {
        HandlerOutcome::Reply(packet) => packet,
        other => panic!("expected a reply, got {other:?}"),
    }
}

#[tokio::test]
async fn test_air_accept_end_to_end() {
    let answer = reply(handler().dispatch(air("accept@nai.epc"), peer()).await);

    assert_eq!(answer.header.command_code, CMD_AIR);
    assert!(answer.header.is_answer());
    assert_eq!(answer.header.hop_by_hop_id, 0xAABB);
    assert_eq!(answer.header.end_to_end_id, 0xCCDD);
    assert_eq!(answer.avps[0].code, AVP_SESSION_ID);
    assert_eq!(answer.result_code(), Some(RESULT_CODE_SUCCESS));
    assert_eq!(answer.find_avp(AVP_FRAMED_IP_ADDRESS).unwrap().data, vec![10, 0, 0, 5]);
    assert_eq!(answer.find_avp(AVP_FRAMED_MTU).unwrap().as_u32(), Some(1400));
    assert!(answer.find_vendor_avp(AVP_AUTHENTICATION_INFO, VENDOR_3GPP).is_some());
}

#[tokio::test]
async fn test_air_reject_end_to_end() {
    let answer = reply(handler().dispatch(air("nobody"), peer()).await);

    assert_eq!(answer.avps[0].code, AVP_SESSION_ID);
    assert_eq!(answer.result_code(), Some(RESULT_CODE_AUTHORIZATION_REJECTED));
    assert!(answer.find_avp(AVP_FRAMED_IP_ADDRESS).is_none());
    assert!(answer.find_avp(AVP_AUTHENTICATION_INFO).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_air_timeout_rejected() {
    let answer = reply(handler().dispatch(air("silent"), peer()).await);
    assert_eq!(answer.result_code(), Some(RESULT_CODE_AUTHORIZATION_REJECTED));
}

#[tokio::test(start_paused = true)]
async fn test_ccr_timeout_user_unknown() {
    let answer = reply(handler().dispatch(ccr("silent", CC_REQUEST_TYPE_INITIAL), peer()).await);
    assert_eq!(answer.result_code(), Some(RESULT_CODE_USER_UNKNOWN));
    assert!(answer.find_avp(AVP_MULTIPLE_SERVICES_CREDIT_CONTROL).is_some());
}

#[tokio::test]
async fn test_ccr_initial_grants_quota() {
    let answer = reply(
        handler()
            .dispatch(ccr("001010123456789", CC_REQUEST_TYPE_INITIAL), peer())
            .await,
    );
    assert_eq!(answer.result_code(), Some(RESULT_CODE_SUCCESS));
    assert_eq!(answer.find_avp(AVP_CC_REQUEST_TYPE).unwrap().as_u32(), Some(1));
    let mscc = answer.find_avp(AVP_MULTIPLE_SERVICES_CREDIT_CONTROL).unwrap();
    let children = decode_grouped_avp(mscc).unwrap();
    assert_eq!(children[0].code, AVP_GRANTED_SERVICE_UNIT);
}

#[tokio::test]
async fn test_ccr_termination_unable_to_comply() {
    let answer = reply(
        handler()
            .dispatch(ccr("001010123456789", CC_REQUEST_TYPE_TERMINATION), peer())
            .await,
    );
    assert_eq!(answer.result_code(), Some(RESULT_CODE_UNABLE_TO_COMPLY));
    assert_eq!(answer.avps[0].as_str(), Some("pgw.test;1234;5678"));
}

#[tokio::test]
async fn test_missing_session_id_unable_to_comply() {
    let packet = request(CMD_AAR, APP_ID_S6B, vec![text(AVP_USER_NAME, "accept")]);
    let answer = reply(handler().dispatch(packet, peer()).await);
    assert_eq!(answer.result_code(), Some(RESULT_CODE_UNABLE_TO_COMPLY));
    assert!(answer.find_avp(AVP_SESSION_ID).is_none());
}

#[tokio::test]
async fn test_dpr_replies_and_closes() {
    let packet = request(CMD_DPR, APP_ID_COMMON, vec![unsigned(AVP_DISCONNECT_CAUSE, 0)]);
    match handler().dispatch(packet, peer()).await {
        HandlerOutcome::ReplyAndClose(answer) => {
            assert_eq!(answer.result_code(), Some(RESULT_CODE_SUCCESS));
            assert!(answer.find_avp(AVP_SESSION_ID).is_none());
        }
        other => panic!("expected ReplyAndClose, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_command_ignored() {
    let packet = request(316, APP_ID_S6A, vec![text(AVP_SESSION_ID, "x")]);
    assert_eq!(handler().dispatch(packet, peer()).await, HandlerOutcome::Ignore);
}

#[tokio::test]
async fn test_concurrent_requests_keep_their_answers() {
    let handler = handler();
    let accept = {
        let handler = handler.clone();
        tokio::spawn(async move { handler.dispatch(air("accept"), peer()).await })
    };
    let reject = {
        let handler = handler.clone();
        tokio::spawn(async move { handler.dispatch(air("other"), peer()).await })
    };

    assert_eq!(reply(accept.await.unwrap()).result_code(), Some(RESULT_CODE_SUCCESS));
    assert_eq!(
        reply(reject.await.unwrap()).result_code(),
        Some(RESULT_CODE_AUTHORIZATION_REJECTED)
    );
}
