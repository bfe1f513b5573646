use std::time::Duration;

use dtra_config::{load_from_yaml, GatewayConfig};
use dtra_core::{DiameterAvp, DiameterHeader, DiameterPacket};
use dtra_gateway::{DiameterCodec, Gateway, InboundFrame};
use dtra_radius::attribute::AttributeType;
use dtra_radius::auth::response_authenticator;
use dtra_radius::{RadiusAttribute, RadiusCode, RadiusPacket};
use dtra_shared::*;
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;
use tokio_util::codec::Framed;

const SECRET: &str = "testing123";

/// Accepts every Access-Request with 10.0.0.5 / MTU 1400
async fn spawn_radius() -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    tokio::spawn(async move {
        let mut buf = vec![0u8; 4096];
        while let Ok((n, peer)) = socket.recv_from(&mut buf).await {
            let request = RadiusPacket::decode(&buf[..n]).unwrap();
            let mut response = RadiusPacket::new(RadiusCode::AccessAccept, request.identifier);
            response.add(RadiusAttribute::new(AttributeType::FramedIpAddress, vec![10, 0, 0, 5]));
            response.add(RadiusAttribute::integer(AttributeType::FramedMtu, 1400));
            let mut bytes = response.encode().unwrap();
            let auth = response_authenticator(&bytes, &request.authenticator, SECRET.as_bytes());
            bytes[4..20].copy_from_slice(&auth);
            socket.send_to(&bytes, peer).await.unwrap();
        }
    });

    port
}

async fn start_gateway() -> Framed<TcpStream, DiameterCodec> {
    dtra_logging::init_test();
    let radius_port = spawn_radius().await;
    let yaml = format!(
        r#"
diameter:
  addr: 127.0.0.1:0
  diam_host: dtra.test
  diam_realm: test
radius:
  addr: 127.0.0.1
  secret: {SECRET}
  auth_port: {radius_port}
  acct_port: {radius_port}
exchange:
  timeout_ms: 2000
"#
    );
    let config: GatewayConfig = load_from_yaml(&yaml).unwrap();

    let gateway = Gateway::start(&config).await.unwrap();
    let addr = gateway.local_addr().unwrap();
    tokio::spawn(gateway.run());

    let stream = TcpStream::connect(addr).await.unwrap();
    Framed::new(stream, DiameterCodec)
}

fn text(code: u32, value: &str) -> DiameterAvp {
    DiameterAvp::mandatory(code, value.as_bytes().to_vec())
}

fn request(command: u32, app: u32, hop_by_hop: u32, avps: Vec<DiameterAvp>) -> DiameterPacket {
    let mut header = DiameterHeader::request(command, app);
    header.hop_by_hop_id = hop_by_hop;
    header.end_to_end_id = hop_by_hop + 1000;
    let mut packet = DiameterPacket::new(header);
    packet.avps = avps;
    packet
}

async fn next_answer(peer: &mut Framed<TcpStream, DiameterCodec>) -> DiameterPacket {
    match timeout(Duration::from_secs(5), peer.next()).await {
        Ok(Some(Ok(InboundFrame::Packet(packet)))) => packet,
        other => panic!("expected an answer, got {other:?}"),
    }
}

#[tokio::test]
async fn test_capabilities_and_watchdog() {
    let mut peer = start_gateway().await;

    peer.send(request(CMD_CER, APP_ID_COMMON, 1, vec![text(AVP_ORIGIN_HOST, "mme.test")]))
        .await
        .unwrap();
    let cea = next_answer(&mut peer).await;
    assert_eq!(cea.header.command_code, CMD_CER);
    assert!(cea.header.is_answer());
    assert_eq!(cea.header.hop_by_hop_id, 1);
    assert_eq!(cea.result_code(), Some(RESULT_CODE_SUCCESS));
    assert_eq!(cea.find_avp(AVP_ORIGIN_HOST).unwrap().as_str(), Some("dtra.test"));

    peer.send(request(CMD_DWR, APP_ID_COMMON, 2, vec![text(AVP_ORIGIN_HOST, "mme.test")]))
        .await
        .unwrap();
    let dwa = next_answer(&mut peer).await;
    assert_eq!(dwa.header.command_code, CMD_DWR);
    assert_eq!(dwa.header.end_to_end_id, 1002);
    assert_eq!(dwa.result_code(), Some(RESULT_CODE_SUCCESS));
}

#[tokio::test]
async fn test_air_through_radius() {
    let mut peer = start_gateway().await;

    let air = request(
        CMD_AIR,
        APP_ID_S6A,
        7,
        vec![
            text(AVP_SESSION_ID, "mme.test;1;2"),
            text(AVP_ORIGIN_HOST, "mme.test"),
            text(AVP_ORIGIN_REALM, "test"),
            text(AVP_USER_NAME, "001010000000001@nai.epc"),
        ],
    );
    peer.send(air).await.unwrap();

    let aia = next_answer(&mut peer).await;
    assert_eq!(aia.header.command_code, CMD_AIR);
    assert_eq!(aia.header.hop_by_hop_id, 7);
    assert_eq!(aia.avps[0].as_str(), Some("mme.test;1;2"));
    assert_eq!(aia.result_code(), Some(RESULT_CODE_SUCCESS));
    assert_eq!(aia.find_avp(AVP_FRAMED_IP_ADDRESS).unwrap().data, vec![10, 0, 0, 5]);
    assert_eq!(aia.find_avp(AVP_FRAMED_MTU).unwrap().as_u32(), Some(1400));
}

#[tokio::test]
async fn test_malformed_request_answered() {
    let mut peer = start_gateway().await;

    let mut bytes = request(CMD_AAR, APP_ID_S6B, 9, vec![text(AVP_SESSION_ID, "x;1")]).serialize();
    // Corrupt the first AVP's length
    bytes[25..28].copy_from_slice(&[0, 0, 0xFF]);
    let stream = peer.get_mut();
    tokio::io::AsyncWriteExt::write_all(stream, &bytes).await.unwrap();

    let answer = next_answer(&mut peer).await;
    assert_eq!(answer.header.hop_by_hop_id, 9);
    assert_eq!(answer.result_code(), Some(RESULT_CODE_UNABLE_TO_COMPLY));
    assert!(answer.find_avp(AVP_SESSION_ID).is_none());
}

#[tokio::test]
async fn test_disconnect_peer_closes_connection() {
    let mut peer = start_gateway().await;

    peer.send(request(
        CMD_DPR,
        APP_ID_COMMON,
        3,
        vec![
            text(AVP_ORIGIN_HOST, "mme.test"),
            DiameterAvp::mandatory(AVP_DISCONNECT_CAUSE, 0u32.to_be_bytes().to_vec()),
        ],
    ))
    .await
    .unwrap();

    let dpa = next_answer(&mut peer).await;
    assert_eq!(dpa.header.command_code, CMD_DPR);
    assert_eq!(dpa.result_code(), Some(RESULT_CODE_SUCCESS));

    let closed = timeout(Duration::from_secs(5), peer.next()).await.unwrap();
    assert!(closed.is_none());
}
