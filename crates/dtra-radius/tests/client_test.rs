use dtra_radius::attribute::*;
use dtra_radius::auth::response_authenticator;
use dtra_radius::{
    AccessRequest, AccountingRequest, AcctStatusType, RadiusAttribute, RadiusClient,
    RadiusClientConfig, RadiusCode, RadiusPacket, RadiusRequest, RadiusResult,
};
use dtra_core::GatewayError;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;

const SECRET: &str = "testing123";

fn access_request() -> RadiusRequest {
    RadiusRequest::Access(AccessRequest {
        username: "001010000000001".into(),
        password: "12345".into(),
        nas_ip: "127.0.0.1".parse().unwrap(),
        nas_port_type: NAS_PORT_TYPE_VIRTUAL,
        service_type: SERVICE_TYPE_FRAMED_USER,
        called_station_id: "00-14-22-01-23-45".into(),
        calling_station_id: "00-14-22-67-89-AB".into(),
        framed_protocol: FRAMED_PROTOCOL_GPRS_PDP_CONTEXT,
    })
}

fn client_for(port: u16) -> RadiusClient {
    RadiusClient::new(RadiusClientConfig {
        server: "127.0.0.1".into(),
        secret: SECRET.into(),
        auth_port: port,
        acct_port: port,
        retry_interval: Duration::from_millis(50),
    })
}

/// Answers every request once with `code` and the given attributes.
/// When `sign` is false the Response Authenticator is left zeroed.
async fn spawn_responder(code: RadiusCode, attributes: Vec<RadiusAttribute>, sign: bool) -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    tokio::spawn(async move {
        let mut buf = vec![0u8; 4096];
        loop {
            let (n, peer) = match socket.recv_from(&mut buf).await {
                Ok(v) => v,
                Err(_) => return,
            };
            let request = RadiusPacket::decode(&buf[..n]).unwrap();

            let mut response = RadiusPacket::new(code, request.identifier);
            for attr in &attributes {
                response.add(attr.clone());
            }
            let mut bytes = response.encode().unwrap();
            if sign {
                let auth = response_authenticator(&bytes, &request.authenticator, SECRET.as_bytes());
                bytes[4..20].copy_from_slice(&auth);
            }
            socket.send_to(&bytes, peer).await.unwrap();
        }
    });

    port
}

#[tokio::test]
async fn test_access_accept_with_framed_fields() {
    let port = spawn_responder(
        RadiusCode::AccessAccept,
        vec![
            RadiusAttribute::new(AttributeType::FramedIpAddress, vec![10, 0, 0, 5]),
            RadiusAttribute::integer(AttributeType::FramedMtu, 1400),
        ],
        true,
    )
    .await;

    let client = client_for(port);
    let result = client
        .exchange(&access_request(), Instant::now() + Duration::from_secs(2))
        .await
        .unwrap();

    assert!(result.is_accept());
    assert_eq!(result.framed(), Some(("10.0.0.5".parse().unwrap(), 1400)));
}

#[tokio::test]
async fn test_access_reject() {
    let port = spawn_responder(RadiusCode::AccessReject, vec![], true).await;

    let result = client_for(port)
        .exchange(&access_request(), Instant::now() + Duration::from_secs(2))
        .await
        .unwrap();

    assert!(!result.is_accept());
    assert_eq!(result.outcome(), "reject");
}

#[tokio::test]
async fn test_accounting_response() {
    let port = spawn_responder(RadiusCode::AccountingResponse, vec![], true).await;

    let request = RadiusRequest::Accounting(AccountingRequest {
        username: "001010000000001".into(),
        status: AcctStatusType::Start,
        session_id: "1234".into(),
        delay_time: 0,
        input_octets: None,
        output_octets: None,
        session_time: None,
        framed_ipv4: Some("10.0.0.9".parse().unwrap()),
        framed_ipv6: None,
        called_station_id: Some("internet".into()),
        vendor_attributes: vec![],
    });

    let result = client_for(port)
        .exchange(&request, Instant::now() + Duration::from_secs(2))
        .await
        .unwrap();

    assert!(matches!(result, RadiusResult::Accounting(_)));
    assert!(result.is_accept());
}

#[tokio::test]
async fn test_bad_authenticator_runs_into_deadline() {
    let port = spawn_responder(RadiusCode::AccessAccept, vec![], false).await;

    let err = client_for(port)
        .exchange(&access_request(), Instant::now() + Duration::from_millis(300))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Forwarding(_)));
}

#[tokio::test]
async fn test_silent_server_times_out() {
    // Bound but never answers
    let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = silent.local_addr().unwrap().port();

    let started = Instant::now();
    let err = client_for(port)
        .exchange(&access_request(), started + Duration::from_millis(200))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Forwarding(_)));
    assert!(started.elapsed() >= Duration::from_millis(200));
    drop(silent);
}
