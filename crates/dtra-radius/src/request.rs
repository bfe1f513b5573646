use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use dtra_core::Result;
use tracing::warn;

use crate::attribute::{AttributeType, RadiusAttribute, RadiusCode};
use crate::auth::{accounting_request_authenticator, hide_password};
use crate::packet::{RadiusPacket, RADIUS_AUTH_LEN};

/// Acct-Status-Type values (RFC 2866)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcctStatusType {
    Start = 1,
    Stop = 2,
    InterimUpdate = 3,
}

/// Access-Request parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AccessRequest {
    pub username: String,
    pub password: String,
    pub nas_ip: IpAddr,
    pub nas_port_type: u32,
    pub service_type: u32,
    pub called_station_id: String,
    pub calling_station_id: String,
    pub framed_protocol: u32,
}

/// Accounting-Request parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AccountingRequest {
    pub username: String,
    pub status: AcctStatusType,
    pub session_id: String,
    pub delay_time: u32,
    pub input_octets: Option<u64>,
    pub output_octets: Option<u64>,
    pub session_time: Option<u32>,
    pub framed_ipv4: Option<Ipv4Addr>,
    pub framed_ipv6: Option<Ipv6Addr>,
    pub called_station_id: Option<String>,
    /// Encoded Vendor-Specific attribute values, emitted in order
    pub vendor_attributes: Vec<Vec<u8>>,
}

/// Request handed to the RADIUS side
#[derive(Debug, Clone, PartialEq)]
pub enum RadiusRequest {
    Access(AccessRequest),
    Accounting(AccountingRequest),
}

/// Outcome of an Access-Request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessResult {
    pub code: RadiusCode,
    pub framed_ip: Option<Ipv4Addr>,
    pub framed_mtu: Option<u32>,
}

/// Outcome of an Accounting-Request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountingResult {
    pub code: RadiusCode,
}

/// Outcome of one RADIUS exchange as seen by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadiusResult {
    Access(AccessResult),
    Accounting(AccountingResult),
    /// The exchange itself failed (unreachable server, bad response, deadline)
    Failed(String),
}

impl RadiusRequest {
    /// Label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Access(_) => "access",
            Self::Accounting(_) => "accounting",
        }
    }

    /// Build the wire packet. Returns the bytes and the Request Authenticator
    /// needed to validate the response.
    pub fn to_packet(&self, identifier: u8, secret: &[u8]) -> Result<(Vec<u8>, [u8; RADIUS_AUTH_LEN])> {
        match self {
            Self::Access(req) => req.to_packet(identifier, secret),
            Self::Accounting(req) => req.to_packet(identifier, secret),
        }
    }

    /// Interpret the response packet for this request
    pub fn result_from(&self, response: &RadiusPacket) -> RadiusResult {
        match self {
            Self::Access(_) => RadiusResult::Access(AccessResult::from_packet(response)),
            Self::Accounting(_) => RadiusResult::Accounting(AccountingResult {
                code: response.code,
            }),
        }
    }
}

impl AccessRequest {
    fn to_packet(&self, identifier: u8, secret: &[u8]) -> Result<(Vec<u8>, [u8; RADIUS_AUTH_LEN])> {
        let authenticator: [u8; RADIUS_AUTH_LEN] = rand::random();

        let mut packet = RadiusPacket::new(RadiusCode::AccessRequest, identifier);
        packet.authenticator = authenticator;
        packet.add(RadiusAttribute::string(AttributeType::UserName, &self.username));
        packet.add(RadiusAttribute::new(
            AttributeType::UserPassword,
            hide_password(self.password.as_bytes(), secret, &authenticator),
        ));
        packet.add(match self.nas_ip {
            IpAddr::V4(ip) => RadiusAttribute::new(AttributeType::NasIpAddress, ip.octets().to_vec()),
            IpAddr::V6(ip) => RadiusAttribute::new(AttributeType::NasIpv6Address, ip.octets().to_vec()),
        });
        packet.add(RadiusAttribute::integer(AttributeType::NasPortType, self.nas_port_type));
        packet.add(RadiusAttribute::integer(AttributeType::ServiceType, self.service_type));
        packet.add(RadiusAttribute::string(AttributeType::CalledStationId, &self.called_station_id));
        packet.add(RadiusAttribute::string(AttributeType::CallingStationId, &self.calling_station_id));
        packet.add(RadiusAttribute::integer(AttributeType::FramedProtocol, self.framed_protocol));

        Ok((packet.encode()?, authenticator))
    }
}

fn octets_u32(name: &str, value: u64) -> Option<u32> {
    match u32::try_from(value) {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(attribute = name, value, "Usage counter exceeds 32 bits, omitted");
            None
        }
    }
}

impl AccountingRequest {
    fn to_packet(&self, identifier: u8, secret: &[u8]) -> Result<(Vec<u8>, [u8; RADIUS_AUTH_LEN])> {
        let mut packet = RadiusPacket::new(RadiusCode::AccountingRequest, identifier);
        packet.add(RadiusAttribute::string(AttributeType::UserName, &self.username));
        packet.add(RadiusAttribute::integer(AttributeType::AcctStatusType, self.status as u32));
        if let Some(ip) = self.framed_ipv4 {
            packet.add(RadiusAttribute::new(AttributeType::FramedIpAddress, ip.octets().to_vec()));
        }
        if let Some(ip) = self.framed_ipv6 {
            packet.add(RadiusAttribute::new(AttributeType::FramedIpv6Address, ip.octets().to_vec()));
        }
        if let Some(called) = &self.called_station_id {
            packet.add(RadiusAttribute::string(AttributeType::CalledStationId, called));
        }
        packet.add(RadiusAttribute::string(AttributeType::AcctSessionId, &self.session_id));

        match self.status {
            AcctStatusType::Start => {
                packet.add(RadiusAttribute::integer(AttributeType::AcctDelayTime, self.delay_time));
            }
            AcctStatusType::InterimUpdate | AcctStatusType::Stop => {
                if let Some(v) = self.input_octets.and_then(|v| octets_u32("Acct-Input-Octets", v)) {
                    packet.add(RadiusAttribute::integer(AttributeType::AcctInputOctets, v));
                }
                if let Some(v) = self.output_octets.and_then(|v| octets_u32("Acct-Output-Octets", v)) {
                    packet.add(RadiusAttribute::integer(AttributeType::AcctOutputOctets, v));
                }
                packet.add(RadiusAttribute::integer(AttributeType::AcctInputPackets, 0));
                packet.add(RadiusAttribute::integer(AttributeType::AcctOutputPackets, 0));
                packet.add(RadiusAttribute::integer(
                    AttributeType::AcctSessionTime,
                    self.session_time.unwrap_or(0),
                ));
            }
        }

        for vsa in &self.vendor_attributes {
            packet.add(RadiusAttribute::new(AttributeType::VendorSpecific, vsa.clone()));
        }

        let mut bytes = packet.encode()?;
        let authenticator = accounting_request_authenticator(&bytes, secret);
        bytes[4..20].copy_from_slice(&authenticator);
        Ok((bytes, authenticator))
    }
}

impl AccessResult {
    /// Framed-IP-Address and Framed-MTU are taken only when present and non-zero
    pub fn from_packet(packet: &RadiusPacket) -> Self {
        let framed_ip = packet
            .attribute(AttributeType::FramedIpAddress)
            .and_then(|a| <[u8; 4]>::try_from(a.value.as_slice()).ok())
            .map(Ipv4Addr::from)
            .filter(|ip| !ip.is_unspecified());
        let framed_mtu = packet
            .attribute(AttributeType::FramedMtu)
            .and_then(RadiusAttribute::as_u32)
            .filter(|mtu| *mtu != 0);

        Self {
            code: packet.code,
            framed_ip,
            framed_mtu,
        }
    }
}

impl RadiusResult {
    /// Access-Accept or Accounting-Response
    pub fn is_accept(&self) -> bool {
        match self {
            Self::Access(r) => r.code == RadiusCode::AccessAccept,
            Self::Accounting(r) => r.code == RadiusCode::AccountingResponse,
            Self::Failed(_) => false,
        }
    }

    /// Label used in logs and metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Failed(_) => "failed",
            r if r.is_accept() => "accept",
            _ => "reject",
        }
    }

    /// Framed IP and MTU, only when both are present
    pub fn framed(&self) -> Option<(Ipv4Addr, u32)> {
        match self {
            Self::Access(AccessResult {
                framed_ip: Some(ip),
                framed_mtu: Some(mtu),
                ..
            }) => Some((*ip, *mtu)),
            _ => None,
        }
    }
}
