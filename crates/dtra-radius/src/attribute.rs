/// RADIUS packet codes (RFC 2865 / RFC 2866)
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum RadiusCode {
    AccessRequest = 1,
    AccessAccept = 2,
    AccessReject = 3,
    AccountingRequest = 4,
    AccountingResponse = 5,
    AccessChallenge = 11,
}

impl RadiusCode {
    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            1 => Some(Self::AccessRequest),
            2 => Some(Self::AccessAccept),
            3 => Some(Self::AccessReject),
            4 => Some(Self::AccountingRequest),
            5 => Some(Self::AccountingResponse),
            11 => Some(Self::AccessChallenge),
            _ => None,
        }
    }

    /// Whether this code answers a request (and so carries a Response Authenticator)
    pub fn is_response(&self) -> bool {
        matches!(
            self,
            Self::AccessAccept | Self::AccessReject | Self::AccountingResponse | Self::AccessChallenge
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessRequest => "Access-Request",
            Self::AccessAccept => "Access-Accept",
            Self::AccessReject => "Access-Reject",
            Self::AccountingRequest => "Accounting-Request",
            Self::AccountingResponse => "Accounting-Response",
            Self::AccessChallenge => "Access-Challenge",
        }
    }
}

impl std::fmt::Display for RadiusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute types used by the gateway
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum AttributeType {
    UserName = 1,
    UserPassword = 2,
    NasIpAddress = 4,
    ServiceType = 6,
    FramedProtocol = 7,
    FramedIpAddress = 8,
    FramedMtu = 12,
    VendorSpecific = 26,
    SessionTimeout = 27,
    CalledStationId = 30,
    CallingStationId = 31,
    AcctStatusType = 40,
    AcctDelayTime = 41,
    AcctInputOctets = 42,
    AcctOutputOctets = 43,
    AcctSessionId = 44,
    AcctSessionTime = 46,
    AcctInputPackets = 47,
    AcctOutputPackets = 48,
    NasPortType = 61,
    NasIpv6Address = 95,
    FramedIpv6Address = 168,
}

impl AttributeType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

// NAS-Port-Type values
pub const NAS_PORT_TYPE_VIRTUAL: u32 = 5;

// Service-Type values
pub const SERVICE_TYPE_FRAMED_USER: u32 = 2;

// Framed-Protocol values
pub const FRAMED_PROTOCOL_GPRS_PDP_CONTEXT: u32 = 7;

// 3GPP vendor-specific sub-types (TS 29.061, vendor 10415)
pub const TGPP_IMSI: u8 = 1;
pub const TGPP_PDP_TYPE: u8 = 3;
pub const TGPP_SGSN_ADDRESS: u8 = 6;
pub const TGPP_GGSN_ADDRESS: u8 = 7;
pub const TGPP_SGSN_MCC_MNC: u8 = 18;
pub const TGPP_IMEISV: u8 = 20;
pub const TGPP_RAT_TYPE: u8 = 21;
pub const TGPP_USER_LOCATION_INFO: u8 = 22;
pub const TGPP_MS_TIMEZONE: u8 = 23;

/// A single type/value attribute; the value excludes the two header bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadiusAttribute {
    pub type_code: u8,
    pub value: Vec<u8>,
}

impl RadiusAttribute {
    pub fn new(attr: AttributeType, value: Vec<u8>) -> Self {
        Self {
            type_code: attr.code(),
            value,
        }
    }

    pub fn string(attr: AttributeType, value: &str) -> Self {
        Self::new(attr, value.as_bytes().to_vec())
    }

    pub fn integer(attr: AttributeType, value: u32) -> Self {
        Self::new(attr, value.to_be_bytes().to_vec())
    }

    /// Value as a RADIUS integer
    pub fn as_u32(&self) -> Option<u32> {
        let bytes: [u8; 4] = self.value.as_slice().try_into().ok()?;
        Some(u32::from_be_bytes(bytes))
    }
}
