use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use thiserror::Error;

/// Address family numbers used by the Diameter Address type (IANA)
const ADDRESS_FAMILY_IPV4: u16 = 1;
const ADDRESS_FAMILY_IPV6: u16 = 2;

/// AVP data type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvpDataType {
    OctetString,
    Utf8String,
    DiameterIdentity,
    DiameterUri,
    Unsigned32,
    Unsigned64,
    Integer32,
    Integer64,
    Float32,
    Float64,
    Grouped,
    Enumerated,
    Time,
    Address,
    IpFilterRule,
}

/// AVP value after parsing
#[derive(Debug, Clone, PartialEq)]
pub enum AvpValue {
    OctetString(Vec<u8>),
    Utf8String(String),
    DiameterIdentity(String),
    DiameterUri(String),
    Unsigned32(u32),
    Unsigned64(u64),
    Integer32(i32),
    Integer64(i64),
    Float32(f32),
    Float64(f64),
    Grouped(Vec<u8>), // Raw grouped AVP data
    Enumerated(i32),
    Time(u32),
    Address(IpAddr),
    IpFilterRule(Vec<u8>),
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid length for data type")]
    InvalidLength,

    #[error("Invalid UTF-8 string")]
    InvalidUtf8,

    #[error("Unsupported address family: {0}")]
    InvalidAddressFamily(u16),

    #[error("Unknown AVP code: {0}")]
    UnknownAvpCode(u32),

    #[error("Unknown data type: {0}")]
    UnknownDataType(String),

    #[error("Value of type {actual:?} does not fit AVP {code} ({expected:?})")]
    TypeMismatch {
        code: u32,
        expected: AvpDataType,
        actual: AvpDataType,
    },

    #[error("Dictionary XML error: {0}")]
    Xml(String),

    #[error("Dictionary I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

fn fixed<const N: usize>(data: &[u8]) -> Result<[u8; N], ParseError> {
    data.try_into().map_err(|_| ParseError::InvalidLength)
}

impl AvpDataType {
    /// Parse raw bytes into AvpValue according to data type
    pub fn parse(&self, data: &[u8]) -> Result<AvpValue, ParseError> {
        match self {
            Self::OctetString => Ok(AvpValue::OctetString(data.to_vec())),

            Self::Utf8String | Self::DiameterIdentity | Self::DiameterUri => {
                let s = String::from_utf8(data.to_vec()).map_err(|_| ParseError::InvalidUtf8)?;
                Ok(match self {
                    Self::DiameterIdentity => AvpValue::DiameterIdentity(s),
                    Self::DiameterUri => AvpValue::DiameterUri(s),
                    _ => AvpValue::Utf8String(s),
                })
            }

            Self::Unsigned32 => Ok(AvpValue::Unsigned32(u32::from_be_bytes(fixed(data)?))),
            Self::Unsigned64 => Ok(AvpValue::Unsigned64(u64::from_be_bytes(fixed(data)?))),
            Self::Integer32 => Ok(AvpValue::Integer32(i32::from_be_bytes(fixed(data)?))),
            Self::Integer64 => Ok(AvpValue::Integer64(i64::from_be_bytes(fixed(data)?))),
            Self::Float32 => Ok(AvpValue::Float32(f32::from_be_bytes(fixed(data)?))),
            Self::Float64 => Ok(AvpValue::Float64(f64::from_be_bytes(fixed(data)?))),
            Self::Grouped => Ok(AvpValue::Grouped(data.to_vec())),
            Self::Enumerated => Ok(AvpValue::Enumerated(i32::from_be_bytes(fixed(data)?))),
            Self::Time => Ok(AvpValue::Time(u32::from_be_bytes(fixed(data)?))),
            Self::Address => parse_address(data).map(AvpValue::Address),
            Self::IpFilterRule => Ok(AvpValue::IpFilterRule(data.to_vec())),
        }
    }

    /// Map a dictionary XML type name onto a data type
    pub fn from_xml_name(name: &str) -> Result<Self, ParseError> {
        let data_type = match name {
            "OctetString" | "IPv4" | "QoSFilterRule" => Self::OctetString,
            "UTF8String" => Self::Utf8String,
            "DiameterIdentity" => Self::DiameterIdentity,
            "DiameterURI" => Self::DiameterUri,
            "Unsigned32" | "AppId" | "VendorId" => Self::Unsigned32,
            "Unsigned64" => Self::Unsigned64,
            "Integer32" => Self::Integer32,
            "Integer64" => Self::Integer64,
            "Float32" => Self::Float32,
            "Float64" => Self::Float64,
            "Grouped" => Self::Grouped,
            "Enumerated" => Self::Enumerated,
            "Time" => Self::Time,
            "Address" => Self::Address,
            "IPFilterRule" => Self::IpFilterRule,
            other => return Err(ParseError::UnknownDataType(other.to_string())),
        };
        Ok(data_type)
    }
}

fn parse_address(data: &[u8]) -> Result<IpAddr, ParseError> {
    if data.len() < 2 {
        return Err(ParseError::InvalidLength);
    }
    let family = u16::from_be_bytes([data[0], data[1]]);
    let octets = &data[2..];
    match family {
        ADDRESS_FAMILY_IPV4 => Ok(IpAddr::V4(Ipv4Addr::from(fixed::<4>(octets)?))),
        ADDRESS_FAMILY_IPV6 => Ok(IpAddr::V6(Ipv6Addr::from(fixed::<16>(octets)?))),
        other => Err(ParseError::InvalidAddressFamily(other)),
    }
}

impl AvpValue {
    /// Data type this value encodes as
    pub fn data_type(&self) -> AvpDataType {
        match self {
            Self::OctetString(_) => AvpDataType::OctetString,
            Self::Utf8String(_) => AvpDataType::Utf8String,
            Self::DiameterIdentity(_) => AvpDataType::DiameterIdentity,
            Self::DiameterUri(_) => AvpDataType::DiameterUri,
            Self::Unsigned32(_) => AvpDataType::Unsigned32,
            Self::Unsigned64(_) => AvpDataType::Unsigned64,
            Self::Integer32(_) => AvpDataType::Integer32,
            Self::Integer64(_) => AvpDataType::Integer64,
            Self::Float32(_) => AvpDataType::Float32,
            Self::Float64(_) => AvpDataType::Float64,
            Self::Grouped(_) => AvpDataType::Grouped,
            Self::Enumerated(_) => AvpDataType::Enumerated,
            Self::Time(_) => AvpDataType::Time,
            Self::Address(_) => AvpDataType::Address,
            Self::IpFilterRule(_) => AvpDataType::IpFilterRule,
        }
    }

    /// Encode into AVP data bytes (unpadded)
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::OctetString(b) | Self::Grouped(b) | Self::IpFilterRule(b) => b.clone(),
            Self::Utf8String(s) | Self::DiameterIdentity(s) | Self::DiameterUri(s) => {
                s.as_bytes().to_vec()
            }
            Self::Unsigned32(v) | Self::Time(v) => v.to_be_bytes().to_vec(),
            Self::Unsigned64(v) => v.to_be_bytes().to_vec(),
            Self::Integer32(v) | Self::Enumerated(v) => v.to_be_bytes().to_vec(),
            Self::Integer64(v) => v.to_be_bytes().to_vec(),
            Self::Float32(v) => v.to_be_bytes().to_vec(),
            Self::Float64(v) => v.to_be_bytes().to_vec(),
            Self::Address(IpAddr::V4(ip)) => {
                let mut bytes = ADDRESS_FAMILY_IPV4.to_be_bytes().to_vec();
                bytes.extend_from_slice(&ip.octets());
                bytes
            }
            Self::Address(IpAddr::V6(ip)) => {
                let mut bytes = ADDRESS_FAMILY_IPV6.to_be_bytes().to_vec();
                bytes.extend_from_slice(&ip.octets());
                bytes
            }
        }
    }

    /// Numeric view for Unsigned32, Enumerated and Time values
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Unsigned32(v) | Self::Time(v) => Some(*v),
            Self::Enumerated(v) | Self::Integer32(v) => u32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Numeric view widened to 64 bits
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Unsigned64(v) => Some(*v),
            Self::Integer64(v) => u64::try_from(*v).ok(),
            _ => self.as_u32().map(u64::from),
        }
    }

    /// Text view for the string-like types
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Utf8String(s) | Self::DiameterIdentity(s) | Self::DiameterUri(s) => Some(s),
            _ => None,
        }
    }

    /// Byte view for the opaque types
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::OctetString(b) | Self::Grouped(b) | Self::IpFilterRule(b) => Some(b),
            Self::Utf8String(s) | Self::DiameterIdentity(s) | Self::DiameterUri(s) => {
                Some(s.as_bytes())
            }
            _ => None,
        }
    }

    pub fn as_ip(&self) -> Option<IpAddr> {
        match self {
            Self::Address(ip) => Some(*ip),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unsigned32() {
        let data = vec![0x00, 0x00, 0x07, 0xD1]; // 2001
        let result = AvpDataType::Unsigned32.parse(&data).unwrap();

        match result {
            AvpValue::Unsigned32(val) => assert_eq!(val, 2001),
            _ => panic!("Expected Unsigned32"),
        }
    }

    #[test]
    fn test_parse_utf8_string() {
        let data = b"test.realm.com".to_vec();
        let result = AvpDataType::Utf8String.parse(&data).unwrap();

        match result {
            AvpValue::Utf8String(s) => assert_eq!(s, "test.realm.com"),
            _ => panic!("Expected Utf8String"),
        }
    }

    #[test]
    fn test_parse_invalid_utf8() {
        let invalid_utf8 = vec![0xFF, 0xFE, 0xFD];
        let result = AvpDataType::Utf8String.parse(&invalid_utf8);

        assert!(result.is_err());
    }

    #[test]
    fn test_parse_invalid_length() {
        let data = vec![0x00, 0x01]; // Too short for Unsigned32
        let result = AvpDataType::Unsigned32.parse(&data);

        assert!(result.is_err());
    }

    #[test]
    fn test_parse_address_families() {
        let v4 = AvpDataType::Address.parse(&[0, 1, 10, 0, 0, 5]).unwrap();
        assert_eq!(v4.as_ip(), Some("10.0.0.5".parse().unwrap()));

        let mut v6 = vec![0, 2];
        v6.extend_from_slice(&"2001:db8::1".parse::<Ipv6Addr>().unwrap().octets());
        let v6 = AvpDataType::Address.parse(&v6).unwrap();
        assert_eq!(v6.as_ip(), Some("2001:db8::1".parse().unwrap()));

        assert!(matches!(
            AvpDataType::Address.parse(&[0, 8, 1, 2, 3, 4]),
            Err(ParseError::InvalidAddressFamily(8))
        ));
        assert!(AvpDataType::Address.parse(&[0, 1, 10, 0]).is_err());
    }

    #[test]
    fn test_encode_matches_parse() {
        let value = AvpValue::Address("192.168.1.20".parse().unwrap());
        let bytes = value.encode();
        assert_eq!(bytes, vec![0, 1, 192, 168, 1, 20]);
        assert_eq!(AvpDataType::Address.parse(&bytes).unwrap(), value);

        assert_eq!(AvpValue::Unsigned64(1024).encode(), vec![0, 0, 0, 0, 0, 0, 4, 0]);
        assert_eq!(AvpValue::Enumerated(1).encode(), vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_from_xml_name() {
        assert_eq!(AvpDataType::from_xml_name("UTF8String").unwrap(), AvpDataType::Utf8String);
        assert_eq!(AvpDataType::from_xml_name("IPv4").unwrap(), AvpDataType::OctetString);
        assert!(AvpDataType::from_xml_name("Bogus").is_err());
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(AvpValue::Enumerated(3).as_u32(), Some(3));
        assert_eq!(AvpValue::Enumerated(-1).as_u32(), None);
        assert_eq!(AvpValue::Unsigned32(7).as_u64(), Some(7));
        assert_eq!(AvpValue::Utf8String("x".into()).as_u32(), None);
    }
}
