use dtra_codec::{decode_vendor_attribute, VendorAttribute};
use dtra_core::{GatewayError, Result};

use crate::attribute::{AttributeType, RadiusAttribute, RadiusCode};

pub const RADIUS_HDR_LEN: usize = 20;
pub const RADIUS_MAX_LEN: usize = 4096;
pub const RADIUS_AUTH_LEN: usize = 16;

/// Largest attribute value (255 minus the type and length bytes)
pub const MAX_ATTRIBUTE_VALUE: usize = 253;

/// Decoded RADIUS packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadiusPacket {
    pub code: RadiusCode,
    pub identifier: u8,
    pub authenticator: [u8; RADIUS_AUTH_LEN],
    pub attributes: Vec<RadiusAttribute>,
}

impl RadiusPacket {
    pub fn new(code: RadiusCode, identifier: u8) -> Self {
        Self {
            code,
            identifier,
            authenticator: [0; RADIUS_AUTH_LEN],
            attributes: Vec::new(),
        }
    }

    pub fn add(&mut self, attribute: RadiusAttribute) {
        self.attributes.push(attribute);
    }

    /// Serialize to wire format
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        for attr in &self.attributes {
            if attr.value.len() > MAX_ATTRIBUTE_VALUE {
                return Err(GatewayError::Encoding(format!(
                    "RADIUS attribute {} value is {} bytes (max {MAX_ATTRIBUTE_VALUE})",
                    attr.type_code,
                    attr.value.len()
                )));
            }
            payload.push(attr.type_code);
            payload.push((attr.value.len() + 2) as u8);
            payload.extend_from_slice(&attr.value);
        }

        let length = RADIUS_HDR_LEN + payload.len();
        if length > RADIUS_MAX_LEN {
            return Err(GatewayError::Encoding(format!(
                "RADIUS packet is {length} bytes (max {RADIUS_MAX_LEN})"
            )));
        }

        let mut bytes = Vec::with_capacity(length);
        bytes.push(self.code as u8);
        bytes.push(self.identifier);
        bytes.extend_from_slice(&(length as u16).to_be_bytes());
        bytes.extend_from_slice(&self.authenticator);
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Parse from wire format. Trailing bytes past the length field are ignored.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < RADIUS_HDR_LEN {
            return Err(GatewayError::Decode("RADIUS packet too short".to_string()));
        }

        let code = RadiusCode::from_u8(data[0])
            .ok_or_else(|| GatewayError::Decode(format!("Unknown RADIUS code: {}", data[0])))?;
        let identifier = data[1];
        let length = u16::from_be_bytes([data[2], data[3]]) as usize;
        if !(RADIUS_HDR_LEN..=RADIUS_MAX_LEN).contains(&length) || data.len() < length {
            return Err(GatewayError::Decode(format!(
                "Invalid RADIUS length {length} for {} received bytes",
                data.len()
            )));
        }

        let mut authenticator = [0u8; RADIUS_AUTH_LEN];
        authenticator.copy_from_slice(&data[4..RADIUS_HDR_LEN]);

        let mut attributes = Vec::new();
        let mut offset = RADIUS_HDR_LEN;
        while offset < length {
            if offset + 2 > length {
                return Err(GatewayError::Decode("Truncated RADIUS attribute".to_string()));
            }
            let type_code = data[offset];
            let attr_len = data[offset + 1] as usize;
            if attr_len < 2 || offset + attr_len > length {
                return Err(GatewayError::Decode(format!(
                    "Invalid RADIUS attribute length {attr_len} for type {type_code}"
                )));
            }
            attributes.push(RadiusAttribute {
                type_code,
                value: data[offset + 2..offset + attr_len].to_vec(),
            });
            offset += attr_len;
        }

        Ok(Self {
            code,
            identifier,
            authenticator,
            attributes,
        })
    }

    /// First attribute of the given type
    pub fn attribute(&self, attr: AttributeType) -> Option<&RadiusAttribute> {
        self.attributes.iter().find(|a| a.type_code == attr.code())
    }

    /// Every decodable Vendor-Specific attribute, in packet order
    pub fn vendor_attributes(&self) -> Vec<VendorAttribute> {
        self.attributes
            .iter()
            .filter(|a| a.type_code == AttributeType::VendorSpecific.code())
            .filter_map(|a| decode_vendor_attribute(&a.value).ok())
            .collect()
    }
}
