use dtra_core::{GatewayError, Result};

/// Vendor id, sub-type and vendor length in front of the payload
pub const VSA_HEADER_LEN: usize = 6;

/// Largest payload whose whole VSA still fits one RADIUS attribute value
/// (253 bytes)
pub const MAX_VENDOR_PAYLOAD: usize = 253 - VSA_HEADER_LEN;

/// Vendor-Specific attribute value (RADIUS type 26), decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorAttribute {
    pub vendor_id: u32,
    pub sub_type: u8,
    pub payload: Vec<u8>,
}

/// Build the value of a Vendor-Specific attribute:
/// `[vendor_id (4, BE)] [sub_type] [len(payload) + 2] [payload...]`
pub fn encode_vendor_attribute(vendor_id: u32, sub_type: u8, payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() > MAX_VENDOR_PAYLOAD {
        return Err(GatewayError::Encoding(format!(
            "vendor attribute {vendor_id}/{sub_type} payload is {} bytes (max {MAX_VENDOR_PAYLOAD})",
            payload.len()
        )));
    }

    let mut bytes = Vec::with_capacity(VSA_HEADER_LEN + payload.len());
    bytes.extend_from_slice(&vendor_id.to_be_bytes());
    bytes.push(sub_type);
    bytes.push((payload.len() + 2) as u8);
    bytes.extend_from_slice(payload);
    Ok(bytes)
}

/// Inverse of [`encode_vendor_attribute`]
pub fn decode_vendor_attribute(bytes: &[u8]) -> Result<VendorAttribute> {
    if bytes.len() < VSA_HEADER_LEN {
        return Err(GatewayError::Decode(format!(
            "vendor attribute too short: {} bytes",
            bytes.len()
        )));
    }

    let vendor_id = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let sub_type = bytes[4];
    let length = bytes[5] as usize;
    if length < 2 || length != bytes.len() - 4 {
        return Err(GatewayError::Decode(format!(
            "vendor attribute {vendor_id}/{sub_type} length {length} does not match {} remaining bytes",
            bytes.len() - 4
        )));
    }

    Ok(VendorAttribute {
        vendor_id,
        sub_type,
        payload: bytes[VSA_HEADER_LEN..].to_vec(),
    })
}
