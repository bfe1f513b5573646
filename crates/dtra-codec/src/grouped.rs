use dtra_core::diameter::MAX_LENGTH_24;
use dtra_core::{DiameterAvp, GatewayError, Result};

/// Wrap `children` into a grouped AVP, keeping the order they were supplied in
pub fn encode_grouped_avp(
    code: u32,
    vendor_id: Option<u32>,
    flags: u8,
    children: &[DiameterAvp],
) -> Result<DiameterAvp> {
    let mut data = Vec::new();
    for child in children {
        data.extend_from_slice(&child.serialize());
    }

    let avp = DiameterAvp::new(code, flags, vendor_id, data);
    if avp.wire_length() > MAX_LENGTH_24 {
        return Err(GatewayError::Encoding(format!(
            "grouped AVP {code} length {} exceeds 24-bit limit",
            avp.wire_length()
        )));
    }
    Ok(avp)
}

/// Split a grouped AVP back into its children
pub fn decode_grouped_avp(avp: &DiameterAvp) -> Result<Vec<DiameterAvp>> {
    DiameterAvp::parse_all(&avp.data).map_err(|e| {
        GatewayError::Decode(format!("grouped AVP {}: {e}", avp.code))
    })
}

/// First child with the given code and vendor; `None` when absent
pub fn find_child(
    children: &[DiameterAvp],
    code: u32,
    vendor_id: Option<u32>,
) -> Option<&DiameterAvp> {
    children
        .iter()
        .find(|avp| avp.code == code && avp.vendor_id == vendor_id)
}

/// Every child with the given code and vendor, in order
pub fn find_children(
    children: &[DiameterAvp],
    code: u32,
    vendor_id: Option<u32>,
) -> Vec<&DiameterAvp> {
    children
        .iter()
        .filter(|avp| avp.code == code && avp.vendor_id == vendor_id)
        .collect()
}
