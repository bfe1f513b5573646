use std::collections::HashMap;

use dtra_core::diameter::AVP_FLAG_MANDATORY;
use dtra_core::{DiameterAvp, GatewayError};

use crate::data_type::{AvpDataType, AvpValue, ParseError};
use crate::standard::StandardAvpCode;

/// AVP information
#[derive(Debug, Clone, PartialEq)]
pub struct AvpInfo {
    pub code: u32,
    pub name: String,
    pub data_type: AvpDataType,
    pub vendor_id: Option<u32>,
    pub mandatory: bool,
}

impl From<StandardAvpCode> for AvpInfo {
    fn from(avp: StandardAvpCode) -> Self {
        Self {
            code: avp.code(),
            name: avp.name().to_string(),
            data_type: avp.data_type(),
            vendor_id: avp.vendor_id(),
            mandatory: avp.is_mandatory(),
        }
    }
}

/// Dictionary manager for AVP lookup, parsing and building.
///
/// Built once at startup (built-ins plus any XML extensions) and then shared
/// read-only behind an `Arc`.
#[derive(Debug, Clone)]
pub struct DictionaryManager {
    avps: HashMap<(u32, u32), AvpInfo>,
}

fn key(code: u32, vendor_id: Option<u32>) -> (u32, u32) {
    (code, vendor_id.unwrap_or(0))
}

impl DictionaryManager {
    /// Create dictionary manager holding the built-in definitions
    pub fn new() -> Self {
        let avps = StandardAvpCode::ALL
            .iter()
            .map(|avp| (key(avp.code(), avp.vendor_id()), AvpInfo::from(*avp)))
            .collect();
        Self { avps }
    }

    /// Add or replace a definition, returning the one it replaced
    pub fn insert(&mut self, info: AvpInfo) -> Option<AvpInfo> {
        self.avps.insert(key(info.code, info.vendor_id), info)
    }

    /// Number of known definitions
    pub fn len(&self) -> usize {
        self.avps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.avps.is_empty()
    }

    /// Lookup AVP information by code and vendor
    pub fn lookup(&self, code: u32, vendor_id: Option<u32>) -> Option<&AvpInfo> {
        self.avps.get(&key(code, vendor_id))
    }

    /// Lookup AVP information by name
    pub fn lookup_by_name(&self, name: &str) -> Option<&AvpInfo> {
        self.avps.values().find(|info| info.name == name)
    }

    /// Parse AVP data
    pub fn parse_avp(
        &self,
        code: u32,
        vendor_id: Option<u32>,
        data: &[u8],
    ) -> Result<AvpValue, ParseError> {
        let info = self
            .lookup(code, vendor_id)
            .ok_or(ParseError::UnknownAvpCode(code))?;

        info.data_type.parse(data)
    }

    /// Decode a received AVP into its typed value
    pub fn decode(&self, avp: &DiameterAvp) -> dtra_core::Result<AvpValue> {
        self.parse_avp(avp.code, avp.vendor_id, &avp.data)
            .map_err(|e| GatewayError::InvalidAvpValue {
                code: avp.code,
                reason: e.to_string(),
            })
    }

    /// Build an AVP from a typed value, taking flags from the definition
    pub fn build_avp(
        &self,
        code: u32,
        vendor_id: Option<u32>,
        value: AvpValue,
    ) -> dtra_core::Result<DiameterAvp> {
        let info = self
            .lookup(code, vendor_id)
            .ok_or_else(|| GatewayError::Encoding(ParseError::UnknownAvpCode(code).to_string()))?;

        if info.data_type != value.data_type() {
            let mismatch = ParseError::TypeMismatch {
                code,
                expected: info.data_type,
                actual: value.data_type(),
            };
            return Err(GatewayError::Encoding(mismatch.to_string()));
        }

        let flags = if info.mandatory { AVP_FLAG_MANDATORY } else { 0 };
        Ok(DiameterAvp::new(code, flags, info.vendor_id, value.encode()))
    }
}

impl Default for DictionaryManager {
    fn default() -> Self {
        Self::new()
    }
}
