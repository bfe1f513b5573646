use crate::error::{GatewayError, Result};

/// Diameter header length in bytes
pub const HEADER_LEN: usize = 20;

/// Largest value representable in the 24-bit length fields
pub const MAX_LENGTH_24: usize = 0x00FF_FFFF;

/// Diameter packet header (20 bytes)
#[derive(Debug, Clone, PartialEq)]
pub struct DiameterHeader {
    pub version: u8,
    pub length: u32,
    pub flags: u8,
    pub command_code: u32,
    pub application_id: u32,
    pub hop_by_hop_id: u32,
    pub end_to_end_id: u32,
}

/// Diameter AVP
#[derive(Debug, Clone, PartialEq)]
pub struct DiameterAvp {
    pub code: u32,
    pub flags: u8,
    pub vendor_id: Option<u32>,
    pub data: Vec<u8>,
}

/// Complete Diameter packet
#[derive(Debug, Clone, PartialEq)]
pub struct DiameterPacket {
    pub header: DiameterHeader,
    pub avps: Vec<DiameterAvp>,
}

// Header flags
pub const FLAG_REQUEST: u8 = 0x80;
pub const FLAG_PROXIABLE: u8 = 0x40;
pub const FLAG_ERROR: u8 = 0x20;
pub const FLAG_RETRANSMIT: u8 = 0x10;

// AVP flags
pub const AVP_FLAG_VENDOR: u8 = 0x80;
pub const AVP_FLAG_MANDATORY: u8 = 0x40;
pub const AVP_FLAG_PROTECTED: u8 = 0x20;

impl DiameterHeader {
    /// Build a request header; length is filled in on serialize
    pub fn request(command_code: u32, application_id: u32) -> Self {
        Self {
            version: 1,
            length: HEADER_LEN as u32,
            flags: FLAG_REQUEST | FLAG_PROXIABLE,
            command_code,
            application_id,
            hop_by_hop_id: 0,
            end_to_end_id: 0,
        }
    }

    /// Parse header from bytes
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(GatewayError::Decode("Header too short".to_string()));
        }

        let version = data[0];
        if version != 1 {
            return Err(GatewayError::Decode(format!("Invalid version: {version}")));
        }

        let length = u32::from_be_bytes([0, data[1], data[2], data[3]]);
        if (length as usize) < HEADER_LEN {
            return Err(GatewayError::Decode(format!("Invalid message length: {length}")));
        }
        let flags = data[4];
        let command_code = u32::from_be_bytes([0, data[5], data[6], data[7]]);
        let application_id = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
        let hop_by_hop_id = u32::from_be_bytes([data[12], data[13], data[14], data[15]]);
        let end_to_end_id = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);

        Ok(Self {
            version,
            length,
            flags,
            command_code,
            application_id,
            hop_by_hop_id,
            end_to_end_id,
        })
    }

    /// Serialize header to bytes
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN);

        bytes.push(self.version);

        let length_bytes = self.length.to_be_bytes();
        bytes.extend_from_slice(&length_bytes[1..4]);

        bytes.push(self.flags);

        let cmd_bytes = self.command_code.to_be_bytes();
        bytes.extend_from_slice(&cmd_bytes[1..4]);

        bytes.extend_from_slice(&self.application_id.to_be_bytes());
        bytes.extend_from_slice(&self.hop_by_hop_id.to_be_bytes());
        bytes.extend_from_slice(&self.end_to_end_id.to_be_bytes());

        bytes
    }

    /// Header of the answer to this request.
    /// Keeps command code, application and both identifiers; clears R, E and T.
    pub fn answer(&self) -> Self {
        Self {
            version: 1,
            length: HEADER_LEN as u32,
            flags: self.flags & FLAG_PROXIABLE,
            command_code: self.command_code,
            application_id: self.application_id,
            hop_by_hop_id: self.hop_by_hop_id,
            end_to_end_id: self.end_to_end_id,
        }
    }

    /// Check if this is a request
    pub fn is_request(&self) -> bool {
        (self.flags & FLAG_REQUEST) != 0
    }

    /// Check if this is an answer
    pub fn is_answer(&self) -> bool {
        !self.is_request()
    }
}

impl DiameterAvp {
    /// Create an AVP; the V flag follows `vendor_id`
    pub fn new(code: u32, flags: u8, vendor_id: Option<u32>, data: Vec<u8>) -> Self {
        let flags = match vendor_id {
            Some(_) => flags | AVP_FLAG_VENDOR,
            None => flags & !AVP_FLAG_VENDOR,
        };
        Self {
            code,
            flags,
            vendor_id,
            data,
        }
    }

    /// Mandatory base-protocol AVP
    pub fn mandatory(code: u32, data: Vec<u8>) -> Self {
        Self::new(code, AVP_FLAG_MANDATORY, None, data)
    }

    /// Parse AVP from bytes
    pub fn parse(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < 8 {
            return Err(GatewayError::Decode("AVP too short".to_string()));
        }

        let code = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let flags = data[4];
        let length = u32::from_be_bytes([0, data[5], data[6], data[7]]) as usize;

        let mut offset = 8;
        let vendor_id = if (flags & AVP_FLAG_VENDOR) != 0 {
            if data.len() < 12 {
                return Err(GatewayError::Decode("Vendor AVP too short".to_string()));
            }
            let vid = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
            offset = 12;
            Some(vid)
        } else {
            None
        };

        if length < offset {
            return Err(GatewayError::Decode(format!(
                "Invalid AVP length {length} for code {code}"
            )));
        }

        let data_length = length - offset;
        if data.len() < offset + data_length {
            return Err(GatewayError::Decode("AVP data truncated".to_string()));
        }

        let avp_data = data[offset..offset + data_length].to_vec();

        // Calculate padding (align to 4 bytes)
        let padded_length = length.div_ceil(4) * 4;

        Ok((
            Self {
                code,
                flags,
                vendor_id,
                data: avp_data,
            },
            padded_length,
        ))
    }

    /// Parse a sequence of AVPs filling `data` exactly (message body or grouped payload)
    pub fn parse_all(data: &[u8]) -> Result<Vec<Self>> {
        let mut avps = Vec::new();
        let mut offset = 0;

        while offset < data.len() {
            let (avp, avp_length) = Self::parse(&data[offset..])?;
            avps.push(avp);
            // Last AVP may omit its trailing padding
            offset = (offset + avp_length).min(data.len());
        }

        Ok(avps)
    }

    /// Length on the wire, header included, padding excluded
    pub fn wire_length(&self) -> usize {
        let data_offset = if self.vendor_id.is_some() { 12 } else { 8 };
        data_offset + self.data.len()
    }

    /// Serialize AVP to bytes
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.wire_length() + 3);

        bytes.extend_from_slice(&self.code.to_be_bytes());
        bytes.push(self.flags);

        let length_bytes = (self.wire_length() as u32).to_be_bytes();
        bytes.extend_from_slice(&length_bytes[1..4]);

        if let Some(vid) = self.vendor_id {
            bytes.extend_from_slice(&vid.to_be_bytes());
        }

        bytes.extend_from_slice(&self.data);

        // Add padding
        while bytes.len() % 4 != 0 {
            bytes.push(0);
        }

        bytes
    }

    /// Check if the M bit is set
    pub fn is_mandatory(&self) -> bool {
        (self.flags & AVP_FLAG_MANDATORY) != 0
    }

    /// Data as a big-endian Unsigned32
    pub fn as_u32(&self) -> Option<u32> {
        let bytes: [u8; 4] = self.data.as_slice().try_into().ok()?;
        Some(u32::from_be_bytes(bytes))
    }

    /// Data as UTF-8 text
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

impl DiameterPacket {
    /// Empty packet with the given header
    pub fn new(header: DiameterHeader) -> Self {
        Self {
            header,
            avps: Vec::new(),
        }
    }

    /// Parse complete packet from bytes
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = DiameterHeader::parse(data)?;
        let length = header.length as usize;

        if data.len() < length {
            return Err(GatewayError::Decode("Packet truncated".to_string()));
        }

        let avps = DiameterAvp::parse_all(&data[HEADER_LEN..length])?;

        Ok(Self { header, avps })
    }

    /// Serialize packet to bytes
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        // Serialize AVPs first to calculate total length
        let mut avp_bytes = Vec::new();
        for avp in &self.avps {
            avp_bytes.extend_from_slice(&avp.serialize());
        }

        // Update header length
        let total_length = HEADER_LEN + avp_bytes.len();
        let mut header = self.header.clone();
        header.length = total_length as u32;

        bytes.extend_from_slice(&header.serialize());
        bytes.extend_from_slice(&avp_bytes);

        bytes
    }

    /// Append an AVP
    pub fn push_avp(&mut self, avp: DiameterAvp) {
        self.avps.push(avp);
    }

    /// Put an AVP in position 1, ahead of everything already added
    pub fn insert_first(&mut self, avp: DiameterAvp) {
        self.avps.insert(0, avp);
    }

    /// Find AVP by code
    pub fn find_avp(&self, code: u32) -> Option<&DiameterAvp> {
        self.avps.iter().find(|avp| avp.code == code)
    }

    /// Find AVP by code and vendor
    pub fn find_vendor_avp(&self, code: u32, vendor_id: u32) -> Option<&DiameterAvp> {
        self.avps
            .iter()
            .find(|avp| avp.code == code && avp.vendor_id == Some(vendor_id))
    }

    /// Get all AVPs with specific code
    pub fn find_all_avps(&self, code: u32) -> Vec<&DiameterAvp> {
        self.avps.iter().filter(|avp| avp.code == code).collect()
    }

    /// Result-Code carried by an answer, if any
    pub fn result_code(&self) -> Option<u32> {
        self.find_avp(dtra_shared::AVP_RESULT_CODE)
            .and_then(DiameterAvp::as_u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_parse_serialize() {
        let data = vec![
            1, 0, 0, 20, // Version, Length (20)
            0x80, 0, 1, 62, // Flags (Request), Command Code (318)
            0x01, 0, 0, 0x23, // Application ID (16777251)
            0, 0, 0, 1, // Hop-by-Hop ID
            0, 0, 0, 2, // End-to-End ID
        ];

        let header = DiameterHeader::parse(&data).unwrap();
        assert_eq!(header.version, 1);
        assert_eq!(header.length, 20);
        assert_eq!(header.command_code, 318);
        assert_eq!(header.application_id, 16777251);
        assert!(header.is_request());

        let serialized = header.serialize();
        assert_eq!(serialized, data);
    }

    #[test]
    fn test_header_rejects_bad_version_and_length() {
        let mut data = vec![0u8; 20];
        data[0] = 2;
        assert!(DiameterHeader::parse(&data).is_err());

        data[0] = 1;
        data[3] = 12; // length below header size
        assert!(DiameterHeader::parse(&data).is_err());
    }

    #[test]
    fn test_answer_header_mirrors_request() {
        let mut request = DiameterHeader::request(272, 4);
        request.hop_by_hop_id = 77;
        request.end_to_end_id = 88;
        request.flags |= FLAG_RETRANSMIT;

        let answer = request.answer();
        assert!(answer.is_answer());
        assert_eq!(answer.flags, FLAG_PROXIABLE);
        assert_eq!(answer.command_code, 272);
        assert_eq!(answer.application_id, 4);
        assert_eq!(answer.hop_by_hop_id, 77);
        assert_eq!(answer.end_to_end_id, 88);
    }

    #[test]
    fn test_avp_parse_serialize() {
        let data = vec![
            0, 0, 1, 8, // Code (264)
            0x40, 0, 0, 12, // Flags (Mandatory), Length (12)
            0x74, 0x65, 0x73, 0x74, // Data "test"
        ];

        let (avp, length) = DiameterAvp::parse(&data).unwrap();
        assert_eq!(avp.code, 264);
        assert_eq!(avp.flags, 0x40);
        assert_eq!(avp.data, b"test");
        assert_eq!(length, 12);

        let serialized = avp.serialize();
        assert_eq!(&serialized[..12], &data[..]);
    }

    #[test]
    fn test_vendor_avp_padding() {
        let avp = DiameterAvp::new(1032, AVP_FLAG_MANDATORY, Some(10415), vec![1, 2, 3]);
        assert_eq!(avp.flags, AVP_FLAG_VENDOR | AVP_FLAG_MANDATORY);
        assert_eq!(avp.wire_length(), 15);

        let bytes = avp.serialize();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[5..8], &[0, 0, 15]);

        let (parsed, consumed) = DiameterAvp::parse(&bytes).unwrap();
        assert_eq!(consumed, 16);
        assert_eq!(parsed.vendor_id, Some(10415));
        assert_eq!(parsed.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_avp_length_shorter_than_header() {
        let data = vec![0, 0, 1, 8, 0x80, 0, 0, 8, 0, 0, 0x28, 0xAF];
        assert!(DiameterAvp::parse(&data).is_err());
    }

    #[test]
    fn test_packet_parse() {
        let data = vec![
            1, 0, 0, 32, // Version, Length (32)
            0x80, 0, 1, 1, // Flags, Command Code
            0, 0, 0, 0, // Application ID
            0, 0, 0, 1, // Hop-by-Hop ID
            0, 0, 0, 2, // End-to-End ID
            // AVP
            0, 0, 1, 8, // Code (264)
            0x40, 0, 0, 12, // Flags, Length
            0x74, 0x65, 0x73, 0x74, // Data "test"
        ];

        let packet = DiameterPacket::parse(&data).unwrap();
        assert_eq!(packet.header.command_code, 257);
        assert_eq!(packet.avps.len(), 1);
        assert_eq!(packet.avps[0].code, 264);
        assert_eq!(packet.avps[0].as_str(), Some("test"));
    }

    #[test]
    fn test_packet_truncated() {
        let data = vec![1, 0, 0, 40, 0x80, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 2];
        assert!(DiameterPacket::parse(&data).is_err());
    }

    #[test]
    fn test_insert_first_and_result_code() {
        let mut packet = DiameterPacket::new(DiameterHeader::request(318, 16777251).answer());
        packet.push_avp(DiameterAvp::mandatory(268, 2001u32.to_be_bytes().to_vec()));
        packet.insert_first(DiameterAvp::mandatory(263, b"s1".to_vec()));

        assert_eq!(packet.avps[0].code, 263);
        assert_eq!(packet.result_code(), Some(2001));

        let reparsed = DiameterPacket::parse(&packet.serialize()).unwrap();
        assert_eq!(reparsed, DiameterPacket {
            header: DiameterHeader { length: reparsed.header.length, ..packet.header.clone() },
            avps: packet.avps.clone(),
        });
    }
}
