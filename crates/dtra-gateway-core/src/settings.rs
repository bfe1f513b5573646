/// Authentication vector returned in every successful AIA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EutranVector {
    pub rand: Vec<u8>,
    pub xres: Vec<u8>,
    pub autn: Vec<u8>,
    pub kasme: Vec<u8>,
}

impl Default for EutranVector {
    fn default() -> Self {
        Self {
            rand: b"\x94\xbf/T\xc3v\xf3\x0e\x87\x83\x06k'\x18Z\x19".to_vec(),
            xres: b"F\xf0\"\xb9%#\xf58".to_vec(),
            autn: b"\xc7G!;\xad~\x80\x00)\x08o%\x11\x0cP_".to_vec(),
            kasme: b"\xbf\x00\xf9\x80h3\"\x0e\xa1\x1c\xfa\x93\x03@\xd6\xf8\x02\xd51Y\xeb\xc4\x9d=\t\x14{\xeb!\xec\xcb:"
                .to_vec(),
        }
    }
}

/// Fixed values the translator stamps onto requests and answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorSettings {
    pub origin_host: String,
    pub origin_realm: String,
    /// Sent as User-Password; the Diameter side carries no credential
    pub placeholder_password: String,
    pub called_station_id: String,
    pub calling_station_id: String,
    /// Session-Timeout in AA-Answers, seconds
    pub session_timeout: u32,
    pub granted_cc_time: u32,
    pub granted_input_octets: u64,
    pub granted_output_octets: u64,
    pub eutran_vector: EutranVector,
}

impl TranslatorSettings {
    pub fn new(origin_host: impl Into<String>, origin_realm: impl Into<String>) -> Self {
        Self {
            origin_host: origin_host.into(),
            origin_realm: origin_realm.into(),
            placeholder_password: "12345".to_string(),
            called_station_id: "00-14-22-01-23-45".to_string(),
            calling_station_id: "00-14-22-67-89-AB".to_string(),
            session_timeout: 7200,
            granted_cc_time: 5,
            granted_input_octets: 1024,
            granted_output_octets: 1024,
            eutran_vector: EutranVector::default(),
        }
    }
}
