use std::net::IpAddr;
use std::sync::Arc;

use dtra_core::DiameterPacket;
use dtra_diameter_dict::{AvpValue, DictionaryManager};
use dtra_shared::*;
use tracing::{info, warn};

pub const PRODUCT_NAME: &str = "dtra";
pub const VENDOR_ID: u32 = 0;
pub const FIRMWARE_REVISION: u32 = 1;

/// Applications advertised in the CEA
const ADVERTISED_APPLICATIONS: [u32; 4] =
    [APP_ID_NASREQ, APP_ID_CREDIT_CONTROL, APP_ID_S6A, APP_ID_S6B];

/// Base-protocol answers produced by the listener itself (CEA, DWA)
#[derive(Debug, Clone)]
pub struct BaseProtocol {
    dictionary: Arc<DictionaryManager>,
    origin_host: String,
    origin_realm: String,
}

impl BaseProtocol {
    pub fn new(
        dictionary: Arc<DictionaryManager>,
        origin_host: impl Into<String>,
        origin_realm: impl Into<String>,
    ) -> Self {
        Self {
            dictionary,
            origin_host: origin_host.into(),
            origin_realm: origin_realm.into(),
        }
    }

    fn push(&self, answer: &mut DiameterPacket, code: u32, vendor: Option<u32>, value: AvpValue) {
        match self.dictionary.build_avp(code, vendor, value) {
            Ok(avp) => answer.push_avp(avp),
            Err(e) => warn!(avp_code = code, error = %e, "Omitting AVP from base answer"),
        }
    }

    fn answer_with_origin(&self, request: &DiameterPacket) -> DiameterPacket {
        let mut answer = DiameterPacket::new(request.header.answer());
        self.push(&mut answer, AVP_RESULT_CODE, None, AvpValue::Unsigned32(RESULT_CODE_SUCCESS));
        self.push(&mut answer, AVP_ORIGIN_HOST, None, AvpValue::DiameterIdentity(self.origin_host.clone()));
        self.push(&mut answer, AVP_ORIGIN_REALM, None, AvpValue::DiameterIdentity(self.origin_realm.clone()));
        answer
    }

    /// Capabilities-Exchange-Answer. `local_ip` goes into Host-IP-Address.
    pub fn capabilities_answer(&self, request: &DiameterPacket, local_ip: IpAddr) -> DiameterPacket {
        let peer_host = request
            .find_avp(AVP_ORIGIN_HOST)
            .and_then(|avp| avp.as_str())
            .unwrap_or("<unknown>");
        info!(peer_host, "Capabilities exchange");

        let mut answer = self.answer_with_origin(request);
        self.push(&mut answer, AVP_HOST_IP_ADDRESS, None, AvpValue::Address(local_ip));
        self.push(&mut answer, AVP_VENDOR_ID, None, AvpValue::Unsigned32(VENDOR_ID));
        self.push(&mut answer, AVP_PRODUCT_NAME, None, AvpValue::Utf8String(PRODUCT_NAME.to_string()));
        self.push(&mut answer, AVP_FIRMWARE_REVISION, None, AvpValue::Unsigned32(FIRMWARE_REVISION));
        for app in ADVERTISED_APPLICATIONS {
            self.push(&mut answer, AVP_AUTH_APPLICATION_ID, None, AvpValue::Unsigned32(app));
        }
        self.push(&mut answer, AVP_SUPPORTED_VENDOR_ID, None, AvpValue::Unsigned32(VENDOR_3GPP));
        answer
    }

    /// Device-Watchdog-Answer
    pub fn watchdog_answer(&self, request: &DiameterPacket) -> DiameterPacket {
        self.answer_with_origin(request)
    }

    /// Answer for a base-protocol request, `None` for anything else
    pub fn answer(&self, request: &DiameterPacket, local_ip: IpAddr) -> Option<DiameterPacket> {
        if !request.header.is_request() {
            return None;
        }
        match request.header.command_code {
            CMD_CER => Some(self.capabilities_answer(request, local_ip)),
            CMD_DWR => Some(self.watchdog_answer(request)),
            _ => None,
        }
    }
}
