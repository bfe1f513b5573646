use dtra_codec::encode_grouped_avp;
use dtra_core::diameter::{AVP_FLAG_MANDATORY, FLAG_ERROR};
use dtra_core::{DiameterAvp, DiameterHeader, DiameterPacket, GatewayError, Result};
use dtra_diameter_dict::{AvpValue, DictionaryManager};
use dtra_radius::RadiusResult;
use dtra_shared::*;
use tracing::warn;

use crate::translator::MessageTranslator;
use crate::types::*;

const TGPP: Option<u32> = Some(VENDOR_3GPP);

/// Answer ready to be written back to the Diameter peer
#[derive(Debug, Clone, PartialEq)]
pub struct DiameterAnswer {
    pub packet: DiameterPacket,
    pub result_code: u32,
}

/// Best-effort answer assembly: an AVP that fails to build is logged and
/// left out, the rest of the answer still goes out
struct AnswerBuilder<'a> {
    dict: &'a DictionaryManager,
    packet: DiameterPacket,
}

impl<'a> AnswerBuilder<'a> {
    fn new(dict: &'a DictionaryManager, header: &DiameterHeader) -> Self {
        Self {
            dict,
            packet: DiameterPacket::new(header.answer()),
        }
    }

    fn avp(&self, code: u32, vendor: Option<u32>, value: AvpValue) -> Result<DiameterAvp> {
        self.dict.build_avp(code, vendor, value)
    }

    fn grouped(
        &self,
        code: u32,
        vendor: Option<u32>,
        children: Vec<Result<DiameterAvp>>,
    ) -> Result<DiameterAvp> {
        let children = children.into_iter().collect::<Result<Vec<_>>>()?;
        let info = self
            .dict
            .lookup(code, vendor)
            .ok_or_else(|| GatewayError::Encoding(format!("no definition for grouped AVP {code}")))?;
        let flags = if info.mandatory { AVP_FLAG_MANDATORY } else { 0 };
        encode_grouped_avp(code, vendor, flags, &children)
    }

    fn push(&mut self, code: u32, built: Result<DiameterAvp>) {
        match built {
            Ok(avp) => self.packet.push_avp(avp),
            Err(e) => warn!(avp_code = code, error = %e, "Omitting AVP from answer"),
        }
    }

    fn push_value(&mut self, code: u32, vendor: Option<u32>, value: AvpValue) {
        let built = self.avp(code, vendor, value);
        self.push(code, built);
    }

    fn session_id_first(&mut self, session_id: &str) {
        match self.avp(AVP_SESSION_ID, None, AvpValue::Utf8String(session_id.to_string())) {
            Ok(avp) => self.packet.insert_first(avp),
            Err(e) => warn!(error = %e, "Omitting Session-Id from answer"),
        }
    }

    fn origin(&mut self, host: &str, realm: &str) {
        self.push_value(AVP_ORIGIN_HOST, None, AvpValue::DiameterIdentity(host.to_string()));
        self.push_value(AVP_ORIGIN_REALM, None, AvpValue::DiameterIdentity(realm.to_string()));
    }

    fn framed(&mut self, result: Option<&RadiusResult>) {
        if let Some((ip, mtu)) = result.and_then(RadiusResult::framed) {
            self.push_value(AVP_FRAMED_IP_ADDRESS, None, AvpValue::OctetString(ip.octets().to_vec()));
            self.push_value(AVP_FRAMED_MTU, None, AvpValue::Unsigned32(mtu));
        }
    }

    fn finish(mut self, result_code: u32) -> DiameterAnswer {
        if is_protocol_error(result_code) {
            self.packet.header.flags |= FLAG_ERROR;
        }
        DiameterAnswer {
            packet: self.packet,
            result_code,
        }
    }
}

fn enumerated(value: u32) -> AvpValue {
    AvpValue::Enumerated(value as i32)
}

impl MessageTranslator {
    /// Build the answer to `request` carrying `result_code`
    pub fn to_diameter_answer(
        &self,
        header: &DiameterHeader,
        request: &DiameterRequest,
        result_code: u32,
        result: Option<&RadiusResult>,
    ) -> DiameterAnswer {
        let mut b = AnswerBuilder::new(&self.dictionary, header);
        let success = is_success(result_code);

        b.push_value(AVP_RESULT_CODE, None, AvpValue::Unsigned32(result_code));
        match request {
            DiameterRequest::AuthInfo(air) => {
                b.origin(&self.settings.origin_host, &self.settings.origin_realm);
                self.air_body(&mut b, air, success);
                b.framed(result);
            }
            DiameterRequest::AuthAuthz(aar) => {
                b.push_value(
                    AVP_AUTH_APPLICATION_ID,
                    None,
                    AvpValue::Unsigned32(aar.auth_application_id.unwrap_or(header.application_id)),
                );
                if let Some(kind) = aar.auth_request_type {
                    b.push_value(AVP_AUTH_REQUEST_TYPE, None, enumerated(kind));
                }
                b.push_value(
                    AVP_SESSION_TIMEOUT,
                    None,
                    AvpValue::Unsigned32(self.settings.session_timeout),
                );
                b.origin(&self.settings.origin_host, &self.settings.origin_realm);
                b.framed(result);
            }
            DiameterRequest::CreditControl(ccr) => {
                b.origin(&self.settings.origin_host, &self.settings.origin_realm);
                self.ccr_body(&mut b, header, ccr);
            }
            DiameterRequest::DisconnectPeer(_) => {
                b.origin(&self.settings.origin_host, &self.settings.origin_realm);
            }
        }

        if let Some(session_id) = request.session_id() {
            b.session_id_first(session_id);
        }
        b.finish(result_code)
    }

    /// Answer for a request that could not be decoded or translated.
    /// Carries the Session-Id when it is known.
    pub fn error_answer(
        &self,
        header: &DiameterHeader,
        session_id: Option<&str>,
        result_code: u32,
    ) -> DiameterAnswer {
        let mut b = AnswerBuilder::new(&self.dictionary, header);
        b.push_value(AVP_RESULT_CODE, None, AvpValue::Unsigned32(result_code));
        b.origin(&self.settings.origin_host, &self.settings.origin_realm);
        if let Some(session_id) = session_id {
            b.session_id_first(session_id);
        }
        b.finish(result_code)
    }

    fn air_body(&self, b: &mut AnswerBuilder, air: &AuthInfoRequest, success: bool) {
        let vsai = air.vendor_specific_application_id.clone().unwrap_or_default();
        let group = b.grouped(
            AVP_VENDOR_SPECIFIC_APPLICATION_ID,
            None,
            vec![
                b.avp(
                    AVP_AUTH_APPLICATION_ID,
                    None,
                    AvpValue::Unsigned32(vsai.auth_application_id.unwrap_or(APP_ID_S6A)),
                ),
                b.avp(
                    AVP_VENDOR_ID,
                    None,
                    AvpValue::Unsigned32(vsai.vendor_id.unwrap_or(VENDOR_3GPP)),
                ),
            ],
        );
        b.push(AVP_VENDOR_SPECIFIC_APPLICATION_ID, group);

        b.push_value(
            AVP_AUTH_SESSION_STATE,
            None,
            enumerated(
                air.auth_session_state
                    .unwrap_or(AUTH_SESSION_STATE_NO_STATE_MAINTAINED),
            ),
        );

        if success {
            let v = &self.settings.eutran_vector;
            let vector = b.grouped(
                AVP_EUTRAN_VECTOR,
                TGPP,
                vec![
                    b.avp(AVP_RAND, TGPP, AvpValue::OctetString(v.rand.clone())),
                    b.avp(AVP_XRES, TGPP, AvpValue::OctetString(v.xres.clone())),
                    b.avp(AVP_AUTN, TGPP, AvpValue::OctetString(v.autn.clone())),
                    b.avp(AVP_KASME, TGPP, AvpValue::OctetString(v.kasme.clone())),
                ],
            );
            let info = b.grouped(AVP_AUTHENTICATION_INFO, TGPP, vec![vector]);
            b.push(AVP_AUTHENTICATION_INFO, info);
        }
    }

    fn ccr_body(
        &self,
        b: &mut AnswerBuilder,
        header: &DiameterHeader,
        ccr: &CreditControlRequest,
    ) {
        b.push_value(
            AVP_AUTH_APPLICATION_ID,
            None,
            AvpValue::Unsigned32(ccr.auth_application_id.unwrap_or(header.application_id)),
        );
        b.push_value(AVP_CC_REQUEST_TYPE, None, enumerated(ccr.cc_request_type.as_u32()));
        if let Some(number) = ccr.cc_request_number {
            b.push_value(AVP_CC_REQUEST_NUMBER, None, AvpValue::Unsigned32(number));
        }

        // Granted on every Initial/Update answer, whatever the result code
        if ccr.cc_request_type.grants_quota() {
            let s = &self.settings;
            let granted = b.grouped(
                AVP_GRANTED_SERVICE_UNIT,
                None,
                vec![
                    b.avp(AVP_CC_TIME, None, AvpValue::Unsigned32(s.granted_cc_time)),
                    b.avp(AVP_CC_OUTPUT_OCTETS, None, AvpValue::Unsigned64(s.granted_output_octets)),
                    b.avp(AVP_CC_INPUT_OCTETS, None, AvpValue::Unsigned64(s.granted_input_octets)),
                ],
            );
            let mscc = b.grouped(AVP_MULTIPLE_SERVICES_CREDIT_CONTROL, None, vec![granted]);
            b.push(AVP_MULTIPLE_SERVICES_CREDIT_CONTROL, mscc);
        }
    }
}
