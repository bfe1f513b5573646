use std::net::IpAddr;

use dtra_codec::{decode_grouped_avp, find_child, find_children};
use dtra_core::{DiameterAvp, DiameterHeader, DiameterPacket, GatewayError, Result};
use dtra_diameter_dict::{AvpValue, DictionaryManager};
use dtra_shared::*;

use crate::translator::MessageTranslator;
use crate::types::*;

const TGPP: Option<u32> = Some(VENDOR_3GPP);

/// Typed access to one AVP list (message body or grouped payload)
struct AvpReader<'a> {
    dict: &'a DictionaryManager,
    avps: &'a [DiameterAvp],
}

impl<'a> AvpReader<'a> {
    fn new(dict: &'a DictionaryManager, avps: &'a [DiameterAvp]) -> Self {
        Self { dict, avps }
    }

    fn value(&self, code: u32, vendor: Option<u32>) -> Result<Option<AvpValue>> {
        find_child(self.avps, code, vendor)
            .map(|avp| self.dict.decode(avp))
            .transpose()
    }

    fn mismatch(code: u32, expected: &str) -> GatewayError {
        GatewayError::InvalidAvpValue {
            code,
            reason: format!("expected {expected}"),
        }
    }

    fn string(&self, code: u32, vendor: Option<u32>) -> Result<Option<String>> {
        match self.value(code, vendor)? {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| Self::mismatch(code, "text")),
        }
    }

    fn u32(&self, code: u32, vendor: Option<u32>) -> Result<Option<u32>> {
        match self.value(code, vendor)? {
            None => Ok(None),
            Some(v) => v.as_u32().map(Some).ok_or_else(|| Self::mismatch(code, "32-bit integer")),
        }
    }

    fn u64(&self, code: u32, vendor: Option<u32>) -> Result<Option<u64>> {
        match self.value(code, vendor)? {
            None => Ok(None),
            Some(v) => v.as_u64().map(Some).ok_or_else(|| Self::mismatch(code, "64-bit integer")),
        }
    }

    fn bytes(&self, code: u32, vendor: Option<u32>) -> Result<Option<Vec<u8>>> {
        match self.value(code, vendor)? {
            None => Ok(None),
            Some(v) => v
                .as_bytes()
                .map(|b| Some(b.to_vec()))
                .ok_or_else(|| Self::mismatch(code, "octets")),
        }
    }

    fn ip(&self, code: u32, vendor: Option<u32>) -> Result<Option<IpAddr>> {
        match self.value(code, vendor)? {
            None => Ok(None),
            Some(v) => v.as_ip().map(Some).ok_or_else(|| Self::mismatch(code, "address")),
        }
    }

    fn ips(&self, code: u32, vendor: Option<u32>) -> Result<Vec<IpAddr>> {
        find_children(self.avps, code, vendor)
            .into_iter()
            .map(|avp| {
                self.dict
                    .decode(avp)?
                    .as_ip()
                    .ok_or_else(|| Self::mismatch(code, "address"))
            })
            .collect()
    }

    /// Children of a grouped AVP, `None` when the group is absent
    fn group(&self, code: u32, vendor: Option<u32>) -> Result<Option<Vec<DiameterAvp>>> {
        find_child(self.avps, code, vendor)
            .map(decode_grouped_avp)
            .transpose()
    }

    fn session_id(&self) -> Result<String> {
        self.string(AVP_SESSION_ID, None)?
            .ok_or_else(|| GatewayError::Decode("missing Session-Id".to_string()))
    }
}

impl MessageTranslator {
    /// Decode an inbound request into its typed form
    pub fn decode(&self, packet: &DiameterPacket) -> Result<(DiameterHeader, DiameterRequest)> {
        let header = packet.header.clone();
        if !header.is_request() {
            return Err(GatewayError::UnmappedRequest(format!(
                "answer for command {} is not handled",
                header.command_code
            )));
        }

        let reader = AvpReader::new(&self.dictionary, &packet.avps);
        let request = match header.command_code {
            CMD_AIR => DiameterRequest::AuthInfo(decode_air(&reader)?),
            CMD_AAR => DiameterRequest::AuthAuthz(decode_aar(&reader)?),
            CMD_CCR => DiameterRequest::CreditControl(decode_ccr(&reader)?),
            CMD_DPR => DiameterRequest::DisconnectPeer(decode_dpr(&reader)?),
            other => {
                return Err(GatewayError::UnmappedRequest(format!(
                    "command code {other}"
                )))
            }
        };
        Ok((header, request))
    }
}

fn decode_air(r: &AvpReader) -> Result<AuthInfoRequest> {
    let vendor_specific_application_id = r
        .group(AVP_VENDOR_SPECIFIC_APPLICATION_ID, None)?
        .map(|children| -> Result<_> {
            let g = AvpReader::new(r.dict, &children);
            Ok(VendorSpecificApplicationId {
                auth_application_id: g.u32(AVP_AUTH_APPLICATION_ID, None)?,
                vendor_id: g.u32(AVP_VENDOR_ID, None)?,
            })
        })
        .transpose()?;

    let requested_eutran_auth_info = r
        .group(AVP_REQUESTED_EUTRAN_AUTH_INFO, TGPP)?
        .map(|children| -> Result<_> {
            let g = AvpReader::new(r.dict, &children);
            Ok(RequestedEutranAuthInfo {
                number_of_requested_vectors: g.u32(AVP_NUMBER_OF_REQUESTED_VECTORS, TGPP)?,
                immediate_response_preferred: g.u32(AVP_IMMEDIATE_RESPONSE_PREFERRED, TGPP)?,
                resync_info: g.bytes(AVP_RESYNC_INFO, TGPP)?,
            })
        })
        .transpose()?;

    Ok(AuthInfoRequest {
        session_id: r.session_id()?,
        origin_host: r.string(AVP_ORIGIN_HOST, None)?,
        origin_realm: r.string(AVP_ORIGIN_REALM, None)?,
        destination_realm: r.string(AVP_DEST_REALM, None)?,
        vendor_specific_application_id,
        auth_session_state: r.u32(AVP_AUTH_SESSION_STATE, None)?,
        user_name: r.string(AVP_USER_NAME, None)?,
        visited_plmn_id: r.bytes(AVP_VISITED_PLMN_ID, TGPP)?,
        requested_eutran_auth_info,
    })
}

fn decode_aar(r: &AvpReader) -> Result<AuthAuthzRequest> {
    Ok(AuthAuthzRequest {
        session_id: r.session_id()?,
        origin_host: r.string(AVP_ORIGIN_HOST, None)?,
        origin_realm: r.string(AVP_ORIGIN_REALM, None)?,
        destination_realm: r.string(AVP_DEST_REALM, None)?,
        auth_application_id: r.u32(AVP_AUTH_APPLICATION_ID, None)?,
        auth_request_type: r.u32(AVP_AUTH_REQUEST_TYPE, None)?,
        rat_type: r.u32(AVP_RAT_TYPE, TGPP)?,
        user_name: r.string(AVP_USER_NAME, None)?,
        visited_network_identifier: r.bytes(AVP_VISITED_NETWORK_IDENTIFIER, TGPP)?,
        service_selection: r.string(AVP_SERVICE_SELECTION, None)?,
    })
}

fn decode_service_unit(dict: &DictionaryManager, children: &[DiameterAvp]) -> Result<ServiceUnit> {
    let g = AvpReader::new(dict, children);
    Ok(ServiceUnit {
        cc_time: g.u32(AVP_CC_TIME, None)?,
        cc_input_octets: g.u64(AVP_CC_INPUT_OCTETS, None)?,
        cc_output_octets: g.u64(AVP_CC_OUTPUT_OCTETS, None)?,
    })
}

fn decode_qos(dict: &DictionaryManager, children: &[DiameterAvp]) -> Result<QosInformation> {
    let g = AvpReader::new(dict, children);
    let allocation_retention_priority = g
        .group(AVP_ALLOCATION_RETENTION_PRIORITY, TGPP)?
        .map(|arp| -> Result<_> {
            let a = AvpReader::new(dict, &arp);
            Ok(AllocationRetentionPriority {
                priority_level: a.u32(AVP_PRIORITY_LEVEL, TGPP)?,
                pre_emption_capability: a.u32(AVP_PRE_EMPTION_CAPABILITY, TGPP)?,
                pre_emption_vulnerability: a.u32(AVP_PRE_EMPTION_VULNERABILITY, TGPP)?,
            })
        })
        .transpose()?;

    Ok(QosInformation {
        apn_ambr_ul: g.u32(AVP_APN_AGGREGATE_MAX_BITRATE_UL, TGPP)?,
        apn_ambr_dl: g.u32(AVP_APN_AGGREGATE_MAX_BITRATE_DL, TGPP)?,
        qos_class_identifier: g.u32(AVP_QOS_CLASS_IDENTIFIER, TGPP)?,
        allocation_retention_priority,
    })
}

fn decode_ps_information(dict: &DictionaryManager, children: &[DiameterAvp]) -> Result<PsInformation> {
    let g = AvpReader::new(dict, children);
    let user_equipment_info_value = match g.group(AVP_USER_EQUIPMENT_INFO, None)? {
        Some(ue) => AvpReader::new(dict, &ue).bytes(AVP_USER_EQUIPMENT_INFO_VALUE, None)?,
        None => None,
    };

    Ok(PsInformation {
        pdp_addresses: g.ips(AVP_PDP_ADDRESS, TGPP)?,
        called_station_id: g.string(AVP_CALLED_STATION_ID, None)?,
        user_equipment_info_value,
        pdp_type: g.u32(AVP_TGPP_PDP_TYPE, TGPP)?,
        sgsn_address: g.ip(AVP_SGSN_ADDRESS, TGPP)?,
        ggsn_address: g.ip(AVP_GGSN_ADDRESS, TGPP)?,
        sgsn_mcc_mnc: g.string(AVP_TGPP_SGSN_MCC_MNC, TGPP)?,
        user_location_info: g.bytes(AVP_TGPP_USER_LOCATION_INFO, TGPP)?,
        ms_timezone: g.bytes(AVP_TGPP_MS_TIMEZONE, TGPP)?,
        event_timestamp: g.u32(AVP_EVENT_TIMESTAMP, None)?,
    })
}

fn decode_ccr(r: &AvpReader) -> Result<CreditControlRequest> {
    let session_id = r.session_id()?;

    let raw_type = r
        .u32(AVP_CC_REQUEST_TYPE, None)?
        .ok_or(GatewayError::MissingAvp(AVP_CC_REQUEST_TYPE))?;
    let cc_request_type =
        CcRequestType::from_u32(raw_type).ok_or_else(|| GatewayError::InvalidAvpValue {
            code: AVP_CC_REQUEST_TYPE,
            reason: format!("unknown CC-Request-Type {raw_type}"),
        })?;

    let subscription_id = r
        .group(AVP_SUBSCRIPTION_ID, None)?
        .map(|children| -> Result<_> {
            let g = AvpReader::new(r.dict, &children);
            Ok(SubscriptionId {
                id_type: g.u32(AVP_SUBSCRIPTION_ID_TYPE, None)?,
                data: g.string(AVP_SUBSCRIPTION_ID_DATA, None)?,
            })
        })
        .transpose()?;

    let ps_information = match r.group(AVP_SERVICE_INFORMATION, TGPP)? {
        Some(service) => AvpReader::new(r.dict, &service)
            .group(AVP_PS_INFORMATION, TGPP)?
            .map(|ps| decode_ps_information(r.dict, &ps))
            .transpose()?,
        None => None,
    };

    let multiple_services_credit_control = r
        .group(AVP_MULTIPLE_SERVICES_CREDIT_CONTROL, None)?
        .map(|children| -> Result<_> {
            let g = AvpReader::new(r.dict, &children);
            Ok(MultipleServicesCreditControl {
                requested_service_unit: g
                    .group(AVP_REQUESTED_SERVICE_UNIT, None)?
                    .map(|su| decode_service_unit(r.dict, &su))
                    .transpose()?,
                used_service_unit: g
                    .group(AVP_USED_SERVICE_UNIT, None)?
                    .map(|su| decode_service_unit(r.dict, &su))
                    .transpose()?,
                qos_information: g
                    .group(AVP_QOS_INFORMATION, TGPP)?
                    .map(|qos| decode_qos(r.dict, &qos))
                    .transpose()?,
                rat_type: g.bytes(AVP_TGPP_RAT_TYPE, TGPP)?,
            })
        })
        .transpose()?;

    Ok(CreditControlRequest {
        session_id,
        origin_host: r.string(AVP_ORIGIN_HOST, None)?,
        origin_realm: r.string(AVP_ORIGIN_REALM, None)?,
        destination_realm: r.string(AVP_DEST_REALM, None)?,
        auth_application_id: r.u32(AVP_AUTH_APPLICATION_ID, None)?,
        cc_request_type,
        cc_request_number: r.u32(AVP_CC_REQUEST_NUMBER, None)?,
        subscription_id,
        ps_information,
        multiple_services_credit_control,
    })
}

fn decode_dpr(r: &AvpReader) -> Result<DisconnectPeerRequest> {
    Ok(DisconnectPeerRequest {
        origin_host: r.string(AVP_ORIGIN_HOST, None)?,
        origin_realm: r.string(AVP_ORIGIN_REALM, None)?,
        destination_realm: r.string(AVP_DEST_REALM, None)?,
        disconnect_cause: r.u32(AVP_DISCONNECT_CAUSE, None)?,
    })
}
