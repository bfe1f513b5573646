use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use dtra_codec::encode_vendor_attribute;
use dtra_core::{GatewayError, Result};
use dtra_radius::attribute::*;
use dtra_radius::{AccessRequest, AccountingRequest, AcctStatusType, RadiusRequest};
use dtra_shared::VENDOR_3GPP;
use tracing::warn;

use crate::translator::MessageTranslator;
use crate::types::*;

/// What the forward path needs to do for a decoded request
#[derive(Debug, Clone, PartialEq)]
pub enum Forwarding {
    Radius(RadiusRequest),
    /// Answered locally (DPR)
    NotNeeded,
}

/// Acct-Session-Id from a Diameter Session-Id: the second-to-last `;`
/// segment, or the whole id when it has fewer than three segments
pub fn accounting_session_id(session_id: &str) -> &str {
    let parts: Vec<&str> = session_id.split(';').collect();
    if parts.len() < 3 {
        session_id
    } else {
        parts[parts.len() - 2]
    }
}

fn local_part(user_name: &str) -> &str {
    user_name.split('@').next().unwrap_or(user_name)
}

impl MessageTranslator {
    /// Map a decoded request onto the RADIUS exchange that answers it
    pub fn to_radius(&self, request: &DiameterRequest, peer: IpAddr) -> Result<Forwarding> {
        match request {
            DiameterRequest::AuthInfo(air) => {
                self.access_request(air.user_name.as_deref(), peer).map(Forwarding::Radius)
            }
            DiameterRequest::AuthAuthz(aar) => {
                self.access_request(aar.user_name.as_deref(), peer).map(Forwarding::Radius)
            }
            DiameterRequest::CreditControl(ccr) => {
                self.accounting_request(ccr).map(Forwarding::Radius)
            }
            DiameterRequest::DisconnectPeer(_) => Ok(Forwarding::NotNeeded),
        }
    }

    fn access_request(&self, user_name: Option<&str>, peer: IpAddr) -> Result<RadiusRequest> {
        let user_name = user_name
            .ok_or_else(|| GatewayError::UnmappedRequest("request without User-Name".into()))?;

        Ok(RadiusRequest::Access(AccessRequest {
            username: local_part(user_name).to_string(),
            password: self.settings.placeholder_password.clone(),
            nas_ip: peer,
            nas_port_type: NAS_PORT_TYPE_VIRTUAL,
            service_type: SERVICE_TYPE_FRAMED_USER,
            called_station_id: self.settings.called_station_id.clone(),
            calling_station_id: self.settings.calling_station_id.clone(),
            framed_protocol: FRAMED_PROTOCOL_GPRS_PDP_CONTEXT,
        }))
    }

    fn accounting_request(&self, ccr: &CreditControlRequest) -> Result<RadiusRequest> {
        let status = match ccr.cc_request_type {
            CcRequestType::Initial | CcRequestType::Update => AcctStatusType::Start,
            other => {
                return Err(GatewayError::UnmappedRequest(format!(
                    "CC-Request-Type {} has no accounting mapping",
                    other.as_u32()
                )))
            }
        };

        let imsi = ccr
            .subscription_id
            .as_ref()
            .and_then(|s| s.data.as_deref())
            .ok_or_else(|| {
                GatewayError::UnmappedRequest("CCR without Subscription-Id-Data".into())
            })?;

        let ps = ccr.ps_information.as_ref();
        let mscc = ccr.multiple_services_credit_control.as_ref();
        let used = mscc.and_then(|m| m.used_service_unit.as_ref());
        let (framed_ipv4, framed_ipv6) = ps.map(select_pdp_addresses).unwrap_or_default();

        Ok(RadiusRequest::Accounting(AccountingRequest {
            username: imsi.to_string(),
            status,
            session_id: accounting_session_id(&ccr.session_id).to_string(),
            delay_time: 0,
            input_octets: used.and_then(|u| u.cc_input_octets),
            output_octets: used.and_then(|u| u.cc_output_octets),
            session_time: used.and_then(|u| u.cc_time),
            framed_ipv4,
            framed_ipv6,
            called_station_id: ps.and_then(|p| p.called_station_id.clone()),
            vendor_attributes: vendor_attributes(imsi, ps, mscc),
        }))
    }
}

/// PDP type 0 (IPv4) takes only the first IPv4 address; anything else takes
/// the first IPv4 and the first IPv6 address
fn select_pdp_addresses(ps: &PsInformation) -> (Option<Ipv4Addr>, Option<Ipv6Addr>) {
    let ipv4 = ps.pdp_addresses.iter().find_map(|ip| match ip {
        IpAddr::V4(v4) => Some(*v4),
        IpAddr::V6(_) => None,
    });
    if ps.pdp_type == Some(0) {
        return (ipv4, None);
    }
    let ipv6 = ps.pdp_addresses.iter().find_map(|ip| match ip {
        IpAddr::V6(v6) => Some(*v6),
        IpAddr::V4(_) => None,
    });
    (ipv4, ipv6)
}

fn ip_octets(ip: &IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

/// 3GPP vendor-specific attributes for the fields that are present
fn vendor_attributes(
    imsi: &str,
    ps: Option<&PsInformation>,
    mscc: Option<&MultipleServicesCreditControl>,
) -> Vec<Vec<u8>> {
    let mut fields: Vec<(u8, Vec<u8>)> = vec![(TGPP_IMSI, imsi.as_bytes().to_vec())];

    if let Some(ps) = ps {
        if let Some(pdp_type) = ps.pdp_type {
            fields.push((TGPP_PDP_TYPE, pdp_type.to_be_bytes().to_vec()));
        }
        if let Some(ip) = &ps.sgsn_address {
            fields.push((TGPP_SGSN_ADDRESS, ip_octets(ip)));
        }
        if let Some(ip) = &ps.ggsn_address {
            fields.push((TGPP_GGSN_ADDRESS, ip_octets(ip)));
        }
        if let Some(mcc_mnc) = &ps.sgsn_mcc_mnc {
            fields.push((TGPP_SGSN_MCC_MNC, mcc_mnc.as_bytes().to_vec()));
        }
        if let Some(imeisv) = &ps.user_equipment_info_value {
            fields.push((TGPP_IMEISV, imeisv.clone()));
        }
    }
    if let Some(rat) = mscc.and_then(|m| m.rat_type.as_ref()) {
        fields.push((TGPP_RAT_TYPE, rat.clone()));
    }
    if let Some(ps) = ps {
        if let Some(uli) = &ps.user_location_info {
            fields.push((TGPP_USER_LOCATION_INFO, uli.clone()));
        }
        if let Some(tz) = &ps.ms_timezone {
            fields.push((TGPP_MS_TIMEZONE, tz.clone()));
        }
    }

    fields
        .into_iter()
        .filter_map(|(sub_type, payload)| {
            match encode_vendor_attribute(VENDOR_3GPP, sub_type, &payload) {
                Ok(vsa) => Some(vsa),
                Err(e) => {
                    warn!(sub_type, error = %e, "Skipping vendor-specific attribute");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TranslatorSettings;
    use dtra_codec::decode_vendor_attribute;
    use dtra_diameter_dict::DictionaryManager;
    use std::sync::Arc;

    fn translator() -> MessageTranslator {
        MessageTranslator::new(
            TranslatorSettings::new("dtra.test", "test"),
            Arc::new(DictionaryManager::new()),
        )
    }

    fn peer() -> IpAddr {
        "192.0.2.1".parse().unwrap()
    }

    fn aar(user_name: Option<&str>) -> DiameterRequest {
        DiameterRequest::AuthAuthz(AuthAuthzRequest {
            session_id: "pgw;1;2".into(),
            origin_host: None,
            origin_realm: None,
            destination_realm: None,
            auth_application_id: None,
            auth_request_type: None,
            rat_type: None,
            user_name: user_name.map(String::from),
            visited_network_identifier: None,
            service_selection: None,
        })
    }

    fn ccr(cc_request_type: CcRequestType, ps: Option<PsInformation>) -> CreditControlRequest {
        CreditControlRequest {
            session_id: "pgw.test;1234;5678".into(),
            origin_host: None,
            origin_realm: None,
            destination_realm: None,
            auth_application_id: None,
            cc_request_type,
            cc_request_number: Some(0),
            subscription_id: Some(SubscriptionId {
                id_type: Some(1),
                data: Some("001010123456789".into()),
            }),
            ps_information: ps,
            multiple_services_credit_control: None,
        }
    }

    fn accounting(forwarding: Forwarding) -> AccountingRequest {
        match forwarding {
            Forwarding::Radius(RadiusRequest::Accounting(req)) => req,
            other => panic!("expected accounting request, got {other:?}"),
        }
    }

    #[test]
    fn test_accounting_session_id() {
        assert_eq!(accounting_session_id("pgw.test;1234;5678"), "1234");
        assert_eq!(accounting_session_id("a;b;c;d"), "c");
        assert_eq!(accounting_session_id("one;two"), "one;two");
        assert_eq!(accounting_session_id("plain"), "plain");
    }

    #[test]
    fn test_access_request_uses_local_part() {
        let forwarding = translator()
            .to_radius(&aar(Some("001010123456789@nai.epc")), peer())
            .unwrap();
        let Forwarding::Radius(RadiusRequest::Access(access)) = forwarding else {
            panic!("expected access request");
        };
        assert_eq!(access.username, "001010123456789");
        assert_eq!(access.password, "12345");
        assert_eq!(access.nas_ip, peer());
        assert_eq!(access.nas_port_type, NAS_PORT_TYPE_VIRTUAL);
        assert_eq!(access.called_station_id, "00-14-22-01-23-45");
    }

    #[test]
    fn test_access_request_requires_user_name() {
        assert!(matches!(
            translator().to_radius(&aar(None), peer()),
            Err(GatewayError::UnmappedRequest(_))
        ));
    }

    #[test]
    fn test_dpr_not_forwarded() {
        let dpr = DiameterRequest::DisconnectPeer(DisconnectPeerRequest::default());
        assert_eq!(translator().to_radius(&dpr, peer()).unwrap(), Forwarding::NotNeeded);
    }

    #[test]
    fn test_ccr_termination_unmapped() {
        let request = DiameterRequest::CreditControl(ccr(CcRequestType::Termination, None));
        assert!(matches!(
            translator().to_radius(&request, peer()),
            Err(GatewayError::UnmappedRequest(_))
        ));
    }

    #[test]
    fn test_ccr_ipv4_pdp_type_selects_ipv4_only() {
        let ps = PsInformation {
            pdp_addresses: vec!["2001:db8::1".parse().unwrap(), "10.1.2.3".parse().unwrap()],
            pdp_type: Some(0),
            ..Default::default()
        };
        let request = DiameterRequest::CreditControl(ccr(CcRequestType::Initial, Some(ps)));
        let acct = accounting(translator().to_radius(&request, peer()).unwrap());

        assert_eq!(acct.status, AcctStatusType::Start);
        assert_eq!(acct.session_id, "1234");
        assert_eq!(acct.framed_ipv4, Some("10.1.2.3".parse().unwrap()));
        assert_eq!(acct.framed_ipv6, None);
    }

    #[test]
    fn test_ccr_dual_stack_pdp_type_selects_pair() {
        let ps = PsInformation {
            pdp_addresses: vec!["10.1.2.3".parse().unwrap(), "2001:db8::1".parse().unwrap()],
            pdp_type: Some(2),
            ..Default::default()
        };
        let request = DiameterRequest::CreditControl(ccr(CcRequestType::Update, Some(ps)));
        let acct = accounting(translator().to_radius(&request, peer()).unwrap());

        assert_eq!(acct.framed_ipv4, Some("10.1.2.3".parse().unwrap()));
        assert_eq!(acct.framed_ipv6, Some("2001:db8::1".parse().unwrap()));
    }

    #[test]
    fn test_ccr_vendor_attributes_for_present_fields() {
        let ps = PsInformation {
            pdp_type: Some(0),
            sgsn_address: Some("192.0.2.7".parse().unwrap()),
            sgsn_mcc_mnc: Some("00101".into()),
            ..Default::default()
        };
        let request = DiameterRequest::CreditControl(ccr(CcRequestType::Initial, Some(ps)));
        let acct = accounting(translator().to_radius(&request, peer()).unwrap());

        let decoded: Vec<_> = acct
            .vendor_attributes
            .iter()
            .map(|v| decode_vendor_attribute(v).unwrap())
            .collect();
        let sub_types: Vec<u8> = decoded.iter().map(|v| v.sub_type).collect();
        assert_eq!(
            sub_types,
            vec![TGPP_IMSI, TGPP_PDP_TYPE, TGPP_SGSN_ADDRESS, TGPP_SGSN_MCC_MNC]
        );
        assert_eq!(decoded[0].payload, b"001010123456789");
        assert_eq!(decoded[1].payload, vec![0, 0, 0, 0]);
        assert_eq!(decoded[2].payload, vec![192, 0, 2, 7]);
    }

    #[test]
    fn test_oversized_vendor_attribute_skipped() {
        let ps = PsInformation {
            user_location_info: Some(vec![0xAB; 300]),
            ms_timezone: Some(vec![0x40, 0x00]),
            ..Default::default()
        };
        let vsas = vendor_attributes("001010123456789", Some(&ps), None);
        let sub_types: Vec<u8> = vsas
            .iter()
            .map(|v| decode_vendor_attribute(v).unwrap().sub_type)
            .collect();
        assert_eq!(sub_types, vec![TGPP_IMSI, TGPP_MS_TIMEZONE]);
    }

    #[test]
    fn test_long_location_info_leaves_request_encodable() {
        // Fits the vendor length byte but not the attribute value with its header
        let ps = PsInformation {
            user_location_info: Some(vec![0xAB; 250]),
            ms_timezone: Some(vec![0x40, 0x00]),
            ..Default::default()
        };
        let request = DiameterRequest::CreditControl(ccr(CcRequestType::Initial, Some(ps)));
        let acct = accounting(translator().to_radius(&request, peer()).unwrap());

        let (bytes, _) = RadiusRequest::Accounting(acct).to_packet(1, b"secret").unwrap();
        let packet = dtra_radius::RadiusPacket::decode(&bytes).unwrap();
        let sub_types: Vec<u8> = packet.vendor_attributes().iter().map(|v| v.sub_type).collect();
        assert_eq!(sub_types, vec![TGPP_IMSI, TGPP_MS_TIMEZONE]);
    }

    #[test]
    fn test_usage_from_used_service_unit() {
        let mut request = ccr(CcRequestType::Update, None);
        request.multiple_services_credit_control = Some(MultipleServicesCreditControl {
            used_service_unit: Some(ServiceUnit {
                cc_time: Some(60),
                cc_input_octets: Some(1000),
                cc_output_octets: Some(2000),
            }),
            rat_type: Some(vec![6]),
            ..Default::default()
        });
        let acct = accounting(
            translator()
                .to_radius(&DiameterRequest::CreditControl(request), peer())
                .unwrap(),
        );
        assert_eq!(acct.input_octets, Some(1000));
        assert_eq!(acct.output_octets, Some(2000));
        assert_eq!(acct.session_time, Some(60));
        assert_eq!(acct.vendor_attributes.len(), 2);
    }
}
