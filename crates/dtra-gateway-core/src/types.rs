use std::net::IpAddr;

use dtra_shared::{
    CC_REQUEST_TYPE_EVENT, CC_REQUEST_TYPE_INITIAL, CC_REQUEST_TYPE_TERMINATION,
    CC_REQUEST_TYPE_UPDATE, CMD_AAR, CMD_AIR, CMD_CCR, CMD_DPR,
};

// Every field that maps to an optional AVP is an Option; an absent AVP is
// never represented as a zero value.

/// CC-Request-Type (RFC 4006)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CcRequestType {
    Initial,
    Update,
    Termination,
    Event,
}

impl CcRequestType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            CC_REQUEST_TYPE_INITIAL => Some(Self::Initial),
            CC_REQUEST_TYPE_UPDATE => Some(Self::Update),
            CC_REQUEST_TYPE_TERMINATION => Some(Self::Termination),
            CC_REQUEST_TYPE_EVENT => Some(Self::Event),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            Self::Initial => CC_REQUEST_TYPE_INITIAL,
            Self::Update => CC_REQUEST_TYPE_UPDATE,
            Self::Termination => CC_REQUEST_TYPE_TERMINATION,
            Self::Event => CC_REQUEST_TYPE_EVENT,
        }
    }

    /// Initial and Update requests get a quota grant
    pub fn grants_quota(self) -> bool {
        matches!(self, Self::Initial | Self::Update)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorSpecificApplicationId {
    pub auth_application_id: Option<u32>,
    pub vendor_id: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestedEutranAuthInfo {
    pub number_of_requested_vectors: Option<u32>,
    pub immediate_response_preferred: Option<u32>,
    pub resync_info: Option<Vec<u8>>,
}

/// Authentication-Information-Request (S6a)
#[derive(Debug, Clone, PartialEq)]
pub struct AuthInfoRequest {
    pub session_id: String,
    pub origin_host: Option<String>,
    pub origin_realm: Option<String>,
    pub destination_realm: Option<String>,
    pub vendor_specific_application_id: Option<VendorSpecificApplicationId>,
    pub auth_session_state: Option<u32>,
    pub user_name: Option<String>,
    pub visited_plmn_id: Option<Vec<u8>>,
    pub requested_eutran_auth_info: Option<RequestedEutranAuthInfo>,
}

/// AA-Request (S6b / NASREQ)
#[derive(Debug, Clone, PartialEq)]
pub struct AuthAuthzRequest {
    pub session_id: String,
    pub origin_host: Option<String>,
    pub origin_realm: Option<String>,
    pub destination_realm: Option<String>,
    pub auth_application_id: Option<u32>,
    pub auth_request_type: Option<u32>,
    pub rat_type: Option<u32>,
    pub user_name: Option<String>,
    pub visited_network_identifier: Option<Vec<u8>>,
    pub service_selection: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionId {
    pub id_type: Option<u32>,
    pub data: Option<String>,
}

/// Requested-, Used- or Granted-Service-Unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceUnit {
    pub cc_time: Option<u32>,
    pub cc_input_octets: Option<u64>,
    pub cc_output_octets: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationRetentionPriority {
    pub priority_level: Option<u32>,
    pub pre_emption_capability: Option<u32>,
    pub pre_emption_vulnerability: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QosInformation {
    pub apn_ambr_ul: Option<u32>,
    pub apn_ambr_dl: Option<u32>,
    pub qos_class_identifier: Option<u32>,
    pub allocation_retention_priority: Option<AllocationRetentionPriority>,
}

/// Service-Information / PS-Information charging data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PsInformation {
    pub pdp_addresses: Vec<IpAddr>,
    pub called_station_id: Option<String>,
    pub user_equipment_info_value: Option<Vec<u8>>,
    pub pdp_type: Option<u32>,
    pub sgsn_address: Option<IpAddr>,
    pub ggsn_address: Option<IpAddr>,
    pub sgsn_mcc_mnc: Option<String>,
    pub user_location_info: Option<Vec<u8>>,
    pub ms_timezone: Option<Vec<u8>>,
    pub event_timestamp: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipleServicesCreditControl {
    pub requested_service_unit: Option<ServiceUnit>,
    pub used_service_unit: Option<ServiceUnit>,
    pub qos_information: Option<QosInformation>,
    pub rat_type: Option<Vec<u8>>,
}

/// Credit-Control-Request (Gy)
#[derive(Debug, Clone, PartialEq)]
pub struct CreditControlRequest {
    pub session_id: String,
    pub origin_host: Option<String>,
    pub origin_realm: Option<String>,
    pub destination_realm: Option<String>,
    pub auth_application_id: Option<u32>,
    pub cc_request_type: CcRequestType,
    pub cc_request_number: Option<u32>,
    pub subscription_id: Option<SubscriptionId>,
    pub ps_information: Option<PsInformation>,
    pub multiple_services_credit_control: Option<MultipleServicesCreditControl>,
}

/// Disconnect-Peer-Request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisconnectPeerRequest {
    pub origin_host: Option<String>,
    pub origin_realm: Option<String>,
    pub destination_realm: Option<String>,
    pub disconnect_cause: Option<u32>,
}

/// Decoded inbound Diameter request
#[derive(Debug, Clone, PartialEq)]
pub enum DiameterRequest {
    AuthInfo(AuthInfoRequest),
    AuthAuthz(AuthAuthzRequest),
    CreditControl(CreditControlRequest),
    DisconnectPeer(DisconnectPeerRequest),
}

impl DiameterRequest {
    /// Session-Id; `None` only for DPR
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::AuthInfo(r) => Some(&r.session_id),
            Self::AuthAuthz(r) => Some(&r.session_id),
            Self::CreditControl(r) => Some(&r.session_id),
            Self::DisconnectPeer(_) => None,
        }
    }

    pub fn command_code(&self) -> u32 {
        match self {
            Self::AuthInfo(_) => CMD_AIR,
            Self::AuthAuthz(_) => CMD_AAR,
            Self::CreditControl(_) => CMD_CCR,
            Self::DisconnectPeer(_) => CMD_DPR,
        }
    }

    pub fn command_name(&self) -> &'static str {
        dtra_shared::command_name(self.command_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cc_request_type_mapping() {
        assert_eq!(CcRequestType::from_u32(1), Some(CcRequestType::Initial));
        assert_eq!(CcRequestType::from_u32(4), Some(CcRequestType::Event));
        assert_eq!(CcRequestType::from_u32(0), None);
        assert_eq!(CcRequestType::Termination.as_u32(), 3);
        assert!(CcRequestType::Update.grants_quota());
        assert!(!CcRequestType::Termination.grants_quota());
    }

    #[test]
    fn test_session_id_per_variant() {
        let dpr = DiameterRequest::DisconnectPeer(DisconnectPeerRequest::default());
        assert_eq!(dpr.session_id(), None);
        assert_eq!(dpr.command_name(), "DPR");
    }
}
