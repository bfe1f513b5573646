use crate::data_type::AvpDataType;
use dtra_shared::VENDOR_3GPP;

/// Built-in AVP definitions (RFC 6733, RFC 4006, RFC 7155 and 3GPP)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StandardAvpCode {
    // ========================================
    // RFC 6733 Base Protocol / RFC 7155 NASREQ
    // ========================================
    UserName = 1,
    FramedIpAddress = 8,
    FramedMtu = 12,
    SessionTimeout = 27,
    CalledStationId = 30,
    EventTimestamp = 55,
    HostIpAddress = 257,
    AuthApplicationId = 258,
    AcctApplicationId = 259,
    VendorSpecificApplicationId = 260,
    SessionId = 263,
    OriginHost = 264,
    SupportedVendorId = 265,
    VendorId = 266,
    FirmwareRevision = 267,
    ResultCode = 268,
    ProductName = 269,
    DisconnectCause = 273,
    AuthRequestType = 274,
    AuthSessionState = 277,
    OriginStateId = 278,
    RouteRecord = 282,
    DestinationRealm = 283,
    DestinationHost = 293,
    OriginRealm = 296,

    // ========================================
    // RFC 4006 Credit-Control (Gy)
    // ========================================
    CcInputOctets = 412,
    CcOutputOctets = 414,
    CcRequestNumber = 415,
    CcRequestType = 416,
    CcTime = 420,
    GrantedServiceUnit = 431,
    RequestedServiceUnit = 437,
    SubscriptionId = 443,
    SubscriptionIdData = 444,
    UsedServiceUnit = 446,
    SubscriptionIdType = 450,
    MultipleServicesCreditControl = 456,
    UserEquipmentInfo = 458,
    UserEquipmentInfoValue = 460,

    // ========================================
    // S6b (RFC 5778)
    // ========================================
    ServiceSelection = 493,

    // ========================================
    // 3GPP TS 29.061 / 32.299 (vendor 10415)
    // ========================================
    TgppPdpType = 3,
    TgppSgsnMccMnc = 18,
    TgppRatType = 21,
    TgppUserLocationInfo = 22,
    TgppMsTimezone = 23,
    VisitedNetworkIdentifier = 600,
    GgsnAddress = 847,
    ServiceInformation = 873,
    PsInformation = 874,
    PdpAddress = 1227,
    SgsnAddress = 1228,

    // ========================================
    // 3GPP TS 29.212 QoS (vendor 10415)
    // ========================================
    QosInformation = 1016,
    QosClassIdentifier = 1028,
    RatType = 1032,
    AllocationRetentionPriority = 1034,
    ApnAggregateMaxBitrateDl = 1040,
    ApnAggregateMaxBitrateUl = 1041,
    PriorityLevel = 1046,
    PreEmptionCapability = 1047,
    PreEmptionVulnerability = 1048,

    // ========================================
    // 3GPP S6a (TS 29.272, vendor 10415)
    // ========================================
    VisitedPlmnId = 1407,
    RequestedEutranAuthInfo = 1408,
    NumberOfRequestedVectors = 1410,
    ResyncInfo = 1411,
    ImmediateResponsePreferred = 1412,
    AuthenticationInfo = 1413,
    EutranVector = 1414,
    Rand = 1447,
    Xres = 1448,
    Autn = 1449,
    Kasme = 1450,
}

impl StandardAvpCode {
    /// Every built-in definition, in declaration order
    pub const ALL: &'static [StandardAvpCode] = &[
        Self::UserName,
        Self::FramedIpAddress,
        Self::FramedMtu,
        Self::SessionTimeout,
        Self::CalledStationId,
        Self::EventTimestamp,
        Self::HostIpAddress,
        Self::AuthApplicationId,
        Self::AcctApplicationId,
        Self::VendorSpecificApplicationId,
        Self::SessionId,
        Self::OriginHost,
        Self::SupportedVendorId,
        Self::VendorId,
        Self::FirmwareRevision,
        Self::ResultCode,
        Self::ProductName,
        Self::DisconnectCause,
        Self::AuthRequestType,
        Self::AuthSessionState,
        Self::OriginStateId,
        Self::RouteRecord,
        Self::DestinationRealm,
        Self::DestinationHost,
        Self::OriginRealm,
        Self::CcInputOctets,
        Self::CcOutputOctets,
        Self::CcRequestNumber,
        Self::CcRequestType,
        Self::CcTime,
        Self::GrantedServiceUnit,
        Self::RequestedServiceUnit,
        Self::SubscriptionId,
        Self::SubscriptionIdData,
        Self::UsedServiceUnit,
        Self::SubscriptionIdType,
        Self::MultipleServicesCreditControl,
        Self::UserEquipmentInfo,
        Self::UserEquipmentInfoValue,
        Self::ServiceSelection,
        Self::TgppPdpType,
        Self::TgppSgsnMccMnc,
        Self::TgppRatType,
        Self::TgppUserLocationInfo,
        Self::TgppMsTimezone,
        Self::VisitedNetworkIdentifier,
        Self::GgsnAddress,
        Self::ServiceInformation,
        Self::PsInformation,
        Self::PdpAddress,
        Self::SgsnAddress,
        Self::QosInformation,
        Self::QosClassIdentifier,
        Self::RatType,
        Self::AllocationRetentionPriority,
        Self::ApnAggregateMaxBitrateDl,
        Self::ApnAggregateMaxBitrateUl,
        Self::PriorityLevel,
        Self::PreEmptionCapability,
        Self::PreEmptionVulnerability,
        Self::VisitedPlmnId,
        Self::RequestedEutranAuthInfo,
        Self::NumberOfRequestedVectors,
        Self::ResyncInfo,
        Self::ImmediateResponsePreferred,
        Self::AuthenticationInfo,
        Self::EutranVector,
        Self::Rand,
        Self::Xres,
        Self::Autn,
        Self::Kasme,
    ];

    /// Find the built-in definition for a code/vendor pair
    pub fn from_code(code: u32, vendor_id: Option<u32>) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|avp| avp.code() == code && avp.vendor_id() == vendor_id)
    }

    /// AVP code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Vendor-Id, `None` for IETF AVPs
    pub fn vendor_id(&self) -> Option<u32> {
        match self {
            Self::TgppPdpType
            | Self::TgppSgsnMccMnc
            | Self::TgppRatType
            | Self::TgppUserLocationInfo
            | Self::TgppMsTimezone
            | Self::VisitedNetworkIdentifier
            | Self::GgsnAddress
            | Self::ServiceInformation
            | Self::PsInformation
            | Self::PdpAddress
            | Self::SgsnAddress
            | Self::QosInformation
            | Self::QosClassIdentifier
            | Self::RatType
            | Self::AllocationRetentionPriority
            | Self::ApnAggregateMaxBitrateDl
            | Self::ApnAggregateMaxBitrateUl
            | Self::PriorityLevel
            | Self::PreEmptionCapability
            | Self::PreEmptionVulnerability
            | Self::VisitedPlmnId
            | Self::RequestedEutranAuthInfo
            | Self::NumberOfRequestedVectors
            | Self::ResyncInfo
            | Self::ImmediateResponsePreferred
            | Self::AuthenticationInfo
            | Self::EutranVector
            | Self::Rand
            | Self::Xres
            | Self::Autn
            | Self::Kasme => Some(VENDOR_3GPP),
            _ => None,
        }
    }

    /// Whether senders must set the M bit
    pub fn is_mandatory(&self) -> bool {
        !matches!(
            self,
            Self::TgppPdpType
                | Self::TgppSgsnMccMnc
                | Self::TgppRatType
                | Self::TgppUserLocationInfo
                | Self::TgppMsTimezone
                | Self::ImmediateResponsePreferred
        )
    }

    /// Get AVP name
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserName => "User-Name",
            Self::FramedIpAddress => "Framed-IP-Address",
            Self::FramedMtu => "Framed-MTU",
            Self::SessionTimeout => "Session-Timeout",
            Self::CalledStationId => "Called-Station-Id",
            Self::EventTimestamp => "Event-Timestamp",
            Self::HostIpAddress => "Host-IP-Address",
            Self::AuthApplicationId => "Auth-Application-Id",
            Self::AcctApplicationId => "Acct-Application-Id",
            Self::VendorSpecificApplicationId => "Vendor-Specific-Application-Id",
            Self::SessionId => "Session-Id",
            Self::OriginHost => "Origin-Host",
            Self::SupportedVendorId => "Supported-Vendor-Id",
            Self::VendorId => "Vendor-Id",
            Self::FirmwareRevision => "Firmware-Revision",
            Self::ResultCode => "Result-Code",
            Self::ProductName => "Product-Name",
            Self::DisconnectCause => "Disconnect-Cause",
            Self::AuthRequestType => "Auth-Request-Type",
            Self::AuthSessionState => "Auth-Session-State",
            Self::OriginStateId => "Origin-State-Id",
            Self::RouteRecord => "Route-Record",
            Self::DestinationRealm => "Destination-Realm",
            Self::DestinationHost => "Destination-Host",
            Self::OriginRealm => "Origin-Realm",
            Self::CcInputOctets => "CC-Input-Octets",
            Self::CcOutputOctets => "CC-Output-Octets",
            Self::CcRequestNumber => "CC-Request-Number",
            Self::CcRequestType => "CC-Request-Type",
            Self::CcTime => "CC-Time",
            Self::GrantedServiceUnit => "Granted-Service-Unit",
            Self::RequestedServiceUnit => "Requested-Service-Unit",
            Self::SubscriptionId => "Subscription-Id",
            Self::SubscriptionIdData => "Subscription-Id-Data",
            Self::UsedServiceUnit => "Used-Service-Unit",
            Self::SubscriptionIdType => "Subscription-Id-Type",
            Self::MultipleServicesCreditControl => "Multiple-Services-Credit-Control",
            Self::UserEquipmentInfo => "User-Equipment-Info",
            Self::UserEquipmentInfoValue => "User-Equipment-Info-Value",
            Self::ServiceSelection => "Service-Selection",
            Self::TgppPdpType => "3GPP-PDP-Type",
            Self::TgppSgsnMccMnc => "3GPP-SGSN-MCC-MNC",
            Self::TgppRatType => "3GPP-RAT-Type",
            Self::TgppUserLocationInfo => "3GPP-User-Location-Info",
            Self::TgppMsTimezone => "3GPP-MS-TimeZone",
            Self::VisitedNetworkIdentifier => "Visited-Network-Identifier",
            Self::GgsnAddress => "GGSN-Address",
            Self::ServiceInformation => "Service-Information",
            Self::PsInformation => "PS-Information",
            Self::PdpAddress => "PDP-Address",
            Self::SgsnAddress => "SGSN-Address",
            Self::QosInformation => "QoS-Information",
            Self::QosClassIdentifier => "QoS-Class-Identifier",
            Self::RatType => "RAT-Type",
            Self::AllocationRetentionPriority => "Allocation-Retention-Priority",
            Self::ApnAggregateMaxBitrateDl => "APN-Aggregate-Max-Bitrate-DL",
            Self::ApnAggregateMaxBitrateUl => "APN-Aggregate-Max-Bitrate-UL",
            Self::PriorityLevel => "Priority-Level",
            Self::PreEmptionCapability => "Pre-emption-Capability",
            Self::PreEmptionVulnerability => "Pre-emption-Vulnerability",
            Self::VisitedPlmnId => "Visited-PLMN-Id",
            Self::RequestedEutranAuthInfo => "Requested-EUTRAN-Authentication-Info",
            Self::NumberOfRequestedVectors => "Number-Of-Requested-Vectors",
            Self::ResyncInfo => "Re-Synchronization-Info",
            Self::ImmediateResponsePreferred => "Immediate-Response-Preferred",
            Self::AuthenticationInfo => "Authentication-Info",
            Self::EutranVector => "E-UTRAN-Vector",
            Self::Rand => "RAND",
            Self::Xres => "XRES",
            Self::Autn => "AUTN",
            Self::Kasme => "KASME",
        }
    }

    /// Get AVP data type
    pub fn data_type(&self) -> AvpDataType {
        match self {
            Self::UserName
            | Self::CalledStationId
            | Self::SessionId
            | Self::ProductName
            | Self::SubscriptionIdData
            | Self::ServiceSelection
            | Self::TgppSgsnMccMnc => AvpDataType::Utf8String,

            Self::OriginHost
            | Self::OriginRealm
            | Self::RouteRecord
            | Self::DestinationRealm
            | Self::DestinationHost => AvpDataType::DiameterIdentity,

            Self::FramedMtu
            | Self::SessionTimeout
            | Self::AuthApplicationId
            | Self::AcctApplicationId
            | Self::SupportedVendorId
            | Self::VendorId
            | Self::FirmwareRevision
            | Self::ResultCode
            | Self::OriginStateId
            | Self::CcRequestNumber
            | Self::CcTime
            | Self::ApnAggregateMaxBitrateDl
            | Self::ApnAggregateMaxBitrateUl
            | Self::PriorityLevel
            | Self::NumberOfRequestedVectors
            | Self::ImmediateResponsePreferred => AvpDataType::Unsigned32,

            Self::CcInputOctets | Self::CcOutputOctets => AvpDataType::Unsigned64,

            Self::DisconnectCause
            | Self::AuthRequestType
            | Self::AuthSessionState
            | Self::CcRequestType
            | Self::SubscriptionIdType
            | Self::TgppPdpType
            | Self::QosClassIdentifier
            | Self::RatType
            | Self::PreEmptionCapability
            | Self::PreEmptionVulnerability => AvpDataType::Enumerated,

            Self::EventTimestamp => AvpDataType::Time,

            Self::HostIpAddress | Self::GgsnAddress | Self::PdpAddress | Self::SgsnAddress => {
                AvpDataType::Address
            }

            Self::VendorSpecificApplicationId
            | Self::GrantedServiceUnit
            | Self::RequestedServiceUnit
            | Self::SubscriptionId
            | Self::UsedServiceUnit
            | Self::MultipleServicesCreditControl
            | Self::UserEquipmentInfo
            | Self::ServiceInformation
            | Self::PsInformation
            | Self::QosInformation
            | Self::AllocationRetentionPriority
            | Self::RequestedEutranAuthInfo
            | Self::AuthenticationInfo
            | Self::EutranVector => AvpDataType::Grouped,

            Self::FramedIpAddress
            | Self::UserEquipmentInfoValue
            | Self::TgppRatType
            | Self::TgppUserLocationInfo
            | Self::TgppMsTimezone
            | Self::VisitedNetworkIdentifier
            | Self::VisitedPlmnId
            | Self::ResyncInfo
            | Self::Rand
            | Self::Xres
            | Self::Autn
            | Self::Kasme => AvpDataType::OctetString,
        }
    }
}
