// Diameter Command Codes
pub const CMD_CER: u32 = 257;
pub const CMD_AAR: u32 = 265;
pub const CMD_CCR: u32 = 272;
pub const CMD_DWR: u32 = 280;
pub const CMD_DPR: u32 = 282;
pub const CMD_AIR: u32 = 318;

// Application IDs
pub const APP_ID_COMMON: u32 = 0;
pub const APP_ID_NASREQ: u32 = 1;
pub const APP_ID_CREDIT_CONTROL: u32 = 4;
pub const APP_ID_S6A: u32 = 16777251;
pub const APP_ID_S6B: u32 = 16777272;

// Vendor IDs
pub const VENDOR_3GPP: u32 = 10415;

// ========================================
// AVP Codes: RFC 6733 / RFC 7155 (NASREQ)
// ========================================
pub const AVP_USER_NAME: u32 = 1;
pub const AVP_FRAMED_IP_ADDRESS: u32 = 8;
pub const AVP_FRAMED_MTU: u32 = 12;
pub const AVP_SESSION_TIMEOUT: u32 = 27;
pub const AVP_CALLED_STATION_ID: u32 = 30;
pub const AVP_EVENT_TIMESTAMP: u32 = 55;
pub const AVP_HOST_IP_ADDRESS: u32 = 257;
pub const AVP_AUTH_APPLICATION_ID: u32 = 258;
pub const AVP_VENDOR_SPECIFIC_APPLICATION_ID: u32 = 260;
pub const AVP_SESSION_ID: u32 = 263;
pub const AVP_ORIGIN_HOST: u32 = 264;
pub const AVP_SUPPORTED_VENDOR_ID: u32 = 265;
pub const AVP_VENDOR_ID: u32 = 266;
pub const AVP_FIRMWARE_REVISION: u32 = 267;
pub const AVP_RESULT_CODE: u32 = 268;
pub const AVP_PRODUCT_NAME: u32 = 269;
pub const AVP_DISCONNECT_CAUSE: u32 = 273;
pub const AVP_AUTH_REQUEST_TYPE: u32 = 274;
pub const AVP_AUTH_SESSION_STATE: u32 = 277;
pub const AVP_ORIGIN_STATE_ID: u32 = 278;
pub const AVP_DEST_REALM: u32 = 283;
pub const AVP_ORIGIN_REALM: u32 = 296;

// ========================================
// AVP Codes: RFC 4006 Credit-Control
// ========================================
pub const AVP_CC_INPUT_OCTETS: u32 = 412;
pub const AVP_CC_OUTPUT_OCTETS: u32 = 414;
pub const AVP_CC_REQUEST_NUMBER: u32 = 415;
pub const AVP_CC_REQUEST_TYPE: u32 = 416;
pub const AVP_CC_TIME: u32 = 420;
pub const AVP_GRANTED_SERVICE_UNIT: u32 = 431;
pub const AVP_REQUESTED_SERVICE_UNIT: u32 = 437;
pub const AVP_SUBSCRIPTION_ID: u32 = 443;
pub const AVP_SUBSCRIPTION_ID_DATA: u32 = 444;
pub const AVP_USED_SERVICE_UNIT: u32 = 446;
pub const AVP_SUBSCRIPTION_ID_TYPE: u32 = 450;
pub const AVP_MULTIPLE_SERVICES_CREDIT_CONTROL: u32 = 456;
pub const AVP_USER_EQUIPMENT_INFO: u32 = 458;
pub const AVP_USER_EQUIPMENT_INFO_VALUE: u32 = 460;
pub const AVP_SERVICE_SELECTION: u32 = 493;

// ========================================
// AVP Codes: 3GPP (vendor 10415)
// ========================================
pub const AVP_TGPP_PDP_TYPE: u32 = 3;
pub const AVP_TGPP_SGSN_MCC_MNC: u32 = 18;
pub const AVP_TGPP_RAT_TYPE: u32 = 21;
pub const AVP_TGPP_USER_LOCATION_INFO: u32 = 22;
pub const AVP_TGPP_MS_TIMEZONE: u32 = 23;
pub const AVP_VISITED_NETWORK_IDENTIFIER: u32 = 600;
pub const AVP_GGSN_ADDRESS: u32 = 847;
pub const AVP_SERVICE_INFORMATION: u32 = 873;
pub const AVP_PS_INFORMATION: u32 = 874;
pub const AVP_QOS_INFORMATION: u32 = 1016;
pub const AVP_QOS_CLASS_IDENTIFIER: u32 = 1028;
pub const AVP_RAT_TYPE: u32 = 1032;
pub const AVP_ALLOCATION_RETENTION_PRIORITY: u32 = 1034;
pub const AVP_APN_AGGREGATE_MAX_BITRATE_DL: u32 = 1040;
pub const AVP_APN_AGGREGATE_MAX_BITRATE_UL: u32 = 1041;
pub const AVP_PRIORITY_LEVEL: u32 = 1046;
pub const AVP_PRE_EMPTION_CAPABILITY: u32 = 1047;
pub const AVP_PRE_EMPTION_VULNERABILITY: u32 = 1048;
pub const AVP_PDP_ADDRESS: u32 = 1227;
pub const AVP_SGSN_ADDRESS: u32 = 1228;
pub const AVP_VISITED_PLMN_ID: u32 = 1407;
pub const AVP_REQUESTED_EUTRAN_AUTH_INFO: u32 = 1408;
pub const AVP_NUMBER_OF_REQUESTED_VECTORS: u32 = 1410;
pub const AVP_RESYNC_INFO: u32 = 1411;
pub const AVP_IMMEDIATE_RESPONSE_PREFERRED: u32 = 1412;
pub const AVP_AUTHENTICATION_INFO: u32 = 1413;
pub const AVP_EUTRAN_VECTOR: u32 = 1414;
pub const AVP_RAND: u32 = 1447;
pub const AVP_XRES: u32 = 1448;
pub const AVP_AUTN: u32 = 1449;
pub const AVP_KASME: u32 = 1450;

// Result-Code values (AVP 268)
pub const RESULT_CODE_SUCCESS: u32 = 2001; // DIAMETER_SUCCESS
pub const RESULT_CODE_UNABLE_TO_DELIVER: u32 = 3002; // DIAMETER_UNABLE_TO_DELIVER
pub const RESULT_CODE_AUTHORIZATION_REJECTED: u32 = 5003; // DIAMETER_AUTHORIZATION_REJECTED
pub const RESULT_CODE_UNABLE_TO_COMPLY: u32 = 5012; // DIAMETER_UNABLE_TO_COMPLY
pub const RESULT_CODE_USER_UNKNOWN: u32 = 5030; // DIAMETER_USER_UNKNOWN (RFC 4006)

// CC-Request-Type values (AVP 416)
pub const CC_REQUEST_TYPE_INITIAL: u32 = 1;
pub const CC_REQUEST_TYPE_UPDATE: u32 = 2;
pub const CC_REQUEST_TYPE_TERMINATION: u32 = 3;
pub const CC_REQUEST_TYPE_EVENT: u32 = 4;

// Auth-Session-State values (AVP 277)
pub const AUTH_SESSION_STATE_NO_STATE_MAINTAINED: u32 = 1;

/// Short command name for logs and metric labels
pub fn command_name(code: u32) -> &'static str {
    match code {
        CMD_CER => "CER",
        CMD_AAR => "AAR",
        CMD_CCR => "CCR",
        CMD_DWR => "DWR",
        CMD_DPR => "DPR",
        CMD_AIR => "AIR",
        _ => "UNKNOWN",
    }
}

/// Whether a Result-Code belongs to the 2xxx success class
pub fn is_success(result_code: u32) -> bool {
    (2000..3000).contains(&result_code)
}

/// Whether a Result-Code is a 3xxx protocol error, answered with the E bit set
pub fn is_protocol_error(result_code: u32) -> bool {
    (3000..4000).contains(&result_code)
}
