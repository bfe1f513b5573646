use dtra_radius::RadiusResult;
use dtra_shared::{
    RESULT_CODE_AUTHORIZATION_REJECTED, RESULT_CODE_SUCCESS, RESULT_CODE_UNABLE_TO_COMPLY,
    RESULT_CODE_USER_UNKNOWN,
};

use crate::types::DiameterRequest;

/// Result-Code for a request whose RADIUS exchange completed.
///
/// An accept of the wrong kind (access result for an accounting request or
/// the reverse) cannot be mapped and yields UNABLE_TO_COMPLY.
pub fn result_code_for(request: &DiameterRequest, result: &RadiusResult) -> u32 {
    let kind_matches = match (request, result) {
        (DiameterRequest::AuthInfo(_) | DiameterRequest::AuthAuthz(_), RadiusResult::Access(_)) => true,
        (DiameterRequest::CreditControl(_), RadiusResult::Accounting(_)) => true,
        (_, RadiusResult::Failed(_)) => true,
        _ => false,
    };
    if !kind_matches {
        return RESULT_CODE_UNABLE_TO_COMPLY;
    }

    if result.is_accept() {
        RESULT_CODE_SUCCESS
    } else {
        RESULT_CODE_AUTHORIZATION_REJECTED
    }
}

/// Result-Code when no RADIUS result arrived within the wait budget
pub fn timeout_result_code(request: &DiameterRequest) -> u32 {
    match request {
        DiameterRequest::CreditControl(_) => RESULT_CODE_USER_UNKNOWN,
        _ => RESULT_CODE_AUTHORIZATION_REJECTED,
    }
}
