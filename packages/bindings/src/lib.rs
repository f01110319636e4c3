use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// ROI
// ---------------------------------------------------------------------------

/// Full battery ROI calculation. Takes `RoiInputs` JSON, returns the
/// computation envelope as JSON.
#[napi]
pub fn calculate_roi(input_json: String) -> NapiResult<String> {
    let input: battery_roi_core::roi::RoiInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = battery_roi_core::roi::calculator::calculate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Validate displayed annual net and payback. Takes `SanityCheckInput` JSON.
#[napi]
pub fn sanity_check(input_json: String) -> NapiResult<String> {
    let input: battery_roi_core::roi::sanity::SanityCheckInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        battery_roi_core::roi::sanity::run_sanity_check(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn roi_sensitivity(input_json: String) -> NapiResult<String> {
    let input: battery_roi_core::scenarios::sensitivity::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = battery_roi_core::scenarios::sensitivity::evaluate_sensitivity(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
