use axum::Json;
use serde::{Deserialize, Serialize};

use bazaar_domain::pincode;

// ── POST /pincode/validate ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ValidatePincodeRequest {
    pub pincode: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ValidatePincodeResponse {
    pub valid: bool,
    pub message: &'static str,
    pub region: Option<&'static str>,
}

pub async fn validate_pincode(
    Json(body): Json<ValidatePincodeRequest>,
) -> Json<ValidatePincodeResponse> {
    let region = pincode::region_for(&body.pincode);
    let valid = region.is_some();
    Json(ValidatePincodeResponse {
        valid,
        message: if valid {
            "Valid PIN code"
        } else {
            "Invalid PIN code"
        },
        region,
    })
}
