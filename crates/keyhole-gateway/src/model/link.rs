use serde::{Deserialize, Serialize};

/// Body of `POST /verify-password` and `POST /get-link`.
///
/// Both fields are optional at the wire level so that a missing password is
/// reported as a 400 with the usual error body rather than a decode failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPasswordRequest {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub game_version: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPasswordResponse {
    pub success: bool,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyLinkRequest {
    #[serde(default)]
    pub encrypted_link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyLinkResponse {
    pub success: bool,
    pub valid: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
