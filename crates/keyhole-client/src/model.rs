use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A successful unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unlocked {
    pub link: String,
    pub encrypted_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyPasswordBody<'a> {
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_version: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyPasswordReply {
    pub success: bool,
    // the browser front end reads `response.url`, so accept that name too
    #[serde(default, alias = "url")]
    pub link: Option<String>,
    #[serde(default)]
    pub encrypted_link: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyLinkBody<'a> {
    pub encrypted_link: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyLinkReply {
    pub valid: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GameVersionsReply {
    #[serde(default)]
    pub versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorReply {
    #[serde(default)]
    pub error: Option<String>,
}
