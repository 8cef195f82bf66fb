use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GameVersionsResponse {
    pub success: bool,
    pub versions: Vec<String>,
}
