use crate::error::Result;
use crate::model::GameVersionsResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;

pub async fn game_versions_handler(
    State(state): State<AppState>,
) -> Result<Json<GameVersionsResponse>> {
    let versions = state
        .resolver()
        .contexts()
        .await?
        .into_iter()
        .map(String::from)
        .collect();

    Ok(Json(GameVersionsResponse {
        success: true,
        versions,
    }))
}
