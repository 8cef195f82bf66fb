use crate::error::{AppError, Result};
use crate::model::{
    VerifyLinkRequest, VerifyLinkResponse, VerifyPasswordRequest, VerifyPasswordResponse,
};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use keyhole_core::ContextTag;
use keyhole_resolver::ResolveError;
use tracing::info;

pub async fn verify_password_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<VerifyPasswordRequest>, JsonRejection>,
) -> Result<Json<VerifyPasswordResponse>> {
    let Json(request) = payload?;

    let password = request
        .password
        .filter(|password| !password.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Password is required".to_string()))?;

    let context =
        ContextTag::from_request(request.game_version.as_deref()).map_err(ResolveError::from)?;

    let outcome = state
        .resolver()
        .unlock(&password, Some(context.as_str()))
        .await;

    match outcome {
        Ok(record) => {
            info!(%context, "access granted");
            Ok(Json(VerifyPasswordResponse {
                success: true,
                link: record.link,
                encrypted_link: record.encrypted_link,
            }))
        }
        Err(err) => {
            let err = AppError::from(err);
            if matches!(err, AppError::WrongPassword) {
                info!(%context, "access denied");
            }
            Err(err)
        }
    }
}

pub async fn verify_link_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<VerifyLinkRequest>, JsonRejection>,
) -> Result<Json<VerifyLinkResponse>> {
    let Json(request) = payload?;

    let link = request
        .encrypted_link
        .filter(|link| !link.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Encrypted link is required".to_string()))?;

    let valid = state.resolver().verify_link(&link).await?;

    Ok(Json(VerifyLinkResponse {
        success: true,
        valid,
    }))
}
