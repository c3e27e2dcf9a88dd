use crate::domains::api_key::models::{
    CreateApiKeyRequest, IssuedApiKey, RevokeApiKeyRequest, RevokeApiKeyResponse,
    RolloverApiKeyRequest,
};
use crate::shared::services::AppState;
use crate::shared::errors::ApiKeyError;
use crate::shared::middleware::auth::AuthenticatedUser;
use axum::{extract::State, http::StatusCode, Json};

// API 키 발급
pub async fn create_api_key(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<IssuedApiKey>), (StatusCode, Json<serde_json::Value>)> {
    let issued = app_state
        .api_key_state
        .api_key_service
        .issue(authenticated_user.user_id, request)
        .await
        .map_err(|e: ApiKeyError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok((StatusCode::CREATED, Json(issued)))
}

// 만료된 키 교체
pub async fn rollover_api_key(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<RolloverApiKeyRequest>,
) -> Result<(StatusCode, Json<IssuedApiKey>), (StatusCode, Json<serde_json::Value>)> {
    let issued = app_state
        .api_key_state
        .api_key_service
        .rollover(authenticated_user.user_id, request)
        .await
        .map_err(|e: ApiKeyError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok((StatusCode::CREATED, Json(issued)))
}

// API 키 폐기
pub async fn revoke_api_key(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<RevokeApiKeyRequest>,
) -> Result<Json<RevokeApiKeyResponse>, (StatusCode, Json<serde_json::Value>)> {
    let response = app_state
        .api_key_state
        .api_key_service
        .revoke(authenticated_user.user_id, request.key_id)
        .await
        .map_err(|e: ApiKeyError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(response))
}
