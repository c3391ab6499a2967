use axum::{extract::State, Extension, Json};

use crate::middleware::RequestId;

use super::{map_cms_error, ApiError, ApiResponse, AppState};

/// Slugs of every service, for pre-rendering and sitemaps.
pub(super) async fn list_slugs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let slugs = state
        .content
        .service_slugs()
        .await
        .map_err(|e| map_cms_error(req_id.0.clone(), &e, "услуг"))?;
    Ok(ApiResponse::new(slugs.to_vec(), req_id.0))
}
