use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use cosmo_cms::to_search_entry;
use cosmo_core::ServiceSummary;

use crate::middleware::RequestId;

use super::{map_cms_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResults {
    pub query: String,
    pub results: Vec<ServiceSummary>,
}

/// Reloads the search store from the services list before every query.
///
/// The list is served from the revalidation cache, so this only reaches the
/// CMS once per window, and a store left empty by a failed page render is
/// replaced as soon as the CMS answers again.
async fn refresh_index(state: &AppState, request_id: &str) -> Result<(), ApiError> {
    let raw = state
        .content
        .services()
        .await
        .map_err(|e| map_cms_error(request_id.to_owned(), &e, "услуг"))?;
    state
        .search
        .write()
        .await
        .set_all(raw.iter().map(to_search_entry).collect());
    Ok(())
}

pub(super) async fn search_services(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<SearchResults>>, ApiError> {
    let Some(query) = params.q else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "missing query parameter `q`",
        ));
    };

    refresh_index(&state, &req_id.0).await?;
    let results = state
        .search
        .read()
        .await
        .search(&query)
        .into_iter()
        .cloned()
        .collect();

    Ok(ApiResponse::new(SearchResults { query, results }, req_id.0))
}
