//! Page view-models.
//!
//! A page whose CMS fetch failed still renders: its content lists are empty
//! and `error` carries the localized message to show in their place.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use cosmo_cms::{to_detail, to_search_entry, to_summary, to_work, CmsError, RawService, RawWork};
use cosmo_core::{
    group_by_first_letter, CatalogGroup, ImageResolver, Rendition, ServiceDetail, ServiceSummary,
    Work, WorkDisplay,
};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

/// Services shown on the home page.
const FEATURED_COUNT: usize = 3;
/// Cards in the services page grid; the catalog below it lists all.
const GRID_COUNT: usize = 9;

const SERVICES_SUBJECT: &str = "услуг";
const SERVICE_SUBJECT: &str = "услуги";

#[derive(Debug, Serialize)]
pub(super) struct WorkCard {
    #[serde(flatten)]
    pub work: Work,
    pub display: WorkDisplay,
}

#[derive(Debug, Serialize)]
pub(super) struct HomePage {
    pub featured: Vec<ServiceSummary>,
    pub works: Vec<WorkCard>,
    pub error: Option<String>,
    pub works_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ServicesPage {
    pub services: Vec<ServiceSummary>,
    pub catalog: Vec<CatalogGroup>,
    pub total: usize,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ServicePage {
    pub service: Option<ServiceDetail>,
    pub main_image_url: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct WorksPage {
    pub works: Vec<WorkCard>,
    pub error: Option<String>,
}

/// The works gallery has its own wording: no status code, accusative noun.
fn works_error_message(error: &CmsError) -> String {
    if error.status().is_some() {
        "Не удалось загрузить работы".to_owned()
    } else {
        "Произошла ошибка при загрузке работ".to_owned()
    }
}

fn work_cards(raw: &[RawWork], resolver: &ImageResolver) -> Vec<WorkCard> {
    raw.iter()
        .map(|record| {
            let work = to_work(record);
            let display = WorkDisplay::for_work(&work, resolver);
            WorkCard { work, display }
        })
        .collect()
}

fn summaries(raw: &[RawService]) -> Vec<ServiceSummary> {
    raw.iter().map(to_summary).collect()
}

async fn load_works(state: &AppState) -> (Vec<WorkCard>, Option<String>) {
    match state.content.works().await {
        Ok(raw) => (work_cards(&raw, &state.resolver), None),
        Err(e) => {
            tracing::warn!(error = %e, "works unavailable");
            (Vec::new(), Some(works_error_message(&e)))
        }
    }
}

pub(super) async fn home(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<HomePage>> {
    let (featured, entries, error) = match state.content.services().await {
        Ok(raw) => (
            raw.iter().take(FEATURED_COUNT).map(to_summary).collect(),
            raw.iter().map(to_search_entry).collect(),
            None,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "services unavailable for home page");
            (Vec::new(), Vec::new(), Some(e.user_message(SERVICES_SUBJECT)))
        }
    };
    state.search.write().await.set_all(entries);

    let (works, works_error) = load_works(&state).await;

    ApiResponse::new(
        HomePage {
            featured,
            works,
            error,
            works_error,
        },
        req_id.0,
    )
}

pub(super) async fn services(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ServicesPage>> {
    let page = match state.content.services().await {
        Ok(raw) => {
            let all = summaries(&raw);
            ServicesPage {
                catalog: group_by_first_letter(&all),
                total: all.len(),
                services: all.into_iter().take(GRID_COUNT).collect(),
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "services unavailable");
            ServicesPage {
                services: Vec::new(),
                catalog: Vec::new(),
                total: 0,
                error: Some(e.user_message(SERVICES_SUBJECT)),
            }
        }
    };
    ApiResponse::new(page, req_id.0)
}

pub(super) async fn service_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ServicePage>>, ApiError> {
    let page = match state.content.service(&slug).await {
        Ok(Some(raw)) => {
            let service = to_detail(&raw);
            ServicePage {
                main_image_url: state
                    .resolver
                    .resolve(Some(service.image.as_slice()), Some(Rendition::Large)),
                service: Some(service),
                error: None,
            }
        }
        Ok(None) => {
            return Err(ApiError::new(
                req_id.0,
                "not_found",
                format!("Услуга «{slug}» не найдена"),
            ));
        }
        Err(e) => {
            tracing::warn!(error = %e, slug = %slug, "service detail unavailable");
            ServicePage {
                service: None,
                main_image_url: None,
                error: Some(e.user_message(SERVICE_SUBJECT)),
            }
        }
    };
    Ok(ApiResponse::new(page, req_id.0))
}

pub(super) async fn works(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<WorksPage>> {
    let (works, error) = load_works(&state).await;
    ApiResponse::new(WorksPage { works, error }, req_id.0)
}
