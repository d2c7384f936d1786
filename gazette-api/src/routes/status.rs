//! Registry status endpoint.

use axum::{extract::State, response::IntoResponse, Json};
use gazette_storage::CountryStore;
use std::sync::Arc;

use crate::error::ApiResult;

#[cfg(feature = "openapi")]
use crate::error::ApiError;
#[cfg(feature = "openapi")]
use gazette_core::CountryStatus;

#[derive(Clone)]
pub struct StatusState {
    pub store: Arc<dyn CountryStore>,
}

/// GET /status - Country count and last refresh time
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/status",
    tag = "Countries",
    responses(
        (status = 200, description = "Registry status", body = CountryStatus),
        (status = 500, description = "Database error", body = ApiError),
    ),
))]
pub async fn get_status(State(state): State<Arc<StatusState>>) -> ApiResult<impl IntoResponse> {
    let status = state.store.status().await?;
    Ok(Json(status))
}

pub fn create_router(store: Arc<dyn CountryStore>) -> axum::Router {
    let state = Arc::new(StatusState { store });

    axum::Router::new()
        .route("/", axum::routing::get(get_status))
        .with_state(state)
}
