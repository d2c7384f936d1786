//! Service landing page and maintainer profile.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::{config::ProfileConfig, sources::FactSource, types::ProfileResponse};

pub const WELCOME_TEXT: &str = "Welcome to the Gazette API";
pub const FACT_UNAVAILABLE: &str = "Unable to fetch a cat fact at the moment";
pub const FACT_MISSING: &str = "No cat fact available";

#[derive(Clone)]
pub struct ProfileState {
    pub profile: Arc<ProfileConfig>,
    pub facts: Arc<dyn FactSource>,
}

/// GET / - Plain-text welcome
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/",
    tag = "Profile",
    responses(
        (status = 200, description = "Welcome text", body = String, content_type = "text/plain"),
    ),
))]
pub async fn welcome() -> &'static str {
    WELCOME_TEXT
}

/// GET /me - Maintainer profile with a random fact
///
/// Always 200: a failing fact source only changes the `fact` text.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/me",
    tag = "Profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
    ),
))]
pub async fn get_profile(State(state): State<Arc<ProfileState>>) -> impl IntoResponse {
    let fact = match state.facts.fetch_fact().await {
        Ok(Some(fact)) => fact,
        Ok(None) => FACT_MISSING.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Fact source failed");
            FACT_UNAVAILABLE.to_string()
        }
    };

    Json(ProfileResponse {
        status: "success".to_string(),
        user: state.profile.as_ref().clone(),
        timestamp: Utc::now(),
        fact,
    })
}

pub fn create_router(profile: Arc<ProfileConfig>, facts: Arc<dyn FactSource>) -> axum::Router {
    let state = Arc::new(ProfileState { profile, facts });

    axum::Router::new()
        .route("/", axum::routing::get(welcome))
        .route("/me", axum::routing::get(get_profile))
        .with_state(state)
}
