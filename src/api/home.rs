//! Home page and user greeting

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    services::stats::CatalogCounts,
    validation::escape,
    AppState,
};

use super::Page;

/// Home page context. A failed count leaves `data` empty and sets `error`.
#[derive(Serialize, ToSchema)]
pub struct IndexContext {
    pub error: Option<String>,
    pub data: Option<CatalogCounts>,
}

/// Catalog dashboard
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Home page with catalog counts", body = IndexContext)
    )
)]
pub async fn index(State(state): State<AppState>) -> Page<IndexContext> {
    let context = match state.services.stats.catalog_counts().await {
        Ok(counts) => IndexContext {
            error: None,
            data: Some(counts),
        },
        Err(e) => {
            tracing::error!("Catalog counts failed: {}", e);
            IndexContext {
                error: Some("Unable to load catalog counts".to_string()),
                data: None,
            }
        }
    };
    Page::new("index", "Local Library Home", context)
}

#[derive(Deserialize, IntoParams)]
pub struct GreetingQuery {
    pub username: Option<String>,
}

/// Greeting fragment for a named user
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(GreetingQuery),
    responses(
        (status = 200, description = "Greeting fragment", content_type = "text/html"),
        (status = 404, description = "No username given", body = crate::error::ErrorResponse)
    )
)]
pub async fn greet_user(Query(query): Query<GreetingQuery>) -> AppResult<Html<String>> {
    match query.username.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Ok(Html(format!("<h2>Welcome {}</h2>", escape(name)))),
        _ => Err(AppError::NotFound("No user given".to_string())),
    }
}
