//! HTTP handlers and routing.
//!
//! Pages are returned as render payloads: the template name, the page title
//! and the template context, serialized as one JSON object. Successful form
//! posts answer with a `303 See Other` redirect.

pub mod books;
pub mod catalog;
pub mod health;
pub mod home;
pub mod openapi;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Render payload for one template
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub view: &'static str,
    pub title: String,
    #[serde(flatten)]
    pub context: T,
}

impl<T: Serialize> Page<T> {
    pub fn new(view: &'static str, title: impl Into<String>, context: T) -> Self {
        Self {
            view,
            title: title.into(),
            context,
        }
    }

    /// Render with a non-200 status, e.g. a rejected form
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let catalog = Router::new()
        .route("/", get(home::index))
        // Books
        .route("/books", get(books::list_books))
        .route("/book/create", get(books::create_form).post(books::create_submit))
        .route("/book/:id", get(books::book_detail))
        .route("/book/:id/delete", get(books::delete_form).post(books::delete_submit))
        .route("/book/:id/update", get(books::update_form).post(books::update_submit))
        // Authors
        .route("/authors", get(catalog::list_authors))
        .route("/author/:id", get(catalog::author_detail))
        // Genres
        .route("/genres", get(catalog::list_genres))
        .route("/genre/:id", get(catalog::genre_detail))
        // Copies
        .route("/bookinstances", get(catalog::list_instances))
        .route("/bookinstance/:id", get(catalog::instance_detail));

    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .route("/users", get(home::greet_user))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog", catalog)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
}
