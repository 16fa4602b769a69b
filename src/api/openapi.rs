//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, catalog, health, home};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library",
        version = "0.1.0",
        description = "Library catalog pages and form endpoints. Pages are returned as render payloads."
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Home
        home::index,
        home::greet_user,
        // Books
        books::list_books,
        books::book_detail,
        books::create_form,
        books::create_submit,
        books::delete_form,
        books::delete_submit,
        books::update_form,
        books::update_submit,
        // Catalog
        catalog::list_authors,
        catalog::author_detail,
        catalog::list_genres,
        catalog::genre_detail,
        catalog::list_instances,
        catalog::instance_detail,
    ),
    components(
        schemas(
            // Models
            crate::models::Author,
            crate::models::Genre,
            crate::models::GenreChoice,
            crate::models::Book,
            crate::models::BookDetails,
            crate::models::BookListEntry,
            crate::models::BookDraft,
            crate::models::FieldError,
            crate::models::BookInstance,
            crate::models::BookInstanceStatus,
            // Views
            crate::services::books::BookDetailView,
            crate::services::books::BookFormView,
            crate::services::books::BookDeleteView,
            crate::services::catalog::AuthorDetailView,
            crate::services::catalog::GenreDetailView,
            crate::services::catalog::InstanceDetailView,
            crate::services::stats::CatalogCounts,
            // Page contexts
            home::IndexContext,
            books::BookListContext,
            catalog::AuthorListContext,
            catalog::GenreListContext,
            catalog::InstanceListContext,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book pages and forms"),
        (name = "catalog", description = "Home page, authors, genres and copies"),
        (name = "users", description = "User greeting")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
