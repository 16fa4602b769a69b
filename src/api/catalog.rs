//! Author, genre and book copy pages

use axum::extract::{Path, State};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Author, BookInstance, Genre},
    services::catalog::{AuthorDetailView, GenreDetailView, InstanceDetailView},
    AppState,
};

use super::Page;

#[derive(Serialize, ToSchema)]
pub struct AuthorListContext {
    pub author_list: Vec<Author>,
}

#[derive(Serialize, ToSchema)]
pub struct GenreListContext {
    pub genre_list: Vec<Genre>,
}

#[derive(Serialize, ToSchema)]
pub struct InstanceListContext {
    pub bookinstance_list: Vec<BookInstance>,
}

/// List all authors
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "catalog",
    responses(
        (status = 200, description = "Author list page", body = AuthorListContext)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Page<AuthorListContext>> {
    let author_list = state.services.catalog.list_authors().await?;
    Ok(Page::new("author_list", "Author List", AuthorListContext { author_list }))
}

/// Author details with their books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "catalog",
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author detail page", body = AuthorDetailView),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn author_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page<AuthorDetailView>> {
    let view = state.services.catalog.author_detail(id).await?;
    Ok(Page::new("author_detail", "Author Detail", view))
}

/// List all genres
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "catalog",
    responses(
        (status = 200, description = "Genre list page", body = GenreListContext)
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Page<GenreListContext>> {
    let genre_list = state.services.catalog.list_genres().await?;
    Ok(Page::new("genre_list", "Genre List", GenreListContext { genre_list }))
}

/// Genre details with its books
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "catalog",
    params(
        ("id" = Uuid, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre detail page", body = GenreDetailView),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn genre_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page<GenreDetailView>> {
    let view = state.services.catalog.genre_detail(id).await?;
    Ok(Page::new("genre_detail", "Genre Detail", view))
}

/// List all book copies
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "catalog",
    responses(
        (status = 200, description = "Copy list page", body = InstanceListContext)
    )
)]
pub async fn list_instances(State(state): State<AppState>) -> AppResult<Page<InstanceListContext>> {
    let bookinstance_list = state.services.catalog.list_instances().await?;
    Ok(Page::new(
        "bookinstance_list",
        "Book Instance List",
        InstanceListContext { bookinstance_list },
    ))
}

/// Copy details with its book
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "catalog",
    params(
        ("id" = Uuid, Path, description = "Book copy ID")
    ),
    responses(
        (status = 200, description = "Copy detail page", body = InstanceDetailView),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn instance_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page<InstanceDetailView>> {
    let view = state.services.catalog.instance_detail(id).await?;
    Ok(Page::new("bookinstance_detail", "Book Instance", view))
}
