//! Book pages and form endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{BookListEntry, RawBookForm},
    services::books::{
        BookDeleteView, BookDetailView, BookFormView, DeleteFormOutcome, DeleteOutcome,
        SubmitOutcome,
    },
    AppState,
};

use super::Page;

const BOOK_LIST_URL: &str = "/catalog/books";

#[derive(Serialize, ToSchema)]
pub struct BookListContext {
    pub book_list: Vec<BookListEntry>,
}

/// Form answer shared by create and update
fn submit_response(title: &'static str, outcome: SubmitOutcome) -> Response {
    match outcome {
        SubmitOutcome::Saved { url, .. } => Redirect::to(&url).into_response(),
        SubmitOutcome::Invalid(form) => {
            Page::new("book_form", title, form).with_status(StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

/// List all books
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    responses(
        (status = 200, description = "Book list page", body = BookListContext)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Page<BookListContext>> {
    let book_list = state.services.books.list_books().await?;
    Ok(Page::new("book_list", "Book List", BookListContext { book_list }))
}

/// Book details with its copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book detail page", body = BookDetailView),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page<BookDetailView>> {
    let view = state.services.books.book_detail(id).await?;
    Ok(Page::new("book_detail", view.book.title.clone(), view))
}

/// Empty book form
#[utoipa::path(
    get,
    path = "/catalog/book/create",
    tag = "books",
    responses(
        (status = 200, description = "Book form", body = BookFormView)
    )
)]
pub async fn create_form(State(state): State<AppState>) -> AppResult<Page<BookFormView>> {
    let view = state.services.books.create_form().await?;
    Ok(Page::new("book_form", "Create Book", view))
}

/// Create a book from the submitted form
#[utoipa::path(
    post,
    path = "/catalog/book/create",
    tag = "books",
    responses(
        (status = 303, description = "Created; redirect to the new book"),
        (status = 422, description = "Form redisplayed with errors", body = BookFormView)
    )
)]
pub async fn create_submit(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let outcome = state
        .services
        .books
        .create_submit(RawBookForm::from_pairs(fields))
        .await?;
    Ok(submit_response("Create Book", outcome))
}

/// Delete confirmation page
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = BookDeleteView),
        (status = 303, description = "No such book; redirect to the list")
    )
)]
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    Ok(match state.services.books.delete_form(id).await? {
        DeleteFormOutcome::Missing => Redirect::to(BOOK_LIST_URL).into_response(),
        DeleteFormOutcome::Confirm(view) => Page::new("book_delete", "Delete Book", view).into_response(),
    })
}

/// Delete a book unless copies still reference it.
///
/// The book id comes from the `bookid` form field, or from the path when the
/// form does not carry one.
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Deleted; redirect to the list"),
        (status = 409, description = "Copies still reference the book", body = BookDeleteView)
    )
)]
pub async fn delete_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let id = match fields.iter().find(|(key, _)| key == "bookid") {
        Some((_, value)) => Uuid::parse_str(value.trim())
            .map_err(|_| AppError::BadRequest(format!("Invalid book id: {}", value)))?,
        None => id,
    };

    Ok(match state.services.books.delete_submit(id).await? {
        DeleteOutcome::Deleted => Redirect::to(BOOK_LIST_URL).into_response(),
        DeleteOutcome::Blocked(view) => {
            Page::new("book_delete", "Delete Book", view).with_status(StatusCode::CONFLICT)
        }
    })
}

/// Book form pre-filled with an existing book
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book form", body = BookFormView),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page<BookFormView>> {
    let view = state.services.books.update_form(id).await?;
    Ok(Page::new("book_form", "Update Book", view))
}

/// Update a book from the submitted form
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Updated; redirect to the book"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Form redisplayed with errors", body = BookFormView)
    )
)]
pub async fn update_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let outcome = state
        .services
        .books
        .update_submit(id, RawBookForm::from_pairs(fields))
        .await?;
    Ok(submit_response("Update Book", outcome))
}
