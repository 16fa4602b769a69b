//! Repository layer for database operations

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;

#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Author, Book, BookDetails, BookInstance, BookInstanceStatus, BookListEntry, Genre, NewBook,
    },
};

/// Catalog persistence used by the services.
///
/// Every failure of the underlying store surfaces as `AppError::Database`;
/// absent entities are `None`, not errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Cheap round-trip proving the store is reachable
    async fn ping(&self) -> AppResult<()>;

    async fn authors_list(&self) -> AppResult<Vec<Author>>;
    async fn authors_get(&self, id: Uuid) -> AppResult<Option<Author>>;
    async fn authors_count(&self) -> AppResult<i64>;

    async fn genres_list(&self) -> AppResult<Vec<Genre>>;
    async fn genres_get(&self, id: Uuid) -> AppResult<Option<Genre>>;
    async fn genres_count(&self) -> AppResult<i64>;

    async fn books_list(&self) -> AppResult<Vec<BookListEntry>>;
    async fn books_get(&self, id: Uuid) -> AppResult<Option<BookDetails>>;
    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>>;
    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>>;
    /// Insert a new book; the store assigns the id
    async fn books_create(&self, book: &NewBook) -> AppResult<Book>;
    /// Replace the book keyed by `id`, keeping that id. `None` if absent.
    async fn books_update(&self, id: Uuid, book: &NewBook) -> AppResult<Option<Book>>;
    async fn books_delete(&self, id: Uuid) -> AppResult<bool>;
    async fn books_count(&self) -> AppResult<i64>;

    async fn instances_list(&self) -> AppResult<Vec<BookInstance>>;
    async fn instances_get(&self, id: Uuid) -> AppResult<Option<BookInstance>>;
    async fn instances_for_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>>;
    async fn instances_count(&self, status: Option<BookInstanceStatus>) -> AppResult<i64>;
}

/// PostgreSQL-backed catalog store
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        Repository::ping(self).await
    }

    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        Repository::authors_list(self).await
    }

    async fn authors_get(&self, id: Uuid) -> AppResult<Option<Author>> {
        Repository::authors_get(self, id).await
    }

    async fn authors_count(&self) -> AppResult<i64> {
        Repository::authors_count(self).await
    }

    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        Repository::genres_list(self).await
    }

    async fn genres_get(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Repository::genres_get(self, id).await
    }

    async fn genres_count(&self) -> AppResult<i64> {
        Repository::genres_count(self).await
    }

    async fn books_list(&self) -> AppResult<Vec<BookListEntry>> {
        Repository::books_list(self).await
    }

    async fn books_get(&self, id: Uuid) -> AppResult<Option<BookDetails>> {
        Repository::books_get(self, id).await
    }

    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        Repository::books_by_author(self, author_id).await
    }

    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        Repository::books_by_genre(self, genre_id).await
    }

    async fn books_create(&self, book: &NewBook) -> AppResult<Book> {
        Repository::books_create(self, book).await
    }

    async fn books_update(&self, id: Uuid, book: &NewBook) -> AppResult<Option<Book>> {
        Repository::books_update(self, id, book).await
    }

    async fn books_delete(&self, id: Uuid) -> AppResult<bool> {
        Repository::books_delete(self, id).await
    }

    async fn books_count(&self) -> AppResult<i64> {
        Repository::books_count(self).await
    }

    async fn instances_list(&self) -> AppResult<Vec<BookInstance>> {
        Repository::instances_list(self).await
    }

    async fn instances_get(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Repository::instances_get(self, id).await
    }

    async fn instances_for_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        Repository::instances_for_book(self, book_id).await
    }

    async fn instances_count(&self, status: Option<BookInstanceStatus>) -> AppResult<i64> {
        Repository::instances_count(self, status).await
    }
}
