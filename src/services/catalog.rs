//! Read-only browsing of authors, genres and book copies

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookDetails, BookInstance, Genre},
    repository::CatalogStore,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetailView {
    pub author: Author,
    pub author_books: Vec<Book>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreDetailView {
    pub genre: Genre,
    pub genre_books: Vec<Book>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InstanceDetailView {
    pub bookinstance: BookInstance,
    /// `None` when the referenced book no longer exists
    pub book: Option<BookDetails>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn CatalogStore>) -> Self {
        Self { repository }
    }

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.authors_list().await
    }

    /// Author with the books they wrote
    pub async fn author_detail(&self, id: Uuid) -> AppResult<AuthorDetailView> {
        let (author, author_books) = tokio::try_join!(
            self.repository.authors_get(id),
            self.repository.books_by_author(id),
        )?;
        let author = author.ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;
        Ok(AuthorDetailView { author, author_books })
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres_list().await
    }

    /// Genre with the books tagged with it
    pub async fn genre_detail(&self, id: Uuid) -> AppResult<GenreDetailView> {
        let (genre, genre_books) = tokio::try_join!(
            self.repository.genres_get(id),
            self.repository.books_by_genre(id),
        )?;
        let genre = genre.ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))?;
        Ok(GenreDetailView { genre, genre_books })
    }

    pub async fn list_instances(&self) -> AppResult<Vec<BookInstance>> {
        self.repository.instances_list().await
    }

    /// Copy with its book resolved
    pub async fn instance_detail(&self, id: Uuid) -> AppResult<InstanceDetailView> {
        let bookinstance = self
            .repository
            .instances_get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book copy {} not found", id)))?;
        let book = self.repository.books_get(bookinstance.book).await?;
        Ok(InstanceDetailView { bookinstance, book })
    }
}
