//! Dashboard statistics service

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::BookInstanceStatus, repository::CatalogStore};

/// Catalog totals shown on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Arc<dyn CatalogStore>,
}

impl StatsService {
    pub fn new(repository: Arc<dyn CatalogStore>) -> Self {
        Self { repository }
    }

    /// All five counts, queried concurrently. The first failing count fails
    /// the whole call; no partial result is returned.
    pub async fn catalog_counts(&self) -> AppResult<CatalogCounts> {
        let (book_count, book_instance_count, book_instance_available_count, author_count, genre_count) =
            tokio::try_join!(
                self.repository.books_count(),
                self.repository.instances_count(None),
                self.repository.instances_count(Some(BookInstanceStatus::Available)),
                self.repository.authors_count(),
                self.repository.genres_count(),
            )?;

        Ok(CatalogCounts {
            book_count,
            book_instance_count,
            book_instance_available_count,
            author_count,
            genre_count,
        })
    }
}
