//! Book instance domain methods on Repository

use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::{BookInstance, BookInstanceStatus},
};

const INSTANCE_COLUMNS: &str = "id, book_id, imprint, status, due_back";

fn instance_from_row(row: &PgRow) -> BookInstance {
    let status: String = row.get("status");
    BookInstance {
        id: row.get("id"),
        book: row.get("book_id"),
        imprint: row.get("imprint"),
        status: BookInstanceStatus::from(status.as_str()),
        due_back: row.get("due_back"),
    }
}

impl Repository {
    /// List all book instances
    pub async fn instances_list(&self) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM book_instances ORDER BY imprint, id",
            INSTANCE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(instance_from_row).collect())
    }

    /// Get book instance by ID
    pub async fn instances_get(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM book_instances WHERE id = $1",
            INSTANCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(instance_from_row))
    }

    /// All instances referencing a book
    pub async fn instances_for_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM book_instances WHERE book_id = $1 ORDER BY imprint, id",
            INSTANCE_COLUMNS
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(instance_from_row).collect())
    }

    /// Count instances, optionally restricted to one status
    pub async fn instances_count(&self, status: Option<BookInstanceStatus>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
