//! Book domain methods on Repository

use std::collections::HashMap;

use sqlx::{postgres::PgRow, Postgres, Row, Transaction};
use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::{Author, Book, BookDetails, BookListEntry, Genre, NewBook},
};

/// Author columns aliased for joins with `books b`
const AUTHOR_JOIN_COLUMNS: &str = "a.id AS author_id, a.first_name, a.family_name, a.date_of_birth, a.date_of_death";

fn author_from_row(row: &PgRow) -> Author {
    Author {
        id: row.get("author_id"),
        first_name: row.get("first_name"),
        family_name: row.get("family_name"),
        date_of_birth: row.get("date_of_birth"),
        date_of_death: row.get("date_of_death"),
    }
}

/// Insert genre references in submission order
async fn insert_book_genres(
    tx: &mut Transaction<'_, Postgres>,
    book_id: Uuid,
    genre: &[Uuid],
) -> AppResult<()> {
    for (position, genre_id) in genre.iter().enumerate() {
        sqlx::query("INSERT INTO book_genres (book_id, position, genre_id) VALUES ($1, $2, $3)")
            .bind(book_id)
            .bind(position as i32)
            .bind(genre_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

impl Repository {
    // =========================================================================
    // READ
    // =========================================================================

    /// List all books (title and author) ordered by title
    pub async fn books_list(&self) -> AppResult<Vec<BookListEntry>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT b.id, b.title, {}
            FROM books b
            JOIN authors a ON a.id = b.author_id
            ORDER BY b.title
            "#,
            AUTHOR_JOIN_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| BookListEntry {
                id: r.get("id"),
                title: r.get("title"),
                author: author_from_row(r),
            })
            .collect())
    }

    /// Get book by ID with its author and genres resolved
    pub async fn books_get(&self, id: Uuid) -> AppResult<Option<BookDetails>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT b.id, b.title, b.summary, b.isbn, {}
            FROM books b
            JOIN authors a ON a.id = b.author_id
            WHERE b.id = $1
            "#,
            AUTHOR_JOIN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let genre = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY bg.position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(BookDetails {
            id: row.get("id"),
            title: row.get("title"),
            author: author_from_row(&row),
            summary: row.get("summary"),
            isbn: row.get("isbn"),
            genre,
        }))
    }

    /// Books written by an author
    pub async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let rows = sqlx::query(
            "SELECT id, title, author_id, summary, isbn FROM books WHERE author_id = $1 ORDER BY title",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        self.books_with_genres(rows).await
    }

    /// Books tagged with a genre
    pub async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, author_id, summary, isbn
            FROM books
            WHERE id IN (SELECT book_id FROM book_genres WHERE genre_id = $1)
            ORDER BY title
            "#,
        )
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        self.books_with_genres(rows).await
    }

    /// Attach genre references to plain book rows
    async fn books_with_genres(&self, rows: Vec<PgRow>) -> AppResult<Vec<Book>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.get("id")).collect();

        let links = sqlx::query(
            "SELECT book_id, genre_id FROM book_genres WHERE book_id = ANY($1) ORDER BY book_id, position",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut genres: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in &links {
            genres
                .entry(link.get("book_id"))
                .or_default()
                .push(link.get("genre_id"));
        }

        Ok(rows
            .iter()
            .map(|r| {
                let id: Uuid = r.get("id");
                Book {
                    id,
                    title: r.get("title"),
                    author: r.get("author_id"),
                    summary: r.get("summary"),
                    isbn: r.get("isbn"),
                    genre: genres.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }

    pub async fn books_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Create a book and its genre references in one transaction
    pub async fn books_create(&self, book: &NewBook) -> AppResult<Book> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO books (id, title, author_id, summary, isbn)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(book.author)
        .bind(&book.summary)
        .bind(&book.isbn)
        .execute(&mut *tx)
        .await?;

        insert_book_genres(&mut tx, id, &book.genre).await?;
        tx.commit().await?;

        Ok(Book {
            id,
            title: book.title.clone(),
            author: book.author,
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.clone(),
        })
    }

    /// Update a book in place, keeping its id
    pub async fn books_update(&self, id: Uuid, book: &NewBook) -> AppResult<Option<Book>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author_id = $3, summary = $4, isbn = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(book.author)
        .bind(&book.summary)
        .bind(&book.isbn)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_book_genres(&mut tx, id, &book.genre).await?;
        tx.commit().await?;

        Ok(Some(Book {
            id,
            title: book.title.clone(),
            author: book.author,
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.clone(),
        }))
    }

    /// Delete a book; its genre references cascade
    pub async fn books_delete(&self, id: Uuid) -> AppResult<bool> {
        let deleted = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }
}
