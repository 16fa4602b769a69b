//! In-memory catalog store for service and handler tests

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::CatalogStore;
use crate::{
    error::AppResult,
    models::{
        Author, Book, BookDetails, BookInstance, BookInstanceStatus, BookListEntry, Genre, NewBook,
    },
};

#[derive(Default)]
struct Tables {
    authors: Vec<Author>,
    genres: Vec<Genre>,
    books: Vec<Book>,
    instances: Vec<BookInstance>,
}

/// Keeps insertion order; write calls are counted so tests can assert that
/// nothing was persisted.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_author(&self, first_name: &str, family_name: &str) -> Author {
        let author = Author {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            family_name: family_name.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1920, 10, 8),
            date_of_death: None,
        };
        self.tables.lock().unwrap().authors.push(author.clone());
        author
    }

    pub fn add_genre(&self, name: &str) -> Genre {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.tables.lock().unwrap().genres.push(genre.clone());
        genre
    }

    pub fn add_book(&self, title: &str, author: &Author, genre: &[&Genre]) -> Book {
        let book = Book {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author: author.id,
            summary: format!("Summary of {}", title),
            isbn: "9780000000000".to_string(),
            genre: genre.iter().map(|g| g.id).collect(),
        };
        self.tables.lock().unwrap().books.push(book.clone());
        book
    }

    pub fn add_instance(&self, book: &Book, status: BookInstanceStatus) -> BookInstance {
        let instance = BookInstance {
            id: Uuid::new_v4(),
            book: book.id,
            imprint: "Test Imprint, 2001".to_string(),
            status,
            due_back: None,
        };
        self.tables.lock().unwrap().instances.push(instance.clone());
        instance
    }

    pub fn remove_instances_of(&self, book_id: Uuid) {
        self.tables.lock().unwrap().instances.retain(|i| i.book != book_id);
    }

    pub fn book(&self, id: Uuid) -> Option<Book> {
        self.tables.lock().unwrap().books.iter().find(|b| b.id == id).cloned()
    }

    /// Number of insert/update/delete calls received
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn record_write(&self) {
        *self.writes.lock().unwrap() += 1;
    }
}

fn resolve(tables: &Tables, book: &Book) -> Option<BookDetails> {
    let author = tables.authors.iter().find(|a| a.id == book.author)?.clone();
    let genre = book
        .genre
        .iter()
        .filter_map(|id| tables.genres.iter().find(|g| g.id == *id).cloned())
        .collect();
    Some(BookDetails {
        id: book.id,
        title: book.title.clone(),
        author,
        summary: book.summary.clone(),
        isbn: book.isbn.clone(),
        genre,
    })
}

fn to_book(id: Uuid, book: &NewBook) -> Book {
    Book {
        id,
        title: book.title.clone(),
        author: book.author,
        summary: book.summary.clone(),
        isbn: book.isbn.clone(),
        genre: book.genre.clone(),
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        Ok(self.tables.lock().unwrap().authors.clone())
    }

    async fn authors_get(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.tables.lock().unwrap().authors.iter().find(|a| a.id == id).cloned())
    }

    async fn authors_count(&self) -> AppResult<i64> {
        Ok(self.tables.lock().unwrap().authors.len() as i64)
    }

    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        Ok(self.tables.lock().unwrap().genres.clone())
    }

    async fn genres_get(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.tables.lock().unwrap().genres.iter().find(|g| g.id == id).cloned())
    }

    async fn genres_count(&self) -> AppResult<i64> {
        Ok(self.tables.lock().unwrap().genres.len() as i64)
    }

    async fn books_list(&self) -> AppResult<Vec<BookListEntry>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .books
            .iter()
            .filter_map(|b| resolve(&tables, b))
            .map(|d| BookListEntry {
                id: d.id,
                title: d.title,
                author: d.author,
            })
            .collect())
    }

    async fn books_get(&self, id: Uuid) -> AppResult<Option<BookDetails>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .books
            .iter()
            .find(|b| b.id == id)
            .and_then(|b| resolve(&tables, b)))
    }

    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.books.iter().filter(|b| b.author == author_id).cloned().collect())
    }

    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .books
            .iter()
            .filter(|b| b.genre.contains(&genre_id))
            .cloned()
            .collect())
    }

    async fn books_create(&self, book: &NewBook) -> AppResult<Book> {
        self.record_write();
        let created = to_book(Uuid::new_v4(), book);
        self.tables.lock().unwrap().books.push(created.clone());
        Ok(created)
    }

    async fn books_update(&self, id: Uuid, book: &NewBook) -> AppResult<Option<Book>> {
        self.record_write();
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.books.iter_mut().find(|b| b.id == id).map(|slot| {
            *slot = to_book(id, book);
            slot.clone()
        }))
    }

    async fn books_delete(&self, id: Uuid) -> AppResult<bool> {
        self.record_write();
        let mut tables = self.tables.lock().unwrap();
        let before = tables.books.len();
        tables.books.retain(|b| b.id != id);
        Ok(tables.books.len() < before)
    }

    async fn books_count(&self) -> AppResult<i64> {
        Ok(self.tables.lock().unwrap().books.len() as i64)
    }

    async fn instances_list(&self) -> AppResult<Vec<BookInstance>> {
        Ok(self.tables.lock().unwrap().instances.clone())
    }

    async fn instances_get(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Ok(self.tables.lock().unwrap().instances.iter().find(|i| i.id == id).cloned())
    }

    async fn instances_for_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.instances.iter().filter(|i| i.book == book_id).cloned().collect())
    }

    async fn instances_count(&self, status: Option<BookInstanceStatus>) -> AppResult<i64> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .instances
            .iter()
            .filter(|i| status.map_or(true, |s| i.status == s))
            .count() as i64)
    }
}
