//! Book model, list projection and form types

use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{author::Author, genre::Genre};
use crate::error::{AppError, AppResult};

/// Canonical detail path of a book
pub fn book_url(id: Uuid) -> String {
    format!("/catalog/book/{}", id)
}

/// Stored book with unresolved references
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    /// Genre references, in submission order
    pub genre: Vec<Uuid>,
}

impl Book {
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

/// Book with author and genres resolved
#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct BookDetails {
    pub id: Uuid,
    pub title: String,
    pub author: Author,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Genre>,
}

impl BookDetails {
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

impl Serialize for Book {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Book", 7)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("author", &self.author)?;
        s.serialize_field("summary", &self.summary)?;
        s.serialize_field("isbn", &self.isbn)?;
        s.serialize_field("genre", &self.genre)?;
        s.serialize_field("url", &self.url())?;
        s.end()
    }
}

impl Serialize for BookDetails {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("BookDetails", 7)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("author", &self.author)?;
        s.serialize_field("summary", &self.summary)?;
        s.serialize_field("isbn", &self.isbn)?;
        s.serialize_field("genre", &self.genre)?;
        s.serialize_field("url", &self.url())?;
        s.end()
    }
}

/// Book list row: title and resolved author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookListEntry {
    pub id: Uuid,
    pub title: String,
    pub author: Author,
}

/// Validated insert/update payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl TryFrom<&BookDraft> for NewBook {
    type Error = AppError;

    fn try_from(draft: &BookDraft) -> AppResult<Self> {
        let author = super::parse_ref(&draft.author)
            .ok_or_else(|| AppError::Validation(format!("Invalid author id: {}", draft.author)))?;
        let genre = draft
            .genre
            .iter()
            .map(|g| {
                super::parse_ref(g).ok_or_else(|| AppError::Validation(format!("Invalid genre id: {}", g)))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            title: draft.title.clone(),
            author,
            summary: draft.summary.clone(),
            isbn: draft.isbn.clone(),
            genre,
        })
    }
}

/// Genre form value: a single checkbox posts a scalar, several post a list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Book form fields as submitted, before any normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawBookForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub genre: Option<OneOrMany>,
}

impl RawBookForm {
    /// Build from url-encoded key/value pairs. Repeated `genre` keys form a
    /// list; for the other fields the first value wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = RawBookForm::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "title" => &mut form.title,
                "author" => &mut form.author,
                "summary" => &mut form.summary,
                "isbn" => &mut form.isbn,
                "genre" => {
                    form.genre = Some(match form.genre.take() {
                        None => OneOrMany::One(value),
                        Some(OneOrMany::One(first)) => OneOrMany::Many(vec![first, value]),
                        Some(OneOrMany::Many(mut all)) => {
                            all.push(value);
                            OneOrMany::Many(all)
                        }
                    });
                    continue;
                }
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        form
    }
}

/// Sanitized, not yet persisted book as redisplayed in the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate, ToSchema)]
pub struct BookDraft {
    /// Original id when the draft updates an existing book
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty."))]
    pub author: String,
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[validate(length(min = 1, message = "ISBN must not be empty."))]
    pub isbn: String,
    pub genre: Vec<String>,
}

impl From<&BookDetails> for BookDraft {
    fn from(book: &BookDetails) -> Self {
        Self {
            id: Some(book.id),
            title: book.title.clone(),
            author: book.author.id.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.iter().map(|g| g.id.to_string()).collect(),
        }
    }
}

/// One failed form rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
