//! Book form validation.
//!
//! A submission goes through three pure steps over a single [`BookDraft`]:
//! genre normalization, trimming and HTML escaping, then the field rules
//! declared on the draft. The draft keeps the sanitized values even when
//! rules fail so the form can be redisplayed as typed.

use uuid::Uuid;
use validator::Validate;

use crate::models::{
    book::OneOrMany, parse_ref, Author, BookDraft, FieldError, Genre, RawBookForm,
};

/// Order in which field messages are reported
const FIELD_ORDER: [&str; 4] = ["title", "author", "summary", "isbn"];

/// Outcome of the validation pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBook {
    pub draft: BookDraft,
    pub errors: Vec<FieldError>,
}

impl ValidatedBook {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Absent → empty, scalar → singleton, list → unchanged
pub fn normalize_genre(genre: Option<OneOrMany>) -> Vec<String> {
    match genre {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    }
}

/// Escape markup-significant characters (`& < > " ' /`)
pub fn escape(value: &str) -> String {
    html_escape::encode_safe(value).into_owned()
}

fn sanitize(value: Option<String>) -> String {
    escape(value.as_deref().unwrap_or_default().trim())
}

/// Run the form pipeline. `id` is the original id when updating.
pub fn validate_book_form(raw: RawBookForm, id: Option<Uuid>) -> ValidatedBook {
    let genre = normalize_genre(raw.genre);

    let draft = BookDraft {
        id,
        title: sanitize(raw.title),
        author: sanitize(raw.author),
        summary: sanitize(raw.summary),
        isbn: sanitize(raw.isbn),
        genre: genre.iter().map(|g| escape(g)).collect(),
    };

    let errors = match draft.validate() {
        Ok(()) => Vec::new(),
        Err(e) => {
            let by_field = e.field_errors();
            FIELD_ORDER
                .iter()
                .filter_map(|field| by_field.get(*field).map(|errs| (*field, errs)))
                .flat_map(|(field, errs)| {
                    errs.iter().map(move |err| {
                        let message = err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid.", field));
                        FieldError::new(field, message)
                    })
                })
                .collect()
        }
    };

    ValidatedBook { draft, errors }
}

/// Check that the draft's author and genres name existing entities.
///
/// References are compared as ids, so any accepted spelling of an existing
/// id matches. A value that does not parse is an unknown reference.
///
/// An empty author is already reported by [`validate_book_form`] and is not
/// reported again here.
pub fn check_references(draft: &BookDraft, authors: &[Author], genres: &[Genre]) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let author_known = parse_ref(&draft.author).is_some_and(|id| authors.iter().any(|a| a.id == id));
    if !draft.author.is_empty() && !author_known {
        errors.push(FieldError::new("author", "Author must reference an existing author."));
    }

    let unknown_genre = draft.genre.iter().any(|g| {
        !parse_ref(g).is_some_and(|id| genres.iter().any(|known| known.id == id))
    });
    if unknown_genre {
        errors.push(FieldError::new("genre", "Genre must reference an existing genre."));
    }

    errors
}
