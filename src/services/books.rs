//! Book workflow service: list, detail, create, update and delete

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::book_url, Author, BookDetails, BookDraft, BookInstance, BookListEntry, FieldError,
        Genre, GenreChoice, NewBook, RawBookForm,
    },
    repository::CatalogStore,
    validation::{check_references, validate_book_form, ValidatedBook},
};

/// Book with the copies referencing it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetailView {
    pub book: BookDetails,
    pub book_instances: Vec<BookInstance>,
}

/// Data behind the book form, empty or redisplayed
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookFormView {
    pub authors: Vec<Author>,
    pub genres: Vec<GenreChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<BookDraft>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// Data behind the delete confirmation page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDeleteView {
    pub book: BookDetails,
    pub bookinstance_list: Vec<BookInstance>,
}

/// Result of a create or update submission
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Persisted; continue at the book's page
    Saved { id: Uuid, url: String },
    /// Rejected; nothing persisted
    Invalid(BookFormView),
}

#[derive(Debug, Clone)]
pub enum DeleteFormOutcome {
    /// No such book; go back to the list
    Missing,
    Confirm(BookDeleteView),
}

#[derive(Debug, Clone)]
pub enum DeleteOutcome {
    Deleted,
    /// Copies still reference the book; it was left untouched
    Blocked(BookDeleteView),
}

#[derive(Clone)]
pub struct BookService {
    repository: Arc<dyn CatalogStore>,
}

impl BookService {
    pub fn new(repository: Arc<dyn CatalogStore>) -> Self {
        Self { repository }
    }

    /// All books with their author
    pub async fn list_books(&self) -> AppResult<Vec<BookListEntry>> {
        self.repository.books_list().await
    }

    /// Book with author, genres and copies
    pub async fn book_detail(&self, id: Uuid) -> AppResult<BookDetailView> {
        let (book, book_instances) = tokio::try_join!(
            self.repository.books_get(id),
            self.repository.instances_for_book(id),
        )?;

        let book = book.ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        Ok(BookDetailView { book, book_instances })
    }

    /// Authors and genres offered by an empty form
    pub async fn create_form(&self) -> AppResult<BookFormView> {
        let (authors, genres) = self.choices().await?;
        Ok(BookFormView {
            authors,
            genres: GenreChoice::mark(genres, &Vec::<String>::new()),
            book: None,
            errors: Vec::new(),
        })
    }

    /// Validate and insert a new book
    pub async fn create_submit(&self, raw: RawBookForm) -> AppResult<SubmitOutcome> {
        let draft = match self.check(validate_book_form(raw, None)).await? {
            Ok(draft) => draft,
            Err(form) => return Ok(SubmitOutcome::Invalid(form)),
        };

        let created = self.repository.books_create(&NewBook::try_from(&draft)?).await?;
        tracing::info!("Book created: id={} title={:?}", created.id, created.title);

        Ok(SubmitOutcome::Saved {
            id: created.id,
            url: created.url(),
        })
    }

    /// Book plus its copies for the delete confirmation
    pub async fn delete_form(&self, id: Uuid) -> AppResult<DeleteFormOutcome> {
        let (book, bookinstance_list) = tokio::try_join!(
            self.repository.books_get(id),
            self.repository.instances_for_book(id),
        )?;

        Ok(match book {
            None => DeleteFormOutcome::Missing,
            Some(book) => DeleteFormOutcome::Confirm(BookDeleteView {
                book,
                bookinstance_list,
            }),
        })
    }

    /// Delete a book unless copies still reference it
    pub async fn delete_submit(&self, id: Uuid) -> AppResult<DeleteOutcome> {
        let (book, bookinstance_list) = tokio::try_join!(
            self.repository.books_get(id),
            self.repository.instances_for_book(id),
        )?;

        let Some(book) = book else {
            tracing::debug!("Book delete: id={} already absent", id);
            return Ok(DeleteOutcome::Deleted);
        };

        if !bookinstance_list.is_empty() {
            tracing::debug!(
                "Book delete blocked: id={} has {} instance(s)",
                id,
                bookinstance_list.len()
            );
            return Ok(DeleteOutcome::Blocked(BookDeleteView {
                book,
                bookinstance_list,
            }));
        }

        self.repository.books_delete(id).await?;
        tracing::info!("Book deleted: id={}", id);
        Ok(DeleteOutcome::Deleted)
    }

    /// Form pre-filled with an existing book
    pub async fn update_form(&self, id: Uuid) -> AppResult<BookFormView> {
        let (book, authors, genres) = tokio::try_join!(
            self.repository.books_get(id),
            self.repository.authors_list(),
            self.repository.genres_list(),
        )?;

        let book = book.ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        let draft = BookDraft::from(&book);

        Ok(BookFormView {
            authors,
            genres: GenreChoice::mark(genres, &draft.genre),
            book: Some(draft),
            errors: Vec::new(),
        })
    }

    /// Validate and update a book in place. The id is never reassigned.
    pub async fn update_submit(&self, id: Uuid, raw: RawBookForm) -> AppResult<SubmitOutcome> {
        let draft = match self.check(validate_book_form(raw, Some(id))).await? {
            Ok(draft) => draft,
            Err(form) => return Ok(SubmitOutcome::Invalid(form)),
        };

        let updated = self
            .repository
            .books_update(id, &NewBook::try_from(&draft)?)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        tracing::info!("Book updated: id={} title={:?}", updated.id, updated.title);

        Ok(SubmitOutcome::Saved {
            id,
            url: book_url(id),
        })
    }

    async fn choices(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        tokio::try_join!(self.repository.authors_list(), self.repository.genres_list())
    }

    /// Apply the reference check to a validated submission.
    ///
    /// Returns the draft when it can be persisted, or the form to redisplay
    /// with the submitted genres checked.
    async fn check(&self, validated: ValidatedBook) -> AppResult<Result<BookDraft, BookFormView>> {
        let ValidatedBook { draft, mut errors } = validated;
        let (authors, genres) = self.choices().await?;
        errors.extend(check_references(&draft, &authors, &genres));

        if errors.is_empty() {
            return Ok(Ok(draft));
        }

        tracing::debug!("Book form rejected with {} error(s)", errors.len());
        Ok(Err(BookFormView {
            authors,
            genres: GenreChoice::mark(genres, &draft.genre),
            book: Some(draft),
            errors,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{book::OneOrMany, BookInstanceStatus};
    use crate::repository::{memory::MemoryStore, MockCatalogStore};

    struct Fixture {
        store: Arc<MemoryStore>,
        service: BookService,
        author: Author,
        genres: Vec<Genre>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let author = store.add_author("Frank", "Herbert");
        let genres = ["Fantasy", "Science Fiction", "Poetry", "History", "Horror"]
            .iter()
            .map(|name| store.add_genre(name))
            .collect();
        let service = BookService::new(store.clone());
        Fixture {
            store,
            service,
            author,
            genres,
        }
    }

    fn form(author: &Author, genre: Option<OneOrMany>) -> RawBookForm {
        RawBookForm {
            title: Some("Dune".into()),
            author: Some(author.id.to_string()),
            summary: Some("desert planet".into()),
            isbn: Some("123".into()),
            genre,
        }
    }

    fn saved_id(outcome: SubmitOutcome) -> Uuid {
        match outcome {
            SubmitOutcome::Saved { id, .. } => id,
            SubmitOutcome::Invalid(form) => panic!("unexpected errors: {:?}", form.errors),
        }
    }

    fn invalid(outcome: SubmitOutcome) -> BookFormView {
        match outcome {
            SubmitOutcome::Invalid(form) => form,
            SubmitOutcome::Saved { .. } => panic!("submission unexpectedly saved"),
        }
    }

    fn db_error() -> AppError {
        AppError::Database(sqlx::Error::PoolTimedOut)
    }

    #[tokio::test]
    async fn test_create_then_detail() {
        let f = fixture();
        let sf = f.genres[1].clone();

        let outcome = f
            .service
            .create_submit(form(&f.author, Some(OneOrMany::One(sf.id.to_string()))))
            .await
            .unwrap();
        let (id, url) = match outcome {
            SubmitOutcome::Saved { id, url } => (id, url),
            SubmitOutcome::Invalid(form) => panic!("unexpected errors: {:?}", form.errors),
        };
        assert_eq!(url, format!("/catalog/book/{}", id));

        let detail = f.service.book_detail(id).await.unwrap();
        assert_eq!(detail.book.title, "Dune");
        assert_eq!(detail.book.author.id, f.author.id);
        assert_eq!(detail.book.genre, vec![sf]);
        assert!(detail.book_instances.is_empty());
    }

    #[tokio::test]
    async fn test_genre_shapes_are_stored_as_lists() {
        let f = fixture();

        let id = saved_id(f.service.create_submit(form(&f.author, None)).await.unwrap());
        assert!(f.store.book(id).unwrap().genre.is_empty());

        let one = f.genres[0].id;
        let id = saved_id(
            f.service
                .create_submit(form(&f.author, Some(OneOrMany::One(one.to_string()))))
                .await
                .unwrap(),
        );
        assert_eq!(f.store.book(id).unwrap().genre, vec![one]);

        let many = vec![f.genres[3].id, f.genres[0].id, f.genres[2].id];
        let id = saved_id(
            f.service
                .create_submit(form(
                    &f.author,
                    Some(OneOrMany::Many(many.iter().map(|g| g.to_string()).collect())),
                ))
                .await
                .unwrap(),
        );
        assert_eq!(f.store.book(id).unwrap().genre, many);
    }

    #[tokio::test]
    async fn test_missing_fields_are_not_persisted() {
        let f = fixture();
        let cases = [
            ("title", "Title must not be empty."),
            ("author", "Author must not be empty."),
            ("summary", "Summary must not be empty."),
            ("isbn", "ISBN must not be empty."),
        ];

        for (field, message) in cases {
            let mut raw = form(&f.author, None);
            match field {
                "title" => raw.title = None,
                "author" => raw.author = Some("   ".into()),
                "summary" => raw.summary = Some(String::new()),
                _ => raw.isbn = None,
            }

            let view = invalid(f.service.create_submit(raw).await.unwrap());
            assert_eq!(view.errors, vec![FieldError::new(field, message)]);
        }
        assert_eq!(f.store.writes(), 0);
        assert!(f.service.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rerender_marks_selected_genres_by_membership() {
        let f = fixture();
        // K=2 of N=5, submitted in reverse catalog order
        let selected = vec![f.genres[4].id.to_string(), f.genres[1].id.to_string()];
        let mut raw = form(&f.author, Some(OneOrMany::Many(selected.clone())));
        raw.title = None;

        let view = invalid(f.service.create_submit(raw).await.unwrap());
        assert_eq!(view.genres.len(), 5);
        for choice in &view.genres {
            let expected = selected.contains(&choice.genre.id.to_string());
            assert_eq!(choice.checked, expected, "genre {}", choice.genre.name);
        }
        let draft = view.book.unwrap();
        assert_eq!(draft.genre, selected);
        assert_eq!(draft.summary, "desert planet");
    }

    #[tokio::test]
    async fn test_unknown_references_are_rejected() {
        let f = fixture();
        let mut raw = form(&f.author, Some(OneOrMany::One(Uuid::new_v4().to_string())));
        raw.author = Some(Uuid::new_v4().to_string());

        let view = invalid(f.service.create_submit(raw).await.unwrap());
        let fields: Vec<&str> = view.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["author", "genre"]);
        assert_eq!(f.store.writes(), 0);
    }

    #[tokio::test]
    async fn test_detail_of_missing_book_is_not_found() {
        let f = fixture();
        let err = f.service.book_detail(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_detail_surfaces_instance_fetch_failure() {
        let mut store = MockCatalogStore::new();
        store.expect_books_get().returning(|_| Ok(None));
        store.expect_instances_for_book().returning(|_| Err(db_error()));
        let service = BookService::new(Arc::new(store));

        let err = service.book_detail(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let f = fixture();
        let book = f.store.add_book("Dune", &f.author, &[&f.genres[0]]);

        let mut raw = form(&f.author, Some(OneOrMany::One(f.genres[2].id.to_string())));
        raw.title = Some("Dune Messiah".into());
        let id = saved_id(f.service.update_submit(book.id, raw).await.unwrap());
        assert_eq!(id, book.id);

        let stored = f.store.book(book.id).unwrap();
        assert_eq!(stored.title, "Dune Messiah");
        assert_eq!(stored.genre, vec![f.genres[2].id]);
        assert_eq!(f.service.list_books().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_update_keeps_original_id_in_draft() {
        let f = fixture();
        let book = f.store.add_book("Dune", &f.author, &[]);
        let mut raw = form(&f.author, None);
        raw.isbn = None;

        let view = invalid(f.service.update_submit(book.id, raw).await.unwrap());
        assert_eq!(view.book.unwrap().id, Some(book.id));
        assert_eq!(f.store.book(book.id).unwrap().title, "Dune");
        assert_eq!(f.store.writes(), 0);
    }

    #[tokio::test]
    async fn test_update_of_vanished_book_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .update_submit(Uuid::new_v4(), form(&f.author, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_form_checks_book_genres() {
        let f = fixture();
        let book = f.store.add_book("Dune", &f.author, &[&f.genres[3], &f.genres[1]]);

        let view = f.service.update_form(book.id).await.unwrap();
        let checked: Vec<bool> = view.genres.iter().map(|c| c.checked).collect();
        assert_eq!(checked, vec![false, true, false, true, false]);
        assert_eq!(view.book.unwrap().id, Some(book.id));
        assert_eq!(view.authors, vec![f.author.clone()]);

        let err = f.service.update_form(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_uppercase_references_are_accepted() {
        let f = fixture();
        let genre = f.genres[2].clone();
        let mut raw = form(&f.author, Some(OneOrMany::One(genre.id.to_string().to_uppercase())));
        raw.author = Some(f.author.id.to_string().to_uppercase());

        let id = saved_id(f.service.create_submit(raw).await.unwrap());
        let stored = f.store.book(id).unwrap();
        assert_eq!(stored.author, f.author.id);
        assert_eq!(stored.genre, vec![genre.id]);
    }

    #[tokio::test]
    async fn test_rerender_checks_uppercase_genre() {
        let f = fixture();
        let mut raw = form(&f.author, Some(OneOrMany::One(f.genres[1].id.to_string().to_uppercase())));
        raw.title = None;

        let view = invalid(f.service.create_submit(raw).await.unwrap());
        let checked: Vec<bool> = view.genres.iter().map(|c| c.checked).collect();
        assert_eq!(checked, vec![false, true, false, false, false]);
    }

    #[tokio::test]
    async fn test_delete_of_absent_book_writes_nothing() {
        let f = fixture();
        let outcome = f.service.delete_submit(Uuid::new_v4()).await.unwrap();
        assert!(matches!(outcome, DeleteOutcome::Deleted));
        assert_eq!(f.store.writes(), 0);
    }

    #[tokio::test]
    async fn test_delete_without_instances() {
        let f = fixture();
        let book = f.store.add_book("Dune", &f.author, &[]);

        let outcome = f.service.delete_submit(book.id).await.unwrap();
        assert!(matches!(outcome, DeleteOutcome::Deleted));
        let titles: Vec<String> = f
            .service
            .list_books()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert!(titles.is_empty());
    }

    #[tokio::test]
    async fn test_delete_blocked_by_instances() {
        let f = fixture();
        let book = f.store.add_book("Dune", &f.author, &[]);
        let copy = f.store.add_instance(&book, BookInstanceStatus::Available);

        match f.service.delete_submit(book.id).await.unwrap() {
            DeleteOutcome::Blocked(view) => {
                assert_eq!(view.book.id, book.id);
                assert_eq!(view.bookinstance_list, vec![copy]);
            }
            DeleteOutcome::Deleted => panic!("delete should have been blocked"),
        }
        assert_eq!(f.store.book(book.id), Some(book.clone()));
        assert_eq!(f.store.writes(), 0);

        // Retry once the copies are gone
        f.store.remove_instances_of(book.id);
        let outcome = f.service.delete_submit(book.id).await.unwrap();
        assert!(matches!(outcome, DeleteOutcome::Deleted));
        assert!(f.store.book(book.id).is_none());
    }

    #[tokio::test]
    async fn test_delete_form() {
        let f = fixture();
        let outcome = f.service.delete_form(Uuid::new_v4()).await.unwrap();
        assert!(matches!(outcome, DeleteFormOutcome::Missing));

        let book = f.store.add_book("Dune", &f.author, &[]);
        f.store.add_instance(&book, BookInstanceStatus::Loaned);
        match f.service.delete_form(book.id).await.unwrap() {
            DeleteFormOutcome::Confirm(view) => assert_eq!(view.bookinstance_list.len(), 1),
            DeleteFormOutcome::Missing => panic!("book should be found"),
        }
    }

    #[tokio::test]
    async fn test_create_form_lists_choices_unchecked() {
        let f = fixture();
        let view = f.service.create_form().await.unwrap();
        assert_eq!(view.authors.len(), 1);
        assert_eq!(view.genres.len(), 5);
        assert!(view.genres.iter().all(|c| !c.checked));
        assert!(view.book.is_none());
    }

    #[tokio::test]
    async fn test_choice_fetch_failure_propagates() {
        let mut store = MockCatalogStore::new();
        store.expect_authors_list().returning(|| Ok(Vec::new()));
        store.expect_genres_list().returning(|| Err(db_error()));
        store.expect_books_create().never();
        let service = BookService::new(Arc::new(store));

        let err = service
            .create_submit(RawBookForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
