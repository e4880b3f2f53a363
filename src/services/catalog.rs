//! Catalog management service

use crate::{
    error::AppResult,
    models::book::{Book, BookEdit, NewBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new book, available by default
    pub async fn add_book(&self, book: NewBook) -> AppResult<Book> {
        self.repository.books.create(&book).await
    }

    /// All books in insertion order
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Substring search across title, author and language. An empty query
    /// returns no results rather than the whole catalog.
    pub async fn search_books(&self, query: &str) -> AppResult<Vec<Book>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.repository.books.search(query).await
    }

    /// Fetch a single book for the edit view
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Overwrite author, language and title of an existing book
    pub async fn update_book(&self, id: i64, edit: BookEdit) -> AppResult<Book> {
        self.repository.books.update(id, &edit).await
    }

    /// Remove a book from the catalog
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    /// Mark a book checked out (unavailable) or checked in (available)
    pub async fn set_availability(&self, id: i64, available: bool) -> AppResult<Book> {
        self.repository.books.set_availability(id, available).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::repository::test_repository;

    fn new_book(author: &str, language: &str, title: &str) -> NewBook {
        NewBook {
            author: author.to_string(),
            language: language.to_string(),
            title: title.to_string(),
        }
    }

    async fn service() -> CatalogService {
        CatalogService::new(test_repository().await)
    }

    #[tokio::test]
    async fn added_books_are_listed_in_order_and_available() {
        let catalog = service().await;
        let first = catalog
            .add_book(new_book("Tolkien", "English", "The Hobbit"))
            .await
            .unwrap();
        let second = catalog
            .add_book(new_book("Camus", "French", "La Peste"))
            .await
            .unwrap();

        let books = catalog.list_books().await.unwrap();
        assert_eq!(
            books.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
        assert!(books.iter().all(|b| b.is_available));
    }

    #[tokio::test]
    async fn empty_strings_are_accepted() {
        let catalog = service().await;
        let book = catalog.add_book(new_book("", "", "")).await.unwrap();
        assert_eq!(book.title, "");
        assert!(book.is_available);
    }

    #[tokio::test]
    async fn empty_query_returns_nothing() {
        let catalog = service().await;
        catalog
            .add_book(new_book("Tolkien", "English", "The Hobbit"))
            .await
            .unwrap();

        assert!(catalog.search_books("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_across_fields() {
        let catalog = service().await;
        let hobbit = catalog
            .add_book(new_book("Tolkien", "English", "The Hobbit"))
            .await
            .unwrap();
        catalog
            .add_book(new_book("Camus", "French", "La Peste"))
            .await
            .unwrap();

        for query in ["hob", "TOLKIEN", "engli"] {
            let results = catalog.search_books(query).await.unwrap();
            assert_eq!(
                results.iter().map(|b| b.id).collect::<Vec<_>>(),
                vec![hobbit.id],
                "query {:?}",
                query
            );
        }
    }

    #[tokio::test]
    async fn update_overwrites_text_fields() {
        let catalog = service().await;
        let book = catalog
            .add_book(new_book("Tolkein", "english", "The Hobit"))
            .await
            .unwrap();

        let updated = catalog
            .update_book(
                book.id,
                BookEdit {
                    author: "Tolkien".to_string(),
                    language: "English".to_string(),
                    title: "The Hobbit".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "The Hobbit");
        assert_eq!(updated.author, "Tolkien");
        assert!(updated.is_available);
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found_and_creates_nothing() {
        let catalog = service().await;
        let err = catalog
            .update_book(
                9999,
                BookEdit {
                    author: "A".to_string(),
                    language: "En".to_string(),
                    title: "T".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(catalog.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_found() {
        let catalog = service().await;
        let err = catalog.delete_book(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn availability_toggle_is_idempotent() {
        let catalog = service().await;
        let book = catalog
            .add_book(new_book("Tolkien", "English", "The Hobbit"))
            .await
            .unwrap();

        let checked_out = catalog.set_availability(book.id, false).await.unwrap();
        assert!(!checked_out.is_available);

        // Checking out an already-unavailable book changes nothing.
        let again = catalog.set_availability(book.id, false).await.unwrap();
        assert!(!again.is_available);

        let returned = catalog.set_availability(book.id, true).await.unwrap();
        assert!(returned.is_available);
    }
}
