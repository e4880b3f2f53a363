//! Books repository for database operations

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookEdit, NewBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, author, language, title, is_available FROM books WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        Ok(book)
    }

    /// All books in insertion order
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, author, language, title, is_available FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Case-insensitive substring search across title, author and language
    pub async fn search(&self, term: &str) -> AppResult<Vec<Book>> {
        let pattern = format!("%{}%", term.to_lowercase());
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, author, language, title, is_available
            FROM books
            WHERE LOWER(title) LIKE ?1
               OR LOWER(author) LIKE ?1
               OR LOWER(language) LIKE ?1
            ORDER BY id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Insert a new book, available by default
    pub async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (author, language, title, is_available)
            VALUES (?1, ?2, ?3, 1)
            RETURNING id, author, language, title, is_available
            "#,
        )
        .bind(&book.author)
        .bind(&book.language)
        .bind(&book.title)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Overwrite the three text fields of an existing book
    pub async fn update(&self, id: i64, edit: &BookEdit) -> AppResult<Book> {
        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET author = ?1, language = ?2, title = ?3
            WHERE id = ?4
            RETURNING id, author, language, title, is_available
            "#,
        )
        .bind(&edit.author)
        .bind(&edit.language)
        .bind(&edit.title)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        Ok(updated)
    }

    /// Delete a book
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }

    /// Flip the availability flag. Setting the value it already has is not
    /// an error, so repeated checkouts stay idempotent.
    pub async fn set_availability(&self, id: i64, available: bool) -> AppResult<Book> {
        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET is_available = ?1
            WHERE id = ?2
            RETURNING id, author, language, title, is_available
            "#,
        )
        .bind(available)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        Ok(updated)
    }
}
