//! Book (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub author: String,
    pub language: String,
    pub title: String,
    /// False while the book is checked out
    pub is_available: bool,
}

/// Form payload for registering a new book.
/// Presence of the three fields is all the validation there is; empty
/// strings are stored as-is.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewBook {
    pub author: String,
    pub language: String,
    pub title: String,
}

/// Form payload for editing a book (full overwrite of the text fields)
#[derive(Debug, Deserialize, ToSchema)]
pub struct BookEdit {
    pub author: String,
    pub language: String,
    pub title: String,
}

/// Query string for the catalog search endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}
