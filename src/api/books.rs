//! Catalog endpoints: book CRUD, search and availability

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{Book, BookEdit, NewBook, SearchQuery},
    models::session::Flash,
    AppState,
};

use super::CurrentUser;

/// View model for the books list
#[derive(Serialize, ToSchema)]
pub struct BooksView {
    pub flash: Option<Flash>,
    pub books: Vec<Book>,
}

/// View model for the search results page
#[derive(Serialize, ToSchema)]
pub struct SearchView {
    pub flash: Option<Flash>,
    pub results: Vec<Book>,
}

/// View model for the add-book form
#[derive(Serialize, ToSchema)]
pub struct AddBookView {
    pub flash: Option<Flash>,
}

/// View model for the edit form, pre-filled with current values
#[derive(Serialize, ToSchema)]
pub struct EditBookView {
    pub flash: Option<Flash>,
    pub book: Book,
}

/// Root redirect to the books list
#[utoipa::path(
    get,
    path = "/",
    tag = "catalog",
    responses(
        (status = 303, description = "Redirect to /books")
    )
)]
pub async fn root() -> Redirect {
    Redirect::to("/books")
}

/// Show the add-book form
#[utoipa::path(
    get,
    path = "/add",
    tag = "catalog",
    responses(
        (status = 200, description = "Add-book form view", body = AddBookView),
        (status = 303, description = "Redirect to /login without a session")
    )
)]
pub async fn add_book_form(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<AddBookView>> {
    let flash = state.services.auth.take_flash(&current.token).await?;
    Ok(Json(AddBookView { flash }))
}

/// Register a new book and go back to the list
#[utoipa::path(
    post,
    path = "/add",
    tag = "catalog",
    request_body = NewBook,
    responses(
        (status = 303, description = "Redirect to /books")
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    _current: CurrentUser,
    Form(form): Form<NewBook>,
) -> AppResult<Redirect> {
    let book = state.services.catalog.add_book(form).await?;
    tracing::info!("Added book {} ({})", book.id, book.title);
    Ok(Redirect::to("/books"))
}

/// List the whole catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "catalog",
    responses(
        (status = 200, description = "Books list view", body = BooksView),
        (status = 303, description = "Redirect to /login without a session")
    )
)]
pub async fn view_books(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<BooksView>> {
    let books = state.services.catalog.list_books().await?;
    let flash = state.services.auth.take_flash(&current.token).await?;
    Ok(Json(BooksView { flash, books }))
}

/// Search the catalog. An empty query yields an empty result list.
#[utoipa::path(
    get,
    path = "/search",
    tag = "catalog",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search results view", body = SearchView),
        (status = 303, description = "Redirect to /login without a session")
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchView>> {
    let results = state.services.catalog.search_books(&query.query).await?;
    let flash = state.services.auth.take_flash(&current.token).await?;
    Ok(Json(SearchView { flash, results }))
}

/// Show the edit form for a book
#[utoipa::path(
    get,
    path = "/edit/{id}",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Edit form view", body = EditBookView),
        (status = 404, description = "Book not found")
    )
)]
pub async fn edit_book_form(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<EditBookView>> {
    let book = state.services.catalog.get_book(id).await?;
    let flash = state.services.auth.take_flash(&current.token).await?;
    Ok(Json(EditBookView { flash, book }))
}

/// Overwrite a book's author, language and title
#[utoipa::path(
    post,
    path = "/edit/{id}",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = BookEdit,
    responses(
        (status = 303, description = "Redirect to /books"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn edit_book(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<BookEdit>,
) -> AppResult<Redirect> {
    state.services.catalog.update_book(id, form).await?;
    Ok(Redirect::to("/books"))
}

/// Delete a book
#[utoipa::path(
    get,
    path = "/delete/{id}",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Redirect to /books"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    state.services.catalog.delete_book(id).await?;
    tracing::info!("Deleted book {}", id);
    Ok(Redirect::to("/books"))
}

/// Check a book out (mark unavailable)
#[utoipa::path(
    get,
    path = "/checkout/{id}",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Redirect to /books"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn check_out_book(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    state.services.catalog.set_availability(id, false).await?;
    Ok(Redirect::to("/books"))
}

/// Check a book back in (mark available)
#[utoipa::path(
    get,
    path = "/checkin/{id}",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Redirect to /books"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn check_in_book(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    state.services.catalog.set_availability(id, true).await?;
    Ok(Redirect::to("/books"))
}
