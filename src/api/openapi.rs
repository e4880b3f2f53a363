//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shelfdesk API",
        version = "0.3.0",
        description = "Small library management server",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Accounts
        auth::register_form,
        auth::register,
        auth::login_form,
        auth::login,
        auth::logout,
        // Catalog
        books::root,
        books::add_book_form,
        books::add_book,
        books::view_books,
        books::search_books,
        books::edit_book_form,
        books::edit_book,
        books::delete_book,
        books::check_out_book,
        books::check_in_book,
    ),
    components(
        schemas(
            // Accounts
            auth::AuthView,
            crate::models::user::User,
            crate::models::user::RegisterForm,
            crate::models::user::LoginForm,
            // Catalog
            books::BooksView,
            books::SearchView,
            books::AddBookView,
            books::EditBookView,
            crate::models::book::Book,
            crate::models::book::NewBook,
            crate::models::book::BookEdit,
            // Flash
            crate::models::session::Flash,
            crate::models::session::FlashKind,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Registration and login"),
        (name = "catalog", description = "Book catalog management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
