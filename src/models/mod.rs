//! Data models for Shelfdesk

pub mod book;
pub mod session;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookEdit, NewBook};
pub use session::{Flash, FlashKind, Session};
pub use user::User;
