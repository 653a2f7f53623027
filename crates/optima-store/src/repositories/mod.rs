//! Stateless repositories over `&Connection`.

pub mod document;
pub mod reset_token;
pub mod user;

pub use document::DocumentRepo;
pub use reset_token::ResetTokenRepo;
pub use user::UserRepo;
