mod auth;
mod token;

pub use auth::TokenManager;
pub use token::{StoredToken, TokenStore};
