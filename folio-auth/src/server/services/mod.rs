pub mod project_store;
pub mod token_issuer;
pub mod user_store;

pub use project_store::ProjectStore;
pub use token_issuer::TokenIssuer;
pub use user_store::{User, UserStore};
