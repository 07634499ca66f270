//! Database repository layer

pub mod credential_repo;
pub mod game_repo;
pub mod review_repo;
pub mod user_repo;

pub use credential_repo::{CredentialRepository, CredentialStore};
pub use game_repo::GameRepository;
pub use review_repo::ReviewRepository;
pub use user_repo::UserRepository;
