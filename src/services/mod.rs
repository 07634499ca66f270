//! Business logic services layer

pub mod auth_service;
pub mod game_service;
pub mod review_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use game_service::GameService;
pub use review_service::ReviewService;
pub use user_service::UserService;
