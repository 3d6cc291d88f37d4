pub mod entity;
pub use entity::*;

mod user_repository;
pub use user_repository::UserRepository;
