pub mod role_repository;
pub mod seed_store;
pub mod user_repository;
