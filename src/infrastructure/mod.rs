//! Infrastructure layer - external concerns

pub mod database;
pub mod storage;

pub use database::{init_database, seed_demo_users, DatabaseConfig, UserRepository};
pub use storage::InMemoryUserRepository;
