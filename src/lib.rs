//! # User Directory
//!
//! HTTP service for managing users and their role assignments.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: users, roles, query descriptors and the repository trait
//! - **application**: user service, email validation, request/response views
//! - **infrastructure**: SeaORM entities, migrations, repositories, seeding
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: pagination arithmetic and shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError, LogFormat};

// Re-export database types for easy access
pub use infrastructure::{init_database, seed_demo_users, DatabaseConfig, UserRepository};

// Re-export API router
pub use interfaces::http::create_api_router;
