//! Users module - user directory CRUD, role assignment, listing

pub mod handlers;

pub use handlers::*;
