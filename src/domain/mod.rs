//! Domain layer
//!
//! Core entities, query descriptors and the repository port. Nothing here
//! knows about HTTP or about a concrete store.

pub mod error;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use user::{
    NewUser, Role, SortBy, User, UserFilter, UserProfile, UserRepositoryInterface, UserSort,
};
