//! User aggregate
//!
//! Contains the User entity, the role enumeration, query descriptors and
//! the repository interface.

pub mod model;
pub mod query;
pub mod repository;

pub use model::{NewUser, Role, User, UserProfile};
pub use query::{SortBy, UserFilter, UserSort};
pub use repository::UserRepositoryInterface;
