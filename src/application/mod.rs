//! Application layer - use cases
//!
//! The `UserService` orchestrates validation, query composition and store
//! mutations and reports every business outcome as a [`ServiceResult`].

pub mod result;
pub mod users;

pub use result::{messages, ResultType, ServiceResult};
pub use users::{EmailValidator, UserService};
