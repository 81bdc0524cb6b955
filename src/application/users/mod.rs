//! User management use cases

pub mod email;
pub mod service;
pub mod views;

pub use email::{is_valid_email, EmailValidator};
pub use service::UserService;
pub use views::{
    CountUsersQuery, CountsResponse, FilterOptions, ListUsersQuery, PaginationCountOptions,
    PaginationOptions, RoleView, SetRolesInput, SortOptions, UserInput, UserResponse,
};
