//! Database entities module

pub mod role;
pub mod role_user;
pub mod user;

pub use role::Entity as RoleEntity;
pub use role_user::Entity as RoleUser;
pub use user::Entity as UserEntity;
