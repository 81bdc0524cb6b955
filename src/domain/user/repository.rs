use async_trait::async_trait;

use super::{NewUser, Role, User, UserFilter, UserProfile, UserSort};
use crate::domain::DomainResult;

/// Store access for users and their role assignments.
///
/// Every returned [`User`] carries its full role set.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;

    /// Filtered, ordered slice of users.
    async fn find_page(
        &self,
        filter: &UserFilter,
        sort: &UserSort,
        offset: u64,
        limit: u64,
    ) -> DomainResult<Vec<User>>;

    async fn count(&self, filter: &UserFilter) -> DomainResult<u64>;

    /// Exact, case-sensitive email lookup.
    async fn email_exists(&self, email: &str) -> DomainResult<bool>;

    async fn create(&self, user: NewUser) -> DomainResult<User>;

    /// Writes name, age and email only; role assignments are left as stored.
    ///
    /// Fails with `NotFound` when the user does not exist.
    async fn update_profile(&self, id: i32, profile: UserProfile) -> DomainResult<User>;

    /// Replaces the whole role set without touching the scalar fields.
    ///
    /// Fails with `NotFound` when the user does not exist.
    async fn replace_roles(&self, id: i32, roles: &[Role]) -> DomainResult<User>;

    /// Returns `false` when no such user exists.
    async fn delete(&self, id: i32) -> DomainResult<bool>;
}
