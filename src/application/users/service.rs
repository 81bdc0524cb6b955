//! User management service - application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers are thin wrappers that check request shape, delegate to this
//! service and map the [`ResultType`](crate::application::ResultType) to a
//! status code.

use std::sync::Arc;

use tracing::{debug, info};

use super::email::EmailValidator;
use super::views::{
    CountUsersQuery, CountsResponse, ListUsersQuery, SetRolesInput, UserInput, UserResponse,
};
use crate::application::result::{messages, ServiceResult};
use crate::domain::{
    DomainError, DomainResult, NewUser, Role, UserFilter, UserRepositoryInterface, UserSort,
};
use crate::shared::{pages_count, PageWindow};

/// User service - orchestrates all user-management use-cases.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer. Holds no per-request state.
///
/// Business outcomes come back as a [`ServiceResult`]; the outer
/// [`DomainResult`] only fails when the store itself does.
pub struct UserService<R: UserRepositoryInterface> {
    repo: Arc<R>,
    emails: EmailValidator<R>,
}

impl<R: UserRepositoryInterface> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        let emails = EmailValidator::new(Arc::clone(&repo));
        Self { repo, emails }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Filter, sort, clamp the page and slice.
    pub async fn list(
        &self,
        query: ListUsersQuery,
    ) -> DomainResult<ServiceResult<Vec<UserResponse>>> {
        let filter: UserFilter = query.filters.map(Into::into).unwrap_or_default();
        let sort: UserSort = query.sort.map(Into::into).unwrap_or_default();

        let total = self.repo.count(&filter).await?;
        let window = PageWindow::clamp(total, query.pagination.page_size, query.pagination.page);
        debug!(
            total,
            requested_page = query.pagination.page,
            page = window.page,
            last_page = window.last_page,
            "Resolved user page"
        );

        let users = self
            .repo
            .find_page(&filter, &sort, window.offset, window.limit)
            .await?;

        Ok(ServiceResult::success(
            users.into_iter().map(UserResponse::from).collect(),
        ))
    }

    pub async fn count(&self, query: CountUsersQuery) -> DomainResult<ServiceResult<CountsResponse>> {
        let filter: UserFilter = query.filters.map(Into::into).unwrap_or_default();

        let users_count = self.repo.count(&filter).await?;

        Ok(ServiceResult::success(CountsResponse {
            users_count,
            pages_count: pages_count(users_count, query.pagination.page_size),
        }))
    }

    pub async fn get_by_id(&self, user_id: i32) -> DomainResult<ServiceResult<UserResponse>> {
        Ok(match self.repo.find_by_id(user_id).await? {
            Some(user) => ServiceResult::success(user.into()),
            None => ServiceResult::not_found(messages::USER_NOT_FOUND),
        })
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Replaces the user's roles. Reports `Created` on success.
    pub async fn set_roles(
        &self,
        user_id: i32,
        input: SetRolesInput,
    ) -> DomainResult<ServiceResult<UserResponse>> {
        let roles = Role::from_ids(&input.roles);

        let saved = match self.repo.replace_roles(user_id, &roles).await {
            Ok(saved) => saved,
            Err(DomainError::NotFound { .. }) => {
                return Ok(ServiceResult::not_found(messages::USER_NOT_FOUND))
            }
            Err(e) => return Err(e),
        };

        info!(user_id, roles = ?saved.roles, "User roles replaced");
        Ok(ServiceResult::created(saved.into()))
    }

    /// Creates a user with the default `User` role.
    ///
    /// The email format is checked by the caller.
    pub async fn create(&self, input: UserInput) -> DomainResult<ServiceResult<UserResponse>> {
        if !self.emails.is_email_unique(&input.email).await? {
            return Ok(ServiceResult::conflict(messages::EMAIL_EXISTS));
        }

        let new_user = NewUser {
            name: input.name,
            age: input.age,
            email: input.email,
            roles: vec![Role::default()],
        };

        let user = match self.repo.create(new_user).await {
            Ok(user) => user,
            Err(DomainError::Conflict(_)) => {
                return Ok(ServiceResult::conflict(messages::EMAIL_EXISTS))
            }
            Err(e) => return Err(e),
        };

        info!(user_id = user.id, email = %user.email, "User created");
        Ok(ServiceResult::created(user.into()))
    }

    /// Updates name, age and email; roles are not written. Uniqueness is only
    /// checked when the email actually changes. Reports `Created` on success.
    pub async fn update(
        &self,
        user_id: i32,
        input: UserInput,
    ) -> DomainResult<ServiceResult<UserResponse>> {
        let Some(user) = self.repo.find_by_id(user_id).await? else {
            return Ok(ServiceResult::not_found(messages::USER_NOT_FOUND));
        };

        if user.email != input.email && !self.emails.is_email_unique(&input.email).await? {
            return Ok(ServiceResult::conflict(messages::EMAIL_EXISTS));
        }

        let saved = match self.repo.update_profile(user_id, input.into()).await {
            Ok(saved) => saved,
            Err(DomainError::NotFound { .. }) => {
                return Ok(ServiceResult::not_found(messages::USER_NOT_FOUND))
            }
            Err(DomainError::Conflict(_)) => {
                return Ok(ServiceResult::conflict(messages::EMAIL_EXISTS))
            }
            Err(e) => return Err(e),
        };

        info!(user_id, "User updated");
        Ok(ServiceResult::created(saved.into()))
    }

    pub async fn delete(&self, user_id: i32) -> DomainResult<ServiceResult<bool>> {
        if !self.repo.delete(user_id).await? {
            return Ok(ServiceResult::not_found(messages::USER_NOT_FOUND));
        }

        info!(user_id, "User deleted");
        Ok(ServiceResult::success(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::users::views::{
        FilterOptions, PaginationCountOptions, PaginationOptions, SortOptions,
    };
    use crate::application::ResultType;
    use crate::domain::{SortBy, User, UserProfile};
    use crate::infrastructure::storage::InMemoryUserRepository;

    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn seeded(count: i32) -> Arc<InMemoryUserRepository> {
        let repo = Arc::new(InMemoryUserRepository::new());
        for i in 1..=count {
            repo.create(NewUser {
                name: format!("User {i}"),
                age: 20 + i,
                email: format!("user{i}@test.com"),
                roles: vec![if i % 2 == 0 { Role::Admin } else { Role::User }],
            })
            .await
            .unwrap();
        }
        repo
    }

    fn input(name: &str, age: i32, email: &str) -> UserInput {
        UserInput {
            name: name.to_string(),
            age,
            email: email.to_string(),
        }
    }

    fn list_query(page: u64, page_size: u64) -> ListUsersQuery {
        ListUsersQuery {
            filters: None,
            sort: None,
            pagination: PaginationOptions { page, page_size },
        }
    }

    #[tokio::test]
    async fn list_clamps_over_paging_to_last_page() {
        let service = UserService::new(seeded(20).await);

        let result = service.list(list_query(10, 5)).await.unwrap();
        assert_eq!(result.status_code, ResultType::Success);
        let ids: Vec<i32> = result.payload.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![16, 17, 18, 19, 20]);

        let last = service.list(list_query(4, 5)).await.unwrap();
        assert_eq!(last.payload.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn list_filters_and_sorts() {
        let service = UserService::new(seeded(10).await);

        let query = ListUsersQuery {
            filters: Some(FilterOptions {
                by_roles: Some(vec![Role::Admin.id()]),
                ..Default::default()
            }),
            sort: Some(SortOptions {
                sort_by: Some(SortBy::Age),
                asc: false,
            }),
            pagination: PaginationOptions {
                page: 1,
                page_size: 3,
            },
        };
        let users = service.list(query).await.unwrap().payload.unwrap();
        let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![10, 8, 6]);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_success() {
        let service = UserService::new(Arc::new(InMemoryUserRepository::new()));
        let result = service.list(list_query(3, 10)).await.unwrap();
        assert_eq!(result.status_code, ResultType::Success);
        assert!(result.payload.unwrap().is_empty());
    }

    #[tokio::test]
    async fn count_reports_unclamped_pages() {
        let service = UserService::new(seeded(21).await);
        let result = service
            .count(CountUsersQuery {
                filters: None,
                pagination: PaginationCountOptions { page_size: 5 },
            })
            .await
            .unwrap();
        assert_eq!(
            result.payload.unwrap(),
            CountsResponse {
                users_count: 21,
                pages_count: 5
            }
        );
    }

    #[tokio::test]
    async fn get_by_id_missing_user() {
        let service = UserService::new(seeded(1).await);
        let result = service.get_by_id(42).await.unwrap();
        assert_eq!(result.status_code, ResultType::NotFound);
        assert_eq!(result.error.as_deref(), Some(messages::USER_NOT_FOUND));
        assert!(result.payload.is_none());
    }

    #[tokio::test]
    async fn set_roles_drops_unknown_and_duplicate_ids() {
        let service = UserService::new(seeded(2).await);

        let result = service
            .set_roles(
                2,
                SetRolesInput {
                    roles: vec![1, 99, 1],
                },
            )
            .await
            .unwrap();
        assert_eq!(result.status_code, ResultType::Created);
        let roles: Vec<i32> = result.payload.unwrap().roles.iter().map(|r| r.id).collect();
        assert_eq!(roles, vec![1]);

        let missing = service
            .set_roles(7, SetRolesInput { roles: vec![2] })
            .await
            .unwrap();
        assert_eq!(missing.status_code, ResultType::NotFound);
    }

    #[tokio::test]
    async fn create_assigns_default_role() {
        let service = UserService::new(Arc::new(InMemoryUserRepository::new()));
        let result = service
            .create(input("Ann", 30, "ann@test.com"))
            .await
            .unwrap();
        assert_eq!(result.status_code, ResultType::Created);
        let user = result.payload.unwrap();
        assert_eq!(user.roles.len(), 1);
        assert_eq!(user.roles[0].id, Role::User.id());
    }

    #[tokio::test]
    async fn create_with_taken_email_conflicts_without_writing() {
        let repo = seeded(3).await;
        let service = UserService::new(Arc::clone(&repo));

        let result = service
            .create(input("Copy", 30, "user2@test.com"))
            .await
            .unwrap();
        assert_eq!(result.status_code, ResultType::Conflict);
        assert_eq!(result.error.as_deref(), Some(messages::EMAIL_EXISTS));
        assert_eq!(repo.count(&UserFilter::default()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn update_changes_fields_and_keeps_roles() {
        let service = UserService::new(seeded(2).await);
        let result = service
            .update(2, input("Renamed", 55, "renamed@test.com"))
            .await
            .unwrap();
        assert_eq!(result.status_code, ResultType::Created);
        let user = result.payload.unwrap();
        assert_eq!(user.name, "Renamed");
        assert_eq!(user.age, 55);
        assert_eq!(user.email, "renamed@test.com");
        assert_eq!(user.roles[0].id, Role::Admin.id());
    }

    #[tokio::test]
    async fn update_to_other_users_email_conflicts() {
        let service = UserService::new(seeded(2).await);
        let result = service
            .update(1, input("User 1", 21, "user2@test.com"))
            .await
            .unwrap();
        assert_eq!(result.status_code, ResultType::Conflict);

        let missing = service
            .update(9, input("Nobody", 21, "nobody@test.com"))
            .await
            .unwrap();
        assert_eq!(missing.status_code, ResultType::NotFound);
    }

    /// Counts uniqueness lookups on top of the in-memory store. When
    /// `roles_during_check` is set, each lookup also replaces user 1's roles,
    /// standing in for a role change committed mid-update.
    struct CountingRepository {
        inner: InMemoryUserRepository,
        email_checks: AtomicUsize,
        roles_during_check: Option<Vec<Role>>,
    }

    impl CountingRepository {
        async fn with_user(roles_during_check: Option<Vec<Role>>) -> Arc<Self> {
            let repo = Arc::new(Self {
                inner: InMemoryUserRepository::new(),
                email_checks: AtomicUsize::new(0),
                roles_during_check,
            });
            repo.create(NewUser {
                name: "Ann".to_string(),
                age: 30,
                email: "ann@test.com".to_string(),
                roles: vec![Role::User],
            })
            .await
            .unwrap();
            repo
        }
    }

    #[async_trait]
    impl UserRepositoryInterface for CountingRepository {
        async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
            self.inner.find_by_id(id).await
        }

        async fn find_page(
            &self,
            filter: &UserFilter,
            sort: &UserSort,
            offset: u64,
            limit: u64,
        ) -> DomainResult<Vec<User>> {
            self.inner.find_page(filter, sort, offset, limit).await
        }

        async fn count(&self, filter: &UserFilter) -> DomainResult<u64> {
            self.inner.count(filter).await
        }

        async fn email_exists(&self, email: &str) -> DomainResult<bool> {
            self.email_checks.fetch_add(1, Ordering::SeqCst);
            if let Some(roles) = &self.roles_during_check {
                self.inner.replace_roles(1, roles).await?;
            }
            self.inner.email_exists(email).await
        }

        async fn create(&self, user: NewUser) -> DomainResult<User> {
            self.inner.create(user).await
        }

        async fn update_profile(&self, id: i32, profile: UserProfile) -> DomainResult<User> {
            self.inner.update_profile(id, profile).await
        }

        async fn replace_roles(&self, id: i32, roles: &[Role]) -> DomainResult<User> {
            self.inner.replace_roles(id, roles).await
        }

        async fn delete(&self, id: i32) -> DomainResult<bool> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn update_with_unchanged_email_skips_uniqueness_check() {
        let repo = CountingRepository::with_user(None).await;
        let service = UserService::new(Arc::clone(&repo));

        let result = service
            .update(1, input("Ann B", 31, "ann@test.com"))
            .await
            .unwrap();
        assert_eq!(result.status_code, ResultType::Created);
        assert_eq!(repo.email_checks.load(Ordering::SeqCst), 0);

        service
            .update(1, input("Ann B", 31, "ann.b@test.com"))
            .await
            .unwrap();
        assert_eq!(repo.email_checks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn update_does_not_undo_a_concurrent_role_change() {
        let repo = CountingRepository::with_user(Some(vec![Role::Admin])).await;
        let service = UserService::new(Arc::clone(&repo));

        let result = service
            .update(1, input("Ann B", 31, "ann.b@test.com"))
            .await
            .unwrap();
        assert_eq!(result.status_code, ResultType::Created);
        assert_eq!(repo.email_checks.load(Ordering::SeqCst), 1);

        let stored = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.name, "Ann B");
        assert_eq!(stored.roles, vec![Role::Admin]);
    }

    #[tokio::test]
    async fn set_roles_keeps_profile_fields() {
        let repo = seeded(1).await;
        let service = UserService::new(Arc::clone(&repo));

        service
            .set_roles(1, SetRolesInput { roles: vec![3, 4] })
            .await
            .unwrap();

        let stored = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.name, "User 1");
        assert_eq!(stored.age, 21);
        assert_eq!(stored.email, "user1@test.com");
        assert_eq!(stored.roles, vec![Role::Support, Role::SuperAdmin]);
    }

    #[tokio::test]
    async fn delete_missing_user_leaves_store_unchanged() {
        let repo = seeded(4).await;
        let service = UserService::new(Arc::clone(&repo));

        let before = repo.count(&UserFilter::default()).await.unwrap();
        let result = service.delete(99).await.unwrap();
        let after = repo.count(&UserFilter::default()).await.unwrap();

        assert_eq!(result.status_code, ResultType::NotFound);
        assert_eq!(before, after);

        let deleted = service.delete(4).await.unwrap();
        assert_eq!(deleted.status_code, ResultType::Success);
        assert_eq!(deleted.payload, Some(true));
        assert_eq!(repo.count(&UserFilter::default()).await.unwrap(), 3);
    }
}
