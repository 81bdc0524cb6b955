//! In-memory user store
//!
//! Mirrors the SQL repository's observable behavior (id order, unique
//! emails, case-insensitive substring filters) so services can be exercised
//! without a database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    DomainError, DomainResult, NewUser, Role, User, UserFilter, UserProfile,
    UserRepositoryInterface, UserSort,
};

#[derive(Default)]
struct State {
    users: BTreeMap<i32, User>,
    last_id: i32,
}

impl State {
    fn email_taken_by_other(&self, email: &str, id: Option<i32>) -> bool {
        self.users
            .values()
            .any(|user| user.email == email && Some(user.id) != id)
    }
}

/// In-memory storage for development and testing
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: RwLock<State>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn normalized_roles(roles: &[Role]) -> Vec<Role> {
    let ids: Vec<i32> = roles.iter().map(|role| role.id()).collect();
    Role::from_ids(&ids)
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_page(
        &self,
        filter: &UserFilter,
        sort: &UserSort,
        offset: u64,
        limit: u64,
    ) -> DomainResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect();
        users.sort_by(|a, b| sort.compare(a, b));

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(users.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, filter: &UserFilter) -> DomainResult<u64> {
        let state = self.state.read().await;
        Ok(state.users.values().filter(|user| filter.matches(user)).count() as u64)
    }

    async fn email_exists(&self, email: &str) -> DomainResult<bool> {
        Ok(self.state.read().await.email_taken_by_other(email, None))
    }

    async fn create(&self, user: NewUser) -> DomainResult<User> {
        let mut state = self.state.write().await;
        if state.email_taken_by_other(&user.email, None) {
            return Err(DomainError::Conflict(format!("email {}", user.email)));
        }

        state.last_id += 1;
        let stored = User {
            id: state.last_id,
            name: user.name,
            age: user.age,
            email: user.email,
            roles: normalized_roles(&user.roles),
        };
        state.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_profile(&self, id: i32, profile: UserProfile) -> DomainResult<User> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Err(DomainError::user_not_found(id));
        }
        if state.email_taken_by_other(&profile.email, Some(id)) {
            return Err(DomainError::Conflict(format!("email {}", profile.email)));
        }

        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::user_not_found(id))?;
        user.name = profile.name;
        user.age = profile.age;
        user.email = profile.email;
        Ok(user.clone())
    }

    async fn replace_roles(&self, id: i32, roles: &[Role]) -> DomainResult<User> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::user_not_found(id))?;
        user.roles = normalized_roles(roles);
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        Ok(self.state.write().await.users.remove(&id).is_some())
    }
}
