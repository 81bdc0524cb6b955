//! Demo data for an empty database

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::domain::{DomainResult, NewUser, Role, UserFilter, UserRepositoryInterface};

pub const DEMO_USER_COUNT: i32 = 20;

/// Inserts `DEMO_USER_COUNT` demo users when the store holds no users.
///
/// Each gets a random age in `[18, 100]` and one or two random roles.
/// Returns the number of users inserted.
pub async fn seed_demo_users<R: UserRepositoryInterface>(repo: &R) -> DomainResult<u64> {
    if repo.count(&UserFilter::default()).await? > 0 {
        return Ok(0);
    }

    info!("Users table is empty, inserting {} demo users", DEMO_USER_COUNT);
    for i in 1..=DEMO_USER_COUNT {
        let user = demo_user(i, &mut rand::thread_rng());
        repo.create(user).await?;
    }

    Ok(DEMO_USER_COUNT as u64)
}

fn demo_user(i: i32, rng: &mut impl Rng) -> NewUser {
    let role_count = rng.gen_range(1..=2);
    let roles = Role::ALL
        .choose_multiple(rng, role_count)
        .copied()
        .collect();

    NewUser {
        name: format!("User {i}"),
        age: rng.gen_range(18..=100),
        email: format!("user{i}@test.com"),
        roles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortBy;
    use crate::domain::UserSort;
    use crate::infrastructure::storage::InMemoryUserRepository;

    #[tokio::test]
    async fn seeds_only_an_empty_store() {
        let repo = InMemoryUserRepository::new();
        assert_eq!(seed_demo_users(&repo).await.unwrap(), 20);
        assert_eq!(seed_demo_users(&repo).await.unwrap(), 0);
        assert_eq!(repo.count(&UserFilter::default()).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn demo_users_are_well_formed() {
        let repo = InMemoryUserRepository::new();
        seed_demo_users(&repo).await.unwrap();

        let sort = UserSort {
            sort_by: Some(SortBy::Age),
            asc: true,
        };
        let users = repo
            .find_page(&UserFilter::default(), &sort, 0, 100)
            .await
            .unwrap();
        for user in &users {
            assert!((18..=100).contains(&user.age));
            assert!((1..=2).contains(&user.roles.len()));
            assert_eq!(user.name, format!("User {}", user.id));
            assert_eq!(user.email, format!("user{}@test.com", user.id));
        }
    }
}
