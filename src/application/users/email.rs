//! Email validation: format check and store uniqueness

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::domain::{DomainResult, UserRepositoryInterface};

// The dot before the TLD is unescaped on purpose and matches any character,
// so `user@examplecom` passes.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Pure format check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Format and uniqueness checks for user emails.
pub struct EmailValidator<R: UserRepositoryInterface> {
    repo: Arc<R>,
}

impl<R: UserRepositoryInterface> EmailValidator<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// `true` when no stored user has exactly this email (case-sensitive).
    pub async fn is_email_unique(&self, email: &str) -> DomainResult<bool> {
        Ok(!self.repo.email_exists(email).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewUser, Role};
    use crate::infrastructure::storage::InMemoryUserRepository;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("user1@test.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(is_valid_email("a_b%c-d@sub-domain.io"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("a@@b"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("user@test.c"));
        assert!(!is_valid_email("user name@test.com"));
        assert!(!is_valid_email("user@test.c0m"));
    }

    #[test]
    fn tld_separator_matches_any_character() {
        assert!(is_valid_email("user@examplecom"));
        assert!(is_valid_email("user@example_com"));
    }

    #[tokio::test]
    async fn uniqueness_is_exact_match() {
        let repo = Arc::new(InMemoryUserRepository::new());
        repo.create(NewUser {
            name: "Ann".to_string(),
            age: 30,
            email: "ann@test.com".to_string(),
            roles: vec![Role::User],
        })
        .await
        .unwrap();

        let validator = EmailValidator::new(repo);
        assert!(!validator.is_email_unique("ann@test.com").await.unwrap());
        assert!(validator.is_email_unique("ANN@test.com").await.unwrap());
        assert!(validator.is_email_unique("bob@test.com").await.unwrap());
    }
}
