//! Query descriptors for listing and counting users
//!
//! Every criterion is optional and an absent or empty one never narrows the
//! result. The SQL repository translates these into conditions; the
//! in-memory repository evaluates [`UserFilter::matches`] and
//! [`UserSort::compare`] directly.

use std::cmp::Ordering;

use super::User;

/// Conjunctive user filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// User must hold at least one of these role ids. Unknown ids are kept:
    /// they simply match nobody.
    pub by_roles: Vec<i32>,
    /// Substring of the email
    pub by_email: Option<String>,
    /// Substring of the name
    pub by_name: Option<String>,
    /// Exact age
    pub by_age: Option<i32>,
}

impl UserFilter {
    pub fn role_ids(&self) -> Option<&[i32]> {
        (!self.by_roles.is_empty()).then_some(self.by_roles.as_slice())
    }

    pub fn email_fragment(&self) -> Option<&str> {
        non_empty(self.by_email.as_deref())
    }

    pub fn name_fragment(&self) -> Option<&str> {
        non_empty(self.by_name.as_deref())
    }

    /// Evaluates the filter against a loaded user.
    ///
    /// Substring checks ignore ASCII case, like SQL `LIKE` on the default
    /// SQLite collation.
    pub fn matches(&self, user: &User) -> bool {
        if let Some(ids) = self.role_ids() {
            if !user.has_any_role(ids) {
                return false;
            }
        }
        if let Some(fragment) = self.email_fragment() {
            if !contains_ignore_ascii_case(&user.email, fragment) {
                return false;
            }
        }
        if let Some(fragment) = self.name_fragment() {
            if !contains_ignore_ascii_case(&user.name, fragment) {
                return false;
            }
        }
        if let Some(age) = self.by_age {
            if user.age != age {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Sortable user fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Name = 1,
    Age = 2,
    Email = 3,
}

impl SortBy {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Name),
            2 => Some(Self::Age),
            3 => Some(Self::Email),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "age" => Some(Self::Age),
            "email" => Some(Self::Email),
            _ => None,
        }
    }
}

/// Sort order. No field means store order (ascending id).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSort {
    pub sort_by: Option<SortBy>,
    pub asc: bool,
}

impl Default for UserSort {
    fn default() -> Self {
        Self {
            sort_by: None,
            asc: true,
        }
    }
}

impl UserSort {
    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        let Some(sort_by) = self.sort_by else {
            return a.id.cmp(&b.id);
        };

        let primary = match sort_by {
            SortBy::Name => a.name.cmp(&b.name),
            SortBy::Age => a.age.cmp(&b.age),
            SortBy::Email => a.email.cmp(&b.email),
        };
        let primary = if self.asc { primary } else { primary.reverse() };

        primary.then_with(|| a.id.cmp(&b.id))
    }
}
