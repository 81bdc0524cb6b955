//! Request and response views
//!
//! Views are the API-facing shapes. Requests convert into domain query
//! descriptors; [`UserResponse`] is the projection of a stored [`User`].

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Role, SortBy, User, UserFilter, UserProfile, UserSort};

// ── Query options ───────────────────────────────────────────────

/// Filter criteria, combined with AND. Absent or empty criteria are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FilterOptions {
    /// Role ids (User = 1, Admin = 2, Support = 3, SuperAdmin = 4); a user
    /// matches when it holds at least one of them
    #[serde(default)]
    pub by_roles: Option<Vec<i32>>,
    /// Email substring
    pub by_email: Option<String>,
    /// Name substring
    pub by_name: Option<String>,
    /// Exact age
    pub by_age: Option<i32>,
}

impl From<FilterOptions> for UserFilter {
    fn from(options: FilterOptions) -> Self {
        Self {
            by_roles: options.by_roles.unwrap_or_default(),
            by_email: options.by_email,
            by_name: options.by_name,
            by_age: options.by_age,
        }
    }
}

/// Sort options. An unknown `sort_by` keeps store order.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SortOptions {
    /// `name`, `age`, `email` or their codes 1, 2, 3
    #[serde(default, deserialize_with = "lenient_sort_by")]
    #[schema(value_type = Option<String>, example = "name")]
    pub sort_by: Option<SortBy>,
    /// Ascending unless `false`
    #[serde(default = "default_asc")]
    pub asc: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            sort_by: None,
            asc: true,
        }
    }
}

impl From<SortOptions> for UserSort {
    fn from(options: SortOptions) -> Self {
        Self {
            sort_by: options.sort_by,
            asc: options.asc,
        }
    }
}

fn default_asc() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSortKey {
    Code(i64),
    Name(String),
    Other(serde_json::Value),
}

fn lenient_sort_by<'de, D>(deserializer: D) -> Result<Option<SortBy>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawSortKey>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawSortKey::Code(code)) => SortBy::from_code(code),
        Some(RawSortKey::Name(name)) => SortBy::from_name(&name),
        Some(RawSortKey::Other(_)) | None => None,
    })
}

/// Page request for listing
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PaginationOptions {
    /// 1-based page; pages past the end are clamped to the last page
    #[serde(default = "default_page")]
    pub page: u64,
    #[validate(range(min = 1))]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

/// Page size used to report the number of pages
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PaginationCountOptions {
    #[validate(range(min = 1))]
    pub page_size: u64,
}

// ── Requests ────────────────────────────────────────────────────

/// Filtered, sorted, paginated user listing
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub filters: Option<FilterOptions>,
    #[serde(default)]
    pub sort: Option<SortOptions>,
    #[validate(nested)]
    pub pagination: PaginationOptions,
}

/// Filtered user count
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CountUsersQuery {
    #[serde(default)]
    pub filters: Option<FilterOptions>,
    #[validate(nested)]
    pub pagination: PaginationCountOptions,
}

/// Full replacement of a user's roles
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetRolesInput {
    /// Role ids; unknown ids are dropped and duplicates collapsed
    #[validate(length(min = 1))]
    pub roles: Vec<i32>,
}

/// Create/update payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UserInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1, max = 150))]
    pub age: i32,
    pub email: String,
}

impl From<UserInput> for UserProfile {
    fn from(input: UserInput) -> Self {
        Self {
            name: input.name,
            age: input.age,
            email: input.email,
        }
    }
}

// ── Responses ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleView {
    pub id: i32,
    pub name: String,
}

impl From<Role> for RoleView {
    fn from(role: Role) -> Self {
        Self {
            id: role.id(),
            name: role.name().to_string(),
        }
    }
}

/// User API representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub email: String,
    pub roles: Vec<RoleView>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            age: user.age,
            email: user.email,
            roles: user.roles.into_iter().map(RoleView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountsResponse {
    pub users_count: u64,
    pub pages_count: u64,
}
