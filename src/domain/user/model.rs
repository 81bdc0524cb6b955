use std::collections::BTreeSet;

/// Fixed role enumeration.
///
/// The discriminants are the persisted role ids; the `roles` table is filled
/// from [`Role::ALL`] so the enum stays the single source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    User = 1,
    Admin = 2,
    Support = 3,
    SuperAdmin = 4,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::User, Role::Admin, Role::Support, Role::SuperAdmin];

    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
            Role::Support => "Support",
            Role::SuperAdmin => "SuperAdmin",
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == id)
    }

    /// Keeps the ids that name a role, collapsing duplicates.
    ///
    /// The result is ordered by role id.
    pub fn from_ids(ids: &[i32]) -> Vec<Self> {
        ids.iter()
            .filter_map(|id| Self::from_id(*id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

/// User model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub email: String,
    /// Assigned roles, ordered by role id
    pub roles: Vec<Role>,
}

impl User {
    pub fn has_any_role(&self, role_ids: &[i32]) -> bool {
        self.roles.iter().any(|role| role_ids.contains(&role.id()))
    }
}

/// A user that has not been stored yet; the store assigns the id.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub age: i32,
    pub email: String,
    pub roles: Vec<Role>,
}

/// The scalar fields an update may change; roles are written separately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub age: i32,
    pub email: String,
}
