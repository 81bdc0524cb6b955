//! SeaORM implementation of [`UserRepositoryInterface`]

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    NotSet, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};
use tracing::debug;

use crate::domain::{
    DomainError, DomainResult, NewUser, Role, SortBy, User, UserFilter, UserProfile,
    UserRepositoryInterface, UserSort,
};
use crate::infrastructure::database::entities::{role_user, user};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model, roles: Vec<Role>) -> User {
    User {
        id: model.id,
        name: model.name,
        age: model.age,
        email: model.email,
        roles,
    }
}

fn role_edges(user_id: i32, roles: &[Role]) -> Vec<role_user::ActiveModel> {
    let ids: Vec<i32> = roles.iter().map(|role| role.id()).collect();
    Role::from_ids(&ids)
        .into_iter()
        .map(|role| role_user::ActiveModel {
            role_id: Set(role.id()),
            user_id: Set(user_id),
        })
        .collect()
}

// ── Query composition ───────────────────────────────────────────

/// SQLite binds OFFSET and LIMIT as signed 64-bit integers.
fn sql_bound(value: u64) -> u64 {
    value.min(i64::MAX as u64)
}

fn filtered_query(filter: &UserFilter) -> Select<user::Entity> {
    let mut query = user::Entity::find();

    if let Some(role_ids) = filter.role_ids() {
        query = query.filter(
            user::Column::Id.in_subquery(
                Query::select()
                    .column(role_user::Column::UserId)
                    .from(role_user::Entity)
                    .and_where(role_user::Column::RoleId.is_in(role_ids.to_vec()))
                    .to_owned(),
            ),
        );
    }
    if let Some(fragment) = filter.email_fragment() {
        query = query.filter(user::Column::Email.contains(fragment));
    }
    if let Some(fragment) = filter.name_fragment() {
        query = query.filter(user::Column::Name.contains(fragment));
    }
    if let Some(age) = filter.by_age {
        query = query.filter(user::Column::Age.eq(age));
    }

    query
}

fn ordered(query: Select<user::Entity>, sort: &UserSort) -> Select<user::Entity> {
    let Some(sort_by) = sort.sort_by else {
        return query.order_by_asc(user::Column::Id);
    };

    let column = match sort_by {
        SortBy::Name => user::Column::Name,
        SortBy::Age => user::Column::Age,
        SortBy::Email => user::Column::Email,
    };
    let order = if sort.asc { Order::Asc } else { Order::Desc };

    query
        .order_by(column, order)
        .order_by_asc(user::Column::Id)
}

/// Role sets for the given users, keyed by user id.
async fn load_roles<C: ConnectionTrait>(
    conn: &C,
    user_ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<Role>>, DbErr> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let edges = role_user::Entity::find()
        .filter(role_user::Column::UserId.is_in(user_ids))
        .all(conn)
        .await?;

    let mut role_ids: HashMap<i32, Vec<i32>> = HashMap::new();
    for edge in edges {
        role_ids.entry(edge.user_id).or_default().push(edge.role_id);
    }

    Ok(role_ids
        .into_iter()
        .map(|(user_id, ids)| (user_id, Role::from_ids(&ids)))
        .collect())
}

async fn insert_role_edges<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    roles: &[Role],
) -> Result<(), DbErr> {
    let edges = role_edges(user_id, roles);
    if edges.is_empty() {
        return Ok(());
    }
    role_user::Entity::insert_many(edges).exec(conn).await?;
    Ok(())
}

async fn delete_role_edges<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<(), DbErr> {
    role_user::Entity::delete_many()
        .filter(role_user::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let Some(model) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut roles = load_roles(&self.db, vec![id]).await?;
        let roles = roles.remove(&id).unwrap_or_default();
        Ok(Some(user_model_to_domain(model, roles)))
    }

    async fn find_page(
        &self,
        filter: &UserFilter,
        sort: &UserSort,
        offset: u64,
        limit: u64,
    ) -> DomainResult<Vec<User>> {
        debug!(?filter, ?sort, offset, limit, "Querying user page");

        let models = ordered(filtered_query(filter), sort)
            .offset(sql_bound(offset))
            .limit(sql_bound(limit))
            .all(&self.db)
            .await?;

        let ids = models.iter().map(|model| model.id).collect();
        let mut roles = load_roles(&self.db, ids).await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let user_roles = roles.remove(&model.id).unwrap_or_default();
                user_model_to_domain(model, user_roles)
            })
            .collect())
    }

    async fn count(&self, filter: &UserFilter) -> DomainResult<u64> {
        Ok(filtered_query(filter).count(&self.db).await?)
    }

    async fn email_exists(&self, email: &str) -> DomainResult<bool> {
        let matches = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(matches > 0)
    }

    async fn create(&self, new_user: NewUser) -> DomainResult<User> {
        let txn = self.db.begin().await?;

        let model = user::ActiveModel {
            id: NotSet,
            name: Set(new_user.name),
            age: Set(new_user.age),
            email: Set(new_user.email),
        }
        .insert(&txn)
        .await?;
        insert_role_edges(&txn, model.id, &new_user.roles).await?;

        txn.commit().await?;

        let ids: Vec<i32> = new_user.roles.iter().map(|role| role.id()).collect();
        Ok(user_model_to_domain(model, Role::from_ids(&ids)))
    }

    async fn update_profile(&self, id: i32, profile: UserProfile) -> DomainResult<User> {
        let txn = self.db.begin().await?;

        let Some(existing) = user::Entity::find_by_id(id).one(&txn).await? else {
            return Err(DomainError::user_not_found(id));
        };

        // Only `Set` columns reach the UPDATE statement.
        let mut active: user::ActiveModel = existing.into();
        active.name = Set(profile.name);
        active.age = Set(profile.age);
        active.email = Set(profile.email);
        let model = active.update(&txn).await?;

        let mut roles = load_roles(&txn, vec![id]).await?;
        txn.commit().await?;

        let roles = roles.remove(&id).unwrap_or_default();
        Ok(user_model_to_domain(model, roles))
    }

    async fn replace_roles(&self, id: i32, roles: &[Role]) -> DomainResult<User> {
        let txn = self.db.begin().await?;

        let Some(model) = user::Entity::find_by_id(id).one(&txn).await? else {
            return Err(DomainError::user_not_found(id));
        };

        delete_role_edges(&txn, id).await?;
        insert_role_edges(&txn, id, roles).await?;

        txn.commit().await?;

        let ids: Vec<i32> = roles.iter().map(|role| role.id()).collect();
        Ok(user_model_to_domain(model, Role::from_ids(&ids)))
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        let txn = self.db.begin().await?;

        delete_role_edges(&txn, id).await?;
        let result = user::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}
