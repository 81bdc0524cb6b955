//! Create role_user link table migration

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;
use super::m20240101_000002_create_roles::Roles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoleUser::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RoleUser::RoleId).integer().not_null())
                    .col(ColumnDef::new(RoleUser::UserId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(RoleUser::RoleId)
                            .col(RoleUser::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_user_user_id")
                            .from(RoleUser::Table, RoleUser::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_user_role_id")
                            .from(RoleUser::Table, RoleUser::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Loading a user's roles looks up by user
        manager
            .create_index(
                Index::create()
                    .name("idx_role_user_user_id")
                    .table(RoleUser::Table)
                    .col(RoleUser::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoleUser::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RoleUser {
    Table,
    RoleId,
    UserId,
}
