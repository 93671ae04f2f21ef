use sea_orm_migration::prelude::*;

use crate::m20260815_000001_create_tenants::Tenants;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OwnerIdentities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OwnerIdentities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // Unique within the owner namespace only; employee emails
                    // live in their own table and may collide with these.
                    .col(
                        ColumnDef::new(OwnerIdentities::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(OwnerIdentities::PasswordHash).string())
                    // Unique constraint makes provider linking idempotent under
                    // concurrent duplicate callbacks (insert, on conflict re-fetch).
                    .col(
                        ColumnDef::new(OwnerIdentities::ProviderSubject)
                            .string()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(OwnerIdentities::Role).string().not_null())
                    .col(
                        ColumnDef::new(OwnerIdentities::TwoFactorEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(OwnerIdentities::FirstName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OwnerIdentities::LastName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OwnerIdentities::TenantId).uuid())
                    .col(
                        ColumnDef::new(OwnerIdentities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(OwnerIdentities::Table, OwnerIdentities::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OwnerIdentities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OwnerIdentities {
    Table,
    Id,
    Email,
    PasswordHash,
    ProviderSubject,
    Role,
    TwoFactorEnabled,
    FirstName,
    LastName,
    TenantId,
    CreatedAt,
}
