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
                    .table(EmployeeIdentities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeIdentities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmployeeIdentities::Email)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeIdentities::PasswordHash)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeIdentities::TenantId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeIdentities::EmployeeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeIdentities::FirstName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeIdentities::LastName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeIdentities::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(EmployeeIdentities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EmployeeIdentities::Table, EmployeeIdentities::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Email is unique among active employees only — deactivated rows may
        // keep their email. Partial indexes need raw SQL on Postgres.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX idx_employee_identities_active_email \
                 ON employee_identities (email) WHERE is_active",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmployeeIdentities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EmployeeIdentities {
    Table,
    Id,
    Email,
    PasswordHash,
    TenantId,
    EmployeeId,
    FirstName,
    LastName,
    IsActive,
    CreatedAt,
}
