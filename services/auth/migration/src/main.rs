use sea_orm_migration::prelude::*;

mod m20260815_000001_create_tenants;
mod m20260815_000002_create_owner_identities;
mod m20260815_000003_create_employee_identities;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_create_tenants::Migration),
            Box::new(m20260815_000002_create_owner_identities::Migration),
            Box::new(m20260815_000003_create_employee_identities::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
