use sea_orm::entity::prelude::*;

/// Business account — the unit of data isolation. The auth service stores only
/// the fields access control needs (name for disambiguation labels, handle and
/// plan for provider-bootstrap of new accounts).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Machine-derived unique handle (subdomain-safe, from email local-part).
    #[sea_orm(unique)]
    pub handle: String,
    /// Entitlement plan; provider-created tenants start on "TRIAL".
    pub plan: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::owner_identities::Entity")]
    OwnerIdentities,
    #[sea_orm(has_many = "super::employee_identities::Entity")]
    EmployeeIdentities,
}

impl Related<super::owner_identities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnerIdentities.def()
    }
}

impl Related<super::employee_identities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeIdentities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
