use sea_orm::entity::prelude::*;

/// Business-owner account. Email is unique across all owner identities — but
/// only within this namespace; an employee identity may carry the same email.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "owner_identities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    /// Unset when the account was created via an external provider.
    pub password_hash: Option<String>,
    /// External provider subject id — the stable key once linked.
    #[sea_orm(unique)]
    pub provider_subject: Option<String>,
    /// "TENANT_OWNER" or "SUPER_ADMIN".
    pub role: String,
    pub two_factor_enabled: bool,
    pub first_name: String,
    pub last_name: String,
    /// Primary tenant association; superusers may have none.
    pub tenant_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id"
    )]
    Tenant,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
