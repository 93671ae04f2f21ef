use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, SqlErr, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use reserva_auth_schema::{employee_identities, owner_identities, tenants};

use crate::domain::repository::{EmployeeRepository, OwnerRepository};
use crate::domain::types::{
    DEFAULT_TENANT_PLAN, EmployeeIdentity, NewOwnerIdentity, NewTenant, OwnerIdentity, Role,
    TenantRef,
};
use crate::error::AuthServiceError;

fn tenant_ref(model: tenants::Model) -> TenantRef {
    TenantRef {
        id: model.id,
        name: model.name,
    }
}

fn owner_from_models(
    model: owner_identities::Model,
    tenant: Option<tenants::Model>,
) -> Result<OwnerIdentity, AuthServiceError> {
    let role: Role = model
        .role
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown owner role: {}", model.role))?;
    Ok(OwnerIdentity {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        provider_subject: model.provider_subject,
        role,
        two_factor_enabled: model.two_factor_enabled,
        first_name: model.first_name,
        last_name: model.last_name,
        tenant: tenant.map(tenant_ref),
    })
}

fn employee_from_models(
    model: employee_identities::Model,
    tenant: Option<tenants::Model>,
) -> Result<EmployeeIdentity, AuthServiceError> {
    let tenant = tenant.ok_or_else(|| anyhow::anyhow!("employee {} without tenant", model.id))?;
    Ok(EmployeeIdentity {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        tenant: tenant_ref(tenant),
        employee_id: model.employee_id,
        first_name: model.first_name,
        last_name: model.last_name,
    })
}

// ── Owner repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOwnerRepository {
    pub db: DatabaseConnection,
}

impl DbOwnerRepository {
    async fn find_one(
        &self,
        filter: sea_orm::Select<owner_identities::Entity>,
    ) -> Result<Option<OwnerIdentity>, AuthServiceError> {
        let found = filter
            .find_also_related(tenants::Entity)
            .one(&self.db)
            .await
            .context("find owner identity")?;
        found
            .map(|(model, tenant)| owner_from_models(model, tenant))
            .transpose()
    }
}

impl OwnerRepository for DbOwnerRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<OwnerIdentity>, AuthServiceError> {
        self.find_one(
            owner_identities::Entity::find()
                .filter(owner_identities::Column::Email.eq(email)),
        )
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OwnerIdentity>, AuthServiceError> {
        self.find_one(owner_identities::Entity::find_by_id(id)).await
    }

    async fn find_by_provider_subject(
        &self,
        subject: &str,
    ) -> Result<Option<OwnerIdentity>, AuthServiceError> {
        self.find_one(
            owner_identities::Entity::find()
                .filter(owner_identities::Column::ProviderSubject.eq(subject)),
        )
        .await
    }

    async fn link_provider_subject(
        &self,
        owner_id: Uuid,
        subject: &str,
    ) -> Result<(), AuthServiceError> {
        owner_identities::ActiveModel {
            id: Set(owner_id),
            provider_subject: Set(Some(subject.to_owned())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("link provider subject")?;
        Ok(())
    }

    async fn create_with_tenant(
        &self,
        owner: &NewOwnerIdentity,
        tenant: &NewTenant,
    ) -> Result<OwnerIdentity, AuthServiceError> {
        let result = self
            .db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let owner = owner.clone();
                let tenant = tenant.clone();
                Box::pin(async move {
                    let handle = unique_handle(txn, &tenant).await?;
                    insert_tenant(txn, &tenant, handle).await?;
                    insert_owner(txn, &owner, tenant.id).await?;
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => {}
            // Concurrent duplicate callback inserted first — re-fetch below.
            Err(TransactionError::Transaction(e))
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                tracing::debug!(subject = %owner.provider_subject, "owner insert lost race");
            }
            Err(e) => return Err(anyhow::Error::from(e).context("create owner with tenant").into()),
        }

        if let Some(existing) = self
            .find_by_provider_subject(&owner.provider_subject)
            .await?
        {
            return Ok(existing);
        }
        self.find_by_email(&owner.email)
            .await?
            .ok_or_else(|| anyhow::anyhow!("owner vanished after insert").into())
    }
}

/// Pick a free handle: the derived base, or base plus a short random suffix
/// when the base is taken. The unique index is the final arbiter.
async fn unique_handle(
    txn: &DatabaseTransaction,
    tenant: &NewTenant,
) -> Result<String, sea_orm::DbErr> {
    let taken = tenants::Entity::find()
        .filter(tenants::Column::Handle.eq(&tenant.handle))
        .one(txn)
        .await?
        .is_some();
    if !taken {
        return Ok(tenant.handle.clone());
    }
    let suffix = &tenant.id.simple().to_string()[..6];
    Ok(format!("{}-{}", tenant.handle, suffix))
}

async fn insert_tenant(
    txn: &DatabaseTransaction,
    tenant: &NewTenant,
    handle: String,
) -> Result<(), sea_orm::DbErr> {
    tenants::ActiveModel {
        id: Set(tenant.id),
        name: Set(tenant.name.clone()),
        handle: Set(handle),
        plan: Set(DEFAULT_TENANT_PLAN.to_owned()),
        created_at: Set(Utc::now()),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_owner(
    txn: &DatabaseTransaction,
    owner: &NewOwnerIdentity,
    tenant_id: Uuid,
) -> Result<(), sea_orm::DbErr> {
    owner_identities::ActiveModel {
        id: Set(owner.id),
        email: Set(owner.email.clone()),
        password_hash: Set(None),
        provider_subject: Set(Some(owner.provider_subject.clone())),
        role: Set(Role::TenantOwner.as_str().to_owned()),
        two_factor_enabled: Set(false),
        first_name: Set(owner.first_name.clone()),
        last_name: Set(owner.last_name.clone()),
        tenant_id: Set(Some(tenant_id)),
        created_at: Set(Utc::now()),
    }
    .insert(txn)
    .await?;
    Ok(())
}

// ── Employee repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEmployeeRepository {
    pub db: DatabaseConnection,
}

impl EmployeeRepository for DbEmployeeRepository {
    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<EmployeeIdentity>, AuthServiceError> {
        let found = employee_identities::Entity::find()
            .filter(employee_identities::Column::Email.eq(email))
            .filter(employee_identities::Column::IsActive.eq(true))
            .find_also_related(tenants::Entity)
            .one(&self.db)
            .await
            .context("find active employee identity")?;
        found
            .map(|(model, tenant)| employee_from_models(model, tenant))
            .transpose()
    }
}
