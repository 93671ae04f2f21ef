use std::sync::{Arc, Mutex};

use uuid::Uuid;

use reserva_auth::domain::repository::{EmployeeRepository, Mailer, OwnerRepository};
use reserva_auth::domain::types::{
    EmployeeIdentity, NewOwnerIdentity, NewTenant, OwnerIdentity, Role, TenantRef,
};
use reserva_auth::error::AuthServiceError;
use reserva_auth::password::hash_password;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";
pub const SESSION_TTL: u64 = 3600;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn tenant_a() -> TenantRef {
    TenantRef {
        id: Uuid::parse_str("00000000-0000-0000-0000-00000000000a").unwrap(),
        name: "Glow Salon".to_owned(),
    }
}

pub fn tenant_b() -> TenantRef {
    TenantRef {
        id: Uuid::parse_str("00000000-0000-0000-0000-00000000000b").unwrap(),
        name: "Fade Barbers".to_owned(),
    }
}

pub fn owner(email: &str, password: &str) -> OwnerIdentity {
    OwnerIdentity {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        password_hash: Some(hash_password(password).unwrap()),
        provider_subject: None,
        role: Role::TenantOwner,
        two_factor_enabled: false,
        first_name: "Olive".to_owned(),
        last_name: "Owner".to_owned(),
        tenant: Some(tenant_a()),
    }
}

pub fn employee(email: &str, password: &str) -> EmployeeIdentity {
    EmployeeIdentity {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        password_hash: hash_password(password).unwrap(),
        tenant: tenant_b(),
        employee_id: Uuid::new_v4(),
        first_name: "Eddie".to_owned(),
        last_name: "Staff".to_owned(),
    }
}

// ── MockOwnerRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockOwnerRepo {
    pub owners: Arc<Mutex<Vec<OwnerIdentity>>>,
}

impl MockOwnerRepo {
    pub fn new(owners: Vec<OwnerIdentity>) -> Self {
        Self {
            owners: Arc::new(Mutex::new(owners)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn count(&self) -> usize {
        self.owners.lock().unwrap().len()
    }
}

impl OwnerRepository for MockOwnerRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<OwnerIdentity>, AuthServiceError> {
        Ok(self
            .owners
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OwnerIdentity>, AuthServiceError> {
        Ok(self
            .owners
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn find_by_provider_subject(
        &self,
        subject: &str,
    ) -> Result<Option<OwnerIdentity>, AuthServiceError> {
        Ok(self
            .owners
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.provider_subject.as_deref() == Some(subject))
            .cloned())
    }

    async fn link_provider_subject(
        &self,
        owner_id: Uuid,
        subject: &str,
    ) -> Result<(), AuthServiceError> {
        let mut owners = self.owners.lock().unwrap();
        if let Some(owner) = owners.iter_mut().find(|o| o.id == owner_id) {
            owner.provider_subject = Some(subject.to_owned());
        }
        Ok(())
    }

    async fn create_with_tenant(
        &self,
        owner: &NewOwnerIdentity,
        tenant: &NewTenant,
    ) -> Result<OwnerIdentity, AuthServiceError> {
        let mut owners = self.owners.lock().unwrap();
        // Mirror the on-conflict-refetch behavior of the real repository.
        if let Some(existing) = owners.iter().find(|o| {
            o.email == owner.email
                || o.provider_subject.as_deref() == Some(owner.provider_subject.as_str())
        }) {
            return Ok(existing.clone());
        }
        let created = OwnerIdentity {
            id: owner.id,
            email: owner.email.clone(),
            password_hash: None,
            provider_subject: Some(owner.provider_subject.clone()),
            role: Role::TenantOwner,
            two_factor_enabled: false,
            first_name: owner.first_name.clone(),
            last_name: owner.last_name.clone(),
            tenant: Some(TenantRef {
                id: tenant.id,
                name: tenant.name.clone(),
            }),
        };
        owners.push(created.clone());
        Ok(created)
    }
}

// ── MockEmployeeRepo ─────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockEmployeeRepo {
    pub employees: Arc<Mutex<Vec<EmployeeIdentity>>>,
}

impl MockEmployeeRepo {
    pub fn new(employees: Vec<EmployeeIdentity>) -> Self {
        Self {
            employees: Arc::new(Mutex::new(employees)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }
}

impl EmployeeRepository for MockEmployeeRepo {
    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<EmployeeIdentity>, AuthServiceError> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.email == email)
            .cloned())
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Body of the last delivered message.
    pub fn last_body(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, body)| body.clone())
    }

    /// Extract the 6-digit code from the last delivered message.
    pub fn last_code(&self) -> Option<String> {
        let body = self.last_body()?;
        body.split_whitespace()
            .find(|word| word.len() >= 6 && word.chars().take(6).all(|c| c.is_ascii_digit()))
            .map(|word| word.chars().take(6).collect())
    }
}

impl Mailer for MockMailer {
    async fn send(&self, to: &str, _subject: &str, body: &str) -> Result<(), AuthServiceError> {
        if self.fail {
            return Err(AuthServiceError::Internal(anyhow::anyhow!(
                "mail relay unavailable"
            )));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_owned(), body.to_owned()));
        Ok(())
    }
}
