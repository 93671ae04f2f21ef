//! Login orchestration and identity resolution.
//!
//! A single email may identify an owner identity and an employee identity at
//! the same time (independent namespaces). Resolution is explicit: when both
//! exist and no hint was given, the caller gets a disambiguation payload
//! instead of a silently picked account.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::repository::{ChallengeStore, EmployeeRepository, Mailer, OwnerRepository};
use crate::domain::types::{
    EmployeeIdentity, OwnerIdentity, PrincipalType, Role, mask_email,
};
use crate::error::AuthServiceError;
use crate::password::verify_password;
use crate::usecase::token::{issue_employee_session, issue_owner_session, issue_pending_token};

/// Internal denial reason — logged for support, never returned to the caller.
/// External responses collapse to two generic messages so neither the failing
/// factor nor the existence of an email can be probed.
#[derive(Debug, Clone, Copy)]
enum DenyReason {
    UnknownPrincipal,
    BadPassword,
    InvalidCode,
    NoBusiness,
}

fn deny(reason: DenyReason) -> AuthServiceError {
    tracing::debug!(?reason, "login denied");
    match reason {
        DenyReason::InvalidCode => AuthServiceError::InvalidCode,
        _ => AuthServiceError::InvalidCredentials,
    }
}

pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub second_factor_code: Option<String>,
    pub principal_type_hint: Option<PrincipalType>,
}

/// One selectable account in the disambiguation payload. Both options are
/// always offered — `password_valid` lets the UI pre-filter or warn, but a
/// user with two accounts and two different passwords must be able to choose
/// either.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOption {
    #[serde(rename = "type")]
    pub principal_type: PrincipalType,
    pub label: String,
    pub business_name: Option<String>,
    /// Masked — the caller has not proven control of this account yet.
    pub email: String,
    pub password_valid: bool,
}

/// Principal payload returned alongside a fresh session token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalPayload {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub tenant_id: Option<String>,
    pub tenant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<Uuid>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub principal_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBundle {
    pub session_token: String,
    pub principal: PrincipalPayload,
}

#[derive(Debug)]
pub enum LoginOutcome {
    /// Both principals exist and at least one password matched; the caller
    /// must pick. This is a successful response, not an error.
    Disambiguation(Vec<ProfileOption>),
    /// Password accepted, second factor outstanding.
    ChallengeRequired { pending_token: String, message: String },
    Session(SessionBundle),
}

enum Target {
    Owner(OwnerIdentity),
    Employee(EmployeeIdentity),
}

/// Issue a session for a validated owner, enforcing the tenant association
/// rule: a non-superuser owner without a business is denied.
pub(crate) fn owner_session_bundle(
    owner: &OwnerIdentity,
    secret: &str,
    ttl_secs: u64,
) -> Result<SessionBundle, AuthServiceError> {
    if owner.tenant.is_none() && owner.role != Role::SuperAdmin {
        return Err(deny(DenyReason::NoBusiness));
    }
    let (session_token, _exp) = issue_owner_session(owner, secret, ttl_secs)?;
    Ok(SessionBundle {
        session_token,
        principal: PrincipalPayload {
            id: owner.id,
            email: owner.email.clone(),
            first_name: owner.first_name.clone(),
            last_name: owner.last_name.clone(),
            role: owner.role,
            tenant_id: owner.tenant.as_ref().map(|t| t.id.to_string()),
            tenant: owner.tenant.as_ref().map(|t| t.name.clone()),
            employee_id: None,
            principal_type: None,
        },
    })
}

fn employee_session_bundle(
    employee: &EmployeeIdentity,
    secret: &str,
    ttl_secs: u64,
) -> Result<SessionBundle, AuthServiceError> {
    let (session_token, _exp) = issue_employee_session(employee, secret, ttl_secs)?;
    Ok(SessionBundle {
        session_token,
        principal: PrincipalPayload {
            id: employee.id,
            email: employee.email.clone(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            role: Role::Employee,
            tenant_id: Some(employee.tenant.id.to_string()),
            tenant: Some(employee.tenant.name.clone()),
            employee_id: Some(employee.employee_id),
            principal_type: Some("employee".to_owned()),
        },
    })
}

fn owner_profile(owner: &OwnerIdentity, password_valid: bool) -> ProfileOption {
    ProfileOption {
        principal_type: PrincipalType::Owner,
        label: format!("{} {}", owner.first_name, owner.last_name),
        business_name: owner.tenant.as_ref().map(|t| t.name.clone()),
        email: mask_email(&owner.email),
        password_valid,
    }
}

fn employee_profile(employee: &EmployeeIdentity, password_valid: bool) -> ProfileOption {
    ProfileOption {
        principal_type: PrincipalType::Employee,
        label: format!("{} {}", employee.first_name, employee.last_name),
        business_name: Some(employee.tenant.name.clone()),
        email: mask_email(&employee.email),
        password_valid,
    }
}

pub struct LoginUseCase<O, E, C, M>
where
    O: OwnerRepository,
    E: EmployeeRepository,
    C: ChallengeStore,
    M: Mailer,
{
    pub owners: O,
    pub employees: E,
    pub challenges: C,
    pub mailer: M,
    pub jwt_secret: String,
    pub session_ttl_secs: u64,
}

impl<O, E, C, M> LoginUseCase<O, E, C, M>
where
    O: OwnerRepository,
    E: EmployeeRepository,
    C: ChallengeStore,
    M: Mailer,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutcome, AuthServiceError> {
        // 1. Both namespaces looked up concurrently.
        let (owner, employee) = tokio::join!(
            self.owners.find_by_email(&input.email),
            self.employees.find_active_by_email(&input.email)
        );
        let (owner, employee) = (owner?, employee?);

        // 2. Both exist, no hint: verify against both hashes independently and
        //    let the caller pick.
        let target = match (owner, employee, input.principal_type_hint) {
            (None, None, _) => return Err(deny(DenyReason::UnknownPrincipal)),
            (Some(owner), Some(employee), None) => {
                let owner_ok = verify_password(&input.password, owner.password_hash.as_deref());
                let employee_ok =
                    verify_password(&input.password, Some(&employee.password_hash));
                if !owner_ok && !employee_ok {
                    return Err(deny(DenyReason::BadPassword));
                }
                return Ok(LoginOutcome::Disambiguation(vec![
                    owner_profile(&owner, owner_ok),
                    employee_profile(&employee, employee_ok),
                ]));
            }
            // 3. Hint supplied or only one namespace matched.
            (Some(owner), _, Some(PrincipalType::Owner) | None) => Target::Owner(owner),
            (_, Some(employee), Some(PrincipalType::Employee) | None) => {
                Target::Employee(employee)
            }
            // Hint names a principal that does not exist for this email.
            _ => return Err(deny(DenyReason::UnknownPrincipal)),
        };

        match target {
            Target::Employee(employee) => {
                if !verify_password(&input.password, Some(&employee.password_hash)) {
                    return Err(deny(DenyReason::BadPassword));
                }
                Ok(LoginOutcome::Session(employee_session_bundle(
                    &employee,
                    &self.jwt_secret,
                    self.session_ttl_secs,
                )?))
            }
            Target::Owner(owner) => {
                if !verify_password(&input.password, owner.password_hash.as_deref()) {
                    return Err(deny(DenyReason::BadPassword));
                }
                // 4./5. Second factor for owners that enabled it.
                if owner.two_factor_enabled {
                    match input.second_factor_code.as_deref() {
                        None => return self.begin_second_factor(&owner).await,
                        Some(code) => {
                            if !self.challenges.verify(owner.id, code).await? {
                                return Err(deny(DenyReason::InvalidCode));
                            }
                        }
                    }
                }
                // 6. Tenant association rule (inside owner_session_bundle).
                Ok(LoginOutcome::Session(owner_session_bundle(
                    &owner,
                    &self.jwt_secret,
                    self.session_ttl_secs,
                )?))
            }
        }
    }

    /// Issue and deliver a challenge, mint a pending token. Delivery failure
    /// is reported in the message but does not invalidate the stored code.
    async fn begin_second_factor(
        &self,
        owner: &OwnerIdentity,
    ) -> Result<LoginOutcome, AuthServiceError> {
        let code = self.challenges.issue(owner.id).await?;
        let message = match self
            .mailer
            .send(
                &owner.email,
                "Your verification code",
                &format!("Your verification code is {code}. It expires in 10 minutes."),
            )
            .await
        {
            Ok(()) => "A verification code has been sent to your email".to_owned(),
            Err(e) => {
                tracing::warn!(error = %e, principal = %owner.id, "code delivery failed");
                "A verification code was issued but could not be delivered; \
                 retry to request a new one"
                    .to_owned()
            }
        };
        let pending_token = issue_pending_token(owner.id, &owner.email, &self.jwt_secret)?;
        Ok(LoginOutcome::ChallengeRequired {
            pending_token,
            message,
        })
    }
}
