use sea_orm::DatabaseConnection;

use reserva_auth_types::guard::JwtSecretProvider;

use crate::infra::challenge::InMemoryChallengeStore;
use crate::infra::db::{DbEmployeeRepository, DbOwnerRepository};
use crate::infra::mailer::HttpMailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub challenges: InMemoryChallengeStore,
    pub mailer: HttpMailer,
    pub jwt_secret: String,
    pub web_app_url: String,
    pub session_ttl_secs: u64,
}

impl AppState {
    pub fn owner_repo(&self) -> DbOwnerRepository {
        DbOwnerRepository {
            db: self.db.clone(),
        }
    }

    pub fn employee_repo(&self) -> DbEmployeeRepository {
        DbEmployeeRepository {
            db: self.db.clone(),
        }
    }
}

impl JwtSecretProvider for AppState {
    fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}
