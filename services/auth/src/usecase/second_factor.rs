//! Second-factor completion: pending token + emailed code → full session.

use crate::domain::repository::{ChallengeStore, OwnerRepository};
use crate::error::AuthServiceError;
use crate::usecase::login::{SessionBundle, owner_session_bundle};
use crate::usecase::token::verify_pending;

pub struct VerifySecondFactorInput {
    pub pending_token: String,
    pub code: String,
}

pub struct VerifySecondFactorUseCase<O, C>
where
    O: OwnerRepository,
    C: ChallengeStore,
{
    pub owners: O,
    pub challenges: C,
    pub jwt_secret: String,
    pub session_ttl_secs: u64,
}

impl<O, C> VerifySecondFactorUseCase<O, C>
where
    O: OwnerRepository,
    C: ChallengeStore,
{
    pub async fn execute(
        &self,
        input: VerifySecondFactorInput,
    ) -> Result<SessionBundle, AuthServiceError> {
        // Signature + expiry + the pending_2fa discriminant.
        let (principal_id, _email) = verify_pending(&input.pending_token, &self.jwt_secret)?;

        // Atomic verify-and-consume; the challenge is the single-use gate.
        if !self.challenges.verify(principal_id, &input.code).await? {
            return Err(AuthServiceError::InvalidCode);
        }

        // Claims come from the identity record, not the pending token: the
        // record may have changed since the password check.
        let owner = self
            .owners
            .find_by_id(principal_id)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        owner_session_bundle(&owner, &self.jwt_secret, self.session_ttl_secs)
    }
}
