//! sea-orm entities for the identity tables owned by the auth service.

pub mod employee_identities;
pub mod owner_identities;
pub mod tenants;
