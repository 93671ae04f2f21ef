/// Environment-backed configuration for a Reserva service.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-case
/// env vars (`database_url` ← `DATABASE_URL`). Defaults belong on the fields
/// via `#[serde(default = ...)]`, not in deployment manifests.
///
/// # Panics
///
/// `from_env` panics when a required variable is missing or unparseable —
/// a service with incomplete configuration must not come up.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        match envy::from_env() {
            Ok(config) => config,
            Err(e) => panic!("incomplete service configuration: {e}"),
        }
    }
}
