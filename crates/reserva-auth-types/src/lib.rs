//! Auth types shared across Reserva services.
//!
//! Provides JWT claims and validation plus the [`guard::TenantAccess`]
//! extractor — the tenant-isolation boundary every tenant-scoped service
//! mounts on its routes.

pub mod guard;
pub mod token;
