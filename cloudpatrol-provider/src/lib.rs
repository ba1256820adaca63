//! AWS provider core for CloudPatrol:
//! - Audit context assembly (sessions, partition, region scope)
//! - Role assumption with optional MFA
//! - Partition and region resolution
//! - Service-region catalog and per-region client construction
//!
//! Compliance checks and report generators live in sibling crates and consume
//! this one through [`AuditContext`] and the regional client factory.

pub mod arn;
pub mod catalog;
pub mod clients;
pub mod context;
pub mod credentials;
pub mod identity;
pub mod partition;
pub mod regions;

// Re-exports for a small, focused public API
pub use catalog::{CatalogError, ServiceRegionCatalog};
pub use clients::{
    checked_regional_clients, regional_clients, regional_configs, RegionalClientMap,
};
pub use context::{AuditContext, AuditContextBuilder};
pub use credentials::{
    assume_role, session_from_credentials, AssumedRoleInfo, AuthenticationError, MfaToken,
    MfaTokenPrompt, ResolvedCredentials, TerminalMfaPrompt, ASSESSMENT_SESSION_NAME,
};
pub use identity::resolve_caller_identity;
pub use partition::{Partition, UnknownPartitionError};
pub use regions::{default_region, global_region, STANDARD_DEFAULT_REGION};
