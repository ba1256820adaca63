//! The audit context: session, credentials, partition, and region scope.
//!
//! An [`AuditContext`] is assembled once by the configuration layer, optionally
//! upgraded with assumed-role credentials, and then shared read-only with every
//! downstream consumer. There is no ambient "current session": everything that
//! needs the context receives it explicitly.

use aws_config::SdkConfig;

use crate::credentials::{
    assume_role, session_from_credentials, AssumedRoleInfo, AuthenticationError, MfaTokenPrompt,
    ResolvedCredentials,
};
use crate::partition::Partition;

/// Aggregate state for a single audit run.
///
/// Mutable only during setup ([`AuditContext::activate_assumed_role`] and
/// identity resolution); read-only afterward.
pub struct AuditContext {
    original_session: SdkConfig,
    audit_session: SdkConfig,
    assumed_role_info: Option<AssumedRoleInfo>,
    credentials: Option<ResolvedCredentials>,
    partition: Partition,
    audited_regions: Vec<String>,
    profile: Option<String>,
    profile_region: Option<String>,
    account: Option<String>,
    account_arn: Option<String>,
    identity_arn: Option<String>,
    user_id: Option<String>,
    mfa_enabled: bool,
}

impl AuditContext {
    /// Start building a context from the operator-supplied base session.
    pub fn builder(original_session: SdkConfig, partition: Partition) -> AuditContextBuilder {
        AuditContextBuilder {
            original_session,
            partition,
            assumed_role_info: None,
            audited_regions: Vec::new(),
            profile: None,
            profile_region: None,
            mfa_enabled: false,
        }
    }

    /// The caller-supplied base session, as configured by the operator.
    pub fn original_session(&self) -> &SdkConfig {
        &self.original_session
    }

    /// The session used to make API calls: the assumed-role session once a
    /// role has been activated, the original session otherwise.
    pub fn audit_session(&self) -> &SdkConfig {
        &self.audit_session
    }

    /// Role to assume for this run, if the operator requested one.
    pub fn assumed_role_info(&self) -> Option<&AssumedRoleInfo> {
        self.assumed_role_info.as_ref()
    }

    /// Temporary credentials the audit runs under; present iff a role has
    /// been activated.
    pub fn credentials(&self) -> Option<&ResolvedCredentials> {
        self.credentials.as_ref()
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    /// Ordered, deduplicated region scope for this run. Empty means no
    /// explicit restriction.
    pub fn audited_regions(&self) -> &[String] {
        &self.audited_regions
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn profile_region(&self) -> Option<&str> {
        self.profile_region.as_deref()
    }

    /// Audited account id, once resolved.
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Audited account root ARN, once resolved.
    pub fn account_arn(&self) -> Option<&str> {
        self.account_arn.as_deref()
    }

    /// ARN of the effective audit identity, once resolved.
    pub fn identity_arn(&self) -> Option<&str> {
        self.identity_arn.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Whether the caller's own identity requires MFA. Distinct from role MFA,
    /// which lives on [`AssumedRoleInfo`].
    pub fn mfa_enabled(&self) -> bool {
        self.mfa_enabled
    }

    /// Exchange the base session for assumed-role credentials and switch the
    /// audit session over to them.
    ///
    /// Runs the exchange at most once per context; must complete before any
    /// regional clients are built, since clients close over the audit session.
    /// A context without role info is left untouched.
    pub async fn activate_assumed_role(
        &mut self,
        mfa_prompt: &dyn MfaTokenPrompt,
    ) -> Result<(), AuthenticationError> {
        let Some(role_info) = self.assumed_role_info.clone() else {
            log::debug!("no role to assume; auditing with the original session");
            return Ok(());
        };

        let credentials = assume_role(&self.original_session, &role_info, mfa_prompt).await?;
        log::info!(
            "assumed role {} as {}",
            role_info.role_arn,
            credentials.assumed_role_arn
        );

        self.audit_session = session_from_credentials(&self.original_session, &credentials);
        self.credentials = Some(credentials);
        Ok(())
    }

    pub(crate) fn set_identity(
        &mut self,
        account: String,
        account_arn: String,
        identity_arn: String,
        user_id: String,
    ) {
        self.account = Some(account);
        self.account_arn = Some(account_arn);
        self.identity_arn = Some(identity_arn);
        self.user_id = Some(user_id);
    }
}

/// Builder for [`AuditContext`], used by the configuration layer.
pub struct AuditContextBuilder {
    original_session: SdkConfig,
    partition: Partition,
    assumed_role_info: Option<AssumedRoleInfo>,
    audited_regions: Vec<String>,
    profile: Option<String>,
    profile_region: Option<String>,
    mfa_enabled: bool,
}

impl AuditContextBuilder {
    /// Restrict the run to the given regions. Order is preserved as supplied;
    /// duplicates are dropped.
    pub fn audited_regions(mut self, regions: impl IntoIterator<Item = String>) -> Self {
        for region in regions {
            if !self.audited_regions.contains(&region) {
                self.audited_regions.push(region);
            }
        }
        self
    }

    pub fn assumed_role(mut self, role_info: AssumedRoleInfo) -> Self {
        self.assumed_role_info = Some(role_info);
        self
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn profile_region(mut self, region: impl Into<String>) -> Self {
        self.profile_region = Some(region.into());
        self
    }

    pub fn mfa_enabled(mut self, enabled: bool) -> Self {
        self.mfa_enabled = enabled;
        self
    }

    pub fn build(self) -> AuditContext {
        AuditContext {
            audit_session: self.original_session.clone(),
            original_session: self.original_session,
            assumed_role_info: self.assumed_role_info,
            credentials: None,
            partition: self.partition,
            audited_regions: self.audited_regions,
            profile: self.profile,
            profile_region: self.profile_region,
            account: None,
            account_arn: None,
            identity_arn: None,
            user_id: None,
            mfa_enabled: self.mfa_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_session() -> SdkConfig {
        SdkConfig::builder().build()
    }

    #[test]
    fn test_builder_defaults() {
        let ctx = AuditContext::builder(base_session(), Partition::Aws).build();

        assert_eq!(ctx.partition(), Partition::Aws);
        assert!(ctx.audited_regions().is_empty());
        assert!(ctx.profile().is_none());
        assert!(ctx.profile_region().is_none());
        assert!(ctx.assumed_role_info().is_none());
        assert!(ctx.credentials().is_none());
        assert!(ctx.account().is_none());
        assert!(!ctx.mfa_enabled());
    }

    #[test]
    fn test_audited_regions_preserve_order_and_dedup() {
        let ctx = AuditContext::builder(base_session(), Partition::Aws)
            .audited_regions(
                ["eu-west-1", "us-east-1", "eu-west-1", "us-east-2"]
                    .into_iter()
                    .map(String::from),
            )
            .build();

        assert_eq!(
            ctx.audited_regions(),
            &["eu-west-1", "us-east-1", "us-east-2"]
        );
    }

    #[test]
    fn test_audit_session_starts_as_original_session() {
        let ctx = AuditContext::builder(base_session(), Partition::AwsCn).build();
        // Both sessions carry the same (empty) configuration until a role is
        // activated.
        assert!(ctx.audit_session().region().is_none());
        assert!(ctx.original_session().region().is_none());
        assert!(ctx.credentials().is_none());
    }

    #[tokio::test]
    async fn test_activate_without_role_is_a_no_op() {
        use crate::credentials::MfaToken;

        struct PanickingPrompt;
        impl MfaTokenPrompt for PanickingPrompt {
            fn prompt(&self, _role_info: &AssumedRoleInfo) -> Result<MfaToken, AuthenticationError> {
                panic!("prompt must not run without a role");
            }
        }

        let mut ctx = AuditContext::builder(base_session(), Partition::Aws).build();
        ctx.activate_assumed_role(&PanickingPrompt).await.unwrap();
        assert!(ctx.credentials().is_none());
    }

    #[test]
    fn test_set_identity_populates_all_fields() {
        let mut ctx = AuditContext::builder(base_session(), Partition::Aws).build();
        ctx.set_identity(
            "123456789012".to_string(),
            "arn:aws:iam::123456789012:root".to_string(),
            "arn:aws:iam::123456789012:user/auditor".to_string(),
            "AIDAEXAMPLEUSERID".to_string(),
        );

        assert_eq!(ctx.account(), Some("123456789012"));
        assert_eq!(ctx.account_arn(), Some("arn:aws:iam::123456789012:root"));
        assert_eq!(
            ctx.identity_arn(),
            Some("arn:aws:iam::123456789012:user/auditor")
        );
        assert_eq!(ctx.user_id(), Some("AIDAEXAMPLEUSERID"));
    }
}
