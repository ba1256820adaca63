//! Partition and region resolution.
//!
//! Both functions are total: whatever the audit configuration looks like,
//! checks can always obtain a region to operate against.

use crate::context::AuditContext;
use crate::partition::Partition;

/// Default region of the standard partition, and the final fallback of
/// [`default_region`].
pub const STANDARD_DEFAULT_REGION: &str = "us-east-1";

/// The single canonical region through which inherently-global services are
/// addressed in the given partition.
///
/// This is a closed lookup table, not inferred from the region catalog.
pub const fn global_region(partition: Partition) -> &'static str {
    match partition {
        Partition::AwsUsGov => "us-gov-east-1",
        Partition::AwsCn => "cn-north-1",
        Partition::AwsIso => "aws-iso-global",
        Partition::AwsIsoB => "aws-iso-b-global",
        Partition::Aws => STANDARD_DEFAULT_REGION,
    }
}

/// The default operating region for the audit.
///
/// The profile region wins when it is inside the audited scope; otherwise the
/// first audited region (operator order is authoritative); otherwise the
/// standard default region. The last fallback is deliberately not the
/// partition-specific global region: that one is reserved for global services.
pub fn default_region(context: &AuditContext) -> &str {
    let audited = context.audited_regions();
    if let Some(profile_region) = context.profile_region() {
        if audited.iter().any(|region| region == profile_region) {
            return profile_region;
        }
    }
    match audited.first() {
        Some(first) => first,
        None => STANDARD_DEFAULT_REGION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AuditContext;
    use aws_config::SdkConfig;

    fn context(
        partition: Partition,
        audited_regions: &[&str],
        profile_region: Option<&str>,
    ) -> AuditContext {
        let mut builder = AuditContext::builder(SdkConfig::builder().build(), partition)
            .audited_regions(audited_regions.iter().map(ToString::to_string));
        if let Some(region) = profile_region {
            builder = builder.profile_region(region);
        }
        builder.build()
    }

    #[test]
    fn test_global_region_gov() {
        assert_eq!(global_region(Partition::AwsUsGov), "us-gov-east-1");
    }

    #[test]
    fn test_global_region_cn() {
        assert_eq!(global_region(Partition::AwsCn), "cn-north-1");
    }

    #[test]
    fn test_global_region_iso() {
        assert_eq!(global_region(Partition::AwsIso), "aws-iso-global");
        assert_eq!(global_region(Partition::AwsIsoB), "aws-iso-b-global");
    }

    #[test]
    fn test_global_region_standard() {
        assert_eq!(global_region(Partition::Aws), "us-east-1");
    }

    #[test]
    fn test_global_region_is_stable() {
        for partition in [Partition::Aws, Partition::AwsCn, Partition::AwsUsGov] {
            assert_eq!(global_region(partition), global_region(partition));
        }
    }

    #[test]
    fn test_default_region_prefers_audited_profile_region() {
        let ctx = context(
            Partition::Aws,
            &["eu-west-1", "us-east-1"],
            Some("us-east-1"),
        );
        assert_eq!(default_region(&ctx), "us-east-1");
    }

    #[test]
    fn test_default_region_skips_profile_region_outside_scope() {
        let ctx = context(Partition::Aws, &["eu-west-1"], Some("us-east-2"));
        assert_eq!(default_region(&ctx), "eu-west-1");
    }

    #[test]
    fn test_default_region_first_audited_without_profile_region() {
        let ctx = context(Partition::Aws, &["eu-west-1", "eu-west-2"], None);
        assert_eq!(default_region(&ctx), "eu-west-1");
    }

    #[test]
    fn test_default_region_falls_back_to_standard_default() {
        let ctx = context(Partition::Aws, &[], None);
        assert_eq!(default_region(&ctx), "us-east-1");

        // Still the standard default in other partitions; the global marker
        // regions are not a service fallback.
        let gov = context(Partition::AwsUsGov, &[], None);
        assert_eq!(default_region(&gov), "us-east-1");
    }

    #[test]
    fn test_default_region_ignores_profile_region_with_empty_scope() {
        let ctx = context(Partition::Aws, &[], Some("eu-central-1"));
        assert_eq!(default_region(&ctx), "us-east-1");
    }
}
