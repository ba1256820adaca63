//! Regional client construction.
//!
//! For a given service the factory produces one client per in-scope,
//! service-supporting region, all bound to the audit session. Clients are
//! produced fresh per call and owned by the caller; nothing is cached here.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use aws_config::{Region, SdkConfig};
use futures::StreamExt;

use crate::catalog::ServiceRegionCatalog;
use crate::context::AuditContext;
use crate::regions::default_region;

/// Region identifier → client handle, keys a subset of the audited scope (or
/// exactly one key for a global service).
pub type RegionalClientMap<C> = HashMap<String, C>;

/// Upper bound on concurrently-running client constructors in
/// [`checked_regional_clients`].
const CLIENT_POOL_WIDTH: usize = 8;

fn candidate_regions(
    catalog: &ServiceRegionCatalog,
    service: &str,
    context: &AuditContext,
    global_service: bool,
) -> Vec<String> {
    if global_service {
        vec![default_region(context).to_string()]
    } else if context.audited_regions().is_empty() {
        catalog
            .regions_for(service, context.partition())
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    } else {
        context.audited_regions().to_vec()
    }
}

/// One audit-session `SdkConfig` per in-scope region supporting `service`.
///
/// A global service gets a single entry for its default region. A service with
/// no catalog entry for the partition yields an empty map: nothing to audit
/// there, not an error.
pub fn regional_configs(
    catalog: &ServiceRegionCatalog,
    service: &str,
    context: &AuditContext,
    global_service: bool,
) -> RegionalClientMap<SdkConfig> {
    let Some(supported) = catalog.regions_for(service, context.partition()) else {
        log::debug!(
            "{service} has no regions in partition {}; nothing to audit",
            context.partition()
        );
        return HashMap::new();
    };

    candidate_regions(catalog, service, context, global_service)
        .into_iter()
        .filter(|region| supported.contains(region))
        .map(|region| {
            let config = context
                .audit_session()
                .to_builder()
                .region(Region::new(region.clone()))
                .build();
            (region, config)
        })
        .collect()
}

/// Build one client per in-scope region with the caller-supplied constructor.
///
/// Construction is side-effect-free; no network traffic happens here.
pub fn regional_clients<C>(
    catalog: &ServiceRegionCatalog,
    service: &str,
    context: &AuditContext,
    global_service: bool,
    build: impl Fn(&SdkConfig) -> C,
) -> RegionalClientMap<C> {
    regional_configs(catalog, service, context, global_service)
        .into_iter()
        .map(|(region, config)| {
            let client = build(&config);
            (region, client)
        })
        .collect()
}

/// Like [`regional_clients`], for constructors that validate eagerly.
///
/// Constructors run concurrently under a bounded pool. Each region is
/// isolated: a failing constructor is logged and its region omitted from the
/// result, without cancelling the others.
pub async fn checked_regional_clients<C, E, F, Fut>(
    catalog: &ServiceRegionCatalog,
    service: &str,
    context: &AuditContext,
    global_service: bool,
    build: F,
) -> RegionalClientMap<C>
where
    F: Fn(String, SdkConfig) -> Fut,
    Fut: Future<Output = Result<C, E>>,
    E: fmt::Display,
{
    let configs = regional_configs(catalog, service, context, global_service);
    if configs.is_empty() {
        return HashMap::new();
    }
    let width = CLIENT_POOL_WIDTH.min(configs.len());

    futures::stream::iter(configs.into_iter().map(|(region, config)| {
        let construction = build(region.clone(), config);
        async move { (region, construction.await) }
    }))
    .buffer_unordered(width)
    .filter_map(|(region, result)| async move {
        match result {
            Ok(client) => Some((region, client)),
            Err(err) => {
                log::warn!("skipping region {region} for {service}: {err}");
                None
            }
        }
    })
    .collect()
    .await
}
