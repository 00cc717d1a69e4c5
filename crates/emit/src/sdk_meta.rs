//! SDK-facing endpoint metadata. Backend middleware and `endpoints.ts` must
//! describe the same endpoint the same way — this module is the other half
//! of [`crate::openapi`]'s policy projection, sharing the same
//! [`EndpointPolicy`] input.

use ang_ir::Endpoint;
use ang_policy::EndpointPolicy;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointMeta {
    pub name: String,
    pub method: String,
    pub path: String,
    pub idempotent: bool,
    pub timeout: Option<String>,
    pub auth_roles: Vec<String>,
    pub cache_ttl: Option<String>,
    pub retry_strategy: Option<Value>,
    pub required_headers: Vec<String>,
    pub invalidates: Vec<InvalidateEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidateEntry {
    pub query_key: String,
    pub scope_param: Option<String>,
    pub mode: String,
}

pub fn endpoint_meta(endpoint: &Endpoint, policy: &EndpointPolicy) -> EndpointMeta {
    EndpointMeta {
        name: endpoint.rpc.clone(),
        method: endpoint.method.clone(),
        path: endpoint.path.clone(),
        idempotent: policy.idempotency,
        timeout: policy.timeout.clone(),
        auth_roles: policy.auth_roles.clone(),
        cache_ttl: policy.cache_ttl.clone(),
        retry_strategy: policy
            .retry_strategy
            .as_ref()
            .map(|r| serde_json::to_value(r).expect("RetryStrategy always serializes")),
        required_headers: policy.required_headers.clone(),
        invalidates: invalidate_entries(endpoint),
    }
}

fn path_params(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|segment| {
            segment
                .strip_prefix(':')
                .or_else(|| segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
        })
        .map(|s| s.to_string())
        .collect()
}

/// Derives `scopeParam`/`mode` for each invalidation target from this
/// endpoint's own path: the last path parameter scopes the invalidation to
/// a single resource (`mode: "detail"`); an endpoint with no path
/// parameter invalidates the whole collection (`mode: "list"`).
fn invalidate_entries(endpoint: &Endpoint) -> Vec<InvalidateEntry> {
    let params = path_params(&endpoint.path);
    let scope_param = params.last().cloned();
    let mode = if scope_param.is_some() { "detail" } else { "list" };

    endpoint
        .invalidates
        .iter()
        .map(|query_key| InvalidateEntry {
            query_key: query_key.clone(),
            scope_param: scope_param.clone(),
            mode: mode.to_string(),
        })
        .collect()
}
