//! Endpoint policy derivation. `EndpointPolicy::derive` is the
//! single constructor for this type; backend middleware, OpenAPI `x-*`
//! extensions, and SDK `endpointMeta` all consume the same derived value so
//! the three surfaces can never drift apart. Nothing downstream of `derive`
//! is allowed to recompute a policy field from the raw `Endpoint` a second
//! time.

use ang_ir::Endpoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateLimit {
    pub rps: f64,
    pub burst: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreaker {
    pub threshold: u32,
    pub timeout: String,
    pub half_open_max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryStrategy {
    pub max_attempts: u32,
    pub retry_on_statuses: Vec<u16>,
}

impl RetryStrategy {
    /// The one retry strategy this pipeline ever produces: does
    /// not parametrize it per endpoint, only whether it applies at all.
    pub fn default_strategy() -> Self {
        Self {
            max_attempts: 3,
            retry_on_statuses: vec![429, 502, 503, 504],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointPolicy {
    pub auth_type: Option<String>,
    pub auth_roles: Vec<String>,
    pub permission: Option<String>,
    pub cache_ttl: Option<String>,
    pub timeout: Option<String>,
    pub idempotency: bool,
    pub max_body_size: Option<u64>,
    pub rate_limit: Option<RateLimit>,
    pub circuit_breaker: Option<CircuitBreaker>,
    pub retry_strategy: Option<RetryStrategy>,
    pub required_headers: Vec<String>,
}

/// Fixed middleware construction order. `Cache` and
/// `Idempotency` are independently suppressible (e.g. for WS handlers,
/// which never gate on either) via [`EndpointPolicy::middleware_chain`]'s
/// flags rather than by removing them from this table.
pub const MIDDLEWARE_ORDER: &[&str] = &[
    "MaxBodySize",
    "Auth",
    "RequireRoles",
    "RequirePermission",
    "Cache",
    "RateLimit",
    "CircuitBreaker",
    "Timeout",
    "Idempotency",
];

impl EndpointPolicy {
    pub fn derive(endpoint: &Endpoint) -> Self {
        let has_auth = endpoint.auth.auth_type.is_some();

        let mut required_headers = Vec::new();
        if has_auth {
            required_headers.push("Authorization".to_string());
        }
        if endpoint.idempotent {
            required_headers.push("Idempotency-Key".to_string());
        }

        let retryable = endpoint.idempotent || endpoint.method.eq_ignore_ascii_case("GET");
        let retry_strategy = retryable.then(RetryStrategy::default_strategy);

        Self {
            auth_type: endpoint.auth.auth_type.clone(),
            auth_roles: endpoint.auth.roles.clone(),
            permission: endpoint.auth.permission.clone(),
            cache_ttl: endpoint.cache_ttl.clone(),
            timeout: endpoint.timeout.clone(),
            idempotency: endpoint.idempotent,
            max_body_size: endpoint.max_body_size,
            rate_limit: endpoint.rate_limit.as_ref().map(|r| RateLimit {
                rps: r.rps,
                burst: r.burst,
            }),
            circuit_breaker: endpoint.circuit_breaker.as_ref().map(|c| CircuitBreaker {
                threshold: c.threshold,
                timeout: c.timeout.clone(),
                half_open_max: c.half_open_max,
            }),
            retry_strategy,
            required_headers,
        }
    }

    /// Ordered middleware names that actually apply to this endpoint,
    /// honoring the fixed construction order and the two independent
    /// suppression flags.
    pub fn middleware_chain(&self, suppress_cache: bool, suppress_idempotency: bool) -> Vec<&'static str> {
        MIDDLEWARE_ORDER
            .iter()
            .copied()
            .filter(|&name| match name {
                "Auth" => self.auth_type.is_some(),
                "RequireRoles" => !self.auth_roles.is_empty(),
                "RequirePermission" => self.permission.is_some(),
                "Cache" => !suppress_cache && self.cache_ttl.is_some(),
                "RateLimit" => self.rate_limit.is_some(),
                "CircuitBreaker" => self.circuit_breaker.is_some(),
                "Timeout" => self.timeout.is_some(),
                "Idempotency" => !suppress_idempotency && self.idempotency,
                "MaxBodySize" => true,
                _ => false,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ang_ir::{AuthSpec, Pagination};
    use std::collections::BTreeMap;

    fn endpoint(idempotent: bool, method: &str) -> Endpoint {
        Endpoint {
            method: method.into(),
            path: "/widgets".into(),
            service: "Widgets".into(),
            rpc: "ListWidgets".into(),
            auth: AuthSpec {
                auth_type: Some("bearer".into()),
                roles: vec!["owner".into(), "admin".into()],
                permission: None,
                check: None,
                inject: vec![],
            },
            cache_ttl: Some("24h".into()),
            timeout: Some("30s".into()),
            max_body_size: None,
            idempotent,
            dedupe_key: None,
            rate_limit: None,
            circuit_breaker: None,
            pagination: Pagination::default(),
            slo: None,
            errors: vec![],
            view: None,
            messages: vec![],
            optimistic_update_target: None,
            metadata: BTreeMap::new(),
            source: None,
            invalidates: vec![],
        }
    }

    #[test]
    fn required_headers_add_idempotency_key_when_idempotent() {
        let policy = EndpointPolicy::derive(&endpoint(true, "PATCH"));
        assert_eq!(
            policy.required_headers,
            vec!["Authorization".to_string(), "Idempotency-Key".to_string()]
        );
    }

    #[test]
    fn retry_strategy_applies_to_idempotent_and_get() {
        assert!(EndpointPolicy::derive(&endpoint(true, "PATCH")).retry_strategy.is_some());
        assert!(EndpointPolicy::derive(&endpoint(false, "GET")).retry_strategy.is_some());
        assert!(EndpointPolicy::derive(&endpoint(false, "POST")).retry_strategy.is_none());
    }

    #[test]
    fn s8_scenario_matches_spec_numbers() {
        let mut e = endpoint(true, "PATCH");
        e.rate_limit = None;
        let policy = EndpointPolicy::derive(&e);
        assert_eq!(policy.timeout.as_deref(), Some("30s"));
        assert_eq!(policy.cache_ttl.as_deref(), Some("24h"));
        assert_eq!(policy.auth_roles, vec!["owner", "admin"]);
        assert_eq!(
            policy.retry_strategy,
            Some(RetryStrategy::default_strategy())
        );
        assert_eq!(
            policy.required_headers,
            vec!["Authorization".to_string(), "Idempotency-Key".to_string()]
        );
    }

    #[test]
    fn middleware_chain_respects_fixed_order() {
        let policy = EndpointPolicy::derive(&endpoint(true, "PATCH"));
        let chain = policy.middleware_chain(false, false);
        assert_eq!(
            chain,
            vec!["MaxBodySize", "Auth", "RequireRoles", "Cache", "Timeout", "Idempotency"]
        );
    }
}
