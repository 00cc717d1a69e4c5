//! OpenAPI `x-*` extension projection. The only place allowed to turn an
//! [`EndpointPolicy`] into OpenAPI vendor extensions — every emitter that
//! needs these fields calls through here instead of recomputing them.

use ang_policy::EndpointPolicy;
use serde_json::{json, Value};

pub fn endpoint_extensions(policy: &EndpointPolicy) -> Value {
    let mut ext = serde_json::Map::new();

    ext.insert("x-idempotency".to_string(), json!(policy.idempotency));
    if let Some(timeout) = &policy.timeout {
        ext.insert("x-timeout".to_string(), json!(timeout));
    }
    if let Some(cache_ttl) = &policy.cache_ttl {
        ext.insert("x-cache-ttl".to_string(), json!(cache_ttl));
    }
    if !policy.auth_roles.is_empty() {
        ext.insert("x-auth-roles".to_string(), json!(policy.auth_roles));
    }
    if let Some(rate_limit) = &policy.rate_limit {
        ext.insert(
            "x-rate-limit".to_string(),
            json!({"rps": rate_limit.rps, "burst": rate_limit.burst}),
        );
    }

    Value::Object(ext)
}

/// Maps a field's `validate_tag` (e.g. `"minLength=3,format=email"`) onto
/// OpenAPI 3 schema keywords.
pub fn validate_tag_to_schema(tag: &str) -> serde_json::Map<String, Value> {
    let mut schema = serde_json::Map::new();
    for clause in tag.split(',') {
        let clause = clause.trim();
        let Some((key, value)) = clause.split_once('=') else { continue };
        match key {
            "minLength" => schema.insert("minLength".into(), json!(value.parse::<u64>().unwrap_or(0))),
            "maxLength" => schema.insert("maxLength".into(), json!(value.parse::<u64>().unwrap_or(0))),
            "minimum" => schema.insert("minimum".into(), json!(value.parse::<f64>().unwrap_or(0.0))),
            "maximum" => schema.insert("maximum".into(), json!(value.parse::<f64>().unwrap_or(0.0))),
            "format" if value == "email" => schema.insert("format".into(), json!("email")),
            "format" if value == "uri" => schema.insert("format".into(), json!("uri")),
            _ => None,
        };
    }
    schema
}
