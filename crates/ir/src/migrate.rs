//! Forward migration of older IR schema versions to [`crate::SCHEMA_VERSION`].
//!
//! Migration operates on the untyped `serde_json::Value` so that a payload
//! encoded at any prior version can be upgraded before it is ever decoded
//! into the strongly-typed [`crate::Project`]. Each version step is a pure,
//! total function applied in order; nothing is upgraded in place.

use crate::schema::Project;
use serde_json::Value;
use thiserror::Error;

/// Current schema version produced by this pipeline.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("IR schema version {0} is newer than the current version {SCHEMA_VERSION}")]
    FutureVersion(u32),
    #[error("failed to decode migrated IR: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Upgrades `raw` to [`SCHEMA_VERSION`] and decodes it into a [`Project`].
/// Every planner/emitter call in this pipeline assumes its input has already
/// passed through here.
pub fn migrate_to_current(mut raw: Value) -> Result<Project, MigrateError> {
    let mut version = raw
        .get("ir_version")
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32;

    if version > SCHEMA_VERSION {
        return Err(MigrateError::FutureVersion(version));
    }

    while version < SCHEMA_VERSION {
        raw = match version {
            0 => migrate_v0_to_v1(raw),
            other => unreachable!("no migration step registered for version {other}"),
        };
        version += 1;
    }

    Ok(serde_json::from_value(raw)?)
}

/// v0 predates per-endpoint rate limiting and circuit breaking. Both fields
/// are additive and default to absent; this step only needs to stamp the
/// version forward so later steps (today there are none) know where to pick
/// up.
fn migrate_v0_to_v1(mut raw: Value) -> Value {
    if let Some(obj) = raw.as_object_mut() {
        obj.insert("ir_version".to_string(), Value::from(1));
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_v0() -> Value {
        json!({
            "name": "shop",
            "version": "1.0.0",
            "language": "go_legacy",
            "entities": [],
            "services": [],
            "endpoints": [],
            "repositories": [],
            "events": [],
            "errors": [],
            "schedules": [],
            "rbac": { "roles": {} },
            "notifications": { "channels": { "enabled": [], "default_channels": [] }, "policies": [] }
        })
    }

    #[test]
    fn migrates_v0_without_rate_limit_fields() {
        let project = migrate_to_current(minimal_v0()).expect("migration succeeds");
        assert_eq!(project.ir_version, SCHEMA_VERSION);
        assert_eq!(project.name, "shop");
    }

    #[test]
    fn current_version_round_trips_unchanged() {
        let mut v1 = minimal_v0();
        v1.as_object_mut()
            .unwrap()
            .insert("ir_version".to_string(), json!(1));
        let project = migrate_to_current(v1).expect("already current");
        assert_eq!(project.ir_version, SCHEMA_VERSION);
    }

    #[test]
    fn rejects_future_version() {
        let mut future = minimal_v0();
        future
            .as_object_mut()
            .unwrap()
            .insert("ir_version".to_string(), json!(99));
        let err = migrate_to_current(future).unwrap_err();
        assert!(matches!(err, MigrateError::FutureVersion(99)));
    }
}
