//! `ang-manifest.json` / `sdk-manifest.json` projection. Every
//! collection is sorted before serialization — manifests must be as
//! deterministic as any other emitted artifact.

use crate::sdk_meta::{endpoint_meta, EndpointMeta};
use ang_ir::{Endpoint, Project};
use ang_policy::EndpointPolicy;
use itertools::Itertools;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ServiceManifestEntry {
    pub name: String,
    pub methods: Vec<String>,
    pub publishes: Vec<String>,
    pub subscribes: Vec<String>,
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventManifestEntry {
    pub name: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub project: String,
    pub entities: Vec<String>,
    pub services: Vec<ServiceManifestEntry>,
    pub events: Vec<EventManifestEntry>,
}

pub fn build_manifest(project: &Project) -> Manifest {
    let mut entities: Vec<String> = project.entities.iter().map(|e| e.name.to_string()).collect();
    entities.sort();

    let mut services: Vec<ServiceManifestEntry> = project
        .services
        .iter()
        .map(|s| {
            let mut methods: Vec<String> = s.methods.iter().map(|m| m.name.clone()).collect();
            methods.sort();
            let mut publishes: Vec<String> = s.publishes.iter().map(|e| e.to_string()).collect();
            publishes.sort();
            let mut subscribes: Vec<String> = s.subscribes.keys().map(|e| e.to_string()).collect();
            subscribes.sort();

            let mut depends_on: Vec<String> = s.uses.iter().map(|u| u.to_string()).collect();
            if s.requires.sql {
                depends_on.push("sql".to_string());
            }
            if s.requires.mongo {
                depends_on.push("mongo".to_string());
            }
            if s.requires.redis {
                depends_on.push("redis".to_string());
            }
            if s.requires.nats {
                depends_on.push("nats".to_string());
            }
            if s.requires.s3 {
                depends_on.push("s3".to_string());
            }
            depends_on.sort();

            ServiceManifestEntry {
                name: s.name.to_string(),
                methods,
                publishes,
                subscribes,
                depends_on,
            }
        })
        .collect();
    services.sort_by(|a, b| a.name.cmp(&b.name));

    let mut events: Vec<EventManifestEntry> = project
        .events
        .iter()
        .map(|e| {
            let mut fields: Vec<String> = e.fields.iter().map(|f| f.name.to_string()).collect();
            fields.sort();
            EventManifestEntry {
                name: e.name.to_string(),
                fields,
            }
        })
        .collect();
    events.sort_by(|a, b| a.name.cmp(&b.name));

    Manifest {
        project: project.name.clone(),
        entities,
        services,
        events,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SdkManifest {
    pub endpoints: Vec<EndpointMeta>,
    pub query_keys: Vec<String>,
    pub query_options: Vec<String>,
}

pub fn build_sdk_manifest(endpoints: &[(Endpoint, EndpointPolicy)]) -> SdkManifest {
    let entries: Vec<EndpointMeta> = endpoints
        .iter()
        .map(|(e, p)| endpoint_meta(e, p))
        .sorted_by_key(|m| (m.method.clone(), m.path.clone()))
        .collect();

    let mut query_keys: Vec<String> = endpoints
        .iter()
        .filter(|(e, _)| e.method == "GET")
        .map(|(e, _)| e.rpc.clone())
        .collect();
    query_keys.sort();
    query_keys.dedup();

    let mut query_options: Vec<String> = query_keys.iter().map(|k| format!("{k}Options")).collect();
    query_options.sort();

    SdkManifest {
        endpoints: entries,
        query_keys,
        query_options,
    }
}
