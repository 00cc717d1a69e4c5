//! Structural invariants that must hold before any planner or emitter runs.
//! Unknown service/entity references are surfaced together, sorted, rather
//! than failing fast on the first one found.

use crate::schema::Project;
use ang_naming::collate_key;
use std::collections::BTreeSet;
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum InvariantError {
    #[error("endpoint {method} {path} references unknown service {service}")]
    UnknownEndpointService {
        method: String,
        path: String,
        service: String,
    },
    #[error("endpoint {method} {path} references unknown method {rpc} on service {service}")]
    UnknownEndpointMethod {
        method: String,
        path: String,
        service: String,
        rpc: String,
    },
    #[error("repository {repo} references unknown entity {entity}")]
    UnknownRepositoryEntity { repo: String, entity: String },
    #[error("service {service} uses unknown service {dep}")]
    UnknownServiceUse { service: String, dep: String },
    #[error("service {service} publishes unknown event {event}")]
    UnknownPublishedEvent { service: String, event: String },
    #[error("entity {entity} declares duplicate field name {field} (case-insensitive)")]
    DuplicateFieldName { entity: String, field: String },
    #[error("entity {entity} declares {count} primary-key fields, at most one is allowed")]
    MultiplePrimaryKeys { entity: String, count: usize },
    #[error("{context} fails field validation: {message}")]
    FieldConstraint { context: String, message: String },
}

/// Validates every structural invariant except DAG-ness of the service
/// graph, which `ang_depgraph::validate_service_dependencies` owns because
/// it requires cycle detection rather than a simple existence check.
/// Returns every violation found, sorted for determinism, rather than
/// aborting on the first.
pub fn validate_invariants(project: &Project) -> Result<(), Vec<InvariantError>> {
    let mut errors = Vec::new();

    let service_names: BTreeSet<&str> = project.services.iter().map(|s| s.name.as_str()).collect();
    let entity_names: BTreeSet<&str> = project.entities.iter().map(|e| e.name.as_str()).collect();
    let event_names: BTreeSet<&str> = project.events.iter().map(|e| e.name.as_str()).collect();

    for endpoint in &project.endpoints {
        if let Err(violations) = endpoint.validate() {
            errors.push(InvariantError::FieldConstraint {
                context: format!("endpoint {} {}", endpoint.method, endpoint.path),
                message: violations.to_string(),
            });
        }

        let Some(service) = project
            .services
            .iter()
            .find(|s| s.name.as_str() == endpoint.service.as_str())
        else {
            errors.push(InvariantError::UnknownEndpointService {
                method: endpoint.method.clone(),
                path: endpoint.path.clone(),
                service: endpoint.service.to_string(),
            });
            continue;
        };

        if !service.methods.iter().any(|m| m.name == endpoint.rpc) {
            errors.push(InvariantError::UnknownEndpointMethod {
                method: endpoint.method.clone(),
                path: endpoint.path.clone(),
                service: endpoint.service.to_string(),
                rpc: endpoint.rpc.clone(),
            });
        }
    }

    for error_def in &project.errors {
        if let Err(violations) = error_def.validate() {
            errors.push(InvariantError::FieldConstraint {
                context: format!("error {}", error_def.name),
                message: violations.to_string(),
            });
        }
    }

    for repo in &project.repositories {
        if !entity_names.contains(repo.entity.as_str()) {
            errors.push(InvariantError::UnknownRepositoryEntity {
                repo: repo.name.to_string(),
                entity: repo.entity.to_string(),
            });
        }
    }

    for service in &project.services {
        for dep in &service.uses {
            if !service_names.contains(dep.as_str()) {
                errors.push(InvariantError::UnknownServiceUse {
                    service: service.name.to_string(),
                    dep: dep.to_string(),
                });
            }
        }
        for event in &service.publishes {
            if !event_names.contains(event.as_str()) {
                errors.push(InvariantError::UnknownPublishedEvent {
                    service: service.name.to_string(),
                    event: event.to_string(),
                });
            }
        }
    }

    for entity in &project.entities {
        let mut seen = BTreeSet::new();
        for field in &entity.fields {
            let key = collate_key(field.name.as_str());
            if !seen.insert(key) {
                errors.push(InvariantError::DuplicateFieldName {
                    entity: entity.name.to_string(),
                    field: field.name.to_string(),
                });
            }
        }

        let pk_count = entity.fields.iter().filter(|f| f.db.primary_key).count();
        if pk_count > 1 {
            errors.push(InvariantError::MultiplePrimaryKeys {
                entity: entity.name.to_string(),
                count: pk_count,
            });
        }
    }

    errors.sort();
    errors.dedup();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
