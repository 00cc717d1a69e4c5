//! Service-impl dependency planning (`ServiceImplPlan`). Inspects
//! a service's method flows to decide what its generated constructor needs
//! to take: repositories, a tx manager, a publisher, and the rest of the
//! ambient infrastructure a Go service implementation wires up once at
//! startup.

use ang_ir::{EntityName, FlowArg, FlowStep, Method, Project, RepositoryName, Service};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceImplPlan {
    pub repo_deps: BTreeSet<EntityName>,
    pub uses: BTreeSet<String>,
    pub needs_tx_manager: bool,
    pub needs_publisher: bool,
    pub needs_idempotency_store: bool,
    pub needs_outbox: bool,
    pub needs_audit_service: bool,
    pub needs_storage: bool,
    pub needs_notification_dispatcher: bool,
}

pub fn plan_service_impl(service: &Service, project: &Project) -> ServiceImplPlan {
    let mut plan = ServiceImplPlan {
        uses: service.uses.iter().map(|u| u.to_string()).collect(),
        needs_storage: service.requires.s3,
        ..Default::default()
    };

    let mut calls_audit = false;

    for method in &service.methods {
        plan.needs_idempotency_store |= method.idempotency;
        plan.needs_outbox |= method.outbox;
        plan.needs_publisher |= !method.publishes.is_empty();
        if let Some(impl_block) = &method.impl_block {
            plan.needs_tx_manager |= impl_block.requires_tx;
        }

        for step in &method.flow {
            walk_step(step, project, &mut plan, &mut calls_audit);
        }
    }

    plan.needs_audit_service = calls_audit && service.name.as_str() != "Audit";
    plan
}

fn walk_step(step: &FlowStep, project: &Project, plan: &mut ServiceImplPlan, calls_audit: &mut bool) {
    if step.action == "tx.Block" {
        plan.needs_tx_manager = true;
    }
    if step.action == "event.Publish" {
        plan.needs_publisher = true;
    }
    if step.action == "notification.Dispatch" {
        plan.needs_notification_dispatcher = true;
    }
    if step.action == "audit.Log" {
        *calls_audit = true;
        plan.repo_deps.insert(EntityName::from("AuditLog"));
    }
    if step.action == "auth.RequireRole" {
        plan.repo_deps.insert(EntityName::from("User"));
    }
    if let Some(action) = step.action.strip_prefix("repo.") {
        let _ = action;
        if let Some(FlowArg::String(source)) = step.args.get("source") {
            if let Some(entity) = resolve_repo_entity(source, project) {
                plan.repo_deps.insert(entity);
            }
        }
    }

    for arg in step.args.values() {
        if let Some(children) = arg.as_steps() {
            for child in children {
                walk_step(child, project, plan, calls_audit);
            }
        }
    }
}

/// `source` is the entity name the flow DSL's `repo.*` actions carry (the
/// Go call site is `s.{source}Repo.{method}(...)`, not the repository's own
/// `name` field), so this resolves by entity rather than by repository name.
fn resolve_repo_entity(source: &str, project: &Project) -> Option<EntityName> {
    project
        .repositories
        .iter()
        .find(|r| r.entity.as_str() == source)
        .filter(|r| {
            project
                .entities
                .iter()
                .find(|e| e.name == r.entity)
                .map(|e| !e.is_dto())
                .unwrap_or(true)
        })
        .map(|r| r.entity.clone())
}

/// Helper retained for emitters that need the raw repository reference a
/// method step names, independent of [`ServiceImplPlan`]'s deduped set.
pub fn repo_refs_of(method: &Method) -> Vec<RepositoryName> {
    let mut refs = Vec::new();
    fn collect(step: &FlowStep, refs: &mut Vec<RepositoryName>) {
        if step.action.starts_with("repo.") {
            if let Some(FlowArg::String(source)) = step.args.get("source") {
                refs.push(RepositoryName::from(source.as_str()));
            }
        }
        for arg in step.args.values() {
            if let Some(children) = arg.as_steps() {
                for child in children {
                    collect(child, refs);
                }
            }
        }
    }
    for step in &method.flow {
        collect(step, &mut refs);
    }
    refs
}
