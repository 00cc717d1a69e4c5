//! Service interface, service-impl struct+constructor, and repository port
//! synthesis. Each function derives its field/parameter list
//! from the IR/planner shape rather than string-templating it.

use crate::ast::{GoField, GoFunc, GoInterface, GoMethodSig, GoParam, GoStruct};
use ang_flow::render_flow;
use ang_ir::{Method, Repository, Service};
use ang_naming::export_name;
use ang_planner::{FinderSignature, ServiceImplPlan};

fn ctx_param() -> GoParam {
    GoParam {
        name: "ctx".to_string(),
        type_name: "context.Context".to_string(),
    }
}

fn method_signature(method: &Method) -> GoMethodSig {
    let mut params = vec![ctx_param()];
    if let Some(input) = &method.input_entity {
        params.push(GoParam {
            name: "req".to_string(),
            type_name: format!("*dto.{}", export_name(input.as_str())),
        });
    }

    let returns = match &method.output_entity {
        Some(output) => vec![format!("*dto.{}", export_name(output.as_str())), "error".to_string()],
        None => vec!["error".to_string()],
    };

    GoMethodSig {
        name: export_name(&method.name),
        params,
        returns,
    }
}

/// Builds the Go interface a service's handlers depend on.
pub fn service_interface(service: &Service) -> GoInterface {
    GoInterface {
        name: format!("{}Service", export_name(service.name.as_str())),
        methods: service.methods.iter().map(method_signature).collect(),
    }
}

/// Result of synthesizing one method's body. `Rendered` carries the flow
/// renderer's output; `Fallback` carries `impl.code` verbatim; `Missing`
/// means neither was usable and the emitter owes a missing-impl entry.
pub enum MethodBody {
    Rendered(String),
    Fallback(String),
    Missing,
}

pub fn synthesize_method_body(method: &Method) -> MethodBody {
    if !method.flow.is_empty() {
        if let Ok(rendered) = render_flow(&method.flow) {
            return MethodBody::Rendered(rendered);
        }
    }
    if let Some(impl_block) = &method.impl_block {
        return MethodBody::Fallback(impl_block.code.clone());
    }
    MethodBody::Missing
}

/// Builds the service-impl struct and its constructor from a planner-derived
/// dependency set.
pub fn service_impl_struct(service: &Service, plan: &ServiceImplPlan) -> (GoStruct, GoFunc) {
    let struct_name = format!("{}ServiceImpl", export_name(service.name.as_str()));
    let mut fields = Vec::new();

    for entity in &plan.repo_deps {
        fields.push(GoField {
            name: format!("{}Repo", lower_first(&export_name(entity.as_str()))),
            type_name: format!("repository.{}Repository", export_name(entity.as_str())),
        });
    }
    for dep in &plan.uses {
        fields.push(GoField {
            name: lower_first(&export_name(dep)),
            type_name: format!("{}Service", export_name(dep)),
        });
    }
    if plan.needs_tx_manager {
        fields.push(GoField { name: "txManager".to_string(), type_name: "tx.Manager".to_string() });
    }
    if plan.needs_publisher {
        fields.push(GoField { name: "publisher".to_string(), type_name: "events.Publisher".to_string() });
    }
    if plan.needs_idempotency_store {
        fields.push(GoField { name: "idempotencyStore".to_string(), type_name: "idempotency.Store".to_string() });
    }
    if plan.needs_outbox {
        fields.push(GoField { name: "outbox".to_string(), type_name: "outbox.Store".to_string() });
    }
    if plan.needs_audit_service {
        fields.push(GoField { name: "auditService".to_string(), type_name: "AuditService".to_string() });
    }
    if plan.needs_storage {
        fields.push(GoField { name: "storage".to_string(), type_name: "storage.Client".to_string() });
    }
    if plan.needs_notification_dispatcher {
        fields.push(GoField { name: "notifier".to_string(), type_name: "notification.Dispatcher".to_string() });
    }

    let struct_decl = GoStruct {
        name: struct_name.clone(),
        fields: fields.clone(),
    };

    let ctor_params: Vec<GoParam> = fields
        .iter()
        .map(|f| GoParam { name: f.name.clone(), type_name: f.type_name.clone() })
        .collect();
    let assigns: Vec<String> = fields.iter().map(|f| format!("{0}: {0},", f.name)).collect();
    let mut body = vec![format!("return &{struct_name}{{")];
    body.extend(assigns);
    body.push("}".to_string());

    let ctor = GoFunc {
        name: format!("New{struct_name}"),
        receiver: None,
        params: ctor_params,
        returns: vec![format!("*{struct_name}")],
        body: vec![body.join("\n")],
    };

    (struct_decl, ctor)
}

/// Builds the repository port interface from planner-resolved finder
/// signatures.
pub fn repository_port(repo: &Repository, signatures: &[FinderSignature]) -> GoInterface {
    GoInterface {
        name: format!("{}Repository", export_name(repo.entity.as_str())),
        methods: signatures
            .iter()
            .map(|sig| GoMethodSig {
                name: export_name(&sig.name),
                params: vec![ctx_param()],
                returns: vec![sig.return_type.clone(), "error".to_string()],
            })
            .collect(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
