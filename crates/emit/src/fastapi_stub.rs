//! Template-first FastAPI router stub emitter. The router
//! skeleton and its middleware chain come straight off [`ServiceRouterPlan`]
//! and [`EndpointPolicy`]; each handler body is a custom block so hand-written
//! business logic survives re-emission.

use crate::custom_block::splice_custom_blocks;
use crate::missing_impls::MissingImpls;
use ang_planner::{HandlerPlan, ServiceRouterPlan};
use ang_policy::EndpointPolicy;

fn handler_decorator(handler: &HandlerPlan) -> String {
    let method = handler.http_method.to_lowercase();
    format!("@router.{method}(\"{}\")", handler.path)
}

fn handler_signature(handler: &HandlerPlan) -> String {
    let mut params: Vec<String> = handler.path_params.iter().map(|p| format!("{p}: str")).collect();
    if let Some(request_type) = &handler.request_type {
        params.push(format!("body: {request_type}"));
    }
    params.push(format!("service: {} = Depends(get_service)", "Any"));
    format!("async def {}({}) -> {}:", handler.handler_name, params.join(", "), handler.return_type)
}

/// Renders a handler's body inside its custom block: the injected Python
/// impl when the owning method carries one, an unimplemented stub when the
/// method has a flow (the service layer owns the real logic there), or
/// `raise NotImplementedError` while also recording a [`MissingImpls`] entry
/// when neither exists.
fn handler_block(
    service_name: &str,
    handler: &HandlerPlan,
    policy: Option<&EndpointPolicy>,
    missing: &mut MissingImpls,
) -> String {
    let mut lines = vec![handler_decorator(handler), handler_signature(handler)];
    if let Some(policy) = policy {
        if policy.idempotency {
            lines.push("    # requires Idempotency-Key header".to_string());
        }
    }
    lines.push(format!("    # ANG:BEGIN_CUSTOM {}", handler.handler_name));
    match &handler.impl_block {
        Some(code) => {
            for line in code.lines() {
                lines.push(format!("    {line}"));
            }
        }
        None => {
            lines.push("    raise NotImplementedError".to_string());
            if !handler.has_flow {
                tracing::warn!(service = service_name, method = handler.rpc.as_str(), "no renderable flow or impl block");
                missing.record(service_name, handler.rpc.as_str(), "fastapi_stub");
            }
        }
    }
    lines.push(format!("    # ANG:END_CUSTOM {}", handler.handler_name));
    lines.join("\n")
}

/// Renders a service router module's generated text, then splices any
/// existing hand-edited custom blocks back in.
pub fn render_fastapi_router(
    plan: &ServiceRouterPlan,
    policies: &[(String, EndpointPolicy)],
    existing: Option<&str>,
    missing: &mut MissingImpls,
) -> String {
    let mut lines = vec![
        "from typing import Any".to_string(),
        "from fastapi import APIRouter, Depends".to_string(),
        String::new(),
        "router = APIRouter()".to_string(),
        String::new(),
        format!("def get_service() -> {}:", plan.class_name),
        "    raise RuntimeError(\"service not wired\")".to_string(),
        String::new(),
    ];

    for handler in &plan.handlers {
        let policy = policies.iter().find(|(name, _)| name == &handler.handler_name).map(|(_, p)| p);
        lines.push(handler_block(&plan.service_name, handler, policy, missing));
        lines.push(String::new());
    }

    let generated = lines.join("\n");
    match existing {
        Some(existing) => splice_custom_blocks(&generated, existing),
        None => generated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(impl_block: Option<String>, has_flow: bool) -> HandlerPlan {
        HandlerPlan {
            handler_name: "get_tender".into(),
            rpc: "GetTender".into(),
            http_method: "GET".into(),
            path: "/tenders/{id}".into(),
            path_params: vec!["id".into()],
            has_body: false,
            request_type: None,
            return_type: "models.Tender".into(),
            has_flow,
            impl_block,
        }
    }

    fn plan() -> ServiceRouterPlan {
        ServiceRouterPlan {
            service_name: "Tenders".into(),
            router_module: "tenders".into(),
            class_name: "TendersService".into(),
            di_accessor: "get_tenders_service".into(),
            handlers: vec![handler(None, false)],
        }
    }

    #[test]
    fn renders_decorator_and_custom_block() {
        let mut missing = MissingImpls::new();
        let rendered = render_fastapi_router(&plan(), &[], None, &mut missing);
        assert!(rendered.contains("@router.get(\"/tenders/{id}\")"));
        assert!(rendered.contains("# ANG:BEGIN_CUSTOM get_tender"));
    }

    #[test]
    fn p7_preserves_hand_written_handler_body_on_re_emission() {
        let mut missing = MissingImpls::new();
        let first = render_fastapi_router(&plan(), &[], None, &mut missing);
        let edited = first.replace("    raise NotImplementedError", "    return await service.fetch(id)");
        let second = render_fastapi_router(&plan(), &[], Some(&edited), &mut missing);
        assert!(second.contains("return await service.fetch(id)"));
    }

    #[test]
    fn handler_with_neither_flow_nor_impl_records_missing_entry() {
        let mut missing = MissingImpls::new();
        render_fastapi_router(&plan(), &[], None, &mut missing);
        assert_eq!(missing.len(), 1);
    }

    #[test]
    fn handler_with_flow_does_not_record_missing_entry() {
        let mut missing = MissingImpls::new();
        let plan = ServiceRouterPlan { handlers: vec![handler(None, true)], ..plan() };
        render_fastapi_router(&plan, &[], None, &mut missing);
        assert!(missing.is_empty());
    }

    #[test]
    fn python_impl_block_renders_inside_custom_block_instead_of_stub() {
        let mut missing = MissingImpls::new();
        let plan = ServiceRouterPlan {
            handlers: vec![handler(Some("return await service.fetch(id)".to_string()), false)],
            ..plan()
        };
        let rendered = render_fastapi_router(&plan, &[], None, &mut missing);
        assert!(rendered.contains("    return await service.fetch(id)"));
        assert!(!rendered.contains("raise NotImplementedError"));
        assert!(missing.is_empty());
    }
}
