//! FastAPI surface planning (`FastAPIPlan`). Groups endpoints by
//! owning service and derives every name a Python emitter needs: router
//! module names, service class names, DI accessor names, and per-handler
//! signatures — all without the emitter ever inventing a name itself.

use ang_ir::{Endpoint, Entity, Project, Service};
use ang_naming::{export_name, to_snake_case};
use itertools::Itertools;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerPlan {
    pub handler_name: String,
    /// The owning service's method name (`Endpoint.rpc`), independent of
    /// `handler_name`'s collision-suffixing — diagnostics should name the
    /// method the IR actually declares.
    pub rpc: String,
    pub http_method: String,
    pub path: String,
    pub path_params: Vec<String>,
    pub has_body: bool,
    pub request_type: Option<String>,
    pub return_type: String,
    /// Whether the owning method carries a renderable flow. Mirrors the Go
    /// path's `MethodBody::Rendered` case: a flow means the service layer
    /// already has real logic, so the handler stub delegating to it is not
    /// a missing implementation.
    pub has_flow: bool,
    /// `impl.code` when the owning method carries a Python impl block,
    /// analogous to the Go path's `MethodBody::Fallback`.
    pub impl_block: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRouterPlan {
    pub service_name: String,
    pub router_module: String,
    pub class_name: String,
    pub di_accessor: String,
    pub handlers: Vec<HandlerPlan>,
}

pub fn plan_fastapi(project: &Project) -> Vec<ServiceRouterPlan> {
    let mut by_service: BTreeMap<&str, Vec<&Endpoint>> = BTreeMap::new();
    for endpoint in &project.endpoints {
        by_service.entry(endpoint.service.as_str()).or_default().push(endpoint);
    }

    by_service
        .into_iter()
        .map(|(service_name, endpoints)| plan_router(service_name, &endpoints, &project.entities, &project.services))
        .collect()
}

fn plan_router(service_name: &str, endpoints: &[&Endpoint], entities: &[Entity], services: &[Service]) -> ServiceRouterPlan {
    let module = to_snake_case(service_name);
    let class_name = format!("{}Service", export_name(service_name));
    let di_accessor = format!("get_{module}_service");

    let mut used_names: BTreeMap<String, u32> = BTreeMap::new();
    let handlers = endpoints
        .iter()
        .sorted_by_key(|e| (e.method.clone(), e.path.clone()))
        .map(|endpoint| plan_handler(endpoint, entities, services, &mut used_names))
        .collect();

    ServiceRouterPlan {
        service_name: service_name.to_string(),
        router_module: module,
        class_name,
        di_accessor,
        handlers,
    }
}

fn plan_handler(
    endpoint: &Endpoint,
    entities: &[Entity],
    services: &[Service],
    used_names: &mut BTreeMap<String, u32>,
) -> HandlerPlan {
    let path_params = extract_path_params(&endpoint.path);
    let has_body = !matches!(endpoint.method.as_str(), "GET" | "DELETE");

    let request_type = has_body
        .then(|| input_model_name(endpoint, entities))
        .flatten();

    let return_type = output_model_name(endpoint, entities).unwrap_or_else(|| "Any".to_string());

    let base_name = to_snake_case(&endpoint.rpc);
    let handler_name = unique_handler_name(&base_name, &endpoint.method, used_names);

    let method = services
        .iter()
        .find(|s| s.name.as_str() == endpoint.service.as_str())
        .and_then(|s| s.methods.iter().find(|m| m.name == endpoint.rpc));
    let has_flow = method.map(|m| !m.flow.is_empty()).unwrap_or(false);
    let impl_block = method
        .and_then(|m| m.impl_block.as_ref())
        .filter(|ib| ib.lang == "python")
        .map(|ib| ib.code.clone());

    HandlerPlan {
        handler_name,
        rpc: endpoint.rpc.clone(),
        http_method: endpoint.method.clone(),
        path: endpoint.path.clone(),
        path_params,
        has_body,
        request_type,
        return_type,
        has_flow,
        impl_block,
    }
}

fn extract_path_params(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix(':').or_else(|| segment.strip_prefix('{').and_then(|s| s.strip_suffix('}'))))
        .map(|s| s.to_string())
        .collect()
}

fn input_model_name(endpoint: &Endpoint, entities: &[Entity]) -> Option<String> {
    entities
        .iter()
        .find(|e| e.name.as_str() == endpoint.rpc.trim_start_matches("Create").trim_start_matches("Update"))
        .map(|e| format!("models.{}", export_name(e.name.as_str())))
}

fn output_model_name(endpoint: &Endpoint, entities: &[Entity]) -> Option<String> {
    if let Some(view) = &endpoint.view {
        return Some(format!("models.{}", export_name(view)));
    }
    entities
        .iter()
        .find(|e| endpoint.rpc.ends_with(e.name.as_str()))
        .map(|e| format!("models.{}", export_name(e.name.as_str())))
}

/// Unique handler names: suffix with the HTTP verb on collision, then
/// `_2`, `_3`, ….
fn unique_handler_name(base: &str, method: &str, used_names: &mut BTreeMap<String, u32>) -> String {
    if !used_names.contains_key(base) {
        used_names.insert(base.to_string(), 1);
        return base.to_string();
    }

    let with_verb = format!("{base}_{}", method.to_ascii_lowercase());
    let count = used_names.entry(with_verb.clone()).or_insert(0);
    *count += 1;
    if *count == 1 {
        with_verb
    } else {
        format!("{with_verb}_{count}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ang_ir::{AuthSpec, LanguageProfile, Notifications, Project, Rbac};
    use std::collections::BTreeMap as Map;

    fn empty_project() -> Project {
        Project {
            ir_version: 1,
            name: "t".into(),
            version: "0.0.0".into(),
            language: LanguageProfile::GoLegacy,
            entities: vec![],
            services: vec![],
            endpoints: vec![],
            repositories: vec![],
            events: vec![],
            errors: vec![],
            schedules: vec![],
            rbac: Rbac::default(),
            notifications: Notifications::default(),
        }
    }

    fn endpoint(method: &str, path: &str, rpc: &str, service: &str) -> Endpoint {
        Endpoint {
            method: method.into(),
            path: path.into(),
            service: service.into(),
            rpc: rpc.into(),
            auth: AuthSpec::default(),
            cache_ttl: None,
            timeout: None,
            max_body_size: None,
            idempotent: false,
            dedupe_key: None,
            rate_limit: None,
            circuit_breaker: None,
            pagination: Default::default(),
            slo: None,
            errors: vec![],
            view: None,
            messages: vec![],
            optimistic_update_target: None,
            metadata: Map::new(),
            source: None,
            invalidates: vec![],
        }
    }

    #[test]
    fn groups_by_service_and_names_router() {
        let mut project = empty_project();
        project.endpoints.push(endpoint("GET", "/tenders/:id", "GetTender", "Tenders"));
        let plans = plan_fastapi(&project);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].router_module, "tenders");
        assert_eq!(plans[0].class_name, "TendersService");
        assert_eq!(plans[0].di_accessor, "get_tenders_service");
        assert_eq!(plans[0].handlers[0].path_params, vec!["id"]);
        assert!(!plans[0].handlers[0].has_body);
    }

    #[test]
    fn handler_name_collisions_suffix_with_verb_then_counter() {
        let mut used = Map::new();
        assert_eq!(unique_handler_name("list_tenders", "GET", &mut used), "list_tenders");
        assert_eq!(unique_handler_name("list_tenders", "POST", &mut used), "list_tenders_post");
        assert_eq!(unique_handler_name("list_tenders", "POST", &mut used), "list_tenders_post_2");
    }
}
