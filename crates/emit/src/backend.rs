//! AST-first Go emitters: service interfaces, service-impl
//! skeletons, and repository ports. The AST is authoritative — this module
//! only adds the package header, import block, and (for service impls) the
//! per-method bodies `ang_astgen` couldn't fully resolve.

use crate::file::File;
use crate::missing_impls::MissingImpls;
use ang_astgen::{
    derive_imports, print_func, print_interface, print_struct, repository_port,
    service_impl_struct, service_interface, synthesize_method_body, MethodBody,
};
use ang_ir::{Project, Repository, Service};
use ang_naming::{export_name, to_snake_case};
use ang_planner::{resolve_finder_signature, FinderSignature, ServiceImplPlan};

fn header(package: &str, imports: &[String]) -> String {
    let mut lines = vec![format!("package {package}"), String::new()];
    if !imports.is_empty() {
        lines.push("import (".to_string());
        for import in imports {
            lines.push(format!("\t\"{import}\""));
        }
        lines.push(")".to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

pub fn emit_service_interface(service: &Service) -> File {
    let iface = service_interface(service);
    let printed = print_interface(&iface);
    let imports = derive_imports([printed.as_str()]);
    let module = to_snake_case(service.name.as_str());
    File::new(
        format!("internal/service/{module}_interface.go"),
        format!("{}{printed}\n", header("service", &imports)),
    )
}

/// Renders a service's generated methods, recording one [`MissingImpls`]
/// entry per method that has neither a renderable flow nor a fallback
/// `impl` block.
fn service_methods(service: &Service, struct_name: &str, missing: &mut MissingImpls) -> Vec<String> {
    service
        .methods
        .iter()
        .filter_map(|method| {
            let receiver_name = format!("({} *{struct_name})", lower_first(&export_name(service.name.as_str())));
            let sig_name = export_name(&method.name);
            match synthesize_method_body(method) {
                MethodBody::Rendered(body) | MethodBody::Fallback(body) => {
                    Some(format!("func {receiver_name} {sig_name}(ctx context.Context) error {{\n{body}\n}}"))
                }
                MethodBody::Missing => {
                    tracing::warn!(service = service.name.as_str(), method = method.name.as_str(), "no renderable flow or impl block");
                    missing.record(service.name.as_str(), method.name.as_str(), "service_impl");
                    None
                }
            }
        })
        .collect()
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub fn emit_service_impl(service: &Service, plan: &ServiceImplPlan, missing: &mut MissingImpls) -> File {
    let (struct_decl, ctor) = service_impl_struct(service, plan);
    let printed_struct = print_struct(&struct_decl);
    let printed_ctor = print_func(&ctor);
    let methods = service_methods(service, &struct_decl.name, missing);

    let mut body_snippets: Vec<&str> = vec![printed_struct.as_str(), printed_ctor.as_str()];
    body_snippets.extend(methods.iter().map(String::as_str));
    let imports = derive_imports(body_snippets.iter().copied());

    let mut sections = vec![printed_struct, printed_ctor];
    sections.extend(methods);

    let module = to_snake_case(service.name.as_str());
    File::new(
        format!("internal/service/{module}_impl.go"),
        format!("{}{}\n", header("service", &imports), sections.join("\n\n")),
    )
}

pub fn emit_repository_port(repo: &Repository, project: &Project) -> File {
    let signatures: Vec<FinderSignature> = repo
        .finders
        .iter()
        .map(|finder| {
            let entity = project
                .entities
                .iter()
                .find(|e| e.name == repo.entity)
                .expect("repository entity always resolves against the project's entity list");
            resolve_finder_signature(finder, entity, &project.entities)
        })
        .collect();

    let iface = repository_port(repo, &signatures);
    let printed = print_interface(&iface);
    let imports = derive_imports([printed.as_str()]);
    let module = to_snake_case(repo.entity.as_str());
    File::new(
        format!("internal/repository/{module}_repository.go"),
        format!("{}{printed}\n", header("repository", &imports)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ang_ir::{Finder, FinderReturn};
    use std::collections::BTreeMap;

    fn project_with_one_repo() -> Project {
        Project {
            ir_version: 1,
            name: "shop".into(),
            version: "0.0.0".into(),
            language: ang_ir::LanguageProfile::GoLegacy,
            entities: vec![ang_ir::Entity {
                name: "Tender".into(),
                owner: "Tenders".into(),
                fields: vec![],
                metadata: BTreeMap::new(),
                ui: BTreeMap::new(),
            }],
            services: vec![],
            endpoints: vec![],
            repositories: vec![],
            events: vec![],
            errors: vec![],
            schedules: vec![],
            rbac: ang_ir::Rbac::default(),
            notifications: ang_ir::Notifications::default(),
        }
    }

    #[test]
    fn service_interface_file_lands_under_internal_service() {
        let service = Service {
            name: "Tenders".into(),
            methods: vec![],
            publishes: vec![],
            subscribes: BTreeMap::new(),
            uses: vec![],
            requires: ang_ir::ServiceRequires::default(),
        };
        let file = emit_service_interface(&service);
        assert_eq!(file.path.to_str().unwrap(), "internal/service/tenders_interface.go");
        assert!(file.contents.starts_with("package service"));
    }

    #[test]
    fn repository_port_file_derives_module_from_entity() {
        let project = project_with_one_repo();
        let repo = Repository {
            name: "TenderRepo".into(),
            entity: "Tender".into(),
            finders: vec![Finder {
                name: "FindByID".into(),
                where_clauses: vec![],
                returns: FinderReturn::One,
                return_type_override: None,
                scan_fields: vec![],
                select: vec![],
                order_by: vec![],
                limit: None,
                custom_sql: None,
                action: None,
            }],
        };
        let file = emit_repository_port(&repo, &project);
        assert_eq!(file.path.to_str().unwrap(), "internal/repository/tender_repository.go");
        assert!(file.contents.contains("TenderRepository interface"));
    }

    #[test]
    fn missing_flow_and_impl_records_missing_entry() {
        let service = Service {
            name: "Tenders".into(),
            methods: vec![ang_ir::Method {
                name: "AwardTender".into(),
                input_entity: None,
                output_entity: None,
                flow: vec![],
                sources: vec![],
                publishes: vec![],
                subscribes: vec![],
                idempotency: false,
                outbox: false,
                cache_ttl: None,
                impl_block: None,
                pagination: ang_ir::Pagination::default(),
                throws: vec![],
                broadcasts: vec![],
            }],
            publishes: vec![],
            subscribes: BTreeMap::new(),
            uses: vec![],
            requires: ang_ir::ServiceRequires::default(),
        };
        let mut missing = MissingImpls::new();
        let file = emit_service_impl(&service, &ServiceImplPlan::default(), &mut missing);
        assert_eq!(missing.len(), 1);
        assert!(!file.contents.contains("AwardTender"));
    }
}
