//! End-to-end orchestration. `run` is the only place that sequences the
//! nine components; every stage before it is a pure function over the
//! previous stage's output.

use crate::config::PipelineConfig;
use crate::report::RunReport;
use ang_depgraph::{order_services_by_dependencies, validate_service_dependencies};
use ang_emit::{
    build_manifest, build_sdk_manifest, emit_repository_port, emit_service_impl,
    emit_service_interface, render_fastapi_router, render_repository_impl, writer, File,
    MissingImpls,
};
use ang_ir::{validate_invariants, LanguageProfile, Project};
use ang_planner::{plan_fastapi, plan_service_impl};
use ang_policy::EndpointPolicy;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("IR failed structural validation: {0:?}")]
    InvalidIr(Vec<ang_ir::InvariantError>),
    #[error("service dependency graph is invalid: {0:?}")]
    InvalidServiceGraph(Vec<ang_depgraph::DependencyError>),
    #[error("write failed for {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
}

/// Runs the full pipeline: validate invariants and service deps (hard abort
/// on either), order services, build plans, render flows, synthesize AST,
/// run emitters in a fixed order, write via the deterministic writer, and
/// summarize missing implementations.
pub fn run(ir: &Project, cfg: &PipelineConfig) -> anyhow::Result<RunReport> {
    let started = Instant::now();

    validate_invariants(ir).map_err(PipelineError::InvalidIr)?;
    validate_service_dependencies(&ir.services).map_err(PipelineError::InvalidServiceGraph)?;

    let ordered = order_services_by_dependencies(&ir.services);
    let services_in_order: Vec<_> = ordered
        .iter()
        .filter_map(|name| ir.services.iter().find(|s| &s.name == name))
        .collect();

    let mut missing = MissingImpls::new();
    let mut files: Vec<File> = Vec::new();

    match ir.language {
        LanguageProfile::GoLegacy => {
            for service in &services_in_order {
                files.push(emit_service_interface(service));
                let impl_plan = plan_service_impl(service, ir);
                files.push(emit_service_impl(service, &impl_plan, &mut missing));
            }
            for repo in &ir.repositories {
                files.push(emit_repository_port(repo, ir));
                if let Some(entity) = ir.entities.iter().find(|e| e.name == repo.entity) {
                    let existing = fs::read_to_string(
                        cfg.out_dir.join(format!("internal/repository/{}_impl.go", ang_naming::to_snake_case(repo.entity.as_str()))),
                    )
                    .ok();
                    let rendered = render_repository_impl(repo, entity, existing.as_deref());
                    files.push(File::new(
                        format!("internal/repository/{}_impl.go", ang_naming::to_snake_case(repo.entity.as_str())),
                        rendered,
                    ));
                }
            }
        }
        LanguageProfile::PythonFastapi => {
            let policies: Vec<(String, EndpointPolicy)> = ir
                .endpoints
                .iter()
                .map(|e| (ang_naming::to_snake_case(&e.rpc), EndpointPolicy::derive(e)))
                .collect();
            for plan in plan_fastapi(ir) {
                let rel_path = format!("routers/{}.py", plan.router_module);
                let existing = fs::read_to_string(cfg.out_dir.join(&rel_path)).ok();
                let rendered = render_fastapi_router(&plan, &policies, existing.as_deref(), &mut missing);
                files.push(File::new(rel_path, rendered));
            }
        }
    }

    let manifest = build_manifest(ir);
    files.push(File::new(
        "ang-manifest.json",
        serde_json::to_string_pretty(&manifest).expect("manifest always serializes"),
    ));

    let endpoint_policies: Vec<(ang_ir::Endpoint, EndpointPolicy)> = ir
        .endpoints
        .iter()
        .map(|e| (e.clone(), EndpointPolicy::derive(e)))
        .collect();
    let sdk_manifest = build_sdk_manifest(&endpoint_policies);
    let sdk_manifest_path = cfg.frontend_sdk_dir.join("sdk-manifest.json");

    let mut files_written = Vec::new();
    for file in &files {
        let path = cfg.out_dir.join(&file.path);
        if writer::write_file_if_changed(&path, file.contents.as_bytes())
            .map_err(|source| PipelineError::Write { path: path.clone(), source })?
        {
            tracing::info!(path = %path.display(), sha256 = %file.digest(), "wrote file");
            files_written.push(path);
        }
    }
    let sdk_manifest_file = File::new("sdk-manifest.json", serde_json::to_string_pretty(&sdk_manifest).expect("sdk manifest always serializes"));
    if writer::write_file_if_changed(&sdk_manifest_path, sdk_manifest_file.contents.as_bytes())
        .map_err(|source| PipelineError::Write { path: sdk_manifest_path.clone(), source })?
    {
        tracing::info!(path = %sdk_manifest_path.display(), sha256 = %sdk_manifest_file.digest(), "wrote file");
        files_written.push(sdk_manifest_path);
    }

    if !missing.is_empty() {
        tracing::warn!(count = missing.len(), "pipeline run completed with missing implementations");
    }

    Ok(RunReport {
        files_written,
        missing_impls: missing.entries().cloned().collect(),
        duration: started.elapsed(),
    })
}
