//! Template-driven and AST-first emitters, the function vocabulary, and the
//! deterministic writer. Nothing outside this crate
//! touches a filesystem path or a `serde_json::Value` meant for `ang-*.json`
//! output directly — every artifact is built here and handed to
//! [`writer::write_file_if_changed`] by the caller.

mod backend;
mod custom_block;
mod fastapi_stub;
mod file;
mod manifest;
mod missing_impls;
mod openapi;
mod repo_impl;
mod sdk_meta;
mod templates;
mod vocabulary;
pub mod writer;

pub use backend::{emit_repository_port, emit_service_impl, emit_service_interface};
pub use custom_block::{parse_custom_blocks, splice_custom_blocks};
pub use fastapi_stub::render_fastapi_router;
pub use file::File;
pub use manifest::{build_manifest, build_sdk_manifest, EventManifestEntry, Manifest, SdkManifest, ServiceManifestEntry};
pub use missing_impls::{MissingImpl, MissingImpls};
pub use openapi::{endpoint_extensions, validate_tag_to_schema};
pub use repo_impl::render_repository_impl;
pub use sdk_meta::{endpoint_meta, EndpointMeta, InvalidateEntry};
pub use templates::{DiskTemplates, InMemoryTemplates, TemplateSource};
pub use vocabulary::register_vocabulary;
