//! Language-neutral render plans. Planner output is the only
//! thing the Go and Python emitters consume from the IR directly — every
//! name, type, and dependency decision is made exactly once, here.

mod fastapi;
mod finder;
mod scan;
mod service_impl;

pub use fastapi::{plan_fastapi, HandlerPlan, ServiceRouterPlan};
pub use finder::{infer_scan_field_types, resolve_finder_signature, FinderSignature};
pub use scan::{plan_scan, ScanPlan, ScanVariable};
pub use service_impl::{plan_service_impl, repo_refs_of, ServiceImplPlan};
