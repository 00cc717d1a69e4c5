//! The canonical IR schema. Every collection here is a plain
//! `Vec`/`BTreeMap` — stage code is responsible for sorting before it
//! iterates, never the other way around (see `ang_emit`'s deterministic
//! writer, which owns that discipline).

use crate::names::{EntityName, ErrorName, EventName, FieldName, RepositoryName, ServiceName};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

fn validate_leading_slash(path: &str) -> Result<(), ValidationError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ValidationError::new("path_must_start_with_slash"))
    }
}

/// Backend target a [`Project`] compiles to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LanguageProfile {
    GoLegacy,
    PythonFastapi,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct Project {
    /// Schema version this `Project` is encoded at. Always
    /// [`crate::SCHEMA_VERSION`] after [`crate::migrate::migrate_to_current`]
    /// has run.
    pub ir_version: u32,
    pub name: String,
    pub version: String,
    pub language: LanguageProfile,
    pub entities: Vec<Entity>,
    pub services: Vec<Service>,
    pub endpoints: Vec<Endpoint>,
    pub repositories: Vec<Repository>,
    pub events: Vec<Event>,
    pub errors: Vec<ErrorDef>,
    pub schedules: Vec<Schedule>,
    pub rbac: Rbac,
    pub notifications: Notifications,
}

/// A tagged type reference. Lists and maps nest a single `TypeRef`; entity
/// and alias references are resolved against [`Project::entities`] / a
/// project-level alias table by the planner, not here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    String,
    Int,
    Float,
    Bool,
    Time,
    Bytes,
    List { item: Box<TypeRef> },
    Map { value: Box<TypeRef> },
    Entity { name: EntityName },
    Alias { name: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct DbFieldMeta {
    #[serde(default)]
    pub column_type: Option<String>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub index: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct Field {
    pub name: FieldName,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub list: bool,
    /// Name of the nested item type, when `type_ref` describes a list/map of
    /// an inline (not entity-referenced) composite shape.
    #[serde(default)]
    pub item_type_name: Option<String>,
    #[serde(default)]
    pub nested_item_fields: Vec<Field>,
    #[serde(default)]
    pub db: DbFieldMeta,
    #[serde(default)]
    pub validate_tag: Option<String>,
    #[serde(default)]
    pub ui: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub skip_domain: bool,
    #[serde(default)]
    pub secret: bool,
    #[serde(default)]
    pub pii: bool,
    #[serde(default)]
    pub constraints: BTreeMap<String, serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct Entity {
    pub name: EntityName,
    /// Owning service: every entity has exactly one owning service,
    /// declared or inferred by the upstream normalizer — this field is
    /// always populated by the time the IR reaches the core.
    pub owner: ServiceName,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub ui: BTreeMap<String, serde_json::Value>,
}

impl Entity {
    pub fn primary_key_field(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.db.primary_key)
    }

    pub fn is_dto(&self) -> bool {
        matches!(self.metadata.get("dto"), Some(serde_json::Value::Bool(true)))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct ImplBlock {
    pub lang: String,
    pub code: String,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub requires_tx: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct Pagination {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub default_limit: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub input_entity: Option<EntityName>,
    #[serde(default)]
    pub output_entity: Option<EntityName>,
    #[serde(default)]
    pub flow: Vec<FlowStep>,
    #[serde(default)]
    pub sources: Vec<RepositoryName>,
    #[serde(default)]
    pub publishes: Vec<EventName>,
    #[serde(default)]
    pub subscribes: Vec<EventName>,
    #[serde(default)]
    pub idempotency: bool,
    #[serde(default)]
    pub outbox: bool,
    #[serde(default)]
    pub cache_ttl: Option<String>,
    #[serde(default)]
    pub impl_block: Option<ImplBlock>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub throws: Vec<ErrorName>,
    #[serde(default)]
    pub broadcasts: Vec<EventName>,
}

/// One node of the flow step DSL. Child steps live under reserved arg keys
/// (`_do`, `_then`, `_else`, `_ifNew`, `_ifExists`, `_default`, `_cases`) as
/// [`FlowArg::Steps`] values — see `ang_flow` for the action vocabulary.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct FlowStep {
    pub action: String,
    #[serde(default)]
    pub args: BTreeMap<String, FlowArg>,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
#[serde(untagged)]
pub enum FlowArg {
    String(String),
    Bool(bool),
    Number(f64),
    Steps(Vec<FlowStep>),
}

impl FlowArg {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlowArg::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlowArg::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FlowArg::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_steps(&self) -> Option<&[FlowStep]> {
        match self {
            FlowArg::Steps(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct ServiceRequires {
    #[serde(default)]
    pub sql: bool,
    #[serde(default)]
    pub mongo: bool,
    #[serde(default)]
    pub redis: bool,
    #[serde(default)]
    pub nats: bool,
    #[serde(default)]
    pub s3: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct Service {
    pub name: ServiceName,
    pub methods: Vec<Method>,
    #[serde(default)]
    pub publishes: Vec<EventName>,
    /// Event name to handler method name.
    #[serde(default)]
    pub subscribes: BTreeMap<EventName, String>,
    #[serde(default)]
    pub uses: Vec<ServiceName>,
    #[serde(default)]
    pub requires: ServiceRequires,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct AuthSpec {
    #[serde(default)]
    pub auth_type: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default)]
    pub check: Option<String>,
    #[serde(default)]
    pub inject: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema, Validate)]
pub struct RateLimitSpec {
    #[validate(range(min = 0.0))]
    pub rps: f64,
    pub burst: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema, Validate)]
pub struct CircuitBreakerSpec {
    #[validate(range(min = 1))]
    pub threshold: u32,
    pub timeout: String,
    #[validate(range(min = 1))]
    pub half_open_max: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema, Validate)]
pub struct Endpoint {
    pub method: String,
    #[validate(custom = "validate_leading_slash")]
    pub path: String,
    pub service: ServiceName,
    pub rpc: String,
    #[serde(default)]
    pub auth: AuthSpec,
    #[serde(default)]
    pub cache_ttl: Option<String>,
    #[serde(default)]
    pub timeout: Option<String>,
    #[serde(default)]
    pub max_body_size: Option<u64>,
    #[serde(default)]
    pub idempotent: bool,
    #[serde(default)]
    pub dedupe_key: Option<String>,
    #[serde(default)]
    #[validate]
    pub rate_limit: Option<RateLimitSpec>,
    #[serde(default)]
    #[validate]
    pub circuit_breaker: Option<CircuitBreakerSpec>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub slo: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorName>,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub optimistic_update_target: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub source: Option<String>,
    /// Invalidation targets: SDK query-cache keys to invalidate alongside
    /// this endpoint, e.g. `Invalidate:["GetTender"]`.
    #[serde(default)]
    pub invalidates: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub enum FinderReturn {
    One,
    Many,
    Count,
    Delete,
    Custom(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct WhereClause {
    pub field: FieldName,
    pub op: String,
    pub param: String,
    pub param_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct Finder {
    pub name: String,
    #[serde(default)]
    pub where_clauses: Vec<WhereClause>,
    pub returns: FinderReturn,
    #[serde(default)]
    pub return_type_override: Option<String>,
    #[serde(default)]
    pub scan_fields: Vec<FieldName>,
    #[serde(default)]
    pub select: Vec<FieldName>,
    #[serde(default)]
    pub order_by: Vec<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub custom_sql: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct Repository {
    pub name: RepositoryName,
    pub entity: EntityName,
    #[serde(default)]
    pub finders: Vec<Finder>,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct Event {
    pub name: EventName,
    pub fields: Vec<Field>,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema, Validate)]
pub struct ErrorDef {
    pub name: ErrorName,
    #[validate(range(min = 100, max = 599))]
    pub http_code: u16,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct Schedule {
    pub name: String,
    pub service: ServiceName,
    pub action: String,
    #[serde(default)]
    pub at: Option<String>,
    #[serde(default)]
    pub every: Option<String>,
    #[serde(default)]
    pub publish_target: Option<EventName>,
    #[serde(default)]
    pub payload_fields: Vec<FieldName>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct Rbac {
    /// Role name to permission set.
    pub roles: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct NotificationChannels {
    pub enabled: Vec<String>,
    pub default_channels: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct NotificationPolicy {
    pub name: String,
    pub audience: String,
    pub channels: Vec<String>,
    pub template: String,
    #[serde(default)]
    pub mute_key: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct Notifications {
    #[serde(default)]
    pub channels: NotificationChannels,
    #[serde(default)]
    pub policies: Vec<NotificationPolicy>,
}
