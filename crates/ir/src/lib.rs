//! Canonical IR schema, forward migration, and structural invariant
//! validation. IR instances are immutable inputs to the
//! rest of the pipeline — every later stage produces a new derived value
//! rather than mutating its `Project`.

mod migrate;
mod names;
mod schema;
mod validate;

pub use migrate::{migrate_to_current, MigrateError, SCHEMA_VERSION};
pub use names::{EntityName, ErrorName, EventName, FieldName, RepositoryName, ServiceName};
pub use schema::*;
pub use validate::{validate_invariants, InvariantError};
