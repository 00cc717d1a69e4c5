//! Project-wide, type-safe wrappers which name IR concepts and must be
//! referenced from multiple crates in the pipeline. Kept as newtypes rather
//! than bare `String` so a service name can never be accidentally passed
//! where an entity name is expected.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_rules! ir_name {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Serialize, Deserialize, Debug, Clone, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
        )]
        pub struct $name(String);

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

ir_name!(ServiceName, "Names an IR service.");
ir_name!(EntityName, "Names an IR entity.");
ir_name!(EventName, "Names an IR event.");
ir_name!(RepositoryName, "Names an IR repository.");
ir_name!(FieldName, "Names a field of an entity.");
ir_name!(ErrorName, "Names a declared application error.");
