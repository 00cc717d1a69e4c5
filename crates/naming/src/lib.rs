//! Pure, side-effect-free identifier naming and Unicode collation used
//! across the `ang` pipeline. No I/O; every function here is deterministic
//! and ASCII-stable on ASCII input.

mod collate;
mod export;

pub use collate::{collate, collate_key};
pub use export::{
    channel_type_name, db_name, export_name, humanize_name, json_name, singularize, to_kebab_case,
    to_snake_case,
};
