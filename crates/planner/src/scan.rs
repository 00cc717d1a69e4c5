//! SQL projection planning (`ScanPlan`). Lowers a selected set of
//! entity fields into the scan variables a Go repository method needs:
//! temporary scan destinations, the guards that unwrap them, and the
//! assignment expressions that populate the domain struct.

use ang_ir::{Entity, Field, TypeRef};
use ang_naming::export_name;

#[derive(Debug, Clone, PartialEq)]
pub struct ScanVariable {
    /// Field path on the destination domain struct, e.g. `CreatedAt`.
    pub go_path: String,
    /// Local scan-destination variable name, e.g. `vCreatedAt`.
    pub tmp_var: String,
    /// Go type of the scan destination.
    pub tmp_type: String,
    /// Post-scan guard expression gating the assignment, if any (e.g.
    /// `.Valid` checks on a `sql.Null*` wrapper).
    pub guard: Option<String>,
    /// Assignment expression applied once the guard (if any) passes.
    pub assign_code: String,
    /// Name of a conversion helper applied to the scanned value, if any.
    pub mapping_fn: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanPlan {
    pub columns: Vec<String>,
    pub variables: Vec<ScanVariable>,
    pub col_list: String,
    /// True when `select` was non-empty and narrower than the entity's
    /// full field set.
    pub partial: bool,
}

pub fn plan_scan(entity: &Entity, select: &[String]) -> ScanPlan {
    let partial = !select.is_empty() && select.len() < entity.fields.len();

    let fields: Vec<&Field> = if select.is_empty() {
        entity.fields.iter().collect()
    } else {
        entity
            .fields
            .iter()
            .filter(|f| select.iter().any(|s| s == f.name.as_str()))
            .collect()
    };

    let mut columns = Vec::with_capacity(fields.len());
    let mut variables = Vec::with_capacity(fields.len());

    for field in fields {
        let go_path = export_name(field.name.as_str());
        let tmp_var = format!("v{go_path}");
        let column = field
            .db
            .column_type
            .clone()
            .unwrap_or_else(|| ang_naming::db_name(field.name.as_str()));

        let (column_select, variable) = plan_field(field, &go_path, &tmp_var, &column);
        columns.push(column_select);
        variables.push(variable);
    }

    let col_list = columns.join(", ");

    ScanPlan {
        columns,
        variables,
        col_list,
        partial,
    }
}

fn plan_field(field: &Field, go_path: &str, tmp_var: &str, column: &str) -> (String, ScanVariable) {
    let is_json_valued = matches!(field.type_ref, TypeRef::List { .. } | TypeRef::Map { .. });

    if matches!(field.type_ref, TypeRef::Time) {
        return (
            format!("{column}::text"),
            ScanVariable {
                go_path: go_path.to_string(),
                tmp_var: tmp_var.to_string(),
                tmp_type: "sql.NullString".to_string(),
                guard: Some(".Valid".to_string()),
                assign_code: format!("dest.{go_path} = parsed"),
                mapping_fn: Some("normalizeTimeString".to_string()),
            },
        );
    }

    if is_json_valued {
        return (
            column.to_string(),
            ScanVariable {
                go_path: go_path.to_string(),
                tmp_var: tmp_var.to_string(),
                tmp_type: "sql.NullString".to_string(),
                guard: Some(".Valid".to_string()),
                assign_code: format!("json.Unmarshal([]byte({tmp_var}.String), &dest.{go_path})"),
                mapping_fn: None,
            },
        );
    }

    let primitive = primitive_go_type(&field.type_ref);

    if field.optional {
        let (null_type, accessor) = null_wrapper(&field.type_ref);
        return (
            column.to_string(),
            ScanVariable {
                go_path: go_path.to_string(),
                tmp_var: tmp_var.to_string(),
                tmp_type: null_type,
                guard: Some(".Valid".to_string()),
                assign_code: format!("dest.{go_path} = {tmp_var}.{accessor}"),
                mapping_fn: None,
            },
        );
    }

    (
        column.to_string(),
        ScanVariable {
            go_path: go_path.to_string(),
            tmp_var: tmp_var.to_string(),
            tmp_type: primitive,
            guard: None,
            assign_code: format!("dest.{go_path} = {tmp_var}"),
            mapping_fn: None,
        },
    )
}

fn primitive_go_type(type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::String | TypeRef::Alias { .. } => "string".to_string(),
        TypeRef::Int => "int64".to_string(),
        TypeRef::Float => "float64".to_string(),
        TypeRef::Bool => "bool".to_string(),
        TypeRef::Bytes => "[]byte".to_string(),
        TypeRef::Time => "time.Time".to_string(),
        TypeRef::Entity { name } => format!("domain.{}", export_name(name.as_str())),
        TypeRef::List { item } => format!("[]{}", primitive_go_type(item)),
        TypeRef::Map { value } => format!("map[string]{}", primitive_go_type(value)),
    }
}

fn null_wrapper(type_ref: &TypeRef) -> (String, String) {
    match type_ref {
        TypeRef::String | TypeRef::Alias { .. } => ("sql.NullString".to_string(), "String".to_string()),
        TypeRef::Int => ("sql.NullInt64".to_string(), "Int64".to_string()),
        TypeRef::Float => ("sql.NullFloat64".to_string(), "Float64".to_string()),
        TypeRef::Bool => ("sql.NullBool".to_string(), "Bool".to_string()),
        TypeRef::Time => ("sql.NullTime".to_string(), "Time".to_string()),
        other => (format!("sql.Null[{}]", primitive_go_type(other)), "V".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ang_ir::DbFieldMeta;
    use std::collections::BTreeMap;

    fn field(name: &str, type_ref: TypeRef, optional: bool) -> Field {
        Field {
            name: name.into(),
            type_ref,
            optional,
            list: false,
            item_type_name: None,
            nested_item_fields: vec![],
            db: DbFieldMeta::default(),
            validate_tag: None,
            ui: BTreeMap::new(),
            skip_domain: false,
            secret: false,
            pii: false,
            constraints: BTreeMap::new(),
        }
    }

    fn entity(fields: Vec<Field>) -> Entity {
        Entity {
            name: "Tender".into(),
            owner: "Tenders".into(),
            fields,
            metadata: BTreeMap::new(),
            ui: BTreeMap::new(),
        }
    }

    #[test]
    fn required_primitive_assigns_directly() {
        let e = entity(vec![field("id", TypeRef::String, false)]);
        let plan = plan_scan(&e, &[]);
        assert_eq!(plan.variables[0].tmp_type, "string");
        assert!(plan.variables[0].guard.is_none());
        assert!(!plan.partial);
    }

    #[test]
    fn optional_field_uses_null_wrapper_guard() {
        let e = entity(vec![field("notes", TypeRef::String, true)]);
        let plan = plan_scan(&e, &[]);
        assert_eq!(plan.variables[0].tmp_type, "sql.NullString");
        assert_eq!(plan.variables[0].guard.as_deref(), Some(".Valid"));
    }

    #[test]
    fn timestamp_field_casts_to_text_and_parses() {
        let e = entity(vec![field("created_at", TypeRef::Time, false)]);
        let plan = plan_scan(&e, &[]);
        assert!(plan.columns[0].ends_with("::text"));
        assert_eq!(plan.variables[0].mapping_fn.as_deref(), Some("normalizeTimeString"));
    }

    #[test]
    fn narrower_select_marks_plan_partial() {
        let e = entity(vec![
            field("id", TypeRef::String, false),
            field("name", TypeRef::String, false),
        ]);
        let plan = plan_scan(&e, &["id".to_string()]);
        assert!(plan.partial);
        assert_eq!(plan.columns.len(), 1);
    }
}
