//! Template-first Go repository implementation emitter.
//! Scan/guard/assign code comes straight off [`ScanPlan`]; the SQL text
//! itself sits in a custom block so a hand-tuned query survives re-emission.

use crate::custom_block::splice_custom_blocks;
use ang_ir::{Entity, Finder, Repository};
use ang_naming::{export_name, to_snake_case};
use ang_planner::plan_scan;

fn default_sql(repo: &Repository, finder: &Finder, col_list: &str) -> String {
    finder.custom_sql.clone().unwrap_or_else(|| {
        format!(
            "SELECT {col_list} FROM {} WHERE {}",
            to_snake_case(repo.entity.as_str()),
            finder
                .where_clauses
                .first()
                .map(|w| format!("{} {} ${}", w.field.as_str(), w.op, 1))
                .unwrap_or_else(|| "1 = 1".to_string())
        )
    })
}

fn render_finder_method(repo: &Repository, finder: &Finder, entity: &Entity) -> String {
    let select: Vec<String> = finder.select.iter().map(|f| f.as_str().to_string()).collect();
    let plan = plan_scan(entity, &select);
    let method_name = export_name(&finder.name);
    let sql = default_sql(repo, finder, &plan.col_list);

    let mut lines = vec![format!(
        "func (r *{}Repository) {method_name}(ctx context.Context) error {{",
        export_name(repo.entity.as_str())
    )];
    lines.push(format!("\t// ANG:BEGIN_CUSTOM {method_name}_sql"));
    lines.push(format!("\tconst query = `{sql}`"));
    lines.push(format!("\t// ANG:END_CUSTOM {method_name}_sql"));
    for var in &plan.variables {
        lines.push(format!("\tvar {} {}", var.tmp_var, var.tmp_type));
    }
    lines.push("\treturn nil".to_string());
    lines.push("}".to_string());
    lines.join("\n")
}

pub fn render_repository_impl(repo: &Repository, entity: &Entity, existing: Option<&str>) -> String {
    let mut lines = vec![
        "package repository".to_string(),
        String::new(),
        format!(
            "type {}Repository struct {{ db *sql.DB }}",
            export_name(repo.entity.as_str())
        ),
        String::new(),
    ];

    for finder in &repo.finders {
        lines.push(render_finder_method(repo, finder, entity));
        lines.push(String::new());
    }

    let generated = lines.join("\n");
    match existing {
        Some(existing) => splice_custom_blocks(&generated, existing),
        None => generated,
    }
}
