//! Compiles the flow step DSL into Go control-flow source. A
//! step tree either renders completely or the whole method is declared
//! "not renderable" — callers fall back to `impl.code` or log a missing-impl
//! audit entry rather than emit a half-rendered method.

use ang_ir::{FlowArg, FlowStep};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("flow action {0} is not supported by the renderer")]
    UnsupportedAction(String),
}

const SUPPORTED_ACTIONS: &[&str] = &[
    "logic.Check",
    "repo.Get",
    "repo.Find",
    "repo.GetForUpdate",
    "repo.List",
    "repo.Save",
    "repo.Delete",
    "mapping.Assign",
    "flow.If",
    "flow.For",
    "flow.Block",
    "tx.Block",
    "list.Filter",
    "list.Paginate",
    "list.Append",
    "list.Sort",
    "str.Normalize",
];

pub fn flow_action_supported(action: &str) -> bool {
    SUPPORTED_ACTIONS.contains(&action)
}

/// A scope is the set of names already declared in the current and
/// enclosing Go blocks. `resp` and `err` are always pre-declared.
type Scope = BTreeSet<String>;

fn initial_scope() -> Scope {
    ["resp", "err"].iter().map(|s| s.to_string()).collect()
}

/// Renders a method's flow steps into Go source lines (no surrounding
/// function signature). Returns [`FlowError::UnsupportedAction`] on the
/// first step the renderer doesn't know how to compile; the caller decides
/// the fallback, the renderer itself never partially emits a method.
pub fn render_flow(steps: &[FlowStep]) -> Result<String, FlowError> {
    let mut scope = initial_scope();
    let mut out = Vec::new();
    render_steps(steps, &mut scope, 0, &mut out)?;
    Ok(out.join("\n"))
}

fn render_steps(steps: &[FlowStep], scope: &mut Scope, depth: usize, out: &mut Vec<String>) -> Result<(), FlowError> {
    for step in steps {
        render_one_flow_step(step, scope, depth, out)?;
    }
    Ok(())
}

fn render_one_flow_step(step: &FlowStep, scope: &mut Scope, depth: usize, out: &mut Vec<String>) -> Result<(), FlowError> {
    if !flow_action_supported(&step.action) {
        return Err(FlowError::UnsupportedAction(step.action.clone()));
    }

    match step.action.as_str() {
        "logic.Check" => render_check(step, depth, out),
        "repo.Get" | "repo.Find" | "repo.GetForUpdate" | "repo.List" | "repo.Save" | "repo.Delete" => {
            render_repo(step, scope, depth, out)
        }
        "mapping.Assign" => render_assign(step, scope, depth, out),
        "flow.If" => render_if(step, scope, depth, out)?,
        "flow.For" => render_for(step, scope, depth, out)?,
        "flow.Block" | "tx.Block" => render_steps(arg_steps(step, "_do"), scope, depth, out)?,
        "list.Filter" => render_filter(step, scope, depth, out),
        "list.Paginate" => render_paginate(step, scope, depth, out),
        "list.Append" => render_append(step, depth, out),
        "list.Sort" => render_sort(step, scope, depth, out),
        "str.Normalize" => render_normalize(step, scope, depth, out),
        other => return Err(FlowError::UnsupportedAction(other.to_string())),
    }

    Ok(())
}

fn line(depth: usize, text: impl Into<String>) -> String {
    format!("{}{}", "\t".repeat(depth), text.into())
}

fn arg_str<'a>(step: &'a FlowStep, key: &str) -> Option<&'a str> {
    step.args.get(key).and_then(FlowArg::as_str)
}

fn arg_str_or<'a>(step: &'a FlowStep, key: &str, default: &'a str) -> &'a str {
    arg_str(step, key).unwrap_or(default)
}

fn arg_bool(step: &FlowStep, key: &str) -> bool {
    step.args.get(key).and_then(FlowArg::as_bool).unwrap_or(false)
}

fn arg_number_or(step: &FlowStep, key: &str, default: f64) -> f64 {
    step.args.get(key).and_then(FlowArg::as_number).unwrap_or(default)
}

fn arg_steps<'a>(step: &'a FlowStep, key: &str) -> &'a [FlowStep] {
    step.args.get(key).and_then(FlowArg::as_steps).unwrap_or(&[])
}

fn render_check(step: &FlowStep, depth: usize, out: &mut Vec<String>) {
    let cond = arg_str_or(step, "condition", "true");
    let throw = arg_str_or(step, "throw", "bad request");
    out.push(line(depth, format!("if !({cond}) {{")));
    out.push(line(depth + 1, format!("return resp, apierr.BadRequest(\"{throw}\")")));
    out.push(line(depth, "}"));
}

fn render_repo(step: &FlowStep, scope: &mut Scope, depth: usize, out: &mut Vec<String>) {
    let source = arg_str_or(step, "source", "");
    let default_method = match step.action.as_str() {
        "repo.Get" | "repo.Find" => "FindByID",
        "repo.List" => "ListAll",
        "repo.GetForUpdate" => "GetByIDForUpdate",
        "repo.Save" => "Save",
        "repo.Delete" => "Delete",
        other => unreachable!("not a repo action: {other}"),
    };
    let method = arg_str_or(step, "method", default_method);
    let input = arg_str(step, "input");
    let output = arg_str(step, "output");

    let call = match input {
        Some(i) => format!("s.{source}Repo.{method}(ctx, {i})"),
        None => format!("s.{source}Repo.{method}(ctx)"),
    };

    match output {
        Some(name) => {
            let op = if scope.contains(name) { "=" } else { ":=" };
            out.push(line(depth, format!("{name}, err {op} {call}")));
            scope.insert(name.to_string());
        }
        None => out.push(line(depth, format!("_, err = {call}"))),
    }

    out.push(line(depth, "if err != nil {"));
    out.push(line(depth + 1, "return resp, err"));
    out.push(line(depth, "}"));
}

fn render_assign(step: &FlowStep, scope: &mut Scope, depth: usize, out: &mut Vec<String>) {
    let to = arg_str_or(step, "to", "_");
    let value = arg_str_or(step, "value", "nil");
    let is_plain_ident = !to.contains('.') && !to.contains('[');
    let declare = arg_bool(step, "declare") && is_plain_ident && !scope.contains(to);

    if declare {
        scope.insert(to.to_string());
        out.push(line(depth, format!("{to} := {value}")));
    } else {
        out.push(line(depth, format!("{to} = {value}")));
    }
}

fn render_if(step: &FlowStep, scope: &Scope, depth: usize, out: &mut Vec<String>) -> Result<(), FlowError> {
    let cond = arg_str_or(step, "cond", "true");
    out.push(line(depth, format!("if {cond} {{")));
    let mut then_scope = scope.clone();
    render_steps(arg_steps(step, "_then"), &mut then_scope, depth + 1, out)?;

    let else_steps = arg_steps(step, "_else");
    if !else_steps.is_empty() {
        out.push(line(depth, "} else {"));
        let mut else_scope = scope.clone();
        render_steps(else_steps, &mut else_scope, depth + 1, out)?;
    }
    out.push(line(depth, "}"));
    Ok(())
}

fn render_for(step: &FlowStep, scope: &Scope, depth: usize, out: &mut Vec<String>) -> Result<(), FlowError> {
    let each = arg_str_or(step, "each", "items");
    let as_name = arg_str_or(step, "as", "item");
    out.push(line(depth, format!("for _, {as_name} := range {each} {{")));
    let mut child_scope = scope.clone();
    child_scope.insert(as_name.to_string());
    render_steps(arg_steps(step, "_do"), &mut child_scope, depth + 1, out)?;
    out.push(line(depth, "}"));
    Ok(())
}

fn render_filter(step: &FlowStep, scope: &mut Scope, depth: usize, out: &mut Vec<String>) {
    let to = arg_str_or(step, "to", "filtered");
    let from = arg_str_or(step, "from", "items");
    let as_name = arg_str_or(step, "as", "item");
    let cond = arg_str_or(step, "cond", "true");

    out.push(line(depth, format!("{to} := {from}[:0]")));
    scope.insert(to.to_string());
    out.push(line(depth, format!("for _, {as_name} := range {from} {{")));
    out.push(line(depth + 1, format!("if {cond} {{")));
    out.push(line(depth + 2, format!("{to} = append({to}, {as_name})")));
    out.push(line(depth + 1, "}"));
    out.push(line(depth, "}"));
}

fn render_paginate(step: &FlowStep, scope: &mut Scope, depth: usize, out: &mut Vec<String>) {
    let from = arg_str_or(step, "from", "items");
    let to = arg_str_or(step, "to", "page");
    let offset_expr = arg_str_or(step, "offset", "req.Offset");
    let limit_expr = arg_str_or(step, "limit", "req.Limit");
    let default_limit = arg_number_or(step, "defaultLimit", 50.0) as i64;

    out.push(line(depth, format!("_off := {offset_expr}")));
    out.push(line(depth, "if _off < 0 {"));
    out.push(line(depth + 1, "_off = 0"));
    out.push(line(depth, "}"));
    out.push(line(depth, format!("_lim := {limit_expr}")));
    out.push(line(depth, "if _lim <= 0 {"));
    out.push(line(depth + 1, format!("_lim = {default_limit}")));
    out.push(line(depth, "}"));
    out.push(line(depth, "_start := _off"));
    out.push(line(depth, format!("if _start > len({from}) {{")));
    out.push(line(depth + 1, format!("_start = len({from})")));
    out.push(line(depth, "}"));
    out.push(line(depth, "_end := _start + _lim"));
    out.push(line(depth, format!("if _end > len({from}) {{")));
    out.push(line(depth + 1, format!("_end = len({from})")));
    out.push(line(depth, "}"));
    out.push(line(depth, format!("{to} := {from}[_start:_end]")));
    scope.insert(to.to_string());
}

fn render_append(step: &FlowStep, depth: usize, out: &mut Vec<String>) {
    let to = arg_str_or(step, "to", "resp.Data");
    let item = arg_str_or(step, "item", "item");
    out.push(line(depth, format!("{to} = append({to}, {item})")));
}

fn render_sort(step: &FlowStep, scope: &mut Scope, depth: usize, out: &mut Vec<String>) {
    let from = arg_str_or(step, "from", "items");
    let to = arg_str_or(step, "to", "sorted");
    let by = arg_str_or(step, "by", "ID");
    let op = if arg_str_or(step, "order", "asc") == "desc" { ">" } else { "<" };

    out.push(line(depth, format!("{to} := append({from}[:0:0], {from}...)")));
    scope.insert(to.to_string());
    out.push(line(depth, format!("sort.Slice({to}, func(i, j int) bool {{")));
    out.push(line(depth + 1, format!("return {to}[i].{by} {op} {to}[j].{by}")));
    out.push(line(depth, "})"));
}

fn render_normalize(step: &FlowStep, scope: &mut Scope, depth: usize, out: &mut Vec<String>) {
    let to = arg_str_or(step, "to", "out");
    let input = arg_str_or(step, "in", "in");
    let mode = arg_str_or(step, "mode", "trim");

    let expr = if mode == "trim" {
        format!("strings.TrimSpace({input})")
    } else {
        format!("strings.ToLower(strings.TrimSpace({input}))")
    };
    out.push(line(depth, format!("{to} := {expr}")));
    scope.insert(to.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn step(action: &str, args: &[(&str, FlowArg)]) -> FlowStep {
        FlowStep {
            action: action.to_string(),
            args: args.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        }
    }

    #[test]
    fn unsupported_action_is_rejected_without_partial_output() {
        let steps = vec![step("magic.Teleport", &[])];
        assert_eq!(
            render_flow(&steps).unwrap_err(),
            FlowError::UnsupportedAction("magic.Teleport".to_string())
        );
    }

    #[test]
    fn logic_check_renders_guarded_error_return() {
        let steps = vec![step(
            "logic.Check",
            &[
                ("condition", FlowArg::String(r#"req.CompanyID != """#.to_string())),
                ("throw", FlowArg::String("companyId is required".to_string())),
            ],
        )];
        let rendered = render_flow(&steps).unwrap();
        assert!(rendered.contains(r#"if !(req.CompanyID != "") {"#));
    }

    #[test]
    fn s6_scenario_renders_full_list_pipeline() {
        let steps = vec![
            step(
                "logic.Check",
                &[
                    ("condition", FlowArg::String(r#"req.CompanyID != """#.to_string())),
                    ("throw", FlowArg::String("companyId is required".to_string())),
                ],
            ),
            step(
                "repo.List",
                &[
                    ("source", FlowArg::String("Tender".to_string())),
                    ("method", FlowArg::String("ListByCompany".to_string())),
                    ("input", FlowArg::String("req.CompanyID".to_string())),
                    ("output", FlowArg::String("items".to_string())),
                ],
            ),
            step(
                "list.Filter",
                &[
                    ("to", FlowArg::String("filtered".to_string())),
                    ("from", FlowArg::String("items".to_string())),
                    ("as", FlowArg::String("t".to_string())),
                    ("cond", FlowArg::String("true".to_string())),
                ],
            ),
            step(
                "list.Paginate",
                &[
                    ("from", FlowArg::String("filtered".to_string())),
                    ("to", FlowArg::String("page".to_string())),
                    ("defaultLimit", FlowArg::Number(50.0)),
                ],
            ),
            step(
                "flow.For",
                &[
                    ("each", FlowArg::String("page".to_string())),
                    ("as", FlowArg::String("item".to_string())),
                    (
                        "_do",
                        FlowArg::Steps(vec![step(
                            "list.Append",
                            &[
                                ("to", FlowArg::String("resp.Data".to_string())),
                                ("item", FlowArg::String("item".to_string())),
                            ],
                        )]),
                    ),
                ],
            ),
        ];

        let rendered = render_flow(&steps).unwrap();
        assert!(rendered.contains(r#"if !(req.CompanyID != "") {"#));
        assert!(rendered.contains("s.TenderRepo.ListByCompany(ctx, req.CompanyID)"));
        assert!(rendered.contains("filtered := items[:0]"));
        assert!(rendered.contains("page := filtered[_start:_end]"));
        assert!(rendered.contains("resp.Data = append(resp.Data, item)"));
    }

    #[test]
    fn flow_if_clones_scope_per_branch() {
        let steps = vec![step(
            "flow.If",
            &[
                ("cond", FlowArg::String("ok".to_string())),
                (
                    "_then",
                    FlowArg::Steps(vec![step(
                        "mapping.Assign",
                        &[
                            ("to", FlowArg::String("x".to_string())),
                            ("value", FlowArg::String("1".to_string())),
                            ("declare", FlowArg::Bool(true)),
                        ],
                    )]),
                ),
                (
                    "_else",
                    FlowArg::Steps(vec![step(
                        "mapping.Assign",
                        &[
                            ("to", FlowArg::String("x".to_string())),
                            ("value", FlowArg::String("2".to_string())),
                            ("declare", FlowArg::Bool(true)),
                        ],
                    )]),
                ),
            ],
        )];

        let rendered = render_flow(&steps).unwrap();
        assert!(rendered.contains("x := 1"));
        assert!(rendered.contains("x := 2"));
    }

    #[test]
    fn tx_block_inlines_without_wrapper() {
        let steps = vec![step(
            "tx.Block",
            &[(
                "_do",
                FlowArg::Steps(vec![step(
                    "mapping.Assign",
                    &[
                        ("to", FlowArg::String("x".to_string())),
                        ("value", FlowArg::String("1".to_string())),
                        ("declare", FlowArg::Bool(true)),
                    ],
                )]),
            )],
        )];

        let rendered = render_flow(&steps).unwrap();
        assert_eq!(rendered, "x := 1");
    }

    proptest! {
        /// Any sequence of `mapping.Assign declare=true` steps to the same
        /// name renders exactly one `:=` followed by `=` for every
        /// subsequent assignment, never redeclaring.
        #[test]
        fn repeated_declared_assign_uses_colon_equals_only_once(count in 1usize..8) {
            let steps: Vec<FlowStep> = (0..count)
                .map(|_| step(
                    "mapping.Assign",
                    &[
                        ("to", FlowArg::String("x".to_string())),
                        ("value", FlowArg::String("1".to_string())),
                        ("declare", FlowArg::Bool(true)),
                    ],
                ))
                .collect();
            let rendered = render_flow(&steps).unwrap();
            let lines: Vec<&str> = rendered.lines().collect();
            prop_assert_eq!(lines.len(), count);
            prop_assert_eq!(lines[0], "x := 1");
            for line in &lines[1..] {
                prop_assert_eq!(*line, "x = 1");
            }
        }
    }
}
