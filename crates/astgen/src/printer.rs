//! Prints [`crate::ast`] trees to canonically-indented Go source. No
//! external formatter is invoked — the AST cannot represent a malformed
//! expression, so the printer's output is well-formed by construction.

use crate::ast::{GoFunc, GoInterface, GoStruct};

fn format_params(params: &[crate::ast::GoParam]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", p.name, p.type_name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_returns(returns: &[String]) -> String {
    match returns.len() {
        0 => String::new(),
        1 => returns[0].clone(),
        _ => format!("({})", returns.join(", ")),
    }
}

pub fn print_interface(iface: &GoInterface) -> String {
    let mut lines = vec![format!("type {} interface {{", iface.name)];
    for method in &iface.methods {
        lines.push(format!(
            "\t{}({}) {}",
            method.name,
            format_params(&method.params),
            format_returns(&method.returns)
        ));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

pub fn print_struct(s: &GoStruct) -> String {
    let mut lines = vec![format!("type {} struct {{", s.name)];
    for field in &s.fields {
        lines.push(format!("\t{} {}", field.name, field.type_name));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

pub fn print_func(f: &GoFunc) -> String {
    let receiver = f
        .receiver
        .as_ref()
        .map(|r| format!("({} {}) ", r.name, r.type_name))
        .unwrap_or_default();

    let mut lines = vec![format!(
        "func {receiver}{}({}) {} {{",
        f.name,
        format_params(&f.params),
        format_returns(&f.returns)
    )];
    for stmt in &f.body {
        for raw_line in stmt.split('\n') {
            lines.push(format!("\t{raw_line}"));
        }
    }
    lines.push("}".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{GoFunc, GoInterface, GoMethodSig, GoParam, GoStruct, GoField};

    #[test]
    fn prints_single_method_interface() {
        let iface = GoInterface {
            name: "TendersService".to_string(),
            methods: vec![GoMethodSig {
                name: "GetTender".to_string(),
                params: vec![
                    GoParam { name: "ctx".to_string(), type_name: "context.Context".to_string() },
                    GoParam { name: "req".to_string(), type_name: "*dto.GetTenderRequest".to_string() },
                ],
                returns: vec!["*dto.Tender".to_string(), "error".to_string()],
            }],
        };
        let rendered = print_interface(&iface);
        assert_eq!(
            rendered,
            "type TendersService interface {\n\tGetTender(ctx context.Context, req *dto.GetTenderRequest) (*dto.Tender, error)\n}"
        );
    }

    #[test]
    fn prints_struct_fields_in_declared_order() {
        let s = GoStruct {
            name: "TendersServiceImpl".to_string(),
            fields: vec![
                GoField { name: "tenderRepo".to_string(), type_name: "repository.TenderRepository".to_string() },
                GoField { name: "txManager".to_string(), type_name: "tx.Manager".to_string() },
            ],
        };
        assert_eq!(
            print_struct(&s),
            "type TendersServiceImpl struct {\n\ttenderRepo repository.TenderRepository\n\ttxManager tx.Manager\n}"
        );
    }

    #[test]
    fn prints_func_with_receiver_and_body() {
        let f = GoFunc {
            name: "NewTendersServiceImpl".to_string(),
            receiver: None,
            params: vec![GoParam { name: "tenderRepo".to_string(), type_name: "repository.TenderRepository".to_string() }],
            returns: vec!["*TendersServiceImpl".to_string()],
            body: vec!["return &TendersServiceImpl{tenderRepo: tenderRepo}".to_string()],
        };
        assert_eq!(
            print_func(&f),
            "func NewTendersServiceImpl(tenderRepo repository.TenderRepository) *TendersServiceImpl {\n\treturn &TendersServiceImpl{tenderRepo: tenderRepo}\n}"
        );
    }
}
