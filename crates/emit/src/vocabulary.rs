//! The fixed function vocabulary injected into every template-first
//! emitter. Templates receive only these helpers — never
//! ambient state — so a template cannot reach past the registry to read
//! process globals.

use ang_naming::{export_name, json_name, to_kebab_case, to_snake_case};
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderError, RenderErrorReason,
};
use serde_json::Value;

fn string_helper(
    f: impl Fn(&str) -> String + Send + Sync + 'static,
) -> impl Fn(&Helper, &Handlebars, &Context, &mut RenderContext, &mut dyn Output) -> HelperResult {
    move |h: &Helper, _: &Handlebars, _: &Context, _: &mut RenderContext, out: &mut dyn Output| {
        let input = h
            .param(0)
            .and_then(|p| p.value().as_str())
            .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex("stringHelper", 0))?;
        out.write(&f(input))?;
        Ok(())
    }
}

fn title_case(s: &str) -> String {
    s.chars()
        .next()
        .map(|c| c.to_uppercase().collect::<String>() + &s[c.len_utf8()..])
        .unwrap_or_default()
}

/// Registers the naming, collection, and assertion helpers templates may
/// call. Type-predicate/target-projection and endpoint/policy-introspection
/// helpers are registered by the emitter that owns the live IR/plan data
/// (they need to close over it); this function covers the pure ones.
pub fn register_vocabulary(handlebars: &mut Handlebars) {
    handlebars.register_helper("ExportName", Box::new(string_helper(|s| export_name(s))));
    handlebars.register_helper("JSONName", Box::new(string_helper(|s| json_name(s))));
    handlebars.register_helper("Title", Box::new(string_helper(title_case)));
    handlebars.register_helper("ToLower", Box::new(string_helper(|s| s.to_lowercase())));
    handlebars.register_helper("SnakeCase", Box::new(string_helper(|s| to_snake_case(s))));
    handlebars.register_helper("KebabCase", Box::new(string_helper(|s| to_kebab_case(s))));

    handlebars.register_helper(
        "sortedKeys",
        Box::new(
            |h: &Helper, _: &Handlebars, _: &Context, _: &mut RenderContext, out: &mut dyn Output| -> HelperResult {
                let value = h
                    .param(0)
                    .map(|p| p.value())
                    .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex("sortedKeys", 0))?;
                let mut keys: Vec<&String> = match value {
                    Value::Object(map) => map.keys().collect(),
                    _ => Vec::new(),
                };
                keys.sort();
                out.write(&serde_json::to_string(&keys).unwrap_or_default())?;
                Ok(())
            },
        ),
    );

    handlebars.register_helper(
        "Indent",
        Box::new(
            |h: &Helper, _: &Handlebars, _: &Context, _: &mut RenderContext, out: &mut dyn Output| -> HelperResult {
                let text = h
                    .param(0)
                    .and_then(|p| p.value().as_str())
                    .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex("Indent", 0))?;
                let width = h.param(1).and_then(|p| p.value().as_u64()).unwrap_or(4) as usize;
                let pad = " ".repeat(width);
                let indented: Vec<String> = text.lines().map(|l| format!("{pad}{l}")).collect();
                out.write(&indented.join("\n"))?;
                Ok(())
            },
        ),
    );

    handlebars.register_helper(
        "assert",
        Box::new(
            |h: &Helper, _: &Handlebars, _: &Context, _: &mut RenderContext, _out: &mut dyn Output| -> HelperResult {
                let ok = h.param(0).map(|p| p.value().as_bool().unwrap_or(false)).unwrap_or(false);
                if !ok {
                    let message = h
                        .param(1)
                        .and_then(|p| p.value().as_str())
                        .unwrap_or("assertion failed")
                        .to_string();
                    return Err(RenderError::from(RenderErrorReason::Other(message)));
                }
                Ok(())
            },
        ),
    );

    handlebars.register_helper(
        "assertNotEmpty",
        Box::new(
            |h: &Helper, _: &Handlebars, _: &Context, _: &mut RenderContext, _out: &mut dyn Output| -> HelperResult {
                let empty = match h.param(0).map(|p| p.value()) {
                    Some(Value::String(s)) => s.is_empty(),
                    Some(Value::Array(a)) => a.is_empty(),
                    Some(Value::Null) | None => true,
                    _ => false,
                };
                if empty {
                    let field = h.param(1).and_then(|p| p.value().as_str()).unwrap_or("value");
                    return Err(RenderError::from(RenderErrorReason::Other(format!("{field} must not be empty"))));
                }
                Ok(())
            },
        ),
    );
}
