//! Markdown documentation generated from compiled entry points.

use crate::command::CompiledEntryPoint;
use crate::engine::Engine;
use std::fmt::Write;

/// Render one command: signature, description, parameters, deprecation.
pub fn render_command(entry: &CompiledEntryPoint) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "### `{}`\n", signature(entry));

    if let Some(deprecation) = entry.deprecation() {
        let _ = writeln!(out, "> **Deprecated**: {deprecation}\n");
    }
    if !entry.description().is_empty() {
        let _ = writeln!(out, "{}\n", entry.description());
    }
    if entry.expects_block() {
        out.push_str("Callers supply the implementation as a block.\n\n");
    }

    if !entry.parameters().is_empty() {
        out.push_str("| Parameter | Type | Domain | Default | Description |\n");
        out.push_str("|---|---|---|---|---|\n");
        for param in entry.parameters() {
            let ty = param.parameter_type();
            let default = param.default().map(ToString::to_string).unwrap_or_else(|| "required".into());
            let _ = writeln!(
                out,
                "| `{}` | `{}` | {} | {} | {} |",
                param.name(),
                ty.name(),
                escape_cell(&ty.domain().describe()),
                escape_cell(&default),
                escape_cell(param.description()),
            );
        }
        out.push('\n');
    }

    out
}

/// `path(a: Type, b: Type = default)`.
pub fn signature(entry: &CompiledEntryPoint) -> String {
    let params: Vec<String> = entry
        .parameters()
        .iter()
        .map(|p| match p.default() {
            Some(default) => format!("{}: {} = {default}", p.name(), p.parameter_type().name()),
            None => format!("{}: {}", p.name(), p.parameter_type().name()),
        })
        .collect();
    format!("{}({})", entry.path(), params.join(", "))
}

/// Render every namespace and command, then the parameter types.
pub fn render_catalog(engine: &Engine) -> String {
    let mut out = String::from("# Commands\n\n");

    for namespace in engine.commands().namespaces() {
        let title = if namespace.is_root() { "(root)" } else { namespace.as_str() };
        let _ = writeln!(out, "## {title}\n");
        for entry in engine.commands().commands_in(&namespace) {
            out.push_str(&render_command(&entry));
        }
    }

    out.push_str("# Parameter types\n\n| Type | Description | Domain |\n|---|---|---|\n");
    for ty in engine.types().all() {
        let _ = writeln!(
            out,
            "| `{}` | {} | {} |",
            ty.name(),
            escape_cell(ty.description()),
            escape_cell(&ty.domain().describe())
        );
    }
    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
