use serde_json::Value;

use crate::cli::OutputFormat;

/// Renders a single resource or a `List` envelope to stdout in the
/// requested format. `table` is deliberately minimal: one row per item,
/// columns drawn from whichever of `metadata.name`/`instanceUid`/`kind`
/// are present, since resource shapes vary across endpoints.
pub fn render(value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value).expect("Value always serializes")),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value).expect("Value always serializes")),
        OutputFormat::Table => render_table(value),
    }
}

fn render_table(value: &Value) {
    let items = value.get("items").and_then(Value::as_array);
    match items {
        Some(items) if !items.is_empty() => {
            for item in items {
                println!("{}", row_label(item));
            }
        }
        Some(_) => println!("No resources found."),
        None => println!("{}", row_label(value)),
    }
}

fn row_label(item: &Value) -> String {
    if let Some(name) = item.get("metadata").and_then(|m| m.get("name")).and_then(Value::as_str) {
        return name.to_string();
    }
    if let Some(name) = item.get("name").and_then(Value::as_str) {
        return name.to_string();
    }
    if let Some(uid) = item.get("instance_uid").and_then(Value::as_str) {
        return uid.to_string();
    }
    if let Some(uid) = item.get("instanceUid").and_then(Value::as_str) {
        return uid.to_string();
    }
    if let Some(id) = item.get("id").and_then(Value::as_str) {
        return id.to_string();
    }
    item.to_string()
}
