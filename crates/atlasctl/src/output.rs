use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Concrete rendering, after `auto` has been resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
}

impl OutputFormat {
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table)
    }
}

/// Print serializable data as JSON, YAML or a generic key/value table
pub fn print_output<T: Serialize>(data: T, format: OutputFormat) -> Result<()> {
    let json_value = serde_json::to_value(data)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json_value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&json_value)?);
        }
        OutputFormat::Table => {
            print_as_table(&json_value);
        }
    }

    Ok(())
}

/// Print typed rows, or `empty_message` when there are none
pub fn print_rows<R: Tabled>(rows: Vec<R>, empty_message: &str) {
    if rows.is_empty() {
        println!("{}", empty_message);
        return;
    }

    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{}", table);
}

#[derive(Tabled)]
struct KeyValueRow {
    #[tabled(rename = "FIELD")]
    key: String,
    #[tabled(rename = "VALUE")]
    value: String,
}

fn print_as_table(value: &Value) {
    match value {
        Value::Object(obj) => {
            let rows: Vec<KeyValueRow> = obj
                .iter()
                .map(|(key, val)| KeyValueRow {
                    key: key.clone(),
                    value: format_value(val),
                })
                .collect();
            print_rows(rows, "");
        }
        _ => println!("{}", format_value(value)),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::Null), "");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!(27017)), "27017");
        assert_eq!(format_value(&json!("Acme")), "Acme");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1})), "{1 fields}");
    }

    #[test]
    fn test_format_predicates() {
        assert!(OutputFormat::Table.is_table());
        assert!(!OutputFormat::Yaml.is_table());
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }
}
