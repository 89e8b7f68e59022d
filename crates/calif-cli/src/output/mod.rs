use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(&serde_json::to_value(value)?)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

/// Arrays of objects become one row per item; an object becomes key/value
/// rows, with each array field of objects appended as its own table.
fn render_table(value: &Value) -> String {
    match value {
        Value::Array(items) => render_items(items),
        Value::Object(map) => {
            let mut rows = Vec::new();
            let mut sections = Vec::new();
            for (key, field) in map {
                match field {
                    Value::Array(items) if items.iter().any(Value::is_object) => {
                        sections.push(format!("\n{key}:\n{}", render_items(items)));
                    }
                    other => rows.push(vec![key.clone(), cell(other)]),
                }
            }
            let mut out = table::render_rows(&["key", "value"], &rows, options());
            for section in sections {
                out.push_str(&section);
            }
            out
        }
        scalar => table::render_rows(&["value"], &[vec![cell(scalar)]], options()),
    }
}

fn render_items(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    if !items.iter().all(Value::is_object) {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return table::render_rows(&["value"], &rows, options());
    }

    let mut headers = Vec::<&str>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(*header).map_or_else(|| String::from("-"), cell))
                .collect()
        })
        .collect::<Vec<_>>();
    table::render_rows(&headers, &rows, options())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::{render, table};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        student: &'static str,
        team_id: u32,
    }

    #[derive(Serialize)]
    struct Report {
        task: &'static str,
        sidecars: Vec<&'static str>,
        rows: Vec<Row>,
    }

    fn report() -> Report {
        Report {
            task: "1. Lab",
            sidecars: vec!["a.mp3", "a.wav"],
            rows: vec![
                Row {
                    student: "Ana Ruiz",
                    team_id: 1,
                },
                Row {
                    student: "B",
                    team_id: 12,
                },
            ],
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&report(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["task"], "1. Lab");
        assert_eq!(parsed["rows"][1]["team_id"], 12);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&report(), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_splits_nested_rows_into_sections() {
        let out = render(&report(), OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("key")));
        assert!(out.contains("a.mp3, a.wav"));
        assert!(out.contains("rows:"));
        assert!(out.contains("Ana Ruiz"));
    }

    #[test]
    fn numbers_align_right() {
        let rows = vec![
            vec!["A".to_string(), "1".to_string()],
            vec!["B".to_string(), "123456".to_string()],
        ];
        let out = table::render_rows(
            &["student", "team_id"],
            &rows,
            table::TableOptions {
                max_width: None,
                color: false,
            },
        );
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].ends_with("      1"));
    }

    #[test]
    fn narrow_terminal_truncates_with_ellipsis() {
        let rows = vec![vec!["a very long student name indeed".to_string()]];
        let out = table::render_rows(
            &["student"],
            &rows,
            table::TableOptions {
                max_width: Some(12),
                color: false,
            },
        );
        assert!(out.contains('…'));
        assert!(out.lines().all(|line| line.chars().count() <= 12));
    }
}
