use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::LEDGER_COLUMNS;

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Array(rows) => print_rows_table(rows),
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_report(result, map);
            } else {
                print_flat_object(value);
            }
        }
        _ => {
            println!("{}", value);
        }
    }
}

/// Render a simulation report: the schedule itself, then the impact
/// summary, then the envelope's warnings and methodology.
fn print_report(result: &Value, envelope: &serde_json::Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            if let Some(Value::Array(rows)) = res_map.get("ledger") {
                print_rows_table(rows);
                if let Some(impact) = res_map.get("impact") {
                    println!("\nImpact:");
                    print_flat_object(impact);
                }
            } else {
                print_flat_object(result);
            }
        }
        _ => print_flat_object(&Value::Object(envelope.clone())),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_rows_table(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    // Schedule rows get the fixed column set in ledger order; any other
    // array falls back to the keys of its first object.
    let headers: Vec<String> = if rows.iter().all(is_ledger_row) {
        LEDGER_COLUMNS.iter().map(|c| c.to_string()).collect()
    } else if let Some(Value::Object(first)) = rows.first() {
        first.keys().cloned().collect()
    } else {
        for row in rows {
            println!("{}", format_value(row));
        }
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.get(h.as_str())
                        .map(format_value)
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(record);
        }
    }

    println!("{}", Table::from(builder));
}

fn is_ledger_row(row: &Value) -> bool {
    matches!(row, Value::Object(map) if map.contains_key("outstanding_balance"))
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
