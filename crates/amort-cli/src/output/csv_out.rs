use serde_json::Value;
use std::io;

use super::LEDGER_COLUMNS;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Array(rows) => write_rows_csv(&mut wtr, rows),
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                if let Some(Value::Array(rows)) = result.get("ledger") {
                    write_rows_csv(&mut wtr, rows);
                } else {
                    write_field_value_csv(&mut wtr, result);
                }
            } else {
                write_field_value_csv(&mut wtr, map);
            }
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    if rows.is_empty() {
        return;
    }

    let headers: Vec<String> = if rows
        .iter()
        .all(|r| matches!(r, Value::Object(map) if map.contains_key("outstanding_balance")))
    {
        LEDGER_COLUMNS.iter().map(|c| c.to_string()).collect()
    } else if let Some(Value::Object(first)) = rows.first() {
        first.keys().cloned().collect()
    } else {
        for row in rows {
            let _ = wtr.write_record([&format_csv_value(row)]);
        }
        return;
    };

    let _ = wtr.write_record(&headers);
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.get(h.as_str())
                        .map(format_csv_value)
                        .unwrap_or_default()
                })
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}

fn write_field_value_csv(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    map: &serde_json::Map<String, Value>,
) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
