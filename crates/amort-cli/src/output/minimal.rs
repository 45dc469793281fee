use serde_json::Value;

/// Print just the key answer value from the output.
///
/// For a schedule the headline is the cumulative total paid; for a
/// simulation it is the interest saved. Anything else falls back to a
/// priority list of well-known fields, then to the first field.
pub fn print_minimal(value: &Value) {
    // A bare schedule array: last row's cumulative paid.
    if let Value::Array(rows) = value {
        if let Some(total) = rows
            .last()
            .and_then(|r| r.get("running_total_paid"))
        {
            println!("{}", format_minimal(total));
        } else {
            println!("{}", rows.len());
        }
        return;
    }

    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Simulation report: the impact summary is the answer.
    if let Some(interest_delta) = result_obj.get("impact").and_then(|i| i.get("interest_delta")) {
        println!("{}", format_minimal(interest_delta));
        return;
    }

    // Priority list of key output fields
    let priority_keys = [
        "interest_delta",
        "total_paid_delta",
        "term_delta",
        "outstanding_balance",
        "installment_total",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    // Not an object, just print directly
    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
