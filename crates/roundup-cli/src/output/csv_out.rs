use serde_json::{Map, Value};
use std::io;

use super::{collect_headers, format_cell};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Results carrying transaction lists are flattened into one record per
/// row, tagged with a leading `section` column naming the list it came from.
/// Scalar-only results fall back to two-column `field,value`.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let result = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            if result.values().any(Value::is_array) {
                write_sections(&mut wtr, result);
            } else {
                write_fields(&mut wtr, result);
            }
        }
        Value::Array(arr) => write_rows(&mut wtr, None, arr),
        _ => {
            let _ = wtr.write_record([format_cell(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_cell(val)]);
    }
}

fn write_sections(wtr: &mut StdoutWriter<'_>, result: &Map<String, Value>) {
    let rows: Vec<Value> = result
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .cloned()
        .collect();
    let headers = collect_headers(&rows);

    let mut header_record = vec!["section".to_string()];
    header_record.extend(headers.iter().cloned());
    let _ = wtr.write_record(&header_record);

    for (section, val) in result {
        if let Value::Array(items) = val {
            for item in items {
                write_row(wtr, Some(section), &headers, item);
            }
        }
    }
}

fn write_rows(wtr: &mut StdoutWriter<'_>, section: Option<&str>, rows: &[Value]) {
    let headers = collect_headers(rows);
    if headers.is_empty() {
        for item in rows {
            let _ = wtr.write_record([format_cell(item)]);
        }
        return;
    }

    let _ = wtr.write_record(&headers);
    for item in rows {
        write_row(wtr, section, &headers, item);
    }
}

fn write_row(wtr: &mut StdoutWriter<'_>, section: Option<&str>, headers: &[String], item: &Value) {
    let Value::Object(map) = item else {
        return;
    };
    let mut record: Vec<String> = section.map(str::to_string).into_iter().collect();
    record.extend(
        headers
            .iter()
            .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default()),
    );
    let _ = wtr.write_record(&record);
}
