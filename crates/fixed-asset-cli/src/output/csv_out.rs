use serde_json::{Map, Value};
use std::io;

use super::{format_cell, is_record_array};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// The first list of records in the result becomes the CSV body (schedule
/// rows, rollforward categories, disposal lines). Results with no such list
/// fall back to a two-column field/value layout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let written = match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_result(&mut wtr, result),
            _ => write_fields(&mut wtr, map),
        },
        Value::Array(arr) => write_records(&mut wtr, arr),
        _ => wtr.write_record([format_cell(value)]),
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        tracing::error!(error = %e, "failed to write CSV output");
    }
}

fn write_result(wtr: &mut StdoutWriter<'_>, result: &Map<String, Value>) -> csv::Result<()> {
    let Some(Value::Array(records)) = result.values().find(|v| is_record_array(v)) else {
        return write_fields(wtr, result);
    };

    // A list of schedules: flatten every schedule's rows under its book.
    if records.iter().any(|r| r.get("rows").is_some_and(is_record_array)) {
        let mut header_written = false;
        for schedule in records {
            let book = schedule.get("book").map(format_cell).unwrap_or_default();
            if let Some(Value::Array(rows)) = schedule.get("rows") {
                if !header_written {
                    if let Some(Value::Object(first)) = rows.first() {
                        let mut headers = vec!["book".to_string()];
                        headers.extend(first.keys().cloned());
                        wtr.write_record(&headers)?;
                        header_written = true;
                    }
                }
                for row in rows {
                    if let Value::Object(map) = row {
                        let mut record = vec![book.clone()];
                        record.extend(map.values().map(format_cell));
                        wtr.write_record(&record)?;
                    }
                }
            }
        }
        return Ok(());
    }

    write_records(wtr, records)
}

fn write_records(wtr: &mut StdoutWriter<'_>, arr: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([format_cell(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_cell).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

fn write_fields(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &format_cell(val)])?;
    }
    Ok(())
}
