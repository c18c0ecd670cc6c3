//! Plain-text rendering of search results for the terminal.

use serde_json::Value;

use crate::store::FlightRow;

/// Column order for the known `flights` columns; anything else follows
/// alphabetically.
const PREFERRED: [&str; 9] = [
    "flight_id",
    "airline",
    "origin",
    "destination",
    "departure_datetime",
    "arrival_datetime",
    "travel_class",
    "price",
    "seats_available",
];

/// Render `rows` as an aligned table with a header line.
///
/// Prices get two decimals and a rupee sign; date-times drop their seconds.
///
/// ```
/// use serde_json::json;
/// use voice_flight_agent::results::render_table;
///
/// let row = json!({ "flight_id": "I123-E0", "price": 4500.5 });
/// let table = render_table(&[row.as_object().unwrap().clone()]);
/// assert!(table.contains("₹4500.50"));
/// ```
pub fn render_table(rows: &[FlightRow]) -> String {
    if rows.is_empty() {
        return "No flights found matching your criteria.\n".to_string();
    }

    let mut columns: Vec<&str> = PREFERRED
        .iter()
        .copied()
        .filter(|c| rows.iter().any(|r| r.contains_key(*c)))
        .collect();
    let mut extra: Vec<&str> = rows
        .iter()
        .flat_map(|r| r.keys().map(String::as_str))
        .filter(|k| !PREFERRED.contains(k))
        .collect();
    extra.sort_unstable();
    extra.dedup();
    columns.extend(extra);

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(*c).map(|v| cell(c, v)).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, columns.iter().map(|c| c.to_string()), &widths);
    push_line(&mut out, widths.iter().map(|w| "-".repeat(*w)), &widths);
    for row in cells {
        push_line(&mut out, row.into_iter(), &widths);
    }
    out
}

fn push_line(out: &mut String, cells: impl Iterator<Item = String>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn cell(column: &str, value: &Value) -> String {
    match (column, value) {
        ("price", Value::Number(n)) => match n.as_f64() {
            Some(p) => format!("₹{p:.2}"),
            None => n.to_string(),
        },
        ("departure_datetime" | "arrival_datetime", Value::String(s)) if s.len() >= 16 => {
            s.get(..16).unwrap_or(s).to_string()
        }
        (_, Value::String(s)) => s.clone(),
        (_, Value::Null) => String::new(),
        (_, other) => other.to_string(),
    }
}
